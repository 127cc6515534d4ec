//! Dependency-injected program loading for `import` resolution
//! (`SPEC_FULL.md` section 10.4, spec section 6). CORE never touches the
//! filesystem directly; the host supplies an implementation of this trait
//! (`slang-cli`'s `FsProgramLoader` resolves paths relative to the
//! importing file's directory, per section 6).
//!
//! Grounded on the same "inject I/O, keep CORE pure" pattern the teacher
//! already follows for printing (`ouros::io::PrintWriter`), applied here
//! to file loading instead of stdout.

use std::path::Path;

use crate::error::Result;

/// Resolves an `import "path";` statement to source text.
pub trait ProgramLoader {
    /// Loads the program at `path`, which is resolved relative to
    /// `importing_from` (the directory of the file containing the
    /// `import` statement).
    fn load(&self, importing_from: &Path, path: &str) -> Result<String>;
}

/// A loader that always fails; useful for evaluating programs known not to
/// use `import` (e.g. most unit tests).
#[derive(Debug, Default)]
pub struct NoImportsLoader;

impl ProgramLoader for NoImportsLoader {
    fn load(&self, _importing_from: &Path, path: &str) -> Result<String> {
        Err(crate::error::Error::internal(format!("imports are not supported in this context (tried '{path}')")))
    }
}
