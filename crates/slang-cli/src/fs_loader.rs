//! `ProgramLoader` implementation over `std::fs` (spec.md section 6:
//! "Import resolution"). CORE (`slang`) never touches the filesystem
//! directly; this is the one place in the workspace that does, matching
//! `ouros-cli/src/main.rs`'s own `read_file` helper.

use std::fs;
use std::path::Path;

use slang::{Error, ProgramLoader, Result};

/// Resolves `import "path";` relative to the directory of the file that
/// contains the `import` statement, per section 6.
#[derive(Debug, Default)]
pub struct FsProgramLoader;

impl ProgramLoader for FsProgramLoader {
    fn load(&self, importing_from: &Path, path: &str) -> Result<String> {
        let resolved = importing_from.join(path);
        fs::read_to_string(&resolved)
            .map_err(|err| Error::internal(format!("failed to read '{}': {err}", resolved.display())))
    }
}
