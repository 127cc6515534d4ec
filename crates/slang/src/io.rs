//! Output capture for the `echo` builtin (`SPEC_FULL.md` section 10.7).
//!
//! Directly modeled on `ouros::io`'s `PrintWriter` trait and its
//! `StdPrint`/`CollectStringPrint`/`NoPrint` implementations: CORE never
//! writes to a real stream directly, it writes through a trait object the
//! host supplies, so tests can assert on `echo` output without capturing
//! real stdout.

/// A sink for the lines `echo` produces. Mirrors `PrintWriter`'s
/// `stdout_write`/`stdout_push` split collapsed into a single
/// line-oriented method, since slang's `echo` always emits exactly one
/// line per call.
pub trait OutputSink {
    fn emit_line(&mut self, line: &str);
}

/// Writes every line to real standard output, used by `slang-cli`.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Collects every line into a `Vec<String>` instead of writing anywhere,
/// used by tests that assert on `echo` output (`ouros::io::CollectStringPrint`'s
/// counterpart).
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub lines: Vec<String>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for CollectingSink {
    fn emit_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

/// Discards every line, used when a caller has no interest in `echo`
/// output at all (`ouros::io::NoPrint`'s counterpart).
#[derive(Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit_line(&mut self, _line: &str) {}
}
