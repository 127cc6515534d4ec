//! The `slang` executable: the external interface named by spec.md
//! section 6 (CLI surface, input/output format, import resolution).
//!
//! Grounded on `ouros-cli/src/main.rs`'s shape (manual `Vec<String>` argv
//! parsing, a `read_file` helper, `Error`-to-stderr printing, process exit
//! code), simplified per `DESIGN.md`: no `RunProgress` state machine (no
//! external-function/snapshot machinery — out of scope for a CLI that
//! never suspends evaluation), and `judge()`'s result is reported
//! best-effort rather than blocking the run on failure (section 4.7:
//! "not a blocker for evaluation").

mod fs_loader;
mod render;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fs_loader::FsProgramLoader;
use render::{GridPosition, RenderOptions};
use slang::{to_json, Error, StdoutSink};

struct CliArgs {
    in_path: PathBuf,
    out_path: Option<PathBuf>,
    render: RenderOptions,
    print_to_stdout: bool,
}

fn parse_args(raw: &[String]) -> Result<CliArgs, String> {
    let mut positionals = Vec::new();
    let mut render = RenderOptions::default();
    let mut print_to_stdout = false;

    let mut i = 0;
    while i < raw.len() {
        let arg = raw[i].as_str();
        match arg {
            "-p" => print_to_stdout = true,
            "--grid-size" => render.grid_size = parse_flag_value(raw, &mut i, arg)?,
            "--grid-fine" => render.grid_fine = parse_flag_value(raw, &mut i, arg)?,
            "--ppu" => render.ppu = parse_flag_value(raw, &mut i, arg)?,
            "--zoom" => render.zoom = parse_flag_value(raw, &mut i, arg)?,
            "--grid-position" => {
                i += 1;
                let value = raw.get(i).ok_or_else(|| "--grid-position requires a value".to_owned())?;
                render.grid_position = GridPosition::parse(value)
                    .ok_or_else(|| format!("invalid --grid-position '{value}' (expected top, bottom, or none)"))?;
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unrecognized flag '{other}'"));
            }
            other => positionals.push(other.to_owned()),
        }
        i += 1;
    }

    if positionals.is_empty() {
        return Err("expected an input path".to_owned());
    }
    let in_path = PathBuf::from(&positionals[0]);
    let out_path = positionals.get(1).map(PathBuf::from);
    if positionals.len() > 2 {
        return Err("too many positional arguments (expected in_path [out_path])".to_owned());
    }

    Ok(CliArgs { in_path, out_path, render, print_to_stdout })
}

/// Parses `--flag N`, advancing `i` past both tokens.
fn parse_flag_value(raw: &[String], i: &mut usize, flag: &str) -> Result<u32, String> {
    *i += 1;
    let value = raw.get(*i).ok_or_else(|| format!("{flag} requires a value"))?;
    value.parse().map_err(|_| format!("{flag} expects an integer, got '{value}'"))
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("error reading '{}': {err}", path.display()))
}

fn main() -> ExitCode {
    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let source = match read_file(&args.in_path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let base_dir = args.in_path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let loader = FsProgramLoader;
    let mut sink = StdoutSink;

    let value = match slang::run_source(&source, &loader, &base_dir, &mut sink) {
        Ok(value) => value,
        Err(err) => {
            report_error(&err);
            return ExitCode::FAILURE;
        }
    };

    // Best-effort: a type-judge failure is reported but never blocks the
    // run (section 4.7 — the judge is "not a blocker for evaluation").
    if let Err(err) = slang::judge_source(&source, &loader, &base_dir, &mut slang::NullSink) {
        eprintln!("warning: type judge failed: {err}");
    }

    let json = to_json(&value);

    if args.print_to_stdout {
        match serde_json::to_string(&json) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("error: failed to serialize result: {err}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if let Some(out_path) = &args.out_path {
        let rendered = match serde_json::to_string_pretty(&json) {
            Ok(rendered) => rendered,
            Err(err) => {
                eprintln!("error: failed to serialize result: {err}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = fs::write(out_path, rendered) {
            eprintln!("error: failed to write '{}': {err}", out_path.display());
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    // Neither `-p` nor an `out_path` was given: the CLI falls through to
    // the (absent) rendering collaborator named by section 6's
    // `--grid-*`/`--ppu`/`--zoom` flags. Out of scope per section 1's
    // Non-goals, so this is reported rather than attempted.
    if let Err(message) = render::render(&args.render, &value) {
        eprintln!("error: {message}");
    }
    ExitCode::FAILURE
}

fn report_error(err: &Error) {
    match err.position() {
        Some(position) => eprintln!("error at {position}: {err}"),
        None => eprintln!("error: {err}"),
    }
}
