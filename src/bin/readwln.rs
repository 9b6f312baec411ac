//! `readwln`: parses a WLN string and emits it back out in one of a few
//! output formats (§6's CLI surface). Only WLN output (`-owln`, `-ocan`)
//! is actually implemented — `-osmi`/`-oinchi`/`-okey` are accepted for
//! flag-surface parity with the original tool but reject at runtime,
//! since translating to other notations is an explicit non-goal.

use clap::Parser;
use std::io::{self, Read};
use std::process::ExitCode;

/// Read a WLN string and print a derived representation.
#[derive(Parser, Debug)]
#[command(name = "readwln", version, about)]
struct Args {
    /// WLN string to read; if omitted, read from stdin.
    #[arg(short = 's', long = "string")]
    string: Option<String>,

    /// Emit diagnostic traces (sets the log level to debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Accept but ignore: the legacy reader is not a distinct code path.
    #[arg(long = "old")]
    old: bool,

    /// Emit the WLN string unchanged (modulo canonical formatting).
    #[arg(long = "owln")]
    owln: bool,

    /// Emit the canonical WLN form.
    #[arg(long = "ocan")]
    ocan: bool,

    /// Unsupported: SMILES export is out of scope for this crate.
    #[arg(long = "osmi")]
    osmi: bool,

    /// Unsupported: InChI export is out of scope for this crate.
    #[arg(long = "oinchi")]
    oinchi: bool,

    /// Unsupported: InChIKey export is out of scope for this crate.
    #[arg(long = "okey")]
    okey: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.old {
        log::debug!("--old accepted; the legacy reader is not a distinct code path");
    }

    if args.osmi || args.oinchi || args.okey {
        eprintln!("readwln: SMILES/InChI/InChIKey export is not implemented by this crate");
        return ExitCode::FAILURE;
    }

    let input = match args.string {
        Some(s) => s,
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("readwln: failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
            buf.trim_end_matches('\n').to_string()
        }
    };

    let options = wln::ReadOptions::new().debug(args.debug);
    let result: Result<String, wln::Error> = if args.ocan {
        wln::canonicalize(&input)
    } else {
        wln::read(&input, options)
            .map_err(wln::Error::from)
            .and_then(|mol| {
                wln::write(&mol, wln::WriteOptions::new().debug(args.debug))
                    .map_err(wln::Error::from)
            })
    };
    let result = result.map_err(|e| e.to_string());

    match result {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("readwln: {e}");
            ExitCode::FAILURE
        }
    }
}
