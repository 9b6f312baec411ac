//! `writewln`: the inverse CLI of `readwln` — accepts a molecule in some
//! input notation and emits its WLN form (§6's CLI surface). Only WLN
//! input (`-ican`, the canonical/plain WLN passthrough) is actually
//! implemented — `-ismi`/`-iinchi`/`-imol` are accepted for flag-surface
//! parity with the original tool but reject at runtime, since parsing
//! other notations is an explicit non-goal.

use clap::Parser;
use std::io::{self, Read};
use std::process::ExitCode;

/// Read a molecule and print its WLN form.
#[derive(Parser, Debug)]
#[command(name = "writewln", version, about)]
struct Args {
    /// Input string to convert; if omitted, read from stdin.
    #[arg(short = 's', long = "string")]
    string: Option<String>,

    /// Emit diagnostic traces (sets the log level to debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Input is already WLN; write it back canonicalized.
    #[arg(long = "ican")]
    ican: bool,

    /// Unsupported: SMILES import is out of scope for this crate.
    #[arg(long = "ismi")]
    ismi: bool,

    /// Unsupported: InChI import is out of scope for this crate.
    #[arg(long = "iinchi")]
    iinchi: bool,

    /// Unsupported: molfile import is out of scope for this crate.
    #[arg(long = "imol")]
    imol: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.ismi || args.iinchi || args.imol {
        eprintln!("writewln: SMILES/InChI/molfile import is not implemented by this crate");
        return ExitCode::FAILURE;
    }

    let input = match args.string {
        Some(s) => s,
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("writewln: failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
            buf.trim_end_matches('\n').to_string()
        }
    };

    // `-ican` and the bare default both treat the input as WLN; there is
    // no other implemented source format, so both paths canonicalize.
    let _ = args.ican;
    let result = wln::canonicalize(&input).map_err(|e| e.to_string());

    match result {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("writewln: {e}");
            ExitCode::FAILURE
        }
    }
}
