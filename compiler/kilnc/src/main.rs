//! Kiln CLI
//!
//! Resolves the import graph of an entry file and keeps translated artifacts
//! up to date.

mod args;
mod commands;
mod error;
mod logging;
mod translator;

use std::io::Write;

use args::{parse_options, CliOptions};
use error::CliError;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let run: fn(&CliOptions, &mut dyn Write) -> Result<(), CliError> = match command {
        "build" => commands::build,
        "deps" => commands::deps,
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("kiln {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("error: unknown command '{command}'");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    logging::init();

    let result = parse_options(&args[2..]).and_then(|options| {
        let stdout = std::io::stdout();
        run(&options, &mut stdout.lock())
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        if matches!(err, CliError::Usage(_)) {
            eprintln!();
            print_usage();
        }
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: kiln <command> <entry> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  build    Resolve dependencies and refresh stale artifacts");
    eprintln!("  deps     Print the resolved dependency set (* = translated)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --root <dir>               Search root, in priority order (repeatable)");
    eprintln!("                             Default: the entry file's directory");
    eprintln!("  --ext <suffix>             Plain source extension (repeatable)");
    eprintln!("  --translate-ext <suffix>   Extension that needs translation (repeatable)");
    eprintln!("                             Any extension flag replaces the defaults .elmx, .elm");
    eprintln!("  --target-ext <suffix>      Artifact extension (default: .elm)");
    eprintln!("  --out <dir>                Write artifacts under <dir> instead of beside sources");
    eprintln!("  -j, --jobs <n>             Worker threads (default: one per core)");
    eprintln!("  --cache                    Reuse the resolved dependency set");
    eprintln!("  --translator <cmd> [args]  External translator (stdin to stdout); must come last");
    eprintln!("                             Default: copy sources unchanged");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  KILN_LOG        Log filter (falls back to RUST_LOG), e.g. kiln_build=debug");
    eprintln!("  KILN_LOG_TREE   Render spans as a tree");
}
