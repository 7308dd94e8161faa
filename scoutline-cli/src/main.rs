//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = scoutline_cli::run() {
        eprintln!("scoutline: {err}");
        std::process::exit(1);
    }
}
