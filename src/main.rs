//! dupedetect - duplicate file detector
//!
//! Entry point for the dupedetect CLI application.

use clap::Parser;
use dupedetect::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    logging::init_logging,
};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    init_logging(cli.verbose, cli.quiet);

    let code = match dupedetect::run_app(cli) {
        Ok(code) => code,
        Err(err) => {
            let code = ExitCode::GeneralError;
            let json = json_errors
                .then(|| serde_json::to_string_pretty(&StructuredError::new(&err, code)).ok())
                .flatten();
            match json {
                Some(json) => eprintln!("{json}"),
                None => eprintln!("[{}] Error: {:#}", code.code_prefix(), err),
            }
            code
        }
    };
    code.into()
}
