//! twintrim - duplicate file remover
//!
//! Entry point for the twintrim CLI application.

use clap::Parser;
use twintrim::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    options::ConfigurationError,
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    match twintrim::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err.downcast_ref::<ConfigurationError>().is_some() {
                ExitCode::InvalidConfiguration
            } else {
                ExitCode::GeneralError
            };

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
