use apicontract::cli::{run_cli, Outcome};
use apicontract::logging::{init_logging_with_config, LogConfig};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("warning: {e:#}");
    }

    match run_cli() {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Rejected) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::from(2)
        }
    }
}
