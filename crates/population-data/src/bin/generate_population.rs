//! Population generator CLI.
//!
//! Settings are layered from CLI flags, `POPULATION_*` environment variables
//! and configuration files, then handed to `population_data::run`. Logs go to
//! stderr as JSON, filtered by `RUST_LOG`; the artifact path is printed on
//! stdout.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use population_data::{ConfigError, PopulationError, PopulationSettings, WriteSummary, run};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    report(generate(), io::stdout().lock(), io::stderr().lock())
}

fn generate() -> Result<WriteSummary, PopulationError> {
    let settings = PopulationSettings::load_from_iter(std::env::args_os()).map_err(|err| {
        ConfigError::Load {
            message: err.to_string(),
        }
    })?;
    let plan = settings.resolve()?;
    run(&plan)
}

/// Writes the artifact path or the error and picks the exit code.
fn report(
    outcome: Result<WriteSummary, PopulationError>,
    mut out: impl Write,
    mut err: impl Write,
) -> ExitCode {
    match outcome {
        Ok(summary) => {
            if let Err(write_err) = writeln!(out, "{}", summary.path) {
                drop(write_err);
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            if let Err(write_err) = writeln!(err, "{failure}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}
