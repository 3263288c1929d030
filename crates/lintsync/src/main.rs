//! lintsync binary entry point.

// Fatal errors are rendered to stderr after tracing may have failed to start.
#![allow(clippy::print_stderr)]

use lintsync::cli::{Cli, EXIT_CLI, EXIT_OK, exit_code_for};
use lintsync::tracing::{TracingConfig, init_tracing};
use tracing::Instrument;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = Cli::parse_args();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("{e:?}");
        std::process::exit(EXIT_CLI);
    }

    let span = tracing::info_span!(
        "lintsync",
        correlation_id = %lintsync::tracing::correlation_id()
    );

    match lintsync::run(&cli).instrument(span).await {
        Ok(report) => {
            tracing::info!(
                versions = report.versions.len(),
                default_version = %report.default_version,
                path = %report.output_file.display(),
                "Done"
            );
            std::process::exit(EXIT_OK);
        }
        Err(err) => {
            let code = exit_code_for(&err);
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}
