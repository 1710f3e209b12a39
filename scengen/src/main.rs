use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	let filter = EnvFilter::try_from_env("SCENGEN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.without_time()
		.init();

	match scengen::cli::main_entrypoint() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			tracing::error!("{e}");
			ExitCode::FAILURE
		}
	}
}
