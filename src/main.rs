use clap::Parser;
use notify_relay::cli::{self, Cli};
use notify_relay::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match cli::load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(cli::executor::EXIT_CONFIGURATION);
        }
    };

    let logger_config = match cli::logger_config(&cli, &settings) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Logger configuration error: {}", e);
            std::process::exit(cli::executor::EXIT_CONFIGURATION);
        }
    };
    init_logger(logger_config)?;

    tracing::debug!(
        version = notify_relay::pkg_version(),
        services = ?settings.enabled_services(),
        "settings loaded"
    );

    if let Err(e) = cli::execute_command(&cli, settings).await {
        cli::report_error(&e);
        std::process::exit(cli::exit_code(&e));
    }

    Ok(())
}
