use targetwatch::{AppResult, cli::Cli, config::Config, init_logging, session::SessionManager};

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse_args();

    // Load configuration
    let config = Config::load_or_default(&cli.config_file);

    // Initialize logging; the guard flushes the file sink on drop
    let _guard = init_logging(&cli.effective_log_level(), &config.log)?;

    tracing::info!("Targetwatch Price Monitor starting...");
    tracing::debug!("CLI arguments: {:?}", cli);

    // Create and run the interactive session
    let mut session_manager = SessionManager::new(config);

    if let Err(err) = session_manager.run().await {
        tracing::error!("fatal session error: {err:#}");
        return Err(err.into());
    }

    Ok(())
}
