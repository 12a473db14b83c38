use relay::{logger, server, AppState, Config, VisualClient};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init()?;

    if dotenv_loaded {
        log::info!(".env file loaded successfully");
    } else {
        log::warn!("No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.server.host(),
        config.server.port(),
    );
    logger::log_config_info(&config);

    let client = match VisualClient::new(&config.volc) {
        Ok(client) => {
            log::info!("Visual client initialized for {}", client.host());
            client
        }
        Err(e) => {
            log::error!("Failed to initialize visual client: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(Arc::new(client), config.volc.req_key.clone());
    server::run(&config, state).await?;

    log::info!("Server stopped");
    Ok(())
}
