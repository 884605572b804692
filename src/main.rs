use actix_web::{App, HttpServer};
use clap::Parser;
use tracing::{error, info};

use content_publisher::{
    app::AppContext, cli::Cli, config::Config, shutdown::ShutdownCoordinator, telemetry,
};

fn invalid(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let config = cli.apply(Config::from_env().map_err(invalid)?);

    telemetry::init_logging(&config.log_dir)?;

    info!("Starting content-publisher");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Upstream timeout: {:?}", config.upstream_timeout);
    info!("  - OpenAI model: {}", config.openai_model);
    info!("  - OpenAI configured: {}", config.openai_api_key.is_some());
    info!("  - HeyGen configured: {}", config.heygen_api_key.is_some());
    if config.api_key.is_none() {
        error!("VORTIA_API_KEY is not set; every authenticated request will be rejected");
    }

    let host = config.host.clone();
    let port = config.port;

    // Built once so every worker shares the same registries
    let context = AppContext::from_config(config)
        .map_err(|e| invalid(format!("Failed to build HTTP client: {}", e)))?;

    let server_context = context.clone();
    let server = HttpServer::new(move || {
        let context = server_context.clone();
        App::new().configure(move |cfg| context.configure(cfg))
    });

    info!("Server starting on http://{}:{}", host, port);

    let server = server.bind((host.as_str(), port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, context)
        .wait_for_shutdown()
        .await
}
