// Web Server - main.rs
// saltshark/web-server/src/main.rs
use actix_web::{web, App, HttpServer};
use common::{setup_tracing, Config};
use saltshark_server::{api, middleware, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Setup tracing
    setup_tracing();

    // Load configuration
    let config = Config::from_env();

    let state = AppState::from_config(&config).map_err(|e| {
        tracing::error!("Failed to initialise application state: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(state);

    tracing::info!("Starting SaltShark gateway on {}", config.server.bind_addr);
    tracing::info!("Proxying salt-api at {}", config.salt_api.url);

    let cors_config = config.cors.clone();
    // one limiter shared by every worker
    let login_limiter = middleware::RateLimiter::for_login(&config.rate_limit)
        .trust_forwarded(config.server.trust_forwarded_headers);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(login_limiter.clone())
            .wrap(middleware::cors(&cors_config))
            .configure(api::configure)
    });

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.bind(&config.server.bind_addr)?.run().await
}
