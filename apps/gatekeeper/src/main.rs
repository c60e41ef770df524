use actix_web::{web, App, HttpServer};
use gatekeeper::{
    cors_middleware, form_config, key_source, routes, AppConfig, AuthGateMiddleware,
    RequestTrace, StateBuilder, StructuredLogger, TraceSpan,
};
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let keys = match key_source(&config.key_store) {
        Ok(keys) => keys,
        Err(e) => {
            error!(error = %e, "Key store setup failed");
            std::process::exit(1);
        }
    };

    // no key material means no authenticated routes; refuse to start
    let app_state = match StateBuilder::new(config.security.clone())
        .with_database_url(config.database_url.clone())
        .with_key_source(keys)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, "Starting gatekeeper");

    let data = web::Data::new(app_state);
    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(AuthGateMiddleware)
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(form_config())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
