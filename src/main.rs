mod chatkit;
mod config;
mod error;
mod web;

use actix_files as fs;
use actix_web::{web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info, warn};
use tera::Tera;

use chatkit::ChatKitClient;
use config::Config;
use web::routes;

// App state structure
struct AppState {
    config: Config,
    tera: Tera,
    client: ChatKitClient,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    let config = Config::from_env();
    let default_level = match &config {
        Ok(c) if c.debug => "debug",
        _ => "info",
    };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_level));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting ChatKit proxy");

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        if !config.debug {
            std::process::exit(1);
        }
        warn!("Continuing in debug mode; health checks will report unhealthy");
    }

    let client = match ChatKitClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build upstream HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let tera = match web::load_templates() {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
    };

    let bind = (config.host.clone(), config.port);
    let static_dir = config.static_dir.clone();
    info!("Listening on {}:{}", bind.0, bind.1);

    // Create app state
    let app_state = Data::new(AppState {
        config,
        tera,
        client,
    });

    // Start web server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
