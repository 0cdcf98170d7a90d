use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use sqlx::postgres::PgPoolOptions;

use rental_pricing::config::Config;
use rental_pricing::routes::{
    configure_pricing_routes, configure_quote_routes, AppState, PricingSettings,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("🔥 Failed to run database migrations: {}", err);
        std::process::exit(1);
    }

    let gst_percentage = config.gst_percentage;
    info!(
        "🚀 Server started successfully on {}:{} (GST {}%)",
        config.http_host, config.http_port, gst_percentage
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState { db: pool.clone() }))
            .app_data(web::Data::new(PricingSettings { gst_percentage }))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allow_any_method()
                    .supports_credentials(),
            )
            .wrap(Logger::default())
            .configure(configure_quote_routes)
            .configure(configure_pricing_routes)
    })
    .bind((config.http_host.as_str(), config.http_port))?
    .run()
    .await
}
