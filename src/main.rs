use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::{Context, Result};
use config::Config;
use sqlite_store::SqliteRateStore;

mod config;
mod error;
mod loan;
mod rate_record;
mod routes;
mod service;
mod sqlite_store;
mod store;
mod validator;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let store = SqliteRateStore::connect(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("Can't open rate database {}", config.database_url))?;
    let store = web::Data::new(store);

    log::info!("listening on {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .configure(routes::configure::<SqliteRateStore>)
    })
    .bind(&config.bind_address)
    .with_context(|| format!("Can't bind to {}", config.bind_address))?
    .run()
    .await?;

    Ok(())
}
