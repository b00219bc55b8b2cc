mod errors;
mod logging;
mod initialization;
mod handlers;
mod manager_production;
mod manager_solar;
mod manager_spi;
mod manager_weather;
mod models;
mod serialize_timestamp;

use actix_web::{middleware, web, App, HttpServer};
use log::info;
use crate::errors::UnrecoverableError;
use crate::handlers::{get_estimate, post_angles};
use crate::initialization::{config, Config};

struct AppState {
    config: Config,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;
    let web_data = web::Data::new(AppState { config: config.clone() });

    info!("starting web server on {}:{}", config.web_server.bind_address, config.web_server.bind_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web_data.clone())
            .wrap(middleware::Logger::default())
            .service(get_estimate)
            .service(post_angles)
    })
        .bind((config.web_server.bind_address.as_str(), config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
