use actix_web::{get, post, web, HttpResponse, Responder};
use actix_web::http::StatusCode;
use log::error;
use serde::Deserialize;
use crate::AppState;
use crate::manager_production::errors::ProdError;
use crate::manager_production::Pipeline;
use crate::manager_spi::errors::SpiError;
use crate::manager_spi::{write_angles, AngleCommand};

#[derive(Deserialize)]
struct EstimateParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub mount_type: String,
    pub product_version: String,
}

#[derive(Deserialize)]
struct AngleParams {
    pub first: u16,
    pub second: Option<u16>,
}

#[get("/estimate")]
pub async fn get_estimate(data: web::Data<AppState>, params: web::Query<EstimateParams>) -> impl Responder {
    let lat = params.lat.unwrap_or(data.config.geo_ref.lat);
    let lon = params.lon.unwrap_or(data.config.geo_ref.long);

    let estimate = Pipeline::new(&data.config)
        .estimate(lat, lon, &params.mount_type, &params.product_version).await;

    match estimate.map(|e| serde_json::to_string(&e)) {
        Ok(Ok(json)) => HttpResponse::Ok().content_type("application/json").body(json),
        Ok(Err(e)) => {
            error!("serializing estimate: {}", e);
            HttpResponse::InternalServerError().body(e.to_string())
        },
        Err(e) => {
            error!("{}", e);
            HttpResponse::build(prod_status(&e)).body(e.to_string())
        },
    }
}

#[post("/angles")]
pub async fn post_angles(data: web::Data<AppState>, params: web::Query<AngleParams>) -> impl Responder {
    let command = match params.second {
        Some(second) => AngleCommand::Pair(params.first, second),
        None => AngleCommand::Single(params.first),
    };
    let spi = data.config.spi.clone();

    match web::block(move || write_angles(&spi, command)).await {
        Ok(Ok(())) => HttpResponse::Ok().finish(),
        Ok(Err(e)) => {
            error!("{}", e);
            HttpResponse::build(spi_status(&e)).body(e.to_string())
        },
        Err(e) => {
            error!("spi writer did not run: {}", e);
            HttpResponse::InternalServerError().body(e.to_string())
        },
    }
}

fn prod_status(e: &ProdError) -> StatusCode {
    match e {
        ProdError::Weather(_) => StatusCode::BAD_GATEWAY,
        ProdError::Validation(_) | ProdError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
    }
}

fn spi_status(e: &SpiError) -> StatusCode {
    match e {
        SpiError::HardwareIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SpiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
    }
}
