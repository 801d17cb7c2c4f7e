use crate::config::HostConfig;
use crate::relay::{self, RelayError};
use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::info;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    cfg.service(web::resource("/api/config").route(web::get().to(get_config)))
        .service(web::resource("/api/predict").route(web::post().to(handle_predict)))
        .service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn get_config(config: web::Data<HostConfig>) -> HttpResponse {
    HttpResponse::Ok().json(config.client_settings())
}

async fn handle_predict(
    config: web::Data<HostConfig>,
    client: web::Data<reqwest::Client>,
    payload: Multipart,
) -> Result<HttpResponse, RelayError> {
    let upload = relay::read_upload(payload).await?;
    info!("Received file: {} ({} bytes)", upload.filename, upload.bytes.len());
    relay::forward(&client, &config.predict_upstream, upload).await
}
