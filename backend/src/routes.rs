use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::info;
use serde_json::json;
use shared::PredictionResponse;

use crate::classifier::Classifier;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::imaging;
use crate::upload::{self, ScratchFile};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "OK" }))
}

struct ImageUpload {
    filename: String,
    data: Vec<u8>,
}

/// Scans the multipart stream for a non-empty file part named `image`.
async fn read_image_field(payload: &mut Multipart) -> Result<Option<ImageUpload>, ApiError> {
    while let Ok(Some(mut field)) = payload.try_next().await {
        let (is_image, filename) = match field.content_disposition() {
            Some(disposition) => (
                disposition.get_name() == Some("image"),
                disposition.get_filename().map(str::to_owned),
            ),
            None => (false, None),
        };
        if !is_image {
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            data.extend_from_slice(&chunk?);
        }
        if data.is_empty() {
            continue;
        }

        return Ok(Some(ImageUpload {
            filename: filename.unwrap_or_default(),
            data,
        }));
    }
    Ok(None)
}

/// `POST /predict`: validate -> persist -> resize -> infer -> cleanup ->
/// respond. The scratch file guard removes the upload on every exit path.
async fn predict(
    classifier: web::Data<dyn Classifier>,
    config: web::Data<AppConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let upload = read_image_field(&mut payload)
        .await?
        .ok_or(ApiError::MissingInput)?;

    if !upload::allowed_file(&upload.filename) {
        return Err(ApiError::UnsupportedFormat);
    }

    let scratch = ScratchFile::persist(&config.uploads_dir, &upload.filename, &upload.data)?;
    imaging::resize_in_place(scratch.path(), config.target_size)?;
    let results = classifier.predict(scratch.path())?;
    drop(scratch);

    let probs = results
        .into_iter()
        .next()
        .and_then(|result| result.probs)
        .ok_or(ApiError::InferenceUnavailable)?;

    info!("Prediction completed for {}", upload.filename);
    Ok(HttpResponse::Ok().json(PredictionResponse::from_probs(&probs, &config.labels)))
}
