use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use shared::ErrorResponse;

use crate::classifier::ClassifierError;
use crate::imaging::ImagingError;
use crate::upload::UploadError;

/// Request-level failures. Client errors (400) leave no file side effects;
/// processing failures (500) are logged with detail and the scratch file is
/// already removed by the time the response is built.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image file provided")]
    MissingInput,
    #[error("Invalid file format. Allowed formats: png, jpg, jpeg")]
    UnsupportedFormat,
    #[error("Error during prediction: {0}")]
    Processing(String),
    #[error("Unable to process the image")]
    InferenceUnavailable,
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Processing(err.to_string())
    }
}

impl From<ImagingError> for ApiError {
    fn from(err: ImagingError) -> Self {
        ApiError::Processing(err.to_string())
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        ApiError::Processing(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        ApiError::Processing(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput | ApiError::UnsupportedFormat => StatusCode::BAD_REQUEST,
            ApiError::Processing(_) | ApiError::InferenceUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(ApiError::MissingInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::UnsupportedFormat.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn processing_errors_map_to_500() {
        assert_eq!(
            ApiError::Processing("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InferenceUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_the_wire_contract() {
        assert_eq!(ApiError::MissingInput.to_string(), "No image file provided");
        assert_eq!(
            ApiError::UnsupportedFormat.to_string(),
            "Invalid file format. Allowed formats: png, jpg, jpeg"
        );
        assert_eq!(
            ApiError::Processing("disk full".into()).to_string(),
            "Error during prediction: disk full"
        );
        assert_eq!(
            ApiError::InferenceUnavailable.to_string(),
            "Unable to process the image"
        );
    }
}
