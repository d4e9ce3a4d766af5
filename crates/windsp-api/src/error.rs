//! Error types for windsp-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::Path;
use thiserror::Error;
use windsp_config::{ConfigError, ConfigErrorCode, ConfigErrorDetails};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported media type: {found}, expected application/json")]
    UnsupportedMediaType { found: String },
}

impl ApiError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ApiError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// HTTP status reported for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Config(ConfigError::FileNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    pub fn to_details(&self) -> ConfigErrorDetails {
        match self {
            ApiError::Config(err) => err.to_details(),
            ApiError::Io { path, .. } => {
                ConfigErrorDetails::new(ConfigErrorCode::IoError, self.to_string())
                    .with_path(path.clone())
            }
            ApiError::UnsupportedMediaType { .. } => {
                ConfigErrorDetails::new(ConfigErrorCode::InvalidValue, self.to_string())
                    .with_field("Content-Type".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_details())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(ConfigError::FileNotFound {
            path: "/tmp/WinDSP.json".to_string(),
            parameter: "--conf".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_details().code, ConfigErrorCode::FileNotFound);
    }

    #[test]
    fn test_io_maps_to_500_and_keeps_cause() {
        let err = ApiError::io(
            Path::new("/tmp/WinDSP.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("denied"));
        assert_eq!(
            err.to_details().path.as_deref(),
            Some("/tmp/WinDSP.json")
        );
    }
}
