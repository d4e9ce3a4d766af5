//! Configuration document API endpoints

use crate::endpoint::{ConfigDocument, JSON_CONTENT_TYPE};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use bytes::Bytes;
use log::error;

/// Return the current document
pub async fn api_json_get(State(state): State<AppState>) -> Result<ConfigDocument, ApiError> {
    state.endpoint.read().await.map_err(|e| {
        error!("Failed to read config file: {}", e);
        e
    })
}

/// Replace the document with the request body
pub async fn api_json_put(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    check_content_type(&headers)?;

    state.endpoint.write(&body).await.map_err(|e| {
        error!("Failed to save config file: {}", e);
        e
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Accept `application/json` with any parameters; a missing header is rejected
fn check_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Err(ApiError::UnsupportedMediaType {
            found: "none".to_string(),
        });
    };

    let found = value.to_str().unwrap_or_default();
    let essence = found.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType {
            found: found.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_content_type_accepts_json_variants() {
        assert!(check_content_type(&with_type("application/json")).is_ok());
        assert!(check_content_type(&with_type("application/json; charset=utf-8")).is_ok());
        assert!(check_content_type(&with_type("Application/JSON")).is_ok());
    }

    #[test]
    fn test_content_type_rejects_other_media() {
        let err = check_content_type(&with_type("text/plain")).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = check_content_type(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().contains("none"));
    }
}
