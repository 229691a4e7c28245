use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Domain error taxonomy. Handlers return `Result<_, ApiError>` and the
/// status/envelope mapping lives here alone.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut fields: Vec<&str> = e.field_errors().keys().copied().collect();
        fields.sort_unstable();
        Self::Validation(format!("Invalid value for: {}", fields.join(", ")))
    }
}

/// Re-map a storage-layer unique violation into a domain conflict; everything
/// else stays an internal error.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> ApiError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => ApiError::Conflict(message.to_string()),
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn assert_error(error: ApiError, expected_status: StatusCode, expected_message: &str) {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], expected_message);
    }

    #[tokio::test]
    async fn validation_maps_to_422() {
        assert_error(
            ApiError::Validation("Invalid value for: bio".into()),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid value for: bio",
        )
        .await;
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        assert_error(
            ApiError::NotFound("Menu non trovato".into()),
            StatusCode::NOT_FOUND,
            "Menu non trovato",
        )
        .await;
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        assert_error(
            ApiError::Conflict("Email already registered".into()),
            StatusCode::CONFLICT,
            "Email already registered",
        )
        .await;
    }

    #[tokio::test]
    async fn internal_hides_cause() {
        assert_error(
            ApiError::Internal(anyhow::anyhow!("connection refused")),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        )
        .await;
    }

    #[test]
    fn validation_errors_collapse_to_field_list() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(max = 3))]
            bio: String,
        }

        let err = Probe {
            bio: "too long".into(),
        }
        .validate()
        .unwrap_err();
        let api: ApiError = err.into();
        assert_eq!(api.to_string(), "Invalid value for: bio");
        assert_eq!(api.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
