//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flood_processor::{ErrorKind, FloodError};
use thiserror::Error;
use tracing::error;

use crate::response::ErrorResponse;

/// Errors surfaced by API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request: no file part, bad multipart body, bad parameters.
    #[error("{0}")]
    BadRequest(String),

    /// The pipeline rejected or failed on the upload.
    #[error(transparent)]
    Processing(#[from] FloodError),

    #[error("{0}")]
    NotFound(String),

    /// Workspace or task failures unrelated to the input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Processing(e) => match e.kind() {
                ErrorKind::SourceRead | ErrorKind::Reprojection | ErrorKind::Dimension => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ErrorKind::Encoding => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_processor::Stage;
    use std::path::PathBuf;

    #[test]
    fn test_status_by_kind() {
        let source = ApiError::from(FloodError::SourceRead {
            path: PathBuf::from("in.tif"),
            message: "bad".into(),
        });
        assert_eq!(source.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let dim = ApiError::from(FloodError::Dimension {
            stage: Stage::Downsample,
            width: 800,
            height: 0,
        });
        assert_eq!(dim.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let enc = ApiError::from(FloodError::Encoding {
            path: None,
            message: "deflate".into(),
        });
        assert_eq!(enc.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            ApiError::BadRequest("No file part".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
