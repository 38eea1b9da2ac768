use crate::core::LookupError;
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// JSON body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: "Not found".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn status_for(err: &LookupError) -> StatusCode {
    match err {
        LookupError::InvalidDate(_) => StatusCode::BAD_REQUEST,
        LookupError::CurrencyNotAvailable(_)
        | LookupError::DateNotAvailable(_)
        | LookupError::ValueNotAvailable { .. } => StatusCode::NOT_FOUND,
        LookupError::SourceUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            error!(%status, "Lookup failed: {err}");
        } else {
            warn!(%status, "Rejected lookup: {err}");
        }
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Rejected path: {}", rejection.body_text());
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                LookupError::InvalidDate("not-a-date".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                LookupError::CurrencyNotAvailable("ZZZ".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                LookupError::DateNotAvailable("2023-11-19".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                LookupError::ValueNotAvailable {
                    currency: "SEK".to_string(),
                    date: "2023-11-22".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                LookupError::SourceUnavailable("HTTP error 500".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err.clone()).status(), expected, "{err}");
        }
    }
}
