use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use wikispace_store::StoreError;

/// A handler failure that maps directly onto an HTTP response.
///
/// There is no retry or partial-success path; the first failure aborts the
/// handler and becomes the response.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self {
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoUser(_) | StoreError::NoTiddler { .. } => {
                HttpError::NotFound(err.to_string())
            }
            StoreError::BadQuery(_) => HttpError::BadRequest(err.to_string()),
            StoreError::Database(_) => HttpError::Internal(err.to_string()),
        }
    }
}

#[test]
fn test_store_error_mapping() {
    let err = StoreError::NoUser("carol".to_string());
    let http: HttpError = err.into();
    assert!(matches!(http, HttpError::NotFound(_)));
    assert!(http.to_string().contains("carol"));
}
