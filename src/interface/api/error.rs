//! Mapping of domain errors onto HTTP responses

use super::dto::ApiResponse;
use crate::domain::shared::error::DomainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

pub fn status_code(error: &DomainError) -> StatusCode {
    match error {
        DomainError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        DomainError::CallStart(_) => StatusCode::BAD_GATEWAY,
        DomainError::Configuration(_)
        | DomainError::DuplicateAction(_)
        | DomainError::UnknownAction(_)
        | DomainError::ValidationError(_)
        | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_code(&DomainError::MalformedRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_code(&DomainError::Configuration("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_code(&DomainError::CallStart("x".into())),
            StatusCode::BAD_GATEWAY
        );
    }
}
