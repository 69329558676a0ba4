//! API error types with HTTP response mapping.

use application::AppError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API-level error type that maps to HTTP responses.
///
/// Every failure becomes a `{code, message}` envelope: 401 for credential
/// failures, 403 for missing permissions, 404 for not-found codes, 400 for
/// other business-rule failures, 500 for internal errors.
#[derive(Debug)]
pub enum ApiError {
    /// Use-case failure carrying its own stable code.
    App(AppError),
    /// Missing or invalid bearer token.
    Unauthorized,
    /// Authenticated but lacking the required permission.
    Forbidden(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::App(err) => {
                let status = if err.is_unauthorized() {
                    StatusCode::UNAUTHORIZED
                } else if err.is_not_found() {
                    StatusCode::NOT_FOUND
                } else if err.code() == "Internal" {
                    tracing::error!(error = %err, "internal server error");
                    StatusCode::INTERNAL_SERVER_ERROR
                } else {
                    StatusCode::BAD_REQUEST
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    // No internals across the boundary.
                    "An internal error occurred.".to_string()
                } else {
                    err.to_string()
                };
                (status, err.code(), message)
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Auth.Unauthorized",
                "Missing or invalid access token.".to_string(),
            ),
            ApiError::Forbidden(permission) => (
                StatusCode::FORBIDDEN,
                "Auth.Forbidden",
                format!("Missing required permission: {permission}."),
            ),
        };

        let body = serde_json::json!({ "code": code, "message": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let unauthorized = ApiError::App(AppError::InvalidCredentials).into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let not_found = ApiError::App(AppError::OrderNotFound).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad_request = ApiError::App(AppError::EmailAlreadyExists).into_response();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let forbidden = ApiError::Forbidden("Roles:Create").into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    }
}
