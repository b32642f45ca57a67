use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full detail stays in the server log; clients get a fixed message.
        if self.is_server_side() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = ?self, "Request rejected");
        }

        let code = self.code();
        match self {
            AppError::TokenMissing => {
                error_resp(StatusCode::UNAUTHORIZED, code, "Token missing")
            }
            AppError::TokenInvalid => {
                error_resp(StatusCode::UNAUTHORIZED, code, "Invalid or expired token")
            }
            AppError::InvalidCredentials => {
                error_resp(StatusCode::UNAUTHORIZED, code, "Invalid email or password")
            }
            AppError::Forbidden => error_resp(StatusCode::FORBIDDEN, code, "Access denied"),
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, code, "Resource not found"),
            AppError::Conflict(msg) => error_resp(StatusCode::CONFLICT, code, &msg),
            AppError::InvalidInput(msg) => error_resp(StatusCode::BAD_REQUEST, code, &msg),
            AppError::Database(_) | AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, code_for_client(code), "Server error")
            }
        }
    }
}

/// Database and internal failures look the same from outside.
fn code_for_client(code: ErrorCode) -> ErrorCode {
    match code {
        ErrorCode::DatabaseError => ErrorCode::InternalError,
        other => other,
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: &str) -> Response {
    let body = serde_json::json!({
        "success": false,
        "code": code.as_str(),
        "message": message,
    });
    (status, Json(body)).into_response()
}
