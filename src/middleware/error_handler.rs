use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, Result, dev::ServiceResponse};
use serde_json::json;

use super::not_found::not_found;
use crate::utils::helpers::service_name;

pub(crate) fn is_json<B>(res: &ServiceResponse<B>) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Rewrites framework-generated errors (405, payload errors, ...) into the
/// JSON envelope. Handler errors are already JSON and are left alone.
pub fn handle_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if is_json(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status_code = res.status();
    let error_message = res
        .response()
        .error()
        .map(|e| e.to_string())
        .unwrap_or_else(|| status_code.canonical_reason().unwrap_or("Unknown error").to_string());

    let error_type = match status_code {
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED_ERROR",
        s if s.is_client_error() => "BAD_REQUEST_ERROR",
        _ => "INTERNAL_SERVER_ERROR",
    };

    let new_response = HttpResponse::build(status_code).json(json!({
        "success": false,
        "message": error_message,
        "httpStatusCode": status_code.as_u16(),
        "error": error_type,
        "service": service_name(),
    }));

    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, new_response.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}

/// Error middleware shared by the server and the HTTP tests.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .default_handler(handle_error)
}
