use crate::config::AppConfig;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn ok_json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

/// Dispatch one request. `path` may carry a query string.
pub fn route_request(method: &str, path: &str, body: &str, config: &AppConfig) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/layout") => payload_response(api::layout_payload(path, config)),
        ("POST", "/api/lineup") => payload_response(api::lineup_payload(body, config)),
        ("POST", "/api/lineup/batch") => payload_response(api::batch_payload(body, config)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn payload_response(result: Result<String, api::PayloadError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::ok_json(payload),
        Err(api::PayloadError::Parse(err)) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        Err(api::PayloadError::Validation(validation)) => {
            validation_error_response(400, "Bad Request", validation)
        }
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
