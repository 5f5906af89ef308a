//! Shared HTTP plumbing for the provider adapters: client construction,
//! status classification and response finishing.

use delib_application::AdapterError;
use delib_domain::{ModelCallRequest, ModelResponse, excerpt, parse_structured_output};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Longest provider error body copied into an error message
const ERROR_BODY_CHARS: usize = 300;

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(format!("delib/{}", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Map a non-success HTTP status to a response status.
///
/// 408, 429 and 5xx are worth retrying; every other 4xx means the request
/// itself (key, model name, parameters) is wrong.
pub fn classify_status(provider: &str, status: StatusCode, body: &str) -> ModelResponse {
    let message = format!(
        "{provider} API error (status {status}): {}",
        excerpt(body.trim(), ERROR_BODY_CHARS)
    );
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        ModelResponse::provider_unavailable(message)
    } else {
        ModelResponse::config_error(message)
    }
}

/// Send a JSON request and decode the JSON reply.
///
/// `Ok(Err(response))` carries a classified failure; `Err` is reserved for
/// requests that could not even be built.
pub async fn send_json(
    provider: &str,
    request: RequestBuilder,
) -> Result<Result<Value, ModelResponse>, AdapterError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) if e.is_builder() => return Err(AdapterError::RequestFailed(e.to_string())),
        Err(e) => {
            return Ok(Err(ModelResponse::provider_unavailable(format!(
                "{provider} request failed: {e}"
            ))));
        }
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return Ok(Err(ModelResponse::provider_unavailable(format!(
                "{provider} response could not be read: {e}"
            ))));
        }
    };

    if !status.is_success() {
        return Ok(Err(classify_status(provider, status, &body)));
    }

    Ok(serde_json::from_str::<Value>(&body).map_err(|e| {
        ModelResponse::internal_error(format!("{provider} returned invalid JSON: {e}"))
    }))
}

/// Turn extracted text into the final response, parsing JSON when the
/// request asked for structured output.
pub fn finish_text(provider: &str, request: &ModelCallRequest, text: Option<String>) -> ModelResponse {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return ModelResponse::internal_error(format!("{provider} returned an empty response"));
    };

    if request.active_structured_output().is_none() {
        return ModelResponse::ok(text);
    }
    match parse_structured_output(&text) {
        Some(parsed) => ModelResponse::ok_structured(text, parsed),
        None => ModelResponse::internal_error(format!(
            "{provider} returned text that is not valid JSON: {}",
            excerpt(&text, ERROR_BODY_CHARS)
        )),
    }
}

/// Base URL without trailing slashes
pub fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
