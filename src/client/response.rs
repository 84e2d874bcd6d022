//! Response interpretation

use crate::{PaymentClientError, Result};
use http::StatusCode;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Read the body as text, aborting if `cancel` fires first
pub(crate) async fn read_body(response: Response, cancel: &CancellationToken) -> Result<String> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PaymentClientError::Cancelled),
        text = response.text() => text.map_err(PaymentClientError::Transport),
    }
}

/// Convert a success body into `T`
///
/// An empty body or JSON `null` yields `T::default()`. Other valid JSON is
/// deserialized directly; anything else goes through [`convert_plain_text`].
pub(crate) fn parse_body<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => Ok(T::default()),
        Ok(value) => {
            let primitive = matches!(value, Value::Number(_) | Value::Bool(_));
            match serde_json::from_value(value) {
                Ok(parsed) => Ok(parsed),
                // A bare `123` or `true` can still be read as text.
                Err(_) if primitive => convert_plain_text(text),
                Err(e) => Err(PaymentClientError::deserialization(format!(
                    "response JSON does not match {}: {}",
                    std::any::type_name::<T>(),
                    e
                ))),
            }
        }
        Err(_) => convert_plain_text(text),
    }
}

/// Convert a non-JSON body into a string, boolean, integer or float target
///
/// Candidates are tried in that order and the first one `T` accepts wins.
pub(crate) fn convert_plain_text<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let trimmed = text.trim();
    let mut candidates = vec![Value::String(text.to_string())];

    if trimmed.eq_ignore_ascii_case("true") {
        candidates.push(Value::Bool(true));
    } else if trimmed.eq_ignore_ascii_case("false") {
        candidates.push(Value::Bool(false));
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        candidates.push(Value::from(n));
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(n) {
            candidates.push(Value::Number(n));
        }
    }

    candidates
        .into_iter()
        .find_map(|candidate| serde_json::from_value::<T>(candidate).ok())
        .ok_or_else(|| {
            PaymentClientError::deserialization(format!(
                "plain-text response cannot be converted to {}",
                std::any::type_name::<T>()
            ))
        })
}

/// PascalCase name of a status code, e.g. `BadRequest`
///
/// Codes without a well-known name are rendered as their number.
pub fn status_name(status: StatusCode) -> String {
    match status.as_u16() {
        413 => return "RequestEntityTooLarge".to_string(),
        414 => return "RequestUriTooLong".to_string(),
        416 => return "RequestedRangeNotSatisfiable".to_string(),
        505 => return "HttpVersionNotSupported".to_string(),
        418 => return "418".to_string(),
        _ => {}
    }

    match status.canonical_reason() {
        Some(reason) => reason
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect(),
        None => status.as_u16().to_string(),
    }
}

/// Message used by the fire-and-forget verbs on a non-success status
pub(crate) fn api_call_message(status: StatusCode) -> String {
    format!(
        "Error occurred calling API with error code: {}. Message: {}",
        status_name(status),
        status.canonical_reason().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Outcome {
        result: String,
    }

    #[test]
    fn test_parse_json_body() {
        let outcome: Outcome = parse_body(r#"{"result":"success"}"#).unwrap();
        assert_eq!(outcome.result, "success");
    }

    #[test]
    fn test_parse_empty_body_returns_default() {
        let outcome: Outcome = parse_body("").unwrap();
        assert_eq!(outcome, Outcome::default());

        let count: i32 = parse_body("  \n").unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_parse_null_body_returns_default() {
        let outcome: Outcome = parse_body("null").unwrap();
        assert_eq!(outcome, Outcome::default());

        let reference: Option<String> = parse_body(" null ").unwrap();
        assert_eq!(reference, None);
    }

    #[test]
    fn test_parse_mismatched_json() {
        let err = parse_body::<Outcome>(r#"{"other":1}"#).unwrap_err();
        assert!(matches!(err, PaymentClientError::Deserialization { .. }));
    }

    #[test]
    fn test_plain_text_conversions() {
        let text: String = parse_body("https://gateway.example/pay/abc").unwrap();
        assert_eq!(text, "https://gateway.example/pay/abc");

        let flag: bool = parse_body("True").unwrap();
        assert!(flag);

        let amount: f64 = parse_body(" 12.50 ").unwrap();
        assert_eq!(amount, 12.5);

        let reference: String = parse_body("12345").unwrap();
        assert_eq!(reference, "12345");
    }

    #[test]
    fn test_plain_text_unconvertible() {
        let err = parse_body::<i64>("not a number").unwrap_err();
        assert!(matches!(err, PaymentClientError::Deserialization { .. }));

        let err = parse_body::<Outcome>("<html></html>").unwrap_err();
        assert!(err.to_string().contains("plain-text"));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(status_name(StatusCode::BAD_REQUEST), "BadRequest");
        assert_eq!(status_name(StatusCode::OK), "OK");
        assert_eq!(status_name(StatusCode::INTERNAL_SERVER_ERROR), "InternalServerError");
        assert_eq!(
            status_name(StatusCode::NON_AUTHORITATIVE_INFORMATION),
            "NonAuthoritativeInformation"
        );
        assert_eq!(
            status_name(StatusCode::HTTP_VERSION_NOT_SUPPORTED),
            "HttpVersionNotSupported"
        );
        assert_eq!(status_name(StatusCode::from_u16(599).unwrap()), "599");
    }

    #[test]
    fn test_api_call_message_format() {
        assert_eq!(
            api_call_message(StatusCode::BAD_REQUEST),
            "Error occurred calling API with error code: BadRequest. Message: Bad Request"
        );
        assert_eq!(
            api_call_message(StatusCode::NOT_FOUND),
            "Error occurred calling API with error code: NotFound. Message: Not Found"
        );
    }
}
