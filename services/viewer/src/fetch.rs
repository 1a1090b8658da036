//! Wind payload fetching with bounded retry.
//!
//! The endpoint serves a two-element JSON array of [U, V] grid components.
//! Transport and HTTP-status failures are retried on a fixed delay up to the
//! configured attempt bound; a body that violates the payload shape is a
//! permanent failure and is never retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use wind_common::{GridComponent, WindError, WindPayload, WindResult};

use crate::notify::AlertSink;

/// Endpoint and retry policy for the wind-data fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
    /// Per-request timeout; a hung request counts as a transport failure
    pub request_timeout: Duration,
}

/// Statistics for a completed fetch.
#[derive(Debug, Clone)]
pub struct FetchStats {
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Fetches and shape-validates the wind payload.
pub struct WindFetcher {
    client: Client,
    config: FetchConfig,
}

impl WindFetcher {
    pub fn new(config: FetchConfig) -> WindResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WindError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Fetch the [U, V] payload.
    ///
    /// Retryable failures are retried up to `max_attempts` total; once
    /// exhausted, the terminal failure is alerted exactly once and returned.
    /// A malformed body is alerted and returned immediately with no further
    /// attempts.
    pub async fn fetch(&self, alerts: &dyn AlertSink) -> WindResult<(WindPayload, FetchStats)> {
        let started_at = Utc::now();
        let mut attempt = 1u32;

        loop {
            debug!(
                attempt,
                max_attempts = self.config.max_attempts,
                url = %self.config.endpoint,
                "Requesting wind data"
            );

            match self.try_fetch().await {
                Ok(payload) => {
                    let stats = FetchStats {
                        attempts: attempt,
                        started_at,
                        completed_at: Utc::now(),
                    };
                    info!(attempts = attempt, "Wind data fetched");
                    return Ok((payload, stats));
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_attempts => {
                    warn!(
                        error = %err,
                        attempt,
                        max_attempts = self.config.max_attempts,
                        delay_ms = self.config.retry_delay.as_millis() as u64,
                        "Wind data fetch failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_retryable() => {
                    error!(
                        error = %err,
                        attempts = attempt,
                        "Wind data fetch failed, retries exhausted"
                    );
                    alerts.alert(&format!(
                        "Unable to load wind data after {} attempts: {}",
                        attempt, err
                    ));
                    return Err(err);
                }
                Err(err) => {
                    error!(error = %err, "Wind data endpoint returned a malformed payload");
                    alerts.alert(&format!("Wind data format error: {}", err));
                    return Err(err);
                }
            }
        }
    }

    /// One request/parse/validate cycle.
    async fn try_fetch(&self) -> WindResult<WindPayload> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| WindError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WindError::HttpStatus(status.as_u16()));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                WindError::MalformedPayload(format!("body is not valid JSON: {}", e))
            } else {
                WindError::Transport(e.to_string())
            }
        })?;

        parse_payload(body)
    }
}

/// Validate the wire shape and deserialize into a typed payload.
///
/// Shape contract: a JSON array of exactly two objects, each carrying a
/// truthy `header` and an array-valued `data`.
pub fn parse_payload(body: Value) -> WindResult<WindPayload> {
    let elements = body
        .as_array()
        .ok_or_else(|| WindError::MalformedPayload("body is not an array".to_string()))?;

    if elements.len() != 2 {
        return Err(WindError::MalformedPayload(format!(
            "expected 2 grid components, got {}",
            elements.len()
        )));
    }

    for (index, element) in elements.iter().enumerate() {
        if !element.get("header").map_or(false, is_truthy) {
            return Err(WindError::MalformedPayload(format!(
                "component {} is missing its header",
                index
            )));
        }
        match element.get("data") {
            Some(Value::Array(_)) => {}
            _ => {
                return Err(WindError::MalformedPayload(format!(
                    "component {} data is not an array",
                    index
                )));
            }
        }
    }

    let components: Vec<GridComponent> = serde_json::from_value(body)?;

    WindPayload::from_components(components)
        .ok_or_else(|| WindError::MalformedPayload("expected exactly 2 grid components".to_string()))
}

/// Truthiness as the endpoint contract defines it: absent, null, false,
/// zero, and the empty string all count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!([
            {
                "header": { "nx": 2, "ny": 2, "parameterNumber": 2, "refTime": "2024-01-15T06:00:00.000Z" },
                "data": [1.0, 0.0, -1.0, 2.0]
            },
            {
                "header": { "nx": 2, "ny": 2, "parameterNumber": 3, "refTime": "2024-01-15T06:00:00.000Z" },
                "data": [0.0, 1.0, 1.0, -2.0]
            }
        ])
    }

    #[test]
    fn test_parse_valid_payload() {
        let payload = parse_payload(valid_body()).unwrap();
        assert_eq!(payload.u.header.nx, 2);
        assert_eq!(payload.u.data, vec![1.0, 0.0, -1.0, 2.0]);
        assert_eq!(payload.v.data, vec![0.0, 1.0, 1.0, -2.0]);
        assert_eq!(
            payload.u.header.extra["refTime"],
            "2024-01-15T06:00:00.000Z"
        );
    }

    #[test]
    fn test_parse_preserves_body_unchanged() {
        let body = valid_body();
        let payload = parse_payload(body.clone()).unwrap();
        let back = json!([
            serde_json::to_value(&payload.u).unwrap(),
            serde_json::to_value(&payload.v).unwrap(),
        ]);
        assert_eq!(back, body);
    }

    #[test]
    fn test_body_not_an_array() {
        let err = parse_payload(json!({"u": [], "v": []})).unwrap_err();
        assert!(matches!(err, WindError::MalformedPayload(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_wrong_component_count() {
        let mut three = valid_body();
        let extra = three.as_array().unwrap()[0].clone();
        three.as_array_mut().unwrap().push(extra);
        assert!(matches!(
            parse_payload(three),
            Err(WindError::MalformedPayload(_))
        ));

        let one = json!([{ "header": { "nx": 1, "ny": 1 }, "data": [0.5] }]);
        assert!(matches!(
            parse_payload(one),
            Err(WindError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_missing_header_rejected() {
        let body = json!([
            { "data": [1.0] },
            { "header": { "nx": 1, "ny": 1 }, "data": [2.0] }
        ]);
        assert!(matches!(
            parse_payload(body),
            Err(WindError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_falsy_header_rejected() {
        for falsy in [json!(null), json!(false), json!(0), json!("")] {
            let body = json!([
                { "header": falsy, "data": [1.0] },
                { "header": { "nx": 1, "ny": 1 }, "data": [2.0] }
            ]);
            assert!(matches!(
                parse_payload(body),
                Err(WindError::MalformedPayload(_))
            ));
        }
    }

    #[test]
    fn test_data_not_an_array_rejected() {
        let body = json!([
            { "header": { "nx": 1, "ny": 1 }, "data": [1.0] },
            { "header": { "nx": 1, "ny": 1 }, "data": "not-samples" }
        ]);
        assert!(matches!(
            parse_payload(body),
            Err(WindError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_header_without_dimensions_rejected() {
        // Shape check passes (header is truthy, data is an array) but the
        // typed deserialize still requires nx/ny.
        let body = json!([
            { "header": { "parameterNumber": 2 }, "data": [1.0] },
            { "header": { "nx": 1, "ny": 1 }, "data": [2.0] }
        ]);
        assert!(matches!(
            parse_payload(body),
            Err(WindError::MalformedPayload(_))
        ));
    }
}
