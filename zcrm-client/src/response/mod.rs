//! Response envelope classification
//!
//! Two-phase status handling: the HTTP status code is checked against the
//! faulty set first, then the extracted payload is probed for the embedded
//! status sentinel — the vendor signals business errors on HTTP 200. The
//! result is computed once and returned as an immutable [`Outcome`].

use serde_json::Value;

use crate::constants;
use crate::error::ApiFault;

/// Envelope-level status metadata the vendor attaches alongside payload
/// records on success.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMetadata {
    pub code: String,
    pub status: String,
    pub message: String,
    pub details: Value,
}

/// Result of classifying one raw response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The API legitimately returned no body; not an error.
    Empty,
    /// The working payload, plus envelope metadata when the payload carried
    /// the success sentinel.
    Success {
        payload: Value,
        metadata: Option<ResponseMetadata>,
    },
}

impl Outcome {
    /// The payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Outcome::Empty => None,
            Outcome::Success { payload, .. } => Some(payload),
        }
    }
}

/// Classifies raw response bodies against a configured set of faulty HTTP
/// status codes. Stateless per call.
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    faulty_status_codes: Vec<u16>,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self {
            faulty_status_codes: constants::FAULTY_RESPONSE_CODES.to_vec(),
        }
    }
}

impl ResponseClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the faulty status set.
    pub fn with_faulty_codes(faulty_status_codes: Vec<u16>) -> Self {
        Self {
            faulty_status_codes,
        }
    }

    /// Classify a response body and HTTP status into an [`Outcome`].
    ///
    /// A null body on a non-faulty status is a legitimately empty outcome.
    /// Payload extraction probes the top-level keys `data`, `users`,
    /// `modules`, `custom_views` in that priority order; `data`/`users`
    /// unwrap the first array element, `modules`/`custom_views` keep the
    /// whole array, and a body with none of these keys is the payload
    /// itself.
    pub fn classify(&self, body: Option<Value>, status_code: u16) -> Result<Outcome, ApiFault> {
        if self.faulty_status_codes.contains(&status_code) {
            return Err(self.fault_for(body, status_code));
        }

        let Some(body) = body else {
            return Ok(Outcome::Empty);
        };
        let payload = extract_payload(body);
        // An empty `data`/`users` array unwraps to null; callers get the
        // same empty outcome as for an absent body.
        if payload.is_null() {
            return Ok(Outcome::Empty);
        }

        let mut metadata = None;
        if let Some(status) = payload.get("status").and_then(Value::as_str) {
            if status == constants::STATUS_ERROR {
                return Err(ApiFault::from_payload(&payload, status_code));
            }
            if status == constants::STATUS_SUCCESS {
                metadata = Some(ResponseMetadata {
                    code: string_field(&payload, "code"),
                    status: status.to_string(),
                    message: string_field(&payload, "message"),
                    details: payload.get("details").cloned().unwrap_or(Value::Null),
                });
            }
        }

        Ok(Outcome::Success { payload, metadata })
    }

    fn fault_for(&self, body: Option<Value>, status_code: u16) -> ApiFault {
        if status_code == constants::RESPONSECODE_NO_CONTENT {
            // No-content never carries a body, so the fault is fixed.
            return ApiFault {
                status_code,
                code: constants::NO_CONTENT_ERROR_CODE.to_string(),
                message: constants::NO_CONTENT_ERROR_MESSAGE.to_string(),
                details: Value::Null,
            };
        }
        match body {
            Some(body) => ApiFault::from_payload(&body, status_code),
            // A faulty status without a body means the vendor response
            // itself is broken.
            None => ApiFault {
                status_code,
                code: constants::MALFORMED_RESPONSE_CODE.to_string(),
                message: "faulty HTTP status with no response body".to_string(),
                details: Value::Null,
            },
        }
    }
}

fn extract_payload(body: Value) -> Value {
    let Value::Object(mut map) = body else {
        return body;
    };
    if let Some(data) = map.remove("data") {
        return first_element(data);
    }
    if let Some(users) = map.remove("users") {
        return first_element(users);
    }
    if let Some(modules) = map.remove("modules") {
        return modules;
    }
    if let Some(views) = map.remove("custom_views") {
        return views;
    }
    Value::Object(map)
}

fn first_element(value: Value) -> Value {
    match value {
        Value::Array(mut items) if !items.is_empty() => items.remove(0),
        _ => Value::Null,
    }
}

fn string_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_wins_over_modules_and_unwraps_first_element() {
        let body = json!({"data": [{"id": 1}], "modules": [{"id": 2}]});
        let outcome = ResponseClassifier::new().classify(Some(body), 200).unwrap();
        assert_eq!(outcome.payload(), Some(&json!({"id": 1})));
    }

    #[test]
    fn users_unwrap_but_modules_stay_whole() {
        let users = json!({"users": [{"id": "7"}, {"id": "8"}]});
        let outcome = ResponseClassifier::new().classify(Some(users), 200).unwrap();
        assert_eq!(outcome.payload(), Some(&json!({"id": "7"})));

        let modules = json!({"modules": [{"api_name": "Leads"}, {"api_name": "Deals"}]});
        let outcome = ResponseClassifier::new()
            .classify(Some(modules), 200)
            .unwrap();
        assert_eq!(
            outcome.payload(),
            Some(&json!([{"api_name": "Leads"}, {"api_name": "Deals"}]))
        );
    }

    #[test]
    fn empty_data_array_is_an_empty_outcome_not_a_null_payload() {
        let classifier = ResponseClassifier::new();
        for body in [json!({"data": []}), json!({"users": []})] {
            let outcome = classifier.classify(Some(body), 200).unwrap();
            assert_eq!(outcome, Outcome::Empty);
        }
    }

    #[test]
    fn body_without_known_keys_is_the_payload_itself() {
        let body = json!({"org": {"company_name": "Zylker"}});
        let outcome = ResponseClassifier::new()
            .classify(Some(body.clone()), 200)
            .unwrap();
        assert_eq!(outcome.payload(), Some(&body));
    }

    #[test]
    fn no_content_always_raises_the_fixed_invalid_id_fault() {
        let classifier = ResponseClassifier::new();

        for body in [None, Some(json!({"message": "ignored", "code": "IGNORED"}))] {
            let fault = classifier.classify(body, 204).unwrap_err();
            assert_eq!(fault.status_code, 204);
            assert_eq!(fault.code, "No Content");
            assert_eq!(fault.message, "INVALID_DATA-The given id seems to be invalid");
        }
    }

    #[test]
    fn faulty_status_builds_fault_from_body() {
        let body = json!({
            "status": "error",
            "code": "AUTHENTICATION_FAILURE",
            "message": "Authentication failed",
            "details": {}
        });
        let fault = ResponseClassifier::new()
            .classify(Some(body), 401)
            .unwrap_err();
        assert_eq!(fault.status_code, 401);
        assert_eq!(fault.code, "AUTHENTICATION_FAILURE");
        assert_eq!(fault.message, "Authentication failed");
        assert_eq!(fault.details, json!({}));
    }

    #[test]
    fn faulty_status_without_body_is_malformed() {
        let fault = ResponseClassifier::new().classify(None, 500).unwrap_err();
        assert_eq!(fault.code, "MALFORMED_RESPONSE");
    }

    #[test]
    fn business_error_rides_http_200() {
        let body = json!({
            "status": "error",
            "code": "INVALID_TOKEN",
            "message": "bad",
            "details": {}
        });
        let fault = ResponseClassifier::new()
            .classify(Some(body), 200)
            .unwrap_err();
        assert_eq!(fault.status_code, 200);
        assert_eq!(fault.code, "INVALID_TOKEN");
        assert_eq!(fault.message, "bad");
    }

    #[test]
    fn success_sentinel_populates_envelope_metadata() {
        let body = json!({"data": [{
            "status": "success",
            "code": "SUCCESS",
            "message": "record updated",
            "details": {"id": "481"}
        }]});
        let outcome = ResponseClassifier::new().classify(Some(body), 200).unwrap();

        let Outcome::Success { metadata, .. } = outcome else {
            panic!("expected a success outcome");
        };
        let metadata = metadata.unwrap();
        assert_eq!(metadata.code, "SUCCESS");
        assert_eq!(metadata.status, "success");
        assert_eq!(metadata.message, "record updated");
        assert_eq!(metadata.details, json!({"id": "481"}));
    }

    #[test]
    fn null_body_on_ok_status_is_empty_not_an_error() {
        let outcome = ResponseClassifier::new().classify(None, 200).unwrap();
        assert_eq!(outcome, Outcome::Empty);
        assert_eq!(outcome.payload(), None);
    }

    #[test]
    fn payload_without_status_field_has_no_metadata() {
        let body = json!({"modules": [{"api_name": "Leads"}]});
        let outcome = ResponseClassifier::new().classify(Some(body), 200).unwrap();
        let Outcome::Success { metadata, .. } = outcome else {
            panic!("expected a success outcome");
        };
        assert!(metadata.is_none());
    }

    #[test]
    fn faulty_code_set_is_configurable() {
        let classifier = ResponseClassifier::with_faulty_codes(vec![418]);
        let fault = classifier
            .classify(Some(json!({"code": "TEAPOT", "message": "short and stout"})), 418)
            .unwrap_err();
        assert_eq!(fault.code, "TEAPOT");

        // 500 is no longer faulty under the override.
        let outcome = classifier.classify(None, 500).unwrap();
        assert_eq!(outcome, Outcome::Empty);
    }
}
