//! Structural verification of remote scoring responses.
//!
//! A response body is checked against a JSON Schema before it is trusted.
//! Every violation is collected so the log shows the whole failure set in
//! one line, then the body is deserialized into `ModelResponse`.

use serde_json::{json, Value};
use tracing::warn;

use hdp_contracts::{
    error::{HdpError, HdpResult},
    model::ModelResponse,
};

/// The shape a scoring service must return.
fn response_schema() -> Value {
    json!({
        "type": "object",
        "required": ["risk_prediction", "risk_probability", "factors"],
        "properties": {
            "risk_prediction": { "type": "integer", "enum": [0, 1] },
            "risk_probability": { "type": "number", "minimum": 0, "maximum": 1 },
            "factors": { "type": "array", "items": { "type": "string" } },
            "message": { "type": ["string", "null"] },
            "input": { "type": ["object", "null"] }
        }
    })
}

/// Compiled response schema. Build once per client.
pub struct ResponseVerifier {
    validator: jsonschema::Validator,
}

impl ResponseVerifier {
    pub fn new() -> HdpResult<Self> {
        let validator =
            jsonschema::validator_for(&response_schema()).map_err(|e| HdpError::ConfigError {
                reason: format!("invalid response schema: {e}"),
            })?;
        Ok(Self { validator })
    }

    /// Check `body` and decode it.
    ///
    /// Returns `HdpError::MalformedResponse` listing every schema violation,
    /// or the decode error when the body passes the schema but still does
    /// not fit `ModelResponse`.
    pub fn verify(&self, body: &Value) -> HdpResult<ModelResponse> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(body)
            .map(|error| format!("{} at '{}'", error, error.instance_path))
            .collect();

        if !violations.is_empty() {
            let reason = violations.join("; ");
            warn!(%reason, "remote response failed schema validation");
            return Err(HdpError::MalformedResponse { reason });
        }

        serde_json::from_value(body.clone()).map_err(|e| HdpError::MalformedResponse {
            reason: format!("response does not decode: {e}"),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use hdp_contracts::error::HdpError;

    use super::ResponseVerifier;

    fn verifier() -> ResponseVerifier {
        ResponseVerifier::new().expect("schema compiles")
    }

    #[test]
    fn test_full_response_is_accepted() {
        let body = json!({
            "input": { "bp": 150, "swelling": 0, "headache": 1, "age": 30, "weight": 70.0, "heart_rate": 95 },
            "risk_prediction": 1,
            "risk_probability": 0.82,
            "message": "High risk of HDP",
            "factors": ["High blood pressure", "Headache"]
        });

        let response = verifier().verify(&body).unwrap();

        assert_eq!(response.risk_prediction, 1);
        assert_eq!(response.risk_probability, 0.82);
        assert_eq!(response.factors.len(), 2);
        assert_eq!(response.input.map(|input| input.bp), Some(150));
    }

    #[test]
    fn test_minimal_response_is_accepted() {
        let body = json!({ "risk_prediction": 0, "risk_probability": 0.1, "factors": [] });

        let response = verifier().verify(&body).unwrap();
        assert!(response.input.is_none());
        assert!(response.message.is_none());
    }

    #[test]
    fn test_missing_probability_is_rejected() {
        let body = json!({ "risk_prediction": 1, "factors": [] });

        match verifier().verify(&body) {
            Err(HdpError::MalformedResponse { reason }) => {
                assert!(reason.contains("risk_probability"), "unexpected reason: {reason}");
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        for body in [
            json!({ "risk_prediction": 2, "risk_probability": 0.5, "factors": [] }),
            json!({ "risk_prediction": 1, "risk_probability": 1.5, "factors": [] }),
            json!({ "risk_prediction": 1, "risk_probability": -0.1, "factors": [] }),
            json!({ "risk_prediction": 1, "risk_probability": 0.5, "factors": [3] }),
            json!({ "risk_prediction": 1, "risk_probability": "high", "factors": [] }),
        ] {
            assert!(
                matches!(verifier().verify(&body), Err(HdpError::MalformedResponse { .. })),
                "expected rejection of {body}"
            );
        }
    }

    /// Two violations are reported together.
    #[test]
    fn test_all_violations_are_reported() {
        let body = json!({ "risk_prediction": 7, "risk_probability": 3.0, "factors": [] });

        match verifier().verify(&body) {
            Err(HdpError::MalformedResponse { reason }) => {
                assert_eq!(reason.split("; ").count(), 2, "unexpected reason: {reason}");
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(verifier().verify(&json!(["not", "an", "object"])).is_err());
    }
}
