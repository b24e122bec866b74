//! JSON response bodies specific to the gateway.
//!
//! Record, input, and patch bodies come straight from the protocol crate,
//! which carries serde implementations preserving the absent/null/value
//! distinction on patches, amounts as JSON numbers, and timestamps as
//! RFC 3339 date-times.

use serde::Serialize;

use dealbase_proto::Timestamp;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the record service answered, "degraded" otherwise.
    pub status: String,
    /// Gateway version.
    pub version: String,
    /// Whether the record service answered the health probe.
    pub server_connected: bool,
    /// The record service's clock, when it answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_serialization() {
        let healthy = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            server_connected: true,
            server_time: Some(Timestamp::from_micros(1_704_067_200_000_000)),
        };
        let json = serde_json::to_string(&healthy).unwrap();
        assert!(json.contains(r#""status":"healthy""#));
        assert!(json.contains("2024-01-01"));

        let degraded = HealthResponse {
            status: "degraded".to_string(),
            version: "0.1.0".to_string(),
            server_connected: false,
            server_time: None,
        };
        let json = serde_json::to_string(&degraded).unwrap();
        assert!(!json.contains("server_time"));
    }
}
