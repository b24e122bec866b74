//! Timestamps for record metadata.

use std::fmt;

use chrono::{DateTime, Utc};
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A point in time, stored as microseconds since the Unix epoch.
///
/// Timestamps cross the JSON boundary as RFC 3339 date-times (chrono's
/// default serde form), never as display-formatted strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Archive, Serialize, Deserialize,
)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from microseconds since the Unix epoch.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Microseconds since the Unix epoch.
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// The current time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_micros())
    }

    /// Convert to a chrono date-time. Returns `None` for values outside
    /// chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_micros())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}us", self.0),
        }
    }
}

impl SerdeSerialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let dt = self
            .to_datetime()
            .ok_or_else(|| serde::ser::Error::custom("timestamp out of range"))?;
        dt.serialize(serializer)
    }
}

impl<'de> SerdeDeserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let dt = DateTime::<Utc>::deserialize(deserializer)?;
        Ok(Self::from(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_recent() {
        let ts = Timestamp::now();
        // 2020-01-01 in microseconds; a sanity lower bound.
        assert!(ts.micros() > 1_577_836_800_000_000);
    }

    #[test]
    fn test_ordering() {
        let a = Timestamp::from_micros(100);
        let b = Timestamp::from_micros(200);
        assert!(a < b);
    }

    #[test]
    fn test_json_roundtrip() {
        let ts = Timestamp::from_micros(1_704_067_200_000_000); // 2024-01-01T00:00:00Z
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-01"));
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_rkyv_roundtrip() {
        let ts = Timestamp::from_micros(42);
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&ts).unwrap();
        let back: Timestamp = rkyv::from_bytes::<Timestamp, rkyv::rancor::Error>(&bytes).unwrap();
        assert_eq!(back, ts);
    }
}
