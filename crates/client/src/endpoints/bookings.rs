//! Booking endpoints consumed through the authenticated wrapper.
//!
//! The bookings-count endpoint has served two shapes over its history: a
//! bare array of bookings, and a `{count}` object. Both are accepted and
//! normalized here so callers only ever see a single number.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientResult;
use crate::http::ApiClient;

/// The two historical shapes of the bookings-count response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BookingsCountResponse {
    Count { count: u64 },
    List(Vec<Value>),
}

impl BookingsCountResponse {
    fn normalize(self) -> u64 {
        match self {
            Self::Count { count } => count,
            Self::List(items) => items.len() as u64,
        }
    }
}

impl ApiClient {
    /// Total bookings count, normalized across historical response shapes.
    pub async fn bookings_count(&self) -> ClientResult<u64> {
        let value = self.get("/booking/count").await?;
        let parsed: BookingsCountResponse = serde_json::from_value(value)?;
        Ok(parsed.normalize())
    }

    /// List bookings as raw JSON rows; screens shape them further.
    pub async fn bookings(&self) -> ClientResult<Vec<Value>> {
        let value = self.get("/booking").await?;
        let rows: Vec<Value> = serde_json::from_value(value)?;
        Ok(rows)
    }
}
