//! Self-verifying watermark payload.

use serde::{Deserialize, Serialize};
use voxmill_spec::payload_checksum;

use crate::error::AudioResult;

/// The record embedded into audio.
///
/// Serialized as compact JSON in field order. `checksum` covers `data` and
/// `auxiliary`, so a corrupted mark is rejected instead of read back wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkPayload {
    /// Unique token for this embedding.
    pub id: String,
    /// Embed time, Unix milliseconds.
    pub timestamp_millis: i64,
    /// Caller payload.
    pub data: String,
    /// Extra caller-supplied context.
    pub auxiliary: String,
    /// First 16 hex chars of BLAKE3(`data` + `auxiliary`).
    pub checksum: String,
}

impl WatermarkPayload {
    /// Creates a payload with a fresh id and the current time.
    pub fn new(data: impl Into<String>, auxiliary: impl Into<String>) -> Self {
        Self::with_identity(
            uuid::Uuid::new_v4().simple().to_string(),
            chrono::Utc::now().timestamp_millis(),
            data,
            auxiliary,
        )
    }

    /// Creates a payload with a fixed id and timestamp.
    pub fn with_identity(
        id: impl Into<String>,
        timestamp_millis: i64,
        data: impl Into<String>,
        auxiliary: impl Into<String>,
    ) -> Self {
        let data = data.into();
        let auxiliary = auxiliary.into();
        let checksum = payload_checksum(&data, &auxiliary);
        Self {
            id: id.into(),
            timestamp_millis,
            data,
            auxiliary,
            checksum,
        }
    }

    /// True when the checksum matches the content.
    pub fn is_intact(&self) -> bool {
        self.checksum == payload_checksum(&self.data, &self.auxiliary)
    }

    /// Serializes to compact JSON bytes.
    pub fn to_bytes(&self) -> AudioResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses JSON bytes, returning `None` for malformed or tampered input.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let payload: Self = match serde_json::from_slice(bytes) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("watermark payload did not parse: {}", e);
                return None;
            }
        };
        if !payload.is_intact() {
            log::debug!("watermark payload {} failed checksum", payload.id);
            return None;
        }
        Some(payload)
    }
}
