//! JSON request/response DTOs for the HTTP collaborator.
//!
//! Identifiers are transported as decimal strings: values near 2^63
//! exceed the 53-bit mantissa of an IEEE-754 double, so any field
//! carrying a raw identifier is a `String`, never a JSON number.

use serde::{Deserialize, Serialize};

use crate::codec::{DecodedId, GiftClass};

/// Request body for `POST /api/v1/gift-id/generate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    /// `"toy"` (default) or `"coal"`.
    pub gift_class: Option<GiftClassWire>,
}

/// Wire representation of [`GiftClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftClassWire {
    /// Toy (bit 0).
    Toy,
    /// Coal (bit 1).
    Coal,
}

impl From<GiftClassWire> for GiftClass {
    fn from(wire: GiftClassWire) -> Self {
        match wire {
            GiftClassWire::Toy => Self::Toy,
            GiftClassWire::Coal => Self::Coal,
        }
    }
}

impl From<GiftClass> for GiftClassWire {
    fn from(class: GiftClass) -> Self {
        match class {
            GiftClass::Toy => Self::Toy,
            GiftClass::Coal => Self::Coal,
        }
    }
}

/// Response body for `POST /api/v1/gift-id/generate` and the decode
/// endpoint — the decoded fields of a single identifier.
#[derive(Debug, Clone, Serialize)]
pub struct IdResponse {
    /// The identifier, as a decimal string.
    pub id: String,
    /// Originating workshop ID.
    pub workshop_id: u16,
    /// Absolute timestamp in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Per-millisecond sequence value.
    pub sequence: u16,
    /// Gift class tag.
    pub gift_class: GiftClassWire,
}

impl IdResponse {
    /// Build a response from a raw identifier and its decoded fields.
    #[must_use]
    pub fn new(id: u64, decoded: DecodedId) -> Self {
        Self {
            id: id.to_string(),
            workshop_id: decoded.workshop_id,
            timestamp_ms: decoded.timestamp_absolute_ms,
            sequence: decoded.sequence,
            gift_class: decoded.gift_class.into(),
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving requests.
    pub status: &'static str,
    /// This instance's workshop ID.
    pub workshop_id: u16,
}
