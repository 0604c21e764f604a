//! Error types produced by the gift-ID generator core.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result type alias using [`GeneratorError`].
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors produced by the identifier codec and sequence engine.
///
/// Every variant here corresponds to one failure kind documented in the
/// generator's error handling design: codec-level precondition failures
/// (`FieldOutOfRange`, `ReservedBitSet`) and engine-level clock failures
/// (`ClockBeforeEpoch`, `ClockRegression`, `EpochOverflow`), plus the
/// construction-time `WorkshopIdInvalid`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// `encode` was called with a field value outside its bit-width.
    #[error("field out of range: {field} must be < 2^{bits} but was {value}")]
    FieldOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Width of the field in bits.
        bits: u32,
        /// The value that was supplied.
        value: u64,
    },

    /// `decode` was called on a `u64` with bit 63 set.
    #[error("reserved bit (63) is set on identifier {0}")]
    ReservedBitSet(u64),

    /// The wall clock reported a time before the generator's fixed epoch.
    #[error("wall clock is before the generator epoch")]
    ClockBeforeEpoch,

    /// The wall clock moved backwards by more than the configured tolerance.
    #[error("clock regressed by {delta_ms}ms, exceeding tolerance")]
    ClockRegression {
        /// How far backwards the clock jumped, in milliseconds.
        delta_ms: i64,
    },

    /// The 41-bit timestamp field has been exhausted.
    #[error("epoch-relative timestamp exceeds the 41-bit field width")]
    EpochOverflow,

    /// A generator was constructed with a workshop ID outside `0..1024`.
    #[error("workshop id {0} is out of range (must be 0..1024)")]
    WorkshopIdInvalid(u16),
}

impl IntoResponse for GeneratorError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::FieldOutOfRange { .. } | Self::ReservedBitSet(_) => StatusCode::BAD_REQUEST,
            Self::ClockBeforeEpoch | Self::ClockRegression { .. } | Self::EpochOverflow => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::WorkshopIdInvalid(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(error = %self, "generator unavailable");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_out_of_range_maps_to_400() {
        let err = GeneratorError::FieldOutOfRange {
            field: "sequence",
            bits: 11,
            value: 9999,
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn clock_regression_maps_to_503() {
        let err = GeneratorError::ClockRegression { delta_ms: 100 };
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
