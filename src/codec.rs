//! Identifier bit-layout: pure, stateless, allocation-free encode/decode.
//!
//! ```text
//! bit   63        62..22            21..12        11..1       0
//!     [rsvd] [timestamp (41)] [workshop_id (10)] [sequence (11)] [gift_class]
//! ```
//!
//! Bit 63 is reserved and always zero so that a gift ID fits in the
//! positive range of a signed 64-bit integer for languages whose native
//! integer type lacks unsigned 64-bit support.

use crate::error::{GeneratorError, Result};

/// Fixed epoch: 2024-01-01T00:00:00Z, milliseconds since the Unix epoch.
///
/// Changing this value invalidates every identifier issued under the old
/// value — decoded timestamps are only meaningful relative to one epoch.
pub const EPOCH_MS: i64 = 1_704_067_200_000;

const TIMESTAMP_BITS: u32 = 41;
const WORKSHOP_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 11;
const GIFT_CLASS_BITS: u32 = 1;

const GIFT_CLASS_SHIFT: u32 = 0;
const SEQUENCE_SHIFT: u32 = GIFT_CLASS_SHIFT + GIFT_CLASS_BITS;
const WORKSHOP_SHIFT: u32 = SEQUENCE_SHIFT + SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u32 = WORKSHOP_SHIFT + WORKSHOP_BITS;

/// Maximum value a relative timestamp may hold (41 bits).
pub const MAX_TIMESTAMP_REL: i64 = (1_i64 << TIMESTAMP_BITS) - 1;
/// Maximum value a workshop ID may hold (10 bits).
pub const MAX_WORKSHOP_ID: u16 = (1_u16 << WORKSHOP_BITS) - 1;
/// Maximum value a sequence counter may hold (11 bits).
pub const MAX_SEQUENCE: u16 = (1_u16 << SEQUENCE_BITS) - 1;

const RESERVED_BIT_MASK: u64 = 1 << 63;

/// A gift class: the one-bit tag embedded in every identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftClass {
    /// Bit value 0.
    Toy,
    /// Bit value 1.
    Coal,
}

impl GiftClass {
    /// The raw bit value (0 or 1) for this class.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Toy => 0,
            Self::Coal => 1,
        }
    }

    /// Reconstruct a [`GiftClass`] from a raw bit value.
    #[must_use]
    pub const fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Self::Toy
        } else {
            Self::Coal
        }
    }
}

/// The decoded fields of a gift ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedId {
    /// Epoch-relative timestamp in milliseconds.
    pub timestamp_ms_rel: i64,
    /// Absolute timestamp (`timestamp_ms_rel + EPOCH_MS`).
    pub timestamp_absolute_ms: i64,
    /// Originating workshop ID.
    pub workshop_id: u16,
    /// Per-millisecond sequence value.
    pub sequence: u16,
    /// Gift class tag.
    pub gift_class: GiftClass,
}

/// Pack the four fields into a 64-bit identifier.
///
/// # Errors
///
/// Returns [`GeneratorError::FieldOutOfRange`] if any field exceeds its
/// bit width.
pub fn encode(
    timestamp_ms_rel: i64,
    workshop_id: u16,
    sequence: u16,
    gift_class: GiftClass,
) -> Result<u64> {
    if !(0..=MAX_TIMESTAMP_REL).contains(&timestamp_ms_rel) {
        return Err(GeneratorError::FieldOutOfRange {
            field: "timestamp",
            bits: TIMESTAMP_BITS,
            #[allow(clippy::cast_sign_loss)]
            value: timestamp_ms_rel.max(0) as u64,
        });
    }
    if workshop_id > MAX_WORKSHOP_ID {
        return Err(GeneratorError::FieldOutOfRange {
            field: "workshop_id",
            bits: WORKSHOP_BITS,
            value: u64::from(workshop_id),
        });
    }
    if sequence > MAX_SEQUENCE {
        return Err(GeneratorError::FieldOutOfRange {
            field: "sequence",
            bits: SEQUENCE_BITS,
            value: u64::from(sequence),
        });
    }

    #[allow(clippy::cast_sign_loss)]
    let ts = timestamp_ms_rel as u64;

    Ok((ts << TIMESTAMP_SHIFT)
        | (u64::from(workshop_id) << WORKSHOP_SHIFT)
        | (u64::from(sequence) << SEQUENCE_SHIFT)
        | (u64::from(gift_class.bit()) << GIFT_CLASS_SHIFT))
}

/// Unpack a 64-bit identifier into its fields.
///
/// Total on any `id` with bit 63 clear.
///
/// # Errors
///
/// Returns [`GeneratorError::ReservedBitSet`] if bit 63 is set.
pub fn decode(id: u64) -> Result<DecodedId> {
    if id & RESERVED_BIT_MASK != 0 {
        return Err(GeneratorError::ReservedBitSet(id));
    }

    let timestamp_mask = (1_u64 << TIMESTAMP_BITS) - 1;
    let workshop_mask = u64::from(MAX_WORKSHOP_ID);
    let sequence_mask = u64::from(MAX_SEQUENCE);

    #[allow(clippy::cast_possible_wrap)]
    let timestamp_ms_rel = ((id >> TIMESTAMP_SHIFT) & timestamp_mask) as i64;
    #[allow(clippy::cast_possible_truncation)]
    let workshop_id = ((id >> WORKSHOP_SHIFT) & workshop_mask) as u16;
    #[allow(clippy::cast_possible_truncation)]
    let sequence = ((id >> SEQUENCE_SHIFT) & sequence_mask) as u16;
    #[allow(clippy::cast_possible_truncation)]
    let gift_class = GiftClass::from_bit((id & 1) as u8);

    Ok(DecodedId {
        timestamp_ms_rel,
        timestamp_absolute_ms: timestamp_ms_rel + EPOCH_MS,
        workshop_id,
        sequence,
        gift_class,
    })
}
