//! Gift-ID generator: a stateless, per-process generator of 64-bit
//! unique identifiers for gift objects in a distributed workshop fleet.
//!
//! Each identifier embeds the creation timestamp, the originating
//! workshop, a monotonically increasing per-millisecond sequence, and a
//! one-bit gift-class tag. A single generator guarantees global
//! uniqueness across up to 1024 workshop instances without
//! coordination, monotonic ordering on a single instance, and bounded
//! latency with zero dynamic allocation on the hot path.
//!
//! # Quick Start
//!
//! ```
//! use giftid::{GiftClass, GiftIdGenerator};
//!
//! let generator = GiftIdGenerator::new(1).unwrap();
//! let id = generator.generate(GiftClass::Toy).unwrap();
//! println!("Generated ID: {id}");
//! ```
//!
//! The crate's `axum` HTTP collaborator (generate/decode/health) is
//! assembled by [`http::router`] over a shared [`http::AppState`].

#![warn(missing_docs)]

pub mod clock;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;

pub use clock::{Clock, MockClock, SystemClock};
pub use codec::{DecodedId, GiftClass};
pub use config::Cli;
pub use engine::GiftIdGenerator;
pub use error::{GeneratorError, Result};
