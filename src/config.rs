//! CLI surface: the recognized options at process start.
//!
//! No runtime reconfiguration is supported — changing any option
//! requires a restart, per the generator's stateless design.

use clap::Parser;

/// Gift-ID generator service: HTTP endpoint over the workshop fleet's
/// 64-bit identifier generator.
#[derive(Parser, Debug)]
#[command(name = "giftid", about, version)]
pub struct Cli {
    /// This instance's workshop ID, baked into every identifier it
    /// produces. Must be in 0..1024.
    #[arg(long, default_value_t = 1)]
    pub workshop_id: u16,

    /// TCP port to bind.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Bind address.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}
