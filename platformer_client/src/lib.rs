//! `platformer_client`
//!
//! Host-side systems:
//! - Key bindings and edge detection for the jump key
//! - Fixed-rate frame loop driving one `PlayerController`
//! - Console for live tuning of the controller constants

pub mod host;
pub mod input;

pub use host::GameHost;
