//! Notification cycle driver
//!
//! One invocation fetches every source, rolls the window up into daily
//! summaries, estimates thresholds, and publishes at most one message.

pub mod cli;
pub mod cycle;
pub mod env;

pub use cli::*;
pub use cycle::*;
pub use env::*;
