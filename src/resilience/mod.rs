//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Rate-limited verification attempt:
//!     → backoff.rs (linear delay: base * attempt)
//!     → sleeper.rs (cooperative wait on the runtime timer)
//!
//! Confirmation poll:
//!     → sleeper.rs (fixed poll interval)
//! ```
//!
//! # Design Decisions
//! - Backoff is linear, not exponential, and carries no jitter
//! - Every wait goes through `Sleeper`, so tests observe delays exactly

pub mod backoff;
pub mod sleeper;

pub use backoff::calculate_backoff;
pub use sleeper::{Sleeper, TokioSleeper};
