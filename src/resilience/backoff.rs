//! Linear backoff.

use std::time::Duration;

/// Delay to wait after failed attempt number `attempt` (1-based).
///
/// Grows linearly: `base * attempt`. Attempt 0 yields no delay.
pub fn calculate_backoff(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(attempt)
}
