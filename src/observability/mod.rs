//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Deployment phases produce:
//!     → logging.rs (structured log events, one span per run with run_id)
//!     → metrics.rs (counters, histograms)
//!     → reporter.rs (phase transitions: submitted, confirmed, verified, failed)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
pub mod reporter;

pub use reporter::{DeploymentEvent, DeploymentReporter, TracingReporter};
