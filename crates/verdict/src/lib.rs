//! AML Oracle verdict providers
//!
//! Turns a pending transfer into an `AmlVerdict`:
//! - [`HttpVerdictProvider`] - asks the external AML decision service
//! - [`StaticVerdictProvider`] - fixed answer, for tests and dry runs
//!
//! Providers never fail. Any problem reaching or understanding the decision
//! service produces the fail-safe verdict (not approved, flagged, risk 100).

mod config;
mod error;
mod http;
mod provider;

pub use config::AmlConfig;
pub use error::{AmlError, AmlResult};
pub use http::{AmlRequest, AmlResponse, HttpVerdictProvider};
pub use provider::{AmlVerdictProvider, StaticVerdictProvider};
