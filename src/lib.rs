pub mod auth;
pub mod cli;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod report;
pub mod request;
pub mod response;
pub mod runner;
pub mod timing;

// Re-export commonly used types
pub use auth::{decode_claims, Credentials, LoginOutcome, Session, TokenClaims};
pub use cli::{Cli, Command, ProbeArgs};
pub use client::build_client;
pub use endpoints::{Endpoint, Pagination, ProbeKind, ENDPOINTS};
pub use envelope::Envelope;
pub use report::Reporter;
pub use request::{probe, ProbeOutcome, ProbeResult};
pub use runner::{execute, run, RunOutcome, RunReport};
