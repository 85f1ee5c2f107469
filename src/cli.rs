use anyhow::Result;
use clap::{Args, Parser};
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://api2.mitienda.pe/api/v1";

/// Smoke test for the MiTienda management API
///
/// Logs in once, then probes the read-only endpoints one after another
/// and prints a pass/fail line for each of them.
///
/// Examples:
///   # Run every probe (credentials from MITIENDA_EMAIL / MITIENDA_PASSWORD)
///   mitienda-probe
///
///   # Run against another environment, showing request lines
///   mitienda-probe --base-url https://staging.example.com/api/v1 -v
///
///   # Inspect the claims carried by a token
///   mitienda-probe decode-token eyJhbGciOi...
#[derive(Parser, Debug)]
#[clap(version, author = "MiTienda")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(flatten)]
    pub args: ProbeArgs,
}

#[derive(Parser, Debug)]
pub enum Command {
    /// Log in and probe every endpoint (default)
    Probe,

    /// Decode the payload of a JWT access token
    DecodeToken {
        /// The token to decode
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// API base URL
    #[arg(long = "base-url", global = true, env = "MITIENDA_API_URL", default_value = DEFAULT_BASE_URL, value_parser = parse_url)]
    pub base_url: String,

    /// Account email
    #[arg(long = "email", global = true, env = "MITIENDA_EMAIL", default_value = "")]
    pub email: String,

    /// Account password
    #[arg(long = "password", global = true, env = "MITIENDA_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", global = true, default_value = "30")]
    pub timeout: u64,

    /// Page requested from paginated endpoints
    #[arg(long = "page", global = true, default_value = "1")]
    pub page: u32,

    /// Page size requested from paginated endpoints
    #[arg(long = "limit", global = true, default_value = "5")]
    pub limit: u32,

    /// Verbose mode: print each request line
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Disable colours and JSON highlighting
    #[arg(long = "plain", global = true)]
    pub plain: bool,

    /// Print the decoded token claims after logging in
    #[arg(long = "show-claims", global = true)]
    pub show_claims: bool,
}

impl ProbeArgs {
    /// Base URL without a trailing slash, so paths can be appended verbatim.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

// ============================================================================
// Parse Function
// ============================================================================

fn parse_url(s: &str) -> Result<String> {
    let _url: Url = s.parse()?;
    Ok(s.into())
}

// ============================================================================
// Tests
// ============================================================================
