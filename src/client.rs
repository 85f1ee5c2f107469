use anyhow::Result;
use reqwest::{header, Client};
use std::time::Duration;

use crate::cli::ProbeArgs;

const MAX_REDIRECTS: usize = 10;

pub fn build_client(args: &ProbeArgs) -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    let user_agent = format!("mitienda-probe/{}", env!("CARGO_PKG_VERSION"));
    headers.insert(header::USER_AGENT, header::HeaderValue::from_str(&user_agent)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(args.timeout))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    #[test]
    fn test_build_client_default_args() {
        let cli = Cli::try_parse_from(["mitienda-probe"]).unwrap();
        assert!(build_client(&cli.args).is_ok());
    }

    #[test]
    fn test_build_client_short_timeout() {
        let cli = Cli::try_parse_from(["mitienda-probe", "--timeout", "1"]).unwrap();
        assert!(build_client(&cli.args).is_ok());
    }
}
