use anyhow::Result;
use log::{info, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::auth::{decode_claims, login, Credentials, LoginOutcome, Session};
use crate::cli::{Cli, Command, ProbeArgs};
use crate::client::build_client;
use crate::endpoints::{Pagination, ENDPOINTS};
use crate::report::{self, Reporter};
use crate::request::{probe, ProbeResult};
use crate::timing::RequestTimer;

#[derive(Debug)]
pub enum RunOutcome {
    /// Login was refused; no endpoint was probed.
    LoginRejected { status: u16, body: Value },
    Completed(RunReport),
}

impl RunOutcome {
    /// 1 when login failed, 0 otherwise, however many probes failed.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::LoginRejected { .. } => 1,
            RunOutcome::Completed(_) => 0,
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub session: Session,
    pub results: Vec<ProbeResult>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }
}

/// Logs in, then probes every endpoint in order, printing as it goes.
pub async fn run(client: &Client, args: &ProbeArgs, reporter: &Reporter) -> Result<RunOutcome> {
    let mut timer = RequestTimer::start();
    let api_root = args.api_root();

    reporter.emit(&report::banner("MITIENDA API ENDPOINT SMOKE TEST"));
    reporter.emit(&[report::login_heading()]);

    if args.email.is_empty() || args.password.is_empty() {
        warn!("email or password is empty; set MITIENDA_EMAIL and MITIENDA_PASSWORD");
    }
    let credentials = Credentials::new(args.email.clone(), args.password.clone());

    let session = match login(client, api_root, &credentials, args.verbose).await? {
        LoginOutcome::Authenticated(session) => session,
        LoginOutcome::Rejected { status, body } => {
            reporter.emit(&report::login_failure(status, &body));
            return Ok(RunOutcome::LoginRejected { status, body });
        }
    };
    reporter.emit(&report::login_success(&session));

    if args.show_claims {
        match decode_claims(session.token()) {
            Ok(claims) => reporter.emit(&report::claims(&claims)),
            Err(e) => warn!("could not decode access token: {}", e),
        }
    }

    let pagination = Pagination {
        page: args.page,
        limit: args.limit,
    };

    let mut results = Vec::with_capacity(ENDPOINTS.len());
    for endpoint in &ENDPOINTS {
        reporter.emit(&[report::probe_heading(endpoint)]);
        let result = probe(client, api_root, &session, endpoint, pagination, args.verbose).await;
        info!(
            "{} -> {:?} in {:?}",
            endpoint.path,
            result.outcome.status(),
            result.elapsed
        );
        reporter.emit(&report::probe_lines(&result));
        results.push(result);
    }

    timer.finish();
    let elapsed = timer.total_time().unwrap_or_default();
    reporter.emit(&report::summary(&results, elapsed));

    Ok(RunOutcome::Completed(RunReport {
        session,
        results,
        elapsed,
    }))
}

/// Dispatches the parsed command line and returns the process exit code.
/// Fatal errors (unreachable API on login, undecodable token) are `Err`.
pub async fn execute(cli: &Cli, reporter: &Reporter) -> Result<u8> {
    match &cli.command {
        Some(Command::DecodeToken { token }) => {
            let claims = decode_claims(token)?;
            reporter.emit(&report::claims(&claims));
            Ok(0)
        }
        Some(Command::Probe) | None => {
            let client = build_client(&cli.args)?;
            Ok(run(&client, &cli.args, reporter).await?.exit_code())
        }
    }
}
