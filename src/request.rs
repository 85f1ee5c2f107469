use colored::Colorize;
use log::{debug, warn};
use reqwest::{header, Client, Url};
use std::time::Duration;

use crate::auth::{apply_bearer, Session};
use crate::endpoints::{Endpoint, Pagination, ProbeKind};
use crate::envelope::{Envelope, StoreSummary};
use crate::response::{get_content_type, is_json};
use crate::timing::RequestTimer;

#[derive(Debug, Default)]
pub struct VerboseInfo {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    body: Option<String>,
}

impl VerboseInfo {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            headers: Vec::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    pub fn add_header(&mut self, key: String, value: String) {
        self.headers.push((key, value));
    }

    pub fn add_query_param(&mut self, key: String, value: String) {
        self.query_params.push((key, value));
    }

    pub fn set_body(&mut self, body: String) {
        self.body = Some(body);
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Request line and headers as they are printed, without colour.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let (path, host) = match Url::parse(&self.url) {
            Ok(mut parsed) => {
                if !self.query_params.is_empty() {
                    parsed.query_pairs_mut().extend_pairs(&self.query_params);
                }
                let path = match parsed.query() {
                    Some(q) => format!("{}?{}", parsed.path(), q),
                    None => parsed.path().to_string(),
                };
                (path, parsed.host_str().map(str::to_string))
            }
            Err(_) => (self.url.clone(), None),
        };

        lines.push(format!("> {} {} HTTP/1.1", self.method, path));
        if let Some(host) = host {
            lines.push(format!("> Host: {}", host));
        }

        for (key, value) in &self.headers {
            if key.eq_ignore_ascii_case("authorization") {
                lines.push(format!("> {}: {}", key, mask_secret(value)));
            } else {
                lines.push(format!("> {}: {}", key, value));
            }
        }

        if let Some(body) = &self.body {
            lines.push(">".to_string());
            match serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| serde_json::to_string_pretty(&v).ok())
            {
                Some(pretty) => lines.extend(pretty.lines().map(|l| format!("> {}", l))),
                None => lines.push(format!("> {}", body)),
            }
        }

        lines
    }

    pub fn print(&self) {
        for line in self.lines() {
            println!("{}", line.cyan());
        }
        println!();
    }
}

/// Keeps the first 10 and last 5 characters of long secrets.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 20 {
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// 200 on a JSON probe. `json` tells whether `body` parsed as JSON;
    /// `limit` is the preview length in characters.
    Body { status: u16, body: String, json: bool, limit: usize },
    Stores { status: u16, stores: Vec<StoreSummary> },
    /// The envelope carried `error != 0`.
    Rejected { status: u16, message: Option<String> },
    HttpError { status: u16, body: String },
    /// No response at all: DNS, refused connection, timeout.
    Unreachable { reason: String },
}

impl ProbeOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, ProbeOutcome::Body { .. } | ProbeOutcome::Stores { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Body { status, .. }
            | ProbeOutcome::Stores { status, .. }
            | ProbeOutcome::Rejected { status, .. }
            | ProbeOutcome::HttpError { status, .. } => Some(*status),
            ProbeOutcome::Unreachable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub endpoint: Endpoint,
    pub outcome: ProbeOutcome,
    pub elapsed: Duration,
}

/// Classifies a received response according to the probe kind.
pub fn classify(kind: ProbeKind, status: u16, body: String, json_content: bool) -> ProbeOutcome {
    match kind {
        ProbeKind::StoreList => match Envelope::parse(&body) {
            Some(envelope) if envelope.is_ok() => ProbeOutcome::Stores {
                status,
                stores: envelope.stores(),
            },
            Some(envelope) => ProbeOutcome::Rejected {
                status,
                message: envelope.message_text(),
            },
            None => ProbeOutcome::HttpError { status, body },
        },
        ProbeKind::Json { limit } if status == 200 => {
            let json = json_content || serde_json::from_str::<serde_json::Value>(&body).is_ok();
            ProbeOutcome::Body { status, body, json, limit }
        }
        ProbeKind::Json { .. } => ProbeOutcome::HttpError { status, body },
    }
}

pub async fn probe(
    client: &Client,
    api_root: &str,
    session: &Session,
    endpoint: &Endpoint,
    pagination: Pagination,
    verbose: bool,
) -> ProbeResult {
    let url = format!("{}{}", api_root, endpoint.path);
    let mut timer = RequestTimer::start();

    let mut verbose_info = if verbose {
        Some(VerboseInfo::new("GET", &url))
    } else {
        None
    };

    let mut req_builder = client.get(&url);
    req_builder = apply_bearer(req_builder, session, &mut verbose_info);
    req_builder = req_builder.header(header::CONTENT_TYPE, "application/json");

    if endpoint.paginated {
        let query = pagination.query();
        req_builder = req_builder.query(&query);
        if let Some(ref mut info) = verbose_info {
            for (key, value) in query {
                info.add_query_param(key.to_string(), value);
            }
        }
    }

    if let Some(info) = verbose_info {
        info.print();
    }

    debug!("GET {}", url);
    let outcome = match req_builder.send().await {
        Ok(resp) => {
            let status = resp.status().as_u16();
            let json_content = get_content_type(&resp).as_ref().is_some_and(is_json);
            match resp.text().await {
                Ok(body) => classify(endpoint.kind, status, body, json_content),
                Err(e) => {
                    warn!("failed to read body from {}: {}", url, e);
                    ProbeOutcome::Unreachable { reason: e.to_string() }
                }
            }
        }
        Err(e) => {
            warn!("GET {} failed: {}", url, e);
            ProbeOutcome::Unreachable { reason: e.to_string() }
        }
    };

    timer.finish();
    ProbeResult {
        endpoint: endpoint.clone(),
        outcome,
        elapsed: timer.total_time().unwrap_or_default(),
    }
}

// ============================================================================
// Tests
// ============================================================================
