use colored::Colorize;
use serde_json::Value;
use std::time::Duration;

use crate::auth::{Session, TokenClaims};
use crate::endpoints::{
    Endpoint, ERROR_BODY_CHARS, STORE_PREVIEW_COUNT, TOKEN_PREVIEW_CHARS,
};
use crate::request::{ProbeOutcome, ProbeResult};
use crate::response::{json_preview, pretty_json, truncate_chars, Highlighter};
use crate::timing::format_duration;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Pass,
    Fail,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self { tone, text: text.into() }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(Tone::Plain, text)
    }
}

pub fn banner(title: &str) -> Vec<Line> {
    let rule = "=".repeat(RULE_WIDTH);
    vec![
        Line::new(Tone::Heading, rule.clone()),
        Line::new(Tone::Heading, format!("  {}", title)),
        Line::new(Tone::Heading, rule),
        Line::plain(""),
    ]
}

pub fn login_heading() -> Line {
    Line::new(Tone::Heading, "1. 🔐 Testing LOGIN...")
}

pub fn probe_heading(endpoint: &Endpoint) -> Line {
    Line::new(
        Tone::Heading,
        format!("{}. {} Testing GET {}...", endpoint.step, endpoint.icon, endpoint.path),
    )
}

pub fn login_success(session: &Session) -> Vec<Line> {
    vec![
        Line::new(Tone::Pass, "✅ Login successful"),
        Line::plain(format!(
            "Token: {}...",
            truncate_chars(session.token(), TOKEN_PREVIEW_CHARS)
        )),
        Line::plain(""),
    ]
}

pub fn login_failure(status: u16, body: &Value) -> Vec<Line> {
    let rendered = match body {
        Value::String(raw) => raw.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    let mut lines = vec![Line::new(Tone::Fail, format!("❌ Login failed (status {})", status))];
    lines.extend(rendered.lines().map(|l| Line::new(Tone::Json, l)));
    lines
}

pub fn claims(claims: &TokenClaims) -> Vec<Line> {
    let mut lines = vec![Line::new(Tone::Heading, "📋 Token claims:")];
    lines.extend(
        pretty_json(&claims.payload.to_string())
            .lines()
            .map(|l| Line::new(Tone::Json, l)),
    );
    let or_missing = |v: Option<String>| v.unwrap_or_else(|| "NOT FOUND".to_string());
    lines.push(Line::plain(""));
    lines.push(Line::plain(format!("🏪 Store ID: {}", or_missing(claims.store_id()))));
    lines.push(Line::plain(format!("👤 User ID: {}", or_missing(claims.user_id()))));
    lines.push(Line::plain(format!("📧 Email: {}", or_missing(claims.email()))));
    lines.push(Line::plain(""));
    lines
}

/// Everything printed for one probe after its heading.
pub fn probe_lines(result: &ProbeResult) -> Vec<Line> {
    let mut lines = Vec::new();

    if let Some(status) = result.outcome.status() {
        lines.push(Line::plain(format!("Status: {}", status)));
    }

    match &result.outcome {
        ProbeOutcome::Stores { stores, .. } => {
            lines.push(Line::new(
                Tone::Pass,
                format!("✅ {} {}", stores.len(), result.endpoint.success),
            ));
            for store in stores.iter().take(STORE_PREVIEW_COUNT) {
                lines.push(Line::plain(format!("  - {} ({})", store.name, store.plan_status)));
            }
        }
        ProbeOutcome::Body { body, json, limit, .. } => {
            let limit = *limit;
            lines.push(Line::new(Tone::Pass, format!("✅ {}", result.endpoint.success)));
            if *json {
                lines.extend(
                    json_preview(body, limit)
                        .lines()
                        .map(|l| Line::new(Tone::Json, l)),
                );
            } else {
                lines.push(Line::plain(truncate_chars(body, limit)));
            }
        }
        ProbeOutcome::Rejected { message, .. } => {
            let message = message.as_deref().unwrap_or("None");
            lines.push(Line::new(Tone::Fail, format!("❌ Error: {}", message)));
        }
        ProbeOutcome::HttpError { status, body } => {
            lines.push(Line::new(Tone::Fail, format!("❌ Error: {}", status)));
            let excerpt = truncate_chars(body, ERROR_BODY_CHARS);
            if !excerpt.is_empty() {
                lines.push(Line::plain(excerpt));
            }
        }
        ProbeOutcome::Unreachable { reason } => {
            lines.push(Line::new(Tone::Fail, format!("❌ Request failed: {}", reason)));
        }
    }

    lines.push(Line::plain(""));
    lines
}

pub fn summary(results: &[ProbeResult], elapsed: Duration) -> Vec<Line> {
    let passed = results.iter().filter(|r| r.outcome.passed()).count();
    let total = results.len();
    let title = if passed == total {
        "  ✅ SMOKE TEST COMPLETE"
    } else {
        "  ⚠️  SMOKE TEST COMPLETE WITH FAILURES"
    };
    let rule = "=".repeat(RULE_WIDTH);

    let mut lines = vec![Line::new(Tone::Heading, rule.clone()), Line::new(Tone::Heading, title)];
    lines.push(Line::new(
        if passed == total { Tone::Pass } else { Tone::Fail },
        format!("  {}/{} probes passed in {}", passed, total, format_duration(elapsed)),
    ));
    for result in results.iter().filter(|r| !r.outcome.passed()) {
        let status = result
            .outcome
            .status()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "no response".to_string());
        lines.push(Line::new(
            Tone::Fail,
            format!("    - {} ({})", result.endpoint.path, status),
        ));
    }
    lines.push(Line::new(Tone::Heading, rule));
    lines
}

/// Writes rendered lines to stdout.
pub struct Reporter {
    highlighter: Option<Highlighter>,
}

impl Reporter {
    pub fn new(plain: bool) -> Self {
        if plain {
            colored::control::set_override(false);
        }
        // piped output gets no escapes, same as colored's own decision
        let colour = !plain && colored::control::SHOULD_COLORIZE.should_colorize();
        Self {
            highlighter: colour.then(Highlighter::new),
        }
    }

    pub fn emit(&self, lines: &[Line]) {
        let mut json_block = Vec::new();
        for line in lines {
            if line.tone == Tone::Json {
                json_block.push(line.text.as_str());
                continue;
            }
            self.flush_json(&mut json_block);
            match line.tone {
                Tone::Heading => println!("{}", line.text.bold()),
                Tone::Pass => println!("{}", line.text.green()),
                Tone::Fail => println!("{}", line.text.red()),
                Tone::Plain | Tone::Json => println!("{}", line.text),
            }
        }
        self.flush_json(&mut json_block);
    }

    fn flush_json(&self, block: &mut Vec<&str>) {
        if block.is_empty() {
            return;
        }
        let text = block.join("\n");
        match &self.highlighter {
            Some(h) => println!("{}", h.highlight(&text, "json")),
            None => println!("{}", text),
        }
        block.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::{ENDPOINTS, PROFILE_PREVIEW_CHARS};
    use crate::envelope::StoreSummary;
    use crate::request::classify;

    fn result(step: u8, outcome: ProbeOutcome) -> ProbeResult {
        let endpoint = ENDPOINTS.iter().find(|e| e.step == step).unwrap().clone();
        ProbeResult {
            endpoint,
            outcome,
            elapsed: Duration::from_millis(12),
        }
    }

    fn answered(step: u8, status: u16, body: &str) -> ProbeResult {
        let kind = ENDPOINTS.iter().find(|e| e.step == step).unwrap().kind;
        result(step, classify(kind, status, body.to_string(), false))
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn big_json() -> String {
        let items: Vec<String> = (0..100)
            .map(|i| format!(r#"{{"id":{},"nombre":"Producto número {}"}}"#, i, i))
            .collect();
        format!(r#"{{"error":0,"data":{{"items":[{}]}}}}"#, items.join(","))
    }

    #[test]
    fn success_branch_for_json_probe() {
        let lines = probe_lines(&answered(4, 200, r#"{"error":0,"data":[]}"#));
        let t = texts(&lines);
        assert_eq!(t[0], "Status: 200");
        assert_eq!(t[1], "✅ Orders retrieved");
        assert_eq!(lines[1].tone, Tone::Pass);
        assert!(t.contains(&r#"  "error": 0,"#));
    }

    #[test]
    fn failure_branch_for_json_probe() {
        let lines = probe_lines(&result(
            5,
            ProbeOutcome::HttpError { status: 403, body: "Forbidden".into() },
        ));
        let t = texts(&lines);
        assert_eq!(t[0], "Status: 403");
        assert_eq!(t[1], "❌ Error: 403");
        assert_eq!(lines[1].tone, Tone::Fail);
        assert_eq!(t[2], "Forbidden");
    }

    #[test]
    fn json_preview_respects_endpoint_limits() {
        let body = big_json();
        for step in 3..=10u8 {
            let lines = probe_lines(&answered(step, 200, &body));
            let rendered: Vec<&str> = lines
                .iter()
                .filter(|l| l.tone == Tone::Json)
                .map(|l| l.text.as_str())
                .collect();
            let chars = rendered.join("\n").chars().count();
            let limit = if step == 3 { PROFILE_PREVIEW_CHARS } else { 300 };
            assert!(chars <= limit, "step {} rendered {} chars", step, chars);
            assert!(chars >= limit - 20, "step {} rendered only {} chars", step, chars);
        }
    }

    #[test]
    fn error_body_is_truncated() {
        let body = "ñ".repeat(1000);
        let lines = probe_lines(&result(6, ProbeOutcome::HttpError { status: 500, body }));
        assert_eq!(lines[2].text.chars().count(), ERROR_BODY_CHARS);
    }

    #[test]
    fn raw_success_body_is_truncated() {
        let body = "x".repeat(1000);
        let lines = probe_lines(&answered(10, 200, &body));
        assert_eq!(lines[2].text.chars().count(), 300);
    }

    #[test]
    fn store_listing_shows_three() {
        let stores: Vec<StoreSummary> = (1..=5)
            .map(|i| StoreSummary { name: format!("Tienda {}", i), plan_status: "Activo".into() })
            .collect();
        let lines = probe_lines(&result(2, ProbeOutcome::Stores { status: 200, stores }));
        let t = texts(&lines);
        assert_eq!(t[1], "✅ 5 stores found");
        assert_eq!(t[2], "  - Tienda 1 (Activo)");
        assert_eq!(t[4], "  - Tienda 3 (Activo)");
        assert_eq!(t[5], "");
    }

    #[test]
    fn store_rejection_prints_message() {
        let lines = probe_lines(&result(
            2,
            ProbeOutcome::Rejected { status: 401, message: Some("Token inválido".into()) },
        ));
        assert_eq!(texts(&lines)[1], "❌ Error: Token inválido");
    }

    #[test]
    fn unreachable_has_no_status_line() {
        let lines = probe_lines(&result(9, ProbeOutcome::Unreachable { reason: "timed out".into() }));
        assert_eq!(texts(&lines)[0], "❌ Request failed: timed out");
    }

    #[test]
    fn login_success_previews_token() {
        let token = "a".repeat(120);
        let lines = login_success(&Session::new(token));
        assert_eq!(lines[1].text, format!("Token: {}...", "a".repeat(50)));
    }

    #[test]
    fn login_failure_prints_envelope() {
        let body = serde_json::json!({"error": 1, "message": "Credenciales inválidas"});
        let lines = login_failure(401, &body);
        assert_eq!(lines[0].tone, Tone::Fail);
        assert!(texts(&lines).contains(&r#"  "message": "Credenciales inválidas""#));
    }

    #[test]
    fn summary_counts_passes() {
        let results = vec![
            answered(3, 200, "{}"),
            result(4, ProbeOutcome::HttpError { status: 500, body: String::new() }),
            result(5, ProbeOutcome::Unreachable { reason: "refused".into() }),
        ];
        let lines = summary(&results, Duration::from_millis(250));
        let t = texts(&lines);
        assert!(t.contains(&"  1/3 probes passed in 250.00 ms"));
        assert!(t.contains(&"    - /orders (500)"));
        assert!(t.contains(&"    - /products (no response)"));
    }

    #[test]
    fn plain_reporter_never_highlights() {
        assert!(Reporter::new(true).highlighter.is_none());
    }

    #[test]
    fn uncoloured_output_never_highlights() {
        colored::control::set_override(false);
        assert!(Reporter::new(false).highlighter.is_none());
    }

    #[test]
    fn claims_fall_back_to_not_found() {
        let c = TokenClaims { payload: serde_json::json!({"email": "a@b.pe"}) };
        let t: Vec<String> = claims(&c).into_iter().map(|l| l.text).collect();
        assert!(t.contains(&"🏪 Store ID: NOT FOUND".to_string()));
        assert!(t.contains(&"📧 Email: a@b.pe".to_string()));
    }
}
