use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::envelope::Envelope;
use crate::request::VerboseInfo;

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Bearer token obtained from `/auth/login`, kept for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated(Session),
    /// The API answered but did not grant a token. Holds the raw body as
    /// JSON when it parsed, otherwise as a string value.
    Rejected { status: u16, body: Value },
}

pub async fn login(
    client: &Client,
    api_root: &str,
    credentials: &Credentials,
    verbose: bool,
) -> Result<LoginOutcome> {
    let url = format!("{}/auth/login", api_root);

    if verbose {
        let mut info = VerboseInfo::new("POST", &url);
        info.set_body(json!({ "email": credentials.email, "password": "********" }).to_string());
        info.print();
    }

    debug!("POST {}", url);
    let resp = client
        .post(&url)
        .json(&json!({
            "email": credentials.email,
            "password": credentials.password,
        }))
        .send()
        .await
        .with_context(|| format!("login request to {} failed", url))?;

    let status = resp.status().as_u16();
    let text = resp.text().await?;

    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
    let envelope = serde_json::from_value::<Envelope>(body.clone()).unwrap_or_default();

    match envelope.access_token() {
        Some(token) if envelope.is_ok() && !token.is_empty() => {
            info!("authenticated as {}", credentials.email);
            Ok(LoginOutcome::Authenticated(Session::new(token)))
        }
        _ => {
            debug!("login rejected with status {}", status);
            Ok(LoginOutcome::Rejected { status, body })
        }
    }
}

pub fn apply_bearer(
    builder: reqwest::RequestBuilder,
    session: &Session,
    verbose_info: &mut Option<VerboseInfo>,
) -> reqwest::RequestBuilder {
    let auth_value = session.authorization();

    if let Some(info) = verbose_info {
        info.add_header("Authorization".to_string(), auth_value.clone());
    }

    builder.header(reqwest::header::AUTHORIZATION, auth_value)
}

// ============================================================================
// JWT claims
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub payload: Value,
}

impl TokenClaims {
    pub fn store_id(&self) -> Option<String> {
        self.claim("store_id")
    }

    pub fn user_id(&self) -> Option<String> {
        self.claim("user_id")
    }

    pub fn email(&self) -> Option<String> {
        self.claim("email")
    }

    /// Falsy claims (`null`, `false`, `0`, `""`) count as missing.
    fn claim(&self, key: &str) -> Option<String> {
        match self.payload.get(key)? {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Decodes the payload segment of a JWT. The signature is not verified.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(anyhow!(
            "invalid JWT: expected 3 dot-separated segments, found {}",
            parts.len()
        ));
    }

    // issuers disagree on padding and alphabet
    let segment = parts[1].trim_end_matches('=');
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(segment))
        .map_err(|e| anyhow!("invalid JWT payload encoding: {}", e))?;

    let payload: Value =
        serde_json::from_slice(&bytes).context("JWT payload is not valid JSON")?;

    Ok(TokenClaims { payload })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            general_purpose::URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn decode_claims_reads_known_fields() {
        let token = token_with(r#"{"store_id":42,"user_id":"7","email":"carla@tienda.pe"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.store_id(), Some("42".to_string()));
        assert_eq!(claims.user_id(), Some("7".to_string()));
        assert_eq!(claims.email(), Some("carla@tienda.pe".to_string()));
    }

    #[test]
    fn decode_claims_missing_fields() {
        let token = token_with(r#"{"sub":"1","store_id":null,"email":""}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.store_id(), None);
        assert_eq!(claims.user_id(), None);
        assert_eq!(claims.email(), None);
    }

    #[test]
    fn decode_claims_falsy_fields_are_missing() {
        let token = token_with(r#"{"store_id":0,"user_id":false,"email":"a@b.pe"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.store_id(), None);
        assert_eq!(claims.user_id(), None);
        assert_eq!(claims.email(), Some("a@b.pe".to_string()));
    }

    #[test]
    fn decode_claims_accepts_padded_payload() {
        let payload = general_purpose::URL_SAFE.encode(r#"{"user_id":"1"}"#);
        let token = format!("h.{}.s", payload);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id(), Some("1".to_string()));
    }

    #[test]
    fn decode_claims_rejects_wrong_segment_count() {
        assert!(decode_claims("only.two").is_err());
        assert!(decode_claims("a.b.c.d").is_err());
        assert!(decode_claims("").is_err());
    }

    #[test]
    fn decode_claims_rejects_garbage_payload() {
        assert!(decode_claims("h.!!!.s").is_err());
        let not_json = general_purpose::URL_SAFE_NO_PAD.encode("not json");
        assert!(decode_claims(&format!("h.{}.s", not_json)).is_err());
    }

    #[test]
    fn session_authorization_header() {
        let session = Session::new("tok123");
        assert_eq!(session.token(), "tok123");
        assert_eq!(session.authorization(), "Bearer tok123");
    }

    #[test]
    fn apply_bearer_records_verbose_header() {
        let client = Client::new();
        let session = Session::new("tok123");
        let mut info = Some(VerboseInfo::new("GET", "http://localhost/orders"));
        let req = apply_bearer(client.get("http://localhost/orders"), &session, &mut info)
            .build()
            .unwrap();
        assert_eq!(
            req.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok123"
        );
        assert_eq!(
            info.unwrap().headers(),
            &[("Authorization".to_string(), "Bearer tok123".to_string())]
        );
    }
}
