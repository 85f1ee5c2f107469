use serde::Deserialize;
use serde_json::{Number, Value};

/// The `{error, message, data}` wrapper every MiTienda endpoint answers with.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(default)]
    pub error: Option<Number>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    pub fn is_ok(&self) -> bool {
        self.error
            .as_ref()
            .and_then(Number::as_f64)
            .is_some_and(|code| code == 0.0)
    }

    /// `message` as printed: strings bare, anything else as JSON.
    pub fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.data.as_ref()?.get("access_token")?.as_str()
    }

    /// Entries of `data.stores`, empty when the field is missing.
    pub fn stores(&self) -> Vec<StoreSummary> {
        self.data
            .as_ref()
            .and_then(|d| d.get("stores"))
            .and_then(Value::as_array)
            .map(|stores| stores.iter().map(StoreSummary::from_value).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub name: String,
    pub plan_status: String,
}

impl StoreSummary {
    fn from_value(v: &Value) -> Self {
        let field = |key: &str| match v.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "None".to_string(),
            Some(other) => other.to_string(),
        };
        Self {
            name: field("tienda_nombre_comercial"),
            plan_status: field("tienda_plan_status_text"),
        }
    }
}
