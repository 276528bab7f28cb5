//! Portal response shapes.

use serde_json::Value;

/// Body returned by the portal after the upload, resolved once.
///
/// The portal sometimes wraps its HTML in a `{status, data, log}` JSON envelope
/// and sometimes answers with bare HTML or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalResponse {
    /// JSON envelope whose `data` field holds the page markup
    Envelope {
        raw: String,
        status: Option<String>,
        data: String,
        log: Option<String>,
    },
    /// Anything else; the body itself is the markup
    Raw(String),
}

impl PortalResponse {
    /// Interpret a response body.
    ///
    /// A JSON object with a string `data` field becomes an envelope; every
    /// other body (non-JSON, JSON without string `data`) is scanned raw.
    pub fn parse(body: String) -> Self {
        let Ok(Value::Object(mut envelope)) = serde_json::from_str::<Value>(&body) else {
            return PortalResponse::Raw(body);
        };
        match envelope.remove("data") {
            Some(Value::String(data)) => PortalResponse::Envelope {
                status: envelope.remove("status").map(value_text),
                log: envelope.remove("log").map(value_text),
                data,
                raw: body,
            },
            _ => PortalResponse::Raw(body),
        }
    }

    /// Markup to scan for hidden fields.
    pub fn html(&self) -> &str {
        match self {
            PortalResponse::Envelope { data, .. } => data,
            PortalResponse::Raw(body) => body,
        }
    }

    /// Body exactly as received.
    pub fn raw(&self) -> &str {
        match self {
            PortalResponse::Envelope { raw, .. } => raw,
            PortalResponse::Raw(body) => body,
        }
    }

    pub fn into_raw(self) -> String {
        match self {
            PortalResponse::Envelope { raw, .. } => raw,
            PortalResponse::Raw(body) => body,
        }
    }

    /// Envelope `status`, if any.
    pub fn status(&self) -> Option<&str> {
        match self {
            PortalResponse::Envelope { status, .. } => status.as_deref(),
            PortalResponse::Raw(_) => None,
        }
    }

    /// Envelope `log`, if any.
    pub fn log(&self) -> Option<&str> {
        match self {
            PortalResponse::Envelope { log, .. } => log.as_deref(),
            PortalResponse::Raw(_) => None,
        }
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Hidden form fields scraped from a portal page.
///
/// Keeps first-seen order; a repeated name overwrites the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenFieldSet {
    fields: Vec<(String, String)>,
}

impl HiddenFieldSet {
    /// Field the portal needs to confirm an upload.
    pub const CONFIRMATION_FIELD: &'static str = "sql";

    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing the value of an existing one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the confirmation contract is met: `sql` present and non-empty.
    pub fn has_confirmation(&self) -> bool {
        self.get(Self::CONFIRMATION_FIELD)
            .is_some_and(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Serialize every field as `application/x-www-form-urlencoded`.
    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_uses_data() {
        let body = r#"{"status":"OK","data":"<input type='hidden' name='sql' value='X'>","log":"1 linha"}"#;
        let response = PortalResponse::parse(body.to_string());
        assert_eq!(response.html(), "<input type='hidden' name='sql' value='X'>");
        assert_eq!(response.status(), Some("OK"));
        assert_eq!(response.log(), Some("1 linha"));
        assert_eq!(response.raw(), body);
    }

    #[test]
    fn test_raw_html() {
        let body = "<html><input type=\"hidden\" name=\"sql\"></html>";
        let response = PortalResponse::parse(body.to_string());
        assert!(matches!(response, PortalResponse::Raw(_)));
        assert_eq!(response.html(), body);
        assert_eq!(response.status(), None);
    }

    #[test]
    fn test_json_without_string_data_is_raw() {
        let response = PortalResponse::parse(r#"{"status":"ERR","data":null}"#.to_string());
        assert!(matches!(response, PortalResponse::Raw(_)));

        let response = PortalResponse::parse("[1,2,3]".to_string());
        assert!(matches!(response, PortalResponse::Raw(_)));
    }

    #[test]
    fn test_field_set_last_wins_in_place() {
        let mut fields = HiddenFieldSet::new();
        fields.insert("sql", "A");
        fields.insert("turma", "T1");
        fields.insert("sql", "B");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("sql"), Some("B"));
        assert_eq!(fields.to_form_body(), "sql=B&turma=T1");
    }

    #[test]
    fn test_form_body_encoding() {
        let mut fields = HiddenFieldSet::new();
        fields.insert("sql", "INSERT INTO x VALUES ('a&b');");
        assert_eq!(
            fields.to_form_body(),
            "sql=INSERT+INTO+x+VALUES+%28%27a%26b%27%29%3B"
        );
        assert!(fields.has_confirmation());
    }

    #[test]
    fn test_empty_confirmation_value_does_not_count() {
        let mut fields = HiddenFieldSet::new();
        fields.insert("sql", "");
        assert!(fields.contains("sql"));
        assert!(!fields.has_confirmation());
    }
}
