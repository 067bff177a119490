//! Common types and data structures

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A single entry in the chat history
#[derive(Debug, Clone)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Local>,
    /// File name of the photo sent along with a user message
    pub attachment: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>, attachment: Option<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sent_at: Local::now(),
            attachment,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            sent_at: Local::now(),
            attachment: None,
        }
    }
}

/// Image picked by the user, waiting to be sent
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = image::guess_format(&bytes)
            .or_else(|_| image::ImageFormat::from_path(&file_name))
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        Self { file_name, bytes, mime }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// JSON body returned by `/chatbot/analyze`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeResponse {
    pub error: Option<Value>,
    pub session_id: Option<String>,
    pub message: Option<String>,
    pub reply: Option<String>,
    pub combined_recommendations: Option<Vec<Recommendation>>,
    pub final_recommendation: Option<Value>,
    pub need_clarification: Option<Value>,
    pub options: Option<Vec<Value>>,
    pub need_more_info: Option<Value>,
    pub user_profile: Option<Value>,
}

/// One row of a combined recommendation
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "Step")]
    pub step: Option<Value>,
    #[serde(rename = "Product")]
    pub product: Option<Value>,
}

impl Recommendation {
    /// Display label: step name, then product name.
    pub fn label(&self) -> Option<String> {
        self.step
            .as_ref()
            .and_then(value_text)
            .or_else(|| self.product.as_ref().and_then(value_text))
    }
}

/// Hair traits the backend has gathered for the current session
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HairProfile {
    pub hair_type: Vec<String>,
    pub hair_texture: Option<String>,
    pub primary_concern: Option<String>,
    pub secondary_concern: Option<String>,
    pub goal: Option<String>,
}

impl HairProfile {
    /// Lenient conversion: unknown shapes are dropped rather than rejected.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(value_text);
        let hair_type = match value.get("hair_type") {
            Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
            Some(other) => value_text(other).into_iter().collect(),
            None => Vec::new(),
        };
        Self {
            hair_type,
            hair_texture: field("hair_texture"),
            primary_concern: field("primary_concern"),
            secondary_concern: field("secondary_concern"),
            goal: field("goal"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Render a JSON scalar as text; blank strings and non-scalars yield `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose truthiness for server flags that may arrive as bool, number or string.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attachment_sniffs_png_mime() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        let att = Attachment::new("photo.bin", png);
        assert_eq!(att.mime, "image/png");
    }

    #[test]
    fn attachment_falls_back_to_extension() {
        let att = Attachment::new("hair.jpg", vec![1, 2, 3]);
        assert_eq!(att.mime, "image/jpeg");
        let att = Attachment::new("notes", vec![1, 2, 3]);
        assert_eq!(att.mime, "application/octet-stream");
    }

    #[test]
    fn recommendation_prefers_step_over_product() {
        let rec: Recommendation =
            serde_json::from_value(json!({"Step": "Shampoo", "Product": "Ultimate Repair"})).unwrap();
        assert_eq!(rec.label().as_deref(), Some("Shampoo"));

        let rec: Recommendation =
            serde_json::from_value(json!({"Step": null, "Product": "Ultimate Repair"})).unwrap();
        assert_eq!(rec.label().as_deref(), Some("Ultimate Repair"));

        let rec: Recommendation = serde_json::from_value(json!({"match_score": 0.9})).unwrap();
        assert_eq!(rec.label(), None);
    }

    #[test]
    fn truthiness_of_flags() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(None));
    }

    #[test]
    fn hair_profile_tolerates_odd_shapes() {
        let profile = HairProfile::from_value(&json!({
            "hair_type": ["dry", "damaged"],
            "hair_texture": "fine",
            "primary_concern": null,
            "goal": ["repair"],
        }));
        assert_eq!(profile.hair_type, vec!["dry", "damaged"]);
        assert_eq!(profile.hair_texture.as_deref(), Some("fine"));
        assert_eq!(profile.primary_concern, None);
        assert_eq!(profile.goal, None);
        assert!(HairProfile::from_value(&json!({})).is_empty());
    }

    #[test]
    fn response_ignores_unknown_fields() {
        let resp: AnalyzeResponse = serde_json::from_value(json!({
            "message": "hi",
            "matches": [{"Product": "x"}],
            "session_id": "abc",
        }))
        .unwrap();
        assert_eq!(resp.message.as_deref(), Some("hi"));
        assert_eq!(resp.session_id.as_deref(), Some("abc"));
        assert!(resp.combined_recommendations.is_none());
    }
}
