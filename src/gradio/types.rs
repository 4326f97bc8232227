use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;

pub const DEFAULT_DENOISE_STEPS: u32 = 30;
pub const DEFAULT_SEED: i64 = 42;

/// Person image as the remote image editor component expects it.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonInput {
    pub background: PathBuf,
    pub layers: Vec<PathBuf>,
    /// `None` lets the remote side compute the composite itself.
    pub composite: Option<PathBuf>,
}

impl PersonInput {
    pub fn new(background: impl Into<PathBuf>) -> Self {
        Self {
            background: background.into(),
            layers: Vec::new(),
            composite: None,
        }
    }
}

/// Arguments of one try-on invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnRequest {
    pub person: PersonInput,
    pub garment: PathBuf,
    pub description: String,
    pub crop_first: bool,
    pub auto_crop: bool,
    pub denoise_steps: u32,
    pub seed: i64,
}

impl TryOnRequest {
    pub fn new(
        human: impl Into<PathBuf>,
        garment: impl Into<PathBuf>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            person: PersonInput::new(human),
            garment: garment.into(),
            description: description.into(),
            crop_first: true,
            auto_crop: false,
            denoise_steps: DEFAULT_DENOISE_STEPS,
            seed: DEFAULT_SEED,
        }
    }
}

/// A single element of the remote result sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteValue {
    Text(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl RemoteValue {
    pub fn into_json(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s),
            Self::Bytes(bytes) => Value::String(STANDARD.encode(bytes)),
            Self::Json(value) => value,
        }
    }

    /// Short name of the representation, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Json(value) => json_kind(value),
        }
    }
}

impl From<Value> for RemoteValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

pub type RemoteResult = Vec<RemoteValue>;

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// File reference in the shape Gradio's file-based components accept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileData {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl FileData {
    pub fn uploaded(path: impl Into<String>, orig_name: Option<String>) -> Self {
        Self {
            path: path.into(),
            url: None,
            orig_name,
            meta: Some(json!({ "_type": "gradio.FileData" })),
        }
    }

    /// Interprets a result element as a file reference, if it looks like one.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if !object.contains_key("path") && !object.contains_key("url") {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpaceHost {
    pub host: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallAccepted {
    pub event_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_try_on_request_defaults() {
        let request = TryOnRequest::new("/tmp/h.jpg", "/tmp/g.jpg", "T-shirt");
        assert_eq!(request.person.background, PathBuf::from("/tmp/h.jpg"));
        assert!(request.person.layers.is_empty());
        assert!(request.person.composite.is_none());
        assert!(request.crop_first);
        assert!(!request.auto_crop);
        assert_eq!(request.denoise_steps, 30);
        assert_eq!(request.seed, 42);
    }

    #[test]
    fn test_remote_value_from_json() {
        assert_eq!(
            RemoteValue::from(json!("abc")),
            RemoteValue::Text("abc".to_string())
        );
        assert_eq!(RemoteValue::from(json!(7)).kind(), "number");
        assert_eq!(RemoteValue::from(Value::Null).kind(), "null");
    }

    #[test]
    fn test_file_data_detection() {
        let file = FileData::from_value(&json!({
            "path": "/tmp/gradio/out.png",
            "url": "https://space.hf.space/file=/tmp/gradio/out.png",
            "size": null,
            "is_stream": false
        }))
        .unwrap();
        assert_eq!(file.path, "/tmp/gradio/out.png");
        assert!(file.url.is_some());

        assert!(FileData::from_value(&json!({"name": "x"})).is_none());
        assert!(FileData::from_value(&json!("path")).is_none());
    }

    #[test]
    fn test_uploaded_file_data_serialization() {
        let value = serde_json::to_value(FileData::uploaded("/tmp/gradio/abc/h.jpg", None)).unwrap();
        assert_eq!(
            value,
            json!({"path": "/tmp/gradio/abc/h.jpg", "meta": {"_type": "gradio.FileData"}})
        );
    }
}
