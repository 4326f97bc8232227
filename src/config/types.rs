use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Request body limit. Uploads are unbounded unless set.
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
    /// Directory for staged uploads. Falls back to the system temp dir.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_space")]
    pub space: String,
    /// Skips host resolution through the hub when set.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    /// Path prefix of the Gradio API, e.g. `/gradio_api` on Gradio 5.
    #[serde(default)]
    pub api_prefix: String,
    #[serde(default = "default_api_name")]
    pub api_name: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Bearer credential. Only ever populated from the environment.
    #[serde(skip)]
    pub token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            static_dir: default_static_dir(),
            cors_origin: default_cors_origin(),
            max_upload_bytes: None,
            staging_dir: None,
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            space: default_space(),
            base_url: None,
            hub_url: default_hub_url(),
            api_prefix: String::new(),
            api_name: default_api_name(),
            timeout_secs: None,
            token: String::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_space() -> String {
    "JOAO121223/IDM-VTON".to_string()
}

fn default_hub_url() -> String {
    "https://huggingface.co".to_string()
}

fn default_api_name() -> String {
    "/tryon".to_string()
}
