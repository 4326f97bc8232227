use super::sse::{SseEvent, SseParser};
use super::types::*;
use crate::{Error, Result, config::RemoteConfig};
use async_trait::async_trait;
use reqwest::{Response, multipart};
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Remote inference provider performing the garment transfer.
#[async_trait]
pub trait TryOnClient: Send + Sync {
    async fn try_on(&self, request: TryOnRequest) -> Result<RemoteResult>;
}

/// Client for a Gradio app (typically a Hugging Face Space) exposing a
/// try-on endpoint through the queued `/call` API.
#[derive(Debug, Clone)]
pub struct GradioClient {
    http: reqwest::Client,
    base_url: String,
    api_prefix: String,
    api_name: String,
    token: String,
}

impl GradioClient {
    /// Builds the client, resolving the Space host through the hub unless
    /// `base_url` is configured.
    pub async fn connect(config: RemoteConfig) -> Result<Self> {
        let http = build_http_client(&config)?;

        let base_url = match config.base_url.clone() {
            Some(url) => url,
            None => resolve_space_host(&http, &config).await?,
        };

        info!("Using remote try-on endpoint {}{}", base_url, config.api_name);

        Ok(Self::from_parts(http, base_url, &config))
    }

    /// Builds the client against a known base URL without any network call.
    pub fn with_base_url(config: RemoteConfig, base_url: impl Into<String>) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self::from_parts(http, base_url.into(), &config))
    }

    fn from_parts(http: reqwest::Client, base_url: String, config: &RemoteConfig) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: config.api_prefix.trim_end_matches('/').to_string(),
            api_name: config.api_name.trim_start_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    /// Uploads a local file, returning the path the remote side stored it under.
    async fn upload(&self, path: &Path) -> Result<FileData> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.jpg".to_string());

        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("image/jpeg")?;
        let form = multipart::Form::new().part("files", part);

        let response = self
            .http
            .post(self.endpoint("/upload"))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::remote(format!("Failed to upload file: {}", e)))?;
        let response = check_status(response, "upload").await?;

        let mut paths: Vec<String> = response
            .json()
            .await
            .map_err(|e| Error::remote(format!("Failed to parse upload response: {}", e)))?;

        if paths.is_empty() {
            return Err(Error::remote("Upload response contained no file paths"));
        }

        Ok(FileData::uploaded(paths.swap_remove(0), Some(file_name)))
    }

    async fn submit(&self, data: Value) -> Result<String> {
        let url = self.endpoint(&format!("/call/{}", self.api_name));
        trace!("Submitting call to {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|e| Error::remote(format!("Failed to submit call: {}", e)))?;
        let response = check_status(response, "call").await?;

        let accepted: CallAccepted = response
            .json()
            .await
            .map_err(|e| Error::remote(format!("Failed to parse call response: {}", e)))?;

        Ok(accepted.event_id)
    }

    /// Follows the event stream of a queued call until it completes.
    async fn await_result(&self, event_id: &str) -> Result<Vec<Value>> {
        let url = self.endpoint(&format!("/call/{}/{}", self.api_name, event_id));

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::remote(format!("Failed to read call result: {}", e)))?;
        let mut response = check_status(response, "result stream").await?;

        let mut parser = SseParser::new();
        while let Some(chunk) = response.chunk().await? {
            for event in parser.push(&chunk) {
                if let Some(result) = handle_event(event)? {
                    return Ok(result);
                }
            }
        }

        if let Some(event) = parser.finish() {
            if let Some(result) = handle_event(event)? {
                return Ok(result);
            }
        }

        Err(Error::remote(
            "Remote event stream ended before the call completed",
        ))
    }

    async fn download(&self, file: &FileData) -> Result<Vec<u8>> {
        let url = match &file.url {
            Some(url) => url.clone(),
            None => self.endpoint(&format!("/file={}", file.path)),
        };

        debug!("Downloading result file from {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::remote(format!("Failed to download result: {}", e)))?;
        let response = check_status(response, "download").await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Turns the raw result sequence into typed values. A file reference in
    /// the first position is fetched so callers receive its bytes.
    async fn decode_result(&self, values: Vec<Value>) -> Result<RemoteResult> {
        let mut decoded = Vec::with_capacity(values.len());

        for (index, value) in values.into_iter().enumerate() {
            let file = if index == 0 {
                FileData::from_value(&value)
            } else {
                None
            };

            match file {
                Some(file) => decoded.push(RemoteValue::Bytes(self.download(&file).await?)),
                None => decoded.push(RemoteValue::from(value)),
            }
        }

        Ok(decoded)
    }

    fn encode_arguments(
        request: &TryOnRequest,
        background: FileData,
        layers: Vec<FileData>,
        composite: Option<FileData>,
        garment: FileData,
    ) -> Result<Value> {
        Ok(json!([
            {
                "background": serde_json::to_value(background)?,
                "layers": serde_json::to_value(layers)?,
                "composite": serde_json::to_value(composite)?,
            },
            serde_json::to_value(garment)?,
            request.description,
            request.crop_first,
            request.auto_crop,
            request.denoise_steps,
            request.seed,
        ]))
    }
}

#[async_trait]
impl TryOnClient for GradioClient {
    async fn try_on(&self, request: TryOnRequest) -> Result<RemoteResult> {
        let background = self.upload(&request.person.background).await?;

        let mut layers = Vec::with_capacity(request.person.layers.len());
        for layer in &request.person.layers {
            layers.push(self.upload(layer).await?);
        }

        let composite = match &request.person.composite {
            Some(path) => Some(self.upload(path).await?),
            None => None,
        };

        let garment = self.upload(&request.garment).await?;

        let data = Self::encode_arguments(&request, background, layers, composite, garment)?;
        let event_id = self.submit(data).await?;
        debug!("Remote call queued with event id {}", event_id);

        let values = self.await_result(&event_id).await?;
        debug!("Remote call {} returned {} values", event_id, values.len());

        self.decode_result(values).await
    }
}

fn build_http_client(config: &RemoteConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

async fn resolve_space_host(http: &reqwest::Client, config: &RemoteConfig) -> Result<String> {
    let url = format!(
        "{}/api/spaces/{}/host",
        config.hub_url.trim_end_matches('/'),
        config.space
    );

    debug!("Resolving host for space {}", config.space);

    let response = http
        .get(url)
        .bearer_auth(&config.token)
        .send()
        .await
        .map_err(|e| Error::remote(format!("Failed to resolve space host: {}", e)))?;
    let response = check_status(response, "space host lookup").await?;

    let host: SpaceHost = response
        .json()
        .await
        .map_err(|e| Error::remote(format!("Failed to parse space host: {}", e)))?;

    Ok(host.host)
}

async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::remote(format!(
        "Remote {} failed with status {}: {}",
        what,
        status,
        body.trim()
    )))
}

/// Returns the result payload for a `complete` event, an error for an
/// `error` event, and `None` for progress events.
fn handle_event(event: SseEvent) -> Result<Option<Vec<Value>>> {
    match event.event.as_str() {
        "complete" => {
            let values: Vec<Value> = serde_json::from_str(&event.data)?;
            Ok(Some(values))
        }
        "error" => {
            let message = match serde_json::from_str::<Value>(&event.data) {
                Ok(Value::String(s)) => s,
                Ok(Value::Null) => "Remote endpoint reported an error".to_string(),
                _ if event.data.trim().is_empty() => {
                    "Remote endpoint reported an error".to_string()
                }
                _ => event.data,
            };
            Err(Error::remote(message))
        }
        other => {
            trace!("Skipping {} event", other);
            Ok(None)
        }
    }
}
