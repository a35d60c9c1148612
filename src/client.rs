use crate::config::ApiConfig;
use crate::error::{FetchError, Result};
use crate::record::{CanonicalCatch, to_catches};
use crate::resolve::ImageResolver;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value, json};
use std::path::Path;

const DEFAULT_UPLOAD_NAME: &str = "upload.jpg";

/// An image to send to `POST /fish/upload`.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        let file_name = if file_name.is_empty() {
            DEFAULT_UPLOAD_NAME
        } else {
            file_name
        };
        Self {
            file_name: file_name.to_string(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = Some(mime_type.to_string());
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_UPLOAD_NAME);
        Ok(Self::new(file_name, bytes))
    }

    fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.mime_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|source| FetchError::MimeType { mime, source }),
            None => Ok(part),
        }
    }
}

/// Async client for the fish identification service.
///
/// Every call issues exactly one request; nothing is cached or retried.
#[derive(Debug, Clone)]
pub struct FishApiClient {
    client: Client,
    config: ApiConfig,
    resolver: ImageResolver,
}

impl FishApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        let resolver = ImageResolver::from_config(&config);
        Self {
            client,
            config,
            resolver,
        }
    }

    /// Same connection pool, different device.
    pub fn for_device(&self, device_id: &str) -> Self {
        Self::with_client(
            self.client.clone(),
            self.config.clone().with_device_id(device_id),
        )
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn device_id(&self) -> &str {
        &self.config.device_id
    }

    pub fn resolver(&self) -> &ImageResolver {
        &self.resolver
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base(), path)
    }

    /// Send one request and decode its JSON body.
    ///
    /// An unparsable body reads as `Value::Null`; a non-success status is a
    /// [`FetchError::Request`] carrying the server's `message` if it sent one.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let (status, body) = send(request).await?;
        if !status.is_success() {
            let message = failure_message(&body, status.as_u16());
            warn!("Request failed with {}: {}", status, message);
            return Err(FetchError::request(message, status.as_u16(), body));
        }
        Ok(body)
    }

    /// Multipart variant of [`execute`](Self::execute) for uploads.
    ///
    /// The transport supplies the boundary-bearing content type. An
    /// unparsable body reads as an empty object.
    pub async fn execute_multipart(&self, url: &str, form: Form) -> Result<Value> {
        let (status, body) = send(self.client.post(url).multipart(form)).await?;
        let body = if body.is_null() {
            Value::Object(Map::new())
        } else {
            body
        };
        if !status.is_success() {
            let message = format!("Upload failed: {}", failure_message(&body, status.as_u16()));
            warn!("{}", message);
            return Err(FetchError::request(message, status.as_u16(), body));
        }
        Ok(body)
    }

    /// `POST /device/register`
    pub async fn register_device(&self) -> Result<Value> {
        let request = self
            .client
            .post(self.url("/device/register"))
            .json(&json!({ "deviceId": self.device_id() }));
        self.execute(request).await
    }

    /// `GET /device/{id}`
    pub async fn get_device(&self) -> Result<Value> {
        let url = self.url(&format!("/device/{}", encode(self.device_id())));
        self.execute(self.client.get(url)).await
    }

    /// `GET /fish/{deviceId}`, normalized into canonical catches.
    pub async fn get_fish_by_device(&self) -> Result<Vec<CanonicalCatch>> {
        let url = self.url(&format!("/fish/{}", encode(self.device_id())));
        let payload = self.execute(self.client.get(url)).await?;
        let catches = to_catches(payload, &self.resolver);
        debug!("Device {} has {} catches", self.device_id(), catches.len());
        Ok(catches)
    }

    /// `GET /fish/name/{name}`
    pub async fn check_fish_by_name(&self, name: &str) -> Result<Value> {
        let url = self.url(&format!("/fish/name/{}", encode(name)));
        self.execute(self.client.get(url)).await
    }

    /// `POST /fish/add-existing/{deviceId}/{name}`
    pub async fn add_existing_fish_to_device(&self, name: &str, image_url: &str) -> Result<Value> {
        let url = self.url(&format!(
            "/fish/add-existing/{}/{}",
            encode(self.device_id()),
            encode(name)
        ));
        let request = self
            .client
            .post(url)
            .json(&json!({ "imageUrl": image_url }));
        self.execute(request).await
    }

    /// `POST /fish/upload` with `deviceId` and `file` form fields.
    ///
    /// Answers `{ success, message, deviceId, fileMeta, fish }`.
    pub async fn identify_fish(&self, file: UploadFile) -> Result<Value> {
        debug!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());
        let form = Form::new()
            .text("deviceId", self.device_id().to_string())
            .part("file", file.into_part()?);
        self.execute_multipart(&self.url("/fish/upload"), form).await
    }

    /// `POST /chat/{deviceId}`
    pub async fn send_chat_message(&self, message: &str) -> Result<Value> {
        let url = self.url(&format!("/chat/{}", encode(self.device_id())));
        let request = self.client.post(url).json(&json!({ "message": message }));
        self.execute(request).await
    }
}

async fn send(builder: RequestBuilder) -> Result<(reqwest::StatusCode, Value)> {
    let (client, request) = builder.build_split();
    let request = request?;
    debug!("{} {}", request.method(), request.url());

    let response = client.execute(request).await?;
    let status = response.status();
    let body = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            if !bytes.is_empty() {
                debug!("Response body is not JSON: {}", e);
            }
            Value::Null
        }),
        Err(e) => {
            debug!("Could not read response body: {}", e);
            Value::Null
        }
    };
    Ok((status, body))
}

fn failure_message(body: &Value, status: u16) -> String {
    match body.get("message") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => format!("HTTP {}", status),
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
