//! HTTP client for the course-material API.
//!
//! [`MaterialApi`] is the seam the screen workflow talks to; [`HttpMaterialApi`]
//! is the reqwest-backed implementation. Front ends that spawn requests onto
//! tokio need the returned futures to be `Send`, so the trait spells that out.

use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};

use crate::{ApiError, RemoteFileRecord, UploadBatch};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_UPLOAD_PATH: &str = "/api/material/upload/";
pub const DEFAULT_LIST_PATH: &str = "/api/material/view/";
/// `{id}` is replaced by the record identifier.
pub const DEFAULT_DELETE_PATH: &str = "/api/material/delete/{id}/";

/// Multipart field name shared by every uploaded file.
pub const FILES_FIELD: &str = "files";

/// Operations the upload screen needs from the remote API.
pub trait MaterialApi: Send + Sync {
    /// Fetch every uploaded file record.
    fn list_files(&self) -> impl Future<Output = Result<Vec<RemoteFileRecord>, ApiError>> + Send;

    /// Upload a batch as one multipart request. The response body is returned
    /// as parsed JSON but is otherwise opaque.
    fn upload(
        &self,
        batch: &UploadBatch,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send;

    /// Delete one record by identifier.
    fn delete_file(&self, id: u64) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Endpoint paths, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub upload: String,
    pub list: String,
    pub delete: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            upload: DEFAULT_UPLOAD_PATH.to_string(),
            list: DEFAULT_LIST_PATH.to_string(),
            delete: DEFAULT_DELETE_PATH.to_string(),
        }
    }
}

impl Endpoints {
    pub fn delete_path(&self, id: u64) -> String {
        self.delete.replace("{id}", &id.to_string())
    }
}

/// reqwest-backed [`MaterialApi`].
#[derive(Debug, Clone)]
pub struct HttpMaterialApi {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

/// Builder for configuring an [`HttpMaterialApi`].
#[derive(Debug)]
pub struct HttpMaterialApiBuilder {
    base_url: String,
    endpoints: Endpoints,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl HttpMaterialApiBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            endpoints: Endpoints::default(),
            timeout: None,
            client: None,
        }
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Per-request timeout. Unset means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom reqwest Client (TLS, proxies, ...). Overrides `timeout`.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpMaterialApi, ApiError> {
        Url::parse(&self.base_url).map_err(|e| {
            ApiError::Configuration(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;
        for path in [
            &self.endpoints.upload,
            &self.endpoints.list,
            &self.endpoints.delete,
        ] {
            if !path.starts_with('/') {
                return Err(ApiError::Configuration(format!(
                    "endpoint path {path:?} must start with '/'"
                )));
            }
        }
        if !self.endpoints.delete.contains("{id}") {
            return Err(ApiError::Configuration(format!(
                "delete path {:?} has no {{id}} placeholder",
                self.endpoints.delete
            )));
        }

        let client = match self.client {
            Some(c) => c,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| ApiError::Configuration(e.to_string()))?
            }
        };

        Ok(HttpMaterialApi {
            client,
            base_url: self.base_url,
            endpoints: self.endpoints,
        })
    }
}

impl HttpMaterialApi {
    pub fn builder(base_url: impl Into<String>) -> HttpMaterialApiBuilder {
        HttpMaterialApiBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into [`ApiError::Http`].
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn build_form(batch: &UploadBatch) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for file in &batch.files {
            let bytes = file.read().await?;
            form = form.part(FILES_FIELD, Part::bytes(bytes).file_name(file.name.clone()));
        }
        Ok(form
            .text("course", batch.course.clone())
            .text("subject", batch.subject.clone()))
    }
}

impl MaterialApi for HttpMaterialApi {
    async fn list_files(&self) -> Result<Vec<RemoteFileRecord>, ApiError> {
        let url = self.build_url(&self.endpoints.list);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let records = response
            .json::<Vec<RemoteFileRecord>>()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        tracing::debug!(count = records.len(), "fetched file list");
        Ok(records)
    }

    async fn upload(&self, batch: &UploadBatch) -> Result<serde_json::Value, ApiError> {
        let url = self.build_url(&self.endpoints.upload);
        let form = Self::build_form(batch).await?;
        tracing::info!(
            files = batch.files.len(),
            course = %batch.course,
            subject = %batch.subject,
            "uploading batch"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let response = Self::check_status(response).await?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    async fn delete_file(&self, id: u64) -> Result<(), ApiError> {
        let url = self.build_url(&self.endpoints.delete_path(id));
        tracing::info!(id, "deleting file");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }
}
