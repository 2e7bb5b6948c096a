// API client module: the `Gateway` trait is the seam every command talks
// through, and `ApiClient` is its blocking reqwest implementation against
// the OpenRelik server. Requests are authenticated with the `X-API-Key`
// header; responses come back as raw status + body so each command decides
// what counts as success.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::ui;
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

const API_KEY_HEADER: &str = "x-api-key";

/// Upload chunk size used by the resumable upload endpoint.
pub const UPLOAD_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Status and body of one HTTP exchange, not yet judged.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body. A 2xx with an unexpected shape is a `Decode` error.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| CliError::Decode(e.to_string()))
    }

    /// Keep the response if the server accepted the request, otherwise turn
    /// it into `NotFound` (404) or `Upstream` carrying the server's message.
    /// `what` names the resource for the error text, e.g. `file 12`.
    pub fn into_success(self, what: impl Display) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error(what))
        }
    }

    pub fn into_error(self, what: impl Display) -> CliError {
        let message = server_message(&self.body);
        if self.status == 404 {
            CliError::NotFound(format!("{what} ({message})"))
        } else {
            CliError::Upstream {
                status: self.status,
                message: format!("{what}: {message}"),
            }
        }
    }
}

/// Pull a human readable message out of an error body. The server answers
/// errors with `{"detail": ...}`; anything else is shown as text.
fn server_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        match value.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(detail) => return detail.to_string(),
            None => {}
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "empty response".into()
    } else {
        text
    }
}

/// Operations the commands need from the server.
pub trait Gateway {
    fn get(&self, path: &str) -> Result<ApiResponse>;
    fn post_json(&self, path: &str, body: &Value) -> Result<ApiResponse>;
    fn patch_json(&self, path: &str, body: &Value) -> Result<ApiResponse>;
    /// PATCH with a JSON body sent verbatim, no re-serialization.
    fn patch_raw(&self, path: &str, body: &str) -> Result<ApiResponse>;
    fn delete(&self, path: &str) -> Result<ApiResponse>;
    /// Stream a binary body into `out`, returning the number of bytes.
    fn download(&self, path: &str, out: &mut dyn Write) -> Result<u64>;
    /// Upload a local file into a folder and return the new file id.
    fn upload_file(&self, file_path: &Path, folder_id: i64) -> Result<i64>;
}

/// Blocking HTTP client bound to one server and one API key.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from resolved configuration. The key is installed as
    /// a default header so no request can leave without it.
    pub fn new(config: &Config) -> Result<Self> {
        let mut key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            CliError::invalid_args("API key contains characters not allowed in an HTTP header")
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(ApiClient {
            client,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, method: &str, path: &str, req: RequestBuilder) -> Result<ApiResponse> {
        debug!(method, path, "request");
        let res = req.send()?;
        let status = res.status().as_u16();
        let body = res.bytes()?.to_vec();
        debug!(method, path, status, bytes = body.len(), "response");
        Ok(ApiResponse::new(status, body))
    }
}

impl Gateway for ApiClient {
    fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send("GET", path, self.client.get(self.url(path)))
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send("POST", path, self.client.post(self.url(path)).json(body))
    }

    fn patch_json(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send("PATCH", path, self.client.patch(self.url(path)).json(body))
    }

    fn patch_raw(&self, path: &str, body: &str) -> Result<ApiResponse> {
        let req = self
            .client
            .patch(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());
        self.send("PATCH", path, req)
    }

    fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send("DELETE", path, self.client.delete(self.url(path)))
    }

    fn download(&self, path: &str, out: &mut dyn Write) -> Result<u64> {
        debug!(method = "GET", path, "download");
        let mut res = self.client.get(self.url(path)).send()?;
        let status = res.status().as_u16();
        if !res.status().is_success() {
            let body = res.bytes()?.to_vec();
            return Err(ApiResponse::new(status, body).into_error(path));
        }

        let spinner = ui::download_spinner(res.content_length());
        let mut writer = spinner.wrap_write(out);
        let written = std::io::copy(&mut res, &mut writer)?;
        spinner.finish_and_clear();
        debug!(path, bytes = written, "download complete");
        Ok(written)
    }

    fn upload_file(&self, file_path: &Path, folder_id: i64) -> Result<i64> {
        let mut file = File::open(file_path).map_err(|e| CliError::io_at(file_path, e))?;
        let total_size = file
            .metadata()
            .map_err(|e| CliError::io_at(file_path, e))?
            .len();
        if total_size == 0 {
            return Err(CliError::invalid_args(format!(
                "{} is empty, nothing to upload",
                file_path.display()
            )));
        }
        let file_name = file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CliError::invalid_args("upload path has no usable file name"))?
            .to_string();

        let plan = ChunkPlan::new(total_size, UPLOAD_CHUNK_SIZE);
        let identifier = Uuid::new_v4().simple().to_string();
        let progress = ui::upload_progress(total_size, &file_name);

        let mut last = None;
        for chunk_number in 1..=plan.total_chunks {
            let len = plan.chunk_len(chunk_number);
            let mut chunk = vec![0u8; len as usize];
            file.read_exact(&mut chunk)
                .map_err(|e| CliError::io_at(file_path, e))?;

            let params = vec![
                ("resumableChunkNumber", chunk_number.to_string()),
                ("resumableTotalChunks", plan.total_chunks.to_string()),
                ("resumableChunkSize", plan.chunk_size.to_string()),
                ("resumableCurrentChunkSize", len.to_string()),
                ("resumableTotalSize", total_size.to_string()),
                ("resumableIdentifier", identifier.clone()),
                ("resumableFilename", file_name.clone()),
                ("resumableRelativePath", file_name.clone()),
                ("folder_id", folder_id.to_string()),
            ];
            let part = multipart::Part::bytes(chunk)
                .file_name(file_name.clone())
                .mime_str("application/octet-stream")?;
            let form = multipart::Form::new().part("file", part);
            let req = self
                .client
                .post(self.url("/files/upload"))
                .query(&params)
                .multipart(form);

            let response = self
                .send("POST", "/files/upload", req)?
                .into_success(format!("upload of {file_name} (chunk {chunk_number})"))?;
            progress.inc(len);
            last = Some(response);
        }
        progress.finish_and_clear();

        let created: Value = last
            .ok_or_else(|| CliError::Decode("no chunk was uploaded".into()))?
            .json()?;
        created
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| CliError::Decode("upload response carries no file id".into()))
    }
}

/// How a file of `total_size` bytes splits into upload chunks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkPlan {
    pub total_size: u64,
    pub chunk_size: u64,
    pub total_chunks: u64,
}

impl ChunkPlan {
    pub fn new(total_size: u64, chunk_size: u64) -> Self {
        ChunkPlan {
            total_size,
            chunk_size,
            total_chunks: total_size.div_ceil(chunk_size),
        }
    }

    /// Size of the 1-based chunk `n`; only the last one may be short.
    pub fn chunk_len(&self, n: u64) -> u64 {
        let start = (n - 1) * self.chunk_size;
        self.chunk_size.min(self.total_size - start)
    }
}
