//! Z.AI `images/generations` client.
//!
//! One POST `{model, prompt, quality, size}` returns `{data: [{url}]}`; the
//! first URL is then fetched with a GET and written to a reserved output path.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::http::{self, HttpResponse, Timeouts};
use super::{GeneratedImage, GenerationRequest, ImageService};
use crate::config::{self, AppConfig};
use crate::error::JobError;
use crate::job::Quality;
use crate::output_path;

#[derive(Debug, Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    quality: Quality,
    size: String,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Blocking client for the image generation endpoint. Built once per process
/// and shared by all jobs.
pub struct ZaiClient {
    endpoint: String,
    model: String,
    api_key: String,
    request_timeouts: Timeouts,
    download_timeouts: Timeouts,
}

impl std::fmt::Debug for ZaiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZaiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ZaiClient {
    pub fn new(cfg: &AppConfig, api_key: impl Into<String>) -> Result<Self, JobError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(JobError::MissingApiKey);
        }
        Ok(Self {
            endpoint: cfg.api_endpoint.clone(),
            model: cfg.model.clone(),
            api_key,
            request_timeouts: Timeouts {
                connect: cfg.connect_timeout(),
                total: cfg.request_timeout(),
            },
            download_timeouts: Timeouts {
                connect: cfg.connect_timeout(),
                total: cfg.download_timeout(),
            },
        })
    }

    /// Builds a client with the key from `Z_AI_API_KEY`.
    pub fn from_env(cfg: &AppConfig) -> Result<Self, JobError> {
        let key = config::api_key_from_env().ok_or(JobError::MissingApiKey)?;
        Self::new(cfg, key)
    }

    /// POSTs the generation request and returns the first image URL.
    fn request_image_url(&self, request: &GenerationRequest) -> Result<String, JobError> {
        let body = serde_json::to_vec(&GenerationBody {
            model: &self.model,
            prompt: &request.prompt,
            quality: request.quality,
            size: request.size.to_string(),
        })
        .map_err(|e| JobError::MalformedResponse(format!("encode request: {}", e)))?;

        tracing::debug!(
            endpoint = %self.endpoint,
            size = %request.size,
            quality = %request.quality,
            "requesting image generation"
        );
        let auth = format!("Authorization: Bearer {}", self.api_key);
        let response = http::post_json(&self.endpoint, &[auth], &body, self.request_timeouts)?;
        if !response.is_success() {
            return Err(error_from_response(&response));
        }

        let parsed: GenerationResponse = serde_json::from_slice(&response.body)
            .map_err(|e| JobError::MalformedResponse(format!("Invalid response from API: {}", e)))?;
        let url = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or_else(|| JobError::MalformedResponse("No image URL returned from API".into()))?;

        match url::Url::parse(&url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(url),
            _ => Err(JobError::MalformedResponse(format!(
                "Invalid image URL returned from API: {}",
                url
            ))),
        }
    }

    /// GETs `url` into the already reserved `path`.
    fn download_to(&self, url: &str, path: &Path) -> Result<(), JobError> {
        let response = http::get(url, self.download_timeouts)?;
        if !response.is_success() {
            return Err(JobError::Http {
                status: response.status,
                message: format!("image download failed with status code {}", response.status),
            });
        }
        fs::write(path, &response.body)
            .map_err(|e| JobError::fs(format!("write {}", path.display()), e))?;
        tracing::debug!(path = %path.display(), bytes = response.body.len(), "image saved");
        Ok(())
    }
}

/// Maps a non-2xx response to `Api` if it carries `{error: {message}}`, else `Http`.
fn error_from_response(response: &HttpResponse) -> JobError {
    let structured = serde_json::from_slice::<ErrorResponse>(&response.body)
        .ok()
        .and_then(|e| e.error)
        .map(|e| e.message)
        .filter(|m| !m.is_empty());
    match structured {
        Some(message) => JobError::Api(message),
        None => JobError::Http {
            status: response.status,
            message: format!("request failed with status code {}", response.status),
        },
    }
}

impl ImageService for ZaiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, JobError> {
        let url = self.request_image_url(request)?;

        let filepath = output_path::reserve_output_path(
            &request.output_dir,
            request.output_filename.as_deref(),
            Some(&request.prompt),
        )?;

        if let Err(e) = self.download_to(&url, &filepath) {
            if let Err(rm) = fs::remove_file(&filepath) {
                tracing::warn!(path = %filepath.display(), "could not remove reserved file: {}", rm);
            }
            return Err(e);
        }

        Ok(GeneratedImage {
            filepath,
            url: Some(url),
        })
    }
}
