//! Remote image generation service.
//!
//! The job runner only depends on the [`ImageService`] trait; [`ZaiClient`]
//! is the libcurl-backed implementation for the Z.AI images endpoint.

mod http;
mod zai;

use std::path::PathBuf;

use crate::error::JobError;
use crate::job::Quality;
use crate::size::SizeSpec;

pub use http::{HttpResponse, Timeouts};
pub use zai::ZaiClient;

/// Everything the service needs to produce one image on disk.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub quality: Quality,
    pub size: SizeSpec,
    /// Directory the image is written into.
    pub output_dir: PathBuf,
    /// User-suggested filename; sanitized before use.
    pub output_filename: Option<String>,
}

/// A generated image that has been written locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub filepath: PathBuf,
    /// Where the service hosted the image, if it said.
    pub url: Option<String>,
}

/// Generates an image and stores it under `request.output_dir`.
///
/// Implementations block; the job runner calls them from the blocking pool.
/// The output path must be chosen with [`crate::output_path::reserve_output_path`].
pub trait ImageService: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, JobError>;
}
