//! Downloads images named by a `remote_image` URL.
//!
//! The fetch runs before the store is touched, so a failed download never
//! leaves a half-saved record behind.

use std::time::Duration;

use stockroom_api::ServiceError;
use stockroom_core::{ImageFormat, RemoteImage};
use stockroom_runtime_config::RemoteImageSettings;

const FIELD: &str = "remote_image";

#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    settings: RemoteImageSettings,
}

impl ImageFetcher {
    pub fn new(settings: RemoteImageSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("stockroom/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, settings })
    }

    /// Download `url` if one was given.
    pub async fn fetch_opt(&self, url: Option<&str>) -> Result<Option<RemoteImage>, ServiceError> {
        match url {
            Some(url) => self.fetch(url).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<RemoteImage, ServiceError> {
        if !self.settings.enabled {
            return Err(ServiceError::field(
                FIELD,
                "Downloading images from remote URL is not enabled",
            ));
        }
        let url = parse_url(url)?;
        let max = self.settings.max_size_bytes();

        let mut resp = self.client.get(url.clone()).send().await.map_err(download_failed)?;
        if !resp.status().is_success() {
            return Err(ServiceError::field(
                FIELD,
                format!("Failed to download image: HTTP {}", resp.status()),
            ));
        }
        if resp.content_length().is_some_and(|len| len > max) {
            return Err(too_large(max));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(download_failed)? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() as u64 > max {
                return Err(too_large(max));
            }
        }
        let image = into_image(bytes)?;
        tracing::info!(
            "Downloaded {} image ({} bytes) from {url}",
            image.format_or_default(),
            image.bytes.len()
        );
        Ok(image)
    }
}

fn parse_url(raw: &str) -> Result<url::Url, ServiceError> {
    let url = url::Url::parse(raw.trim()).map_err(|_| ServiceError::field(FIELD, "Enter a valid URL."))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ServiceError::field(FIELD, "Enter a valid URL."));
    }
    Ok(url)
}

fn download_failed(e: reqwest::Error) -> ServiceError {
    tracing::warn!("remote image download failed: {e}");
    ServiceError::field(FIELD, format!("Failed to download image: {e}"))
}

fn too_large(max: u64) -> ServiceError {
    ServiceError::field(
        FIELD,
        format!("Image size exceeds maximum allowable size ({max} bytes)"),
    )
}

/// Accept the body only if it carries a known image signature.
fn into_image(bytes: Vec<u8>) -> Result<RemoteImage, ServiceError> {
    if ImageFormat::sniff(&bytes).is_none() {
        return Err(ServiceError::field(
            FIELD,
            "Supplied URL is not a valid image file",
        ));
    }
    Ok(RemoteImage::new(bytes))
}
