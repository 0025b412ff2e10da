use crate::AssetError;
use async_trait::async_trait;

/// Fetches raw asset bytes for a catalog URL.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from the local filesystem. Accepts plain paths and `file://` URLs.
pub struct FileLoader;

#[async_trait]
impl AssetLoader for FileLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        Ok(tokio::fs::read(path).await?)
    }
}

/// Fetches assets over HTTP(S); local paths fall through to [`FileLoader`].
#[cfg(feature = "http")]
pub struct HttpLoader {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl AssetLoader for HttpLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return FileLoader.fetch(url).await;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AssetError::Fetch(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssetError::Fetch(e.to_string()))?;
        tracing::debug!(url, len = bytes.len(), "Fetched asset");
        Ok(bytes.to_vec())
    }
}
