use crate::error::{Result, ServiceError};

/// Resolves stored file keys to URLs served by the object store or CDN in
/// front of it. Uploads go directly to the store; this service only ever
/// hands out read links.
#[derive(Debug, Clone)]
pub struct ObjectStorage {
    public_base_url: String,
}

impl ObjectStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let public_base_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:9000/assethub".to_string());
        Self::new(public_base_url)
    }

    pub fn download_url(&self, file_key: &str) -> Result<String> {
        let base = self.public_base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(ServiceError::Storage(
                "storage public URL is not configured".to_string(),
            ));
        }

        Ok(format!("{}/{}", base, file_key.trim_start_matches('/')))
    }
}
