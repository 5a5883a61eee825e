use log::*;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// The root of the collaborator backend, e.g. "https://api.example.com". Endpoint paths are appended verbatim.
    pub base_url: String,
    /// The LINE user id that receives stock withdrawal requests.
    pub line_recipient: Option<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), line_recipient: None }
    }
}

impl MarketplaceConfig {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), line_recipient: None }
    }

    pub fn with_line_recipient<S: Into<String>>(mut self, recipient: S) -> Self {
        self.line_recipient = Some(recipient.into());
        self
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("OD_BASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ OD_BASE_URL not set, using {DEFAULT_BASE_URL} as default");
            DEFAULT_BASE_URL.to_string()
        });
        let line_recipient = std::env::var("OD_LINE_RECIPIENT").ok().filter(|s| !s.trim().is_empty());
        if line_recipient.is_none() {
            info!("🪛️ OD_LINE_RECIPIENT is not set. Stock withdrawal requests cannot be sent.");
        }
        Self { line_recipient, ..Self::new(&base_url) }
    }
}
