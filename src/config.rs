pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_DEVICE_ID: &str = "testtest";

/// Where the fish API lives and which device the client acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub device_id: String,
}

impl ApiConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_device_id(mut self, device_id: &str) -> Self {
        self.device_id = device_id.to_string();
        self
    }

    /// Base URL without trailing slashes, ready for path concatenation.
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}
