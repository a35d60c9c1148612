//! Turns image references from the service into absolute, fetchable URLs.
//!
//! References arrive as one of:
//! - a full URL (`https://cdn.example.com/a.jpg`), kept as is
//! - a service path (`/api/fish/image/dev/a.jpg`), re-rooted on the configured base
//! - a bare `deviceId/filename` pair, encoded segment by segment

use crate::config::ApiConfig;

const API_PREFIX: &str = "/api";
const IMAGE_ROUTE: &str = "/fish/image/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    base: String,
}

impl ImageResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.api_base())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve a raw reference. Never fails; empty input gives an empty string.
    pub fn resolve(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        if is_absolute(raw) {
            return raw.to_string();
        }

        let canonical = format!("{}{}", API_PREFIX, IMAGE_ROUTE);
        if raw.starts_with(&canonical) {
            return format!("{}{}", self.base, &raw[API_PREFIX.len()..]);
        }

        let encoded: Vec<String> = raw
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}{}{}", self.base, IMAGE_ROUTE, encoded.join("/"))
    }
}

fn is_absolute(raw: &str) -> bool {
    let lower = raw
        .get(..8)
        .unwrap_or(raw)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ImageResolver {
        ImageResolver::new("http://localhost:3000/api/")
    }

    #[test]
    fn test_empty_reference() {
        assert_eq!(resolver().resolve(""), "");
    }

    #[test]
    fn test_absolute_url_passes_through() {
        assert_eq!(resolver().resolve("http://x/y.jpg"), "http://x/y.jpg");
        assert_eq!(
            resolver().resolve("HTTPS://cdn.example.com/a b.jpg"),
            "HTTPS://cdn.example.com/a b.jpg"
        );
    }

    #[test]
    fn test_service_path_is_rebased() {
        let resolver = ImageResolver::new("https://fish.example.com/v2/api");
        assert_eq!(
            resolver.resolve("/api/fish/image/dev1/My%20Fish.jpg"),
            "https://fish.example.com/v2/api/fish/image/dev1/My%20Fish.jpg"
        );
    }

    #[test]
    fn test_bare_pair_encodes_each_segment() {
        assert_eq!(
            resolver().resolve("dev 1/My Fish.jpg"),
            "http://localhost:3000/api/fish/image/dev%201/My%20Fish.jpg"
        );
    }

    #[test]
    fn test_special_characters_survive() {
        assert_eq!(
            resolver().resolve("dev#1/fish?&=.png"),
            "http://localhost:3000/api/fish/image/dev%231/fish%3F%26%3D.png"
        );
    }

    #[test]
    fn test_same_input_same_output() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("a/b c.jpg"), resolver.resolve("a/b c.jpg"));
    }
}
