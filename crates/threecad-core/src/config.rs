//! Build mode and API base URL resolution.

/// Address of the catalog server during development
pub const DEV_API_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Debug builds are development builds
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

/// Where the catalog API lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Set when a production build had no origin to serve from
    pub used_fallback: bool,
}

impl ApiConfig {
    /// Production builds talk to the origin they were served from; development builds to the local server.
    pub fn resolve(mode: BuildMode, origin: Option<&str>) -> Self {
        match (mode, origin) {
            (BuildMode::Production, Some(origin)) if !origin.trim().is_empty() => Self {
                base_url: origin.trim().trim_end_matches('/').to_string(),
                used_fallback: false,
            },
            (BuildMode::Production, _) => Self {
                base_url: DEV_API_BASE_URL.to_string(),
                used_fallback: true,
            },
            (BuildMode::Development, _) => Self {
                base_url: DEV_API_BASE_URL.to_string(),
                used_fallback: false,
            },
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    pub fn file_url(&self, path: &str) -> String {
        format!("{}/file/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolve a server-relative path (such as a preview) against the base URL
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::resolve(BuildMode::current(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_uses_local_server() {
        let config = ApiConfig::resolve(BuildMode::Development, Some("https://models.example.com"));
        assert_eq!(config.base_url, DEV_API_BASE_URL);
        assert!(!config.used_fallback);
    }

    #[test]
    fn test_production_uses_origin() {
        let config = ApiConfig::resolve(BuildMode::Production, Some("https://models.example.com/"));
        assert_eq!(config.base_url, "https://models.example.com");
        assert_eq!(config.search_url(), "https://models.example.com/search");
    }

    #[test]
    fn test_production_without_origin_falls_back() {
        let config = ApiConfig::resolve(BuildMode::Production, None);
        assert_eq!(config.base_url, DEV_API_BASE_URL);
        assert!(config.used_fallback);
    }

    #[test]
    fn test_absolute_url() {
        let config = ApiConfig::resolve(BuildMode::Development, None);
        assert_eq!(config.absolute_url("/file/gear.png"), "http://127.0.0.1:5000/file/gear.png");
        assert_eq!(config.absolute_url("file/gear.png"), "http://127.0.0.1:5000/file/gear.png");
        assert_eq!(config.absolute_url("https://cdn.example.com/g.png"), "https://cdn.example.com/g.png");
    }

    #[test]
    fn test_file_url() {
        let config = ApiConfig::resolve(BuildMode::Development, None);
        assert_eq!(config.file_url("binary/part_r.stl"), "http://127.0.0.1:5000/file/binary/part_r.stl");
    }
}
