//! Remote model catalog: search records, file variants, and the API seam.

pub mod client;
pub mod error;

use serde::{Deserialize, Serialize};

pub use client::HttpCatalog;
pub use error::CatalogError;

use crate::config::ApiConfig;

/// One catalog entry returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub preview: Option<String>,
    pub filename: String,
}

/// Rewrite every server-relative `preview` into an absolute URL
pub fn resolve_previews(results: &mut [SearchResult], config: &ApiConfig) {
    for result in results.iter_mut() {
        if let Some(preview) = result.preview.as_mut() {
            *preview = config.absolute_url(preview);
        }
    }
}

/// Which server-side rendition of a model to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileVariant {
    #[default]
    FacetsReduced,
    Binary,
    Ascii,
}

impl FileVariant {
    pub const ALL: [FileVariant; 3] = [FileVariant::FacetsReduced, FileVariant::Binary, FileVariant::Ascii];

    pub fn label(&self) -> &'static str {
        match self {
            FileVariant::FacetsReduced => "FACETS-REDUCED",
            FileVariant::Binary => "BINARY",
            FileVariant::Ascii => "ASCII",
        }
    }

    /// Path under `/file/` for `filename` in this variant
    pub fn model_path(&self, filename: &str) -> String {
        match self {
            FileVariant::FacetsReduced => format!("binary/{}", filename.replacen(".stl", "_r.stl", 1)),
            FileVariant::Binary => format!("binary/{}", filename),
            FileVariant::Ascii => filename.to_string(),
        }
    }
}

/// The two catalog endpoints the viewer depends on
pub trait CatalogApi: Send + Sync {
    /// `GET /search?query=...`, previews already absolute
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// `GET /file/{path}`, raw body
    fn fetch_model(&self, path: &str) -> Result<Vec<u8>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_model_paths_per_variant() {
        assert_eq!(FileVariant::FacetsReduced.model_path("part.stl"), "binary/part_r.stl");
        assert_eq!(FileVariant::Binary.model_path("part.stl"), "binary/part.stl");
        assert_eq!(FileVariant::Ascii.model_path("part.stl"), "part.stl");
    }

    #[test]
    fn test_facets_reduced_only_rewrites_first_extension() {
        assert_eq!(FileVariant::FacetsReduced.model_path("a.stl.stl"), "binary/a_r.stl.stl");
        assert_eq!(FileVariant::FacetsReduced.model_path("mesh.obj"), "binary/mesh.obj");
    }

    #[test]
    fn test_default_variant_is_facets_reduced() {
        assert_eq!(FileVariant::default(), FileVariant::FacetsReduced);
    }

    #[test]
    fn test_search_result_deserializes_null_preview() {
        let json = r#"[
            {"id": "gear", "display_name": "Gear", "preview": "/file/gear.png", "filename": "gear.stl"},
            {"id": "hinge", "display_name": "Hinge", "preview": null, "filename": "hinge.stl"}
        ]"#;
        let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results[0].preview.as_deref(), Some("/file/gear.png"));
        assert_eq!(results[1].preview, None);
    }

    #[test]
    fn test_resolve_previews() {
        let config = ApiConfig::resolve(BuildMode::Development, None);
        let mut results = vec![
            SearchResult {
                id: "gear".into(),
                display_name: "Gear".into(),
                preview: Some("/file/gear.png".into()),
                filename: "gear.stl".into(),
            },
            SearchResult {
                id: "hinge".into(),
                display_name: "Hinge".into(),
                preview: None,
                filename: "hinge.stl".into(),
            },
        ];
        resolve_previews(&mut results, &config);
        assert_eq!(results[0].preview.as_deref(), Some("http://127.0.0.1:5000/file/gear.png"));
        assert_eq!(results[1].preview, None);
    }
}
