//! Blocking HTTP implementation of the catalog API.
//!
//! Calls are made from background tasks (see `tasks.rs`), never from the UI thread.

use reqwest::blocking::{Client, RequestBuilder, Response};

use super::{CatalogApi, CatalogError, SearchResult, resolve_previews};
use crate::config::ApiConfig;

pub struct HttpCatalog {
    config: ApiConfig,
    client: Client,
}

impl HttpCatalog {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn get(&self, builder: RequestBuilder) -> Result<Response, CatalogError> {
        let request = builder.build()?;
        let url = request.url().to_string();
        log::debug!("Fetch: {}", url);
        let response = self.client.execute(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response)
    }
}

impl CatalogApi for HttpCatalog {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let request = self.client.get(self.config.search_url()).query(&[("query", query)]);
        let response = self.get(request)?;
        let body = response.bytes()?;
        let mut results: Vec<SearchResult> = serde_json::from_slice(&body)?;
        resolve_previews(&mut results, &self.config);
        Ok(results)
    }

    fn fetch_model(&self, path: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.get(self.client.get(self.config.file_url(path)))?;
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve exactly one canned response and hand back the request line
    fn one_shot_server(status_line: &'static str, content_type: &'static str, body: Vec<u8>) -> (ApiConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                content_type,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();
            request_line.trim_end().to_string()
        });
        let config = ApiConfig {
            base_url: format!("http://{}", addr),
            used_fallback: false,
        };
        (config, handle)
    }

    #[test]
    fn test_search_resolves_previews() {
        let body = br#"[{"id":"gear","display_name":"Gear","preview":"/file/gear.png","filename":"gear.stl"}]"#.to_vec();
        let (config, server) = one_shot_server("200 OK", "application/json", body);
        let base = config.base_url.clone();
        let catalog = HttpCatalog::new(config);

        let results = catalog.search("gear box").unwrap();
        let request_line = server.join().unwrap();

        assert!(request_line.starts_with("GET /search?query=gear"), "{request_line}");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].preview, Some(format!("{}/file/gear.png", base)));
        assert_eq!(results[0].filename, "gear.stl");
    }

    #[test]
    fn test_search_error_status() {
        let (config, server) = one_shot_server("500 Internal Server Error", "text/plain", b"boom".to_vec());
        let catalog = HttpCatalog::new(config);

        let result = catalog.search("gear");
        server.join().unwrap();

        assert!(matches!(result, Err(CatalogError::Status { status: 500, .. })));
    }

    #[test]
    fn test_status_error_names_encoded_url() {
        let (config, server) = one_shot_server("503 Service Unavailable", "text/plain", Vec::new());
        let base = config.base_url.clone();
        let catalog = HttpCatalog::new(config);

        let result = catalog.search("gear box&x=1");
        let request_line = server.join().unwrap();

        match result {
            Err(CatalogError::Status { status, url }) => {
                assert_eq!(status, 503);
                assert_eq!(url, format!("{}/search?query=gear+box%26x%3D1", base));
                assert!(request_line.contains("/search?query=gear+box%26x%3D1"), "{request_line}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_search_malformed_body() {
        let (config, server) = one_shot_server("200 OK", "application/json", b"{not json".to_vec());
        let catalog = HttpCatalog::new(config);

        let result = catalog.search("gear");
        server.join().unwrap();

        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[test]
    fn test_fetch_model_returns_raw_bytes() {
        let payload = vec![0u8, 1, 2, 3, 255];
        let (config, server) = one_shot_server("200 OK", "application/octet-stream", payload.clone());
        let catalog = HttpCatalog::new(config);

        let bytes = catalog.fetch_model("binary/part_r.stl").unwrap();
        let request_line = server.join().unwrap();

        assert_eq!(request_line, "GET /file/binary/part_r.stl HTTP/1.1");
        assert_eq!(bytes, payload);
    }

    #[test]
    fn test_fetch_model_not_found() {
        let (config, server) = one_shot_server("404 Not Found", "text/plain", Vec::new());
        let catalog = HttpCatalog::new(config);

        let result = catalog.fetch_model("missing.stl");
        server.join().unwrap();

        assert!(matches!(result, Err(CatalogError::Status { status: 404, .. })));
    }
}
