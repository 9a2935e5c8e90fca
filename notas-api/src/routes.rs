//! API route definitions

use http::header::{self, HeaderValue};
use http::{Method, Response, StatusCode, Uri};
use notas_core::config::NotasConfig;
use notas_core::error::{Error, Result};
use notas_static::{FileServer, Lister, Locator};
use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::handlers::{self, Body};

/// API Router
#[derive(Debug, Clone)]
pub struct ApiRouter {
    lister: Lister,
    file_server: FileServer,
    list_path: String,
    file_path: String,
    file_param: String,
    static_prefix: Option<String>,
    cors_allow_origin: Option<HeaderValue>,
}

impl ApiRouter {
    /// Create a new API router
    pub fn new(config: &NotasConfig) -> Result<Self> {
        let (lister, file_server) = notas_static::from_config(config);

        let static_prefix = match lister.locator() {
            Locator::Static { prefix } => Some(prefix.trim_end_matches('/').to_string()),
            Locator::Query { .. } => None,
        };

        let cors_allow_origin = config
            .server
            .cors_allow_origin
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()
            .map_err(|e| Error::Config(format!("Invalid cors_allow_origin: {}", e)))?;

        Ok(Self {
            lister,
            file_server,
            list_path: config.server.list_path.clone(),
            file_path: config.server.file_path.clone(),
            file_param: config.server.file_param.clone(),
            static_prefix,
            cors_allow_origin,
        })
    }

    /// Route a request to its handler
    pub async fn handle(&self, method: &Method, uri: &Uri) -> Response<Body> {
        let mut resp = self.dispatch(method, uri).await;
        if let Some(origin) = &self.cors_allow_origin {
            resp.headers_mut()
                .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }
        resp
    }

    async fn dispatch(&self, method: &Method, uri: &Uri) -> Response<Body> {
        let path = uri.path();
        let readable = method == Method::GET || method == Method::HEAD;
        let head = method == Method::HEAD;

        if path == "/health" {
            return handlers::health_check();
        }

        if path == self.list_path {
            if !readable {
                return method_not_allowed();
            }
            return handlers::list_files(&self.lister).await;
        }

        if path == self.file_path {
            if !readable {
                return method_not_allowed();
            }
            let name = self.query_name(uri.query());
            if let Some(resp) = handlers::serve_file(&self.file_server, name.as_deref().unwrap_or(""), head).await {
                return resp;
            }
            return not_found();
        }

        if let Some(encoded) = self.static_name(path) {
            if !readable {
                return method_not_allowed();
            }
            let Ok(name) = percent_decode_str(encoded).decode_utf8() else {
                return not_found();
            };
            if let Some(resp) = handlers::serve_file(&self.file_server, &name, head).await {
                return resp;
            }
        }

        not_found()
    }

    fn query_name(&self, query: Option<&str>) -> Option<String> {
        form_urlencoded::parse(query?.as_bytes())
            .find(|(key, _)| key == self.file_param.as_str())
            .map(|(_, value)| value.into_owned())
    }

    fn static_name<'a>(&self, path: &'a str) -> Option<&'a str> {
        let prefix = self.static_prefix.as_deref()?;
        path.strip_prefix(prefix)?.strip_prefix('/')
    }
}

fn not_found() -> Response<Body> {
    handlers::text_response(StatusCode::NOT_FOUND, "Not Found")
}

fn method_not_allowed() -> Response<Body> {
    let mut resp = handlers::text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    resp.headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use notas_core::config::{LocatorStyle, UnreadablePolicy};
    use std::path::Path;

    fn config(dir: &Path) -> NotasConfig {
        let mut config = NotasConfig::default();
        config.library.dir = dir.to_path_buf();
        config
    }

    async fn get(router: &ApiRouter, uri: &str) -> (StatusCode, http::HeaderMap, Vec<u8>) {
        let uri: Uri = uri.parse().unwrap();
        let resp = router.handle(&Method::GET, &uri).await;
        let (parts, body) = resp.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (parts.status, parts.headers, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_list_returns_json() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), b"aaa").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"n").unwrap();
        let router = ApiRouter::new(&config(tmp.path())).unwrap();

        let (status, headers, body) = get(&router, "/api/list").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "name": "a.pdf", "path": "/api/file?name=a.pdf" }])
        );
    }

    #[tokio::test]
    async fn test_list_error_is_500_json() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("notas");
        std::fs::write(&file, b"not a directory").unwrap();
        let mut config = config(&file);
        config.library.on_unreadable = UnreadablePolicy::Error;
        let router = ApiRouter::new(&config).unwrap();

        let (status, _, body) = get(&router, "/api/list").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Cannot read directory"));
    }

    #[tokio::test]
    async fn test_file_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("tema 1.pdf"), b"%PDF-1.4 body").unwrap();
        let router = ApiRouter::new(&config(tmp.path())).unwrap();

        let (status, headers, body) = get(&router, "/api/file?name=tema+1.pdf").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(headers[header::CONTENT_LENGTH], "13");
        assert!(headers.contains_key(header::LAST_MODIFIED));
        assert_eq!(body, b"%PDF-1.4 body");

        let (status, _, _) = get(&router, "/api/file?name=tema%201.pdf").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_file_endpoint_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let router = ApiRouter::new(&config(tmp.path())).unwrap();

        let (status, _, body) = get(&router, "/api/file?name=missing.pdf").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"Not found");
    }

    #[tokio::test]
    async fn test_file_endpoint_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("notas");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(tmp.path().join("secret.txt"), b"secret").unwrap();
        let router = ApiRouter::new(&config(&root)).unwrap();

        for uri in [
            "/api/file?name=../secret.txt",
            "/api/file?name=..%2fsecret.txt",
            "/api/file?name=..%2f..%2fetc%2fpasswd",
            "/api/file?name=..",
        ] {
            let (status, _, body) = get(&router, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_ne!(body, b"secret");
        }
    }

    #[tokio::test]
    async fn test_missing_name_falls_through() {
        let tmp = tempfile::tempdir().unwrap();
        let router = ApiRouter::new(&config(tmp.path())).unwrap();

        for uri in ["/api/file", "/api/file?name=", "/api/file?other=a.pdf"] {
            let (status, _, body) = get(&router, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body, b"Not Found");
        }
    }

    #[tokio::test]
    async fn test_head_has_length_but_no_body() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), b"12345").unwrap();
        let router = ApiRouter::new(&config(tmp.path())).unwrap();

        let uri: Uri = "/api/file?name=a.pdf".parse().unwrap();
        let resp = router.handle(&Method::HEAD, &uri).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "5");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let tmp = tempfile::tempdir().unwrap();
        let router = ApiRouter::new(&config(tmp.path())).unwrap();

        let uri: Uri = "/api/list".parse().unwrap();
        let resp = router.handle(&Method::POST, &uri).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[header::ALLOW], "GET, HEAD");
    }

    #[tokio::test]
    async fn test_static_mount() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("tema 1.pdf"), b"static").unwrap();
        let mut config = config(tmp.path());
        config.library.locator = LocatorStyle::Static;
        let router = ApiRouter::new(&config).unwrap();

        let (_, _, body) = get(&router, "/api/list").await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let path = json[0]["path"].as_str().unwrap().to_string();
        assert_eq!(path, "/notas/tema%201.pdf");

        let (status, _, body) = get(&router, &path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"static");

        let (status, _, _) = get(&router, "/notas/..%2F..%2Fetc%2Fpasswd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get(&router, "/notas/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_mount_disabled_for_query_locators() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), b"a").unwrap();
        let router = ApiRouter::new(&config(tmp.path())).unwrap();

        let (status, _, _) = get(&router, "/notas/a.pdf").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config(tmp.path());
        config.server.cors_allow_origin = None;
        let router = ApiRouter::new(&config).unwrap();

        let (_, headers, _) = get(&router, "/health").await;
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[test]
    fn test_invalid_cors_origin() {
        let mut config = NotasConfig::default();
        config.server.cors_allow_origin = Some("bad\norigin".to_string());
        assert!(matches!(ApiRouter::new(&config), Err(Error::Config(_))));
    }
}
