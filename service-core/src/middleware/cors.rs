use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Cross-origin policy applied to every response, preflight included.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins allowed to read responses. Empty reflects any caller origin.
    pub allowed_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_methods: vec!["POST".to_string(), "OPTIONS".to_string()],
            allow_headers: vec![
                "Content-Type".to_string(),
                "Authorization".to_string(),
                "X-Requested-With".to_string(),
                "Accept".to_string(),
            ],
            max_age_secs: 86400,
        }
    }
}

impl CorsConfig {
    /// Value for `Access-Control-Allow-Origin`, or `None` if the origin is
    /// not on the allow-list.
    pub fn allow_origin(&self, origin: Option<&str>) -> Option<HeaderValue> {
        match origin {
            None => {
                if self.allowed_origins.is_empty() {
                    Some(HeaderValue::from_static("*"))
                } else {
                    None
                }
            }
            Some(origin) => {
                if self.allowed_origins.is_empty()
                    || self.allowed_origins.iter().any(|o| o == origin || o == "*")
                {
                    HeaderValue::from_str(origin).ok()
                } else {
                    None
                }
            }
        }
    }

    fn apply(&self, origin: Option<&str>, headers: &mut HeaderMap) {
        if let Some(value) = self.allow_origin(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        if origin.is_some() {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
        if let Ok(value) = HeaderValue::from_str(&self.allow_methods.join(", ")) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.allow_headers.join(", ")) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, value);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("false"),
        );
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age_secs.into());
    }
}

pub async fn cors_middleware(
    State(cors): State<Arc<CorsConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let mut response = next.run(req).await;
    cors.apply(origin.as_deref(), response.headers_mut());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflects_origin_when_unrestricted() {
        let cors = CorsConfig::default();
        assert_eq!(
            cors.allow_origin(Some("https://app.example.com")).unwrap(),
            "https://app.example.com"
        );
        assert_eq!(cors.allow_origin(None).unwrap(), "*");
    }

    #[test]
    fn test_allow_list_rejects_unknown_origin() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
            ..Default::default()
        };
        assert!(cors.allow_origin(Some("https://evil.example.com")).is_none());
        assert!(cors.allow_origin(None).is_none());
        assert!(cors.allow_origin(Some("https://app.example.com")).is_some());
    }

    #[test]
    fn test_apply_sets_preflight_headers() {
        let mut headers = HeaderMap::new();
        CorsConfig::default().apply(None, &mut headers);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization, X-Requested-With, Accept"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "false");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }
}
