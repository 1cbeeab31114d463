//! HTTP middleware (CORS, 404 handler)

use axum::Json;
use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::config::is_all_interfaces;
use crate::core::constants::WARNING_HEADER;

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        let mut origins = Vec::new();
        let is_all = is_all_interfaces(host);

        // Loopback binds accept both spellings of localhost
        let base_hosts: Vec<&str> = if is_all || host == "127.0.0.1" || host == "localhost" {
            vec!["localhost", "127.0.0.1"]
        } else {
            vec![host]
        };

        for h in &base_hosts {
            origins.push(format!("http://{}:{}", h, port));
            origins.push(format!("http://{}", h));
        }

        if is_all && let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                origins.push(format!("http://{}:{}", ip, port));
            }
        }

        Self { origins }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .expose_headers([header::LOCATION, HeaderName::from_static(WARNING_HEADER)])
}

/// JSON 404 for unmatched routes
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!("[404] {} {}", req.method(), req.uri());
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "not_found",
            "code": "ROUTE_NOT_FOUND",
            "message": format!("No route for {} {}", req.method(), req.uri().path()),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_origins() {
        let allowed = AllowedOrigins::new("127.0.0.1", 5390);
        assert!(allowed.is_allowed("http://localhost:5390"));
        assert!(allowed.is_allowed("http://127.0.0.1:5390"));
        assert!(!allowed.is_allowed("http://evil.example:5390"));
    }

    #[test]
    fn test_explicit_host_origins() {
        let allowed = AllowedOrigins::new("hr.internal", 8080);
        assert!(allowed.is_allowed("http://hr.internal:8080"));
        assert!(!allowed.is_allowed("http://localhost:8080"));
    }
}
