use crate::backend::Backend;
use crate::core::config::ClientConfig;
use crate::core::constants::{ADD_WAYPOINT_PATH, GET_WAYPOINTS_PATH, OPTIMIZE_ROUTE_PATH};
use crate::model::{OptimizationRequest, OptimizationResponse, Waypoint};
use crate::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("waymap/", env!("CARGO_PKG_VERSION"));

/// Shared async HTTP client for backends built without an explicit config
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    build_client(Duration::from_secs(30)).unwrap_or_else(|e| {
        log::warn!("falling back to default HTTP client: {}", e);
        reqwest::Client::new()
    })
});

fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .tcp_keepalive(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
}

/// [`Backend`] speaking JSON over HTTP to the routing server
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            base_url: normalize_base(base_url.into()),
        }
    }

    /// Builds a dedicated client honouring the configured timeout
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.request_timeout())?,
            base_url: normalize_base(config.backend_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks the status, then decodes the body. An empty body decodes as
    /// JSON `null` so acknowledgments without content still succeed.
    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            log::warn!("{} answered HTTP {}", path, status);
            return Err(Error::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

fn normalize_base(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

#[async_trait]
impl Backend for HttpBackend {
    async fn add_waypoint(&self, waypoint: &Waypoint) -> Result<serde_json::Value> {
        log::debug!("POST {} {:?}", ADD_WAYPOINT_PATH, waypoint);
        let response = self
            .client
            .post(self.url(ADD_WAYPOINT_PATH))
            .json(waypoint)
            .send()
            .await?;
        Self::decode(ADD_WAYPOINT_PATH, response).await
    }

    async fn get_waypoints(&self) -> Result<Vec<Waypoint>> {
        log::debug!("GET {}", GET_WAYPOINTS_PATH);
        let response = self.client.get(self.url(GET_WAYPOINTS_PATH)).send().await?;
        let waypoints: Option<Vec<Waypoint>> = Self::decode(GET_WAYPOINTS_PATH, response).await?;
        waypoints.ok_or_else(|| Error::Protocol("get_waypoints returned an empty body".to_string()))
    }

    async fn optimize_route(&self, request: &OptimizationRequest) -> Result<OptimizationResponse> {
        log::debug!("POST {} {:?}", OPTIMIZE_ROUTE_PATH, request);
        let response = self
            .client
            .post(self.url(OPTIMIZE_ROUTE_PATH))
            .json(request)
            .send()
            .await?;
        let body: Option<OptimizationResponse> = Self::decode(OPTIMIZE_ROUTE_PATH, response).await?;
        body.ok_or_else(|| Error::Protocol("optimize_route returned an empty body".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::model::OptimizationOutcome;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:5000/");
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(backend.url(GET_WAYPOINTS_PATH), "http://localhost:5000/get_waypoints");
    }

    #[tokio::test]
    async fn test_add_waypoint_posts_wire_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add_waypoint"))
            .and(body_json(serde_json::json!({
                "lat": 45.383402, "lon": -71.932936, "demand": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        let ack = backend
            .add_waypoint(&Waypoint::new(LatLng::new(45.383402, -71.932936), 5))
            .await
            .unwrap();
        assert_eq!(ack["status"], "success");
    }

    #[tokio::test]
    async fn test_empty_ack_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add_waypoint"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        let ack = backend
            .add_waypoint(&Waypoint::new(LatLng::new(45.0, -71.0), 1))
            .await
            .unwrap();
        assert!(ack.is_null());
    }

    #[tokio::test]
    async fn test_get_waypoints_keeps_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_waypoints"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": 46.0, "lon": -72.0, "demand": 3 },
                { "lat": 45.0, "lon": -71.0, "demand": 0 }
            ])))
            .mount(&server)
            .await;

        let waypoints = HttpBackend::new(server.uri()).get_waypoints().await.unwrap();
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].demand, 3);
        assert_eq!(waypoints[1].position(), LatLng::new(45.0, -71.0));
    }

    #[tokio::test]
    async fn test_optimizer_error_is_not_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/optimize_route"))
            .and(body_json(serde_json::json!({ "num_vehicles": 2, "vehicle_capacity": 100 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "At least 2 waypoints required"
            })))
            .mount(&server)
            .await;

        let response = HttpBackend::new(server.uri())
            .optimize_route(&OptimizationRequest::new(2, 100))
            .await
            .unwrap();
        assert_eq!(
            response.into_outcome().unwrap(),
            OptimizationOutcome::Rejected("At least 2 waypoints required".to_string())
        );
    }

    #[tokio::test]
    async fn test_http_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_waypoints"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = HttpBackend::new(server.uri()).get_waypoints().await.unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(err, Error::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_waypoints"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = HttpBackend::new(server.uri()).get_waypoints().await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) is closed on test machines
        let err = HttpBackend::new("http://127.0.0.1:9")
            .get_waypoints()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
