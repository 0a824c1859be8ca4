//! Local HTTP fixtures for tests.

use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One canned answer: requests for `path` get `status` and `body`.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

pub fn route(path: &'static str, status: u16, body: impl Into<String>) -> Route {
    Route {
        path,
        status,
        body: body.into(),
    }
}

/// Start a mock server answering `routes`; unmatched paths get a 404.
///
/// The server stops when the returned handle is dropped.
pub async fn serve(routes: Vec<Route>) -> MockServer {
    let server = MockServer::start().await;
    for r in routes {
        Mock::given(path(r.path))
            .respond_with(ResponseTemplate::new(r.status).set_body_string(r.body))
            .mount(&server)
            .await;
    }
    server
}
