//! Where a plan gets computed: in process, or by a `topup-server` instance.
//!
//! Both gateways take an already-validated [`PlanRequest`] and return the same
//! [`BatchResult`]; callers cannot tell them apart except by failure mode.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use topup::{BatchResult, PlanRequest, compute, validate_request};

use crate::error::{Error, Result};

/// A calculation backend.
pub trait PlanGateway {
    /// Short label recorded in the audit trail.
    fn name(&self) -> &'static str;

    /// Compute a purchase plan for `request`.
    fn plan(&self, request: &PlanRequest) -> Result<BatchResult>;
}

/// The in-process engine.
pub struct LocalEngine;

impl PlanGateway for LocalEngine {
    fn name(&self) -> &'static str {
        "local"
    }

    fn plan(&self, request: &PlanRequest) -> Result<BatchResult> {
        validate_request(request)?;
        Ok(compute(&request.holdings, request.budget))
    }
}

/// Error body returned by the service on a rejected request.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Blocking client for `POST /api/rebalance`.
pub struct RemoteEngine {
    client: Client,
    endpoint: String,
}

impl RemoteEngine {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/rebalance", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PlanGateway for RemoteEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn plan(&self, request: &PlanRequest) -> Result<BatchResult> {
        debug!(
            "POST {} ({} holdings)",
            self.endpoint,
            request.holdings.len()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| Error::Transport(format!("request to {} failed: {e}", self.endpoint)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.detail)
                .unwrap_or(body);
            return Err(Error::Transport(format!("service returned {status}: {detail}")));
        }

        resp.json::<BatchResult>()
            .map_err(|e| Error::Transport(format!("failed to parse plan: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::net::TcpListener;
    use topup::{Holding, ValidationError};

    fn request() -> PlanRequest {
        PlanRequest::new(
            vec![
                Holding::new("A", 10_000.0, 0, 50.0),
                Holding::new("B", 10_000.0, 0, 50.0),
            ],
            100_000.0,
        )
    }

    fn remote(server: &MockServer) -> RemoteEngine {
        RemoteEngine::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn local_engine_validates_first() {
        let mut req = request();
        req.budget = 0.0;
        assert!(matches!(
            LocalEngine.plan(&req),
            Err(Error::Validation(ValidationError::MissingBudget))
        ));
    }

    #[test]
    fn local_engine_computes() {
        let plan = LocalEngine.plan(&request()).unwrap();
        assert_eq!(plan.results[0].buy_quantity, 5);
        assert_eq!(plan.results[1].buy_quantity, 5);
    }

    #[test]
    fn endpoint_joins_base_url() {
        let remote = RemoteEngine::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(remote.endpoint(), "http://localhost:8080/api/rebalance");
    }

    #[test]
    fn remote_matches_local() {
        let expected = LocalEngine.plan(&request()).unwrap();
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/rebalance")
                .header("content-type", "application/json")
                .body_contains("\"name\":\"A\"");
            then.status(200)
                .header("content-type", "application/json")
                .body(serde_json::to_string(&expected).unwrap());
        });

        let plan = remote(&server).plan(&request()).unwrap();
        mock.assert();
        assert_eq!(plan, expected);
    }

    #[test]
    fn remote_rejection_surfaces_detail() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/rebalance");
            then.status(400)
                .header("content-type", "application/json")
                .body(r#"{"detail":"budget is required"}"#);
        });

        let err = remote(&server).plan(&request()).unwrap_err();
        mock.assert();
        match err {
            Error::Transport(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("budget is required"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_response_is_transport_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/rebalance");
            then.status(200)
                .header("content-type", "application/json")
                .body("not json");
        });

        assert!(matches!(
            remote(&server).plan(&request()),
            Err(Error::Transport(_))
        ));
        mock.assert();
    }

    #[test]
    fn unreachable_service_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let remote =
            RemoteEngine::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2)).unwrap();
        assert!(matches!(remote.plan(&request()), Err(Error::Transport(_))));
    }
}
