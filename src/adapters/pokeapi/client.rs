//! HTTP client for the PokeAPI upstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{DomainRecord, EntityKind, Identifier, PageResult, ResourceSummary};
use crate::domain::ports::UpstreamSource;

use super::normalize::normalize_payload;
use super::retry::RetryPolicy;
use crate::domain::models::UpstreamConfig;

/// Wire shape of an upstream list response.
#[derive(Debug, Deserialize)]
struct UpstreamPage {
    count: u32,
    next: Option<String>,
    results: Vec<ResourceSummary>,
}

/// Read-only client for the PokeAPI.
///
/// One logical GET per `(kind, identifier)` or `(kind, offset, limit)`.
/// Transient failures (network, timeout, 429, 5xx) are retried with
/// exponential backoff before surfacing as `UpstreamUnavailable`; 404 maps
/// to `NotFound` and unparseable bodies to `UpstreamMalformed`, neither of
/// which is retried.
pub struct PokeApiClient {
    http: ReqwestClient,
    base_url: String,
    retry: RetryPolicy,
}

impl PokeApiClient {
    pub fn new(config: &UpstreamConfig) -> GatewayResult<Self> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .map_err(|err| {
                GatewayError::UpstreamUnavailable(format!("failed to build http client: {err}"))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from(&config.retry),
        })
    }

    /// GET a JSON body under the retry policy.
    ///
    /// `descriptor` names the requested resource for `NotFound` errors and
    /// log lines (e.g. `pikachu` or `page[20,20]`).
    async fn get_json(
        &self,
        kind: EntityKind,
        descriptor: &str,
        path: &str,
        query: &[(&str, u32)],
    ) -> GatewayResult<Value> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "GET upstream");

        self.retry
            .execute(|| async {
                let mut request = self.http.get(&url);
                if !query.is_empty() {
                    request = request.query(query);
                }
                let response = request.send().await.map_err(transport_error)?;
                handle_response(kind, descriptor, response).await
            })
            .await
    }
}

#[async_trait]
impl UpstreamSource for PokeApiClient {
    async fn fetch_record(
        &self,
        kind: EntityKind,
        identifier: &Identifier,
    ) -> GatewayResult<DomainRecord> {
        let path = kind.record_path(identifier);
        let mut payload = self
            .get_json(kind, &identifier.canonical(), &path, &[])
            .await?;
        normalize_payload(kind, &mut payload);
        Ok(DomainRecord::new(kind, identifier, payload))
    }

    async fn fetch_page(
        &self,
        kind: EntityKind,
        offset: u32,
        limit: u32,
    ) -> GatewayResult<PageResult> {
        let descriptor = format!("page[{offset},{limit}]");
        let body = self
            .get_json(
                kind,
                &descriptor,
                kind.page_path(),
                &[("offset", offset), ("limit", limit)],
            )
            .await?;

        let page: UpstreamPage = serde_json::from_value(body).map_err(|err| {
            let err = GatewayError::UpstreamMalformed(format!(
                "{kind} list response did not match the expected shape: {err}"
            ));
            error!(%kind, error = %err, "upstream contract violation");
            err
        })?;

        let next_offset = if page.next.is_some() {
            let next = offset.checked_add(limit).ok_or_else(|| {
                GatewayError::UpstreamMalformed(format!(
                    "{kind} list reports another page past offset {offset}"
                ))
            })?;
            Some(next)
        } else {
            None
        };

        Ok(PageResult {
            next_offset,
            items: page.results,
            total_count: page.count,
        })
    }

    async fn ping(&self) -> GatewayResult<()> {
        // Cheapest well-known query: one pokemon summary.
        let url = format!("{}/pokemon", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("limit", 1u32)])
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::UpstreamUnavailable(format!(
                "ping returned {}",
                response.status()
            )))
        }
    }
}

/// Classify a transport-level failure (no HTTP status available).
fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::UpstreamUnavailable(format!("request timed out: {err}"))
    } else {
        GatewayError::UpstreamUnavailable(format!("request failed: {err}"))
    }
}

/// Translate an HTTP response into a payload or a domain error kind.
async fn handle_response(
    kind: EntityKind,
    descriptor: &str,
    response: Response,
) -> GatewayResult<Value> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound {
            kind,
            identifier: descriptor.to_string(),
        });
    }

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        let body = read_body(response).await;
        return Err(GatewayError::UpstreamUnavailable(format!(
            "HTTP {status}: {body}"
        )));
    }

    if !status.is_success() {
        // The gateway only issues well-formed requests; any other 4xx means
        // the upstream contract drifted.
        let body = read_body(response).await;
        let err = GatewayError::UpstreamMalformed(format!("unexpected HTTP {status}: {body}"));
        error!(%kind, %descriptor, error = %err, "upstream contract violation");
        return Err(err);
    }

    response.json::<Value>().await.map_err(|err| {
        let err =
            GatewayError::UpstreamMalformed(format!("response body is not valid JSON: {err}"));
        error!(%kind, %descriptor, error = %err, "upstream contract violation");
        err
    })
}

async fn read_body(response: Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}
