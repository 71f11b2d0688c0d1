//! HTTP seam used by the place resolver and the region fetcher.
//!
//! Each call is a single request with no retry; timeouts are whatever the
//! underlying client enforces.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::core::config::NetworkConfig;
use crate::{Error, Result};

/// Status and body of a completed request. Non-success statuses are
/// returned, not raised; callers decide what a failure means.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can perform the two request shapes the pipeline needs.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` with the given query parameters.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse>;

    /// POST `url` with an `application/x-www-form-urlencoded` body.
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// `reqwest`-backed transport. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    async fn finish(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        Self::finish(response).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        log::debug!("POST {}", url);
        let response = self.client.post(url).form(form).send().await?;
        Self::finish(response).await
    }
}

/// One canned reply of a `ScriptedTransport`
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Respond(HttpResponse),
    /// Simulates a connection-level failure
    Fail(String),
}

/// A request seen by a `ScriptedTransport`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub params: Vec<(String, String)>,
}

/// In-memory transport that replays scripted replies per URL and records
/// every request. Used by tests and for replaying saved responses offline.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<ScriptedReply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `url`. Replies for the same URL are served in order.
    pub fn reply(self, url: &str, reply: ScriptedReply) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.entry(url.to_string()).or_default().push_back(reply);
        }
        self
    }

    pub fn respond(self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.reply(url, ScriptedReply::Respond(HttpResponse::new(status, body)))
    }

    pub fn fail(self, url: &str, message: &str) -> Self {
        self.reply(url, ScriptedReply::Fail(message.to_string()))
    }

    /// Every request made so far, in call order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn serve(&self, method: &'static str, url: &str, params: &[(&str, &str)]) -> Result<HttpResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                method,
                url: url.to_string(),
                params: params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.get_mut(url)?.pop_front());

        match reply {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Fail(message)) => Err(Error::Transport(message)),
            None => Err(Error::Transport(format!("no scripted reply for {}", url))),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        self.serve("GET", url, query)
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        self.serve("POST", url, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let transport = ScriptedTransport::new()
            .respond("https://a.test", 200, "first")
            .fail("https://a.test", "connection reset");

        let first = transport.get("https://a.test", &[("q", "x")]).await.unwrap();
        assert!(first.is_success());
        assert_eq!(first.body, b"first");

        let second = transport.post_form("https://a.test", &[]).await;
        assert!(matches!(second, Err(Error::Transport(m)) if m == "connection reset"));

        let third = transport.get("https://a.test", &[]).await;
        assert!(third.is_err());

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].params, vec![("q".to_string(), "x".to_string())]);
        assert_eq!(requests[1].method, "POST");
    }

    #[test]
    fn test_status_classes() {
        assert!(HttpResponse::new(204, Vec::new()).is_success());
        assert!(!HttpResponse::new(429, Vec::new()).is_success());
        assert!(!HttpResponse::new(504, Vec::new()).is_success());
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(&NetworkConfig::default()).is_ok());
    }
}
