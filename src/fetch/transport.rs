use log::debug;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use super::FetchResult;

/// Proxy route that forwards allow-listed upstream paths and injects the
/// API key server-side.
const PROXY_ROUTE: &str = "/api/yh-finance";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("proxy request failed: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

/// One proxied GET per call: `{base}/api/yh-finance?endpoint=<path>&<params>`.
/// Implementations must not retry internally; retry policy lives with the
/// single-quote path.
pub trait Transport: Send + Sync {
    fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> impl std::future::Future<Output = FetchResult<Value>> + Send;
}

impl<T: Transport> Transport for &T {
    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> FetchResult<Value> {
        (**self).get_json(endpoint, params).await
    }
}

/// reqwest-backed transport speaking the proxy contract.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> FetchResult<Value> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            PROXY_ROUTE
        );
        debug!("GET {} endpoint={} params={:?}", url, endpoint, params);

        let mut query: Vec<(&str, &str)> = vec![("endpoint", endpoint)];
        query.extend_from_slice(params);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Scripted transport: pops one enqueued response per call and records
    /// every request, so tests can assert exact network-call counts.
    pub struct MockTransport {
        responses: Mutex<VecDeque<FetchResult<Value>>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn push(&self, response: FetchResult<Value>) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> FetchResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push((
                endpoint.to_string(),
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(FetchError::Transport("no scripted response".to_string()))
                })
        }
    }
}
