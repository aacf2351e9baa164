//! Blocking HTTP transport for the recipes endpoint.

use anyhow::Context as _;
use feedscroll_core::{spawn_blocking, Canceled, LocalBoxFuture};
use feedscroll_paging::{FetchError, Page, PageRequest, Record, RecordDataSource, RecordId};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use web_time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Serves pages from `{base}/recipes?limit=&skip=` and records from
/// `{base}/recipes/{id}`. Each request runs on a worker thread.
pub struct HttpRecordSource {
    client: Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("recipes-demo/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn page_url(&self, request: PageRequest) -> String {
        format!(
            "{}/recipes?limit={}&skip={}",
            self.base_url, request.limit, request.skip
        )
    }

    pub fn record_url(&self, id: RecordId) -> String {
        format!("{}/recipes/{}", self.base_url, id)
    }

    fn get<T>(&self, url: String, record: Option<RecordId>) -> LocalBoxFuture<'static, Result<T, FetchError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.client.clone();
        let task = spawn_blocking(move |token| {
            if token.is_cancelled() {
                return Err(FetchError::transport("request cancelled"));
            }
            fetch_json(&client, &url, record)
        });
        Box::pin(async move {
            task.await
                .unwrap_or_else(|Canceled| Err(FetchError::transport("request worker stopped")))
        })
    }
}

impl RecordDataSource for HttpRecordSource {
    fn fetch_page(&self, request: PageRequest) -> LocalBoxFuture<'static, Result<Page, FetchError>> {
        self.get(self.page_url(request), None)
    }

    fn fetch_by_id(&self, id: RecordId) -> LocalBoxFuture<'static, Result<Record, FetchError>> {
        self.get(self.record_url(id), Some(id))
    }
}

fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    record: Option<RecordId>,
) -> Result<T, FetchError> {
    log::debug!("GET {url}");
    let response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::transport(format!("request failed: {e}")))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = record {
            return Err(FetchError::NotFound(id));
        }
    }
    let body = response
        .text()
        .map_err(|e| FetchError::transport(format!("failed to read body: {e}")))?;
    if !status.is_success() {
        return Err(FetchError::transport(format!("{url} answered {status}")));
    }

    serde_json::from_str(&body)
        .map_err(|e| FetchError::transport(format!("malformed response from {url}: {e}")))
}
