use super::util::with_retry;
use crate::core::config::StoreConfig;
use crate::core::models::{
    Account, Budget, Categorization, Category, NewAccount, NewBudget, NewCategory,
    NewTransaction, Transaction,
};
use crate::core::store::FinanceStore;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

/// Non-2xx answer from the store.
#[derive(Debug)]
pub struct StatusError {
    pub status: StatusCode,
    pub url: String,
    pub body: String,
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Store returned {} for {}: {}", self.status, self.url, self.body)
    }
}

impl std::error::Error for StatusError {}

/// Transport failures and 5xx answers may succeed on a later attempt. Client
/// errors and unparseable bodies will not.
fn is_transient(err: &anyhow::Error) -> bool {
    if let Some(status) = err.downcast_ref::<StatusError>() {
        return status.status.is_server_error();
    }
    err.chain().any(|cause| cause.is::<reqwest::Error>())
}

/// [`FinanceStore`] backed by the store's JSON HTTP API.
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fintrack/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpStore {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        if !status.is_success() {
            return Err(StatusError {
                status,
                url: url.to_string(),
                body,
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, response = %body, "Failed to parse store response");
            anyhow!(e).context(format!("Failed to parse response from {url}"))
        })
    }

    /// Reads are idempotent and retried with backoff.
    #[instrument(name = "StoreGet", skip(self))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("Requesting {}", url);
        with_retry(
            || async {
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .with_context(|| format!("Request error for URL: {url}"))?;
                Self::decode(&url, response).await
            },
            self.retries,
            self.retry_delay_ms,
            is_transient,
        )
        .await
    }

    /// Writes are sent exactly once.
    #[instrument(name = "StoreWrite", skip(self, body))]
    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("Sending {} {}", method, url);
        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request error for URL: {url}"))?;
        Self::decode(&url, response).await
    }
}

#[async_trait]
impl FinanceStore for HttpStore {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.get("/accounts").await
    }

    async fn get_account(&self, id: &str) -> Result<Account> {
        self.get(&format!("/accounts/{id}")).await
    }

    async fn create_account(&self, request: &NewAccount) -> Result<Account> {
        self.send(Method::POST, "/accounts", request).await
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.get("/transactions").await
    }

    async fn create_transaction(&self, request: &NewTransaction) -> Result<Transaction> {
        self.send(Method::POST, "/transactions", request).await
    }

    async fn categorize_transaction(
        &self,
        id: &str,
        request: &Categorization,
    ) -> Result<Transaction> {
        self.send(Method::PUT, &format!("/transactions/{id}/categorize"), request)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get("/categories").await
    }

    async fn create_category(&self, request: &NewCategory) -> Result<Category> {
        self.send(Method::POST, "/categories", request).await
    }

    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.get("/budgets").await
    }

    async fn create_budget(&self, request: &NewBudget) -> Result<Budget> {
        self.send(Method::POST, "/budgets", request).await
    }
}
