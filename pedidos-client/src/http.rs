//! HTTP client for network-based API calls

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use shared::models::{
    ConfirmRequest, IssueOutcome, Order, OrderCreate, OrderUpdate, RevertOutcome, StockItem,
    StockQuantityUpdate,
};

use crate::{ClientConfig, ClientError, ClientResult};

/// Header carrying the Portal session token
const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

/// HTTP client for making network requests to the backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_token: config.session_token.clone(),
        }
    }

    /// Set the session token
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Get the current session token
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = &self.session_token {
            request = request.header(SESSION_TOKEN_HEADER, token);
        }
        request
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .request(reqwest::Method::PATCH, path)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(reqwest::Method::DELETE, path).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            tracing::debug!(status = %status, body = %text, "API request failed");
            // The server answers errors in the unified envelope; fall back
            // to the raw body when it does not parse.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(text);

            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST => ClientError::Validation(message),
                StatusCode::CONFLICT => ClientError::Conflict(message),
                StatusCode::UNPROCESSABLE_ENTITY => ClientError::BusinessRule(message),
                _ => ClientError::Server(message),
            });
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Health API ==========

    /// Public health check
    pub async fn health(&self) -> ClientResult<Value> {
        self.get("/api/health").await
    }

    // ========== Orders API ==========

    /// List all orders, newest code first
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/api/pedidos").await
    }

    /// Fetch one order
    pub async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.get(&format!("/api/pedidos/{id}")).await
    }

    /// Register a new order (created pending)
    pub async fn create_order(&self, order: &OrderCreate) -> ClientResult<Order> {
        self.post("/api/pedidos", order).await
    }

    /// Partially update an order
    pub async fn update_order(&self, id: &str, update: &OrderUpdate) -> ClientResult<Order> {
        self.patch(&format!("/api/pedidos/{id}"), update).await
    }

    /// Delete an order (must not be issued)
    pub async fn delete_order(&self, id: &str) -> ClientResult<()> {
        let _: Value = self.delete(&format!("/api/pedidos/{id}")).await?;
        Ok(())
    }

    /// Issue a pending order, debiting stock
    pub async fn issue_order(&self, id: &str, confirmed: bool) -> ClientResult<IssueOutcome> {
        self.post(
            &format!("/api/pedidos/{id}/emitir"),
            &ConfirmRequest {
                confirmado: confirmed,
            },
        )
        .await
    }

    /// Revert an issued order, crediting stock back
    pub async fn revert_order(&self, id: &str, confirmed: bool) -> ClientResult<RevertOutcome> {
        self.post(
            &format!("/api/pedidos/{id}/reverter"),
            &ConfirmRequest {
                confirmado: confirmed,
            },
        )
        .await
    }

    // ========== Stock API ==========

    /// The full stock ledger
    pub async fn list_stock(&self) -> ClientResult<Vec<StockItem>> {
        self.get("/api/estoque").await
    }

    /// Set an absolute available quantity (restocking)
    pub async fn set_stock_quantity(
        &self,
        codigo: &str,
        quantidade: f64,
    ) -> ClientResult<StockItem> {
        self.patch(
            &format!("/api/estoque/{codigo}"),
            &StockQuantityUpdate { quantidade },
        )
        .await
    }
}
