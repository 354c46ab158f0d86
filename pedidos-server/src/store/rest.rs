//! REST data store client
//!
//! Talks to the hosted store's generic REST interface: filter/order/select
//! query parameters, POST-for-insert, PATCH-for-update, DELETE-for-delete.
//! Mutations send `Prefer: return=representation` so every write returns the
//! stored row.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;

use shared::StockCode;
use shared::models::{Order, OrderStatus, OrderUpdate, StockItem};

use super::{DataStore, StoreError, StoreResult};
use crate::core::Config;

const ORDERS_TABLE: &str = "pedidos_faturamento";
const STOCK_TABLE: &str = "estoque";

/// Data store client over the hosted REST interface
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
}

impl RestStore {
    pub fn new(config: &Config) -> Self {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.supabase_key)
            .expect("SUPABASE_SERVICE_ROLE_KEY contains invalid header characters");
        headers.insert("apikey", key);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.supabase_key))
            .expect("SUPABASE_SERVICE_ROLE_KEY contains invalid header characters");
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .default_headers(headers)
            .build()
            .expect("Failed to build store HTTP client");

        Self {
            client,
            base_url: format!("{}/rest/v1", config.supabase_url.trim_end_matches('/')),
        }
    }

    fn url(&self, table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}/{}", self.base_url, table)
        } else {
            format!("{}/{}?{}", self.base_url, table, query)
        }
    }

    async fn check<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Response {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn get_rows<T: DeserializeOwned>(&self, table: &str, query: &str) -> StoreResult<Vec<T>> {
        let response = self.client.get(self.url(table, query)).send().await?;
        Self::check(response).await
    }

    /// PATCH returning the updated rows; the row filter not matching
    /// anything is a NotFound, not a silent success.
    async fn patch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
        body: &serde_json::Value,
        resource: &str,
    ) -> StoreResult<T> {
        let response = self
            .client
            .patch(self.url(table, query))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let mut rows: Vec<T> = Self::check(response).await?;
        match rows.is_empty() {
            true => Err(StoreError::NotFound(resource.to_string())),
            false => Ok(rows.remove(0)),
        }
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.get_rows(ORDERS_TABLE, "select=*&order=codigo.desc")
            .await
    }

    async fn get_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let mut rows: Vec<Order> = self
            .get_rows(ORDERS_TABLE, &format!("id=eq.{id}&select=*"))
            .await?;
        Ok(match rows.is_empty() {
            true => None,
            false => Some(rows.remove(0)),
        })
    }

    async fn create_order(&self, order: Order) -> StoreResult<Order> {
        let response = self
            .client
            .post(self.url(ORDERS_TABLE, ""))
            .header("Prefer", "return=representation")
            .json(&order)
            .send()
            .await?;
        let mut rows: Vec<Order> = Self::check(response).await?;
        match rows.is_empty() {
            true => Err(StoreError::Request(
                "insert returned no representation".to_string(),
            )),
            false => Ok(rows.remove(0)),
        }
    }

    async fn update_order(&self, id: &str, update: OrderUpdate) -> StoreResult<Order> {
        let body = serde_json::to_value(&update)?;
        self.patch_rows(
            ORDERS_TABLE,
            &format!("id=eq.{id}"),
            &body,
            &format!("order {id}"),
        )
        .await
    }

    async fn set_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        data_emissao: Option<DateTime<Utc>>,
    ) -> StoreResult<Order> {
        // One PATCH for both columns keeps the status/timestamp coupling
        // intact; `data_emissao: null` is sent explicitly on reversal.
        let body = json!({
            "status": status,
            "data_emissao": data_emissao,
        });
        self.patch_rows(
            ORDERS_TABLE,
            &format!("id=eq.{id}"),
            &body,
            &format!("order {id}"),
        )
        .await
    }

    async fn delete_order(&self, id: &str) -> StoreResult<()> {
        let response = self
            .client
            .delete(self.url(ORDERS_TABLE, &format!("id=eq.{id}")))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Response {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn next_order_code(&self) -> StoreResult<i64> {
        let rows: Vec<serde_json::Value> = self
            .get_rows(ORDERS_TABLE, "select=codigo&order=codigo.desc&limit=1")
            .await?;
        let max = rows
            .first()
            .and_then(|row| row.get("codigo"))
            .and_then(|codigo| {
                // The column holds numbers in newer rows and numeric text in
                // rows written by older front-end iterations
                codigo
                    .as_i64()
                    .or_else(|| codigo.as_str().and_then(|s| s.trim().parse().ok()))
            })
            .unwrap_or(0);
        Ok(max + 1)
    }

    async fn list_stock(&self) -> StoreResult<Vec<StockItem>> {
        self.get_rows(STOCK_TABLE, "select=*").await
    }

    async fn get_stock_item(&self, code: &StockCode) -> StoreResult<Option<StockItem>> {
        // Codes are stored unnormalized (numeric in some rows, mixed case in
        // others), so equality filters miss; match on the normalized code
        // over the full ledger instead.
        let rows = self.list_stock().await?;
        Ok(rows.into_iter().find(|row| &row.stock_code() == code))
    }

    async fn set_stock_quantity(&self, codigo: &str, quantidade: f64) -> StoreResult<StockItem> {
        let body = json!({ "quantidade": quantidade });
        self.patch_rows(
            STOCK_TABLE,
            &format!("codigo=eq.{codigo}"),
            &body,
            &format!("stock item {codigo}"),
        )
        .await
    }
}
