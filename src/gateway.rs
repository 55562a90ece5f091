//! Remote product gateway: wraps every network call against the product
//! API with uniform error surfacing. No retries happen here, retry policy
//! belongs to the caller, and any operation can be cancelled by dropping
//! the awaited future.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::GatewayError;
use crate::models::{Product, ProductPayload};

/// Error body shape of the product API: `{"detail": "..."}` on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProductGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ProductGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("inventory-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/products{}", self.base_url, path)
    }

    /// GET all products.
    pub async fn list(&self) -> Result<Vec<Product>, GatewayError> {
        let response = self
            .client
            .get(self.endpoint(""))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let products = response.json::<Vec<Product>>().await.map_err(transport)?;
        debug!(count = products.len(), "fetched product list");
        Ok(products)
    }

    /// GET a single product. Any non-2xx answer maps to `NotFound`, which
    /// feeds the dedicated not-found view.
    pub async fn get(&self, sku: &str) -> Result<Product, GatewayError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/{}", sku)))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(sku, %status, "product fetch failed");
            return Err(GatewayError::NotFound(sku.to_string()));
        }
        response.json::<Product>().await.map_err(transport)
    }

    /// POST a new product. The server assigns `sku` and `entry_date`.
    pub async fn create(&self, payload: &ProductPayload) -> Result<Product, GatewayError> {
        debug!(name = %payload.name, "creating product");
        let response = self
            .client
            .post(self.endpoint(""))
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response.json::<Product>().await.map_err(transport)
    }

    /// PUT a full replacement of the product behind `sku`.
    pub async fn update(
        &self,
        sku: &str,
        payload: &ProductPayload,
    ) -> Result<Product, GatewayError> {
        debug!(sku, "updating product");
        let response = self
            .client
            .put(self.endpoint(&format!("/{}", sku)))
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response.json::<Product>().await.map_err(transport)
    }

    /// DELETE one product. 200 and 204 both count as success.
    pub async fn delete(&self, sku: &str) -> Result<(), GatewayError> {
        debug!(sku, "deleting product");
        let response = self
            .client
            .delete(self.endpoint(&format!("/{}", sku)))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    /// Turn a non-2xx response into `RemoteRejected`, pulling the server's
    /// `detail` message out of the body when one is present.
    async fn rejection(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.detail)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        warn!(%status, %detail, "remote rejected request");
        GatewayError::RemoteRejected {
            status: status.as_u16(),
            detail,
        }
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}
