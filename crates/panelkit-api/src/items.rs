//! Item CRUD over the authenticated client

use std::sync::Arc;

use serde_json::to_value;
use tracing::debug;

use panelkit_http::{AuthHttpClient, Result};

use crate::endpoints;
use crate::models::{Acknowledgement, Item, ItemDraft};

/// Typed access to the backend item collection
pub struct ItemsService {
    client: Arc<AuthHttpClient>,
}

impl ItemsService {
    pub fn new(client: Arc<AuthHttpClient>) -> Self {
        Self { client }
    }

    /// List all items
    pub async fn list(&self) -> Result<Vec<Item>> {
        let body = self.client.get(endpoints::ITEMS).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Create an item from a draft
    pub async fn create(&self, draft: &ItemDraft) -> Result<Item> {
        let body = self.client.post(endpoints::ITEMS, &to_value(draft)?).await?;
        let item: Item = serde_json::from_value(body)?;
        debug!("Created item {}", item.id);
        Ok(item)
    }

    /// Fetch a single item by identifier
    pub async fn get(&self, id: u64) -> Result<Item> {
        let body = self.client.get(&endpoints::item(id)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Replace an item's fields
    pub async fn update(&self, id: u64, draft: &ItemDraft) -> Result<Item> {
        let body = self
            .client
            .put(&endpoints::item(id), &to_value(draft)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Delete an item by identifier
    pub async fn delete(&self, id: u64) -> Result<Acknowledgement> {
        let body = self.client.delete(&endpoints::item(id)).await?;
        debug!("Deleted item {}", id);
        Ok(serde_json::from_value(body)?)
    }
}
