//! Bulk inventory upload from a CSV file

use log::info;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;
use std::path::Path;

use crate::entity::{decode_list, InventoryItem};
use crate::error::{Error, Result};
use crate::fetch::Transport;

/// Client for the inventory upload endpoint
pub struct InventoryUpload {
    transport: Transport,
}

impl InventoryUpload {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Upload a CSV file from disk and return the updated inventory
    pub async fn upload_csv(&self, path: impl AsRef<Path>) -> Result<Vec<InventoryItem>> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("inventory.csv")
            .to_string();
        self.upload_bytes(&file_name, bytes).await
    }

    /// Upload CSV content and return the updated inventory
    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<Vec<InventoryItem>> {
        if bytes.is_empty() {
            return Err(Error::validation("Select a non-empty CSV file to upload"));
        }

        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let body = self
            .transport
            .request(Method::POST, "/inventory/upload")
            .multipart(form)
            .execute::<Value>()
            .await?;
        let items = decode_list::<InventoryItem>(body)?;

        info!("Uploaded {} ({} bytes), inventory now has {} items", file_name, size, items.len());
        Ok(items)
    }
}
