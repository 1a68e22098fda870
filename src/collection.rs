//! Remote collection client: list, create, update and delete for one entity type

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::marker::PhantomData;

use crate::entity::{decode_list, decode_record, Draft, Entity};
use crate::error::Result;
use crate::fetch::Transport;

/// The four operations a list view needs from the backend.
///
/// Records returned by `create` and `update` are authoritative; the server may normalize fields.
#[async_trait]
pub trait RemoteCollection<E: Entity>: Send + Sync {
    /// Fetch the full collection
    async fn list(&self) -> Result<Vec<E>>;

    /// Persist a new record
    async fn create(&self, draft: &Draft) -> Result<E>;

    /// Replace the editable fields of a record
    async fn update(&self, id: &str, draft: &Draft) -> Result<E>;

    /// Remove a record
    async fn delete(&self, id: &str) -> Result<()>;
}

/// `RemoteCollection` over the REST API, using the paths from the entity's schema
pub struct HttpCollection<E: Entity> {
    transport: Transport,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpCollection<E> {
    /// Create a new HttpCollection
    pub(crate) fn new(transport: Transport) -> Self {
        Self {
            transport,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Clone for HttpCollection<E> {
    fn clone(&self) -> Self {
        Self::new(self.transport.clone())
    }
}

#[async_trait]
impl<E: Entity> RemoteCollection<E> for HttpCollection<E> {
    async fn list(&self) -> Result<Vec<E>> {
        let body = self
            .transport
            .request(Method::GET, E::schema().resource)
            .execute::<Value>()
            .await?;
        decode_list(body)
    }

    async fn create(&self, draft: &Draft) -> Result<E> {
        let body = self
            .transport
            .request(Method::POST, E::schema().create_path)
            .json(&draft.to_payload())
            .execute::<Value>()
            .await?;
        decode_record(body)
    }

    async fn update(&self, id: &str, draft: &Draft) -> Result<E> {
        let body = self
            .transport
            .record_request(Method::PUT, E::schema().resource, id)
            .json(&draft.to_payload())
            .execute::<Value>()
            .await?;
        decode_record(body)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.transport
            .record_request(Method::DELETE, E::schema().resource, id)
            .execute_empty()
            .await
    }
}
