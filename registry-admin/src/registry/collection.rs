use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::RemoteError;
use crate::models::{Entity, EntityId};

/// JSON-level access to the REST API, one call per verb.
///
/// Every non-2xx answer or transport failure comes back as a [`RemoteError`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /{resource}`
    async fn list(&self, resource: &str) -> Result<Vec<Value>, RemoteError>;

    /// `GET /{resource}/{field}/{value}`
    async fn list_by(&self, resource: &str, field: &str, value: &str)
        -> Result<Vec<Value>, RemoteError>;

    /// `GET /{resource}/{id}`
    async fn get(&self, resource: &str, id: EntityId) -> Result<Value, RemoteError>;

    /// `POST /{resource}`
    async fn create(&self, resource: &str, payload: Value) -> Result<Value, RemoteError>;

    /// `PUT /{resource}/{id}`
    async fn update(&self, resource: &str, id: EntityId, payload: Value)
        -> Result<Value, RemoteError>;

    /// `DELETE /{resource}/{id}`
    async fn delete(&self, resource: &str, id: EntityId) -> Result<(), RemoteError>;
}

/// Typed CRUD accessor for the collection that holds `E`.
pub struct Collection<'a, E> {
    backend: &'a dyn Backend,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> Collection<'a, E> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self {
            backend,
            _entity: PhantomData,
        }
    }

    pub fn resource(&self) -> &'static str {
        E::RESOURCE
    }

    /// An empty list is a valid answer, not a failure.
    pub async fn list(&self) -> Result<Vec<E>, RemoteError> {
        let raw = self.backend.list(E::RESOURCE).await?;
        decode_all(raw)
    }

    pub async fn list_by(&self, field: &str, value: &str) -> Result<Vec<E>, RemoteError> {
        let raw = self.backend.list_by(E::RESOURCE, field, value).await?;
        decode_all(raw)
    }

    pub async fn get(&self, id: EntityId) -> Result<E, RemoteError> {
        decode(self.backend.get(E::RESOURCE, id).await?)
    }

    /// Returns the stored record; its id is the one dependent writes must use.
    pub async fn create<P: Serialize + Sync>(&self, payload: &P) -> Result<E, RemoteError> {
        let body = serde_json::to_value(payload).map_err(RemoteError::encoding)?;
        decode(self.backend.create(E::RESOURCE, body).await?)
    }

    pub async fn update<P: Serialize + Sync>(&self, id: EntityId, payload: &P) -> Result<E, RemoteError> {
        let body = serde_json::to_value(payload).map_err(RemoteError::encoding)?;
        decode(self.backend.update(E::RESOURCE, id, body).await?)
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), RemoteError> {
        self.backend.delete(E::RESOURCE, id).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RemoteError> {
    Ok(serde_json::from_value(value)?)
}

fn decode_all<T: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, RemoteError> {
    values.into_iter().map(decode).collect()
}
