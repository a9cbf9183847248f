//! Generic CRUD client shared by every resource kind.

use inventory_core::query::QueryParams;
use inventory_core::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use crate::client::InventoryClient;

/// A resource kind served under `/<PATH>/<id>`.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection path relative to the API base.
    const PATH: &'static str;

    /// Identifier used in the item path.
    fn id(&self) -> &str;
}

/// CRUD operations for one resource kind.
#[derive(Debug)]
pub struct ResourceClient<'a, R> {
    client: &'a InventoryClient,
    resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ResourceClient<'_, R> {}

impl<'a, R> ResourceClient<'a, R>
where
    R: Resource,
{
    pub(crate) fn new(client: &'a InventoryClient) -> Self {
        Self {
            client,
            resource: PhantomData,
        }
    }

    /// Fetch one object by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`inventory_core::Error::NotFound`] if no such object exists.
    pub async fn get(&self, id: &str) -> Result<R> {
        let url = self.client.item_url(R::PATH, id)?;
        self.client.get_json(url, &QueryParams::new()).await
    }

    /// Fetch every object, in the order the service returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the list cannot be decoded.
    pub async fn get_all(&self) -> Result<Vec<R>> {
        let url = self.client.url(R::PATH)?;
        self.client.get_json(url, &QueryParams::new()).await
    }

    /// Create an object.
    ///
    /// # Errors
    ///
    /// Returns [`inventory_core::Error::Conflict`] if it already exists.
    pub async fn create(&self, object: &R) -> Result<()> {
        let url = self.client.url(R::PATH)?;
        self.client.send_empty(Method::POST, url, Some(object)).await
    }

    /// Replace an object, addressed by its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the update.
    pub async fn update(&self, object: &R) -> Result<()> {
        let url = self.client.item_url(R::PATH, object.id())?;
        self.client.send_empty(Method::PUT, url, Some(object)).await
    }

    /// Delete an object, addressed by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`inventory_core::Error::NotFound`] if it does not exist.
    pub async fn delete(&self, object: &R) -> Result<()> {
        let url = self.client.item_url(R::PATH, object.id())?;
        self.client.send_empty::<()>(Method::DELETE, url, None).await
    }
}
