//! Resource handles.
//!
//! A [`Handle`] is a point-in-time snapshot of one server-side resource
//! together with the operations that read or change it remotely. Fields are
//! only as fresh as the last successful construction, [`Handle::refresh`]
//! or setter call.
//!
//! Mutating operations take `&mut self`, so a handle has at most one writer
//! at a time. Handles are not `Clone`; fetch a second one if two owners need
//! the same resource.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, warn};

use vxsdk_common::{
    Collection, CollectionPage, CollectionQuery, Error, FilterKey, Limits, Result, ResultCode,
    WireEnum,
};

use crate::resources::ResourceData;
use crate::transport::{ApiRequest, Method, Transport};

/// Local handle to one remote resource
pub struct Handle<T: ResourceData> {
    transport: Arc<dyn Transport>,
    path: String,
    data: T,
}

impl<T: ResourceData> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("path", &self.path)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: ResourceData> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Fetch one page of `path` and decode its items.
///
/// Filter keys outside `allowed` are logged and still sent.
pub(crate) async fn query_page<V: DeserializeOwned>(
    transport: &dyn Transport,
    path: &str,
    query: &CollectionQuery,
    allowed: &[FilterKey],
) -> Result<Collection<V>> {
    for key in query.outside_allowlist(allowed) {
        warn!(%path, filter = %key, "filter not documented for this collection; the server may ignore it");
    }
    let request = ApiRequest::get(path).with_query(query.to_query_pairs());
    let page: CollectionPage<V> = transport.execute(request).await?.json()?;
    Ok(page.into())
}

/// Reject enum values the server would not understand
pub(crate) fn ensure_known<E: WireEnum>(field: &str, value: E) -> Result<E> {
    if value.is_known() {
        Ok(value)
    } else {
        Err(Error::invalid(field, "value is unknown"))
    }
}

/// Reject ids that would not address exactly one resource
pub(crate) fn check_id<'a>(field: &str, id: &'a str) -> Result<&'a str> {
    if id.is_empty() || id.contains('/') {
        return Err(Error::rejected(
            field,
            ResultCode::InvalidParameters,
            "must be a single non-empty path segment",
        ));
    }
    Ok(id)
}

/// Reject a decoded resource that carries no id
pub(crate) fn identified<T: ResourceData>(path: &str, data: T) -> Result<T> {
    if data.id().is_empty() {
        return Err(Error::Server {
            code: ResultCode::MalformedResponse,
            message: format!("{} returned a resource without an id", path),
        });
    }
    Ok(data)
}

impl<T: ResourceData> Handle<T> {
    pub(crate) fn from_parts(transport: Arc<dyn Transport>, path: String, data: T) -> Self {
        Self {
            transport,
            path,
            data,
        }
    }

    /// Handle for a resource living in its top-level collection
    pub(crate) fn top_level(transport: Arc<dyn Transport>, data: T) -> Self {
        let path = format!("{}/{}", T::COLLECTION, data.id());
        Self::from_parts(transport, path, data)
    }

    /// Fetch the resource at `path`
    pub async fn fetch(transport: Arc<dyn Transport>, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let data: T = transport.execute(ApiRequest::get(path.clone())).await?.json()?;
        let data = identified(&path, data)?;
        Ok(Self::from_parts(transport, path, data))
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn id(&self) -> &str {
        self.data.id()
    }

    /// API path of this resource
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Re-read every field from the server.
    ///
    /// On failure the snapshot is left exactly as it was.
    pub async fn refresh(&mut self) -> Result<()> {
        let fresh: T = self
            .transport
            .execute(ApiRequest::get(self.path.clone()))
            .await?
            .json()?;
        let fresh = identified(&self.path, fresh)?;
        if fresh.id() != self.data.id() {
            return Err(Error::Server {
                code: ResultCode::Conflict,
                message: format!("refresh of {} returned id {}", self.path, fresh.id()),
            });
        }
        debug!(path = %self.path, "refreshed");
        self.data = fresh;
        Ok(())
    }

    /// Send a single-field update and, on success, apply it locally.
    ///
    /// Other fields are not re-read; call [`Handle::refresh`] to observe
    /// server-side side effects.
    pub(crate) async fn update<V: Serialize>(
        &mut self,
        field: &str,
        value: V,
        apply: impl FnOnce(&mut T, V),
    ) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), serde_json::to_value(&value)?);
        self.transport
            .execute(ApiRequest::patch(self.path.clone(), body.into()))
            .await?
            .into_result()?;
        debug!(path = %self.path, field, "updated");
        apply(&mut self.data, value);
        Ok(())
    }

    /// Field constraints for this resource
    pub async fn limits(&self) -> Result<Limits> {
        self.transport
            .execute(ApiRequest::get(format!("{}/limits", self.path)))
            .await?
            .json()
    }

    /// Independently-lived resources referenced from this one.
    ///
    /// Returned handles address the resources in their own collection.
    pub async fn related<R: ResourceData>(
        &self,
        relation: &str,
        query: &CollectionQuery,
        allowed: &[FilterKey],
    ) -> Result<Collection<Handle<R>>> {
        let path = format!("{}/{}", self.path, relation);
        let page: Collection<R> = query_page(self.transport.as_ref(), &path, query, allowed).await?;
        Ok(page.map(|data| Handle::top_level(self.transport.clone(), data)))
    }

    /// Resources owned by this one, addressed under its path
    pub async fn owned_collection<R: ResourceData>(
        &self,
        query: &CollectionQuery,
        allowed: &[FilterKey],
    ) -> Result<Collection<Handle<R>>> {
        let path = format!("{}/{}", self.path, R::COLLECTION);
        let page: Collection<R> = query_page(self.transport.as_ref(), &path, query, allowed).await?;
        Ok(page.map(|data| {
            let child = format!("{}/{}", path, data.id());
            Handle::from_parts(self.transport.clone(), child, data)
        }))
    }

    /// One owned resource by id
    pub async fn owned<R: ResourceData>(&self, id: &str) -> Result<Handle<R>> {
        let id = check_id("id", id)?;
        let path = format!("{}/{}/{}", self.path, R::COLLECTION, id);
        Handle::fetch(self.transport.clone(), path).await
    }

    /// Create a resource owned by this one
    pub async fn create_owned<R: ResourceData, P: Serialize>(&mut self, payload: &P) -> Result<Handle<R>> {
        let collection = format!("{}/{}", self.path, R::COLLECTION);
        let body = serde_json::to_value(payload)?;
        let data: R = self
            .transport
            .execute(ApiRequest::post(collection.clone(), body))
            .await?
            .json()?;
        let data = identified(&collection, data)?;
        let path = format!("{}/{}", collection, data.id());
        Ok(Handle::from_parts(self.transport.clone(), path, data))
    }

    /// Value objects exposed under this resource
    pub async fn related_values<V: DeserializeOwned>(
        &self,
        relation: &str,
        query: &CollectionQuery,
        allowed: &[FilterKey],
    ) -> Result<Collection<V>> {
        let path = format!("{}/{}", self.path, relation);
        query_page(self.transport.as_ref(), &path, query, allowed).await
    }

    /// Add an id-based reference to another resource
    pub async fn link(&mut self, relation: &str, id: &str) -> Result<()> {
        let id = check_id(relation, id)?;
        let path = format!("{}/{}/{}", self.path, relation, id);
        self.transport
            .execute(ApiRequest::new(Method::Put, path))
            .await?
            .into_result()?;
        debug!(path = %self.path, relation, id, "linked");
        Ok(())
    }

    /// Remove an id-based reference
    pub async fn unlink(&mut self, relation: &str, id: &str) -> Result<()> {
        let id = check_id(relation, id)?;
        let path = format!("{}/{}/{}", self.path, relation, id);
        self.transport.execute(ApiRequest::delete(path)).await?.into_result()?;
        debug!(path = %self.path, relation, id, "unlinked");
        Ok(())
    }

    /// Drop the local handle. The remote resource is untouched.
    pub fn release(self) {}

    /// Permanently delete the remote resource.
    ///
    /// On failure the handle is handed back together with the error.
    pub async fn delete_remote(self) -> std::result::Result<(), (Self, Error)> {
        let request = ApiRequest::delete(self.path.clone());
        match self.transport.execute(request).await.and_then(|r| r.into_result()) {
            Ok(_) => {
                debug!(path = %self.path, "deleted");
                Ok(())
            }
            Err(e) => Err((self, e)),
        }
    }
}
