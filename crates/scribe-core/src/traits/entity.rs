//! Entity trait bridging domain models and their collections.

use bson::oid::ObjectId;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A persistable domain entity.
///
/// Implemented by every model that lives in its own collection. The
/// generic repository is parameterized over this trait, so entity-specific
/// repositories only add query methods and declarative metadata
/// (searchable fields, sortable fields, default relations).
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// The collection this entity is stored in.
    const COLLECTION: &'static str;

    /// The entity's primary key.
    fn id(&self) -> ObjectId;
}
