//! Host model graph
//!
//! The importer talks to the facility model only through [`FacilityGraph`].
//! [`FacilityModel`] is the in-memory implementation used by the CLI and the
//! tests.

mod catalog;
mod facility;

pub use catalog::{ClassCatalog, ClassDefinition, ObjectKind};
pub use facility::{FacilityModel, FacilityObject, LinkGeometry, ModelSession, Network};

use crate::error::ImportResult;
use crate::types::{Location, Property, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to an object or link in the host graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(pub usize);

/// Mutation API of the model the import writes into.
///
/// Calls that take an id fail with [`crate::ImportError::Host`] when the id
/// does not name a live object. Factories return `None` when the host
/// refuses to create the object.
pub trait FacilityGraph {
    fn find_object(&self, name: &str) -> Option<ObjectId>;

    /// Whether the object can be a link endpoint
    fn is_node(&self, id: ObjectId) -> bool;

    fn create_object(&mut self, class_name: &str, location: Location) -> Option<ObjectId>;

    fn create_link(
        &mut self,
        class_name: &str,
        from: ObjectId,
        to: ObjectId,
        vertices: &[Location],
    ) -> Option<ObjectId>;

    fn remove_object(&mut self, id: ObjectId) -> ImportResult<()>;

    fn set_object_name(&mut self, id: ObjectId, name: &str) -> ImportResult<()>;

    fn set_location(&mut self, id: ObjectId, location: Location) -> ImportResult<()>;

    fn size(&self, id: ObjectId) -> ImportResult<Size>;

    fn set_size(&mut self, id: ObjectId, size: Size) -> ImportResult<()>;

    /// Declared property names, in slot order
    fn property_names(&self, id: ObjectId) -> ImportResult<Vec<String>>;

    fn property_mut(&mut self, id: ObjectId, slot: usize) -> ImportResult<&mut Property>;

    /// Network by name, created when missing
    fn get_or_create_network(&mut self, name: &str) -> ImportResult<NetworkId>;

    fn add_to_network(&mut self, link: ObjectId, network: NetworkId) -> ImportResult<()>;

    /// Run `f` as one atomic batch of changes
    fn bulk_update<F>(&mut self, f: F) -> ImportResult<()>
    where
        F: FnOnce(&mut Self) -> ImportResult<()>,
        Self: Sized;
}

/// Provides the model an import runs against
pub trait DesignContext {
    type Graph: FacilityGraph;

    fn active_model_mut(&mut self) -> Option<&mut Self::Graph>;
}
