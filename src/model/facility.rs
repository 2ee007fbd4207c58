//! In-memory facility model

use super::{ClassCatalog, DesignContext, FacilityGraph, NetworkId, ObjectId, ObjectKind};
use crate::error::{ImportError, ImportResult};
use crate::types::{Location, Property, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Geometry and membership of a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGeometry {
    pub from: ObjectId,
    pub to: ObjectId,
    #[serde(default)]
    pub vertices: Vec<Location>,
    #[serde(default)]
    pub networks: Vec<String>,
}

/// An object or link placed in the facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityObject {
    pub id: ObjectId,
    pub name: String,
    pub class_name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkGeometry>,
}

impl FacilityObject {
    /// Property by name, ignoring case
    pub fn property(&self, name: &str) -> Option<&Property> {
        let lower = name.to_lowercase();
        self.properties.iter().find(|p| p.name.to_lowercase() == lower)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
}

/// The facility graph: objects, links and networks of one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityModel {
    pub name: String,
    #[serde(default = "ClassCatalog::standard")]
    pub catalog: ClassCatalog,
    #[serde(default)]
    objects: Vec<FacilityObject>,
    #[serde(default)]
    networks: Vec<Network>,
    #[serde(skip)]
    names: HashMap<String, ObjectId>,
    #[serde(skip)]
    next_id: u64,
    #[serde(skip)]
    batch_depth: u32,
    #[serde(skip)]
    pending_changes: u64,
    #[serde(skip)]
    revision: u64,
}

impl FacilityModel {
    pub fn new(name: impl Into<String>, catalog: ClassCatalog) -> Self {
        Self {
            name: name.into(),
            catalog,
            objects: Vec::new(),
            networks: Vec::new(),
            names: HashMap::new(),
            next_id: 1,
            batch_depth: 0,
            pending_changes: 0,
            revision: 0,
        }
    }

    /// Read a model saved with [`FacilityModel::save`]
    pub fn load(path: &Path) -> ImportResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut model: FacilityModel = serde_yaml::from_str(&content)?;
        model.reindex()?;
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> ImportResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    fn reindex(&mut self) -> ImportResult<()> {
        self.objects.sort_by_key(|o| o.id);
        self.names.clear();
        for object in &self.objects {
            if self.names.insert(object.name.clone(), object.id).is_some() {
                return Err(ImportError::Host(format!(
                    "Duplicate object name '{}' in model",
                    object.name
                )));
            }
        }
        self.next_id = self.objects.last().map(|o| o.id.0 + 1).unwrap_or(1);
        Ok(())
    }

    pub fn objects(&self) -> &[FacilityObject] {
        &self.objects
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn object(&self, id: ObjectId) -> Option<&FacilityObject> {
        self.objects
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|idx| &self.objects[idx])
    }

    pub fn object_by_name(&self, name: &str) -> Option<&FacilityObject> {
        self.names.get(name).and_then(|id| self.object(*id))
    }

    /// Non-link objects
    pub fn nodes_and_fixed(&self) -> impl Iterator<Item = &FacilityObject> {
        self.objects.iter().filter(|o| o.link.is_none())
    }

    pub fn links(&self) -> impl Iterator<Item = &FacilityObject> {
        self.objects.iter().filter(|o| o.link.is_some())
    }

    /// Number of completed change notifications
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn object_mut(&mut self, id: ObjectId) -> ImportResult<&mut FacilityObject> {
        match self.objects.binary_search_by_key(&id, |o| o.id) {
            Ok(idx) => Ok(&mut self.objects[idx]),
            Err(_) => Err(unknown(id)),
        }
    }

    fn get(&self, id: ObjectId) -> ImportResult<&FacilityObject> {
        self.object(id).ok_or_else(|| unknown(id))
    }

    /// Record a change; notified now, or when the outermost batch ends
    fn touch(&mut self) {
        if self.batch_depth == 0 {
            self.revision += 1;
        } else {
            self.pending_changes += 1;
        }
    }

    fn default_name(&self, class_name: &str) -> String {
        (1u64..)
            .map(|n| format!("{class_name}{n}"))
            .find(|candidate| !self.names.contains_key(candidate))
            .unwrap_or_else(|| class_name.to_string())
    }

    fn insert(&mut self, class_name: &str, location: Location, link: Option<LinkGeometry>) -> Option<ObjectId> {
        let class = self.catalog.get(class_name)?.clone();
        let expect_link = link.is_some();
        if (class.kind == ObjectKind::Link) != expect_link {
            return None;
        }

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let name = self.default_name(&class.name);
        self.names.insert(name.clone(), id);
        // ids only grow, so pushing keeps the vector sorted
        self.objects.push(FacilityObject {
            id,
            name,
            class_name: class.name.clone(),
            kind: class.kind,
            location,
            size: class.size,
            properties: class.properties.iter().map(Property::from_definition).collect(),
            link,
        });
        self.touch();
        Some(id)
    }
}

fn unknown(id: ObjectId) -> ImportError {
    ImportError::Host(format!("No object with id {id}"))
}

impl FacilityGraph for FacilityModel {
    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    fn is_node(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(|o| o.kind == ObjectKind::Node)
    }

    fn create_object(&mut self, class_name: &str, location: Location) -> Option<ObjectId> {
        self.insert(class_name, location, None)
    }

    fn create_link(
        &mut self,
        class_name: &str,
        from: ObjectId,
        to: ObjectId,
        vertices: &[Location],
    ) -> Option<ObjectId> {
        if !self.is_node(from) || !self.is_node(to) {
            return None;
        }
        let start = self.object(from)?.location;
        let geometry = LinkGeometry {
            from,
            to,
            vertices: vertices.to_vec(),
            networks: Vec::new(),
        };
        self.insert(class_name, start, Some(geometry))
    }

    fn remove_object(&mut self, id: ObjectId) -> ImportResult<()> {
        self.get(id)?;

        // Links attached to a removed node go with it
        let doomed: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|o| {
                o.id == id
                    || o.link
                        .as_ref()
                        .is_some_and(|l| l.from == id || l.to == id)
            })
            .map(|o| o.id)
            .collect();

        self.objects.retain(|o| !doomed.contains(&o.id));
        self.names.retain(|_, v| !doomed.contains(v));
        self.touch();
        Ok(())
    }

    fn set_object_name(&mut self, id: ObjectId, name: &str) -> ImportResult<()> {
        if name.is_empty() {
            return Err(ImportError::Host("Object name cannot be empty".to_string()));
        }
        if let Some(owner) = self.names.get(name) {
            if *owner == id {
                return Ok(());
            }
            return Err(ImportError::Host(format!(
                "Name '{}' is already used by another object",
                name
            )));
        }

        let object = self.object_mut(id)?;
        let old = std::mem::replace(&mut object.name, name.to_string());
        self.names.remove(&old);
        self.names.insert(name.to_string(), id);
        self.touch();
        Ok(())
    }

    fn set_location(&mut self, id: ObjectId, location: Location) -> ImportResult<()> {
        self.object_mut(id)?.location = location;
        self.touch();
        Ok(())
    }

    fn size(&self, id: ObjectId) -> ImportResult<Size> {
        Ok(self.get(id)?.size)
    }

    fn set_size(&mut self, id: ObjectId, size: Size) -> ImportResult<()> {
        self.object_mut(id)?.size = size;
        self.touch();
        Ok(())
    }

    fn property_names(&self, id: ObjectId) -> ImportResult<Vec<String>> {
        Ok(self.get(id)?.properties.iter().map(|p| p.name.clone()).collect())
    }

    fn property_mut(&mut self, id: ObjectId, slot: usize) -> ImportResult<&mut Property> {
        self.touch();
        let object = self.object_mut(id)?;
        let name = object.name.clone();
        object
            .properties
            .get_mut(slot)
            .ok_or_else(|| ImportError::Host(format!("Object '{}' has no property slot {}", name, slot)))
    }

    fn get_or_create_network(&mut self, name: &str) -> ImportResult<NetworkId> {
        if name.is_empty() {
            return Err(ImportError::Host("Network name cannot be empty".to_string()));
        }
        if let Some(idx) = self.networks.iter().position(|n| n.name == name) {
            return Ok(NetworkId(idx));
        }
        self.networks.push(Network {
            name: name.to_string(),
        });
        self.touch();
        Ok(NetworkId(self.networks.len() - 1))
    }

    fn add_to_network(&mut self, link: ObjectId, network: NetworkId) -> ImportResult<()> {
        let network_name = self
            .networks
            .get(network.0)
            .map(|n| n.name.clone())
            .ok_or_else(|| ImportError::Host(format!("No network with index {}", network.0)))?;

        let object = self.object_mut(link)?;
        let object_name = object.name.clone();
        let geometry = object
            .link
            .as_mut()
            .ok_or_else(|| ImportError::Host(format!("Object '{}' is not a link", object_name)))?;
        if !geometry.networks.contains(&network_name) {
            geometry.networks.push(network_name);
        }
        self.touch();
        Ok(())
    }

    fn bulk_update<F>(&mut self, f: F) -> ImportResult<()>
    where
        F: FnOnce(&mut Self) -> ImportResult<()>,
    {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;

        if self.batch_depth == 0 && self.pending_changes > 0 {
            self.pending_changes = 0;
            self.revision += 1;
        }
        result
    }
}

/// A design session with at most one open model
#[derive(Debug, Default)]
pub struct ModelSession {
    pub model: Option<FacilityModel>,
}

impl ModelSession {
    pub fn new(model: FacilityModel) -> Self {
        Self { model: Some(model) }
    }

    pub fn empty() -> Self {
        Self { model: None }
    }
}

impl DesignContext for ModelSession {
    type Graph = FacilityModel;

    fn active_model_mut(&mut self) -> Option<&mut FacilityModel> {
        self.model.as_mut()
    }
}
