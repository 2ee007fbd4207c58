//! Object and link classes known to the model

use crate::error::ImportResult;
use crate::types::{PropertyDefinition, PropertyType, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What an instance of a class is in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Fixed object (Source, Server, ...)
    Fixed,
    /// Node, can be a link endpoint
    Node,
    /// Link between two nodes
    Link,
}

/// A class and its declared properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>, kind: ObjectKind, size: Size) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, def: PropertyDefinition) -> Self {
        self.properties.push(def);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassCatalog {
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
}

impl ClassCatalog {
    /// The built-in standard library classes
    pub fn standard() -> Self {
        let node_size = Size::new(0.5, 0.5, 0.5);
        let link_size = Size::new(1.0, 0.25, 0.1);

        let classes = vec![
            ClassDefinition::new("Source", ObjectKind::Fixed, Size::new(2.0, 1.0, 1.0))
                .property(text("EntityType").with_default("DefaultEntity"))
                .property(expression("InterarrivalTime").with_default("Random.Exponential(0.25)"))
                .property(number("EntitiesPerArrival").with_default("1"))
                .property(assignments("AssignmentsBeforeExiting")),
            ClassDefinition::new("Sink", ObjectKind::Fixed, Size::new(2.0, 1.0, 1.0))
                .property(boolean("DestroyEntities").with_default("True"))
                .property(assignments("AssignmentsOnEntering")),
            ClassDefinition::new("Server", ObjectKind::Fixed, Size::new(2.0, 2.0, 1.0))
                .property(number("InitialCapacity").with_default("1"))
                .property(expression("ProcessingTime").with_default("Random.Triangular(0.1,0.2,0.3)"))
                .property(text("RankingRule").with_default("First In First Out"))
                .property(assignments("AssignmentsOnEntering"))
                .property(assignments("AssignmentsBeforeExiting")),
            ClassDefinition::new("Combiner", ObjectKind::Fixed, Size::new(2.0, 2.0, 1.0))
                .property(expression("BatchQuantity").with_default("1"))
                .property(expression("ProcessingTime").with_default("0"))
                .property(assignments("AssignmentsOnEntering")),
            ClassDefinition::new("Separator", ObjectKind::Fixed, Size::new(2.0, 2.0, 1.0))
                .property(expression("SplitQuantity").with_default("1"))
                .property(expression("ProcessingTime").with_default("0"))
                .property(assignments("AssignmentsOnEntering")),
            ClassDefinition::new("BasicNode", ObjectKind::Node, node_size)
                .property(number("InitialCapacity").with_default("0")),
            ClassDefinition::new("TransferNode", ObjectKind::Node, node_size)
                .property(text("OutboundLinkRule").with_default("Shortest Path"))
                .property(text("EntityDestinationType").with_default("Continue"))
                .property(text("NodeName")),
            ClassDefinition::new("Connector", ObjectKind::Link, link_size)
                .property(expression("SelectionWeight").with_default("1")),
            ClassDefinition::new("Path", ObjectKind::Link, link_size)
                .property(expression("SelectionWeight").with_default("1"))
                .property(boolean("AllowPassing").with_default("True"))
                .property(number("SpeedLimit").with_default("1.4"))
                .property(boolean("DrawnToScale").with_default("True")),
            ClassDefinition::new("TimePath", ObjectKind::Link, link_size)
                .property(expression("SelectionWeight").with_default("1"))
                .property(expression("TravelTime").with_default("0"))
                .property(number("InitialTravelerCapacity").with_default("1")),
            ClassDefinition::new("Conveyor", ObjectKind::Link, link_size)
                .property(expression("SelectionWeight").with_default("1"))
                .property(number("DesiredSpeed").with_default("1"))
                .property(boolean("Accumulating").with_default("True")),
        ];

        Self { classes }
    }

    /// Read class definitions from a YAML file
    pub fn load(path: &Path) -> ImportResult<Self> {
        let content = fs::read_to_string(path)?;
        let catalog: ClassCatalog = serde_yaml::from_str(&content)?;
        Ok(catalog)
    }

    /// Add `other`'s classes, replacing classes of the same name
    pub fn merge(&mut self, other: ClassCatalog) {
        for class in other.classes {
            match self.classes.iter_mut().find(|c| c.name.eq_ignore_ascii_case(&class.name)) {
                Some(existing) => *existing = class,
                None => self.classes.push(class),
            }
        }
    }

    /// Class by name, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

fn text(name: &str) -> PropertyDefinition {
    PropertyDefinition::new(name, PropertyType::Text)
}

fn number(name: &str) -> PropertyDefinition {
    PropertyDefinition::new(name, PropertyType::Number)
}

fn boolean(name: &str) -> PropertyDefinition {
    PropertyDefinition::new(name, PropertyType::Boolean)
}

fn expression(name: &str) -> PropertyDefinition {
    PropertyDefinition::new(name, PropertyType::Expression)
}

/// State assignment table: StateVariableName / NewValue per row
fn assignments(name: &str) -> PropertyDefinition {
    PropertyDefinition::repeating(
        name,
        vec![
            text(&format!("{name}StateVariableName")),
            expression(&format!("{name}NewValue")).with_default("0.0"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_standard_catalog_kinds() {
        let catalog = ClassCatalog::standard();
        assert_eq!(catalog.get("Server").map(|c| c.kind), Some(ObjectKind::Fixed));
        assert_eq!(catalog.get("transfernode").map(|c| c.kind), Some(ObjectKind::Node));
        assert_eq!(catalog.get("PATH").map(|c| c.kind), Some(ObjectKind::Link));
        assert!(catalog.get("Forklift").is_none());
    }

    #[test]
    fn test_server_assignment_fields() {
        let catalog = ClassCatalog::standard();
        let server = catalog.get("Server").unwrap();
        let entering = server
            .properties
            .iter()
            .find(|p| p.name == "AssignmentsOnEntering")
            .unwrap();
        assert!(entering.is_repeating());
        let names: Vec<&str> = entering.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "AssignmentsOnEnteringStateVariableName",
                "AssignmentsOnEnteringNewValue"
            ]
        );
    }

    #[test]
    fn test_load_and_merge() {
        let yaml = r#"
classes:
  - name: Forklift
    kind: fixed
    size: { length: 3.0, width: 1.5, height: 2.0 }
    properties:
      - name: Capacity
        type: number
        default: "2"
  - name: server
    kind: fixed
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let extra = ClassCatalog::load(file.path()).unwrap();
        let mut catalog = ClassCatalog::standard();
        let before = catalog.classes.len();
        catalog.merge(extra);

        assert_eq!(catalog.classes.len(), before + 1);
        let forklift = catalog.get("Forklift").unwrap();
        assert_eq!(forklift.size, Size::new(3.0, 1.5, 2.0));
        assert_eq!(forklift.properties[0].property_type, PropertyType::Number);
        // Replaced wholesale, declared without properties
        assert!(catalog.get("Server").unwrap().properties.is_empty());
    }
}
