use crate::error::PropertyError;
use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Facility Geometry
//==============================================================================

/// A point in facility space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Physical extent of an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.length, self.width, self.height)
    }
}

/// An intermediate waypoint staged for the link it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub link_name: String,
    pub location: Location,
}

impl Vertex {
    pub fn new(link_name: impl Into<String>, location: Location) -> Self {
        Self {
            link_name: link_name.into(),
            location,
        }
    }
}

//==============================================================================
// Properties
//==============================================================================

/// Value type accepted by a scalar property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Free text
    #[default]
    Text,
    /// Decimal number
    Number,
    /// `true` / `false`
    Boolean,
    /// Expression evaluated by the host at run time, stored verbatim
    Expression,
}

impl PropertyType {
    /// Check that `text` is acceptable for this type
    pub fn check(&self, text: &str) -> Result<(), String> {
        match self {
            PropertyType::Text | PropertyType::Expression => Ok(()),
            PropertyType::Number => text
                .trim()
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| "expected a number".to_string()),
            PropertyType::Boolean => {
                let lower = text.trim().to_lowercase();
                if lower == "true" || lower == "false" {
                    Ok(())
                } else {
                    Err("expected true or false".to_string())
                }
            }
        }
    }
}

/// Declared property of an object class.
///
/// A definition with `fields` describes a repeating (tabular) property whose
/// rows each carry one value per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub default: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<PropertyDefinition>,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            default: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn repeating(name: impl Into<String>, fields: Vec<PropertyDefinition>) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::Text,
            default: "0 Rows".to_string(),
            fields,
        }
    }

    pub fn is_repeating(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// A property instance on an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeating: Option<RepeatingProperty>,
}

impl Property {
    /// Instantiate a property from its declaration
    pub fn from_definition(def: &PropertyDefinition) -> Self {
        let repeating = def.is_repeating().then(|| RepeatingProperty {
            fields: def.fields.clone(),
            rows: Vec::new(),
        });
        Self {
            name: def.name.clone(),
            property_type: def.property_type,
            value: def.default.clone(),
            repeating,
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating.is_some()
    }

    /// Assign the property's own value.
    ///
    /// The header value of a repeating property is free text; scalar values
    /// must satisfy the property type.
    pub fn set_value(&mut self, text: &str) -> Result<(), PropertyError> {
        if !self.is_repeating() {
            self.property_type
                .check(text)
                .map_err(|reason| PropertyError::new(&self.name, text, reason))?;
        }
        self.value = text.to_string();
        Ok(())
    }
}

/// Rows of a tabular property
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepeatingProperty {
    pub fields: Vec<PropertyDefinition>,
    #[serde(default)]
    pub rows: Vec<PropertyRow>,
}

impl RepeatingProperty {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a row with every field at its default value
    pub fn create_row(&mut self) -> &mut PropertyRow {
        let row = PropertyRow {
            properties: self.fields.iter().map(Property::from_definition).collect(),
        };
        self.rows.push(row);
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }
}

/// One row of a repeating property
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyRow {
    pub properties: Vec<Property>,
}

impl PropertyRow {
    /// Field by exact name
    pub fn field(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }
}
