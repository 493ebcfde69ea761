//! Model descriptor types.
//!
//! A [`ModelDescriptor`] is the capability sheet of one model: which fields a
//! caller may select and filter on (with their declared types), which fields
//! may be sorted on, and which fields are searched and how heavily.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Declared type of a model field. Drives filter value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text or an identifier.
    #[default]
    String,
    /// A signed integer.
    Integer,
    /// A floating point number.
    Float,
    /// `true` or `false`.
    Boolean,
    /// A calendar date (`YYYY-MM-DD`).
    Date,
    /// An RFC 3339 timestamp.
    Timestamp,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Date => write!(f, "date"),
            FieldType::Timestamp => write!(f, "timestamp"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(FieldType::String),
            "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "boolean" => Ok(FieldType::Boolean),
            "date" => Ok(FieldType::Date),
            "timestamp" => Ok(FieldType::Timestamp),
            _ => Err(format!("unknown field type: {}", s)),
        }
    }
}

/// A queryable field and its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The field name as it appears in requests and records.
    pub name: String,
    /// The declared type.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

/// A searchable field with an optional relevance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFieldSpec {
    /// The field name.
    pub field: String,
    /// Relative boost applied to matches in this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

/// Per-model capability metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Singular model name (e.g. `bill`).
    pub name: String,

    /// Plural collection name used in routes (e.g. `bills`).
    pub collection: String,

    /// Fields that may be selected and filtered on, in declared order.
    pub fields: Vec<FieldSpec>,

    /// Fields that may appear in a sort list.
    #[serde(default)]
    pub sortable: Vec<String>,

    /// Fields searched by full-text requests, in declared order.
    #[serde(default)]
    pub searchable: Vec<SearchFieldSpec>,

    /// Fields returned when the caller does not ask for specific ones.
    #[serde(default)]
    pub default_fields: Vec<String>,
}

impl ModelDescriptor {
    /// Creates an empty descriptor for the given model and collection.
    pub fn new(name: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            fields: Vec::new(),
            sortable: Vec::new(),
            searchable: Vec::new(),
            default_fields: Vec::new(),
        }
    }

    /// Adds a queryable field.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type,
        });
        self
    }

    /// Sets the sortable fields.
    pub fn with_sortable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a searchable field with an optional weight.
    pub fn with_searchable(mut self, field: impl Into<String>, weight: Option<f32>) -> Self {
        self.searchable.push(SearchFieldSpec {
            field: field.into(),
            weight,
        });
        self
    }

    /// Sets the default output fields.
    pub fn with_default_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the declared type of a queryable field.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.field_type)
    }

    /// Returns true if the field may be selected or filtered on.
    pub fn is_queryable(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Returns true if the field may be sorted on.
    pub fn is_sortable(&self, name: &str) -> bool {
        self.sortable.iter().any(|f| f == name)
    }

    /// Returns the search spec for a field, if it is searchable.
    pub fn searchable_field(&self, name: &str) -> Option<&SearchFieldSpec> {
        self.searchable.iter().find(|s| s.field == name)
    }

    /// Returns the names of all searchable fields in declared order.
    pub fn searchable_names(&self) -> Vec<String> {
        self.searchable.iter().map(|s| s.field.clone()).collect()
    }

    /// Checks internal consistency.
    ///
    /// Sortable and default fields must be queryable, names must be unique,
    /// and weights must be positive.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |message: String| RegistryError::InvalidDescriptor {
            model: self.name.clone(),
            message,
        };

        if self.name.is_empty() || self.collection.is_empty() {
            return Err(invalid("name and collection are required".to_string()));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
        }

        if let Some(field) = self.sortable.iter().find(|f| !self.is_queryable(f)) {
            return Err(invalid(format!("sortable field '{}' is not declared", field)));
        }

        if let Some(field) = self.default_fields.iter().find(|f| !self.is_queryable(f)) {
            return Err(invalid(format!("default field '{}' is not declared", field)));
        }

        if let Some(spec) = self
            .searchable
            .iter()
            .find(|s| s.weight.is_some_and(|w| !(w > 0.0)))
        {
            return Err(invalid(format!(
                "search weight for '{}' must be positive",
                spec.field
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill() -> ModelDescriptor {
        ModelDescriptor::new("bill", "bills")
            .with_field("title", FieldType::String)
            .with_field("status", FieldType::String)
            .with_field("introduced_on", FieldType::Date)
            .with_sortable(["introduced_on"])
            .with_searchable("title", Some(2.0))
            .with_searchable("summary", None)
            .with_default_fields(["title"])
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!("DATE".parse::<FieldType>().unwrap(), FieldType::Date);
        assert!("blob".parse::<FieldType>().is_err());
        assert_eq!(FieldType::Timestamp.to_string(), "timestamp");
    }

    #[test]
    fn test_lookups() {
        let model = bill();
        assert!(model.is_queryable("title"));
        assert!(!model.is_queryable("summary"));
        assert!(model.is_sortable("introduced_on"));
        assert_eq!(model.field_type("introduced_on"), Some(FieldType::Date));
        assert_eq!(model.searchable_field("title").unwrap().weight, Some(2.0));
        assert_eq!(model.searchable_names(), vec!["title", "summary"]);
    }

    #[test]
    fn test_validate() {
        assert!(bill().validate().is_ok());

        let bad = bill().with_sortable(["nope"]);
        assert!(matches!(
            bad.validate(),
            Err(RegistryError::InvalidDescriptor { .. })
        ));

        let bad = bill().with_searchable("text", Some(0.0));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let model: ModelDescriptor = serde_json::from_value(serde_json::json!({
            "name": "hearing",
            "collection": "hearings",
            "fields": [{"name": "chamber"}, {"name": "occurs_at", "type": "timestamp"}]
        }))
        .unwrap();

        assert_eq!(model.field_type("chamber"), Some(FieldType::String));
        assert_eq!(model.field_type("occurs_at"), Some(FieldType::Timestamp));
        assert!(model.sortable.is_empty());
        assert!(model.default_fields.is_empty());
    }
}
