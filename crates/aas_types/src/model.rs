//! Elements and Submodels

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp::{self, monotonic_now};
use crate::value::ElementValue;

// ─────────────────────────────────────────────────────────────────────────────
// Element
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest unit of asset state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id_short: String,
    value: ElementValue,
    /// Declared semantic type tag (informational only)
    value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
}

impl Element {
    /// Create an element; the type tag defaults to the value kind
    pub fn new(id_short: impl Into<String>, value: impl Into<ElementValue>) -> Self {
        let value = value.into();
        Self {
            id_short: id_short.into(),
            value_type: value.kind_name().to_string(),
            value,
            description: None,
            last_updated: Utc::now(),
        }
    }

    /// Override the declared type tag (e.g. "datetime")
    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id_short(&self) -> &str {
        &self.id_short
    }

    pub fn value(&self) -> &ElementValue {
        &self.value
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Replace the value and refresh `last_updated`
    pub fn set_value(&mut self, value: impl Into<ElementValue>) {
        self.value = value.into();
        self.last_updated = monotonic_now(self.last_updated);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Submodel
// ─────────────────────────────────────────────────────────────────────────────

/// Named collection of elements describing one aspect of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submodel {
    id: String,
    id_short: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    semantic_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    elements: BTreeMap<String, Element>,
}

impl Submodel {
    pub fn new(id: impl Into<String>, id_short: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: id_short.into(),
            semantic_id: None,
            description: None,
            elements: BTreeMap::new(),
        }
    }

    pub fn with_semantic_id(mut self, semantic_id: impl Into<String>) -> Self {
        self.semantic_id = Some(semantic_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder form of [`Submodel::add_element`]
    pub fn with_element(mut self, element: Element) -> Self {
        self.add_element(element);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn id_short(&self) -> &str {
        &self.id_short
    }

    pub fn semantic_id(&self) -> Option<&str> {
        self.semantic_id.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn elements(&self) -> &BTreeMap<String, Element> {
        &self.elements
    }

    pub fn element(&self, id_short: &str) -> Option<&Element> {
        self.elements.get(id_short)
    }

    /// Insert an element under its `id_short`.
    ///
    /// Last write wins: an element already stored under the same key is
    /// replaced and returned.
    pub fn add_element(&mut self, element: Element) -> Option<Element> {
        self.elements.insert(element.id_short.clone(), element)
    }

    /// Update the value of an existing element.
    ///
    /// Returns `false` and changes nothing when no element has that `id_short`.
    pub fn set_element_value(&mut self, id_short: &str, value: impl Into<ElementValue>) -> bool {
        match self.elements.get_mut(id_short) {
            Some(element) => {
                element.set_value(value);
                true
            }
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_tag_defaults_to_kind() {
        let hours = Element::new("ServiceHours", 2100);
        assert_eq!(hours.value_type(), "int");

        let next = Element::new("NextService", "2024-12-15T10:00:00").with_value_type("datetime");
        assert_eq!(next.value_type(), "datetime");
    }

    #[test]
    fn test_add_element_overwrites() {
        let mut sm = Submodel::new("urn:submodel:operation:R47", "Operation");
        assert!(sm.add_element(Element::new("Efficiency", 94.5)).is_none());

        let replaced = sm.add_element(Element::new("Efficiency", 80.0));
        assert_eq!(replaced.map(|e| e.value().clone()), Some(ElementValue::Float(94.5)));
        assert_eq!(sm.elements().len(), 1);
        assert_eq!(sm.element("Efficiency").unwrap().value(), &ElementValue::Float(80.0));
    }

    #[test]
    fn test_set_element_value_refreshes_timestamp() {
        let mut sm = Submodel::new("urn:sm:1", "Operation").with_element(Element::new("Temperature", 42.3));
        let before = sm.element("Temperature").unwrap().last_updated();

        assert!(sm.set_element_value("Temperature", 65.0));

        let element = sm.element("Temperature").unwrap();
        assert_eq!(element.value(), &ElementValue::Float(65.0));
        assert!(element.last_updated() >= before);
    }

    #[test]
    fn test_set_element_value_missing_is_noop() {
        let mut sm = Submodel::new("urn:sm:1", "Operation");
        let snapshot = sm.clone();

        assert!(!sm.set_element_value("Temperature", 65.0));
        assert_eq!(sm, snapshot);
    }
}
