//! Codec - persisted representation of asset shells
//!
//! Shells are stored as JSON. All collections in the entity model are ordered
//! maps, so equal shells always encode to identical bytes. Timestamps use the
//! fixed-width form from [`aas_types::timestamp`].
//!
//! Besides the full payload, the store keeps flat row projections
//! ([`ShellRecord`], [`SubmodelRecord`]) that can be read without decoding
//! the whole shell.

use aas_types::{AssetShell, AssetStatus, ElementValue, Submodel};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Row Projections
// ─────────────────────────────────────────────────────────────────────────────

/// Indexed projection of a shell's top-level fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellRecord {
    pub id: String,
    pub id_short: String,
    pub global_asset_id: Option<String>,
    pub description: Option<String>,
    pub status: AssetStatus,
    #[serde(with = "aas_types::timestamp")]
    pub created: DateTime<Utc>,
    #[serde(with = "aas_types::timestamp")]
    pub last_modified: DateTime<Utc>,
    pub version: u64,
    /// Ids of the submodel rows written alongside this shell
    pub submodel_ids: Vec<String>,
}

impl ShellRecord {
    pub fn from_shell(shell: &AssetShell) -> Self {
        Self {
            id: shell.id().to_string(),
            id_short: shell.id_short().to_string(),
            global_asset_id: shell.global_asset_id().map(str::to_string),
            description: shell.description().map(str::to_string),
            status: shell.status(),
            created: shell.created(),
            last_modified: shell.last_modified(),
            version: shell.version(),
            submodel_ids: shell.submodels().values().map(|sm| sm.id().to_string()).collect(),
        }
    }
}

/// Denormalized submodel row, owned by the shell `aas_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmodelRecord {
    pub id: String,
    pub aas_id: String,
    pub id_short: String,
    pub semantic_id: Option<String>,
    pub description: Option<String>,
    pub payload: Submodel,
}

impl SubmodelRecord {
    pub fn new(aas_id: &str, submodel: &Submodel) -> Self {
        Self {
            id: submodel.id().to_string(),
            aas_id: aas_id.to_string(),
            id_short: submodel.id_short().to_string(),
            semantic_id: submodel.semantic_id().map(str::to_string),
            description: submodel.description().map(str::to_string),
            payload: submodel.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shell Payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a shell after checking its identity fields
pub fn encode_shell(shell: &AssetShell) -> Result<Vec<u8>> {
    validate_shell(shell)?;
    Ok(serde_json::to_vec(shell)?)
}

/// Reconstruct a shell; missing or empty identity fields are rejected
pub fn decode_shell(bytes: &[u8]) -> Result<AssetShell> {
    let shell: AssetShell = serde_json::from_slice(bytes)?;
    validate_shell(&shell)?;
    Ok(shell)
}

/// Decode a JSON array of shells (bulk import)
pub fn decode_shells(bytes: &[u8]) -> Result<Vec<AssetShell>> {
    let shells: Vec<AssetShell> = serde_json::from_slice(bytes)?;
    for shell in &shells {
        validate_shell(shell)?;
    }
    Ok(shells)
}

pub fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Structural checks that serde alone cannot express
pub fn validate_shell(shell: &AssetShell) -> Result<()> {
    if shell.id().is_empty() {
        return Err(Error::MalformedRecord("shell id is empty".to_string()));
    }
    if shell.id_short().is_empty() {
        return Err(Error::MalformedRecord(format!(
            "shell {} has an empty id_short",
            shell.id()
        )));
    }

    if shell.last_modified() < shell.created() {
        return Err(Error::MalformedRecord(format!(
            "shell {} was modified before it was created",
            shell.id()
        )));
    }

    for (key, submodel) in shell.submodels() {
        if submodel.id().is_empty() {
            return Err(Error::MalformedRecord(format!(
                "submodel {} of {} has an empty id",
                key,
                shell.id()
            )));
        }
        if key != submodel.id_short() {
            return Err(Error::MalformedRecord(format!(
                "submodel key {} does not match id_short {}",
                key,
                submodel.id_short()
            )));
        }
        for (element_key, element) in submodel.elements() {
            if element_key != element.id_short() {
                return Err(Error::MalformedRecord(format!(
                    "element key {} in {} does not match id_short {}",
                    element_key,
                    key,
                    element.id_short()
                )));
            }
            if let ElementValue::Float(value) = element.value() {
                if !value.is_finite() {
                    return Err(Error::MalformedRecord(format!(
                        "element {} in {} holds non-finite float {}",
                        element_key, key, value
                    )));
                }
            }
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use aas_types::{Element, ElementValue};

    fn robot() -> AssetShell {
        AssetShell::new("urn:aas:robot:R47", "Robot_R47")
            .with_global_asset_id("https://factory.example.com/assets/robot/R47")
            .with_description("Industrial Welding Robot KUKA KR-150")
            .with_submodel(
                Submodel::new("urn:submodel:maintenance:R47", "Maintenance")
                    .with_description("Maintenance schedule and history")
                    .with_element(
                        Element::new("LastService", "2024-09-15T10:00:00")
                            .with_value_type("datetime"),
                    )
                    .with_element(Element::new("ServiceHours", 2100)),
            )
            .with_submodel(
                Submodel::new("urn:submodel:operation:R47", "Operation")
                    .with_semantic_id("urn:semantic:operation")
                    .with_element(Element::new("CurrentTask", "welding"))
                    .with_element(Element::new("Efficiency", 94.5))
                    .with_element(Element::new("Temperature", 42.3))
                    .with_element(Element::new("Running", true)),
            )
    }

    #[test]
    fn test_roundtrip_all_value_kinds() {
        let shell = robot();
        let decoded = decode_shell(&encode_shell(&shell).unwrap()).unwrap();
        assert_eq!(decoded, shell);

        let op = decoded.submodel("Operation").unwrap();
        assert_eq!(op.element("Running").unwrap().value(), &ElementValue::Boolean(true));
        assert_eq!(op.element("Efficiency").unwrap().value(), &ElementValue::Float(94.5));
    }

    #[test]
    fn test_roundtrip_empty_and_awkward_floats() {
        let empty = AssetShell::new("urn:aas:empty", "Empty");
        assert_eq!(decode_shell(&encode_shell(&empty).unwrap()).unwrap(), empty);

        let awkward = AssetShell::new("urn:aas:f", "Floats").with_submodel(
            Submodel::new("urn:sm:f", "Operation")
                .with_element(Element::new("A", 0.1 + 0.2))
                .with_element(Element::new("B", 1e-300))
                .with_element(Element::new("C", 2.0))
                .with_element(Element::new("D", i64::MIN)),
        );
        assert_eq!(decode_shell(&encode_shell(&awkward).unwrap()).unwrap(), awkward);

        let blank = AssetShell::new("urn:aas:blank", "Blank")
            .with_submodel(Submodel::new("urn:sm:blank", "Nothing"));
        assert_eq!(decode_shell(&encode_shell(&blank).unwrap()).unwrap(), blank);
    }

    #[test]
    fn test_encoding_independent_of_insertion_order() {
        let a = Element::new("A", 1);
        let b = Element::new("B", 2);

        let forward = Submodel::new("urn:sm:x", "Operation")
            .with_element(a.clone())
            .with_element(b.clone());
        let backward = Submodel::new("urn:sm:x", "Operation")
            .with_element(b)
            .with_element(a);

        let first = AssetShell::new("urn:aas:x", "X").with_submodel(forward);
        let mut second = first.clone();
        second.attach_submodel(backward);

        let record_a = encode_record(first.submodel("Operation").unwrap()).unwrap();
        let record_b = encode_record(second.submodel("Operation").unwrap()).unwrap();
        assert_eq!(record_a, record_b);
    }

    #[test]
    fn test_timestamps_are_fixed_width_text() {
        let value: serde_json::Value =
            serde_json::from_slice(&encode_shell(&robot()).unwrap()).unwrap();
        let created = value["created"].as_str().unwrap();
        assert_eq!(created.len(), "2024-09-15T10:00:00.000000000Z".len());
        assert!(created.ends_with('Z'));
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn test_missing_identity_fields_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_slice(&encode_shell(&robot()).unwrap()).unwrap();

        for field in ["id", "id_short", "status"] {
            let mut broken = value.clone();
            broken.as_object_mut().unwrap().remove(field);
            let bytes = serde_json::to_vec(&broken).unwrap();
            assert!(matches!(decode_shell(&bytes), Err(Error::MalformedRecord(_))), "{field}");
        }

        value["status"] = serde_json::json!("running");
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(decode_shell(&bytes), Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn test_empty_identity_and_mismatched_keys_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_slice(&encode_shell(&robot()).unwrap()).unwrap();
        value["id_short"] = serde_json::json!("");
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(decode_shell(&bytes), Err(Error::MalformedRecord(_))));

        let mut value: serde_json::Value =
            serde_json::from_slice(&encode_shell(&robot()).unwrap()).unwrap();
        let op = value["submodels"].as_object_mut().unwrap().remove("Operation").unwrap();
        value["submodels"]["Renamed"] = op;
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(decode_shell(&bytes), Err(Error::MalformedRecord(_))));

        assert!(matches!(
            encode_shell(&AssetShell::new("", "NoId")),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_last_modified_before_created_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_slice(&encode_shell(&robot()).unwrap()).unwrap();
        value["created"] = serde_json::json!("2025-01-01T00:00:00.000000000Z");
        value["last_modified"] = serde_json::json!("2024-01-01T00:00:00.000000000Z");
        let bytes = serde_json::to_vec(&value).unwrap();

        assert!(matches!(decode_shell(&bytes), Err(Error::MalformedRecord(_))));

        let array = serde_json::to_vec(&serde_json::json!([value])).unwrap();
        assert!(matches!(decode_shells(&array), Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for value in [f64::NAN, f64::INFINITY] {
            let shell = AssetShell::new("urn:aas:f", "Floats").with_submodel(
                Submodel::new("urn:sm:f", "Operation").with_element(Element::new("A", value)),
            );
            assert!(matches!(encode_shell(&shell), Err(Error::MalformedRecord(_))));
        }
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(decode_shell(b"not json"), Err(Error::MalformedRecord(_))));
        assert!(matches!(decode_shells(b"{}"), Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn test_shell_record_projection() {
        let shell = robot();
        let record = ShellRecord::from_shell(&shell);
        assert_eq!(record.id_short, "Robot_R47");
        assert_eq!(
            record.submodel_ids,
            vec!["urn:submodel:maintenance:R47", "urn:submodel:operation:R47"]
        );

        let back: ShellRecord = decode_record(&encode_record(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }
}
