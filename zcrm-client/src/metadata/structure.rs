//! Layout and field collection mapping
//!
//! The module mapper delegates the `layouts` and `fields` sub-documents to a
//! [`StructureMapper`]; only the call contract is fixed here. Hosts with
//! richer layout/field models implement the trait themselves;
//! [`BasicStructureMapper`] covers the common keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::json;
use crate::error::MappingError;

/// Mapper for a module's nested layout/field sub-documents.
///
/// Implementations receive the owning module's api-name and the raw
/// sub-document exactly as the vendor sent it.
pub trait StructureMapper {
    /// Map a `layouts` sub-document into an ordered layout sequence.
    fn map_layouts(
        &self,
        module_api_name: &str,
        layouts: &Value,
    ) -> Result<Vec<LayoutDescriptor>, MappingError>;

    /// Map a `fields` sub-document into a collection keyed by field api-name.
    fn map_fields(
        &self,
        module_api_name: &str,
        fields: &Value,
    ) -> Result<HashMap<String, FieldDescriptor>, MappingError>;
}

/// Metadata for one record layout of a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

/// Metadata for one field of a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field: Option<bool>,
}

/// Bundled [`StructureMapper`] covering the keys common to every layout and
/// field entry. The module api-name is not needed for these.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStructureMapper;

impl StructureMapper for BasicStructureMapper {
    fn map_layouts(
        &self,
        _module_api_name: &str,
        layouts: &Value,
    ) -> Result<Vec<LayoutDescriptor>, MappingError> {
        let entries = layouts.as_array().ok_or(MappingError::InvalidType {
            key: "layouts",
            context: "module",
            expected: "array",
        })?;
        entries
            .iter()
            .map(|entry| {
                let obj = json::as_object(entry, "layout")?;
                Ok(LayoutDescriptor {
                    id: json::req_id(obj, "id", "layout")?,
                    name: json::req_str(obj, "name", "layout")?,
                    visible: json::opt_bool(obj, "visible"),
                    status: json::opt_i64(obj, "status"),
                })
            })
            .collect()
    }

    fn map_fields(
        &self,
        _module_api_name: &str,
        fields: &Value,
    ) -> Result<HashMap<String, FieldDescriptor>, MappingError> {
        let entries = fields.as_array().ok_or(MappingError::InvalidType {
            key: "fields",
            context: "module",
            expected: "array",
        })?;
        entries
            .iter()
            .map(|entry| {
                let obj = json::as_object(entry, "field")?;
                let descriptor = FieldDescriptor {
                    api_name: json::req_str(obj, "api_name", "field")?,
                    field_label: json::opt_str(obj, "field_label"),
                    data_type: json::opt_str(obj, "data_type"),
                    length: json::opt_i64(obj, "length"),
                    custom_field: json::opt_bool(obj, "custom_field"),
                };
                Ok((descriptor.api_name.clone(), descriptor))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_layout_entries_in_order() {
        let layouts = json!([
            {"id": "101", "name": "Standard", "visible": true, "status": 1},
            {"id": "102", "name": "Inactive"}
        ]);

        let mapped = BasicStructureMapper.map_layouts("Leads", &layouts).unwrap();
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].id, "101");
        assert_eq!(mapped[0].visible, Some(true));
        assert_eq!(mapped[1].name, "Inactive");
        assert_eq!(mapped[1].status, None);
    }

    #[test]
    fn keys_fields_by_api_name() {
        let fields = json!([
            {"api_name": "Last_Name", "field_label": "Last Name", "data_type": "text", "length": 80},
            {"api_name": "Annual_Revenue", "data_type": "currency", "custom_field": false}
        ]);

        let mapped = BasicStructureMapper.map_fields("Leads", &fields).unwrap();
        assert_eq!(mapped.len(), 2);
        assert_eq!(
            mapped["Last_Name"].field_label.as_deref(),
            Some("Last Name")
        );
        assert_eq!(mapped["Annual_Revenue"].custom_field, Some(false));
    }

    #[test]
    fn rejects_layout_entry_without_id() {
        let layouts = json!([{"name": "Standard"}]);
        let err = BasicStructureMapper
            .map_layouts("Leads", &layouts)
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::MissingKey {
                key: "id",
                context: "layout"
            }
        );
    }

    #[test]
    fn rejects_non_array_fields() {
        let err = BasicStructureMapper
            .map_fields("Leads", &json!({"api_name": "x"}))
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidType { key: "fields", .. }));
    }
}
