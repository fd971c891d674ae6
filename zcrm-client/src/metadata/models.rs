//! Descriptor models for module metadata
//!
//! All descriptors are value snapshots: constructed once per API response by
//! the mapper and never updated in place.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::structure::{FieldDescriptor, LayoutDescriptor};

/// Metadata for a single CRM module (entity type, e.g. "Leads").
///
/// Mandatory fields mirror the payload keys the vendor always sends;
/// `Option` fields are populated only when the source key was present and
/// non-null. `business_card_field_limit` and `per_page` are the two
/// exceptions and default to 0 when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Primary lookup key for the module.
    pub api_name: String,
    pub id: String,
    pub module_name: String,
    pub singular_label: String,
    pub plural_label: String,
    pub modified_time: DateTime<FixedOffset>,
    pub viewable: bool,
    pub creatable: bool,
    pub editable: bool,
    pub deletable: bool,
    pub convertable: bool,
    pub api_supported: bool,
    pub scoring_supported: bool,
    /// True iff the vendor reported `generated_type: "custom"`.
    pub custom_module: bool,
    pub profiles: Vec<ProfileRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_search_supported: Option<bool>,
    pub business_card_field_limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_card_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_lists: Option<Vec<RelatedListDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts: Option<Vec<LayoutDescriptor>>,
    /// Field collection keyed by field api-name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<HashMap<String, FieldDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_list_properties: Option<RelatedListProperties>,
    /// Vendor-reserved `$properties` block, passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    pub per_page: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_layout_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_custom_view: Option<CustomViewDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_custom_view_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_territory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_territory_name: Option<String>,
}

impl ModuleDescriptor {
    /// Whether this is a user-defined module rather than a vendor-shipped one.
    pub fn is_custom_module(&self) -> bool {
        self.custom_module
    }
}

/// Reference to a permission profile. Identity by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub id: String,
    pub name: String,
}

/// Reference to a user record. Identity by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

/// A declared relationship from one module to another.
///
/// Field-level related-list detail is out of scope here; the entry's raw
/// JSON rides along as free-form properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedListDescriptor {
    pub api_name: String,
    pub properties: Value,
}

/// Sort/field hints for a module's related lists, each independently
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedListProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// A saved, named filter/sort configuration over a module's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomViewDescriptor {
    pub id: String,
    pub module_api_name: String,
    pub display_value: String,
    #[serde(rename = "default")]
    pub is_default: bool,
    pub name: String,
    pub system_name: String,
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
}

/// Parsed custom-view filter expression.
///
/// `pattern` records the traversal order of the vendor's flat criteria list:
/// each leaf contributes its position index in the list, each combinator its
/// literal `and`/`or`. Downstream criteria reconstruction depends on this
/// exact encoding, so a single-condition view keeps an empty pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub criteria: Vec<Criterion>,
    pub pattern: String,
}

/// One leaf condition of a custom-view filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub field: String,
    pub comparator: String,
    /// Scalar or array, depending on the comparator.
    pub value: Value,
}
