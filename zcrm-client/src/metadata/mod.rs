//! Metadata mapping from vendor JSON payloads to typed descriptors
//!
//! Pure per-call translation: the mapper only reads its input document and
//! allocates fresh descriptors, so it is safe to share across tasks.
//! Mandatory keys fail hard with [`MappingError`]; optional keys follow the
//! present-and-non-null-else-unset rule throughout.

mod json;
pub mod models;
pub mod structure;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

pub use models::{
    Criteria, Criterion, CustomViewDescriptor, ModuleDescriptor, ProfileRef,
    RelatedListDescriptor, RelatedListProperties, UserRef,
};
pub use structure::{BasicStructureMapper, FieldDescriptor, LayoutDescriptor, StructureMapper};

use crate::constants;
use crate::error::MappingError;

const MODULE: &str = "module";
const CUSTOM_VIEW: &str = "custom view";
const CRITERION: &str = "custom view criterion";

/// Maps module payloads into [`ModuleDescriptor`]s.
///
/// The layout/field sub-documents are delegated to the [`StructureMapper`]
/// passed at construction; [`ModuleMapper::new`] wires in the bundled
/// [`BasicStructureMapper`].
#[derive(Debug, Clone, Default)]
pub struct ModuleMapper<S = BasicStructureMapper> {
    structure: S,
}

impl ModuleMapper<BasicStructureMapper> {
    pub fn new() -> Self {
        Self {
            structure: BasicStructureMapper,
        }
    }
}

impl<S: StructureMapper> ModuleMapper<S> {
    /// Use a host-supplied layout/field mapper instead of the bundled one.
    pub fn with_structure(structure: S) -> Self {
        Self { structure }
    }

    /// Map one entry of the `modules` payload into a descriptor.
    pub fn map_module(&self, module: &Value) -> Result<ModuleDescriptor, MappingError> {
        let obj = json::as_object(module, MODULE)?;

        let api_name = json::req_str(obj, "api_name", MODULE)?;
        let modified_time = parse_timestamp(obj, "modified_time")?;
        let generated_type = json::req_str(obj, "generated_type", MODULE)?;

        let modified_by = match json::opt_value(obj, "modified_by") {
            Some(user) => Some(map_user_ref(user)?),
            None => None,
        };

        let profiles = json::req_value(obj, "profiles", MODULE)?
            .as_array()
            .ok_or(MappingError::InvalidType {
                key: "profiles",
                context: MODULE,
                expected: "array",
            })?
            .iter()
            .map(map_profile_ref)
            .collect::<Result<Vec<_>, _>>()?;

        let related_lists = match json::opt_value(obj, "related_lists") {
            Some(lists) => Some(map_related_lists(lists)?),
            None => None,
        };

        let layouts = match json::opt_value(obj, "layouts") {
            Some(layouts) => Some(self.structure.map_layouts(&api_name, layouts)?),
            None => None,
        };
        let fields = match json::opt_value(obj, "fields") {
            Some(fields) => Some(self.structure.map_fields(&api_name, fields)?),
            None => None,
        };

        let related_list_properties = match json::opt_value(obj, "related_list_properties") {
            Some(props) => Some(map_related_list_properties(props)?),
            None => None,
        };

        let (default_custom_view, default_custom_view_id) =
            match json::opt_value(obj, "custom_view") {
                Some(view) => {
                    let mapped = map_custom_view(&api_name, view)?;
                    let id = mapped.id.clone();
                    (Some(mapped), Some(id))
                }
                None => (None, None),
            };

        let (default_territory_id, default_territory_name) =
            match json::opt_value(obj, "territory") {
                Some(territory) => {
                    let territory = json::as_object(territory, "territory")?;
                    (
                        Some(json::req_id(territory, "id", "territory")?),
                        Some(json::req_str(territory, "name", "territory")?),
                    )
                }
                None => (None, None),
            };

        Ok(ModuleDescriptor {
            id: json::req_id(obj, "id", MODULE)?,
            module_name: json::req_str(obj, "module_name", MODULE)?,
            singular_label: json::req_str(obj, "singular_label", MODULE)?,
            plural_label: json::req_str(obj, "plural_label", MODULE)?,
            modified_time,
            viewable: json::req_bool(obj, "viewable", MODULE)?,
            creatable: json::req_bool(obj, "creatable", MODULE)?,
            editable: json::req_bool(obj, "editable", MODULE)?,
            deletable: json::req_bool(obj, "deletable", MODULE)?,
            convertable: json::req_bool(obj, "convertable", MODULE)?,
            api_supported: json::req_bool(obj, "api_supported", MODULE)?,
            scoring_supported: json::req_bool(obj, "scoring_supported", MODULE)?,
            custom_module: generated_type == constants::GENERATED_TYPE_CUSTOM,
            profiles,
            modified_by,
            web_link: json::opt_str(obj, "web_link"),
            sequence_number: json::opt_i64(obj, "sequence_number"),
            global_search_supported: json::opt_bool(obj, "global_search_supported"),
            business_card_field_limit: json::i64_or_zero(obj, "business_card_field_limit", MODULE)?,
            business_card_fields: json::opt_string_list(obj, "business_card_fields", MODULE)?,
            display_field: json::opt_str(obj, "display_field"),
            related_lists,
            layouts,
            fields,
            related_list_properties,
            properties: json::opt_value(obj, "$properties").cloned(),
            per_page: json::i64_or_zero(obj, "per_page", MODULE)?,
            search_layout_fields: json::opt_string_list(obj, "search_layout_fields", MODULE)?,
            default_custom_view,
            default_custom_view_id,
            default_territory_id,
            default_territory_name,
            api_name,
        })
    }

    /// Map a custom-view payload. See [`map_custom_view`].
    pub fn map_custom_view(
        &self,
        module_api_name: &str,
        view: &Value,
    ) -> Result<CustomViewDescriptor, MappingError> {
        map_custom_view(module_api_name, view)
    }
}

/// Map a custom-view payload into a descriptor for the given module.
pub fn map_custom_view(
    module_api_name: &str,
    view: &Value,
) -> Result<CustomViewDescriptor, MappingError> {
    let obj = json::as_object(view, CUSTOM_VIEW)?;

    let criteria = match json::opt_value(obj, "criteria") {
        Some(criteria) => Some(map_criteria(criteria)?),
        None => None,
    };

    Ok(CustomViewDescriptor {
        id: json::req_id(obj, "id", CUSTOM_VIEW)?,
        module_api_name: module_api_name.to_string(),
        display_value: json::req_str(obj, "display_value", CUSTOM_VIEW)?,
        is_default: json::req_bool(obj, "default", CUSTOM_VIEW)?,
        name: json::req_str(obj, "name", CUSTOM_VIEW)?,
        system_name: json::req_str(obj, "system_name", CUSTOM_VIEW)?,
        favorite: json::req_bool(obj, "favorite", CUSTOM_VIEW)?,
        sort_by: json::opt_str(obj, "sort_by"),
        sort_order: json::opt_str(obj, "sort_order"),
        category: json::opt_str(obj, "category"),
        fields: json::opt_string_list(obj, "fields", CUSTOM_VIEW)?,
        offline: json::opt_bool(obj, "offline"),
        criteria,
    })
}

/// Map a `related_list_properties` payload; all three fields are
/// independently optional.
pub fn map_related_list_properties(
    properties: &Value,
) -> Result<RelatedListProperties, MappingError> {
    let obj = json::as_object(properties, "related list properties")?;
    Ok(RelatedListProperties {
        sort_by: json::opt_str(obj, "sort_by"),
        sort_order: json::opt_str(obj, "sort_order"),
        fields: json::opt_string_list(obj, "fields", "related list properties")?,
    })
}

/// Parse a custom-view `criteria` value.
///
/// The vendor sends a single object for a one-condition view and a flat
/// alternating list of leaf objects and `"and"`/`"or"` tokens otherwise.
/// The shapes are told apart by whether the first list element is an
/// object. Leaves contribute their flat-list position index to the pattern
/// string, not a leaf counter: `[A, "and", B]` yields `"0and2"`.
fn map_criteria(criteria: &Value) -> Result<Criteria, MappingError> {
    let mut leaves = Vec::new();
    let mut pattern = String::new();

    match criteria {
        Value::Array(items) if items.first().is_some_and(Value::is_object) => {
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(token) if token == "and" || token == "or" => {
                        pattern.push_str(token);
                    }
                    Value::Object(_) => {
                        leaves.push(map_criterion(item)?);
                        pattern.push_str(&i.to_string());
                    }
                    _ => {
                        return Err(MappingError::InvalidType {
                            key: "criteria",
                            context: CUSTOM_VIEW,
                            expected: "criterion object or and/or token",
                        });
                    }
                }
            }
        }
        // Single-condition shape: one leaf, pattern stays empty.
        _ => leaves.push(map_criterion(criteria)?),
    }

    Ok(Criteria {
        criteria: leaves,
        pattern,
    })
}

fn map_criterion(criterion: &Value) -> Result<Criterion, MappingError> {
    let obj = json::as_object(criterion, CRITERION)?;
    Ok(Criterion {
        field: json::req_str(obj, "field", CRITERION)?,
        comparator: json::req_str(obj, "comparator", CRITERION)?,
        value: json::req_value(obj, "value", CRITERION)?.clone(),
    })
}

fn map_related_lists(lists: &Value) -> Result<Vec<RelatedListDescriptor>, MappingError> {
    let entries = lists.as_array().ok_or(MappingError::InvalidType {
        key: "related_lists",
        context: MODULE,
        expected: "array",
    })?;
    entries
        .iter()
        .map(|entry| {
            let obj = json::as_object(entry, "related list")?;
            Ok(RelatedListDescriptor {
                api_name: json::req_str(obj, "api_name", "related list")?,
                properties: entry.clone(),
            })
        })
        .collect()
}

fn map_profile_ref(profile: &Value) -> Result<ProfileRef, MappingError> {
    let obj = json::as_object(profile, "profile")?;
    Ok(ProfileRef {
        id: json::req_id(obj, "id", "profile")?,
        name: json::req_str(obj, "name", "profile")?,
    })
}

fn map_user_ref(user: &Value) -> Result<UserRef, MappingError> {
    let obj = json::as_object(user, "modified_by user")?;
    Ok(UserRef {
        id: json::req_id(obj, "id", "modified_by user")?,
        name: json::req_str(obj, "name", "modified_by user")?,
    })
}

fn parse_timestamp(
    obj: &Map<String, Value>,
    key: &'static str,
) -> Result<DateTime<FixedOffset>, MappingError> {
    let raw = json::req_str(obj, key, MODULE)?;
    DateTime::parse_from_rfc3339(&raw).map_err(|_| MappingError::InvalidType {
        key,
        context: MODULE,
        expected: "RFC 3339 timestamp",
    })
}
