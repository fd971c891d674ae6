//! Client SDK for the Zoho CRM v2 REST API
//!
//! The crate is organized around three cooperating pieces: a metadata mapper
//! that turns the vendor's loosely-structured JSON payloads into typed,
//! immutable descriptors, a response classifier that separates payload data
//! from vendor-reported faults (including business errors carried on
//! HTTP 200), and a storage-agnostic OAuth token contract. A thin
//! reqwest-based client wires them together for the metadata endpoints.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod response;

pub use auth::{FileTokenStore, InMemoryTokenStore, OAuthTokens, TokenStore};
pub use client::{ClientConfig, CrmClient};
pub use error::{ApiFault, Error, MappingError, Result};
pub use metadata::{
    BasicStructureMapper, Criteria, Criterion, CustomViewDescriptor, FieldDescriptor,
    LayoutDescriptor, ModuleDescriptor, ModuleMapper, ProfileRef, RelatedListDescriptor,
    RelatedListProperties, StructureMapper, UserRef, map_custom_view,
    map_related_list_properties,
};
pub use response::{Outcome, ResponseClassifier, ResponseMetadata};
