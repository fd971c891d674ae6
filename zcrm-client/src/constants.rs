//! Wire constants for the vendor API

/// Default REST endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://www.zohoapis.com/crm/v2/";

/// Authorization header scheme for OAuth access tokens.
pub const OAUTH_HEADER_PREFIX: &str = "Zoho-oauthtoken ";

/// Payload-level status sentinel marking success.
pub const STATUS_SUCCESS: &str = "success";

/// Payload-level status sentinel marking a vendor-reported error.
pub const STATUS_ERROR: &str = "error";

/// HTTP status codes the vendor treats as faulty responses.
pub const FAULTY_RESPONSE_CODES: &[u16] =
    &[204, 304, 400, 401, 403, 404, 405, 413, 415, 429, 500];

pub const RESPONSECODE_NO_CONTENT: u16 = 204;

/// A 204 carries no body, so the fault raised for it is pinned here.
/// The vendor returns no-content when a record id does not resolve.
pub const NO_CONTENT_ERROR_CODE: &str = "No Content";
pub const NO_CONTENT_ERROR_MESSAGE: &str = "INVALID_DATA-The given id seems to be invalid";

/// Fault code used when a faulty HTTP status arrives without a JSON body.
pub const MALFORMED_RESPONSE_CODE: &str = "MALFORMED_RESPONSE";

/// `generated_type` value marking a custom (user-defined) module.
pub const GENERATED_TYPE_CUSTOM: &str = "custom";
