//! HTTP client for the metadata endpoints
//!
//! Thin glue over reqwest: issue the request, hand the body and status to
//! the [`ResponseClassifier`], and map the resulting payload with the
//! [`ModuleMapper`]. Retry policy and caching are the caller's concern.

use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use crate::constants;
use crate::error::{ApiFault, Error, MappingError, Result};
use crate::metadata::{ModuleDescriptor, ModuleMapper};
use crate::response::{Outcome, ResponseClassifier};

/// Connection settings for a [`CrmClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, with a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the vendor's module-metadata endpoints.
///
/// One instance per configuration and access token, passed explicitly to
/// whoever needs it; cheap to clone.
#[derive(Debug, Clone)]
pub struct CrmClient {
    http: reqwest::Client,
    config: ClientConfig,
    access_token: String,
    classifier: ResponseClassifier,
    mapper: ModuleMapper,
}

impl CrmClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::default(), access_token)
    }

    pub fn with_config(config: ClientConfig, access_token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            access_token: access_token.into(),
            classifier: ResponseClassifier::new(),
            mapper: ModuleMapper::new(),
        })
    }

    /// Replace the default faulty-status classification.
    pub fn with_classifier(mut self, classifier: ResponseClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Fetch metadata for every module visible to the authenticated user.
    ///
    /// GET `settings/modules`; the whole `modules` array is mapped.
    pub async fn get_all_modules(&self) -> Result<Vec<ModuleDescriptor>> {
        let outcome = self.get("settings/modules").await?;
        let Outcome::Success { payload, .. } = outcome else {
            return Ok(Vec::new());
        };
        let Value::Array(modules) = payload else {
            return Err(MappingError::InvalidType {
                key: "modules",
                context: "module list response",
                expected: "array",
            }
            .into());
        };
        modules
            .iter()
            .map(|module| self.mapper.map_module(module).map_err(Error::from))
            .collect()
    }

    /// Fetch metadata for a single module by api-name.
    ///
    /// GET `settings/modules/{api_name}`; the first `modules` element is
    /// mapped.
    pub async fn get_module(&self, api_name: &str) -> Result<ModuleDescriptor> {
        let path = format!("settings/modules/{}", urlencoding::encode(api_name));
        let outcome = self.get(&path).await?;

        let payload = match outcome {
            Outcome::Success { payload, .. } => payload,
            Outcome::Empty => {
                return Err(MappingError::MissingKey {
                    key: "modules",
                    context: "module response",
                }
                .into());
            }
        };
        let module = match payload {
            Value::Array(mut modules) if !modules.is_empty() => modules.remove(0),
            _ => {
                return Err(MappingError::InvalidType {
                    key: "modules",
                    context: "module response",
                    expected: "non-empty array",
                }
                .into());
            }
        };
        Ok(self.mapper.map_module(&module)?)
    }

    async fn get(&self, path: &str) -> Result<Outcome> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .header(
                "Authorization",
                format!("{}{}", constants::OAUTH_HEADER_PREFIX, self.access_token),
            )
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let status = response.status().as_u16();

        let body = if status == constants::RESPONSECODE_NO_CONTENT {
            None
        } else {
            let text = response.text().await?;
            match parse_body(&text, status) {
                Ok(body) => body,
                Err(fault) => {
                    warn!("API fault on {path}: {fault}");
                    return Err(fault.into());
                }
            }
        };
        debug!("GET {path} -> HTTP {status}");

        self.classifier.classify(body, status).map_err(|fault| {
            warn!("API fault on {path}: {fault}");
            fault.into()
        })
    }
}

/// An empty body classifies the same as an absent one; anything else must be
/// valid JSON. A body that fails to decode is a broken vendor response and is
/// surfaced as a fault, never folded into an empty outcome.
fn parse_body(text: &str, status_code: u16) -> std::result::Result<Option<Value>, ApiFault> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some).map_err(|_| ApiFault {
        status_code,
        code: constants::MALFORMED_RESPONSE_CODE.to_string(),
        message: "response body is not valid JSON".to_string(),
        details: Value::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn garbage_body_on_http_200_surfaces_a_fault() {
        let fault = parse_body("this is not json", 200).unwrap_err();
        assert_eq!(fault.status_code, 200);
        assert_eq!(fault.code, "MALFORMED_RESPONSE");
    }

    #[test]
    fn empty_body_reads_as_absent() {
        assert_eq!(parse_body("", 200).unwrap(), None);
        assert_eq!(parse_body("  \n", 200).unwrap(), None);
    }

    #[test]
    fn valid_body_decodes() {
        let body = parse_body(r#"{"modules": []}"#, 200).unwrap();
        assert_eq!(body, Some(json!({"modules": []})));
    }

    #[test]
    fn swapped_classifier_drives_fault_detection() {
        let client = CrmClient::new("1000.token")
            .unwrap()
            .with_classifier(ResponseClassifier::with_faulty_codes(vec![418]));

        let fault = client
            .classifier
            .classify(Some(json!({"code": "TEAPOT", "message": "m"})), 418)
            .unwrap_err();
        assert_eq!(fault.code, "TEAPOT");
        // 500 is no longer faulty under the override.
        assert!(client.classifier.classify(None, 500).is_ok());
    }

    #[test]
    fn default_config_points_at_the_v2_endpoint() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.zohoapis.com/crm/v2/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn client_builds_with_a_custom_base_url() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = ClientConfig {
            base_url: "https://sandbox.zohoapis.com/crm/v2/".to_string(),
            ..ClientConfig::default()
        };
        let client = CrmClient::with_config(config, "1000.token").unwrap();
        assert_eq!(
            client.config.base_url,
            "https://sandbox.zohoapis.com/crm/v2/"
        );
    }
}
