//! Service-catalog provisioning requests.
//!
//! A request arrives as a custom-resource event. Its `FindAndReplace`
//! parameters become the substitution context; the remaining parameters
//! pick the module, provider and target environment.

use crate::config::Config;
use crate::constants::GENERATED_NAME_LEN;
use crate::context::SubstitutionContext;
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Context keys every request must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["apms_id", "application_name", "entity_name", "environment"];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogEvent {
    pub request_type: String,
    #[serde(default)]
    pub stack_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Option<ResourceProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    #[serde(default)]
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameters {
    #[serde(default)]
    pub find_and_replace: Option<Value>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub provisioner: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub service_provider: Option<String>,
}

/// What the event asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    /// Teardown; nothing is generated.
    Delete,
    Provision(ProvisionRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionRequest {
    /// The entity name, generated when the request left it empty.
    pub request_id: String,
    pub module_name: String,
    pub provider_name: String,
    pub environment: String,
    /// Abbreviated environment; the directory the module lands in.
    pub environment_dir: String,
    pub account_id: String,
    pub service_provider: String,
    pub apms_id: String,
    pub application_name: String,
    pub context: SubstitutionContext,
}

impl CatalogEvent {
    pub fn from_json_str(buf: &str) -> Result<Self> {
        Ok(serde_json::from_str(buf)?)
    }

    pub fn is_delete(&self) -> bool {
        self.request_type == "Delete"
    }

    pub fn action(&self, config: &Config) -> Result<CatalogAction> {
        if self.is_delete() {
            debug!("Delete request, nothing to provision");
            return Ok(CatalogAction::Delete);
        }
        self.provision_request(config).map(CatalogAction::Provision)
    }

    fn parameters(&self) -> Result<&Parameters> {
        self.resource_properties
            .as_ref()
            .and_then(|p| p.parameters.as_ref())
            .ok_or_else(|| missing("ResourceProperties.Parameters"))
    }

    fn provision_request(&self, config: &Config) -> Result<ProvisionRequest> {
        let params = self.parameters()?;
        let find_and_replace =
            params.find_and_replace.clone().ok_or_else(|| missing("FindAndReplace"))?;
        let mut context = SubstitutionContext::from_value(find_and_replace)?;

        let stack_arn = self.stack_id.as_deref().ok_or_else(|| missing("StackId"))?;
        context.insert("cloudformation_stack_arn", stack_arn);
        context.insert("provisioned_product_id", provisioned_product_id(stack_arn)?);

        for key in REQUIRED_KEYS {
            if !context.contains_key(key) {
                return Err(missing(key));
            }
        }

        let apms_id = value_string(&context, "apms_id");
        let application_name = value_string(&context, "application_name");
        let environment = context
            .get_str("environment")
            .ok_or_else(|| Error::InvalidRequest("Parameter 'environment' must be a string".into()))?
            .to_lowercase();
        let environment_dir = config
            .environment_abbreviation(&environment)
            .ok_or_else(|| {
                Error::InvalidRequest(format!("Environment '{environment}' is not supported"))
            })?
            .to_string();

        let mut request_id = context
            .get_str("entity_name")
            .ok_or_else(|| Error::InvalidRequest("Parameter 'entity_name' must be a string".into()))?
            .to_string();
        if request_id.is_empty() {
            warn!("Empty string provided for `entity_name`...");
            request_id = generate_name();
            warn!("Randomly generated `{request_id}` for entity name");
            context.insert("entity_name", request_id.as_str());
        }

        let account_id = params.account_id.clone().ok_or_else(|| missing("AccountId"))?;
        let provider_name =
            params.provisioner.as_deref().ok_or_else(|| missing("Provisioner"))?.to_lowercase();
        let module_name =
            params.resource_type.as_deref().ok_or_else(|| missing("ResourceType"))?.to_lowercase();
        let service_provider =
            params.service_provider.clone().ok_or_else(|| missing("ServiceProvider"))?;

        debug!(
            "APMS ID: {apms_id}  Entity Name: {request_id}  Provisioner: {provider_name}  Resource Type: {module_name}"
        );

        Ok(ProvisionRequest {
            request_id,
            module_name,
            provider_name,
            environment,
            environment_dir,
            account_id,
            service_provider,
            apms_id,
            application_name,
            context,
        })
    }
}

fn missing(name: &str) -> Error {
    Error::InvalidRequest(format!("Parameter '{name}' was not provided"))
}

fn value_string(context: &SubstitutionContext, key: &str) -> String {
    match context.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Second-to-last `-` segment of the stack name in a stack ARN.
///
/// `arn:aws:cloudformation:region:acct:stack/SC-123-pp-abc123-def/guid` yields
/// `abc123`.
pub fn provisioned_product_id(stack_arn: &str) -> Result<String> {
    let malformed = || Error::InvalidRequest(format!("StackId '{stack_arn}' is malformed"));
    let stack_name = stack_arn.split('/').nth(1).ok_or_else(malformed)?;
    let segments: Vec<&str> = stack_name.split('-').collect();
    if segments.len() < 2 {
        return Err(malformed());
    }
    Ok(segments[segments.len() - 2].to_string())
}

/// A lower-case name of [`GENERATED_NAME_LEN`] letters, distinct per call.
pub fn generate_name() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut hasher = Sha256::new();
    hasher.update(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true));
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    let digest = hex::encode(hasher.finalize());

    digest
        .chars()
        .take(GENERATED_NAME_LEN)
        .map(|c| {
            let nibble = c.to_digit(16).unwrap_or(0) as u8;
            (b'a' + nibble) as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STACK_ARN: &str =
        "arn:aws:cloudformation:us-east-1:123456789012:stack/SC-123456789012-pp-abcd1234-xyz/guid";

    fn event(find_and_replace: Value) -> CatalogEvent {
        serde_json::from_value(json!({
            "RequestType": "Create",
            "StackId": STACK_ARN,
            "ResourceProperties": {
                "Parameters": {
                    "FindAndReplace": find_and_replace,
                    "AccountId": "123456789012",
                    "Provisioner": "Terraform",
                    "ResourceType": "EC2",
                    "ServiceProvider": "aws"
                }
            }
        }))
        .unwrap()
    }

    fn parameters() -> Value {
        json!({
            "apms_id": "12345",
            "application_name": "billing",
            "entity_name": "billing-api",
            "environment": "Development",
            "instance_type": "t3.micro"
        })
    }

    fn provision(event: &CatalogEvent) -> ProvisionRequest {
        match event.action(&Config::default()).unwrap() {
            CatalogAction::Provision(request) => request,
            CatalogAction::Delete => panic!("expected a provision request"),
        }
    }

    #[test]
    fn parses_a_provision_request() {
        let request = provision(&event(parameters()));

        assert_eq!(request.request_id, "billing-api");
        assert_eq!(request.module_name, "ec2");
        assert_eq!(request.provider_name, "terraform");
        assert_eq!(request.environment, "development");
        assert_eq!(request.environment_dir, "dev");
        assert_eq!(request.account_id, "123456789012");
        assert_eq!(request.apms_id, "12345");
        assert_eq!(request.context.get_str("instance_type"), Some("t3.micro"));
        assert_eq!(request.context.get_str("cloudformation_stack_arn"), Some(STACK_ARN));
        assert_eq!(request.context.get_str("provisioned_product_id"), Some("abcd1234"));
    }

    #[test]
    fn delete_requests_provision_nothing() {
        let event: CatalogEvent =
            serde_json::from_value(json!({"RequestType": "Delete"})).unwrap();
        assert_eq!(event.action(&Config::default()).unwrap(), CatalogAction::Delete);
    }

    #[test]
    fn missing_required_key_is_a_client_error() {
        let mut params = parameters();
        params.as_object_mut().unwrap().remove("apms_id");

        let err = event(params).action(&Config::default()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Invalid request: Parameter 'apms_id' was not provided.");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let mut params = parameters();
        params["environment"] = json!("staging");

        let err = event(params).action(&Config::default()).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn empty_entity_name_is_generated() {
        let mut params = parameters();
        params["entity_name"] = json!("");

        let request = provision(&event(params));
        assert_eq!(request.request_id.len(), GENERATED_NAME_LEN);
        assert!(request.request_id.chars().all(|c| c.is_ascii_lowercase()));
        assert_eq!(request.context.get_str("entity_name"), Some(request.request_id.as_str()));
    }

    #[test]
    fn generated_names_differ() {
        assert_ne!(generate_name(), generate_name());
    }

    #[test]
    fn malformed_stack_id() {
        assert!(provisioned_product_id("no-slash-here").is_err());
        assert!(provisioned_product_id("arn/single").is_err());
        assert_eq!(provisioned_product_id("arn/a-b-c/x").unwrap(), "b");
    }
}
