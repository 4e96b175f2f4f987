//! Reading the input document.

use crate::input::model::AppInterfaceInput;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read input file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse an input document from its JSON text
pub fn parse_input(content: &str) -> Result<AppInterfaceInput, serde_json::Error> {
    serde_json::from_str(content)
}

/// Read and parse the input document at `path`
pub fn read_input_from_file(path: &Path) -> Result<AppInterfaceInput, InputError> {
    debug!("Reading input document from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let input = parse_input(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded input for account '{}' with {} declared members",
        input.data.name,
        input.data.members.len()
    );
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> serde_json::Value {
        json!({
            "data": {
                "account_id": "acct-123",
                "name": "Test Account",
                "members": [
                    { "email": "user@example.com", "roles": ["Administrator Read Only"] }
                ],
            },
            "provision": {
                "provision_provider": "cloudflare",
                "provisioner": "dev",
                "provider": "account",
                "identifier": "cloudflare-account-example",
                "target_cluster": "appint-ex-01",
                "target_namespace": "cloudflare-account-example",
                "target_secret_name": "creds-cloudflare-account-example",
                "module_provision_data": {
                    "tf_state_bucket": "external-resources-terraform-state-dev",
                    "tf_state_region": "us-east-1",
                    "tf_state_dynamodb_table": "external-resources-terraform-lock",
                    "tf_state_key": "cloudflare/dev/account/example/terraform.tfstate",
                },
            },
        })
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, sample_document().to_string()).unwrap();

        let input = read_input_from_file(&path).unwrap();
        assert_eq!(input.data.account_id.as_deref(), Some("acct-123"));
        assert_eq!(input.data.members.len(), 1);
        assert_eq!(
            input.provision.module_provision_data.tf_state_region,
            "us-east-1"
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut doc = sample_document();
        doc["data"]["settings"] = json!({ "abuse_contact_email": "abuse@example.com" });

        assert!(parse_input(&doc.to_string()).is_ok());
    }

    #[test]
    fn test_missing_data_section() {
        let mut doc = sample_document();
        doc.as_object_mut().unwrap().remove("data");

        assert!(parse_input(&doc.to_string()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input_from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_input_from_file(&path).unwrap_err();
        assert!(matches!(err, InputError::Parse { .. }));
        assert!(err.to_string().contains("input.json"));
    }
}
