use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn default_account_type() -> String {
    "standard".to_string()
}

/// Desired Cloudflare account.
///
/// https://registry.terraform.io/providers/cloudflare/cloudflare/latest/docs/resources/account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudflareAccount {
    /// Unknown until the account has been looked up; required for import
    #[serde(default)]
    pub account_id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default = "default_account_type")]
    pub account_type: String,
    #[serde(default)]
    pub enforce_twofactor: bool,
    #[serde(default)]
    pub members: Vec<CloudflareAccountMember>,
}

impl CloudflareAccount {
    /// The account id, if present and non-empty
    pub fn known_account_id(&self) -> Option<&str> {
        self.account_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Declared member of the account. `email` is the join key against live data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudflareAccountMember {
    pub email: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

/// Location of the Terraform state backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerraformModuleProvisionData {
    pub tf_state_bucket: String,
    pub tf_state_region: String,
    pub tf_state_dynamodb_table: String,
    pub tf_state_key: String,
}

/// Provisioning context. Passed through to the Terraform side as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppInterfaceProvision {
    pub provision_provider: String,
    pub provisioner: String,
    pub provider: String,
    pub identifier: String,
    pub target_cluster: String,
    pub target_namespace: String,
    pub target_secret_name: String,
    pub module_provision_data: TerraformModuleProvisionData,
}

/// Top-level input document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppInterfaceInput {
    pub data: CloudflareAccount,
    pub provision: AppInterfaceProvision,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_defaults() {
        let account: CloudflareAccount =
            serde_json::from_value(json!({ "name": "Test Account" })).unwrap();

        assert_eq!(account.account_id, None);
        assert_eq!(account.account_type, "standard");
        assert!(!account.enforce_twofactor);
        assert!(account.members.is_empty());
    }

    #[test]
    fn test_account_type_rename() {
        let account: CloudflareAccount = serde_json::from_value(json!({
            "account_id": "acct-123",
            "name": "Test Account",
            "type": "enterprise",
            "enforce_twofactor": true,
        }))
        .unwrap();

        assert_eq!(account.account_type, "enterprise");
        assert!(account.enforce_twofactor);
    }

    #[test]
    fn test_known_account_id() {
        let mut account: CloudflareAccount =
            serde_json::from_value(json!({ "name": "x", "account_id": "" })).unwrap();
        assert_eq!(account.known_account_id(), None);

        account.account_id = Some("acct-123".to_string());
        assert_eq!(account.known_account_id(), Some("acct-123"));
    }

    #[test]
    fn test_member_roles_are_a_set() {
        let member: CloudflareAccountMember = serde_json::from_value(json!({
            "email": "User@Example.com",
            "roles": ["Administrator", "Administrator Read Only", "Administrator"],
        }))
        .unwrap();

        assert_eq!(member.email, "User@Example.com");
        assert_eq!(member.roles.len(), 2);
    }
}
