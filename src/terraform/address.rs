//! Resource addresses used in the Terraform configuration being imported into.

use once_cell::sync::Lazy;
use regex::Regex;

/// The account is a singleton resource
pub const ACCOUNT_ADDRESS: &str = "cloudflare_account.this";

/// Members live in a `for_each` map keyed by sanitized email
pub const MEMBER_RESOURCE: &str = "cloudflare_account_member.this";

static NON_ALPHANUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]+").expect("static pattern is valid"));

/// Convert an email into the key the Terraform module uses for it.
///
/// Mirrors `replace(lower(member.email), "/[^a-z0-9]+/", "-")` in HCL.
pub fn sanitize_email(email: &str) -> String {
    NON_ALPHANUMERIC_RUN
        .replace_all(&email.to_lowercase(), "-")
        .into_owned()
}

pub fn member_address(email: &str) -> String {
    format!("{}[\"{}\"]", MEMBER_RESOURCE, sanitize_email(email))
}

pub fn member_import_id(account_id: &str, member_id: &str) -> String {
    format!("{}/{}", account_id, member_id)
}
