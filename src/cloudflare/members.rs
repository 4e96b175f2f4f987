//! Account member records as seen through the Cloudflare API.

use crate::cloudflare::client::CloudflareError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The two fields of a live member the importer relies on
pub trait MemberRecord {
    fn email(&self) -> Option<&str>;
    fn identifier(&self) -> &str;
}

/// Anything that can list the live members of an account
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    type Member: MemberRecord + Send;

    async fn list_members(&self, account_id: &str) -> Result<Vec<Self::Member>, CloudflareError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemberUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemberRole {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Member entry returned by `GET /accounts/{account_id}/members`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountMember {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user: Option<MemberUser>,
    #[serde(default)]
    pub roles: Vec<MemberRole>,
}

impl MemberRecord for AccountMember {
    fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.email.as_deref())
    }

    fn identifier(&self) -> &str {
        &self.id
    }
}
