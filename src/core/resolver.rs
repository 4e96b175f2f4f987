//! Resolving declared members to live Cloudflare member ids.

use crate::cloudflare::client::CloudflareError;
use crate::cloudflare::members::{MemberDirectory, MemberRecord};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Account id must not be empty")]
    EmptyAccountId,

    #[error("Failed to list members for account ID {account_id}: {source}")]
    ListMembers {
        account_id: String,
        #[source]
        source: CloudflareError,
    },
}

/// Live member ids keyed by lower-cased email
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveMemberIndex {
    by_email: HashMap<String, String>,
}

impl LiveMemberIndex {
    /// Records without an email are skipped; the first record wins per email
    pub fn from_members<'a, M, I>(members: I) -> Self
    where
        M: MemberRecord + 'a,
        I: IntoIterator<Item = &'a M>,
    {
        let mut by_email = HashMap::new();
        for member in members {
            let Some(email) = member.email() else {
                debug!("Skipping live member {} without email", member.identifier());
                continue;
            };
            by_email
                .entry(email.to_lowercase())
                .or_insert_with(|| member.identifier().to_string());
        }
        Self { by_email }
    }

    pub fn get(&self, email: &str) -> Option<&str> {
        self.by_email.get(&email.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

/// Fetch the live members of `account_id` and index them by email
pub async fn resolve_members<D>(
    directory: &D,
    account_id: &str,
) -> Result<LiveMemberIndex, ResolveError>
where
    D: MemberDirectory + ?Sized,
{
    if account_id.is_empty() {
        return Err(ResolveError::EmptyAccountId);
    }

    let members = directory
        .list_members(account_id)
        .await
        .map_err(|source| ResolveError::ListMembers {
            account_id: account_id.to_string(),
            source,
        })?;

    let index = LiveMemberIndex::from_members(&members);
    debug!(
        "Indexed {} of {} live members for account {}",
        index.len(),
        members.len(),
        account_id
    );
    Ok(index)
}
