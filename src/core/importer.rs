//! Importing a Cloudflare account and its members into Terraform state.

use crate::cloudflare::members::MemberDirectory;
use crate::core::resolver::{resolve_members, LiveMemberIndex};
use crate::input::model::{CloudflareAccount, CloudflareAccountMember};
use crate::terraform::address::{member_address, member_import_id, ACCOUNT_ADDRESS};
use crate::terraform::executor::{ImportResult, StateImporter};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Account ID is required for import")]
    AccountNotFound,
}

/// Success/failure tally of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn from_results(results: &[ImportResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

pub fn import_account<E>(importer: &E, account_id: &str, dry_run: bool) -> ImportResult
where
    E: StateImporter + ?Sized,
{
    importer.import(ACCOUNT_ADDRESS, account_id, dry_run)
}

/// One result per declared member, in declaration order
pub fn import_account_members<E>(
    importer: &E,
    account_id: &str,
    members: &[CloudflareAccountMember],
    index: &LiveMemberIndex,
    dry_run: bool,
) -> Vec<ImportResult>
where
    E: StateImporter + ?Sized,
{
    members
        .iter()
        .map(|member| {
            let resource_address = member_address(&member.email);
            match index.get(&member.email) {
                Some(member_id) => importer.import(
                    &resource_address,
                    &member_import_id(account_id, member_id),
                    dry_run,
                ),
                None => {
                    let error_msg = format!("Account member '{}' not found", member.email);
                    error!("{}", error_msg);
                    ImportResult::failed(resource_address, "", error_msg)
                }
            }
        })
        .collect()
}

/// Import the account, then each declared member.
///
/// A missing account id aborts before anything is attempted. A failure to
/// list live members is logged and every declared member is then reported
/// as not found.
pub async fn import_state<D, E>(
    directory: &D,
    importer: &E,
    account: &CloudflareAccount,
    dry_run: bool,
) -> Result<Vec<ImportResult>, ImportError>
where
    D: MemberDirectory + ?Sized,
    E: StateImporter + ?Sized,
{
    let Some(account_id) = account.known_account_id() else {
        error!("{}", ImportError::AccountNotFound);
        return Err(ImportError::AccountNotFound);
    };

    info!("Importing resources for account ID: {}", account_id);

    let mut results = Vec::with_capacity(account.members.len() + 1);
    results.push(import_account(importer, account_id, dry_run));

    if !account.members.is_empty() {
        let index = match resolve_members(directory, account_id).await {
            Ok(index) => index,
            Err(e) => {
                error!("{}", e);
                LiveMemberIndex::default()
            }
        };

        results.extend(import_account_members(
            importer,
            account_id,
            &account.members,
            &index,
            dry_run,
        ));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let results = vec![
            ImportResult::succeeded(ACCOUNT_ADDRESS, "acct-123"),
            ImportResult::failed("cloudflare_account_member.this[\"x\"]", "", "nope"),
            ImportResult::succeeded("cloudflare_account_member.this[\"y\"]", "acct-123/m"),
        ];

        let summary = ImportSummary::from_results(&results);
        assert_eq!(
            summary,
            ImportSummary {
                succeeded: 2,
                failed: 1
            }
        );
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_summary_empty_is_success() {
        let summary = ImportSummary::from_results(&[]);
        assert!(summary.is_success());
        assert_eq!(summary.exit_code(), 0);
    }
}
