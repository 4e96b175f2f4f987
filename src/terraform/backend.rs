//! S3 backend configuration derived from the provisioning context.

use crate::input::model::TerraformModuleProvisionData;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

pub const BACKEND_FILE_NAME: &str = "backend.tf.json";

pub fn render_backend(data: &TerraformModuleProvisionData) -> Value {
    json!({
        "terraform": {
            "backend": {
                "s3": {
                    "bucket": data.tf_state_bucket,
                    "key": data.tf_state_key,
                    "region": data.tf_state_region,
                    "dynamodb_table": data.tf_state_dynamodb_table,
                }
            }
        }
    })
}

/// Write `backend.tf.json` into `dir`. In dry-run mode only the target is logged.
pub fn write_backend_file(
    dir: &Path,
    data: &TerraformModuleProvisionData,
    dry_run: bool,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(BACKEND_FILE_NAME);

    if dry_run {
        info!(
            "[dry-run] would write backend configuration to {}",
            path.display()
        );
        return Ok(path);
    }

    let content = serde_json::to_string_pretty(&render_backend(data))?;
    std::fs::write(&path, content)?;
    info!(
        "Wrote backend configuration for s3://{}/{} to {}",
        data.tf_state_bucket,
        data.tf_state_key,
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provision_data() -> TerraformModuleProvisionData {
        TerraformModuleProvisionData {
            tf_state_bucket: "external-resources-terraform-state-dev".to_string(),
            tf_state_region: "us-east-1".to_string(),
            tf_state_dynamodb_table: "external-resources-terraform-lock".to_string(),
            tf_state_key: "cloudflare/dev/account/example/terraform.tfstate".to_string(),
        }
    }

    #[test]
    fn test_render_backend() {
        let rendered = render_backend(&provision_data());
        let s3 = &rendered["terraform"]["backend"]["s3"];

        assert_eq!(s3["bucket"], "external-resources-terraform-state-dev");
        assert_eq!(s3["region"], "us-east-1");
        assert_eq!(s3["dynamodb_table"], "external-resources-terraform-lock");
        assert_eq!(
            s3["key"],
            "cloudflare/dev/account/example/terraform.tfstate"
        );
    }

    #[test]
    fn test_write_backend_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_backend_file(dir.path(), &provision_data(), false).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, render_backend(&provision_data()));
    }

    #[test]
    fn test_write_backend_file_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_backend_file(dir.path(), &provision_data(), true).unwrap();

        assert_eq!(path, dir.path().join(BACKEND_FILE_NAME));
        assert!(!path.exists());
    }
}
