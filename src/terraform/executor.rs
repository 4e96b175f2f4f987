//! Running `terraform import` for a single resource.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("Terraform binary '{0}' not found in PATH")]
    BinaryNotFound(String),

    #[error("Terraform working directory does not exist: {0}")]
    WorkingDirNotFound(PathBuf),
}

/// Outcome of one import attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportResult {
    pub resource_address: String,
    pub import_id: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl ImportResult {
    pub fn succeeded(resource_address: impl Into<String>, import_id: impl Into<String>) -> Self {
        Self {
            resource_address: resource_address.into(),
            import_id: import_id.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failed(
        resource_address: impl Into<String>,
        import_id: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            resource_address: resource_address.into(),
            import_id: import_id.into(),
            success: false,
            error_message: Some(error_message.into()),
        }
    }
}

/// Registers an existing remote object under a state address
pub trait StateImporter {
    fn import(&self, resource_address: &str, import_id: &str, dry_run: bool) -> ImportResult;
}

pub struct TerraformImporter {
    terraform_path: PathBuf,
    working_dir: PathBuf,
}

impl TerraformImporter {
    pub fn new(terraform_path: PathBuf, working_dir: PathBuf) -> Self {
        debug!(
            "TerraformImporter using binary {} in {}",
            terraform_path.display(),
            working_dir.display()
        );
        Self {
            terraform_path,
            working_dir,
        }
    }

    /// Resolve `binary` through PATH (or use it as-is when it is a path)
    pub fn locate(binary: &str, working_dir: &Path) -> Result<Self, TerraformError> {
        if !working_dir.is_dir() {
            return Err(TerraformError::WorkingDirNotFound(working_dir.to_path_buf()));
        }

        let terraform_path = which::which(binary)
            .map_err(|_| TerraformError::BinaryNotFound(binary.to_string()))?;
        info!(
            "Found Terraform binary '{}' at: {}",
            binary,
            terraform_path.display()
        );

        Ok(Self::new(terraform_path, working_dir.to_path_buf()))
    }

    pub fn terraform_path(&self) -> &Path {
        &self.terraform_path
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// `terraform version -json`, if the binary answers
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.terraform_path)
            .arg("version")
            .arg("-json")
            .output()
            .ok()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str::<serde_json::Value>(&stdout)
            .ok()?
            .get("terraform_version")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

impl StateImporter for TerraformImporter {
    fn import(&self, resource_address: &str, import_id: &str, dry_run: bool) -> ImportResult {
        if dry_run {
            info!(
                "[dry-run] {} import {} {}",
                self.terraform_path.display(),
                resource_address,
                import_id
            );
            return ImportResult::succeeded(resource_address, import_id);
        }

        debug!("Running terraform import {} {}", resource_address, import_id);

        let output = match Command::new(&self.terraform_path)
            .arg("import")
            .arg(resource_address)
            .arg(import_id)
            .current_dir(&self.working_dir)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                let error_msg = format!("Failed to run {}: {}", self.terraform_path.display(), e);
                warn!("Failed to import {}: {}", resource_address, error_msg);
                return ImportResult::failed(resource_address, import_id, error_msg);
            }
        };

        if output.status.success() {
            info!("Successfully imported {}", resource_address);
            return ImportResult::succeeded(resource_address, import_id);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_msg = if stderr.trim().is_empty() {
            format!("terraform import exited with {}", output.status)
        } else {
            stderr.trim().to_string()
        };

        warn!("Failed to import {}: {}", resource_address, error_msg);
        if let Some(hint) = diagnose(&stderr) {
            warn!("{}: {}", resource_address, hint);
        }

        ImportResult::failed(resource_address, import_id, error_msg)
    }
}

/// Recognise the common `terraform import` failures
fn diagnose(stderr: &str) -> Option<&'static str> {
    if stderr.contains("Cannot import non-existent remote object") {
        Some("the remote object does not exist; check the import id")
    } else if stderr.contains("Resource already managed by Terraform") {
        Some("the address is already present in state")
    } else if stderr.contains("configuration for") && stderr.contains("is not present") {
        Some("no resource block matches this address in the Terraform configuration")
    } else if stderr.contains("terraform init") {
        Some("the working directory has not been initialised")
    } else {
        None
    }
}
