use crate::cloudflare::client::CloudflareClient;
use crate::cloudflare::members::MemberDirectory;
use crate::config::Config;
use crate::core::importer::{import_state, ImportError, ImportSummary};
use crate::input::model::AppInterfaceInput;
use crate::input::reader::read_input_from_file;
use crate::terraform::backend::write_backend_file;
use crate::terraform::executor::{StateImporter, TerraformImporter};
use anyhow::Context;
use tracing::{info, warn};

/// Exit status for errors that abort the run before or outside the tally
pub const FATAL_EXIT_CODE: i32 = 2;

/// Import everything declared in `input` and tally the outcome
pub async fn run_import<D, E>(
    directory: &D,
    importer: &E,
    input: &AppInterfaceInput,
    dry_run: bool,
) -> Result<ImportSummary, ImportError>
where
    D: MemberDirectory + ?Sized,
    E: StateImporter + ?Sized,
{
    let results = import_state(directory, importer, &input.data, dry_run).await?;

    for result in results.iter().filter(|r| !r.success) {
        warn!(
            "{} ({}): {}",
            result.resource_address,
            if result.import_id.is_empty() {
                "no import id"
            } else {
                result.import_id.as_str()
            },
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }

    let summary = ImportSummary::from_results(&results);
    info!(
        "Import complete: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    Ok(summary)
}

/// Wire the real collaborators together from `config`
pub async fn run(config: &Config) -> anyhow::Result<ImportSummary> {
    if config.dry_run {
        info!("Dry run enabled: no state will be modified");
    }

    let input = read_input_from_file(&config.input_file)?;

    let importer = TerraformImporter::locate(
        &config.terraform.binary_name,
        &config.terraform.project_directory,
    )?;
    if let Some(version) = importer.version() {
        info!("Using Terraform {}", version);
    }

    if config.terraform.write_backend {
        write_backend_file(
            importer.working_dir(),
            &input.provision.module_provision_data,
            config.dry_run,
        )
        .context("Failed to write backend configuration")?;
    }

    let client = CloudflareClient::from_env().context("Failed to build Cloudflare client")?;

    let summary = run_import(&client, &importer, &input, config.dry_run).await?;
    Ok(summary)
}
