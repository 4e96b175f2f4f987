use clap::Parser;
use er_cloudflare_account::config::Config;
use er_cloudflare_account::core::runner::{self, FATAL_EXIT_CODE};
use er_cloudflare_account::shared::logging;
use std::path::PathBuf;
use tracing::{error, info};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "import-tfstate",
    about = "Import an existing Cloudflare account and its members into Terraform state.",
    version = APP_VERSION,
    disable_version_flag(true)
)]
pub struct Cli {
    #[arg(
        long,
        short = 'i',
        value_name = "PATH",
        help = "Path to the input document (default: $ER_INPUT_FILE or /inputs/input.json)"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        short = 'd',
        value_name = "PATH",
        help = "Terraform project directory (default: $TERRAFORM_DIR or .)"
    )]
    pub terraform_dir: Option<PathBuf>,

    #[arg(long, help = "Log the imports without modifying state (also: DRY_RUN)")]
    pub dry_run: bool,

    #[arg(
        long,
        help = "Write backend.tf.json from the provisioning context (also: ER_WRITE_BACKEND)"
    )]
    pub write_backend: bool,

    #[arg(long, short = 'V', help = "Print version")]
    pub version: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input_file = input.clone();
        }
        if let Some(dir) = &self.terraform_dir {
            config.terraform.project_directory = dir.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.write_backend {
            config.terraform.write_backend = true;
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init_logging();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", APP_VERSION);
        std::process::exit(0);
    }

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(FATAL_EXIT_CODE);
        }
    };
    cli.apply(&mut config);

    info!(
        "Starting import-tfstate with input {} in {}",
        config.input_file.display(),
        config.terraform.project_directory.display()
    );

    match runner::run(&config).await {
        Ok(summary) => std::process::exit(summary.exit_code()),
        Err(e) => {
            error!("Import aborted: {:#}", e);
            std::process::exit(FATAL_EXIT_CODE);
        }
    }
}
