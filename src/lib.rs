// Re-export modules for testing and external use
pub mod cloudflare {
    pub mod client;
    pub mod members;

    pub use client::{CloudflareClient, CloudflareError, Credentials};
    pub use members::{AccountMember, MemberDirectory, MemberRecord};
}

pub mod input {
    pub mod model;
    pub mod reader;

    pub use model::{AppInterfaceInput, CloudflareAccount, CloudflareAccountMember};
    pub use reader::{read_input_from_file, InputError};
}

pub mod terraform {
    pub mod address;
    pub mod backend;
    pub mod executor;

    pub use address::sanitize_email;
    pub use executor::{ImportResult, StateImporter, TerraformImporter};
}

pub mod core {
    pub mod importer;
    pub mod resolver;
    pub mod runner;
}

pub mod shared {
    pub mod logging;
}

pub mod config;

// Re-export commonly used types for easier testing and external use
pub use crate::core::importer::{import_state, ImportError, ImportSummary};
pub use crate::core::resolver::{resolve_members, LiveMemberIndex, ResolveError};
pub use config::Config;
