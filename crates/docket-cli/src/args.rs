use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    AuthCommands, CaseCommands, ChatCommands, DraftCommands, EvidenceCommands,
    JurisdictionCommands, StepCommands,
};

/// Command-line client for the Docket legal case assistant
///
/// Docket turns a description of a legal problem into a step-by-step roadmap,
/// tracks your progress through it and keeps the case in sync with the Docket
/// server. It also gives access to the case chat assistant, document drafting
/// and evidence uploads.
#[derive(Parser)]
#[command(version, about, name = "docket")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/docket/docket.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Base URL of the Docket server. Overrides DOCKET_API_URL and
    /// config.toml
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Docket CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Log in, register and manage the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Set the state and district used as context for new cases
    #[command(alias = "j")]
    Jurisdiction {
        #[command(subcommand)]
        command: JurisdictionCommands,
    },
    /// Create, inspect and delete cases
    #[command(alias = "c")]
    Case {
        #[command(subcommand)]
        command: CaseCommands,
    },
    /// Work through the steps of a case roadmap
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Talk to the legal assistant
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },
    /// Draft legal documents for a case
    #[command(alias = "d")]
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Manage files attached to a case
    #[command(alias = "e")]
    Evidence {
        #[command(subcommand)]
        command: EvidenceCommands,
    },
}
