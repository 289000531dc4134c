use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pet-provider")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Drive the random_pet resource provider from JSON files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/pet-provider/config.toml)
    #[arg(long = "config-file", global = true, env = "PET_PROVIDER_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the schema of every registered resource
    Schema {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check a configuration without changing anything
    Validate(ValidateArgs),

    /// Plan a change from prior state and proposed new state
    Plan(PlanArgs),

    /// Apply a planned state
    Apply(ApplyArgs),

    /// Refresh persisted state
    Read(ReadArgs),

    /// Import an existing object by id
    Import {
        /// Resource type, e.g. random_pet
        type_name: String,

        /// Id of the object to import
        id: String,
    },

    /// Upgrade persisted state written by an older schema version
    Upgrade(UpgradeArgs),

    /// Dispatch a JSON array of tagged requests in parallel
    Batch {
        /// File holding the requests ('-' for stdin)
        file: PathBuf,

        /// Worker threads (default from config)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Lifecycle Arguments
// ============================================================================

#[derive(Args)]
pub struct ValidateArgs {
    /// Resource type, e.g. random_pet
    pub type_name: String,

    /// Configuration JSON ('-' for stdin)
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Resource type, e.g. random_pet
    pub type_name: String,

    /// Proposed new state JSON ('-' for stdin)
    #[arg(long)]
    pub proposed: PathBuf,

    /// Prior state JSON; omit for a new resource
    #[arg(long)]
    pub prior: Option<PathBuf>,

    /// Configuration JSON (defaults to the proposed state, computed values cleared)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Resource type, e.g. random_pet
    pub type_name: String,

    /// Planned state JSON ('-' for stdin)
    #[arg(long)]
    pub planned: PathBuf,

    /// Configuration JSON
    #[arg(long)]
    pub config: PathBuf,

    /// Prior state JSON; omit for a new resource
    #[arg(long)]
    pub prior: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReadArgs {
    /// Resource type, e.g. random_pet
    pub type_name: String,

    /// Current state JSON ('-' for stdin)
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(Args)]
pub struct UpgradeArgs {
    /// Resource type, e.g. random_pet
    pub type_name: String,

    /// Raw persisted state JSON ('-' for stdin)
    #[arg(long)]
    pub raw: PathBuf,

    /// Schema version the state was written with
    #[arg(id = "schema_version", long = "schema-version")]
    pub version: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "pet-provider",
            "-vv",
            "plan",
            "random_pet",
            "--proposed",
            "-",
            "--prior",
            "state.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.type_name, "random_pet");
        assert_eq!(args.proposed, PathBuf::from("-"));
        assert_eq!(args.prior, Some(PathBuf::from("state.json")));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_upgrade() {
        let cli = Cli::try_parse_from([
            "pet-provider",
            "upgrade",
            "random_pet",
            "--raw",
            "old.json",
            "--schema-version",
            "0",
        ])
        .unwrap();
        let Command::Upgrade(args) = cli.command else {
            panic!("expected upgrade");
        };
        assert_eq!(args.version, 0);
    }
}
