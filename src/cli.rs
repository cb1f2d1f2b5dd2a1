use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Review and resolve venue ownership claims.
#[derive(Parser, Debug)]
#[command(name = "claimdesk", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Base URL of the admin API
    #[arg(long, env = "CLAIMDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "CLAIMDESK_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Claims per page
    #[arg(long, env = "CLAIMDESK_PAGE_SIZE", default_value = "5", global = true)]
    pub page_size: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of pending claims
    List(ListArgs),

    /// Accept a claim
    Accept(ResolveArgs),

    /// Reject a claim
    Reject(ResolveArgs),

    /// Show a requester's contact details
    User(UserArgs),

    /// Open the interactive claim console
    Console(ConsoleArgs),
}

/// Arguments for the `list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Page to show (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Output as JSON lines instead of TSV
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `accept` and `reject` subcommands.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Claim id
    pub claim_id: String,

    /// Page the claim is listed on
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the `user` subcommand.
#[derive(Parser, Debug)]
pub struct UserArgs {
    /// The user's document id
    pub user_doc_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `console` subcommand.
#[derive(Parser, Debug)]
pub struct ConsoleArgs {
    /// Write logs here instead of discarding them
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accept() {
        let cli = Cli::try_parse_from([
            "claimdesk",
            "--api-url",
            "https://admin.example.com",
            "accept",
            "clm_01",
            "--page",
            "3",
            "-y",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("https://admin.example.com"));
        match cli.command {
            Command::Accept(args) => {
                assert_eq!(args.claim_id, "clm_01");
                assert_eq!(args.page, 3);
                assert!(args.yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::try_parse_from(["claimdesk", "list"]).unwrap();
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.page, 1);
                assert!(!args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.page_size, 5);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["claimdesk", "user", "u-1", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }
}
