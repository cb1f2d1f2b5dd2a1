//! One-shot subcommands: list, accept/reject and user.

use std::io::{self, Write};

use claimdesk::{ClaimDesk, ClaimDeskHttpClient, Resolution, ResolutionOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::{ListArgs, ResolveArgs, UserArgs};
use crate::error::CliError;
use crate::output::{format_timestamp, pagination_footer, write_claims, write_user};

/// Walk to the requested page, warning if the listing ends before it.
async fn open_page(
    desk: &mut ClaimDesk<ClaimDeskHttpClient>,
    page: u32,
) -> Result<(), CliError> {
    let reached = desk.seek_page(page).await?;
    if reached < page {
        warn!(requested = page, last = reached, "listing ends before requested page");
    }
    Ok(())
}

pub async fn run_list(
    client: ClaimDeskHttpClient,
    page_size: usize,
    args: ListArgs,
) -> Result<(), CliError> {
    let mut desk = ClaimDesk::new(client, page_size);
    open_page(&mut desk, args.page).await?;

    let stdout = io::stdout();
    write_claims(desk.list().claims(), args.json, &mut stdout.lock())?;
    eprintln!("{}", pagination_footer(desk.list()));
    Ok(())
}

pub async fn run_resolve(
    client: ClaimDeskHttpClient,
    page_size: usize,
    resolution: Resolution,
    args: ResolveArgs,
) -> Result<(), CliError> {
    let mut desk = ClaimDesk::new(client, page_size);
    open_page(&mut desk, args.page).await?;

    let claim = desk
        .list()
        .find(&args.claim_id)
        .ok_or_else(|| CliError::ClaimNotListed(args.claim_id.clone()))?;
    eprintln!(
        "{} | {} | submitted {} by {}",
        claim.venue().name,
        claim.venue().description,
        format_timestamp(claim.r.timestamp),
        claim.user().user_doc_id,
    );

    if !args.yes && !confirm(resolution.prompt()).await? {
        return Err(CliError::Aborted);
    }

    info!(claim_id = %args.claim_id, %resolution, "resolving claim");
    match desk.resolve(resolution, args.claim_id.as_str()).await {
        Some(ResolutionOutcome::Resolved(notice)) => {
            println!("{}", notice.message);
            Ok(())
        }
        Some(ResolutionOutcome::Failed(notice, e)) => {
            if e.is_partial() {
                eprintln!(
                    "venue owner was updated but claim {} is still pending: {}",
                    e.claim_id, e.failure
                );
            }
            Err(CliError::Resolution(notice.message))
        }
        None => Err(CliError::Resolution(resolution.failure_message().to_string())),
    }
}

pub async fn run_user(client: ClaimDeskHttpClient, args: UserArgs) -> Result<(), CliError> {
    let details = client.fetch_user_details(&args.user_doc_id).await?;
    info!(user_doc_id = %args.user_doc_id, name = %details.full_name(), "user details fetched");
    let stdout = io::stdout();
    write_user(&details, args.json, &mut stdout.lock())
}

/// Ask `prompt` on stderr and read a yes/no answer from stdin.
async fn confirm(prompt: &str) -> Result<bool, CliError> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
