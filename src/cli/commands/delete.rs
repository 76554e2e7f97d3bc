use crate::ui::prompts::prompt_confirmation;
use anyhow::Result;
use clap::Args;
use colored::*;
use listing_engine::Session;
use listing_engine::listing::DeleteRequest;
use log::info;

#[derive(Args)]
pub struct DeleteArgs {
    /// Listing id
    pub id: String,
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn delete_command(args: DeleteArgs, session: &Session) -> Result<()> {
    let request = DeleteRequest::new(args.id);

    if !args.yes {
        let message = format!("Delete listing '{}'? This cannot be undone.", request.listing_id());
        if !prompt_confirmation(&message, false)? {
            println!("{} Cancelled.", "❌".bright_red().bold());
            return Ok(());
        }
    }

    let id = request.listing_id().to_string();
    info!("Deleting listing {}", id);
    session.client().delete_listing(request.confirm()).await?;
    println!("{} Listing '{}' deleted", "✓".bright_green().bold(), id.bright_green().bold());
    Ok(())
}
