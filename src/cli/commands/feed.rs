use anyhow::Result;
use clap::Args;
use colored::*;
use listing_engine::Session;
use listing_engine::listing::{FeedFilters, Listing};
use log::info;

#[derive(Args)]
pub struct FeedArgs {
    /// Only listings in this category
    #[arg(long)]
    pub category: Option<String>,
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

pub async fn feed_command(args: FeedArgs, session: &Session) -> Result<()> {
    let mut feed = session.feed(FeedFilters {
        category: args.category,
        search: args.search,
    });

    for _ in 0..args.pages.max(1) {
        if !feed.has_more() {
            break;
        }
        let added = feed.load_more(session.client()).await?;
        info!("Loaded {} listings", added);
    }

    if feed.items().is_empty() {
        println!("No listings found.");
        return Ok(());
    }

    println!("{:<10} {:<12} {:>12}  Title", "Id", "Status", "Price");
    println!("{}", "-".repeat(60));
    for listing in feed.items() {
        print_listing(listing);
    }
    println!("\nShown: {}{}", feed.items().len(), if feed.has_more() { " (more available)" } else { "" });
    Ok(())
}

fn print_listing(listing: &Listing) {
    let price = listing.price.map(|p| format!("{:.2}", p)).unwrap_or_default();
    let title = listing.title.as_deref().unwrap_or("(untitled)");
    let line = format!(
        "{:<10} {:<12} {:>12}  {}",
        listing.id,
        listing.status.to_string(),
        price,
        title
    );
    match listing.navigability() {
        Ok(()) => println!("{}", line),
        Err(block) => println!("{}  {}", line.dimmed(), block.to_string().bright_yellow()),
    }
}
