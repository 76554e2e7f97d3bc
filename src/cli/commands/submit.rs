use super::read_values;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use listing_engine::Session;
use listing_engine::form::MediaFile;
use listing_engine::submission::{SubmissionError, SubmissionKind};
use log::info;
use std::path::PathBuf;

#[derive(Args)]
pub struct SubmitArgs {
    /// Category key
    #[arg(long)]
    pub category: String,
    /// JSON file with field values
    #[arg(long)]
    pub values: PathBuf,
    /// Edit this listing instead of creating a new one
    #[arg(long)]
    pub edit: Option<String>,
    /// Image or video files to attach
    #[arg(long = "media")]
    pub media: Vec<PathBuf>,
    /// Existing media ids to delete (edit only)
    #[arg(long = "remove-media")]
    pub remove_media: Vec<String>,
    /// Subcategory id for keys outside the table
    #[arg(long)]
    pub subcategory: Option<u32>,
}

pub async fn submit_command(args: SubmitArgs, session: &Session) -> Result<()> {
    let mut form = session.form(&args.category, args.subcategory);

    if let Some(record_id) = &args.edit {
        info!("Editing listing {}", record_id);
        form.load_record(record_id)
            .await
            .with_context(|| format!("Failed to load listing {}", record_id))?;
    }

    // Field order puts each parent before its child
    for (field, value) in read_values(&args.values)? {
        form.select(field, value).await;
    }

    for path in &args.media {
        form.engine_mut().media_mut().add(MediaFile::from_path(path)?);
    }
    for id in &args.remove_media {
        if !form.engine_mut().media_mut().remove_existing(id) {
            println!("{} Media '{}' is not attached to this listing", "⚠️".bright_yellow().bold(), id);
        }
    }

    match form.submit().await {
        Ok(outcome) => {
            let verb = match outcome.kind {
                SubmissionKind::Created => "created",
                SubmissionKind::Updated => "updated",
            };
            let id = outcome.listing_id.unwrap_or_else(|| "?".to_string());
            println!("{} Listing {} {}", "✓".bright_green().bold(), id.bright_green().bold(), verb);
            if let Some(message) = outcome.message {
                println!("  {}", message);
            }
            Ok(())
        }
        Err(SubmissionError::Invalid(errors)) => {
            println!("{} {} invalid field(s):", "❌".bright_red().bold(), errors.len());
            for (field, message) in &errors {
                println!("  {:<22} {}", field.as_str().bright_white(), message);
            }
            anyhow::bail!("validation failed")
        }
        Err(error) => {
            println!("{} {}", "❌".bright_red().bold(), error.to_string().bright_red());
            for (field, message) in &form.engine().snapshot().errors {
                println!("  {:<22} {}", field.bright_white(), message);
            }
            Err(error.into())
        }
    }
}
