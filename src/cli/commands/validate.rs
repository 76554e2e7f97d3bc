use super::read_values;
use anyhow::Result;
use clap::Args;
use colored::*;
use listing_engine::form::{CategoryConfig, FormEngine};
use log::info;
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Category key
    #[arg(long)]
    pub category: String,
    /// JSON file with field values
    #[arg(long)]
    pub values: PathBuf,
}

/// Run the full client-side validation without contacting the backend
pub async fn validate_command(args: ValidateArgs) -> Result<()> {
    info!("Validating {:?} as {}", args.values, args.category);

    let mut engine = FormEngine::new(CategoryConfig::resolve(&args.category, None));
    for (field, value) in read_values(&args.values)? {
        // Dependent loads are irrelevant offline
        let _ = engine.set_field(field, value);
    }

    match engine.validate_all() {
        Ok(()) => {
            println!("{} Listing is valid", "✓".bright_green().bold());
            Ok(())
        }
        Err(errors) => {
            println!("{} {} invalid field(s):", "❌".bright_red().bold(), errors.len());
            for (field, message) in &errors {
                println!("  {:<22} {}", field.as_str().bright_white(), message);
            }
            anyhow::bail!("validation failed")
        }
    }
}
