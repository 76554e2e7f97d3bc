use anyhow::Result;
use clap::Args;
use colored::*;
use listing_engine::form::{CategoryConfig, CategoryKey};
use log::info;

#[derive(Args)]
pub struct CategoriesArgs {
    /// Show the fields of a single category
    pub key: Option<String>,
    /// Subcategory id for keys outside the table
    #[arg(long)]
    pub subcategory: Option<u32>,
}

pub async fn categories_command(args: CategoriesArgs) -> Result<()> {
    match args.key {
        Some(key) => {
            info!("Showing category {}", key);
            print_category(&CategoryConfig::resolve(&key, args.subcategory));
        }
        None => {
            println!("{}", "Categories:".bright_white().bold());
            println!("{:<30} {:>12}", "Key", "Subcategory");
            println!("{}", "-".repeat(43));
            for key in CategoryKey::ALL {
                println!("{:<30} {:>12}", key.as_str(), key.subcategory_id());
            }
        }
    }
    Ok(())
}

fn print_category(config: &CategoryConfig) {
    let title = if config.is_dynamic() {
        format!("{} (dynamic)", config.key)
    } else {
        config.key.clone()
    };
    println!("{}", title.bright_white().bold());
    match config.subcategory_id {
        Some(id) => println!("  subcategory id: {}", id),
        None => println!("  subcategory id: {}", "none".bright_yellow()),
    }

    for field in config.visible_fields() {
        let marker = if config.is_required(field) {
            "required".bright_red()
        } else {
            "optional".normal()
        };
        println!("  {:<22} {:<24} {}", field.as_str(), field.label(), marker);
    }
}
