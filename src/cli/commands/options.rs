use anyhow::Result;
use clap::{Args, Subcommand};
use listing_engine::Session;
use listing_engine::cascade::AxisKind;
use listing_engine::dropdown::{DropdownOption, ReferenceList, options_from_payload};
use listing_engine::form::load_dependents;

#[derive(Args)]
pub struct OptionsCommands {
    #[command(subcommand)]
    pub command: OptionsSubcommands,
}

#[derive(Subcommand)]
pub enum OptionsSubcommands {
    /// List states
    States,
    /// List brands
    Brands {
        /// Electronics subcategory id
        #[arg(long)]
        subcategory: Option<u32>,
    },
    /// List districts of a state
    Districts {
        /// State id
        state: String,
    },
    /// List cities of a district
    Cities {
        /// District id
        district: String,
    },
    /// List models of a brand
    Models {
        /// Brand id
        brand: String,
    },
}

pub async fn options_command(args: OptionsCommands, session: &Session) -> Result<()> {
    let options = match args.command {
        OptionsSubcommands::States => reference(session, ReferenceList::States).await?,
        OptionsSubcommands::Brands { subcategory } => {
            reference(
                session,
                ReferenceList::Brands {
                    subcategory_id: subcategory,
                },
            )
            .await?
        }
        OptionsSubcommands::Districts { state } => dependent(session, AxisKind::District, state).await?,
        OptionsSubcommands::Cities { district } => dependent(session, AxisKind::City, district).await?,
        OptionsSubcommands::Models { brand } => dependent(session, AxisKind::Model, brand).await?,
    };

    if options.is_empty() {
        println!("No options found.");
        return Ok(());
    }
    println!("{:<10} Label", "Id");
    println!("{}", "-".repeat(40));
    for option in &options {
        println!("{:<10} {}", option.id, option.label);
    }
    println!("\nTotal: {}", options.len());
    Ok(())
}

async fn reference(session: &Session, list: ReferenceList) -> Result<Vec<DropdownOption>> {
    let payload = session
        .cache()
        .fetch(session.client(), list.endpoint(), &list.params(), list.method())
        .await?;
    Ok(options_from_payload(&payload, Some(list.label_key())))
}

async fn dependent(session: &Session, axis: AxisKind, parent: String) -> Result<Vec<DropdownOption>> {
    Ok(load_dependents(session.client(), session.cache(), axis, &parent).await?)
}
