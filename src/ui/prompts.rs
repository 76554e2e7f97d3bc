use anyhow::Result;
use dialoguer::{Password, Select};

/// Arrow-key Yes/No selection; `default_yes` preselects "Yes"
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

/// Use `token` if given, otherwise ask without echoing
pub fn prompt_access_token(token: Option<String>) -> Result<String> {
    match token {
        Some(token) => Ok(token),
        None => Ok(Password::new().with_prompt("Access token").interact()?),
    }
}
