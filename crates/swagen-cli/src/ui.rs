use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::MultiSelect;
use indicatif::{ProgressBar, ProgressStyle};

pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

/// Ask which tags to generate. Every tag starts selected.
pub fn select_tags(choices: &[(String, usize)]) -> Result<Vec<String>> {
    let items: Vec<String> = choices
        .iter()
        .map(|(tag, count)| format!("{tag} ({count} operations)"))
        .collect();
    let defaults = vec![true; items.len()];

    let picked = MultiSelect::new()
        .with_prompt("Select the tags to generate")
        .items(&items)
        .defaults(&defaults)
        .interact()
        .context("failed to read tag selection")?;

    Ok(picked.into_iter().map(|i| choices[i].0.clone()).collect())
}
