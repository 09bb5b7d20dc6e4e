use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use vocab_srs::srs::{state_key, StudyMode};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    list_path: &Path,
    mode: StudyMode,
    yes: bool,
    format: &OutputFormat,
) -> Result<()> {
    let list = app.load_list(list_path)?;

    if !yes {
        print!(
            "Erase all {} progress for \"{}\"? [y/N] ",
            mode,
            if list.name.is_empty() { &list.id } else { &list.name }
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut store = app.state_store();
    store
        .reset(&list.id, mode)
        .context("Failed to reset progress")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": list.id,
                "mode": mode,
                "key": state_key(&list.id, mode),
                "reset": true,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Reset {} progress for {}.", mode, list.id);
        }
    }

    Ok(())
}
