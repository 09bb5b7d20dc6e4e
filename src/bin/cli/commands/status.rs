use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use vocab_srs::srs::queue::review_overview;
use vocab_srs::srs::StudyMode;

use crate::app::App;
use crate::render::terminal::render_overview;
use crate::OutputFormat;

pub fn run(
    app: &App,
    list_path: &Path,
    mode: Option<StudyMode>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let list = app.load_list(list_path)?;
    let store = app.state_store();
    let now = Utc::now();

    // Both directions unless one was asked for
    let modes: Vec<StudyMode> = match mode {
        Some(mode) => vec![mode],
        None => StudyMode::ALL.to_vec(),
    };

    let overviews: Vec<_> = modes
        .iter()
        .map(|&mode| {
            let states = store.load(&list.id, mode);
            (mode, review_overview(&list.cards, &states, now))
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let modes: serde_json::Map<String, serde_json::Value> = overviews
                .iter()
                .map(|(mode, overview)| Ok((mode.to_string(), serde_json::to_value(overview)?)))
                .collect::<Result<_, serde_json::Error>>()?;
            let output = serde_json::json!({
                "id": list.id,
                "name": list.name,
                "modes": modes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let title = if list.name.is_empty() { &list.id } else { &list.name };
            println!("{} ({} cards)", title, list.cards.len());
            for (mode, overview) in &overviews {
                println!("  {}", render_overview(*mode, overview, use_color));
            }
        }
    }

    Ok(())
}
