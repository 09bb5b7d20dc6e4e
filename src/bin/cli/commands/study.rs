use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use vocab_srs::srs::{
    Quality, QueueBuilder, SessionController, SessionPhase, StudyMode, SystemClock,
};
use vocab_srs::storage::FileStorage;

use crate::app::App;
use crate::render::terminal::{
    format_timestamp, render_answer, render_prompt, render_summary, Color,
};
use crate::OutputFormat;

pub struct StudyOptions {
    pub mode: StudyMode,
    pub shuffle: bool,
    pub max_new_cards: usize,
}

enum Input {
    Continue,
    Quit,
}

pub fn run(
    app: &App,
    list_path: &Path,
    options: StudyOptions,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let list = app.load_list(list_path)?;
    log::info!(
        "Studying {} ({} cards) in {} mode",
        list.id,
        list.cards.len(),
        options.mode
    );

    let mut session = SessionController::start_with(
        list.id.clone(),
        options.mode,
        list.cards,
        app.state_store(),
        SystemClock,
        QueueBuilder::new(options.max_new_cards),
    );

    if options.shuffle && session.phase() == SessionPhase::Presenting {
        session.shuffle(&mut rand::thread_rng())?;
    }

    println!("Enter: reveal   1/3/5: rate   s: shuffle   r: restart   q: quit");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_warnings(&mut session, use_color);

        match session.phase() {
            SessionPhase::NothingToStudy => {
                println!("Nothing to study right now.");
                if let Some(next) = session.overview().next_due {
                    println!("Next card is due {}.", format_timestamp(next));
                }
                return Ok(());
            }
            SessionPhase::Complete => break,
            SessionPhase::Presenting => {
                if let Some(card) = session.current_card() {
                    println!();
                    println!(
                        "{}",
                        render_prompt(
                            card,
                            session.mode(),
                            session.position() + 1,
                            session.queue().len(),
                            use_color
                        )
                    );
                }
            }
            SessionPhase::Revealed => {
                if let Some(card) = session.current_card() {
                    println!(
                        "{}",
                        render_answer(card, session.mode(), session.preview(), use_color)
                    );
                }
            }
        }

        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        if let Input::Quit = handle_input(&mut session, line?.trim())? {
            break;
        }
    }

    print_warnings(&mut session, use_color);
    let summary = match session.summary() {
        Some(summary) => summary.clone(),
        None => session.summarize(),
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": session.list_id(),
                "mode": session.mode(),
                "complete": session.phase() == SessionPhase::Complete,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!();
            println!("{}", render_summary(&summary, use_color));
        }
    }

    Ok(())
}

fn handle_input(
    session: &mut SessionController<FileStorage, SystemClock>,
    input: &str,
) -> Result<Input> {
    match input {
        "q" | "quit" => return Ok(Input::Quit),
        "s" | "shuffle" => {
            session.shuffle(&mut rand::thread_rng())?;
            println!("Shuffled {} remaining cards.", session.remaining());
        }
        "r" | "restart" => {
            session.restart();
            println!("Restarted with {} cards.", session.queue().len());
        }
        "" if session.phase() == SessionPhase::Presenting => {
            session.reveal()?;
        }
        "" => {}
        other => match other.parse::<Quality>() {
            Ok(quality) => {
                let outcome = session.rate(quality)?;
                log::debug!("{} next due {}", outcome.card.id, outcome.state.next_review);
            }
            Err(err) => println!("{}", err),
        },
    }

    Ok(Input::Continue)
}

fn print_warnings(session: &mut SessionController<FileStorage, SystemClock>, use_color: bool) {
    for warning in session.take_warnings() {
        if use_color {
            eprintln!("{}warning:{} {}", Color::YELLOW, Color::RESET, warning);
        } else {
            eprintln!("warning: {}", warning);
        }
    }
}
