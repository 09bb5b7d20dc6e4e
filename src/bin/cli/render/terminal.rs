use chrono::{DateTime, Local, Utc};
use vocab_srs::srs::algorithm::format_interval;
use vocab_srs::srs::{Quality, ReviewOverview, SessionSummary, StudyMode, VocabCard};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

fn quality_color(quality: Quality) -> &'static str {
    match quality {
        Quality::Hard => Color::RED,
        Quality::Good => Color::YELLOW,
        Quality::Easy => Color::GREEN,
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Front of a card, with its position in the queue
pub fn render_prompt(
    card: &VocabCard,
    mode: StudyMode,
    position: usize,
    total: usize,
    use_color: bool,
) -> String {
    let counter = paint(&format!("[{}/{}]", position, total), Color::GRAY, use_color);
    let level = card
        .level
        .as_deref()
        .map(|l| format!(" {}", paint(l, Color::DIM, use_color)))
        .unwrap_or_default();

    format!(
        "{} {}{}",
        counter,
        paint(&card.prompt(mode), Color::BOLD, use_color),
        level
    )
}

/// Back of a card plus what each rating would schedule
pub fn render_answer(
    card: &VocabCard,
    mode: StudyMode,
    preview: Option<[u32; 3]>,
    use_color: bool,
) -> String {
    let mut lines = vec![format!("  {}", paint(&card.answer(mode), Color::CYAN, use_color))];

    let choices: Vec<String> = Quality::ALL
        .iter()
        .enumerate()
        .map(|(i, quality)| {
            let label = format!("{} {}", quality.value(), quality.label());
            let next = preview
                .map(|p| format!(" ({})", format_interval(p[i])))
                .unwrap_or_default();
            format!("{}{}", paint(&label, quality_color(*quality), use_color), next)
        })
        .collect();

    lines.push(format!("  {}", choices.join("   ")));
    lines.join("\n")
}

pub fn render_summary(summary: &SessionSummary, use_color: bool) -> String {
    let mut lines = vec![paint(
        &format!("Session complete: {} cards reviewed", summary.total_reviewed),
        Color::BOLD,
        use_color,
    )];

    for quality in Quality::ALL {
        lines.push(format!(
            "  {:<5} {}",
            paint(quality.label(), quality_color(quality), use_color),
            summary.counts.count(quality)
        ));
    }

    if let Some(next) = summary.next_review {
        lines.push(format!("  Next review: {}", format_timestamp(next)));
    }

    lines.join("\n")
}

pub fn render_overview(mode: StudyMode, overview: &ReviewOverview, use_color: bool) -> String {
    let due = paint(&overview.due_cards.to_string(), Color::GREEN, use_color);
    let mut line = format!(
        "{:<8} {} due, {} new, {} learning, {} review ({} total)",
        mode.as_str(),
        due,
        overview.new_cards,
        overview.learning_cards,
        overview.review_cards,
        overview.total_cards
    );

    if let Some(next) = overview.next_due {
        line.push_str(&format!(", next due {}", format_timestamp(next)));
    }

    line
}
