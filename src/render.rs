//! Terminal rendering of the panes.

use crate::coach::CoachView;
use crate::progress::ProgressView;
use crate::submitter::LogPanel;
use crate::ui::{ConfettiBurst, Popup, StatusClass, StatusMessage, TabController};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREY: &str = "\x1b[90m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const BAR_WIDTH: usize = 30;

pub fn tab_bar(tabs: &TabController) -> String {
    tabs.keys()
        .map(|key| {
            if tabs.is_active(key) {
                format!("{BOLD}{CYAN}[{}]{RESET}", title(key))
            } else {
                format!("{GREY} {} {RESET}", title(key))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn title(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn status(message: &StatusMessage) -> Option<String> {
    if message.is_empty() {
        return None;
    }
    let color = match message.class {
        StatusClass::Neutral => RESET,
        StatusClass::Success => GREEN,
        StatusClass::Error => RED,
    };
    Some(format!("{color}{}{RESET}", message.text))
}

pub fn popup(popup: &Popup) -> Option<String> {
    if !popup.is_visible() {
        return None;
    }
    let width = popup.text().chars().count() + 2;
    let border = "─".repeat(width);
    Some(format!(
        "┌{border}┐\n│ {BOLD}{}{RESET} │\n└{border}┘",
        popup.text()
    ))
}

pub fn confetti(burst: &ConfettiBurst) -> String {
    burst
        .pieces
        .iter()
        .map(|piece| {
            let (r, g, b) = piece.color;
            format!("\x1b[38;2;{r};{g};{b}m{}", piece.glyph)
        })
        .collect::<String>()
        + RESET
}

pub fn log_panel(panel: &LogPanel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(status(&panel.status));
    lines.extend(popup(&panel.popup));
    if let Some(burst) = &panel.confetti {
        lines.push(confetti(burst));
    }
    lines
}

pub fn progress(view: &ProgressView) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(status(&view.status));

    if let Some(summary) = &view.summary {
        lines.push(format!(
            "{BOLD}Total minutes:{RESET} {}   {BOLD}Sessions:{RESET} {}",
            summary.total_minutes, summary.session_count
        ));
    }

    if let Some(bars) = &view.chart {
        lines.push(format!("{BOLD}Recent sessions{RESET}"));
        for bar in bars {
            let filled = (bar.height_percent / 100.0 * BAR_WIDTH as f64).round() as usize;
            lines.push(format!(
                "{CYAN}{}{RESET}{} {} min",
                "█".repeat(filled),
                " ".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
                bar.minutes
            ));
        }
    }

    if let Some(history) = &view.history {
        lines.push(format!("{BOLD}History{RESET}"));
        lines.extend(history.iter().map(|line| format!("  {line}")));
    }

    lines
}

pub fn coach(view: &CoachView) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(status(&view.status));
    if let Some(entries) = &view.entries {
        lines.extend(entries.iter().map(|line| format!("  {line}")));
    }
    lines
}
