//! UI helpers for consistent output formatting.

use std::time::Duration;

use ferret_core::Finding;
use indicatif::{ProgressBar, ProgressStyle};

/// Single-character Unicode glyphs used as status indicators.
pub mod indicators {
    /// Error indicator (✖).
    pub const ERROR: &str = "✖";
    /// Warning indicator (⚠).
    pub const WARNING: &str = "⚠";
    /// Informational indicator (ℹ).
    pub const INFO: &str = "ℹ";
    /// Success indicator (✓).
    pub const SUCCESS: &str = "✓";
}

/// Semantic colour palette for terminal output.
pub mod colors {
    use console::Style;

    /// Red - errors and findings.
    pub const fn error() -> Style {
        Style::new().red()
    }

    /// Yellow - warnings.
    pub const fn warning() -> Style {
        Style::new().yellow()
    }

    /// Cyan - informational messages.
    pub const fn info() -> Style {
        Style::new().cyan()
    }

    /// Green - success messages.
    pub const fn success() -> Style {
        Style::new().green()
    }

    /// Cyan - accent highlights (signature IDs, commands).
    pub const fn accent() -> Style {
        Style::new().cyan()
    }

    /// Light grey - secondary descriptive text.
    pub const fn secondary() -> Style {
        Style::new().color256(252)
    }

    /// Dark grey - muted/contextual text.
    pub const fn muted() -> Style {
        Style::new().color256(243)
    }
}

/// Process exit codes.
pub mod exit {
    /// Secrets were found.
    pub const FINDINGS: i32 = 1;
    /// An unrecoverable error occurred.
    pub const ERROR: i32 = 2;
}

/// Prints a red error message to stderr.
pub fn print_error(message: &str) {
    eprintln!(
        "{} {}",
        colors::error().apply_to(indicators::ERROR),
        colors::secondary().apply_to(message)
    );
}

/// Prints a yellow warning message to stderr.
pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        colors::warning().apply_to(indicators::WARNING),
        colors::secondary().apply_to(message)
    );
}

/// Prints a cyan informational message to stderr.
pub fn print_info(message: &str) {
    eprintln!(
        "{} {}",
        colors::info().apply_to(indicators::INFO),
        colors::secondary().apply_to(message)
    );
}

/// Prints a real-time finding notification, one line per field.
pub fn print_finding(finding: &Finding) {
    let label = colors::muted();
    let value = colors::secondary();

    println!(
        "{} {}",
        colors::error().apply_to(indicators::ERROR),
        colors::accent().bold().apply_to(&finding.signature_description)
    );
    println!("  {} {}", label.apply_to("signature:"), value.apply_to(&finding.signature_id));
    println!(
        "  {} {}/{}",
        label.apply_to("repository:"),
        value.apply_to(&finding.repository_owner),
        value.apply_to(&finding.repository_name)
    );
    println!("  {} {}", label.apply_to("file:"), value.apply_to(&finding.file_path));
    println!("  {} {}", label.apply_to("action:"), value.apply_to(finding.action));
    println!("  {} {}", label.apply_to("commit:"), value.apply_to(&finding.commit_hash));
    println!("  {} {}", label.apply_to("message:"), value.apply_to(&finding.commit_message));
    println!("  {} {}", label.apply_to("author:"), value.apply_to(&finding.commit_author));
    println!("  {} {}", label.apply_to("line:"), value.apply_to(finding.line_number));
    if !finding.secret.is_empty() {
        println!("  {} {}", label.apply_to("secret:"), colors::error().apply_to(&finding.secret));
    }
    println!();
}

const PROGRESS_TICK_MS: u64 = 100;

/// Creates a progress bar over the repository set.
#[must_use]
pub fn create_repository_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);

    #[expect(
        clippy::expect_used,
        reason = "static template string; failure is a programmer error"
    )]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/243} {percent:>3}% {pos}/{len} repositories ({elapsed} elapsed)")
            .expect("invalid progress template")
            .progress_chars("━━╸"),
    );

    pb.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
    pb
}

/// Returns `singular` when `count` is 1, otherwise `plural`.
#[must_use]
pub const fn pluralise_word<'a>(count: u64, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// Returns the shared clap colour theme used by all CLI subcommands.
#[must_use]
pub fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{AnsiColor, Effects, Style};

    clap::builder::Styles::styled()
        .header(
            Style::new()
                .fg_color(Some(AnsiColor::Cyan.into()))
                .effects(Effects::BOLD),
        )
        .usage(
            Style::new()
                .fg_color(Some(AnsiColor::Cyan.into()))
                .effects(Effects::BOLD),
        )
        .literal(Style::new().fg_color(Some(AnsiColor::Cyan.into())))
        .placeholder(Style::new().fg_color(Some(AnsiColor::BrightBlack.into())))
        .valid(Style::new().fg_color(Some(AnsiColor::Green.into())))
        .invalid(Style::new().fg_color(Some(AnsiColor::Red.into())))
        .error(
            Style::new()
                .fg_color(Some(AnsiColor::Red.into()))
                .effects(Effects::BOLD),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicators_are_single_chars() {
        assert_eq!(indicators::ERROR.chars().count(), 1);
        assert_eq!(indicators::WARNING.chars().count(), 1);
        assert_eq!(indicators::INFO.chars().count(), 1);
        assert_eq!(indicators::SUCCESS.chars().count(), 1);
    }

    #[test]
    fn pluralise_word_matches_count() {
        assert_eq!(pluralise_word(0, "finding", "findings"), "findings");
        assert_eq!(pluralise_word(1, "finding", "findings"), "finding");
        assert_eq!(pluralise_word(2, "finding", "findings"), "findings");
    }
}
