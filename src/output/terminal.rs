// Colored terminal output for the one-shot CLI commands.

use colored::{ColoredString, Colorize};

use crate::confession::{ConfessionStatus, Tone};
use crate::moderation::{Grade, ModerationResult};

/// Display a moderation verdict and the status it would produce.
pub fn display_moderation(text: &str, result: &ModerationResult) {
    println!("\n{}", "=== Moderation ===".bold());
    println!("  {} {}", "Text:".dimmed(), super::truncate_chars(text, 120));
    println!("  {} {}", "Grade:".dimmed(), colorize_grade(result.grade));
    println!(
        "  {} {}",
        "Status:".dimmed(),
        colorize_status(result.grade.status())
    );
    println!("  {} {}", "Reason:".dimmed(), result.reason);

    if result.grade == Grade::X {
        println!(
            "\n  {} This submission would be discarded, not stored.",
            "!!".red().bold()
        );
    }
}

/// Display a tone rewrite next to the original.
pub fn display_rewrite(original: &str, tone: Tone, rewritten: &str) {
    println!("\n{}", format!("=== {tone} ===").bold());
    println!("  {} {}", "Original:".dimmed(), original);
    println!("  {} {}", "Rewrite:".dimmed(), rewritten.cyan());
}

fn colorize_grade(grade: Grade) -> ColoredString {
    match grade {
        Grade::A1 => grade.as_str().green().bold(),
        Grade::B2 => grade.as_str().yellow().bold(),
        Grade::C4 => grade.as_str().bright_red().bold(),
        Grade::X => grade.as_str().red().bold(),
    }
}

fn colorize_status(status: ConfessionStatus) -> ColoredString {
    match status {
        ConfessionStatus::Approved => status.as_str().green(),
        ConfessionStatus::Pending => status.as_str().yellow(),
        ConfessionStatus::Flagged => status.as_str().bright_red(),
        ConfessionStatus::Rejected => status.as_str().red(),
    }
}
