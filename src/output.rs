//! Colored terminal status reporting.
//!
//! Status and success lines go to stdout; warnings and errors go to
//! stderr so they survive piping a run's output into a file.

use std::fmt::Display;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Prints a cyan `[*]` progress line.
pub fn status(message: impl Display) {
    println!("{} {message}", "[*]".cyan().bold());
}

/// Prints a green `[OK]` completion line.
pub fn success(message: impl Display) {
    println!("{} {message}", "[OK]".green().bold());
}

/// Prints a yellow `[WARN]` line to stderr.
pub fn warn(message: impl Display) {
    eprintln!("{} {message}", "[WARN]".yellow().bold());
}

/// Prints a red `[ERROR]` line to stderr.
pub fn error(message: impl Display) {
    eprintln!("{} {message}", "[ERROR]".red().bold());
}

/// Standard progress bar for long collection loops.
pub fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} | {msg}")
            .expect("valid progress bar template")
            .progress_chars("=>-"),
    );
    bar
}
