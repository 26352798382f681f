//! Styled terminal output shared by the command loop.

use crossterm::style::Stylize;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::domain::model::ContextEntry;
use crate::infra::fs::DirListing;

const RULE_WIDTH: usize = 80;

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn error(message: &str) {
    println!("{}", format!("Error: {message}").red());
}

pub fn warn(message: &str) {
    println!("{}", message.yellow());
}

pub fn note(message: &str) {
    println!("{}", message.dim());
}

pub fn rule() {
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print one collected entry: a blue `[path]` header and the content with a
/// dim line-number gutter, framed by rule lines.
pub fn print_context_entry(entry: &ContextEntry) {
    println!("\n{}", format!("[{}]", entry.path).blue());
    rule();
    for (index, line) in entry.content.lines().enumerate() {
        println!("{} {}", format!("{:4} │", index + 1).dim(), line);
    }
    rule();
}

/// Print a directory listing: directories as blue `name/`, files with dim
/// size and modified columns, per-entry errors in red.
pub fn print_dir_listing(listing: &DirListing) {
    success(&format!("Contents of: {}", listing.path.display()));
    for entry in &listing.entries {
        if let Some(err) = &entry.error {
            println!("{}", format!("{} (error: {err})", entry.name).red());
        } else if entry.is_dir {
            println!("{}", format!("{}/", entry.name).blue());
        } else {
            let size = entry.size.map(human_size).unwrap_or_default();
            let stamp = entry.modified.and_then(format_timestamp).unwrap_or_default();
            println!("{}  {}", entry.name, format!("{size:>9}  {stamp}").dim());
        }
    }
}

/// Plain-text version of a listing for transcript injection.
pub fn listing_as_text(listing: &DirListing) -> String {
    let mut lines = vec![format!("Contents of: {}", listing.path.display())];
    for entry in &listing.entries {
        if let Some(err) = &entry.error {
            lines.push(format!("{} (error: {err})", entry.name));
        } else if entry.is_dir {
            lines.push(format!("{}/", entry.name));
        } else {
            lines.push(entry.name.clone());
        }
    }
    lines.join("\n")
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[0])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn format_timestamp(stamp: OffsetDateTime) -> Option<String> {
    stamp
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .ok()
}

pub fn print_help() {
    let sections: &[(&str, &[(&str, &str)])] = &[
        (
            "Basic Commands",
            &[
                ("/help", "Show this help message"),
                ("/exit, /quit", "Exit the program"),
                ("/pwd, /cwd", "Print working directory"),
            ],
        ),
        (
            "File Operations",
            &[
                ("/ls [path]", "List directory contents"),
                ("/tree [path]", "Show directory structure in tree format"),
                ("/cat <file>", "Display file contents"),
                ("/write <file>", "Create/overwrite a file"),
                ("/append <file>", "Append to existing file"),
            ],
        ),
        (
            "Directory Operations",
            &[("/cd <path>", "Change directory"), ("/mkdir <path>", "Create directory")],
        ),
        (
            "Configuration",
            &[
                ("/config set <key> <value>", "Set configuration value"),
                ("/config list", "List all configurations"),
                ("/config show", "Show active configuration"),
            ],
        ),
        (
            "Context",
            &[
                ("/context [path], /#", "Collect workspace context (default: current directory)"),
                ("/copy", "Copy the last collected context to the clipboard"),
            ],
        ),
    ];

    println!("\n{}", "Available Commands:".blue());
    for (section, commands) in sections {
        println!("\n{}", format!("{section}:").yellow());
        for (command, description) in *commands {
            println!("  {:<30} {description}", command.green());
        }
    }
    println!();
}
