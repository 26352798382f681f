//! Clipboard access for the `/copy` command.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// System clipboard with shell-utility fallbacks for headless environments
/// where the native backend is unavailable.
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self {
            system: arboard::Clipboard::new().ok(),
        }
    }

    /// Place `text` on the clipboard, preferring the native backend.
    pub fn copy(&mut self, text: &str) -> Result<()> {
        if let Some(system) = self.system.as_mut()
            && system.set_text(text.to_owned()).is_ok()
        {
            return Ok(());
        }
        self.system = None;

        for candidate in FALLBACK_COMMANDS {
            if pipe_to_command(candidate, text).is_ok() {
                return Ok(());
            }
        }
        Err(anyhow!("no usable clipboard backend found"))
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn pipe_to_command(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("empty clipboard fallback command")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .context("failed to stream clipboard contents")?;
    }

    let status = child
        .wait()
        .with_context(|| format!("{program} did not exit cleanly"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("{program} exited with {status}"))
    }
}

#[cfg(target_os = "macos")]
const FALLBACK_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(all(unix, not(target_os = "macos")))]
const FALLBACK_COMMANDS: &[&[&str]] = &[&["xclip", "-selection", "clipboard"], &["wl-copy"]];

#[cfg(target_os = "windows")]
const FALLBACK_COMMANDS: &[&[&str]] = &[&["powershell.exe", "-NoProfile", "-Command", "Set-Clipboard"]];

#[cfg(not(any(unix, target_os = "windows")))]
const FALLBACK_COMMANDS: &[&[&str]] = &[];
