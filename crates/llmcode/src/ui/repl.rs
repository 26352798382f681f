//! The interactive command loop.

use std::borrow::Cow;

use anyhow::{Context as _, Result, anyhow};
use crossterm::style::Stylize;
use reedline::{
    Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal,
};

use crate::app::chat::{ChatClient, ChatHistory};
use crate::app::collect;
use crate::app::render::ContextRenderer;
use crate::infra::clipboard::Clipboard;
use crate::infra::config::{ConfigStore, KEY_MASK};
use crate::infra::fs::Workspace;
use crate::infra::{git, highlight};
use crate::ui::commands::{Command, ConfigCommand};
use crate::ui::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditMode {
    Create,
    Append,
}

/// Multi-line capture state for `/write` and `/append`.
struct EditSession {
    path: String,
    mode: EditMode,
    lines: Vec<String>,
}

/// The interactive shell: owns the workspace, configuration, transcript and
/// chat backend, and dispatches parsed commands.
pub struct Repl {
    workspace: Workspace,
    config: ConfigStore,
    client: Box<dyn ChatClient>,
    history: ChatHistory,
    renderer: ContextRenderer,
    clipboard: Clipboard,
    edit: Option<EditSession>,
    last_context: Option<String>,
    debug_override: bool,
}

impl Repl {
    pub fn new(
        workspace: Workspace,
        config: ConfigStore,
        client: Box<dyn ChatClient>,
        debug_override: bool,
    ) -> Result<Self> {
        let history = ChatHistory::new(workspace.cwd());
        Ok(Self {
            workspace,
            config,
            client,
            history,
            renderer: ContextRenderer::new()?,
            clipboard: Clipboard::new(),
            edit: None,
            last_context: None,
            debug_override,
        })
    }

    /// Run the loop until the user exits.
    pub fn run(&mut self) -> Result<()> {
        self.print_banner();

        let mut editor = Reedline::create();
        loop {
            let prompt = ReplPrompt {
                location: self.workspace.dir_name(),
                mode: self.edit.as_ref().map(|session| session.mode),
            };
            match editor.read_line(&prompt).context("failed to read input")? {
                Signal::Success(line) => {
                    if self.handle_line(&line) == Flow::Quit {
                        break;
                    }
                }
                Signal::CtrlC | Signal::CtrlD => {
                    println!("\n{}", "Goodbye! Thanks for using llmcode.".blue());
                    break;
                }
            }
        }
        Ok(())
    }

    fn print_banner(&self) {
        println!("{} - Your AI coding assistant", "llmcode".blue().bold());
        println!("Type \"/exit\" to quit or \"/help\" for commands");

        let mut location = format!("Working directory: {}", self.workspace.cwd().display());
        if let Some(repo) = git::discover(self.workspace.cwd())
            && let Some(branch) = repo.branch
        {
            location.push_str(&format!(" (branch {branch})"));
        }
        output::note(&location);

        if !self.debug_enabled() && self.config.active_profile().api_key.trim().is_empty() {
            output::note(
                "No API key configured. Set one with \"/config set apiKey YOUR_API_KEY\" or enable debug mode.",
            );
        }
    }

    fn debug_enabled(&self) -> bool {
        self.debug_override || self.config.active_profile().debug
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        if self.edit.is_some() {
            self.handle_edit_line(line);
            return Flow::Continue;
        }

        match Command::parse(line) {
            Command::Empty => {}
            Command::Help => output::print_help(),
            Command::Exit => {
                println!("{}", "Goodbye!".blue());
                return Flow::Quit;
            }
            Command::Pwd => {
                println!(
                    "{} {}",
                    "Current directory:".green(),
                    self.workspace.cwd().display()
                );
            }
            Command::Ls { path } => self.cmd_ls(path),
            Command::Tree { path } => self.cmd_tree(path),
            Command::Cat { path } => self.cmd_cat(&path),
            Command::Write { path } => self.begin_write(path),
            Command::Append { path } => self.begin_append(path),
            Command::Cd { path } => self.cmd_cd(&path),
            Command::Mkdir { path } => self.cmd_mkdir(&path),
            Command::Config(config_cmd) => self.cmd_config(config_cmd),
            Command::Context { path } => self.cmd_context(path),
            Command::Copy => self.cmd_copy(),
            Command::Chat(text) => self.cmd_chat(text),
            Command::Invalid(message) => println!("{}", message.red()),
            Command::Unknown(word) => {
                println!(
                    "{}",
                    format!("Unknown command '{word}'. Type /help for the list of commands.").red()
                );
            }
        }
        Flow::Continue
    }

    // ---- file edit sessions ----

    fn begin_write(&mut self, path: String) {
        output::success(&format!("Creating file: {path}"));
        output::note("Enter file content (type /save to save and exit, or /cancel to cancel):");
        self.edit = Some(EditSession {
            path,
            mode: EditMode::Create,
            lines: Vec::new(),
        });
    }

    fn begin_append(&mut self, path: String) {
        match self.workspace.read_file(&path) {
            Ok((_, content)) => {
                output::success(&format!("Appending to file: {path}"));
                output::note(
                    "Enter content to append (type /save to save and exit, or /cancel to cancel):",
                );
                self.edit = Some(EditSession {
                    path,
                    mode: EditMode::Append,
                    lines: content.lines().map(str::to_owned).collect(),
                });
            }
            Err(err) => output::error(&format!("{err:#}")),
        }
    }

    fn handle_edit_line(&mut self, line: &str) {
        match line.trim() {
            "/save" => {
                let Some(session) = self.edit.take() else {
                    return;
                };
                let content = session.lines.join("\n");
                match self.workspace.write_file(&session.path, &content) {
                    Ok(written) => output::success(&format!("File saved: {}", written.display())),
                    Err(err) => output::error(&format!("{err:#}")),
                }
            }
            "/cancel" => {
                output::warn("File edit cancelled.");
                self.edit = None;
            }
            _ => {
                if let Some(session) = self.edit.as_mut() {
                    session.lines.push(line.to_owned());
                }
            }
        }
    }

    // ---- filesystem commands ----

    fn cmd_ls(&mut self, path: Option<String>) {
        let path = path.unwrap_or_else(|| ".".to_owned());
        match self.workspace.list_dir(&path) {
            Ok(listing) => {
                output::print_dir_listing(&listing);
                self.history.push_user(format!(
                    "Directory listing for {}:\n{}",
                    listing.path.display(),
                    output::listing_as_text(&listing)
                ));
            }
            Err(err) => output::error(&format!("{err:#}")),
        }
    }

    fn cmd_tree(&mut self, path: Option<String>) {
        let path = path.unwrap_or_else(|| ".".to_owned());
        let resolved = self.workspace.resolve(&path);
        match self.workspace.tree(&path) {
            Ok(rendered) => {
                output::success(&format!("Directory tree for: {}", resolved.display()));
                print!("{rendered}");
                self.history.push_user(format!(
                    "Directory tree for {}:\n{rendered}",
                    resolved.display()
                ));
            }
            Err(err) => output::error(&format!("{err:#}")),
        }
    }

    fn cmd_cat(&mut self, path: &str) {
        match self.workspace.read_file(path) {
            Ok((resolved, content)) => {
                output::success(&format!("Contents of: {}", resolved.display()));
                output::rule();
                match highlight::render(&resolved, &content) {
                    Some(colored) => print!("{colored}"),
                    None => print!("{content}"),
                }
                if !content.ends_with('\n') {
                    println!();
                }
                output::rule();
            }
            Err(err) => output::error(&format!("{err:#}")),
        }
    }

    fn cmd_cd(&mut self, path: &str) {
        match self.workspace.change_dir(path) {
            Ok(new_cwd) => {
                output::success(&format!("Changed directory to: {}", new_cwd.display()));
                self.history.set_working_directory(self.workspace.cwd());
            }
            Err(err) => output::error(&format!("{err:#}")),
        }
    }

    fn cmd_mkdir(&mut self, path: &str) {
        match self.workspace.make_dir(path) {
            Ok(created) => output::success(&format!("Created directory: {}", created.display())),
            Err(err) => output::error(&format!("{err:#}")),
        }
    }

    // ---- configuration ----

    fn cmd_config(&mut self, command: ConfigCommand) {
        match command {
            ConfigCommand::List => {
                output::success("Available configurations:");
                let active = self.config.active_name().to_owned();
                for name in self.config.profile_names() {
                    if name == active {
                        println!("* {name} (active)");
                    } else {
                        println!("  {name}");
                    }
                }
            }
            ConfigCommand::Show => {
                output::success("Active configuration:");
                let profile = self.config.active_profile();
                println!("  apiKey: {KEY_MASK}");
                println!("  baseUrl: {}", profile.base_url);
                println!("  model: {}", profile.model);
                println!("  debug: {}", profile.debug);
            }
            ConfigCommand::Set { key, value } => match self.config.set(&key, &value) {
                Ok(()) => output::success(&format!("Configuration updated: {key}")),
                Err(err) => output::error(&format!("{err:#}")),
            },
        }
    }

    // ---- context ----

    fn cmd_context(&mut self, path: Option<String>) {
        let path = path.unwrap_or_else(|| ".".to_owned());
        output::success(&format!(
            "Getting context from: {}",
            self.workspace.resolve(&path).display()
        ));

        match collect::collect(self.workspace.cwd(), &path) {
            Ok(context) => {
                output::success(&format!("\nFound {} file(s) in workspace:", context.len()));
                for entry in &context.entries {
                    output::print_context_entry(entry);
                }
                match self.renderer.render(&context) {
                    Ok(block) => {
                        self.history.push_context(&block);
                        self.last_context = Some(block);
                        output::success("\nContext added to chat history.");
                    }
                    Err(err) => output::error(&format!("{err:#}")),
                }
            }
            Err(err) => output::error(&err.to_string()),
        }
    }

    fn cmd_copy(&mut self) {
        let Some(block) = self.last_context.as_deref() else {
            output::warn("No workspace context collected yet.");
            return;
        };
        match self.clipboard.copy(block) {
            Ok(()) => output::success("Context copied to clipboard."),
            Err(err) => output::error(&format!("{err:#}")),
        }
    }

    // ---- chat ----

    fn cmd_chat(&mut self, text: String) {
        let debug = self.debug_enabled();
        if !debug && self.config.active_profile().api_key.trim().is_empty() {
            output::error("API key not configured");
            return;
        }

        self.history.push_user(text);
        let reply = if debug {
            self.client.complete(self.history.messages())
        } else {
            Err(anyhow!(
                "no remote chat transport is bundled with this build; enable debug mode with \"/config set debug true\""
            ))
        };

        match reply {
            Ok(message) => {
                println!("{} {message}", "Assistant:".blue());
                self.history.push_assistant(message);
            }
            Err(err) => output::error(&format!("{err:#}")),
        }
    }
}

/// Prompt shown by the line editor: `[dir]> `, with the indicator switching
/// while a file-edit session is active.
struct ReplPrompt {
    location: String,
    mode: Option<EditMode>,
}

impl Prompt for ReplPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!("[{}]", self.location))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        match self.mode {
            None => Cow::Borrowed("> "),
            Some(EditMode::Create) => Cow::Borrowed(" edit> "),
            Some(EditMode::Append) => Cow::Borrowed(" append> "),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("::: ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({prefix}reverse-search: {}) ",
            history_search.term
        ))
    }
}
