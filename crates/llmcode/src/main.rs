use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use llmcode::app::chat::{ChatClient, MockClient};
use llmcode::infra::config::ConfigStore;
use llmcode::infra::fs::Workspace;
use llmcode::ui::repl::Repl;

#[derive(Parser)]
#[command(name = "llmcode", version, about = "Terminal coding assistant that understands your workspace")]
struct Cli {
    /// Directory to use as the workspace root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Use the mock chat backend for this session regardless of configuration
    #[arg(long)]
    debug: bool,

    /// Print shell completions for the given shell and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    llmcode::init();
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "llmcode", &mut io::stdout());
        return Ok(());
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("unable to determine working directory")?,
    };
    let workspace = Workspace::new(root)?;
    let config = ConfigStore::open_default()?;
    let client: Box<dyn ChatClient> = Box::new(MockClient::new());

    let mut repl = Repl::new(workspace, config, client, cli.debug)?;
    repl.run()
}
