//! Parsing of slash commands entered at the prompt.

/// Everything a line of input can dispatch to. Lines that do not start with
/// `/` become chat turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Pwd,
    Ls { path: Option<String> },
    Tree { path: Option<String> },
    Cat { path: String },
    Write { path: String },
    Append { path: String },
    Cd { path: String },
    Mkdir { path: String },
    Config(ConfigCommand),
    Context { path: Option<String> },
    Copy,
    Chat(String),
    Empty,
    /// Parse failure with a user-facing message.
    Invalid(String),
    /// A slash command this shell does not know.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    List,
    Show,
    Set { key: String, value: String },
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if !trimmed.starts_with('/') {
            return Command::Chat(trimmed.to_owned());
        }

        let (word, rest) = split_word(trimmed);
        let rest = rest.trim();
        match word {
            "/help" => Command::Help,
            "/exit" | "/quit" => Command::Exit,
            "/pwd" | "/cwd" => Command::Pwd,
            "/ls" => Command::Ls {
                path: optional(rest),
            },
            "/tree" => Command::Tree {
                path: optional(rest),
            },
            "/cat" => required(rest, "/cat <file>", |path| Command::Cat { path }),
            "/write" => required(rest, "/write <file>", |path| Command::Write { path }),
            "/append" => required(rest, "/append <file>", |path| Command::Append { path }),
            "/cd" => required(rest, "/cd <path>", |path| Command::Cd { path }),
            "/mkdir" => required(rest, "/mkdir <path>", |path| Command::Mkdir { path }),
            "/config" => parse_config(rest),
            "/context" | "/#" => Command::Context {
                path: optional(rest),
            },
            "/copy" => Command::Copy,
            other => Command::Unknown(other.to_owned()),
        }
    }
}

fn split_word(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(at) => (&line[..at], &line[at..]),
        None => (line, ""),
    }
}

fn optional(rest: &str) -> Option<String> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_owned())
    }
}

fn required(rest: &str, usage: &str, build: impl FnOnce(String) -> Command) -> Command {
    if rest.is_empty() {
        Command::Invalid(format!("Missing argument. Usage: {usage}"))
    } else {
        build(rest.to_owned())
    }
}

fn parse_config(rest: &str) -> Command {
    const USAGE: &str = "Use: /config set|list|show";

    let (sub, args) = split_word(rest);
    let args = args.trim();
    match sub {
        "" => Command::Invalid(format!("Missing config command. {USAGE}")),
        "list" => Command::Config(ConfigCommand::List),
        "show" => Command::Config(ConfigCommand::Show),
        "set" => {
            let (key, value) = split_word(args);
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                Command::Invalid(format!("Invalid config command. {USAGE}"))
            } else {
                Command::Config(ConfigCommand::Set {
                    key: key.to_owned(),
                    value: value.to_owned(),
                })
            }
        }
        _ => Command::Invalid(format!("Invalid config command. {USAGE}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(
            Command::parse("how does the parser work?"),
            Command::Chat("how does the parser work?".into())
        );
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn bare_commands_parse() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/exit"), Command::Exit);
        assert_eq!(Command::parse("/quit"), Command::Exit);
        assert_eq!(Command::parse("/pwd"), Command::Pwd);
        assert_eq!(Command::parse("/cwd"), Command::Pwd);
        assert_eq!(Command::parse("/copy"), Command::Copy);
    }

    #[test]
    fn path_arguments_are_optional_for_listing_commands() {
        assert_eq!(Command::parse("/ls"), Command::Ls { path: None });
        assert_eq!(
            Command::parse("/ls src"),
            Command::Ls {
                path: Some("src".into())
            }
        );
        assert_eq!(Command::parse("/tree"), Command::Tree { path: None });
    }

    #[test]
    fn context_accepts_both_spellings() {
        assert_eq!(Command::parse("/context"), Command::Context { path: None });
        assert_eq!(
            Command::parse("/context src"),
            Command::Context {
                path: Some("src".into())
            }
        );
        assert_eq!(Command::parse("/#"), Command::Context { path: None });
        assert_eq!(
            Command::parse("/# src"),
            Command::Context {
                path: Some("src".into())
            }
        );
    }

    #[test]
    fn file_commands_require_an_argument() {
        assert_eq!(
            Command::parse("/cat notes.txt"),
            Command::Cat {
                path: "notes.txt".into()
            }
        );
        assert!(matches!(Command::parse("/cat"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/write"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/cd"), Command::Invalid(_)));
    }

    #[test]
    fn paths_may_contain_spaces() {
        assert_eq!(
            Command::parse("/cat my notes.txt"),
            Command::Cat {
                path: "my notes.txt".into()
            }
        );
    }

    #[test]
    fn config_subcommands_parse() {
        assert_eq!(
            Command::parse("/config list"),
            Command::Config(ConfigCommand::List)
        );
        assert_eq!(
            Command::parse("/config show"),
            Command::Config(ConfigCommand::Show)
        );
        assert_eq!(
            Command::parse("/config set apiKey sk-123 456"),
            Command::Config(ConfigCommand::Set {
                key: "apiKey".into(),
                value: "sk-123 456".into()
            })
        );
        assert!(matches!(Command::parse("/config"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/config set"), Command::Invalid(_)));
        assert!(matches!(
            Command::parse("/config set apiKey"),
            Command::Invalid(_)
        ));
    }

    #[test]
    fn unknown_slash_commands_are_flagged() {
        assert_eq!(Command::parse("/frobnicate"), Command::Unknown("/frobnicate".into()));
    }
}
