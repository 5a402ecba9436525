//! Interactive REPL over the capability catalog.
//!
//! Launch with `basic-mcp-server repl`. Requests go straight to the
//! dispatcher, so no handshake is needed. Type `/help` for commands and Tab
//! for completion of commands and capability names.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::Value;
use tokio::runtime::Handle;

use mcp_dispatch::{Arguments, Category, Dispatcher, Request, ResponseEnvelope};

use crate::config::ServerConfig;
use crate::types::{into_arguments, LATEST_PROTOCOL_VERSION};

const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server name, version and enabled capabilities"),
    ("/tools", "List tools"),
    ("/resources", "List resources"),
    ("/prompts", "List prompts"),
    ("/call", "Call a tool: /call <name> [json arguments]"),
    ("/read", "Read a resource: /read <uri>"),
    ("/prompt", "Render a prompt: /prompt <name> [json arguments]"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Tab completion for commands and for capability names after
/// `/call`, `/read` and `/prompt`.
struct CatalogHelper {
    tools: Vec<String>,
    resources: Vec<String>,
    prompts: Vec<String>,
}

impl CatalogHelper {
    fn new(dispatcher: &Dispatcher) -> Self {
        let names = |category: Category| -> Vec<String> {
            dispatcher
                .list(category)
                .iter()
                .map(|d| d.name.clone())
                .collect()
        };
        Self {
            tools: names(Category::Tool),
            resources: names(Category::Resource),
            prompts: names(Category::Prompt),
        }
    }

    fn names_for(&self, cmd: &str) -> Option<&[String]> {
        match cmd {
            "/call" => Some(self.tools.as_slice()),
            "/read" => Some(self.resources.as_slice()),
            "/prompt" => Some(self.prompts.as_slice()),
            _ => None,
        }
    }
}

impl Completer for CatalogHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        let Some((cmd, rest)) = input.split_once(' ') else {
            let matches = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<12} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        };

        match self.names_for(cmd) {
            Some(names) if !rest.contains(' ') => {
                let matches = names
                    .iter()
                    .filter(|n| n.starts_with(rest))
                    .map(|n| Pair {
                        display: n.clone(),
                        replacement: format!("{n} "),
                    })
                    .collect();
                Ok((cmd.len() + 1, matches))
            }
            _ => Ok((pos, Vec::new())),
        }
    }
}

impl Hinter for CatalogHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|(cmd, _)| cmd.starts_with(line) && *cmd != line)
            .map(|(cmd, _)| cmd[line.len()..].to_string())
    }
}

impl Highlighter for CatalogHelper {}
impl Validator for CatalogHelper {}
impl Helper for CatalogHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

struct Repl {
    dispatcher: Arc<Dispatcher>,
    config: Arc<ServerConfig>,
    runtime: Handle,
}

/// Run the REPL on the current thread. Must be called off the async
/// runtime (e.g. via `spawn_blocking`); dispatches are driven on `runtime`.
pub fn run(dispatcher: Arc<Dispatcher>, config: Arc<ServerConfig>, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1m{} v{}\x1b[0m",
        config.name, config.version
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<CatalogHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(CatalogHelper::new(&dispatcher)));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".basic_mcp_server_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let repl = Repl {
        dispatcher,
        config,
        runtime,
    };
    let prompt = " \x1b[36mmcp>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let (cmd, args) = match input.split_once(char::is_whitespace) {
                    Some((cmd, args)) => (cmd, args.trim()),
                    None => (input, ""),
                };

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => repl.cmd_info(),
                    "tools" => repl.cmd_list(Category::Tool),
                    "resources" => repl.cmd_list(Category::Resource),
                    "prompts" => repl.cmd_list(Category::Prompt),
                    "call" => repl.cmd_dispatch(Category::Tool, args),
                    "read" => repl.cmd_dispatch(Category::Resource, args),
                    "prompt" => repl.cmd_dispatch(Category::Prompt, args),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);
    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<12} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands and capability names.");
    eprintln!();
}

impl Repl {
    fn cmd_info(&self) {
        eprintln!();
        eprintln!("  Server:   {} v{}", self.config.name, self.config.version);
        eprintln!("  Protocol: {LATEST_PROTOCOL_VERSION}");
        for category in Category::ALL {
            let state = if self.config.capabilities.contains(category) {
                format!("{}", self.dispatcher.list(category).len())
            } else {
                "disabled".to_string()
            };
            eprintln!("  {:<9} {state}", format!("{}:", capitalize(category.plural())));
        }
        eprintln!();
    }

    fn cmd_list(&self, category: Category) {
        if !self.enabled(category) {
            return;
        }
        let descriptors = self.dispatcher.list(category);
        eprintln!();
        eprintln!("  {} {} available:", descriptors.len(), category.plural());
        eprintln!();
        for d in descriptors {
            eprintln!("    {:<22} {}", d.name, d.description);
        }
        eprintln!();
    }

    fn cmd_dispatch(&self, category: Category, args: &str) {
        if !self.enabled(category) {
            return;
        }
        let (name, raw) = match args.split_once(char::is_whitespace) {
            Some((name, raw)) => (name, raw.trim()),
            None => (args, ""),
        };
        if name.is_empty() {
            eprintln!("  Usage: /{} <name> [json arguments]", verb(category));
            return;
        }

        let arguments = match parse_arguments(raw) {
            Ok(arguments) => arguments,
            Err(e) => {
                eprintln!("  {e}");
                return;
            }
        };

        let request = Request::new(category, name, arguments);
        let envelope = self.runtime.block_on(self.dispatcher.dispatch(request));
        print_envelope(&envelope);
    }

    fn enabled(&self, category: Category) -> bool {
        let enabled = self.config.capabilities.contains(category);
        if !enabled {
            eprintln!("  {} are disabled on this server.", capitalize(category.plural()));
        }
        enabled
    }
}

fn verb(category: Category) -> &'static str {
    match category {
        Category::Tool => "call",
        Category::Resource => "read",
        Category::Prompt => "prompt",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse the optional JSON argument text of `/call` and `/prompt`.
fn parse_arguments(raw: &str) -> Result<Option<Arguments>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("Invalid JSON arguments: {e}"))?;
    into_arguments(Some(value)).map_err(|e| e.to_string())
}

fn print_envelope(envelope: &ResponseEnvelope) {
    eprintln!();
    if envelope.is_error {
        eprintln!("  \x1b[31mError:\x1b[0m {}", envelope.text());
    } else {
        for item in &envelope.content {
            for line in item.as_text().lines() {
                eprintln!("  {line}");
            }
        }
    }
    eprintln!();
}
