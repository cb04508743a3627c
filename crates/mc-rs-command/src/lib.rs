//! Chat commands: a name-keyed registry, the built-ins every server has, and
//! the listing clients use for autocompletion.

use std::collections::BTreeMap;

/// Who ran a command and with which arguments.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub sender: &'a str,
    pub args: &'a [String],
}

impl Invocation<'_> {
    /// Arguments joined back into a single line.
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }
}

/// What running a command produced.
///
/// `messages` go back to the sender only; `broadcast`, when set, is meant
/// for everyone in chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub messages: Vec<String>,
    pub broadcast: Option<String>,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::reply(true, vec![message.into()])
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self::reply(false, vec![message.into()])
    }

    pub fn reply(success: bool, messages: Vec<String>) -> Self {
        Self {
            success,
            messages,
            broadcast: None,
        }
    }

    /// Succeed silently towards the sender and announce `line` to everyone.
    pub fn broadcast(line: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: Vec::new(),
            broadcast: Some(line.into()),
        }
    }
}

pub type Handler = fn(&CommandRegistry, &Invocation<'_>) -> CommandResult;

pub struct Command {
    pub name: String,
    pub description: String,
    pub usage: String,
    handler: Handler,
}

/// Name, description and usage of one command, as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandListing {
    pub name: String,
    pub description: String,
    pub usage: String,
}

/// Commands by lowercase name. Iteration is alphabetical.
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    /// A registry holding `help`, `say` and `me`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("help", "List available commands", "/help", help);
        registry.register("me", "Describe an action you perform", "/me <action>", me);
        registry.register(
            "say",
            "Broadcast a message to all players",
            "/say <message>",
            say,
        );
        registry
    }

    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Add or replace a command.
    pub fn register(&mut self, name: &str, description: &str, usage: &str, handler: Handler) {
        let name = name.to_lowercase();
        self.commands.insert(
            name.clone(),
            Command {
                name,
                description: description.to_string(),
                usage: usage.to_string(),
                handler,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn execute(&self, name: &str, invocation: &Invocation<'_>) -> CommandResult {
        match self.commands.get(name) {
            Some(command) => (command.handler)(self, invocation),
            None => CommandResult::err(format!(
                "Unknown command: {name}. Type /help for a list of commands."
            )),
        }
    }

    /// Run a raw line as typed by a player, e.g. `/say hello world`.
    pub fn execute_line(&self, sender: &str, line: &str) -> CommandResult {
        let Some((name, args)) = parse_command_line(line) else {
            return CommandResult::err("Empty command.");
        };
        self.execute(
            &name,
            &Invocation {
                sender,
                args: &args,
            },
        )
    }

    pub fn listing(&self) -> Vec<CommandListing> {
        self.commands
            .values()
            .map(|c| CommandListing {
                name: c.name.clone(),
                description: c.description.clone(),
                usage: c.usage.clone(),
            })
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a line into a lowercase command name and its arguments.
/// The leading `/` is optional.
pub fn parse_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let trimmed = line.trim();
    let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let mut words = body.split_whitespace();
    let name = words.next()?.to_lowercase();
    Some((name, words.map(str::to_string).collect()))
}

fn help(registry: &CommandRegistry, _: &Invocation<'_>) -> CommandResult {
    let lines = std::iter::once("Available commands:".to_string())
        .chain(
            registry
                .commands
                .values()
                .map(|c| format!("  {}: {}", c.usage, c.description)),
        )
        .collect();
    CommandResult::reply(true, lines)
}

fn say(_: &CommandRegistry, inv: &Invocation<'_>) -> CommandResult {
    if inv.args.is_empty() {
        return CommandResult::err("Usage: /say <message>");
    }
    CommandResult::broadcast(format!("[{}] {}", inv.sender, inv.rest()))
}

fn me(_: &CommandRegistry, inv: &Invocation<'_>) -> CommandResult {
    if inv.args.is_empty() {
        return CommandResult::err("Usage: /me <action>");
    }
    CommandResult::broadcast(format!("* {} {}", inv.sender, inv.rest()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(reg: &CommandRegistry, name: &str, sender: &str, args: &[&str]) -> CommandResult {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        reg.execute(name, &Invocation { sender, args: &args })
    }

    #[test]
    fn builtins() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.len(), 3);
        for name in ["help", "say", "me"] {
            assert!(reg.get(name).is_some(), "{name} missing");
        }
        assert!(CommandRegistry::empty().is_empty());
    }

    #[test]
    fn unknown_command_fails() {
        let result = run(&CommandRegistry::new(), "teleport", "Steve", &[]);
        assert!(!result.success);
        assert!(result.messages[0].starts_with("Unknown command: teleport"));
    }

    #[test]
    fn help_lists_registered_commands() {
        let mut reg = CommandRegistry::new();
        reg.register("gamemode", "Change game mode", "/gamemode", |_, _| {
            CommandResult::err("no")
        });
        let result = run(&reg, "help", "Steve", &[]);
        assert!(result.success);
        assert_eq!(result.messages.len(), 5);
        assert_eq!(result.messages[1], "  /gamemode: Change game mode");
    }

    #[test]
    fn say_and_me_broadcast() {
        let reg = CommandRegistry::new();
        let said = run(&reg, "say", "Steve", &["hello", "world"]);
        assert!(said.success);
        assert!(said.messages.is_empty());
        assert_eq!(said.broadcast.as_deref(), Some("[Steve] hello world"));

        let acted = run(&reg, "me", "Alex", &["waves"]);
        assert_eq!(acted.broadcast.as_deref(), Some("* Alex waves"));
    }

    #[test]
    fn missing_arguments_fail_with_usage() {
        let reg = CommandRegistry::new();
        for name in ["say", "me"] {
            let result = run(&reg, name, "Steve", &[]);
            assert!(!result.success);
            assert!(result.messages[0].starts_with("Usage:"));
            assert_eq!(result.broadcast, None);
        }
    }

    #[test]
    fn register_lowercases_and_replaces() {
        let mut reg = CommandRegistry::new();
        reg.register("Kick", "Kick a player", "/kick <player>", |_, inv| {
            CommandResult::ok(format!("kicked {}", inv.rest()))
        });
        assert_eq!(reg.len(), 4);
        assert_eq!(run(&reg, "kick", "Steve", &["Alex"]).messages, ["kicked Alex"]);

        reg.register("kick", "Kick a player", "/kick", |_, _| CommandResult::err("no"));
        assert_eq!(reg.len(), 4);
        assert!(!run(&reg, "kick", "Steve", &[]).success);
    }

    #[test]
    fn listing_is_alphabetical() {
        let reg = CommandRegistry::new();
        let names: Vec<String> = reg.listing().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["help", "me", "say"]);
        assert_eq!(reg.listing()[2].usage, "/say <message>");
    }

    #[test]
    fn parse_lines() {
        assert_eq!(
            parse_command_line("/Say  hi there "),
            Some(("say".to_string(), vec!["hi".to_string(), "there".to_string()]))
        );
        assert_eq!(parse_command_line("help"), Some(("help".to_string(), vec![])));
        assert_eq!(parse_command_line("/"), None);
        assert_eq!(parse_command_line("   "), None);
    }

    #[test]
    fn execute_line_routes_by_name() {
        let reg = CommandRegistry::new();
        let result = reg.execute_line("Steve", "/ME jumps");
        assert_eq!(result.broadcast.as_deref(), Some("* Steve jumps"));
        assert!(!reg.execute_line("Steve", "").success);
    }
}
