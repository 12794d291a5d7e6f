//! # Command Registry
//!
//! How commands are installed into, and dispatched by, a host's command
//! interpreter.
//!
//! A host only has to implement [`CommandDispatcher`]. [`register`] is the
//! one call an extension makes at load time; after that the host owns the
//! handler and invokes it whenever the user runs the command.
//!
//! [`CommandInterpreter`] is a complete dispatcher with a built-in `help`,
//! used by the `offsets` shell and by tests.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info_span};

use crate::error::RegistryError;

/// Name of the interpreter's built-in help command
pub const HELP_COMMAND: &str = "help";

/// Output and status of one command invocation
///
/// Implements [`fmt::Write`], so handlers can stream output straight into
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult
{
    output: String,
    error: Option<String>,
}

impl CommandResult
{
    /// An empty, successful result
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Append text to the output verbatim
    pub fn append_output(&mut self, text: &str)
    {
        self.output.push_str(text);
    }

    /// Append text to the output followed by a newline
    pub fn append_line(&mut self, line: &str)
    {
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Mark the invocation as failed with `message`
    pub fn set_error(&mut self, message: impl Into<String>)
    {
        self.error = Some(message.into());
    }

    /// Everything written to the output so far
    pub fn output(&self) -> &str
    {
        &self.output
    }

    /// The error message, if the invocation failed
    pub fn error(&self) -> Option<&str>
    {
        self.error.as_deref()
    }

    /// Whether no error was set
    pub fn succeeded(&self) -> bool
    {
        self.error.is_none()
    }
}

impl fmt::Write for CommandResult
{
    fn write_str(&mut self, s: &str) -> fmt::Result
    {
        self.output.push_str(s);
        Ok(())
    }
}

/// A command a host can invoke against a debugger session of type `D`
pub trait CommandHandler<D>
{
    /// Run the command
    ///
    /// `command` is the raw text the user typed after the command name.
    /// Output and errors go to `result`; handlers never panic on bad input.
    fn invoke(&self, debugger: &D, command: &str, result: &mut CommandResult);

    /// Help text shown by `help <name>`
    ///
    /// The first line doubles as the one-line summary in command listings.
    fn help(&self) -> String;
}

/// A host's registry of named commands
pub trait CommandDispatcher<D>
{
    /// Install `handler` under `name`
    ///
    /// ## Errors
    ///
    /// Returns `DuplicateCommand` if `name` is already taken.
    fn add_command(&mut self, name: &str, handler: Box<dyn CommandHandler<D>>) -> Result<(), RegistryError>;
}

/// Register `handler` with `dispatcher` under `name`
///
/// ## Errors
///
/// - `InvalidName`: `name` is empty or contains whitespace
/// - `DuplicateCommand`: the dispatcher already has a command called `name`
pub fn register<D, H>(dispatcher: &mut impl CommandDispatcher<D>, name: &str, handler: H) -> Result<(), RegistryError>
where
    H: CommandHandler<D> + 'static,
{
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    dispatcher.add_command(name, Box::new(handler))?;
    debug!(command = name, "registered command");
    Ok(())
}

/// A minimal command interpreter
///
/// The first word of a line names the command; the remainder is handed to
/// the handler untouched, so handlers do their own tokenizing.
///
/// ## Example
///
/// ```rust
/// use offsets_core::command::{init_module, CommandInterpreter};
/// use offsets_core::snapshot::{FrameSnapshot, ProcessState, SessionSnapshot};
///
/// let session = SessionSnapshot::single_frame(ProcessState::Running, FrameSnapshot::new("main"));
/// let mut interpreter = CommandInterpreter::new();
/// init_module(&mut interpreter)?;
///
/// let result = interpreter.handle_command(&&session, "offsets point");
/// assert_eq!(result.output(), "no frame here\n");
/// # Ok::<(), offsets_core::error::RegistryError>(())
/// ```
pub struct CommandInterpreter<D>
{
    commands: BTreeMap<String, Box<dyn CommandHandler<D>>>,
}

impl<D> fmt::Debug for CommandInterpreter<D>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("CommandInterpreter")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<D> Default for CommandInterpreter<D>
{
    fn default() -> Self
    {
        Self {
            commands: BTreeMap::new(),
        }
    }
}

impl<D> CommandInterpreter<D>
{
    /// An interpreter with no commands besides `help`
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Whether a command called `name` is registered
    pub fn contains(&self, name: &str) -> bool
    {
        self.commands.contains_key(name)
    }

    /// Names of registered commands, sorted
    pub fn command_names(&self) -> impl Iterator<Item = &str>
    {
        self.commands.keys().map(String::as_str)
    }

    /// Run one line of input
    pub fn handle_command(&self, debugger: &D, line: &str) -> CommandResult
    {
        let mut result = CommandResult::new();
        let line = line.trim();
        if line.is_empty() {
            return result;
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };
        let _span = info_span!("command", command = name).entered();

        if name == HELP_COMMAND {
            self.help(rest, &mut result);
        } else if let Some(handler) = self.commands.get(name) {
            handler.invoke(debugger, rest, &mut result);
        } else {
            result.set_error(format!("'{name}' is not a valid command."));
        }

        debug!(succeeded = result.succeeded(), "command finished");
        result
    }

    fn help(&self, topic: &str, result: &mut CommandResult)
    {
        if topic.is_empty() {
            result.append_line("Current user-defined commands:");
            for (name, handler) in &self.commands {
                let help = handler.help();
                let summary = help.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
                result.append_line(&format!("  {name} -- {}", summary.trim()));
            }
            result.append_line("For more information on any command, type 'help <command-name>'.");
            return;
        }

        match self.commands.get(topic) {
            Some(handler) => {
                let help = handler.help();
                result.append_output(&help);
                if !help.ends_with('\n') {
                    result.append_output("\n");
                }
            }
            None => result.set_error(format!("'{topic}' is not a known command.")),
        }
    }
}

impl<D> CommandDispatcher<D> for CommandInterpreter<D>
{
    fn add_command(&mut self, name: &str, handler: Box<dyn CommandHandler<D>>) -> Result<(), RegistryError>
    {
        if name == HELP_COMMAND || self.commands.contains_key(name) {
            return Err(RegistryError::DuplicateCommand(name.to_string()));
        }
        self.commands.insert(name.to_string(), handler);
        Ok(())
    }
}
