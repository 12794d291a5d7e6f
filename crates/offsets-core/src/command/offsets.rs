//! The `offsets` command itself.

use std::fmt;

use tracing::{debug, info, warn};

use crate::command::args::{help_text, parse, OffsetsArgs};
use crate::command::registry::{register, CommandDispatcher, CommandHandler, CommandResult};
use crate::debugger::{selected_frame, Debugger, Frame};
use crate::dump::dump;
use crate::error::{ArgumentError, OffsetsError, OffsetsResult, RegistryError};
use crate::value::DebugValue;

/// Name the command is registered under
pub const COMMAND_NAME: &str = "offsets";

/// Output when there is no selected frame to look the variable up in
pub const NO_FRAME_MESSAGE: &str = "no frame here";

/// Error reported for every argument failure, `--help` included
pub const OPTION_PARSING_FAILED: &str = "option parsing failed";

/// `offsets <struct_name>`: dump the address of a variable and every field
/// nested inside it
#[derive(Debug, Default, Clone, Copy)]
pub struct OffsetsCommand;

impl OffsetsCommand
{
    /// Look up `args.struct_name` in the selected frame of `debugger` and
    /// dump it into `out`
    ///
    /// Returns the number of lines written.
    ///
    /// ## Errors
    ///
    /// - `NoFrame`: no valid frame is selected
    /// - `VariableNotFound`: the frame has no valid variable of that name
    /// - `Output`: `out` rejected a write
    pub fn run<D, W>(debugger: &D, args: &OffsetsArgs, out: &mut W) -> OffsetsResult<usize>
    where
        D: Debugger,
        W: fmt::Write,
    {
        let frame = selected_frame(debugger).ok_or(OffsetsError::NoFrame)?;
        let function = frame.function_name();
        debug!(
            function = function.as_deref().unwrap_or("<unknown>"),
            variable = %args.struct_name,
            "resolving variable"
        );

        let value = frame
            .find_variable(&args.struct_name)
            .filter(DebugValue::is_valid)
            .ok_or_else(|| OffsetsError::VariableNotFound(args.struct_name.clone()))?;

        Ok(dump(value, 0, out)?)
    }

    /// Parse the raw `command` string and [`run`](Self::run) it
    ///
    /// ## Errors
    ///
    /// `Argument` if `command` does not parse, otherwise as [`run`](Self::run).
    pub fn run_command<D, W>(debugger: &D, command: &str, out: &mut W) -> OffsetsResult<usize>
    where
        D: Debugger,
        W: fmt::Write,
    {
        let args = parse(command)?;
        Self::run(debugger, &args, out)
    }
}

impl<D: Debugger> CommandHandler<D> for OffsetsCommand
{
    fn invoke(&self, debugger: &D, command: &str, result: &mut CommandResult)
    {
        match Self::run_command(debugger, command, result) {
            Ok(lines) => debug!(lines, "offsets finished"),
            Err(OffsetsError::Argument(ArgumentError::HelpRequested(help))) => {
                result.append_output(&help);
                result.set_error(OPTION_PARSING_FAILED);
            }
            Err(OffsetsError::Argument(err)) => {
                warn!(error = %err, "offsets argument parsing failed");
                result.set_error(OPTION_PARSING_FAILED);
            }
            Err(OffsetsError::NoFrame) => result.append_line(NO_FRAME_MESSAGE),
            Err(err) => result.set_error(err.to_string()),
        }
    }

    fn help(&self) -> String
    {
        help_text()
    }
}

/// Install the `offsets` command into `dispatcher`
///
/// This is the load-time entry point a host calls once. The returned line
/// is the confirmation to show the user.
///
/// ## Errors
///
/// Returns `DuplicateCommand` if `offsets` is already installed.
pub fn init_module<D: Debugger>(dispatcher: &mut impl CommandDispatcher<D>) -> Result<String, RegistryError>
{
    register(dispatcher, COMMAND_NAME, OffsetsCommand)?;
    info!(command = COMMAND_NAME, "installed command");
    Ok(format!(
        "The \"{COMMAND_NAME}\" command has been installed, type \"help {COMMAND_NAME}\" or \"{COMMAND_NAME} \
         --help\" for detailed help."
    ))
}
