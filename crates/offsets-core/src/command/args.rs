//! Argument parsing for `offsets <struct_name>`.
//!
//! The raw command string is split the way a shell would (quotes and
//! escapes honoured) and then matched against a `clap` definition. Nothing
//! here ever exits the process: every failure, `--help` included, comes back
//! as an [`ArgumentError`].

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::command::COMMAND_NAME;
use crate::error::ArgumentError;

/// Parsed arguments of the `offsets` command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "offsets")]
#[command(override_usage = "offsets <struct_name>")]
#[command(about = "Dump the offsets of all members of a struct", long_about = None)]
#[command(disable_version_flag = true)]
pub struct OffsetsArgs
{
    /// The name of the struct to dump member offsets for
    #[arg(value_name = "struct_name")]
    pub struct_name: String,
}

/// Parse a raw command string into [`OffsetsArgs`]
///
/// ## Errors
///
/// - `Tokenize`: unbalanced quotes or a dangling escape
/// - `HelpRequested`: `-h` or `--help` was given
/// - `Usage`: missing or extra positional arguments, or unknown flags
///
/// ## Example
///
/// ```rust
/// use offsets_core::command::parse;
///
/// let args = parse("'my point'")?;
/// assert_eq!(args.struct_name, "my point");
/// assert!(parse("").is_err());
/// # Ok::<(), offsets_core::error::ArgumentError>(())
/// ```
pub fn parse(command: &str) -> Result<OffsetsArgs, ArgumentError>
{
    let tokens = shlex::split(command).ok_or_else(|| ArgumentError::Tokenize(command.to_string()))?;
    let argv = std::iter::once(COMMAND_NAME.to_string()).chain(tokens);

    OffsetsArgs::try_parse_from(argv).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp => ArgumentError::HelpRequested(err.render().to_string()),
        _ => ArgumentError::Usage(err.render().to_string()),
    })
}

/// Rendered `--help` text of the `offsets` command
pub fn help_text() -> String
{
    OffsetsArgs::command().render_help().to_string()
}
