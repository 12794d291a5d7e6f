//! # Error Types
//!
//! General error handling for the `offsets` command.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

/// Why a raw command string could not be turned into [`OffsetsArgs`]
///
/// Every variant is terminal for the current invocation. The command
/// boundary reports all of them to the host as `option parsing failed`.
///
/// [`OffsetsArgs`]: crate::command::OffsetsArgs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError
{
    /// The command string could not be split shell-style
    ///
    /// This happens on an unterminated quote or a trailing escape, e.g.
    /// `offsets "point`.
    #[error("Unbalanced quoting in command: {0}")]
    Tokenize(String),

    /// The tokens did not match the expected usage
    ///
    /// Covers a missing `struct_name`, extra positional arguments and
    /// unknown flags. The string is the parser's rendered message.
    #[error("{0}")]
    Usage(String),

    /// `--help` was given; the string is the rendered help text
    #[error("Help requested")]
    HelpRequested(String),
}

/// Errors raised while installing commands into a dispatcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError
{
    /// A command with this name is already registered
    #[error("A command named '{0}' is already registered")]
    DuplicateCommand(String),

    /// Command names must be a single non-empty word
    #[error("Invalid command name: '{0}'")]
    InvalidName(String),
}

/// Main error type for `offsets` operations
///
/// ## Error Categories
///
/// 1. **Command errors**: Argument, `NoFrame`, `VariableNotFound`
/// 2. **Installation errors**: Registry
/// 3. **Snapshot errors**: Snapshot, Json
/// 4. **I/O errors**: Output, Io
#[derive(Error, Debug)]
pub enum OffsetsError
{
    /// The command arguments failed to parse
    #[error("Invalid arguments: {0}")]
    Argument(#[from] ArgumentError),

    /// No valid execution frame is selected
    ///
    /// This happens when:
    /// - No target or process exists
    /// - The process is running or has exited
    /// - The selected thread has no frames
    #[error("no frame here")]
    NoFrame,

    /// The named variable is not visible in the selected frame
    #[error("no variable named '{0}' in the current frame")]
    VariableNotFound(String),

    /// Command registration failed
    #[error("Registration failed: {0}")]
    Registry(#[from] RegistryError),

    /// A snapshot was readable but semantically inconsistent
    ///
    /// Examples:
    /// - `selected_thread` points past the end of `threads`
    /// - `selected_frame` points past the end of `frames`
    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    /// Snapshot JSON could not be decoded
    #[error("Malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing command output failed
    #[error("Failed to write command output")]
    Output(#[from] std::fmt::Error),

    /// I/O error (for file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, OffsetsError>`
///
/// ```rust
/// use offsets_core::error::OffsetsResult;
/// fn foo() -> OffsetsResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type OffsetsResult<T> = std::result::Result<T, OffsetsError>;
