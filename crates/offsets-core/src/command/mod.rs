//! # Commands
//!
//! The `offsets` command and the plumbing that installs it into a host.
//!
//! - [`args`]: shell-style tokenizing and `clap` parsing of the command line
//! - [`registry`]: command results, handler/dispatcher traits, [`register`],
//!   and a small [`CommandInterpreter`]
//! - [`offsets`]: the [`OffsetsCommand`] handler and [`init_module`]

pub mod args;
pub mod offsets;
pub mod registry;

pub use args::{help_text, parse, OffsetsArgs};
pub use offsets::{init_module, OffsetsCommand, COMMAND_NAME, NO_FRAME_MESSAGE, OPTION_PARSING_FAILED};
pub use registry::{register, CommandDispatcher, CommandHandler, CommandInterpreter, CommandResult, HELP_COMMAND};
