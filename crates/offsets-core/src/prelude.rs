//! Common module for library exports

pub use crate::command::{init_module, register, CommandDispatcher, CommandHandler, CommandInterpreter, CommandResult};
pub use crate::debugger::{selected_frame, Debugger, Frame, Process, Target, Thread};
pub use crate::dump::{dump, dump_to_string, format_type};
pub use crate::error::{ArgumentError, OffsetsError, OffsetsResult, RegistryError};
pub use crate::types::address::Address;
pub use crate::value::{DebugType, DebugValue};
