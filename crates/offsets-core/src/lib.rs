//! # offsets-core
//!
//! Host-independent core of the `offsets` debugger command.
//!
//! `offsets <struct_name>` looks up a variable in the selected frame and
//! prints its address and type, then the address and type of every field
//! nested inside it:
//!
//! ```text
//! point (Point): 0x7fff0000
//!     x (int): 0x7fff0000
//!     y (int): 0x7fff0004
//! ```
//!
//! This crate provides:
//! - The capability traits a host adapts its handles to ([`debugger`], [`value`])
//! - The address-tree dumper ([`dump`])
//! - Argument parsing, the command handler and registration ([`command`])
//! - An in-memory, JSON-loadable host ([`snapshot`])
//!
//! ## Host integration
//!
//! A host implements [`command::CommandDispatcher`] for its command registry
//! and the [`debugger`] / [`value`] traits for its session objects, then
//! calls [`command::init_module`] once at load time.

pub mod command;
pub mod debugger;
pub mod dump;
pub mod error;
pub mod prelude;
pub mod snapshot;
pub mod types;
pub mod value;

pub use debugger::Debugger;
// Re-export commonly used types
pub use error::{OffsetsError, OffsetsResult};
pub use types::Address;
