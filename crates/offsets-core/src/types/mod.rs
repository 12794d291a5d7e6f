//! # Types
//!
//! Host-agnostic value types shared by the dumper, the command layer and
//! the snapshot host.

pub mod address;

// Re-export all public types
pub use address::Address;
