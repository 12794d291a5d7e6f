//! # Snapshot Host
//!
//! An in-memory debugger session that implements the [`debugger`] and
//! [`value`] traits.
//!
//! A snapshot captures exactly what the `offsets` command consumes: which
//! target, process, thread and frame are selected, and the typed, addressed
//! variable trees visible in each frame. It can be built in code (tests) or
//! decoded from JSON (the `offsets` shell):
//!
//! ```json
//! {
//!   "targets": [{
//!     "name": "a.out",
//!     "process": {
//!       "pid": 4242,
//!       "state": "stopped",
//!       "threads": [{
//!         "id": 1,
//!         "frames": [{
//!           "function": "main",
//!           "variables": [{
//!             "name": "point",
//!             "type": { "name": "Point", "kind": "struct" },
//!             "address": "0x7fff0000",
//!             "children": [
//!               { "name": "x", "type": { "name": "int" }, "address": "0x7fff0000" },
//!               { "name": "y", "type": { "name": "int" }, "address": "0x7fff0004" }
//!             ]
//!           }]
//!         }]
//!       }]
//!     }
//!   }]
//! }
//! ```
//!
//! Selection indices default to the first entry, matching what a debugger
//! selects when a process stops.
//!
//! The traits are implemented on shared references (`&SessionSnapshot`,
//! `&Variable`, ...), so every handle borrows from the snapshot and nothing
//! is cloned while walking it.
//!
//! [`debugger`]: crate::debugger
//! [`value`]: crate::value

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::debugger::{Debugger, Frame, Process, Target, Thread};
use crate::error::{OffsetsError, OffsetsResult};
use crate::types::Address;
use crate::value::{DebugType, DebugValue};

/// Classification of a [`TypeInfo`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind
{
    /// Builtin or enumeration type (default)
    #[default]
    Scalar,
    /// `struct` or `class`
    Struct,
    /// `union`
    Union,
    /// Pointer or reference
    Pointer,
    /// Fixed-size array
    Array,
    /// Alias for [`TypeInfo::underlying`]
    Typedef,
}

/// Static type of a [`Variable`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeInfo
{
    /// Display name, as a debugger would print it
    pub name: String,
    /// Kind of type
    #[serde(default)]
    pub kind: TypeKind,
    /// Aliased type, for typedefs
    #[serde(default)]
    pub underlying: Option<Box<TypeInfo>>,
}

impl TypeInfo
{
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self
    {
        Self {
            name: name.into(),
            kind,
            underlying: None,
        }
    }

    /// A builtin type such as `int`
    pub fn scalar(name: impl Into<String>) -> Self
    {
        Self::with_kind(name, TypeKind::Scalar)
    }

    /// A `struct` type
    pub fn structure(name: impl Into<String>) -> Self
    {
        Self::with_kind(name, TypeKind::Struct)
    }

    /// A `union` type
    pub fn union(name: impl Into<String>) -> Self
    {
        Self::with_kind(name, TypeKind::Union)
    }

    /// A pointer type such as `char *`
    pub fn pointer(name: impl Into<String>) -> Self
    {
        Self::with_kind(name, TypeKind::Pointer)
    }

    /// An array type such as `int [3]`
    pub fn array(name: impl Into<String>) -> Self
    {
        Self::with_kind(name, TypeKind::Array)
    }

    /// A typedef aliasing `underlying`
    pub fn typedef(name: impl Into<String>, underlying: TypeInfo) -> Self
    {
        Self {
            name: name.into(),
            kind: TypeKind::Typedef,
            underlying: Some(Box::new(underlying)),
        }
    }

    /// The type left once every typedef layer is peeled off
    ///
    /// A typedef without an underlying type is its own canonical type.
    pub fn canonical(&self) -> &TypeInfo
    {
        let mut ty = self;
        while ty.kind == TypeKind::Typedef {
            match ty.underlying.as_deref() {
                Some(underlying) => ty = underlying,
                None => break,
            }
        }
        ty
    }
}

impl<'a> DebugType for &'a TypeInfo
{
    fn display_name(&self) -> String
    {
        self.name.clone()
    }

    fn is_typedef(&self) -> bool
    {
        self.kind == TypeKind::Typedef
    }

    fn is_array(&self) -> bool
    {
        self.canonical().kind == TypeKind::Array
    }

    fn underlying_type(&self) -> Option<Self>
    {
        let this: &'a TypeInfo = *self;
        if this.kind == TypeKind::Typedef {
            this.underlying.as_deref()
        } else {
            None
        }
    }
}

/// A named, typed value and the values nested inside it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variable
{
    /// Variable, field or element name
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    /// Memory location; absent for register-only values
    #[serde(default)]
    pub address: Option<Address>,
    /// Fields or elements, in declaration order
    #[serde(default)]
    pub children: Vec<Variable>,
}

impl Variable
{
    /// A value stored at `address`, with no children
    pub fn new(name: impl Into<String>, ty: TypeInfo, address: u64) -> Self
    {
        Self {
            name: name.into(),
            ty,
            address: Some(Address::new(address)),
            children: Vec::new(),
        }
    }

    /// A value with no memory location
    pub fn in_register(name: impl Into<String>, ty: TypeInfo) -> Self
    {
        Self {
            name: name.into(),
            ty,
            address: None,
            children: Vec::new(),
        }
    }

    /// Replace this value's children
    #[must_use]
    pub fn with_children(mut self, children: Vec<Variable>) -> Self
    {
        self.children = children;
        self
    }
}

impl<'a> DebugValue for &'a Variable
{
    type Type = &'a TypeInfo;

    fn name(&self) -> String
    {
        self.name.clone()
    }

    fn value_type(&self) -> Self::Type
    {
        let this: &'a Variable = *self;
        &this.ty
    }

    fn address(&self) -> Option<Address>
    {
        self.address
    }

    fn child_count(&self) -> usize
    {
        self.children.len()
    }

    fn child_at_index(&self, index: usize) -> Option<Self>
    {
        let this: &'a Variable = *self;
        this.children.get(index)
    }
}

/// A stack frame and the variables visible in it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrameSnapshot
{
    /// Function the frame belongs to
    #[serde(default)]
    pub function: Option<String>,
    /// Variables in scope, in the order the debugger lists them
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl FrameSnapshot
{
    /// An empty frame of `function`
    pub fn new(function: impl Into<String>) -> Self
    {
        Self {
            function: Some(function.into()),
            variables: Vec::new(),
        }
    }

    /// Add a variable to this frame
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self
    {
        self.variables.push(variable);
        self
    }
}

impl<'a> Frame for &'a FrameSnapshot
{
    type Value = &'a Variable;

    fn is_valid(&self) -> bool
    {
        true
    }

    fn function_name(&self) -> Option<String>
    {
        self.function.clone()
    }

    fn find_variable(&self, name: &str) -> Option<Self::Value>
    {
        let this: &'a FrameSnapshot = *self;
        this.variables.iter().find(|v| v.name == name)
    }
}

/// A thread and its call stack, innermost frame first
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThreadSnapshot
{
    /// Host thread id
    #[serde(default)]
    pub id: u64,
    /// Call stack
    #[serde(default)]
    pub frames: Vec<FrameSnapshot>,
    /// Index into `frames`; defaults to the innermost frame
    #[serde(default)]
    pub selected_frame: Option<usize>,
}

impl<'a> Thread for &'a ThreadSnapshot
{
    type Frame = &'a FrameSnapshot;

    fn selected_frame(&self) -> Option<Self::Frame>
    {
        let this: &'a ThreadSnapshot = *self;
        this.frames.get(this.selected_frame.unwrap_or(0))
    }
}

/// Execution state of a [`ProcessSnapshot`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState
{
    /// Paused; frames can be inspected
    #[default]
    Stopped,
    /// Executing; no thread is selectable
    Running,
    /// Terminated
    Exited,
}

/// A process of a target
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProcessSnapshot
{
    /// Process id
    #[serde(default)]
    pub pid: u32,
    /// Execution state
    #[serde(default)]
    pub state: ProcessState,
    /// Threads of the process
    #[serde(default)]
    pub threads: Vec<ThreadSnapshot>,
    /// Index into `threads`; defaults to the first thread
    #[serde(default)]
    pub selected_thread: Option<usize>,
}

impl<'a> Process for &'a ProcessSnapshot
{
    type Thread = &'a ThreadSnapshot;

    fn selected_thread(&self) -> Option<Self::Thread>
    {
        let this: &'a ProcessSnapshot = *self;
        if this.state != ProcessState::Stopped {
            return None;
        }
        this.threads.get(this.selected_thread.unwrap_or(0))
    }
}

/// An executable loaded into the debugger
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TargetSnapshot
{
    /// Executable name
    #[serde(default)]
    pub name: String,
    /// Live process, if launched or attached
    #[serde(default)]
    pub process: Option<ProcessSnapshot>,
}

impl<'a> Target for &'a TargetSnapshot
{
    type Process = &'a ProcessSnapshot;

    fn process(&self) -> Option<Self::Process>
    {
        let this: &'a TargetSnapshot = *self;
        this.process.as_ref()
    }
}

/// A whole debugger session
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionSnapshot
{
    /// Loaded targets
    #[serde(default)]
    pub targets: Vec<TargetSnapshot>,
    /// Index into `targets`; defaults to the first target
    #[serde(default)]
    pub selected_target: Option<usize>,
}

impl SessionSnapshot
{
    /// A session with one target, one process in `state`, one thread and
    /// one frame
    pub fn single_frame(state: ProcessState, frame: FrameSnapshot) -> Self
    {
        let thread = ThreadSnapshot {
            id: 1,
            frames: vec![frame],
            selected_frame: None,
        };
        let process = ProcessSnapshot {
            pid: 1,
            state,
            threads: vec![thread],
            selected_thread: None,
        };
        Self {
            targets: vec![TargetSnapshot {
                name: "a.out".to_string(),
                process: Some(process),
            }],
            selected_target: None,
        }
    }

    /// Decode and validate a session from JSON text
    ///
    /// ## Errors
    ///
    /// - `Json`: the text is not a valid snapshot document
    /// - `Snapshot`: a selection index is out of range
    pub fn from_json(text: &str) -> OffsetsResult<Self>
    {
        let session: SessionSnapshot = serde_json::from_str(text)?;
        session.validate()?;
        Ok(session)
    }

    /// Read, decode and validate a session from a JSON file
    ///
    /// ## Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`SessionSnapshot::from_json`].
    pub fn load(path: impl AsRef<Path>) -> OffsetsResult<Self>
    {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading session snapshot");
        let session = Self::from_json(&fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            targets = session.targets.len(),
            "loaded session snapshot"
        );
        Ok(session)
    }

    /// Check that every explicit selection index points at an existing entry
    ///
    /// ## Errors
    ///
    /// Returns `Snapshot` naming the first out-of-range index.
    pub fn validate(&self) -> OffsetsResult<()>
    {
        check_index("selected_target", self.selected_target, self.targets.len())?;
        for target in &self.targets {
            let Some(process) = &target.process else {
                continue;
            };
            check_index("selected_thread", process.selected_thread, process.threads.len())?;
            for thread in &process.threads {
                check_index("selected_frame", thread.selected_frame, thread.frames.len())?;
            }
        }
        Ok(())
    }
}

fn check_index(field: &str, index: Option<usize>, len: usize) -> OffsetsResult<()>
{
    match index {
        Some(index) if index >= len => Err(OffsetsError::Snapshot(format!(
            "{field} is {index} but only {len} entries exist"
        ))),
        _ => Ok(()),
    }
}

impl<'a> Debugger for &'a SessionSnapshot
{
    type Target = &'a TargetSnapshot;

    fn selected_target(&self) -> Option<Self::Target>
    {
        let this: &'a SessionSnapshot = *self;
        this.targets.get(this.selected_target.unwrap_or(0))
    }
}
