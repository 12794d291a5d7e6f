//! # Debugger Session Traits
//!
//! The session objects a command navigates before it reaches a value:
//! debugger → target → process → thread → frame.
//!
//! Each host implements these on its own handle types. The only consumer in
//! this crate is [`selected_frame`], which walks the chain the same way for
//! every host: the selected target, its process, that process's selected
//! thread, and the thread's selected frame.
//!
//! ## Why one trait per level?
//!
//! Hosts differ in which link can be missing. A debugger with no target
//! loaded, a target that was never launched, a process that is still
//! running: each reports `None` at a different level, and all of them mean
//! the same thing to a command that needs a frame.

use crate::value::DebugValue;

/// Entry point to a host debugger session
pub trait Debugger
{
    /// Target handle type
    type Target: Target;

    /// The target the user currently has selected
    fn selected_target(&self) -> Option<Self::Target>;
}

/// A debuggee program loaded into the debugger
pub trait Target
{
    /// Process handle type
    type Process: Process;

    /// The live process for this target, if it has been launched or attached
    fn process(&self) -> Option<Self::Process>;
}

/// A running or stopped instance of a target
pub trait Process
{
    /// Thread handle type
    type Thread: Thread;

    /// The selected thread
    ///
    /// Hosts return `None` while the process is running, because threads
    /// have no stable selection then.
    fn selected_thread(&self) -> Option<Self::Thread>;
}

/// A thread of a stopped process
pub trait Thread
{
    /// Frame handle type
    type Frame: Frame;

    /// The frame the user currently has selected on this thread
    fn selected_frame(&self) -> Option<Self::Frame>;
}

/// An activation record of a function in a paused process
pub trait Frame
{
    /// Value handle type for the frame's variables
    type Value: DebugValue;

    /// Whether the host considers this frame usable
    fn is_valid(&self) -> bool;

    /// Name of the function this frame belongs to, if known
    fn function_name(&self) -> Option<String>
    {
        None
    }

    /// Look up a variable visible in this frame by name
    fn find_variable(&self, name: &str) -> Option<Self::Value>;
}

/// Frame handle type reachable from a [`Debugger`]
pub type FrameOf<D> =
    <<<<D as Debugger>::Target as Target>::Process as Process>::Thread as Thread>::Frame;

/// Resolve the selected target → process → thread → frame
///
/// Returns `None` if any link is missing or the frame the host hands back
/// is not valid.
///
/// ## Example
///
/// ```rust
/// use offsets_core::debugger::{selected_frame, Frame};
/// use offsets_core::snapshot::{FrameSnapshot, ProcessState, SessionSnapshot};
///
/// let stopped = SessionSnapshot::single_frame(ProcessState::Stopped, FrameSnapshot::new("main"));
/// assert!(selected_frame(&&stopped).is_some_and(|f| f.is_valid()));
///
/// let running = SessionSnapshot::single_frame(ProcessState::Running, FrameSnapshot::new("main"));
/// assert!(selected_frame(&&running).is_none());
/// ```
pub fn selected_frame<D: Debugger>(debugger: &D) -> Option<FrameOf<D>>
{
    let frame = debugger
        .selected_target()?
        .process()?
        .selected_thread()?
        .selected_frame()?;

    if frame.is_valid() {
        Some(frame)
    } else {
        None
    }
}
