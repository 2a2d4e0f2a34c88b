/// Typed failure reasons for task-management operations.
///
/// Internal call sites propagate `Result<T, TaskError>`; only the outermost
/// syscall-ABI-facing wrappers (§6) collapse these down to the raw `-1`
/// sentinel the platform convention expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskError {
    /// No UNUSED slot was available in the task table.
    TableFull,
    /// A physical-page or virtual-memory allocation failed.
    OutOfMemory,
    /// The caller has no children to wait/join on.
    NoChildren,
    /// No task in the table matches the requested pid.
    NoSuchTask,
    /// The caller was not the parent of the task named by a `join`/`wait`.
    NotOurChild,
    /// The caller was killed while blocked.
    Killed,
    /// `mprotect` was given a non-page-aligned address.
    Unaligned,
    /// The VM layer refused a protection/allocation change partway through.
    PageFault,
    /// `signal_register` was given a signal number outside `[0, NSIG)`.
    InvalidSignal,
}

impl TaskError {
    /// Collapse to the `-1`-on-error syscall-ABI convention (§6).
    pub const fn to_abi(self) -> i32 {
        -1
    }
}
