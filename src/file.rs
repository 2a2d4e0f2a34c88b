//! Reference-counted file and inode handles. The filesystem, inode cache, and
//! open-file table that actually back these types are excluded from this
//! crate (`SPEC_FULL.md` §1); `Task::open_files`/`Task::cwd` only ever store
//! pointers handed back by `file_dup`/`inode_dup` and hand them to
//! `file_close`/`inode_put` on exit, the same contract shape the teacher
//! codebase's `fs::file`/`fs::inode` modules declare for their own (likewise
//! unimplemented-in-that-crate) backing store.

use core::ffi::c_void;

#[repr(C)]
pub struct File {
    _private: [u8; 0],
}

#[repr(C)]
pub struct INode {
    _private: [u8; 0],
}

extern "C" {
    /// Increment `file`'s reference count and return it.
    pub fn file_dup(file: *mut File) -> *mut File;

    /// Decrement `file`'s reference count, releasing its backing resource
    /// when it reaches zero.
    pub fn file_close(file: *mut File);

    /// Increment `inode`'s reference count and return it.
    pub fn inode_dup(inode: *mut INode) -> *mut INode;

    /// Decrement `inode`'s reference count, writing it back and freeing the
    /// in-memory copy when it reaches zero.
    pub fn inode_put(inode: *mut INode);

    /// Resolve `path` to an inode, or null if it does not exist.
    pub fn namei(path: *const u8) -> *mut INode;

    /// Begin a filesystem operation that may write multiple blocks
    /// atomically with respect to a crash.
    pub fn begin_op();

    /// End the filesystem operation started by `begin_op`.
    pub fn end_op();

    /// One-time inode-cache initialization; must run in a task context
    /// because it may sleep (see `proc::table::fork_return`).
    pub fn iinit();

    /// One-time on-disk log initialization for `dev`; same context
    /// requirement as `iinit`.
    pub fn initlog(dev: usize);
}

/// Opaque wait channel. Any stable address can serve as one (§4.6); this
/// alias exists only so call sites read as "a channel", not "a pointer".
pub type Channel = *const c_void;
