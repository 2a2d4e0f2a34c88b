use crate::arch::x86::{Context, TrapFrame};
use crate::file::{File, INode};
use crate::param::{NOFILE, NSIG};
use crate::proc::signal::SigHandler;
use crate::vm::Pagetable;
use core::ptr::null_mut;

/// §3 "Task -- state": drives every scheduling decision.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    Unused,
    Embryo,
    Sleeping,
    Runnable,
    Running,
    Zombie,
}

pub const MAX_NAME: usize = 16;

/// A single schedulable entity: a process, or a thread sharing a process's
/// address space. One table slot holds exactly one `Task` (§3).
#[repr(C)]
pub struct Task {
    pub state: TaskState,
    pub pid: i32,
    /// Index of the parent's slot in the task table, or `None` for init.
    /// Modeled as a table index rather than a pointer per §9's design note.
    pub parent: Option<usize>,

    pub page_directory: Pagetable,
    pub size: usize,
    pub kernel_stack: *mut u8,
    pub trap_frame: *mut TrapFrame,
    /// Carved out of the top of `kernel_stack` by `allocate_task`, below the
    /// trap frame and the trap-return address word (§3, §4.1).
    pub context: *mut Context,

    /// Non-null iff `state == Sleeping` (§3 invariant 5).
    pub wait_channel: usize,
    pub killed: bool,

    pub open_files: [*mut File; NOFILE],
    pub cwd: *mut INode,
    name_buf: [u8; MAX_NAME],
    name_len: usize,

    pub handlers: [SigHandler; NSIG],
    pub restorer_addr: usize,

    pub is_cow: bool,
    pub is_thread: bool,
    pub thread_stack: usize,
    pub thread_return_value: usize,
}

impl Task {
    pub const fn unused() -> Task {
        Task {
            state: TaskState::Unused,
            pid: 0,
            parent: None,
            page_directory: null_mut(),
            size: 0,
            kernel_stack: null_mut(),
            trap_frame: null_mut(),
            context: null_mut(),
            wait_channel: 0,
            killed: false,
            open_files: [null_mut(); NOFILE],
            cwd: null_mut(),
            name_buf: [0; MAX_NAME],
            name_len: 0,
            handlers: [SigHandler::Default; NSIG],
            restorer_addr: 0,
            is_cow: false,
            is_thread: false,
            thread_stack: 0,
            thread_return_value: 0,
        }
    }

    pub fn name(&self) -> &str {
        core::str::from_utf8(&self.name_buf[..self.name_len]).unwrap_or("")
    }

    pub fn set_name(&mut self, name: &str) {
        let bytes = name.as_bytes();
        let len = bytes.len().min(MAX_NAME);
        self.name_buf[..len].copy_from_slice(&bytes[..len]);
        self.name_len = len;
    }

    /// Clear every field that identifies this slot as belonging to a
    /// particular task, the common tail of `wait`/`join`'s reap path (§4.9,
    /// §4.10) short of the resource frees those callers do first.
    pub fn clear_identity(&mut self) {
        self.pid = 0;
        self.parent = None;
        self.name_len = 0;
        self.killed = false;
        self.wait_channel = 0;
        self.is_cow = false;
        self.is_thread = false;
        self.thread_stack = 0;
        self.thread_return_value = 0;
        self.page_directory = null_mut();
        self.kernel_stack = null_mut();
        self.trap_frame = null_mut();
        self.context = null_mut();
        self.size = 0;
        self.state = TaskState::Unused;
    }
}

// SAFETY: every `Task` lives in the global `TASK_TABLE` array and is only ever
// mutated while `TABLE_LOCK` is held (or, for the fields §3 marks private to
// the running task, only by the CPU currently running it).
unsafe impl Send for Task {}
unsafe impl Sync for Task {}
