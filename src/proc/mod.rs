//! The process/thread management core (`SPEC_FULL.md` §§3-4): the task table,
//! the allocator, the scheduler and its context-switch half, sleep/wakeup,
//! fork/cow_fork, exit/wait/kill, thread clone/join/texit, and signal
//! delivery. Organized the way the teacher codebase splits its own `proc`
//! module into `cpu`/`context`/`process`/`scheduler`/`trapframe` files, with
//! the per-task state in `task`, per-CPU state in `cpu`, typed failures in
//! `error`, and signal handling broken out into its own file since it is a
//! large, mostly self-contained concern (§4.11).

pub mod cpu;
pub mod error;
pub mod signal;
pub mod table;
pub mod task;

pub use cpu::Cpu;
pub use error::TaskError;
pub use signal::SigHandler;
pub use table::{
    allocate_task, clone_task, cow_fork, cow_on, current_task, exit, fork, grow, join, kill,
    mprotect, procdump, scheduler, sched, signal_deliver, signal_register, sleep, texit,
    user_init, wait, wakeup, yield_task, TABLE_LOCK,
};
pub use task::{Task, TaskState};
