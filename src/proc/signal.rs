//! Signal registration and delivery (§4.11).
//!
//! Delivery rewrites a task's trap frame so that, on the next return to user
//! mode, the task lands in its registered handler instead of where it
//! actually trapped from, with a synthetic return address pointing at the
//! task's restorer stub. Signal numbers and the three handler kinds
//! (`Default`/`Ignore`/`Handler`) are grounded in
//! `original_source/proc.c`'s `allocproc` (which seeds `SIGKILL`, `SIGFPE`,
//! `SIGSEGV` to the `-1` "default" sentinel) and `signal_deliver`.

use crate::param::NSIG;
use crate::proc::task::Task;
use crate::vm::{self, Prot};

pub const SIGKILL: usize = 9;
pub const SIGFPE: usize = 8;
pub const SIGSEGV: usize = 11;

/// What a task does when a given signal arrives.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SigHandler {
    /// Run the signal's built-in default action.
    Default,
    /// Silently drop the signal.
    Ignore,
    /// Invoke the user-space function at this address.
    Handler(usize),
}

impl SigHandler {
    /// The sentinel representation crossing the syscall ABI (§3: "the
    /// default (sentinel -1)"). `signal_register`'s return value and argument
    /// both use this encoding at the syscall boundary.
    pub fn to_abi(self) -> isize {
        match self {
            SigHandler::Default => -1,
            SigHandler::Ignore => -2,
            SigHandler::Handler(addr) => addr as isize,
        }
    }

    pub fn from_abi(value: isize) -> SigHandler {
        match value {
            -1 => SigHandler::Default,
            -2 => SigHandler::Ignore,
            addr => SigHandler::Handler(addr as usize),
        }
    }
}

/// Info handed to a `SIGSEGV` handler: the faulting address and the
/// protection bits that rejected the access (§4.11).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct SigInfo {
    pub addr: usize,
    pub prot: Prot,
}

/// Replace `task`'s handler for `signum`, returning the previous one
/// (§4.11), or `None` if `signum` is out of range. `signum` arrives straight
/// from a user syscall argument, so it must be bounds-checked here rather
/// than trusted, the same way `table::kill`/`table::join` reject a
/// non-existent pid instead of indexing blind.
pub fn register(task: &mut Task, signum: usize, handler: SigHandler) -> Option<SigHandler> {
    if signum >= NSIG {
        return None;
    }
    let previous = task.handlers[signum];
    task.handlers[signum] = handler;
    Some(previous)
}

/// Build and write the synthetic signal frame described in §4.11 onto
/// `task`'s user stack, then redirect its trap frame at the handler.
///
/// Must be called from the trap-return path with `task` current and its trap
/// frame holding the register values last seen in user mode. Does nothing if
/// `signum` is out of range or the task's handler for `signum` is `Ignore`;
/// runs the signal's built-in default action if the handler is still
/// `Default`.
pub unsafe fn deliver(task: &mut Task, signum: usize) {
    if signum >= NSIG {
        return;
    }
    let handler = match task.handlers[signum] {
        SigHandler::Ignore => return,
        SigHandler::Default => {
            default_action(task, signum);
            return;
        }
        SigHandler::Handler(addr) => addr,
    };

    let info = match signum {
        SIGSEGV => {
            let addr = crate::arch::x86::read_fault_address();
            let prot = vm::get_prot(task.page_directory, addr);
            SigInfo { addr, prot }
        }
        _ => SigInfo::default(),
    };

    let tf = &mut *task.trap_frame;
    let esp = tf.esp as usize;

    let saved_eip = tf.eip;
    let saved_eax = tf.eax;
    let saved_ecx = tf.ecx;
    let saved_edx = tf.edx;

    write_u32(task.page_directory, esp - 4, saved_eip);
    write_u32(task.page_directory, esp - 8, saved_eax);
    write_u32(task.page_directory, esp - 12, saved_ecx);
    write_u32(task.page_directory, esp - 16, saved_edx);
    write_siginfo(task.page_directory, esp - 24, info);
    write_u32(task.page_directory, esp - 28, signum as u32);
    write_u32(task.page_directory, esp - 32, task.restorer_addr as u32);

    tf.esp = (esp - 32) as u32;
    tf.eip = handler as u32;
}

/// A signal whose handler is still `Default` runs this built-in action.
/// `SIGKILL`, `SIGFPE`, and `SIGSEGV` all terminate the task (§4.11); any
/// other signal number defaults to a no-op so a task that never registered
/// for it is never surprised by one.
unsafe fn default_action(task: &mut Task, signum: usize) {
    match signum {
        SIGKILL | SIGFPE | SIGSEGV => task.killed = true,
        _ => {}
    }
}

unsafe fn write_u32(pagetable: vm::Pagetable, addr: usize, value: u32) {
    let bytes = value.to_ne_bytes();
    vm::copy_out(pagetable, addr, bytes.as_ptr(), bytes.len());
}

unsafe fn write_siginfo(pagetable: vm::Pagetable, addr: usize, info: SigInfo) {
    let bytes = [info.addr.to_ne_bytes(), (info.prot as usize).to_ne_bytes()].concat();
    vm::copy_out(pagetable, addr, bytes.as_ptr(), 8.min(bytes.len()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_round_trips_handler() {
        let mut task = Task::unused();
        let previous = register(&mut task, SIGSEGV, SigHandler::Handler(0x1000));
        assert_eq!(previous, Some(SigHandler::Default));

        let previous2 = register(&mut task, SIGSEGV, SigHandler::Default);
        assert_eq!(previous2, Some(SigHandler::Handler(0x1000)));
        assert_eq!(task.handlers[SIGSEGV], SigHandler::Default);
    }

    #[test]
    fn register_is_idempotent_for_repeated_argument() {
        let mut task = Task::unused();
        register(&mut task, SIGFPE, SigHandler::Ignore);
        let state_after_first = task.handlers[SIGFPE];
        register(&mut task, SIGFPE, SigHandler::Ignore);
        assert_eq!(task.handlers[SIGFPE], state_after_first);
    }

    #[test]
    fn register_rejects_out_of_range_signum() {
        let mut task = Task::unused();
        assert_eq!(register(&mut task, NSIG, SigHandler::Ignore), None);
        assert_eq!(register(&mut task, NSIG + 100, SigHandler::Ignore), None);
    }

    #[test]
    fn deliver_ignores_out_of_range_signum() {
        let mut task = Task::unused();
        unsafe { deliver(&mut task, NSIG) };
    }

    #[test]
    fn abi_round_trip() {
        for h in [
            SigHandler::Default,
            SigHandler::Ignore,
            SigHandler::Handler(0xdead_beef),
        ] {
            assert_eq!(SigHandler::from_abi(h.to_abi()), h);
        }
    }
}
