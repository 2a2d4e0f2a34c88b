//! The syscall-ABI-facing wrapper layer (`SPEC_FULL.md` §6): one `sys_*`
//! function per row of the external-interfaces table, each collapsing a
//! `Result<T, TaskError>` from `proc::table` down to the raw `-1`-on-error
//! convention a syscall return register carries. Mirrors the teacher
//! codebase's `sysproc.rs`, minus the argument-marshalling calls
//! (`argint`/`argaddr`) that file makes before reaching the same `proc::`
//! entry points — that marshalling belongs to the excluded syscall-dispatch
//! layer (`SPEC_FULL.md` §1), so every wrapper here takes its arguments
//! already decoded.

use crate::proc::signal::SigHandler;
use crate::proc::table;
use crate::vm::Prot;

/// child pid in parent, 0 in child, −1 on failure.
#[no_mangle]
pub unsafe extern "C" fn sys_fork() -> i32 {
    table::fork().unwrap_or_else(|e| e.to_abi())
}

/// Same contract as `sys_fork`.
#[no_mangle]
pub unsafe extern "C" fn sys_cow_fork() -> i32 {
    table::cow_fork().unwrap_or_else(|e| e.to_abi())
}

/// Never returns.
#[no_mangle]
pub unsafe extern "C" fn sys_exit() -> ! {
    table::exit()
}

/// Child pid or −1.
#[no_mangle]
pub unsafe extern "C" fn sys_wait() -> i32 {
    table::wait().unwrap_or_else(|e| e.to_abi())
}

/// 0 or −1.
#[no_mangle]
pub unsafe extern "C" fn sys_kill(pid: i32) -> i32 {
    table::kill(pid).map(|()| 0).unwrap_or_else(|e| e.to_abi())
}

/// Old size, or −1 on failure.
#[no_mangle]
pub unsafe extern "C" fn sys_grow(n: isize) -> isize {
    table::grow(n)
        .map(|old| old as isize)
        .unwrap_or(-1)
}

/// Always 0.
#[no_mangle]
pub unsafe extern "C" fn sys_yield() -> i32 {
    table::yield_task();
    0
}

/// Child pid, or −1.
#[no_mangle]
pub unsafe extern "C" fn sys_clone(entry: usize, arg: usize, stack: usize) -> i32 {
    table::clone_task(entry, arg, stack).unwrap_or_else(|e| e.to_abi())
}

/// 0 or −1.
#[no_mangle]
pub unsafe extern "C" fn sys_join(pid: i32, out_stack: &mut usize, out_retval: &mut usize) -> i32 {
    table::join(pid, out_stack, out_retval)
        .map(|()| 0)
        .unwrap_or_else(|e| e.to_abi())
}

/// Never returns to the caller if it is a thread; a silent no-op otherwise.
#[no_mangle]
pub unsafe extern "C" fn sys_texit(retval: usize) {
    table::texit(retval)
}

/// 0 or −1.
#[no_mangle]
pub unsafe extern "C" fn sys_mprotect(addr: usize, len: usize, prot: Prot) -> i32 {
    table::mprotect(addr, len, prot)
        .map(|()| 0)
        .unwrap_or_else(|e| e.to_abi())
}

/// Previous handler (ABI-encoded) or −1.
#[no_mangle]
pub unsafe extern "C" fn sys_signal_register(signum: usize, handler_abi: isize) -> isize {
    table::signal_register(signum, SigHandler::from_abi(handler_abi))
        .map(SigHandler::to_abi)
        .unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::error::TaskError;

    #[test]
    fn grow_failure_collapses_to_negative_one() {
        let result: Result<usize, TaskError> = Err(TaskError::OutOfMemory);
        let abi = result.map(|old| old as isize).unwrap_or(-1);
        assert_eq!(abi, -1);
    }

    #[test]
    fn signal_register_abi_round_trips_through_from_abi_to_abi() {
        let handler = SigHandler::from_abi(0x4000);
        assert_eq!(handler.to_abi(), 0x4000);
    }
}
