#![no_main]
#![no_std]
#![allow(dead_code)]
#![allow(clippy::missing_safety_doc)]

extern crate core;

extern "C" {
    fn print(message: *const c_char);
    fn panic(panic_message: *const c_char) -> !;
}

pub mod arch;
pub mod file;
pub(crate) mod param;
pub mod proc;
pub mod sync;
pub mod syscall;
pub mod vm;

use core::ffi::{c_char, CStr};

pub use proc::*;
pub use sync::spinlock::{Spinlock, SpinlockGuard};

/// Entered once per CPU by the (excluded) boot assembly, after it has set up a
/// stack and the kernel page table. CPU 0 builds the init task; every CPU then
/// falls into the scheduler and never returns (§4.4).
#[no_mangle]
pub extern "C" fn rust_main() -> ! {
    unsafe {
        if arch::x86::cpu_id() == 0 {
            print(
                CStr::from_bytes_with_nul(b"taskcore: starting\n\0")
                    .unwrap()
                    .as_ptr(),
            );
            proc::user_init();
        }
        proc::scheduler()
    }
}

#[panic_handler]
unsafe fn panic_wrapper(panic_info: &core::panic::PanicInfo) -> ! {
    log::error!("panic: {}", panic_info);
    panic(
        CStr::from_bytes_with_nul(b"panic from rust\0")
            .unwrap_or_default()
            .as_ptr(),
    )
}
