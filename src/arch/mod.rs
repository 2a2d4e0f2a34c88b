//! Architecture-specific pieces the task-management core needs but does not
//! implement: register accessors, the context-switch primitive, and the saved
//! register layouts for kernel and user execution contexts.
//!
//! Only one architecture module is compiled in, selected by a cargo feature, the
//! way the teacher codebase gates `qemu-riscv64` vs `milk-v`.

#[cfg(feature = "x86")]
pub mod x86;

#[cfg(feature = "x86")]
pub use x86 as current;
