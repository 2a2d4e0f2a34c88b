//! x86 register accessors and the saved-context/trap-frame layouts.
//!
//! The accessors below wrap single instructions and the context-switch
//! primitive (`swtch`) is pure assembly; both are out of scope for this crate
//! (see `SPEC_FULL.md` §1's excluded-collaborators list) and are declared here as
//! an `extern "C"` contract, the same pattern the teacher codebase uses for its
//! own `swtch`/register-accessor primitives in `riscv::asm`.

pub mod context;
pub mod trapframe;

pub use context::Context;
pub use trapframe::TrapFrame;

/// Interrupt-enable bit in EFLAGS.
pub const FL_IF: u32 = 0x0000_0200;

/// User code segment selector: `(SEG_UCODE << 3) | DPL_USER`.
pub const USER_CS: u16 = 0x1B;
/// User data segment selector: `(SEG_UDATA << 3) | DPL_USER`. Also used for
/// `es`/`ss`, which always match `ds` in a freshly built user trap frame.
pub const USER_DS: u16 = 0x23;

extern "C" {
    /// Save the current kernel register set into `*from`, then load the register
    /// set at `*to` and resume execution there. Implemented in assembly; this
    /// crate only ever calls it with both pointers aliasing a `Context` owned by
    /// a task slot or a per-CPU scheduler context, and never while any Rust
    /// reference to either `Context` is live.
    pub fn swtch(from: *mut Context, to: *mut Context);

    /// Address of the trap-return stub (`trapret`-equivalent) that a fresh
    /// task's initial kernel stack word points at.
    pub static trap_return_stub: u8;

    /// Read CR2, the last faulting virtual address recorded by the MMU.
    pub fn read_fault_address() -> usize;

    /// Read EFLAGS.
    pub fn read_eflags() -> u32;

    /// Disable interrupts on the current CPU (`cli`). Bare, unmatched: callers
    /// needing a nesting-safe version use `cpu::push_off`/`cpu::pop_off`.
    pub fn intr_off();

    /// Enable interrupts on the current CPU (`sti`).
    pub fn intr_on();

    /// True if interrupts are currently enabled on the current CPU.
    pub fn intr_get() -> bool;

    /// Index of the CPU executing this code. Must be called with interrupts
    /// disabled, to avoid a race with the task being moved to a different CPU.
    pub fn cpu_id() -> usize;
}
