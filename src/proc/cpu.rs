use crate::arch::x86::{intr_get, intr_off, intr_on, Context};
use crate::param::NCPU;
use crate::proc::task::Task;
use core::ptr::{addr_of_mut, null_mut};

/// Per-CPU state (§3: "Per-CPU data").
#[repr(C)]
pub struct Cpu {
    /// The task running on this CPU, or null.
    pub task: *mut Task,
    /// `swtch` lands here to enter `scheduler`.
    pub scheduler_context: Context,
    /// Depth of `push_off` nesting (`ncli`).
    pub ncli: i32,
    /// Were interrupts enabled before the first `push_off`? (`intena`)
    pub intena: bool,
}

impl Cpu {
    pub const fn new() -> Cpu {
        Cpu {
            task: null_mut(),
            scheduler_context: Context::zeroed(),
            ncli: 0,
            intena: false,
        }
    }
}

impl Default for Cpu {
    fn default() -> Cpu {
        Cpu::new()
    }
}

static mut CPUS: [Cpu; NCPU] = [const { Cpu::new() }; NCPU];

/// Must be called with interrupts disabled, to prevent a race with the task
/// being moved to a different CPU.
pub unsafe fn cpu_id() -> usize {
    crate::arch::x86::cpu_id()
}

/// Return this CPU's `Cpu` struct. Interrupts must be disabled.
pub unsafe fn my_cpu() -> &'static mut Cpu {
    &mut CPUS[cpu_id()]
}

/// Disable interrupts, tracking nesting depth so that `pop_off` restores the
/// pre-`push_off` state rather than unconditionally re-enabling interrupts
/// (§5: "Interrupts").
pub unsafe fn push_off() {
    let enabled_before = intr_get();
    intr_off();

    let cpu = my_cpu();
    if cpu.ncli == 0 {
        cpu.intena = enabled_before;
    }
    cpu.ncli += 1;
}

/// Inverse of `push_off`. Panics if interrupts are already enabled or if
/// called without a matching `push_off` (§7: impossible-invariant violations).
pub unsafe fn pop_off() {
    if intr_get() {
        panic!("pop_off: interruptible");
    }

    let cpu = my_cpu();
    if cpu.ncli < 1 {
        panic!("pop_off: unbalanced");
    }

    cpu.ncli -= 1;
    if cpu.ncli == 0 && cpu.intena {
        intr_on();
    }
}
