use crate::proc::cpu::{cpu_id, pop_off, push_off};
use core::sync::atomic::{AtomicBool, AtomicIsize, Ordering};

/// No CPU holds the lock.
const NO_HOLDER: isize = -1;

/// A spinlock that disables interrupts on its CPU for as long as it is held,
/// nesting safely with other held locks via `push_off`/`pop_off` (§5:
/// "Interrupts"). The task table's single coarse lock (`table::TABLE_LOCK`) is
/// one instance of this type; nothing about it is table-specific.
#[repr(C)]
pub struct Spinlock {
    locked: AtomicBool,
    /// Index of the CPU currently holding the lock, or `NO_HOLDER`. Lets
    /// `held_by_current_cpu` distinguish "locked by someone" from "locked by
    /// me", the way `original_source/proc.c`'s spinlock tracks its owning
    /// `cpu` pointer for `holding()`.
    holder: AtomicIsize,
    name: &'static str,
}

impl Spinlock {
    pub const fn new(name: &'static str) -> Spinlock {
        Spinlock {
            locked: AtomicBool::new(false),
            holder: AtomicIsize::new(NO_HOLDER),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Acquire without producing a `SpinlockGuard`. Used by call sites (like
    /// `sleep`) that must hold the lock across a context switch, which a
    /// stack-scoped guard cannot express.
    pub unsafe fn acquire(&self) {
        push_off();
        while self.locked.swap(true, Ordering::Acquire) {
            core::hint::spin_loop();
        }
        self.holder.store(cpu_id() as isize, Ordering::Relaxed);
    }

    /// Inverse of `acquire`.
    pub unsafe fn release(&self) {
        self.holder.store(NO_HOLDER, Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
        pop_off();
    }

    pub fn lock(&self) -> SpinlockGuard<'_> {
        unsafe { self.acquire() };
        SpinlockGuard { lock: self }
    }

    /// True iff this CPU is the one currently holding the lock. Must be
    /// called with interrupts disabled (the same precondition `cpu_id`
    /// carries), which every caller in `proc::table` satisfies by virtue of
    /// already holding some lock when it asks.
    pub unsafe fn held_by_current_cpu(&self) -> bool {
        self.locked.load(Ordering::Relaxed) && self.holder.load(Ordering::Relaxed) == cpu_id() as isize
    }
}

pub struct SpinlockGuard<'l> {
    lock: &'l Spinlock,
}

impl<'l> Drop for SpinlockGuard<'l> {
    fn drop(&mut self) {
        unsafe { self.lock.release() }
    }
}

impl<'l> SpinlockGuard<'l> {
    /// Release the lock without running `Drop`, for call sites (`sleep`) that
    /// manage the acquire/release pairing by hand around a context switch.
    pub fn forget(self) {
        core::mem::forget(self);
    }
}
