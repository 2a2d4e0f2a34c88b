//! Contracts consumed from the virtual-memory layer. None of this is
//! implemented here (`SPEC_FULL.md` §1) — the page table format, the physical
//! allocator, and copy-on-write bookkeeping all live outside this crate. Every
//! function below is declared the way the teacher codebase declares its own
//! excluded filesystem primitives (`fs::inode::{ialloc, iupdate, ...}`): as an
//! `extern "C"` contract the core calls into but never defines.

use core::ffi::c_void;

/// Opaque page-table root. Two tasks with the same `Pagetable` value share an
/// address space (threads, or two tasks transiently linked by CoW).
pub type Pagetable = *mut c_void;

/// Page-protection bits understood by `apply_prot`/`get_prot`. Kept abstract;
/// the concrete encoding belongs to the (excluded) page-table format.
pub type Prot = u32;

pub const PROT_READ: Prot = 1 << 0;
pub const PROT_WRITE: Prot = 1 << 1;
pub const PROT_EXEC: Prot = 1 << 2;

extern "C" {
    /// Allocate one physical page and return its kernel virtual address, or
    /// null if none is free. Backs `allocate_task`'s kernel-stack allocation.
    pub fn alloc_page() -> *mut u8;

    /// Return a page previously handed out by `alloc_page` to the free list.
    pub fn free_page(page: *mut u8);

    /// Build the kernel-only page table installed while no task is running.
    pub fn setup_kernel_vm() -> Pagetable;

    /// Create a fresh page table containing only the trampoline/trapframe
    /// mappings every task needs, with no user memory yet.
    pub fn init_uvm(pagetable: Pagetable, image: *const u8, image_size: usize);

    /// Grow `pagetable`'s user memory from `old_size` to `new_size` bytes.
    /// Returns the new size, or 0 on failure.
    pub fn alloc_uvm(pagetable: Pagetable, old_size: usize, new_size: usize) -> usize;

    /// Shrink `pagetable`'s user memory from `old_size` to `new_size` bytes.
    /// Returns the new size.
    pub fn dealloc_uvm(pagetable: Pagetable, old_size: usize, new_size: usize) -> usize;

    /// Deep-copy `size` bytes of user memory from `src` into a freshly
    /// allocated page table. Returns a null pagetable on failure.
    pub fn copy_uvm(src: Pagetable, size: usize) -> Pagetable;

    /// Like `copy_uvm`, but the child's page-table entries alias the parent's
    /// physical frames, both marked read-only, instead of copying the frames.
    pub fn cow_copy_uvm(src: Pagetable, size: usize) -> Pagetable;

    /// Privately copy the physical frame backing `fault_addr` in `pagetable`,
    /// drop the original frame's share count, and remap the copy writable.
    /// Returns 0 on success, nonzero on failure (e.g. out of memory).
    pub fn cow_copy_and_free_page(pagetable: Pagetable, fault_addr: usize) -> i32;

    /// Apply `prot` to every page-table entry covering `[addr, addr + len)`.
    /// Returns 0 on success, nonzero if any page in range cannot accept it.
    pub fn apply_prot(pagetable: Pagetable, addr: usize, len: usize, prot: Prot) -> i32;

    /// Read back the protection bits currently applied to the page containing
    /// `addr`.
    pub fn get_prot(pagetable: Pagetable, addr: usize) -> Prot;

    /// Install `pagetable` as the current CPU's user address space.
    pub fn switch_uvm(pagetable: Pagetable);

    /// Install the kernel-only page table on the current CPU (used while no
    /// task is running, i.e. inside `scheduler`).
    pub fn switch_kvm();

    /// Free `pagetable` and every physical frame it exclusively owns.
    pub fn free_vm(pagetable: Pagetable, size: usize);

    /// Copy `len` bytes from the kernel buffer `src` to user virtual address
    /// `dest_addr` in `pagetable`. Returns 0 on success, nonzero on failure.
    /// Used by `signal::deliver` to write the synthetic signal frame onto a
    /// task's user stack.
    pub fn copy_out(pagetable: Pagetable, dest_addr: usize, src: *const u8, len: usize) -> i32;

    /// Copy `len` bytes from user virtual address `src_addr` in `pagetable`
    /// into the kernel buffer `dest`. Returns 0 on success, nonzero on
    /// failure.
    pub fn copy_in(pagetable: Pagetable, dest: *mut u8, src_addr: usize, len: usize) -> i32;

    /// Linker-provided start of the embedded initial user program image (the
    /// `_binary_initcode_start`-equivalent blob `table::user_init` maps into
    /// the first task's address space).
    pub static INITCODE_START: u8;
    /// Linker-provided byte length of that image.
    pub static INITCODE_SIZE: usize;
}
