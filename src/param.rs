/// Maximum number of tasks (processes and threads together) the table can hold.
pub const NPROC: usize = 64;
/// Maximum number of CPUs
pub const NCPU: usize = 8;
/// Maximum number of open files per task
pub const NOFILE: usize = 16;
/// Maximum number of open files per system
pub const NFILE: usize = 100;
/// Maximum number of active inodes
pub const NINODE: usize = 50;
/// Maximum major device number
pub const NDEV: usize = 10;
/// Device number of file system root disk
pub const ROOTDEV: usize = 1;
/// Number of signal numbers a task's handler table covers
pub const NSIG: usize = 32;
/// Size in bytes of one virtual-memory page
pub const PAGE_SIZE: usize = 4096;
/// First virtual address reserved for the kernel; a page fault at or above this
/// address is never a user-space CoW fault.
pub const KERNEL_BASE: usize = 0x8000_0000;
