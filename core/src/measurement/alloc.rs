//! Thread-scoped allocation metering
//!
//! A [`GlobalAlloc`] wrapper around the system allocator keeping per-thread
//! tallies of allocated bytes and allocation events. The measurement core
//! reads these tallies as deltas strictly bracketing each measured
//! `execute` call; race workers read their own thread's tally, so
//! competitors never observe each other's allocations.
//!
//! There is no garbage collector to quiesce on this runtime; [`quiesce`]
//! documents that contract explicitly and is kept at every call site where
//! a managed runtime would force a collection.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static ALLOCATED_BYTES: Cell<u64> = const { Cell::new(0) };
    static ALLOCATION_COUNT: Cell<u64> = const { Cell::new(0) };
}

/// System allocator wrapper with per-thread accounting.
pub struct MeteredAllocator;

#[global_allocator]
static ALLOCATOR: MeteredAllocator = MeteredAllocator;

// Tally accesses use try_with: allocations during thread-local teardown are
// passed through unmetered rather than aborting the thread.
unsafe impl GlobalAlloc for MeteredAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let _ = ALLOCATED_BYTES.try_with(|b| b.set(b.get() + layout.size() as u64));
            let _ = ALLOCATION_COUNT.try_with(|c| c.set(c.get() + 1));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() && new_size > layout.size() {
            let grown = (new_size - layout.size()) as u64;
            let _ = ALLOCATED_BYTES.try_with(|b| b.set(b.get() + grown));
            let _ = ALLOCATION_COUNT.try_with(|c| c.set(c.get() + 1));
        }
        new_ptr
    }
}

/// Total bytes allocated on the current thread since it started.
/// Monotonic; callers take deltas around the region of interest.
pub fn thread_allocated_bytes() -> u64 {
    ALLOCATED_BYTES.with(Cell::get)
}

/// Total allocation events on the current thread since it started.
pub fn thread_allocation_count() -> u64 {
    ALLOCATION_COUNT.with(Cell::get)
}

/// Quiesces background collection noise before a measured region.
///
/// A no-op contract on this runtime: Rust has no collector to force, so
/// the pre-measurement state is already quiescent. Kept as an explicit
/// call so the measurement discipline reads the same as on runtimes where
/// it is not a no-op.
#[inline]
pub fn quiesce() {}
