//! Arena allocation scoped to a compilation unit.
//!
//! Attribute nodes and attribute sets are allocated once and live until
//! the whole compilation unit is torn down; there is no individual free.
//! A bump allocator fits that lifecycle:
//!
//! - **Fast allocation**: O(1) pointer bump
//! - **Bulk teardown**: every chunk is released when the arena drops
//! - **No per-object overhead**: no headers, no destructor bookkeeping
//!
//! Allocation failure is not a recoverable condition inside a compiler
//! pass; the arena aborts via panic rather than surfacing an error.
//!
//! # Usage
//!
//! ```rust
//! use quillc::arena::AstArena;
//!
//! let arena = AstArena::new();
//! let n = arena.alloc(42u32);
//! assert_eq!(*n, 42);
//! // `n` is valid for the lifetime of `arena`.
//! ```

use std::alloc::{alloc, dealloc, Layout};
use std::cell::RefCell;
use std::ptr::NonNull;

use rustc_hash::FxHashMap;

/// Default chunk size for arena allocation (8KB).
const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Base alignment of every chunk. Allocations may not require more.
const CHUNK_ALIGN: usize = 16;

/// A chunk of memory in the arena.
struct Chunk {
    /// Pointer to the allocated memory.
    data: NonNull<u8>,
    /// Layout used for allocation (for deallocation).
    layout: Layout,
    /// Current offset into the chunk.
    offset: usize,
    /// Capacity of this chunk.
    capacity: usize,
}

impl Chunk {
    /// Create a new chunk with the given capacity.
    fn new(capacity: usize) -> Self {
        let layout = Layout::from_size_align(capacity, CHUNK_ALIGN).expect("Invalid layout");

        // SAFETY: Layout is valid and non-zero sized
        let data = unsafe {
            let ptr = alloc(layout);
            NonNull::new(ptr).expect("Allocation failed")
        };

        Self {
            data,
            layout,
            offset: 0,
            capacity,
        }
    }

    /// Try to allocate within this chunk.
    fn try_alloc(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        // Align the offset
        let aligned_offset = (self.offset + layout.align() - 1) & !(layout.align() - 1);
        let new_offset = aligned_offset + layout.size();

        if new_offset > self.capacity {
            return None;
        }

        // SAFETY: We just verified the offset is within bounds
        let ptr = unsafe { NonNull::new_unchecked(self.data.as_ptr().add(aligned_offset)) };

        self.offset = new_offset;
        Some(ptr)
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        // SAFETY: We allocated with this layout
        unsafe {
            dealloc(self.data.as_ptr(), self.layout);
        }
    }
}

/// The allocation arena backing one compilation unit's AST.
///
/// Hands out raw memory of a requested size and alignment that stays
/// valid until the arena itself is dropped. Attribute storage is the
/// primary client; payload strings are interned so equal names share
/// one allocation.
///
/// Uses interior mutability and is deliberately not `Sync`: AST
/// construction is single-threaded per compilation unit.
pub struct AstArena {
    /// The chunks of memory.
    chunks: RefCell<Vec<Chunk>>,
    /// Interning map for string deduplication.
    interned: RefCell<FxHashMap<&'static str, &'static str>>,
}

impl AstArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self {
            chunks: RefCell::new(Vec::new()),
            interned: RefCell::new(FxHashMap::default()),
        }
    }

    /// Allocate a value in the arena.
    ///
    /// Returns a mutable reference with the arena's lifetime. The value
    /// is never dropped: teardown is bulk, with the arena itself. Callers
    /// store plain AST data with no drop obligations.
    pub fn alloc<T>(&self, value: T) -> &mut T {
        let layout = Layout::new::<T>();
        let ptr = self.alloc_raw(layout);

        // SAFETY: ptr is properly aligned for T and freshly bumped, so
        // no other reference to this memory exists.
        unsafe {
            ptr.as_ptr().cast::<T>().write(value);
            &mut *ptr.as_ptr().cast::<T>()
        }
    }

    /// Copy a string into the arena, interning it.
    ///
    /// Equal strings return the identical reference. The returned
    /// reference is valid as long as the arena lives.
    pub fn alloc_str(&self, s: &str) -> &str {
        // Check if already interned
        if let Some(&existing) = self.interned.borrow().get(s) {
            return existing;
        }

        let layout = Layout::from_size_align(s.len().max(1), 1).expect("Invalid layout");
        let ptr = self.alloc_raw(layout);

        // SAFETY: We just allocated this memory, and the bytes we copy in
        // are valid UTF-8 because they come from a &str.
        unsafe {
            std::ptr::copy_nonoverlapping(s.as_ptr(), ptr.as_ptr(), s.len());
            let allocated =
                std::str::from_utf8_unchecked(std::slice::from_raw_parts(ptr.as_ptr(), s.len()));

            // The 'static lifetime is internal-only: entries never escape
            // with that lifetime and the map dies with the arena.
            let static_ref: &'static str = std::mem::transmute::<&str, &'static str>(allocated);
            self.interned.borrow_mut().insert(static_ref, static_ref);

            allocated
        }
    }

    /// Raw allocation of `layout.size()` bytes at `layout.align()`.
    ///
    /// The returned memory stays valid until the arena is dropped. Panics
    /// on exhaustion; there is no recoverable out-of-memory path here.
    pub fn alloc_raw(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.align() <= CHUNK_ALIGN);

        let mut chunks = self.chunks.borrow_mut();

        // Try to allocate in the last chunk
        if let Some(chunk) = chunks.last_mut() {
            if let Some(ptr) = chunk.try_alloc(layout) {
                return ptr;
            }
        }

        // Need a new chunk
        let chunk_size = layout.size().max(DEFAULT_CHUNK_SIZE);
        let mut new_chunk = Chunk::new(chunk_size);
        let ptr = new_chunk
            .try_alloc(layout)
            .expect("Fresh chunk should have space");
        chunks.push(new_chunk);
        ptr
    }
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}
