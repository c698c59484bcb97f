use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::ptr;

/// Number of recognized allocation size classes.
pub const BLOCK_SIZE_COUNT: usize = 14;

/// Largest size served from the pools; bigger requests go straight to
/// the heap.
pub const MAX_BLOCK_SIZE: usize = 640;

const CHUNK_SIZE: usize = 16 * 1024;
const BLOCK_ALIGN: usize = 16;

/// The recognized block sizes, in increasing order. Requests round up
/// to the smallest class that fits. Calibration constants, not API.
const BLOCK_SIZES: [usize; BLOCK_SIZE_COUNT] = [
    16, 32, 64, 96, 128, 160, 192, 224, 256, 320, 384, 448, 512, 640,
];

/// A free block, threaded through its own first word.
#[repr(C)]
struct Block {
    next: *mut Block,
}

/// One slab of raw memory, dedicated to a single size class and sliced
/// into same-size blocks.
struct Chunk {
    block_size: usize,
    blocks: *mut u8,
}

/// A small-object allocator for objects that persist for more than one
/// step. Allocation and free are O(1) for sizes up to
/// [`MAX_BLOCK_SIZE`]. Memory is only returned to the OS by
/// [`BlockAllocator::clear`] or drop. Not thread-safe; keep one per
/// world.
pub struct BlockAllocator {
    chunks: Vec<Chunk>,
    free_lists: [*mut Block; BLOCK_SIZE_COUNT],
}

impl BlockAllocator {
    pub fn new() -> Self {
        Self {
            chunks: Vec::with_capacity(128),
            free_lists: [ptr::null_mut(); BLOCK_SIZE_COUNT],
        }
    }

    /// Smallest size class that fits `size`.
    fn size_class(size: usize) -> usize {
        debug_assert!(0 < size && size <= MAX_BLOCK_SIZE);
        BLOCK_SIZES
            .iter()
            .position(|&class_size| size <= class_size)
            .expect("size exceeds the largest block class")
    }

    /// Returns a block of at least `size` bytes, or null for a zero
    /// size. Sizes above [`MAX_BLOCK_SIZE`] pass through to the heap.
    pub fn allocate(&mut self, size: usize) -> *mut u8 {
        if size == 0 {
            return ptr::null_mut();
        }

        if size > MAX_BLOCK_SIZE {
            let layout = heap_layout(size);
            let data = unsafe { alloc(layout) };
            if data.is_null() {
                handle_alloc_error(layout);
            }
            return data;
        }

        let index = Self::size_class(size);

        let head = self.free_lists[index];
        if !head.is_null() {
            // Safety: blocks on a free list point into live chunks and
            // hold a valid next link written by free() or the slicing
            // loop below.
            unsafe {
                self.free_lists[index] = (*head).next;
            }
            return head as *mut u8;
        }

        // The class is empty: carve a fresh chunk into blocks, hand the
        // first one out and thread the rest into the free list.
        let layout = chunk_layout();
        let chunk = unsafe { alloc(layout) };
        if chunk.is_null() {
            handle_alloc_error(layout);
        }

        let block_size = BLOCK_SIZES[index];
        let block_count = CHUNK_SIZE / block_size;
        debug_assert!(block_count * block_size <= CHUNK_SIZE);

        // Safety: every offset below stays inside the chunk allocation,
        // and BLOCK_ALIGN keeps each block aligned for the link writes.
        unsafe {
            for i in 1..block_count - 1 {
                let block = chunk.add(i * block_size) as *mut Block;
                (*block).next = chunk.add((i + 1) * block_size) as *mut Block;
            }
            let last = chunk.add((block_count - 1) * block_size) as *mut Block;
            (*last).next = ptr::null_mut();

            self.free_lists[index] = chunk.add(block_size) as *mut Block;
        }

        self.chunks.push(Chunk {
            block_size,
            blocks: chunk,
        });

        chunk
    }

    /// Returns a block to its class free list, or to the heap for sizes
    /// above [`MAX_BLOCK_SIZE`].
    ///
    /// # Safety
    ///
    /// `data` must have come from [`BlockAllocator::allocate`] on this
    /// allocator with the same `size`, and must not be used afterwards.
    /// A mismatched size corrupts the free lists.
    pub unsafe fn free(&mut self, data: *mut u8, size: usize) {
        if size == 0 {
            debug_assert!(data.is_null());
            return;
        }

        if size > MAX_BLOCK_SIZE {
            dealloc(data, heap_layout(size));
            return;
        }

        let index = Self::size_class(size);

        debug_assert!(
            self.owns_block(data, BLOCK_SIZES[index]),
            "block freed with the wrong size or into the wrong allocator"
        );

        let block = data as *mut Block;
        (*block).next = self.free_lists[index];
        self.free_lists[index] = block;
    }

    /// Releases every chunk and resets all free lists. Outstanding
    /// pool blocks become dangling.
    pub fn clear(&mut self) {
        for chunk in &self.chunks {
            // Safety: each chunk was allocated with chunk_layout() and
            // is released exactly once; clear() empties the list.
            unsafe {
                dealloc(chunk.blocks, chunk_layout());
            }
        }
        self.chunks.clear();
        self.free_lists = [ptr::null_mut(); BLOCK_SIZE_COUNT];
    }

    /// True when the pointer lies within a chunk of the expected size
    /// class.
    fn owns_block(&self, data: *mut u8, block_size: usize) -> bool {
        let addr = data as usize;
        for chunk in &self.chunks {
            let start = chunk.blocks as usize;
            let end = start + CHUNK_SIZE;
            if chunk.block_size == block_size && start <= addr && addr + block_size <= end {
                return true;
            }
        }
        false
    }
}

impl Default for BlockAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BlockAllocator {
    fn drop(&mut self) {
        self.clear();
    }
}

fn chunk_layout() -> Layout {
    Layout::from_size_align(CHUNK_SIZE, BLOCK_ALIGN).expect("chunk layout is valid")
}

fn heap_layout(size: usize) -> Layout {
    Layout::from_size_align(size, BLOCK_ALIGN).expect("allocation size overflows layout")
}
