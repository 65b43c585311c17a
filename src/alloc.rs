//! The memory allocator hook (§6 "Memory allocator contract").
//!
//! Two raw function pointers, `alloc(bytes) -> *mut u8` and `free(*mut u8)`,
//! default to the host's standard allocator. The dominant allocation in
//! this crate by both size and churn is a chunk's voxel buffer
//! (`CX*CY*CZ` 32-bit ids, reallocated at most once per slot and then
//! reused across unload/respawn cycles per §3), so that's the buffer this
//! hook governs; [`VoxelBuffer`] is the boundary where a caller-supplied
//! allocator crosses into safe code.

use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::voxel::{VoxelId, EMPTY_VOXEL};

pub type AllocFn = fn(usize) -> *mut u8;
pub type FreeFn = fn(*mut u8);

/// Holds the optional user-supplied allocator hooks.
#[derive(Default, Clone, Copy)]
pub struct Allocator {
    alloc: Option<AllocFn>,
    free: Option<FreeFn>,
}

impl Allocator {
    pub fn set_hooks(&mut self, alloc: AllocFn, free: FreeFn) {
        self.alloc = Some(alloc);
        self.free = Some(free);
    }

    pub fn clear_hooks(&mut self) {
        self.alloc = None;
        self.free = None;
    }

    /// Allocate a voxel buffer of `len` voxels, initialized to [`EMPTY_VOXEL`].
    pub fn alloc_voxel_buffer(&self, len: usize) -> VoxelBuffer {
        match self.alloc {
            None => VoxelBuffer::Host(vec![EMPTY_VOXEL; len]),
            Some(alloc_fn) => {
                let bytes = len * std::mem::size_of::<VoxelId>();
                let raw = alloc_fn(bytes);
                let ptr = NonNull::new(raw as *mut VoxelId)
                    .unwrap_or_else(|| panic!("registered allocator returned a null pointer for {bytes} bytes"));
                // SAFETY: the host contract promises `bytes` writable bytes at `raw`,
                // aligned at least to `align_of::<VoxelId>()`; we only ever touch the
                // `len` voxels we requested.
                unsafe {
                    for i in 0..len {
                        ptr.as_ptr().add(i).write(EMPTY_VOXEL);
                    }
                }
                VoxelBuffer::Foreign { ptr, len, free: self.free.expect("alloc hook set without a matching free hook") }
            }
        }
    }
}

/// A chunk's voxel storage, either owned by the host's global allocator or
/// by a foreign allocator registered through [`Allocator::set_hooks`].
pub enum VoxelBuffer {
    Host(Vec<VoxelId>),
    Foreign { ptr: NonNull<VoxelId>, len: usize, free: FreeFn },
}

impl Deref for VoxelBuffer {
    type Target = [VoxelId];

    fn deref(&self) -> &[VoxelId] {
        match self {
            VoxelBuffer::Host(v) => v.as_slice(),
            // SAFETY: `ptr` is valid for `len` elements for the lifetime of this buffer.
            VoxelBuffer::Foreign { ptr, len, .. } => unsafe { std::slice::from_raw_parts(ptr.as_ptr(), *len) },
        }
    }
}

impl DerefMut for VoxelBuffer {
    fn deref_mut(&mut self) -> &mut [VoxelId] {
        match self {
            VoxelBuffer::Host(v) => v.as_mut_slice(),
            // SAFETY: same as above, and we hold `&mut self`.
            VoxelBuffer::Foreign { ptr, len, .. } => unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), *len) },
        }
    }
}

impl Drop for VoxelBuffer {
    fn drop(&mut self) {
        if let VoxelBuffer::Foreign { ptr, free, .. } = self {
            free(ptr.as_ptr() as *mut u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::alloc::{alloc as std_alloc, Layout};

    #[test]
    fn host_buffer_defaults_to_empty_sentinel() {
        let alloc = Allocator::default();
        let buf = alloc.alloc_voxel_buffer(8);
        assert!(buf.iter().all(|&v| v == EMPTY_VOXEL));
    }

    fn test_alloc(bytes: usize) -> *mut u8 {
        let layout = Layout::array::<u8>(bytes).unwrap();
        unsafe { std_alloc(layout) }
    }

    fn test_free(ptr: *mut u8) {
        // Leaked intentionally in this trivial test hook; real hosts pair
        // this with a matching arena. We only assert on writability here.
        let _ = ptr;
    }

    #[test]
    fn foreign_buffer_is_writable_and_initialized() {
        let mut alloc = Allocator::default();
        alloc.set_hooks(test_alloc, test_free);
        let mut buf = alloc.alloc_voxel_buffer(16);
        assert!(buf.iter().all(|&v| v == EMPTY_VOXEL));
        buf[3] = 7;
        assert_eq!(buf[3], 7);
    }
}
