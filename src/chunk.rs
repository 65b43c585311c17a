//! The chunk data structure and voxel addressing (§3, §4.4).

use crate::alloc::VoxelBuffer;
use crate::voxel::{VoxelId, EMPTY_VOXEL};

/// True floor division (rounds toward negative infinity), used for every
/// chunk/region coordinate resolution in §4.4. The source decrements
/// unconditionally when the dividend is negative, which is wrong on an
/// exact multiple; `div_euclid` is correct for any strictly positive
/// divisor, which §4.6 guarantees for every structural size.
#[inline]
pub fn floor_div(a: i32, b: i32) -> i32 {
    debug_assert!(b > 0, "divisor must be strictly positive");
    a.div_euclid(b)
}

/// Whether `local` addresses a voxel inside a chunk of the given `size` on
/// all three axes. `get_voxel`/`get_voxel_index` (§4.4, §7) use this to
/// fail closed to [`EMPTY_VOXEL`] instead of indexing out of range.
#[inline]
pub fn voxel_in_bounds(size: (i32, i32, i32), local: (i32, i32, i32)) -> bool {
    let (size_x, size_y, size_z) = size;
    let (x, y, z) = local;
    x >= 0 && x < size_x && y >= 0 && y < size_y && z >= 0 && z < size_z
}

/// Index into a chunk's flat voxel array for a local position, per the
/// addressing contract in §3: `index = y*(CZ*CX) + z*CX + x`. Callers must
/// have already established `local` is in bounds (e.g. via
/// [`voxel_in_bounds`]); this is the raw addressing formula, not a
/// bounds-checked lookup.
#[inline]
pub fn voxel_index(size: (i32, i32, i32), local: (i32, i32, i32)) -> usize {
    let (size_x, size_y, size_z) = size;
    let (x, y, z) = local;
    debug_assert!(x >= 0 && x < size_x, "x {x} out of bounds for size_x {size_x}");
    debug_assert!(y >= 0 && y < size_y, "y {y} out of bounds for size_y {size_y}");
    debug_assert!(z >= 0 && z < size_z, "z {z} out of bounds for size_z {size_z}");
    (y * (size_z * size_x) + z * size_x + x) as usize
}

/// The result of resolving a global voxel position to chunk-local
/// coordinates (§4.4): the Y axis is never chunked, so `local_y` is just
/// `gy` and there is no `chunk_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVoxelPos {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub local_x: i32,
    pub local_y: i32,
    pub local_z: i32,
}

/// Global voxel `(gx, gy, gz)` -> local position, per §4.4.
pub fn global_to_local(size_x: i32, size_z: i32, gx: i32, gy: i32, gz: i32) -> LocalVoxelPos {
    let chunk_x = floor_div(gx, size_x);
    let chunk_z = floor_div(gz, size_z);
    LocalVoxelPos {
        chunk_x,
        chunk_z,
        local_x: gx - chunk_x * size_x,
        local_y: gy,
        local_z: gz - chunk_z * size_z,
    }
}

/// The inverse of [`global_to_local`]; round-trips per invariant 4 (§8).
pub fn local_to_global(size_x: i32, size_z: i32, local: LocalVoxelPos) -> (i32, i32, i32) {
    (
        local.chunk_x * size_x + local.local_x,
        local.local_y,
        local.chunk_z * size_z + local.local_z,
    )
}

/// Which region in the world's region list a spawned chunk belongs to, and,
/// once it has been saved at least once, which entry in that region's entry
/// list holds its payload. The region is resolved at spawn time regardless
/// of whether the chunk has ever been saved; `entry_index` stays `None`
/// until the first `SaveChunk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEntryRef {
    pub region_index: usize,
    pub entry_index: Option<usize>,
}

/// One chunk slot in the world's fixed pool (§3, §4.4). The voxel buffer,
/// once allocated, is retained across unload/respawn cycles; only
/// `exists`/`modified`/the logical chunk position reset on unload.
pub struct Chunk {
    pub pos_x: i32,
    pub pos_z: i32,
    pub exists: bool,
    pub modified: bool,
    pub allocated: bool,
    pub voxels: Option<VoxelBuffer>,
    pub region_entry: Option<RegionEntryRef>,
    /// Diagnostic counter: number of voxels that contributed at least one
    /// face on the most recent mesh generation (§4.5).
    pub visible_voxels: u32,
}

impl Chunk {
    pub fn empty_slot() -> Self {
        Self {
            pos_x: 0,
            pos_z: 0,
            exists: false,
            modified: false,
            allocated: false,
            voxels: None,
            region_entry: None,
            visible_voxels: 0,
        }
    }

    /// Out-of-bounds on any axis (including `y`, which has no per-chunk
    /// range check elsewhere) returns [`EMPTY_VOXEL`] rather than indexing
    /// (§7: "voxel-index out of bounds returns the empty sentinel, not an
    /// error").
    #[inline]
    pub fn get_voxel(&self, size: (i32, i32, i32), local: (i32, i32, i32)) -> VoxelId {
        if !voxel_in_bounds(size, local) {
            return EMPTY_VOXEL;
        }
        match &self.voxels {
            Some(buf) => buf[voxel_index(size, local)],
            None => EMPTY_VOXEL,
        }
    }

    #[inline]
    pub fn set_voxel(&mut self, size: (i32, i32, i32), local: (i32, i32, i32), id: VoxelId) {
        let index = voxel_index(size, local);
        let buf = self.voxels.as_mut().expect("voxel buffer must be allocated before writing");
        buf[index] = id;
    }

    /// A chunk is "empty" when its voxel array is fully filled with the
    /// empty sentinel (§3) — the state right after spawn with no prior save.
    pub fn is_empty(&self) -> bool {
        match &self.voxels {
            None => true,
            Some(buf) => buf.iter().all(|&v| v == EMPTY_VOXEL),
        }
    }
}
