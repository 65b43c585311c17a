//! The face-culled mesh generator (§4.5).
//!
//! Looking across a chunk boundary needs a capability the mesh module can't
//! own itself — the world's chunk-slot pool — so cross-chunk neighbor
//! lookups go through the small [`NeighborLookup`] trait rather than a
//! direct dependency on `crate::world`, the same seam the teacher draws
//! around `Chunk::write_data`/`Chunk::read_data` taking a caller-owned
//! writer instead of reaching for global state.

use glam::{Vec2, Vec3};

use crate::chunk::Chunk;
use crate::log::LogSink;
use crate::voxel::{slot, MeshTemplateSet, MeshVertex, VoxelId, VoxelType, EMPTY_VOXEL};

/// Resolves a global voxel position to its id, treating an unloaded
/// neighbor chunk as empty (§4.5's chunk-border contract).
pub trait NeighborLookup {
    fn voxel_at(&self, gx: i32, gy: i32, gz: i32) -> VoxelId;
}

/// The output accumulator for [`generate_chunk_mesh`]. Reused across calls
/// via [`MeshBuffers::clear`] rather than reallocated per chunk, mirroring
/// the teacher's caller-owned-writer pattern in `Chunk::write_data`.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    pub vertices: Vec<MeshVertex>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

fn push_face(
    out: &mut MeshBuffers,
    template: &crate::voxel::MeshTemplate,
    local: (i32, i32, i32),
    voxel_size: (f32, f32, f32),
    atlas_cell: (u32, u32),
    atlas_steps: (f32, f32),
) -> bool {
    if template.triangles.is_empty() {
        return false;
    }

    let (lx, ly, lz) = local;
    let (vx, vy, vz) = voxel_size;
    let offset = Vec3::new(lx as f32 * vx, ly as f32 * vy, lz as f32 * vz);
    let (tsx, tsz) = atlas_steps;
    let atlas_scale = Vec2::new(tsx, tsz);
    let (ax, az) = atlas_cell;
    let uv_offset = Vec2::new(ax as f32 * tsx, az as f32 * tsz);

    for v in &template.triangles {
        out.vertices.push(MeshVertex {
            position: v.position + offset,
            normal: v.normal,
            uv: v.uv * atlas_scale + uv_offset,
        });
    }
    true
}

/// Generate a chunk's mesh into `out`, consulting `neighbors` for voxels
/// across a chunk-X/Z boundary. Returns the number of voxels that
/// contributed at least one face (the chunk's `visible_voxels` counter,
/// §4.5).
#[allow(clippy::too_many_arguments)]
pub fn generate_chunk_mesh(
    chunk: &Chunk,
    size: (i32, i32, i32),
    templates: &MeshTemplateSet,
    voxel_types: &[VoxelType],
    voxel_size: (f32, f32, f32),
    atlas_steps: (f32, f32),
    neighbors: &dyn NeighborLookup,
    out: &mut MeshBuffers,
    log: &LogSink,
) -> u32 {
    let (size_x, size_y, size_z) = size;
    let mut visible_voxels = 0u32;

    for ly in 0..size_y {
        for lz in 0..size_z {
            for lx in 0..size_x {
                let id = chunk.get_voxel(size, (lx, ly, lz));
                if id == EMPTY_VOXEL {
                    continue;
                }

                let atlas_cell = match voxel_types.get(id as usize) {
                    Some(vt) => vt.atlas_cell,
                    None => {
                        log.error("mesh", format!("voxel id {id} has no entry in the voxel-type table; atlas lookup defaults to (0,0)"));
                        (0, 0)
                    }
                };

                let is_empty_neighbor = |dlx: i32, dlz: i32| -> bool {
                    let nx = lx + dlx;
                    let nz = lz + dlz;
                    if nx >= 0 && nx < size_x && nz >= 0 && nz < size_z {
                        chunk.get_voxel(size, (nx, ly, nz)) == EMPTY_VOXEL
                    } else {
                        let gx = chunk.pos_x * size_x + nx;
                        let gz = chunk.pos_z * size_z + nz;
                        neighbors.voxel_at(gx, ly, gz) == EMPTY_VOXEL
                    }
                };

                let mut emitted = false;

                if is_empty_neighbor(0, -1) {
                    emitted |= push_face(out, &templates[slot::NEG_Z], (lx, ly, lz), voxel_size, atlas_cell, atlas_steps);
                }
                if is_empty_neighbor(0, 1) {
                    emitted |= push_face(out, &templates[slot::POS_Z], (lx, ly, lz), voxel_size, atlas_cell, atlas_steps);
                }
                if is_empty_neighbor(1, 0) {
                    emitted |= push_face(out, &templates[slot::POS_X], (lx, ly, lz), voxel_size, atlas_cell, atlas_steps);
                }
                if is_empty_neighbor(-1, 0) {
                    emitted |= push_face(out, &templates[slot::NEG_X], (lx, ly, lz), voxel_size, atlas_cell, atlas_steps);
                }

                let top_empty = ly == size_y - 1 || chunk.get_voxel(size, (lx, ly + 1, lz)) == EMPTY_VOXEL;
                if top_empty {
                    emitted |= push_face(out, &templates[slot::POS_Y], (lx, ly, lz), voxel_size, atlas_cell, atlas_steps);
                }

                let bottom_empty = ly == 0 || chunk.get_voxel(size, (lx, ly - 1, lz)) == EMPTY_VOXEL;
                if bottom_empty {
                    emitted |= push_face(out, &templates[slot::NEG_Y], (lx, ly, lz), voxel_size, atlas_cell, atlas_steps);
                }

                emitted |= push_face(out, &templates[slot::ALWAYS], (lx, ly, lz), voxel_size, atlas_cell, atlas_steps);

                if emitted {
                    visible_voxels += 1;
                }
            }
        }
    }

    visible_voxels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::VoxelBuffer;
    use crate::voxel::default_cube_mesh;

    struct AlwaysEmpty;
    impl NeighborLookup for AlwaysEmpty {
        fn voxel_at(&self, _gx: i32, _gy: i32, _gz: i32) -> VoxelId {
            EMPTY_VOXEL
        }
    }

    fn test_chunk(size: (i32, i32, i32)) -> Chunk {
        let (sx, sy, sz) = size;
        Chunk {
            pos_x: 0,
            pos_z: 0,
            exists: true,
            modified: false,
            allocated: true,
            voxels: Some(VoxelBuffer::Host(vec![EMPTY_VOXEL; (sx * sy * sz) as usize])),
            region_entry: None,
            visible_voxels: 0,
        }
    }

    fn voxel_types() -> Vec<VoxelType> {
        vec![
            VoxelType { uid: 0, name: "stone".into(), atlas_cell: (0, 0), flags: 0 },
            VoxelType { uid: 1, name: "dirt".into(), atlas_cell: (1, 0), flags: 0 },
        ]
    }

    #[test]
    fn single_voxel_emits_all_six_faces() {
        let size = (4, 4, 4);
        let mut chunk = test_chunk(size);
        chunk.set_voxel(size, (0, 0, 0), 0);

        let templates = default_cube_mesh();
        let types = voxel_types();
        let log = LogSink::default();
        let mut out = MeshBuffers::default();

        let visible = generate_chunk_mesh(&chunk, size, &templates, &types, (1.0, 1.0, 1.0), (0.5, 0.5), &AlwaysEmpty, &mut out, &log);

        assert_eq!(visible, 1);
        assert_eq!(out.vertex_count(), 36);
        for v in &out.vertices {
            assert!(v.uv[0] >= 0.0 && v.uv[0] <= 0.5);
            assert!(v.uv[1] >= 0.0 && v.uv[1] <= 0.5);
        }
    }

    #[test]
    fn two_by_two_by_two_cluster_only_exposes_outer_faces() {
        let size = (4, 4, 4);
        let mut chunk = test_chunk(size);
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    chunk.set_voxel(size, (x, y, z), 0);
                }
            }
        }

        let templates = default_cube_mesh();
        let types = voxel_types();
        let log = LogSink::default();
        let mut out = MeshBuffers::default();

        let visible = generate_chunk_mesh(&chunk, size, &templates, &types, (1.0, 1.0, 1.0), (0.5, 0.5), &AlwaysEmpty, &mut out, &log);

        assert_eq!(visible, 8);
        assert_eq!(out.vertex_count(), 144);
    }

    #[test]
    fn unloaded_neighbor_chunk_is_treated_as_empty() {
        let size = (4, 4, 4);
        let mut chunk = test_chunk(size);
        chunk.set_voxel(size, (3, 0, 0), 0); // touches the +X chunk border.

        let templates = default_cube_mesh();
        let types = voxel_types();
        let log = LogSink::default();
        let mut out = MeshBuffers::default();

        let visible = generate_chunk_mesh(&chunk, size, &templates, &types, (1.0, 1.0, 1.0), (0.5, 0.5), &AlwaysEmpty, &mut out, &log);

        assert_eq!(visible, 1);
        assert_eq!(out.vertex_count(), 36); // all six faces visible; neighbor chunk unloaded.
    }

    #[test]
    fn out_of_range_voxel_id_fails_closed_to_origin_uv() {
        let size = (2, 2, 2);
        let mut chunk = test_chunk(size);
        chunk.set_voxel(size, (0, 0, 0), 99);

        let templates = default_cube_mesh();
        let types = voxel_types();
        let log = LogSink::default();
        let mut out = MeshBuffers::default();

        generate_chunk_mesh(&chunk, size, &templates, &types, (1.0, 1.0, 1.0), (0.5, 0.5), &AlwaysEmpty, &mut out, &log);

        for v in &out.vertices {
            assert!(v.uv[0] >= 0.0 && v.uv[0] <= 0.5);
            assert!(v.uv[1] >= 0.0 && v.uv[1] <= 0.5);
        }
    }
}
