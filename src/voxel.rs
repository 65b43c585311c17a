//! Voxel identifiers, the user-supplied voxel-type table, and the mesh
//! templates consulted by the mesh generator (§3, §4.5, §4.6).

use glam::{Vec2, Vec3};

/// A voxel id; [`EMPTY_VOXEL`] means "no voxel present".
pub type VoxelId = u32;

/// The empty sentinel: all bits set.
pub const EMPTY_VOXEL: VoxelId = u32::MAX;

/// One entry of the user-supplied voxel-type table. A voxel id other than
/// [`EMPTY_VOXEL`] indexes into this table; the table itself is
/// configuration, never persisted by the core (§3).
#[derive(Debug, Clone)]
pub struct VoxelType {
    pub uid: u32,
    pub name: String,
    pub atlas_cell: (u32, u32),
    pub flags: u8,
}

/// A single mesh vertex: position, normal, and UV, copied through the
/// per-face transform in §4.5 (position offset by voxel coordinate, UV
/// remapped into the atlas, normal unchanged).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// A template for one of the 7 face slots (§4.5): a flat triangle list
/// (length a multiple of 3), expressed in unit-cube local space `[0,1]^3`
/// and `[0,1]^2` UV space before the per-voxel transform is applied.
#[derive(Debug, Clone, Default)]
pub struct MeshTemplate {
    pub triangles: Vec<MeshVertex>,
}

/// Index of each of the 7 user-settable mesh template slots (§4.5's table).
pub mod slot {
    pub const NEG_Z: usize = 0;
    pub const POS_Z: usize = 1;
    pub const POS_X: usize = 2;
    pub const NEG_X: usize = 3;
    pub const POS_Y: usize = 4;
    pub const NEG_Y: usize = 5;
    pub const ALWAYS: usize = 6;
    pub const COUNT: usize = 7;
}

/// The 7 mesh templates a world holds, one per slot.
pub type MeshTemplateSet = [MeshTemplate; slot::COUNT];

fn quad(corners: [Vec3; 4], normal: Vec3) -> MeshTemplate {
    const UV: [Vec2; 4] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
    let v = |i: usize| MeshVertex { position: corners[i], normal, uv: UV[i] };
    MeshTemplate { triangles: vec![v(0), v(1), v(2), v(0), v(2), v(3)] }
}

/// The default cube template: 8 standard corners, one outward unit normal
/// per face, two CCW (as seen from outside the cube) triangles per face,
/// across slots 0-5; slot 6 ("always") is left empty, matching §4.5.
pub fn default_cube_mesh() -> MeshTemplateSet {
    let c000 = Vec3::new(0.0, 0.0, 0.0);
    let c100 = Vec3::new(1.0, 0.0, 0.0);
    let c010 = Vec3::new(0.0, 1.0, 0.0);
    let c001 = Vec3::new(0.0, 0.0, 1.0);
    let c110 = Vec3::new(1.0, 1.0, 0.0);
    let c101 = Vec3::new(1.0, 0.0, 1.0);
    let c011 = Vec3::new(0.0, 1.0, 1.0);
    let c111 = Vec3::new(1.0, 1.0, 1.0);

    let mut templates: MeshTemplateSet = Default::default();
    templates[slot::NEG_Z] = quad([c000, c010, c110, c100], Vec3::new(0.0, 0.0, -1.0));
    templates[slot::POS_Z] = quad([c001, c101, c111, c011], Vec3::new(0.0, 0.0, 1.0));
    templates[slot::POS_X] = quad([c100, c110, c111, c101], Vec3::new(1.0, 0.0, 0.0));
    templates[slot::NEG_X] = quad([c000, c001, c011, c010], Vec3::new(-1.0, 0.0, 0.0));
    templates[slot::POS_Y] = quad([c010, c011, c111, c110], Vec3::new(0.0, 1.0, 0.0));
    templates[slot::NEG_Y] = quad([c000, c100, c101, c001], Vec3::new(0.0, -1.0, 0.0));
    // slot::ALWAYS stays empty.
    templates
}
