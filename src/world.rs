//! The world manager (§4.4, §4.6): the chunk-slot pool, region resolution,
//! lifecycle (create/load/save/unload), and the configuration surface every
//! other component reads its sizes and capabilities from. `World` is the
//! single entry point an embedding host talks to — the shape the teacher's
//! `World` plays in its own crate, generalized from Minecraft game state to
//! this spec's persistence-and-mesh contract.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::alloc::{AllocFn, Allocator, FreeFn};
use crate::chunk::{floor_div, global_to_local, local_to_global, Chunk, LocalVoxelPos, RegionEntryRef};
use crate::error::{ConfigError, WorldError, WorldResult};
use crate::io::{BinaryIo, LeIoExt, WriteLeIoExt};
use crate::log::{LogCallback, LogSink, Severity};
use crate::mesh::{self, MeshBuffers, NeighborLookup};
use crate::region::RegionDir;
use crate::rle;
use crate::voxel::{default_cube_mesh, MeshTemplate, MeshTemplateSet, VoxelId, VoxelType, EMPTY_VOXEL};

/// The configurable folder/file name fragments persisted in the world
/// properties file (§6), permitting a renamed on-disk layout to round-trip.
#[derive(Debug, Clone)]
struct NameFragments {
    world: String,
    regions: String,
    properties: String,
    header: String,
    data: String,
}

impl Default for NameFragments {
    fn default() -> Self {
        Self {
            world: "World".to_string(),
            regions: "Regions".to_string(),
            properties: "fVoxel".to_string(),
            header: "RegionHeader".to_string(),
            data: "RegionData".to_string(),
        }
    }
}

/// An embeddable, persistent chunked voxel world (§3). Owns the chunk-slot
/// pool, the loaded region list, and the mutable/frozen configuration
/// described in §4.6.
pub struct World {
    io: BinaryIo,
    log: LogSink,
    alloc: Allocator,

    initialized: bool,
    save_path: Option<PathBuf>,
    fragments: NameFragments,

    chunk_size: (i32, i32, i32),
    region_size: (i32, i32),
    world_size: (i32, i32),

    voxel_size: (f32, f32, f32),
    atlas_steps: (f32, f32),
    voxel_types: Vec<VoxelType>,
    mesh_templates: MeshTemplateSet,

    slots: Vec<Chunk>,
    slot_index: HashMap<(i32, i32), usize>,
    regions: RegionDir,
}

impl Default for World {
    fn default() -> Self {
        Self {
            io: BinaryIo::default(),
            log: LogSink::default(),
            alloc: Allocator::default(),

            initialized: false,
            save_path: None,
            fragments: NameFragments::default(),

            chunk_size: (16, 16, 16),
            region_size: (16, 16),
            world_size: (16, 16),

            voxel_size: (1.0, 1.0, 1.0),
            atlas_steps: (1.0, 1.0),
            voxel_types: Vec::new(),
            mesh_templates: default_cube_mesh(),

            slots: Vec::new(),
            slot_index: HashMap::new(),
            regions: RegionDir::new(),
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_positive3(v: (i32, i32, i32)) -> Result<(), ConfigError> {
        if v.0 > 0 && v.1 > 0 && v.2 > 0 {
            Ok(())
        } else {
            Err(ConfigError::NotPositive((v.0 as i64, v.1 as i64, v.2 as i64)))
        }
    }

    fn check_positive2(v: (i32, i32)) -> Result<(), ConfigError> {
        if v.0 > 0 && v.1 > 0 {
            Ok(())
        } else {
            Err(ConfigError::NotPositive((v.0 as i64, v.1 as i64, 0)))
        }
    }

    fn ensure_not_initialized(&self) -> Result<(), ConfigError> {
        if self.initialized {
            Err(ConfigError::AlreadyInitialized)
        } else {
            Ok(())
        }
    }

    fn ensure_initialized(&self) -> Result<(), ConfigError> {
        if self.initialized {
            Ok(())
        } else {
            Err(ConfigError::NotInitialized)
        }
    }

    // ---- Configuration (§4.6, §6) ----

    pub fn set_chunk_voxel_size(&mut self, x: i32, y: i32, z: i32) -> Result<(), ConfigError> {
        self.ensure_not_initialized()?;
        Self::check_positive3((x, y, z))?;
        self.chunk_size = (x, y, z);
        Ok(())
    }

    pub fn set_region_size(&mut self, x: i32, z: i32) -> Result<(), ConfigError> {
        self.ensure_not_initialized()?;
        Self::check_positive2((x, z))?;
        self.region_size = (x, z);
        Ok(())
    }

    pub fn set_world_size(&mut self, x: i32, z: i32) -> Result<(), ConfigError> {
        self.ensure_not_initialized()?;
        Self::check_positive2((x, z))?;
        self.world_size = (x, z);
        Ok(())
    }

    pub fn set_voxel_size(&mut self, x: f32, y: f32, z: f32) {
        self.voxel_size = (x, y, z);
    }

    pub fn set_texture_steps(&mut self, sx: f32, sz: f32) {
        self.atlas_steps = (sx, sz);
    }

    pub fn set_voxel_list(&mut self, list: Vec<VoxelType>) {
        self.voxel_types = list;
    }

    pub fn set_voxel_mesh(&mut self, templates: Vec<MeshTemplate>) -> Result<(), ConfigError> {
        let count = templates.len();
        let array: MeshTemplateSet = templates.try_into().map_err(|_| ConfigError::MeshTemplateCount(count))?;
        self.mesh_templates = array;
        Ok(())
    }

    pub fn use_default_voxel_mesh(&mut self) {
        self.mesh_templates = default_cube_mesh();
    }

    pub fn set_memory_allocator(&mut self, alloc: AllocFn, free: FreeFn) {
        self.alloc.set_hooks(alloc, free);
    }

    pub fn set_log_callback(&mut self, callback: LogCallback) {
        self.log.set_callback(callback);
    }

    pub fn set_minimum_log_level(&mut self, level: Severity) {
        self.log.set_minimum_level(level);
    }

    // ---- Path helpers ----

    fn properties_path_for(&self, save_path: &Path) -> PathBuf {
        save_path.join(&self.fragments.world).join(&self.fragments.properties)
    }

    fn properties_path(&self) -> PathBuf {
        self.properties_path_for(self.save_path.as_ref().expect("world initialized"))
    }

    fn regions_dir(&self) -> PathBuf {
        self.save_path.as_ref().expect("world initialized").join(&self.fragments.world).join(&self.fragments.regions)
    }

    fn region_header_path(&self, rx: i32, rz: i32) -> PathBuf {
        self.regions_dir().join(format!("{}_{}_{}", self.fragments.header, rx, rz))
    }

    fn region_data_path(&self, rx: i32, rz: i32) -> PathBuf {
        self.regions_dir().join(format!("{}_{}_{}", self.fragments.data, rx, rz))
    }

    fn region_paths_by_index(&self, region_index: usize) -> (PathBuf, PathBuf) {
        let region = self.regions.get(region_index);
        (self.region_header_path(region.rx, region.rz), self.region_data_path(region.rx, region.rz))
    }

    // ---- World properties file (§6) ----

    fn write_properties_file(&self) -> WorldResult<()> {
        let mut buf = Vec::with_capacity(28 + 64);
        let (cx, cy, cz) = self.chunk_size;
        let (rsx, rsz) = self.region_size;
        let (wx, wz) = self.world_size;
        for word in [cx, cy, cz, rsx, rsz, wx, wz] {
            buf.write_le_u32(word as u32).unwrap();
        }
        let fragment_str = format!(
            "{}#{}#{}#{}#{}",
            self.fragments.world, self.fragments.regions, self.fragments.properties, self.fragments.header, self.fragments.data
        );
        buf.extend_from_slice(fragment_str.as_bytes());
        buf.push(0);

        let path = self.properties_path();
        self.io.write_all(&path, &buf, &self.log)?;
        Ok(())
    }

    fn parse_properties_file(bytes: &[u8]) -> Result<((i32, i32, i32), (i32, i32), (i32, i32), NameFragments), ConfigError> {
        if bytes.len() < 28 {
            return Err(ConfigError::PropertiesFileTooShort);
        }

        let mut cursor = Cursor::new(&bytes[0..28]);
        let mut words = [0u32; 7];
        for w in words.iter_mut() {
            *w = cursor.read_le_u32().map_err(|_| ConfigError::PropertiesFileTooShort)?;
        }
        let chunk_size = (words[0] as i32, words[1] as i32, words[2] as i32);
        let region_size = (words[3] as i32, words[4] as i32);
        let world_size = (words[5] as i32, words[6] as i32);

        let rest = &bytes[28..];
        let nul_pos = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        let fragment_str = std::str::from_utf8(&rest[..nul_pos]).map_err(|_| ConfigError::PropertiesFileTooShort)?;
        let parts: Vec<&str> = fragment_str.split('#').collect();
        if parts.len() != 5 {
            return Err(ConfigError::PropertiesFileTooShort);
        }

        let fragments = NameFragments {
            world: parts[0].to_string(),
            regions: parts[1].to_string(),
            properties: parts[2].to_string(),
            header: parts[3].to_string(),
            data: parts[4].to_string(),
        };

        Ok((chunk_size, region_size, world_size, fragments))
    }

    // ---- Lifecycle (§4.6) ----

    /// `force=true` bypasses the "world already exists at this path" check,
    /// overwriting the properties file in place.
    pub fn create_world(&mut self, path: impl AsRef<Path>, force: bool) -> WorldResult<()> {
        self.ensure_not_initialized()?;
        let path = path.as_ref().to_path_buf();
        let props_path = self.properties_path_for(&path);
        if !force && self.io.file_exists(&props_path) {
            return Err(ConfigError::WorldAlreadyExists.into());
        }

        let regions_dir = path.join(&self.fragments.world).join(&self.fragments.regions);
        self.io.ensure_dir(&regions_dir, &self.log)?;

        self.save_path = Some(path);
        self.write_properties_file()?;

        let (wx, wz) = self.world_size;
        self.slots = (0..(wx as i64 * wz as i64) as usize).map(|_| Chunk::empty_slot()).collect();
        self.slot_index.clear();
        self.regions = RegionDir::new();
        self.initialized = true;
        Ok(())
    }

    pub fn load_world(&mut self, file_path: impl AsRef<Path>) -> WorldResult<()> {
        self.ensure_not_initialized()?;
        let file_path = file_path.as_ref();
        let bytes = self.io.read_all(file_path, &self.log)?;
        let (chunk_size, region_size, world_size, fragments) = Self::parse_properties_file(&bytes)?;

        let save_path = file_path
            .parent()
            .and_then(Path::parent)
            .ok_or(ConfigError::PropertiesPathMismatch)?
            .to_path_buf();

        self.fragments = fragments;
        let canonical = self.properties_path_for(&save_path);
        if canonical != file_path {
            self.log.error(
                "world",
                format!("world file {} does not match canonical path {}", file_path.display(), canonical.display()),
            );
            return Err(ConfigError::PropertiesPathMismatch.into());
        }

        self.chunk_size = chunk_size;
        self.region_size = region_size;
        self.world_size = world_size;
        self.save_path = Some(save_path);

        let (wx, wz) = self.world_size;
        self.slots = (0..(wx as i64 * wz as i64) as usize).map(|_| Chunk::empty_slot()).collect();
        self.slot_index.clear();
        self.regions = RegionDir::new();
        self.initialized = true;
        Ok(())
    }

    /// Pure existence test on the canonical world-properties path, not
    /// gated by `is_initialized` — a caller must be able to answer this
    /// before deciding between `create_world` and `load_world`.
    pub fn is_world_exist(&self, path: impl AsRef<Path>) -> bool {
        self.io.file_exists(&self.properties_path_for(path.as_ref()))
    }

    pub fn save_world(&mut self) -> WorldResult<()> {
        self.ensure_initialized()?;
        for index in 0..self.slots.len() {
            if self.slots[index].exists && self.slots[index].modified {
                self.save_chunk(index)?;
            }
        }
        Ok(())
    }

    pub fn unload_world(&mut self) -> WorldResult<()> {
        self.ensure_initialized()?;
        self.slots.clear();
        self.slot_index.clear();
        self.regions.clear();
        self.initialized = false;
        self.save_path = None;
        Ok(())
    }

    // ---- Chunk operations (§4.4) ----

    pub fn spawn_chunk(&mut self, cx: i32, cz: i32) -> WorldResult<usize> {
        self.ensure_initialized()?;

        if self.slot_index.contains_key(&(cx, cz)) {
            return Err(ConfigError::AlreadySpawned(cx, cz).into());
        }

        let slot = self.slots.iter().position(|c| !c.exists).ok_or(ConfigError::PoolFull)?;

        let (rsx, rsz) = self.region_size;
        let rx = floor_div(cx, rsx);
        let rz = floor_div(cz, rsz);
        let header_path = self.region_header_path(rx, rz);
        let region_index = self.regions.ensure(&self.io, &header_path, rx, rz, &self.log)?;
        let entry_index = self.regions.get(region_index).find_entry(cx, cz);

        let (size_x, size_y, size_z) = self.chunk_size;
        let voxel_count = (size_x as i64 * size_y as i64 * size_z as i64) as usize;

        {
            let chunk = &mut self.slots[slot];
            chunk.pos_x = cx;
            chunk.pos_z = cz;
            chunk.region_entry = Some(RegionEntryRef { region_index, entry_index });
            chunk.modified = false;

            if chunk.voxels.is_none() {
                chunk.voxels = Some(self.alloc.alloc_voxel_buffer(voxel_count));
                chunk.allocated = true;
            }
        }

        if let Some(entry_index) = entry_index {
            let data_path = self.region_data_path(rx, rz);
            let bytes = self.regions.get(region_index).load_entry(&self.io, &data_path, entry_index, &self.log)?;
            let decoded = rle::decode(&bytes, voxel_count, &self.log, "world");

            let chunk = &mut self.slots[slot];
            let buf = chunk.voxels.as_mut().expect("just allocated above");
            buf.copy_from_slice(&decoded);
        }

        self.slots[slot].exists = true;
        self.slot_index.insert((cx, cz), slot);
        Ok(slot)
    }

    pub fn save_chunk(&mut self, slot: usize) -> WorldResult<()> {
        self.ensure_initialized()?;

        let chunk = self.slots.get(slot).ok_or(ConfigError::ChunkNotLoaded(slot))?;
        if !chunk.exists {
            return Err(ConfigError::ChunkNotLoaded(slot).into());
        }
        if !chunk.modified {
            return Ok(());
        }

        let region_ref = chunk.region_entry.expect("spawned chunk always has a resolved region");
        let voxels = chunk.voxels.as_ref().expect("spawned chunk always has an allocated buffer");
        let payload = rle::encode_to_bytes(voxels);
        let (pos_x, pos_z) = (chunk.pos_x, chunk.pos_z);

        let (header_path, data_path) = self.region_paths_by_index(region_ref.region_index);

        let saved_index = match region_ref.entry_index {
            None => self.regions.get_mut(region_ref.region_index).save_new_entry(
                &self.io,
                &header_path,
                &data_path,
                pos_x,
                pos_z,
                &payload,
                &self.log,
            )?,
            Some(existing) => {
                self.regions.get_mut(region_ref.region_index).overwrite_entry(
                    &self.io,
                    &header_path,
                    &data_path,
                    existing,
                    &payload,
                    &self.log,
                )?;
                existing
            }
        };

        let chunk = &mut self.slots[slot];
        chunk.region_entry = Some(RegionEntryRef { region_index: region_ref.region_index, entry_index: Some(saved_index) });
        chunk.modified = false;
        Ok(())
    }

    pub fn unload_chunk(&mut self, slot: usize, save_first: bool) -> WorldResult<()> {
        self.ensure_initialized()?;
        if save_first {
            self.save_chunk(slot)?;
        }

        let chunk = self.slots.get_mut(slot).ok_or(ConfigError::ChunkNotLoaded(slot))?;
        if !chunk.exists {
            return Err(ConfigError::ChunkNotLoaded(slot).into());
        }
        self.slot_index.remove(&(chunk.pos_x, chunk.pos_z));
        chunk.exists = false;
        Ok(())
    }

    pub fn get_chunk_ptr(&mut self, slot: usize) -> Option<&mut Chunk> {
        match self.slots.get(slot) {
            Some(chunk) if chunk.exists => self.slots.get_mut(slot),
            _ => None,
        }
    }

    // ---- Voxel operations (§4.4, §4.5) ----

    pub fn get_voxel_local_pos(&self, gx: i32, gy: i32, gz: i32) -> LocalVoxelPos {
        global_to_local(self.chunk_size.0, self.chunk_size.2, gx, gy, gz)
    }

    pub fn get_voxel_global_pos(&self, local: LocalVoxelPos) -> (i32, i32, i32) {
        local_to_global(self.chunk_size.0, self.chunk_size.2, local)
    }

    pub fn get_voxel_index(&self, gx: i32, gy: i32, gz: i32) -> VoxelId {
        let local = self.get_voxel_local_pos(gx, gy, gz);
        match self.slot_index.get(&(local.chunk_x, local.chunk_z)) {
            Some(&slot) => self.slots[slot].get_voxel(self.chunk_size, (local.local_x, local.local_y, local.local_z)),
            None => EMPTY_VOXEL,
        }
    }

    pub fn generate_chunk_mesh(&mut self, slot: usize, out: &mut MeshBuffers) -> WorldResult<()> {
        self.ensure_initialized()?;
        if !self.slots.get(slot).map(|c| c.exists).unwrap_or(false) {
            return Err(ConfigError::ChunkNotLoaded(slot).into());
        }

        let visible = {
            let chunk = &self.slots[slot];
            mesh::generate_chunk_mesh(
                chunk,
                self.chunk_size,
                &self.mesh_templates,
                &self.voxel_types,
                self.voxel_size,
                self.atlas_steps,
                &*self,
                out,
                &self.log,
            )
        };

        self.slots[slot].visible_voxels = visible;
        Ok(())
    }

    // ---- Queries ----

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn get_chunk_size(&self) -> (i32, i32, i32) {
        self.chunk_size
    }

    pub fn get_voxel_size(&self) -> (f32, f32, f32) {
        self.voxel_size
    }
}

impl NeighborLookup for World {
    fn voxel_at(&self, gx: i32, gy: i32, gz: i32) -> VoxelId {
        self.get_voxel_index(gx, gy, gz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_world() -> World {
        let mut world = World::new();
        world.set_chunk_voxel_size(4, 4, 4).unwrap();
        world.set_region_size(4, 4).unwrap();
        world.set_world_size(4, 4).unwrap();
        world.set_texture_steps(0.5, 0.5);
        world.set_voxel_list(vec![
            VoxelType { uid: 0, name: "stone".into(), atlas_cell: (0, 0), flags: 0 },
            VoxelType { uid: 1, name: "dirt".into(), atlas_cell: (1, 0), flags: 0 },
        ]);
        world
    }

    #[test]
    fn single_voxel_mesh_matches_s1() {
        let tmp = tempdir().unwrap();
        let mut world = small_world();
        world.create_world(tmp.path(), false).unwrap();

        let slot = world.spawn_chunk(0, 0).unwrap();
        {
            let chunk = world.get_chunk_ptr(slot).unwrap();
            chunk.set_voxel((4, 4, 4), (0, 0, 0), 0);
            chunk.modified = true;
        }

        let mut mesh = MeshBuffers::default();
        world.generate_chunk_mesh(slot, &mut mesh).unwrap();

        assert_eq!(mesh.vertex_count(), 36);
        let chunk = world.get_chunk_ptr(slot).unwrap();
        assert_eq!(chunk.visible_voxels, 1);
    }

    #[test]
    fn spawn_chunk_twice_fails_already_spawned() {
        let tmp = tempdir().unwrap();
        let mut world = small_world();
        world.create_world(tmp.path(), false).unwrap();
        world.spawn_chunk(0, 0).unwrap();
        let err = world.spawn_chunk(0, 0).unwrap_err();
        assert!(matches!(err, WorldError::Config(ConfigError::AlreadySpawned(0, 0))));
    }

    #[test]
    fn structural_setters_are_frozen_after_create() {
        let tmp = tempdir().unwrap();
        let mut world = small_world();
        world.create_world(tmp.path(), false).unwrap();
        let err = world.set_chunk_voxel_size(8, 8, 8).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyInitialized));
        assert_eq!(world.get_chunk_size(), (4, 4, 4));
    }

    #[test]
    fn persistence_round_trip_matches_s6() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().to_path_buf();

        let mut world = small_world();
        world.create_world(&path, false).unwrap();

        let slot_a = world.spawn_chunk(0, 0).unwrap();
        {
            let chunk = world.get_chunk_ptr(slot_a).unwrap();
            chunk.set_voxel((4, 4, 4), (1, 2, 3), 1);
            chunk.modified = true;
        }
        let slot_b = world.spawn_chunk(5, 7).unwrap();
        {
            let chunk = world.get_chunk_ptr(slot_b).unwrap();
            chunk.set_voxel((4, 4, 4), (0, 0, 0), 0);
            chunk.modified = true;
        }

        world.save_world().unwrap();
        let props_path = world.properties_path();
        world.unload_world().unwrap();

        let mut reloaded = small_world();
        reloaded.load_world(&props_path).unwrap();

        let slot_a2 = reloaded.spawn_chunk(0, 0).unwrap();
        let chunk_a2 = reloaded.get_chunk_ptr(slot_a2).unwrap();
        assert_eq!(chunk_a2.get_voxel((4, 4, 4), (1, 2, 3)), 1);

        let slot_b2 = reloaded.spawn_chunk(5, 7).unwrap();
        let chunk_b2 = reloaded.get_chunk_ptr(slot_b2).unwrap();
        assert_eq!(chunk_b2.get_voxel((4, 4, 4), (0, 0, 0)), 0);

        let rx = floor_div(5, 4);
        let rz = floor_div(7, 4);
        assert_eq!((rx, rz), (1, 1));
    }

    #[test]
    fn is_world_exist_does_not_require_initialization() {
        let tmp = tempdir().unwrap();
        let world = small_world();
        assert!(!world.is_world_exist(tmp.path()));

        let mut creator = small_world();
        creator.create_world(tmp.path(), false).unwrap();
        assert!(world.is_world_exist(tmp.path()));
    }

    #[test]
    fn create_world_twice_without_force_fails() {
        let tmp = tempdir().unwrap();
        let mut world = small_world();
        world.create_world(tmp.path(), false).unwrap();
        world.unload_world().unwrap();

        let mut second = small_world();
        let err = second.create_world(tmp.path(), false).unwrap_err();
        assert!(matches!(err, WorldError::Config(ConfigError::WorldAlreadyExists)));

        let mut third = small_world();
        third.create_world(tmp.path(), true).unwrap();
    }

    #[test]
    fn unload_then_spawn_round_trips_saved_buffer() {
        let tmp = tempdir().unwrap();
        let mut world = small_world();
        world.create_world(tmp.path(), false).unwrap();

        let slot = world.spawn_chunk(2, 2).unwrap();
        {
            let chunk = world.get_chunk_ptr(slot).unwrap();
            chunk.set_voxel((4, 4, 4), (3, 3, 3), 1);
            chunk.modified = true;
        }
        world.save_chunk(slot).unwrap();
        world.unload_chunk(slot, false).unwrap();

        let slot2 = world.spawn_chunk(2, 2).unwrap();
        let chunk2 = world.get_chunk_ptr(slot2).unwrap();
        assert_eq!(chunk2.get_voxel((4, 4, 4), (3, 3, 3)), 1);
    }

    #[test]
    fn spawning_an_unsaved_position_into_a_reused_slot_clears_modified() {
        let tmp = tempdir().unwrap();
        let mut world = small_world();
        world.create_world(tmp.path(), false).unwrap();

        let slot = world.spawn_chunk(0, 0).unwrap();
        {
            let chunk = world.get_chunk_ptr(slot).unwrap();
            chunk.set_voxel((4, 4, 4), (0, 0, 0), 1);
            chunk.modified = true;
        }
        // Discard without saving: the slot struct keeps `modified == true`.
        world.unload_chunk(slot, false).unwrap();

        // Reuse the same slot for a position with no saved region entry.
        let slot2 = world.spawn_chunk(1, 1).unwrap();
        assert_eq!(slot, slot2);
        let chunk2 = world.get_chunk_ptr(slot2).unwrap();
        assert!(!chunk2.modified, "freshly spawned unsaved chunk must not be marked modified");
    }
}
