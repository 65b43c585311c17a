//! The region store (§4.3): one region's header (entry list) and the two
//! write operations that keep it consistent with the region's data file.
//!
//! This mirrors the shape of the teacher's `RegionDir`/`Region` split in
//! its Minecraft region-file reader (`RegionDir` caches open regions keyed
//! by `(RX, RZ)`, `Region` owns one region's metadata and mediates reads
//! and writes) — but the on-disk format itself is this spec's two-file
//! header/data layout rather than the Minecraft `.mcr` single-file sector
//! allocator, and compression is the RLE codec from [`crate::rle`] rather
//! than zlib.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use crate::error::RegionError;
use crate::io::{BinaryIo, LeIoExt, WriteLeIoExt, SENTINEL_MAX_OFFSET};
use crate::log::LogSink;

/// One region-entry record: a chunk's byte range within the region's data
/// file (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEntry {
    pub pos_x: i32,
    pub pos_z: i32,
    pub offset: i64,
    pub size: i64,
}

fn split_i64(v: i64) -> (u32, u32) {
    let bits = v as u64;
    ((bits >> 32) as u32, bits as u32)
}

fn join_i64(hi: u32, lo: u32) -> i64 {
    (((hi as u64) << 32) | lo as u64) as i64
}

/// One region's in-memory header state: coordinates, entry list, and the
/// running end-of-file offset into the data file (§3, §4.3).
#[derive(Debug, Clone)]
pub struct Region {
    pub rx: i32,
    pub rz: i32,
    pub entries: Vec<RegionEntry>,
    pub eof_offset: i64,
}

impl Region {
    fn empty(rx: i32, rz: i32) -> Self {
        Self { rx, rz, entries: Vec::new(), eof_offset: 0 }
    }

    /// Load a region's header from disk if present; an absent header means
    /// an empty region (§4.3 — the header is never written until the
    /// region has data, so a loader doesn't have to distinguish "no file"
    /// from "empty region").
    pub fn load(io: &BinaryIo, header_path: &Path, rx: i32, rz: i32, log: &LogSink) -> Result<Self, RegionError> {
        if !io.file_exists(header_path) {
            return Ok(Self::empty(rx, rz));
        }

        let bytes = io.read_all(header_path, log)?;
        if bytes.len() < 16 || (bytes.len() - 16) % 24 != 0 {
            log.error("region", format!("header {} has invalid size {}", header_path.display(), bytes.len()));
            return Err(RegionError::HeaderSizeInvalid(bytes.len() as u64));
        }

        let mut cursor = Cursor::new(bytes.as_slice());
        let file_rx = cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))? as i32;
        let file_rz = cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))? as i32;
        let eof_hi = cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))?;
        let eof_lo = cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))?;
        let eof_offset = join_i64(eof_hi, eof_lo);

        if (file_rx, file_rz) != (rx, rz) {
            log.warning("region", format!("header at {} claims ({file_rx},{file_rz}) but was opened as ({rx},{rz})", header_path.display()));
        }

        let entry_count = (bytes.len() - 16) / 24;
        let mut entries = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            let pos_x = cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))? as i32;
            let pos_z = cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))? as i32;
            let offset = join_i64(
                cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))?,
                cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))?,
            );
            let size = join_i64(
                cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))?,
                cursor.read_le_u32().map_err(|e| RegionError::Io(e.into()))?,
            );
            entries.push(RegionEntry { pos_x, pos_z, offset, size });
        }

        Ok(Self { rx: file_rx, rz: file_rz, entries, eof_offset })
    }

    /// Serialize the current header and truncate-write it to disk.
    pub fn save_header(&self, io: &BinaryIo, header_path: &Path, log: &LogSink) -> Result<(), RegionError> {
        let mut buf = Vec::with_capacity(16 + self.entries.len() * 24);
        buf.write_le_u32(self.rx as u32).unwrap();
        buf.write_le_u32(self.rz as u32).unwrap();
        let (hi, lo) = split_i64(self.eof_offset);
        buf.write_le_u32(hi).unwrap();
        buf.write_le_u32(lo).unwrap();
        for e in &self.entries {
            buf.write_le_u32(e.pos_x as u32).unwrap();
            buf.write_le_u32(e.pos_z as u32).unwrap();
            let (ohi, olo) = split_i64(e.offset);
            buf.write_le_u32(ohi).unwrap();
            buf.write_le_u32(olo).unwrap();
            let (shi, slo) = split_i64(e.size);
            buf.write_le_u32(shi).unwrap();
            buf.write_le_u32(slo).unwrap();
        }
        io.write_all(header_path, &buf, log)?;
        Ok(())
    }

    pub fn find_entry(&self, pos_x: i32, pos_z: i32) -> Option<usize> {
        self.entries.iter().position(|e| e.pos_x == pos_x && e.pos_z == pos_z)
    }

    /// Append a new chunk's payload: new entry at `eof_offset`, header
    /// saved, payload appended to the data file. Returns the new entry
    /// index.
    pub fn save_new_entry(
        &mut self,
        io: &BinaryIo,
        header_path: &Path,
        data_path: &Path,
        pos_x: i32,
        pos_z: i32,
        payload: &[u8],
        log: &LogSink,
    ) -> Result<usize, RegionError> {
        let entry = RegionEntry { pos_x, pos_z, offset: self.eof_offset, size: payload.len() as i64 };
        self.entries.push(entry);
        self.eof_offset += entry.size;

        self.save_header(io, header_path, log)?;

        if !io.file_exists(data_path) {
            io.create_empty(data_path, log)?;
        }
        io.append_at(data_path, payload, SENTINEL_MAX_OFFSET, log)?;

        Ok(self.entries.len() - 1)
    }

    /// Overwrite an existing entry with a (possibly differently-sized)
    /// payload, shifting every trailing entry's offset by the size delta
    /// (§4.3). This is the corrected behavior the spec calls out over the
    /// source's defective double zero-length `memcpy`: a full
    /// before/payload/after rewrite of the data file.
    pub fn overwrite_entry(
        &mut self,
        io: &BinaryIo,
        header_path: &Path,
        data_path: &Path,
        index: usize,
        payload: &[u8],
        log: &LogSink,
    ) -> Result<(), RegionError> {
        let old_entry = *self.entries.get(index).ok_or(RegionError::EntryIndexInvalid(index))?;
        let new_size = payload.len() as i64;
        let delta = new_size - old_entry.size;

        self.entries[index].size = new_size;
        for e in self.entries.iter_mut().skip(index + 1) {
            e.offset += delta;
        }
        self.eof_offset += delta;

        self.save_header(io, header_path, log)?;

        let (before, after) = io.read_with_hole(data_path, old_entry.offset, old_entry.size, log)?;
        let mut rewritten = Vec::with_capacity(before.len() + payload.len() + after.len());
        rewritten.extend_from_slice(&before);
        rewritten.extend_from_slice(payload);
        rewritten.extend_from_slice(&after);
        io.write_all(data_path, &rewritten, log)?;

        Ok(())
    }

    /// Positioned read of an entry's payload from the data file.
    pub fn load_entry(&self, io: &BinaryIo, data_path: &Path, index: usize, log: &LogSink) -> Result<Vec<u8>, RegionError> {
        let entry = *self.entries.get(index).ok_or(RegionError::EntryIndexInvalid(index))?;
        let bytes = io.read_at(data_path, entry.size as usize, entry.offset, log)?;
        Ok(bytes)
    }
}

/// Cache of loaded regions keyed by `(RX, RZ)`, grounded on the teacher's
/// `RegionDir`. Path construction (which depends on the world's
/// configurable filename fragments, §6) stays the caller's responsibility;
/// this cache only tracks which regions are already resident and at what
/// index, preserving the arena-index addressing the spec's design notes
/// (§9) prefer over borrowed pointers.
#[derive(Default)]
pub struct RegionDir {
    regions: Vec<Region>,
    index: HashMap<(i32, i32), usize>,
}

impl RegionDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `(rx, rz)` to a region index, loading its header from
    /// `header_path` on first reference.
    pub fn ensure(&mut self, io: &BinaryIo, header_path: &Path, rx: i32, rz: i32, log: &LogSink) -> Result<usize, RegionError> {
        if let Some(&index) = self.index.get(&(rx, rz)) {
            return Ok(index);
        }
        let region = Region::load(io, header_path, rx, rz, log)?;
        let index = self.regions.len();
        self.regions.push(region);
        self.index.insert((rx, rz), index);
        Ok(index)
    }

    pub fn get(&self, index: usize) -> &Region {
        &self.regions[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Region {
        &mut self.regions[index]
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn paths(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        (dir.join("RegionHeader_0_0"), dir.join("RegionData_0_0"))
    }

    #[test]
    fn grow_then_save_increases_data_file_by_exact_delta() {
        let tmp = tempdir().unwrap();
        let (header, data) = paths(tmp.path());
        let io = BinaryIo::default();
        let log = LogSink::default();

        let mut region = Region::load(&io, &header, 0, 0, &log).unwrap();
        let small = vec![1u8, 2, 3, 4, 5, 6, 7, 8]; // one RLE pair.
        let idx = region.save_new_entry(&io, &header, &data, 0, 0, &small, &log).unwrap();
        assert_eq!(idx, 0);

        let bigger = vec![9u8; 24]; // three RLE pairs: broke a run.
        region.overwrite_entry(&io, &header, &data, idx, &bigger, &log).unwrap();

        assert_eq!(region.entries[0].size, 24);
        let data_bytes = io.read_all(&data, &log).unwrap();
        assert_eq!(data_bytes.len(), 24);
        assert_eq!(region.eof_offset, 24);
    }

    #[test]
    fn shift_on_overwrite_preserves_trailing_entry_contents() {
        let tmp = tempdir().unwrap();
        let (header, data) = paths(tmp.path());
        let io = BinaryIo::default();
        let log = LogSink::default();

        let mut region = Region::load(&io, &header, 0, 0, &log).unwrap();
        let payload0 = vec![1u8; 8];
        let payload1 = vec![2u8; 16];
        let i0 = region.save_new_entry(&io, &header, &data, 0, 0, &payload0, &log).unwrap();
        let i1 = region.save_new_entry(&io, &header, &data, 1, 0, &payload1, &log).unwrap();

        assert_eq!(region.entries[i0].offset, 0);
        assert_eq!(region.entries[i1].offset, 8);

        let grown0 = vec![3u8; 40];
        region.overwrite_entry(&io, &header, &data, i0, &grown0, &log).unwrap();

        assert_eq!(region.entries[i1].offset, 40);
        assert_eq!(io.read_all(&data, &log).unwrap().len(), 40 + 16);

        let reloaded = region.load_entry(&io, &data, i1, &log).unwrap();
        assert_eq!(reloaded, payload1);
    }

    #[test]
    fn header_round_trips_through_disk() {
        let tmp = tempdir().unwrap();
        let (header, data) = paths(tmp.path());
        let io = BinaryIo::default();
        let log = LogSink::default();

        let mut region = Region::load(&io, &header, 3, -2, &log).unwrap();
        region.save_new_entry(&io, &header, &data, 5, 7, &[1, 2, 3, 4, 5, 6, 7, 8], &log).unwrap();

        let reloaded = Region::load(&io, &header, 3, -2, &log).unwrap();
        assert_eq!(reloaded.rx, 3);
        assert_eq!(reloaded.rz, -2);
        assert_eq!(reloaded.entries.len(), 1);
        assert_eq!(reloaded.entries[0], RegionEntry { pos_x: 5, pos_z: 7, offset: 0, size: 8 });
        assert_eq!(reloaded.eof_offset, 8);
    }

    #[test]
    fn absent_header_file_is_not_created_until_there_is_data() {
        let tmp = tempdir().unwrap();
        let (header, _data) = paths(tmp.path());
        let io = BinaryIo::default();
        let log = LogSink::default();

        let region = Region::load(&io, &header, 0, 0, &log).unwrap();
        assert!(region.entries.is_empty());
        assert!(!io.file_exists(&header));
    }

    #[test]
    fn region_dir_caches_by_coordinate() {
        let tmp = tempdir().unwrap();
        let io = BinaryIo::default();
        let log = LogSink::default();
        let mut dir = RegionDir::new();

        let header = tmp.path().join("RegionHeader_0_0");
        let a = dir.ensure(&io, &header, 0, 0, &log).unwrap();
        let b = dir.ensure(&io, &header, 0, 0, &log).unwrap();
        assert_eq!(a, b);
        assert_eq!(dir.len(), 1);
    }
}
