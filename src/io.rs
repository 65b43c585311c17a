//! The binary I/O layer (§4.1): raw file primitives that every higher layer
//! routes through, each serialized against the others by one instance-scoped
//! lock (§5, §9 — the source's lock is a member of the owning instance, not
//! a process global; we keep that shape rather than promoting it to a
//! `static`, since nothing in this spec requires coordination across
//! independent library instances).

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::error::IoError;
use crate::log::LogSink;

/// Sentinel offset meaning "the end of the file" for [`BinaryIo::append_at`],
/// and "the start of the file" for [`BinaryIo::read_at`].
pub const SENTINEL_MAX_OFFSET: i64 = i64::MAX;

/// Owns the single I/O mutex this library instance serializes all file
/// operations through.
#[derive(Default)]
pub struct BinaryIo {
    lock: Mutex<()>,
}

impl BinaryIo {
    pub fn file_exists(&self, path: &Path) -> bool {
        let _guard = self.lock.lock().unwrap();
        path.is_file()
    }

    pub fn create_empty(&self, path: &Path, log: &LogSink) -> Result<(), IoError> {
        let _guard = self.lock.lock().unwrap();
        File::create(path).map(|_| ()).map_err(|err| self.log_err("create_empty", path, err, log))
    }

    /// Creates `path` and any missing parent directories (used for the
    /// `<folder>/World/Regions/` skeleton, §4.6).
    pub fn ensure_dir(&self, path: &Path, log: &LogSink) -> Result<(), IoError> {
        let _guard = self.lock.lock().unwrap();
        fs::create_dir_all(path).map_err(|err| self.log_err("ensure_dir", path, err, log))
    }

    pub fn write_all(&self, path: &Path, bytes: &[u8], log: &LogSink) -> Result<(), IoError> {
        let _guard = self.lock.lock().unwrap();
        (|| -> std::io::Result<()> {
            let mut file = File::create(path)?;
            file.write_all(bytes)?;
            Ok(())
        })()
        .map_err(|err| self.log_err("write_all", path, err, log))
    }

    /// Opens for read+write; `offset == SENTINEL_MAX_OFFSET` appends at the
    /// end, otherwise seeks to `offset` and overwrites in place. Fails
    /// unless `0 <= offset <= file_size`.
    pub fn append_at(&self, path: &Path, bytes: &[u8], offset: i64, log: &LogSink) -> Result<(), IoError> {
        let _guard = self.lock.lock().unwrap();
        let result = (|| -> Result<(), IoError> {
            let mut file = OpenOptions::new().read(true).write(true).create(true).open(path)?;
            let file_size = file.metadata()?.len();

            if offset == SENTINEL_MAX_OFFSET {
                file.seek(SeekFrom::End(0))?;
            } else {
                if offset < 0 || offset as u64 > file_size {
                    return Err(IoError::SeekOutOfBounds { offset, file_size });
                }
                file.seek(SeekFrom::Start(offset as u64))?;
            }

            file.write_all(bytes)?;
            Ok(())
        })();

        result.map_err(|err| self.log_io_error("append_at", path, err, log))
    }

    /// Reads exactly `size` bytes at `offset` (or from position 0 if
    /// `offset == SENTINEL_MAX_OFFSET`). Fails if fewer bytes are available.
    pub fn read_at(&self, path: &Path, size: usize, offset: i64, log: &LogSink) -> Result<Vec<u8>, IoError> {
        let _guard = self.lock.lock().unwrap();
        let result = (|| -> Result<Vec<u8>, IoError> {
            let mut file = File::open(path)?;
            let file_size = file.metadata()?.len();

            let start = if offset == SENTINEL_MAX_OFFSET { 0 } else { offset as u64 };
            let available = file_size.saturating_sub(start) as usize;
            if available < size {
                return Err(IoError::ShortRead { offset, requested: size, available });
            }

            file.seek(SeekFrom::Start(start))?;
            let mut buf = vec![0u8; size];
            file.read_exact(&mut buf)?;
            Ok(buf)
        })();

        result.map_err(|err| self.log_io_error("read_at", path, err, log))
    }

    pub fn read_all(&self, path: &Path, log: &LogSink) -> Result<Vec<u8>, IoError> {
        let _guard = self.lock.lock().unwrap();
        fs::read(path).map_err(|err| self.log_err("read_all", path, err, log))
    }

    /// Returns the bytes before `hole_offset` and the bytes after
    /// `hole_offset + hole_size`; either half may be empty.
    pub fn read_with_hole(
        &self,
        path: &Path,
        hole_offset: i64,
        hole_size: i64,
        log: &LogSink,
    ) -> Result<(Vec<u8>, Vec<u8>), IoError> {
        let _guard = self.lock.lock().unwrap();
        let result = (|| -> Result<(Vec<u8>, Vec<u8>), IoError> {
            let mut file = File::open(path)?;
            let file_size = file.metadata()?.len();

            let hole_offset = hole_offset.max(0) as u64;
            let hole_end = hole_offset.saturating_add(hole_size.max(0) as u64);

            file.seek(SeekFrom::Start(0))?;
            let mut before = vec![0u8; hole_offset.min(file_size) as usize];
            file.read_exact(&mut before)?;

            let after_start = hole_end.min(file_size);
            file.seek(SeekFrom::Start(after_start))?;
            let mut after = Vec::new();
            file.read_to_end(&mut after)?;

            Ok((before, after))
        })();

        result.map_err(|err| self.log_io_error("read_with_hole", path, err, log))
    }

    fn log_err(&self, op: &str, path: &Path, err: std::io::Error, log: &LogSink) -> IoError {
        self.log_io_error(op, path, IoError::Std(err), log)
    }

    fn log_io_error(&self, op: &str, path: &Path, err: IoError, log: &LogSink) -> IoError {
        log.error("io", format!("{op} failed for {}: {err}", path.display()));
        err
    }
}

/// Little-endian word extension trait used for the world-properties file
/// and the region header, both specified as little-endian in §6 — this
/// mirrors the shape of the teacher's `ReadJavaExt`/`WriteJavaExt`
/// (big-endian, Minecraft's wire format) with the endianness this spec
/// actually calls for.
pub trait LeIoExt: Read {
    #[inline]
    fn read_le_u32(&mut self) -> std::io::Result<u32> {
        ReadBytesExt::read_u32::<LE>(self)
    }

    #[inline]
    fn read_le_i64(&mut self) -> std::io::Result<i64> {
        ReadBytesExt::read_i64::<LE>(self)
    }
}

pub trait WriteLeIoExt: Write {
    #[inline]
    fn write_le_u32(&mut self, v: u32) -> std::io::Result<()> {
        WriteBytesExt::write_u32::<LE>(self, v)
    }

    #[inline]
    fn write_le_i64(&mut self, v: i64) -> std::io::Result<()> {
        WriteBytesExt::write_i64::<LE>(self, v)
    }
}

impl<R: Read> LeIoExt for R {}
impl<W: Write> WriteLeIoExt for W {}
