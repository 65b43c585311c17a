//! Error types for every layer of the crate, composed the way the binary I/O
//! layer's errors flow up into region errors and then into world errors:
//! leaf variants wrap the layer below via `#[from]`, callers match on the
//! top-level [`WorldError`] unless they're talking to a single layer
//! directly (e.g. testing the region store in isolation).

use std::io;

/// Errors from the binary I/O layer (§4.1).
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("io: {0}")]
    Std(#[from] io::Error),
    #[error("append_at offset {offset} is out of bounds for file of size {file_size}")]
    SeekOutOfBounds { offset: i64, file_size: u64 },
    #[error("read_at requested {requested} bytes at offset {offset} but only {available} were available")]
    ShortRead { offset: i64, requested: usize, available: usize },
}

/// Errors from the region store (§4.3).
#[derive(thiserror::Error, Debug)]
pub enum RegionError {
    #[error("io: {0}")]
    Io(#[from] IoError),
    #[error("region header size {0} bytes is not `16 + 24*n`")]
    HeaderSizeInvalid(u64),
    #[error("no entry found for chunk ({0}, {1}) in this region")]
    EntryNotFound(i32, i32),
    #[error("entry index {0} is out of range for this region's entry list")]
    EntryIndexInvalid(usize),
}

/// Errors from configuration and chunk-lifecycle operations (§4.4, §4.6, §7).
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("size components must all be strictly positive, got {0:?}")]
    NotPositive((i64, i64, i64)),
    #[error("structural setter called after world initialization")]
    AlreadyInitialized,
    #[error("world properties file already exists at this path")]
    WorldAlreadyExists,
    #[error("world is not initialized")]
    NotInitialized,
    #[error("chunk slot pool is full, no free slot for a new chunk")]
    PoolFull,
    #[error("chunk ({0}, {1}) is already spawned")]
    AlreadySpawned(i32, i32),
    #[error("chunk slot {0} is not loaded (exists=false)")]
    ChunkNotLoaded(usize),
    #[error("set_voxel_mesh requires exactly 7 templates, got {0}")]
    MeshTemplateCount(usize),
    #[error("world properties file is too short to contain the 7-word header")]
    PropertiesFileTooShort,
    #[error("world file path does not match the canonical world properties location")]
    PropertiesPathMismatch,
}

/// Top level error returned by every [`crate::world::World`] operation.
#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    #[error("io: {0}")]
    Io(#[from] IoError),
    #[error("region: {0}")]
    Region(#[from] RegionError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

pub type IoResult<T> = Result<T, IoError>;
pub type RegionResult<T> = Result<T, RegionError>;
pub type WorldResult<T> = Result<T, WorldError>;
