//! `voxelstore` — an embeddable persistence engine and face-culled mesher
//! for chunked voxel worlds.
//!
//! A [`world::World`] owns a fixed-capacity pool of in-memory chunks, a
//! growable list of on-disk regions (each a header/data file pair), and the
//! configuration that governs their sizes. Chunks are compressed with a
//! run-length encoding codec before being written to a region's data file;
//! region headers track each chunk's byte range and are kept consistent
//! across appends and in-place rewrites. A separate mesh generator walks a
//! loaded chunk's voxels and emits a face-culled triangle mesh, consulting
//! neighboring chunks (in the same or adjacent regions) to suppress
//! interior faces at chunk borders.
//!
//! Logging and memory allocation are ambient capabilities supplied by the
//! embedding host at construction time rather than assumed process-wide
//! facilities — see [`log::LogSink`] and [`alloc::Allocator`].

pub mod alloc;
pub mod chunk;
pub mod error;
pub mod io;
pub mod log;
pub mod mesh;
pub mod region;
pub mod rle;
pub mod voxel;
pub mod world;

pub use alloc::{AllocFn, FreeFn};
pub use chunk::{Chunk, LocalVoxelPos};
pub use error::{ConfigError, IoError, RegionError, WorldError, WorldResult};
pub use log::{LogCallback, Severity};
pub use mesh::MeshBuffers;
pub use voxel::{MeshTemplate, VoxelId, VoxelType, EMPTY_VOXEL};
pub use world::World;
