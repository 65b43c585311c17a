//! The run-length encoding codec for a chunk's flat voxel array (§4.2).
//!
//! Encoding never fails. Decoding never fails either — by design, per the
//! spec's explicit deviation from the source it's modeled on: a malformed
//! payload (wrong length, too many voxels) is reported through the log
//! sink rather than as a `Result`, and the decoder always returns a buffer
//! of exactly the requested length, pre-cleared to the empty sentinel so a
//! short payload's tail is well-defined (unlike the source, which leaves
//! the tail of the destination buffer untouched).

use crate::log::LogSink;
use crate::voxel::{VoxelId, EMPTY_VOXEL};

/// One `(run_length, voxel_id)` record; serialized as two 32-bit
/// little-endian words.
pub type RunPair = (u32, VoxelId);

const PAIR_BYTES: usize = 8;

/// Encode a flat voxel array into a run-length pair sequence. The empty
/// sentinel participates like any other id — empty runs are encoded the
/// same way.
pub fn encode(voxels: &[VoxelId]) -> Vec<RunPair> {
    let mut pairs: Vec<RunPair> = Vec::new();
    for &id in voxels {
        match pairs.last_mut() {
            Some((run, last_id)) if *last_id == id => *run += 1,
            _ => pairs.push((1, id)),
        }
    }
    pairs
}

/// Byte size of the serialized form of `pairs`: two 32-bit words each.
pub fn encoded_len(pairs: &[RunPair]) -> usize {
    pairs.len() * PAIR_BYTES
}

/// Serialize run-length pairs to their on-disk byte form.
pub fn pairs_to_bytes(pairs: &[RunPair]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(encoded_len(pairs));
    for &(run, id) in pairs {
        bytes.extend_from_slice(&run.to_le_bytes());
        bytes.extend_from_slice(&id.to_le_bytes());
    }
    bytes
}

/// Encode a chunk's voxel array directly to its on-disk payload bytes.
pub fn encode_to_bytes(voxels: &[VoxelId]) -> Vec<u8> {
    pairs_to_bytes(&encode(voxels))
}

/// Expand a run-length payload into a voxel buffer of exactly
/// `expected_len` voxels. The buffer is pre-cleared to [`EMPTY_VOXEL`], so
/// a short payload (sum of runs < `expected_len`) yields a well-defined
/// empty tail (logged at `WARNING`). A payload that expands past
/// `expected_len`, or whose byte length is not a multiple of 8, is clipped
/// and logged at `ERROR` — this is the corruption path §4.2 calls out.
pub fn decode(bytes: &[u8], expected_len: usize, log: &LogSink, sender: &str) -> Vec<VoxelId> {
    let mut out = vec![EMPTY_VOXEL; expected_len];

    if bytes.len() % PAIR_BYTES != 0 {
        log.error(
            sender,
            format!("rle payload length {} is not a multiple of {PAIR_BYTES}; trailing bytes ignored", bytes.len()),
        );
    }

    let mut idx = 0usize;
    let mut total_expanded: u64 = 0;
    for chunk in bytes.chunks_exact(PAIR_BYTES) {
        let run = u32::from_le_bytes(chunk[0..4].try_into().unwrap());
        let id = u32::from_le_bytes(chunk[4..8].try_into().unwrap());
        total_expanded += run as u64;
        for _ in 0..run {
            if idx >= expected_len {
                break;
            }
            out[idx] = id;
            idx += 1;
        }
    }

    if total_expanded > expected_len as u64 {
        log.error(
            sender,
            format!("rle payload expands to {total_expanded} voxels, clipped to {expected_len}"),
        );
    } else if total_expanded < expected_len as u64 {
        log.warning(
            sender,
            format!("rle payload expands to {total_expanded} voxels, short of {expected_len}; tail left empty"),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_buffer() {
        let log = LogSink::default();
        let voxels: Vec<VoxelId> = vec![EMPTY_VOXEL, EMPTY_VOXEL, 0, 0, 0, 1, EMPTY_VOXEL, 1];
        let bytes = encode_to_bytes(&voxels);
        let decoded = decode(&bytes, voxels.len(), &log, "test");
        assert_eq!(decoded, voxels);
    }

    #[test]
    fn encoded_size_bounded_by_run_count() {
        let voxels = vec![0u32; 64];
        let pairs = encode(&voxels);
        assert_eq!(pairs.len(), 1);
        assert!(encoded_len(&pairs) <= 64 * 8);
    }

    #[test]
    fn all_empty_chunk_round_trips() {
        let log = LogSink::default();
        let voxels = vec![EMPTY_VOXEL; 32];
        let bytes = encode_to_bytes(&voxels);
        assert_eq!(bytes.len(), PAIR_BYTES); // single run.
        let decoded = decode(&bytes, voxels.len(), &log, "test");
        assert_eq!(decoded, voxels);
    }

    #[test]
    fn short_payload_leaves_well_defined_empty_tail() {
        let log = LogSink::default();
        let bytes = pairs_to_bytes(&[(2, 5)]);
        let decoded = decode(&bytes, 5, &log, "test");
        assert_eq!(decoded, vec![5, 5, EMPTY_VOXEL, EMPTY_VOXEL, EMPTY_VOXEL]);
    }

    #[test]
    fn overlong_payload_clips_at_expected_len() {
        let log = LogSink::default();
        let bytes = pairs_to_bytes(&[(10, 3)]);
        let decoded = decode(&bytes, 4, &log, "test");
        assert_eq!(decoded, vec![3, 3, 3, 3]);
    }

    #[test]
    fn every_voxel_run_boundary_is_respected() {
        let voxels = vec![1, 1, 2, 3, 3, 3];
        let pairs = encode(&voxels);
        assert_eq!(pairs, vec![(2, 1), (1, 2), (3, 3)]);
    }
}
