//! Block runtime IDs.
//!
//! Runtime IDs are FNV-1a 32-bit hashes of the block identifier, so the same
//! block always maps to the same ID without a shared palette table.

/// FNV-1a 32-bit offset basis.
const FNV1_32_INIT: u32 = 0x811c_9dc5;
/// FNV-1a 32-bit prime.
const FNV1_32_PRIME: u32 = 0x0100_0193;

/// Compute FNV-1a 32-bit hash of a byte slice.
pub fn fnv1a_32(data: &[u8]) -> u32 {
    data.iter().fold(FNV1_32_INIT, |hash, &byte| {
        (hash ^ byte as u32).wrapping_mul(FNV1_32_PRIME)
    })
}

/// Runtime ID of a block identifier such as `minecraft:dirt`.
pub fn runtime_id(identifier: &str) -> u32 {
    fnv1a_32(identifier.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_known_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn distinct_blocks_distinct_ids() {
        assert_ne!(runtime_id("minecraft:air"), runtime_id("minecraft:dirt"));
        assert_eq!(runtime_id("minecraft:dirt"), runtime_id("minecraft:dirt"));
    }
}
