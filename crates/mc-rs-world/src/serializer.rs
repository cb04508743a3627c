//! Chunk column serialization to the LevelChunk payload format.

use bytes::{BufMut, BytesMut};

use crate::chunk::{ChunkColumn, SubChunk, SUB_CHUNK_VOLUME};

/// Serialize a chunk column into `buf`, which is cleared first.
///
/// Payload = SubChunks[] + BiomeData + BorderBlocks(0x00). Returns the number
/// of sub-chunks written.
pub fn serialize_column(column: &ChunkColumn, buf: &mut BytesMut) -> u32 {
    buf.clear();

    // Sub-chunk 0 sits at Y=-64, so its y_index is -4
    for (index, sub_chunk) in column.sub_chunks.iter().enumerate() {
        let y_index = index as i8 - 4;
        serialize_sub_chunk(buf, sub_chunk, y_index);
    }

    // One single-biome section per sub-chunk
    for _ in 0..column.sub_chunks.len() {
        buf.put_u8(0x00);
        write_zigzag_varint(buf, column.biome as i32);
    }

    // Border blocks
    buf.put_u8(0x00);

    column.sub_chunks.len() as u32
}

/// Serialize a single sub-chunk (version 9, one storage layer).
fn serialize_sub_chunk(buf: &mut BytesMut, sub_chunk: &SubChunk, y_index: i8) {
    buf.put_u8(9);
    buf.put_u8(1);
    buf.put_u8(y_index as u8);

    let palette_size = sub_chunk.palette.len();

    if sub_chunk.is_uniform() {
        // bits_per_block = 0, runtime flag set, no data words
        buf.put_u8(0x01);
        write_zigzag_varint(buf, 1);
        write_zigzag_varint(buf, sub_chunk.palette[0] as i32);
        return;
    }

    let bpb = bits_per_block_for_palette(palette_size);
    buf.put_u8((bpb << 1) | 1);

    // Pack palette indices LSB-first into u32 words
    let blocks_per_word = 32 / bpb as usize;
    let word_count = SUB_CHUNK_VOLUME.div_ceil(blocks_per_word);
    for word_idx in 0..word_count {
        let mut word: u32 = 0;
        for slot in 0..blocks_per_word {
            let block_idx = word_idx * blocks_per_word + slot;
            if block_idx < SUB_CHUNK_VOLUME {
                let palette_index = sub_chunk.palette_index(block_idx) as u32;
                word |= palette_index << (bpb as u32 * slot as u32);
            }
        }
        buf.put_u32_le(word);
    }

    write_zigzag_varint(buf, palette_size as i32);
    for &runtime_id in &sub_chunk.palette {
        write_zigzag_varint(buf, runtime_id as i32);
    }
}

/// Minimum bits-per-block for a palette. Valid values: 1, 2, 3, 4, 5, 6, 8, 16.
fn bits_per_block_for_palette(palette_size: usize) -> u8 {
    match palette_size {
        0..=1 => 0,
        2 => 1,
        3..=4 => 2,
        5..=8 => 3,
        9..=16 => 4,
        17..=32 => 5,
        33..=64 => 6,
        65..=256 => 8,
        _ => 16,
    }
}

fn write_zigzag_varint(buf: &mut BytesMut, value: i32) {
    let encoded = ((value << 1) ^ (value >> 31)) as u32;
    write_varuint32(buf, encoded);
}

fn write_varuint32(buf: &mut BytesMut, mut value: u32) {
    loop {
        if value & !0x7F == 0 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8((value & 0x7F | 0x80) as u8);
        value >>= 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{FlatGenerator, Generator};
    use mc_rs_proto::types::ChunkPos;

    #[test]
    fn bits_per_block_selection() {
        assert_eq!(bits_per_block_for_palette(2), 1);
        assert_eq!(bits_per_block_for_palette(4), 2);
        assert_eq!(bits_per_block_for_palette(5), 3);
        assert_eq!(bits_per_block_for_palette(16), 4);
        assert_eq!(bits_per_block_for_palette(256), 8);
        assert_eq!(bits_per_block_for_palette(257), 16);
    }

    #[test]
    fn uniform_subchunk_bytes() {
        let mut buf = BytesMut::new();
        serialize_sub_chunk(&mut buf, &SubChunk::uniform(42), -4);

        assert_eq!(buf[0], 9, "version");
        assert_eq!(buf[1], 1, "num_layers");
        assert_eq!(buf[2], 0xFC, "y_index -4");
        assert_eq!(buf[3], 0x01, "storage header");
        assert_eq!(buf[4], 0x02, "zigzag(1)");
        assert_eq!(buf[5], 84, "zigzag(42)");
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn packed_indices_are_lsb_first() {
        let mut sub = SubChunk::uniform(100);
        sub.set_block(0, 1, 0, 200);

        let mut buf = BytesMut::new();
        serialize_sub_chunk(&mut buf, &sub, 0);

        assert_eq!(buf[3], 3, "bpb=1 with runtime flag");
        let word0 = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        assert_eq!(word0 & 1, 0);
        assert_eq!((word0 >> 1) & 1, 1);
        // 4096 / 32 words of 4 bytes after the 4 header bytes
        let palette_start = 4 + 128 * 4;
        assert_eq!(buf[palette_start], 0x04, "zigzag(2)");
    }

    #[test]
    fn flat_column_payload() {
        let column = FlatGenerator::default().generate(ChunkPos::new(0, 0));
        let mut buf = BytesMut::new();
        let count = serialize_column(&column, &mut buf);

        assert_eq!(count, 24);
        assert_eq!(buf[0], 9);
        assert_eq!(buf[1], 1);
        assert_eq!(buf.last().copied(), Some(0x00));

        // Reusing the buffer yields identical bytes
        let first = buf.to_vec();
        serialize_column(&column, &mut buf);
        assert_eq!(first, buf.to_vec());
    }
}
