pub const AKAI_SECTOR_SIZE: u64 = 0x2000;

pub const AKAI_VOLUME_ENTRY_CNT: usize = 100;
pub const AKAI_SAT_ENTRY_CNT: usize = 11386;

pub const AKAI_FILE_TABLE_END_FLAG: u16 = 0xD747;
pub const AKAI_FILE_ENTRY_SIZE: u64 = 24;
/// Offset of the end flag inside the would-be next file entry.
pub const AKAI_FILE_TABLE_END_FLAG_OFFSET: u64 = 8;

pub const AKAI_SAMPLE_WORD_LENGTH: usize = 2;
/// Loop hold times at or above this value repeat until the key is released.
pub const AKAI_LOOP_HOLD_FOREVER: u16 = 9999;

pub const AKAI_KEYGROUP_DEFAULT_ADDRESS: u16 = 150;
pub const AKAI_MAX_VELOCITY_ZONES: u8 = 4;

pub const AKAI_PARTITION_MAGIC_LEN: usize = 194;

/// Little endian low words of `3333 * n` for `n` in `1..=97`.
pub const AKAI_PARTITION_MAGIC: [u8; AKAI_PARTITION_MAGIC_LEN] = partition_magic();

const fn partition_magic() -> [u8; AKAI_PARTITION_MAGIC_LEN] {
    let mut magic = [0u8; AKAI_PARTITION_MAGIC_LEN];
    let mut i = 0;
    while i < AKAI_PARTITION_MAGIC_LEN / 2 {
        let word = ((3333 * (i as u32 + 1)) & 0xFFFF) as u16;
        let bytes = word.to_le_bytes();
        magic[2 * i] = bytes[0];
        magic[2 * i + 1] = bytes[1];
        i += 1;
    }
    magic
}

/// The two checksum bytes stored after the partition magic.
pub const fn partition_checksum(size: u16) -> (u8, u8) {
    let x = (size as i32) / 128 - 1;
    let first = if x % 2 == 0 { 0x55 } else { 0xD5 };
    let second = (x.div_euclid(2) + 0xBA) as u8;
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_starts_with_multiples_of_3333() {
        assert_eq!(&AKAI_PARTITION_MAGIC[..6], &[0x05, 0x0D, 0x0A, 0x1A, 0x0F, 0x27]);
        // 3333 * 20 = 66660 wraps to 0x0464.
        assert_eq!(&AKAI_PARTITION_MAGIC[38..40], &[0x64, 0x04]);
    }

    #[test]
    fn checksum_alternates_on_parity() {
        assert_eq!(partition_checksum(128), (0x55, 0xBA));
        assert_eq!(partition_checksum(256), (0xD5, 0xBA));
        assert_eq!(partition_checksum(0x1E00), (0xD5, 0xBA + 29));
    }
}
