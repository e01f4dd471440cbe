use crate::akai::constants::{
    AKAI_PARTITION_MAGIC, AKAI_PARTITION_MAGIC_LEN, AKAI_SAT_ENTRY_CNT, AKAI_VOLUME_ENTRY_CNT,
    partition_checksum,
};
use binrw::{BinRead, BinWrite};

/// Header in front of every partition. Reading it fails unless magic, checksum and size are sane,
/// which is how the end of the partition list is detected.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PartitionHeader {
    /// Partition length in sectors
    #[br(assert(size > 0, "empty partition"))]
    pub size: u16,

    #[brw(magic = b"\x00\x00")]
    #[br(assert(magic == AKAI_PARTITION_MAGIC, "bad partition magic"))]
    pub magic: [u8; AKAI_PARTITION_MAGIC_LEN],

    #[br(assert((checksum[0], checksum[1]) == partition_checksum(size), "bad partition checksum"))]
    pub checksum: [u8; 2],

    #[br(assert(trailer == [0x2F, 0x00], "bad partition trailer"))]
    pub trailer: [u8; 2],
}

impl PartitionHeader {
    pub const SIZE: u64 = 2 + 2 + AKAI_PARTITION_MAGIC_LEN as u64 + 2 + 2;

    pub fn new(size: u16) -> Self {
        let (first, second) = partition_checksum(size);
        Self {
            size,
            magic: AKAI_PARTITION_MAGIC,
            checksum: [first, second],
            trailer: [0x2F, 0x00],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct VolumeEntryRecord {
    /// AKAI encoded, space padded
    pub name: [u8; 12],

    /// Only the low two bits carry the volume type
    pub type_raw: u16,

    /// First sector of the volume's file table
    pub start: u16,
}

/// Volume table and segment allocation table following the header.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PartitionTables {
    #[br(count = AKAI_VOLUME_ENTRY_CNT)]
    pub volumes: Vec<VolumeEntryRecord>,

    #[br(count = AKAI_SAT_ENTRY_CNT)]
    pub sat: Vec<u16>,
}
