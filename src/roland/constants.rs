pub const ROLAND_CLUSTER_SIZE: u64 = 0x2400;
pub const ROLAND_SAMPLE_WIDTH: usize = 2;
pub const ROLAND_NUM_KEYS: usize = 88;

pub const ID_AREA_SIZE: u64 = 0x200;

pub const FAT_AREA_OFFSET: u64 = 0x80800;
pub const FAT_NUM_ENTRIES: usize = 0x10000;
pub const FAT_AREA_ID: u16 = 0xFFFA;
pub const FAT_VERSION_1_FLAG: u16 = 0xFFFF;
pub const FAT_VERSION_2_FLAG: u16 = 0xFFFE;
/// Directory links of version 2 images carry this bias.
pub const FAT_VERSION_2_LINK_BIAS: u16 = 0x8000;

/// Where cluster 0 would start. The data area proper begins at cluster 2.
pub const DATA_FAT_OFFSET: u64 = 0x2B1000;

pub const DIRECTORY_ENTRY_SIZE: u64 = 0x20;

pub const VOLUME_DIRECTORY_AREA_OFFSET: u64 = 0xA0800;
pub const PERFORMANCE_DIRECTORY_AREA_OFFSET: u64 = 0xA1800;
pub const PATCH_DIRECTORY_AREA_OFFSET: u64 = 0xA5800;
pub const PARTIAL_DIRECTORY_AREA_OFFSET: u64 = 0xAD800;
pub const SAMPLE_DIRECTORY_AREA_OFFSET: u64 = 0xCD800;

pub const VOLUME_PARAMETER_AREA_OFFSET: u64 = 0x10D800;
pub const VOLUME_PARAMETER_ENTRY_SIZE: u64 = 0x100;
pub const PERFORMANCE_PARAMETER_AREA_OFFSET: u64 = 0x115800;
pub const PERFORMANCE_PARAMETER_ENTRY_SIZE: u64 = 0x200;
pub const PATCH_PARAMETER_AREA_OFFSET: u64 = 0x155800;
pub const PATCH_PARAMETER_ENTRY_SIZE: u64 = 0x200;
pub const PARTIAL_PARAMETER_AREA_OFFSET: u64 = 0x1D5800;
pub const PARTIAL_PARAMETER_ENTRY_SIZE: u64 = 0x80;
pub const SAMPLE_PARAMETER_AREA_OFFSET: u64 = 0x255800;
pub const SAMPLE_PARAMETER_ENTRY_SIZE: u64 = 0x30;

pub const MAX_NUM_VOLUME: u16 = 0x80;
pub const MAX_NUM_PERFORMANCE: u16 = 0x200;
pub const MAX_NUM_PATCH: u16 = 0x400;
pub const MAX_NUM_PARTIAL: u16 = 0x1000;
pub const MAX_NUM_SAMPLE: u16 = 0x2000;

/// Sampling frequencies by the low nibble of a sample's option byte.
pub const SAMPLING_FREQUENCIES: [u32; 6] = [48000, 44100, 24000, 22050, 30000, 15000];

pub const ORPHAN_VOLUME_NAME: &str = "_Orphan_perf";
pub const ALL_PERFORMANCES_VOLUME_NAME: &str = "All Performances";
