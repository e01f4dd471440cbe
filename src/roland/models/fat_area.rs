use crate::roland::constants::{
    FAT_AREA_ID, FAT_NUM_ENTRIES, FAT_VERSION_1_FLAG, FAT_VERSION_2_FLAG, FAT_VERSION_2_LINK_BIAS,
};
use crate::roland::error::{RolandError, RolandResult};
use binrw::{BinRead, BinWrite};

/// Directory format generation, announced by the last two FAT words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FatVersion {
    #[default]
    V1,
    V2,
}

impl FatVersion {
    /// Removes the version 2 bias from a directory link pointer.
    pub fn unbias_link(self, raw: u16) -> u16 {
        match self {
            FatVersion::V1 => raw,
            FatVersion::V2 => raw.wrapping_sub(FAT_VERSION_2_LINK_BIAS),
        }
    }

    pub fn bias_link(self, link: u16) -> u16 {
        match self {
            FatVersion::V1 => link,
            FatVersion::V2 => link.wrapping_add(FAT_VERSION_2_LINK_BIAS),
        }
    }
}

/// The raw cluster table. Entry 0 holds the FAT id, entry 1 the free cluster
/// count, the last two entries the version flags.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FatAreaRecord {
    #[br(count = FAT_NUM_ENTRIES)]
    pub entries: Vec<u16>,
}

impl FatAreaRecord {
    pub fn fat_id(&self) -> u16 {
        self.entries[0]
    }

    pub fn num_unused_clusters(&self) -> u16 {
        self.entries[1]
    }

    pub fn validate(&self) -> RolandResult<()> {
        match self.fat_id() {
            FAT_AREA_ID => Ok(()),
            other => Err(RolandError::BadFatId(other)),
        }
    }

    /// The first flag that is not the version 1 flag decides; both version 1 means version 1.
    pub fn version(&self) -> RolandResult<FatVersion> {
        let flags = &self.entries[FAT_NUM_ENTRIES - 2..];
        for &flag in flags {
            match flag {
                FAT_VERSION_1_FLAG => continue,
                FAT_VERSION_2_FLAG => return Ok(FatVersion::V2),
                other => return Err(RolandError::UnknownFatVersion(other)),
            }
        }
        Ok(FatVersion::V1)
    }
}
