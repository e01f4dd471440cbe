use crate::roland::error::{RolandError, RolandResult};
use crate::roland::models::ascii_name;
use binrw::{BinRead, BinWrite};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MODEL_BANNER: Regex = Regex::new(r"(?i)^\s*S7\d\d\s+MR25A").unwrap();
    static ref VERSION_BANNER: Regex = Regex::new(concat!(
        r"(?i)^\s*([S][A-z]*-\d+)\s+([A-z\s\-]*?Disk)\s?",
        r"([A-z\s]*?)\s+Ver\.?\s*(\d(\.\d+)?[\w-]*)\s*"
    ))
    .unwrap();
    static ref COPYRIGHT_BANNER: Regex = Regex::new(r"(?i)^\s*Copyright\s+Roland").unwrap();
}

/// First 0x200 bytes of a Roland S-7xx disk.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct IdAreaRecord {
    pub revision: u32,
    #[brw(pad_after = 2)]
    pub model_str: [u8; 10],
    #[brw(pad_after = 1)]
    pub empty_str: [u8; 15],
    #[brw(pad_after = 1)]
    pub version_str: [u8; 31],
    #[brw(pad_after = 161)]
    pub copyright_str: [u8; 31],
    pub disk_name: [u8; 16],
    pub disk_capacity: u32,
    pub num_volumes: u16,
    pub num_performances: u16,
    pub num_patches: u16,
    pub num_partials: u16,
    pub num_samples: u16,
}

/// Validated ID area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdArea {
    pub revision: u32,
    pub model_version: String,
    pub disk_type: String,
    pub disk_version: String,
    pub disk_name: String,
    pub disk_capacity: u32,
    pub num_volumes: u16,
    pub num_performances: u16,
    pub num_patches: u16,
    pub num_partials: u16,
    pub num_samples: u16,
}

impl IdArea {
    /// Fails with `NotRolandImage` unless all three banners match.
    pub fn from_record(record: &IdAreaRecord) -> RolandResult<Self> {
        let banner = |raw: &[u8]| ascii_name(raw).map_err(|_| RolandError::NotRolandImage);

        if !MODEL_BANNER.is_match(&banner(&record.model_str)?)
            || !COPYRIGHT_BANNER.is_match(&banner(&record.copyright_str)?)
        {
            return Err(RolandError::NotRolandImage);
        }
        let version_str = banner(&record.version_str)?;
        let version = VERSION_BANNER
            .captures(&version_str)
            .ok_or(RolandError::NotRolandImage)?;

        Ok(Self {
            revision: record.revision,
            model_version: version[1].to_string(),
            disk_type: version[2].to_string(),
            disk_version: version[4].to_string(),
            disk_name: ascii_name(&record.disk_name)?,
            disk_capacity: record.disk_capacity,
            num_volumes: record.num_volumes,
            num_performances: record.num_performances,
            num_patches: record.num_patches,
            num_partials: record.num_partials,
            num_samples: record.num_samples,
        })
    }
}
