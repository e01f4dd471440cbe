use crate::roland::models::fat_area::FatVersion;
use crate::util::raw_enum;
use binrw::{BinRead, BinWrite};

raw_enum! {
    pub enum RolandFileType {
        None = 0x00 => "None",
        Volume = 0x40 => "Volume",
        Performance = 0x41 => "Performance",
        Patch = 0x42 => "Patch",
        Partial = 0x43 => "Partial",
        Sample = 0x44 => "Sample",
    }
}

/// One 32 byte slot of a directory area. Link pointers are stored without the
/// version 2 bias.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, import(version: FatVersion))]
pub struct DirectoryEntryRecord {
    pub name: [u8; 16],

    pub file_type: u8,

    pub file_attributes: u8,

    #[br(map = |raw: u16| version.unbias_link(raw))]
    #[bw(map = |link: &u16| version.bias_link(*link))]
    pub forward_link_ptr: u16,

    #[br(map = |raw: u16| version.unbias_link(raw))]
    #[bw(map = |link: &u16| version.bias_link(*link))]
    pub backward_link_ptr: u16,

    pub link_id: u16,

    pub reserved: u32,

    /// First cluster of the entry's data
    pub fat_entry: u16,

    pub num_clusters: u16,
}

impl DirectoryEntryRecord {
    pub fn file_type(&self) -> RolandFileType {
        RolandFileType::from_raw_or(self.file_type, RolandFileType::None)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use binrw::BinWriterExt;
    use std::io::Cursor;

    pub(crate) fn entry(
        name: &str,
        file_type: RolandFileType,
        fat_entry: u16,
    ) -> DirectoryEntryRecord {
        let mut raw_name = [b' '; 16];
        raw_name[..name.len()].copy_from_slice(name.as_bytes());
        DirectoryEntryRecord {
            name: raw_name,
            file_type: file_type.raw(),
            file_attributes: 0,
            forward_link_ptr: 0,
            backward_link_ptr: 0,
            link_id: 0,
            reserved: 0,
            fat_entry,
            num_clusters: 0,
        }
    }

    #[test]
    fn version_2_links_are_unbiased() {
        let mut record = entry("STRINGS", RolandFileType::Patch, 0);
        record.forward_link_ptr = 5;
        record.backward_link_ptr = 2;

        let mut buf = Cursor::new(Vec::new());
        buf.write_le_args(&record, (FatVersion::V2,)).unwrap();
        let bytes = buf.into_inner();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[18..22], &[0x05, 0x80, 0x02, 0x80]);

        let v2 =
            DirectoryEntryRecord::read_args(&mut Cursor::new(&bytes), (FatVersion::V2,)).unwrap();
        assert_eq!(v2, record);
        let v1 =
            DirectoryEntryRecord::read_args(&mut Cursor::new(&bytes), (FatVersion::V1,)).unwrap();
        assert_eq!(v1.forward_link_ptr, 0x8005);
    }

    #[test]
    fn unknown_type_reads_as_none() {
        let mut record = entry("X", RolandFileType::Sample, 0);
        assert_eq!(record.file_type(), RolandFileType::Sample);
        record.file_type = 0x45;
        assert_eq!(record.file_type(), RolandFileType::None);
    }
}
