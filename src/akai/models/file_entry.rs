use crate::akai::constants::{
    AKAI_FILE_ENTRY_SIZE, AKAI_FILE_TABLE_END_FLAG, AKAI_FILE_TABLE_END_FLAG_OFFSET,
};
use binrw::{BinRead, BinResult, BinWrite, Endian};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Seek, SeekFrom};

#[binrw::parser(reader)]
pub(crate) fn read_u24() -> BinResult<u32> {
    Ok(reader.read_u24::<LittleEndian>()?)
}

#[binrw::writer(writer)]
pub(crate) fn write_u24(value: &u32) -> BinResult<()> {
    Ok(writer.write_u24::<LittleEndian>(*value)?)
}

/// One 24 byte entry of a volume's file table.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FileEntryRecord {
    /// AKAI encoded, space padded
    pub name: [u8; 12],

    #[brw(pad_before = 4)]
    pub file_type: u8,

    /// File length in bytes
    #[br(parse_with = read_u24)]
    #[bw(write_with = write_u24)]
    pub size: u32,

    /// First sector of the file's chain
    #[brw(pad_after = 2)]
    pub start: u16,
}

/// All live entries of a file table.
///
/// The table ends at the stream's end or when the end flag shows up inside the
/// next would-be entry. Entries without a start sector are placeholders and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileTable {
    pub entries: Vec<FileEntryRecord>,
}

fn is_table_end<R: Read + Seek>(reader: &mut R) -> BinResult<bool> {
    let position = reader.stream_position()?;
    reader.seek(SeekFrom::Current(AKAI_FILE_TABLE_END_FLAG_OFFSET as i64))?;
    let flag = reader.read_u16::<LittleEndian>();
    reader.seek(SeekFrom::Start(position))?;
    match flag {
        Ok(flag) => Ok(flag == AKAI_FILE_TABLE_END_FLAG),
        Err(_) => Ok(true),
    }
}

impl BinRead for FileTable {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let start = reader.stream_position()?;
        let table_size = reader.seek(SeekFrom::End(0))?.saturating_sub(start);
        reader.seek(SeekFrom::Start(start))?;

        let mut entries = Vec::new();
        for _ in 0..table_size / AKAI_FILE_ENTRY_SIZE {
            if is_table_end(reader)? {
                break;
            }
            let entry = FileEntryRecord::read_options(reader, Endian::Little, ())?;
            if entry.start > 0 {
                entries.push(entry);
            }
        }

        Ok(FileTable { entries })
    }
}
