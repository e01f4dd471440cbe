use binrw::{BinRead, BinWrite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct LoopDataRecord {
    /// Sample the loop jumps back from
    pub loop_at: u32,
    pub loop_length_fine: u16,
    pub loop_length_coarse: u32,
    /// Hold time in milliseconds, 9999 holds until release
    pub loop_duration: u16,
}

/// Sample file header, shared by S1000 and S3000 samples.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct SampleHeader {
    /// 1 for S1000, 3 for S3000
    pub id: u8,

    /// Root note, AKAI numbering
    #[brw(pad_before = 1)]
    pub note_pitch: u8,

    pub name: [u8; 12],

    #[brw(pad_before = 4)]
    pub loop_type: u8,

    /// Fine tune, -127..127 spans half a semitone each way
    pub pitch_cents: i8,

    pub pitch_semi: i8,

    #[brw(pad_before = 4)]
    pub samples_cnt: u32,

    pub play_start: u32,

    pub play_end: u32,

    pub loops: [LoopDataRecord; 8],

    /// 0 means 44100
    #[brw(pad_before = 4)]
    pub sampling_rate: u16,
}

impl SampleHeader {
    pub const SIZE: u64 = 1 + 1 + 1 + 12 + 4 + 1 + 1 + 1 + 4 + 4 + 4 + 4 + 8 * 12 + 4 + 2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::BinWriterExt;
    use std::io::Cursor;

    #[test]
    fn header_size_and_field_offsets() {
        let mut header = SampleHeader {
            id: 3,
            note_pitch: 60,
            name: [0x0A; 12],
            loop_type: 1,
            pitch_cents: -5,
            pitch_semi: 2,
            samples_cnt: 0x100,
            play_start: 0,
            play_end: 0x100,
            loops: [LoopDataRecord::default(); 8],
            sampling_rate: 22050,
        };
        header.loops[0].loop_at = 0x80;

        let mut buf = Cursor::new(Vec::new());
        buf.write_le(&header).unwrap();
        let bytes = buf.into_inner();
        assert_eq!(bytes.len() as u64, SampleHeader::SIZE);
        assert_eq!(bytes[2], 60);
        assert_eq!(bytes[19], 1);
        assert_eq!(bytes[20] as i8, -5);
        assert_eq!(&bytes[26..30], &[0, 1, 0, 0]);
        assert_eq!(&bytes[38..42], &[0x80, 0, 0, 0]);
        assert_eq!(&bytes[138..140], &22050u16.to_le_bytes());

        let read = SampleHeader::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read, header);
    }
}
