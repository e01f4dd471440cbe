use binrw::{BinRead, BinWrite, binrw};

pub const WAVE_FORM_TYPE: [u8; 4] = *b"WAVE";
pub const FMT_ID: [u8; 4] = *b"fmt ";
pub const SMPL_ID: [u8; 4] = *b"smpl";
pub const DATA_ID: [u8; 4] = *b"data";

pub const WAVE_FORMAT_PCM: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, magic = b"RIFF")]
pub struct RiffHeader {
    pub size: u32,
    pub form_type: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FormatChunk {
    pub audio_format: u16,
    pub channel_cnt: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatChunk {
    pub const SIZE: u32 = 16;

    pub fn pcm(channel_cnt: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = channel_cnt * bits_per_sample / 8;
        Self {
            audio_format: WAVE_FORMAT_PCM,
            channel_cnt,
            sample_rate,
            byte_rate: sample_rate * block_align as u32,
            block_align,
            bits_per_sample,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, repr = u32)]
pub enum WavLoopType {
    Forward = 0,
    Alternating = 1,
    Reverse = 2,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, repr = u32)]
pub enum SmpteFormat {
    None = 0,
    Fps24 = 24,
    Fps25 = 25,
    Fps30Drop = 29,
    Fps30 = 30,
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct SampleLoop {
    pub cue_id: u32,
    pub loop_type: WavLoopType,
    pub start: u32,
    pub end: u32,
    pub fraction: u32,
    pub play_count: u32,
}

/// The `smpl` chunk body.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct SampleChunk {
    pub manufacturer: u32,
    pub product: u32,
    /// Nanoseconds per sample.
    pub sample_period: u32,
    pub midi_unity_note: u32,
    /// Fraction of a semitone above the unity note, 0x80000000 is half a semitone.
    pub midi_pitch_fraction: u32,
    pub smpte_format: SmpteFormat,
    pub smpte_offset: u32,
    #[br(temp)]
    #[bw(calc = sample_loops.len() as u32)]
    sample_loop_cnt: u32,
    #[br(temp)]
    #[bw(calc = sampler_data.len() as u32)]
    sampler_data_size: u32,
    #[br(count = sample_loop_cnt)]
    pub sample_loops: Vec<SampleLoop>,
    #[br(count = sampler_data_size)]
    pub sampler_data: Vec<u8>,
}

impl SampleChunk {
    pub fn new(sample_period: u32, midi_unity_note: u32, midi_pitch_fraction: u32) -> Self {
        Self {
            manufacturer: 0,
            product: 0,
            sample_period,
            midi_unity_note,
            midi_pitch_fraction,
            smpte_format: SmpteFormat::None,
            smpte_offset: 0,
            sample_loops: Vec::new(),
            sampler_data: Vec::new(),
        }
    }

    pub fn size(&self) -> u32 {
        36 + 24 * self.sample_loops.len() as u32 + self.sampler_data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::BinWriterExt;
    use std::io::Cursor;

    #[test]
    fn format_chunk_derives_rates() {
        let fmt = FormatChunk::pcm(2, 44100, 16);
        assert_eq!(fmt.block_align, 4);
        assert_eq!(fmt.byte_rate, 176400);
    }

    #[test]
    fn smpl_chunk_size_matches_written_bytes() {
        let mut chunk = SampleChunk::new(22676, 60, 0);
        chunk.sample_loops.push(SampleLoop {
            cue_id: 0,
            loop_type: WavLoopType::Alternating,
            start: 10,
            end: 20,
            fraction: 0,
            play_count: 0,
        });

        let mut buf = Cursor::new(Vec::new());
        buf.write_le(&chunk).unwrap();
        assert_eq!(buf.get_ref().len() as u32, chunk.size());

        buf.set_position(0);
        let read = SampleChunk::read(&mut buf).unwrap();
        assert_eq!(read, chunk);
    }

    #[test]
    fn riff_header_layout() {
        let mut buf = Cursor::new(Vec::new());
        buf.write_le(&RiffHeader {
            size: 4,
            form_type: WAVE_FORM_TYPE,
        })
        .unwrap();
        assert_eq!(buf.into_inner(), b"RIFF\x04\x00\x00\x00WAVE".to_vec());
    }
}
