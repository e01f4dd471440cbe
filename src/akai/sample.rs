use crate::akai::charmap::decode_name;
use crate::akai::constants::{AKAI_LOOP_HOLD_FOREVER, AKAI_SAMPLE_WORD_LENGTH};
use crate::akai::error::{AkaiError, AkaiResult};
use crate::akai::models::sample::{LoopDataRecord, SampleHeader};
use crate::akai::types::{SampleLoopType, SampleType, tune_cents};
use crate::error::SamplerRipResult;
use crate::generalized::{
    DEFAULT_SAMPLE_RATE, DataStream, LoopRegion, LoopType, MidiNote, Sample, StreamEncoding,
};
use crate::stream::ByteWindowStream;
use crate::tree::info::InfoItem;
use crate::tree::{Describe, SampleElement};
use binrw::BinRead;

/// An AKAI sample file: its decoded header plus the file bytes the audio is cut from.
#[derive(Debug, Clone)]
pub struct AkaiSample {
    pub name: String,
    pub sample_type: SampleType,
    pub header: SampleHeader,
    file: ByteWindowStream,
}

impl AkaiSample {
    pub fn from_file(file: ByteWindowStream) -> AkaiResult<Self> {
        let header = SampleHeader::read(&mut file.clone())?;
        let sample_type = SampleType::from_raw(header.id).ok_or(AkaiError::UnknownEnumValue {
            kind: "sample type",
            value: header.id,
        })?;
        Ok(Self {
            name: decode_name(&header.name)?,
            sample_type,
            header,
            file,
        })
    }

    pub fn loop_type(&self) -> SampleLoopType {
        SampleLoopType::from_raw_or(self.header.loop_type, SampleLoopType::LoopInactive)
    }

    pub fn sample_rate(&self) -> u32 {
        match self.header.sampling_rate {
            0 => DEFAULT_SAMPLE_RATE,
            rate => rate as u32,
        }
    }

    pub fn num_audio_samples(&self) -> u64 {
        self.header.play_end.saturating_sub(self.header.play_start) as u64
    }

    /// Loops with a hold time; none at all when the sample's loop type is inactive.
    pub fn loop_regions(&self) -> Vec<LoopRegion> {
        if self.loop_type() == SampleLoopType::LoopInactive {
            return Vec::new();
        }
        self.header
            .loops
            .iter()
            .filter(|record| record.loop_duration > 0)
            .map(loop_region)
            .collect()
    }
}

/// `loop_start = max(0, loop_at - 1 - coarse length)`, ending at `loop_at`.
///
/// The raw hold time is kept as the loop duration.
pub fn loop_region(record: &LoopDataRecord) -> LoopRegion {
    let start = (record.loop_at as i64 - 1 - record.loop_length_coarse as i64).max(0) as u64;
    let end = record.loop_at as u64;
    if record.loop_duration >= AKAI_LOOP_HOLD_FOREVER {
        LoopRegion::forever(start, end, LoopType::Forward)
    } else {
        LoopRegion {
            duration: Some(record.loop_duration as f64),
            ..LoopRegion::finite(start, end, LoopType::Forward)
        }
    }
}

impl Describe for AkaiSample {
    fn describe(&self) -> InfoItem {
        let loops = self.loop_regions().into_iter().map(|region| {
            InfoItem::map()
                .with("Start", region.start_sample)
                .with("End", region.end_sample)
                .with("Forever", region.repeat_forever)
                .with("Hold", region.duration)
        });

        InfoItem::map()
            .with("Name", self.name.as_str())
            .with("Type", self.sample_type.to_string())
            .with("Sampling rate", self.sample_rate())
            .with("Root note", MidiNote::from_akai_byte(self.header.note_pitch as i32).to_string())
            .with("Semitone offset", self.header.pitch_semi)
            .with("Cent offset", tune_cents(self.header.pitch_cents))
            .with("Samples", self.num_audio_samples())
            .with("Play start", self.header.play_start)
            .with("Play end", self.header.play_end)
            .with("Loop type", self.loop_type().to_string())
            .with("Loops", InfoItem::list(loops))
    }
}

impl SampleElement for AkaiSample {
    fn to_generalized(&self) -> SamplerRipResult<Sample> {
        let width = AKAI_SAMPLE_WORD_LENGTH as u64;
        let data = self.file.window(
            SampleHeader::SIZE + width * self.header.play_start as u64,
            width * self.num_audio_samples(),
        );

        let mut sample = Sample::new(self.name.clone());
        sample.sample_rate = self.sample_rate();
        sample.num_audio_samples = Some(self.num_audio_samples());
        sample.midi_note = Some(MidiNote::from_akai_byte(self.header.note_pitch as i32));
        sample.pitch_offset_semi = Some(self.header.pitch_semi as i32);
        sample.pitch_offset_cents = Some(tune_cents(self.header.pitch_cents));
        sample.loop_regions = self.loop_regions();
        sample
            .data_streams
            .push(DataStream::new(data, StreamEncoding::pcm16_le(1)));
        Ok(sample)
    }
}
