use crate::generalized::data_stream::DataStream;
use crate::generalized::midi::MidiNote;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelConfig {
    Mono,
    StereoSingleStream,
    StereoSplitStreams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopType {
    #[default]
    Forward,
    Alternating,
    Reverse,
}

/// A loop in sample frames, relative to the start of the exported data.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRegion {
    pub start_sample: u64,
    pub end_sample: u64,
    pub loop_type: LoopType,
    pub repeat_forever: bool,
    pub play_count: Option<u32>,
    /// Hold time of a finite loop; the play count is this over one pass in seconds.
    pub duration: Option<f64>,
}

impl LoopRegion {
    pub fn forever(start_sample: u64, end_sample: u64, loop_type: LoopType) -> Self {
        Self {
            start_sample,
            end_sample,
            loop_type,
            repeat_forever: true,
            play_count: None,
            duration: None,
        }
    }

    pub fn finite(start_sample: u64, end_sample: u64, loop_type: LoopType) -> Self {
        Self {
            repeat_forever: false,
            ..Self::forever(start_sample, end_sample, loop_type)
        }
    }

    pub fn len(&self) -> u64 {
        self.end_sample.saturating_sub(self.start_sample)
    }
}

/// Format independent audio ready for export.
#[derive(Debug)]
pub struct Sample {
    pub name: String,
    /// File name (without extension) chosen by the tree's naming pass.
    pub export_name: String,
    /// Export names of the directories above this sample.
    pub export_dir: Vec<String>,
    pub channel_config: ChannelConfig,
    pub sample_rate: u32,
    pub num_channels: usize,
    pub num_audio_samples: Option<u64>,
    pub data_streams: Vec<DataStream>,
    pub loop_regions: Vec<LoopRegion>,
    pub midi_note: Option<MidiNote>,
    pub pitch_offset_semi: Option<i32>,
    pub pitch_offset_cents: Option<i32>,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            export_name: name.clone(),
            name,
            export_dir: Vec::new(),
            channel_config: ChannelConfig::Mono,
            sample_rate: DEFAULT_SAMPLE_RATE,
            num_channels: 1,
            num_audio_samples: None,
            data_streams: Vec::new(),
            loop_regions: Vec::new(),
            midi_note: None,
            pitch_offset_semi: None,
            pitch_offset_cents: None,
        }
    }

    pub fn effective_sample_rate(&self) -> u32 {
        if self.sample_rate == 0 {
            DEFAULT_SAMPLE_RATE
        } else {
            self.sample_rate
        }
    }

    /// `export_dir` joined with `export_name`.
    pub fn export_path(&self) -> Vec<String> {
        let mut path = self.export_dir.clone();
        path.push(self.export_name.clone());
        path
    }
}

/// Merges a left and right mono sample into one split-stream stereo sample.
///
/// Metadata comes from `left`; the right data streams are appended after the left ones.
pub fn combine_stereo(left: Sample, right: Sample, new_name: Option<String>) -> Sample {
    let mut result = left;
    result.data_streams.extend(right.data_streams);
    result.channel_config = ChannelConfig::StereoSplitStreams;
    result.num_channels = result.data_streams.len();
    if let Some(name) = new_name {
        result.export_name = name;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generalized::data_stream::StreamEncoding;
    use std::io::Cursor;

    fn mono(name: &str, rate: u32) -> Sample {
        let mut sample = Sample::new(name);
        sample.sample_rate = rate;
        sample.data_streams.push(DataStream::new(
            Cursor::new(vec![0u8; 4]),
            StreamEncoding::pcm16_le(1),
        ));
        sample
    }

    #[test]
    fn combine_keeps_left_metadata() {
        let mut left = mono("PIANO L", 32000);
        left.loop_regions.push(LoopRegion::forever(10, 20, LoopType::Forward));
        left.midi_note = Some(MidiNote::from_midi_byte(60));
        let right = mono("PIANO R", 22050);

        let stereo = combine_stereo(left, right, Some("PIANO".to_string()));
        assert_eq!(stereo.channel_config, ChannelConfig::StereoSplitStreams);
        assert_eq!(stereo.num_channels, 2);
        assert_eq!(stereo.data_streams.len(), 2);
        assert_eq!(stereo.sample_rate, 32000);
        assert_eq!(stereo.loop_regions.len(), 1);
        assert_eq!(stereo.export_name, "PIANO");
        assert_eq!(stereo.name, "PIANO L");
    }

    #[test]
    fn combine_without_name_keeps_left_export_name() {
        let stereo = combine_stereo(mono("A L", 44100), mono("A R", 44100), None);
        assert_eq!(stereo.export_name, "A L");
    }

    #[test]
    fn zero_rate_falls_back_to_default() {
        assert_eq!(mono("X", 0).effective_sample_rate(), DEFAULT_SAMPLE_RATE);
        assert_eq!(mono("X", 22050).effective_sample_rate(), 22050);
    }

    #[test]
    fn export_path_appends_name() {
        let mut sample = mono("X", 0);
        sample.export_dir = vec!["A".into(), "VOL".into()];
        sample.export_name = "KICK".into();
        assert_eq!(sample.export_path(), vec!["A", "VOL", "KICK"]);
    }
}
