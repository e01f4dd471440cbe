use crate::error::SamplerRipResult;
use crate::generalized::{DataStream, LoopRegion, LoopType, MidiNote, Sample, StreamEncoding};
use crate::roland::constants::ROLAND_SAMPLE_WIDTH;
use crate::roland::disk::{RolandDisk, SampleEntry};
use crate::roland::error::RolandResult;
use crate::roland::models::parameters::SampleParamRecord;
use crate::roland::types::LoopMode;
use crate::stream::{SharedStream, StreamReversed};
use crate::tree::info::InfoItem;
use crate::tree::{Describe, SampleElement};

/// Loop point addresses of a sample, in samples from the start of its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopPoints {
    pub start: u64,
    pub sustain_start: u64,
    pub sustain_end: u64,
    pub release_start: u64,
    pub release_end: u64,
}

impl LoopPoints {
    pub fn from_params(params: &SampleParamRecord) -> Self {
        Self {
            start: params.start.address() as u64,
            sustain_start: params.sustain_loop_start.address() as u64,
            sustain_end: params.sustain_loop_end.address() as u64,
            release_start: params.release_loop_start.address() as u64,
            release_end: params.release_loop_end.address() as u64,
        }
    }

    fn relative(&self, point: u64) -> u64 {
        point.saturating_sub(self.start)
    }

    /// Samples from `start` through `end`, both included.
    fn count_through(&self, end: u64) -> u64 {
        (end + 1).saturating_sub(self.start)
    }
}

/// Which samples are exported, in which direction, and how they loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleLayout {
    pub first: u64,
    pub count: u64,
    pub reversed: bool,
    pub loops: Vec<LoopRegion>,
}

pub fn sample_layout(mode: LoopMode, points: &LoopPoints) -> SampleLayout {
    let sustain = |loop_type| {
        LoopRegion::finite(
            points.relative(points.sustain_start),
            points.relative(points.sustain_end),
            loop_type,
        )
    };
    let layout = |end: u64, reversed, loops| SampleLayout {
        first: points.start,
        count: points.count_through(end),
        reversed,
        loops,
    };

    match mode {
        LoopMode::ForwardEnd => layout(
            points.sustain_end,
            false,
            vec![LoopRegion::forever(
                points.relative(points.sustain_start),
                points.relative(points.sustain_end),
                LoopType::Forward,
            )],
        ),
        LoopMode::ForwardRelease => layout(
            points.release_end,
            false,
            vec![
                sustain(LoopType::Forward),
                LoopRegion::forever(
                    points.relative(points.release_start),
                    points.relative(points.release_end),
                    LoopType::Forward,
                ),
            ],
        ),
        LoopMode::OneShot => layout(points.sustain_end, false, Vec::new()),
        LoopMode::ForwardOneShot => {
            layout(points.release_end, false, vec![sustain(LoopType::Forward)])
        }
        LoopMode::Alternate => {
            layout(points.sustain_end, false, vec![sustain(LoopType::Alternating)])
        }
        LoopMode::ReverseOneShot => layout(points.sustain_end, true, Vec::new()),
        // Reversed data plays from sustain_end backwards
        LoopMode::ReverseLoop => layout(
            points.sustain_end,
            true,
            vec![LoopRegion::forever(
                points.sustain_end.saturating_sub(points.start),
                points.sustain_end.saturating_sub(points.sustain_start),
                LoopType::Forward,
            )],
        ),
    }
}

/// A sample entry plus the cluster chain holding its audio.
#[derive(Debug, Clone)]
pub struct RolandSample {
    pub entry: SampleEntry,
    data: SharedStream,
}

impl RolandSample {
    pub fn new(disk: &RolandDisk, entry: SampleEntry) -> RolandResult<Self> {
        let data = disk.sample_stream(&entry)?;
        Ok(Self { entry, data })
    }

    pub fn name(&self) -> &str {
        &self.entry.directory.name
    }

    pub fn layout(&self) -> SampleLayout {
        sample_layout(self.entry.loop_mode, &LoopPoints::from_params(&self.entry.params))
    }
}

impl Describe for RolandSample {
    fn describe(&self) -> InfoItem {
        let params = &self.entry.params;
        let points = LoopPoints::from_params(params);
        InfoItem::map()
            .with("Name", self.name())
            .with("Sampling frequency", self.entry.sample_rate)
            .with("Mode", self.entry.sample_mode.to_string())
            .with("Original key", MidiNote::from_midi_byte(params.original_key as i32).to_string())
            .with("Loop mode", self.entry.loop_mode.to_string())
            .with("Start", points.start)
            .with(
                "Sustain loop",
                format!("{}-{}", points.sustain_start, points.sustain_end),
            )
            .with(
                "Release loop",
                format!("{}-{}", points.release_start, points.release_end),
            )
            .with("Sustain loop enabled", params.sustain_loop_enable != 0)
            .with("Sustain loop tune", params.sustain_loop_tune)
            .with("Release loop tune", params.release_loop_tune)
            .with("Cluster top", params.cluster_top)
            .with("Clusters", params.num_clusters)
    }
}

impl SampleElement for RolandSample {
    fn to_generalized(&self) -> SamplerRipResult<Sample> {
        let layout = self.layout();
        let width = ROLAND_SAMPLE_WIDTH as u64;
        let window = self
            .data
            .view()?
            .window(width * layout.first, width * layout.count);
        let encoding = StreamEncoding::pcm16_le(1);
        let stream = if layout.reversed {
            DataStream::new(StreamReversed::new(window, ROLAND_SAMPLE_WIDTH)?, encoding)
        } else {
            DataStream::new(window, encoding)
        };

        let mut sample = Sample::new(self.name());
        sample.sample_rate = self.entry.sample_rate;
        sample.num_audio_samples = Some(layout.count);
        sample.midi_note = Some(MidiNote::from_midi_byte(self.entry.params.original_key as i32));
        sample.pitch_offset_semi = Some(0);
        sample.pitch_offset_cents = Some(0);
        sample.loop_regions = layout.loops;
        sample.data_streams.push(stream);
        Ok(sample)
    }
}
