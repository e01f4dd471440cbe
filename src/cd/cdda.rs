use crate::cd::cue::models::{CueSheet, Track, TrackType};
use crate::cd::error::{CdError, CdResult};
use crate::error::SamplerRipResult;
use crate::generalized::{ChannelConfig, DataStream, Sample, StreamEncoding};
use crate::stream::{ByteWindowStream, SharedStream};
use crate::tree::info::InfoItem;
use crate::tree::{Describe, Element, SampleElement, Tree, TreeOptions};

pub const CDDA_SAMPLE_RATE: u32 = 44100;
pub const CDDA_NUM_CHANNELS: usize = 2;
pub const CDDA_SAMPLE_WIDTH: usize = 2;
pub const CDDA_SAMPLES_PER_FRAME: u64 = 588;
pub const CDDA_BYTES_PER_FRAME: u64 =
    CDDA_SAMPLE_WIDTH as u64 * CDDA_NUM_CHANNELS as u64 * CDDA_SAMPLES_PER_FRAME;

/// One audio track: interleaved 16-bit stereo PCM cut from the bin file.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    pub title: String,
    pub number: u8,
    data: ByteWindowStream,
}

impl AudioTrack {
    pub fn num_audio_samples(&self) -> u64 {
        self.data.size() / (CDDA_SAMPLE_WIDTH * CDDA_NUM_CHANNELS) as u64
    }
}

impl Describe for AudioTrack {
    fn describe(&self) -> InfoItem {
        InfoItem::map()
            .with("Title", self.title.as_str())
            .with("Track", self.number)
            .with("Sampling rate", CDDA_SAMPLE_RATE)
            .with("Channels", CDDA_NUM_CHANNELS)
            .with("Samples", self.num_audio_samples())
    }
}

impl SampleElement for AudioTrack {
    fn to_generalized(&self) -> SamplerRipResult<Sample> {
        let mut sample = Sample::new(self.title.clone());
        sample.channel_config = ChannelConfig::StereoSingleStream;
        sample.sample_rate = CDDA_SAMPLE_RATE;
        sample.num_channels = CDDA_NUM_CHANNELS;
        sample.num_audio_samples = Some(self.num_audio_samples());
        sample.data_streams.push(DataStream::new(
            self.data.clone(),
            StreamEncoding::pcm16_le(CDDA_NUM_CHANNELS),
        ));
        Ok(sample)
    }
}

/// Audio tracks with at least one index. A track starts at its first index and runs
/// to the start of the next such track; the last one runs to the end of the file.
pub fn audio_tracks(bin: &SharedStream, sheet: &CueSheet) -> CdResult<Vec<AudioTrack>> {
    let end_of_file = bin.len()?;
    let starts: Vec<(&Track, u64)> = sheet
        .tracks
        .iter()
        .filter(|track| track.track_type == TrackType::Audio)
        .filter_map(|track| {
            let first = track.indices.first()?;
            Some((track, CDDA_BYTES_PER_FRAME * first.position.to_frames()))
        })
        .collect();

    Ok(starts
        .iter()
        .enumerate()
        .map(|(i, &(track, offset))| {
            let end = starts.get(i + 1).map_or(end_of_file, |&(_, next)| next);
            AudioTrack {
                title: track
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Untitled Track {}", i + 1)),
                number: track.number,
                data: ByteWindowStream::new(bin.clone(), offset, end.saturating_sub(offset)),
            }
        })
        .collect())
}

/// A flat tree of tracks. Channels are already interleaved, so no stereo pairing.
pub fn open_cdda_image(
    bin: SharedStream,
    sheet: &CueSheet,
    name: impl Into<String>,
) -> CdResult<Tree> {
    let tracks = audio_tracks(&bin, sheet)?;
    if tracks.is_empty() {
        return Err(CdError::NoTracks);
    }
    Ok(Tree::new(
        name,
        "CDDA Image",
        move || {
            Ok(tracks
                .into_iter()
                .map(|track| Element::sample(track.title.clone(), "CDDA Track", track))
                .collect())
        },
        TreeOptions {
            combine_stereo: false,
            ..TreeOptions::default()
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cd::cue::parse_cue_sheet;
    use crate::tree::ElementKind;
    use crate::wav::tests::{chunk, read_chunks};
    use indicatif::ProgressBar;
    use std::io::{Cursor, Read};

    const SHEET: &str = r#"
FILE "disc.bin" BINARY
  TRACK 01 AUDIO
    TITLE "Kick L"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    INDEX 01 00:00:02
  TRACK 03 AUDIO
  TRACK 04 AUDIO
    TITLE "Kick R"
    INDEX 00 00:00:03
    INDEX 01 00:00:04
"#;

    fn bin() -> SharedStream {
        let bytes: Vec<u8> = (0..5 * CDDA_BYTES_PER_FRAME).map(|i| (i / 4) as u8).collect();
        SharedStream::new(Cursor::new(bytes))
    }

    #[test]
    fn tracks_span_to_the_next_index() {
        let sheet = parse_cue_sheet(SHEET).unwrap();
        let tracks = audio_tracks(&bin(), &sheet).unwrap();
        let spans: Vec<(&str, u64, u64)> = tracks
            .iter()
            .map(|t| (t.title.as_str(), t.data.offset(), t.data.size()))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("Kick L", 0, 2 * CDDA_BYTES_PER_FRAME),
                ("Untitled Track 2", 2 * CDDA_BYTES_PER_FRAME, CDDA_BYTES_PER_FRAME),
                ("Kick R", 3 * CDDA_BYTES_PER_FRAME, 2 * CDDA_BYTES_PER_FRAME),
            ]
        );
        assert_eq!(tracks[0].num_audio_samples(), 2 * CDDA_SAMPLES_PER_FRAME);
    }

    #[test]
    fn track_is_interleaved_stereo() {
        let sheet = parse_cue_sheet(SHEET).unwrap();
        let track = audio_tracks(&bin(), &sheet).unwrap().remove(1);
        let mut sample = track.to_generalized().unwrap();
        assert_eq!(sample.channel_config, ChannelConfig::StereoSingleStream);
        assert_eq!(sample.data_streams[0].encoding.channels(), 2);

        let mut head = [0u8; 4];
        sample.data_streams[0].stream.read_exact(&mut head).unwrap();
        assert_eq!(head, [0x98; 4]);
    }

    #[test]
    fn left_and_right_titles_stay_separate() {
        let sheet = parse_cue_sheet(SHEET).unwrap();
        let mut tree = open_cdda_image(bin(), &sheet, "disc.cue").unwrap();
        let root = tree.root();
        let children = tree.children(root).unwrap();
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|&c| tree.kind(c) == ElementKind::SampleLeaf));

        let destination = tempfile::tempdir().unwrap();
        let written = tree.export(root, destination.path(), &ProgressBar::hidden());
        assert_eq!(written, 3);

        let bytes = std::fs::read(destination.path().join("Kick L.wav")).unwrap();
        let chunks = read_chunks(&bytes);
        let fmt = chunk(&chunks, b"fmt ").unwrap();
        assert_eq!(u16::from_le_bytes([fmt[2], fmt[3]]), 2);
        assert_eq!(chunk(&chunks, b"data").unwrap().len() as u64, 2 * CDDA_BYTES_PER_FRAME);
    }

    #[test]
    fn sheet_without_indexed_audio_is_rejected() {
        let sheet = parse_cue_sheet("FILE \"a.bin\" BINARY\nTRACK 01 AUDIO\n").unwrap();
        assert!(matches!(open_cdda_image(bin(), &sheet, "a.cue"), Err(CdError::NoTracks)));
    }
}
