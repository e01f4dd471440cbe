pub const FRAMES_PER_SECOND: u32 = 75;

/// The first `FILE ... BINARY` block of a cue sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    pub bin_file_name: String,
    /// Disc title, from a `TITLE` line before the first track
    pub title: Option<String>,
    pub tracks: Vec<Track>,
}

impl CueSheet {
    pub fn is_audio_only(&self) -> bool {
        self.tracks
            .iter()
            .all(|track| track.track_type == TrackType::Audio)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub number: u8,
    pub track_type: TrackType,
    pub title: Option<String>,
    pub indices: Vec<Index>,
    pub pregap: Option<MSF>,
    pub postgap: Option<MSF>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    pub number: u8,
    pub position: MSF,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MSF {
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl MSF {
    /// Absolute frame count, 75 frames per second.
    pub fn to_frames(&self) -> u64 {
        (self.minutes as u64 * 60 + self.seconds as u64) * FRAMES_PER_SECOND as u64
            + self.frames as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackType {
    Audio,
    CdG,
    Mode1_2048,
    Mode1_2352,
    Mode2_2336,
    Mode2_2352,
    CdI2336,
    CdI2352,
}
