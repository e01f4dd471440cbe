use crate::cd::cue::error::{CueError, CueResult};
use crate::cd::cue::models::{CueSheet, Index, MSF, Track, TrackType};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

pub mod error;
pub mod models;

/// Files larger than this are never read as cue sheets.
pub const MAX_CUE_SHEET_SIZE: u64 = 0x10_0000;

lazy_static! {
    static ref FILE_LINE: Regex = Regex::new(r#"(?i)^FILE\s+"(.*?)"\s+BINARY"#).unwrap();
    static ref TRACK_LINE: Regex = Regex::new(r"(?i)^TRACK\s+(\d+)\s+([A-Za-z\d/]+)").unwrap();
    static ref TITLE_LINE: Regex = Regex::new(r#"(?i)^TITLE\s+"(.*?)""#).unwrap();
    static ref INDEX_LINE: Regex = Regex::new(r"(?i)^INDEX\s+(\d+)\s+(\S+)").unwrap();
    static ref GAP_LINE: Regex = Regex::new(r"(?i)^(PREGAP|POSTGAP)\s+(\S+)").unwrap();
}

pub struct CueParser {
    cue_path: PathBuf,
}

impl CueParser {
    pub fn new(cue_path: impl AsRef<Path>) -> Self {
        Self {
            cue_path: cue_path.as_ref().to_path_buf(),
        }
    }

    /// Reads the file as ASCII text and parses it.
    pub fn parse(&self) -> CueResult<CueSheet> {
        if fs::metadata(&self.cue_path)?.len() > MAX_CUE_SHEET_SIZE {
            return Err(CueError::NotText);
        }
        let data = fs::read(&self.cue_path)?;
        if !data.is_ascii() {
            return Err(CueError::NotText);
        }
        parse_cue_sheet(&String::from_utf8_lossy(&data))
    }

    /// The binary file named by the sheet, next to the sheet itself.
    pub fn bin_path(&self, sheet: &CueSheet) -> PathBuf {
        self.cue_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&sheet.bin_file_name)
    }
}

/// Only the first `FILE` block is kept. Unknown lines are skipped.
pub fn parse_cue_sheet(text: &str) -> CueResult<CueSheet> {
    let mut cue_sheet: Option<CueSheet> = None;
    let mut current_track: Option<Track> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = FILE_LINE.captures(line) {
            if cue_sheet.is_some() {
                debug!("Ignoring further FILE entry {:?}", &caps[1]);
                break;
            }
            cue_sheet = Some(CueSheet {
                bin_file_name: caps[1].to_string(),
                title: None,
                tracks: Vec::new(),
            });
            continue;
        }
        let Some(sheet) = cue_sheet.as_mut() else {
            continue;
        };

        if let Some(caps) = TRACK_LINE.captures(line) {
            if let Some(track) = current_track.take() {
                sheet.tracks.push(track);
            }
            current_track = Some(Track {
                number: caps[1].parse()?,
                track_type: parse_track_type(&caps[2])?,
                title: None,
                indices: Vec::new(),
                pregap: None,
                postgap: None,
            });
        } else if let Some(caps) = INDEX_LINE.captures(line) {
            if let Some(track) = &mut current_track {
                track.indices.push(Index {
                    number: caps[1].parse()?,
                    position: parse_msf(&caps[2])?,
                });
            }
        } else if let Some(caps) = TITLE_LINE.captures(line) {
            match &mut current_track {
                Some(track) => track.title = Some(caps[1].to_string()),
                None => sheet.title = Some(caps[1].to_string()),
            }
        } else if let Some(caps) = GAP_LINE.captures(line) {
            if let Some(track) = &mut current_track {
                let gap = Some(parse_msf(&caps[2])?);
                if caps[1].eq_ignore_ascii_case("PREGAP") {
                    track.pregap = gap;
                } else {
                    track.postgap = gap;
                }
            }
        }
    }

    let mut cue_sheet = cue_sheet.ok_or(CueError::NoFileEntry)?;
    if let Some(track) = current_track {
        cue_sheet.tracks.push(track);
    }
    Ok(cue_sheet)
}

fn parse_track_type(type_str: &str) -> CueResult<TrackType> {
    match type_str.to_uppercase().as_str() {
        "AUDIO" => Ok(TrackType::Audio),
        "CDG" => Ok(TrackType::CdG),
        "MODE1/2048" => Ok(TrackType::Mode1_2048),
        "MODE1/2352" => Ok(TrackType::Mode1_2352),
        "MODE2/2336" => Ok(TrackType::Mode2_2336),
        "MODE2/2352" => Ok(TrackType::Mode2_2352),
        "CDI/2336" => Ok(TrackType::CdI2336),
        "CDI/2352" => Ok(TrackType::CdI2352),
        _ => Err(CueError::InvalidTrackType(type_str.to_string())),
    }
}

fn parse_msf(msf_str: &str) -> CueResult<MSF> {
    let parts: Vec<&str> = msf_str.split(':').collect();
    if parts.len() != 3 {
        return Err(CueError::InvalidMSFFormat(msf_str.to_string()));
    }

    Ok(MSF {
        minutes: parts[0].parse()?,
        seconds: parts[1].parse()?,
        frames: parts[2].parse()?,
    })
}
