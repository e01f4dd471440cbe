use crate::generalized::{LoopType, Sample, StreamEncoding};
use crate::transcoder::Transcoder;
use crate::wav::error::{WavError, WavResult};
use crate::wav::models::{
    ChunkHeader, DATA_ID, FMT_ID, FormatChunk, RiffHeader, SMPL_ID, SampleChunk, SampleLoop,
    WAVE_FORM_TYPE, WavLoopType,
};
use binrw::BinWriterExt;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

pub mod error;
pub mod models;

const CENTS_DIV: f64 = 0x8000_0000u32 as f64 / 50.0;

/// Splits a pitch offset into whole semitones and the `smpl` pitch fraction.
pub fn normalized_pitch(semi: i32, cents: i32) -> (i32, u32) {
    let combined = 100 * semi + cents;
    let note_offset = combined.div_euclid(100);
    let cents_offset = combined.rem_euclid(100);
    (note_offset, (cents_offset as f64 * CENTS_DIV).round() as u32)
}

fn wav_loop_type(loop_type: LoopType) -> WavLoopType {
    match loop_type {
        LoopType::Forward => WavLoopType::Forward,
        LoopType::Alternating => WavLoopType::Alternating,
        LoopType::Reverse => WavLoopType::Reverse,
    }
}

pub fn smpl_chunk(sample: &Sample) -> SampleChunk {
    let sample_rate = sample.effective_sample_rate();

    let mut loops = Vec::new();
    for (index, region) in sample.loop_regions.iter().enumerate() {
        let play_count = match (region.play_count, region.duration) {
            (Some(count), _) => count,
            (None, Some(duration)) if !region.repeat_forever => {
                let single_pass = region.len() as f64 / sample_rate as f64;
                if single_pass == 0.0 {
                    debug!("Skipping empty loop {} of {}", index, sample.name);
                    continue;
                }
                (duration / single_pass).round() as u32
            }
            _ => 0,
        };

        loops.push(SampleLoop {
            cue_id: index as u32,
            loop_type: wav_loop_type(region.loop_type),
            start: region.start_sample as u32,
            end: region.end_sample as u32,
            fraction: 0,
            play_count,
        });
    }

    let (note_offset, pitch_fraction) = normalized_pitch(
        sample.pitch_offset_semi.unwrap_or(0),
        sample.pitch_offset_cents.unwrap_or(0),
    );
    let root = sample.midi_note.unwrap_or_default().transpose(note_offset);

    let mut chunk = SampleChunk::new(
        (1e9 / sample_rate as f64).round() as u32,
        root.to_midi_byte().max(0) as u32,
        pitch_fraction,
    );
    chunk.sample_loops = loops;
    chunk
}

fn needs_smpl_chunk(sample: &Sample) -> bool {
    sample.midi_note.is_some()
        || sample.pitch_offset_cents.is_some()
        || sample.pitch_offset_semi.is_some()
        || !sample.loop_regions.is_empty()
}

/// Writes `sample` as a PCM RIFF/WAVE file, streaming the audio through the transcoder.
pub fn write_wav<W: Write + Seek>(sample: Sample, writer: &mut W) -> WavResult<()> {
    let first = sample
        .data_streams
        .first()
        .ok_or_else(|| WavError::NoDataStream(sample.name.clone()))?;
    let dest = StreamEncoding {
        sample_width: first.encoding.sample_width,
        ..StreamEncoding::pcm16_le(sample.num_channels)
    };

    let start = writer.stream_position()?;
    writer.write_le(&RiffHeader {
        size: 0,
        form_type: WAVE_FORM_TYPE,
    })?;

    writer.write_le(&ChunkHeader {
        id: FMT_ID,
        size: FormatChunk::SIZE,
    })?;
    writer.write_le(&FormatChunk::pcm(
        dest.channels() as u16,
        sample.effective_sample_rate(),
        (8 * dest.sample_width) as u16,
    ))?;

    if needs_smpl_chunk(&sample) {
        let smpl = smpl_chunk(&sample);
        writer.write_le(&ChunkHeader {
            id: SMPL_ID,
            size: smpl.size(),
        })?;
        writer.write_le(&smpl)?;
    }

    let data_header = writer.stream_position()?;
    writer.write_le(&ChunkHeader {
        id: DATA_ID,
        size: 0,
    })?;

    let name = sample.name.clone();
    let mut data_size: u64 = 0;
    for chunk in Transcoder::new(sample.data_streams, dest)? {
        let chunk = chunk?;
        writer.write_all(&chunk)?;
        data_size += chunk.len() as u64;
    }
    if data_size == 0 {
        warn!("No audio data could be read for {}", name);
    }
    if data_size % 2 == 1 {
        writer.write_all(&[0])?;
    }

    let end = writer.stream_position()?;
    let data_len = u32::try_from(data_size).map_err(|_| WavError::DataTooLarge(data_size))?;
    let riff_len =
        u32::try_from(end - start - 8).map_err(|_| WavError::DataTooLarge(data_size))?;

    writer.seek(SeekFrom::Start(data_header))?;
    writer.write_le(&ChunkHeader {
        id: DATA_ID,
        size: data_len,
    })?;
    writer.seek(SeekFrom::Start(start))?;
    writer.write_le(&RiffHeader {
        size: riff_len,
        form_type: WAVE_FORM_TYPE,
    })?;
    writer.seek(SeekFrom::Start(end))?;
    writer.flush()?;

    Ok(())
}

pub fn export_wav(sample: Sample, path: impl AsRef<Path>) -> WavResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_wav(sample, &mut writer)
}
