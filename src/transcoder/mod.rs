use crate::generalized::{DataStream, Endianness, StreamEncoding};
use crate::stream::error::StreamError;
use crate::transcoder::error::{TranscodeError, TranscodeResult};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};
use std::io::{self, Cursor, Read};

pub mod error;

const DEFAULT_BUFFER_SIZE: usize = 0x1000;

/// Frames per pull: as many as fit the default buffer for the widest stream.
fn buffer_sizes(streams: &[DataStream]) -> Vec<usize> {
    let frames = streams
        .iter()
        .map(|s| (DEFAULT_BUFFER_SIZE / s.encoding.frame_size().max(1)).max(1))
        .min()
        .unwrap_or(1);
    streams
        .iter()
        .map(|s| frames * s.encoding.frame_size())
        .collect()
}

/// Reads up to `size` bytes, stopping early only at end of stream.
fn read_chunk(stream: &mut dyn Read, size: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; size];
    let mut filled = 0;
    while filled < size {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    buf.truncate(filled);
    Ok(buf)
}

fn decode_word(cursor: &mut Cursor<&[u8]>, encoding: &StreamEncoding) -> io::Result<i64> {
    let width = encoding.sample_width;
    match (encoding.endianness, encoding.is_signed) {
        (Endianness::Little, true) => cursor.read_int::<LittleEndian>(width),
        (Endianness::Big, true) => cursor.read_int::<BigEndian>(width),
        (Endianness::Little, false) => cursor.read_uint::<LittleEndian>(width).map(|v| v as i64),
        (Endianness::Big, false) => cursor.read_uint::<BigEndian>(width).map(|v| v as i64),
    }
}

fn encode_word(out: &mut Vec<u8>, value: i64, encoding: &StreamEncoding) -> io::Result<()> {
    let width = encoding.sample_width;
    let mask = if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (8 * width)) - 1
    };
    let bits = value as u64 & mask;
    match encoding.endianness {
        Endianness::Little => out.write_uint::<LittleEndian>(bits, width),
        Endianness::Big => out.write_uint::<BigEndian>(bits, width),
    }
}

/// Splits one stream's chunk into its channels. Trailing partial words are dropped.
fn decode_chunk(buffer: &[u8], encoding: &StreamEncoding) -> io::Result<Vec<Vec<i64>>> {
    let channels = encoding.channels();
    let words = buffer.len() / encoding.sample_width;
    let mut result = vec![Vec::with_capacity(words / channels + 1); channels];
    let mut cursor = Cursor::new(buffer);
    for index in 0..words {
        result[index % channels].push(decode_word(&mut cursor, encoding)?);
    }
    Ok(result)
}

fn encode_channels(channels: &[Vec<i64>], dest: &StreamEncoding) -> io::Result<Vec<u8>> {
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len() * dest.sample_width);
    for frame in 0..frames {
        for channel in channels {
            // Short channels are padded with silence.
            let value = channel.get(frame).copied().unwrap_or(0);
            encode_word(&mut out, value, dest)?;
        }
    }
    Ok(out)
}

/// Pulls PCM from one or more data streams and yields chunks in the destination encoding.
pub enum Transcoder {
    Passthrough {
        stream: DataStream,
        buffer_size: usize,
    },
    Pipeline {
        streams: Vec<DataStream>,
        buffer_sizes: Vec<usize>,
        dest: StreamEncoding,
        finished: bool,
    },
}

impl Transcoder {
    pub fn new(streams: Vec<DataStream>, dest: StreamEncoding) -> TranscodeResult<Self> {
        if streams.is_empty() {
            return Err(TranscodeError::NoDataStream);
        }
        for width in std::iter::once(dest.sample_width)
            .chain(streams.iter().map(|s| s.encoding.sample_width))
        {
            if !(1..=8).contains(&width) {
                return Err(TranscodeError::UnsupportedSampleWidth(width));
            }
        }

        let found: usize = streams.iter().map(|s| s.encoding.channels()).sum();
        let expected = dest.num_interleaved_channels;
        if found != expected {
            return Err(TranscodeError::IncompatibleNumberOfChannels { expected, found });
        }

        let sizes = buffer_sizes(&streams);
        if streams.len() == 1 && streams[0].encoding == dest {
            debug!("Passing {} byte chunks straight through", sizes[0]);
            let buffer_size = sizes[0];
            let stream = streams.into_iter().next().ok_or(TranscodeError::NoDataStream)?;
            return Ok(Transcoder::Passthrough {
                stream,
                buffer_size,
            });
        }

        debug!("Transcoding {} streams into {:?}", streams.len(), dest);
        Ok(Transcoder::Pipeline {
            streams,
            buffer_sizes: sizes,
            dest,
            finished: false,
        })
    }

    fn next_pipeline_chunk(
        streams: &mut [DataStream],
        sizes: &[usize],
        dest: &StreamEncoding,
    ) -> io::Result<Option<Vec<u8>>> {
        let mut channels = Vec::new();
        for (stream, &size) in streams.iter_mut().zip(sizes) {
            let buffer = read_chunk(stream.stream.as_mut(), size)?;
            channels.extend(decode_chunk(&buffer, &stream.encoding)?);
        }

        if channels.iter().any(Vec::is_empty) {
            return Ok(None);
        }
        trace!("encoding {} channels", channels.len());
        encode_channels(&channels, dest).map(Some)
    }
}

/// Turns a read failure into end of stream when the sectors simply ran out.
fn end_on_sector_error(result: io::Result<Option<Vec<u8>>>) -> Option<io::Result<Vec<u8>>> {
    match result {
        Ok(chunk) => chunk.map(Ok),
        Err(err) if StreamError::is_sector_read_error(&err) => {
            debug!("Stopping at truncated data: {}", err);
            None
        }
        Err(err) => Some(Err(err)),
    }
}

impl Iterator for Transcoder {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Transcoder::Passthrough {
                stream,
                buffer_size,
            } => {
                let result = read_chunk(stream.stream.as_mut(), *buffer_size)
                    .map(|chunk| (!chunk.is_empty()).then_some(chunk));
                end_on_sector_error(result)
            }
            Transcoder::Pipeline {
                streams,
                buffer_sizes,
                dest,
                finished,
            } => {
                if *finished {
                    return None;
                }
                let item = end_on_sector_error(Self::next_pipeline_chunk(
                    streams,
                    buffer_sizes,
                    dest,
                ));
                if !matches!(item, Some(Ok(_))) {
                    *finished = true;
                }
                item
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{SectorGeometry, SectorIndirectionStream, SectorMap, SharedStream};

    fn stream(bytes: Vec<u8>, encoding: StreamEncoding) -> DataStream {
        DataStream::new(Cursor::new(bytes), encoding)
    }

    fn collect(transcoder: Transcoder) -> Vec<u8> {
        transcoder.map(|chunk| chunk.unwrap()).flatten().collect()
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Transcoder::new(Vec::new(), StreamEncoding::pcm16_le(1)),
            Err(TranscodeError::NoDataStream)
        ));
    }

    #[test]
    fn rejects_channel_mismatch() {
        let streams = vec![stream(vec![0; 4], StreamEncoding::pcm16_le(1))];
        assert!(matches!(
            Transcoder::new(streams, StreamEncoding::pcm16_le(2)),
            Err(TranscodeError::IncompatibleNumberOfChannels {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn matching_single_stream_passes_through() {
        let data: Vec<u8> = (0..10).collect();
        let transcoder = Transcoder::new(
            vec![stream(data.clone(), StreamEncoding::pcm16_le(1))],
            StreamEncoding::pcm16_le(1),
        )
        .unwrap();
        assert!(matches!(transcoder, Transcoder::Passthrough { .. }));
        assert_eq!(collect(transcoder), data);
    }

    #[test]
    fn split_streams_are_interleaved() {
        let left: Vec<u8> = [1i16, 2, 3].iter().flat_map(|s| s.to_le_bytes()).collect();
        let right: Vec<u8> = [-1i16, -2, -3].iter().flat_map(|s| s.to_le_bytes()).collect();
        let transcoder = Transcoder::new(
            vec![
                stream(left, StreamEncoding::pcm16_le(1)),
                stream(right, StreamEncoding::pcm16_le(1)),
            ],
            StreamEncoding::pcm16_le(2),
        )
        .unwrap();

        let expected: Vec<u8> = [1i16, -1, 2, -2, 3, -3]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        assert_eq!(collect(transcoder), expected);
    }

    #[test]
    fn big_endian_input_is_swapped() {
        let encoding = StreamEncoding {
            endianness: Endianness::Big,
            ..StreamEncoding::pcm16_le(1)
        };
        let transcoder = Transcoder::new(
            vec![stream(vec![0x12, 0x34, 0xFF, 0xFE], encoding)],
            StreamEncoding::pcm16_le(1),
        )
        .unwrap();
        assert_eq!(collect(transcoder), vec![0x34, 0x12, 0xFE, 0xFF]);
    }

    #[test]
    fn interleaved_stream_is_split_and_rejoined() {
        let data: Vec<u8> = [0i16, 1, 0, 1].iter().flat_map(|s| s.to_be_bytes()).collect();
        let encoding = StreamEncoding {
            endianness: Endianness::Big,
            ..StreamEncoding::pcm16_le(2)
        };
        let transcoder =
            Transcoder::new(vec![stream(data, encoding)], StreamEncoding::pcm16_le(2)).unwrap();
        assert_eq!(collect(transcoder), vec![0, 0, 1, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn short_channel_is_padded_with_silence() {
        let channels = vec![vec![5i64, 6, 7], vec![9i64]];
        let out = encode_channels(&channels, &StreamEncoding::pcm16_le(2)).unwrap();
        let expected: Vec<u8> = [5i16, 9, 6, 0, 7, 0]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn truncated_sectors_end_the_stream() {
        // Two sector chain over a parent that only holds one and a half sectors.
        let shared = SharedStream::new(Cursor::new(vec![7u8; 24]));
        let sectors = SectorIndirectionStream::new(
            shared,
            SectorGeometry::plain(16, 0),
            SectorMap::Chain(vec![0, 1]),
        );
        let mut transcoder = Transcoder::new(
            vec![DataStream::new(sectors, StreamEncoding::pcm16_le(1))],
            StreamEncoding::pcm16_le(1),
        )
        .unwrap();
        assert!(transcoder.next().is_none());
    }

    #[test]
    fn buffer_sizes_share_a_frame_count() {
        let streams = vec![
            stream(Vec::new(), StreamEncoding::pcm16_le(1)),
            stream(Vec::new(), StreamEncoding::pcm16_le(2)),
        ];
        assert_eq!(buffer_sizes(&streams), vec![0x800, 0x1000]);
    }
}
