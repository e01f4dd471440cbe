use crate::stream::ReadSeek;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// How PCM words are laid out in a byte stream.
#[derive(Debug, Clone, Copy, Eq)]
pub struct StreamEncoding {
    pub endianness: Endianness,
    pub sample_width: usize,
    /// Values below 2 mean a single, non-interleaved channel.
    pub num_interleaved_channels: usize,
    pub is_signed: bool,
}

impl StreamEncoding {
    pub const fn pcm16_le(num_interleaved_channels: usize) -> Self {
        Self {
            endianness: Endianness::Little,
            sample_width: 2,
            num_interleaved_channels,
            is_signed: true,
        }
    }

    pub fn channels(&self) -> usize {
        self.num_interleaved_channels.max(1)
    }

    pub fn frame_size(&self) -> usize {
        self.sample_width * self.channels()
    }
}

impl Default for StreamEncoding {
    fn default() -> Self {
        Self {
            endianness: Endianness::Little,
            sample_width: 1,
            num_interleaved_channels: 0,
            is_signed: true,
        }
    }
}

impl PartialEq for StreamEncoding {
    fn eq(&self, other: &Self) -> bool {
        self.endianness == other.endianness
            && self.sample_width == other.sample_width
            && self.channels() == other.channels()
            && self.is_signed == other.is_signed
    }
}

/// PCM bytes plus the encoding needed to interpret them.
pub struct DataStream {
    pub stream: Box<dyn ReadSeek>,
    pub encoding: StreamEncoding,
}

impl DataStream {
    pub fn new(stream: impl ReadSeek + 'static, encoding: StreamEncoding) -> Self {
        Self {
            stream: Box::new(stream),
            encoding,
        }
    }
}

impl fmt::Debug for DataStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStream")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
