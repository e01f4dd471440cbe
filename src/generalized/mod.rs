pub mod data_stream;
pub mod error;
pub mod midi;
pub mod sample;

pub use data_stream::{DataStream, Endianness, StreamEncoding};
pub use midi::MidiNote;
pub use sample::{ChannelConfig, DEFAULT_SAMPLE_RATE, LoopRegion, LoopType, Sample, combine_stereo};
