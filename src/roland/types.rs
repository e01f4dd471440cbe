use crate::roland::constants::SAMPLING_FREQUENCIES;
use crate::roland::error::{RolandError, RolandResult};
use crate::util::raw_enum;

raw_enum! {
    pub enum LoopMode {
        ForwardEnd = 0 => "Forward, end",
        ForwardRelease = 1 => "Forward, release",
        OneShot = 2 => "One shot",
        ForwardOneShot = 3 => "Forward, one shot",
        Alternate = 4 => "Alternate",
        ReverseOneShot = 5 => "Reverse, one shot",
        ReverseLoop = 6 => "Reverse, loop",
    }
}

raw_enum! {
    pub enum SampleMode {
        Mono = 0 => "Mono",
        Stereo = 1 => "Stereo",
    }
}

/// Maps the low nibble of a sample's option byte to Hz.
pub fn sampling_frequency(selector: u8) -> RolandResult<u32> {
    SAMPLING_FREQUENCIES
        .get(selector as usize)
        .copied()
        .ok_or(RolandError::UnknownSamplingFrequency(selector))
}
