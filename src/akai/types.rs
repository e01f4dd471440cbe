use crate::util::raw_enum;

raw_enum! {
    pub enum VolumeType {
        Inactive = 0x00 => "Inactive Volume",
        S1000 = 0x01 => "S1000 Volume",
        S3000 = 0x03 => "S3000 Volume",
    }
}

raw_enum! {
    pub enum FileType {
        Drum = 0x64 => "Drum",
        ProgramS1000 = 0x70 => "S1000 Program",
        Ql = 0x71 => "QL",
        SampleS1000 = 0x73 => "S1000 Sample",
        Effect = 0x78 => "Effect",
        ProgramS3000 = 0xF0 => "S3000 Program",
        SampleS3000 = 0xF3 => "S3000 Sample",
    }
}

impl FileType {
    pub fn is_sample(self) -> bool {
        matches!(self, FileType::SampleS1000 | FileType::SampleS3000)
    }

    pub fn is_program(self) -> bool {
        matches!(self, FileType::ProgramS1000 | FileType::ProgramS3000)
    }
}

raw_enum! {
    pub enum SampleType {
        S1000 = 0x01 => "S1000 Sample",
        S3000 = 0x03 => "S3000 Sample",
    }
}

raw_enum! {
    /// Loop behavior stored in a sample header.
    pub enum SampleLoopType {
        LoopInRelease = 0x00 => "Loop in release",
        LoopUntilRelease = 0x01 => "Loop until release",
        LoopInactive = 0x02 => "No loop",
        PlayToSampleEnd = 0x03 => "Play until end",
    }
}

raw_enum! {
    /// Loop override of a keygroup velocity zone. Numbered differently from [`SampleLoopType`].
    pub enum ZoneLoopMode {
        AsSample = 0x00 => "As sample",
        LoopInRelease = 0x01 => "Loop in release",
        LoopUntilRelease = 0x02 => "Loop until release",
        LoopInactive = 0x03 => "No loop",
        PlayToSampleEnd = 0x04 => "Play until end",
    }
}

raw_enum! {
    pub enum ProgramPriority {
        Low = 0x00 => "Low",
        Normal = 0x01 => "Normal",
        High = 0x02 => "High",
        Hold = 0x03 => "Hold",
    }
}

raw_enum! {
    pub enum VoiceReassign {
        Oldest = 0x00 => "Oldest",
        Quietest = 0x01 => "Quietest",
    }
}

/// Voice output scale in dB, 0 dB for unknown values.
pub fn voice_output_scale_db(raw: u8) -> i32 {
    match raw {
        0 => -6,
        2 => 12,
        _ => 0,
    }
}

/// Stereo output scale in dB, 0 dB for unknown values.
pub fn stereo_output_scale_db(raw: u8) -> i32 {
    match raw {
        1 => 6,
        _ => 0,
    }
}

/// Converts the signed fine tune byte (+-127 per half semitone) to cents.
pub fn tune_cents(raw: i8) -> i32 {
    (raw as f64 * 50.0 / 127.0).round() as i32
}
