use crate::akai::constants::AKAI_MAX_VELOCITY_ZONES;
use binrw::{BinRead, BinResult, BinWrite, Endian, binrw};
use std::io::{Read, Seek, SeekFrom};

/// Fixed part of a program file.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ProgramHeader {
    pub program_id: u8,
    /// Byte offset of the first keygroup inside the program file
    pub first_keygroup_address: u16,
    pub name: [u8; 12],
    pub midi_program_number: u8,
    pub midi_channel: u8,
    pub polyphony: u8,
    pub priority: u8,
    pub low_key: u8,
    pub high_key: u8,
    pub octave_shift: i8,
    pub aux_output_select: u8,
    pub mix_output_level: u8,
    pub mix_output_pan: i8,
    pub volume: u8,
    pub vel_to_volume: i8,
    pub key_to_volume: i8,
    pub pres_to_volume: i8,
    pub pan_lfo_rate: u8,
    pub pan_lfo_depth: u8,
    pub pan_lfo_delay: u8,
    pub key_to_pan: i8,
    pub lfo_rate: u8,
    pub lfo_depth: u8,
    pub lfo_delay: u8,
    pub mod_to_lfo_depth: u8,
    pub pres_to_lfo_depth: u8,
    pub vel_to_lfo_depth: u8,
    pub bend_to_pitch: u8,
    pub pres_to_pitch: i8,
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub keygroup_crossfade: bool,
    /// Followed by the unused program number byte
    #[brw(pad_after = 1)]
    pub number_of_keygroups: u8,
    pub key_temperaments: [i8; 12],
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub fx_output: bool,
    pub mod_to_pan: i8,
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub stereo_coherence: bool,
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub lfo_desync: bool,
    pub pitch_law: u8,
    pub voice_reassign: u8,
    pub softped_to_volume: u8,
    pub softped_to_attack: u8,
    pub softped_to_filter: u8,
    pub tune_cents: i8,
    pub tune_semitones: i8,
    pub key_to_lfo_rate: i8,
    pub key_to_lfo_depth: i8,
    pub key_to_lfo_delay: i8,
    pub voice_output_scale: u8,
    pub stereo_output_scale: u8,
}

impl ProgramHeader {
    pub const SIZE: u64 = 72;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct EnvelopeRecord {
    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,
    pub velocity_to_attack: i8,
    pub velocity_to_release: i8,
    pub off_velocity_to_release: i8,
    pub key_to_decay_and_release: i8,
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct VelocityZoneRecord {
    /// Empty for unused zones
    pub sample_name: [u8; 12],
    pub low_velocity: u8,
    pub high_velocity: u8,
    pub tune_cents: i8,
    pub tune_semitones: i8,
    pub loudness_offset: i8,
    pub filter_cutoff_offset: i8,
    pub pan_offset: i8,
    #[brw(pad_after = 4)]
    pub loop_mode: u8,
}

impl VelocityZoneRecord {
    pub const SIZE: u64 = 24;
}

/// A keygroup; its length depends on how many velocity zones it stores.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct KeygroupRecord {
    pub block_id: u8,
    /// Byte offset of the following keygroup, stale on the last one
    pub next_keygroup_address: u16,
    pub low_key: u8,
    pub high_key: u8,
    pub tune_cents: i8,
    pub tune_semitones: i8,
    pub filter_cutoff: u8,
    pub key_to_filter_cutoff: u8,
    pub velocity_to_filter_cutoff: i8,
    pub pressure_to_filter_cutoff: i8,
    pub env2_to_filter_cutoff: i8,
    pub env1: EnvelopeRecord,
    pub env2: EnvelopeRecord,
    pub velocity_to_env2_to_filter_cutoff: i8,
    pub env2_to_pitch: i8,
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub velocity_zone_crossfade: bool,

    #[br(temp, assert(
        num_velocity_zones <= AKAI_MAX_VELOCITY_ZONES,
        "{} velocity zones",
        num_velocity_zones
    ))]
    #[bw(calc = velocity_zones.len() as u8)]
    #[brw(pad_after = 2)]
    num_velocity_zones: u8,

    #[br(count = num_velocity_zones)]
    pub velocity_zones: Vec<VelocityZoneRecord>,

    pub beat_detune: i8,
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub hold_attack_until_loop: bool,
    #[br(count = num_velocity_zones)]
    pub enable_key_tracking: Vec<u8>,
    #[br(count = num_velocity_zones)]
    pub aux_out_offset: Vec<u8>,
    #[br(count = num_velocity_zones)]
    pub velocity_to_sample_start: Vec<i16>,
    #[brw(pad_after = 1)]
    pub velocity_to_volume_offset: i8,
}

impl KeygroupRecord {
    pub const HEAD_SIZE: u64 = 34;

    pub fn size(&self) -> u64 {
        let zones = self.velocity_zones.len() as u64;
        Self::HEAD_SIZE + zones * VelocityZoneRecord::SIZE + 4 + 4 * zones
    }
}

/// A program header with its chain of keygroups.
///
/// Keygroups are found by following `next_keygroup_address`, never by assuming
/// they are contiguous. Exactly `number_of_keygroups` are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramFile {
    pub header: ProgramHeader,
    pub keygroups: Vec<KeygroupRecord>,
}

impl BinRead for ProgramFile {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let header = ProgramHeader::read_options(reader, Endian::Little, ())?;

        let count = header.number_of_keygroups;
        if header.first_keygroup_address > 0 && count > 0 {
            reader.seek(SeekFrom::Start(header.first_keygroup_address as u64))?;
        }

        let mut keygroups = Vec::with_capacity(count as usize);
        for index in 0..count {
            let keygroup = KeygroupRecord::read_options(reader, Endian::Little, ())?;
            let next = keygroup.next_keygroup_address;
            if next > 0 && index + 1 < count {
                reader.seek(SeekFrom::Start(next as u64))?;
            }
            keygroups.push(keygroup);
        }

        Ok(ProgramFile { header, keygroups })
    }
}
