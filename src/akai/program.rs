use crate::akai::charmap::{AKAI_SPACE, decode_name};
use crate::akai::error::AkaiResult;
use crate::akai::models::program::{
    EnvelopeRecord, KeygroupRecord, ProgramFile, ProgramHeader, VelocityZoneRecord,
};
use crate::akai::types::{
    ProgramPriority, VoiceReassign, ZoneLoopMode, stereo_output_scale_db, tune_cents,
    voice_output_scale_db,
};
use crate::generalized::MidiNote;
use crate::stream::ByteWindowStream;
use crate::tree::info::InfoItem;
use crate::tree::Describe;
use binrw::BinRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AkaiZone {
    pub sample_name: String,
    pub low_velocity: u8,
    pub high_velocity: u8,
    pub tune_semitones: i8,
    pub tune_cents: i32,
    pub loudness_offset: i8,
    pub filter_cutoff_offset: i8,
    pub pan_offset: i8,
    pub loop_mode: ZoneLoopMode,
    pub key_tracking: bool,
    pub aux_out_offset: u8,
    pub velocity_to_sample_start: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AkaiKeygroup {
    pub low_key: MidiNote,
    pub high_key: MidiNote,
    pub tune_semitones: i8,
    pub tune_cents: i32,
    pub filter_cutoff: u8,
    pub env1: EnvelopeRecord,
    pub env2: EnvelopeRecord,
    pub velocity_zone_crossfade: bool,
    pub beat_detune: i8,
    pub hold_attack_until_loop: bool,
    pub velocity_to_volume_offset: i8,
    /// Only zones that name a sample
    pub zones: Vec<AkaiZone>,
}

impl AkaiKeygroup {
    pub fn from_record(record: &KeygroupRecord) -> AkaiResult<Self> {
        let active: Vec<&VelocityZoneRecord> = record
            .velocity_zones
            .iter()
            .filter(|zone| zone.sample_name.iter().any(|&b| b != AKAI_SPACE))
            .collect();

        let zones = active
            .iter()
            .enumerate()
            .map(|(i, zone)| {
                Ok(AkaiZone {
                    sample_name: decode_name(&zone.sample_name)?,
                    low_velocity: zone.low_velocity,
                    high_velocity: zone.high_velocity,
                    tune_semitones: zone.tune_semitones,
                    tune_cents: tune_cents(zone.tune_cents),
                    loudness_offset: zone.loudness_offset,
                    filter_cutoff_offset: zone.filter_cutoff_offset,
                    pan_offset: zone.pan_offset,
                    loop_mode: ZoneLoopMode::from_raw_or(zone.loop_mode, ZoneLoopMode::AsSample),
                    key_tracking: record.enable_key_tracking.get(i).is_some_and(|&b| b != 0),
                    aux_out_offset: record.aux_out_offset.get(i).copied().unwrap_or(0),
                    velocity_to_sample_start: record
                        .velocity_to_sample_start
                        .get(i)
                        .copied()
                        .unwrap_or(0),
                })
            })
            .collect::<AkaiResult<Vec<_>>>()?;

        Ok(Self {
            low_key: MidiNote::from_akai_byte(record.low_key as i32),
            high_key: MidiNote::from_akai_byte(record.high_key as i32),
            tune_semitones: record.tune_semitones,
            tune_cents: tune_cents(record.tune_cents),
            filter_cutoff: record.filter_cutoff,
            env1: record.env1,
            env2: record.env2,
            velocity_zone_crossfade: record.velocity_zone_crossfade,
            beat_detune: record.beat_detune,
            hold_attack_until_loop: record.hold_attack_until_loop,
            velocity_to_volume_offset: record.velocity_to_volume_offset,
            zones,
        })
    }
}

/// A decoded AKAI program.
#[derive(Debug, Clone)]
pub struct AkaiProgram {
    pub name: String,
    pub header: ProgramHeader,
    pub keygroups: Vec<AkaiKeygroup>,
}

impl AkaiProgram {
    pub fn from_file(file: ByteWindowStream) -> AkaiResult<Self> {
        let program = ProgramFile::read_le(&mut file.clone())?;
        let keygroups = program
            .keygroups
            .iter()
            .map(AkaiKeygroup::from_record)
            .collect::<AkaiResult<Vec<_>>>()?;
        Ok(Self {
            name: decode_name(&program.header.name)?,
            header: program.header,
            keygroups,
        })
    }
}

fn describe_envelope(envelope: &EnvelopeRecord) -> InfoItem {
    InfoItem::map()
        .with("Attack", envelope.attack)
        .with("Decay", envelope.decay)
        .with("Sustain", envelope.sustain)
        .with("Release", envelope.release)
}

fn describe_zone(zone: &AkaiZone) -> InfoItem {
    InfoItem::map()
        .with("Sample", zone.sample_name.as_str())
        .with("Velocity", format!("{}-{}", zone.low_velocity, zone.high_velocity))
        .with("Semitone offset", zone.tune_semitones)
        .with("Cent offset", zone.tune_cents)
        .with("Loudness offset", zone.loudness_offset)
        .with("Filter offset", zone.filter_cutoff_offset)
        .with("Pan offset", zone.pan_offset)
        .with("Loop", zone.loop_mode.to_string())
        .with("Key tracking", zone.key_tracking)
}

fn describe_keygroup(keygroup: &AkaiKeygroup) -> InfoItem {
    InfoItem::map()
        .with("Keys", format!("{}-{}", keygroup.low_key, keygroup.high_key))
        .with("Semitone offset", keygroup.tune_semitones)
        .with("Cent offset", keygroup.tune_cents)
        .with("Filter", keygroup.filter_cutoff)
        .with("Amp envelope", describe_envelope(&keygroup.env1))
        .with("Filter envelope", describe_envelope(&keygroup.env2))
        .with("Velocity crossfade", keygroup.velocity_zone_crossfade)
        .with("Zones", InfoItem::list(keygroup.zones.iter().map(describe_zone)))
}

impl Describe for AkaiProgram {
    fn describe(&self) -> InfoItem {
        let header = &self.header;
        let priority = ProgramPriority::from_raw(header.priority)
            .map_or_else(|| header.priority.to_string(), |p| p.to_string());
        let reassign = VoiceReassign::from_raw(header.voice_reassign)
            .map_or_else(|| header.voice_reassign.to_string(), |r| r.to_string());

        InfoItem::map()
            .with("Name", self.name.as_str())
            .with("MIDI program", header.midi_program_number)
            .with("MIDI channel", header.midi_channel)
            .with("Polyphony", header.polyphony)
            .with("Priority", priority)
            .with(
                "Key range",
                format!(
                    "{}-{}",
                    MidiNote::from_akai_byte(header.low_key as i32),
                    MidiNote::from_akai_byte(header.high_key as i32)
                ),
            )
            .with("Octave shift", header.octave_shift)
            .with("Volume", header.volume)
            .with("Pan", header.mix_output_pan)
            .with("Semitone offset", header.tune_semitones)
            .with("Cent offset", tune_cents(header.tune_cents))
            .with("Voice reassign", reassign)
            .with("Voice output scale (dB)", voice_output_scale_db(header.voice_output_scale))
            .with("Stereo output scale (dB)", stereo_output_scale_db(header.stereo_output_scale))
            .with("Keygroups", InfoItem::list(self.keygroups.iter().map(describe_keygroup)))
    }
}
