use crate::roland::constants::ROLAND_NUM_KEYS;
use binrw::{BinRead, BinWrite};

/// Non-negative entries of a pointer list, sorted and without duplicates.
pub fn valid_indices(pointers: &[i16]) -> Vec<u16> {
    let mut indices: Vec<u16> = pointers
        .iter()
        .filter(|&&ptr| ptr >= 0)
        .map(|&ptr| ptr as u16)
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct VolumeParamRecord {
    #[brw(pad_after = 16)]
    pub name: [u8; 16],

    /// Negative slots are unused
    #[brw(pad_after = 0x60)]
    pub performance_ptrs: [i16; 64],
}

impl VolumeParamRecord {
    pub fn performances(&self) -> Vec<u16> {
        valid_indices(&self.performance_ptrs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PerformanceParamRecord {
    pub name: [u8; 16],
    pub parts_patch_selection: [u8; 32],
    pub midi_channel: [u8; 16],
    pub parts_level: [u8; 32],
    pub parts_zone_lower: [u8; 32],
    pub parts_zone_upper: [u8; 32],
    pub parts_fade_width_lower: [u8; 32],
    pub parts_fade_width_upper: [u8; 32],
    pub program_change: u16,
    pub pitch_bend: u16,
    pub modulation: u16,
    pub hold_pedal: u16,
    pub bend_range: u16,
    pub midi_volume: u16,
    pub after_touch_switch: u16,
    pub after_touch_mode: u16,
    pub velocity_curve_type: [u8; 16],
    #[brw(pad_after = 0xC0)]
    pub patch_ptrs: [i16; 32],
}

impl PerformanceParamRecord {
    pub fn patches(&self) -> Vec<u16> {
        valid_indices(&self.patch_ptrs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct BenderRecord {
    pub pitch_control_up: u8,
    pub pitch_control_down: u8,
    pub tva_control: u8,
    pub tvf_control: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct AfterTouchRecord {
    pub pitch_control: u8,
    pub tva_control: u8,
    pub tvf_control: u8,
    pub lfo_rate_control: u8,
    pub lfo_pitch_control: u8,
    pub lfo_tva_depth: u8,
    pub lfo_tvf_depth: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct ModulationRecord {
    pub lfo_rate_control: u8,
    pub lfo_pitch_control: u8,
    pub lfo_tva_depth: u8,
    pub lfo_tvf_depth: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct ControllerRecord {
    pub control_number: u8,
    pub pitch_control: u8,
    pub tva_control: u8,
    pub tvf_control: u8,
    pub lfo_rate_control: u8,
    pub lfo_pitch_control: u8,
    pub lfo_tva_depth: u8,
    pub lfo_tvf_depth: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PatchParamRecord {
    pub name: [u8; 16],
    pub program_change_num: u8,
    pub stereo_mix_level: u8,
    pub total_pan: u8,
    pub patch_level: u8,
    pub output_assign_8: u8,
    pub priority: u8,
    pub cutoff: u8,
    pub velocity_sensitivity: u8,
    pub octave_shift: u8,
    pub coarse_tune: u8,
    pub fine_tune: u8,
    pub smt_ctrl_selection: u8,
    pub smt_ctrl_sensitivity: u8,
    pub out_assign: u8,
    #[brw(pad_after = 1)]
    pub analog_feel: u8,
    #[brw(pad_after = 8)]
    pub keys_partial_selection: [u8; ROLAND_NUM_KEYS],
    #[brw(pad_after = 8)]
    pub keys_assign_type: [u8; ROLAND_NUM_KEYS],
    pub bender: BenderRecord,
    pub after_touch: AfterTouchRecord,
    #[brw(pad_after = 1)]
    pub modulation: ModulationRecord,
    #[brw(pad_after = 8)]
    pub controller: ControllerRecord,
    #[brw(pad_after = 0x50)]
    pub partial_ptrs: [i16; ROLAND_NUM_KEYS],
}

impl PatchParamRecord {
    pub fn partials(&self) -> Vec<u16> {
        valid_indices(&self.partial_ptrs)
    }
}

/// One of the four sample slots of a partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct PartialSampleRecord {
    /// Negative when the slot is empty
    pub sample_selection: i16,
    pub pitch_kf: u8,
    pub sample_level: u8,
    pub pan: i8,
    pub coarse_tune: i8,
    pub fine_tune: i8,
    pub smt_velocity_lower: u8,
    pub smt_fade_width_lower: u8,
    pub smt_velocity_upper: u8,
    pub smt_fade_width_upper: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct TvfRecord {
    pub filter_mode: u8,
    pub cutoff: u8,
    pub resonance: u8,
    pub velocity_curve_type: u8,
    pub velocity_curve_ratio: u8,
    pub time_velocity_sensitivity: u8,
    pub cutoff_velocity_sensitivity: u8,
    pub levels: [u8; 4],
    pub times: [u8; 4],
    pub env_tvf_depth: u8,
    pub env_pitch_depth: u8,
    pub tvf_kf_point: u8,
    pub env_time_kf: u8,
    pub env_depth_kf: u8,
    pub cutoff_kf: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct TvaRecord {
    pub velocity_curve_type: u8,
    pub velocity_curve_ratio: u8,
    pub time_velocity_sensitivity: u8,
    pub levels: [u8; 4],
    #[brw(pad_after = 1)]
    pub times: [u8; 4],
    #[brw(pad_after = 1)]
    pub tva_kf_point: u8,
    pub env_time_kf: u8,
    pub level_kf: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct LfoRecord {
    pub wave_form: u8,
    pub rate: u8,
    pub key_sync: u8,
    pub delay: u8,
    pub delay_kf: u8,
    pub detune: u8,
    pub pitch: u8,
    pub tvf_modulation_depth: u8,
    pub tva_modulation_depth: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PartialParamRecord {
    pub name: [u8; 16],
    #[brw(pad_after = 1)]
    pub sample_1: PartialSampleRecord,
    pub output_assign_8: u8,
    pub stereo_mix_level: u8,
    pub partial_level: u8,
    pub output_assign_6: u8,
    #[brw(pad_after = 1)]
    pub sample_2: PartialSampleRecord,
    pub pan: u8,
    pub coarse_tune: i8,
    pub fine_tune: i8,
    pub breath_control: u8,
    #[brw(pad_after = 5)]
    pub sample_3: PartialSampleRecord,
    pub sample_4: PartialSampleRecord,
    pub tvf: TvfRecord,
    pub tva: TvaRecord,
    #[brw(pad_after = 7)]
    pub lfo: LfoRecord,
}

impl PartialParamRecord {
    pub fn sample_slots(&self) -> [&PartialSampleRecord; 4] {
        [&self.sample_1, &self.sample_2, &self.sample_3, &self.sample_4]
    }
}

/// A sample address: the upper 24 bits count samples, the low byte is a fine offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct LoopPointRecord {
    pub raw: u32,
}

impl LoopPointRecord {
    pub fn address(&self) -> u32 {
        self.raw >> 8
    }

    pub fn fine(&self) -> u8 {
        (self.raw & 0xFF) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct SampleParamRecord {
    pub name: [u8; 16],
    pub start: LoopPointRecord,
    pub sustain_loop_start: LoopPointRecord,
    pub sustain_loop_end: LoopPointRecord,
    pub release_loop_start: LoopPointRecord,
    pub release_loop_end: LoopPointRecord,
    pub loop_mode: u8,
    pub sustain_loop_enable: u8,
    pub sustain_loop_tune: u8,
    pub release_loop_tune: u8,
    pub cluster_top: u16,
    pub num_clusters: u16,
    /// Sample mode in the high nibble, frequency selector in the low nibble
    pub options: u8,
    #[brw(pad_after = 2)]
    pub original_key: u8,
}

impl SampleParamRecord {
    pub fn sample_mode(&self) -> u8 {
        self.options >> 4
    }

    pub fn frequency_selector(&self) -> u8 {
        self.options & 0x0F
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::roland::constants::{
        PARTIAL_PARAMETER_ENTRY_SIZE, PATCH_PARAMETER_ENTRY_SIZE, PERFORMANCE_PARAMETER_ENTRY_SIZE,
        SAMPLE_PARAMETER_ENTRY_SIZE, VOLUME_PARAMETER_ENTRY_SIZE,
    };
    use binrw::BinWriterExt;
    use std::io::Cursor;

    pub(crate) fn name16(name: &str) -> [u8; 16] {
        let mut raw = [b' '; 16];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        raw
    }

    pub(crate) fn volume(name: &str, performances: &[i16]) -> VolumeParamRecord {
        let mut performance_ptrs = [-1; 64];
        performance_ptrs[..performances.len()].copy_from_slice(performances);
        VolumeParamRecord {
            name: name16(name),
            performance_ptrs,
        }
    }

    pub(crate) fn performance(name: &str, patches: &[i16]) -> PerformanceParamRecord {
        let mut patch_ptrs = [-1; 32];
        patch_ptrs[..patches.len()].copy_from_slice(patches);
        PerformanceParamRecord {
            name: name16(name),
            parts_patch_selection: [0; 32],
            midi_channel: [0; 16],
            parts_level: [127; 32],
            parts_zone_lower: [0; 32],
            parts_zone_upper: [127; 32],
            parts_fade_width_lower: [0; 32],
            parts_fade_width_upper: [0; 32],
            program_change: 0,
            pitch_bend: 0,
            modulation: 0,
            hold_pedal: 0,
            bend_range: 2,
            midi_volume: 0,
            after_touch_switch: 0,
            after_touch_mode: 0,
            velocity_curve_type: [0; 16],
            patch_ptrs,
        }
    }

    pub(crate) fn patch(name: &str, partials: &[i16]) -> PatchParamRecord {
        let mut partial_ptrs = [-1; ROLAND_NUM_KEYS];
        partial_ptrs[..partials.len()].copy_from_slice(partials);
        PatchParamRecord {
            name: name16(name),
            program_change_num: 0,
            stereo_mix_level: 0,
            total_pan: 64,
            patch_level: 127,
            output_assign_8: 0,
            priority: 0,
            cutoff: 127,
            velocity_sensitivity: 0,
            octave_shift: 0,
            coarse_tune: 0,
            fine_tune: 0,
            smt_ctrl_selection: 0,
            smt_ctrl_sensitivity: 0,
            out_assign: 0,
            analog_feel: 0,
            keys_partial_selection: [0; ROLAND_NUM_KEYS],
            keys_assign_type: [0; ROLAND_NUM_KEYS],
            bender: BenderRecord::default(),
            after_touch: AfterTouchRecord::default(),
            modulation: ModulationRecord::default(),
            controller: ControllerRecord::default(),
            partial_ptrs,
        }
    }

    pub(crate) fn partial(name: &str, samples: [i16; 4]) -> PartialParamRecord {
        let slot = |sample_selection| PartialSampleRecord {
            sample_selection,
            sample_level: 127,
            ..PartialSampleRecord::default()
        };
        PartialParamRecord {
            name: name16(name),
            sample_1: slot(samples[0]),
            output_assign_8: 0,
            stereo_mix_level: 0,
            partial_level: 127,
            output_assign_6: 0,
            sample_2: slot(samples[1]),
            pan: 64,
            coarse_tune: 0,
            fine_tune: 0,
            breath_control: 0,
            sample_3: slot(samples[2]),
            sample_4: slot(samples[3]),
            tvf: TvfRecord::default(),
            tva: TvaRecord::default(),
            lfo: LfoRecord::default(),
        }
    }

    /// Loop points given as whole sample addresses.
    pub(crate) fn sample(
        name: &str,
        points: [u32; 5],
        loop_mode: u8,
        options: u8,
    ) -> SampleParamRecord {
        let point = |address: u32| LoopPointRecord { raw: address << 8 };
        SampleParamRecord {
            name: name16(name),
            start: point(points[0]),
            sustain_loop_start: point(points[1]),
            sustain_loop_end: point(points[2]),
            release_loop_start: point(points[3]),
            release_loop_end: point(points[4]),
            loop_mode,
            sustain_loop_enable: 1,
            sustain_loop_tune: 0,
            release_loop_tune: 0,
            cluster_top: 0,
            num_clusters: 1,
            options,
            original_key: 60,
        }
    }

    macro_rules! size_of {
        ($value:expr) => {{
            let mut buf = Cursor::new(Vec::new());
            buf.write_le(&$value).unwrap();
            buf.into_inner().len() as u64
        }};
    }

    #[test]
    fn records_fill_their_slots() {
        assert_eq!(size_of!(volume("V", &[])), VOLUME_PARAMETER_ENTRY_SIZE);
        assert_eq!(size_of!(performance("P", &[])), PERFORMANCE_PARAMETER_ENTRY_SIZE);
        assert_eq!(size_of!(patch("P", &[])), PATCH_PARAMETER_ENTRY_SIZE);
        assert_eq!(size_of!(partial("P", [-1; 4])), PARTIAL_PARAMETER_ENTRY_SIZE);
        assert_eq!(size_of!(sample("S", [0; 5], 0, 0)), SAMPLE_PARAMETER_ENTRY_SIZE);
    }

    #[test]
    fn pointer_lists_are_filtered() {
        assert_eq!(valid_indices(&[5, -1, 2, 5, -300, 0]), vec![0, 2, 5]);
        assert_eq!(volume("V", &[3, 3, -1, 1]).performances(), vec![1, 3]);
    }

    #[test]
    fn loop_point_splits_address_and_fine() {
        let point = LoopPointRecord { raw: 0x0012_3456 };
        assert_eq!(point.address(), 0x1234);
        assert_eq!(point.fine(), 0x56);
    }

    #[test]
    fn option_nibbles() {
        let record = sample("S", [0; 5], 0, 0x13);
        assert_eq!(record.sample_mode(), 1);
        assert_eq!(record.frequency_selector(), 3);
    }
}
