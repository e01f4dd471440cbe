use crate::roland::disk::{PartialEntry, PatchEntry, SampleReference};
use crate::roland::models::parameters::{LfoRecord, TvaRecord, TvfRecord};
use crate::tree::Describe;
use crate::tree::info::InfoItem;

/// A patch with its partials resolved, listed as a program.
#[derive(Debug, Clone)]
pub struct RolandProgram {
    pub patch: PatchEntry,
    pub partials: Vec<PartialEntry>,
}

fn describe_sample(reference: &SampleReference) -> InfoItem {
    let slot = &reference.slot;
    InfoItem::map()
        .with("Sample", reference.sample.directory.name.as_str())
        .with("Level", slot.sample_level)
        .with("Pan", slot.pan)
        .with("Coarse tune", slot.coarse_tune)
        .with("Fine tune", slot.fine_tune)
        .with("Pitch key follow", slot.pitch_kf)
        .with(
            "Velocity",
            format!("{}-{}", slot.smt_velocity_lower, slot.smt_velocity_upper),
        )
}

fn describe_envelope(levels: &[u8; 4], times: &[u8; 4]) -> InfoItem {
    InfoItem::list(
        levels
            .iter()
            .zip(times)
            .map(|(&level, &time)| InfoItem::map().with("Level", level).with("Time", time)),
    )
}

fn describe_tvf(tvf: &TvfRecord) -> InfoItem {
    InfoItem::map()
        .with("Mode", tvf.filter_mode)
        .with("Cutoff", tvf.cutoff)
        .with("Resonance", tvf.resonance)
        .with("Envelope", describe_envelope(&tvf.levels, &tvf.times))
        .with("Envelope depth", tvf.env_tvf_depth)
        .with("Pitch depth", tvf.env_pitch_depth)
}

fn describe_tva(tva: &TvaRecord) -> InfoItem {
    InfoItem::map()
        .with("Envelope", describe_envelope(&tva.levels, &tva.times))
        .with("Level key follow", tva.level_kf)
}

fn describe_lfo(lfo: &LfoRecord) -> InfoItem {
    InfoItem::map()
        .with("Waveform", lfo.wave_form)
        .with("Rate", lfo.rate)
        .with("Delay", lfo.delay)
        .with("Pitch depth", lfo.pitch)
        .with("TVF depth", lfo.tvf_modulation_depth)
        .with("TVA depth", lfo.tva_modulation_depth)
}

fn describe_partial(partial: &PartialEntry) -> InfoItem {
    let params = &partial.params;
    InfoItem::map()
        .with("Name", partial.directory.name.as_str())
        .with("Level", params.partial_level)
        .with("Pan", params.pan)
        .with("Coarse tune", params.coarse_tune)
        .with("Fine tune", params.fine_tune)
        .with("Samples", InfoItem::list(partial.samples.iter().map(describe_sample)))
        .with("TVF", describe_tvf(&params.tvf))
        .with("TVA", describe_tva(&params.tva))
        .with("LFO", describe_lfo(&params.lfo))
}

impl Describe for RolandProgram {
    fn describe(&self) -> InfoItem {
        let params = &self.patch.params;
        InfoItem::map()
            .with("Name", self.patch.directory.name.as_str())
            .with("Program change", params.program_change_num)
            .with("Level", params.patch_level)
            .with("Pan", params.total_pan)
            .with("Priority", params.priority)
            .with("Cutoff", params.cutoff)
            .with("Velocity sensitivity", params.velocity_sensitivity)
            .with("Octave shift", params.octave_shift)
            .with("Coarse tune", params.coarse_tune)
            .with("Fine tune", params.fine_tune)
            .with("Analog feel", params.analog_feel)
            .with("Partials", InfoItem::list(self.partials.iter().map(describe_partial)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roland::disk::RolandDisk;
    use crate::roland::disk::tests::DiskBuilder;
    use crate::roland::models::fat_area::FatVersion;
    use crate::roland::models::parameters::tests::sample;

    #[test]
    fn describe_nests_partials_and_samples() {
        let mut builder = DiskBuilder::new(FatVersion::V1, 0, 0);
        builder.patch(4, "EPIANO", &[7, 8]);
        builder.partial(7, "TINE", [1, -1, -1, -1]);
        builder.partial(8, "BELL", [-1, -1, -1, -1]);
        builder.sample(1, "TINE C4", &sample("TINE C4", [0; 5], 0, 0), &[0; 8]);
        let disk = RolandDisk::open(builder.build()).unwrap();

        let patch = disk.patch(4).unwrap();
        let partials = patch
            .partials
            .iter()
            .map(|&index| disk.partial(index).unwrap())
            .collect();
        let info = RolandProgram { patch, partials }.describe();

        let InfoItem::Map(entries) = info else {
            panic!("expected a map");
        };
        assert_eq!(entries[0], ("Name".to_string(), InfoItem::text("EPIANO")));
        let (_, partials) = entries.iter().find(|(key, _)| key == "Partials").unwrap();
        let InfoItem::List(partials) = partials else {
            panic!("expected a list");
        };
        assert_eq!(partials.len(), 2);
        let InfoItem::Map(tine) = &partials[0] else {
            panic!("expected a map");
        };
        let (_, samples) = tine.iter().find(|(key, _)| key == "Samples").unwrap();
        assert!(matches!(samples, InfoItem::List(items) if items.len() == 1));
    }
}
