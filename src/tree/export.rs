use crate::error::SamplerRipResult;
use crate::generalized::{Sample, combine_stereo};
use crate::tree::names::STEREO_FILENAME;
use crate::tree::{ElementKind, NodeId, Tree};
use crate::wav::export_wav;
use indicatif::ProgressBar;
use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Merges `X L`/`X R` pairs of one directory level into stereo samples named `X`.
///
/// The pair takes the position of whichever half comes first.
pub fn combine_stereo_pass(samples: Vec<Sample>) -> Vec<Sample> {
    let index_of: HashMap<String, usize> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| (s.export_name.clone(), i))
        .collect();
    let mut slots: Vec<Option<Sample>> = samples.into_iter().map(Some).collect();

    let mut result = Vec::new();
    for i in 0..slots.len() {
        let Some(sample) = slots[i].take() else {
            continue;
        };

        let partner = STEREO_FILENAME.captures(&sample.export_name).and_then(|caps| {
            let is_left = &caps[3] == "L";
            let alternate = format!("{}{}{}", &caps[1], &caps[2], if is_left { "R" } else { "L" });
            let partner_index = *index_of.get(&alternate)?;
            let partner = slots.get_mut(partner_index)?.take()?;
            Some((caps[1].to_string(), is_left, partner))
        });

        result.push(match partner {
            Some((name, true, right)) => combine_stereo(sample, right, Some(name)),
            Some((name, false, left)) => combine_stereo(left, sample, Some(name)),
            None => sample,
        });
    }
    result
}

fn write_sample(sample: Sample, destination: &Path) -> SamplerRipResult<String> {
    let relative = sample.export_path().join("/");
    let mut target = destination.to_path_buf();
    for dir in &sample.export_dir {
        target.push(dir);
    }
    fs::create_dir_all(&target)?;
    target.push(format!("{}.wav", sample.export_name));

    export_wav(sample, &target)?;
    Ok(relative)
}

impl Tree {
    /// Writes every sample below `start` to `destination`, returning how many files were written.
    pub fn export(&mut self, start: NodeId, destination: &Path, progress: &ProgressBar) -> usize {
        if self.kind(start) == ElementKind::SampleLeaf {
            let samples = self.collect_samples(&[start]);
            return self.finish_level(samples, destination, progress);
        }

        let children = match self.children(start) {
            Ok(children) => children,
            Err(err) => {
                warn!("Skipping {}: {}", self.name(start), err);
                return 0;
            }
        };

        let (samples, directories): (Vec<NodeId>, Vec<NodeId>) = children
            .into_iter()
            .filter(|child| self.kind(*child) != ElementKind::ProgramLeaf)
            .partition(|child| self.kind(*child) == ElementKind::SampleLeaf);

        let samples = self.collect_samples(&samples);
        let mut written = self.finish_level(samples, destination, progress);
        for directory in directories {
            written += self.export(directory, destination, progress);
        }
        written
    }

    fn collect_samples(&self, ids: &[NodeId]) -> Vec<Sample> {
        let mut samples = Vec::new();
        for &id in ids {
            let Some(element) = self.sample(id) else {
                continue;
            };
            match element.to_generalized() {
                Ok(mut sample) => {
                    sample.export_name = self.export_name(id).to_string();
                    sample.export_dir = self.export_dir(id);
                    samples.push(sample);
                }
                Err(err) => warn!("Skipping {}: {}", self.path(id).join("/"), err),
            }
        }
        samples
    }

    fn finish_level(
        &self,
        samples: Vec<Sample>,
        destination: &Path,
        progress: &ProgressBar,
    ) -> usize {
        let samples = if self.options().combine_stereo {
            combine_stereo_pass(samples)
        } else {
            samples
        };

        let mut written = 0;
        for sample in samples {
            let name = sample.name.clone();
            match write_sample(sample, destination) {
                Ok(relative) => {
                    info!("Exported {}.wav", relative);
                    progress.set_message(relative);
                    progress.inc(1);
                    written += 1;
                }
                Err(err) => warn!("Could not export {}: {}", name, err),
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generalized::{ChannelConfig, DataStream, StreamEncoding};
    use std::io::Cursor;

    fn named(export_name: &str) -> Sample {
        let mut sample = Sample::new(export_name);
        sample.data_streams.push(DataStream::new(
            Cursor::new(vec![0u8; 4]),
            StreamEncoding::pcm16_le(1),
        ));
        sample
    }

    fn names(samples: &[Sample]) -> Vec<(&str, ChannelConfig)> {
        samples
            .iter()
            .map(|s| (s.export_name.as_str(), s.channel_config))
            .collect()
    }

    #[test]
    fn pairs_are_merged_left_first() {
        let samples = vec![named("KICK"), named("PAD R"), named("PAD L"), named("HAT-L")];
        let combined = combine_stereo_pass(samples);
        assert_eq!(
            names(&combined),
            vec![
                ("KICK", ChannelConfig::Mono),
                ("PAD", ChannelConfig::StereoSplitStreams),
                ("HAT-L", ChannelConfig::Mono),
            ]
        );
        // Left half metadata wins even though the right half came first.
        assert_eq!(combined[1].name, "PAD L");
        assert_eq!(combined[1].num_channels, 2);
    }

    #[test]
    fn separator_must_match_for_a_pair() {
        let combined = combine_stereo_pass(vec![named("STR L"), named("STR-R")]);
        assert_eq!(combined.len(), 2);
    }
}
