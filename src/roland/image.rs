use crate::roland::constants::{
    ALL_PERFORMANCES_VOLUME_NAME, MAX_NUM_PERFORMANCE, MAX_NUM_VOLUME, ORPHAN_VOLUME_NAME,
};
use crate::roland::disk::{Level, PartialEntry, PerformanceEntry, RolandDisk, VolumeEntry};
use crate::roland::error::RolandResult;
use crate::roland::models::directory::RolandFileType;
use crate::roland::program::RolandProgram;
use crate::roland::sample::RolandSample;
use crate::stream::SharedStream;
use crate::tree::{Element, Tree, TreeOptions};
use log::{debug, warn};
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

pub fn is_roland_image(image: &SharedStream) -> bool {
    RolandDisk::sniff(image)
}

/// Opens an S-7xx disk. Volumes are read when the root is first listed.
pub fn open_image(image: SharedStream, name: impl Into<String>) -> RolandResult<Tree> {
    let disk = Rc::new(RolandDisk::open(image)?);
    Ok(Tree::new(
        name,
        "Roland S-7xx Image",
        move || Ok(volume_elements(&disk)),
        TreeOptions::default(),
    ))
}

fn volume_elements(disk: &Rc<RolandDisk>) -> Vec<Element> {
    let volumes: Vec<VolumeEntry> = (0..disk.id.num_volumes.min(MAX_NUM_VOLUME))
        .filter_map(|index| match disk.volume(index) {
            Ok(volume) => Some(volume),
            Err(err) => {
                warn!("Skipping volume {}: {}", index, err);
                None
            }
        })
        .collect();

    let orphans = orphan_performances(disk, &volumes);
    let no_volumes = volumes.is_empty();
    let mut elements: Vec<Element> = volumes
        .into_iter()
        .map(|volume| volume_element(disk.clone(), volume.directory.name, volume.performances))
        .collect();

    if !orphans.is_empty() {
        let name = if no_volumes {
            ALL_PERFORMANCES_VOLUME_NAME
        } else {
            ORPHAN_VOLUME_NAME
        };
        debug!("{} performances are not in any volume", orphans.len());
        elements.push(volume_element(disk.clone(), name.to_string(), orphans));
    }
    elements
}

/// Performances no volume points at. The performance directory is only scanned
/// when the volumes reference fewer performances than the ID area counts.
pub fn orphan_performances(disk: &RolandDisk, volumes: &[VolumeEntry]) -> Vec<u16> {
    let referenced: BTreeSet<u16> = volumes
        .iter()
        .flat_map(|volume| volume.performances.iter().copied())
        .collect();
    if referenced.len() >= disk.id.num_performances as usize {
        return Vec::new();
    }

    (0..MAX_NUM_PERFORMANCE)
        .filter(|index| !referenced.contains(index))
        .filter(|&index| {
            disk.directory(Level::Performance, index)
                .is_ok_and(|entry| entry.record.file_type() == RolandFileType::Performance)
        })
        .collect()
}

fn volume_element(disk: Rc<RolandDisk>, name: String, performances: Vec<u16>) -> Element {
    Element::directory(name, "Roland S-7xx Volume", move || {
        Ok(performances
            .iter()
            .filter_map(|&index| match disk.performance(index) {
                Ok(performance) => Some(performance_element(disk.clone(), performance)),
                Err(err) => {
                    warn!("Skipping performance {}: {}", index, err);
                    None
                }
            })
            .collect())
    })
}

fn performance_element(disk: Rc<RolandDisk>, performance: PerformanceEntry) -> Element {
    let name = performance.directory.name.clone();
    Element::directory(name, "Roland S-7xx Performance", move || {
        Ok(performance_children(&disk, &performance))
    })
}

/// One program per patch, followed by every sample the patches use, each sample once.
///
/// Samples are deduplicated across the whole performance, so a sample shared by
/// several patches is listed a single time.
pub fn performance_children(disk: &RolandDisk, performance: &PerformanceEntry) -> Vec<Element> {
    let mut programs = Vec::new();
    let mut samples = Vec::new();
    let mut seen = HashSet::new();

    for &patch_index in &performance.patches {
        let patch = match disk.patch(patch_index) {
            Ok(patch) => patch,
            Err(err) => {
                warn!("Skipping patch {}: {}", patch_index, err);
                continue;
            }
        };

        let partials: Vec<PartialEntry> = patch
            .partials
            .iter()
            .filter_map(|&index| match disk.partial(index) {
                Ok(partial) => Some(partial),
                Err(err) => {
                    debug!("Patch {} skips partial {}: {}", patch.directory.name, index, err);
                    None
                }
            })
            .collect();

        for reference in partials.iter().flat_map(|partial| &partial.samples) {
            if !seen.insert(reference.sample.directory.index) {
                continue;
            }
            match RolandSample::new(disk, reference.sample.clone()) {
                Ok(sample) => samples.push(Element::sample(
                    sample.name().to_string(),
                    "Roland S-7xx Sample",
                    sample,
                )),
                Err(err) => warn!("Skipping sample {}: {}", reference.sample.directory.name, err),
            }
        }

        let name = patch.directory.name.clone();
        programs.push(Element::program(
            name,
            "Roland S-7xx Program",
            RolandProgram { patch, partials },
        ));
    }

    programs.extend(samples);
    programs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roland::disk::tests::DiskBuilder;
    use crate::roland::models::fat_area::FatVersion;
    use crate::roland::models::parameters::tests::sample;
    use crate::tree::ElementKind;
    use crate::wav::tests::{chunk, read_chunks};
    use indicatif::ProgressBar;

    fn names(tree: &mut Tree, id: crate::tree::NodeId) -> Vec<String> {
        tree.children(id)
            .unwrap()
            .into_iter()
            .map(|child| tree.name(child).to_string())
            .collect()
    }

    fn two_patch_performance(builder: &mut DiskBuilder, index: u16, name: &str) {
        builder.performance(index, name, &[0, 1]);
        builder.patch(0, "PIANO", &[0]);
        builder.patch(1, "PIANO SOFT", &[1]);
        builder.partial(0, "HARD", [0, -1, -1, -1]);
        builder.partial(1, "SOFT", [0, -1, -1, -1]);
    }

    #[test]
    fn performance_lists_programs_then_unique_samples() {
        let mut builder = DiskBuilder::new(FatVersion::V2, 1, 1);
        builder.volume(0, "LIBRARY", &[0]);
        two_patch_performance(&mut builder, 0, "GRAND");
        builder.sample(0, "PIANO C4", &sample("PIANO C4", [0, 1, 3, 3, 3], 0, 1), &[0; 8]);

        let mut tree = open_image(builder.build(), "disk.img").unwrap();
        let root = tree.root();
        assert_eq!(names(&mut tree, root), vec!["LIBRARY"]);

        let volume = tree.children(root).unwrap()[0];
        let performance = tree.children(volume).unwrap()[0];
        assert_eq!(tree.name(performance), "GRAND");
        let children = tree.children(performance).unwrap();
        let kinds: Vec<ElementKind> = children.iter().map(|&child| tree.kind(child)).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::ProgramLeaf, ElementKind::ProgramLeaf, ElementKind::SampleLeaf]
        );
        assert_eq!(tree.type_name(children[2]), "Roland S-7xx Sample");
    }

    #[test]
    fn sample_shared_by_two_patches_is_listed_once() {
        let mut builder = DiskBuilder::new(FatVersion::V2, 1, 1);
        builder.volume(0, "LIBRARY", &[0]);
        two_patch_performance(&mut builder, 0, "GRAND");
        builder.sample(0, "PIANO C4", &sample("PIANO C4", [0, 1, 3, 3, 3], 0, 1), &[0; 8]);

        let mut tree = open_image(builder.build(), "disk.img").unwrap();
        let root = tree.root();
        let volume = tree.children(root).unwrap()[0];
        let performance = tree.children(volume).unwrap()[0];
        let samples: Vec<String> = tree
            .children(performance)
            .unwrap()
            .into_iter()
            .filter(|&child| tree.kind(child) == ElementKind::SampleLeaf)
            .map(|child| tree.name(child).to_string())
            .collect();
        assert_eq!(samples, vec!["PIANO C4"]);
    }

    #[test]
    fn unreferenced_performances_get_an_orphan_volume() {
        let mut builder = DiskBuilder::new(FatVersion::V1, 1, 2);
        builder.volume(0, "LIBRARY", &[0]);
        builder.performance(0, "KEPT", &[]);
        builder.performance(5, "STRAY", &[]);

        let mut tree = open_image(builder.build(), "disk.img").unwrap();
        let root = tree.root();
        assert_eq!(names(&mut tree, root), vec!["LIBRARY", ORPHAN_VOLUME_NAME]);
        let orphan = tree.children(root).unwrap()[1];
        assert_eq!(names(&mut tree, orphan), vec!["STRAY"]);
    }

    #[test]
    fn disk_without_volumes_collects_all_performances() {
        let mut builder = DiskBuilder::new(FatVersion::V1, 0, 2);
        builder.performance(0, "ONE", &[]);
        builder.performance(1, "TWO", &[]);

        let mut tree = open_image(builder.build(), "disk.img").unwrap();
        let root = tree.root();
        assert_eq!(names(&mut tree, root), vec![ALL_PERFORMANCES_VOLUME_NAME]);
        let all = tree.children(root).unwrap()[0];
        assert_eq!(names(&mut tree, all), vec!["ONE", "TWO"]);
    }

    #[test]
    fn fully_referenced_disk_skips_the_scan() {
        let mut builder = DiskBuilder::new(FatVersion::V1, 1, 1);
        builder.volume(0, "LIBRARY", &[0]);
        builder.performance(0, "KEPT", &[]);
        builder.performance(1, "UNCOUNTED", &[]);
        let disk = RolandDisk::open(builder.build()).unwrap();
        let volumes = vec![disk.volume(0).unwrap()];
        assert!(orphan_performances(&disk, &volumes).is_empty());
    }

    #[test]
    fn export_writes_forward_end_loop() {
        let mut builder = DiskBuilder::new(FatVersion::V2, 1, 1);
        builder.volume(0, "LIBRARY", &[0]);
        builder.performance(0, "GRAND", &[0]);
        builder.patch(0, "PIANO", &[0]);
        builder.partial(0, "HARD", [0, -1, -1, -1]);
        let frames: Vec<i16> = (0..32).collect();
        let params = sample("PIANO C4", [4, 8, 19, 19, 19], 0, 0x03);
        builder.sample(0, "PIANO C4", &params, &frames);

        let mut tree = open_image(builder.build(), "disk.img").unwrap();
        let destination = tempfile::tempdir().unwrap();
        let root = tree.root();
        let written = tree.export(root, destination.path(), &ProgressBar::hidden());
        assert_eq!(written, 1);

        let path = destination
            .path()
            .join("LIBRARY")
            .join("GRAND")
            .join("PIANO C4.wav");
        let bytes = std::fs::read(&path).unwrap();
        let chunks = read_chunks(&bytes);

        let fmt = chunk(&chunks, b"fmt ").unwrap();
        assert_eq!(u16::from_le_bytes([fmt[2], fmt[3]]), 1);
        assert_eq!(u32::from_le_bytes(fmt[4..8].try_into().unwrap()), 22050);

        let smpl = chunk(&chunks, b"smpl").unwrap();
        assert_eq!(u32::from_le_bytes(smpl[28..32].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(smpl[44..48].try_into().unwrap()), 4);
        assert_eq!(u32::from_le_bytes(smpl[48..52].try_into().unwrap()), 15);

        let data = chunk(&chunks, b"data").unwrap();
        assert_eq!(data.len(), 16 * 2);
        assert_eq!(&data[..4], &[4, 0, 5, 0]);
    }
}
