use crate::akai;
use crate::cd::cue::CueParser;
use crate::cd::{is_mdf_image, is_mdx_image, open_cdda_image, unwrap_mdf, unwrap_mdx};
use crate::commands::ExportFormat;
use crate::roland::{self, is_roland_image};
use crate::stream::SharedStream;
use crate::tree::error::TreeError;
use crate::tree::info::{InfoItem, InfoTable, InfoTree};
use crate::tree::{ElementKind, Tree};
use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar};
use log::{debug, info};
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

/// Opens a cue sheet, MDF/MDX file or raw disc image, whichever `path` turns out to be.
pub fn open_image(path: &Path) -> Result<Tree> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let parser = CueParser::new(path);
    match parser.parse() {
        Ok(sheet) => {
            let bin_path = parser.bin_path(&sheet);
            let bin = File::open(&bin_path)
                .with_context(|| format!("Could not open {}", bin_path.display()))?;
            let bin = SharedStream::new(bin);
            if sheet.is_audio_only() {
                debug!("{} is an audio CD with {} tracks", name, sheet.tracks.len());
                return Ok(open_cdda_image(bin, &sheet, name)?);
            }
            debug!("{} is a data CD, reading {}", name, bin_path.display());
            open_stream(bin, name)
        }
        Err(err) => {
            debug!("{} is not a cue sheet: {}", name, err);
            let file = File::open(path)
                .with_context(|| format!("Could not open {}", path.display()))?;
            open_stream(SharedStream::new(file), name)
        }
    }
}

/// Strips an MDF or MDX container, then reads the disc as Roland S-7xx or AKAI.
pub fn open_stream(image: SharedStream, name: String) -> Result<Tree> {
    let image = if is_mdf_image(&image) {
        debug!("{} is an MDF image", name);
        unwrap_mdf(image)?
    } else if is_mdx_image(&image) {
        debug!("{} is an MDX image", name);
        unwrap_mdx(image)?
    } else {
        image
    };

    if is_roland_image(&image) {
        debug!("{} is a Roland S-7xx image", name);
        return Ok(roland::open_image(image, name)?);
    }
    debug!("{} is read as an AKAI image", name);
    Ok(akai::open_image(image, name)?)
}

/// Renders what `ls` prints for `path`.
pub fn listing(tree: &mut Tree, path: &str) -> Result<String> {
    let node = match tree.parse_path(path) {
        Ok(node) => node,
        Err(err @ TreeError::InvalidPath { .. }) => return Ok(err.to_string()),
        Err(err) => return Err(err.into()),
    };

    if tree.kind(node) == ElementKind::Directory {
        let rows = tree
            .children(node)?
            .into_iter()
            .map(|child| vec![tree.safe_name(child).to_string(), tree.type_name(child).to_string()])
            .collect();
        return Ok(InfoTable::new(&["Item", "Type"], rows).render());
    }

    let header = vec![tree.safe_name(node).to_string(), tree.type_name(node).to_string()];
    let details = tree.describe(node).unwrap_or_else(InfoItem::map);
    Ok(InfoTree::new(header, details).render())
}

pub fn ls(image: &Path, path: &str) -> Result<()> {
    let mut tree = open_image(image)?;
    println!("{}", listing(&mut tree, path)?);
    Ok(())
}

pub fn export(
    image: &Path,
    format: ExportFormat,
    destination: &Path,
    multi: &MultiProgress,
) -> Result<usize> {
    let mut tree = open_image(image)?;
    fs::create_dir_all(destination)
        .with_context(|| format!("Could not create {}", destination.display()))?;

    let progress = multi.add(ProgressBar::new_spinner());
    progress.enable_steady_tick(Duration::from_millis(120));
    progress.set_message(format!("Exporting {}", tree.name(tree.root())));

    let written = match format {
        ExportFormat::Wav => {
            let root = tree.root();
            tree.export(root, destination, &progress)
        }
    };

    progress.finish_with_message(format!("Exported {} files", written));
    info!("Exported {} files to {}", written, destination.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cd::mdf::tests::mdf_image;
    use crate::roland::disk::tests::DiskBuilder;
    use crate::roland::models::fat_area::FatVersion;
    use crate::roland::models::parameters::tests::sample;
    use std::io::{Cursor, Read};

    fn roland_bytes() -> Vec<u8> {
        let mut builder = DiskBuilder::new(FatVersion::V1, 1, 1);
        builder.volume(0, "LIBRARY", &[0]);
        builder.performance(0, "GRAND", &[0]);
        builder.patch(0, "PIANO", &[0]);
        builder.partial(0, "HARD", [0, -1, -1, -1]);
        builder.sample(0, "PIANO C4", &sample("PIANO C4", [0, 1, 3, 3, 3], 2, 1), &[1, 2, 3, 4]);

        let mut bytes = Vec::new();
        builder.build().view().unwrap().read_to_end(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn mdf_wrapped_roland_image_is_detected() {
        let image = SharedStream::new(Cursor::new(mdf_image(&roland_bytes())));
        let mut tree = open_stream(image, "disk.mdf".to_string()).unwrap();
        assert_eq!(tree.type_name(tree.root()), "Roland S-7xx Image");
        let root = tree.root();
        let volume = tree.children(root).unwrap()[0];
        assert_eq!(tree.name(volume), "LIBRARY");
    }

    #[test]
    fn listing_prints_table_details_and_lookup_errors() {
        let image = SharedStream::new(Cursor::new(roland_bytes()));
        let mut tree = open_stream(image, "disk.img".to_string()).unwrap();

        let table = listing(&mut tree, "LIBRARY/GRAND").unwrap();
        assert!(table.contains("Item"));
        assert!(table.contains("PIANO C4"));
        assert!(table.contains("Roland S-7xx Program"));

        let details = listing(&mut tree, "LIBRARY/GRAND/PIANO C4").unwrap();
        assert!(details.contains("Roland S-7xx Sample"));

        let missing = listing(&mut tree, "LIBRARY/STRINGS").unwrap();
        assert_eq!(missing, "The entity \"STRINGS\" was not found in \"LIBRARY/\".");
    }

    #[test]
    fn cue_sheet_with_audio_tracks_opens_as_cdda() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("disc.bin"), vec![0u8; 4 * 2352]).unwrap();
        let cue = dir.path().join("disc.cue");
        fs::write(
            &cue,
            concat!(
                "FILE \"disc.bin\" BINARY\n",
                "  TRACK 01 AUDIO\n    INDEX 01 00:00:00\n",
                "  TRACK 02 AUDIO\n    INDEX 01 00:00:01\n",
            ),
        )
        .unwrap();

        let mut tree = open_image(&cue).unwrap();
        assert_eq!(tree.type_name(tree.root()), "CDDA Image");
        let root = tree.root();
        assert_eq!(tree.children(root).unwrap().len(), 2);

        let out = dir.path().join("out");
        let written = export(&cue, ExportFormat::Wav, &out, &MultiProgress::new()).unwrap();
        assert_eq!(written, 2);
        assert!(out.join("Untitled Track 1.wav").exists());
    }
}
