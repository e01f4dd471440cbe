use crate::akai::charmap::decode_name;
use crate::akai::constants::AKAI_SECTOR_SIZE;
use crate::akai::error::{AkaiError, AkaiResult};
use crate::akai::models::file_entry::{FileEntryRecord, FileTable};
use crate::akai::models::partition::{PartitionHeader, PartitionTables, VolumeEntryRecord};
use crate::akai::program::AkaiProgram;
use crate::akai::sample::AkaiSample;
use crate::akai::types::{FileType, VolumeType};
use crate::error::SamplerRipResult;
use crate::fat::AllocationTable;
use crate::stream::{
    ByteWindowStream, SectorGeometry, SectorIndirectionStream, SectorMap, SharedStream,
};
use crate::tree::{Element, Tree, TreeOptions};
use binrw::BinRead;
use log::{debug, warn};
use std::io::{Seek, SeekFrom};
use std::rc::Rc;

/// A partition found by the image scan, tables still undecoded.
#[derive(Debug, Clone)]
pub struct Partition {
    pub name: String,
    /// Byte offset of the partition header in the image
    pub offset: u64,
    pub header: PartitionHeader,
    pub tables: PartitionTables,
}

/// Uppercases, trims and drops a trailing `:` so `a` and `A:` both find partition `A:`.
pub fn akai_sanitizer(token: &str) -> String {
    let token = token.trim().to_uppercase();
    token.strip_suffix(':').unwrap_or(&token).trim().to_string()
}

/// Reads partitions back to back until a header or its tables do not parse.
pub fn scan_partitions(image: &SharedStream) -> AkaiResult<Vec<Partition>> {
    let mut reader = image.view()?;
    let image_size = reader.size();
    let mut partitions = Vec::new();
    let mut offset = 0;

    while offset < image_size {
        reader.seek(SeekFrom::Start(offset))?;
        let header = match PartitionHeader::read(&mut reader) {
            Ok(header) => header,
            Err(err) => {
                debug!("No partition header at {:#x}: {}", offset, err);
                break;
            }
        };
        let tables = match PartitionTables::read(&mut reader) {
            Ok(tables) => tables,
            Err(err) => {
                debug!("Partition tables at {:#x} are truncated: {}", offset, err);
                break;
            }
        };

        let name = format!("{}:", (b'A' + (partitions.len() % 26) as u8) as char);
        debug!("Found partition {} at {:#x} ({} sectors)", name, offset, header.size);
        let next = offset + header.size as u64 * AKAI_SECTOR_SIZE;
        partitions.push(Partition {
            name,
            offset,
            header,
            tables,
        });
        offset = next;
    }

    Ok(partitions)
}

/// Opens an AKAI S1000/S3000 image. Fails when not even one partition is present.
pub fn open_image(image: SharedStream, name: impl Into<String>) -> AkaiResult<Tree> {
    let partitions = scan_partitions(&image)?;
    if partitions.is_empty() {
        return Err(AkaiError::NoPartitions);
    }

    Ok(Tree::new(
        name,
        "AKAI Image",
        move || {
            Ok(partitions
                .into_iter()
                .map(|partition| partition_element(image.clone(), partition))
                .collect())
        },
        TreeOptions {
            sanitizer: akai_sanitizer,
            combine_stereo: true,
        },
    ))
}

/// Reads the file behind a chain of partition sectors.
struct PartitionContext {
    image: SharedStream,
    offset: u64,
    sat: AllocationTable,
}

impl PartitionContext {
    fn chain_stream(&self, start: u16) -> AkaiResult<SectorIndirectionStream> {
        let chain = self.sat.get_chain(start as u32)?;
        Ok(SectorIndirectionStream::new(
            self.image.clone(),
            SectorGeometry::plain(AKAI_SECTOR_SIZE, self.offset),
            SectorMap::Chain(chain),
        ))
    }
}

fn partition_element(image: SharedStream, partition: Partition) -> Element {
    Element::directory(partition.name.clone(), "Partition", move || {
        let context = Rc::new(PartitionContext {
            image,
            offset: partition.offset,
            sat: AllocationTable::akai(&partition.tables.sat),
        });
        Ok(partition
            .tables
            .volumes
            .iter()
            .filter_map(|record| match volume_element(&context, record) {
                Ok(element) => element,
                Err(err) => {
                    warn!("Skipping volume in {}: {}", partition.name, err);
                    None
                }
            })
            .collect())
    })
}

fn volume_element(
    context: &Rc<PartitionContext>,
    record: &VolumeEntryRecord,
) -> AkaiResult<Option<Element>> {
    let raw = (record.type_raw & 0x03) as u8;
    let volume_type = VolumeType::from_raw(raw).ok_or(AkaiError::UnknownEnumValue {
        kind: "volume type",
        value: raw,
    })?;
    if volume_type == VolumeType::Inactive {
        return Ok(None);
    }

    let name = decode_name(&record.name)?;
    let start = record.start;
    let context = context.clone();
    Ok(Some(Element::directory(
        name,
        volume_type.to_string(),
        move || volume_files(&context, start),
    )))
}

fn volume_files(context: &Rc<PartitionContext>, start: u16) -> SamplerRipResult<Vec<Element>> {
    let table = FileTable::read_le(&mut context.chain_stream(start)?).map_err(AkaiError::from)?;
    debug!("Volume at sector {} lists {} files", start, table.entries.len());

    Ok(table
        .entries
        .iter()
        .filter_map(|entry| match file_element(context, entry) {
            Ok(element) => element,
            Err(err) => {
                warn!("Skipping file entry: {}", err);
                None
            }
        })
        .collect())
}

fn file_element(
    context: &PartitionContext,
    entry: &FileEntryRecord,
) -> AkaiResult<Option<Element>> {
    let file_type = FileType::from_raw(entry.file_type).ok_or(AkaiError::UnknownEnumValue {
        kind: "file type",
        value: entry.file_type,
    })?;
    let name = decode_name(&entry.name)?;
    if !file_type.is_sample() && !file_type.is_program() {
        debug!("Ignoring {} {}", file_type, name);
        return Ok(None);
    }

    let sectors = context.chain_stream(entry.start)?;
    let file = ByteWindowStream::new(SharedStream::new(sectors), 0, entry.size as u64);

    Ok(Some(if file_type.is_sample() {
        Element::sample(name, file_type.to_string(), AkaiSample::from_file(file)?)
    } else {
        Element::program(name, file_type.to_string(), AkaiProgram::from_file(file)?)
    }))
}
