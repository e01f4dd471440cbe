use crate::fat::AllocationTable;
use crate::roland::constants::*;
use crate::roland::error::{RolandError, RolandResult};
use crate::roland::models::ascii_name;
use crate::roland::models::directory::{DirectoryEntryRecord, RolandFileType};
use crate::roland::models::fat_area::{FatAreaRecord, FatVersion};
use crate::roland::models::id_area::{IdArea, IdAreaRecord};
use crate::roland::models::parameters::{
    PartialParamRecord, PartialSampleRecord, PatchParamRecord, PerformanceParamRecord,
    SampleParamRecord, VolumeParamRecord,
};
use crate::roland::types::{LoopMode, SampleMode, sampling_frequency};
use crate::stream::{SectorGeometry, SectorIndirectionStream, SectorMap, SharedStream};
use binrw::BinRead;
use log::debug;
use std::io::{Seek, SeekFrom};

/// The five parallel directory/parameter areas of a disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Volume,
    Performance,
    Patch,
    Partial,
    Sample,
}

impl Level {
    pub fn kind(self) -> &'static str {
        match self {
            Level::Volume => "Volume",
            Level::Performance => "Performance",
            Level::Patch => "Patch",
            Level::Partial => "Partial",
            Level::Sample => "Sample",
        }
    }

    pub fn max_count(self) -> u16 {
        match self {
            Level::Volume => MAX_NUM_VOLUME,
            Level::Performance => MAX_NUM_PERFORMANCE,
            Level::Patch => MAX_NUM_PATCH,
            Level::Partial => MAX_NUM_PARTIAL,
            Level::Sample => MAX_NUM_SAMPLE,
        }
    }

    pub fn file_type(self) -> RolandFileType {
        match self {
            Level::Volume => RolandFileType::Volume,
            Level::Performance => RolandFileType::Performance,
            Level::Patch => RolandFileType::Patch,
            Level::Partial => RolandFileType::Partial,
            Level::Sample => RolandFileType::Sample,
        }
    }

    fn directory_offset(self) -> u64 {
        match self {
            Level::Volume => VOLUME_DIRECTORY_AREA_OFFSET,
            Level::Performance => PERFORMANCE_DIRECTORY_AREA_OFFSET,
            Level::Patch => PATCH_DIRECTORY_AREA_OFFSET,
            Level::Partial => PARTIAL_DIRECTORY_AREA_OFFSET,
            Level::Sample => SAMPLE_DIRECTORY_AREA_OFFSET,
        }
    }

    fn parameter_area(self) -> (u64, u64) {
        match self {
            Level::Volume => (VOLUME_PARAMETER_AREA_OFFSET, VOLUME_PARAMETER_ENTRY_SIZE),
            Level::Performance => (
                PERFORMANCE_PARAMETER_AREA_OFFSET,
                PERFORMANCE_PARAMETER_ENTRY_SIZE,
            ),
            Level::Patch => (PATCH_PARAMETER_AREA_OFFSET, PATCH_PARAMETER_ENTRY_SIZE),
            Level::Partial => (PARTIAL_PARAMETER_AREA_OFFSET, PARTIAL_PARAMETER_ENTRY_SIZE),
            Level::Sample => (SAMPLE_PARAMETER_AREA_OFFSET, SAMPLE_PARAMETER_ENTRY_SIZE),
        }
    }

    pub fn directory_entry_offset(self, index: u16) -> u64 {
        self.directory_offset() + index as u64 * DIRECTORY_ENTRY_SIZE
    }

    pub fn parameter_entry_offset(self, index: u16) -> u64 {
        let (offset, size) = self.parameter_area();
        offset + index as u64 * size
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub index: u16,
    pub name: String,
    pub record: DirectoryEntryRecord,
}

#[derive(Debug, Clone)]
pub struct VolumeEntry {
    pub directory: DirectoryEntry,
    pub performances: Vec<u16>,
}

#[derive(Debug, Clone)]
pub struct PerformanceEntry {
    pub directory: DirectoryEntry,
    pub params: PerformanceParamRecord,
    pub patches: Vec<u16>,
}

#[derive(Debug, Clone)]
pub struct PatchEntry {
    pub directory: DirectoryEntry,
    pub params: PatchParamRecord,
    pub partials: Vec<u16>,
}

/// A used sample slot of a partial together with the sample it selects.
#[derive(Debug, Clone)]
pub struct SampleReference {
    pub slot: PartialSampleRecord,
    pub sample: SampleEntry,
}

#[derive(Debug, Clone)]
pub struct PartialEntry {
    pub directory: DirectoryEntry,
    pub params: PartialParamRecord,
    pub samples: Vec<SampleReference>,
}

#[derive(Debug, Clone)]
pub struct SampleEntry {
    pub directory: DirectoryEntry,
    pub params: SampleParamRecord,
    pub loop_mode: LoopMode,
    pub sample_mode: SampleMode,
    pub sample_rate: u32,
}

fn read_record<T>(image: &SharedStream, offset: u64) -> RolandResult<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let mut reader = image.view()?;
    reader.seek(SeekFrom::Start(offset))?;
    Ok(T::read_le(&mut reader)?)
}

/// Indexed access to the areas of an S-7xx disk. Opening validates the ID and FAT areas.
#[derive(Debug, Clone)]
pub struct RolandDisk {
    image: SharedStream,
    pub id: IdArea,
    pub version: FatVersion,
    pub num_unused_clusters: u16,
    fat: AllocationTable,
}

impl RolandDisk {
    pub fn open(image: SharedStream) -> RolandResult<Self> {
        let id = IdArea::from_record(&read_record::<IdAreaRecord>(&image, 0)?)?;
        let fat_area: FatAreaRecord = read_record(&image, FAT_AREA_OFFSET)?;
        fat_area.validate()?;
        let version = fat_area.version()?;
        let fat = AllocationTable::roland(&fat_area.entries)?;
        debug!(
            "{} {} disk \"{}\", version {}, FAT {:?}",
            id.model_version, id.disk_type, id.disk_name, id.disk_version, version
        );

        Ok(Self {
            image,
            id,
            version,
            num_unused_clusters: fat_area.num_unused_clusters(),
            fat,
        })
    }

    /// Only the ID area is checked.
    pub fn sniff(image: &SharedStream) -> bool {
        read_record::<IdAreaRecord>(image, 0)
            .and_then(|record| IdArea::from_record(&record))
            .is_ok()
    }

    fn check_index(level: Level, index: u16) -> RolandResult<()> {
        if index >= level.max_count() {
            return Err(RolandError::IndexOutOfRange {
                kind: level.kind(),
                index: index as i32,
            });
        }
        Ok(())
    }

    /// Fails with `UnusedEntry` when the slot has no name or no known type.
    pub fn directory(&self, level: Level, index: u16) -> RolandResult<DirectoryEntry> {
        Self::check_index(level, index)?;
        let mut reader = self.image.view()?;
        reader.seek(SeekFrom::Start(level.directory_entry_offset(index)))?;
        let record = DirectoryEntryRecord::read_args(&mut reader, (self.version,))?;
        let name = ascii_name(&record.name)?;
        if name.is_empty() || record.file_type() == RolandFileType::None {
            return Err(RolandError::UnusedEntry {
                kind: level.kind(),
                index,
            });
        }
        Ok(DirectoryEntry {
            index,
            name,
            record,
        })
    }

    fn parameters<T>(&self, level: Level, index: u16) -> RolandResult<T>
    where
        T: for<'a> BinRead<Args<'a> = ()>,
    {
        Self::check_index(level, index)?;
        read_record(&self.image, level.parameter_entry_offset(index))
    }

    pub fn volume(&self, index: u16) -> RolandResult<VolumeEntry> {
        let directory = self.directory(Level::Volume, index)?;
        let params: VolumeParamRecord = self.parameters(Level::Volume, index)?;
        Ok(VolumeEntry {
            directory,
            performances: params.performances(),
        })
    }

    pub fn performance(&self, index: u16) -> RolandResult<PerformanceEntry> {
        let directory = self.directory(Level::Performance, index)?;
        let params: PerformanceParamRecord = self.parameters(Level::Performance, index)?;
        Ok(PerformanceEntry {
            directory,
            patches: params.patches(),
            params,
        })
    }

    pub fn patch(&self, index: u16) -> RolandResult<PatchEntry> {
        let directory = self.directory(Level::Patch, index)?;
        let params: PatchParamRecord = self.parameters(Level::Patch, index)?;
        Ok(PatchEntry {
            directory,
            partials: params.partials(),
            params,
        })
    }

    /// Empty slots are skipped, as are slots whose sample cannot be read.
    pub fn partial(&self, index: u16) -> RolandResult<PartialEntry> {
        let directory = self.directory(Level::Partial, index)?;
        let params: PartialParamRecord = self.parameters(Level::Partial, index)?;

        let mut samples = Vec::new();
        for slot in params.sample_slots() {
            if slot.sample_selection < 0 {
                continue;
            }
            match self.sample(slot.sample_selection as u16) {
                Ok(sample) => samples.push(SampleReference {
                    slot: *slot,
                    sample,
                }),
                Err(err) => debug!(
                    "Partial {} skips sample {}: {}",
                    directory.name, slot.sample_selection, err
                ),
            }
        }

        Ok(PartialEntry {
            directory,
            params,
            samples,
        })
    }

    pub fn sample(&self, index: u16) -> RolandResult<SampleEntry> {
        let directory = self.directory(Level::Sample, index)?;
        let params: SampleParamRecord = self.parameters(Level::Sample, index)?;
        let sample_rate = sampling_frequency(params.frequency_selector())?;
        Ok(SampleEntry {
            directory,
            loop_mode: LoopMode::from_raw_or(params.loop_mode, LoopMode::ForwardEnd),
            sample_mode: SampleMode::from_raw_or(params.sample_mode(), SampleMode::Mono),
            sample_rate,
            params,
        })
    }

    /// The cluster chain of a sample, cut to its cluster count when that is shorter.
    pub fn sample_stream(&self, sample: &SampleEntry) -> RolandResult<SharedStream> {
        let record = &sample.directory.record;
        let mut chain = self.fat.get_chain(record.fat_entry as u32)?;
        let clusters = record.num_clusters as usize;
        if clusters > 0 && clusters < chain.len() {
            chain.truncate(clusters);
        }
        let stream = SectorIndirectionStream::new(
            self.image.clone(),
            SectorGeometry::plain(ROLAND_CLUSTER_SIZE, DATA_FAT_OFFSET),
            SectorMap::Chain(chain),
        );
        Ok(SharedStream::new(stream))
    }
}
