use crate::fat::error::{FatError, FatResult};
use log::{trace, warn};

pub mod error;

pub const AKAI_SAT_FREE_FLAG: u16 = 0x0000;
pub const AKAI_SAT_RESERVED_FLAG_STD: u16 = 0x4000;
pub const AKAI_SAT_RESERVED_FLAG_V2: u16 = 0x8000;
pub const AKAI_SAT_EOF_FLAG: u16 = 0xC000;

pub const ROLAND_FAT_FREE_FLAG: u16 = 0x0000;
pub const ROLAND_FAT_RESERVED_FLAG: u16 = 0x0001;
pub const ROLAND_FAT_ERROR_FLAG: u16 = 0xFFF7;
pub const ROLAND_FAT_END: u16 = 0xFFF8;

/// Number of trailing Roland FAT words that hold metadata instead of links.
const ROLAND_TRAILING_ENTRIES: usize = 9;

/// Successor of one sector. Sectors never committed to a chain are single-sector ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorLink {
    pub next: u32,
    pub is_end: bool,
}

impl Default for SectorLink {
    fn default() -> Self {
        Self {
            next: 0,
            is_end: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationTable {
    links: Vec<SectorLink>,
}

impl AllocationTable {
    pub fn from_links(links: Vec<SectorLink>) -> Self {
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn link(&self, sector: u32) -> Option<SectorLink> {
        self.links.get(sector as usize).copied()
    }

    /// Follows `next` from `start` until an end link. A chain can hold at most
    /// `len()` sectors, anything longer is a cycle.
    pub fn get_chain(&self, start: u32) -> FatResult<Vec<u32>> {
        let size = self.links.len();
        let mut chain = Vec::new();
        let mut current = start;

        for _ in 0..=size {
            let link = self.link(current).ok_or(FatError::InvalidSector {
                sector: current,
                size,
            })?;
            chain.push(current);
            if link.is_end {
                trace!("chain from {} spans {} sectors", start, chain.len());
                return Ok(chain);
            }
            current = link.next;
        }

        Err(FatError::BrokenFat { start })
    }

    fn commit(&mut self, chain: &[u32]) {
        for pair in chain.windows(2) {
            self.links[pair[0] as usize] = SectorLink {
                next: pair[1],
                is_end: false,
            };
        }
        if let Some(&last) = chain.last() {
            self.links[last as usize] = SectorLink::default();
        }
    }

    /// Derives the chains of an AKAI segment allocation table.
    ///
    /// Reserved words mark header sectors that run contiguously. A chain is committed
    /// when it reaches the end flag or when a data sector follows a header run; a free,
    /// already visited or out of range word abandons it.
    pub fn akai(block: &[u16]) -> Self {
        let size = block.len();
        let mut table = Self::from_links(vec![SectorLink::default(); size]);
        let mut dirty = vec![false; size];
        let mut previous_was_directory = true;

        for i in 0..size {
            if dirty[i] {
                continue;
            }

            let mut chain: Vec<u32> = Vec::new();
            let mut index = i;
            while index < size {
                let value = block[index];
                let is_directory =
                    value == AKAI_SAT_RESERVED_FLAG_STD || value == AKAI_SAT_RESERVED_FLAG_V2;

                if !is_directory && previous_was_directory && !chain.is_empty() {
                    table.commit(&chain);
                    previous_was_directory = false;
                    break;
                }

                let points_to_visited = (value as usize) < size && dirty[value as usize];
                if value == AKAI_SAT_FREE_FLAG || (!is_directory && points_to_visited) {
                    dirty[index] = true;
                    previous_was_directory = false;
                    break;
                }

                if value >= AKAI_SAT_EOF_FLAG {
                    chain.push(index as u32);
                    table.commit(&chain);
                    dirty[index] = true;
                    previous_was_directory = is_directory;
                    break;
                }

                dirty[index] = true;
                chain.push(index as u32);
                index = if is_directory { index + 1 } else { value as usize };
                previous_was_directory = is_directory;
            }
        }

        table
    }

    /// Derives the chains of a Roland S-7xx cluster table.
    ///
    /// Entries 0 and 1 and the trailing metadata words never start a chain. An error
    /// flag anywhere, or a free/reserved word inside a chain, means the table is not
    /// usable. A chain that loops back on itself is dropped.
    pub fn roland(entries: &[u16]) -> FatResult<Self> {
        let size = entries.len();
        let mut table = Self::from_links(vec![SectorLink::default(); size]);
        let mut dirty = vec![false; size];
        let mut walk_of = vec![usize::MAX; size];
        for flag in dirty.iter_mut().take(2) {
            *flag = true;
        }

        for i in 2..size.saturating_sub(ROLAND_TRAILING_ENTRIES) {
            if dirty[i] {
                continue;
            }

            let mut chain: Vec<u32> = Vec::new();
            let mut index = i;
            while index < size {
                if walk_of[index] == i {
                    warn!("Dropping cyclic FAT chain starting at cluster {}", i);
                    break;
                }
                walk_of[index] = i;

                let value = entries[index];
                dirty[index] = true;

                if value == ROLAND_FAT_ERROR_FLAG {
                    return Err(FatError::ErrorFlag {
                        sector: index as u32,
                    });
                }

                if value == ROLAND_FAT_RESERVED_FLAG || value == ROLAND_FAT_FREE_FLAG {
                    if chain.is_empty() {
                        break;
                    }
                    let flag = if value == ROLAND_FAT_RESERVED_FLAG {
                        "reserved flag"
                    } else {
                        "free flag"
                    };
                    return Err(FatError::UnexpectedFlag {
                        flag,
                        sector: index as u32,
                    });
                }

                chain.push(index as u32);
                if value >= ROLAND_FAT_END {
                    table.commit(&chain);
                    break;
                }
                index = value as usize;
            }
        }

        Ok(table)
    }
}
