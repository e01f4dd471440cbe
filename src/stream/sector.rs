use crate::stream::error::{StreamError, StreamResult};
use crate::stream::{SharedStream, clamp_seek};
use std::io::{self, Read, Seek, SeekFrom};

/// Physical layout of the sectors behind a [`SectorIndirectionStream`].
///
/// Physical sector `n` starts at `base + n * stride`; its payload starts
/// `header_size` bytes later and is `payload_size` bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorGeometry {
    pub payload_size: u64,
    pub stride: u64,
    pub header_size: u64,
    pub base: u64,
}

impl SectorGeometry {
    /// Contiguous sectors without headers, as used by AKAI and Roland clusters.
    pub const fn plain(sector_size: u64, base: u64) -> Self {
        Self {
            payload_size: sector_size,
            stride: sector_size,
            header_size: 0,
            base,
        }
    }

    pub fn physical_offset(&self, sector: u64, intra: u64) -> u64 {
        self.base + self.stride * sector + self.header_size + intra
    }
}

/// Maps logical sector numbers to physical ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectorMap {
    /// Logical sector `i` is physical sector `i`, for `count` sectors.
    Linear(u64),
    /// Logical sector `i` is `chain[i]`.
    Chain(Vec<u32>),
}

impl SectorMap {
    pub fn len(&self) -> u64 {
        match self {
            SectorMap::Linear(count) => *count,
            SectorMap::Chain(chain) => chain.len() as u64,
        }
    }

    pub fn physical(&self, logical: u64) -> Option<u64> {
        match self {
            SectorMap::Linear(count) => (logical < *count).then_some(logical),
            SectorMap::Chain(chain) => chain.get(logical as usize).map(|&s| s as u64),
        }
    }
}

/// A logical byte stream stitched together from scattered physical sectors.
#[derive(Debug, Clone)]
pub struct SectorIndirectionStream {
    parent: SharedStream,
    geometry: SectorGeometry,
    map: SectorMap,
    size: u64,
    position: u64,
}

impl SectorIndirectionStream {
    pub fn new(parent: SharedStream, geometry: SectorGeometry, map: SectorMap) -> Self {
        let size = geometry.payload_size * map.len();
        Self {
            parent,
            geometry,
            map,
            size,
            position: 0,
        }
    }

    /// Limits the logical length to `size` bytes, never beyond what the sectors hold.
    pub fn with_len(mut self, size: u64) -> Self {
        self.size = size.min(self.geometry.payload_size * self.map.len());
        self
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn geometry(&self) -> SectorGeometry {
        self.geometry
    }

    pub fn sectors(&self) -> &SectorMap {
        &self.map
    }

    /// Splits `[position, position + len)` into `(physical_offset, chunk_len)` pieces
    /// that never cross a sector boundary.
    fn plan(&self, position: u64, len: u64) -> Vec<(u64, usize)> {
        let payload = self.geometry.payload_size;
        let mut pieces = Vec::new();
        let mut logical = position;
        let end = position + len;

        while logical < end {
            let index = logical / payload;
            let intra = logical % payload;
            let chunk = (payload - intra).min(end - logical);
            let Some(physical) = self.map.physical(index) else {
                break;
            };
            pieces.push((self.geometry.physical_offset(physical, intra), chunk as usize));
            logical += chunk;
        }

        pieces
    }

    fn read_planned(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        let remaining = self.size.saturating_sub(self.position);
        let wanted = (buf.len() as u64).min(remaining) as usize;
        if wanted == 0 {
            return Ok(0);
        }

        let mut filled = 0;
        for (physical, chunk) in self.plan(self.position, wanted as u64) {
            let read = self
                .parent
                .read_at(physical, &mut buf[filled..filled + chunk])?;
            filled += read;
            if read < chunk {
                break;
            }
        }

        if filled < wanted {
            return Err(StreamError::SectorReadError {
                wanted,
                read: filled,
            });
        }

        self.position += filled as u64;
        Ok(filled)
    }
}

impl Read for SectorIndirectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_planned(buf).map_err(StreamError::into_io)
    }
}

impl Seek for SectorIndirectionStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.position = clamp_seek(self.position, self.size, pos);
        Ok(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Every physical byte encodes its own sector and offset so slices can be checked.
    fn disk(sector_size: usize, sectors: usize) -> Vec<u8> {
        (0..sector_size * sectors)
            .map(|i| ((i / sector_size) as u8).wrapping_mul(31) ^ (i as u8))
            .collect()
    }

    fn expected(
        data: &[u8],
        sector_size: usize,
        chain: &[u32],
        start: usize,
        len: usize,
    ) -> Vec<u8> {
        let logical: Vec<u8> = chain
            .iter()
            .flat_map(|&s| {
                let begin = s as usize * sector_size;
                data[begin..begin + sector_size].iter().copied()
            })
            .collect();
        logical[start..start + len].to_vec()
    }

    fn check_straddling(sector_size: usize) {
        let data = disk(sector_size, 8);
        let chain = vec![5u32, 2, 7, 0];
        let shared = SharedStream::new(Cursor::new(data.clone()));

        for &(start, len) in &[
            (0, 3 * sector_size + 17),
            (sector_size - 1, 2),
            (sector_size / 2, 2 * sector_size + 5),
            (17, sector_size * 3),
            (3 * sector_size + 1, sector_size - 1),
        ] {
            let mut stream = SectorIndirectionStream::new(
                shared.clone(),
                SectorGeometry::plain(sector_size as u64, 0),
                SectorMap::Chain(chain.clone()),
            );
            stream.seek(SeekFrom::Start(start as u64)).unwrap();
            let mut buf = vec![0u8; len];
            stream.read_exact(&mut buf).unwrap();
            assert_eq!(buf, expected(&data, sector_size, &chain, start, len));
        }
    }

    #[test]
    fn straddling_reads_match_akai_sectors() {
        check_straddling(0x2000);
    }

    #[test]
    fn straddling_reads_match_roland_clusters() {
        check_straddling(0x2400);
    }

    #[test]
    fn logical_length_is_sector_count_times_payload() {
        let shared = SharedStream::new(Cursor::new(disk(16, 4)));
        let stream = SectorIndirectionStream::new(
            shared,
            SectorGeometry::plain(16, 0),
            SectorMap::Chain(vec![3, 1]),
        );
        assert_eq!(stream.size(), 32);
        assert_eq!(stream.clone().with_len(20).size(), 20);
        assert_eq!(stream.with_len(100).size(), 32);
    }

    #[test]
    fn headers_are_skipped() {
        // 4 byte header, 8 byte payload, 12 byte stride
        let mut raw = Vec::new();
        for sector in 0..3u8 {
            raw.extend_from_slice(&[0xEE; 4]);
            raw.extend((0..8).map(|i| sector * 8 + i));
        }
        let geometry = SectorGeometry {
            payload_size: 8,
            stride: 12,
            header_size: 4,
            base: 0,
        };
        let shared = SharedStream::new(Cursor::new(raw));
        let mut stream = SectorIndirectionStream::new(shared, geometry, SectorMap::Linear(3));
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, (0..24).collect::<Vec<u8>>());
    }

    #[test]
    fn truncated_parent_is_a_sector_read_error() {
        let shared = SharedStream::new(Cursor::new(vec![0u8; 24]));
        let mut stream = SectorIndirectionStream::new(
            shared,
            SectorGeometry::plain(16, 0),
            SectorMap::Chain(vec![0, 1]),
        );
        let mut buf = [0u8; 32];
        let err = stream.read(&mut buf).unwrap_err();
        assert!(StreamError::is_sector_read_error(&err));
    }

    #[test]
    fn reads_past_end_return_nothing() {
        let shared = SharedStream::new(Cursor::new(disk(16, 2)));
        let mut stream = SectorIndirectionStream::new(
            shared,
            SectorGeometry::plain(16, 0),
            SectorMap::Linear(2),
        );
        stream.seek(SeekFrom::End(0)).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }
}
