use crate::cd::error::CdResult;
use crate::stream::{SectorGeometry, SectorIndirectionStream, SectorMap, SharedStream};
use binrw::{BinRead, BinResult};
use byteorder::{BigEndian, ReadBytesExt};
use hex_literal::hex;
use log::debug;

pub const MDF_SECTOR_SIZE: u64 = 2352;
pub const MDF_SECTOR_HEADER_SIZE: u64 = 16;
pub const MDF_SECTOR_BODY_SIZE: u64 = 2048;
pub const MDF_SYNC_PATTERN: [u8; 12] = hex!("00 FF FF FF FF FF FF FF FF FF FF 00");
pub const MDF_SECTOR_MODE: u8 = 0x01;

pub const MDF_GEOMETRY: SectorGeometry = SectorGeometry {
    payload_size: MDF_SECTOR_BODY_SIZE,
    stride: MDF_SECTOR_SIZE,
    header_size: MDF_SECTOR_HEADER_SIZE,
    base: 0,
};

#[binrw::parser(reader)]
fn read_u24_be() -> BinResult<u32> {
    Ok(reader.read_u24::<BigEndian>()?)
}

/// The 16 bytes in front of every MDF sector payload.
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct MdfSectorHeader {
    #[br(assert(sync == MDF_SYNC_PATTERN))]
    pub sync: [u8; 12],

    #[br(parse_with = read_u24_be)]
    pub sector_id: u32,

    #[br(assert(mode == MDF_SECTOR_MODE))]
    pub mode: u8,
}

/// Probes the first sector header. Views never move another reader's cursor.
pub fn is_mdf_image(image: &SharedStream) -> bool {
    image
        .view()
        .is_ok_and(|mut reader| MdfSectorHeader::read(&mut reader).is_ok())
}

/// Strips sector headers and footers, leaving the 2048 byte payloads back to back.
pub fn unwrap_mdf(image: SharedStream) -> CdResult<SharedStream> {
    let num_sectors = image.len()? / MDF_SECTOR_SIZE;
    debug!("MDF image with {} sectors", num_sectors);
    let stream = SectorIndirectionStream::new(image, MDF_GEOMETRY, SectorMap::Linear(num_sectors));
    Ok(SharedStream::new(stream))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    /// Wraps `payload` into MDF sectors; footers are filled with 0xEE.
    pub(crate) fn mdf_image(payload: &[u8]) -> Vec<u8> {
        let mut image = Vec::new();
        for (id, body) in payload.chunks(MDF_SECTOR_BODY_SIZE as usize).enumerate() {
            image.extend_from_slice(&MDF_SYNC_PATTERN);
            image.extend_from_slice(&(id as u32).to_be_bytes()[1..]);
            image.push(MDF_SECTOR_MODE);
            image.extend_from_slice(body);
            image.resize((id + 1) * MDF_SECTOR_SIZE as usize, 0xEE);
        }
        image
    }

    #[test]
    fn sync_pattern_is_probed() {
        let image = SharedStream::new(Cursor::new(mdf_image(&[1; 16])));
        assert!(is_mdf_image(&image));

        let mut bytes = mdf_image(&[1; 16]);
        bytes[15] = 0x02;
        assert!(!is_mdf_image(&SharedStream::new(Cursor::new(bytes))));
        assert!(!is_mdf_image(&SharedStream::new(Cursor::new(vec![0u8; 8]))));
    }

    #[test]
    fn payloads_are_stitched() {
        let payload: Vec<u8> = (0..3 * MDF_SECTOR_BODY_SIZE as usize)
            .map(|i| (i / 7) as u8)
            .collect();
        let image = SharedStream::new(Cursor::new(mdf_image(&payload)));
        let inner = unwrap_mdf(image).unwrap();
        assert_eq!(inner.len().unwrap(), payload.len() as u64);

        let mut read = Vec::new();
        inner.view().unwrap().read_to_end(&mut read).unwrap();
        assert_eq!(read, payload);
    }
}
