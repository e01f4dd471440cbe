use crate::cd::error::{CdError, CdResult};
use crate::stream::{ByteWindowStream, SharedStream};
use binrw::{BinRead, BinWrite};
use log::debug;

pub const MDX_COPYRIGHT_MARK: u8 = 0xA9;

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, magic = b"MEDIA DESCRIPTOR")]
pub struct MdxHeader {
    pub version: [u8; 2],

    /// Starts with the copyright sign
    #[br(assert(copyright[0] == MDX_COPYRIGHT_MARK))]
    pub copyright: [u8; 26],

    /// End of the wrapped image, counted from the start of the file
    #[brw(pad_before = 4, pad_after = 8)]
    pub total_size: u64,
}

impl MdxHeader {
    pub const SIZE: u64 = 16 + 2 + 26 + 4 + 8 + 8;
}

pub fn is_mdx_image(image: &SharedStream) -> bool {
    image
        .view()
        .is_ok_and(|mut reader| MdxHeader::read(&mut reader).is_ok())
}

/// The bytes between the header and `total_size`.
pub fn unwrap_mdx(image: SharedStream) -> CdResult<SharedStream> {
    let header = MdxHeader::read(&mut image.view()?)?;
    if header.total_size < MdxHeader::SIZE {
        return Err(CdError::MdxSizeOutOfRange {
            total: header.total_size,
            header: MdxHeader::SIZE,
        });
    }
    debug!("MDX image of {:#x} bytes", header.total_size);
    let window = ByteWindowStream::new(image, MdxHeader::SIZE, header.total_size - MdxHeader::SIZE);
    Ok(SharedStream::new(window))
}
