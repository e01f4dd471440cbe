pub mod directory;
pub mod fat_area;
pub mod id_area;
pub mod parameters;

use crate::roland::error::{RolandError, RolandResult};

/// Decodes a padded ASCII name, dropping trailing NULs and spaces.
pub fn ascii_name(raw: &[u8]) -> RolandResult<String> {
    if !raw.is_ascii() {
        return Err(RolandError::NonAsciiName(raw.to_vec()));
    }
    let end = raw
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |i| i + 1);
    Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
}
