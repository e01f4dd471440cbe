use crate::akai::error::{AkaiError, AkaiResult};

const AKAI_ZERO: u8 = 0x00;
const AKAI_NINE: u8 = 0x09;
pub const AKAI_SPACE: u8 = 0x0A;
const AKAI_A: u8 = 0x0B;
const AKAI_Z: u8 = 0x24;

/// Symbols outside the digit and letter ranges, `(akai, ascii)`.
const SYMBOLS: [(u8, u8); 5] = [
    (AKAI_SPACE, b' '),
    (0x25, b'#'),
    (0x26, b'+'),
    (0x27, b'-'),
    (0x28, b'.'),
];

pub fn akai_to_ascii(byte: u8) -> AkaiResult<u8> {
    match byte {
        AKAI_ZERO..=AKAI_NINE => Ok(b'0' + byte - AKAI_ZERO),
        AKAI_A..=AKAI_Z => Ok(b'A' + byte - AKAI_A),
        _ => SYMBOLS
            .iter()
            .find(|(akai, _)| *akai == byte)
            .map(|(_, ascii)| *ascii)
            .ok_or(AkaiError::InvalidCharacter(byte)),
    }
}

pub fn ascii_to_akai(byte: u8) -> AkaiResult<u8> {
    match byte.to_ascii_uppercase() {
        upper @ b'0'..=b'9' => Ok(AKAI_ZERO + upper - b'0'),
        upper @ b'A'..=b'Z' => Ok(AKAI_A + upper - b'A'),
        upper => SYMBOLS
            .iter()
            .find(|(_, ascii)| *ascii == upper)
            .map(|(akai, _)| *akai)
            .ok_or(AkaiError::InvalidCharacter(byte)),
    }
}

/// Decodes a space padded AKAI name, dropping the trailing padding.
pub fn decode_name(raw: &[u8]) -> AkaiResult<String> {
    let end = raw
        .iter()
        .rposition(|&b| b != AKAI_SPACE)
        .map_or(0, |i| i + 1);
    raw[..end]
        .iter()
        .map(|&b| akai_to_ascii(b).map(char::from))
        .collect()
}

/// Encodes `name` into a fixed size AKAI field padded with spaces.
pub fn encode_name<const N: usize>(name: &str) -> AkaiResult<[u8; N]> {
    let mut out = [AKAI_SPACE; N];
    for (slot, c) in out.iter_mut().zip(name.chars()) {
        if !c.is_ascii() {
            return Err(AkaiError::UnencodableCharacter(c));
        }
        *slot = ascii_to_akai(c as u8)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPORTED: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ #+-.";

    #[test]
    fn every_supported_character_round_trips() {
        for &ascii in SUPPORTED {
            let akai = ascii_to_akai(ascii).unwrap();
            assert_eq!(akai_to_ascii(akai).unwrap(), ascii);
        }
        for akai in 0x00..=0x28u8 {
            let ascii = akai_to_ascii(akai).unwrap();
            assert_eq!(ascii_to_akai(ascii).unwrap(), akai);
        }
    }

    #[test]
    fn bytes_outside_the_map_are_rejected() {
        for akai in 0x29..=0xFFu8 {
            assert!(matches!(
                akai_to_ascii(akai),
                Err(AkaiError::InvalidCharacter(b)) if b == akai
            ));
        }
        assert!(matches!(ascii_to_akai(b'*'), Err(AkaiError::InvalidCharacter(b'*'))));
    }

    #[test]
    fn lowercase_is_encoded_as_uppercase() {
        assert_eq!(ascii_to_akai(b'q').unwrap(), ascii_to_akai(b'Q').unwrap());
    }

    #[test]
    fn names_are_padded_and_trimmed() {
        let raw: [u8; 12] = encode_name("TEST    1S L").unwrap();
        assert_eq!(decode_name(&raw).unwrap(), "TEST    1S L");

        let raw: [u8; 12] = encode_name("KICK").unwrap();
        assert_eq!(&raw[4..], &[AKAI_SPACE; 8]);
        assert_eq!(decode_name(&raw).unwrap(), "KICK");
        assert_eq!(decode_name(&[AKAI_SPACE; 12]).unwrap(), "");
    }

    #[test]
    fn invalid_byte_inside_a_name_fails() {
        let mut raw: [u8; 12] = encode_name("BAD").unwrap();
        raw[1] = 0x7F;
        assert!(decode_name(&raw).is_err());
    }
}
