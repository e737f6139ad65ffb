//! Character string and time content.

use {
    crate::schema::TextKind,
    der::asn1::{AnyRef, GeneralizedTime, Ia5StringRef, PrintableStringRef, UtcTime},
};

/// Text of the content octets, `None` if they are not valid for `kind`.
pub(super) fn decode(kind: TextKind, bytes: &[u8]) -> Option<String> {
    match kind {
        TextKind::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
        TextKind::Teletex => Some(bytes.iter().copied().map(char::from).collect()),
        TextKind::Bmp => {
            if bytes.len() % 2 != 0 {
                return None;
            }
            let units = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .ok()
                .filter(|text| text.chars().all(|c| u32::from(c) <= 0xffff))
        }
        _ => {
            validate_ascii(kind, bytes)?;
            String::from_utf8(bytes.to_vec()).ok()
        }
    }
}

/// Content octets of `text`, `None` if it cannot be represented as `kind`.
pub(super) fn encode(kind: TextKind, text: &str) -> Option<Vec<u8>> {
    match kind {
        TextKind::Utf8 => Some(text.as_bytes().to_vec()),
        TextKind::Teletex => text.chars().map(|c| u8::try_from(c).ok()).collect(),
        TextKind::Bmp => text
            .chars()
            .map(|c| u16::try_from(u32::from(c)).ok().map(u16::to_be_bytes))
            .collect::<Option<Vec<_>>>()
            .map(|units| units.concat()),
        _ => {
            validate_ascii(kind, text.as_bytes())?;
            Some(text.as_bytes().to_vec())
        }
    }
}

fn validate_ascii(kind: TextKind, bytes: &[u8]) -> Option<()> {
    let valid = match kind {
        TextKind::Printable => PrintableStringRef::new(bytes).is_ok(),
        TextKind::Ia5 => Ia5StringRef::new(bytes).is_ok(),
        TextKind::Visible => bytes.iter().all(|b| (0x20..=0x7e).contains(b)),
        TextKind::Numeric => bytes.iter().all(|&b| b == b' ' || b.is_ascii_digit()),
        TextKind::UtcTime => AnyRef::new(kind.tag(), bytes)
            .and_then(AnyRef::decode_as::<UtcTime>)
            .is_ok(),
        TextKind::GeneralizedTime => generalized_time(bytes).is_some(),
        TextKind::Utf8 | TextKind::Teletex | TextKind::Bmp => true,
    };
    valid.then_some(())
}

/// `YYYYMMDDHHMMSS[.f]Z`. `der` only takes whole seconds, so a fraction is
/// checked here and the rest is handed over without it.
fn generalized_time(bytes: &[u8]) -> Option<()> {
    let body = bytes.strip_suffix(b"Z")?;
    let seconds = match body.get(14) {
        Some(b'.') => {
            let fraction = &body[15..];
            let valid = !fraction.is_empty()
                && fraction.iter().all(u8::is_ascii_digit)
                && fraction.last() != Some(&b'0');
            valid.then_some(())?;
            &body[..14]
        }
        _ => body,
    };
    let whole = [seconds, &b"Z"[..]].concat();
    AnyRef::new(TextKind::GeneralizedTime.tag(), &whole)
        .and_then(AnyRef::decode_as::<GeneralizedTime>)
        .ok()
        .map(|_| ())
}
