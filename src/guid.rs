//! 128-bit interface and class identifiers.
//!
//! In memory the first three fields are native little-endian integers while
//! `data4` keeps the byte order of the string form, so the last 8 bytes read
//! "backwards" compared to a plain big-endian view of the first 8.

use std::fmt;
use std::str::FromStr;

use crate::error::GuidError;

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GUID {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

const GROUP_WIDTHS: [usize; 5] = [8, 4, 4, 4, 12];

const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Reads `len` hex digits starting at `start`.
const fn read_hex(s: &[u8], start: usize, len: usize) -> Result<u64, GuidError> {
    let mut value = 0u64;
    let mut i = start;
    while i < start + len {
        match hex_value(s[i]) {
            Some(v) => value = (value << 4) | v as u64,
            None => return Err(GuidError::InvalidDigit { position: i, found: s[i] as char }),
        }
        i += 1;
    }
    Ok(value)
}

const fn parse_bytes(s: &[u8]) -> Result<GUID, GuidError> {
    let mut hyphens = 0;
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'-' {
            hyphens += 1;
        }
        i += 1;
    }
    if hyphens != 4 {
        return Err(GuidError::GroupCount(hyphens + 1));
    }
    if s.len() != 36 {
        return Err(GuidError::Length(s.len()));
    }

    // Group boundaries are checked before any digit is read, so a misplaced
    // hyphen is reported as a width problem rather than as a bad digit.
    let mut starts = [0usize; 5];
    let mut group = 0;
    let mut pos = 0;
    while group < 5 {
        starts[group] = pos;
        let mut end = pos;
        while end < s.len() && s[end] != b'-' {
            end += 1;
        }
        if end - pos != GROUP_WIDTHS[group] {
            return Err(GuidError::GroupWidth { group, expected: GROUP_WIDTHS[group], found: end - pos });
        }
        pos = end + 1;
        group += 1;
    }

    let data1 = match read_hex(s, starts[0], 8) {
        Ok(v) => v as u32,
        Err(e) => return Err(e),
    };
    let data2 = match read_hex(s, starts[1], 4) {
        Ok(v) => v as u16,
        Err(e) => return Err(e),
    };
    let data3 = match read_hex(s, starts[2], 4) {
        Ok(v) => v as u16,
        Err(e) => return Err(e),
    };
    let clock = match read_hex(s, starts[3], 4) {
        Ok(v) => v as u16,
        Err(e) => return Err(e),
    };
    let node = match read_hex(s, starts[4], 12) {
        Ok(v) => v,
        Err(e) => return Err(e),
    };

    let clock = clock.to_be_bytes();
    let node = node.to_be_bytes();
    Ok(GUID {
        data1,
        data2,
        data3,
        data4: [clock[0], clock[1], node[2], node[3], node[4], node[5], node[6], node[7]],
    })
}

impl GUID {
    pub const NULL: GUID = GUID { data1: 0, data2: 0, data3: 0, data4: [0; 8] };

    /// Parses `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`, case-insensitive.
    pub fn parse(s: &str) -> Result<GUID, GuidError> {
        parse_bytes(s.as_bytes()).map_err(|err| match err {
            // The byte scanner only sees the first byte of a multi-byte char.
            GuidError::InvalidDigit { position, .. } => GuidError::InvalidDigit {
                position,
                found: s.get(position..).and_then(|rest| rest.chars().next()).unwrap_or(char::REPLACEMENT_CHARACTER),
            },
            other => other,
        })
    }

    /// Parses a GUID literal at compile time; an invalid literal fails the build.
    pub const fn parse_const(s: &str) -> GUID {
        match parse_bytes(s.as_bytes()) {
            Ok(guid) => guid,
            Err(_) => panic!("invalid GUID literal"),
        }
    }

    pub const fn from_u128(v: u128) -> GUID {
        GUID {
            data1: (v >> 96) as u32,
            data2: (v >> 80) as u16,
            data3: (v >> 64) as u16,
            data4: (v as u64).to_be_bytes(),
        }
    }

    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | u64::from_be_bytes(self.data4) as u128
    }

    /// The 16 bytes exactly as the struct lies in memory.
    pub const fn to_bytes(&self) -> [u8; 16] {
        let d1 = self.data1.to_le_bytes();
        let d2 = self.data2.to_le_bytes();
        let d3 = self.data3.to_le_bytes();
        let d4 = self.data4;
        [
            d1[0], d1[1], d1[2], d1[3], d2[0], d2[1], d3[0], d3[1],
            d4[0], d4[1], d4[2], d4[3], d4[4], d4[5], d4[6], d4[7],
        ]
    }

    pub const fn from_bytes(b: [u8; 16]) -> GUID {
        GUID {
            data1: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            data2: u16::from_le_bytes([b[4], b[5]]),
            data3: u16::from_le_bytes([b[6], b[7]]),
            data4: [b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]],
        }
    }

    /// `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`, the form used by the registry.
    pub fn to_braced_upper(&self) -> String {
        format!("{{{}}}", self.to_string().to_ascii_uppercase())
    }
}

impl fmt::Display for GUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

impl fmt::Debug for GUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GUID({})", self)
    }
}

impl FromStr for GUID {
    type Err = GuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GUID::parse(s)
    }
}
