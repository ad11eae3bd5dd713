//! File version resources and OS version checks.

use std::fmt;

use crate::bits::{hi_word, lo_word};
use crate::error::{Error, Result};
use crate::types::VS_FIXEDFILEINFO;

/// `VS_FIXEDFILEINFO::dwSignature`.
pub const VS_FFI_SIGNATURE: u32 = 0xFEEF_04BD;

const VERSION_INFO_KEY: &str = "VS_VERSION_INFO";
const FIXED_INFO_SIZE: usize = std::mem::size_of::<VS_FIXEDFILEINFO>();

/// A `major.minor.build.revision` version number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionQuad {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl VersionQuad {
    pub const fn from_parts(ms: u32, ls: u32) -> Self {
        Self { major: hi_word(ms), minor: lo_word(ms), build: hi_word(ls), revision: lo_word(ls) }
    }
}

impl fmt::Display for VersionQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

impl VS_FIXEDFILEINFO {
    pub const fn file_version(&self) -> VersionQuad {
        VersionQuad::from_parts(self.dwFileVersionMS, self.dwFileVersionLS)
    }

    pub const fn product_version(&self) -> VersionQuad {
        VersionQuad::from_parts(self.dwProductVersionMS, self.dwProductVersionLS)
    }
}

fn u16_at(block: &[u8], off: usize) -> Option<u16> {
    Some(u16::from_le_bytes(block.get(off..off + 2)?.try_into().ok()?))
}

fn invalid(what: &str) -> Error {
    Error::InvalidData(format!("version resource: {}", what))
}

/// Decodes the fixed part of a `VS_VERSIONINFO` block, as returned by
/// `GetFileVersionInfoW` or stored in an `RT_VERSION` resource.
pub fn parse_fixed_file_info(block: &[u8]) -> Result<VS_FIXEDFILEINFO> {
    let length = u16_at(block, 0).ok_or_else(|| invalid("truncated header"))? as usize;
    let value_length = u16_at(block, 2).ok_or_else(|| invalid("truncated header"))? as usize;
    if length > block.len() {
        return Err(invalid("length exceeds buffer"));
    }

    // szKey starts after wLength, wValueLength, wType.
    let key: Vec<u16> = (0..=VERSION_INFO_KEY.len())
        .map(|i| u16_at(block, 6 + i * 2).ok_or_else(|| invalid("truncated key")))
        .collect::<Result<_>>()?;
    if !VERSION_INFO_KEY.encode_utf16().chain(std::iter::once(0)).eq(key.iter().copied()) {
        return Err(invalid("missing VS_VERSION_INFO key"));
    }
    if value_length < FIXED_INFO_SIZE {
        return Err(invalid("no fixed file info"));
    }

    let start = (6 + key.len() * 2).next_multiple_of(4);
    let raw = block.get(start..start + FIXED_INFO_SIZE).ok_or_else(|| invalid("truncated fixed file info"))?;
    let mut words = raw.chunks_exact(4).map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]));
    let mut next = || words.next().unwrap_or_default();
    let info = VS_FIXEDFILEINFO {
        dwSignature: next(),
        dwStrucVersion: next(),
        dwFileVersionMS: next(),
        dwFileVersionLS: next(),
        dwProductVersionMS: next(),
        dwProductVersionLS: next(),
        dwFileFlagsMask: next(),
        dwFileFlags: next(),
        dwFileOS: next(),
        dwFileType: next(),
        dwFileSubtype: next(),
        dwFileDateMS: next(),
        dwFileDateLS: next(),
    };
    if info.dwSignature != VS_FFI_SIGNATURE {
        return Err(invalid("bad signature"));
    }
    Ok(info)
}

/// Raw `VS_VERSIONINFO` block of a PE file.
#[cfg(windows)]
pub fn file_version_info(path: &str) -> crate::error::SysResult<Vec<u8>> {
    use windows_sys::Win32::Storage::FileSystem::{GetFileVersionInfoSizeW, GetFileVersionInfoW};

    use crate::co::ERROR;

    let wpath = crate::utils::to_wstring(path);
    let mut handle = 0;
    let size = unsafe { GetFileVersionInfoSizeW(wpath.as_ptr(), &mut handle) };
    if size == 0 {
        return Err(ERROR::last());
    }
    let mut block = vec![0u8; size as usize];
    if unsafe { GetFileVersionInfoW(wpath.as_ptr(), 0, size, block.as_mut_ptr().cast()) } == 0 {
        return Err(ERROR::last());
    }
    Ok(block)
}

/// File version of a PE file, from its version resource.
#[cfg(windows)]
pub fn file_version(path: &str) -> Result<VersionQuad> {
    let block = file_version_info(path).inspect_err(|e| crate::log_warn!("no version info for {}: {}", path, e))?;
    Ok(parse_fixed_file_info(&block)?.file_version())
}

/// `IsWindowsVersionOrGreater`: compares major, minor and service pack major
/// against the running OS. Without a compatibility manifest, Windows 8.1 and
/// later report themselves as 6.2.
#[cfg(windows)]
pub fn is_windows_version_or_greater(major: u32, minor: u32, service_pack_major: u16) -> bool {
    use windows_sys::Win32::System::SystemInformation::{
        VerSetConditionMask, VerifyVersionInfoW, OSVERSIONINFOEXW as SysVersionInfo, VER_MAJORVERSION,
        VER_MINORVERSION, VER_SERVICEPACKMAJOR,
    };

    const VER_GREATER_EQUAL: u8 = 3;

    let mut info = crate::types::OSVERSIONINFOEXW {
        dwMajorVersion: major,
        dwMinorVersion: minor,
        wServicePackMajor: service_pack_major,
        ..Default::default()
    };
    unsafe {
        let mask = VerSetConditionMask(
            VerSetConditionMask(VerSetConditionMask(0, VER_MAJORVERSION, VER_GREATER_EQUAL), VER_MINORVERSION, VER_GREATER_EQUAL),
            VER_SERVICEPACKMAJOR,
            VER_GREATER_EQUAL,
        );
        VerifyVersionInfoW(
            &mut info as *mut _ as *mut SysVersionInfo,
            VER_MAJORVERSION | VER_MINORVERSION | VER_SERVICEPACKMAJOR,
            mask,
        ) != 0
    }
}

#[cfg(windows)]
pub fn is_windows_7_or_greater() -> bool {
    is_windows_version_or_greater(6, 1, 0)
}

#[cfg(windows)]
pub fn is_windows_8_or_greater() -> bool {
    is_windows_version_or_greater(6, 2, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(signature: u32, value_length: u16) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&0u16.to_le_bytes());
        b.extend_from_slice(&value_length.to_le_bytes());
        b.extend_from_slice(&0u16.to_le_bytes());
        for c in "VS_VERSION_INFO\0".encode_utf16() {
            b.extend_from_slice(&c.to_le_bytes());
        }
        b.extend_from_slice(&[0, 0]);
        assert_eq!(b.len(), 40);
        let fields = [signature, 0x0001_0000, 0x000A_0000, 0x4A61_0001, 0x000A_0000, 0x4A61_0000, 0x3F, 0, 0x40004, 1, 0, 0, 0];
        for f in fields {
            b.extend_from_slice(&f.to_le_bytes());
        }
        let len = b.len() as u16;
        b[0..2].copy_from_slice(&len.to_le_bytes());
        b
    }

    #[test]
    fn test_parse_fixed_file_info() {
        let info = parse_fixed_file_info(&block(VS_FFI_SIGNATURE, 52)).unwrap();
        assert_eq!(info.file_version(), VersionQuad { major: 10, minor: 0, build: 19041, revision: 1 });
        assert_eq!(info.product_version().to_string(), "10.0.19041.0");
        assert_eq!(info.dwFileOS, 0x40004);
    }

    #[test]
    fn test_rejects_bad_blocks() {
        assert!(matches!(parse_fixed_file_info(&block(0xDEAD_BEEF, 52)), Err(Error::InvalidData(_))));
        assert!(matches!(parse_fixed_file_info(&block(VS_FFI_SIGNATURE, 0)), Err(Error::InvalidData(_))));
        assert!(parse_fixed_file_info(&[]).is_err());

        let mut wrong_key = block(VS_FFI_SIGNATURE, 52);
        wrong_key[6] = b'X';
        assert!(parse_fixed_file_info(&wrong_key).is_err());

        let mut truncated = block(VS_FFI_SIGNATURE, 52);
        truncated.truncate(60);
        truncated[0..2].copy_from_slice(&60u16.to_le_bytes());
        assert!(parse_fixed_file_info(&truncated).is_err());
    }

    #[test]
    fn test_quad_ordering() {
        let a = VersionQuad::from_parts(0x0006_0001, 0x1DB1_0000);
        let b = VersionQuad::from_parts(0x0006_0002, 0);
        assert!(a < b);
        assert_eq!(a.to_string(), "6.1.7601.0");
    }
}
