#![allow(non_camel_case_types, non_snake_case)]

// ABI mirrors of the Win32 structs this crate passes across the boundary.
// Field names follow the SDK headers so the layouts can be checked against them.

pub use std::ffi::c_void;

use crate::bits::make_qword;
use crate::guid::GUID;
use crate::utils::from_wide_buf;

// Basic Types
pub type BOOL = i32;
pub type HANDLE = *mut c_void;
pub type HWND = HANDLE;
pub type HICON = HANDLE;
pub type HINSTANCE = HANDLE;
pub type HMODULE = HANDLE;
pub type HGLOBAL = HANDLE;
pub type HDROP = HANDLE;
pub type HIMAGELIST = HANDLE;
pub type LPARAM = isize;
pub type PCWSTR = *const u16;
pub type PWSTR = *mut u16;

pub const FALSE: BOOL = 0;
pub const TRUE: BOOL = 1;
pub const MAX_PATH: usize = 260;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct POINT {
    pub x: i32,
    pub y: i32,
}

/// Same layout as [`POINT`]; OLE drag and drop uses the `L` spelling.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct POINTL {
    pub x: i32,
    pub y: i32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RECT {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FILETIME {
    pub dwLowDateTime: u32,
    pub dwHighDateTime: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SYSTEMTIME {
    pub wYear: u16,
    pub wMonth: u16,
    pub wDayOfWeek: u16,
    pub wDay: u16,
    pub wHour: u16,
    pub wMinute: u16,
    pub wSecond: u16,
    pub wMilliseconds: u16,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct WIN32_FIND_DATAW {
    pub dwFileAttributes: u32,
    pub ftCreationTime: FILETIME,
    pub ftLastAccessTime: FILETIME,
    pub ftLastWriteTime: FILETIME,
    pub nFileSizeHigh: u32,
    pub nFileSizeLow: u32,
    pub dwReserved0: u32,
    pub dwReserved1: u32,
    pub cFileName: [u16; MAX_PATH],
    pub cAlternateFileName: [u16; 14],
}

impl Default for WIN32_FIND_DATAW {
    fn default() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

impl WIN32_FIND_DATAW {
    pub fn file_name(&self) -> String {
        from_wide_buf(&self.cFileName)
    }

    pub fn alternate_file_name(&self) -> String {
        from_wide_buf(&self.cAlternateFileName)
    }

    pub fn file_size(&self) -> u64 {
        make_qword(self.nFileSizeLow, self.nFileSizeHigh)
    }
}

/// Must go through [`Default`], which fills `dwOSVersionInfoSize`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct OSVERSIONINFOEXW {
    pub dwOSVersionInfoSize: u32,
    pub dwMajorVersion: u32,
    pub dwMinorVersion: u32,
    pub dwBuildNumber: u32,
    pub dwPlatformId: u32,
    pub szCSDVersion: [u16; 128],
    pub wServicePackMajor: u16,
    pub wServicePackMinor: u16,
    pub wSuiteMask: u16,
    pub wProductType: u8,
    pub wReserved: u8,
}

impl Default for OSVERSIONINFOEXW {
    fn default() -> Self {
        let mut info: Self = unsafe { std::mem::zeroed() };
        info.dwOSVersionInfoSize = std::mem::size_of::<Self>() as u32;
        info
    }
}

impl OSVERSIONINFOEXW {
    pub fn csd_version(&self) -> String {
        from_wide_buf(&self.szCSDVersion)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VS_FIXEDFILEINFO {
    pub dwSignature: u32,
    pub dwStrucVersion: u32,
    pub dwFileVersionMS: u32,
    pub dwFileVersionLS: u32,
    pub dwProductVersionMS: u32,
    pub dwProductVersionLS: u32,
    pub dwFileFlagsMask: u32,
    pub dwFileFlags: u32,
    pub dwFileOS: u32,
    pub dwFileType: u32,
    pub dwFileSubtype: u32,
    pub dwFileDateMS: u32,
    pub dwFileDateLS: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FORMATETC {
    pub cfFormat: u16,
    pub ptd: *mut c_void,
    pub dwAspect: u32,
    pub lindex: i32,
    pub tymed: u32,
}

impl FORMATETC {
    /// A `DVASPECT_CONTENT`, all-pages request for `cf` in `tymed`.
    pub fn new(cf: crate::co::CF, tymed: crate::co::TYMED) -> Self {
        Self {
            cfFormat: cf,
            ptd: std::ptr::null_mut(),
            dwAspect: crate::co::DVASPECT_CONTENT,
            lindex: -1,
            tymed,
        }
    }
}

/// The anonymous union is flattened to a pointer-sized field; `tymed` says
/// what it holds.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct STGMEDIUM {
    pub tymed: u32,
    pub u: *mut c_void,
    pub pUnkForRelease: *mut c_void,
}

impl Default for STGMEDIUM {
    fn default() -> Self {
        Self { tymed: 0, u: std::ptr::null_mut(), pUnkForRelease: std::ptr::null_mut() }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct STATSTG {
    pub pwcsName: PWSTR,
    pub r#type: u32,
    pub cbSize: u64,
    pub mtime: FILETIME,
    pub ctime: FILETIME,
    pub atime: FILETIME,
    pub grfMode: u32,
    pub grfLocksSupported: u32,
    pub clsid: GUID,
    pub grfStateBits: u32,
    pub reserved: u32,
}

impl Default for STATSTG {
    fn default() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct COMDLG_FILTERSPEC {
    pub pszName: PCWSTR,
    pub pszSpec: PCWSTR,
}
