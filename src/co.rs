//! Status codes and flag constants.
//!
//! [`HRESULT`] and [`ERROR`] are newtypes because they travel as error values;
//! flag sets stay plain integers, grouped by the alias of the native type.

#![allow(non_camel_case_types, non_upper_case_globals)]

use std::fmt;

macro_rules! named_codes {
    ($ty:ident : $inner:ty; $( $(#[$doc:meta])* $name:ident = $val:expr; )*) => {
        impl $ty {
            $( $(#[$doc])* pub const $name: Self = Self($val as $inner); )*

            /// Symbolic name of the code, if it is one this crate knows.
            pub fn name(self) -> Option<&'static str> {
                $( if self.0 == $val as $inner { return Some(stringify!($name)); } )*
                None
            }
        }
    };
}

/// A COM status code.
///
/// Non-negative values are success codes (`S_OK`, `S_FALSE`, ...), negative
/// values are failures.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HRESULT(pub i32);

named_codes! { HRESULT: i32;
    S_OK = 0;
    S_FALSE = 1;
    DRAGDROP_S_DROP = 0x00040100;
    DRAGDROP_S_CANCEL = 0x00040101;
    DRAGDROP_S_USEDEFAULTCURSORS = 0x00040102;
    E_NOTIMPL = 0x80004001_u32;
    E_NOINTERFACE = 0x80004002_u32;
    E_POINTER = 0x80004003_u32;
    E_ABORT = 0x80004004_u32;
    E_FAIL = 0x80004005_u32;
    E_UNEXPECTED = 0x8000FFFF_u32;
    E_ACCESSDENIED = 0x80070005_u32;
    E_HANDLE = 0x80070006_u32;
    E_OUTOFMEMORY = 0x8007000E_u32;
    E_INVALIDARG = 0x80070057_u32;
    /// `HRESULT_FROM_WIN32(ERROR_CANCELLED)`, returned when the user dismisses a dialog.
    E_CANCELLED = 0x800704C7_u32;
    OLE_E_WRONGCOMPOBJ = 0x8004000E_u32;
    DV_E_FORMATETC = 0x80040064_u32;
    DV_E_TYMED = 0x80040069_u32;
    DRAGDROP_E_NOTREGISTERED = 0x80040100_u32;
    DRAGDROP_E_ALREADYREGISTERED = 0x80040101_u32;
    CLASS_E_NOAGGREGATION = 0x80040110_u32;
    CLASS_E_CLASSNOTAVAILABLE = 0x80040111_u32;
    REGDB_E_CLASSNOTREG = 0x80040154_u32;
    CO_E_NOTINITIALIZED = 0x800401F0_u32;
    RPC_E_CHANGED_MODE = 0x80010106_u32;
    STG_E_INVALIDFUNCTION = 0x80030001_u32;
    COPYENGINE_E_USER_CANCELLED = 0x80270000_u32;
}

pub const FACILITY_WIN32: u16 = 7;

impl HRESULT {
    #[inline]
    pub const fn succeeded(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub const fn failed(self) -> bool {
        self.0 < 0
    }

    /// `Ok(())` for any success code, `Err(self)` otherwise.
    #[inline]
    pub fn ok(self) -> Result<(), HRESULT> {
        if self.succeeded() { Ok(()) } else { Err(self) }
    }

    /// `Ok(true)` for `S_OK`, `Ok(false)` for any other success code.
    #[inline]
    pub fn ok_bool(self) -> Result<bool, HRESULT> {
        self.ok().map(|_| self == Self::S_OK)
    }

    pub const fn facility(self) -> u16 {
        ((self.0 as u32 >> 16) & 0x1FFF) as u16
    }

    pub const fn code(self) -> u16 {
        (self.0 as u32 & 0xFFFF) as u16
    }

    /// `HRESULT_FROM_WIN32`.
    pub const fn from_win32(err: ERROR) -> Self {
        if err.0 as i32 <= 0 {
            Self(err.0 as i32)
        } else {
            Self(((err.0 & 0xFFFF) | ((FACILITY_WIN32 as u32) << 16) | 0x8000_0000) as i32)
        }
    }

    /// The Win32 error wrapped by this HRESULT, if its facility is `FACILITY_WIN32`.
    pub const fn win32_error(self) -> Option<ERROR> {
        if self.failed() && self.facility() == FACILITY_WIN32 {
            Some(ERROR(self.code() as u32))
        } else {
            None
        }
    }
}

impl fmt::Display for HRESULT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "0x{:08X} {}", self.0 as u32, name),
            None => write!(f, "0x{:08X}", self.0 as u32),
        }
    }
}

impl fmt::Debug for HRESULT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HRESULT({})", self)
    }
}

impl std::error::Error for HRESULT {}

/// A Win32 error code, as returned by `GetLastError`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ERROR(pub u32);

named_codes! { ERROR: u32;
    SUCCESS = 0;
    INVALID_FUNCTION = 1;
    FILE_NOT_FOUND = 2;
    PATH_NOT_FOUND = 3;
    ACCESS_DENIED = 5;
    INVALID_HANDLE = 6;
    NOT_ENOUGH_MEMORY = 8;
    INVALID_DATA = 13;
    NOT_SUPPORTED = 50;
    INVALID_PARAMETER = 87;
    INSUFFICIENT_BUFFER = 122;
    MOD_NOT_FOUND = 126;
    PROC_NOT_FOUND = 127;
    ALREADY_EXISTS = 183;
    MORE_DATA = 234;
    NO_MORE_ITEMS = 259;
    OLD_WIN_VERSION = 1150;
    CANCELLED = 1223;
    RESOURCE_DATA_NOT_FOUND = 1812;
    RESOURCE_TYPE_NOT_FOUND = 1813;
}

impl ERROR {
    #[inline]
    pub const fn to_hresult(self) -> HRESULT {
        HRESULT::from_win32(self)
    }

    /// Error code set by the last failed call on this thread.
    #[cfg(windows)]
    pub fn last() -> Self {
        Self(unsafe { windows_sys::Win32::Foundation::GetLastError() })
    }

    /// Localized description from the system message table.
    #[cfg(windows)]
    pub fn message(self) -> String {
        crate::ffi::format_message(self.0).unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for ERROR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "error {} ERROR_{}", self.0, name),
            None => write!(f, "error {}", self.0),
        }
    }
}

impl fmt::Debug for ERROR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR({})", self)
    }
}

impl std::error::Error for ERROR {}

// CoCreateInstance contexts
pub type CLSCTX = u32;
pub const CLSCTX_INPROC_SERVER: CLSCTX = 0x1;
pub const CLSCTX_INPROC_HANDLER: CLSCTX = 0x2;
pub const CLSCTX_LOCAL_SERVER: CLSCTX = 0x4;
pub const CLSCTX_REMOTE_SERVER: CLSCTX = 0x10;
pub const CLSCTX_ALL: CLSCTX = CLSCTX_INPROC_SERVER | CLSCTX_INPROC_HANDLER | CLSCTX_LOCAL_SERVER | CLSCTX_REMOTE_SERVER;

// CoInitializeEx
pub type COINIT = u32;
pub const COINIT_MULTITHREADED: COINIT = 0x0;
pub const COINIT_APARTMENTTHREADED: COINIT = 0x2;
pub const COINIT_DISABLE_OLE1DDE: COINIT = 0x4;
pub const COINIT_SPEED_OVER_MEMORY: COINIT = 0x8;

// Drag and drop
pub type DROPEFFECT = u32;
pub const DROPEFFECT_NONE: DROPEFFECT = 0;
pub const DROPEFFECT_COPY: DROPEFFECT = 1;
pub const DROPEFFECT_MOVE: DROPEFFECT = 2;
pub const DROPEFFECT_LINK: DROPEFFECT = 4;
pub const DROPEFFECT_SCROLL: DROPEFFECT = 0x8000_0000;

/// Modifier keys and mouse buttons held during a drag (`grfKeyState`).
pub type MK = u32;
pub const MK_LBUTTON: MK = 0x0001;
pub const MK_RBUTTON: MK = 0x0002;
pub const MK_SHIFT: MK = 0x0004;
pub const MK_CONTROL: MK = 0x0008;
pub const MK_MBUTTON: MK = 0x0010;
pub const MK_ALT: MK = 0x0020;

// Clipboard formats and storage media
pub type CF = u16;
pub const CF_UNICODETEXT: CF = 13;
pub const CF_HDROP: CF = 15;

pub type TYMED = u32;
pub const TYMED_NULL: TYMED = 0;
pub const TYMED_HGLOBAL: TYMED = 1;
pub const TYMED_FILE: TYMED = 2;
pub const TYMED_ISTREAM: TYMED = 4;
pub const TYMED_ISTORAGE: TYMED = 8;

pub type DVASPECT = u32;
pub const DVASPECT_CONTENT: DVASPECT = 1;

// Shell items
pub type SIGDN = u32;
pub const SIGDN_NORMALDISPLAY: SIGDN = 0x0000_0000;
pub const SIGDN_PARENTRELATIVEPARSING: SIGDN = 0x8001_8001;
pub const SIGDN_DESKTOPABSOLUTEPARSING: SIGDN = 0x8002_8000;
pub const SIGDN_PARENTRELATIVEEDITING: SIGDN = 0x8003_1001;
pub const SIGDN_DESKTOPABSOLUTEEDITING: SIGDN = 0x8004_C000;
pub const SIGDN_FILESYSPATH: SIGDN = 0x8005_8000;
pub const SIGDN_URL: SIGDN = 0x8006_8000;
pub const SIGDN_PARENTRELATIVEFORADDRESSBAR: SIGDN = 0x8007_C001;
pub const SIGDN_PARENTRELATIVE: SIGDN = 0x8008_0001;

pub type SFGAO = u32;
pub const SFGAO_LINK: SFGAO = 0x0001_0000;
pub const SFGAO_READONLY: SFGAO = 0x0004_0000;
pub const SFGAO_HIDDEN: SFGAO = 0x0008_0000;
pub const SFGAO_STREAM: SFGAO = 0x0040_0000;
pub const SFGAO_FILESYSANCESTOR: SFGAO = 0x1000_0000;
pub const SFGAO_FOLDER: SFGAO = 0x2000_0000;
pub const SFGAO_FILESYSTEM: SFGAO = 0x4000_0000;

pub type SICHINT = u32;
pub const SICHINT_DISPLAY: SICHINT = 0x0000_0000;
pub const SICHINT_CANONICAL: SICHINT = 0x1000_0000;
pub const SICHINT_TEST_FILESYSPATH_IF_NOT_EQUAL: SICHINT = 0x2000_0000;
pub const SICHINT_ALLFIELDS: SICHINT = 0x8000_0000;

pub type SHCONTF = u32;
pub const SHCONTF_FOLDERS: SHCONTF = 0x0020;
pub const SHCONTF_NONFOLDERS: SHCONTF = 0x0040;
pub const SHCONTF_INCLUDEHIDDEN: SHCONTF = 0x0080;

// File dialogs
pub type FOS = u32;
pub const FOS_OVERWRITEPROMPT: FOS = 0x0000_0002;
pub const FOS_STRICTFILETYPES: FOS = 0x0000_0004;
pub const FOS_NOCHANGEDIR: FOS = 0x0000_0008;
pub const FOS_PICKFOLDERS: FOS = 0x0000_0020;
pub const FOS_FORCEFILESYSTEM: FOS = 0x0000_0040;
pub const FOS_ALLNONSTORAGEITEMS: FOS = 0x0000_0080;
pub const FOS_NOVALIDATE: FOS = 0x0000_0100;
pub const FOS_ALLOWMULTISELECT: FOS = 0x0000_0200;
pub const FOS_PATHMUSTEXIST: FOS = 0x0000_0800;
pub const FOS_FILEMUSTEXIST: FOS = 0x0000_1000;
pub const FOS_CREATEPROMPT: FOS = 0x0000_2000;
pub const FOS_SHAREAWARE: FOS = 0x0000_4000;
pub const FOS_NOREADONLYRETURN: FOS = 0x0000_8000;
pub const FOS_NOTESTFILECREATE: FOS = 0x0001_0000;
pub const FOS_HIDEMRUPLACES: FOS = 0x0002_0000;
pub const FOS_HIDEPINNEDPLACES: FOS = 0x0004_0000;
pub const FOS_NODEREFERENCELINKS: FOS = 0x0010_0000;
pub const FOS_DONTADDTORECENT: FOS = 0x0200_0000;
pub const FOS_FORCESHOWHIDDEN: FOS = 0x1000_0000;

pub type FDAP = u32;
pub const FDAP_BOTTOM: FDAP = 0;
pub const FDAP_TOP: FDAP = 1;

// IFileOperation::SetOperationFlags
pub type FOF = u32;
pub const FOF_SILENT: FOF = 0x0004;
pub const FOF_RENAMEONCOLLISION: FOF = 0x0008;
pub const FOF_NOCONFIRMATION: FOF = 0x0010;
pub const FOF_ALLOWUNDO: FOF = 0x0040;
pub const FOF_FILESONLY: FOF = 0x0080;
pub const FOF_NOCONFIRMMKDIR: FOF = 0x0200;
pub const FOF_NOERRORUI: FOF = 0x0400;
pub const FOFX_NOSKIPJUNCTIONS: FOF = 0x0001_0000;
pub const FOFX_PREFERHARDLINK: FOF = 0x0002_0000;
pub const FOFX_SHOWELEVATIONPROMPT: FOF = 0x0004_0000;
pub const FOFX_RECYCLEONDELETE: FOF = 0x0008_0000;
pub const FOFX_EARLYFAILURE: FOF = 0x0010_0000;

/// Transfer source flags passed to `IFileOperationProgressSink` notifications.
pub type TSF = u32;
pub const TSF_NORMAL: TSF = 0x0000;
pub const TSF_FAIL_EXIST: TSF = 0x0000;
pub const TSF_RENAME_EXIST: TSF = 0x0001;
pub const TSF_OVERWRITE_EXIST: TSF = 0x0002;
pub const TSF_ALLOW_DECRYPTION: TSF = 0x0004;
pub const TSF_NO_SECURITY: TSF = 0x0008;
pub const TSF_COPY_CREATION_TIME: TSF = 0x0010;
pub const TSF_COPY_WRITE_TIME: TSF = 0x0020;
pub const TSF_USE_FULL_ACCESS: TSF = 0x0040;
pub const TSF_DELETE_RECYCLE_IF_POSSIBLE: TSF = 0x0080;
pub const TSF_COPY_HARD_LINK: TSF = 0x0100;
pub const TSF_COPY_LOCALIZED_NAME: TSF = 0x0200;
pub const TSF_MOVE_AS_COPY_DELETE: TSF = 0x0400;
pub const TSF_SUSPEND_SHELLEVENTS: TSF = 0x0800;

// Taskbar
pub type TBPFLAG = u32;
pub const TBPF_NOPROGRESS: TBPFLAG = 0;
pub const TBPF_INDETERMINATE: TBPFLAG = 0x1;
pub const TBPF_NORMAL: TBPFLAG = 0x2;
pub const TBPF_ERROR: TBPFLAG = 0x4;
pub const TBPF_PAUSED: TBPFLAG = 0x8;

// Structured storage
pub type STGM = u32;
pub const STGM_READ: STGM = 0x0000_0000;
pub const STGM_WRITE: STGM = 0x0000_0001;
pub const STGM_READWRITE: STGM = 0x0000_0002;
pub const STGM_SHARE_DENY_NONE: STGM = 0x0000_0040;
pub const STGM_SHARE_DENY_WRITE: STGM = 0x0000_0020;
pub const STGM_CREATE: STGM = 0x0000_1000;

pub type STREAM_SEEK = u32;
pub const STREAM_SEEK_SET: STREAM_SEEK = 0;
pub const STREAM_SEEK_CUR: STREAM_SEEK = 1;
pub const STREAM_SEEK_END: STREAM_SEEK = 2;

pub type STGC = u32;
pub const STGC_DEFAULT: STGC = 0;
pub const STGC_OVERWRITE: STGC = 1;
pub const STGC_ONLYIFCURRENT: STGC = 2;

pub type STATFLAG = u32;
pub const STATFLAG_DEFAULT: STATFLAG = 0;
pub const STATFLAG_NONAME: STATFLAG = 1;

// Shell links
pub type SLGP = u32;
pub const SLGP_SHORTPATH: SLGP = 0x1;
pub const SLGP_UNCPRIORITY: SLGP = 0x2;
pub const SLGP_RAWPATH: SLGP = 0x4;

pub type SLR = u32;
pub const SLR_NO_UI: SLR = 0x0001;
pub const SLR_NOUPDATE: SLR = 0x0008;
pub const SLR_NOSEARCH: SLR = 0x0010;
pub const SLR_NOTRACK: SLR = 0x0020;
pub const SLR_UPDATE: SLR = 0x0004;
