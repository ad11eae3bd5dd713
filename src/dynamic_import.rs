#![allow(non_snake_case)]

//! Entry points resolved at run time.
//!
//! `TaskDialogIndirect` only exists in comctl32 v6, which is loaded when the
//! application carries a common-controls manifest; importing it at link time
//! would make the whole library fail to load otherwise.

use std::ffi::c_void;
use std::sync::OnceLock;

use windows_sys::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

use crate::co::HRESULT;
use crate::types::{BOOL, HMODULE, PCWSTR};
use crate::{log_trace, log_warn, w};

type FnTaskDialogIndirect = unsafe extern "system" fn(
    pTaskConfig: *const c_void,
    pnButton: *mut i32,
    pnRadioButton: *mut i32,
    pfVerificationFlagChecked: *mut BOOL,
) -> HRESULT;
type FnSetCurrentProcessExplicitAppUserModelID = unsafe extern "system" fn(AppID: PCWSTR) -> HRESULT;

pub struct WinApi {
    pub TaskDialogIndirect: Option<FnTaskDialogIndirect>,
    pub SetCurrentProcessExplicitAppUserModelID: Option<FnSetCurrentProcessExplicitAppUserModelID>,
}

static API: OnceLock<WinApi> = OnceLock::new();

impl WinApi {
    /// Loads the entry points on first use.
    pub fn get() -> &'static WinApi {
        API.get_or_init(|| unsafe { load() })
    }
}

unsafe fn module(name: &[u16]) -> Option<HMODULE> {
    let h = unsafe { LoadLibraryW(name.as_ptr()) };
    if h.is_null() {
        log_warn!("cannot load {}", String::from_utf16_lossy(&name[..name.len() - 1]));
        None
    } else {
        Some(h)
    }
}

/// `name` must be null-terminated.
unsafe fn proc_address(module: Option<HMODULE>, name: &[u8]) -> Option<unsafe extern "system" fn() -> isize> {
    let proc = unsafe { GetProcAddress(module?, name.as_ptr()) };
    if proc.is_none() {
        log_warn!("missing entry point {}", String::from_utf8_lossy(&name[..name.len() - 1]));
    }
    proc
}

unsafe fn load() -> WinApi {
    unsafe {
        let comctl32 = module(w!("comctl32.dll"));
        let shell32 = module(w!("shell32.dll"));

        let api = WinApi {
            TaskDialogIndirect: proc_address(comctl32, b"TaskDialogIndirect\0")
                .map(|f| std::mem::transmute::<_, FnTaskDialogIndirect>(f)),
            SetCurrentProcessExplicitAppUserModelID: proc_address(shell32, b"SetCurrentProcessExplicitAppUserModelID\0")
                .map(|f| std::mem::transmute::<_, FnSetCurrentProcessExplicitAppUserModelID>(f)),
        };
        log_trace!(
            "dynamic imports: TaskDialogIndirect={} SetCurrentProcessExplicitAppUserModelID={}",
            api.TaskDialogIndirect.is_some(),
            api.SetCurrentProcessExplicitAppUserModelID.is_some()
        );
        api
    }
}
