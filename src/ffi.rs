#![allow(non_snake_case)]

//! Link-time imports. Kernel32 comes from `windows-sys`; the COM and shell
//! entry points are declared here with this crate's own `HRESULT` and `GUID`
//! so vtable code and free functions share one set of types.

use std::ffi::c_void;

use crate::co::{CLSCTX, COINIT, HRESULT};
use crate::guid::GUID;
use crate::types::{HDROP, HWND, PCWSTR, PWSTR, STGMEDIUM};

#[link(name = "ole32")]
unsafe extern "system" {
    pub fn CoInitializeEx(pvReserved: *mut c_void, dwCoInit: COINIT) -> HRESULT;
    pub fn CoUninitialize();
    pub fn CoCreateInstance(
        rclsid: *const GUID,
        pUnkOuter: *mut c_void,
        dwClsContext: CLSCTX,
        riid: *const GUID,
        ppv: *mut *mut c_void,
    ) -> HRESULT;
    pub fn CoTaskMemFree(pv: *mut c_void);
    pub fn OleInitialize(pvReserved: *mut c_void) -> HRESULT;
    pub fn OleUninitialize();
    pub fn RegisterDragDrop(hwnd: HWND, pDropTarget: *mut c_void) -> HRESULT;
    pub fn RevokeDragDrop(hwnd: HWND) -> HRESULT;
    pub fn ReleaseStgMedium(pmedium: *mut STGMEDIUM);
}

#[link(name = "shell32")]
unsafe extern "system" {
    pub fn SHCreateItemFromParsingName(pszPath: PCWSTR, pbc: *mut c_void, riid: *const GUID, ppv: *mut *mut c_void) -> HRESULT;
    pub fn DragQueryFileW(hDrop: HDROP, iFile: u32, lpszFile: PWSTR, cch: u32) -> u32;
}

#[link(name = "shlwapi")]
unsafe extern "system" {
    pub fn SHCreateMemStream(pInit: *const u8, cbInit: u32) -> *mut c_void;
}

/// Paths of an `HDROP` handle.
///
/// # Safety
/// `hdrop` must be a valid drop handle for the duration of the call.
pub unsafe fn drop_files(hdrop: HDROP) -> Vec<String> {
    unsafe {
        let count = DragQueryFileW(hdrop, u32::MAX, std::ptr::null_mut(), 0);
        (0..count)
            .filter_map(|i| {
                let len = DragQueryFileW(hdrop, i, std::ptr::null_mut(), 0);
                if len == 0 {
                    return None;
                }
                let mut buf = vec![0u16; len as usize + 1];
                let copied = DragQueryFileW(hdrop, i, buf.as_mut_ptr(), buf.len() as u32);
                Some(String::from_utf16_lossy(&buf[..copied as usize]))
            })
            .collect()
    }
}

/// System message for a Win32 error code, without the trailing line break.
pub fn format_message(code: u32) -> Option<String> {
    use windows_sys::Win32::Foundation::LocalFree;
    use windows_sys::Win32::System::Diagnostics::Debug::{
        FormatMessageW, FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
    };

    let mut buf: *mut u16 = std::ptr::null_mut();
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_ALLOCATE_BUFFER | FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            std::ptr::null(),
            code,
            0,
            &mut buf as *mut *mut u16 as PWSTR,
            0,
            std::ptr::null(),
        )
    };
    if len == 0 || buf.is_null() {
        return None;
    }
    let text = unsafe { String::from_utf16_lossy(std::slice::from_raw_parts(buf, len as usize)) };
    unsafe { LocalFree(buf as *mut c_void) };
    Some(text.trim_end().to_string())
}
