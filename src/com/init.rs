//! COM and OLE initialization for the calling thread, and object creation.

use std::marker::PhantomData;

use super::{out_interface, ComInterface};
use crate::co::{CLSCTX, HRESULT};
use crate::config::BindingConfig;
use crate::error::HrResult;
use crate::ffi;
use crate::guid::GUID;
use crate::{log_error, log_trace};

/// Keeps COM initialized on this thread; `CoUninitialize` runs on drop.
///
/// Not `Send`: the uninitialize call must happen on the initializing thread.
#[derive(Debug)]
pub struct CoInitGuard {
    _thread_bound: PhantomData<*const ()>,
}

impl CoInitGuard {
    /// Initializes with the apartment from `OLEBIND_APARTMENT` (STA by default).
    pub fn new() -> HrResult<Self> {
        Self::with_config(&BindingConfig::from_env())
    }

    /// `S_FALSE` (already initialized in the same mode) still needs a matching
    /// uninitialize and yields a guard; `RPC_E_CHANGED_MODE` is an error.
    pub fn with_config(config: &BindingConfig) -> HrResult<Self> {
        let flags = config.coinit_flags();
        let hr = unsafe { ffi::CoInitializeEx(std::ptr::null_mut(), flags) };
        if hr.failed() {
            log_error!("CoInitializeEx({:#x}) failed: {}", flags, hr);
            return Err(hr);
        }
        log_trace!("COM initialized ({:?}, {})", config.apartment, hr);
        Ok(Self { _thread_bound: PhantomData })
    }
}

impl Drop for CoInitGuard {
    fn drop(&mut self) {
        unsafe { ffi::CoUninitialize() };
        log_trace!("COM uninitialized");
    }
}

/// Keeps OLE (clipboard, drag and drop) initialized on this thread.
/// OLE always runs in a single-threaded apartment.
#[derive(Debug)]
pub struct OleInitGuard {
    _thread_bound: PhantomData<*const ()>,
}

impl OleInitGuard {
    pub fn new() -> HrResult<Self> {
        let hr = unsafe { ffi::OleInitialize(std::ptr::null_mut()) };
        if hr.failed() {
            log_error!("OleInitialize failed: {}", hr);
            return Err(hr);
        }
        Ok(Self { _thread_bound: PhantomData })
    }
}

impl Drop for OleInitGuard {
    fn drop(&mut self) {
        unsafe { ffi::OleUninitialize() };
    }
}

/// `CoCreateInstance` for interface `T`.
pub fn co_create_instance<T: ComInterface>(clsid: &GUID, context: CLSCTX) -> HrResult<T> {
    out_interface(|out| unsafe { ffi::CoCreateInstance(clsid, std::ptr::null_mut(), context, &T::IID, out) })
        .inspect_err(|hr: &HRESULT| log_error!("CoCreateInstance({}) failed: {}", clsid, hr))
}
