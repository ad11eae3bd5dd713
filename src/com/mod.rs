//! COM interface wrappers.
//!
//! Every interface is a `#[repr(transparent)]` newtype over [`ComPtr`], an
//! owned identity pointer (`**Vtbl`). Cloning calls `AddRef`, dropping calls
//! `Release`. Derived interfaces deref to their base, which is sound because
//! a derived vtable starts with the base vtable.

use std::ffi::c_void;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use crate::co::HRESULT;
use crate::error::HrResult;
use crate::guid::GUID;

pub mod vtbl;
pub mod iunknown;
pub mod producer;
pub mod releaser;
pub mod drop_target;
pub mod progress_sink;
pub mod item_filter;
pub mod shell_item;
pub mod stream;
pub mod data_object;
pub mod file_dialog;
pub mod file_operation;
pub mod shell_link;
pub mod taskbar;
#[cfg(windows)]
pub mod init;

use vtbl::IUnknownVtbl;

/// An owned reference to a COM object.
#[repr(transparent)]
pub struct ComPtr(NonNull<c_void>);

impl ComPtr {
    /// Takes ownership of one reference.
    ///
    /// # Safety
    /// `ptr` must be null or a live COM identity pointer whose reference the
    /// caller gives up.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    #[inline]
    pub fn as_raw(&self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// Gives up ownership without releasing.
    pub fn into_raw(self) -> *mut c_void {
        ManuallyDrop::new(self).as_raw()
    }

    /// # Safety
    /// `V` must be the vtable layout (or a prefix of it) of this object.
    #[inline]
    pub unsafe fn vtbl<V>(&self) -> &V {
        unsafe { &**(self.as_raw() as *const *const V) }
    }

    fn unknown(&self) -> &IUnknownVtbl {
        unsafe { self.vtbl::<IUnknownVtbl>() }
    }

    pub fn query_interface<T: ComInterface>(&self) -> HrResult<T> {
        let query = self.unknown().query_interface;
        out_interface(|out| unsafe { query(self.as_raw(), &T::IID, out) })
    }

    /// Raw `AddRef`; returns the new count as reported by the object.
    ///
    /// # Safety
    /// Every extra reference must be balanced by [`ComPtr::release_raw`].
    pub unsafe fn add_ref_raw(&self) -> u32 {
        unsafe { (self.unknown().add_ref)(self.as_raw()) }
    }

    /// # Safety
    /// Must balance an earlier [`ComPtr::add_ref_raw`].
    pub unsafe fn release_raw(&self) -> u32 {
        unsafe { (self.unknown().release)(self.as_raw()) }
    }
}

impl Clone for ComPtr {
    fn clone(&self) -> Self {
        unsafe { self.add_ref_raw() };
        Self(self.0)
    }
}

impl Drop for ComPtr {
    fn drop(&mut self) {
        unsafe { self.release_raw() };
    }
}

impl PartialEq for ComPtr {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ComPtr {}

impl fmt::Debug for ComPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComPtr({:p})", self.0)
    }
}

/// A typed COM interface pointer.
///
/// # Safety
/// Implementors must be `#[repr(transparent)]` over [`ComPtr`] and `Vtbl`
/// must match the interface identified by `IID`.
pub unsafe trait ComInterface: Sized {
    const IID: GUID;
    type Vtbl: 'static;

    fn com_ptr(&self) -> &ComPtr;

    fn from_com_ptr(ptr: ComPtr) -> Self;

    fn into_com_ptr(self) -> ComPtr;

    /// # Safety
    /// See [`ComPtr::from_raw`]; the object must implement this interface.
    unsafe fn from_raw(ptr: *mut c_void) -> Option<Self> {
        unsafe { ComPtr::from_raw(ptr) }.map(Self::from_com_ptr)
    }

    #[inline]
    fn as_raw(&self) -> *mut c_void {
        self.com_ptr().as_raw()
    }

    fn into_raw(self) -> *mut c_void {
        self.into_com_ptr().into_raw()
    }

    #[inline]
    fn vt(&self) -> &Self::Vtbl {
        unsafe { self.com_ptr().vtbl::<Self::Vtbl>() }
    }

    /// `QueryInterface` for another interface of the same object.
    fn query<T: ComInterface>(&self) -> HrResult<T> {
        self.com_ptr().query_interface::<T>()
    }
}

/// Declares an interface newtype.
///
/// `com_interface!(IFoo: IBar, IFooVtbl, "guid")` also derefs `IFoo` to `IBar`.
macro_rules! com_interface {
    ($(#[$doc:meta])* $name:ident, $vtbl:ty, $iid:literal) => {
        $(#[$doc])*
        #[repr(transparent)]
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name($crate::com::ComPtr);

        unsafe impl $crate::com::ComInterface for $name {
            const IID: $crate::guid::GUID = $crate::guid::GUID::parse_const($iid);
            type Vtbl = $vtbl;

            fn com_ptr(&self) -> &$crate::com::ComPtr {
                &self.0
            }

            fn from_com_ptr(ptr: $crate::com::ComPtr) -> Self {
                Self(ptr)
            }

            fn into_com_ptr(self) -> $crate::com::ComPtr {
                self.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:p})", stringify!($name), self.0.as_raw())
            }
        }
    };
    ($(#[$doc:meta])* $name:ident : $base:ty, $vtbl:ty, $iid:literal) => {
        com_interface!($(#[$doc])* $name, $vtbl, $iid);

        impl std::ops::Deref for $name {
            type Target = $base;

            fn deref(&self) -> &$base {
                unsafe { &*(self as *const Self as *const $base) }
            }
        }
    };
}

pub(crate) use com_interface;

/// Runs a call that fills an interface out-pointer and wraps the result.
///
/// A success code with a null pointer is reported as `E_POINTER`.
pub(crate) fn out_interface<T: ComInterface>(call: impl FnOnce(*mut *mut c_void) -> HRESULT) -> HrResult<T> {
    let mut raw: *mut c_void = std::ptr::null_mut();
    call(&mut raw).ok()?;
    unsafe { T::from_raw(raw) }.ok_or(HRESULT::E_POINTER)
}

/// A view of an interface pointer owned by someone else (a callback argument).
///
/// # Safety
/// `ptr` must be null or a live pointer to `T` that outlives the view.
pub(crate) unsafe fn borrow_raw<T: ComInterface>(ptr: *mut c_void) -> Option<ManuallyDrop<T>> {
    unsafe { T::from_raw(ptr) }.map(ManuallyDrop::new)
}

/// Passes an optional interface as an argument without transferring ownership.
pub(crate) fn opt_raw<T: ComInterface>(obj: Option<&T>) -> *mut c_void {
    obj.map_or(std::ptr::null_mut(), |o| o.as_raw())
}

/// Copies a `CoTaskMemAlloc`ed string returned by a method and frees it.
///
/// # Safety
/// `ptr` must be null or a task-allocated, null-terminated UTF-16 string.
pub(crate) unsafe fn take_task_string(ptr: *mut u16) -> String {
    let s = unsafe { crate::utils::from_wide_ptr(ptr) };
    if !ptr.is_null() {
        unsafe { task_mem_free(ptr as *mut c_void) };
    }
    s
}

#[cfg(windows)]
unsafe fn task_mem_free(ptr: *mut c_void) {
    unsafe { crate::ffi::CoTaskMemFree(ptr) }
}

// Without a COM runtime there is no allocator to return the block to; only
// the in-process test objects hand out strings here, and they leak them.
#[cfg(not(windows))]
unsafe fn task_mem_free(_ptr: *mut c_void) {}

pub use data_object::IDataObject;
pub use drop_target::{DropTarget, IDropTarget};
pub use file_dialog::{IFileDialog, IFileOpenDialog, IModalWindow};
pub use file_operation::IFileOperation;
pub use item_filter::{IShellItemFilter, ShellItemFilter};
pub use iunknown::IUnknown;
pub use producer::is_pinned;
pub use progress_sink::{FileOperationProgressSink, IFileOperationProgressSink};
pub use releaser::{Held, OleReleaser};
pub use shell_item::{IEnumShellItems, IShellItem, IShellItemArray};
pub use shell_link::{IPersist, IPersistFile, IShellLinkW};
pub use stream::{ISequentialStream, IStream};
pub use taskbar::{ITaskbarList, ITaskbarList2, ITaskbarList3};
#[cfg(windows)]
pub use init::{co_create_instance, CoInitGuard, OleInitGuard};
