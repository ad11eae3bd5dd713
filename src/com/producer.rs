//! Rust-implemented COM objects.
//!
//! A produced object is a heap record whose first field points at a static
//! vtable of trampolines, so the record address is a valid identity pointer.
//! Records are pinned in a process-wide registry from construction until
//! the final `Release`, which unpins and frees them exactly once.
//!
//! Callbacks are not required to be `Send`, so a record is only freed on the
//! thread that created it. A final `Release` arriving on another thread
//! unpins the record and leaks it.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::vtbl::IUnknownVtbl;
use super::{ComInterface, ComPtr};
use crate::co::HRESULT;
use crate::guid::GUID;
use crate::com::IUnknown;
use crate::{log_error, log_trace};

thread_local! {
    static THREAD_TAG: u8 = const { 0 };
}

// Address of a per-thread marker; `None` while thread locals are torn down.
fn thread_tag() -> Option<usize> {
    THREAD_TAG.try_with(|tag| tag as *const u8 as usize).ok()
}

static PINNED: Mutex<BTreeSet<usize>> = Mutex::new(BTreeSet::new());

fn pinned() -> std::sync::MutexGuard<'static, BTreeSet<usize>> {
    PINNED.lock().unwrap_or_else(|e| e.into_inner())
}

fn pin(addr: usize) {
    pinned().insert(addr);
    log_trace!("pinned COM object {:#x}", addr);
}

fn unpin(addr: usize) -> bool {
    let removed = pinned().remove(&addr);
    if removed {
        log_trace!("unpinned COM object {:#x}", addr);
    } else {
        log_error!("COM object {:#x} was not pinned", addr);
    }
    removed
}

/// Whether `ptr` is a live object produced by this crate.
pub fn is_pinned(ptr: *const c_void) -> bool {
    pinned().contains(&(ptr as usize))
}

/// Per-interface data of a produced object.
///
/// # Safety
/// `vtbl()` must start with an [`IUnknownVtbl`] built from the trampolines
/// in this module instantiated for `Self`, and `Iface` must describe it.
pub(crate) unsafe trait Produced: Sized + 'static {
    type Iface: ComInterface;

    fn vtbl() -> &'static <Self::Iface as ComInterface>::Vtbl;
}

#[repr(C)]
pub(crate) struct ComObject<C: Produced> {
    #[allow(dead_code)] // read through the identity pointer
    vtbl: &'static <C::Iface as ComInterface>::Vtbl,
    refs: AtomicU32,
    owner: Option<usize>,
    pub(crate) inner: C,
}

impl<C: Produced> ComObject<C> {
    /// Allocates and pins a record with a reference count of 1.
    pub(crate) fn create(inner: C) -> C::Iface {
        let record = Box::new(ComObject { vtbl: C::vtbl(), refs: AtomicU32::new(1), owner: thread_tag(), inner });
        let raw = NonNull::from(Box::leak(record)).cast::<c_void>();
        pin(raw.as_ptr() as usize);
        C::Iface::from_com_ptr(ComPtr(raw))
    }

    /// # Safety
    /// `this` must be the identity pointer of a live `ComObject<C>`.
    pub(crate) unsafe fn from_this<'a>(this: *mut c_void) -> &'a ComObject<C> {
        unsafe { &*(this as *const ComObject<C>) }
    }

    /// Data of an object known to have been created through [`ComObject::create`].
    pub(crate) fn inner_of(iface: &C::Iface) -> &C {
        unsafe { &Self::from_this(iface.as_raw()).inner }
    }

    #[cfg(test)]
    pub(crate) fn ref_count(iface: &C::Iface) -> u32 {
        unsafe { Self::from_this(iface.as_raw()).refs.load(Ordering::Acquire) }
    }
}

pub(crate) unsafe extern "system" fn query_interface<C: Produced>(
    this: *mut c_void,
    riid: *const GUID,
    ppv: *mut *mut c_void,
) -> HRESULT {
    if ppv.is_null() {
        return HRESULT::E_POINTER;
    }
    unsafe {
        if riid.is_null() {
            *ppv = std::ptr::null_mut();
            return HRESULT::E_POINTER;
        }
        let iid = *riid;
        if iid == IUnknown::IID || iid == C::Iface::IID {
            add_ref::<C>(this);
            *ppv = this;
            HRESULT::S_OK
        } else {
            *ppv = std::ptr::null_mut();
            HRESULT::E_NOINTERFACE
        }
    }
}

pub(crate) unsafe extern "system" fn add_ref<C: Produced>(this: *mut c_void) -> u32 {
    let obj = unsafe { ComObject::<C>::from_this(this) };
    obj.refs.fetch_add(1, Ordering::Relaxed) + 1
}

pub(crate) unsafe extern "system" fn release<C: Produced>(this: *mut c_void) -> u32 {
    let obj = unsafe { ComObject::<C>::from_this(this) };
    let remaining = obj.refs.fetch_sub(1, Ordering::AcqRel) - 1;
    if remaining == 0 {
        unpin(this as usize);
        if obj.owner.is_some() && obj.owner == thread_tag() {
            drop(unsafe { Box::from_raw(this as *mut ComObject<C>) });
        } else {
            log_error!("COM object {:#x} released off its creating thread; leaking it", this as usize);
        }
    }
    remaining
}

/// The `IUnknown` part of a produced vtable.
pub(crate) const fn unknown_vtbl<C: Produced>() -> IUnknownVtbl {
    IUnknownVtbl {
        query_interface: query_interface::<C>,
        add_ref: add_ref::<C>,
        release: release::<C>,
    }
}

/// One user-settable callback of a produced object.
pub(crate) struct Slot<F: ?Sized>(RefCell<Option<Box<F>>>);

impl<F: ?Sized> Slot<F> {
    pub(crate) const fn new() -> Self {
        Self(RefCell::new(None))
    }

    /// # Panics
    /// Panics if called from inside the same callback.
    pub(crate) fn set(&self, f: Box<F>) {
        *self.0.borrow_mut() = Some(f);
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.try_borrow().map(|s| s.is_some()).unwrap_or(true)
    }

    /// Unset slots answer `S_OK`; a re-entrant call or a panicking callback
    /// answers `E_UNEXPECTED`.
    pub(crate) fn call(&self, invoke: impl FnOnce(&mut F) -> HRESULT) -> HRESULT {
        match self.0.try_borrow_mut() {
            Ok(mut slot) => match slot.as_mut() {
                Some(f) => panic::catch_unwind(AssertUnwindSafe(|| invoke(&mut **f))).unwrap_or_else(|_| {
                    log_error!("COM callback panicked");
                    HRESULT::E_UNEXPECTED
                }),
                None => HRESULT::S_OK,
            },
            Err(_) => {
                log_error!("re-entrant COM callback rejected");
                HRESULT::E_UNEXPECTED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::com::drop_target::DropTarget;

    #[test]
    fn test_query_interface_rules() {
        let target = DropTarget::new();
        let iface = target.as_interface();
        let unk: IUnknown = iface.query().unwrap();
        assert_eq!(unk.as_raw(), iface.as_raw());

        let err = iface.query::<crate::com::IStream>().unwrap_err();
        assert_eq!(err, HRESULT::E_NOINTERFACE);

        let vt = unsafe { iface.com_ptr().vtbl::<IUnknownVtbl>() };
        let hr = unsafe { (vt.query_interface)(iface.as_raw(), &IUnknown::IID, std::ptr::null_mut()) };
        assert_eq!(hr, HRESULT::E_POINTER);
    }

    #[test]
    fn test_record_unpinned_on_last_release() {
        let target = DropTarget::new();
        let raw = target.as_interface().as_raw();
        assert!(is_pinned(raw));
        let copy = target.clone();
        drop(target);
        assert!(is_pinned(raw));
        drop(copy);
        assert!(!is_pinned(raw));
    }

    #[test]
    fn test_foreign_thread_final_release_leaks_callbacks() {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        struct Guard(Arc<AtomicBool>);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let dropped = Arc::new(AtomicBool::new(false));
        let guard = Guard(dropped.clone());
        let target = DropTarget::new();
        target.on_drag_leave(move || {
            let _keep = &guard;
            HRESULT::S_OK
        });
        let raw = target.into_interface().into_raw() as usize;

        let remaining = std::thread::spawn(move || {
            let this = raw as *mut c_void;
            let vt = unsafe { &**(this as *const *const IUnknownVtbl) };
            unsafe { (vt.release)(this) }
        })
        .join()
        .unwrap();

        assert_eq!(remaining, 0);
        assert!(!is_pinned(raw as *const c_void));
        assert!(!dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_owner_thread_final_release_frees_callbacks() {
        use std::rc::Rc;

        let state = Rc::new(());
        let target = DropTarget::new();
        let held = state.clone();
        target.on_drag_leave(move || {
            let _keep = &held;
            HRESULT::S_OK
        });
        assert_eq!(Rc::strong_count(&state), 2);
        drop(target);
        assert_eq!(Rc::strong_count(&state), 1);
    }

    #[test]
    fn test_registry_across_threads() {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    for _ in 0..500 {
                        let target = DropTarget::new();
                        let raw = target.as_interface().as_raw();
                        assert!(is_pinned(raw));
                        let copy = target.clone();
                        drop(target);
                        assert!(is_pinned(raw));
                        assert_eq!(ComObject::<crate::com::drop_target::DropTargetCallbacks>::ref_count(copy.as_interface()), 1);
                        drop(copy);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
    }

    #[test]
    fn test_slot_defaults_to_s_ok() {
        let slot: Slot<dyn FnMut(u32) -> HRESULT> = Slot::new();
        assert!(!slot.is_set());
        assert_eq!(slot.call(|f| f(1)), HRESULT::S_OK);
        slot.set(Box::new(|n| if n == 0 { HRESULT::S_FALSE } else { HRESULT::E_FAIL }));
        assert_eq!(slot.call(|f| f(0)), HRESULT::S_FALSE);
        assert_eq!(slot.call(|f| f(7)), HRESULT::E_FAIL);
    }

    #[test]
    fn test_slot_contains_panics() {
        let slot: Slot<dyn FnMut() -> HRESULT> = Slot::new();
        slot.set(Box::new(|| panic!("handler bug")));
        assert_eq!(slot.call(|f| f()), HRESULT::E_UNEXPECTED);
        // The slot stays usable afterwards.
        slot.set(Box::new(|| HRESULT::S_FALSE));
        assert_eq!(slot.call(|f| f()), HRESULT::S_FALSE);
    }
}
