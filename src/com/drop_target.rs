//! `IDropTarget`, both as a consumable interface and as a Rust-implemented
//! object that forwards drag events to closures.

use std::ffi::c_void;
use std::ops::Deref;

use super::producer::{unknown_vtbl, ComObject, Produced, Slot};
use super::vtbl::IDropTargetVtbl;
use super::{borrow_raw, com_interface, opt_raw, ComInterface, IDataObject};
use crate::co::{DROPEFFECT, HRESULT, MK};
use crate::error::HrResult;
use crate::types::POINTL;

com_interface! {
    IDropTarget, IDropTargetVtbl, "00000122-0000-0000-C000-000000000046"
}

impl IDropTarget {
    /// Returns the effect the target chose out of `effect`.
    pub fn drag_enter(&self, data: Option<&IDataObject>, keys: MK, pt: POINTL, effect: DROPEFFECT) -> HrResult<DROPEFFECT> {
        let mut effect = effect;
        unsafe { (self.vt().drag_enter)(self.as_raw(), opt_raw(data), keys, pt, &mut effect) }.ok()?;
        Ok(effect)
    }

    pub fn drag_over(&self, keys: MK, pt: POINTL, effect: DROPEFFECT) -> HrResult<DROPEFFECT> {
        let mut effect = effect;
        unsafe { (self.vt().drag_over)(self.as_raw(), keys, pt, &mut effect) }.ok()?;
        Ok(effect)
    }

    pub fn drag_leave(&self) -> HrResult<()> {
        unsafe { (self.vt().drag_leave)(self.as_raw()) }.ok()
    }

    /// `IDropTarget::Drop`.
    pub fn drop_data(&self, data: Option<&IDataObject>, keys: MK, pt: POINTL, effect: DROPEFFECT) -> HrResult<DROPEFFECT> {
        let mut effect = effect;
        unsafe { (self.vt().drop)(self.as_raw(), opt_raw(data), keys, pt, &mut effect) }.ok()?;
        Ok(effect)
    }
}

type DragFn = dyn FnMut(Option<&IDataObject>, MK, POINTL, &mut DROPEFFECT) -> HRESULT;
type DragOverFn = dyn FnMut(MK, POINTL, &mut DROPEFFECT) -> HRESULT;
type DragLeaveFn = dyn FnMut() -> HRESULT;

pub(crate) struct DropTargetCallbacks {
    drag_enter: Slot<DragFn>,
    drag_over: Slot<DragOverFn>,
    drag_leave: Slot<DragLeaveFn>,
    drop: Slot<DragFn>,
}

static DROP_TARGET_VTBL: IDropTargetVtbl = IDropTargetVtbl {
    base: unknown_vtbl::<DropTargetCallbacks>(),
    drag_enter: drag_enter_thunk,
    drag_over: drag_over_thunk,
    drag_leave: drag_leave_thunk,
    drop: drop_thunk,
};

unsafe impl Produced for DropTargetCallbacks {
    type Iface = IDropTarget;

    fn vtbl() -> &'static IDropTargetVtbl {
        &DROP_TARGET_VTBL
    }
}

unsafe fn callbacks<'a>(this: *mut c_void) -> &'a DropTargetCallbacks {
    unsafe { &ComObject::<DropTargetCallbacks>::from_this(this).inner }
}

unsafe extern "system" fn drag_enter_thunk(this: *mut c_void, data: *mut c_void, keys: MK, pt: POINTL, effect: *mut DROPEFFECT) -> HRESULT {
    if effect.is_null() {
        return HRESULT::E_INVALIDARG;
    }
    unsafe {
        let data = borrow_raw::<IDataObject>(data);
        callbacks(this).drag_enter.call(|f| f(data.as_deref(), keys, pt, &mut *effect))
    }
}

unsafe extern "system" fn drag_over_thunk(this: *mut c_void, keys: MK, pt: POINTL, effect: *mut DROPEFFECT) -> HRESULT {
    if effect.is_null() {
        return HRESULT::E_INVALIDARG;
    }
    unsafe { callbacks(this).drag_over.call(|f| f(keys, pt, &mut *effect)) }
}

unsafe extern "system" fn drag_leave_thunk(this: *mut c_void) -> HRESULT {
    unsafe { callbacks(this).drag_leave.call(|f| f()) }
}

unsafe extern "system" fn drop_thunk(this: *mut c_void, data: *mut c_void, keys: MK, pt: POINTL, effect: *mut DROPEFFECT) -> HRESULT {
    if effect.is_null() {
        return HRESULT::E_INVALIDARG;
    }
    unsafe {
        let data = borrow_raw::<IDataObject>(data);
        callbacks(this).drop.call(|f| f(data.as_deref(), keys, pt, &mut *effect))
    }
}

/// A drop target implemented by closures.
///
/// Events without a handler answer `S_OK` and leave the effect untouched.
#[derive(Clone, Debug)]
pub struct DropTarget(IDropTarget);

impl Default for DropTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl DropTarget {
    pub fn new() -> Self {
        Self(ComObject::create(DropTargetCallbacks {
            drag_enter: Slot::new(),
            drag_over: Slot::new(),
            drag_leave: Slot::new(),
            drop: Slot::new(),
        }))
    }

    fn callbacks(&self) -> &DropTargetCallbacks {
        ComObject::<DropTargetCallbacks>::inner_of(&self.0)
    }

    pub fn on_drag_enter(&self, f: impl FnMut(Option<&IDataObject>, MK, POINTL, &mut DROPEFFECT) -> HRESULT + 'static) -> &Self {
        self.callbacks().drag_enter.set(Box::new(f));
        self
    }

    pub fn on_drag_over(&self, f: impl FnMut(MK, POINTL, &mut DROPEFFECT) -> HRESULT + 'static) -> &Self {
        self.callbacks().drag_over.set(Box::new(f));
        self
    }

    pub fn on_drag_leave(&self, f: impl FnMut() -> HRESULT + 'static) -> &Self {
        self.callbacks().drag_leave.set(Box::new(f));
        self
    }

    pub fn on_drop(&self, f: impl FnMut(Option<&IDataObject>, MK, POINTL, &mut DROPEFFECT) -> HRESULT + 'static) -> &Self {
        self.callbacks().drop.set(Box::new(f));
        self
    }

    pub fn as_interface(&self) -> &IDropTarget {
        &self.0
    }

    pub fn into_interface(self) -> IDropTarget {
        self.0
    }

    /// `RegisterDragDrop`; OLE must be initialized on this thread.
    #[cfg(windows)]
    pub fn register(&self, hwnd: crate::types::HWND) -> HrResult<()> {
        unsafe { crate::ffi::RegisterDragDrop(hwnd, self.as_raw()) }.ok()
    }

    /// `RevokeDragDrop`.
    #[cfg(windows)]
    pub fn revoke(hwnd: crate::types::HWND) -> HrResult<()> {
        unsafe { crate::ffi::RevokeDragDrop(hwnd) }.ok()
    }
}

impl Deref for DropTarget {
    type Target = IDropTarget;

    fn deref(&self) -> &IDropTarget {
        &self.0
    }
}
