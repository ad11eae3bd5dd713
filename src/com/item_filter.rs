//! `IShellItemFilter`, used by file dialogs to hide items.

use std::ffi::c_void;
use std::ops::Deref;

use super::producer::{unknown_vtbl, ComObject, Produced, Slot};
use super::vtbl::IShellItemFilterVtbl;
use super::{borrow_raw, com_interface, ComInterface, IShellItem};
use crate::co::{HRESULT, SHCONTF};
use crate::error::HrResult;

com_interface! {
    IShellItemFilter, IShellItemFilterVtbl, "2659B475-EEB8-48b7-8F07-B378810F48CF"
}

impl IShellItemFilter {
    /// `true` (`S_OK`) to show the item, `false` (`S_FALSE`) to hide it.
    pub fn include_item(&self, item: &IShellItem) -> HrResult<bool> {
        unsafe { (self.vt().include_item)(self.as_raw(), item.as_raw()) }.ok_bool()
    }

    pub fn get_enum_flags_for_item(&self, item: &IShellItem) -> HrResult<SHCONTF> {
        let mut flags = 0;
        unsafe { (self.vt().get_enum_flags_for_item)(self.as_raw(), item.as_raw(), &mut flags) }.ok()?;
        Ok(flags)
    }
}

type IncludeFn = dyn FnMut(&IShellItem) -> HRESULT;
type EnumFlagsFn = dyn FnMut(&IShellItem, &mut SHCONTF) -> HRESULT;

pub(crate) struct ShellItemFilterCallbacks {
    include_item: Slot<IncludeFn>,
    get_enum_flags_for_item: Slot<EnumFlagsFn>,
}

static SHELL_ITEM_FILTER_VTBL: IShellItemFilterVtbl = IShellItemFilterVtbl {
    base: unknown_vtbl::<ShellItemFilterCallbacks>(),
    include_item: include_item_thunk,
    get_enum_flags_for_item: get_enum_flags_thunk,
};

unsafe impl Produced for ShellItemFilterCallbacks {
    type Iface = IShellItemFilter;

    fn vtbl() -> &'static IShellItemFilterVtbl {
        &SHELL_ITEM_FILTER_VTBL
    }
}

unsafe fn callbacks<'a>(this: *mut c_void) -> &'a ShellItemFilterCallbacks {
    unsafe { &ComObject::<ShellItemFilterCallbacks>::from_this(this).inner }
}

unsafe extern "system" fn include_item_thunk(this: *mut c_void, item: *mut c_void) -> HRESULT {
    let Some(item) = (unsafe { borrow_raw::<IShellItem>(item) }) else {
        return HRESULT::E_POINTER;
    };
    unsafe { callbacks(this) }.include_item.call(|f| f(&*item))
}

unsafe extern "system" fn get_enum_flags_thunk(this: *mut c_void, item: *mut c_void, flags: *mut SHCONTF) -> HRESULT {
    if flags.is_null() {
        return HRESULT::E_POINTER;
    }
    let Some(item) = (unsafe { borrow_raw::<IShellItem>(item) }) else {
        return HRESULT::E_POINTER;
    };
    unsafe { callbacks(this).get_enum_flags_for_item.call(|f| f(&*item, &mut *flags)) }
}

/// A shell item filter implemented by closures. Without handlers every item
/// is included.
#[derive(Clone, Debug)]
pub struct ShellItemFilter(IShellItemFilter);

impl Default for ShellItemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellItemFilter {
    pub fn new() -> Self {
        Self(ComObject::create(ShellItemFilterCallbacks {
            include_item: Slot::new(),
            get_enum_flags_for_item: Slot::new(),
        }))
    }

    fn callbacks(&self) -> &ShellItemFilterCallbacks {
        ComObject::<ShellItemFilterCallbacks>::inner_of(&self.0)
    }

    /// Return `S_OK` to include the item, `S_FALSE` to exclude it.
    pub fn on_include_item(&self, f: impl FnMut(&IShellItem) -> HRESULT + 'static) -> &Self {
        self.callbacks().include_item.set(Box::new(f));
        self
    }

    pub fn on_get_enum_flags_for_item(&self, f: impl FnMut(&IShellItem, &mut SHCONTF) -> HRESULT + 'static) -> &Self {
        self.callbacks().get_enum_flags_for_item.set(Box::new(f));
        self
    }

    pub fn as_interface(&self) -> &IShellItemFilter {
        &self.0
    }

    pub fn into_interface(self) -> IShellItemFilter {
        self.0
    }
}

impl Deref for ShellItemFilter {
    type Target = IShellItemFilter;

    fn deref(&self) -> &IShellItemFilter {
        &self.0
    }
}
