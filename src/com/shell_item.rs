use std::ffi::c_void;

use super::vtbl::{IEnumShellItemsVtbl, IShellItemArrayVtbl, IShellItemVtbl};
use super::{com_interface, out_interface, take_task_string, ComInterface};
use crate::co::{HRESULT, SFGAO, SICHINT, SIGDN, SIGDN_FILESYSPATH};
use crate::error::HrResult;
use crate::guid::GUID;

com_interface! {
    /// A shell namespace item: a file, a folder or a virtual object.
    IShellItem, IShellItemVtbl, "43826d1e-e718-42ee-bc55-a1e261c37bfe"
}

com_interface! {
    IShellItemArray, IShellItemArrayVtbl, "b63ea76d-1f85-456f-a19c-48159efa858b"
}

com_interface! {
    IEnumShellItems, IEnumShellItemsVtbl, "70629033-e363-4a28-a567-0db78006e6d7"
}

impl IShellItem {
    /// `SHCreateItemFromParsingName`.
    #[cfg(windows)]
    pub fn from_parsing_name(path: &str) -> HrResult<IShellItem> {
        let path = crate::utils::to_wstring(path);
        out_interface(|out| unsafe {
            crate::ffi::SHCreateItemFromParsingName(path.as_ptr(), std::ptr::null_mut(), &IShellItem::IID, out)
        })
    }

    pub fn bind_to_handler<T: ComInterface>(&self, bhid: &GUID) -> HrResult<T> {
        out_interface(|out| unsafe {
            (self.vt().bind_to_handler)(self.as_raw(), std::ptr::null_mut(), bhid, &T::IID, out)
        })
    }

    pub fn get_parent(&self) -> HrResult<IShellItem> {
        out_interface(|out| unsafe { (self.vt().get_parent)(self.as_raw(), out) })
    }

    pub fn get_display_name(&self, sigdn: SIGDN) -> HrResult<String> {
        let mut name: *mut u16 = std::ptr::null_mut();
        unsafe { (self.vt().get_display_name)(self.as_raw(), sigdn, &mut name) }.ok()?;
        Ok(unsafe { take_task_string(name) })
    }

    /// The file system path, failing for items outside the file system.
    pub fn file_sys_path(&self) -> HrResult<String> {
        self.get_display_name(SIGDN_FILESYSPATH)
    }

    /// Attributes selected by `mask`. The object answers `S_FALSE` when not
    /// every requested attribute is set, which is still a success.
    pub fn get_attributes(&self, mask: SFGAO) -> HrResult<SFGAO> {
        let mut attrs = 0;
        unsafe { (self.vt().get_attributes)(self.as_raw(), mask, &mut attrs) }.ok()?;
        Ok(attrs)
    }

    /// Zero when both items are the same; otherwise the sort order.
    pub fn compare(&self, other: &IShellItem, hint: SICHINT) -> HrResult<i32> {
        let mut order = 0;
        unsafe { (self.vt().compare)(self.as_raw(), other.as_raw(), hint, &mut order) }.ok()?;
        Ok(order)
    }
}

impl IShellItemArray {
    pub fn get_count(&self) -> HrResult<u32> {
        let mut count = 0;
        unsafe { (self.vt().get_count)(self.as_raw(), &mut count) }.ok()?;
        Ok(count)
    }

    pub fn get_item_at(&self, index: u32) -> HrResult<IShellItem> {
        out_interface(|out| unsafe { (self.vt().get_item_at)(self.as_raw(), index, out) })
    }

    pub fn enum_items(&self) -> HrResult<IEnumShellItems> {
        out_interface(|out| unsafe { (self.vt().enum_items)(self.as_raw(), out) })
    }

    /// `SIATTRIBFLAGS` combination of the attributes of every item.
    pub fn get_attributes(&self, flags: u32, mask: SFGAO) -> HrResult<SFGAO> {
        let mut attrs = 0;
        unsafe { (self.vt().get_attributes)(self.as_raw(), flags, mask, &mut attrs) }.ok()?;
        Ok(attrs)
    }

    /// Items by index; a failing `GetItemAt` ends the iteration with its error.
    pub fn iter(&self) -> impl Iterator<Item = HrResult<IShellItem>> + '_ {
        let count = self.get_count();
        let (count, first_err) = match count {
            Ok(n) => (n, None),
            Err(e) => (0, Some(Err(e))),
        };
        first_err.into_iter().chain((0..count).map(move |i| self.get_item_at(i)))
    }

    /// File system paths of all items.
    pub fn file_sys_paths(&self) -> HrResult<Vec<String>> {
        self.iter().map(|item| item?.file_sys_path()).collect()
    }
}

impl IEnumShellItems {
    /// `Ok(None)` once the enumeration is exhausted.
    pub fn next_item(&self) -> HrResult<Option<IShellItem>> {
        let mut raw: *mut c_void = std::ptr::null_mut();
        let mut fetched = 0u32;
        let hr = unsafe { (self.vt().next)(self.as_raw(), 1, &mut raw, &mut fetched) };
        hr.ok()?;
        if hr == HRESULT::S_FALSE || fetched == 0 {
            return Ok(None);
        }
        Ok(unsafe { IShellItem::from_raw(raw) })
    }

    /// `IEnumShellItems::Skip`; `Ok(false)` when fewer than `count` items were left.
    pub fn skip_items(&self, count: u32) -> HrResult<bool> {
        unsafe { (self.vt().skip)(self.as_raw(), count) }.ok_bool()
    }

    pub fn reset(&self) -> HrResult<()> {
        unsafe { (self.vt().reset)(self.as_raw()) }.ok()
    }

    /// `IEnumShellItems::Clone`: a second cursor at the same position.
    pub fn clone_enum(&self) -> HrResult<IEnumShellItems> {
        out_interface(|out| unsafe { (self.vt().clone)(self.as_raw(), out) })
    }
}

impl Iterator for IEnumShellItems {
    type Item = HrResult<IShellItem>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}

/// In-process shell items for exercising the wrappers without a shell.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use crate::co::SFGAO_FOLDER;
    use crate::com::producer::{unknown_vtbl, ComObject, Produced};
    use std::cell::Cell;

    pub(crate) struct FakeItem {
        pub id: i32,
        pub attrs: SFGAO,
        pub parent: Option<IShellItem>,
    }

    unsafe fn item<'a>(this: *mut c_void) -> &'a FakeItem {
        unsafe { &ComObject::<FakeItem>::from_this(this).inner }
    }

    unsafe extern "system" fn bind_to_handler(_: *mut c_void, _: *mut c_void, _: *const GUID, _: *const GUID, out: *mut *mut c_void) -> HRESULT {
        unsafe { *out = std::ptr::null_mut() };
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn get_parent(this: *mut c_void, out: *mut *mut c_void) -> HRESULT {
        match unsafe { &item(this).parent } {
            Some(p) => {
                unsafe { *out = p.clone().into_raw() };
                HRESULT::S_OK
            }
            None => HRESULT::E_FAIL,
        }
    }

    unsafe extern "system" fn get_display_name(_: *mut c_void, _: SIGDN, out: *mut *mut u16) -> HRESULT {
        unsafe { *out = std::ptr::null_mut() };
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn get_attributes(this: *mut c_void, mask: SFGAO, out: *mut SFGAO) -> HRESULT {
        let attrs = unsafe { item(this).attrs } & mask;
        unsafe { *out = attrs };
        if attrs == mask { HRESULT::S_OK } else { HRESULT::S_FALSE }
    }

    unsafe extern "system" fn compare(this: *mut c_void, other: *mut c_void, _: SICHINT, out: *mut i32) -> HRESULT {
        let order = unsafe { item(this).id - item(other).id };
        unsafe { *out = order };
        if order == 0 { HRESULT::S_OK } else { HRESULT::S_FALSE }
    }

    static ITEM_VTBL: IShellItemVtbl = IShellItemVtbl {
        base: unknown_vtbl::<FakeItem>(),
        bind_to_handler,
        get_parent,
        get_display_name,
        get_attributes,
        compare,
    };

    unsafe impl Produced for FakeItem {
        type Iface = IShellItem;

        fn vtbl() -> &'static IShellItemVtbl {
            &ITEM_VTBL
        }
    }

    pub(crate) fn item_with(id: i32, attrs: SFGAO, parent: Option<IShellItem>) -> IShellItem {
        ComObject::create(FakeItem { id, attrs, parent })
    }

    pub(crate) fn folder(id: i32) -> IShellItem {
        item_with(id, SFGAO_FOLDER, None)
    }

    pub(crate) struct FakeArray(pub Vec<IShellItem>);

    unsafe fn array<'a>(this: *mut c_void) -> &'a [IShellItem] {
        unsafe { &ComObject::<FakeArray>::from_this(this).inner.0 }
    }

    unsafe extern "system" fn array_bind(_: *mut c_void, _: *mut c_void, _: *const GUID, _: *const GUID, _: *mut *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn array_property_store(_: *mut c_void, _: u32, _: *const GUID, _: *mut *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn array_description_list(_: *mut c_void, _: *const c_void, _: *const GUID, _: *mut *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn array_attributes(this: *mut c_void, _: u32, mask: SFGAO, out: *mut SFGAO) -> HRESULT {
        let all = unsafe { array(this) }
            .iter()
            .fold(mask, |acc, i| acc & i.get_attributes(mask).unwrap_or(0));
        unsafe { *out = all };
        HRESULT::S_OK
    }

    unsafe extern "system" fn array_count(this: *mut c_void, out: *mut u32) -> HRESULT {
        unsafe { *out = array(this).len() as u32 };
        HRESULT::S_OK
    }

    unsafe extern "system" fn array_item_at(this: *mut c_void, index: u32, out: *mut *mut c_void) -> HRESULT {
        match unsafe { array(this) }.get(index as usize) {
            Some(i) => {
                unsafe { *out = i.clone().into_raw() };
                HRESULT::S_OK
            }
            None => HRESULT::E_INVALIDARG,
        }
    }

    unsafe extern "system" fn array_enum(this: *mut c_void, out: *mut *mut c_void) -> HRESULT {
        let items = unsafe { array(this) }.to_vec();
        unsafe { *out = ComObject::create(FakeEnum { items, pos: Cell::new(0) }).into_raw() };
        HRESULT::S_OK
    }

    static ARRAY_VTBL: IShellItemArrayVtbl = IShellItemArrayVtbl {
        base: unknown_vtbl::<FakeArray>(),
        bind_to_handler: array_bind,
        get_property_store: array_property_store,
        get_property_description_list: array_description_list,
        get_attributes: array_attributes,
        get_count: array_count,
        get_item_at: array_item_at,
        enum_items: array_enum,
    };

    unsafe impl Produced for FakeArray {
        type Iface = IShellItemArray;

        fn vtbl() -> &'static IShellItemArrayVtbl {
            &ARRAY_VTBL
        }
    }

    pub(crate) fn array_of(items: Vec<IShellItem>) -> IShellItemArray {
        ComObject::create(FakeArray(items))
    }

    pub(crate) struct FakeEnum {
        items: Vec<IShellItem>,
        pos: Cell<usize>,
    }

    unsafe fn cursor<'a>(this: *mut c_void) -> &'a FakeEnum {
        unsafe { &ComObject::<FakeEnum>::from_this(this).inner }
    }

    unsafe extern "system" fn enum_next(this: *mut c_void, celt: u32, out: *mut *mut c_void, fetched: *mut u32) -> HRESULT {
        let e = unsafe { cursor(this) };
        let mut n = 0;
        while n < celt as usize {
            match e.items.get(e.pos.get()) {
                Some(i) => unsafe { *out.add(n) = i.clone().into_raw() },
                None => break,
            }
            e.pos.set(e.pos.get() + 1);
            n += 1;
        }
        if !fetched.is_null() {
            unsafe { *fetched = n as u32 };
        }
        if n == celt as usize { HRESULT::S_OK } else { HRESULT::S_FALSE }
    }

    unsafe extern "system" fn enum_skip(this: *mut c_void, celt: u32) -> HRESULT {
        let e = unsafe { cursor(this) };
        let target = e.pos.get() + celt as usize;
        e.pos.set(target.min(e.items.len()));
        if target <= e.items.len() { HRESULT::S_OK } else { HRESULT::S_FALSE }
    }

    unsafe extern "system" fn enum_reset(this: *mut c_void) -> HRESULT {
        unsafe { cursor(this) }.pos.set(0);
        HRESULT::S_OK
    }

    unsafe extern "system" fn enum_clone(this: *mut c_void, out: *mut *mut c_void) -> HRESULT {
        let e = unsafe { cursor(this) };
        let copy = FakeEnum { items: e.items.clone(), pos: Cell::new(e.pos.get()) };
        unsafe { *out = ComObject::create(copy).into_raw() };
        HRESULT::S_OK
    }

    static ENUM_VTBL: IEnumShellItemsVtbl = IEnumShellItemsVtbl {
        base: unknown_vtbl::<FakeEnum>(),
        next: enum_next,
        skip: enum_skip,
        reset: enum_reset,
        clone: enum_clone,
    };

    unsafe impl Produced for FakeEnum {
        type Iface = IEnumShellItems;

        fn vtbl() -> &'static IEnumShellItemsVtbl {
            &ENUM_VTBL
        }
    }
}
