//! `IFileOperation`: shell copy, move, rename, delete and create, with
//! progress UI, undo and conflict handling done by the shell.

use super::vtbl::IFileOperationVtbl;
use super::{com_interface, opt_raw, ComInterface, IFileOperationProgressSink, IShellItem, IShellItemArray};
use crate::co::FOF;
use crate::error::HrResult;
use crate::guid::GUID;
use crate::types::{FALSE, HWND};
use crate::utils::{opt_ptr, to_wstring, to_wstring_opt};

pub const CLSID_FILE_OPERATION: GUID = GUID::parse_const("3ad05575-8857-4850-9277-11b85bdb8e09");

com_interface! {
    /// Operations are queued by the `*_item` methods and run by
    /// [`IFileOperation::perform_operations`].
    IFileOperation, IFileOperationVtbl, "947aab5f-0a5c-4c13-b4d6-4bf7836fc9f8"
}

type Sink<'a> = Option<&'a IFileOperationProgressSink>;

impl IFileOperation {
    #[cfg(windows)]
    pub fn new() -> HrResult<Self> {
        super::init::co_create_instance(&CLSID_FILE_OPERATION, crate::co::CLSCTX_ALL)
    }

    /// Registers a sink for every queued operation; returns the cookie for
    /// [`IFileOperation::unadvise`].
    pub fn advise(&self, sink: &IFileOperationProgressSink) -> HrResult<u32> {
        let mut cookie = 0;
        unsafe { (self.vt().advise)(self.as_raw(), sink.as_raw(), &mut cookie) }.ok()?;
        Ok(cookie)
    }

    pub fn unadvise(&self, cookie: u32) -> HrResult<()> {
        unsafe { (self.vt().unadvise)(self.as_raw(), cookie) }.ok()
    }

    /// `FOF_*` and `FOFX_*` flags.
    pub fn set_operation_flags(&self, flags: FOF) -> HrResult<()> {
        unsafe { (self.vt().set_operation_flags)(self.as_raw(), flags) }.ok()
    }

    pub fn set_progress_message(&self, message: &str) -> HrResult<()> {
        let message = to_wstring(message);
        unsafe { (self.vt().set_progress_message)(self.as_raw(), message.as_ptr()) }.ok()
    }

    pub fn set_owner_window(&self, owner: HWND) -> HrResult<()> {
        unsafe { (self.vt().set_owner_window)(self.as_raw(), owner) }.ok()
    }

    /// `sink` receives the notifications of this operation only.
    pub fn rename_item(&self, item: &IShellItem, new_name: &str, sink: Sink) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe { (self.vt().rename_item)(self.as_raw(), item.as_raw(), name.as_ptr(), opt_raw(sink)) }.ok()
    }

    pub fn rename_items(&self, items: &IShellItemArray, new_name: &str) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe { (self.vt().rename_items)(self.as_raw(), items.as_raw(), name.as_ptr()) }.ok()
    }

    /// `new_name` renames the item at its destination.
    pub fn move_item(&self, item: &IShellItem, dest: &IShellItem, new_name: Option<&str>, sink: Sink) -> HrResult<()> {
        let name = to_wstring_opt(new_name);
        unsafe {
            (self.vt().move_item)(self.as_raw(), item.as_raw(), dest.as_raw(), opt_ptr(&name), opt_raw(sink))
        }
        .ok()
    }

    pub fn move_items(&self, items: &IShellItemArray, dest: &IShellItem) -> HrResult<()> {
        unsafe { (self.vt().move_items)(self.as_raw(), items.as_raw(), dest.as_raw()) }.ok()
    }

    pub fn copy_item(&self, item: &IShellItem, dest: &IShellItem, new_name: Option<&str>, sink: Sink) -> HrResult<()> {
        let name = to_wstring_opt(new_name);
        unsafe {
            (self.vt().copy_item)(self.as_raw(), item.as_raw(), dest.as_raw(), opt_ptr(&name), opt_raw(sink))
        }
        .ok()
    }

    pub fn copy_items(&self, items: &IShellItemArray, dest: &IShellItem) -> HrResult<()> {
        unsafe { (self.vt().copy_items)(self.as_raw(), items.as_raw(), dest.as_raw()) }.ok()
    }

    /// Deletes permanently unless `FOFX_RECYCLEONDELETE` or
    /// `FOF_ALLOWUNDO` is set.
    pub fn delete_item(&self, item: &IShellItem, sink: Sink) -> HrResult<()> {
        unsafe { (self.vt().delete_item)(self.as_raw(), item.as_raw(), opt_raw(sink)) }.ok()
    }

    pub fn delete_items(&self, items: &IShellItemArray) -> HrResult<()> {
        unsafe { (self.vt().delete_items)(self.as_raw(), items.as_raw()) }.ok()
    }

    /// Creates `name` in `dest` with `FILE_ATTRIBUTE_*` `attributes`,
    /// optionally copying the contents of a template file.
    pub fn new_item(&self, dest: &IShellItem, attributes: u32, name: &str, template: Option<&str>, sink: Sink) -> HrResult<()> {
        let name = to_wstring(name);
        let template = to_wstring_opt(template);
        unsafe {
            (self.vt().new_item)(
                self.as_raw(),
                dest.as_raw(),
                attributes,
                name.as_ptr(),
                opt_ptr(&template),
                opt_raw(sink),
            )
        }
        .ok()
    }

    /// Runs everything queued. A sink that fails a notification cancels the
    /// remaining work; the call then still succeeds and
    /// [`IFileOperation::get_any_operations_aborted`] reports it.
    pub fn perform_operations(&self) -> HrResult<()> {
        unsafe { (self.vt().perform_operations)(self.as_raw()) }.ok()
    }

    pub fn get_any_operations_aborted(&self) -> HrResult<bool> {
        let mut aborted = FALSE;
        unsafe { (self.vt().get_any_operations_aborted)(self.as_raw(), &mut aborted) }.ok()?;
        Ok(aborted != FALSE)
    }
}

#[cfg(test)]
mod fake {
    use super::*;
    use crate::co::{HRESULT, TSF_NORMAL};
    use crate::com::producer::{unknown_vtbl, ComObject, Produced};
    use crate::com::{borrow_raw, IShellItem};
    use crate::types::{BOOL, PCWSTR, TRUE};
    use crate::utils::from_wide_ptr;
    use std::cell::{Cell, RefCell};
    use std::ffi::c_void;

    enum Op {
        Copy(IShellItem, IShellItem, String),
        Delete(IShellItem),
    }

    /// Runs queued copies and deletes by only sending notifications.
    #[derive(Default)]
    pub(super) struct FakeOperation {
        sink: RefCell<Option<IFileOperationProgressSink>>,
        queue: RefCell<Vec<Op>>,
        aborted: Cell<bool>,
        pub flags: Cell<FOF>,
    }

    type This = *mut c_void;

    unsafe fn op<'a>(this: This) -> &'a FakeOperation {
        unsafe { &ComObject::<FakeOperation>::from_this(this).inner }
    }

    unsafe fn item(p: *mut c_void) -> Option<IShellItem> {
        unsafe { borrow_raw::<IShellItem>(p) }.map(|i| (*i).clone())
    }

    unsafe extern "system" fn advise(this: This, sink: *mut c_void, cookie: *mut u32) -> HRESULT {
        let Some(sink) = (unsafe { borrow_raw::<IFileOperationProgressSink>(sink) }) else {
            return HRESULT::E_INVALIDARG;
        };
        unsafe {
            *op(this).sink.borrow_mut() = Some((*sink).clone());
            *cookie = 1;
        }
        HRESULT::S_OK
    }

    unsafe extern "system" fn unadvise(this: This, cookie: u32) -> HRESULT {
        if cookie != 1 {
            return HRESULT::E_INVALIDARG;
        }
        unsafe { op(this).sink.borrow_mut().take() };
        HRESULT::S_OK
    }

    unsafe extern "system" fn set_operation_flags(this: This, flags: u32) -> HRESULT {
        unsafe { op(this) }.flags.set(flags);
        HRESULT::S_OK
    }

    unsafe extern "system" fn with_str(_: This, _: PCWSTR) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn with_ptr(_: This, _: *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn rename_item(_: This, _: *mut c_void, _: PCWSTR, _: *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn with_ptr_str(_: This, _: *mut c_void, _: PCWSTR) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn move_item(_: This, _: *mut c_void, _: *mut c_void, _: PCWSTR, _: *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn with_two_ptrs(_: This, _: *mut c_void, _: *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn copy_item(this: This, it: *mut c_void, dest: *mut c_void, name: PCWSTR, _: *mut c_void) -> HRESULT {
        let (Some(it), Some(dest)) = (unsafe { item(it) }, unsafe { item(dest) }) else {
            return HRESULT::E_INVALIDARG;
        };
        let name = unsafe { from_wide_ptr(name) };
        unsafe { op(this) }.queue.borrow_mut().push(Op::Copy(it, dest, name));
        HRESULT::S_OK
    }

    unsafe extern "system" fn delete_item(this: This, it: *mut c_void, _: *mut c_void) -> HRESULT {
        let Some(it) = (unsafe { item(it) }) else {
            return HRESULT::E_INVALIDARG;
        };
        unsafe { op(this) }.queue.borrow_mut().push(Op::Delete(it));
        HRESULT::S_OK
    }

    unsafe extern "system" fn new_item(_: This, _: *mut c_void, _: u32, _: PCWSTR, _: PCWSTR, _: *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn perform_operations(this: This) -> HRESULT {
        let op = unsafe { op(this) };
        let sink = op.sink.borrow().clone();
        let queue = std::mem::take(&mut *op.queue.borrow_mut());
        let Some(sink) = sink else {
            return HRESULT::S_OK;
        };
        let _ = sink.start_operations();
        let total = queue.len() as u32;
        let mut result = HRESULT::S_OK;
        for (done, queued) in queue.iter().enumerate() {
            let step = match queued {
                Op::Copy(it, dest, name) => sink
                    .pre_copy_item(TSF_NORMAL, Some(it), Some(dest), name)
                    .and_then(|_| sink.post_copy_item(TSF_NORMAL, Some(it), Some(dest), name, HRESULT::S_OK, None)),
                Op::Delete(it) => sink
                    .pre_delete_item(TSF_NORMAL, Some(it))
                    .and_then(|_| sink.post_delete_item(TSF_NORMAL, Some(it), HRESULT::S_OK, None)),
            };
            if let Err(hr) = step {
                op.aborted.set(true);
                result = hr;
                break;
            }
            let _ = sink.update_progress(total, done as u32 + 1);
        }
        let _ = sink.finish_operations(result);
        HRESULT::S_OK
    }

    unsafe extern "system" fn any_aborted(this: This, aborted: *mut BOOL) -> HRESULT {
        unsafe { *aborted = if op(this).aborted.get() { TRUE } else { FALSE } };
        HRESULT::S_OK
    }

    unsafe extern "system" fn set_owner_window(_: This, _: HWND) -> HRESULT {
        HRESULT::S_OK
    }

    static OPERATION_VTBL: IFileOperationVtbl = IFileOperationVtbl {
        base: unknown_vtbl::<FakeOperation>(),
        advise,
        unadvise,
        set_operation_flags,
        set_progress_message: with_str,
        set_progress_dialog: with_ptr,
        set_properties: with_ptr,
        set_owner_window,
        apply_properties_to_item: with_ptr,
        apply_properties_to_items: with_ptr,
        rename_item,
        rename_items: with_ptr_str,
        move_item,
        move_items: with_two_ptrs,
        copy_item,
        copy_items: with_two_ptrs,
        delete_item,
        delete_items: with_ptr,
        new_item,
        perform_operations,
        get_any_operations_aborted: any_aborted,
    };

    unsafe impl Produced for FakeOperation {
        type Iface = IFileOperation;

        fn vtbl() -> &'static IFileOperationVtbl {
            &OPERATION_VTBL
        }
    }

    pub(super) fn operation() -> IFileOperation {
        ComObject::create(FakeOperation::default())
    }

    pub(super) fn flags_of(op: &IFileOperation) -> FOF {
        ComObject::<FakeOperation>::inner_of(op).flags.get()
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{flags_of, operation};
    use crate::co::{HRESULT, FOFX_RECYCLEONDELETE, FOF_NOCONFIRMATION};
    use crate::com::shell_item::fake::folder;
    use crate::com::{FileOperationProgressSink, OleReleaser};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_sink(events: &Rc<RefCell<Vec<String>>>) -> FileOperationProgressSink {
        let sink = FileOperationProgressSink::new();
        let log = events.clone();
        sink.on_start_operations(move || {
            log.borrow_mut().push("start".into());
            HRESULT::S_OK
        });
        let log = events.clone();
        sink.on_pre_copy_item(move |_, _, _, name| {
            log.borrow_mut().push(format!("copy {}", name));
            HRESULT::S_OK
        });
        let log = events.clone();
        sink.on_update_progress(move |total, done| {
            log.borrow_mut().push(format!("{}/{}", done, total));
            HRESULT::S_OK
        });
        let log = events.clone();
        sink.on_finish_operations(move |hr| {
            log.borrow_mut().push(format!("finish {}", hr.succeeded()));
            HRESULT::S_OK
        });
        sink
    }

    #[test]
    fn test_advised_sink_sees_queued_operations() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = recording_sink(&events);
        let rel = OleReleaser::new();
        let op = rel.add(operation());

        op.set_operation_flags(FOF_NOCONFIRMATION | FOFX_RECYCLEONDELETE).unwrap();
        assert_eq!(flags_of(&op), FOF_NOCONFIRMATION | FOFX_RECYCLEONDELETE);

        let cookie = op.advise(&sink).unwrap();
        let (src, dest) = (folder(1), folder(2));
        op.copy_item(&src, &dest, Some("copy.txt"), None).unwrap();
        op.delete_item(&src, None).unwrap();
        op.perform_operations().unwrap();
        op.unadvise(cookie).unwrap();

        assert_eq!(*events.borrow(), vec!["start", "copy copy.txt", "1/2", "2/2", "finish true"]);
        assert_eq!(op.get_any_operations_aborted(), Ok(false));
    }

    #[test]
    fn test_sink_failure_aborts() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = recording_sink(&events);
        sink.on_pre_delete_item(|_, _| HRESULT::E_ABORT);

        let op = operation();
        op.advise(&sink).unwrap();
        let (a, b) = (folder(1), folder(2));
        op.delete_item(&a, None).unwrap();
        op.copy_item(&a, &b, Some("never"), None).unwrap();
        op.perform_operations().unwrap();

        assert_eq!(*events.borrow(), vec!["start", "finish false"]);
        assert_eq!(op.get_any_operations_aborted(), Ok(true));
    }

    #[test]
    fn test_unimplemented_calls_report_errors() {
        let op = operation();
        let dest = folder(3);
        assert_eq!(op.new_item(&dest, 0, "a.txt", None, None), Err(HRESULT::E_NOTIMPL));
        assert_eq!(op.unadvise(42), Err(HRESULT::E_INVALIDARG));
    }
}
