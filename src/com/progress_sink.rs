//! `IFileOperationProgressSink`: notifications sent by `IFileOperation`
//! while it performs queued operations.

use std::ffi::c_void;
use std::ops::Deref;

use super::producer::{unknown_vtbl, ComObject, Produced, Slot};
use super::vtbl::IFileOperationProgressSinkVtbl;
use super::{borrow_raw, com_interface, opt_raw, ComInterface, IShellItem};
use crate::co::{HRESULT, TSF};
use crate::error::HrResult;
use crate::types::PCWSTR;
use crate::utils::{from_wide_ptr, to_wstring};

com_interface! {
    IFileOperationProgressSink, IFileOperationProgressSinkVtbl, "04b0f1a7-9490-44bc-96e1-4296a31252e2"
}

type Item<'a> = Option<&'a IShellItem>;

// Consumer side, mostly useful to forward notifications to another sink.
impl IFileOperationProgressSink {
    pub fn start_operations(&self) -> HrResult<()> {
        unsafe { (self.vt().start_operations)(self.as_raw()) }.ok()
    }

    pub fn finish_operations(&self, result: HRESULT) -> HrResult<()> {
        unsafe { (self.vt().finish_operations)(self.as_raw(), result) }.ok()
    }

    pub fn pre_rename_item(&self, flags: TSF, item: Item, new_name: &str) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe { (self.vt().pre_rename_item)(self.as_raw(), flags, opt_raw(item), name.as_ptr()) }.ok()
    }

    pub fn post_rename_item(&self, flags: TSF, item: Item, new_name: &str, result: HRESULT, new_item: Item) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe {
            (self.vt().post_rename_item)(self.as_raw(), flags, opt_raw(item), name.as_ptr(), result, opt_raw(new_item))
        }
        .ok()
    }

    pub fn pre_move_item(&self, flags: TSF, item: Item, dest: Item, new_name: &str) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe { (self.vt().pre_move_item)(self.as_raw(), flags, opt_raw(item), opt_raw(dest), name.as_ptr()) }.ok()
    }

    pub fn post_move_item(&self, flags: TSF, item: Item, dest: Item, new_name: &str, result: HRESULT, new_item: Item) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe {
            (self.vt().post_move_item)(
                self.as_raw(), flags, opt_raw(item), opt_raw(dest), name.as_ptr(), result, opt_raw(new_item),
            )
        }
        .ok()
    }

    pub fn pre_copy_item(&self, flags: TSF, item: Item, dest: Item, new_name: &str) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe { (self.vt().pre_copy_item)(self.as_raw(), flags, opt_raw(item), opt_raw(dest), name.as_ptr()) }.ok()
    }

    pub fn post_copy_item(&self, flags: TSF, item: Item, dest: Item, new_name: &str, result: HRESULT, new_item: Item) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe {
            (self.vt().post_copy_item)(
                self.as_raw(), flags, opt_raw(item), opt_raw(dest), name.as_ptr(), result, opt_raw(new_item),
            )
        }
        .ok()
    }

    pub fn pre_delete_item(&self, flags: TSF, item: Item) -> HrResult<()> {
        unsafe { (self.vt().pre_delete_item)(self.as_raw(), flags, opt_raw(item)) }.ok()
    }

    pub fn post_delete_item(&self, flags: TSF, item: Item, result: HRESULT, new_item: Item) -> HrResult<()> {
        unsafe { (self.vt().post_delete_item)(self.as_raw(), flags, opt_raw(item), result, opt_raw(new_item)) }.ok()
    }

    pub fn pre_new_item(&self, flags: TSF, dest: Item, new_name: &str) -> HrResult<()> {
        let name = to_wstring(new_name);
        unsafe { (self.vt().pre_new_item)(self.as_raw(), flags, opt_raw(dest), name.as_ptr()) }.ok()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn post_new_item(
        &self,
        flags: TSF,
        dest: Item,
        new_name: &str,
        template: &str,
        attributes: u32,
        result: HRESULT,
        new_item: Item,
    ) -> HrResult<()> {
        let name = to_wstring(new_name);
        let template = to_wstring(template);
        unsafe {
            (self.vt().post_new_item)(
                self.as_raw(), flags, opt_raw(dest), name.as_ptr(), template.as_ptr(), attributes, result, opt_raw(new_item),
            )
        }
        .ok()
    }

    pub fn update_progress(&self, work_total: u32, work_so_far: u32) -> HrResult<()> {
        unsafe { (self.vt().update_progress)(self.as_raw(), work_total, work_so_far) }.ok()
    }

    pub fn reset_timer(&self) -> HrResult<()> {
        unsafe { (self.vt().reset_timer)(self.as_raw()) }.ok()
    }

    pub fn pause_timer(&self) -> HrResult<()> {
        unsafe { (self.vt().pause_timer)(self.as_raw()) }.ok()
    }

    pub fn resume_timer(&self) -> HrResult<()> {
        unsafe { (self.vt().resume_timer)(self.as_raw()) }.ok()
    }
}

type NotifyFn = dyn FnMut() -> HRESULT;
type FinishFn = dyn FnMut(HRESULT) -> HRESULT;
type PreRenameFn = dyn FnMut(TSF, Item, &str) -> HRESULT;
type PostRenameFn = dyn FnMut(TSF, Item, &str, HRESULT, Item) -> HRESULT;
type PreTransferFn = dyn FnMut(TSF, Item, Item, &str) -> HRESULT;
type PostTransferFn = dyn FnMut(TSF, Item, Item, &str, HRESULT, Item) -> HRESULT;
type PreDeleteFn = dyn FnMut(TSF, Item) -> HRESULT;
type PostDeleteFn = dyn FnMut(TSF, Item, HRESULT, Item) -> HRESULT;
type PreNewFn = dyn FnMut(TSF, Item, &str) -> HRESULT;
type PostNewFn = dyn FnMut(TSF, Item, &str, &str, u32, HRESULT, Item) -> HRESULT;
type ProgressFn = dyn FnMut(u32, u32) -> HRESULT;

pub(crate) struct ProgressSinkCallbacks {
    start_operations: Slot<NotifyFn>,
    finish_operations: Slot<FinishFn>,
    pre_rename_item: Slot<PreRenameFn>,
    post_rename_item: Slot<PostRenameFn>,
    pre_move_item: Slot<PreTransferFn>,
    post_move_item: Slot<PostTransferFn>,
    pre_copy_item: Slot<PreTransferFn>,
    post_copy_item: Slot<PostTransferFn>,
    pre_delete_item: Slot<PreDeleteFn>,
    post_delete_item: Slot<PostDeleteFn>,
    pre_new_item: Slot<PreNewFn>,
    post_new_item: Slot<PostNewFn>,
    update_progress: Slot<ProgressFn>,
    reset_timer: Slot<NotifyFn>,
    pause_timer: Slot<NotifyFn>,
    resume_timer: Slot<NotifyFn>,
}

static PROGRESS_SINK_VTBL: IFileOperationProgressSinkVtbl = IFileOperationProgressSinkVtbl {
    base: unknown_vtbl::<ProgressSinkCallbacks>(),
    start_operations: thunks::start_operations,
    finish_operations: thunks::finish_operations,
    pre_rename_item: thunks::pre_rename_item,
    post_rename_item: thunks::post_rename_item,
    pre_move_item: thunks::pre_move_item,
    post_move_item: thunks::post_move_item,
    pre_copy_item: thunks::pre_copy_item,
    post_copy_item: thunks::post_copy_item,
    pre_delete_item: thunks::pre_delete_item,
    post_delete_item: thunks::post_delete_item,
    pre_new_item: thunks::pre_new_item,
    post_new_item: thunks::post_new_item,
    update_progress: thunks::update_progress,
    reset_timer: thunks::reset_timer,
    pause_timer: thunks::pause_timer,
    resume_timer: thunks::resume_timer,
};

unsafe impl Produced for ProgressSinkCallbacks {
    type Iface = IFileOperationProgressSink;

    fn vtbl() -> &'static IFileOperationProgressSinkVtbl {
        &PROGRESS_SINK_VTBL
    }
}

mod thunks {
    use super::*;

    unsafe fn cb<'a>(this: *mut c_void) -> &'a ProgressSinkCallbacks {
        unsafe { &ComObject::<ProgressSinkCallbacks>::from_this(this).inner }
    }

    unsafe fn item(p: *mut c_void) -> Option<std::mem::ManuallyDrop<IShellItem>> {
        unsafe { borrow_raw::<IShellItem>(p) }
    }

    pub(super) unsafe extern "system" fn start_operations(this: *mut c_void) -> HRESULT {
        unsafe { cb(this) }.start_operations.call(|f| f())
    }

    pub(super) unsafe extern "system" fn finish_operations(this: *mut c_void, result: HRESULT) -> HRESULT {
        unsafe { cb(this) }.finish_operations.call(|f| f(result))
    }

    pub(super) unsafe extern "system" fn pre_rename_item(this: *mut c_void, flags: TSF, it: *mut c_void, name: PCWSTR) -> HRESULT {
        unsafe {
            let (it, name) = (item(it), from_wide_ptr(name));
            cb(this).pre_rename_item.call(|f| f(flags, it.as_deref(), &name))
        }
    }

    pub(super) unsafe extern "system" fn post_rename_item(
        this: *mut c_void, flags: TSF, it: *mut c_void, name: PCWSTR, result: HRESULT, new_item: *mut c_void,
    ) -> HRESULT {
        unsafe {
            let (it, name, new_item) = (item(it), from_wide_ptr(name), item(new_item));
            cb(this).post_rename_item.call(|f| f(flags, it.as_deref(), &name, result, new_item.as_deref()))
        }
    }

    pub(super) unsafe extern "system" fn pre_move_item(
        this: *mut c_void, flags: TSF, it: *mut c_void, dest: *mut c_void, name: PCWSTR,
    ) -> HRESULT {
        unsafe {
            let (it, dest, name) = (item(it), item(dest), from_wide_ptr(name));
            cb(this).pre_move_item.call(|f| f(flags, it.as_deref(), dest.as_deref(), &name))
        }
    }

    pub(super) unsafe extern "system" fn post_move_item(
        this: *mut c_void, flags: TSF, it: *mut c_void, dest: *mut c_void, name: PCWSTR, result: HRESULT, new_item: *mut c_void,
    ) -> HRESULT {
        unsafe {
            let (it, dest, name, new_item) = (item(it), item(dest), from_wide_ptr(name), item(new_item));
            cb(this)
                .post_move_item
                .call(|f| f(flags, it.as_deref(), dest.as_deref(), &name, result, new_item.as_deref()))
        }
    }

    pub(super) unsafe extern "system" fn pre_copy_item(
        this: *mut c_void, flags: TSF, it: *mut c_void, dest: *mut c_void, name: PCWSTR,
    ) -> HRESULT {
        unsafe {
            let (it, dest, name) = (item(it), item(dest), from_wide_ptr(name));
            cb(this).pre_copy_item.call(|f| f(flags, it.as_deref(), dest.as_deref(), &name))
        }
    }

    pub(super) unsafe extern "system" fn post_copy_item(
        this: *mut c_void, flags: TSF, it: *mut c_void, dest: *mut c_void, name: PCWSTR, result: HRESULT, new_item: *mut c_void,
    ) -> HRESULT {
        unsafe {
            let (it, dest, name, new_item) = (item(it), item(dest), from_wide_ptr(name), item(new_item));
            cb(this)
                .post_copy_item
                .call(|f| f(flags, it.as_deref(), dest.as_deref(), &name, result, new_item.as_deref()))
        }
    }

    pub(super) unsafe extern "system" fn pre_delete_item(this: *mut c_void, flags: TSF, it: *mut c_void) -> HRESULT {
        unsafe {
            let it = item(it);
            cb(this).pre_delete_item.call(|f| f(flags, it.as_deref()))
        }
    }

    pub(super) unsafe extern "system" fn post_delete_item(
        this: *mut c_void, flags: TSF, it: *mut c_void, result: HRESULT, new_item: *mut c_void,
    ) -> HRESULT {
        unsafe {
            let (it, new_item) = (item(it), item(new_item));
            cb(this).post_delete_item.call(|f| f(flags, it.as_deref(), result, new_item.as_deref()))
        }
    }

    pub(super) unsafe extern "system" fn pre_new_item(this: *mut c_void, flags: TSF, dest: *mut c_void, name: PCWSTR) -> HRESULT {
        unsafe {
            let (dest, name) = (item(dest), from_wide_ptr(name));
            cb(this).pre_new_item.call(|f| f(flags, dest.as_deref(), &name))
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) unsafe extern "system" fn post_new_item(
        this: *mut c_void, flags: TSF, dest: *mut c_void, name: PCWSTR, template: PCWSTR, attributes: u32, result: HRESULT,
        new_item: *mut c_void,
    ) -> HRESULT {
        unsafe {
            let (dest, name, template, new_item) = (item(dest), from_wide_ptr(name), from_wide_ptr(template), item(new_item));
            cb(this)
                .post_new_item
                .call(|f| f(flags, dest.as_deref(), &name, &template, attributes, result, new_item.as_deref()))
        }
    }

    pub(super) unsafe extern "system" fn update_progress(this: *mut c_void, total: u32, so_far: u32) -> HRESULT {
        unsafe { cb(this) }.update_progress.call(|f| f(total, so_far))
    }

    pub(super) unsafe extern "system" fn reset_timer(this: *mut c_void) -> HRESULT {
        unsafe { cb(this) }.reset_timer.call(|f| f())
    }

    pub(super) unsafe extern "system" fn pause_timer(this: *mut c_void) -> HRESULT {
        unsafe { cb(this) }.pause_timer.call(|f| f())
    }

    pub(super) unsafe extern "system" fn resume_timer(this: *mut c_void) -> HRESULT {
        unsafe { cb(this) }.resume_timer.call(|f| f())
    }
}

/// A progress sink implemented by closures. Unhandled notifications answer
/// `S_OK`; a failing handler result is returned to the file operation, which
/// cancels it.
#[derive(Clone, Debug)]
pub struct FileOperationProgressSink(IFileOperationProgressSink);

impl Default for FileOperationProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOperationProgressSink {
    pub fn new() -> Self {
        Self(ComObject::create(ProgressSinkCallbacks {
            start_operations: Slot::new(),
            finish_operations: Slot::new(),
            pre_rename_item: Slot::new(),
            post_rename_item: Slot::new(),
            pre_move_item: Slot::new(),
            post_move_item: Slot::new(),
            pre_copy_item: Slot::new(),
            post_copy_item: Slot::new(),
            pre_delete_item: Slot::new(),
            post_delete_item: Slot::new(),
            pre_new_item: Slot::new(),
            post_new_item: Slot::new(),
            update_progress: Slot::new(),
            reset_timer: Slot::new(),
            pause_timer: Slot::new(),
            resume_timer: Slot::new(),
        }))
    }

    fn cb(&self) -> &ProgressSinkCallbacks {
        ComObject::<ProgressSinkCallbacks>::inner_of(&self.0)
    }

    pub fn on_start_operations(&self, f: impl FnMut() -> HRESULT + 'static) -> &Self {
        self.cb().start_operations.set(Box::new(f));
        self
    }

    pub fn on_finish_operations(&self, f: impl FnMut(HRESULT) -> HRESULT + 'static) -> &Self {
        self.cb().finish_operations.set(Box::new(f));
        self
    }

    pub fn on_pre_rename_item(&self, f: impl FnMut(TSF, Item, &str) -> HRESULT + 'static) -> &Self {
        self.cb().pre_rename_item.set(Box::new(f));
        self
    }

    pub fn on_post_rename_item(&self, f: impl FnMut(TSF, Item, &str, HRESULT, Item) -> HRESULT + 'static) -> &Self {
        self.cb().post_rename_item.set(Box::new(f));
        self
    }

    pub fn on_pre_move_item(&self, f: impl FnMut(TSF, Item, Item, &str) -> HRESULT + 'static) -> &Self {
        self.cb().pre_move_item.set(Box::new(f));
        self
    }

    pub fn on_post_move_item(&self, f: impl FnMut(TSF, Item, Item, &str, HRESULT, Item) -> HRESULT + 'static) -> &Self {
        self.cb().post_move_item.set(Box::new(f));
        self
    }

    pub fn on_pre_copy_item(&self, f: impl FnMut(TSF, Item, Item, &str) -> HRESULT + 'static) -> &Self {
        self.cb().pre_copy_item.set(Box::new(f));
        self
    }

    pub fn on_post_copy_item(&self, f: impl FnMut(TSF, Item, Item, &str, HRESULT, Item) -> HRESULT + 'static) -> &Self {
        self.cb().post_copy_item.set(Box::new(f));
        self
    }

    pub fn on_pre_delete_item(&self, f: impl FnMut(TSF, Item) -> HRESULT + 'static) -> &Self {
        self.cb().pre_delete_item.set(Box::new(f));
        self
    }

    pub fn on_post_delete_item(&self, f: impl FnMut(TSF, Item, HRESULT, Item) -> HRESULT + 'static) -> &Self {
        self.cb().post_delete_item.set(Box::new(f));
        self
    }

    pub fn on_pre_new_item(&self, f: impl FnMut(TSF, Item, &str) -> HRESULT + 'static) -> &Self {
        self.cb().pre_new_item.set(Box::new(f));
        self
    }

    pub fn on_post_new_item(&self, f: impl FnMut(TSF, Item, &str, &str, u32, HRESULT, Item) -> HRESULT + 'static) -> &Self {
        self.cb().post_new_item.set(Box::new(f));
        self
    }

    pub fn on_update_progress(&self, f: impl FnMut(u32, u32) -> HRESULT + 'static) -> &Self {
        self.cb().update_progress.set(Box::new(f));
        self
    }

    pub fn on_reset_timer(&self, f: impl FnMut() -> HRESULT + 'static) -> &Self {
        self.cb().reset_timer.set(Box::new(f));
        self
    }

    pub fn on_pause_timer(&self, f: impl FnMut() -> HRESULT + 'static) -> &Self {
        self.cb().pause_timer.set(Box::new(f));
        self
    }

    pub fn on_resume_timer(&self, f: impl FnMut() -> HRESULT + 'static) -> &Self {
        self.cb().resume_timer.set(Box::new(f));
        self
    }

    pub fn as_interface(&self) -> &IFileOperationProgressSink {
        &self.0
    }

    pub fn into_interface(self) -> IFileOperationProgressSink {
        self.0
    }
}

impl Deref for FileOperationProgressSink {
    type Target = IFileOperationProgressSink;

    fn deref(&self) -> &IFileOperationProgressSink {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::co::{TSF_COPY_CREATION_TIME, TSF_NORMAL};
    use crate::com::shell_item::fake::folder;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_unhandled_notifications_succeed() {
        let sink = FileOperationProgressSink::new();
        let item = folder(1);
        assert_eq!(sink.start_operations(), Ok(()));
        assert_eq!(sink.pre_delete_item(TSF_NORMAL, Some(&item)), Ok(()));
        assert_eq!(sink.post_new_item(TSF_NORMAL, Some(&item), "a.txt", "", 0, HRESULT::S_OK, None), Ok(()));
        assert_eq!(sink.update_progress(10, 3), Ok(()));
        assert_eq!(sink.resume_timer(), Ok(()));
        assert_eq!(sink.finish_operations(HRESULT::S_OK), Ok(()));
    }

    #[test]
    fn test_notifications_reach_handlers() {
        let events = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = FileOperationProgressSink::new();

        let log = events.clone();
        sink.on_pre_copy_item(move |flags, item, dest, name| {
            log.borrow_mut().push(format!("copy {} {} {} {}", flags, item.is_some(), dest.is_some(), name));
            HRESULT::S_OK
        });
        let log = events.clone();
        sink.on_post_rename_item(move |_, _, name, result, new_item| {
            log.borrow_mut().push(format!("renamed {} {} {}", name, result.succeeded(), new_item.is_none()));
            HRESULT::S_OK
        });
        let log = events.clone();
        sink.on_update_progress(move |total, so_far| {
            log.borrow_mut().push(format!("{}/{}", so_far, total));
            HRESULT::S_OK
        });

        let (src, dest) = (folder(1), folder(2));
        sink.pre_copy_item(TSF_COPY_CREATION_TIME, Some(&src), Some(&dest), "Übersicht.docx").unwrap();
        sink.post_rename_item(TSF_NORMAL, Some(&src), "new", HRESULT::S_OK, None).unwrap();
        sink.update_progress(4, 1).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                format!("copy {} true true Übersicht.docx", TSF_COPY_CREATION_TIME),
                "renamed new true true".to_string(),
                "1/4".to_string(),
            ]
        );
    }

    #[test]
    fn test_handler_can_cancel() {
        let sink = FileOperationProgressSink::new();
        sink.on_pre_delete_item(|_, _| HRESULT::E_ABORT);
        assert_eq!(sink.pre_delete_item(TSF_NORMAL, None), Err(HRESULT::E_ABORT));
        assert_eq!(sink.post_delete_item(TSF_NORMAL, None, HRESULT::E_ABORT, None), Ok(()));
    }
}
