//! Taskbar buttons: tabs, progress, overlay icons and thumbnails.

use super::vtbl::{ITaskbarList2Vtbl, ITaskbarList3Vtbl, ITaskbarListVtbl};
use super::{com_interface, ComInterface};
use crate::co::{TBPFLAG, TBPF_ERROR, TBPF_INDETERMINATE, TBPF_NOPROGRESS, TBPF_NORMAL, TBPF_PAUSED};
use crate::error::HrResult;
use crate::guid::GUID;
use crate::types::{FALSE, HICON, HWND, RECT, TRUE};
use crate::utils::{opt_ptr, to_wstring_opt};

pub const CLSID_TASKBAR_LIST: GUID = GUID::parse_const("56FDF344-FD6D-11d0-958A-006097C9A090");

com_interface! {
    ITaskbarList, ITaskbarListVtbl, "56FDF342-FD6D-11d0-958A-006097C9A090"
}

com_interface! {
    ITaskbarList2: ITaskbarList, ITaskbarList2Vtbl, "602D4995-B13A-429b-A66E-1935E44F4317"
}

com_interface! {
    ITaskbarList3: ITaskbarList2, ITaskbarList3Vtbl, "ea1afb91-9e28-4b86-90e9-9e9f8a5eefaf"
}

impl ITaskbarList {
    /// Must be called once before any other method.
    pub fn hr_init(&self) -> HrResult<()> {
        unsafe { (self.vt().hr_init)(self.as_raw()) }.ok()
    }

    pub fn add_tab(&self, hwnd: HWND) -> HrResult<()> {
        unsafe { (self.vt().add_tab)(self.as_raw(), hwnd) }.ok()
    }

    pub fn delete_tab(&self, hwnd: HWND) -> HrResult<()> {
        unsafe { (self.vt().delete_tab)(self.as_raw(), hwnd) }.ok()
    }

    pub fn activate_tab(&self, hwnd: HWND) -> HrResult<()> {
        unsafe { (self.vt().activate_tab)(self.as_raw(), hwnd) }.ok()
    }

    pub fn set_active_alt(&self, hwnd: HWND) -> HrResult<()> {
        unsafe { (self.vt().set_active_alt)(self.as_raw(), hwnd) }.ok()
    }
}

impl ITaskbarList2 {
    pub fn mark_fullscreen_window(&self, hwnd: HWND, fullscreen: bool) -> HrResult<()> {
        unsafe { (self.vt().mark_fullscreen_window)(self.as_raw(), hwnd, if fullscreen { TRUE } else { FALSE }) }.ok()
    }
}

impl ITaskbarList3 {
    #[cfg(windows)]
    pub fn new() -> HrResult<Self> {
        let list: Self = super::init::co_create_instance(&CLSID_TASKBAR_LIST, crate::co::CLSCTX_INPROC_SERVER)?;
        list.hr_init()?;
        Ok(list)
    }

    pub fn set_progress_value(&self, hwnd: HWND, completed: u64, total: u64) -> HrResult<()> {
        unsafe { (self.vt().set_progress_value)(self.as_raw(), hwnd, completed, total) }.ok()
    }

    pub fn set_progress_state(&self, hwnd: HWND, state: TBPFLAG) -> HrResult<()> {
        unsafe { (self.vt().set_progress_state)(self.as_raw(), hwnd, state) }.ok()
    }

    pub fn register_tab(&self, tab: HWND, mdi: HWND) -> HrResult<()> {
        unsafe { (self.vt().register_tab)(self.as_raw(), tab, mdi) }.ok()
    }

    pub fn unregister_tab(&self, tab: HWND) -> HrResult<()> {
        unsafe { (self.vt().unregister_tab)(self.as_raw(), tab) }.ok()
    }

    /// A null icon removes the overlay.
    pub fn set_overlay_icon(&self, hwnd: HWND, icon: HICON, description: Option<&str>) -> HrResult<()> {
        let text = to_wstring_opt(description);
        unsafe { (self.vt().set_overlay_icon)(self.as_raw(), hwnd, icon, opt_ptr(&text)) }.ok()
    }

    pub fn set_thumbnail_tooltip(&self, hwnd: HWND, tip: Option<&str>) -> HrResult<()> {
        let text = to_wstring_opt(tip);
        unsafe { (self.vt().set_thumbnail_tooltip)(self.as_raw(), hwnd, opt_ptr(&text)) }.ok()
    }

    /// Client-area part shown as the thumbnail; `None` shows the whole window.
    pub fn set_thumbnail_clip(&self, hwnd: HWND, clip: Option<&RECT>) -> HrResult<()> {
        let clip = clip.map_or(std::ptr::null(), |r| r as *const RECT);
        unsafe { (self.vt().set_thumbnail_clip)(self.as_raw(), hwnd, clip) }.ok()
    }
}

/// Groups this process's windows under `app_id` on the taskbar. Must run
/// before the first window is shown.
#[cfg(windows)]
pub fn set_app_user_model_id(app_id: &str) -> HrResult<()> {
    let set = crate::dynamic_import::WinApi::get()
        .SetCurrentProcessExplicitAppUserModelID
        .ok_or(crate::co::HRESULT::E_NOTIMPL)?;
    let id = crate::utils::to_wstring(app_id);
    unsafe { set(id.as_ptr()) }.ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskbarState {
    NoProgress,
    Indeterminate,
    Normal,
    Error,
    Paused,
}

impl TaskbarState {
    pub fn flags(self) -> TBPFLAG {
        match self {
            TaskbarState::NoProgress => TBPF_NOPROGRESS,
            TaskbarState::Indeterminate => TBPF_INDETERMINATE,
            TaskbarState::Normal => TBPF_NORMAL,
            TaskbarState::Error => TBPF_ERROR,
            TaskbarState::Paused => TBPF_PAUSED,
        }
    }
}

/// Progress on one window's taskbar button. Built through [`with_list`]
/// with `None` (e.g. the shell is not running), every call is a no-op.
///
/// [`with_list`]: TaskbarProgress::with_list
#[derive(Debug)]
pub struct TaskbarProgress {
    hwnd: HWND,
    list: Option<ITaskbarList3>,
}

impl TaskbarProgress {
    /// Requires COM on this thread.
    #[cfg(windows)]
    pub fn new(hwnd: HWND) -> HrResult<Self> {
        let list = ITaskbarList3::new().inspect_err(|hr| crate::log_warn!("taskbar unavailable: {}", hr))?;
        Ok(Self { hwnd, list: Some(list) })
    }

    pub fn with_list(hwnd: HWND, list: Option<ITaskbarList3>) -> Self {
        Self { hwnd, list }
    }

    pub fn is_available(&self) -> bool {
        self.list.is_some()
    }

    pub fn set_state(&self, state: TaskbarState) -> HrResult<()> {
        match &self.list {
            Some(list) => list.set_progress_state(self.hwnd, state.flags()),
            None => Ok(()),
        }
    }

    /// `completed` is clamped to `total`.
    pub fn set_value(&self, completed: u64, total: u64) -> HrResult<()> {
        match &self.list {
            Some(list) => list.set_progress_value(self.hwnd, completed.min(total), total),
            None => Ok(()),
        }
    }

    pub fn clear(&self) -> HrResult<()> {
        self.set_state(TaskbarState::NoProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::co::HRESULT;
    use crate::com::producer::{unknown_vtbl, ComObject, Produced};
    use crate::types::{BOOL, HIMAGELIST, PCWSTR};
    use std::cell::RefCell;
    use std::ffi::c_void;

    // Records progress calls; everything else is unimplemented.
    #[derive(Default)]
    struct FakeTaskbar {
        calls: RefCell<Vec<(usize, u64, u64)>>,
    }

    type This = *mut c_void;

    unsafe fn fake<'a>(this: This) -> &'a FakeTaskbar {
        unsafe { &ComObject::<FakeTaskbar>::from_this(this).inner }
    }

    unsafe extern "system" fn no_args(_: This) -> HRESULT {
        HRESULT::S_OK
    }
    unsafe extern "system" fn one_hwnd(_: This, _: HWND) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn two_hwnds(_: This, _: HWND, _: HWND) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn fullscreen(_: This, _: HWND, _: BOOL) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn progress_value(this: This, hwnd: HWND, done: u64, total: u64) -> HRESULT {
        if total == 0 {
            return HRESULT::E_INVALIDARG;
        }
        unsafe { fake(this) }.calls.borrow_mut().push((hwnd as usize, done, total));
        HRESULT::S_OK
    }
    unsafe extern "system" fn progress_state(this: This, hwnd: HWND, state: TBPFLAG) -> HRESULT {
        if state > TBPF_PAUSED {
            return HRESULT::E_INVALIDARG;
        }
        unsafe { fake(this) }.calls.borrow_mut().push((hwnd as usize, u64::MAX, state as u64));
        HRESULT::S_OK
    }
    unsafe extern "system" fn tab_active(_: This, _: HWND, _: HWND, _: u32) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn thumb_buttons(_: This, _: HWND, _: u32, _: *const c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn image_list(_: This, _: HWND, _: HIMAGELIST) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn overlay(_: This, _: HWND, _: HICON, _: PCWSTR) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn tooltip(_: This, _: HWND, _: PCWSTR) -> HRESULT {
        HRESULT::E_NOTIMPL
    }
    unsafe extern "system" fn clip(_: This, _: HWND, _: *const RECT) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    static TASKBAR_VTBL: ITaskbarList3Vtbl = ITaskbarList3Vtbl {
        base: ITaskbarList2Vtbl {
            base: ITaskbarListVtbl {
                base: unknown_vtbl::<FakeTaskbar>(),
                hr_init: no_args,
                add_tab: one_hwnd,
                delete_tab: one_hwnd,
                activate_tab: one_hwnd,
                set_active_alt: one_hwnd,
            },
            mark_fullscreen_window: fullscreen,
        },
        set_progress_value: progress_value,
        set_progress_state: progress_state,
        register_tab: two_hwnds,
        unregister_tab: one_hwnd,
        set_tab_order: two_hwnds,
        set_tab_active: tab_active,
        thumb_bar_add_buttons: thumb_buttons,
        thumb_bar_update_buttons: thumb_buttons,
        thumb_bar_set_image_list: image_list,
        set_overlay_icon: overlay,
        set_thumbnail_tooltip: tooltip,
        set_thumbnail_clip: clip,
    };

    unsafe impl Produced for FakeTaskbar {
        type Iface = ITaskbarList3;

        fn vtbl() -> &'static ITaskbarList3Vtbl {
            &TASKBAR_VTBL
        }
    }

    #[test]
    fn test_progress_reaches_taskbar() {
        let list: ITaskbarList3 = ComObject::create(FakeTaskbar::default());
        let hwnd = 0x1234usize as HWND;
        let progress = TaskbarProgress::with_list(hwnd, Some(list.clone()));
        assert!(progress.is_available());

        assert_eq!(progress.set_state(TaskbarState::Normal), Ok(()));
        assert_eq!(progress.set_value(150, 100), Ok(()));
        assert_eq!(progress.clear(), Ok(()));

        let calls = ComObject::<FakeTaskbar>::inner_of(&list).calls.borrow().clone();
        assert_eq!(
            calls,
            vec![
                (0x1234, u64::MAX, TBPF_NORMAL as u64),
                (0x1234, 100, 100),
                (0x1234, u64::MAX, TBPF_NOPROGRESS as u64),
            ]
        );
    }

    #[test]
    fn test_base_interfaces_through_deref() {
        let list: ITaskbarList3 = ComObject::create(FakeTaskbar::default());
        assert_eq!(list.hr_init(), Ok(()));
        assert_eq!(list.add_tab(std::ptr::null_mut()), Err(HRESULT::E_NOTIMPL));
        assert_eq!(list.mark_fullscreen_window(std::ptr::null_mut(), true), Err(HRESULT::E_NOTIMPL));
        assert_eq!(list.set_progress_state(std::ptr::null_mut(), 0x40), Err(HRESULT::E_INVALIDARG));
    }

    #[test]
    fn test_missing_taskbar_is_silent() {
        let progress = TaskbarProgress::with_list(std::ptr::null_mut(), None);
        assert!(!progress.is_available());
        assert_eq!(progress.set_state(TaskbarState::Error), Ok(()));
        assert_eq!(progress.set_value(1, 2), Ok(()));
    }

    #[test]
    fn test_progress_failure_reaches_caller() {
        let list: ITaskbarList3 = ComObject::create(FakeTaskbar::default());
        let progress = TaskbarProgress::with_list(std::ptr::null_mut(), Some(list.clone()));
        assert_eq!(progress.set_value(0, 0), Err(HRESULT::E_INVALIDARG));
        assert!(ComObject::<FakeTaskbar>::inner_of(&list).calls.borrow().is_empty());
    }

    #[test]
    fn test_state_flags() {
        assert_eq!(TaskbarState::Indeterminate.flags(), 0x1);
        assert_eq!(TaskbarState::Paused.flags(), 0x8);
    }
}
