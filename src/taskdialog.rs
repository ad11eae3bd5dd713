//! `TASKDIALOGCONFIG` serialization and `TaskDialogIndirect`.
//!
//! The native struct is declared with `#pragma pack(1)`, so a `#[repr(C)]`
//! mirror would get the padding wrong. The config is written field by field
//! into a byte buffer instead, at offsets derived from the pointer width.

#![allow(non_camel_case_types)]

use std::ffi::c_void;

use crate::types::{HICON, HINSTANCE, HWND};
use crate::utils::to_wstring;

pub type TDF = u32;
pub const TDF_ENABLE_HYPERLINKS: TDF = 0x0001;
pub const TDF_USE_HICON_MAIN: TDF = 0x0002;
pub const TDF_USE_HICON_FOOTER: TDF = 0x0004;
pub const TDF_ALLOW_DIALOG_CANCELLATION: TDF = 0x0008;
pub const TDF_USE_COMMAND_LINKS: TDF = 0x0010;
pub const TDF_USE_COMMAND_LINKS_NO_ICON: TDF = 0x0020;
pub const TDF_EXPAND_FOOTER_AREA: TDF = 0x0040;
pub const TDF_EXPANDED_BY_DEFAULT: TDF = 0x0080;
pub const TDF_VERIFICATION_FLAG_CHECKED: TDF = 0x0100;
pub const TDF_SHOW_PROGRESS_BAR: TDF = 0x0200;
pub const TDF_SHOW_MARQUEE_PROGRESS_BAR: TDF = 0x0400;
pub const TDF_CALLBACK_TIMER: TDF = 0x0800;
pub const TDF_POSITION_RELATIVE_TO_WINDOW: TDF = 0x1000;
pub const TDF_RTL_LAYOUT: TDF = 0x2000;
pub const TDF_NO_DEFAULT_RADIO_BUTTON: TDF = 0x4000;
pub const TDF_CAN_BE_MINIMIZED: TDF = 0x8000;
pub const TDF_SIZE_TO_CONTENT: TDF = 0x0100_0000;

pub type TDCBF = u32;
pub const TDCBF_OK_BUTTON: TDCBF = 0x0001;
pub const TDCBF_YES_BUTTON: TDCBF = 0x0002;
pub const TDCBF_NO_BUTTON: TDCBF = 0x0004;
pub const TDCBF_CANCEL_BUTTON: TDCBF = 0x0008;
pub const TDCBF_RETRY_BUTTON: TDCBF = 0x0010;
pub const TDCBF_CLOSE_BUTTON: TDCBF = 0x0020;

// Button ids reported for the common buttons.
pub const IDOK: i32 = 1;
pub const IDCANCEL: i32 = 2;
pub const IDRETRY: i32 = 4;
pub const IDYES: i32 = 6;
pub const IDNO: i32 = 7;
pub const IDCLOSE: i32 = 8;

/// Stock task dialog icons (`TD_*_ICON`, i.e. `MAKEINTRESOURCEW(-1..-4)`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TdIcon {
    Warning,
    Error,
    Information,
    Shield,
}

impl TdIcon {
    pub const fn id(self) -> u16 {
        match self {
            TdIcon::Warning => 0xFFFF,
            TdIcon::Error => 0xFFFE,
            TdIcon::Information => 0xFFFD,
            TdIcon::Shield => 0xFFFC,
        }
    }
}

/// The main or footer icon: natively a union of `HICON` and a resource
/// pointer, told apart by a `TDF_USE_HICON_*` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TdcIcon {
    #[default]
    None,
    Hicon(HICON),
    /// Icon resource ordinal in `hinstance`.
    Id(u16),
    Td(TdIcon),
}

impl TdcIcon {
    fn raw(self) -> usize {
        match self {
            TdcIcon::None => 0,
            TdcIcon::Hicon(h) => h as usize,
            TdcIcon::Id(id) => id as usize,
            TdcIcon::Td(icon) => icon.id() as usize,
        }
    }

    fn is_handle(self) -> bool {
        matches!(self, TdcIcon::Hicon(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskDialogButton {
    pub id: i32,
    pub text: String,
}

impl TaskDialogButton {
    pub fn new(id: i32, text: impl Into<String>) -> Self {
        Self { id, text: text.into() }
    }
}

/// Everything `TaskDialogIndirect` shows. The notification callback is not
/// supported; `pfCallback` is always null.
#[derive(Clone, Debug)]
pub struct TaskDialogConfig {
    pub hwnd_parent: HWND,
    pub hinstance: HINSTANCE,
    pub flags: TDF,
    pub common_buttons: TDCBF,
    pub window_title: Option<String>,
    pub main_icon: TdcIcon,
    pub main_instruction: Option<String>,
    pub content: Option<String>,
    pub buttons: Vec<TaskDialogButton>,
    pub default_button: i32,
    pub radio_buttons: Vec<TaskDialogButton>,
    pub default_radio_button: i32,
    pub verification_text: Option<String>,
    pub expanded_information: Option<String>,
    pub expanded_control_text: Option<String>,
    pub collapsed_control_text: Option<String>,
    pub footer_icon: TdcIcon,
    pub footer: Option<String>,
    /// Dialog units; zero lets the dialog pick.
    pub width: u32,
}

impl Default for TaskDialogConfig {
    fn default() -> Self {
        Self {
            hwnd_parent: std::ptr::null_mut(),
            hinstance: std::ptr::null_mut(),
            flags: 0,
            common_buttons: 0,
            window_title: None,
            main_icon: TdcIcon::None,
            main_instruction: None,
            content: None,
            buttons: Vec::new(),
            default_button: 0,
            radio_buttons: Vec::new(),
            default_radio_button: 0,
            verification_text: None,
            expanded_information: None,
            expanded_control_text: None,
            collapsed_control_text: None,
            footer_icon: TdcIcon::None,
            footer: None,
            width: 0,
        }
    }
}

/// Fields of `TASKDIALOGCONFIG`, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    CbSize,
    HwndParent,
    HInstance,
    DwFlags,
    DwCommonButtons,
    PszWindowTitle,
    MainIcon,
    PszMainInstruction,
    PszContent,
    CButtons,
    PButtons,
    NDefaultButton,
    CRadioButtons,
    PRadioButtons,
    NDefaultRadioButton,
    PszVerificationText,
    PszExpandedInformation,
    PszExpandedControlText,
    PszCollapsedControlText,
    FooterIcon,
    PszFooter,
    PfCallback,
    LpCallbackData,
    CxWidth,
}

// (field, pointer-sized)
const FIELDS: [(Field, bool); 24] = [
    (Field::CbSize, false),
    (Field::HwndParent, true),
    (Field::HInstance, true),
    (Field::DwFlags, false),
    (Field::DwCommonButtons, false),
    (Field::PszWindowTitle, true),
    (Field::MainIcon, true),
    (Field::PszMainInstruction, true),
    (Field::PszContent, true),
    (Field::CButtons, false),
    (Field::PButtons, true),
    (Field::NDefaultButton, false),
    (Field::CRadioButtons, false),
    (Field::PRadioButtons, true),
    (Field::NDefaultRadioButton, false),
    (Field::PszVerificationText, true),
    (Field::PszExpandedInformation, true),
    (Field::PszExpandedControlText, true),
    (Field::PszCollapsedControlText, true),
    (Field::FooterIcon, true),
    (Field::PszFooter, true),
    (Field::PfCallback, true),
    (Field::LpCallbackData, true),
    (Field::CxWidth, false),
];

/// Packed layout for one pointer width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    ptr: usize,
}

impl Layout {
    pub const NATIVE: Layout = Layout { ptr: std::mem::size_of::<usize>() };
    pub const X64: Layout = Layout { ptr: 8 };
    pub const X86: Layout = Layout { ptr: 4 };

    const fn width(self, pointer: bool) -> usize {
        if pointer { self.ptr } else { 4 }
    }

    pub const fn offset(self, field: Field) -> usize {
        let mut off = 0;
        let mut i = 0;
        while i < FIELDS.len() {
            if FIELDS[i].0 as u8 == field as u8 {
                return off;
            }
            off += self.width(FIELDS[i].1);
            i += 1;
        }
        off
    }

    /// `sizeof(TASKDIALOGCONFIG)`.
    pub const fn size(self) -> usize {
        self.offset(Field::CxWidth) + 4
    }

    /// `sizeof(TASKDIALOG_BUTTON)`, also packed.
    pub const fn button_size(self) -> usize {
        4 + self.ptr
    }

    fn put_u32(self, buf: &mut [u8], field: Field, value: u32) {
        let off = self.offset(field);
        buf[off..off + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn put_ptr(self, buf: &mut [u8], field: Field, value: usize) {
        self.put_ptr_at(buf, self.offset(field), value);
    }

    fn put_ptr_at(self, buf: &mut [u8], off: usize, value: usize) {
        let bytes = (value as u64).to_le_bytes();
        buf[off..off + self.ptr].copy_from_slice(&bytes[..self.ptr]);
    }
}

/// A config rendered to native bytes, together with the strings and button
/// arrays its pointers refer to.
#[derive(Debug)]
pub struct SerializedTaskDialog {
    bytes: Vec<u8>,
    _strings: Vec<Vec<u16>>,
    _buttons: Vec<u8>,
    _radio_buttons: Vec<u8>,
}

impl SerializedTaskDialog {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_ptr(&self) -> *const c_void {
        self.bytes.as_ptr() as *const c_void
    }
}

struct StringPool(Vec<Vec<u16>>);

impl StringPool {
    // Heap buffers do not move when the pool grows.
    fn ptr(&mut self, s: Option<&str>) -> usize {
        match s {
            Some(s) => {
                let w = to_wstring(s);
                let p = w.as_ptr() as usize;
                self.0.push(w);
                p
            }
            None => 0,
        }
    }
}

fn button_array(layout: Layout, buttons: &[TaskDialogButton], pool: &mut StringPool) -> Vec<u8> {
    let size = layout.button_size();
    let mut out = vec![0u8; buttons.len() * size];
    for (i, button) in buttons.iter().enumerate() {
        let off = i * size;
        out[off..off + 4].copy_from_slice(&button.id.to_le_bytes());
        layout.put_ptr_at(&mut out, off + 4, pool.ptr(Some(&button.text)));
    }
    out
}

fn array_ptr(bytes: &[u8]) -> usize {
    if bytes.is_empty() { 0 } else { bytes.as_ptr() as usize }
}

impl TaskDialogConfig {
    /// Renders the config for the running process.
    pub fn serialize(&self) -> SerializedTaskDialog {
        self.serialize_for(Layout::NATIVE)
    }

    /// Renders the config with `layout`. Only [`Layout::NATIVE`] output can be
    /// passed to the OS.
    pub fn serialize_for(&self, layout: Layout) -> SerializedTaskDialog {
        let mut pool = StringPool(Vec::new());
        let buttons = button_array(layout, &self.buttons, &mut pool);
        let radio_buttons = button_array(layout, &self.radio_buttons, &mut pool);

        let mut flags = self.flags & !(TDF_USE_HICON_MAIN | TDF_USE_HICON_FOOTER);
        if self.main_icon.is_handle() {
            flags |= TDF_USE_HICON_MAIN;
        }
        if self.footer_icon.is_handle() {
            flags |= TDF_USE_HICON_FOOTER;
        }

        let mut b = vec![0u8; layout.size()];
        let l = layout;
        l.put_u32(&mut b, Field::CbSize, layout.size() as u32);
        l.put_ptr(&mut b, Field::HwndParent, self.hwnd_parent as usize);
        l.put_ptr(&mut b, Field::HInstance, self.hinstance as usize);
        l.put_u32(&mut b, Field::DwFlags, flags);
        l.put_u32(&mut b, Field::DwCommonButtons, self.common_buttons);
        l.put_ptr(&mut b, Field::PszWindowTitle, pool.ptr(self.window_title.as_deref()));
        l.put_ptr(&mut b, Field::MainIcon, self.main_icon.raw());
        l.put_ptr(&mut b, Field::PszMainInstruction, pool.ptr(self.main_instruction.as_deref()));
        l.put_ptr(&mut b, Field::PszContent, pool.ptr(self.content.as_deref()));
        l.put_u32(&mut b, Field::CButtons, self.buttons.len() as u32);
        l.put_ptr(&mut b, Field::PButtons, array_ptr(&buttons));
        l.put_u32(&mut b, Field::NDefaultButton, self.default_button as u32);
        l.put_u32(&mut b, Field::CRadioButtons, self.radio_buttons.len() as u32);
        l.put_ptr(&mut b, Field::PRadioButtons, array_ptr(&radio_buttons));
        l.put_u32(&mut b, Field::NDefaultRadioButton, self.default_radio_button as u32);
        l.put_ptr(&mut b, Field::PszVerificationText, pool.ptr(self.verification_text.as_deref()));
        l.put_ptr(&mut b, Field::PszExpandedInformation, pool.ptr(self.expanded_information.as_deref()));
        l.put_ptr(&mut b, Field::PszExpandedControlText, pool.ptr(self.expanded_control_text.as_deref()));
        l.put_ptr(&mut b, Field::PszCollapsedControlText, pool.ptr(self.collapsed_control_text.as_deref()));
        l.put_ptr(&mut b, Field::FooterIcon, self.footer_icon.raw());
        l.put_ptr(&mut b, Field::PszFooter, pool.ptr(self.footer.as_deref()));
        l.put_ptr(&mut b, Field::PfCallback, 0);
        l.put_ptr(&mut b, Field::LpCallbackData, 0);
        l.put_u32(&mut b, Field::CxWidth, self.width);

        SerializedTaskDialog { bytes: b, _strings: pool.0, _buttons: buttons, _radio_buttons: radio_buttons }
    }
}

/// What the user chose in a task dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskDialogResult {
    /// Button id, or one of the `ID*` common button ids.
    pub button: i32,
    pub radio_button: i32,
    pub verification_checked: bool,
}

/// Shows a task dialog and waits for it to close.
///
/// Fails with `E_NOTIMPL` when comctl32 v6 is not loaded (the application
/// has no common-controls manifest).
#[cfg(windows)]
pub fn task_dialog_indirect(config: &TaskDialogConfig) -> crate::error::HrResult<TaskDialogResult> {
    use crate::co::HRESULT;
    use crate::types::FALSE;

    let show = crate::dynamic_import::WinApi::get().TaskDialogIndirect.ok_or(HRESULT::E_NOTIMPL)?;
    let native = config.serialize();
    let (mut button, mut radio, mut checked) = (0, 0, FALSE);
    let hr = unsafe { show(native.as_ptr(), &mut button, &mut radio, &mut checked) };
    if let Err(hr) = hr.ok() {
        crate::log_error!("TaskDialogIndirect failed: {}", hr);
        return Err(hr);
    }
    Ok(TaskDialogResult { button, radio_button: radio, verification_checked: checked != FALSE })
}
