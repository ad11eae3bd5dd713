//! Common item dialogs (`IFileOpenDialog`).

use super::vtbl::{IFileDialogVtbl, IFileOpenDialogVtbl, IModalWindowVtbl};
use super::{com_interface, out_interface, take_task_string, ComInterface, IShellItem, IShellItemArray, IShellItemFilter};
use crate::co::{FDAP, FOS, HRESULT};
use crate::error::HrResult;
use crate::guid::GUID;
use crate::types::{COMDLG_FILTERSPEC, HWND};
use crate::utils::to_wstring;

pub const CLSID_FILE_OPEN_DIALOG: GUID = GUID::parse_const("DC1C5A9C-E88A-4dde-A5A1-60F82A20AEF7");

com_interface! {
    IModalWindow, IModalWindowVtbl, "b4db1657-70d7-485e-8e3e-6fcb5a5c1802"
}

com_interface! {
    IFileDialog: IModalWindow, IFileDialogVtbl, "42f85136-db7e-439c-85f1-e4075d135fc8"
}

com_interface! {
    /// The open dialog; also picks folders with `FOS_PICKFOLDERS`.
    IFileOpenDialog: IFileDialog, IFileOpenDialogVtbl, "d57c7288-d4ad-4768-be02-9d969532d960"
}

impl IModalWindow {
    /// Runs the modal loop. `Ok(false)` when the user cancels.
    pub fn show(&self, owner: HWND) -> HrResult<bool> {
        match unsafe { (self.vt().show)(self.as_raw(), owner) } {
            HRESULT::E_CANCELLED => Ok(false),
            hr => hr.ok().map(|_| true),
        }
    }
}

/// Filter list for [`IFileDialog::set_file_types`], e.g.
/// `[("Images", "*.png;*.jpg"), ("All files", "*.*")]`.
#[derive(Debug, Default)]
pub struct FileTypes {
    strings: Vec<(Vec<u16>, Vec<u16>)>,
}

impl FileTypes {
    pub fn new<S: AsRef<str>>(types: &[(S, S)]) -> Self {
        Self {
            strings: types.iter().map(|(name, spec)| (to_wstring(name.as_ref()), to_wstring(spec.as_ref()))).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Native entries pointing into `self`.
    fn specs(&self) -> Vec<COMDLG_FILTERSPEC> {
        self.strings
            .iter()
            .map(|(name, spec)| COMDLG_FILTERSPEC { pszName: name.as_ptr(), pszSpec: spec.as_ptr() })
            .collect()
    }
}

impl IFileDialog {
    /// Can only be called before the dialog is shown.
    pub fn set_file_types(&self, types: &FileTypes) -> HrResult<()> {
        let specs = types.specs();
        unsafe { (self.vt().set_file_types)(self.as_raw(), specs.len() as u32, specs.as_ptr()) }.ok()
    }

    /// One-based index into the file types.
    pub fn set_file_type_index(&self, index: u32) -> HrResult<()> {
        unsafe { (self.vt().set_file_type_index)(self.as_raw(), index) }.ok()
    }

    pub fn get_file_type_index(&self) -> HrResult<u32> {
        let mut index = 0;
        unsafe { (self.vt().get_file_type_index)(self.as_raw(), &mut index) }.ok()?;
        Ok(index)
    }

    pub fn set_options(&self, options: FOS) -> HrResult<()> {
        unsafe { (self.vt().set_options)(self.as_raw(), options) }.ok()
    }

    pub fn get_options(&self) -> HrResult<FOS> {
        let mut options = 0;
        unsafe { (self.vt().get_options)(self.as_raw(), &mut options) }.ok()?;
        Ok(options)
    }

    /// Adds `options` to the current set.
    pub fn add_options(&self, options: FOS) -> HrResult<()> {
        self.set_options(self.get_options()? | options)
    }

    pub fn set_default_folder(&self, folder: &IShellItem) -> HrResult<()> {
        unsafe { (self.vt().set_default_folder)(self.as_raw(), folder.as_raw()) }.ok()
    }

    pub fn set_folder(&self, folder: &IShellItem) -> HrResult<()> {
        unsafe { (self.vt().set_folder)(self.as_raw(), folder.as_raw()) }.ok()
    }

    pub fn get_folder(&self) -> HrResult<IShellItem> {
        out_interface(|out| unsafe { (self.vt().get_folder)(self.as_raw(), out) })
    }

    pub fn get_current_selection(&self) -> HrResult<IShellItem> {
        out_interface(|out| unsafe { (self.vt().get_current_selection)(self.as_raw(), out) })
    }

    pub fn set_file_name(&self, name: &str) -> HrResult<()> {
        let name = to_wstring(name);
        unsafe { (self.vt().set_file_name)(self.as_raw(), name.as_ptr()) }.ok()
    }

    pub fn get_file_name(&self) -> HrResult<String> {
        let mut name: *mut u16 = std::ptr::null_mut();
        unsafe { (self.vt().get_file_name)(self.as_raw(), &mut name) }.ok()?;
        Ok(unsafe { take_task_string(name) })
    }

    pub fn set_title(&self, title: &str) -> HrResult<()> {
        let title = to_wstring(title);
        unsafe { (self.vt().set_title)(self.as_raw(), title.as_ptr()) }.ok()
    }

    pub fn set_ok_button_label(&self, label: &str) -> HrResult<()> {
        let label = to_wstring(label);
        unsafe { (self.vt().set_ok_button_label)(self.as_raw(), label.as_ptr()) }.ok()
    }

    pub fn set_file_name_label(&self, label: &str) -> HrResult<()> {
        let label = to_wstring(label);
        unsafe { (self.vt().set_file_name_label)(self.as_raw(), label.as_ptr()) }.ok()
    }

    /// The chosen item of a single-selection dialog.
    pub fn get_result(&self) -> HrResult<IShellItem> {
        out_interface(|out| unsafe { (self.vt().get_result)(self.as_raw(), out) })
    }

    pub fn add_place(&self, item: &IShellItem, place: FDAP) -> HrResult<()> {
        unsafe { (self.vt().add_place)(self.as_raw(), item.as_raw(), place) }.ok()
    }

    /// Extension without the dot, appended when the user omits one.
    pub fn set_default_extension(&self, ext: &str) -> HrResult<()> {
        let ext = to_wstring(ext);
        unsafe { (self.vt().set_default_extension)(self.as_raw(), ext.as_ptr()) }.ok()
    }

    /// Closes a dialog that is showing; `show` then returns `result`.
    pub fn close(&self, result: HRESULT) -> HrResult<()> {
        unsafe { (self.vt().close)(self.as_raw(), result) }.ok()
    }

    /// Identifies the dialog's persisted state (last folder, size).
    pub fn set_client_guid(&self, guid: &GUID) -> HrResult<()> {
        unsafe { (self.vt().set_client_guid)(self.as_raw(), guid) }.ok()
    }

    pub fn clear_client_data(&self) -> HrResult<()> {
        unsafe { (self.vt().clear_client_data)(self.as_raw()) }.ok()
    }

    /// Hides items rejected by `filter`. Takes a reference on the filter.
    pub fn set_filter(&self, filter: &IShellItemFilter) -> HrResult<()> {
        unsafe { (self.vt().set_filter)(self.as_raw(), filter.as_raw()) }.ok()
    }
}

impl IFileOpenDialog {
    #[cfg(windows)]
    pub fn new() -> HrResult<Self> {
        super::init::co_create_instance(&CLSID_FILE_OPEN_DIALOG, crate::co::CLSCTX_INPROC_SERVER)
    }

    /// All chosen items, available after `show` returns `true`.
    pub fn get_results(&self) -> HrResult<IShellItemArray> {
        out_interface(|out| unsafe { (self.vt().get_results)(self.as_raw(), out) })
    }

    /// The items selected in the view while the dialog is showing.
    pub fn get_selected_items(&self) -> HrResult<IShellItemArray> {
        out_interface(|out| unsafe { (self.vt().get_selected_items)(self.as_raw(), out) })
    }

    /// Shows the dialog with `options` added and returns the chosen file
    /// system paths, empty when cancelled.
    pub fn run(&self, owner: HWND, options: FOS) -> HrResult<Vec<String>> {
        self.add_options(options)?;
        if !self.show(owner)? {
            return Ok(Vec::new());
        }
        let rel = super::OleReleaser::new();
        let results = rel.add(self.get_results()?);
        results.file_sys_paths()
    }
}

/// Lets the user pick files. Empty when cancelled.
#[cfg(windows)]
pub fn pick_files(owner: HWND, types: Option<&FileTypes>) -> HrResult<Vec<String>> {
    use crate::co::{FOS_ALLOWMULTISELECT, FOS_FILEMUSTEXIST, FOS_FORCEFILESYSTEM};

    let dialog = IFileOpenDialog::new()?;
    if let Some(types) = types.filter(|t| !t.is_empty()) {
        dialog.set_file_types(types)?;
    }
    dialog.run(owner, FOS_FORCEFILESYSTEM | FOS_ALLOWMULTISELECT | FOS_FILEMUSTEXIST)
}

/// Lets the user pick one folder. `None` when cancelled.
#[cfg(windows)]
pub fn pick_folder(owner: HWND) -> HrResult<Option<String>> {
    use crate::co::{FOS_FORCEFILESYSTEM, FOS_PICKFOLDERS};

    let dialog = IFileOpenDialog::new()?;
    Ok(dialog.run(owner, FOS_PICKFOLDERS | FOS_FORCEFILESYSTEM)?.into_iter().next())
}
