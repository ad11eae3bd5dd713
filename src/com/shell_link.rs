//! Shell shortcuts (`.lnk`): `IShellLinkW` plus `IPersistFile` to load and
//! save them.

use super::vtbl::{IPersistFileVtbl, IPersistVtbl, IShellLinkWVtbl};
use super::{com_interface, take_task_string, ComInterface};
use crate::co::{HRESULT, SLGP, SLR, STGM};
use crate::error::HrResult;
use crate::guid::GUID;
use crate::types::{FALSE, HWND, PWSTR, TRUE, WIN32_FIND_DATAW};
use crate::utils::{from_wide_buf, to_wstring};

pub const CLSID_SHELL_LINK: GUID = GUID::parse_const("00021401-0000-0000-C000-000000000046");

// Paths longer than MAX_PATH are legal in shortcuts since Windows 10.
const LINK_BUF_LEN: usize = 32768;
const INFOTIP_BUF_LEN: usize = 1024;

com_interface! {
    IShellLinkW, IShellLinkWVtbl, "000214F9-0000-0000-C000-000000000046"
}

com_interface! {
    IPersist, IPersistVtbl, "0000010c-0000-0000-C000-000000000046"
}

com_interface! {
    IPersistFile: IPersist, IPersistFileVtbl, "0000010b-0000-0000-C000-000000000046"
}

/// Calls a getter that fills a caller-provided UTF-16 buffer.
fn read_string(len: usize, call: impl FnOnce(PWSTR, i32) -> HRESULT) -> HrResult<String> {
    let mut buf = vec![0u16; len];
    call(buf.as_mut_ptr(), buf.len() as i32).ok()?;
    Ok(from_wide_buf(&buf))
}

impl IShellLinkW {
    #[cfg(windows)]
    pub fn new() -> HrResult<Self> {
        super::init::co_create_instance(&CLSID_SHELL_LINK, crate::co::CLSCTX_INPROC_SERVER)
    }

    /// The target path. `S_FALSE` (no path, e.g. a link to a virtual folder)
    /// gives an empty string.
    pub fn get_path(&self, flags: SLGP) -> HrResult<String> {
        let mut fd = WIN32_FIND_DATAW::default();
        read_string(LINK_BUF_LEN, |buf, len| unsafe { (self.vt().get_path)(self.as_raw(), buf, len, &mut fd, flags) })
    }

    pub fn set_path(&self, path: &str) -> HrResult<()> {
        let path = to_wstring(path);
        unsafe { (self.vt().set_path)(self.as_raw(), path.as_ptr()) }.ok()
    }

    pub fn get_arguments(&self) -> HrResult<String> {
        read_string(LINK_BUF_LEN, |buf, len| unsafe { (self.vt().get_arguments)(self.as_raw(), buf, len) })
    }

    pub fn set_arguments(&self, args: &str) -> HrResult<()> {
        let args = to_wstring(args);
        unsafe { (self.vt().set_arguments)(self.as_raw(), args.as_ptr()) }.ok()
    }

    pub fn get_description(&self) -> HrResult<String> {
        read_string(INFOTIP_BUF_LEN, |buf, len| unsafe { (self.vt().get_description)(self.as_raw(), buf, len) })
    }

    pub fn set_description(&self, text: &str) -> HrResult<()> {
        let text = to_wstring(text);
        unsafe { (self.vt().set_description)(self.as_raw(), text.as_ptr()) }.ok()
    }

    pub fn get_working_directory(&self) -> HrResult<String> {
        read_string(LINK_BUF_LEN, |buf, len| unsafe { (self.vt().get_working_directory)(self.as_raw(), buf, len) })
    }

    pub fn set_working_directory(&self, dir: &str) -> HrResult<()> {
        let dir = to_wstring(dir);
        unsafe { (self.vt().set_working_directory)(self.as_raw(), dir.as_ptr()) }.ok()
    }

    /// Icon file and index within it.
    pub fn get_icon_location(&self) -> HrResult<(String, i32)> {
        let mut index = 0;
        let path = read_string(LINK_BUF_LEN, |buf, len| unsafe {
            (self.vt().get_icon_location)(self.as_raw(), buf, len, &mut index)
        })?;
        Ok((path, index))
    }

    pub fn set_icon_location(&self, path: &str, index: i32) -> HrResult<()> {
        let path = to_wstring(path);
        unsafe { (self.vt().set_icon_location)(self.as_raw(), path.as_ptr(), index) }.ok()
    }

    /// `SW_*` show command for the launched program.
    pub fn get_show_cmd(&self) -> HrResult<i32> {
        let mut cmd = 0;
        unsafe { (self.vt().get_show_cmd)(self.as_raw(), &mut cmd) }.ok()?;
        Ok(cmd)
    }

    pub fn set_show_cmd(&self, cmd: i32) -> HrResult<()> {
        unsafe { (self.vt().set_show_cmd)(self.as_raw(), cmd) }.ok()
    }

    /// Tracks down a moved target. The high word of `flags` is the search
    /// timeout in milliseconds when `SLR_NO_UI` is set.
    pub fn resolve(&self, owner: HWND, flags: SLR) -> HrResult<()> {
        unsafe { (self.vt().resolve)(self.as_raw(), owner, flags) }.ok()
    }
}

impl IPersist {
    pub fn get_class_id(&self) -> HrResult<GUID> {
        let mut clsid = GUID::NULL;
        unsafe { (self.vt().get_class_id)(self.as_raw(), &mut clsid) }.ok()?;
        Ok(clsid)
    }
}

impl IPersistFile {
    /// Whether the object changed since it was last saved.
    pub fn is_dirty(&self) -> HrResult<bool> {
        unsafe { (self.vt().is_dirty)(self.as_raw()) }.ok_bool()
    }

    pub fn load(&self, path: &str, mode: STGM) -> HrResult<()> {
        let path = to_wstring(path);
        unsafe { (self.vt().load)(self.as_raw(), path.as_ptr(), mode) }.ok()
    }

    /// Saves to `path`; with `None`, saves to the file it was loaded from.
    /// `remember` makes `path` the current file.
    pub fn save(&self, path: Option<&str>, remember: bool) -> HrResult<()> {
        let path = path.map(to_wstring);
        let ptr = path.as_ref().map_or(std::ptr::null(), |p| p.as_ptr());
        unsafe { (self.vt().save)(self.as_raw(), ptr, if remember { TRUE } else { FALSE }) }.ok()
    }

    pub fn save_completed(&self, path: &str) -> HrResult<()> {
        let path = to_wstring(path);
        unsafe { (self.vt().save_completed)(self.as_raw(), path.as_ptr()) }.ok()
    }

    /// The current file, or the default save prompt name when there is none
    /// (`S_FALSE`).
    pub fn get_cur_file(&self) -> HrResult<String> {
        let mut name: *mut u16 = std::ptr::null_mut();
        unsafe { (self.vt().get_cur_file)(self.as_raw(), &mut name) }.ok()?;
        Ok(unsafe { take_task_string(name) })
    }
}

/// Runs `load` for `.lnk` paths and keeps a non-empty target. `Ok(None)`
/// means the path is not a shortcut or the shortcut has no file system
/// target.
fn shortcut_target(path: &str, load: impl FnOnce() -> HrResult<String>) -> HrResult<Option<String>> {
    if !path.to_lowercase().ends_with(".lnk") {
        return Ok(None);
    }
    let target = load().inspect_err(|hr| crate::log_warn!("cannot resolve shortcut {}: {}", path, hr))?;
    Ok(Some(target).filter(|target| !target.is_empty()))
}

/// Target path of the shortcut at `path`.
#[cfg(windows)]
pub fn resolve_shortcut(path: &str) -> HrResult<Option<String>> {
    use crate::co::STGM_READ;

    shortcut_target(path, || {
        let link = IShellLinkW::new()?;
        link.query::<IPersistFile>()?.load(path, STGM_READ)?;
        link.get_path(0)
    })
}

/// Creates or overwrites the shortcut `link_path` pointing at `target`.
#[cfg(windows)]
pub fn create_shortcut(link_path: &str, target: &str, args: Option<&str>, description: Option<&str>) -> HrResult<()> {
    let link = IShellLinkW::new()?;
    link.set_path(target)?;
    if let Some(args) = args {
        link.set_arguments(args)?;
    }
    if let Some(text) = description {
        link.set_description(text)?;
    }
    link.query::<IPersistFile>()?.save(Some(link_path), true)
}
