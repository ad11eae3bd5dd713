//! `IDataObject`, the payload of clipboard and drag-and-drop transfers.

use super::vtbl::IDataObjectVtbl;
use super::{com_interface, ComInterface};
use crate::co::{CF, HRESULT, TYMED, TYMED_HGLOBAL};
use crate::error::HrResult;
use crate::types::FORMATETC;

com_interface! {
    IDataObject, IDataObjectVtbl, "0000010e-0000-0000-C000-000000000046"
}

impl IDataObject {
    /// Whether a `GetData` call with `format` would succeed. `S_FALSE` and
    /// the `DV_E_*` codes mean "no"; other failures are errors.
    pub fn query_get_data(&self, format: &FORMATETC) -> HrResult<bool> {
        match unsafe { (self.vt().query_get_data)(self.as_raw(), format) } {
            HRESULT::S_OK => Ok(true),
            HRESULT::S_FALSE | HRESULT::DV_E_FORMATETC | HRESULT::DV_E_TYMED => Ok(false),
            hr if hr.succeeded() => Ok(true),
            hr => Err(hr),
        }
    }

    /// Shorthand for [`IDataObject::query_get_data`] on a content format.
    pub fn has_format(&self, cf: CF, tymed: TYMED) -> bool {
        self.query_get_data(&FORMATETC::new(cf, tymed)).unwrap_or(false)
    }

    #[cfg(windows)]
    pub fn get_data(&self, format: &FORMATETC) -> HrResult<StgMedium> {
        let mut medium = crate::types::STGMEDIUM::default();
        unsafe { (self.vt().get_data)(self.as_raw(), format, &mut medium) }.ok()?;
        Ok(StgMedium(medium))
    }

    /// Paths carried as `CF_HDROP`, as dropped from Explorer.
    #[cfg(windows)]
    pub fn file_drop_list(&self) -> HrResult<Vec<String>> {
        use crate::co::CF_HDROP;

        let medium = self.get_data(&FORMATETC::new(CF_HDROP, TYMED_HGLOBAL))?;
        if medium.0.tymed != TYMED_HGLOBAL {
            return Err(HRESULT::DV_E_TYMED);
        }
        Ok(unsafe { crate::ffi::drop_files(medium.0.u) })
    }
}

/// A storage medium returned by `GetData`, freed with `ReleaseStgMedium`.
#[cfg(windows)]
#[derive(Debug)]
pub struct StgMedium(crate::types::STGMEDIUM);

#[cfg(windows)]
impl StgMedium {
    pub fn tymed(&self) -> TYMED {
        self.0.tymed
    }

    /// The raw handle or pointer; its meaning depends on [`StgMedium::tymed`].
    pub fn handle(&self) -> *mut std::ffi::c_void {
        self.0.u
    }
}

#[cfg(windows)]
impl Drop for StgMedium {
    fn drop(&mut self) {
        unsafe { crate::ffi::ReleaseStgMedium(&mut self.0) }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::offering;
    use super::*;
    use crate::co::{CF_HDROP, CF_UNICODETEXT, TYMED_ISTREAM};

    #[test]
    fn test_query_get_data() {
        let data = offering(&[(CF_HDROP, TYMED_HGLOBAL)]);
        assert_eq!(data.query_get_data(&FORMATETC::new(CF_HDROP, TYMED_HGLOBAL)), Ok(true));
        assert_eq!(data.query_get_data(&FORMATETC::new(CF_HDROP, TYMED_ISTREAM)), Ok(false));
        assert!(!data.has_format(CF_UNICODETEXT, TYMED_HGLOBAL));
        assert!(data.has_format(CF_HDROP, TYMED_HGLOBAL));
    }
}
