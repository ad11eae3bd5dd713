use std::ffi::c_void;

use super::vtbl::{ISequentialStreamVtbl, IStreamVtbl};
use super::{com_interface, ComInterface};
use crate::co::{STATFLAG_NONAME, STGC, STREAM_SEEK, STREAM_SEEK_END, STREAM_SEEK_SET};
use crate::error::HrResult;
use crate::types::STATSTG;

com_interface! {
    ISequentialStream, ISequentialStreamVtbl, "0c733a30-2a1c-11ce-ade5-00aa0044773d"
}

com_interface! {
    /// A seekable byte stream.
    IStream: ISequentialStream, IStreamVtbl, "0000000c-0000-0000-C000-000000000046"
}

impl ISequentialStream {
    /// Reads up to `buf.len()` bytes, returning how many were read. Zero
    /// means the end of the stream.
    pub fn read(&self, buf: &mut [u8]) -> HrResult<usize> {
        let mut read = 0u32;
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        unsafe { (self.vt().read)(self.as_raw(), buf.as_mut_ptr() as *mut c_void, len, &mut read) }.ok()?;
        Ok(read as usize)
    }

    /// Writes `buf`, returning how many bytes the stream accepted.
    pub fn write(&self, buf: &[u8]) -> HrResult<usize> {
        let mut written = 0u32;
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        unsafe { (self.vt().write)(self.as_raw(), buf.as_ptr() as *const c_void, len, &mut written) }.ok()?;
        Ok(written as usize)
    }

    /// Reads until the stream reports no more data.
    pub fn read_to_end(&self) -> HrResult<Vec<u8>> {
        let mut data = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(data);
            }
            data.extend_from_slice(&chunk[..n]);
        }
    }
}

impl IStream {
    /// Moves the seek pointer and returns its new absolute position.
    pub fn seek(&self, offset: i64, origin: STREAM_SEEK) -> HrResult<u64> {
        let mut pos = 0u64;
        unsafe { (self.vt().seek)(self.as_raw(), offset, origin, &mut pos) }.ok()?;
        Ok(pos)
    }

    pub fn rewind(&self) -> HrResult<()> {
        self.seek(0, STREAM_SEEK_SET).map(|_| ())
    }

    pub fn set_size(&self, size: u64) -> HrResult<()> {
        unsafe { (self.vt().set_size)(self.as_raw(), size) }.ok()
    }

    pub fn commit(&self, flags: STGC) -> HrResult<()> {
        unsafe { (self.vt().commit)(self.as_raw(), flags) }.ok()
    }

    /// `Stat` without the name, so nothing needs to be freed.
    pub fn stat(&self) -> HrResult<STATSTG> {
        let mut st = STATSTG::default();
        unsafe { (self.vt().stat)(self.as_raw(), &mut st, STATFLAG_NONAME) }.ok()?;
        Ok(st)
    }

    /// Stream length, from `Stat` or by seeking to the end when the
    /// implementation does not support `Stat`.
    pub fn size(&self) -> HrResult<u64> {
        match self.stat() {
            Ok(st) => Ok(st.cbSize),
            Err(_) => {
                let here = self.seek(0, crate::co::STREAM_SEEK_CUR)?;
                let end = self.seek(0, STREAM_SEEK_END)?;
                self.seek(here as i64, STREAM_SEEK_SET)?;
                Ok(end)
            }
        }
    }

    /// A memory-backed stream holding a copy of `data`, positioned at the
    /// start (`SHCreateMemStream`).
    #[cfg(windows)]
    pub fn from_bytes(data: &[u8]) -> HrResult<IStream> {
        let len = u32::try_from(data.len()).map_err(|_| crate::co::HRESULT::E_INVALIDARG)?;
        let raw = unsafe { crate::ffi::SHCreateMemStream(data.as_ptr(), len) };
        unsafe { IStream::from_raw(raw) }.ok_or(crate::co::HRESULT::E_OUTOFMEMORY)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use crate::co::{HRESULT, STREAM_SEEK_CUR};
    use crate::com::producer::{unknown_vtbl, ComObject, Produced};
    use std::cell::RefCell;

    #[derive(Default)]
    pub(crate) struct MemStream {
        data: RefCell<Vec<u8>>,
        pos: RefCell<u64>,
        pub stat_supported: bool,
    }

    unsafe fn mem<'a>(this: *mut c_void) -> &'a MemStream {
        unsafe { &ComObject::<MemStream>::from_this(this).inner }
    }

    unsafe extern "system" fn read(this: *mut c_void, buf: *mut c_void, len: u32, read: *mut u32) -> HRESULT {
        let m = unsafe { mem(this) };
        let data = m.data.borrow();
        let mut pos = m.pos.borrow_mut();
        let start = (*pos as usize).min(data.len());
        let n = (len as usize).min(data.len() - start);
        unsafe {
            std::ptr::copy_nonoverlapping(data[start..].as_ptr(), buf as *mut u8, n);
            if !read.is_null() {
                *read = n as u32;
            }
        }
        *pos += n as u64;
        if n < len as usize { HRESULT::S_FALSE } else { HRESULT::S_OK }
    }

    unsafe extern "system" fn write(this: *mut c_void, buf: *const c_void, len: u32, written: *mut u32) -> HRESULT {
        let m = unsafe { mem(this) };
        let mut data = m.data.borrow_mut();
        let mut pos = m.pos.borrow_mut();
        let start = *pos as usize;
        let end = start + len as usize;
        if data.len() < end {
            data.resize(end, 0);
        }
        unsafe {
            std::ptr::copy_nonoverlapping(buf as *const u8, data[start..end].as_mut_ptr(), len as usize);
            if !written.is_null() {
                *written = len;
            }
        }
        *pos = end as u64;
        HRESULT::S_OK
    }

    unsafe extern "system" fn seek(this: *mut c_void, offset: i64, origin: u32, new_pos: *mut u64) -> HRESULT {
        let m = unsafe { mem(this) };
        let base = match origin {
            STREAM_SEEK_SET => 0,
            STREAM_SEEK_CUR => *m.pos.borrow() as i64,
            STREAM_SEEK_END => m.data.borrow().len() as i64,
            _ => return HRESULT::STG_E_INVALIDFUNCTION,
        };
        let Some(target) = base.checked_add(offset).filter(|t| *t >= 0) else {
            return HRESULT::STG_E_INVALIDFUNCTION;
        };
        *m.pos.borrow_mut() = target as u64;
        if !new_pos.is_null() {
            unsafe { *new_pos = target as u64 };
        }
        HRESULT::S_OK
    }

    unsafe extern "system" fn set_size(this: *mut c_void, size: u64) -> HRESULT {
        unsafe { mem(this) }.data.borrow_mut().resize(size as usize, 0);
        HRESULT::S_OK
    }

    unsafe extern "system" fn copy_to(_: *mut c_void, _: *mut c_void, _: u64, _: *mut u64, _: *mut u64) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn commit(_: *mut c_void, _: u32) -> HRESULT {
        HRESULT::S_OK
    }

    unsafe extern "system" fn revert(_: *mut c_void) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn lock_region(_: *mut c_void, _: u64, _: u64, _: u32) -> HRESULT {
        HRESULT::E_NOTIMPL
    }

    unsafe extern "system" fn stat(this: *mut c_void, st: *mut STATSTG, _: u32) -> HRESULT {
        let m = unsafe { mem(this) };
        if !m.stat_supported {
            return HRESULT::E_NOTIMPL;
        }
        unsafe {
            *st = STATSTG::default();
            (*st).cbSize = m.data.borrow().len() as u64;
        }
        HRESULT::S_OK
    }

    unsafe extern "system" fn clone(_: *mut c_void, out: *mut *mut c_void) -> HRESULT {
        unsafe { *out = std::ptr::null_mut() };
        HRESULT::E_NOTIMPL
    }

    static STREAM_VTBL: IStreamVtbl = IStreamVtbl {
        base: ISequentialStreamVtbl { base: unknown_vtbl::<MemStream>(), read, write },
        seek,
        set_size,
        copy_to,
        commit,
        revert,
        lock_region,
        unlock_region: lock_region,
        stat,
        clone,
    };

    unsafe impl Produced for MemStream {
        type Iface = IStream;

        fn vtbl() -> &'static IStreamVtbl {
            &STREAM_VTBL
        }
    }

    pub(crate) fn mem_stream(data: &[u8], stat_supported: bool) -> IStream {
        ComObject::create(MemStream { data: RefCell::new(data.to_vec()), pos: RefCell::new(0), stat_supported })
    }
}

#[cfg(test)]
mod tests {
    use super::fake::mem_stream;
    use super::*;
    use crate::co::{HRESULT, STGC_DEFAULT, STREAM_SEEK_CUR};

    #[test]
    fn test_read_write_seek() {
        let stream = mem_stream(b"", true);
        assert_eq!(stream.write(b"hello world"), Ok(11));
        assert_eq!(stream.seek(-5, STREAM_SEEK_END), Ok(6));

        let mut buf = [0u8; 16];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"world");
        assert_eq!(stream.read(&mut buf), Ok(0));

        stream.rewind().unwrap();
        assert_eq!(stream.read_to_end().unwrap(), b"hello world");
        assert_eq!(stream.commit(STGC_DEFAULT), Ok(()));
    }

    #[test]
    fn test_size_with_and_without_stat() {
        let stream = mem_stream(&[7u8; 10_000], true);
        assert_eq!(stream.size(), Ok(10_000));
        stream.set_size(12).unwrap();
        assert_eq!(stream.stat().unwrap().cbSize, 12);

        let stream = mem_stream(&[1, 2, 3, 4, 5], false);
        assert_eq!(stream.stat().unwrap_err(), HRESULT::E_NOTIMPL);
        stream.seek(2, STREAM_SEEK_SET).unwrap();
        assert_eq!(stream.size(), Ok(5));
        assert_eq!(stream.seek(0, STREAM_SEEK_CUR), Ok(2));
    }

    #[test]
    fn test_large_read_spans_chunks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let stream = mem_stream(&data, true);
        assert_eq!(stream.read_to_end().unwrap(), data);
    }

    #[test]
    fn test_seek_before_start_fails() {
        let stream = mem_stream(b"abc", true);
        assert_eq!(stream.seek(-1, STREAM_SEEK_SET), Err(HRESULT::STG_E_INVALIDFUNCTION));
    }
}
