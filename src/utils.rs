//! UTF-16 marshalling helpers.

/// Macro to convert an ASCII string literal to a null-terminated UTF-16 array at compile time.
///
/// # Example
/// ```rust
/// let wide_str = olebind::w!("Hello");
/// assert_eq!(wide_str, &[72, 101, 108, 108, 111, 0]);
/// ```
#[macro_export]
macro_rules! w {
    ($s:literal) => {
        {
            const S: &[u8] = $s.as_bytes();
            const LEN: usize = S.len() + 1;
            const UTF16: [u16; LEN] = {
                let mut out = [0u16; LEN];
                let mut i = 0;
                while i < S.len() {
                    assert!(S[i] < 0x80, "w! only accepts ASCII literals");
                    out[i] = S[i] as u16;
                    i += 1;
                }
                out[LEN - 1] = 0;
                out
            };
            &UTF16[..]
        }
    };
}

/// Convert a Rust string to a null-terminated UTF-16 vector.
pub fn to_wstring(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Like [`to_wstring`], but `None` becomes an empty vector so callers can pass
/// a null pointer with [`opt_ptr`].
pub fn to_wstring_opt(value: Option<&str>) -> Vec<u16> {
    value.map(to_wstring).unwrap_or_default()
}

/// Pointer to a buffer produced by [`to_wstring_opt`]; empty means null.
pub fn opt_ptr(buf: &[u16]) -> *const u16 {
    if buf.is_empty() { std::ptr::null() } else { buf.as_ptr() }
}

/// Decodes a fixed-size buffer up to the first null (or the whole buffer).
pub fn from_wide_buf(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

/// Decodes a null-terminated string owned by someone else.
///
/// # Safety
/// `ptr` must be null or point to a readable, null-terminated UTF-16 string.
pub unsafe fn from_wide_ptr(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe {
        let len = (0..).take_while(|&i| *ptr.add(i) != 0).count();
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }
}

/// Builds the double-null-terminated list used by shell APIs (`a\0b\0\0`).
pub fn to_multi_wstring<S: AsRef<str>>(items: &[S]) -> Vec<u16> {
    let mut out: Vec<u16> = Vec::new();
    for item in items {
        out.extend(item.as_ref().encode_utf16());
        out.push(0);
    }
    if items.is_empty() {
        out.push(0);
    }
    out.push(0);
    out
}
