//! Crate error types.
//!
//! COM methods return [`HrResult`], kernel calls return [`SysResult`]; both
//! status types convert into [`Error`] with `?` when an operation mixes them.

use thiserror::Error;

use crate::co::{ERROR, HRESULT};

/// Result of a COM method: the failing HRESULT is the error value.
pub type HrResult<T> = std::result::Result<T, HRESULT>;

/// Result of a kernel call: the `GetLastError` code is the error value.
pub type SysResult<T> = std::result::Result<T, ERROR>;

/// Result type for operations that can fail in more than one way.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A COM call returned a failure HRESULT.
    #[error("COM call failed: {0}")]
    Com(#[from] HRESULT),

    /// A Win32 call failed and reported this error code.
    #[error("system call failed: {0}")]
    Sys(#[from] ERROR),

    /// A GUID string was rejected by the parser.
    #[error("invalid GUID: {0}")]
    Guid(#[from] GuidError),

    /// A buffer returned by the OS did not have the documented shape.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Why a GUID string was rejected.
///
/// Positions are byte offsets into the input string; groups are numbered
/// from zero.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidError {
    #[error("expected 36 characters, got {0}")]
    Length(usize),

    #[error("expected 5 hyphen-separated groups, got {0}")]
    GroupCount(usize),

    #[error("group {group} must have {expected} hex digits, got {found}")]
    GroupWidth { group: usize, expected: usize, found: usize },

    #[error("invalid hex digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
}

impl From<Error> for HRESULT {
    fn from(err: Error) -> Self {
        match err {
            Error::Com(hr) => hr,
            Error::Sys(code) => code.to_hresult(),
            Error::Guid(_) | Error::InvalidData(_) => HRESULT::E_INVALIDARG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_convert_into_error() {
        let err: Error = HRESULT::E_NOINTERFACE.into();
        assert_eq!(err, Error::Com(HRESULT::E_NOINTERFACE));

        let err: Error = ERROR::FILE_NOT_FOUND.into();
        assert_eq!(HRESULT::from(err), HRESULT(0x80070002_u32 as i32));
    }

    #[test]
    fn test_guid_error_message() {
        let err = GuidError::GroupWidth { group: 2, expected: 4, found: 5 };
        assert_eq!(err.to_string(), "group 2 must have 4 hex digits, got 5");
        let err: Error = GuidError::Length(3).into();
        assert_eq!(err.to_string(), "invalid GUID: expected 36 characters, got 3");
    }
}
