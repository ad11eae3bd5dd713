//! Typed bindings for a subset of Win32 and COM.
//!
//! COM objects are consumed through owned interface wrappers ([`com`]) and
//! produced from Rust closures ([`com::DropTarget`],
//! [`com::FileOperationProgressSink`], [`com::ShellItemFilter`]). Everything
//! that does not need the OS (GUIDs, status codes, struct layouts, the task
//! dialog serializer, time and version decoding) builds on any host.

pub mod bits;
pub mod co;
pub mod com;
pub mod config;
pub mod error;
pub mod guid;
pub mod logger;
pub mod taskdialog;
pub mod time;
pub mod types;
pub mod utils;
pub mod version;

#[cfg(windows)]
mod dynamic_import;
#[cfg(windows)]
mod ffi;

pub use co::{ERROR, HRESULT};
pub use com::{ComInterface, OleReleaser};
pub use config::BindingConfig;
pub use error::{Error, GuidError, HrResult, Result, SysResult};
pub use guid::GUID;
