//! `FILETIME` and `SYSTEMTIME` conversions.
//!
//! A `FILETIME` counts 100-nanosecond ticks since 1601-01-01 UTC.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::bits::{hi_dword, lo_dword, make_qword};
use crate::types::FILETIME;

pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// 1970-01-01 UTC as a `FILETIME` tick count.
pub const UNIX_EPOCH_TICKS: u64 = 11_644_473_600 * TICKS_PER_SECOND;

const NANOS_PER_TICK: u64 = 100;

impl FILETIME {
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { dwLowDateTime: lo_dword(ticks), dwHighDateTime: hi_dword(ticks) }
    }

    pub const fn ticks(self) -> u64 {
        make_qword(self.dwLowDateTime, self.dwHighDateTime)
    }

    pub fn to_system_time(self) -> SystemTime {
        let ticks = self.ticks();
        if ticks >= UNIX_EPOCH_TICKS {
            UNIX_EPOCH + ticks_to_duration(ticks - UNIX_EPOCH_TICKS)
        } else {
            UNIX_EPOCH - ticks_to_duration(UNIX_EPOCH_TICKS - ticks)
        }
    }

    /// `None` before 1601 or past the end of the tick range. Precision below
    /// 100 ns is truncated.
    pub fn from_system_time(time: SystemTime) -> Option<Self> {
        let ticks = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => UNIX_EPOCH_TICKS.checked_add(duration_to_ticks(after)?)?,
            Err(before) => UNIX_EPOCH_TICKS.checked_sub(duration_to_ticks(before.duration())?)?,
        };
        Some(Self::from_ticks(ticks))
    }
}

impl From<FILETIME> for SystemTime {
    fn from(ft: FILETIME) -> Self {
        ft.to_system_time()
    }
}

fn ticks_to_duration(ticks: u64) -> Duration {
    Duration::new(ticks / TICKS_PER_SECOND, ((ticks % TICKS_PER_SECOND) * NANOS_PER_TICK) as u32)
}

fn duration_to_ticks(d: Duration) -> Option<u64> {
    d.as_secs()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(d.subsec_nanos() as u64 / NANOS_PER_TICK)
}

#[cfg(windows)]
mod sys {
    use windows_sys::Win32::Foundation as wf;
    use windows_sys::Win32::Storage::FileSystem::{FileTimeToLocalFileTime, LocalFileTimeToFileTime};
    use windows_sys::Win32::System::SystemInformation::{GetLocalTime, GetSystemTime, GetSystemTimeAsFileTime};
    use windows_sys::Win32::System::Time::{
        FileTimeToSystemTime, SystemTimeToFileTime, SystemTimeToTzSpecificLocalTime, TzSpecificLocalTimeToSystemTime,
    };

    use crate::co::ERROR;
    use crate::error::SysResult;
    use crate::types::{FILETIME, SYSTEMTIME};

    // The mirrors in `types` share layout with the windows-sys structs.
    fn ft(p: &FILETIME) -> *const wf::FILETIME {
        p as *const FILETIME as *const wf::FILETIME
    }

    fn ft_mut(p: &mut FILETIME) -> *mut wf::FILETIME {
        p as *mut FILETIME as *mut wf::FILETIME
    }

    fn st(p: &SYSTEMTIME) -> *const wf::SYSTEMTIME {
        p as *const SYSTEMTIME as *const wf::SYSTEMTIME
    }

    fn st_mut(p: &mut SYSTEMTIME) -> *mut wf::SYSTEMTIME {
        p as *mut SYSTEMTIME as *mut wf::SYSTEMTIME
    }

    fn check(ok: i32) -> SysResult<()> {
        if ok != 0 { Ok(()) } else { Err(ERROR::last()) }
    }

    pub fn file_time_to_system_time(time: &FILETIME) -> SysResult<SYSTEMTIME> {
        let mut out = SYSTEMTIME::default();
        check(unsafe { FileTimeToSystemTime(ft(time), st_mut(&mut out)) })?;
        Ok(out)
    }

    pub fn system_time_to_file_time(time: &SYSTEMTIME) -> SysResult<FILETIME> {
        let mut out = FILETIME::default();
        check(unsafe { SystemTimeToFileTime(st(time), ft_mut(&mut out)) })?;
        Ok(out)
    }

    /// UTC to local time in the current time zone, with that date's
    /// daylight rules.
    pub fn system_time_to_local(utc: &SYSTEMTIME) -> SysResult<SYSTEMTIME> {
        let mut out = SYSTEMTIME::default();
        check(unsafe { SystemTimeToTzSpecificLocalTime(std::ptr::null(), st(utc), st_mut(&mut out)) })?;
        Ok(out)
    }

    pub fn local_to_system_time(local: &SYSTEMTIME) -> SysResult<SYSTEMTIME> {
        let mut out = SYSTEMTIME::default();
        check(unsafe { TzSpecificLocalTimeToSystemTime(std::ptr::null(), st(local), st_mut(&mut out)) })?;
        Ok(out)
    }

    /// Uses the current bias rather than the one in effect at `time`.
    pub fn file_time_to_local(time: &FILETIME) -> SysResult<FILETIME> {
        let mut out = FILETIME::default();
        check(unsafe { FileTimeToLocalFileTime(ft(time), ft_mut(&mut out)) })?;
        Ok(out)
    }

    pub fn local_to_file_time(local: &FILETIME) -> SysResult<FILETIME> {
        let mut out = FILETIME::default();
        check(unsafe { LocalFileTimeToFileTime(ft(local), ft_mut(&mut out)) })?;
        Ok(out)
    }

    pub fn get_system_time() -> SYSTEMTIME {
        let mut out = SYSTEMTIME::default();
        unsafe { GetSystemTime(st_mut(&mut out)) };
        out
    }

    pub fn get_local_time() -> SYSTEMTIME {
        let mut out = SYSTEMTIME::default();
        unsafe { GetLocalTime(st_mut(&mut out)) };
        out
    }

    pub fn now() -> FILETIME {
        let mut out = FILETIME::default();
        unsafe { GetSystemTimeAsFileTime(ft_mut(&mut out)) };
        out
    }
}

#[cfg(windows)]
pub use sys::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_split() {
        let ft = FILETIME::from_ticks(0x01DA_0000_1234_5678);
        assert_eq!(ft.dwHighDateTime, 0x01DA_0000);
        assert_eq!(ft.dwLowDateTime, 0x1234_5678);
        assert_eq!(ft.ticks(), 0x01DA_0000_1234_5678);
    }

    #[test]
    fn test_unix_epoch() {
        assert_eq!(FILETIME::from_ticks(UNIX_EPOCH_TICKS).to_system_time(), UNIX_EPOCH);
        assert_eq!(FILETIME::from_system_time(UNIX_EPOCH), Some(FILETIME::from_ticks(116_444_736_000_000_000)));
    }

    #[test]
    fn test_system_time_both_sides_of_epoch() {
        let after = UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_700);
        let ft = FILETIME::from_system_time(after).unwrap();
        assert_eq!(ft.ticks(), UNIX_EPOCH_TICKS + 17_000_000_001_234_567);
        assert_eq!(SystemTime::from(ft), after);

        let before = UNIX_EPOCH - Duration::from_secs(86_400);
        let ft = FILETIME::from_system_time(before).unwrap();
        assert_eq!(ft.ticks(), UNIX_EPOCH_TICKS - 86_400 * TICKS_PER_SECOND);
        assert_eq!(ft.to_system_time(), before);
    }

    #[test]
    fn test_sub_tick_precision_truncates() {
        let t = UNIX_EPOCH + Duration::from_nanos(199);
        assert_eq!(FILETIME::from_system_time(t).unwrap().ticks(), UNIX_EPOCH_TICKS + 1);
    }

    #[test]
    fn test_before_1601_is_none() {
        let t = UNIX_EPOCH - Duration::from_secs(11_644_473_601);
        assert_eq!(FILETIME::from_system_time(t), None);
        assert_eq!(FILETIME::from_ticks(0).to_system_time(), UNIX_EPOCH - Duration::from_secs(11_644_473_600));
    }

    #[cfg(windows)]
    #[test]
    fn test_system_time_fields() {
        use crate::types::SYSTEMTIME;

        let st = file_time_to_system_time(&FILETIME::from_ticks(UNIX_EPOCH_TICKS)).unwrap();
        assert_eq!((st.wYear, st.wMonth, st.wDay, st.wDayOfWeek), (1970, 1, 1, 4));
        let back = system_time_to_file_time(&SYSTEMTIME { wYear: 1970, wMonth: 1, wDay: 1, ..Default::default() });
        assert_eq!(back, Ok(FILETIME::from_ticks(UNIX_EPOCH_TICKS)));
    }
}
