//! Word-packing helpers (`MAKEWORD`, `LOWORD`, `HIDWORD` and friends).

#[inline]
pub const fn make_word(lo: u8, hi: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

#[inline]
pub const fn lo_byte(v: u16) -> u8 {
    (v & 0xFF) as u8
}

#[inline]
pub const fn hi_byte(v: u16) -> u8 {
    (v >> 8) as u8
}

#[inline]
pub const fn make_long(lo: u16, hi: u16) -> u32 {
    ((hi as u32) << 16) | lo as u32
}

#[inline]
pub const fn lo_word(v: u32) -> u16 {
    (v & 0xFFFF) as u16
}

#[inline]
pub const fn hi_word(v: u32) -> u16 {
    (v >> 16) as u16
}

#[inline]
pub const fn make_qword(lo: u32, hi: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

#[inline]
pub const fn lo_dword(v: u64) -> u32 {
    (v & 0xFFFF_FFFF) as u32
}

#[inline]
pub const fn hi_dword(v: u64) -> u32 {
    (v >> 32) as u32
}

/// `MAKEINTRESOURCEW`: a resource ordinal smuggled through a string pointer.
#[inline]
pub const fn make_int_resource(id: u16) -> *const u16 {
    id as usize as *const u16
}

/// `IS_INTRESOURCE`.
#[inline]
pub fn is_int_resource(p: *const u16) -> bool {
    (p as usize) >> 16 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_round_trip() {
        for lo in 0..=u8::MAX {
            for hi in [0u8, 1, 0x7F, 0x80, 0xFF] {
                let w = make_word(lo, hi);
                assert_eq!((lo_byte(w), hi_byte(w)), (lo, hi));
            }
        }
    }

    #[test]
    fn test_long_and_qword_round_trip() {
        let samples16 = [0u16, 1, 0x00FF, 0x7FFF, 0x8000, 0xFFFF];
        for &lo in &samples16 {
            for &hi in &samples16 {
                let l = make_long(lo, hi);
                assert_eq!((lo_word(l), hi_word(l)), (lo, hi));
            }
        }
        let samples32 = [0u32, 1, 0xFFFF, 0x7FFF_FFFF, 0x8000_0000, u32::MAX];
        for &lo in &samples32 {
            for &hi in &samples32 {
                let q = make_qword(lo, hi);
                assert_eq!((lo_dword(q), hi_dword(q)), (lo, hi));
            }
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(make_word(0x34, 0x12), 0x1234);
        assert_eq!(make_long(0x5678, 0x1234), 0x1234_5678);
        assert_eq!(hi_dword(0x1122_3344_5566_7788), 0x1122_3344);
    }

    #[test]
    fn test_int_resource() {
        let p = make_int_resource(0xFFFF);
        assert!(is_int_resource(p));
        assert_eq!(p as usize, 0xFFFF);
        let s = vec![0u16; 2];
        assert!(!is_int_resource(s.as_ptr()));
    }
}
