use crate::co::{self, COINIT};
use crate::logger::{self, LogLevel, LOG_LEVEL_ALL, LOG_LEVEL_DEFAULT, LOG_LEVEL_NONE};

pub const ENV_LOG: &str = "OLEBIND_LOG";
pub const ENV_APARTMENT: &str = "OLEBIND_APARTMENT";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Apartment {
    /// Single-threaded apartment; required by the shell dialogs and drag and drop.
    #[default]
    Sta,
    Mta,
}

impl Apartment {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sta" | "apartment" => Some(Apartment::Sta),
            "mta" | "multithreaded" => Some(Apartment::Mta),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingConfig {
    pub log_level_mask: u8,
    pub apartment: Apartment,
    pub disable_ole1dde: bool,
    pub speed_over_memory: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            log_level_mask: LOG_LEVEL_DEFAULT,
            apartment: Apartment::Sta,
            disable_ole1dde: true,
            speed_over_memory: false,
        }
    }
}

/// Parses `none`, `all`, or a comma-separated list of level names.
pub fn parse_log_mask(value: &str) -> Option<u8> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => None,
        "none" | "off" => Some(LOG_LEVEL_NONE),
        "all" => Some(LOG_LEVEL_ALL),
        list => list
            .split(',')
            .try_fold(LOG_LEVEL_NONE, |mask, name| Some(mask | LogLevel::from_name(name)? as u8)),
    }
}

impl BindingConfig {
    /// Reads `OLEBIND_LOG` and `OLEBIND_APARTMENT`; unset or unreadable values keep their defaults.
    pub fn from_env() -> Self {
        let log = std::env::var(ENV_LOG).ok();
        let apartment = std::env::var(ENV_APARTMENT).ok();
        Self::from_vars(log.as_deref(), apartment.as_deref())
    }

    pub fn from_vars(log: Option<&str>, apartment: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(value) = log {
            match parse_log_mask(value) {
                Some(mask) => config.log_level_mask = mask,
                None => crate::log_warn!("ignoring {}={:?}", ENV_LOG, value),
            }
        }

        if let Some(value) = apartment {
            match Apartment::from_name(value) {
                Some(a) => config.apartment = a,
                None => crate::log_warn!("ignoring {}={:?}", ENV_APARTMENT, value),
            }
        }

        config
    }

    /// Flags for `CoInitializeEx`.
    pub fn coinit_flags(&self) -> COINIT {
        let mut flags = match self.apartment {
            Apartment::Sta => co::COINIT_APARTMENTTHREADED,
            Apartment::Mta => co::COINIT_MULTITHREADED,
        };
        if self.disable_ole1dde {
            flags |= co::COINIT_DISABLE_OLE1DDE;
        }
        if self.speed_over_memory {
            flags |= co::COINIT_SPEED_OVER_MEMORY;
        }
        flags
    }

    /// Installs the log mask.
    pub fn apply(&self) {
        logger::set_log_level(self.log_level_mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LOG_LEVEL_ERROR, LOG_LEVEL_TRACE, LOG_LEVEL_WARN};

    #[test]
    fn test_parse_log_mask() {
        assert_eq!(parse_log_mask("none"), Some(0));
        assert_eq!(parse_log_mask("ALL"), Some(LOG_LEVEL_ALL));
        assert_eq!(parse_log_mask("error, trace"), Some(LOG_LEVEL_ERROR | LOG_LEVEL_TRACE));
        assert_eq!(parse_log_mask("error,bogus"), None);
        assert_eq!(parse_log_mask(""), None);
    }

    #[test]
    fn test_from_vars() {
        let config = BindingConfig::from_vars(Some("warn"), Some("MTA"));
        assert_eq!(config.log_level_mask, LOG_LEVEL_WARN);
        assert_eq!(config.apartment, Apartment::Mta);
        assert_eq!(config.coinit_flags(), co::COINIT_MULTITHREADED | co::COINIT_DISABLE_OLE1DDE);

        let fallback = BindingConfig::from_vars(Some("loud"), Some("neutral"));
        assert_eq!(fallback, BindingConfig::default());
    }

    #[test]
    fn test_default_is_sta() {
        let config = BindingConfig { disable_ole1dde: false, speed_over_memory: true, ..Default::default() };
        assert_eq!(config.coinit_flags(), co::COINIT_APARTMENTTHREADED | co::COINIT_SPEED_OVER_MEMORY);
    }
}
