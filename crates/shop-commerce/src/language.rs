//! Interface language preference.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use shop_cache::Cache;
use tracing::{info, warn};

use crate::error::CommerceError;

pub const LANGUAGE_KEY: &str = "language";

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Az,
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Az, Language::En, Language::Ru];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Az => "az",
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    /// Native name.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Az => "Az\u{0259}rbaycan",
            Language::En => "English",
            Language::Ru => "\u{0420}\u{0443}\u{0441}\u{0441}\u{043a}\u{0438}\u{0439}",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::Az => "\u{1f1e6}\u{1f1ff}",
            Language::En => "\u{1f1fa}\u{1f1f8}",
            Language::Ru => "\u{1f1f7}\u{1f1fa}",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "az" => Some(Language::Az),
            "en" => Some(Language::En),
            "ru" => Some(Language::Ru),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| CommerceError::UnknownLanguage(s.to_string()))
    }
}

/// Persisted language selection, stored as the raw code.
pub struct LanguageStore {
    current: Mutex<Language>,
    cache: Cache,
}

impl LanguageStore {
    /// Unknown or unreadable stored codes fall back to the default.
    pub fn open(cache: Cache) -> Self {
        let current = match cache.get_raw(LANGUAGE_KEY) {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                warn!(code, "Unknown stored language, using default");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read language preference");
                Language::default()
            }
        };
        Self {
            current: Mutex::new(current),
            cache,
        }
    }

    pub fn current(&self) -> Language {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, language: Language) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = language;
        if let Err(e) = self.cache.set_raw(LANGUAGE_KEY, language.code()) {
            warn!(error = %e, "Failed to persist language preference");
        }
        info!(language = %language, "Language changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_azerbaijani() {
        assert_eq!(LanguageStore::open(Cache::memory()).current(), Language::Az);
    }

    #[test]
    fn test_set_persists_raw_code() {
        let cache = Cache::memory();
        LanguageStore::open(cache.clone()).set(Language::Ru);
        assert_eq!(cache.get_raw(LANGUAGE_KEY).unwrap().as_deref(), Some("ru"));
        assert_eq!(LanguageStore::open(cache).current(), Language::Ru);
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let cache = Cache::memory();
        cache.set_raw(LANGUAGE_KEY, "de").unwrap();
        assert_eq!(LanguageStore::open(cache).current(), Language::Az);
        assert!("de".parse::<Language>().is_err());
    }
}
