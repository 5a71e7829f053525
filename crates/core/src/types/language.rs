//! Supported content languages and localized date formatting.

use core::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Content language.
///
/// Pages fall back to Armenian when no valid preference is stored; the JSON
/// API falls back to English when `?lang=` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Hy,
    Ru,
}

/// Error returned when a language code is not supported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Genitive forms, as used after the day number.
const MONTHS_HY: [&str; 12] = [
    "հունվարի",
    "փետրվարի",
    "մարտի",
    "ապրիլի",
    "մայիսի",
    "հունիսի",
    "հուլիսի",
    "օգոստոսի",
    "սեպտեմբերի",
    "հոկտեմբերի",
    "նոյեմբերի",
    "դեկտեմբերի",
];

const MONTHS_RU: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

impl Language {
    /// Session key for the visitor's preferred language.
    pub const STORAGE_KEY: &'static str = "shop_language";

    /// Language used by API endpoints when `lang` is not given.
    pub const API_DEFAULT: Self = Self::En;

    pub const ALL: [Self; 3] = [Self::En, Self::Hy, Self::Ru];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hy => "hy",
            Self::Ru => "ru",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hy => "Armenian",
            Self::Ru => "Russian",
        }
    }

    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hy => "Հայերեն",
            Self::Ru => "Русский",
        }
    }

    /// Resolve a stored preference. Unknown or missing values give Armenian.
    #[must_use]
    pub fn resolve_stored(stored: Option<&str>) -> Self {
        stored.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    /// Resolve an API `lang` parameter. Unknown or missing values give English.
    #[must_use]
    pub fn resolve_api(param: Option<&str>) -> Self {
        param
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::API_DEFAULT)
    }

    /// Long date in this language, e.g. `January 5, 2025` or `5 января 2025 г.`.
    #[must_use]
    pub fn format_long_date(self, date: NaiveDate) -> String {
        let month_index = date.month0() as usize;
        let (day, year) = (date.day(), date.year());
        match self {
            Self::En => format!("{} {day}, {year}", month(&MONTHS_EN, month_index)),
            Self::Hy => format!("{day} {} {year} թ.", month(&MONTHS_HY, month_index)),
            Self::Ru => format!("{day} {} {year} г.", month(&MONTHS_RU, month_index)),
        }
    }
}

fn month(names: &'static [&'static str; 12], index: usize) -> &'static str {
    names.get(index).copied().unwrap_or_default()
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" => Ok(Self::En),
            "hy" => Ok(Self::Hy),
            "ru" => Ok(Self::Ru),
            _ => Err(UnknownLanguage(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_preference_falls_back_to_armenian() {
        assert_eq!(Language::resolve_stored(Some("ru")), Language::Ru);
        assert_eq!(Language::resolve_stored(Some("de")), Language::Hy);
        assert_eq!(Language::resolve_stored(Some("")), Language::Hy);
        assert_eq!(Language::resolve_stored(None), Language::Hy);
    }

    #[test]
    fn test_api_parameter_falls_back_to_english() {
        assert_eq!(Language::resolve_api(None), Language::En);
        assert_eq!(Language::resolve_api(Some("xx")), Language::En);
        assert_eq!(Language::resolve_api(Some("hy")), Language::Hy);
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert!("EN".parse::<Language>().is_err());
    }

    #[test]
    fn test_native_names() {
        assert_eq!(Language::Hy.native_name(), "Հայերեն");
        assert_eq!(Language::Ru.native_name(), "Русский");
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(Language::En.format_long_date(date), "January 5, 2025");
        assert_eq!(Language::Hy.format_long_date(date), "5 հունվարի 2025 թ.");
        assert_eq!(Language::Ru.format_long_date(date), "5 января 2025 г.");
    }
}
