//! Language codes for localized film text.
//!
//! Every request that returns localized text carries an explicit
//! [`LanguageCode`]. Lookups try the requested language first, then the
//! configured default, then the film's base text.

use std::fmt;

use serde::Serialize;

/// Language used when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A normalized primary language subtag (`"en"`, `"ru"`, `"kk"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Normalize a BCP 47-ish tag (`"kz-KZ"`, `"EN_us"`, `"ru"`) to its
    /// lowercase primary subtag. Returns `None` for anything that is not
    /// 2-3 ASCII letters.
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?;
        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        Some(Self(primary.to_ascii_lowercase()))
    }

    /// Pick the preferred language from an `Accept-Language` header value,
    /// honouring `q` weights. Wildcards and malformed entries are skipped.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                let quality = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())?;
                if quality <= 0.0 {
                    return None;
                }
                Self::parse(tag).map(|code| (code, quality, position))
            })
            .max_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.2.cmp(&a.2))
            })
            .map(|(code, _, _)| code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the best translation for `requested`, falling back to `default`.
///
/// `language_of` extracts the language code stored on each candidate.
pub fn pick_translation<'a, T, F>(
    candidates: &'a [T],
    requested: &LanguageCode,
    default: &LanguageCode,
    language_of: F,
) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    let find = |code: &LanguageCode| {
        candidates
            .iter()
            .find(|c| LanguageCode::parse(language_of(c)).as_ref() == Some(code))
    };
    find(requested).or_else(|| find(default))
}
