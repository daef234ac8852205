//! String catalog with locale fallback and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: every lookup tries the requested locale
//!    and then walks the chain exactly once, returning `None` if no locale
//!    provides the key.
//!
//! 2. **Interpolation is single-pass**: `format()` replaces `{name}` tokens
//!    in one pass; substituted values are never re-scanned, so a value that
//!    itself contains `{name}` is emitted verbatim.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in any locale | Returns `None` |
//! | Missing locale | Locale not loaded | Falls through chain |
//! | Bad interpolation arg | `{name}` but no `name` arg | Token left as-is |
//! | Duplicate key | `try_insert` of an existing key | `I18nError::DuplicateKey` |

use std::collections::HashMap;

/// Locale identifier (e.g., `"tr"`, `"en"`, `"tr-TR"`).
pub type Locale = String;

/// Errors from catalog construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale tag was empty or contained characters outside `[A-Za-z0-9-]`.
    InvalidLocale(String),
    /// Duplicate key in the same locale.
    DuplicateKey { locale: String, key: String },
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(l) => write!(f, "invalid locale: {l:?}"),
            Self::DuplicateKey { locale, key } => {
                write!(f, "duplicate key '{key}' in locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// Strings for a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    /// Create an empty locale string set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a string, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Insert a string, failing if `key` is already present.
    pub fn try_insert(
        &mut self,
        locale: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), I18nError> {
        let key = key.into();
        if self.strings.contains_key(&key) {
            return Err(I18nError::DuplicateKey {
                locale: locale.to_string(),
                key,
            });
        }
        self.strings.insert(key, value.into());
        Ok(())
    }

    /// Look up a string by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the locale has no strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all keys in this locale.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }
}

/// Central string catalog with locale fallback.
///
/// # Example
///
/// ```
/// use storefront_i18n::catalog::{LocaleStrings, StringCatalog};
///
/// let mut catalog = StringCatalog::new();
///
/// let mut tr = LocaleStrings::new();
/// tr.insert("greeting", "Merhaba");
/// tr.insert("welcome", "Hoş geldin, {name}!");
/// catalog.add_locale("tr", tr).unwrap();
/// catalog.set_fallback_chain(vec!["tr".into()]);
///
/// assert_eq!(catalog.get("tr", "greeting"), Some("Merhaba"));
/// assert_eq!(
///     catalog.format("tr", "welcome", &[("name", "Ayşe")]),
///     Some("Hoş geldin, Ayşe!".into())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: HashMap<Locale, LocaleStrings>,
    fallback_chain: Vec<Locale>,
}

impl StringCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add strings for a locale, replacing any previous set for that tag.
    pub fn add_locale(
        &mut self,
        locale: impl Into<String>,
        strings: LocaleStrings,
    ) -> Result<(), I18nError> {
        let locale = locale.into();
        validate_locale(&locale)?;
        self.locales.insert(locale, strings);
        Ok(())
    }

    /// Add strings under a tag known to be well-formed.
    pub(crate) fn insert_trusted_locale(&mut self, locale: &str, strings: LocaleStrings) {
        debug_assert!(validate_locale(locale).is_ok());
        self.locales.insert(locale.to_string(), strings);
    }

    /// Set the fallback chain (tried in order when a key is missing).
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain;
    }

    /// Look up a string by key.
    ///
    /// Tries the specified locale first, then its primary language subtag
    /// (`tr-TR` → `tr`), then walks the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        if let Some(s) = self.locales.get(locale).and_then(|ls| ls.get(key)) {
            return Some(s);
        }

        if let Some((primary, _)) = locale.split_once('-')
            && let Some(s) = self.locales.get(primary).and_then(|ls| ls.get(key))
        {
            return Some(s);
        }

        self.fallback_chain
            .iter()
            .filter(|fallback| fallback.as_str() != locale)
            .find_map(|fallback| self.locales.get(fallback.as_str())?.get(key))
    }

    /// Look up a string and perform `{key}` interpolation.
    ///
    /// Each `(name, value)` pair in `args` replaces `{name}` in the
    /// template string. Tokens without matching args are left as-is.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key)
            .map(|template| interpolate(template, args))
    }

    /// All registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Find keys from `reference_keys` that are missing in `locale`
    /// (including fallback chain resolution).
    ///
    /// Returns the missing keys sorted alphabetically.
    #[must_use]
    pub fn missing_keys(&self, locale: &str, reference_keys: &[&str]) -> Vec<String> {
        let mut missing: Vec<String> = reference_keys
            .iter()
            .filter(|key| self.get(locale, key).is_none())
            .map(|key| (*key).to_string())
            .collect();
        missing.sort_unstable();
        missing
    }
}

fn validate_locale(locale: &str) -> Result<(), I18nError> {
    let valid = !locale.is_empty()
        && !locale.starts_with('-')
        && !locale.ends_with('-')
        && locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(I18nError::InvalidLocale(locale.to_string()))
    }
}

/// Single-pass `{name}` interpolation. Unmatched tokens left as-is.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }

        let mut token = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            token.push(c);
        }

        if !found_close {
            result.push('{');
            result.push_str(&token);
            continue;
        }

        match args.iter().find(|&&(name, _)| name == token) {
            Some(&(_, value)) => result.push_str(value),
            None => {
                result.push('{');
                result.push_str(&token);
                result.push('}');
            }
        }
    }

    result
}
