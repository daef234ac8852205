//! User-facing text lookup for the configured locale.

use storefront_i18n::{MessageKey, StringCatalog, builtin_catalog};

/// Resolves [`MessageKey`]s against the built-in catalog.
#[derive(Debug, Clone)]
pub struct Messages {
    catalog: StringCatalog,
    locale: String,
}

impl Messages {
    /// Messages for `locale`, falling back through the built-in chain.
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self::with_catalog(builtin_catalog(), locale)
    }

    /// Messages backed by a custom catalog.
    #[must_use]
    pub fn with_catalog(catalog: StringCatalog, locale: impl Into<String>) -> Self {
        Self {
            catalog,
            locale: locale.into(),
        }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Text for `key`. A key missing from every locale yields the key itself.
    #[must_use]
    pub fn text(&self, key: MessageKey) -> String {
        self.catalog
            .get(&self.locale, key.as_str())
            .map_or_else(|| key.as_str().to_owned(), str::to_owned)
    }

    /// Text for `key` with `{name}` placeholders filled from `args`.
    #[must_use]
    pub fn format(&self, key: MessageKey, args: &[(&str, &str)]) -> String {
        self.catalog
            .format(&self.locale, key.as_str(), args)
            .unwrap_or_else(|| key.as_str().to_owned())
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new("tr")
    }
}
