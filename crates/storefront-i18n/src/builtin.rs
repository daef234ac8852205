//! Built-in user-facing messages.
//!
//! Turkish is the page's language; English exists so a misconfigured locale
//! still yields a readable alert instead of a raw key.

use crate::catalog::{LocaleStrings, StringCatalog};

/// Keys of every user-facing message the page controllers emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Submit pressed with no star selected.
    RatingRequired,
    /// Submit pressed while the modal has no order attached.
    ReviewMissingProduct,
    /// Rate button pressed in a row that carries no order id.
    OrderContextMissing,
    /// Review accepted by the server.
    ReviewSubmitted,
    /// Review rejected; takes `{status}` and `{body}`.
    ReviewRejected,
    /// Stand-in for an empty error body.
    ServerErrorFallback,
    /// Review request never completed.
    ReviewNetworkError,
}

impl MessageKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::RatingRequired,
        Self::ReviewMissingProduct,
        Self::OrderContextMissing,
        Self::ReviewSubmitted,
        Self::ReviewRejected,
        Self::ServerErrorFallback,
        Self::ReviewNetworkError,
    ];

    /// Catalog key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RatingRequired => "review.rating_required",
            Self::ReviewMissingProduct => "review.missing_product",
            Self::OrderContextMissing => "review.order_context_missing",
            Self::ReviewSubmitted => "review.submitted",
            Self::ReviewRejected => "review.rejected",
            Self::ServerErrorFallback => "review.server_error",
            Self::ReviewNetworkError => "review.network_error",
        }
    }
}

const TR: &[(MessageKey, &str)] = &[
    (
        MessageKey::RatingRequired,
        "Lütfen bir yıldız derecelendirmesi seçin!",
    ),
    (
        MessageKey::ReviewMissingProduct,
        "Değerlendirme gönderilemiyor: Ürün bilgisi eksik.",
    ),
    (
        MessageKey::OrderContextMissing,
        "Ürün değerlendirilemiyor: Sipariş bilgisi eksik.",
    ),
    (
        MessageKey::ReviewSubmitted,
        "Değerlendirmeniz başarıyla gönderildi!",
    ),
    (
        MessageKey::ReviewRejected,
        "Değerlendirme gönderilemedi: {status} - {body}",
    ),
    (MessageKey::ServerErrorFallback, "Sunucu hatası"),
    (
        MessageKey::ReviewNetworkError,
        "Değerlendirme gönderilirken bir ağ hatası oluştu. Lütfen internet bağlantınızı kontrol edin.",
    ),
];

const EN: &[(MessageKey, &str)] = &[
    (MessageKey::RatingRequired, "Please select a star rating!"),
    (
        MessageKey::ReviewMissingProduct,
        "Cannot submit review: product information is missing.",
    ),
    (
        MessageKey::OrderContextMissing,
        "Cannot rate product: order information is missing.",
    ),
    (
        MessageKey::ReviewSubmitted,
        "Your review was submitted successfully!",
    ),
    (
        MessageKey::ReviewRejected,
        "Review could not be submitted: {status} - {body}",
    ),
    (MessageKey::ServerErrorFallback, "Server error"),
    (
        MessageKey::ReviewNetworkError,
        "A network error occurred while submitting your review. Please check your internet connection.",
    ),
];

fn locale_strings(entries: &[(MessageKey, &str)]) -> LocaleStrings {
    let mut strings = LocaleStrings::new();
    for &(key, text) in entries {
        strings.insert(key.as_str(), text);
    }
    strings
}

/// Catalog with the built-in `tr` and `en` sets, falling back `tr` → `en`.
#[must_use]
pub fn builtin_catalog() -> StringCatalog {
    let mut catalog = StringCatalog::new();
    catalog.insert_trusted_locale("tr", locale_strings(TR));
    catalog.insert_trusted_locale("en", locale_strings(EN));
    catalog.set_fallback_chain(vec!["tr".into(), "en".into()]);
    catalog
}
