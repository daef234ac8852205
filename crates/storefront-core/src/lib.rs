#![forbid(unsafe_code)]

//! Platform-independent controllers for the storefront page.
//!
//! The page is one [`PageModel`] driven by a [`PageRunner`]. The host (the
//! `storefront-web` crate in the browser, plain function calls in tests)
//! feeds [`PageEvent`]s and a monotonic clock in, performs the [`Effect`]s
//! that come out, and paints [`PageView`] snapshots. Nothing here touches
//! the DOM, the network or a wall clock.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use storefront_core::{Effect, PageEvent, PageModel, SearchWidget, StorefrontConfig};
//!
//! let mut runner = PageModel::runner(&StorefrontConfig::default());
//! runner.dispatch(
//!     PageEvent::SearchInput { widget: SearchWidget::Desktop, value: "lap".into() },
//!     Duration::ZERO,
//! );
//! runner.step(Duration::from_millis(300));
//!
//! let effects = runner.take_effects();
//! assert!(matches!(&effects[..], [Effect::Fetch { request, .. }] if request.url == "/autocomplete?q=lap"));
//! ```

pub mod autocomplete;
pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod messages;
pub mod page;
pub mod program;
pub mod review;
pub mod runner;
pub mod search;
pub mod tabs;
pub mod url;

pub use autocomplete::{ApplyOutcome, AutocompleteController, Suggestion, SuggestionPanel};
pub use config::{DebounceScope, ElementIds, StorefrontConfig};
pub use error::{ConfigError, FetchError, ReviewRejection};
pub use http::{FetchResult, HttpRequest, HttpResponse, Method};
pub use messages::Messages;
pub use page::{PageEvent, PageModel, PageMsg, PageView};
pub use program::{Cmd, FetchId, Model, TimerSlot};
pub use review::{ModalState, ModalView, OrderContext, ReviewModalController, StarRating};
pub use runner::{Effect, PageRunner, StepResult};
pub use search::{SearchBox, SearchController, SearchWidget};
pub use tabs::{TabId, TabSwitcher};
