//! The storefront page as a single [`Model`].
//!
//! [`PageModel`] composes the search, autocomplete, tab and review
//! controllers. The host speaks [`PageEvent`]; timers and request
//! completions come back as [`PageMsg`] variants the host never builds.

use tracing::{debug, warn};

use crate::autocomplete::{ApplyOutcome, AutocompleteController, SuggestionPanel};
use crate::config::StorefrontConfig;
use crate::error::ReviewRejection;
use crate::http::FetchResult;
use crate::messages::Messages;
use crate::program::{Cmd, Model};
use crate::review::{ModalView, OrderContext, ReviewModalController, SubmitOutcome};
use crate::runner::PageRunner;
use crate::search::{SearchBox, SearchController, SearchWidget};
use crate::tabs::{TabId, TabSwitch, TabSwitcher};
use storefront_i18n::MessageKey;

/// Input from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// DOM ready. `tabs` lists every tab with a trigger on the page.
    Loaded { hash: String, tabs: Vec<TabId> },
    /// The text of a search input changed.
    SearchInput { widget: SearchWidget, value: String },
    /// Enter pressed in a search input. Carries both inputs' current text,
    /// which may have been filled by the server or restored by the browser.
    SearchEnter {
        widget: SearchWidget,
        desktop: String,
        mobile: String,
    },
    /// Row `index` of a suggestion panel clicked.
    SuggestionClicked { widget: SearchWidget, index: usize },
    /// Any click on the document.
    DocumentClick { inside_search: bool },
    /// A tab trigger clicked.
    TabClicked { tab: TabId },
    /// A rate button clicked; `order` is `None` if its row had no order id.
    RateClicked { order: Option<OrderContext> },
    StarHover { star: u8 },
    StarLeave,
    StarClick { star: u8 },
    CommentInput { text: String },
    /// Close or cancel button.
    CloseModal,
    /// Click inside the overlay; `on_overlay` is true only when the overlay
    /// itself was the target.
    OverlayClick { on_overlay: bool },
    SubmitReview,
}

/// Everything [`PageModel::update`] reacts to.
#[derive(Debug)]
pub enum PageMsg {
    Event(PageEvent),
    /// The debounce window for `widget` closed with `query` as the latest
    /// value.
    DebounceElapsed { widget: SearchWidget, query: String },
    SuggestionsArrived {
        widget: SearchWidget,
        generation: u64,
        result: FetchResult,
    },
    ReviewSettled(FetchResult),
}

impl From<PageEvent> for PageMsg {
    fn from(event: PageEvent) -> Self {
        Self::Event(event)
    }
}

/// Snapshot of everything the page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub inputs: SearchBox,
    /// Indexed by [`SearchWidget::index`].
    pub suggestions: [SuggestionPanel; 2],
    pub active_tab: Option<TabId>,
    pub modal: ModalView,
}

impl PageView {
    #[must_use]
    pub fn panel(&self, widget: SearchWidget) -> &SuggestionPanel {
        &self.suggestions[widget.index()]
    }
}

/// Page state.
#[derive(Debug, Clone)]
pub struct PageModel {
    search: SearchController,
    autocomplete: AutocompleteController,
    tabs: TabSwitcher,
    review: ReviewModalController,
    messages: Messages,
}

impl PageModel {
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            search: SearchController::new(config),
            autocomplete: AutocompleteController::new(config),
            tabs: TabSwitcher::new(),
            review: ReviewModalController::new(config),
            messages: Messages::new(config.locale.clone()),
        }
    }

    /// An initialized runner around a fresh page.
    #[must_use]
    pub fn runner(config: &StorefrontConfig) -> PageRunner<Self> {
        let mut runner = PageRunner::new(Self::new(config));
        runner.init();
        runner
    }

    #[must_use]
    pub fn search(&self) -> &SearchController {
        &self.search
    }

    #[must_use]
    pub fn autocomplete(&self) -> &AutocompleteController {
        &self.autocomplete
    }

    #[must_use]
    pub fn tabs(&self) -> &TabSwitcher {
        &self.tabs
    }

    #[must_use]
    pub fn review(&self) -> &ReviewModalController {
        &self.review
    }

    pub fn review_mut(&mut self) -> &mut ReviewModalController {
        &mut self.review
    }

    fn handle_event(&mut self, event: PageEvent) -> Cmd<PageMsg> {
        match event {
            PageEvent::Loaded { hash, tabs } => {
                self.tabs.set_known(tabs);
                match self.tabs.restore_from_hash(&hash) {
                    Some(switch) => tab_cmd(switch),
                    None => Cmd::none(),
                }
            }
            PageEvent::SearchInput { widget, value } => {
                self.search.input(widget, value.clone());
                Cmd::debounce(
                    self.autocomplete.debounce_slot(widget),
                    self.autocomplete.delay(),
                    PageMsg::DebounceElapsed {
                        widget,
                        query: value,
                    },
                )
            }
            PageEvent::SearchEnter {
                widget,
                desktop,
                mobile,
            } => {
                debug!(%widget, "enter pressed");
                self.search.input(SearchWidget::Desktop, desktop);
                self.search.input(SearchWidget::Mobile, mobile);
                let url = self.search.search();
                self.navigate(url)
            }
            PageEvent::SuggestionClicked { widget, index } => {
                let Some(text) = self.autocomplete.suggestion(widget, index).map(str::to_owned)
                else {
                    warn!(%widget, index, "click on a suggestion row that no longer exists");
                    return Cmd::none();
                };
                self.autocomplete.hide_all();
                let url = self.search.accept(&text);
                self.navigate(url)
            }
            PageEvent::DocumentClick { inside_search } => {
                if !inside_search {
                    self.autocomplete.hide_all();
                }
                Cmd::none()
            }
            PageEvent::TabClicked { tab } => tab_cmd(self.tabs.switch_to(tab)),
            PageEvent::RateClicked { order } => match self.review.open_from_row(order) {
                Ok(()) => Cmd::none(),
                Err(rejection) => self.rejection_cmd(rejection),
            },
            PageEvent::StarHover { star } => {
                self.review.hover(star);
                Cmd::none()
            }
            PageEvent::StarLeave => {
                self.review.leave();
                Cmd::none()
            }
            PageEvent::StarClick { star } => {
                self.review.click(star);
                Cmd::none()
            }
            PageEvent::CommentInput { text } => {
                self.review.set_comment(text);
                Cmd::none()
            }
            PageEvent::CloseModal => {
                self.review.close();
                Cmd::none()
            }
            PageEvent::OverlayClick { on_overlay } => {
                if on_overlay {
                    self.review.close();
                }
                Cmd::none()
            }
            PageEvent::SubmitReview => match self.review.begin_submit() {
                Ok(Some(request)) => Cmd::fetch(request, PageMsg::ReviewSettled),
                Ok(None) => Cmd::none(),
                Err(rejection) => self.rejection_cmd(rejection),
            },
        }
    }

    /// Navigate away, dropping any keystrokes still waiting for a fetch.
    fn navigate(&self, url: String) -> Cmd<PageMsg> {
        let mut cmds: Vec<Cmd<PageMsg>> = SearchWidget::ALL
            .iter()
            .map(|w| Cmd::CancelTimer(self.autocomplete.debounce_slot(*w)))
            .collect();
        cmds.push(Cmd::navigate(url));
        Cmd::batch(cmds)
    }

    fn rejection_cmd(&self, rejection: ReviewRejection) -> Cmd<PageMsg> {
        match rejection {
            ReviewRejection::MissingRating => {
                Cmd::alert(self.messages.text(MessageKey::RatingRequired))
            }
            ReviewRejection::MissingOrder => Cmd::batch(vec![
                Cmd::log(rejection.to_string()),
                Cmd::alert(self.messages.text(MessageKey::ReviewMissingProduct)),
            ]),
            ReviewRejection::MissingOrderContext => Cmd::batch(vec![
                Cmd::log(rejection.to_string()),
                Cmd::alert(self.messages.text(MessageKey::OrderContextMissing)),
            ]),
        }
    }

    fn settle_review(&mut self, result: FetchResult) -> Cmd<PageMsg> {
        match self.review.finish_submit(result) {
            SubmitOutcome::Accepted => Cmd::alert(self.messages.text(MessageKey::ReviewSubmitted)),
            SubmitOutcome::Rejected { status, body } => {
                let shown = if body.is_empty() {
                    self.messages.text(MessageKey::ServerErrorFallback)
                } else {
                    body.clone()
                };
                let status_text = status.to_string();
                Cmd::batch(vec![
                    Cmd::log(format!("review submission failed: {status} {body}")),
                    Cmd::alert(self.messages.format(
                        MessageKey::ReviewRejected,
                        &[("status", status_text.as_str()), ("body", shown.as_str())],
                    )),
                ])
            }
            SubmitOutcome::Failed(err) => Cmd::batch(vec![
                Cmd::log(format!("review submission network error: {err}")),
                Cmd::alert(self.messages.text(MessageKey::ReviewNetworkError)),
            ]),
        }
    }
}

fn tab_cmd(switch: TabSwitch) -> Cmd<PageMsg> {
    Cmd::batch(vec![Cmd::HideMobileMenu, Cmd::SetHash(switch.hash)])
}

impl Model for PageModel {
    type Event = PageEvent;
    type Message = PageMsg;
    type View = PageView;

    fn update(&mut self, msg: PageMsg) -> Cmd<PageMsg> {
        match msg {
            PageMsg::Event(event) => self.handle_event(event),
            PageMsg::DebounceElapsed { widget, query } => {
                match self.autocomplete.begin(widget, &query) {
                    Some(req) => {
                        let generation = req.generation;
                        Cmd::fetch(req.request, move |result| PageMsg::SuggestionsArrived {
                            widget,
                            generation,
                            result,
                        })
                    }
                    None => Cmd::none(),
                }
            }
            PageMsg::SuggestionsArrived {
                widget,
                generation,
                result,
            } => match self.autocomplete.apply_response(widget, generation, result) {
                ApplyOutcome::Failed(err) => {
                    Cmd::log(format!("error fetching autocomplete suggestions: {err}"))
                }
                ApplyOutcome::Shown(_) | ApplyOutcome::Hidden | ApplyOutcome::Stale => Cmd::none(),
            },
            PageMsg::ReviewSettled(result) => self.settle_review(result),
        }
    }

    fn view(&self) -> PageView {
        PageView {
            inputs: self.search.inputs().clone(),
            suggestions: [
                self.autocomplete.panel(SearchWidget::Desktop).clone(),
                self.autocomplete.panel(SearchWidget::Mobile).clone(),
            ],
            active_tab: self.tabs.active().cloned(),
            modal: self.review.view(),
        }
    }
}
