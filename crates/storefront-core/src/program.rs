//! Elm-style model/update/view contract for the page controllers.
//!
//! A [`Model`] owns all page state. The host turns DOM events into
//! `Model::Event`s, the model answers each message with a [`Cmd`] describing
//! side effects, and the [`PageRunner`](crate::runner::PageRunner) carries
//! those effects out (or hands them to the host). Nothing in a model touches
//! the DOM, the network, or a clock directly.
//!
//! # Example
//!
//! ```
//! use storefront_core::program::{Cmd, Model};
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//! }
//!
//! impl From<()> for Msg {
//!     fn from(_: ()) -> Self {
//!         Msg::Increment
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Event = ();
//!     type Message = Msg;
//!     type View = i32;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => {
//!                 self.count += 1;
//!                 Cmd::log(format!("count={}", self.count))
//!             }
//!         }
//!     }
//!
//!     fn view(&self) -> i32 {
//!         self.count
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use crate::http::{FetchResult, HttpRequest};

/// Application state and behavior.
pub trait Model: Sized {
    /// Host-originated input (clicks, keystrokes, page load).
    type Event;

    /// Messages the model reacts to. Host events convert into messages;
    /// timers and fetch completions deliver messages directly.
    type Message: From<Self::Event>;

    /// Snapshot the host renders.
    type View;

    /// Startup commands. Called once, before any event.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Core state transition. Returns the side effects to perform.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Current state as a renderable snapshot.
    fn view(&self) -> Self::View;
}

/// Name of a single-slot timer. Arming a slot replaces its pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerSlot(pub &'static str);

impl fmt::Display for TimerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifier the runner assigns to each outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchId(pub u64);

impl fmt::Display for FetchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch#{}", self.0)
    }
}

/// Continuation invoked with the outcome of a request.
pub type FetchCallback<M> = Box<dyn FnOnce(FetchResult) -> M>;

/// Side effects requested by a model.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Execute several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Feed a message straight back into `update`.
    Msg(M),
    /// Write a line to the developer console. Never shown to the end user.
    Log(String),
    /// Full-page navigation.
    Navigate(String),
    /// Replace the location hash (adds a history entry).
    SetHash(String),
    /// Blocking user-facing alert.
    Alert(String),
    /// Hide the mobile navigation menu.
    HideMobileMenu,
    /// Perform a request; the outcome is mapped to a message.
    Fetch {
        request: HttpRequest,
        on_complete: FetchCallback<M>,
    },
    /// Deliver `msg` after `delay`, replacing any pending timer in `slot`.
    Debounce {
        slot: TimerSlot,
        delay: Duration,
        msg: M,
    },
    /// Drop the pending timer in a slot, if any.
    CancelTimer(TimerSlot),
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Navigate(url) => f.debug_tuple("Navigate").field(url).finish(),
            Self::SetHash(hash) => f.debug_tuple("SetHash").field(hash).finish(),
            Self::Alert(text) => f.debug_tuple("Alert").field(text).finish(),
            Self::HideMobileMenu => write!(f, "HideMobileMenu"),
            Self::Fetch { request, .. } => f
                .debug_struct("Fetch")
                .field("request", request)
                .finish_non_exhaustive(),
            Self::Debounce { slot, delay, msg } => f
                .debug_struct("Debounce")
                .field("slot", slot)
                .field("delay", delay)
                .field("msg", msg)
                .finish(),
            Self::CancelTimer(slot) => f.debug_tuple("CancelTimer").field(slot).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a console log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a user-facing alert command.
    #[inline]
    pub fn alert(text: impl Into<String>) -> Self {
        Self::Alert(text.into())
    }

    /// Create a navigation command.
    #[inline]
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::Navigate(url.into())
    }

    /// Create a fetch command.
    pub fn fetch<F>(request: HttpRequest, on_complete: F) -> Self
    where
        F: FnOnce(FetchResult) -> M + 'static,
    {
        Self::Fetch {
            request,
            on_complete: Box::new(on_complete),
        }
    }

    /// Create a debounce command.
    #[inline]
    pub fn debounce(slot: TimerSlot, delay: Duration, msg: M) -> Self {
        Self::Debounce { slot, delay, msg }
    }

    /// Create a batch of commands, flattening trivial cases.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Whether this command does nothing.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
