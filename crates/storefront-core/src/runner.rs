//! Step-based program runner driven by the browser host.
//!
//! [`PageRunner`] drives a [`Model`] without threads, blocking waits, or
//! direct I/O. The host delivers events, advances the clock, performs the
//! effects the runner hands out, and reports request outcomes back:
//!
//! ```text
//! DOM event
//!   → dispatch(event, now)      // fire overdue timers, then update the model
//!   → take_effects()            // navigate / alert / fetch / set hash
//!   → view()                    // if dirty: snapshot to apply to the DOM
//! setTimeout(next_deadline())
//!   → step(now)                 // fire due debounce timers
//! fetch settles
//!   → complete_fetch(id, result)
//! ```
//!
//! All timing comes from the host's monotonic clock, so replaying the same
//! sequence of calls produces identical effects and views.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::debounce::Debouncer;
use crate::http::{FetchResult, HttpRequest};
use crate::program::{Cmd, FetchCallback, FetchId, Model, TimerSlot};

/// Effect the host must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Full-page navigation to a URL.
    Navigate(String),
    /// Replace the location hash.
    SetHash(String),
    /// Blocking user-facing alert.
    Alert(String),
    /// Hide the mobile navigation menu.
    HideMobileMenu,
    /// Perform a request and report back with
    /// [`PageRunner::complete_fetch`].
    Fetch { id: FetchId, request: HttpRequest },
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepResult {
    /// Host events processed.
    pub events_processed: u32,
    /// Debounce timers that fired.
    pub timers_fired: u32,
    /// Whether the view needs re-rendering.
    pub dirty: bool,
}

/// Host-driven runner for a [`Model`].
pub struct PageRunner<M: Model> {
    model: M,
    initialized: bool,
    dirty: bool,

    /// Latest host timestamp. Never moves backwards.
    now: Duration,

    event_queue: VecDeque<M::Event>,
    timers: Debouncer<TimerSlot, M::Message>,
    in_flight: HashMap<FetchId, FetchCallback<M::Message>>,
    next_fetch_id: u64,

    effects: Vec<Effect>,
    logs: Vec<String>,
}

impl<M: Model> PageRunner<M> {
    /// Create a runner. The model is not initialized until
    /// [`init`](Self::init) is called.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            initialized: false,
            dirty: true,
            now: Duration::ZERO,
            event_queue: VecDeque::new(),
            timers: Debouncer::new(),
            in_flight: HashMap::new(),
            next_fetch_id: 0,
            effects: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Run `Model::init`. Call exactly once; later calls are ignored.
    pub fn init(&mut self) -> StepResult {
        if self.initialized {
            return StepResult::default();
        }
        self.initialized = true;
        self.dirty = true;
        let cmd = self.model.init();
        self.execute_cmd(cmd);
        StepResult {
            dirty: true,
            ..Default::default()
        }
    }

    // -- Event delivery -----------------------------------------------------

    /// Buffer an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: M::Event) {
        self.event_queue.push_back(event);
    }

    /// Buffer several events for the next [`step`](Self::step).
    pub fn push_events(&mut self, events: impl IntoIterator<Item = M::Event>) {
        self.event_queue.extend(events);
    }

    // -- Step ---------------------------------------------------------------

    /// Advance the clock to `now`, fire due timers, then drain buffered
    /// events.
    pub fn step(&mut self, now: Duration) -> StepResult {
        if !self.initialized {
            return StepResult::default();
        }
        let mut result = StepResult::default();
        self.advance_clock(now, &mut result);
        while let Some(event) = self.event_queue.pop_front() {
            self.handle_message(M::Message::from(event));
            result.events_processed += 1;
        }
        result.dirty = self.dirty;
        result
    }

    /// Process one event immediately at the current clock.
    pub fn step_event(&mut self, event: M::Event) -> StepResult {
        if !self.initialized {
            return StepResult::default();
        }
        self.handle_message(M::Message::from(event));
        StepResult {
            events_processed: 1,
            timers_fired: 0,
            dirty: self.dirty,
        }
    }

    /// Advance the clock to `now` (firing overdue timers first), then
    /// process `event`.
    pub fn dispatch(&mut self, event: M::Event, now: Duration) -> StepResult {
        if !self.initialized {
            return StepResult::default();
        }
        let mut result = StepResult::default();
        self.advance_clock(now, &mut result);
        self.handle_message(M::Message::from(event));
        result.events_processed = 1;
        result.dirty = self.dirty;
        result
    }

    /// Report the outcome of a request handed out as [`Effect::Fetch`].
    ///
    /// Returns `false` for ids that are unknown or already completed.
    pub fn complete_fetch(&mut self, id: FetchId, result: FetchResult) -> bool {
        let Some(on_complete) = self.in_flight.remove(&id) else {
            warn!(%id, "completion for unknown request ignored");
            return false;
        };
        debug!(%id, ok = result.is_ok(), "request settled");
        self.handle_message(on_complete(result));
        true
    }

    // -- Outputs ------------------------------------------------------------

    /// Drain effects accumulated since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Effects accumulated since the last [`take_effects`](Self::take_effects).
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Drain and return accumulated console lines.
    pub fn drain_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    /// Accumulated console lines.
    #[must_use]
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Snapshot the view if anything changed since the last snapshot.
    pub fn view(&mut self) -> Option<M::View> {
        if !self.dirty {
            return None;
        }
        Some(self.force_view())
    }

    /// Snapshot the view unconditionally and mark it clean.
    pub fn force_view(&mut self) -> M::View {
        self.dirty = false;
        self.model.view()
    }

    // -- Accessors ----------------------------------------------------------

    /// Absolute time at which the next timer fires.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Time left until the next timer fires, relative to `now`.
    #[must_use]
    pub fn time_until_next(&self, now: Duration) -> Option<Duration> {
        self.timers.time_until_next(now.max(self.now))
    }

    /// Latest clock value seen.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Whether `slot` has a pending timer.
    #[must_use]
    pub fn is_timer_pending(&self, slot: TimerSlot) -> bool {
        self.timers.is_pending(&slot)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending_len()
    }

    /// Number of requests awaiting completion.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    /// Whether the view needs rendering.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether `init()` has been called.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Reference to the model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable reference to the model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    // -- Internal -----------------------------------------------------------

    fn advance_clock(&mut self, now: Duration, result: &mut StepResult) {
        self.now = self.now.max(now);
        for (slot, msg) in self.timers.fire_due(self.now) {
            trace!(%slot, now_ms = self.now.as_millis(), "timer fired");
            result.timers_fired += 1;
            self.handle_message(msg);
        }
    }

    fn handle_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd);
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Msg(m) => self.handle_message(m),
            Cmd::Log(text) => self.logs.push(text),
            Cmd::Navigate(url) => self.effects.push(Effect::Navigate(url)),
            Cmd::SetHash(hash) => self.effects.push(Effect::SetHash(hash)),
            Cmd::Alert(text) => self.effects.push(Effect::Alert(text)),
            Cmd::HideMobileMenu => self.effects.push(Effect::HideMobileMenu),
            Cmd::Fetch {
                request,
                on_complete,
            } => {
                self.next_fetch_id += 1;
                let id = FetchId(self.next_fetch_id);
                debug!(%id, method = request.method.as_str(), url = %request.url, "request issued");
                self.in_flight.insert(id, on_complete);
                self.effects.push(Effect::Fetch { id, request });
            }
            Cmd::Debounce { slot, delay, msg } => {
                if self.timers.arm_at(slot, msg, self.now, delay).is_some() {
                    trace!(%slot, "pending timer replaced");
                }
            }
            Cmd::CancelTimer(slot) => {
                self.timers.cancel(&slot);
            }
        }
    }
}
