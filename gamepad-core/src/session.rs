//! Host session state machine.
//!
//! Tracks the lifecycle of one host attachment and whether a report is in
//! flight. Transport events arrive from an interrupt-like context while the
//! foreground loop checks and claims the state, so the shared variant keeps
//! it behind an `embassy-sync` blocking mutex.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Connection state as seen by the report pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No host, or the host has not configured the device yet.
    #[default]
    NotConfigured,
    /// Connected and ready to accept the next report.
    Idle,
    /// Bus suspended by the host.
    Suspended,
    /// A report has been handed to the transport and is in flight.
    Sending,
}

/// Events delivered by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// Host connected and configured the device.
    Connected,
    /// Host went away.
    Disconnected,
    /// Host suspended the bus.
    Suspend,
    /// Host resumed signalling on the bus.
    Resume,
    /// The last report handed to the transport has been sent.
    TransmissionComplete,
}

/// Outcome of applying one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
    /// The activity indicator should be switched off.
    pub clear_activity: bool,
}

impl Transition {
    /// True if the event moved the machine to a different state.
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Session state machine value.
///
/// `handle` is a pure transition function; see [`SharedSession`] for the
/// variant shared between the foreground and the event context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
}

impl Session {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::NotConfigured,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Apply a transport event.
    ///
    /// A resume always lands in Idle, whatever the bus was doing before.
    /// Other events that make no sense in the current state (a completion
    /// while nothing is in flight, a suspend before configuration) leave it
    /// unchanged.
    pub fn handle(&mut self, event: SessionEvent) -> Transition {
        use SessionEvent as E;
        use SessionState as S;

        let from = self.state;
        let to = match (from, event) {
            (_, E::Connected) => S::Idle,
            (_, E::Disconnected) => S::NotConfigured,
            (S::Idle | S::Sending, E::Suspend) => S::Suspended,
            (_, E::Resume) => S::Idle,
            (S::Sending, E::TransmissionComplete) => S::Idle,
            (state, _) => state,
        };
        self.state = to;

        let clear_activity = matches!(
            event,
            E::TransmissionComplete | E::Resume | E::Suspend
        );

        Transition {
            from,
            to,
            clear_activity,
        }
    }

    /// Claim the session for one transmission: Idle -> Sending.
    ///
    /// Returns false (and changes nothing) unless the session is Idle.
    pub fn try_begin_send(&mut self) -> bool {
        if self.state == SessionState::Idle {
            self.state = SessionState::Sending;
            true
        } else {
            false
        }
    }

    /// Give back a claim whose report the transport refused: Sending -> Idle.
    ///
    /// If an event moved the session on in the meantime it is left alone.
    pub fn abort_send(&mut self) {
        if self.state == SessionState::Sending {
            self.state = SessionState::Idle;
        }
    }
}

/// [`Session`] shared between the foreground loop and the event context.
///
/// Each operation is a single scoped `lock`, so a read-modify-write can
/// never interleave with an event. With `CriticalSectionRawMutex` the lock
/// disables interrupts for the duration of the closure.
///
/// Events that ask for the activity indicator to be cleared latch a flag
/// that the foreground collects with [`take_clear_activity`](Self::take_clear_activity),
/// since the indicator itself is owned by the foreground.
pub struct SharedSession<M: RawMutex> {
    inner: Mutex<M, Cell<Shared>>,
}

#[derive(Clone, Copy)]
struct Shared {
    session: Session,
    clear_activity: bool,
}

impl<M: RawMutex> SharedSession<M> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(Shared {
                session: Session::new(),
                clear_activity: false,
            })),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.inner.lock(|cell| cell.get().session.state())
    }

    /// Apply a transport event. Called from the event context.
    pub fn dispatch(&self, event: SessionEvent) -> Transition {
        let transition = self.update(|shared| {
            let transition = shared.session.handle(event);
            shared.clear_activity |= transition.clear_activity;
            transition
        });
        if transition.changed() {
            debug!(
                "Session {:?} -> {:?} on {:?}",
                transition.from, transition.to, event
            );
        }
        transition
    }

    /// Atomically claim the session for a transmission. See [`Session::try_begin_send`].
    pub fn try_begin_send(&self) -> bool {
        self.update(|shared| shared.session.try_begin_send())
    }

    /// Release a refused claim. See [`Session::abort_send`].
    pub fn abort_send(&self) {
        self.update(|shared| shared.session.abort_send());
    }

    /// Return and reset the pending "clear activity indicator" request.
    pub fn take_clear_activity(&self) -> bool {
        self.update(|shared| core::mem::take(&mut shared.clear_activity))
    }

    fn update<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        self.inner.lock(|cell| {
            let mut shared = cell.get();
            let result = f(&mut shared);
            cell.set(shared);
            result
        })
    }
}

impl<M: RawMutex> Default for SharedSession<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    const ALL_STATES: [SessionState; 4] = [
        SessionState::NotConfigured,
        SessionState::Idle,
        SessionState::Suspended,
        SessionState::Sending,
    ];

    fn session_in(state: SessionState) -> Session {
        let mut session = Session::new();
        match state {
            SessionState::NotConfigured => {}
            SessionState::Idle => {
                let _ = session.handle(SessionEvent::Connected);
            }
            SessionState::Suspended => {
                let _ = session.handle(SessionEvent::Connected);
                let _ = session.handle(SessionEvent::Suspend);
            }
            SessionState::Sending => {
                let _ = session.handle(SessionEvent::Connected);
                assert!(session.try_begin_send());
            }
        }
        assert_eq!(session.state(), state);
        session
    }

    #[test]
    fn test_initial_state_not_configured() {
        assert_eq!(Session::new().state(), SessionState::NotConfigured);
        assert_eq!(Session::default().state(), SessionState::NotConfigured);
    }

    #[test]
    fn test_connect_enters_idle() {
        let mut session = Session::new();
        let t = session.handle(SessionEvent::Connected);
        assert_eq!(t.from, SessionState::NotConfigured);
        assert_eq!(t.to, SessionState::Idle);
        assert!(!t.clear_activity);
    }

    #[test]
    fn test_disconnect_from_any_state() {
        for state in ALL_STATES {
            let mut session = session_in(state);
            let t = session.handle(SessionEvent::Disconnected);
            assert_eq!(t.to, SessionState::NotConfigured);
        }
    }

    #[test]
    fn test_suspend_and_resume() {
        for state in [SessionState::Idle, SessionState::Sending] {
            let mut session = session_in(state);
            let t = session.handle(SessionEvent::Suspend);
            assert_eq!(t.to, SessionState::Suspended);
            assert!(t.clear_activity);

            let t = session.handle(SessionEvent::Resume);
            assert_eq!(t.to, SessionState::Idle);
            assert!(t.clear_activity);
        }
    }

    #[test]
    fn test_resume_enters_idle_from_any_state() {
        for state in ALL_STATES {
            let mut session = session_in(state);
            let t = session.handle(SessionEvent::Resume);
            assert_eq!(t.from, state);
            assert_eq!(t.to, SessionState::Idle);
            assert!(t.clear_activity);
        }
    }

    #[test]
    fn test_resume_while_sending_frees_the_claim() {
        let mut session = session_in(SessionState::Sending);
        let _ = session.handle(SessionEvent::Resume);
        assert!(session.try_begin_send());
    }

    #[test]
    fn test_suspend_ignored_when_not_configured() {
        let mut session = Session::new();
        let t = session.handle(SessionEvent::Suspend);
        assert!(!t.changed());
        assert_eq!(session.state(), SessionState::NotConfigured);
    }

    #[test]
    fn test_transmission_complete_returns_to_idle() {
        let mut session = session_in(SessionState::Sending);
        let t = session.handle(SessionEvent::TransmissionComplete);
        assert_eq!(t.to, SessionState::Idle);
        assert!(t.clear_activity);
    }

    #[test]
    fn test_stray_completion_does_not_resume() {
        let mut session = session_in(SessionState::Suspended);
        let t = session.handle(SessionEvent::TransmissionComplete);
        assert_eq!(t.to, SessionState::Suspended);
    }

    #[test]
    fn test_send_claim_only_from_idle() {
        for state in ALL_STATES {
            let mut session = session_in(state);
            let claimed = session.try_begin_send();
            assert_eq!(claimed, state == SessionState::Idle);
            if claimed {
                assert_eq!(session.state(), SessionState::Sending);
            } else {
                assert_eq!(session.state(), state);
            }
        }
    }

    #[test]
    fn test_single_report_in_flight() {
        let mut session = session_in(SessionState::Idle);
        assert!(session.try_begin_send());
        assert!(!session.try_begin_send());
        let _ = session.handle(SessionEvent::TransmissionComplete);
        assert!(session.try_begin_send());
    }

    #[test]
    fn test_abort_send_only_undoes_own_claim() {
        let mut session = session_in(SessionState::Idle);
        assert!(session.try_begin_send());
        session.abort_send();
        assert_eq!(session.state(), SessionState::Idle);

        let mut session = session_in(SessionState::Idle);
        assert!(session.try_begin_send());
        let _ = session.handle(SessionEvent::Disconnected);
        session.abort_send();
        assert_eq!(session.state(), SessionState::NotConfigured);
    }

    #[test]
    fn test_shared_session_dispatch_and_claim() {
        let shared: SharedSession<CriticalSectionRawMutex> = SharedSession::new();
        assert!(!shared.try_begin_send());

        let _ = shared.dispatch(SessionEvent::Connected);
        assert_eq!(shared.state(), SessionState::Idle);
        assert!(shared.try_begin_send());
        assert_eq!(shared.state(), SessionState::Sending);

        let t = shared.dispatch(SessionEvent::TransmissionComplete);
        assert!(t.clear_activity);
        assert_eq!(shared.state(), SessionState::Idle);
    }

    #[test]
    fn test_shared_session_latches_clear_activity() {
        let shared: SharedSession<CriticalSectionRawMutex> = SharedSession::new();
        let _ = shared.dispatch(SessionEvent::Connected);
        assert!(!shared.take_clear_activity());

        assert!(shared.try_begin_send());
        let _ = shared.dispatch(SessionEvent::TransmissionComplete);
        assert!(shared.take_clear_activity());
        assert!(!shared.take_clear_activity());
    }

    #[test]
    fn test_shared_session_static() {
        static SESSION: SharedSession<CriticalSectionRawMutex> = SharedSession::new();
        let _ = SESSION.dispatch(SessionEvent::Connected);
        let _ = SESSION.dispatch(SessionEvent::Suspend);
        assert!(!SESSION.try_begin_send());
        let _ = SESSION.dispatch(SessionEvent::Resume);
        assert!(SESSION.try_begin_send());
    }

    #[test]
    fn test_shared_session_noop_mutex() {
        let shared: SharedSession<NoopRawMutex> = SharedSession::default();
        let _ = shared.dispatch(SessionEvent::Connected);
        assert!(shared.try_begin_send());
        shared.abort_send();
        assert_eq!(shared.state(), SessionState::Idle);
    }
}
