//! Signal helpers.
//!
//! [`SignalExt::mutate`] edits a signal's value in place through a single
//! write, so the change is one notification and the caller does not
//! subscribe to the signal it is updating. That matters inside effects: an
//! effect that reads the signal it writes would re-run on its own update.
//!
//! [`DashboardSignal`] lets the core [`DashboardController`] drive a Dioxus
//! signal directly. Every controller transition becomes one signal write,
//! and components re-render from the signal as usual.
//!
//! [`DashboardController`]: rankscope_core::dashboard::DashboardController

use dioxus::prelude::*;
use rankscope_core::dashboard::{DashboardState, StateHandle};

/// Extension trait for Dioxus signals providing mutation helpers.
pub trait SignalExt<T: 'static> {
    /// Mutates the value in place and returns whatever the closure returns.
    ///
    /// ```ignore
    /// resolution.mutate(|r| r.apply(&id, state));
    /// ```
    fn mutate<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T: 'static> SignalExt<T> for Signal<T> {
    fn mutate<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut value = self.write();
        f(&mut *value)
    }
}

/// Dashboard state stored in a Dioxus signal.
#[derive(Clone, Copy, PartialEq)]
pub struct DashboardSignal(Signal<DashboardState>);

impl DashboardSignal {
    pub fn new(signal: Signal<DashboardState>) -> Self {
        Self(signal)
    }

    /// The underlying signal; read it in components to subscribe to changes.
    pub fn signal(&self) -> Signal<DashboardState> {
        self.0
    }
}

impl StateHandle for DashboardSignal {
    fn read_state<T>(&self, f: impl FnOnce(&DashboardState) -> T) -> T {
        f(&*self.0.peek())
    }

    fn update_state<T>(&self, f: impl FnOnce(&mut DashboardState) -> T) -> T {
        let mut signal = self.0;
        signal.mutate(f)
    }
}

// Tests for these helpers are omitted because they need a Dioxus runtime.
// The transitions they forward to are covered in rankscope-core.
