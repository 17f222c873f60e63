//! Forward-only state machine behind the intro.
//!
//! Every transition checks its precondition and returns `None` when it does
//! not hold, so repeated clicks or stray animation notifications are no-ops.

use std::time::Duration;

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntroPhase {
    #[default]
    Idle,
    Pressed,
    ZoomingOut,
    Completed,
}

impl IntroPhase {
    pub fn is_clicked(self) -> bool {
        self != IntroPhase::Idle
    }

    pub fn is_zooming(self) -> bool {
        matches!(self, IntroPhase::ZoomingOut | IntroPhase::Completed)
    }
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChanged {
    pub from: IntroPhase,
    pub to: IntroPhase,
}

#[derive(Resource, Debug)]
pub struct IntroSequencer {
    phase: IntroPhase,
    press_delay: Duration,
    pending: Option<Timer>,
}

impl IntroSequencer {
    pub fn new(press_delay: Duration) -> Self {
        Self {
            phase: IntroPhase::Idle,
            press_delay,
            pending: None,
        }
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    /// True while the press-delay timer is armed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Idle -> Pressed, arming the press delay.
    pub fn activate_hotspot(&mut self) -> Option<PhaseChanged> {
        let change = self.advance(IntroPhase::Idle, IntroPhase::Pressed)?;
        self.pending = Some(Timer::new(self.press_delay, TimerMode::Once));
        Some(change)
    }

    /// Pressed -> ZoomingOut once the press delay has run out.
    pub fn tick(&mut self, delta: Duration) -> Option<PhaseChanged> {
        let timer = self.pending.as_mut()?;
        timer.tick(delta);
        if !timer.finished() {
            return None;
        }
        self.pending = None;
        self.advance(IntroPhase::Pressed, IntroPhase::ZoomingOut)
    }

    /// ZoomingOut -> Completed. `on_complete` runs only when the transition
    /// actually happens, so at most once per sequencer.
    pub fn finish_zoom(&mut self, on_complete: impl FnOnce()) -> Option<PhaseChanged> {
        let change = self.advance(IntroPhase::ZoomingOut, IntroPhase::Completed)?;
        on_complete();
        Some(change)
    }

    /// Drops the pending press delay; called on teardown.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn advance(&mut self, from: IntroPhase, to: IntroPhase) -> Option<PhaseChanged> {
        if self.phase != from {
            return None;
        }
        self.phase = to;
        Some(PhaseChanged { from, to })
    }
}
