//! One-way notifications between widgets and the tasks they defer.
//!
//! Widgets never call each other. A button that wants a tooltip shown, or
//! wants its owner to know it was clicked, pushes a [`UiSignal`] into the
//! outbox; the container drains it after every event and timer. Deferred work
//! is described by a [`TimerTask`] queued on the [`crate::scheduler::Scheduler`].

use std::collections::VecDeque;

use crate::components::button::ButtonHandle;
use crate::components::tooltip::HoverTooltip;

#[derive(Debug)]
pub enum UiSignal {
    /// A press and release both landed on the button.
    ButtonActivated(ButtonHandle),
    /// The pointer left the button, or pressed it. Closes its tooltip.
    ButtonPointerLeft(ButtonHandle),
    /// A fully placed tooltip ready for the popup slot.
    ShowTooltip(Box<HoverTooltip>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    FadeStep(ButtonHandle),
    ConnectPulse,
    StartupReveal,
}

#[derive(Debug)]
pub struct Outbox<S> {
    queue: VecDeque<S>,
}

impl<S> Outbox<S> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn emit(&mut self, signal: S) {
        self.queue.push_back(signal);
    }

    pub fn pop(&mut self) -> Option<S> {
        self.queue.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = S> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<S> Default for Outbox<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_come_out_in_emit_order() {
        let mut outbox = Outbox::new();
        outbox.emit(1);
        outbox.emit(2);
        outbox.emit(3);
        assert_eq!(outbox.len(), 3);
        assert_eq!(outbox.pop(), Some(1));
        let rest: Vec<_> = outbox.drain().collect();
        assert_eq!(rest, vec![2, 3]);
        assert!(outbox.is_empty());
    }
}
