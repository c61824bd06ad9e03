//! Event objects carried through dispatch.

use umbra_dom::NodeId;

/// Where in the propagation path the event currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// A single event instance. Targets are node ids; `NodeId::NONE` stands for
/// an absent node (no related target, not currently dispatching).
#[derive(Debug)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    target: NodeId,
    current_target: NodeId,
    related_target: NodeId,
    phase: EventPhase,
    propagation_stopped: bool,
    immediate_stopped: bool,
    default_prevented: bool,
}

impl Event {
    pub fn new(event_type: &str, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles,
            cancelable,
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            related_target: NodeId::NONE,
            phase: EventPhase::None,
            propagation_stopped: false,
            immediate_stopped: false,
            default_prevented: false,
        }
    }

    /// Attach a related target (the `relatedTarget` of mouse over/out)
    pub fn with_related_target(mut self, related: NodeId) -> Self {
        self.related_target = related;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Target as seen by the current listener, already retargeted
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Related target as seen by the current listener, already adjusted
    pub fn related_target(&self) -> NodeId {
        self.related_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Stop propagation after the current node's listeners finish.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation without running further listeners anywhere.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    /// Cancel the default action. Ignored for non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_stopped
    }

    pub(crate) fn set_target(&mut self, target: NodeId) {
        self.target = target;
    }

    pub(crate) fn set_current_target(&mut self, current: NodeId) {
        self.current_target = current;
    }

    pub(crate) fn set_related_target(&mut self, related: NodeId) {
        self.related_target = related;
    }

    pub(crate) fn set_phase(&mut self, phase: EventPhase) {
        self.phase = phase;
    }

    pub(crate) fn end_dispatch(&mut self) {
        self.phase = EventPhase::None;
        self.current_target = NodeId::NONE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut click = Event::new("click", true, true);
        click.prevent_default();
        assert!(click.default_prevented());

        let mut load = Event::new("load", false, false);
        load.prevent_default();
        assert!(!load.default_prevented());
    }

    #[test]
    fn test_stop_immediate_implies_stop() {
        let mut ev = Event::new("click", true, true);
        ev.stop_immediate_propagation();
        assert!(ev.propagation_stopped());
        assert!(ev.immediate_propagation_stopped());
    }
}
