//! Three-phase dispatch over a retargeted event path.

use umbra_dom::{Document, NodeId};

use crate::event::{Event, EventPhase};
use crate::listener::ListenerRegistry;
use crate::retarget::{adjust_related_target, retarget, EventPathEntry};

type ErrorHook = Box<dyn FnMut(anyhow::Error)>;

/// Drives events through capture, target, and bubble phases.
///
/// Listener callbacks returning an error do not abort dispatch; the error
/// goes to the hook (logged by default) and propagation continues.
pub struct Dispatcher {
    error_hook: ErrorHook,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            error_hook: Box::new(|err| tracing::error!("event listener failed: {err:#}")),
        }
    }

    /// Replace the default error hook.
    pub fn with_error_hook(hook: impl FnMut(anyhow::Error) + 'static) -> Self {
        Self {
            error_hook: Box::new(hook),
        }
    }

    /// Dispatch `event` at `target`, running listeners along the retargeted
    /// path. Returns false when a listener canceled the default action.
    pub fn dispatch(
        &mut self,
        doc: &mut Document,
        listeners: &mut ListenerRegistry,
        target: NodeId,
        event: &mut Event,
    ) -> bool {
        // paths are computed over the rendered tree
        doc.render_all_pending();

        let mut path = retarget(doc, target);
        correct_load_target(doc, event, &mut path);
        if path.is_empty() {
            return !event.default_prevented();
        }
        tracing::debug!(
            "dispatching {:?} at {:?}, path of {}",
            event.event_type(),
            target,
            path.len()
        );
        let original_related = event.related_target();

        for i in (1..path.len()).rev() {
            if event.propagation_stopped() {
                break;
            }
            self.invoke(doc, listeners, path[i], event, EventPhase::Capturing, original_related);
        }

        if !event.propagation_stopped() {
            self.invoke(doc, listeners, path[0], event, EventPhase::AtTarget, original_related);
        }

        for i in 1..path.len() {
            if event.propagation_stopped() {
                break;
            }
            let entry = path[i];
            // entries that are their own target still hear non-bubbling
            // events; everything else bubbles only if the event does
            if entry.target == entry.current_target || event.bubbles() {
                self.invoke(doc, listeners, entry, event, EventPhase::Bubbling, original_related);
            }
        }

        event.end_dispatch();
        !event.default_prevented()
    }

    /// Run one path entry's listeners. `sweep` selects which listeners fire
    /// (capture listeners on the way down, the rest on the way up, everything
    /// at the target entry); the phase a listener observes is promoted to
    /// at-target whenever the entry is its own retargeted target.
    fn invoke(
        &mut self,
        doc: &Document,
        listeners: &mut ListenerRegistry,
        entry: EventPathEntry,
        event: &mut Event,
        sweep: EventPhase,
        original_related: NodeId,
    ) {
        if original_related.is_valid() {
            let adjusted = adjust_related_target(doc, entry.current_target, original_related);
            if adjusted == entry.target {
                // both ends retarget to the same node; listeners here would
                // see a self-transition
                return;
            }
            event.set_related_target(adjusted);
        }
        event.set_target(entry.target);
        event.set_current_target(entry.current_target);
        if entry.target == entry.current_target {
            event.set_phase(EventPhase::AtTarget);
        } else {
            event.set_phase(sweep);
        }
        listeners.invoke_matching(entry.current_target, event, sweep, &mut self.error_hook);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// A document `load` reaches listeners on the window, not on the document.
/// The document-level entry is dropped so the window entry is the innermost.
fn correct_load_target(doc: &Document, event: &Event, path: &mut Vec<EventPathEntry>) {
    if event.event_type() == "load"
        && path.len() >= 2
        && doc.is_document(path[0].current_target)
        && doc.is_window(path[1].current_target)
    {
        path.remove(0);
    }
}
