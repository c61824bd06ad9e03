//! Listener registration, keyed by node and event type.

use std::collections::HashMap;

use umbra_dom::NodeId;

use crate::event::{Event, EventPhase};

/// Handle returned by [`ListenerRegistry::add_listener`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Run during the capturing phase instead of bubbling
    pub capture: bool,
    /// Remove the listener after its first invocation
    pub once: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self {
            capture: true,
            once: false,
        }
    }

    pub fn once() -> Self {
        Self {
            capture: false,
            once: true,
        }
    }
}

type Callback = Box<dyn FnMut(&mut Event) -> anyhow::Result<()>>;

struct Listener {
    id: ListenerId,
    options: ListenerOptions,
    callback: Callback,
}

/// All listeners of a document, in registration order per (node, type) key.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<(NodeId, String), Vec<Listener>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        options: ListenerOptions,
        callback: impl FnMut(&mut Event) -> anyhow::Result<()> + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry((node, event_type.to_string()))
            .or_default()
            .push(Listener {
                id,
                options,
                callback: Box::new(callback),
            });
        id
    }

    /// Remove one listener; true if it was present.
    pub fn remove_listener(&mut self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&(node, event_type.to_string())) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        list.len() != before
    }

    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners
            .get(&(node, event_type.to_string()))
            .map_or(0, Vec::len)
    }

    /// Run the listeners registered on `node` for the event's type. `sweep`
    /// selects who fires: capture listeners during the capturing sweep,
    /// non-capture during bubbling, everyone at the target entry.
    /// Once-listeners are dropped after they run; a callback error goes to
    /// `error_hook` and the remaining listeners still run.
    pub(crate) fn invoke_matching(
        &mut self,
        node: NodeId,
        event: &mut Event,
        sweep: EventPhase,
        error_hook: &mut dyn FnMut(anyhow::Error),
    ) {
        let key = (node, event.event_type().to_string());
        let Some(list) = self.listeners.get_mut(&key) else {
            return;
        };

        let mut fired_once = Vec::new();
        for listener in list.iter_mut() {
            if event.immediate_propagation_stopped() {
                break;
            }
            let wanted = match sweep {
                EventPhase::Capturing => listener.options.capture,
                EventPhase::Bubbling => !listener.options.capture,
                _ => true,
            };
            if !wanted {
                continue;
            }
            if let Err(err) = (listener.callback)(event) {
                error_hook(err);
            }
            if listener.options.once {
                fired_once.push(listener.id);
            }
        }
        if !fired_once.is_empty() {
            list.retain(|l| !fired_once.contains(&l.id));
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("keys", &self.listeners.len())
            .finish()
    }
}
