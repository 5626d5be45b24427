//! Graph change notification.
//!
//! Listeners are called synchronously, in registration order, after the
//! graph has released its internal lock. A listener may therefore query or
//! even mutate the graph it is observing. A panicking listener is logged and
//! skipped; it never affects the graph or the listeners after it.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use log::error;

use crate::graph::Graph;
use crate::term::Triple;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    AddTriple(Triple),
    DeleteTriple(Triple),
    RemoveAllStart,
    RemoveAllEnd,
    Generic(String),
}

impl fmt::Display for GraphEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphEvent::AddTriple(t) => write!(f, "add {}", t),
            GraphEvent::DeleteTriple(t) => write!(f, "delete {}", t),
            GraphEvent::RemoveAllStart => write!(f, "remove-all start"),
            GraphEvent::RemoveAllEnd => write!(f, "remove-all end"),
            GraphEvent::Generic(d) => write!(f, "{}", d),
        }
    }
}

pub trait GraphListener: Send + Sync {
    fn on_event(&self, graph: &Graph, event: &GraphEvent);
}

impl<F> GraphListener for F
where
    F: Fn(&Graph, &GraphEvent) + Send + Sync,
{
    fn on_event(&self, graph: &Graph, event: &GraphEvent) {
        self(graph, event)
    }
}

/// Registration token returned by [`Graph::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct EventManager {
    next: u64,
    listeners: Vec<(ListenerId, Arc<dyn GraphListener>)>,
}

impl EventManager {
    pub fn register(&mut self, listener: Arc<dyn GraphListener>) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn snapshot(&self) -> Vec<Arc<dyn GraphListener>> {
        self.listeners.iter().map(|(_, l)| l.clone()).collect()
    }
}

/// Deliver `events` to `listeners`, isolating panics.
pub(crate) fn dispatch(graph: &Graph, listeners: &[Arc<dyn GraphListener>], events: &[GraphEvent]) {
    for event in events {
        for listener in listeners {
            let delivered = catch_unwind(AssertUnwindSafe(|| listener.on_event(graph, event)));
            if delivered.is_err() {
                error!("listener panicked on '{}' in graph {}", event, graph.name());
            }
        }
    }
}
