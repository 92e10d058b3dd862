use std::sync::mpsc;

use crate::route::{Route, decode, encode};

/// The platform's fragment holder (a browser tab's `location.hash` and history).
///
/// Every mutating call returns `true` when the fragment text actually changed,
/// which is when the platform would fire its change notification.
pub trait Location {
    fn fragment(&self) -> String;
    fn set_fragment(&mut self, fragment: &str) -> bool;
    fn back(&mut self) -> bool;
    fn forward(&mut self) -> bool;
}

/// Linear history with a cursor, like a single browser tab.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![normalize(&initial.into())],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

fn normalize(fragment: &str) -> String {
    fragment.strip_prefix('#').unwrap_or(fragment).to_owned()
}

impl Location for MemoryHistory {
    fn fragment(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn set_fragment(&mut self, fragment: &str) -> bool {
        let fragment = normalize(fragment);
        if self.entries[self.cursor] == fragment {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(fragment);
        self.cursor += 1;
        true
    }

    fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.entries[self.cursor] != self.entries[self.cursor + 1]
    }

    fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        self.entries[self.cursor] != self.entries[self.cursor - 1]
    }
}

/// Keeps the current [`Route`] in sync with a [`Location`].
///
/// Programmatic navigation only writes the fragment; the route is updated by
/// the same change handler that serves back/forward.
pub struct Router {
    location: Box<dyn Location>,
    current: Route,
    subscribers: Vec<mpsc::Sender<Route>>,
}

impl Router {
    pub fn new(location: Box<dyn Location>) -> Self {
        let current = decode(&location.fragment());
        Self {
            location,
            current,
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn fragment(&self) -> String {
        self.location.fragment()
    }

    /// Receives every route published after this call.
    pub fn subscribe(&mut self) -> mpsc::Receiver<Route> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn navigate(&mut self, route: &Route) {
        self.open(&encode(route));
    }

    /// Writes raw fragment text, as when the user edits the address bar.
    pub fn open(&mut self, fragment: &str) {
        if self.location.set_fragment(fragment) {
            self.on_fragment_change();
        }
    }

    pub fn back(&mut self) {
        if self.location.back() {
            self.on_fragment_change();
        }
    }

    pub fn forward(&mut self) {
        if self.location.forward() {
            self.on_fragment_change();
        }
    }

    fn on_fragment_change(&mut self) {
        let route = decode(&self.location.fragment());
        tracing::debug!(%route, "route changed");
        self.current = route;
        let current = &self.current;
        self.subscribers.retain(|tx| tx.send(current.clone()).is_ok());
    }
}
