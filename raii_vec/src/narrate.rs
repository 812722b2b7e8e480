//! Optional narration of container operations.
//!
//! A [`DynamicArray`](crate::DynamicArray) never prints anything itself. When a
//! [`Narrator`] is attached it receives one [`Event`] per resource operation,
//! tagged with the array's label.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Something that happened to an array's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A narrator was attached to a freshly built array.
    Constructed { capacity: usize },
    /// This array was deep-copied from another one.
    Copied { from: String, len: usize },
    /// The buffer was moved out, leaving this array empty.
    Taken { len: usize, capacity: usize },
    /// A value was assigned in; the previous buffer is released with it.
    Assigned { len: usize, capacity: usize },
    /// Buffers were exchanged with another array.
    Swapped,
    /// Explicit capacity change.
    Resized { from: usize, to: usize, len: usize },
    /// Geometric growth triggered by a push into a full array.
    Grew { from: usize, to: usize },
    /// Allocation for a resize failed; nothing changed.
    ResizeFailed { requested: usize },
    /// A push could not grow the array and was dropped.
    PushRejected { len: usize, capacity: usize },
    Renamed { from: String, to: String },
    /// Element-wise addition on empty or mismatched operands.
    AddRejected { left: usize, right: usize },
    Dropped { len: usize, capacity: usize },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructed { capacity } => write!(f, "constructed with capacity {capacity}"),
            Self::Copied { from, len } => write!(f, "copied {len} items from {from}"),
            Self::Taken { len, capacity } => {
                write!(f, "moved out {len} items (capacity {capacity}), left empty")
            }
            Self::Assigned { len, capacity } => {
                write!(f, "assigned by value, now {len} items (capacity {capacity})")
            }
            Self::Swapped => write!(f, "swapped buffers"),
            Self::Resized { from, to, len } => {
                write!(f, "resized from {from} to {to} with {len} items")
            }
            Self::Grew { from, to } => write!(f, "grew on push from {from} to {to}"),
            Self::ResizeFailed { requested } => write!(f, "resize to {requested} failed"),
            Self::PushRejected { len, capacity } => {
                write!(f, "push failed due to full ({len}/{capacity})")
            }
            Self::Renamed { from, to } => write!(f, "renamed {from} to {to}"),
            Self::AddRejected { left, right } => {
                write!(f, "cannot add arrays of zero or unequal size ({left} and {right} items)")
            }
            Self::Dropped { len, capacity } => {
                write!(f, "dropped {len} items, released capacity {capacity}")
            }
        }
    }
}

/// Receiver for array events.
pub trait Narrator: Send + Sync {
    fn narrate(&self, label: &str, event: &Event);
}

/// Shared handle stored inside each array.
pub type SharedNarrator = Arc<dyn Narrator>;

/// Prints every event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Narrator for Console {
    fn narrate(&self, label: &str, event: &Event) {
        println!("{label}: {event}");
    }
}

/// Collects rendered events in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    lines: Mutex<Vec<String>>,
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Rendered `"<label>: <event>"` lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events
            .lock()
            .map(|e| e.iter().filter(|ev| pred(ev)).count())
            .unwrap_or(0)
    }
}

impl Narrator for Recorder {
    fn narrate(&self, label: &str, event: &Event) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{label}: {event}"));
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
