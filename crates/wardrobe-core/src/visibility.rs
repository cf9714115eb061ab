//! Viewport intersection tracking for rendered recommendation entries.
//!
//! Positions are in abstract layout units; a terminal front end maps rows to
//! units, a graphical one could use pixels. An observed element fires once
//! when it first comes within `margin` of the viewport, then stops being
//! observed.

use std::collections::BTreeMap;

/// Opaque identity of one rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementHandle(pub u64);

/// Vertical extent of an element in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub top: u32,
    pub height: u32,
}

impl Span {
    pub fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }
}

/// The visible window, in the same units as [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(offset: u32, height: u32) -> Self {
        Self { offset, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub key: String,
    pub element: ElementHandle,
}

pub type EnterCallback = Box<dyn FnMut(&TriggerEvent) + Send>;

/// Something that reports when observed elements scroll into view.
pub trait ViewportObserver {
    fn observe(&mut self, key: &str, element: ElementHandle, span: Span);

    fn unobserve(&mut self, element: ElementHandle);

    fn on_enter(&mut self, callback: EnterCallback);

    /// Drop every observation and callback.
    fn disconnect(&mut self);
}

pub const DEFAULT_MARGIN: u32 = 100;

#[derive(Debug)]
struct Observation {
    key: String,
    span: Span,
}

pub struct VisibilityTrigger {
    margin: u32,
    observed: BTreeMap<ElementHandle, Observation>,
    callbacks: Vec<EnterCallback>,
}

impl std::fmt::Debug for VisibilityTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityTrigger")
            .field("margin", &self.margin)
            .field("observed", &self.observed)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

impl VisibilityTrigger {
    pub fn new(margin: u32) -> Self {
        Self {
            margin,
            observed: BTreeMap::new(),
            callbacks: Vec::new(),
        }
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn is_observed(&self, element: ElementHandle) -> bool {
        self.observed.contains_key(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Recompute intersections for a new viewport. Every element that now
    /// intersects is reported once, in layout order, and unobserved.
    pub fn update_viewport(&mut self, viewport: Viewport) -> Vec<TriggerEvent> {
        let start = i64::from(viewport.offset) - i64::from(self.margin);
        let end = i64::from(viewport.offset) + i64::from(viewport.height) + i64::from(self.margin);

        let mut hits: Vec<(Span, ElementHandle)> = self
            .observed
            .iter()
            .filter(|(_, obs)| intersects(obs.span, start, end))
            .map(|(handle, obs)| (obs.span, *handle))
            .collect();
        hits.sort_by_key(|(span, handle)| (span.top, *handle));

        let mut events = Vec::with_capacity(hits.len());
        for (_, element) in hits {
            if let Some(obs) = self.observed.remove(&element) {
                events.push(TriggerEvent {
                    key: obs.key,
                    element,
                });
            }
        }

        for event in &events {
            tracing::trace!(key = %event.key, element = event.element.0, "entered viewport");
            for callback in &mut self.callbacks {
                callback(event);
            }
        }
        events
    }
}

fn intersects(span: Span, start: i64, end: i64) -> bool {
    let top = i64::from(span.top);
    // A zero-height element still counts as a point at `top`.
    let bottom = top + i64::from(span.height.max(1));
    top < end && bottom > start
}

impl ViewportObserver for VisibilityTrigger {
    fn observe(&mut self, key: &str, element: ElementHandle, span: Span) {
        self.observed.insert(
            element,
            Observation {
                key: key.to_string(),
                span,
            },
        );
    }

    fn unobserve(&mut self, element: ElementHandle) {
        self.observed.remove(&element);
    }

    fn on_enter(&mut self, callback: EnterCallback) {
        self.callbacks.push(callback);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.callbacks.clear();
    }
}
