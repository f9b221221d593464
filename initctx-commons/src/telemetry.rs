use anyhow::{Result, anyhow};
use std::sync::Mutex;

/// A lightweight sink used to record telemetry events emitted by components.
/// The `Event` type is generic so each component can supply its own event
/// schema.
pub trait TelemetrySink<Event>: Send + Sync {
    /// Record an event produced by the component.
    fn record(&self, event: &Event) -> Result<()>;

    /// Flush any buffered telemetry data to its destination.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A telemetry sink that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl<Event> TelemetrySink<Event> for NoopTelemetry {
    fn record(&self, _event: &Event) -> Result<()> {
        Ok(())
    }
}

/// Keeps every recorded event in memory so tests and the replay command can
/// inspect what happened.
#[derive(Debug)]
pub struct MemoryTelemetry<Event> {
    events: Mutex<Vec<Event>>,
}

impl<Event> Default for MemoryTelemetry<Event> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

impl<Event: Clone> MemoryTelemetry<Event> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events in arrival order.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl<Event> TelemetrySink<Event> for MemoryTelemetry<Event>
where
    Event: Clone + Send,
{
    fn record(&self, event: &Event) -> Result<()> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| anyhow!("telemetry buffer poisoned"))?;
        events.push(event.clone());
        Ok(())
    }
}
