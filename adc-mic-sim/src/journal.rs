//! Shared record of every call the simulated collaborators receive.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use adc_mic_core::models::config::{MemoryCaps, StreamFormat};

/// One observed collaborator call. Handle ids are assigned by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    CreateDataInterface { id: u32, ok: bool },
    DeleteDataInterface { id: u32 },
    CreateDevice { id: u32, data_if: u32, ok: bool },
    DeleteDevice { id: u32 },
    Open { device: u32, format: StreamFormat, status: i32 },
    Read { device: u32, bytes: usize, status: i32 },
    Close { device: u32 },
    Allocate { size: usize, caps: MemoryCaps, ok: bool },
    Free { size: usize },
    WatchdogReset,
    Yield(Duration),
}

impl SimEvent {
    /// Whether this call touched the driver or the allocator.
    pub fn is_resource_call(&self) -> bool {
        !matches!(self, Self::WatchdogReset | Self::Yield(_))
    }
}

/// Cloneable handle to the event log, shared by all simulated parts.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<SimEvent>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: SimEvent) {
        log::trace!("sim: {:?}", event);
        self.events.lock().push(event);
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Number of events matching `pred`.
    pub fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|&e| pred(e)).count()
    }

    /// Index of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&SimEvent) -> bool) -> Option<usize> {
        self.events.lock().iter().position(pred)
    }

    pub fn reads(&self) -> usize {
        self.count(|e| matches!(e, SimEvent::Read { .. }))
    }
}
