use crate::foundation::error::{VideoBookError, VideoBookResult};
use std::collections::BTreeMap;

/// Token returned by [`RenderGate::delay_render`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct GateHandle(u64);

/// Defers frame output until every outstanding handle has been continued.
#[derive(Debug, Default)]
pub struct RenderGate {
    next: u64,
    pending: BTreeMap<u64, String>,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay_render(&mut self, label: impl Into<String>) -> GateHandle {
        let id = self.next;
        self.next += 1;
        self.pending.insert(id, label.into());
        GateHandle(id)
    }

    pub fn continue_render(&mut self, handle: GateHandle) -> VideoBookResult<()> {
        self.pending.remove(&handle.0).map(|_| ()).ok_or_else(|| {
            VideoBookError::gate(format!("render handle {} is not pending", handle.0))
        })
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_labels(&self) -> impl Iterator<Item = &str> {
        self.pending.values().map(String::as_str)
    }
}
