//! Re-synchronization scheduling.
//!
//! The core does not own a clock. After every synchronization it records what
//! kind of callback it wants next and hands the host a token; the host calls
//! back with that token on the next animation frame or when the idle timer
//! fires. Only the most recent token is honoured.

use std::time::Duration;

use log::trace;
use serde::{Deserialize, Serialize};

/// Idle re-check interval used while no drag is active.
pub const IDLE_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken {
    pub generation: u32,
    pub seq: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickKind {
    /// Next animation frame; requested while dragging.
    AnimationFrame,
    /// One-shot timer; requested while idle.
    Timer { delay_ms: u64 },
}

impl TickKind {
    pub fn idle() -> Self {
        TickKind::Timer {
            delay_ms: IDLE_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRequest {
    pub token: TickToken,
    pub kind: TickKind,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u32,
    seq: u64,
    pending: Option<TickRequest>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending request with a new one.
    pub fn request(&mut self, kind: TickKind) -> TickRequest {
        self.seq = self.seq.wrapping_add(1);
        let req = TickRequest {
            token: TickToken {
                generation: self.generation,
                seq: self.seq,
            },
            kind,
        };
        self.pending = Some(req);
        req
    }

    /// Consume `token` if it is the pending one.
    pub fn accept(&mut self, token: TickToken) -> bool {
        match self.pending {
            Some(req) if req.token == token => {
                self.pending = None;
                true
            }
            _ => {
                trace!("ignoring stale tick {:?}", token);
                false
            }
        }
    }

    /// Drop the pending request and invalidate every token handed out so far.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    #[inline]
    pub fn pending(&self) -> Option<TickRequest> {
        self.pending
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
