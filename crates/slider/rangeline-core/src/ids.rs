//! Instance identity and pointer ownership.
//!
//! Document-level pointer events reach every slider on a page; the host uses
//! these to route them to the instance that started the drag.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

/// Monotonic allocator for InstanceId. Created once per host and never reset,
/// so ids are never reused within a process.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Which instance currently owns the pointer, if any.
#[derive(Default, Debug)]
pub struct PointerCapture {
    owner: Option<InstanceId>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down on `id` takes ownership from whoever had it.
    #[inline]
    pub fn claim(&mut self, id: InstanceId) {
        self.owner = Some(id);
    }

    #[inline]
    pub fn owner(&self) -> Option<InstanceId> {
        self.owner
    }

    #[inline]
    pub fn owns(&self, id: InstanceId) -> bool {
        self.owner == Some(id)
    }

    /// Release ownership, returning the previous owner.
    #[inline]
    pub fn release(&mut self) -> Option<InstanceId> {
        self.owner.take()
    }

    /// Drop ownership held by a destroyed instance.
    pub fn forget(&mut self, id: InstanceId) {
        if self.owns(id) {
            self.owner = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc(), InstanceId(0));
        assert_eq!(alloc.alloc(), InstanceId(1));
        assert_eq!(alloc.alloc(), InstanceId(2));
    }

    #[test]
    fn capture_follows_last_claim() {
        let mut cap = PointerCapture::new();
        cap.claim(InstanceId(1));
        cap.claim(InstanceId(2));
        assert!(cap.owns(InstanceId(2)));
        assert!(!cap.owns(InstanceId(1)));
        cap.forget(InstanceId(1));
        assert_eq!(cap.owner(), Some(InstanceId(2)));
        assert_eq!(cap.release(), Some(InstanceId(2)));
        assert_eq!(cap.owner(), None);
    }
}
