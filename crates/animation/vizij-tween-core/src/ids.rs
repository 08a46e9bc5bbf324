//! Identifiers and a simple allocator for clock subscribers.

use serde::{Deserialize, Serialize};

/// Opaque handle a clock uses to key an animation's subscriptions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub u32);

/// Monotonic allocator for SubscriberId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_subscriber: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_subscriber(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber = self.next_subscriber.wrapping_add(1);
        id
    }
}
