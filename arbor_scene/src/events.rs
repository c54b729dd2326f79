// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node event publish/subscribe.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

/// Handle returned by [`Events::subscribe`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

struct Handler {
    id: SubscriptionId,
    event: TypeId,
    call: Box<dyn FnMut(&dyn Any)>,
}

/// Typed event handlers owned by a node.
///
/// Events are dispatched by type: a handler subscribed for `E` sees every
/// `E` dispatched on the same node, in subscription order. The scene never
/// dispatches on its own.
#[derive(Default)]
pub struct Events {
    next_id: u64,
    handlers: Vec<Handler>,
}

impl core::fmt::Debug for Events {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Events")
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl Events {
    /// Subscribes `handler` to events of type `E`.
    pub fn subscribe<E: Any>(&mut self, mut handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push(Handler {
            id,
            event: TypeId::of::<E>(),
            call: Box::new(move |e: &dyn Any| {
                if let Some(e) = e.downcast_ref::<E>() {
                    handler(e);
                }
            }),
        });
        id
    }

    /// Removes a subscription. Returns true if it was still present.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.id != id);
        self.handlers.len() != before
    }

    /// Delivers `event` to every handler subscribed to `E`.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch<E: Any>(&mut self, event: &E) -> usize {
        let ty = TypeId::of::<E>();
        let mut delivered = 0;
        for h in self.handlers.iter_mut().filter(|h| h.event == ty) {
            (h.call)(event);
            delivered += 1;
        }
        delivered
    }

    /// Returns true if anything listens for `E`.
    pub fn has_listeners<E: Any>(&self) -> bool {
        let ty = TypeId::of::<E>();
        self.handlers.iter().any(|h| h.event == ty)
    }
}
