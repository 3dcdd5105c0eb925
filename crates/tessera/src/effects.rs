//! # Effect Bus
//!
//! The core hands back effect batches and never interprets them. The bus
//! moves them from the driver to whoever consumes them (a renderer, an
//! audio mixer, a test).
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │  GameLoop   │─────>│   Effect    │─────>│  Consumer   │
//! │ (step/disp.)│      │   Channel   │      │  (render)   │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! The channel is bounded. When it is full, effects are dropped rather than
//! stalling the simulation.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Bounded channel carrying effects of type `E`.
pub struct EffectBus<E> {
    sender: Sender<E>,
    receiver: Receiver<E>,
}

impl<E> EffectBus<E> {
    /// Creates a bus holding at most `capacity` undelivered effects.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EffectSender<E> {
        EffectSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EffectReceiver<E> {
        EffectReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for publishing effects.
pub struct EffectSender<E> {
    sender: Sender<E>,
}

impl<E> Clone for EffectSender<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E> EffectSender<E> {
    /// Publishes one effect without blocking.
    ///
    /// Returns `false` if the effect was dropped.
    #[inline]
    pub fn send(&self, effect: E) -> bool {
        match self.sender.try_send(effect) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }

    /// Publishes a batch in order, without blocking.
    ///
    /// Returns the number delivered; the rest were dropped.
    pub fn send_batch(&self, effects: impl IntoIterator<Item = E>) -> usize {
        let mut delivered = 0;
        for effect in effects {
            if self.send(effect) {
                delivered += 1;
            }
        }
        delivered
    }
}

/// Handle for consuming effects.
pub struct EffectReceiver<E> {
    receiver: Receiver<E>,
}

impl<E> Clone for EffectReceiver<E> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

impl<E> EffectReceiver<E> {
    /// Receives every pending effect without blocking.
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }

    /// Receives one effect without blocking.
    #[inline]
    pub fn try_recv(&self) -> Option<E> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending effects.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending effects.
    #[inline]
    #[must_use]
    pub fn has_effects(&self) -> bool {
        !self.receiver.is_empty()
    }
}
