use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel, signal::Signal};

/// Queue depth used by the reference hardware: enough to absorb one short
/// burst between scanner interrupts and the report task being scheduled.
pub const DEFAULT_DEPTH: usize = 2;

/// A single debounced key transition. Produced by the input source, consumed
/// exactly once by the report task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub code: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(code: u8) -> Self {
        Self {
            code,
            pressed: true,
        }
    }

    pub fn release(code: u8) -> Self {
        Self {
            code,
            pressed: false,
        }
    }
}

/// Outcome of waiting on the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dequeued {
    Event(KeyEvent),
    /// The queue was shut down; no further events will be delivered.
    Closed,
}

/// Bounded FIFO between the key-scan context and the report task.
///
/// [`Self::try_enqueue`] never blocks and is safe to call from interrupt
/// context when `M` is `CriticalSectionRawMutex`. [`Self::dequeue`] is the
/// only suspending operation in the pipeline.
pub struct KeyEventChannel<M: RawMutex, const N: usize> {
    channel: Channel<M, KeyEvent, N>,
    shutdown: Signal<M, ()>,
    closed: AtomicBool,
    dropped: AtomicU32,
}

impl<M: RawMutex, const N: usize> Default for KeyEventChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> KeyEventChannel<M, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            shutdown: Signal::new(),
            closed: AtomicBool::new(false),
            dropped: AtomicU32::new(0),
        }
    }

    /// Offers an event to the queue. Returns `false`, immediately, when the
    /// queue is full (the transition is lost and counted) or shut down.
    pub fn try_enqueue(&self, event: KeyEvent) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        if self.channel.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Waits for the next event. Events accepted before a shutdown are still
    /// drained; a parked consumer wakes with [`Dequeued::Closed`].
    pub async fn dequeue(&self) -> Dequeued {
        if let Ok(event) = self.channel.try_receive() {
            return Dequeued::Event(event);
        }
        if self.closed.load(Ordering::Acquire) {
            return Dequeued::Closed;
        }
        match select(self.channel.receive(), self.shutdown.wait()).await {
            Either::First(event) => Dequeued::Event(event),
            Either::Second(()) => Dequeued::Closed,
        }
    }

    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.shutdown.signal(());
    }

    /// Events discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
extern crate std;

#[cfg(test)]
#[path = "key_event_test.rs"]
mod test;
