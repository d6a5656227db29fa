use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::{
    debug,
    key_event::{Dequeued, KeyEvent, KeyEventChannel},
    key_reporter::Reporter,
    lifecycle::DeviceLifecycle,
    transport::Transport,
    warn,
};

/// The report task: drains the event queue, folds events into the boot
/// report and submits it while the lifecycle allows transmission.
pub struct Pipeline<'c, M: RawMutex, T: Transport, const N: usize> {
    channel: &'c KeyEventChannel<M, N>,
    lifecycle: &'c DeviceLifecycle<M>,
    reporter: Reporter,
    transport: T,
    /// Set when a changed report could not go out. The next processed event
    /// then transmits the current state; the stale report itself is never
    /// queued for later delivery.
    resync: bool,
}

impl<'c, M: RawMutex, T: Transport, const N: usize> Pipeline<'c, M, T, N> {
    pub fn new(
        channel: &'c KeyEventChannel<M, N>,
        lifecycle: &'c DeviceLifecycle<M>,
        transport: T,
    ) -> Self {
        Self {
            channel,
            lifecycle,
            reporter: Reporter::new(),
            transport,
            resync: false,
        }
    }

    /// Runs until the queue is shut down. No event, decode or transport
    /// failure stops the loop.
    pub async fn run(&mut self) {
        while let Dequeued::Event(event) = self.channel.dequeue().await {
            self.process(event).await;
        }
        debug!("event queue closed, report task stopping");
    }

    async fn process(&mut self, event: KeyEvent) {
        let update = self.reporter.on_event(event);
        if !update.changed && !self.resync {
            return;
        }
        if !self.lifecycle.may_transmit() {
            debug!("transmission gated, report discarded");
            self.resync = true;
            return;
        }
        match self.transport.submit_report(&update.report).await {
            Ok(()) => self.resync = false,
            Err(e) => {
                warn!("failed to send report: {:?}", e);
                self.resync = true;
            }
        }
    }
}

#[cfg(test)]
extern crate std;

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod test;
