extern crate std;
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use crate::{
    key_reporter::BootReport,
    transport::{Transport, TransportError},
};

/// Records submitted reports; failures are scripted through the shared
/// cells, so clones observe the same transport.
#[derive(Default, Clone)]
pub struct StubTransport {
    pub sent: Rc<RefCell<Vec<BootReport>>>,
    pub enabled: Rc<Cell<bool>>,
    /// Refuse the next enable/disable requests.
    pub refuse: Rc<Cell<bool>>,
    /// Number of upcoming submissions to fail.
    pub fail_submits: Rc<Cell<u32>>,
}

impl Transport for StubTransport {
    async fn enable(&mut self) -> Result<(), TransportError> {
        if self.refuse.get() {
            return Err(TransportError::Refused);
        }
        self.enabled.set(true);
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), TransportError> {
        if self.refuse.get() {
            return Err(TransportError::Refused);
        }
        self.enabled.set(false);
        Ok(())
    }

    async fn submit_report(&mut self, report: &BootReport) -> Result<(), TransportError> {
        let pending = self.fail_submits.get();
        if pending > 0 {
            self.fail_submits.set(pending - 1);
            return Err(TransportError::Disabled);
        }
        self.sent.borrow_mut().push(*report);
        Ok(())
    }
}
