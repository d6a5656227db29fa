use crate::key_reporter::BootReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The endpoint or device is currently disabled.
    Disabled,
    /// The transport rejected the request.
    Refused,
}

/// Narrow seam between the pipeline and the underlying HID transport.
///
/// The pipeline only submits reports and asks for enable/disable; descriptor
/// registration, enumeration and endpoint management stay with the transport
/// owner. None of these calls are retried here.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn enable(&mut self) -> Result<(), TransportError>;
    async fn disable(&mut self) -> Result<(), TransportError>;
    async fn submit_report(&mut self, report: &BootReport) -> Result<(), TransportError>;
}
