use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_usb::{
    class::hid::{ReportId, RequestHandler},
    control::OutResponse,
    driver::{Driver, Endpoint, EndpointError, EndpointIn, EndpointOut},
};
use keywire_common::boot_protocol::BOOT_REPORT_LEN;

use crate::{
    key_reporter::BootReport,
    lifecycle::DeviceLifecycle,
    transport::{Transport, TransportError},
    warn,
};

pub struct HidWriter<'d, D: Driver<'d>, const N: usize> {
    ep_in: D::EndpointIn,
}

impl<'d, D: Driver<'d>, const N: usize> HidWriter<'d, D, N> {
    pub fn new(ep_in: <D>::EndpointIn) -> Self {
        Self { ep_in }
    }

    /// Writes `report` to its interrupt endpoint.
    pub async fn write(&mut self, report: &[u8]) -> Result<(), EndpointError> {
        assert!(report.len() <= N);

        let max_packet_size = usize::from(self.ep_in.info().max_packet_size);
        let zlp_needed = report.len() < N && report.len() % max_packet_size == 0;
        for chunk in report.chunks(max_packet_size) {
            self.ep_in.write(chunk).await?;
        }

        if zlp_needed {
            self.ep_in.write(&[]).await?;
        }

        Ok(())
    }
}

/// Boot-keyboard transport over an embassy-usb interrupt endpoint.
///
/// `enable`/`disable` succeed without doing anything: the embassy-usb device
/// task senses VBUS and enables the bus itself, so pair this with
/// `LifecycleConfig { autonomous_bus_sensing: true }`.
pub struct EndpointTransport<'d, D: Driver<'d>> {
    writer: HidWriter<'d, D, BOOT_REPORT_LEN>,
}

impl<'d, D: Driver<'d>> EndpointTransport<'d, D> {
    pub fn new(ep_in: <D>::EndpointIn) -> Self {
        Self {
            writer: HidWriter::new(ep_in),
        }
    }
}

impl<'d, D: Driver<'d>> Transport for EndpointTransport<'d, D> {
    async fn enable(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn submit_report(&mut self, report: &BootReport) -> Result<(), TransportError> {
        self.writer.write(report.as_bytes()).await.map_err(|e| match e {
            EndpointError::Disabled => TransportError::Disabled,
            EndpointError::BufferOverflow => TransportError::Refused,
        })
    }
}

/// Delivers host output reports from the Interrupt Out pipe to the
/// lifecycle. A disabled endpoint parks the task until it is re-enabled.
pub struct HidReader<'d, D: Driver<'d>, const N: usize> {
    ep_out: D::EndpointOut,
}

impl<'d, D: Driver<'d>, const N: usize> HidReader<'d, D, N> {
    pub fn new(ep_out: <D>::EndpointOut) -> Self {
        Self { ep_out }
    }

    pub async fn run<M: RawMutex>(mut self, lifecycle: &DeviceLifecycle<M>) -> ! {
        loop {
            self.read_one(lifecycle).await;
        }
    }

    async fn read_one<M: RawMutex>(&mut self, lifecycle: &DeviceLifecycle<M>) {
        let mut buf = [0; N];
        match self.ep_out.read(&mut buf).await {
            // bad lengths are rejected and logged by the lifecycle
            Ok(len) => {
                let _ = lifecycle.on_output_report(&buf[..len]);
            }
            Err(EndpointError::BufferOverflow) => {
                warn!(
                    "Host sent output report larger than the configured maximum output report length ({})",
                    N
                );
            }
            Err(EndpointError::Disabled) => self.ep_out.wait_enabled().await,
        }
    }
}

/// Control-pipe requests (SET_REPORT, SET_IDLE, GET_IDLE) forwarded onto the
/// lifecycle, for hosts that drive the keyboard over endpoint 0 instead of
/// the interrupt pipes.
pub struct HostRequests<'a, M: RawMutex> {
    lifecycle: &'a DeviceLifecycle<M>,
}

impl<'a, M: RawMutex> HostRequests<'a, M> {
    pub fn new(lifecycle: &'a DeviceLifecycle<M>) -> Self {
        Self { lifecycle }
    }
}

impl<M: RawMutex> RequestHandler for HostRequests<'_, M> {
    fn get_report(&mut self, id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        warn!("Get Report not supported: {:?}", id);
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        match id {
            ReportId::Out(_) if self.lifecycle.on_output_report(data).is_ok() => {
                OutResponse::Accepted
            }
            _ => OutResponse::Rejected,
        }
    }

    fn set_idle_ms(&mut self, id: Option<ReportId>, duration_ms: u32) {
        self.lifecycle.set_idle(report_id_byte(id), duration_ms);
    }

    fn get_idle_ms(&mut self, id: Option<ReportId>) -> Option<u32> {
        Some(self.lifecycle.idle_ms(report_id_byte(id)))
    }
}

fn report_id_byte(id: Option<ReportId>) -> u8 {
    match id {
        Some(ReportId::In(n)) | Some(ReportId::Out(n)) | Some(ReportId::Feature(n)) => n,
        None => 0,
    }
}

#[cfg(test)]
extern crate std;

#[cfg(test)]
#[path = "hid_test.rs"]
mod test;
