extern crate std;
use core::cell::Cell;
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
use embassy_usb::driver::{
    Bus, ControlPipe, Driver, Endpoint, EndpointAddress, EndpointError, EndpointIn, EndpointInfo,
    EndpointOut, EndpointType,
};
use std::rc::Rc;
use std::vec::Vec;

const MAX_PACKET_SIZE: u16 = 64;

#[derive(Clone)]
pub struct MessageChannel(Rc<Channel<NoopRawMutex, Vec<u8>, 10>>);
impl MessageChannel {
    pub async fn send(&self, msg: Vec<u8>) {
        self.0.send(msg).await;
    }

    pub fn get(&self) -> Vec<u8> {
        self.0.try_receive().unwrap()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub async fn receive(&self) -> Vec<u8> {
        self.0.receive().await
    }
}

impl Default for MessageChannel {
    fn default() -> Self {
        Self(Rc::new(Channel::new()))
    }
}

pub struct MyEndpointIn {
    pub messages: MessageChannel,
    pub disabled: Rc<Cell<bool>>,
    pub info: EndpointInfo,
}
impl Endpoint for MyEndpointIn {
    fn info(&self) -> &EndpointInfo {
        &self.info
    }

    async fn wait_enabled(&mut self) {}
}
impl EndpointIn for MyEndpointIn {
    async fn write(&mut self, buf: &[u8]) -> Result<(), EndpointError> {
        if self.disabled.get() {
            return Err(EndpointError::Disabled);
        }
        self.messages.send(Vec::from(buf)).await;
        Ok(())
    }
}
impl Default for MyEndpointIn {
    fn default() -> Self {
        Self {
            messages: MessageChannel::default(),
            disabled: Rc::new(Cell::new(false)),
            info: EndpointInfo {
                addr: EndpointAddress::from(0x81),
                ep_type: EndpointType::Interrupt,
                max_packet_size: MAX_PACKET_SIZE,
                interval_ms: 1,
            },
        }
    }
}

pub struct MyEndpointOut {
    pub messages: MessageChannel,
    pub info: EndpointInfo,
}
impl Endpoint for MyEndpointOut {
    fn info(&self) -> &EndpointInfo {
        &self.info
    }

    async fn wait_enabled(&mut self) {}
}
impl EndpointOut for MyEndpointOut {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, EndpointError> {
        let msg = self.messages.receive().await;
        if msg.len() > buf.len() {
            return Err(EndpointError::BufferOverflow);
        }
        buf[..msg.len()].copy_from_slice(&msg);
        Ok(msg.len())
    }
}
impl Default for MyEndpointOut {
    fn default() -> Self {
        Self {
            messages: MessageChannel::default(),
            info: EndpointInfo {
                addr: EndpointAddress::from(0x01),
                ep_type: EndpointType::Interrupt,
                max_packet_size: MAX_PACKET_SIZE,
                interval_ms: 1,
            },
        }
    }
}

pub struct MyBus;
impl Bus for MyBus {
    async fn enable(&mut self) {}

    async fn disable(&mut self) {}

    async fn poll(&mut self) -> embassy_usb::driver::Event {
        unimplemented!()
    }

    fn endpoint_set_enabled(&mut self, _ep_addr: EndpointAddress, _enabled: bool) {
        unimplemented!()
    }

    fn endpoint_set_stalled(&mut self, _ep_addr: EndpointAddress, _stalled: bool) {
        unimplemented!()
    }

    fn endpoint_is_stalled(&mut self, _ep_addr: EndpointAddress) -> bool {
        unimplemented!()
    }

    async fn remote_wakeup(&mut self) -> Result<(), embassy_usb::driver::Unsupported> {
        unimplemented!()
    }
}

pub struct MyControlPipe;
impl ControlPipe for MyControlPipe {
    fn max_packet_size(&self) -> usize {
        unimplemented!()
    }

    async fn setup(&mut self) -> [u8; 8] {
        unimplemented!()
    }

    async fn data_out(
        &mut self,
        _buf: &mut [u8],
        _first: bool,
        _last: bool,
    ) -> Result<usize, EndpointError> {
        unimplemented!()
    }

    async fn data_in(&mut self, _data: &[u8], _first: bool, _last: bool) -> Result<(), EndpointError> {
        unimplemented!()
    }

    async fn accept(&mut self) {
        unimplemented!()
    }

    async fn reject(&mut self) {
        unimplemented!()
    }

    async fn accept_set_address(&mut self, _addr: u8) {
        unimplemented!()
    }
}

pub struct MyDriver;
impl Driver<'_> for MyDriver {
    type EndpointOut = MyEndpointOut;

    type EndpointIn = MyEndpointIn;

    type ControlPipe = MyControlPipe;

    type Bus = MyBus;

    fn alloc_endpoint_out(
        &mut self,
        _ep_type: EndpointType,
        _max_packet_size: u16,
        _interval_ms: u8,
    ) -> Result<Self::EndpointOut, embassy_usb::driver::EndpointAllocError> {
        unimplemented!()
    }

    fn alloc_endpoint_in(
        &mut self,
        _ep_type: EndpointType,
        _max_packet_size: u16,
        _interval_ms: u8,
    ) -> Result<Self::EndpointIn, embassy_usb::driver::EndpointAllocError> {
        unimplemented!()
    }

    fn start(self, _control_max_packet_size: u16) -> (Self::Bus, Self::ControlPipe) {
        unimplemented!()
    }
}
