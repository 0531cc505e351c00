//! Observability sink.
//!
//! Fire-and-forget: emitting never fails the caller and never blocks on
//! anything but the logger itself.

use log::Level;

use crate::protocol::{serialize_message, DeviceMessage, MAX_MSG_LEN};

pub trait Sink {
    fn emit(&self, level: Level, msg: &DeviceMessage<'_>);
}

impl<S: Sink + ?Sized> Sink for &S {
    fn emit(&self, level: Level, msg: &DeviceMessage<'_>) {
        (**self).emit(level, msg)
    }
}

/// Writes each message as one JSON line through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn emit(&self, level: Level, msg: &DeviceMessage<'_>) {
        if !log::log_enabled!(level) {
            return;
        }
        let mut buf = [0u8; MAX_MSG_LEN];
        match serialize_message(msg, &mut buf) {
            Some(json) => log::log!(level, "{}", json),
            None => log::log!(level, "{:?}", msg),
        }
    }
}
