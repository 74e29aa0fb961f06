//! Cooperative main loop
//!
//! One `tick` does, in order:
//!
//! 1. Drain the serial link and dispatch every complete message
//! 2. Expire the pending confirmation if its deadline passed
//! 3. Take at most one touch sample and run its handler
//! 4. Draw (full, partial or nothing)
//!
//! Waiting between ticks and the post-touch debounce are left to the caller,
//! which owns the executor and timers.

use medibox_hal::{Clock, SerialPort, TouchSensor};
use medibox_protocol::{encode_outgoing, LinkDecoder, LinkError, LinkMode, MessageError, Outgoing};

use crate::config::DisplayConfig;
use crate::controller::Controller;
use crate::touch::TouchAction;
use crate::ui::{DrawMode, Renderer};

/// Failure to deliver one outgoing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// Message did not serialize or fit the transmit buffer
    Encode(MessageError),
    /// The serial port rejected the write
    Write,
}

impl From<MessageError> for SendError {
    fn from(err: MessageError) -> Self {
        SendError::Encode(err)
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Messages decoded and applied
    pub messages: u16,
    /// Complete payloads that failed to parse
    pub dropped: u16,
    /// Framing errors other than inter-frame noise
    pub link_errors: u16,
    /// Messages written to the primary
    pub sent: u16,
    /// Messages that could not be written
    pub send_failures: u16,
    /// Button hit by this tick's touch sample
    pub touch: Option<TouchAction>,
    /// Draw step taken, if it succeeded
    pub draw: Option<DrawMode>,
    pub render_failed: bool,
}

impl TickReport {
    /// A touch triggered an action, so the caller should debounce
    pub fn debounce(&self) -> bool {
        self.touch.is_some()
    }
}

/// Display controller bound to its peripherals
pub struct Runtime<S, T, C> {
    serial: S,
    touch: T,
    clock: C,
    decoder: LinkDecoder,
    link_mode: LinkMode,
    controller: Controller,
}

impl<S, T, C> Runtime<S, T, C>
where
    S: SerialPort,
    T: TouchSensor,
    C: Clock,
{
    pub fn new(config: DisplayConfig, serial: S, touch: T, clock: C) -> Self {
        let link_mode = config.link.mode;
        Self {
            serial,
            touch,
            clock,
            decoder: LinkDecoder::new(link_mode),
            link_mode,
            controller: Controller::new(config),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn touch_mut(&mut self) -> &mut T {
        &mut self.touch
    }

    /// Run one loop iteration
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> TickReport {
        let mut report = TickReport::default();

        self.poll_serial(&mut report);

        let now = self.clock.now_ms();
        if let Some(response) = self.controller.poll_timeout(now) {
            self.record_send(response, &mut report);
        }

        self.poll_touch(&mut report);

        let now = self.clock.now_ms();
        match self.controller.render(renderer, now) {
            Ok(mode) => report.draw = Some(mode),
            Err(_) => {
                warn!("render failed, full redraw queued");
                report.render_failed = true;
            }
        }

        report
    }

    fn poll_serial(&mut self, report: &mut TickReport) {
        while let Some(byte) = self.serial.read_byte() {
            match self.decoder.feed(byte) {
                Ok(Some(payload)) => {
                    let now = self.clock.now_ms();
                    match self.controller.handle_payload(payload, now) {
                        Ok(_) => report.messages = report.messages.saturating_add(1),
                        Err(err) => {
                            warn!("dropping message: {}", err);
                            report.dropped = report.dropped.saturating_add(1);
                        }
                    }
                }
                Ok(None) => {}
                Err(err) => log_link_error(err, report),
            }
        }
    }

    fn poll_touch(&mut self, report: &mut TickReport) {
        if !self.touch.is_touched() {
            return;
        }
        let Some(raw) = self.touch.read_raw() else {
            return;
        };
        let outcome = self.controller.handle_touch(raw);
        report.touch = outcome.action;
        if let Some(message) = outcome.outgoing {
            self.record_send(message, report);
        }
    }

    fn record_send(&mut self, message: Outgoing, report: &mut TickReport) {
        match self.try_send(&message) {
            Ok(()) => report.sent = report.sent.saturating_add(1),
            Err(_) => report.send_failures = report.send_failures.saturating_add(1),
        }
    }

    /// Encode and write one message
    pub fn try_send(&mut self, message: &Outgoing) -> Result<(), SendError> {
        let bytes = encode_outgoing(message, self.link_mode).map_err(|err| {
            warn!("cannot encode {}: {}", message.kind(), err);
            SendError::from(err)
        })?;
        self.serial.write_all(&bytes).map_err(|_| {
            warn!("serial write failed for {}", message.kind());
            SendError::Write
        })?;
        debug!("sent {}", message.kind());
        Ok(())
    }
}

fn log_link_error(err: LinkError, report: &mut TickReport) {
    if err.is_noise() {
        trace!("skipping byte outside frame");
        return;
    }
    warn!("link error: {}", err);
    report.link_errors = report.link_errors.saturating_add(1);
}
