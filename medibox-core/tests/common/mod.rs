//! Host fakes for driving the runtime

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use medibox_core::touch::Rect;
use medibox_core::ui::{DirtyRegions, Renderer, View};
use medibox_core::{DisplayConfig, Runtime};
use medibox_hal::{Clock, RawPoint, SerialPort, TouchSensor};
use medibox_protocol::frame::{encode_frame, FrameDecoder, FRAME_OVERHEAD};

/// Serial port backed by in-memory queues
#[derive(Default)]
pub struct FakeSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub fail_writes: bool,
}

impl FakeSerial {
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn push_frame(&mut self, json: &str) {
        self.push_bytes(&frame(json.as_bytes()));
    }

    /// Decode and drain everything written so far
    pub fn take_sent(&mut self) -> Vec<String> {
        let mut decoder = FrameDecoder::new();
        let mut sent = Vec::new();
        for byte in self.tx.drain(..) {
            if let Ok(Some(payload)) = decoder.feed(byte) {
                sent.push(String::from_utf8(payload.to_vec()).unwrap());
            }
        }
        sent
    }
}

#[derive(Debug)]
pub struct WriteRejected;

impl SerialPort for FakeSerial {
    type Error = WriteRejected;

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(WriteRejected);
        }
        self.tx.extend_from_slice(data);
        Ok(())
    }
}

/// Touch panel that replays queued presses, one per sample
#[derive(Default)]
pub struct FakeTouch {
    pub presses: VecDeque<RawPoint>,
}

impl FakeTouch {
    /// Queue a press landing in the middle of `rect` under default calibration
    pub fn press(&mut self, rect: Rect) {
        let x = u32::from(rect.x + rect.w / 2);
        let y = u32::from(rect.y + rect.h / 2);
        let raw_x = 3800 - x * 3600 / 320;
        let raw_y = 3800 - y * 3600 / 240;
        self.presses.push_back(RawPoint::new(raw_x as u16, raw_y as u16));
    }
}

impl TouchSensor for FakeTouch {
    fn is_touched(&mut self) -> bool {
        !self.presses.is_empty()
    }

    fn read_raw(&mut self) -> Option<RawPoint> {
        self.presses.pop_front()
    }
}

/// Manually advanced millisecond clock
#[derive(Default)]
pub struct FakeClock {
    now: Cell<u64>,
}

impl FakeClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// One renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Screen(medibox_core::state::ScreenState),
    Regions(DirtyRegions),
}

/// Renderer that only records what it was asked to do
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
    pub fail_next: bool,
}

impl RecordingRenderer {
    pub fn clears(&self) -> usize {
        self.calls.iter().filter(|c| **c == DrawCall::Clear).count()
    }

    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Renderer for RecordingRenderer {
    type Error = ();

    fn clear(&mut self) -> Result<(), ()> {
        if std::mem::take(&mut self.fail_next) {
            return Err(());
        }
        self.calls.push(DrawCall::Clear);
        Ok(())
    }

    fn draw_screen(&mut self, view: &View<'_>) -> Result<(), ()> {
        self.calls.push(DrawCall::Screen(view.screen));
        Ok(())
    }

    fn update_regions(&mut self, _view: &View<'_>, regions: DirtyRegions) -> Result<(), ()> {
        self.calls.push(DrawCall::Regions(regions));
        Ok(())
    }
}

pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; payload.len() + FRAME_OVERHEAD];
    let len = encode_frame(payload, &mut out).unwrap();
    out.truncate(len);
    out
}

pub type TestRuntime<'c> = Runtime<FakeSerial, FakeTouch, &'c FakeClock>;

pub fn runtime(clock: &FakeClock) -> TestRuntime<'_> {
    Runtime::new(
        DisplayConfig::DEFAULT,
        FakeSerial::default(),
        FakeTouch::default(),
        clock,
    )
}
