//! Renderer output checked against a recording backend.

use medibox_core::confirm::PendingConfirmation;
use medibox_core::device::{DeviceContext, ReminderItem};
use medibox_core::state::ScreenState;
use medibox_core::text::bounded;
use medibox_core::touch::layout::{COUNTDOWN, LEFT_BUTTON, OK_BUTTON, RIGHT_BUTTON};
use medibox_core::touch::Rect;
use medibox_core::ui::{DirtyRegions, Renderer, View};
use medibox_display::{theme, Color, DisplayBackend, DisplayError, TextStyle, TftRenderer};
use medibox_protocol::DispensingPhase;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    FillScreen(Color),
    FillRect(Rect, Color),
    DrawRect(Rect, Color),
    Text(u16, u16, String, TextStyle),
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
    fail_text: bool,
}

impl Recorder {
    fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(_, _, text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn filled(&self, rect: Rect) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, Op::FillRect(r, _) if *r == rect))
    }
}

impl DisplayBackend for Recorder {
    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError> {
        self.ops.push(Op::FillScreen(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.ops.push(Op::FillRect(rect, color));
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.ops.push(Op::DrawRect(rect, color));
        Ok(())
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: TextStyle) -> Result<(), DisplayError> {
        if self.fail_text {
            return Err(DisplayError::Communication);
        }
        self.ops.push(Op::Text(x, y, text.to_string(), style));
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (320, 240)
    }
}

fn view<'a>(
    screen: ScreenState,
    device: &'a DeviceContext,
    pending: Option<&'a PendingConfirmation>,
    countdown_s: Option<u32>,
) -> View<'a> {
    View {
        screen,
        device,
        pending,
        countdown_s,
    }
}

#[test]
fn clear_fills_background() {
    let mut renderer = TftRenderer::new(Recorder::default());
    renderer.clear().unwrap();
    assert_eq!(renderer.backend().ops, vec![Op::FillScreen(theme::BACKGROUND)]);
}

#[test]
fn home_shows_counts_and_buttons() {
    let mut device = DeviceContext::new();
    device.time = bounded("08:30");
    device.stock_banner = Some(bounded("Low stock: Aspirin"));
    let mut renderer = TftRenderer::new(Recorder::default());
    renderer
        .draw_screen(&view(ScreenState::Home, &device, None, None))
        .unwrap();

    let texts = renderer.backend().texts();
    assert!(texts.contains(&"08:30"));
    assert!(texts.contains(&"Containers: 0"));
    assert!(texts.contains(&"Low stock: Aspirin"));
    assert!(texts.contains(&"Reminders"));
}

#[test]
fn every_screen_draws_without_error() {
    let device = DeviceContext::new();
    let screens = [
        ScreenState::Home,
        ScreenState::Reminders,
        ScreenState::Containers,
        ScreenState::Schedule,
        ScreenState::Alarm,
        ScreenState::TakeMedicine,
        ScreenState::ControlQueueConfirmation,
        ScreenState::Dispensing,
        ScreenState::QuantityConfirmation,
        ScreenState::JamAlert,
        ScreenState::WifiError,
    ];
    for screen in screens {
        let mut renderer = TftRenderer::new(Recorder::default());
        renderer
            .draw_screen(&view(screen, &device, None, None))
            .unwrap();
        assert!(!renderer.backend().ops.is_empty());
    }
}

#[test]
fn medication_prompt_lists_items_and_countdown() {
    let device = DeviceContext::new();
    let mut items = heapless::Vec::new();
    items
        .push(ReminderItem {
            id: 1,
            medicine_name: bounded("Aspirin"),
            container_id: 3,
            dosage: 2,
        })
        .unwrap();
    let pending = PendingConfirmation::Medication { items };

    let mut renderer = TftRenderer::new(Recorder::default());
    renderer
        .draw_screen(&view(ScreenState::TakeMedicine, &device, Some(&pending), Some(42)))
        .unwrap();

    let backend = renderer.backend();
    let texts = backend.texts();
    assert!(texts.contains(&"Aspirin x2 (C3)"));
    assert!(texts.contains(&"42s"));
    assert!(backend.filled(LEFT_BUTTON));
    assert!(backend.filled(RIGHT_BUTTON));
}

#[test]
fn countdown_partial_touches_only_countdown() {
    let device = DeviceContext::new();
    let mut renderer = TftRenderer::new(Recorder::default());
    let regions = DirtyRegions {
        countdown: true,
        ..Default::default()
    };
    renderer
        .update_regions(&view(ScreenState::TakeMedicine, &device, None, Some(9)), regions)
        .unwrap();

    let ops = &renderer.backend().ops;
    assert_eq!(ops[0], Op::FillRect(COUNTDOWN, theme::BACKGROUND));
    assert_eq!(ops.len(), 2);
    match &ops[1] {
        Op::Text(_, _, text, style) => {
            assert_eq!(text, "9s");
            assert_eq!(style.color, theme::ALERT);
        }
        other => panic!("unexpected op {:?}", other),
    }
}

#[test]
fn dispensing_ok_button_appears_when_complete() {
    let mut device = DeviceContext::new();
    device.dispensing.total = 2;
    device.dispensing.current = 1;

    let mut renderer = TftRenderer::new(Recorder::default());
    renderer
        .draw_screen(&view(ScreenState::Dispensing, &device, None, None))
        .unwrap();
    assert!(renderer.backend().texts().contains(&"1 / 2"));
    assert!(!renderer.backend().texts().contains(&"OK"));

    device.dispensing.current = 2;
    device.dispensing.complete = true;
    let mut renderer = TftRenderer::new(Recorder::default());
    let regions = DirtyRegions {
        progress: true,
        ..Default::default()
    };
    renderer
        .update_regions(&view(ScreenState::Dispensing, &device, None, None), regions)
        .unwrap();
    let backend = renderer.backend();
    assert!(backend.texts().contains(&"2 / 2"));
    assert!(backend.texts().contains(&"OK"));
    assert!(backend.ops.contains(&Op::FillRect(OK_BUTTON, theme::CONFIRM_BUTTON)));
}

#[test]
fn failed_dispense_shows_message_and_ok() {
    let mut device = DeviceContext::new();
    device.dispensing.phase = DispensingPhase::Failed;
    device.dispensing.message = bounded("Motor stalled");

    let mut renderer = TftRenderer::new(Recorder::default());
    renderer
        .draw_screen(&view(ScreenState::Dispensing, &device, None, None))
        .unwrap();
    let backend = renderer.backend();
    assert!(backend.texts().contains(&"Motor stalled"));
    assert!(backend.texts().contains(&"OK"));
}

#[test]
fn unrelated_regions_are_ignored() {
    let device = DeviceContext::new();
    let mut renderer = TftRenderer::new(Recorder::default());
    let regions = DirtyRegions {
        countdown: true,
        progress: true,
        ..Default::default()
    };
    renderer
        .update_regions(&view(ScreenState::Home, &device, None, None), regions)
        .unwrap();
    assert!(renderer.backend().ops.is_empty());
}

#[test]
fn backend_error_propagates() {
    let device = DeviceContext::new();
    let mut renderer = TftRenderer::new(Recorder {
        fail_text: true,
        ..Default::default()
    });
    assert_eq!(
        renderer.draw_screen(&view(ScreenState::Home, &device, None, None)),
        Err(DisplayError::Communication)
    );
}
