//! Screen renderer for the 320x240 TFT
//!
//! Draws every screen from a [`View`] onto any [`DisplayBackend`]. Button
//! positions come from the same layout table the touch router hit-tests
//! against, so what is drawn is what can be pressed.

use heapless::String;

use medibox_core::device::{DeviceContext, ScheduleStatus};
use medibox_core::state::ScreenState;
use medibox_core::text::format_bounded;
use medibox_core::touch::layout::{
    BANNER, CONTENT, COUNTDOWN, HOME_CONTAINERS, HOME_REMINDERS, HOME_SCHEDULE, LEFT_BUTTON,
    LIST_BACK, OK_BUTTON, PROGRESS, RIGHT_BUTTON, STATUS_BAR, WIDE_BUTTON,
};
use medibox_core::touch::Rect;
use medibox_core::ui::{DirtyRegions, Renderer, View};
use medibox_core::confirm::PendingConfirmation;
use medibox_protocol::DispensingPhase;

use crate::backend::{DisplayBackend, DisplayError, TextSize, TextStyle};
use crate::theme::{self, Color};

/// Everything between the status bar and the back button on list screens
const LIST_AREA: Rect = Rect::new(0, 30, 320, 156);
const LIST_TITLE_Y: u16 = 36;
const LIST_FIRST_ROW_Y: u16 = 58;
const LIST_ROW_HEIGHT: u16 = 14;
const LIST_ROWS: usize = 9;

const MARGIN: u16 = 10;
/// Countdown at or below this many seconds is drawn in the alert color
const COUNTDOWN_URGENT_S: u32 = 10;

type Line = String<48>;

/// Renders screens onto a [`DisplayBackend`]
pub struct TftRenderer<B> {
    backend: B,
}

impl<B: DisplayBackend> TftRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    fn text(&mut self, x: u16, y: u16, text: &str, color: Color, size: TextSize) -> Result<(), DisplayError> {
        self.backend.draw_text(x, y, text, TextStyle::new(color, size))
    }

    fn text_centered(&mut self, y: u16, text: &str, color: Color, size: TextSize) -> Result<(), DisplayError> {
        let (width, _) = self.backend.dimensions();
        let x = width.saturating_sub(size.width_of(text)) / 2;
        self.text(x, y, text, color, size)
    }

    fn text_right(&mut self, right: u16, y: u16, text: &str, color: Color, size: TextSize) -> Result<(), DisplayError> {
        let x = right.saturating_sub(size.width_of(text));
        self.text(x, y, text, color, size)
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), DisplayError> {
        self.backend.fill_rect(rect, theme::BACKGROUND)
    }

    fn button(&mut self, rect: Rect, label: &str, fill: Color) -> Result<(), DisplayError> {
        self.backend.fill_rect(rect, fill)?;
        self.backend.draw_rect(rect, theme::TEXT)?;
        let size = TextSize::Medium;
        let (_, cell_h) = size.cell();
        let x = rect.x + rect.w.saturating_sub(size.width_of(label)) / 2;
        let y = rect.y + rect.h.saturating_sub(cell_h) / 2;
        self.text(x, y, label, theme::TEXT, size)
    }

    // ------------------------------------------------------------------
    // Shared regions
    // ------------------------------------------------------------------

    fn draw_status_bar(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        self.backend.fill_rect(STATUS_BAR, theme::STATUS_BAR)?;

        let time = if device.time.is_empty() { "--:--" } else { device.time.as_str() };
        self.text(6, 8, time, theme::TEXT, TextSize::Medium)?;
        if !device.date.is_empty() {
            self.text(56, 10, &device.date, theme::MUTED, TextSize::Small)?;
        }

        let link = &device.connectivity;
        let wifi_color = if link.wifi_connected { theme::OK } else { theme::ALERT };
        self.text(140, 10, "WiFi", wifi_color, TextSize::Small)?;
        let mqtt_color = if link.mqtt_connected { theme::OK } else { theme::ALERT };
        self.text(170, 10, "MQTT", mqtt_color, TextSize::Small)?;
        if link.ap_mode {
            self.text(200, 10, "AP", theme::WARN, TextSize::Small)?;
        }

        let env = &device.environment;
        let sensors: Line = match (env.temperature, env.humidity) {
            (Some(t), Some(h)) => format_bounded(format_args!("{:.1}C {:.0}%", t, h)),
            (Some(t), None) => format_bounded(format_args!("{:.1}C", t)),
            (None, Some(h)) => format_bounded(format_args!("{:.0}%", h)),
            (None, None) => format_bounded(format_args!("--")),
        };
        self.text_right(STATUS_BAR.right() - 6, 10, &sensors, theme::TEXT, TextSize::Small)
    }

    fn draw_countdown(&mut self, countdown_s: Option<u32>) -> Result<(), DisplayError> {
        self.clear_rect(COUNTDOWN)?;
        let Some(seconds) = countdown_s else {
            return Ok(());
        };
        let label: Line = format_bounded(format_args!("{}s", seconds));
        let color = if seconds <= COUNTDOWN_URGENT_S {
            theme::ALERT
        } else {
            theme::HIGHLIGHT
        };
        self.text_right(COUNTDOWN.right(), COUNTDOWN.y + 2, &label, color, TextSize::Large)
    }

    // ------------------------------------------------------------------
    // Home
    // ------------------------------------------------------------------

    fn draw_home(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        self.draw_home_summary(device)?;
        self.draw_banner(device)?;
        self.button(HOME_REMINDERS, "Reminders", theme::BUTTON)?;
        self.button(HOME_CONTAINERS, "Stock", theme::BUTTON)?;
        self.button(HOME_SCHEDULE, "Today", theme::BUTTON)
    }

    fn draw_home_summary(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        self.clear_rect(CONTENT)?;
        let info = &device.device;
        if !info.device_id.is_empty() || !info.ip_address.is_empty() {
            let line: Line = format_bounded(format_args!(
                "{}  {}",
                info.device_id.as_str(),
                info.ip_address.as_str()
            ));
            self.text(MARGIN, 36, &line, theme::MUTED, TextSize::Small)?;
        }

        let low = device.low_stock_count();
        let containers: Line = if low > 0 {
            format_bounded(format_args!("Containers: {} ({} low)", device.containers.len(), low))
        } else {
            format_bounded(format_args!("Containers: {}", device.containers.len()))
        };
        let color = if low > 0 { theme::WARN } else { theme::TEXT };
        self.text(MARGIN, 54, &containers, color, TextSize::Medium)?;

        let reminders: Line =
            format_bounded(format_args!("Reminders: {} active", device.active_reminder_count()));
        self.text(MARGIN, 74, &reminders, theme::TEXT, TextSize::Medium)?;

        let schedule: Line = format_bounded(format_args!("Today: {} doses", device.schedule.len()));
        self.text(MARGIN, 94, &schedule, theme::TEXT, TextSize::Medium)?;

        let next = device
            .schedule
            .iter()
            .find(|entry| entry.status == ScheduleStatus::Pending);
        if let Some(entry) = next {
            let line: Line = format_bounded(format_args!(
                "Next: {} {}",
                entry.time.as_str(),
                entry.medicine_name.as_str()
            ));
            self.text(MARGIN, 118, &line, theme::ACCENT, TextSize::Medium)?;
        }
        Ok(())
    }

    fn draw_banner(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        self.clear_rect(BANNER)?;
        let (text, color) = match (&device.last_error, &device.stock_banner) {
            (Some(error), _) => (error.as_str(), theme::ALERT),
            (None, Some(stock)) => (stock.as_str(), theme::WARN),
            (None, None) => return Ok(()),
        };
        self.text(MARGIN, BANNER.y + 6, text, color, TextSize::Small)
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    fn draw_list(&mut self, screen: ScreenState, device: &DeviceContext) -> Result<(), DisplayError> {
        self.clear_rect(LIST_AREA)?;
        let (title, total): (&str, usize) = match screen {
            ScreenState::Containers => ("Containers", device.containers.len()),
            ScreenState::Reminders => ("Reminders", device.reminders.len()),
            _ => ("Today's schedule", device.schedule.len()),
        };
        let heading: Line = format_bounded(format_args!("{} ({})", title, total));
        self.text(MARGIN, LIST_TITLE_Y, &heading, theme::ACCENT, TextSize::Medium)?;

        if total == 0 {
            return self.text(MARGIN, LIST_FIRST_ROW_Y, "Nothing to show", theme::MUTED, TextSize::Small);
        }

        // Leave the last row for the overflow marker when needed
        let shown = if total > LIST_ROWS { LIST_ROWS - 1 } else { total };
        for row in 0..shown {
            let (line, color) = list_row(screen, device, row);
            let y = LIST_FIRST_ROW_Y + row as u16 * LIST_ROW_HEIGHT;
            self.text(MARGIN, y, &line, color, TextSize::Small)?;
        }
        if total > shown {
            let more: Line = format_bounded(format_args!("+{} more", total - shown));
            let y = LIST_FIRST_ROW_Y + shown as u16 * LIST_ROW_HEIGHT;
            self.text(MARGIN, y, &more, theme::MUTED, TextSize::Small)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Prompts and alerts
    // ------------------------------------------------------------------

    fn draw_alarm(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        self.text_centered(40, "Medicine time", theme::ALERT, TextSize::Large)?;
        let mut y = 72;
        for name in &device.alarm.medicine_names {
            self.text_centered(y, name, theme::TEXT, TextSize::Medium)?;
            y += 17;
        }
        if !device.alarm.time.is_empty() {
            let line: Line = format_bounded(format_args!("Scheduled {}", device.alarm.time.as_str()));
            self.text_centered(152, &line, theme::MUTED, TextSize::Small)?;
        }
        self.button(WIDE_BUTTON, "Dismiss", theme::BUTTON)
    }

    fn draw_confirmation(&mut self, view: &View<'_>) -> Result<(), DisplayError> {
        match view.pending {
            Some(PendingConfirmation::Medication { items }) => {
                self.text(MARGIN, 40, "Take medicine?", theme::TEXT, TextSize::Large)?;
                let mut y = 72;
                for item in items.iter().take(6) {
                    let line: Line = format_bounded(format_args!(
                        "{} x{} (C{})",
                        item.medicine_name.as_str(),
                        item.dosage,
                        item.container_id
                    ));
                    self.text(MARGIN, y, &line, theme::TEXT, TextSize::Small)?;
                    y += 14;
                }
                if items.len() > 6 {
                    let more: Line = format_bounded(format_args!("+{} more", items.len() - 6));
                    self.text(MARGIN, y, &more, theme::MUTED, TextSize::Small)?;
                }
            }
            Some(PendingConfirmation::DeviceControl { action }) => {
                self.text(MARGIN, 40, "Confirm action", theme::TEXT, TextSize::Large)?;
                self.text(MARGIN, 72, &action.action, theme::ACCENT, TextSize::Medium)?;
                if !action.medicine_name.is_empty() {
                    let line: Line = format_bounded(format_args!(
                        "{} x{} (C{})",
                        action.medicine_name.as_str(),
                        action.quantity,
                        action.container_id
                    ));
                    self.text(MARGIN, 94, &line, theme::TEXT, TextSize::Small)?;
                }
                self.text(MARGIN, 112, &action.message, theme::MUTED, TextSize::Small)?;
            }
            None => {
                self.text(MARGIN, 40, "No request", theme::MUTED, TextSize::Large)?;
            }
        }
        self.draw_countdown(view.countdown_s)?;
        self.button(LEFT_BUTTON, "Confirm", theme::CONFIRM_BUTTON)?;
        self.button(RIGHT_BUTTON, "Cancel", theme::CANCEL_BUTTON)
    }

    fn draw_dispensing(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        let progress = &device.dispensing;
        self.text_centered(40, "Dispensing", theme::TEXT, TextSize::Large)?;
        if !progress.medicine_name.is_empty() {
            self.text_centered(72, &progress.medicine_name, theme::ACCENT, TextSize::Medium)?;
        }
        if let Some(container) = progress.container_id {
            let line: Line = format_bounded(format_args!("Container {}", container));
            self.text_centered(94, &line, theme::MUTED, TextSize::Small)?;
        }
        self.draw_progress(device)
    }

    /// Progress bar, status line, and the OK button once finished
    fn draw_progress(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        let progress = &device.dispensing;
        self.clear_rect(PROGRESS)?;
        self.backend.draw_rect(PROGRESS, theme::TEXT)?;

        if progress.total > 0 {
            let inner = PROGRESS.w.saturating_sub(2);
            let done = u32::from(progress.current.min(progress.total));
            let filled = (u32::from(inner) * done / u32::from(progress.total)) as u16;
            if filled > 0 {
                let bar = Rect::new(PROGRESS.x + 1, PROGRESS.y + 1, filled, PROGRESS.h - 2);
                self.backend.fill_rect(bar, theme::OK)?;
            }
            let count: Line = format_bounded(format_args!("{} / {}", progress.current, progress.total));
            self.text_centered(PROGRESS.y + 6, &count, theme::TEXT, TextSize::Medium)?;
        }

        let status_line = Rect::new(0, PROGRESS.bottom() + 4, 320, 14);
        self.clear_rect(status_line)?;
        let (label, color) = if !progress.message.is_empty() {
            (progress.message.as_str(), phase_color(progress.phase))
        } else {
            (phase_label(progress.phase), phase_color(progress.phase))
        };
        self.text_centered(status_line.y + 2, label, color, TextSize::Small)?;

        self.clear_rect(OK_BUTTON)?;
        if progress.finished() {
            self.button(OK_BUTTON, "OK", theme::CONFIRM_BUTTON)?;
        }
        Ok(())
    }

    fn draw_quantity(&mut self) -> Result<(), DisplayError> {
        self.text_centered(40, "Dispensing done", theme::OK, TextSize::Large)?;
        self.text_centered(80, "Did you get the right amount?", theme::TEXT, TextSize::Medium)?;
        self.button(LEFT_BUTTON, "Yes", theme::CONFIRM_BUTTON)?;
        self.button(RIGHT_BUTTON, "One more", theme::BUTTON)
    }

    fn draw_jam(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        let title: Line = format_bounded(format_args!("Container {} jammed", device.jam.container_number));
        self.text_centered(40, &title, theme::ALERT, TextSize::Large)?;
        if !device.jam.message.is_empty() {
            self.text_centered(80, &device.jam.message, theme::TEXT, TextSize::Small)?;
        }
        self.text_centered(110, "Clear the jam, then continue", theme::MUTED, TextSize::Small)?;
        self.button(WIDE_BUTTON, "Continue", theme::BUTTON)
    }

    fn draw_wifi_error(&mut self, device: &DeviceContext) -> Result<(), DisplayError> {
        self.text_centered(40, "Wi-Fi error", theme::ALERT, TextSize::Large)?;
        if !device.wifi_error.ssid.is_empty() {
            let line: Line = format_bounded(format_args!("SSID: {}", device.wifi_error.ssid.as_str()));
            self.text_centered(80, &line, theme::TEXT, TextSize::Medium)?;
        }
        if !device.wifi_error.message.is_empty() {
            self.text_centered(104, &device.wifi_error.message, theme::MUTED, TextSize::Small)?;
        }
        self.button(OK_BUTTON, "OK", theme::BUTTON)
    }
}

fn list_row(screen: ScreenState, device: &DeviceContext, row: usize) -> (Line, Color) {
    match screen {
        ScreenState::Containers => match device.containers.as_slice().get(row) {
            Some(c) => {
                let line = format_bounded(format_args!(
                    "#{} {} {}/{}{}",
                    c.id,
                    c.medicine_name.as_str(),
                    c.current_capacity,
                    c.max_capacity,
                    if c.low_stock { " LOW" } else { "" }
                ));
                (line, if c.low_stock { theme::WARN } else { theme::TEXT })
            }
            None => (Line::new(), theme::TEXT),
        },
        ScreenState::Reminders => match device.reminders.as_slice().get(row) {
            Some(r) => {
                let mut line: Line = format_bounded(format_args!("{} C{}", r.medicine_name.as_str(), r.container_id));
                for time in &r.times {
                    if line.push(' ').is_err() || line.push_str(time).is_err() {
                        break;
                    }
                }
                (line, if r.active { theme::TEXT } else { theme::MUTED })
            }
            None => (Line::new(), theme::TEXT),
        },
        _ => match device.schedule.as_slice().get(row) {
            Some(e) => {
                let done = e.status == ScheduleStatus::Completed;
                let line = format_bounded(format_args!(
                    "{} {} x{}{}",
                    e.time.as_str(),
                    e.medicine_name.as_str(),
                    e.dosage,
                    if done { " done" } else { "" }
                ));
                (line, if done { theme::MUTED } else { theme::TEXT })
            }
            None => (Line::new(), theme::TEXT),
        },
    }
}

fn phase_label(phase: DispensingPhase) -> &'static str {
    match phase {
        DispensingPhase::Started => "Starting",
        DispensingPhase::InProgress => "In progress",
        DispensingPhase::Completed => "Completed",
        DispensingPhase::Failed => "Failed",
        DispensingPhase::Other => "Waiting",
    }
}

fn phase_color(phase: DispensingPhase) -> Color {
    match phase {
        DispensingPhase::Completed => theme::OK,
        DispensingPhase::Failed => theme::ALERT,
        _ => theme::TEXT,
    }
}

impl<B: DisplayBackend> Renderer for TftRenderer<B> {
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.backend.fill_screen(theme::BACKGROUND)
    }

    fn draw_screen(&mut self, view: &View<'_>) -> Result<(), DisplayError> {
        let device = view.device;
        self.draw_status_bar(device)?;
        match view.screen {
            ScreenState::Home => self.draw_home(device),
            ScreenState::Containers | ScreenState::Reminders | ScreenState::Schedule => {
                self.draw_list(view.screen, device)?;
                self.button(LIST_BACK, "Back", theme::BUTTON)
            }
            ScreenState::Alarm => self.draw_alarm(device),
            ScreenState::TakeMedicine | ScreenState::ControlQueueConfirmation => {
                self.draw_confirmation(view)
            }
            ScreenState::Dispensing => self.draw_dispensing(device),
            ScreenState::QuantityConfirmation => self.draw_quantity(),
            ScreenState::JamAlert => self.draw_jam(device),
            ScreenState::WifiError => self.draw_wifi_error(device),
        }
    }

    fn update_regions(&mut self, view: &View<'_>, regions: DirtyRegions) -> Result<(), DisplayError> {
        let device = view.device;
        if regions.status_bar() {
            self.draw_status_bar(device)?;
        }
        match view.screen {
            ScreenState::Home => {
                if regions.counts {
                    self.draw_home_summary(device)?;
                }
                if regions.banner {
                    self.draw_banner(device)?;
                }
            }
            ScreenState::Containers | ScreenState::Reminders | ScreenState::Schedule => {
                if regions.counts {
                    self.draw_list(view.screen, device)?;
                }
            }
            ScreenState::TakeMedicine | ScreenState::ControlQueueConfirmation => {
                if regions.countdown {
                    self.draw_countdown(view.countdown_s)?;
                }
            }
            ScreenState::Dispensing => {
                if regions.progress {
                    self.draw_progress(device)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
