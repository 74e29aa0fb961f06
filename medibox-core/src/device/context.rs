//! Everything the display knows about the dispenser
//!
//! One owned `DeviceContext` lives in the controller and is passed by
//! reference to the dispatcher and renderer.

use heapless::{String, Vec};

use medibox_protocol::messages::{
    DeviceInfo as DeviceInfoMessage, DispensingStatus, StatusUpdate,
};
use medibox_protocol::DispensingPhase;

use super::list::BoundedList;
use super::records::{
    Container, Reminder, ScheduleEntry, LABEL_LEN, MESSAGE_LEN, NAME_LEN, TIME_LEN,
};
use crate::text::bounded;

/// Containers tracked
pub const MAX_CONTAINERS: usize = 10;
/// Reminders tracked
pub const MAX_REMINDERS: usize = 20;
/// Schedule entries tracked for today
pub const MAX_SCHEDULE_ENTRIES: usize = 24;
/// Medicine names listed on the alarm screen
pub const MAX_ALARM_NAMES: usize = 5;
/// Maximum date string length
pub const DATE_LEN: usize = 16;
/// Maximum device identifier length
pub const DEVICE_ID_LEN: usize = 32;
/// Maximum IPv4 address length
pub const IP_LEN: usize = 15;

/// Link state of the primary controller's uplinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Connectivity {
    pub wifi_connected: bool,
    pub mqtt_connected: bool,
    /// Primary is running its setup access point
    pub ap_mode: bool,
}

/// Latest sensor readings, absent until first reported
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Environment {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub device_id: String<DEVICE_ID_LEN>,
    pub firmware_version: String<LABEL_LEN>,
    pub ip_address: String<IP_LEN>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlarmInfo {
    pub active: bool,
    pub medicine_names: Vec<String<NAME_LEN>, MAX_ALARM_NAMES>,
    pub time: String<TIME_LEN>,
}

impl AlarmInfo {
    /// Raise the alarm for the given medicines
    pub fn raise<'a, I>(&mut self, names: I, time: Option<&str>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.active = true;
        self.medicine_names.clear();
        for name in names.into_iter().take(MAX_ALARM_NAMES) {
            let _ = self.medicine_names.push(bounded(name));
        }
        self.time = time.map(bounded).unwrap_or_default();
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.medicine_names.clear();
        self.time.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispensingProgress {
    pub phase: DispensingPhase,
    pub medicine_name: String<NAME_LEN>,
    pub container_id: Option<u8>,
    pub current: u8,
    pub total: u8,
    /// Set once the primary reports the current dispense finished
    pub complete: bool,
    pub message: String<MESSAGE_LEN>,
}

impl DispensingProgress {
    /// Clear progress ahead of a new dispense
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// Merge a status report; absent fields keep their value
    pub fn apply(&mut self, status: &DispensingStatus) {
        self.phase = status.status;
        if let Some(name) = &status.medicine_name {
            self.medicine_name = bounded(name);
        }
        if status.container_id.is_some() {
            self.container_id = status.container_id;
        }
        if let Some(current) = status.current {
            self.current = current;
        }
        if let Some(total) = status.total {
            self.total = total;
        }
        if let Some(message) = &status.message {
            self.message = bounded(message);
        }
        if status.status == DispensingPhase::Completed {
            self.complete = true;
        }
    }

    /// Nothing more will arrive for this dispense, so the user may leave
    pub fn finished(&self) -> bool {
        self.complete || self.phase == DispensingPhase::Failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JamInfo {
    pub container_number: u8,
    pub message: String<MESSAGE_LEN>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WifiError {
    pub ssid: String<NAME_LEN>,
    pub message: String<MESSAGE_LEN>,
}

/// State mirrored from the primary controller
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceContext {
    pub containers: BoundedList<Container, MAX_CONTAINERS>,
    pub reminders: BoundedList<Reminder, MAX_REMINDERS>,
    pub schedule: BoundedList<ScheduleEntry, MAX_SCHEDULE_ENTRIES>,
    pub connectivity: Connectivity,
    pub environment: Environment,
    pub time: String<TIME_LEN>,
    pub date: String<DATE_LEN>,
    pub device: DeviceInfo,
    pub alarm: AlarmInfo,
    pub dispensing: DispensingProgress,
    pub jam: JamInfo,
    pub wifi_error: WifiError,
    /// Last `error` message, shown on the home banner
    pub last_error: Option<String<MESSAGE_LEN>>,
    /// Last stock warning, shown on the home banner
    pub stock_banner: Option<String<MESSAGE_LEN>>,
}

impl DeviceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a status report; absent fields keep their value
    pub fn apply_status(&mut self, status: &StatusUpdate) {
        if let Some(wifi) = status.wifi_connected {
            self.connectivity.wifi_connected = wifi;
        }
        if let Some(mqtt) = status.mqtt_connected {
            self.connectivity.mqtt_connected = mqtt;
        }
        if let Some(ap_mode) = status.ap_mode {
            self.connectivity.ap_mode = ap_mode;
        }
        if let Some(time) = &status.time {
            self.time = bounded(time);
        }
        if let Some(date) = &status.date {
            self.date = bounded(date);
        }
        self.apply_environment(status.temperature, status.humidity);
    }

    pub fn apply_environment(&mut self, temperature: Option<f32>, humidity: Option<f32>) {
        if temperature.is_some() {
            self.environment.temperature = temperature;
        }
        if humidity.is_some() {
            self.environment.humidity = humidity;
        }
    }

    pub fn apply_device_info(&mut self, info: &DeviceInfoMessage) {
        if let Some(id) = &info.device_id {
            self.device.device_id = bounded(id);
        }
        if let Some(version) = &info.firmware_version {
            self.device.firmware_version = bounded(version);
        }
        if let Some(ip) = &info.ip_address {
            self.device.ip_address = bounded(ip);
        }
    }

    /// Flag a container low on stock, updating its count when known
    ///
    /// Returns false if no container has that id.
    pub fn mark_low_stock(&mut self, container_id: u8, current_capacity: Option<u16>) -> bool {
        match self.containers.iter_mut().find(|c| c.id == container_id) {
            Some(container) => {
                container.low_stock = true;
                if let Some(count) = current_capacity {
                    container.current_capacity = count;
                }
                true
            }
            None => false,
        }
    }

    pub fn low_stock_count(&self) -> usize {
        self.containers.iter().filter(|c| c.low_stock).count()
    }

    pub fn active_reminder_count(&self) -> usize {
        self.reminders.iter().filter(|r| r.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_status_keeps_other_fields() {
        let mut ctx = DeviceContext::new();
        ctx.apply_status(&StatusUpdate {
            wifi_connected: Some(true),
            mqtt_connected: Some(true),
            temperature: Some(21.5),
            ..Default::default()
        });
        ctx.apply_status(&StatusUpdate {
            mqtt_connected: Some(false),
            ..Default::default()
        });

        assert!(ctx.connectivity.wifi_connected);
        assert!(!ctx.connectivity.mqtt_connected);
        assert_eq!(ctx.environment.temperature, Some(21.5));
    }

    #[test]
    fn test_alarm_lists_at_most_five_names() {
        let mut alarm = AlarmInfo::default();
        alarm.raise(["a", "b", "c", "d", "e", "f"], Some("08:00"));
        assert!(alarm.active);
        assert_eq!(alarm.medicine_names.len(), MAX_ALARM_NAMES);
        assert_eq!(alarm.time.as_str(), "08:00");

        alarm.clear();
        assert!(!alarm.active);
        assert!(alarm.medicine_names.is_empty());
    }

    #[test]
    fn test_dispensing_progress_completion() {
        let mut progress = DispensingProgress::default();
        progress.apply(&DispensingStatus {
            status: DispensingPhase::InProgress,
            current: Some(1),
            total: Some(3),
            ..Default::default()
        });
        assert!(!progress.complete);
        assert_eq!((progress.current, progress.total), (1, 3));

        progress.apply(&DispensingStatus {
            status: DispensingPhase::Completed,
            ..Default::default()
        });
        assert!(progress.complete);
        assert!(progress.finished());
        assert_eq!(progress.total, 3);

        progress.restart();
        assert!(!progress.complete);
        assert_eq!(progress.total, 0);
    }

    #[test]
    fn test_mark_low_stock_unknown_container() {
        let mut ctx = DeviceContext::new();
        assert!(!ctx.mark_low_stock(7, Some(2)));
        assert_eq!(ctx.low_stock_count(), 0);
    }

    #[test]
    fn test_failed_dispense_is_finished() {
        let mut progress = DispensingProgress::default();
        progress.apply(&DispensingStatus {
            status: DispensingPhase::Started,
            ..Default::default()
        });
        assert!(!progress.finished());

        progress.apply(&DispensingStatus {
            status: DispensingPhase::Failed,
            ..Default::default()
        });
        assert!(!progress.complete);
        assert!(progress.finished());

        progress.restart();
        assert!(!progress.finished());
    }
}
