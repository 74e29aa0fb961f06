//! Message types carried in frame payloads
//!
//! Every payload is a JSON object with a `type` discriminator:
//! - Primary → Display: status, data syncs, alerts, confirmation requests
//! - Display → Primary: confirmation responses, quantity confirmation, jam cleared
//!
//! Incoming fields are lenient: anything missing takes its default so a peer
//! running a slightly different firmware revision still gets through.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::frame::FrameError;

/// Maximum length of a device-control identifier echoed back to the peer
pub const CONTROL_ID_LEN: usize = 64;

/// Default timeout for a confirmation request that carries none
pub const DEFAULT_CONFIRMATION_TIMEOUT_S: u32 = 60;

/// Errors from decoding or encoding message payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Payload is not a JSON object with a string `type`
    Malformed,
    /// Serializing an outgoing message failed
    Encode,
    /// Serialized message could not be framed
    Frame(FrameError),
}

impl From<FrameError> for MessageError {
    fn from(err: FrameError) -> Self {
        MessageError::Frame(err)
    }
}

/// Which kind of confirmation the peer asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationKind {
    #[default]
    Medication,
    DeviceControl,
}

/// Connectivity and environment fields shared by `status` and `system_status`
///
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdate {
    pub wifi_connected: Option<bool>,
    pub mqtt_connected: Option<bool>,
    pub ap_mode: Option<bool>,
    pub time: Option<String>,
    pub date: Option<String>,
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
}

/// One medicine container as reported by the primary controller
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ContainerRecord {
    pub id: u8,
    pub medicine_name: String,
    pub current_capacity: u16,
    pub max_capacity: u16,
    pub low_stock: bool,
}

/// One configured reminder
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReminderRecord {
    pub id: u16,
    pub medicine_name: String,
    pub container_id: u8,
    pub schedule_type: String,
    pub times: Vec<String>,
    pub active: bool,
}

impl Default for ReminderRecord {
    fn default() -> Self {
        Self {
            id: 0,
            medicine_name: String::new(),
            container_id: 0,
            schedule_type: String::new(),
            times: Vec::new(),
            active: true,
        }
    }
}

/// One entry of today's dose schedule
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleRecord {
    pub time: String,
    pub medicine_name: String,
    pub dosage: u8,
    pub status: String,
}

/// A medicine to take, as listed in confirmation requests and grouped alerts
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ReminderItemRecord {
    pub id: u16,
    pub medicine_name: String,
    pub container_id: u8,
    pub dosage: u8,
}

/// The device action a control confirmation asks about
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ControlRecord {
    pub control_id: String,
    pub action: String,
    pub medicine_name: String,
    pub container_id: u8,
    pub quantity: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SyncAllData {
    pub containers: Option<Vec<ContainerRecord>>,
    pub reminders: Option<Vec<ReminderRecord>>,
    #[serde(alias = "daily_schedule")]
    pub schedule: Option<Vec<ScheduleRecord>>,
    #[serde(flatten)]
    pub status: StatusUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ContainersInfo {
    pub containers: Vec<ContainerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RemindersInfo {
    pub reminders: Vec<ReminderRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DailySchedule {
    #[serde(alias = "entries")]
    pub schedule: Vec<ScheduleRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SensorData {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub device_id: Option<String>,
    pub firmware_version: Option<String>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AlarmStatus {
    pub active: bool,
    pub medicine_name: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmationRequest {
    pub confirmation_type: ConfirmationKind,
    /// Absent means the display's configured default; zero times out at once
    pub timeout_seconds: Option<u32>,
    #[serde(alias = "medicines")]
    pub reminders: Vec<ReminderItemRecord>,
    pub control: Option<ControlRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ReminderAlert {
    pub reminder_id: Option<u16>,
    pub medicine_name: String,
    pub container_id: Option<u8>,
    pub dosage: Option<u8>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GroupedReminderAlert {
    pub reminders: Vec<ReminderItemRecord>,
    pub time: Option<String>,
}

/// Progress phase reported in `dispensing_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum DispensingPhase {
    Started,
    InProgress,
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DispensingStatus {
    pub status: DispensingPhase,
    pub medicine_name: Option<String>,
    pub container_id: Option<u8>,
    pub current: Option<u8>,
    pub total: Option<u8>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DispensingSummary {
    pub total_dispensed: Option<u8>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct StockAlert {
    pub container_id: u8,
    pub medicine_name: Option<String>,
    pub current_capacity: Option<u16>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct JamAlert {
    pub container_number: u8,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct WifiErrorAlert {
    pub ssid: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CurrentTime {
    pub time: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ErrorReport {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ControlQueueComplete {
    pub message: Option<String>,
}

/// Messages from the primary controller to the display
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Incoming {
    Status(StatusUpdate),
    SyncAllData(SyncAllData),
    ContainersInfo(ContainersInfo),
    RemindersInfo(RemindersInfo),
    DailySchedule(DailySchedule),
    SensorData(SensorData),
    SystemStatus(StatusUpdate),
    DeviceInfo(DeviceInfo),
    AlarmStatus(AlarmStatus),
    ConfirmationRequest(ConfirmationRequest),
    ReminderAlert(ReminderAlert),
    GroupedReminderAlert(GroupedReminderAlert),
    DispensingStatus(DispensingStatus),
    AllDispensingCompleted(DispensingSummary),
    StockAlert(StockAlert),
    JamAlert(JamAlert),
    WifiErrorAlert(WifiErrorAlert),
    CurrentTime(CurrentTime),
    Error(ErrorReport),
    ControlQueueComplete(ControlQueueComplete),
    /// Any `type` this firmware does not know
    #[serde(other)]
    Unknown,
}

impl Incoming {
    /// Decode one payload
    pub fn parse(payload: &[u8]) -> Result<Self, MessageError> {
        serde_json::from_slice(payload).map_err(|_| MessageError::Malformed)
    }

    /// Wire name of this message kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Incoming::Status(_) => "status",
            Incoming::SyncAllData(_) => "sync_all_data",
            Incoming::ContainersInfo(_) => "containers_info",
            Incoming::RemindersInfo(_) => "reminders_info",
            Incoming::DailySchedule(_) => "daily_schedule",
            Incoming::SensorData(_) => "sensor_data",
            Incoming::SystemStatus(_) => "system_status",
            Incoming::DeviceInfo(_) => "device_info",
            Incoming::AlarmStatus(_) => "alarm_status",
            Incoming::ConfirmationRequest(_) => "confirmation_request",
            Incoming::ReminderAlert(_) => "reminder_alert",
            Incoming::GroupedReminderAlert(_) => "grouped_reminder_alert",
            Incoming::DispensingStatus(_) => "dispensing_status",
            Incoming::AllDispensingCompleted(_) => "all_dispensing_completed",
            Incoming::StockAlert(_) => "stock_alert",
            Incoming::JamAlert(_) => "jam_alert",
            Incoming::WifiErrorAlert(_) => "wifi_error_alert",
            Incoming::CurrentTime(_) => "current_time",
            Incoming::Error(_) => "error",
            Incoming::ControlQueueComplete(_) => "control_queue_complete",
            Incoming::Unknown => "unknown",
        }
    }
}

/// Messages from the display to the primary controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outgoing {
    /// User (or timeout) answer to a confirmation request
    ConfirmationResponse {
        confirmed: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout: Option<bool>,
        confirmation_type: ConfirmationKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        control_id: Option<heapless::String<CONTROL_ID_LEN>>,
    },
    /// Answer on the quantity-confirmation screen
    QuantityConfirmed {
        confirmed: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        one_more: Option<bool>,
    },
    /// User cleared a jammed container
    JamCleared { container_number: u8 },
}

impl Outgoing {
    /// Serialize to a JSON object
    pub fn to_json(&self) -> Result<Vec<u8>, MessageError> {
        serde_json::to_vec(self).map_err(|_| MessageError::Encode)
    }

    /// Wire name of this message kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Outgoing::ConfirmationResponse { .. } => "confirmation_response",
            Outgoing::QuantityConfirmed { .. } => "quantity_confirmed",
            Outgoing::JamCleared { .. } => "jam_cleared",
        }
    }
}
