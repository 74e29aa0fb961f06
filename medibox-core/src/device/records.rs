//! Bounded copies of the records the primary controller syncs
//!
//! Wire records carry unbounded strings; these are what the display keeps.
//! Over-long text is cut to fit rather than rejected, except the control id,
//! which must be echoed back exactly or not at all.

use heapless::{String, Vec};

use medibox_protocol::messages::{
    ContainerRecord, ControlRecord, ReminderItemRecord, ReminderRecord, ScheduleRecord,
};
use medibox_protocol::CONTROL_ID_LEN;

use crate::text::bounded;

/// Maximum medicine name length
pub const NAME_LEN: usize = 32;
/// Maximum time string length ("HH:MM:SS")
pub const TIME_LEN: usize = 8;
/// Maximum short label length
pub const LABEL_LEN: usize = 16;
/// Maximum free-text message length
pub const MESSAGE_LEN: usize = 64;
/// Scheduled times kept per reminder
pub const MAX_REMINDER_TIMES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Container {
    pub id: u8,
    pub medicine_name: String<NAME_LEN>,
    pub current_capacity: u16,
    pub max_capacity: u16,
    pub low_stock: bool,
}

impl From<&ContainerRecord> for Container {
    fn from(record: &ContainerRecord) -> Self {
        Self {
            id: record.id,
            medicine_name: bounded(&record.medicine_name),
            current_capacity: record.current_capacity,
            max_capacity: record.max_capacity,
            low_stock: record.low_stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reminder {
    pub id: u16,
    pub medicine_name: String<NAME_LEN>,
    pub container_id: u8,
    pub schedule_type: String<LABEL_LEN>,
    pub times: Vec<String<TIME_LEN>, MAX_REMINDER_TIMES>,
    pub active: bool,
}

impl From<&ReminderRecord> for Reminder {
    fn from(record: &ReminderRecord) -> Self {
        let mut times = Vec::new();
        for time in record.times.iter().take(MAX_REMINDER_TIMES) {
            let _ = times.push(bounded(time));
        }
        Self {
            id: record.id,
            medicine_name: bounded(&record.medicine_name),
            container_id: record.container_id,
            schedule_type: bounded(&record.schedule_type),
            times,
            active: record.active,
        }
    }
}

/// Progress of one scheduled dose today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Completed,
    /// Anything else the primary reports (missed, skipped, ...)
    Other,
}

impl ScheduleStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "pending" => ScheduleStatus::Pending,
            "completed" | "taken" => ScheduleStatus::Completed,
            _ => ScheduleStatus::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleEntry {
    pub time: String<TIME_LEN>,
    pub medicine_name: String<NAME_LEN>,
    pub dosage: u8,
    pub status: ScheduleStatus,
}

impl From<&ScheduleRecord> for ScheduleEntry {
    fn from(record: &ScheduleRecord) -> Self {
        Self {
            time: bounded(&record.time),
            medicine_name: bounded(&record.medicine_name),
            dosage: record.dosage,
            status: ScheduleStatus::from_label(&record.status),
        }
    }
}

/// One medicine named in a medication confirmation or grouped alert
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReminderItem {
    pub id: u16,
    pub medicine_name: String<NAME_LEN>,
    pub container_id: u8,
    pub dosage: u8,
}

impl From<&ReminderItemRecord> for ReminderItem {
    fn from(record: &ReminderItemRecord) -> Self {
        Self {
            id: record.id,
            medicine_name: bounded(&record.medicine_name),
            container_id: record.container_id,
            dosage: record.dosage,
        }
    }
}

/// Device action awaiting user approval
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlAction {
    /// `None` when the peer's id is longer than `CONTROL_ID_LEN`
    pub control_id: Option<String<CONTROL_ID_LEN>>,
    pub action: String<LABEL_LEN>,
    pub medicine_name: String<NAME_LEN>,
    pub container_id: u8,
    pub quantity: u8,
    pub message: String<MESSAGE_LEN>,
}

impl From<&ControlRecord> for ControlAction {
    fn from(record: &ControlRecord) -> Self {
        Self {
            control_id: exact_id(&record.control_id),
            action: bounded(&record.action),
            medicine_name: bounded(&record.medicine_name),
            container_id: record.container_id,
            quantity: record.quantity,
            message: bounded(&record.message),
        }
    }
}

fn exact_id(id: &str) -> Option<String<CONTROL_ID_LEN>> {
    let exact = String::try_from(id).ok();
    if exact.is_none() {
        warn!("control id of {} bytes does not fit, answering without it", id.len());
    }
    exact
}
