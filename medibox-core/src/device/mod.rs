//! Device data mirrored from the primary controller

pub mod context;
pub mod list;
pub mod records;

pub use context::{
    AlarmInfo, Connectivity, DeviceContext, DeviceInfo, DispensingProgress, Environment, JamInfo,
    WifiError, MAX_CONTAINERS, MAX_REMINDERS, MAX_SCHEDULE_ENTRIES,
};
pub use list::{BoundedList, SyncReport};
pub use records::{
    Container, ControlAction, Reminder, ReminderItem, ScheduleEntry, ScheduleStatus,
};
