//! Message dispatch
//!
//! Applies one decoded message from the primary controller to the device
//! context and the confirmation slot. Screen changes are not made here: the
//! dispatcher reports the event and whether the screen needs a full redraw,
//! and the controller feeds both to the screen machine.

use heapless::Vec;

use medibox_protocol::messages::{ConfirmationRequest, DispensingStatus, StockAlert};
use medibox_protocol::{ConfirmationKind, DispensingPhase, Incoming};

use crate::confirm::{ConfirmationManager, PendingConfirmation, MAX_CONFIRMATION_ITEMS};
use crate::device::{
    Container, ControlAction, DeviceContext, Reminder, ReminderItem, ScheduleEntry, SyncReport,
};
use crate::state::ScreenEvent;
use crate::text::{bounded, format_bounded};

/// Which collection a sync replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncTarget {
    Containers,
    Reminders,
    Schedule,
}

/// What one message changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Current screen must be redrawn in full
    pub refresh: bool,
    /// Screen event to apply
    pub event: Option<ScreenEvent>,
    /// Collections replaced, with truncation counts
    pub syncs: Vec<(SyncTarget, SyncReport), 3>,
}

impl DispatchOutcome {
    fn refresh() -> Self {
        Self {
            refresh: true,
            ..Default::default()
        }
    }

    fn event(event: ScreenEvent) -> Self {
        Self {
            event: Some(event),
            ..Default::default()
        }
    }

    fn refresh_with(event: ScreenEvent) -> Self {
        Self {
            refresh: true,
            event: Some(event),
            ..Default::default()
        }
    }

    fn record_sync(&mut self, target: SyncTarget, report: SyncReport) {
        if report.is_truncated() {
            debug!(
                "sync {} truncated: stored {}, dropped {}",
                target, report.stored, report.dropped
            );
        }
        // One entry per target at most, capacity matches
        let _ = self.syncs.push((target, report));
    }

    /// Report for one collection, if this message replaced it
    pub fn sync_report(&self, target: SyncTarget) -> Option<SyncReport> {
        self.syncs
            .iter()
            .find(|(t, _)| *t == target)
            .map(|&(_, report)| report)
    }
}

/// Everything a message may mutate
pub struct DispatchTarget<'a> {
    pub device: &'a mut DeviceContext,
    pub confirmations: &'a mut ConfirmationManager,
    pub now_ms: u64,
    /// Used when a confirmation request carries no timeout
    pub default_timeout_s: u32,
}

/// Apply one message
pub fn dispatch(message: &Incoming, target: DispatchTarget<'_>) -> DispatchOutcome {
    let DispatchTarget {
        device,
        confirmations,
        now_ms,
        default_timeout_s,
    } = target;

    match message {
        Incoming::Status(status) | Incoming::SystemStatus(status) => {
            device.apply_status(status);
            DispatchOutcome::default()
        }

        Incoming::SyncAllData(sync) => {
            let mut outcome = DispatchOutcome::refresh();
            if let Some(containers) = &sync.containers {
                let report = device.containers.replace_from(containers.iter().map(Container::from));
                outcome.record_sync(SyncTarget::Containers, report);
            }
            if let Some(reminders) = &sync.reminders {
                let report = device.reminders.replace_from(reminders.iter().map(Reminder::from));
                outcome.record_sync(SyncTarget::Reminders, report);
            }
            if let Some(schedule) = &sync.schedule {
                let report = device.schedule.replace_from(schedule.iter().map(ScheduleEntry::from));
                outcome.record_sync(SyncTarget::Schedule, report);
            }
            device.apply_status(&sync.status);
            outcome
        }

        Incoming::ContainersInfo(info) => {
            let mut outcome = DispatchOutcome::refresh();
            let report = device.containers.replace_from(info.containers.iter().map(Container::from));
            outcome.record_sync(SyncTarget::Containers, report);
            outcome
        }

        Incoming::RemindersInfo(info) => {
            let mut outcome = DispatchOutcome::refresh();
            let report = device.reminders.replace_from(info.reminders.iter().map(Reminder::from));
            outcome.record_sync(SyncTarget::Reminders, report);
            outcome
        }

        Incoming::DailySchedule(schedule) => {
            let mut outcome = DispatchOutcome::refresh();
            let report = device
                .schedule
                .replace_from(schedule.schedule.iter().map(ScheduleEntry::from));
            outcome.record_sync(SyncTarget::Schedule, report);
            outcome
        }

        Incoming::SensorData(sensors) => {
            device.apply_environment(sensors.temperature, sensors.humidity);
            DispatchOutcome::default()
        }

        Incoming::DeviceInfo(info) => {
            device.apply_device_info(info);
            DispatchOutcome::refresh()
        }

        Incoming::AlarmStatus(alarm) => {
            if alarm.active {
                device
                    .alarm
                    .raise(alarm.medicine_name.as_deref(), alarm.time.as_deref());
                DispatchOutcome::refresh_with(ScreenEvent::AlarmRaised)
            } else {
                device.alarm.clear();
                DispatchOutcome::event(ScreenEvent::AlarmCleared)
            }
        }

        Incoming::ConfirmationRequest(request) => {
            arm_confirmation(request, confirmations, now_ms, default_timeout_s)
        }

        Incoming::ReminderAlert(alert) => {
            device
                .alarm
                .raise([alert.medicine_name.as_str()], alert.time.as_deref());
            DispatchOutcome::refresh_with(ScreenEvent::AlarmRaised)
        }

        Incoming::GroupedReminderAlert(alert) => {
            device.alarm.raise(
                alert.reminders.iter().map(|r| r.medicine_name.as_str()),
                alert.time.as_deref(),
            );
            DispatchOutcome::refresh_with(ScreenEvent::AlarmRaised)
        }

        Incoming::DispensingStatus(status) => apply_dispensing(device, status),

        Incoming::AllDispensingCompleted(_) => {
            device.dispensing.complete = true;
            DispatchOutcome::event(ScreenEvent::AllDispensed)
        }

        Incoming::StockAlert(alert) => {
            apply_stock_alert(device, alert);
            DispatchOutcome::refresh()
        }

        Incoming::JamAlert(jam) => {
            device.jam.container_number = jam.container_number;
            device.jam.message = jam.message.as_deref().map(bounded).unwrap_or_default();
            warn!("container {} jammed", jam.container_number);
            DispatchOutcome::refresh_with(ScreenEvent::JamDetected)
        }

        Incoming::WifiErrorAlert(alert) => {
            device.wifi_error.ssid = alert.ssid.as_deref().map(bounded).unwrap_or_default();
            device.wifi_error.message = alert.message.as_deref().map(bounded).unwrap_or_default();
            DispatchOutcome::refresh_with(ScreenEvent::WifiFailed)
        }

        Incoming::CurrentTime(time) => {
            device.time = bounded(&time.time);
            if let Some(date) = &time.date {
                device.date = bounded(date);
            }
            DispatchOutcome::default()
        }

        Incoming::Error(report) => {
            device.last_error = Some(bounded(&report.message));
            DispatchOutcome::default()
        }

        Incoming::ControlQueueComplete(_) => {
            if confirmations.discard_device_control() {
                info!("control queue finished, pending request dropped");
            }
            DispatchOutcome::event(ScreenEvent::ControlQueueDone)
        }

        Incoming::Unknown => {
            debug!("ignoring unknown message type");
            DispatchOutcome::default()
        }
    }
}

fn arm_confirmation(
    request: &ConfirmationRequest,
    confirmations: &mut ConfirmationManager,
    now_ms: u64,
    default_timeout_s: u32,
) -> DispatchOutcome {
    let (pending, event) = match request.confirmation_type {
        ConfirmationKind::Medication => {
            let items = request
                .reminders
                .iter()
                .take(MAX_CONFIRMATION_ITEMS)
                .map(ReminderItem::from)
                .collect();
            (
                PendingConfirmation::Medication { items },
                ScreenEvent::MedicationRequested,
            )
        }
        ConfirmationKind::DeviceControl => {
            let action = request
                .control
                .as_ref()
                .map(ControlAction::from)
                .unwrap_or_default();
            (
                PendingConfirmation::DeviceControl { action },
                ScreenEvent::ControlRequested,
            )
        }
    };

    let timeout_s = request.timeout_seconds.unwrap_or(default_timeout_s);
    info!(
        "confirmation armed: {}, timeout {}s",
        request.confirmation_type, timeout_s
    );
    if let Some(replaced) = confirmations.arm(pending, timeout_s, now_ms) {
        info!("confirmation replaced: {}", replaced.request.kind());
    }
    DispatchOutcome::refresh_with(event)
}

fn apply_dispensing(device: &mut DeviceContext, status: &DispensingStatus) -> DispatchOutcome {
    match status.status {
        DispensingPhase::Started => {
            device.dispensing.restart();
            device.dispensing.apply(status);
            DispatchOutcome::event(ScreenEvent::DispensingStarted)
        }
        DispensingPhase::InProgress => {
            device.dispensing.apply(status);
            DispatchOutcome::event(ScreenEvent::DispensingStarted)
        }
        DispensingPhase::Failed => {
            device.dispensing.apply(status);
            warn!("dispensing failed");
            DispatchOutcome::refresh()
        }
        DispensingPhase::Completed | DispensingPhase::Other => {
            device.dispensing.apply(status);
            DispatchOutcome::default()
        }
    }
}

fn apply_stock_alert(device: &mut DeviceContext, alert: &StockAlert) {
    if !device.mark_low_stock(alert.container_id, alert.current_capacity) {
        debug!("stock alert for unknown container {}", alert.container_id);
    }
    device.stock_banner = Some(match (&alert.message, &alert.medicine_name) {
        (Some(message), _) => bounded(message),
        (None, Some(name)) => format_bounded(format_args!("Low stock: {}", name)),
        (None, None) => format_bounded(format_args!(
            "Low stock: container {}",
            alert.container_id
        )),
    });
}
