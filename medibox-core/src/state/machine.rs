//! Screen state definition
//!
//! Every draw routine and touch handler is a function of the current screen.
//! Messages from the primary controller force their screen from anywhere;
//! taps only act on the screen that shows them.

use super::events::ScreenEvent;

/// UI screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenState {
    /// Status bar, banners, navigation
    #[default]
    Home,
    /// Container list with stock levels
    Containers,
    /// Configured reminders
    Reminders,
    /// Today's dose schedule
    Schedule,
    /// A dose is due
    Alarm,
    /// Medication confirmation with countdown
    TakeMedicine,
    /// Dispense in progress or just finished
    Dispensing,
    /// Did the right number of pills come out?
    QuantityConfirmation,
    /// A container jammed
    JamAlert,
    /// Primary could not join Wi-Fi
    WifiError,
    /// Device action confirmation with countdown
    ControlQueueConfirmation,
}

impl ScreenState {
    /// Check if this screen shows a confirmation countdown
    pub fn shows_countdown(&self) -> bool {
        matches!(
            self,
            ScreenState::TakeMedicine | ScreenState::ControlQueueConfirmation
        )
    }

    /// Check if this is one of the list screens reached from home
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ScreenState::Containers | ScreenState::Reminders | ScreenState::Schedule
        )
    }

    /// Process an event and return the next screen
    pub fn transition(self, event: ScreenEvent) -> Self {
        use ScreenEvent::*;
        use ScreenState::*;

        match (self, event) {
            // Forced by the primary controller from any screen
            (_, AlarmRaised) => Alarm,
            (_, MedicationRequested) => TakeMedicine,
            (_, ControlRequested) => ControlQueueConfirmation,
            (_, DispensingStarted) => Dispensing,
            (_, AllDispensed) => QuantityConfirmation,
            (_, JamDetected) => JamAlert,
            (_, WifiFailed) => WifiError,
            (_, ConfirmationTimedOut) => Home,

            // Home navigation
            (Home, ShowReminders) => Reminders,
            (Home, ShowContainers) => Containers,
            (Home, ShowSchedule) => Schedule,

            // List screens
            (Containers | Reminders | Schedule, Back) => Home,

            // Alarm
            (Alarm, DismissAlarm) => Home,
            (Alarm, AlarmCleared) => Home,

            // TakeMedicine
            (TakeMedicine, ConfirmMedication) => Dispensing,
            (TakeMedicine, CancelConfirmation) => Home,

            // ControlQueueConfirmation
            (ControlQueueConfirmation, ConfirmControl) => Home,
            (ControlQueueConfirmation, CancelConfirmation) => Home,
            (ControlQueueConfirmation, ControlQueueDone) => Home,

            // Dispensing
            (Dispensing, DispensingAcknowledged) => Home,

            // QuantityConfirmation
            (QuantityConfirmation, QuantityYes) => Home,
            (QuantityConfirmation, OneMore) => Dispensing,

            // JamAlert
            (JamAlert, JamContinue) => Dispensing,

            // WifiError
            (WifiError, WifiAcknowledged) => Home,

            // Default: stay on the current screen
            _ => self,
        }
    }
}
