//! Events that trigger screen transitions

/// Events that can change the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenEvent {
    // Navigation taps
    /// Home "reminders" button
    ShowReminders,
    /// Home "containers" button
    ShowContainers,
    /// Home "schedule" button
    ShowSchedule,
    /// Back button on a list screen
    Back,

    // Answer taps
    /// Alarm dismissed by the user
    DismissAlarm,
    /// User confirmed the pending medication
    ConfirmMedication,
    /// User approved the pending device action
    ConfirmControl,
    /// User declined a pending confirmation
    CancelConfirmation,
    /// OK on a finished dispense
    DispensingAcknowledged,
    /// Quantity was right
    QuantityYes,
    /// User wants one more dose dispensed
    OneMore,
    /// User cleared the jam
    JamContinue,
    /// Wi-Fi error acknowledged
    WifiAcknowledged,

    // Primary controller messages
    /// `alarm_status{active:true}`, `reminder_alert` or `grouped_reminder_alert`
    AlarmRaised,
    /// `alarm_status{active:false}`
    AlarmCleared,
    /// `confirmation_request` for medication
    MedicationRequested,
    /// `confirmation_request` for a device action
    ControlRequested,
    /// `dispensing_status` started or in progress
    DispensingStarted,
    /// `all_dispensing_completed`
    AllDispensed,
    /// `jam_alert`
    JamDetected,
    /// `wifi_error_alert`
    WifiFailed,
    /// `control_queue_complete`
    ControlQueueDone,

    // Timer
    /// The pending confirmation ran out of time
    ConfirmationTimedOut,
}
