//! Per-screen touch handling
//!
//! A point goes to the handler of the current screen only. Each handler
//! checks its own buttons; a point outside all of them does nothing.

use crate::state::ScreenState;

use super::calibration::Point;
use super::layout::{
    Rect, HOME_CONTAINERS, HOME_REMINDERS, HOME_SCHEDULE, LEFT_BUTTON, LIST_BACK, OK_BUTTON,
    RIGHT_BUTTON, WIDE_BUTTON,
};

/// A button press recognised on the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchAction {
    ShowReminders,
    ShowContainers,
    ShowSchedule,
    Back,
    DismissAlarm,
    Confirm,
    Cancel,
    DispensingOk,
    QuantityYes,
    OneMore,
    JamContinue,
    WifiOk,
}

/// Screen-specific facts the handlers need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteContext {
    /// The OK button on the dispensing screen is only live once finished
    pub dispensing_finished: bool,
}

/// Find the action under `point` on `screen`
pub fn route(screen: ScreenState, point: Point, ctx: RouteContext) -> Option<TouchAction> {
    match screen {
        ScreenState::Home => hit(
            point,
            &[
                (HOME_REMINDERS, TouchAction::ShowReminders),
                (HOME_CONTAINERS, TouchAction::ShowContainers),
                (HOME_SCHEDULE, TouchAction::ShowSchedule),
            ],
        ),
        ScreenState::Containers | ScreenState::Reminders | ScreenState::Schedule => {
            hit(point, &[(LIST_BACK, TouchAction::Back)])
        }
        ScreenState::Alarm => hit(point, &[(WIDE_BUTTON, TouchAction::DismissAlarm)]),
        ScreenState::TakeMedicine | ScreenState::ControlQueueConfirmation => hit(
            point,
            &[
                (LEFT_BUTTON, TouchAction::Confirm),
                (RIGHT_BUTTON, TouchAction::Cancel),
            ],
        ),
        ScreenState::Dispensing if ctx.dispensing_finished => {
            hit(point, &[(OK_BUTTON, TouchAction::DispensingOk)])
        }
        ScreenState::Dispensing => None,
        ScreenState::QuantityConfirmation => hit(
            point,
            &[
                (LEFT_BUTTON, TouchAction::QuantityYes),
                (RIGHT_BUTTON, TouchAction::OneMore),
            ],
        ),
        ScreenState::JamAlert => hit(point, &[(WIDE_BUTTON, TouchAction::JamContinue)]),
        ScreenState::WifiError => hit(point, &[(OK_BUTTON, TouchAction::WifiOk)]),
    }
}

fn hit(point: Point, buttons: &[(Rect, TouchAction)]) -> Option<TouchAction> {
    buttons
        .iter()
        .find(|(rect, _)| rect.contains(point))
        .map(|&(_, action)| action)
}
