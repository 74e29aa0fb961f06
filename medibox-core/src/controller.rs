//! Display controller
//!
//! Owns all application state: device context, confirmation slot and screen
//! machine. Inputs arrive as decoded payloads, timer polls and raw touches;
//! outputs are messages for the primary controller and draw calls.

use medibox_hal::RawPoint;
use medibox_protocol::{Incoming, MessageError, Outgoing};

use crate::config::DisplayConfig;
use crate::confirm::{ConfirmationManager, PendingConfirmation};
use crate::device::DeviceContext;
use crate::dispatch::{dispatch, DispatchOutcome, DispatchTarget};
use crate::state::{ScreenEvent, ScreenState};
use crate::touch::{route, Point, RouteContext, TouchAction};
use crate::ui::{render, DrawMode, Renderer, ScreenMachine, Transition, View};

/// Result of one touch sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchOutcome {
    /// Where the sample landed on screen
    pub point: Point,
    /// Button hit, if any
    pub action: Option<TouchAction>,
    /// Message to send to the primary controller
    pub outgoing: Option<Outgoing>,
}

/// Application state and its event handlers
#[derive(Debug, Clone)]
pub struct Controller {
    config: DisplayConfig,
    device: DeviceContext,
    confirmations: ConfirmationManager,
    screen: ScreenMachine,
}

impl Controller {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            device: DeviceContext::new(),
            confirmations: ConfirmationManager::new(),
            screen: ScreenMachine::new(),
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    pub fn confirmations(&self) -> &ConfirmationManager {
        &self.confirmations
    }

    pub fn screen(&self) -> &ScreenMachine {
        &self.screen
    }

    pub fn current_screen(&self) -> ScreenState {
        self.screen.current()
    }

    /// Decode and apply one payload
    ///
    /// A payload that does not decode leaves all state untouched.
    pub fn handle_payload(
        &mut self,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<DispatchOutcome, MessageError> {
        let message = Incoming::parse(payload)?;
        trace!("received {}", message.kind());
        Ok(self.handle_message(&message, now_ms))
    }

    /// Apply one decoded message
    pub fn handle_message(&mut self, message: &Incoming, now_ms: u64) -> DispatchOutcome {
        let outcome = dispatch(
            message,
            DispatchTarget {
                device: &mut self.device,
                confirmations: &mut self.confirmations,
                now_ms,
                default_timeout_s: self.config.default_confirmation_timeout_s,
            },
        );
        if outcome.refresh {
            self.screen.request_refresh();
        }
        if let Some(event) = outcome.event {
            self.apply_event(event);
        }
        outcome
    }

    /// Expire the pending confirmation if its deadline has passed
    ///
    /// Returns the timeout response to send.
    pub fn poll_timeout(&mut self, now_ms: u64) -> Option<Outgoing> {
        let response = self.confirmations.check_timeout(now_ms)?;
        info!("confirmation timed out");
        self.apply_event(ScreenEvent::ConfirmationTimedOut);
        Some(response)
    }

    /// Map a raw touch sample and run the current screen's handler
    pub fn handle_touch(&mut self, raw: RawPoint) -> TouchOutcome {
        let point = self.config.touch.map(raw, self.config.screen);
        let ctx = RouteContext {
            dispensing_finished: self.device.dispensing.finished(),
        };
        let action = route(self.screen.current(), point, ctx);
        let outgoing = match action {
            Some(action) => {
                debug!("touch {} at ({}, {})", action, point.x, point.y);
                self.perform(action)
            }
            None => None,
        };
        TouchOutcome {
            point,
            action,
            outgoing,
        }
    }

    fn perform(&mut self, action: TouchAction) -> Option<Outgoing> {
        match action {
            TouchAction::ShowReminders => self.navigate(ScreenEvent::ShowReminders),
            TouchAction::ShowContainers => self.navigate(ScreenEvent::ShowContainers),
            TouchAction::ShowSchedule => self.navigate(ScreenEvent::ShowSchedule),
            TouchAction::Back => self.navigate(ScreenEvent::Back),
            TouchAction::DismissAlarm => {
                self.device.alarm.clear();
                self.navigate(ScreenEvent::DismissAlarm)
            }
            TouchAction::Confirm => self.answer(true),
            TouchAction::Cancel => self.answer(false),
            TouchAction::DispensingOk => self.navigate(ScreenEvent::DispensingAcknowledged),
            TouchAction::QuantityYes => {
                self.apply_event(ScreenEvent::QuantityYes);
                Some(Outgoing::QuantityConfirmed {
                    confirmed: true,
                    one_more: None,
                })
            }
            TouchAction::OneMore => {
                self.device.dispensing.restart();
                self.apply_event(ScreenEvent::OneMore);
                Some(Outgoing::QuantityConfirmed {
                    confirmed: false,
                    one_more: Some(true),
                })
            }
            TouchAction::JamContinue => {
                let container_number = self.device.jam.container_number;
                self.device.dispensing.restart();
                self.apply_event(ScreenEvent::JamContinue);
                Some(Outgoing::JamCleared { container_number })
            }
            TouchAction::WifiOk => self.navigate(ScreenEvent::WifiAcknowledged),
        }
    }

    fn navigate(&mut self, event: ScreenEvent) -> Option<Outgoing> {
        self.apply_event(event);
        None
    }

    /// Answer the pending confirmation from a confirm/cancel tap
    fn answer(&mut self, confirmed: bool) -> Option<Outgoing> {
        let Some((request, response)) = self.confirmations.respond(confirmed) else {
            // Nothing pending any more; just leave the prompt
            self.apply_event(ScreenEvent::CancelConfirmation);
            return None;
        };

        info!("confirmation answered: {}", confirmed);
        let event = match (request, confirmed) {
            (PendingConfirmation::Medication { .. }, true) => {
                self.device.dispensing.restart();
                ScreenEvent::ConfirmMedication
            }
            (PendingConfirmation::DeviceControl { .. }, true) => ScreenEvent::ConfirmControl,
            (_, false) => ScreenEvent::CancelConfirmation,
        };
        self.apply_event(event);
        Some(response)
    }

    fn apply_event(&mut self, event: ScreenEvent) -> Option<Transition> {
        let transition = self.screen.apply(event)?;
        debug!("screen {} -> {}", transition.from, transition.to);
        Some(transition)
    }

    /// Run one draw step
    ///
    /// On failure the screen is marked for a full redraw next frame.
    pub fn render<R: Renderer>(&mut self, renderer: &mut R, now_ms: u64) -> Result<DrawMode, R::Error> {
        let screen = self.screen.current();
        let countdown_s = if screen.shows_countdown() {
            self.confirmations.remaining_s(now_ms)
        } else {
            None
        };
        let view = View {
            screen,
            device: &self.device,
            pending: self.confirmations.pending().map(|armed| &armed.request),
            countdown_s,
        };

        let mode = self.screen.begin_frame(view.snapshot());
        if let Err(err) = render(renderer, &view, mode) {
            self.screen.request_refresh();
            return Err(err);
        }
        Ok(mode)
    }
}
