//! Confirmation slot
//!
//! The primary controller may ask the user to approve a medication dose or a
//! device action. Only one request is ever outstanding; a new one replaces
//! whatever was pending. The slot is emptied by the user's answer or by its
//! deadline passing, whichever comes first.

use heapless::Vec;

use medibox_protocol::{ConfirmationKind, Outgoing};

use crate::device::{ControlAction, ReminderItem};

/// Medicines listed in one medication confirmation
pub const MAX_CONFIRMATION_ITEMS: usize = 10;

/// What the user is being asked to confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirmation {
    Medication {
        items: Vec<ReminderItem, MAX_CONFIRMATION_ITEMS>,
    },
    DeviceControl {
        action: ControlAction,
    },
}

impl PendingConfirmation {
    pub fn kind(&self) -> ConfirmationKind {
        match self {
            PendingConfirmation::Medication { .. } => ConfirmationKind::Medication,
            PendingConfirmation::DeviceControl { .. } => ConfirmationKind::DeviceControl,
        }
    }

    /// Build the response message for this request
    fn response(&self, confirmed: bool, timeout: bool) -> Outgoing {
        let control_id = match self {
            PendingConfirmation::DeviceControl { action } => action.control_id.clone(),
            PendingConfirmation::Medication { .. } => None,
        };
        Outgoing::ConfirmationResponse {
            confirmed,
            timeout: timeout.then_some(true),
            confirmation_type: self.kind(),
            control_id,
        }
    }
}

/// A request together with its deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedConfirmation {
    pub request: PendingConfirmation,
    pub timeout_s: u32,
    pub armed_at_ms: u64,
}

impl ArmedConfirmation {
    fn timeout_ms(&self) -> u64 {
        u64::from(self.timeout_s) * 1000
    }

    fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.armed_at_ms)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.timeout_ms()
    }

    /// Whole seconds left, rounded up
    pub fn remaining_s(&self, now_ms: u64) -> u32 {
        let left = self.timeout_ms().saturating_sub(self.elapsed_ms(now_ms));
        // Bounded by timeout_s, which is a u32
        left.div_ceil(1000) as u32
    }
}

/// Single-slot confirmation manager
#[derive(Debug, Clone, Default)]
pub struct ConfirmationManager {
    slot: Option<ArmedConfirmation>,
}

impl ConfirmationManager {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    pub fn pending(&self) -> Option<&ArmedConfirmation> {
        self.slot.as_ref()
    }

    /// Arm the slot, returning the request it replaced
    pub fn arm(
        &mut self,
        request: PendingConfirmation,
        timeout_s: u32,
        now_ms: u64,
    ) -> Option<ArmedConfirmation> {
        self.slot.replace(ArmedConfirmation {
            request,
            timeout_s,
            armed_at_ms: now_ms,
        })
    }

    /// Disarm an expired request and produce its timeout response
    pub fn check_timeout(&mut self, now_ms: u64) -> Option<Outgoing> {
        if !self.slot.as_ref()?.is_expired(now_ms) {
            return None;
        }
        let armed = self.slot.take()?;
        Some(armed.request.response(false, true))
    }

    /// Disarm with the user's answer
    ///
    /// Returns the request that was answered and the response to send, or
    /// `None` if nothing was pending.
    pub fn respond(&mut self, confirmed: bool) -> Option<(PendingConfirmation, Outgoing)> {
        let armed = self.slot.take()?;
        let response = armed.request.response(confirmed, false);
        Some((armed.request, response))
    }

    /// Drop a pending device-control request without answering it
    ///
    /// Used when the primary reports its control queue finished on its own.
    pub fn discard_device_control(&mut self) -> bool {
        let is_control = matches!(
            self.slot,
            Some(ArmedConfirmation {
                request: PendingConfirmation::DeviceControl { .. },
                ..
            })
        );
        if is_control {
            self.slot = None;
        }
        is_control
    }

    /// Seconds left on the pending request, if any
    pub fn remaining_s(&self, now_ms: u64) -> Option<u32> {
        self.slot.as_ref().map(|armed| armed.remaining_s(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::bounded;

    fn medication() -> PendingConfirmation {
        PendingConfirmation::Medication { items: Vec::new() }
    }

    fn control(id: &str) -> PendingConfirmation {
        PendingConfirmation::DeviceControl {
            action: ControlAction {
                control_id: Some(bounded(id)),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_timeout_fires_at_deadline() {
        let mut manager = ConfirmationManager::new();
        manager.arm(medication(), 60, 1_000);

        assert_eq!(manager.check_timeout(60_999), None);
        assert!(manager.is_armed());

        let response = manager.check_timeout(61_000).unwrap();
        assert_eq!(
            response,
            Outgoing::ConfirmationResponse {
                confirmed: false,
                timeout: Some(true),
                confirmation_type: ConfirmationKind::Medication,
                control_id: None,
            }
        );
        assert!(!manager.is_armed());
        assert_eq!(manager.check_timeout(120_000), None);
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        let mut manager = ConfirmationManager::new();
        manager.arm(medication(), 0, 5_000);
        assert!(manager.check_timeout(5_000).is_some());
    }

    #[test]
    fn test_new_request_replaces_old() {
        let mut manager = ConfirmationManager::new();
        assert!(manager.arm(medication(), 60, 0).is_none());
        let replaced = manager.arm(control("c-1"), 30, 10_000).unwrap();
        assert_eq!(replaced.request.kind(), ConfirmationKind::Medication);

        // The replacement's own deadline applies
        assert!(manager.check_timeout(39_999).is_none());
        assert!(manager.check_timeout(40_000).is_some());
    }

    #[test]
    fn test_respond_carries_control_id() {
        let mut manager = ConfirmationManager::new();
        manager.arm(control("c-9"), 60, 0);

        let (request, response) = manager.respond(true).unwrap();
        assert_eq!(request.kind(), ConfirmationKind::DeviceControl);
        assert_eq!(
            response,
            Outgoing::ConfirmationResponse {
                confirmed: true,
                timeout: None,
                confirmation_type: ConfirmationKind::DeviceControl,
                control_id: Some(bounded("c-9")),
            }
        );
        assert!(manager.respond(false).is_none());
    }

    #[test]
    fn test_remaining_rounds_up() {
        let mut manager = ConfirmationManager::new();
        assert_eq!(manager.remaining_s(0), None);
        manager.arm(medication(), 60, 0);
        assert_eq!(manager.remaining_s(0), Some(60));
        assert_eq!(manager.remaining_s(59_001), Some(1));
        assert_eq!(manager.remaining_s(60_000), Some(0));
    }

    #[test]
    fn test_discard_only_touches_device_control() {
        let mut manager = ConfirmationManager::new();
        manager.arm(medication(), 60, 0);
        assert!(!manager.discard_device_control());
        assert!(manager.is_armed());

        manager.arm(control("c-2"), 60, 0);
        assert!(manager.discard_device_control());
        assert!(!manager.is_armed());
    }
}
