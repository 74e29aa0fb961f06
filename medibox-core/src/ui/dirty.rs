//! Dirty-region tracking between frames
//!
//! A full clear is expensive on an SPI TFT, so within one screen only the
//! parts whose values changed are redrawn. Each frame captures a `Snapshot`
//! of the displayed values; comparing it with the previous one yields the
//! regions to repaint.

use heapless::String;

use medibox_protocol::DispensingPhase;

use crate::device::records::{MESSAGE_LEN, TIME_LEN};
use crate::device::{Connectivity, DeviceContext, Environment};

/// Regions of the screen that need repainting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirtyRegions {
    /// Clock readout
    pub time: bool,
    /// Wi-Fi / MQTT / AP indicators
    pub connectivity: bool,
    /// Temperature and humidity
    pub sensors: bool,
    /// Container, low-stock, reminder and schedule counts
    pub counts: bool,
    /// Confirmation seconds remaining
    pub countdown: bool,
    /// Dispensing progress line
    pub progress: bool,
    /// Error or stock banner
    pub banner: bool,
}

impl DirtyRegions {
    pub const ALL: Self = Self {
        time: true,
        connectivity: true,
        sensors: true,
        counts: true,
        countdown: true,
        progress: true,
        banner: true,
    };

    pub fn any(&self) -> bool {
        self.time
            || self.connectivity
            || self.sensors
            || self.counts
            || self.countdown
            || self.progress
            || self.banner
    }

    /// Any part of the top status bar
    pub fn status_bar(&self) -> bool {
        self.time || self.connectivity || self.sensors
    }
}

/// Tallies shown on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub containers: usize,
    pub low_stock: usize,
    pub reminders: usize,
    pub schedule: usize,
}

/// Dispensing values shown on the progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub phase: DispensingPhase,
    pub current: u8,
    pub total: u8,
    pub complete: bool,
}

/// Displayed values at the time of one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub time: String<TIME_LEN>,
    pub connectivity: Connectivity,
    pub environment: Environment,
    pub counts: Counts,
    pub countdown_s: Option<u32>,
    pub progress: Progress,
    pub last_error: Option<String<MESSAGE_LEN>>,
    pub stock_banner: Option<String<MESSAGE_LEN>>,
}

impl Snapshot {
    pub fn capture(device: &DeviceContext, countdown_s: Option<u32>) -> Self {
        Self {
            time: device.time.clone(),
            connectivity: device.connectivity,
            environment: device.environment,
            counts: Counts {
                containers: device.containers.len(),
                low_stock: device.low_stock_count(),
                reminders: device.active_reminder_count(),
                schedule: device.schedule.len(),
            },
            countdown_s,
            progress: Progress {
                phase: device.dispensing.phase,
                current: device.dispensing.current,
                total: device.dispensing.total,
                complete: device.dispensing.complete,
            },
            last_error: device.last_error.clone(),
            stock_banner: device.stock_banner.clone(),
        }
    }

    /// Regions whose values differ between `self` (older) and `next`
    pub fn diff(&self, next: &Snapshot) -> DirtyRegions {
        DirtyRegions {
            time: self.time != next.time,
            connectivity: self.connectivity != next.connectivity,
            sensors: self.environment != next.environment,
            counts: self.counts != next.counts,
            countdown: self.countdown_s != next.countdown_s,
            progress: self.progress != next.progress,
            banner: self.last_error != next.last_error || self.stock_banner != next.stock_banner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::bounded;

    #[test]
    fn test_identical_snapshots_are_clean() {
        let device = DeviceContext::new();
        let a = Snapshot::capture(&device, Some(30));
        let b = Snapshot::capture(&device, Some(30));
        assert!(!a.diff(&b).any());
    }

    #[test]
    fn test_time_change_only_dirties_time() {
        let mut device = DeviceContext::new();
        let before = Snapshot::capture(&device, None);
        device.time = bounded("10:01");
        let regions = before.diff(&Snapshot::capture(&device, None));
        assert!(regions.time);
        assert!(regions.status_bar());
        assert!(!regions.counts && !regions.countdown && !regions.banner);
    }

    #[test]
    fn test_countdown_tick_is_dirty() {
        let device = DeviceContext::new();
        let before = Snapshot::capture(&device, Some(10));
        let regions = before.diff(&Snapshot::capture(&device, Some(9)));
        assert_eq!(
            regions,
            DirtyRegions {
                countdown: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_banner_change_is_dirty() {
        let mut device = DeviceContext::new();
        let before = Snapshot::capture(&device, None);
        device.last_error = Some(bounded("Sensor offline"));
        assert!(before.diff(&Snapshot::capture(&device, None)).banner);
    }
}
