//! Millisecond timer/scheduler engine.
//!
//! The control loop ticks the scheduler with the current monotonic time.
//! Due schedules are reported to a [`SchedulerDelegate`]; the main loop
//! implements the delegate and turns each fire into an
//! [`AppCommand`](crate::app::commands::AppCommand).
//!
//! ```text
//!   Clock::now_ms ──► Scheduler::tick ──► SchedulerDelegate
//!                                              │
//!                                              ▼
//!                                  AppService::handle_command()
//! ```
//!
//! Nothing here sleeps. A periodic schedule fires at most once per tick
//! even if the loop stalled for several intervals; it then re-arms one
//! interval after the tick that fired it.

use crate::app::ports::{ScheduleFiredKind, SchedulerDelegate};
use log::info;

// ═══════════════════════════════════════════════════════════════
//  Schedule types
// ═══════════════════════════════════════════════════════════════

/// A single schedule entry.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Human-readable label (e.g., "ph-sample").
    pub label: &'static str,
    pub kind: ScheduleKind,
    pub enabled: bool,
}

/// The type of schedule determines how and when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    /// Fire every `interval_ms`.
    Periodic { interval_ms: u32 },
    /// Fire once after `delay_ms`, then auto-disable.
    OneShot { delay_ms: u32 },
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent schedules (stack-allocated).
const MAX_SCHEDULES: usize = 4;

pub struct Scheduler {
    schedules: [Option<ScheduleEntry>; MAX_SCHEDULES],
    enabled: bool,
}

#[derive(Debug, Clone)]
struct ScheduleEntry {
    schedule: Schedule,
    /// Reference point for the next fire; set on the first tick after `add`.
    armed_at: Option<u64>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            schedules: [const { None }; MAX_SCHEDULES],
            enabled: true,
        }
    }

    /// Add a schedule.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, schedule: Schedule) -> Option<usize> {
        let (i, slot) = self.schedules.iter_mut().enumerate().find(|(_, s)| s.is_none())?;
        info!("Scheduler: added '{}' at slot {}", schedule.label, i);
        *slot = Some(ScheduleEntry {
            schedule,
            armed_at: None,
        });
        Some(i)
    }

    /// Remove a schedule by slot index.
    pub fn remove(&mut self, slot: usize) {
        if let Some(entry) = self.schedules.get_mut(slot).and_then(Option::take) {
            info!("Scheduler: removed '{}' from slot {}", entry.schedule.label, slot);
        }
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fire every schedule that is due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }

        for entry in self.schedules.iter_mut().flatten() {
            if !entry.schedule.enabled {
                continue;
            }
            let armed_at = *entry.armed_at.get_or_insert(now_ms);
            let elapsed = now_ms.saturating_sub(armed_at);

            match entry.schedule.kind {
                ScheduleKind::Periodic { interval_ms } => {
                    if elapsed >= u64::from(interval_ms) {
                        log::debug!("Scheduler: '{}' periodic fire", entry.schedule.label);
                        delegate.on_schedule_fired(entry.schedule.label, ScheduleFiredKind::Periodic);
                        entry.armed_at = Some(now_ms);
                    }
                }
                ScheduleKind::OneShot { delay_ms } => {
                    if elapsed >= u64::from(delay_ms) {
                        info!(
                            "Scheduler: '{}' one-shot fired (after {} ms)",
                            entry.schedule.label, delay_ms
                        );
                        delegate.on_schedule_fired(entry.schedule.label, ScheduleFiredKind::OneShot);
                        entry.schedule.enabled = false;
                    }
                }
            }
        }
    }

    /// Number of active (enabled) schedules.
    pub fn active_count(&self) -> usize {
        self.schedules
            .iter()
            .flatten()
            .filter(|e| e.schedule.enabled)
            .count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
