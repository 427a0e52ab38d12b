//! Simulated load/download sequence shown before a product is launched.
//!
//! `Loading` runs for a fixed duration and drives the progress bar. When it
//! completes the UI opens a popup; dismissing that popup schedules the
//! "download", which fires a single launch request after a fixed delay.
//! The timer is advanced by comparing wall-clock instants once per frame.

use crate::profile::Subscription;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadRejected {
    #[error("Select a product first")]
    NoSelection,
    #[error("{0} has no file to launch")]
    NoLaunchTarget(String),
    #[error("{0} is not active")]
    Inactive(String),
    #[error("A load is already in progress")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Loading reached 100%; the completion popup should open.
    LoadCompleted { product: String },
    /// Download delay elapsed; hand the file to the host.
    Launch { file_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Loading { started: Instant },
    PopupPending,
    DownloadScheduled { at: Instant },
}

#[derive(Debug, Clone)]
pub struct LoadTimer {
    load_duration: Duration,
    download_delay: Duration,
    require_active: bool,
    phase: Phase,
    product: String,
    file_id: String,
}

impl LoadTimer {
    pub fn new(load_duration: Duration, download_delay: Duration, require_active: bool) -> Self {
        Self {
            load_duration,
            download_delay,
            require_active,
            phase: Phase::Idle,
            product: String::new(),
            file_id: String::new(),
        }
    }

    pub fn start(&mut self, sub: &Subscription, now: Instant) -> Result<(), LoadRejected> {
        if !self.is_idle() {
            return Err(LoadRejected::Busy);
        }
        let file_id = sub
            .launch_file_id()
            .ok_or_else(|| LoadRejected::NoLaunchTarget(sub.plan.clone()))?;
        if self.require_active && !sub.is_active() {
            return Err(LoadRejected::Inactive(sub.plan.clone()));
        }
        self.product = sub.plan.clone();
        self.file_id = file_id.to_string();
        self.phase = Phase::Loading { started: now };
        tracing::debug!(product = %self.product, "load started");
        Ok(())
    }

    pub fn tick(&mut self, now: Instant) -> Option<TimerEvent> {
        match self.phase {
            Phase::Loading { started } => {
                if now.saturating_duration_since(started) < self.load_duration {
                    return None;
                }
                self.phase = Phase::PopupPending;
                tracing::debug!(product = %self.product, "load completed");
                Some(TimerEvent::LoadCompleted {
                    product: self.product.clone(),
                })
            }
            Phase::DownloadScheduled { at } if now >= at => {
                self.phase = Phase::Idle;
                self.product.clear();
                let file_id = std::mem::take(&mut self.file_id);
                tracing::debug!(%file_id, "download delay elapsed");
                Some(TimerEvent::Launch { file_id })
            }
            _ => None,
        }
    }

    pub fn dismiss(&mut self, now: Instant) {
        if self.phase == Phase::PopupPending {
            self.phase = Phase::DownloadScheduled {
                at: now + self.download_delay,
            };
        }
    }

    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
        self.product.clear();
        self.file_id.clear();
    }

    pub fn progress(&self, now: Instant) -> f32 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Loading { started } => {
                if self.load_duration.is_zero() {
                    return 1.0;
                }
                let elapsed = now.saturating_duration_since(started).as_secs_f32();
                (elapsed / self.load_duration.as_secs_f32()).clamp(0.0, 1.0)
            }
            Phase::PopupPending | Phase::DownloadScheduled { .. } => 1.0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn popup_pending(&self) -> bool {
        self.phase == Phase::PopupPending
    }

    pub fn download_scheduled(&self) -> bool {
        matches!(self.phase, Phase::DownloadScheduled { .. })
    }

    /// Product name of the running sequence; empty when idle.
    pub fn product(&self) -> &str {
        &self.product
    }
}
