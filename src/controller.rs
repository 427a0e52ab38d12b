use crate::gui::LoaderApp;
use crate::messages::{ExitReason, HostToUi, UiToHost};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    Active,
    ExitRequested,
}

/// UI-thread side of a session: applies host commands to the [`LoaderApp`]
/// and forwards the requests it raises back to the host.
pub struct SessionController {
    app: LoaderApp,
    host_to_ui_rx: Receiver<HostToUi>,
    ui_to_host_tx: Sender<UiToHost>,
    lifecycle: SessionLifecycle,
    exit_reason: Option<ExitReason>,
}

impl SessionController {
    pub fn new(
        app: LoaderApp,
        host_to_ui_rx: Receiver<HostToUi>,
        ui_to_host_tx: Sender<UiToHost>,
    ) -> Self {
        Self {
            app,
            host_to_ui_rx,
            ui_to_host_tx,
            lifecycle: SessionLifecycle::Active,
            exit_reason: None,
        }
    }

    pub fn app(&self) -> &LoaderApp {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut LoaderApp {
        &mut self.app
    }

    pub fn lifecycle(&self) -> SessionLifecycle {
        self.lifecycle
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason.clone()
    }

    /// Apply every queued host command in arrival order.
    pub fn pump_host_messages(&mut self) {
        loop {
            match self.host_to_ui_rx.try_recv() {
                Ok(HostToUi::Close) => {
                    self.app.apply(HostToUi::Close);
                    self.request_exit(ExitReason::HostRequest);
                }
                Ok(cmd) => self.app.apply(cmd),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("host side of the session went away");
                    self.request_exit(ExitReason::HostRequest);
                    break;
                }
            }
        }
    }

    /// Forward queued UI requests and pick up a close from the exit button.
    pub fn flush_events(&mut self) {
        for event in self.app.take_events() {
            if let Err(err) = self.ui_to_host_tx.send(UiToHost::Event(event)) {
                tracing::debug!(event = ?err.0, "host is gone, event dropped");
            }
        }
        if self.app.close_requested() {
            self.request_exit(ExitReason::UserRequest);
        }
    }

    /// One frame's worth of non-drawing work.
    pub fn frame(&mut self, ctx: &eframe::egui::Context, now: Instant) {
        self.pump_host_messages();
        self.app.render(ctx, now);
        self.flush_events();
    }

    fn request_exit(&mut self, reason: ExitReason) {
        if self.lifecycle == SessionLifecycle::Active {
            tracing::debug!(?reason, "session exit requested");
            self.lifecycle = SessionLifecycle::ExitRequested;
            self.exit_reason = Some(reason);
        }
    }
}
