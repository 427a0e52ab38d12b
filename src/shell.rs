use crate::controller::{SessionController, SessionLifecycle};
use crate::gui::LoaderApp;
use crate::messages::{ExitReason, HostToUi, UiToHost};
use crate::settings::LoaderConfig;
use crate::win_util;
use anyhow::{anyhow, Result};
use eframe::egui;
use once_cell::sync::{Lazy, OnceCell};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, SendError, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const SESSION_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A request for the UI thread to open one window session.
struct SessionRequest {
    config: LoaderConfig,
    host_to_ui_rx: Receiver<HostToUi>,
    ui_to_host_tx: Sender<UiToHost>,
    ctx_slot: Arc<OnceCell<egui::Context>>,
}

/// winit refuses to build a second event loop in one process, and eframe
/// keeps its loop in a thread local. Every session therefore runs on the same
/// long-lived thread.
static UI_THREAD: Lazy<Mutex<Option<Sender<SessionRequest>>>> = Lazy::new(|| Mutex::new(None));

fn spawn_ui_thread() -> Result<Sender<SessionRequest>> {
    let (tx, rx) = channel::<SessionRequest>();
    thread::Builder::new()
        .name("loader-ui".to_string())
        .spawn(move || {
            for request in rx {
                run_session(request);
            }
            tracing::debug!("UI thread exiting");
        })
        .map_err(|err| anyhow!("failed to spawn UI thread: {err}"))?;
    Ok(tx)
}

/// Hand `request` to the worker behind `slot`, starting one when there is
/// none. A worker that has died is replaced once.
fn submit_to_worker<T>(
    slot: &Mutex<Option<Sender<T>>>,
    request: T,
    spawn: impl FnOnce() -> Result<Sender<T>>,
) -> Result<()> {
    let mut guard = slot
        .lock()
        .map_err(|_| anyhow!("UI thread lock poisoned"))?;
    let request = match guard.as_ref() {
        Some(tx) => match tx.send(request) {
            Ok(()) => return Ok(()),
            Err(SendError(request)) => {
                tracing::warn!("UI thread is gone, starting a new one");
                *guard = None;
                request
            }
        },
        None => request,
    };
    let tx = spawn()?;
    tx.send(request)
        .map_err(|_| anyhow!("UI thread is no longer running"))?;
    *guard = Some(tx);
    Ok(())
}

/// Host-side handle to a running window session. Dropping it closes the
/// window and waits for the session to wind down.
pub struct UiShell {
    host_to_ui_tx: Sender<HostToUi>,
    ui_to_host_rx: Receiver<UiToHost>,
    ctx_slot: Arc<OnceCell<egui::Context>>,
    exited: bool,
}

impl UiShell {
    /// Queue a window session on the UI thread. The first message on the
    /// returned handle is `Started` or `Exited`.
    pub fn spawn(config: LoaderConfig) -> Result<Self> {
        let (host_to_ui_tx, host_to_ui_rx) = channel::<HostToUi>();
        let (ui_to_host_tx, ui_to_host_rx) = channel::<UiToHost>();
        let ctx_slot = Arc::new(OnceCell::new());
        let request = SessionRequest {
            config,
            host_to_ui_rx,
            ui_to_host_tx,
            ctx_slot: Arc::clone(&ctx_slot),
        };
        submit_to_worker(&UI_THREAD, request, spawn_ui_thread)?;
        Ok(Self {
            host_to_ui_tx,
            ui_to_host_rx,
            ctx_slot,
            exited: false,
        })
    }

    /// Wrap existing channels without a window behind them.
    pub fn from_channels(
        host_to_ui_tx: Sender<HostToUi>,
        ui_to_host_rx: Receiver<UiToHost>,
    ) -> Self {
        Self {
            host_to_ui_tx,
            ui_to_host_rx,
            ctx_slot: Arc::new(OnceCell::new()),
            exited: false,
        }
    }

    /// Queue a command and wake the UI so it is applied promptly.
    pub fn send(&self, cmd: HostToUi) -> bool {
        let sent = self.host_to_ui_tx.send(cmd).is_ok();
        if let Some(ctx) = self.ctx_slot.get() {
            ctx.request_repaint();
        }
        sent
    }

    pub fn try_recv(&mut self) -> Result<UiToHost, TryRecvError> {
        let msg = self.ui_to_host_rx.try_recv();
        self.note(&msg);
        msg
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<UiToHost, RecvTimeoutError> {
        let msg = self.ui_to_host_rx.recv_timeout(timeout);
        self.note(&msg);
        msg
    }

    fn note<E>(&mut self, msg: &Result<UiToHost, E>) {
        if let Ok(UiToHost::Exited { .. }) = msg {
            self.exited = true;
        }
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// Ask the window to close and wait for the session to report back.
    /// Messages still in flight are discarded.
    pub fn close(&mut self) {
        if self.exited {
            return;
        }
        self.send(HostToUi::Close);
        let deadline = Instant::now() + SESSION_CLOSE_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.recv_timeout(remaining) {
                Ok(UiToHost::Exited { reason, .. }) => {
                    tracing::debug!(?reason, "session closed");
                    break;
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {
                    tracing::error!("loader window did not close in time");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.exited = true;
    }
}

impl Drop for UiShell {
    fn drop(&mut self) {
        self.close();
    }
}

fn native_options(config: &LoaderConfig) -> eframe::NativeOptions {
    let (width, height) = config.window_size;
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(config.title.clone())
        .with_inner_size([width, height])
        .with_decorations(false)
        .with_transparent(true)
        .with_resizable(false);
    if let Some(pos) = win_util::initial_position(config.window_size) {
        viewport = viewport.with_position(pos);
    }
    eframe::NativeOptions {
        viewport,
        event_loop_builder: Some(Box::new(|builder| {
            #[cfg(target_os = "windows")]
            {
                use winit::platform::windows::EventLoopBuilderExtWindows;
                builder.with_any_thread(true);
            }
            #[cfg(all(
                unix,
                not(any(target_os = "macos", target_os = "ios", target_os = "android"))
            ))]
            {
                use winit::platform::x11::EventLoopBuilderExtX11;
                builder.with_any_thread(true);
            }
        })),
        ..Default::default()
    }
}

fn run_session(request: SessionRequest) {
    let SessionRequest {
        config,
        host_to_ui_rx,
        ui_to_host_tx,
        ctx_slot,
    } = request;
    let exit_reason: Arc<OnceCell<ExitReason>> = Arc::new(OnceCell::new());
    let options = native_options(&config);
    let title = config.title.clone();

    let exit_tx = ui_to_host_tx.clone();
    let app_exit_reason = Arc::clone(&exit_reason);
    let app_ctx_slot = Arc::clone(&ctx_slot);
    tracing::info!(%title, "opening loader window");
    let result = eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let _ = app_ctx_slot.set(cc.egui_ctx.clone());
            let _ = ui_to_host_tx.send(UiToHost::Started);
            let controller =
                SessionController::new(LoaderApp::new(config), host_to_ui_rx, ui_to_host_tx);
            Box::new(ShellApp {
                controller,
                exit_reason: app_exit_reason,
                first_frame: true,
            })
        }),
    );

    let started = ctx_slot.get().is_some();
    let (reason, error) = match result {
        Ok(()) => (
            exit_reason.get().cloned().unwrap_or(ExitReason::WindowClosed),
            None,
        ),
        Err(err) => {
            tracing::error!("loader window failed: {err}");
            let reason = if started {
                exit_reason.get().cloned().unwrap_or(ExitReason::WindowClosed)
            } else {
                ExitReason::StartFailure
            };
            (reason, Some(err.to_string()))
        }
    };
    tracing::info!(?reason, "loader window closed");
    let _ = exit_tx.send(UiToHost::Exited { reason, error });
}

struct ShellApp {
    controller: SessionController,
    exit_reason: Arc<OnceCell<ExitReason>>,
    first_frame: bool,
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if self.first_frame {
            win_util::bring_to_front(frame);
            self.first_frame = false;
        }
        self.controller.frame(ctx, Instant::now());
        if self.controller.lifecycle() == SessionLifecycle::ExitRequested {
            if let Some(reason) = self.controller.exit_reason() {
                let _ = self.exit_reason.set(reason);
            }
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::{submit_to_worker, UiShell};
    use crate::messages::{ExitReason, HostToUi, UiToHost};
    use std::sync::mpsc::{channel, Sender};
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn dead_worker_is_replaced() {
        let (dead_tx, dead_rx) = channel::<u32>();
        drop(dead_rx);
        let slot = Mutex::new(Some(dead_tx));
        let (fresh_tx, fresh_rx) = channel::<u32>();

        submit_to_worker(&slot, 7, move || Ok(fresh_tx)).expect("resubmit");
        assert_eq!(fresh_rx.try_recv(), Ok(7));

        submit_to_worker(&slot, 8, || -> anyhow::Result<Sender<u32>> {
            panic!("live worker must be reused")
        })
        .expect("reuse");
        assert_eq!(fresh_rx.try_recv(), Ok(8));
    }

    #[test]
    fn first_submit_starts_a_worker() {
        let slot = Mutex::new(None);
        let (tx, rx) = channel::<&str>();
        submit_to_worker(&slot, "open", move || Ok(tx)).expect("submit");
        assert_eq!(rx.try_recv(), Ok("open"));
        assert!(slot.lock().expect("slot").is_some());
    }

    #[test]
    fn close_waits_for_exit_report() {
        let (host_tx, host_rx) = channel::<HostToUi>();
        let (ui_tx, ui_rx) = channel::<UiToHost>();
        let mut shell = UiShell::from_channels(host_tx, ui_rx);

        let ui = std::thread::spawn(move || {
            let cmd = host_rx.recv_timeout(Duration::from_secs(2));
            let _ = ui_tx.send(UiToHost::Exited {
                reason: ExitReason::HostRequest,
                error: None,
            });
            cmd
        });
        shell.close();
        assert!(shell.has_exited());
        assert_eq!(ui.join().expect("ui thread"), Ok(HostToUi::Close));
    }

    #[test]
    fn close_after_exit_is_a_no_op() {
        let (host_tx, host_rx) = channel::<HostToUi>();
        let (ui_tx, ui_rx) = channel::<UiToHost>();
        let mut shell = UiShell::from_channels(host_tx, ui_rx);
        ui_tx
            .send(UiToHost::Exited {
                reason: ExitReason::UserRequest,
                error: None,
            })
            .expect("send exit");
        assert!(matches!(shell.try_recv(), Ok(UiToHost::Exited { .. })));
        drop(shell);
        assert!(host_rx.try_recv().is_err());
    }
}
