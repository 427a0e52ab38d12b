use crate::logging;
use crate::messages::{HostEvent, HostToUi, UiToHost};
use crate::profile::UserProfile;
use crate::settings::LoaderConfig;
use crate::shell::UiShell;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub type LoginCallback = Rc<dyn Fn(&str, &str)>;
pub type RegisterCallback = Rc<dyn Fn(&str, &str, &str)>;
pub type LicenseCallback = Rc<dyn Fn(&str, &str)>;
pub type ExitCallback = Rc<dyn Fn()>;
pub type FileStreamCallback = Rc<dyn Fn(&str)>;
pub type AuthModeCallback = Rc<dyn Fn(bool)>;

/// Slots the host fills to hear about UI requests. Empty slots swallow
/// their events.
#[derive(Clone, Default)]
pub struct HostCallbacks {
    pub login: Option<LoginCallback>,
    pub register: Option<RegisterCallback>,
    pub license: Option<LicenseCallback>,
    pub exit: Option<ExitCallback>,
    pub file_stream: Option<FileStreamCallback>,
    pub auth_mode: Option<AuthModeCallback>,
}

impl HostCallbacks {
    /// Returns false when no callback was installed for the event.
    pub fn dispatch(&self, event: &HostEvent) -> bool {
        let handled = match event {
            HostEvent::Login { username, password } => {
                self.login.as_ref().map(|cb| cb(username, password))
            }
            HostEvent::Register {
                username,
                password,
                license,
            } => self
                .register
                .as_ref()
                .map(|cb| cb(username, password, license)),
            HostEvent::RedeemLicense { username, license } => {
                self.license.as_ref().map(|cb| cb(username, license))
            }
            HostEvent::Exit => self.exit.as_ref().map(|cb| cb()),
            HostEvent::Launch { file_id } => self.file_stream.as_ref().map(|cb| cb(file_id)),
            HostEvent::AuthModeChanged { license_only } => {
                self.auth_mode.as_ref().map(|cb| cb(*license_only))
            }
        };
        handled.is_some()
    }
}

/// Host-facing handle to the loader window.
///
/// All methods take `&self` and are meant to be called from one host thread.
/// Callbacks run inside [`update`](Bootstrapper::update) and may call back
/// into the same handle.
#[derive(Default)]
pub struct Bootstrapper {
    shell: RefCell<Option<UiShell>>,
    callbacks: RefCell<HostCallbacks>,
    pending: RefCell<VecDeque<UiToHost>>,
    /// Host commands issued before a window exists, replayed on attach.
    backlog: RefCell<VecDeque<HostToUi>>,
    running: Cell<bool>,
    close_requested: Cell<bool>,
}

impl Bootstrapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the window and wait until it is up. Returns false if the window
    /// or its graphics context could not be created.
    pub fn initialize(&self, config: LoaderConfig) -> bool {
        if self.running.get() {
            return true;
        }
        logging::init(config.debug_logging, config.log_file.clone());
        self.close_shell();

        let mut shell = match UiShell::spawn(config) {
            Ok(shell) => shell,
            Err(err) => {
                tracing::error!("failed to start loader UI: {err:#}");
                return false;
            }
        };
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match shell.recv_timeout(remaining) {
                Ok(UiToHost::Started) => break,
                Ok(UiToHost::Exited { reason, error }) => {
                    tracing::error!(?reason, ?error, "loader window failed to start");
                    return false;
                }
                Ok(UiToHost::Event(event)) => {
                    self.pending.borrow_mut().push_back(UiToHost::Event(event));
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::error!("loader window did not start within {STARTUP_TIMEOUT:?}");
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::error!("loader UI thread went away during startup");
                    return false;
                }
            }
        }
        self.attach(shell);
        tracing::info!("loader UI initialized");
        true
    }

    /// Start a session over an existing shell. Commands issued before this
    /// point are replayed first, in order.
    pub fn attach(&self, shell: UiShell) {
        let backlog = std::mem::take(&mut *self.backlog.borrow_mut());
        if !backlog.is_empty() {
            tracing::debug!(commands = backlog.len(), "replaying early host commands");
        }
        for cmd in backlog {
            if !shell.send(cmd) {
                tracing::debug!("loader UI is gone, command dropped");
            }
        }
        *self.shell.borrow_mut() = Some(shell);
        self.running.set(true);
        self.close_requested.set(false);
    }

    /// Close the window, if any, and forget queued events and early host
    /// commands. Callbacks stay installed for the next session.
    pub fn shutdown(&self) {
        self.close_shell();
        self.backlog.borrow_mut().clear();
    }

    fn close_shell(&self) {
        let shell = self.shell.borrow_mut().take();
        if let Some(mut shell) = shell {
            shell.close();
            tracing::info!("loader UI shut down");
        }
        self.pending.borrow_mut().clear();
        self.running.set(false);
        self.close_requested.set(false);
    }

    pub fn should_run(&self) -> bool {
        self.running.get() && !self.close_requested.get()
    }

    /// Deliver every pending UI request to its callback.
    pub fn update(&self) {
        self.drain_shell();
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(msg) = next else { break };
            match msg {
                UiToHost::Started => {}
                UiToHost::Event(event) => {
                    if matches!(event, HostEvent::Exit) {
                        self.close_requested.set(true);
                    }
                    let callbacks = self.callbacks.borrow().clone();
                    if !callbacks.dispatch(&event) {
                        tracing::trace!(?event, "no host callback installed");
                    }
                }
                UiToHost::Exited { reason, error } => {
                    if let Some(error) = error {
                        tracing::error!(?reason, "loader window exited: {error}");
                    } else {
                        tracing::info!(?reason, "loader window exited");
                    }
                    self.running.set(false);
                }
            }
        }
    }

    /// Paces the host loop against the UI: waits up to one frame for the
    /// window to report something.
    pub fn render(&self) {
        let mut shell = self.shell.borrow_mut();
        let Some(shell) = shell.as_mut() else {
            return;
        };
        if shell.has_exited() {
            return;
        }
        match shell.recv_timeout(FRAME_INTERVAL) {
            Ok(msg) => self.pending.borrow_mut().push_back(msg),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => self.running.set(false),
        }
    }

    fn drain_shell(&self) {
        let mut shell = self.shell.borrow_mut();
        let Some(shell) = shell.as_mut() else {
            return;
        };
        loop {
            match shell.try_recv() {
                Ok(msg) => self.pending.borrow_mut().push_back(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !shell.has_exited() {
                        tracing::warn!("loader UI disconnected without reporting exit");
                    }
                    self.running.set(false);
                    break;
                }
            }
        }
    }

    fn send(&self, cmd: HostToUi) {
        match self.shell.borrow().as_ref() {
            Some(shell) => {
                if !shell.send(cmd) {
                    tracing::debug!("loader UI is gone, command dropped");
                }
            }
            None if cmd == HostToUi::Close => {}
            None => {
                tracing::debug!(?cmd, "loader UI not initialized, command held");
                self.backlog.borrow_mut().push_back(cmd);
            }
        }
    }

    pub fn set_authenticated(&self, authenticated: bool, profile: Option<UserProfile>) {
        self.send(HostToUi::SetAuthenticated {
            authenticated,
            profile,
        });
    }

    pub fn set_status_message(&self, msg: impl Into<String>) {
        self.send(HostToUi::SetStatusMessage(msg.into()));
    }

    pub fn set_error_message(&self, msg: impl Into<String>) {
        self.send(HostToUi::SetErrorMessage(msg.into()));
    }

    pub fn set_loading(&self, active: bool) {
        self.send(HostToUi::SetLoading(active));
    }

    pub fn set_loading_progress(&self, progress: f32) {
        self.send(HostToUi::SetLoadingProgress(progress));
    }

    pub fn set_license_only_mode(&self, enabled: bool) {
        self.send(HostToUi::SetLicenseOnlyMode(enabled));
    }

    pub fn set_local_account_username(&self, username: impl Into<String>) {
        self.send(HostToUi::SetLocalAccount(username.into()));
    }

    /// Makes `should_run` false right away; the window follows on its next
    /// frame.
    pub fn close(&self) {
        self.close_requested.set(true);
        self.send(HostToUi::Close);
    }

    pub fn set_login_callback(&self, callback: Option<LoginCallback>) {
        self.callbacks.borrow_mut().login = callback;
    }

    pub fn set_register_callback(&self, callback: Option<RegisterCallback>) {
        self.callbacks.borrow_mut().register = callback;
    }

    pub fn set_license_callback(&self, callback: Option<LicenseCallback>) {
        self.callbacks.borrow_mut().license = callback;
    }

    pub fn set_exit_callback(&self, callback: Option<ExitCallback>) {
        self.callbacks.borrow_mut().exit = callback;
    }

    pub fn set_file_stream_callback(&self, callback: Option<FileStreamCallback>) {
        self.callbacks.borrow_mut().file_stream = callback;
    }

    pub fn set_auth_mode_callback(&self, callback: Option<AuthModeCallback>) {
        self.callbacks.borrow_mut().auth_mode = callback;
    }
}

impl Drop for Bootstrapper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ExitReason;
    use std::sync::mpsc::{channel, Receiver, Sender};

    struct FakeUi {
        commands: Receiver<HostToUi>,
        events: Sender<UiToHost>,
    }

    impl FakeUi {
        fn raise(&self, event: HostEvent) {
            self.events.send(UiToHost::Event(event)).expect("raise");
        }

        fn commands(&self) -> Vec<HostToUi> {
            self.commands.try_iter().collect()
        }
    }

    fn attached() -> (Bootstrapper, FakeUi) {
        let (host_tx, host_rx) = channel();
        let (ui_tx, ui_rx) = channel();
        let ui = Bootstrapper::new();
        ui.attach(UiShell::from_channels(host_tx, ui_rx));
        (
            ui,
            FakeUi {
                commands: host_rx,
                events: ui_tx,
            },
        )
    }

    #[test]
    fn uninitialized_handle_is_inert() {
        let ui = Bootstrapper::new();
        assert!(!ui.should_run());
        ui.set_status_message("held");
        ui.update();
        ui.render();
        ui.close();
        assert!(!ui.should_run());
    }

    #[test]
    fn early_commands_replay_on_attach() {
        let ui = Bootstrapper::new();
        ui.set_license_only_mode(true);
        ui.set_local_account_username("bob");
        ui.set_status_message("ready");
        ui.close();

        let (host_tx, host_rx) = channel();
        let (ui_tx, ui_rx) = channel();
        ui.attach(UiShell::from_channels(host_tx, ui_rx));
        let fake = FakeUi {
            commands: host_rx,
            events: ui_tx,
        };

        assert_eq!(
            fake.commands(),
            vec![
                HostToUi::SetLicenseOnlyMode(true),
                HostToUi::SetLocalAccount("bob".into()),
                HostToUi::SetStatusMessage("ready".into()),
            ]
        );
        assert!(ui.should_run());
        drop(fake);
    }

    #[test]
    fn shutdown_forgets_early_commands() {
        let ui = Bootstrapper::new();
        ui.set_error_message("stale");
        ui.shutdown();

        let (host_tx, host_rx) = channel();
        let (ui_tx, ui_rx) = channel();
        ui.attach(UiShell::from_channels(host_tx, ui_rx));
        let fake = FakeUi {
            commands: host_rx,
            events: ui_tx,
        };
        assert!(fake.commands().is_empty());
        drop(fake);
    }

    #[test]
    fn events_reach_their_callbacks() {
        let (ui, fake) = attached();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        ui.set_login_callback(Some(Rc::new(move |user: &str, pass: &str| {
            log.borrow_mut().push(format!("login {user} {pass}"));
        })));
        let log = Rc::clone(&seen);
        ui.set_file_stream_callback(Some(Rc::new(move |file: &str| {
            log.borrow_mut().push(format!("launch {file}"));
        })));

        fake.raise(HostEvent::Login {
            username: "alice".into(),
            password: "pw".into(),
        });
        fake.raise(HostEvent::Launch {
            file_id: "42".into(),
        });
        ui.update();
        assert_eq!(*seen.borrow(), vec!["login alice pw", "launch 42"]);
        assert!(ui.should_run());
    }

    #[test]
    fn missing_callbacks_are_skipped() {
        let (ui, fake) = attached();
        fake.raise(HostEvent::RedeemLicense {
            username: "alice".into(),
            license: "KEY".into(),
        });
        fake.raise(HostEvent::AuthModeChanged { license_only: true });
        ui.update();
        assert!(ui.should_run());
    }

    #[test]
    fn callbacks_can_reenter_the_bridge() {
        let (ui, fake) = attached();
        let ui = Rc::new(ui);
        let inner = Rc::downgrade(&ui);
        ui.set_login_callback(Some(Rc::new(move |user: &str, _: &str| {
            if let Some(ui) = inner.upgrade() {
                ui.set_authenticated(
                    true,
                    Some(UserProfile {
                        username: user.to_string(),
                        ..Default::default()
                    }),
                );
                ui.set_status_message("signed in");
                ui.set_login_callback(None);
            }
        })));

        fake.raise(HostEvent::Login {
            username: "alice".into(),
            password: "pw".into(),
        });
        fake.raise(HostEvent::Login {
            username: "mallory".into(),
            password: "pw".into(),
        });
        ui.update();

        let commands = fake.commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            &commands[0],
            HostToUi::SetAuthenticated { authenticated: true, profile: Some(p) } if p.username == "alice"
        ));
        assert_eq!(commands[1], HostToUi::SetStatusMessage("signed in".into()));
        drop(fake);
    }

    #[test]
    fn exit_event_stops_the_loop() {
        let (ui, fake) = attached();
        let exited = Rc::new(Cell::new(false));
        let flag = Rc::clone(&exited);
        ui.set_exit_callback(Some(Rc::new(move || flag.set(true))));
        fake.raise(HostEvent::Exit);
        ui.update();
        assert!(exited.get());
        assert!(!ui.should_run());
    }

    #[test]
    fn window_exit_ends_should_run() {
        let (ui, fake) = attached();
        fake.events
            .send(UiToHost::Exited {
                reason: ExitReason::WindowClosed,
                error: None,
            })
            .expect("exit");
        ui.render();
        assert!(ui.should_run());
        ui.update();
        assert!(!ui.should_run());
    }

    #[test]
    fn close_sends_close_and_stops() {
        let (ui, fake) = attached();
        ui.close();
        assert!(!ui.should_run());
        assert_eq!(fake.commands(), vec![HostToUi::Close]);
        drop(fake);
        ui.shutdown();
    }

    #[test]
    fn dropped_ui_side_stops_the_loop() {
        let (ui, fake) = attached();
        drop(fake);
        ui.update();
        assert!(!ui.should_run());
    }
}
