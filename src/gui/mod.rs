mod auth_mode;
pub mod fonts;
mod login;
mod main_window;
mod modals;
pub mod product_views;
mod register;
pub mod theme;
pub mod widgets;

use crate::load_timer::{LoadRejected, LoadTimer, TimerEvent};
use crate::messages::{HostEvent, HostToUi};
use crate::profile::UserProfile;
use crate::settings::LoaderConfig;
use crate::state::ViewState;
use eframe::egui;
use product_views::ProductViews;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub license: String,
}

/// Host-driven busy overlay shown while the host talks to its backend.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BusyOverlay {
    pub active: bool,
    pub progress: Option<f32>,
}

/// Everything the UI thread owns: view state, the signed-in profile, form
/// buffers and the load timer. Host requests come in through [`apply`] and
/// outgoing requests queue up until [`take_events`] drains them.
///
/// [`apply`]: LoaderApp::apply
/// [`take_events`]: LoaderApp::take_events
pub struct LoaderApp {
    config: LoaderConfig,
    state: ViewState,
    user: UserProfile,
    timer: LoadTimer,
    busy: BusyOverlay,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub redeem_license: String,
    selected: Option<usize>,
    products: ProductViews,
    style_applied: bool,
    close_requested: bool,
    outbox: Vec<HostEvent>,
}

impl LoaderApp {
    pub fn new(config: LoaderConfig) -> Self {
        let timer = LoadTimer::new(
            config.load_duration(),
            config.download_delay(),
            config.require_active_subscription,
        );
        Self {
            state: ViewState::new(config.license_only_mode),
            config,
            user: UserProfile::default(),
            timer,
            busy: BusyOverlay::default(),
            login: LoginForm::default(),
            register: RegisterForm::default(),
            redeem_license: String::new(),
            selected: None,
            products: ProductViews::default(),
            style_applied: false,
            close_requested: false,
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn timer(&self) -> &LoadTimer {
        &self.timer
    }

    pub fn busy(&self) -> BusyOverlay {
        self.busy
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, event: HostEvent) {
        tracing::debug!(?event, "queued host event");
        self.outbox.push(event);
    }

    pub fn apply(&mut self, cmd: HostToUi) {
        match cmd {
            HostToUi::SetAuthenticated {
                authenticated,
                profile,
            } => self.set_authenticated(authenticated, profile),
            HostToUi::SetStatusMessage(msg) => self.state.set_status_message(msg),
            HostToUi::SetErrorMessage(msg) => self.state.set_error_message(msg),
            HostToUi::SetLoading(active) => self.set_loading(active),
            HostToUi::SetLoadingProgress(progress) => self.set_loading_progress(progress),
            HostToUi::SetLicenseOnlyMode(enabled) => self.state.set_license_only_mode(enabled),
            HostToUi::SetLocalAccount(username) => self.user.username = username,
            HostToUi::Close => self.close_requested = true,
        }
    }

    /// A supplied profile replaces the current user wholesale. Signing out
    /// drops the subscriptions and anything derived from them.
    pub fn set_authenticated(&mut self, authenticated: bool, profile: Option<UserProfile>) {
        if let Some(profile) = profile {
            self.user = profile;
            self.selected = None;
        }
        self.state.set_authenticated(authenticated);
        if authenticated {
            self.products.mark_dirty();
            self.login.password.clear();
            self.register.password.clear();
            tracing::info!(user = %self.user.username, subscriptions = self.user.subscriptions.len(), "signed in");
        } else {
            self.products.release();
            self.user.subscriptions.clear();
            self.selected = None;
            self.timer.cancel();
            tracing::info!("signed out");
        }
    }

    pub fn set_loading(&mut self, active: bool) {
        self.busy.active = active;
        if !active {
            self.busy.progress = None;
        }
    }

    pub fn set_loading_progress(&mut self, progress: f32) {
        if progress.is_finite() {
            self.busy.progress = Some(progress.clamp(0.0, 1.0));
        }
    }

    pub fn submit_login(&mut self) {
        if self.login.username.is_empty() || self.login.password.is_empty() {
            return;
        }
        self.emit(HostEvent::Login {
            username: self.login.username.clone(),
            password: self.login.password.clone(),
        });
    }

    pub fn submit_register(&mut self) {
        let form = &self.register;
        if form.username.is_empty() || form.password.is_empty() || form.license.is_empty() {
            return;
        }
        let event = HostEvent::Register {
            username: form.username.clone(),
            password: form.password.clone(),
            license: form.license.clone(),
        };
        self.emit(event);
    }

    pub fn submit_redeem(&mut self) {
        if self.user.username.is_empty() || self.redeem_license.is_empty() {
            return;
        }
        self.emit(HostEvent::RedeemLicense {
            username: self.user.username.clone(),
            license: self.redeem_license.clone(),
        });
    }

    pub fn set_license_only_mode(&mut self, enabled: bool) {
        self.state.set_license_only_mode(enabled);
        self.emit(HostEvent::AuthModeChanged {
            license_only: enabled,
        });
    }

    pub fn show_login(&mut self) {
        self.state.show_login();
    }

    pub fn show_register(&mut self) {
        self.state.show_register();
    }

    /// Close button: tell the host, then close the window.
    pub fn request_exit(&mut self) {
        self.emit(HostEvent::Exit);
        self.close_requested = true;
    }

    pub fn select(&mut self, index: usize) {
        if index < self.user.subscriptions.len() {
            self.selected = Some(index);
        }
    }

    pub fn request_load(&mut self, now: Instant) {
        let result = match self.selected.and_then(|i| self.user.subscriptions.get(i)) {
            Some(sub) => self.timer.start(sub, now),
            None => Err(LoadRejected::NoSelection),
        };
        match result {
            Ok(()) => {
                let msg = format!("Loading {}...", self.timer.product());
                self.state.set_status_message(msg);
            }
            Err(err) => {
                tracing::debug!("load rejected: {err}");
                self.state.set_error_message(err.to_string());
            }
        }
    }

    pub fn dismiss_popup(&mut self, now: Instant) {
        if self.timer.popup_pending() {
            self.timer.dismiss(now);
            self.state.set_status_message("Downloading...");
        }
    }

    pub fn load_progress(&self, now: Instant) -> f32 {
        self.timer.progress(now)
    }

    pub fn tick(&mut self, now: Instant) {
        match self.timer.tick(now) {
            Some(TimerEvent::LoadCompleted { product }) => {
                self.state.set_status_message(format!("{product} is ready"));
            }
            Some(TimerEvent::Launch { file_id }) => {
                self.state.set_status_message("Launching...");
                self.emit(HostEvent::Launch { file_id });
            }
            None => {}
        }
    }

    fn ensure_style(&mut self, ctx: &egui::Context) {
        if self.style_applied {
            return;
        }
        fonts::install_fonts(ctx, self.config.font_path.as_deref());
        theme::apply_base_theme(ctx);
        self.style_applied = true;
    }

    /// Lay out one frame. Also advances the load timer.
    pub fn render(&mut self, ctx: &egui::Context, now: Instant) {
        self.ensure_style(ctx);
        self.tick(now);
        self.products.rebuild_if_dirty(ctx, &self.user.subscriptions);

        self.auth_mode_window(ctx);
        if self.state.show_login_window() {
            self.login_window(ctx);
        }
        if self.state.show_register_window() {
            self.register_window(ctx);
        }
        if self.state.show_main_window() {
            self.main_window(ctx, now);
        }
        if self.timer.popup_pending() {
            self.load_complete_popup(ctx, now);
        }
        if self.busy.active {
            self.busy_overlay(ctx);
        }

        if !self.timer.is_idle() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
