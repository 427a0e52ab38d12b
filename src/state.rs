/// Which of the three top-level windows is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Register,
    Main,
}

/// Either a status or an error line; never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Status(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    view: View,
    authenticated: bool,
    license_only_mode: bool,
    message: Option<Message>,
}

impl ViewState {
    pub fn new(license_only_mode: bool) -> Self {
        let mut state = Self::default();
        state.set_license_only_mode(license_only_mode);
        state
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show_login_window(&self) -> bool {
        self.view == View::Login
    }

    pub fn show_register_window(&self) -> bool {
        self.view == View::Register
    }

    pub fn show_main_window(&self) -> bool {
        self.view == View::Main
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn license_only_mode(&self) -> bool {
        self.license_only_mode
    }

    /// License-only mode has no login screen, so it lands on the main view.
    pub fn show_login(&mut self) {
        self.view = if self.license_only_mode {
            View::Main
        } else {
            View::Login
        };
    }

    pub fn show_register(&mut self) {
        self.view = if self.license_only_mode {
            View::Main
        } else {
            View::Register
        };
    }

    pub fn show_main(&mut self) {
        self.view = View::Main;
    }

    pub fn set_authenticated(&mut self, auth: bool) {
        self.authenticated = auth;
        if auth {
            self.show_main();
        } else {
            self.show_login();
        }
    }

    /// Only moves the view while nobody is signed in.
    pub fn set_license_only_mode(&mut self, enabled: bool) {
        self.license_only_mode = enabled;
        if self.authenticated {
            return;
        }
        if enabled {
            self.show_main();
        } else {
            self.show_login();
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.message = Some(Message::Status(message.into()));
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.message = Some(Message::Error(message.into()));
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn status_message(&self) -> &str {
        match &self.message {
            Some(Message::Status(text)) => text,
            _ => "",
        }
    }

    pub fn error_message(&self) -> &str {
        match &self.message {
            Some(Message::Error(text)) => text,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{View, ViewState};

    fn visible_count(state: &ViewState) -> usize {
        [
            state.show_login_window(),
            state.show_register_window(),
            state.show_main_window(),
        ]
        .iter()
        .filter(|v| **v)
        .count()
    }

    #[test]
    fn starts_on_login() {
        let state = ViewState::default();
        assert_eq!(state.view(), View::Login);
        assert!(!state.authenticated());
    }

    #[test]
    fn exactly_one_view_after_every_transition() {
        let mut state = ViewState::default();
        let steps: [fn(&mut ViewState); 8] = [
            |s| s.show_register(),
            |s| s.show_login(),
            |s| s.show_main(),
            |s| s.set_license_only_mode(true),
            |s| s.show_register(),
            |s| s.set_authenticated(true),
            |s| s.set_license_only_mode(false),
            |s| s.set_authenticated(false),
        ];
        for step in steps {
            step(&mut state);
            assert_eq!(visible_count(&state), 1, "{state:?}");
        }
    }

    #[test]
    fn license_only_mode_skips_login_and_register() {
        let mut state = ViewState::new(true);
        assert_eq!(state.view(), View::Main);
        state.show_login();
        assert_eq!(state.view(), View::Main);
        state.show_register();
        assert_eq!(state.view(), View::Main);
    }

    #[test]
    fn toggling_license_mode_while_signed_in_keeps_view() {
        let mut state = ViewState::default();
        state.set_authenticated(true);
        state.set_license_only_mode(true);
        state.set_license_only_mode(false);
        assert_eq!(state.view(), View::Main);
    }

    #[test]
    fn logout_returns_to_login_or_main() {
        let mut state = ViewState::default();
        state.set_authenticated(true);
        state.set_authenticated(false);
        assert_eq!(state.view(), View::Login);

        let mut state = ViewState::new(true);
        state.set_authenticated(true);
        state.set_authenticated(false);
        assert_eq!(state.view(), View::Main);
    }

    #[test]
    fn status_and_error_replace_each_other() {
        let mut state = ViewState::default();
        state.set_error_message("bad password");
        assert_eq!(state.error_message(), "bad password");
        state.set_status_message("logging in");
        assert_eq!(state.status_message(), "logging in");
        assert_eq!(state.error_message(), "");
        state.set_error_message("timeout");
        assert_eq!(state.status_message(), "");
        assert_eq!(state.error_message(), "timeout");
    }
}
