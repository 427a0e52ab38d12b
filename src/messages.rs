use crate::profile::UserProfile;

/// Requests the UI raises for the host. Each maps onto one host callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
        license: String,
    },
    RedeemLicense {
        username: String,
        license: String,
    },
    Exit,
    Launch {
        file_id: String,
    },
    AuthModeChanged {
        license_only: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    UserRequest,
    HostRequest,
    WindowClosed,
    StartFailure,
}

/// State mutations sent from the host to the UI thread. Applied in order at
/// the start of the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum HostToUi {
    SetAuthenticated {
        authenticated: bool,
        profile: Option<UserProfile>,
    },
    SetStatusMessage(String),
    SetErrorMessage(String),
    SetLoading(bool),
    SetLoadingProgress(f32),
    SetLicenseOnlyMode(bool),
    SetLocalAccount(String),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiToHost {
    /// Window and graphics context are up.
    Started,
    Event(HostEvent),
    Exited {
        reason: ExitReason,
        error: Option<String>,
    },
}
