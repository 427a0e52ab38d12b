pub mod bridge;
pub mod controller;
pub mod ffi;
pub mod gui;
pub mod load_timer;
pub mod logging;
pub mod messages;
pub mod profile;
pub mod settings;
pub mod shell;
pub mod state;
pub mod win_util;

pub use bridge::{Bootstrapper, HostCallbacks};
pub use load_timer::{LoadRejected, LoadTimer, TimerEvent};
pub use messages::{ExitReason, HostEvent, HostToUi, UiToHost};
pub use profile::{Subscription, UserProfile};
pub use settings::LoaderConfig;
pub use state::{Message, View, ViewState};
