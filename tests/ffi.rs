use loader_ui::ffi::*;
use loader_ui::shell::UiShell;
use loader_ui::{HostToUi, UiToHost};
use std::ffi::CString;
use std::fs;
use std::ptr;
use std::sync::mpsc::channel;
use tempfile::tempdir;

extern "C" fn ignore_login(_user: *const std::ffi::c_char, _pass: *const std::ffi::c_char) {}

#[test]
fn malformed_config_fails_before_opening_a_window() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loader.json");
    fs::write(&path, "[1, 2").unwrap();
    let path = CString::new(path.to_str().unwrap()).unwrap();

    let ui = create_loader_ui();
    unsafe {
        assert!(!ui_initialize_with_config(ui, path.as_ptr()));
        assert!(!ui_should_run(ui));
        destroy_loader_ui(ui);
    }
}

#[test]
fn setters_before_initialize_carry_into_the_session() {
    let ui = create_loader_ui();
    let msg = CString::new("hello").unwrap();
    let json = CString::new(r#"{"username":"alice","subscriptions":[]}"#).unwrap();
    let bad_json = CString::new("{").unwrap();
    unsafe {
        ui_set_login_callback(ui, Some(ignore_login));
        ui_set_status_message(ui, msg.as_ptr());
        ui_set_error_message(ui, ptr::null());
        ui_set_authenticated_json(ui, true, json.as_ptr());
        ui_set_authenticated_json(ui, true, bad_json.as_ptr());
        ui_set_loading(ui, true);
        ui_set_loading_progress(ui, f32::INFINITY);
        ui_set_license_only_mode(ui, true);
        ui_set_local_account(ui, msg.as_ptr());
        ui_set_login_callback(ui, None);
        ui_update(ui);
        ui_render(ui);
        ui_close(ui);
        assert!(!ui_should_run(ui));
    }

    let (host_tx, host_rx) = channel::<HostToUi>();
    let (ui_tx, ui_rx) = channel::<UiToHost>();
    unsafe { &*ui }.attach(UiShell::from_channels(host_tx, ui_rx));
    let replayed: Vec<HostToUi> = host_rx.try_iter().collect();
    assert_eq!(replayed.len(), 8);
    assert_eq!(replayed[0], HostToUi::SetStatusMessage("hello".into()));
    assert_eq!(replayed[1], HostToUi::SetErrorMessage(String::new()));
    assert!(matches!(
        &replayed[2],
        HostToUi::SetAuthenticated { authenticated: true, profile: Some(p) } if p.username == "alice"
    ));
    assert_eq!(
        replayed[3],
        HostToUi::SetAuthenticated {
            authenticated: true,
            profile: None
        }
    );
    assert_eq!(replayed[4], HostToUi::SetLoading(true));
    assert!(matches!(replayed[5], HostToUi::SetLoadingProgress(p) if p.is_infinite()));
    assert_eq!(replayed[6], HostToUi::SetLicenseOnlyMode(true));
    assert_eq!(replayed[7], HostToUi::SetLocalAccount("hello".into()));
    assert!(!replayed.contains(&HostToUi::Close));
    unsafe { assert!(ui_should_run(ui)) };

    drop(ui_tx);
    drop(host_rx);
    unsafe {
        ui_shutdown(ui);
        destroy_loader_ui(ui);
    }
}

#[test]
fn shutdown_discards_commands_held_for_the_next_session() {
    let ui = create_loader_ui();
    let msg = CString::new("stale").unwrap();
    unsafe {
        ui_set_status_message(ui, msg.as_ptr());
        ui_shutdown(ui);
    }
    let (host_tx, host_rx) = channel::<HostToUi>();
    let (ui_tx, ui_rx) = channel::<UiToHost>();
    unsafe { &*ui }.attach(UiShell::from_channels(host_tx, ui_rx));
    assert!(host_rx.try_iter().next().is_none());

    drop(ui_tx);
    drop(host_rx);
    unsafe { destroy_loader_ui(ui) };
}
