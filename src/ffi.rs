//! C ABI over [`Bootstrapper`].
//!
//! Every function accepts a null `ui` and does nothing in that case, returning
//! `false` where a bool is expected. Strings handed to callbacks live only for
//! the duration of the call. Callbacks run inside `ui_update` and may call any
//! function here except `destroy_loader_ui` on the same handle.

use crate::bridge::Bootstrapper;
use crate::profile::{Subscription, UserProfile};
use crate::settings::LoaderConfig;
use std::ffi::{c_char, CStr, CString};
use std::rc::Rc;

pub type LoginFn = extern "C" fn(username: *const c_char, password: *const c_char);
pub type RegisterFn =
    extern "C" fn(username: *const c_char, password: *const c_char, license: *const c_char);
pub type LicenseFn = extern "C" fn(username: *const c_char, license: *const c_char);
pub type ExitFn = extern "C" fn();
pub type FileStreamFn = extern "C" fn(file_id: *const c_char);
pub type AuthModeFn = extern "C" fn(license_only: bool);

#[repr(C)]
pub struct LoaderSubscription {
    pub plan: *const c_char,
    pub expires_at: *const c_char,
    pub status: *const c_char,
    pub plan_id: *const c_char,
    pub default_file_id: *const c_char,
    pub image: *const u8,
    pub image_len: usize,
    pub video: *const u8,
    pub video_len: usize,
}

#[repr(C)]
pub struct LoaderProfile {
    pub username: *const c_char,
    pub email: *const c_char,
    pub ip: *const c_char,
    pub subscriptions: *const LoaderSubscription,
    pub subscription_count: usize,
}

unsafe fn text(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

unsafe fn blob(ptr: *const u8, len: usize) -> Option<Vec<u8>> {
    if ptr.is_null() || len == 0 {
        None
    } else {
        Some(std::slice::from_raw_parts(ptr, len).to_vec())
    }
}

fn c_string(value: &str) -> CString {
    CString::new(value.replace('\0', "")).unwrap_or_default()
}

/// Copy a caller-owned profile into Rust memory.
///
/// # Safety
/// Every non-null pointer must be valid for reads; `subscriptions` must point
/// at `subscription_count` entries.
pub unsafe fn profile_from_ffi(raw: &LoaderProfile) -> UserProfile {
    let subscriptions = if raw.subscriptions.is_null() {
        Vec::new()
    } else {
        std::slice::from_raw_parts(raw.subscriptions, raw.subscription_count)
            .iter()
            .map(|sub| Subscription {
                plan: text(sub.plan),
                expires_at: text(sub.expires_at),
                status: text(sub.status),
                plan_id: text(sub.plan_id),
                default_file_id: text(sub.default_file_id),
                image: blob(sub.image, sub.image_len),
                video: blob(sub.video, sub.video_len),
            })
            .collect()
    };
    UserProfile {
        username: text(raw.username),
        email: text(raw.email),
        ip: text(raw.ip),
        subscriptions,
    }
}

#[no_mangle]
pub extern "C" fn create_loader_ui() -> *mut Bootstrapper {
    Box::into_raw(Box::new(Bootstrapper::new()))
}

/// # Safety
/// `ui` must come from [`create_loader_ui`] and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn destroy_loader_ui(ui: *mut Bootstrapper) {
    if !ui.is_null() {
        drop(Box::from_raw(ui));
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`]; `title` is null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn ui_initialize(ui: *const Bootstrapper, title: *const c_char) -> bool {
    let Some(ui) = ui.as_ref() else { return false };
    let title = text(title);
    let config = if title.is_empty() {
        LoaderConfig::default()
    } else {
        LoaderConfig::with_title(&title)
    };
    ui.initialize(config)
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`]; `path` is null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn ui_initialize_with_config(
    ui: *const Bootstrapper,
    path: *const c_char,
) -> bool {
    let Some(ui) = ui.as_ref() else { return false };
    let path = text(path);
    match LoaderConfig::load(&path) {
        Ok(config) => ui.initialize(config),
        Err(err) => {
            tracing::error!("failed to load loader config {path}: {err:#}");
            false
        }
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_shutdown(ui: *const Bootstrapper) {
    if let Some(ui) = ui.as_ref() {
        ui.shutdown();
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_should_run(ui: *const Bootstrapper) -> bool {
    ui.as_ref().is_some_and(Bootstrapper::should_run)
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_update(ui: *const Bootstrapper) {
    if let Some(ui) = ui.as_ref() {
        ui.update();
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_render(ui: *const Bootstrapper) {
    if let Some(ui) = ui.as_ref() {
        ui.render();
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_close(ui: *const Bootstrapper) {
    if let Some(ui) = ui.as_ref() {
        ui.close();
    }
}

/// A null `profile` keeps the profile the UI already has.
///
/// # Safety
/// `ui` is null or from [`create_loader_ui`]; `profile` is null or valid per
/// [`profile_from_ffi`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_authenticated(
    ui: *const Bootstrapper,
    authenticated: bool,
    profile: *const LoaderProfile,
) {
    let Some(ui) = ui.as_ref() else { return };
    let profile = profile.as_ref().map(|raw| profile_from_ffi(raw));
    ui.set_authenticated(authenticated, profile);
}

/// Same as [`ui_set_authenticated`] with the profile as JSON. Unparseable
/// JSON is logged and treated like a null profile.
///
/// # Safety
/// `ui` is null or from [`create_loader_ui`]; `json` is null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn ui_set_authenticated_json(
    ui: *const Bootstrapper,
    authenticated: bool,
    json: *const c_char,
) {
    let Some(ui) = ui.as_ref() else { return };
    let profile = if json.is_null() {
        None
    } else {
        match serde_json::from_str::<UserProfile>(&text(json)) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!("ignoring malformed profile JSON: {err}");
                None
            }
        }
    };
    ui.set_authenticated(authenticated, profile);
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`]; `msg` is null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn ui_set_status_message(ui: *const Bootstrapper, msg: *const c_char) {
    if let Some(ui) = ui.as_ref() {
        ui.set_status_message(text(msg));
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`]; `msg` is null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn ui_set_error_message(ui: *const Bootstrapper, msg: *const c_char) {
    if let Some(ui) = ui.as_ref() {
        ui.set_error_message(text(msg));
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_loading(ui: *const Bootstrapper, active: bool) {
    if let Some(ui) = ui.as_ref() {
        ui.set_loading(active);
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_loading_progress(ui: *const Bootstrapper, progress: f32) {
    if let Some(ui) = ui.as_ref() {
        ui.set_loading_progress(progress);
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_license_only_mode(ui: *const Bootstrapper, enabled: bool) {
    if let Some(ui) = ui.as_ref() {
        ui.set_license_only_mode(enabled);
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`]; `username` is null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn ui_set_local_account(ui: *const Bootstrapper, username: *const c_char) {
    if let Some(ui) = ui.as_ref() {
        ui.set_local_account_username(text(username));
    }
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_login_callback(ui: *const Bootstrapper, callback: Option<LoginFn>) {
    let Some(ui) = ui.as_ref() else { return };
    ui.set_login_callback(callback.map(|cb| -> crate::bridge::LoginCallback {
        Rc::new(move |username: &str, password: &str| {
            let (username, password) = (c_string(username), c_string(password));
            cb(username.as_ptr(), password.as_ptr());
        })
    }));
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_register_callback(
    ui: *const Bootstrapper,
    callback: Option<RegisterFn>,
) {
    let Some(ui) = ui.as_ref() else { return };
    ui.set_register_callback(callback.map(|cb| -> crate::bridge::RegisterCallback {
        Rc::new(move |username: &str, password: &str, license: &str| {
            let username = c_string(username);
            let password = c_string(password);
            let license = c_string(license);
            cb(username.as_ptr(), password.as_ptr(), license.as_ptr());
        })
    }));
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_license_callback(
    ui: *const Bootstrapper,
    callback: Option<LicenseFn>,
) {
    let Some(ui) = ui.as_ref() else { return };
    ui.set_license_callback(callback.map(|cb| -> crate::bridge::LicenseCallback {
        Rc::new(move |username: &str, license: &str| {
            let (username, license) = (c_string(username), c_string(license));
            cb(username.as_ptr(), license.as_ptr());
        })
    }));
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_exit_callback(ui: *const Bootstrapper, callback: Option<ExitFn>) {
    let Some(ui) = ui.as_ref() else { return };
    ui.set_exit_callback(
        callback.map(|cb| -> crate::bridge::ExitCallback { Rc::new(move || cb()) }),
    );
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_filestream_callback(
    ui: *const Bootstrapper,
    callback: Option<FileStreamFn>,
) {
    let Some(ui) = ui.as_ref() else { return };
    ui.set_file_stream_callback(callback.map(|cb| -> crate::bridge::FileStreamCallback {
        Rc::new(move |file_id: &str| {
            let file_id = c_string(file_id);
            cb(file_id.as_ptr());
        })
    }));
}

/// # Safety
/// `ui` is null or from [`create_loader_ui`].
#[no_mangle]
pub unsafe extern "C" fn ui_set_auth_mode_callback(
    ui: *const Bootstrapper,
    callback: Option<AuthModeFn>,
) {
    let Some(ui) = ui.as_ref() else { return };
    ui.set_auth_mode_callback(
        callback.map(|cb| -> crate::bridge::AuthModeCallback { Rc::new(move |on: bool| cb(on)) }),
    );
}
