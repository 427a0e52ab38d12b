//! Demo host: loads the loader UI library at runtime and drives it the way an
//! embedding application would.

use anyhow::{anyhow, Context, Result};
use libloading::Library;
use loader_ui::logging;
use once_cell::sync::OnceCell;
use serde_json::json;
use std::ffi::{c_char, c_void, CStr, CString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicPtr, Ordering};

type Handle = *mut c_void;

struct LoaderApi {
    _lib: Library,
    create: unsafe extern "C" fn() -> Handle,
    destroy: unsafe extern "C" fn(Handle),
    initialize: unsafe extern "C" fn(Handle, *const c_char) -> bool,
    should_run: unsafe extern "C" fn(Handle) -> bool,
    update: unsafe extern "C" fn(Handle),
    render: unsafe extern "C" fn(Handle),
    shutdown: unsafe extern "C" fn(Handle),
    set_authenticated_json: unsafe extern "C" fn(Handle, bool, *const c_char),
    set_status_message: unsafe extern "C" fn(Handle, *const c_char),
    set_error_message: unsafe extern "C" fn(Handle, *const c_char),
    set_loading: unsafe extern "C" fn(Handle, bool),
    set_local_account: unsafe extern "C" fn(Handle, *const c_char),
    set_login_callback: unsafe extern "C" fn(Handle, Option<extern "C" fn(*const c_char, *const c_char)>),
    set_register_callback: unsafe extern "C" fn(
        Handle,
        Option<extern "C" fn(*const c_char, *const c_char, *const c_char)>,
    ),
    set_license_callback:
        unsafe extern "C" fn(Handle, Option<extern "C" fn(*const c_char, *const c_char)>),
    set_exit_callback: unsafe extern "C" fn(Handle, Option<extern "C" fn()>),
    set_filestream_callback: unsafe extern "C" fn(Handle, Option<extern "C" fn(*const c_char)>),
    set_auth_mode_callback: unsafe extern "C" fn(Handle, Option<extern "C" fn(bool)>),
}

macro_rules! symbol {
    ($lib:expr, $name:literal) => {
        *$lib
            .get($name)
            .with_context(|| format!("missing export {}", String::from_utf8_lossy($name)))?
    };
}

impl LoaderApi {
    /// # Safety
    /// `path` must be a build of this crate's cdylib.
    unsafe fn load(path: &Path) -> Result<Self> {
        let lib = Library::new(path).with_context(|| format!("loading {}", path.display()))?;
        Ok(Self {
            create: symbol!(lib, b"create_loader_ui"),
            destroy: symbol!(lib, b"destroy_loader_ui"),
            initialize: symbol!(lib, b"ui_initialize"),
            should_run: symbol!(lib, b"ui_should_run"),
            update: symbol!(lib, b"ui_update"),
            render: symbol!(lib, b"ui_render"),
            shutdown: symbol!(lib, b"ui_shutdown"),
            set_authenticated_json: symbol!(lib, b"ui_set_authenticated_json"),
            set_status_message: symbol!(lib, b"ui_set_status_message"),
            set_error_message: symbol!(lib, b"ui_set_error_message"),
            set_loading: symbol!(lib, b"ui_set_loading"),
            set_local_account: symbol!(lib, b"ui_set_local_account"),
            set_login_callback: symbol!(lib, b"ui_set_login_callback"),
            set_register_callback: symbol!(lib, b"ui_set_register_callback"),
            set_license_callback: symbol!(lib, b"ui_set_license_callback"),
            set_exit_callback: symbol!(lib, b"ui_set_exit_callback"),
            set_filestream_callback: symbol!(lib, b"ui_set_filestream_callback"),
            set_auth_mode_callback: symbol!(lib, b"ui_set_auth_mode_callback"),
            _lib: lib,
        })
    }
}

static API: OnceCell<LoaderApi> = OnceCell::new();
static UI: AtomicPtr<c_void> = AtomicPtr::new(std::ptr::null_mut());

fn with_ui(f: impl FnOnce(&LoaderApi, Handle)) {
    let ui = UI.load(Ordering::Acquire);
    if let Some(api) = API.get() {
        if !ui.is_null() {
            f(api, ui);
        }
    }
}

fn arg(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

fn c_text(value: &str) -> CString {
    CString::new(value.replace('\0', "")).unwrap_or_default()
}

fn set_status(msg: &str) {
    let msg = c_text(msg);
    with_ui(|api, ui| unsafe { (api.set_status_message)(ui, msg.as_ptr()) });
}

fn set_error(msg: &str) {
    let msg = c_text(msg);
    with_ui(|api, ui| unsafe { (api.set_error_message)(ui, msg.as_ptr()) });
}

fn demo_profile(username: &str, extra_plan: Option<&str>) -> String {
    let mut subscriptions = vec![
        json!({
            "plan": "Rust",
            "expires_at": "2030-01-01 00:00:00",
            "status": "Active",
            "plan_id": "1",
            "default_file_id": "4676609091914915",
        }),
        json!({
            "plan": "Tarkov",
            "expires_at": "2024-01-01",
            "status": "Expired",
            "plan_id": "2",
            "default_file_id": "5118237405522314",
        }),
    ];
    if let Some(plan) = extra_plan {
        subscriptions.push(json!({
            "plan": plan,
            "expires_at": "2031-06-30",
            "status": "Active",
            "plan_id": "3",
            "default_file_id": "7301944218830552",
        }));
    }
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "ip": "127.0.0.1",
        "subscriptions": subscriptions,
    })
    .to_string()
}

fn sign_in(username: &str, extra_plan: Option<&str>) {
    let profile = c_text(&demo_profile(username, extra_plan));
    with_ui(|api, ui| unsafe {
        (api.set_loading)(ui, false);
        (api.set_authenticated_json)(ui, true, profile.as_ptr());
    });
}

extern "C" fn on_login(username: *const c_char, password: *const c_char) {
    let username = arg(username);
    tracing::info!(%username, "login requested");
    if username.is_empty() || arg(password).is_empty() {
        set_error("Username and password are required");
        return;
    }
    sign_in(&username, None);
    set_status(&format!("Signed in as {username}"));
}

extern "C" fn on_register(username: *const c_char, _password: *const c_char, license: *const c_char) {
    let (username, license) = (arg(username), arg(license));
    tracing::info!(%username, %license, "registration requested");
    sign_in(&username, Some("Registered"));
    set_status("Account created");
}

extern "C" fn on_license(username: *const c_char, license: *const c_char) {
    let (username, license) = (arg(username), arg(license));
    tracing::info!(%username, %license, "license redemption requested");
    sign_in(&username, Some(&license));
    set_status(&format!("Redeemed {license}"));
}

extern "C" fn on_exit() {
    tracing::info!("exit requested from the loader window");
}

extern "C" fn on_file_stream(file_id: *const c_char) {
    let file_id = arg(file_id);
    tracing::info!(%file_id, "launch requested");
    set_status(&format!("Streaming file {file_id}"));
}

extern "C" fn on_auth_mode(license_only: bool) {
    tracing::info!(license_only, "auth mode changed");
    if license_only {
        let account = std::env::var("USERNAME")
            .or_else(|_| std::env::var("USER"))
            .unwrap_or_else(|_| "local".to_string());
        let account = c_text(&account);
        with_ui(|api, ui| unsafe { (api.set_local_account)(ui, account.as_ptr()) });
    }
}

fn library_path() -> Result<PathBuf> {
    if let Some(path) = std::env::args().nth(1) {
        return Ok(PathBuf::from(path));
    }
    let exe = std::env::current_exe().context("locating host executable")?;
    Ok(exe.with_file_name(libloading::library_filename("loader_ui")))
}

fn main() -> Result<()> {
    logging::init(std::env::var_os("LOADER_DEBUG").is_some(), None);

    let path = library_path()?;
    let api = unsafe { LoaderApi::load(&path)? };
    let api = API.get_or_init(|| api);

    let ui = unsafe { (api.create)() };
    if ui.is_null() {
        return Err(anyhow!("create_loader_ui returned null"));
    }
    UI.store(ui, Ordering::Release);

    unsafe {
        (api.set_login_callback)(ui, Some(on_login));
        (api.set_register_callback)(ui, Some(on_register));
        (api.set_license_callback)(ui, Some(on_license));
        (api.set_exit_callback)(ui, Some(on_exit));
        (api.set_filestream_callback)(ui, Some(on_file_stream));
        (api.set_auth_mode_callback)(ui, Some(on_auth_mode));
    }

    let title = c_text("Bootstrapper");
    let started = unsafe { (api.initialize)(ui, title.as_ptr()) };
    if started {
        tracing::info!("loader window running");
        while unsafe { (api.should_run)(ui) } {
            unsafe {
                (api.update)(ui);
                (api.render)(ui);
            }
        }
    } else {
        tracing::error!("loader window failed to start");
    }

    UI.store(std::ptr::null_mut(), Ordering::Release);
    unsafe {
        (api.shutdown)(ui);
        (api.destroy)(ui);
    }
    if started {
        Ok(())
    } else {
        Err(anyhow!("loader UI failed to initialize"))
    }
}
