#[cfg(target_os = "windows")]
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
#[cfg(target_os = "windows")]
use windows::Win32::Foundation::HWND;

/// Primary monitor size in pixels.
#[cfg(target_os = "windows")]
pub fn screen_size() -> Option<(f32, f32)> {
    use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};
    let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    (width > 0 && height > 0).then_some((width as f32, height as f32))
}

#[cfg(not(target_os = "windows"))]
pub fn screen_size() -> Option<(f32, f32)> {
    None
}

/// Top-left corner that centers a window of `size` on `screen`.
pub fn center_in(screen: (f32, f32), size: (f32, f32)) -> [f32; 2] {
    [
        ((screen.0 - size.0) / 2.0).max(0.0),
        ((screen.1 - size.1) / 2.0).max(0.0),
    ]
}

pub fn initial_position(size: (f32, f32)) -> Option<[f32; 2]> {
    screen_size().map(|screen| center_in(screen, size))
}

#[cfg(target_os = "windows")]
fn get_hwnd(frame: &eframe::Frame) -> Option<HWND> {
    frame
        .window_handle()
        .ok()
        .and_then(|wh| match wh.as_raw() {
            RawWindowHandle::Win32(handle) => {
                Some(HWND(handle.hwnd.get() as *mut core::ffi::c_void))
            }
            _ => None,
        })
}

/// Undecorated windows spawned from a background thread tend to open behind
/// the host's console, so pull ours forward once it exists.
#[cfg(target_os = "windows")]
pub fn bring_to_front(frame: &eframe::Frame) {
    use windows::Win32::UI::WindowsAndMessaging::{SetForegroundWindow, ShowWindow, SW_SHOW};
    if let Some(hwnd) = get_hwnd(frame) {
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = SetForegroundWindow(hwnd);
        }
    } else {
        tracing::debug!("no Win32 handle for the loader window");
    }
}

#[cfg(not(target_os = "windows"))]
pub fn bring_to_front(_frame: &eframe::Frame) {}
