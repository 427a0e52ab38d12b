use eframe::egui;
use loader_ui::gui::LoaderApp;
use loader_ui::{HostEvent, HostToUi, LoaderConfig, Subscription, UserProfile, View};
use std::time::{Duration, Instant};

fn config() -> LoaderConfig {
    LoaderConfig {
        font_path: None,
        load_duration_ms: 200,
        download_delay_ms: 100,
        ..Default::default()
    }
}

fn profile() -> UserProfile {
    UserProfile {
        username: "alice".into(),
        email: "alice@example.com".into(),
        ip: "10.0.0.2".into(),
        subscriptions: vec![
            Subscription {
                plan: "Rust".into(),
                status: "active".into(),
                default_file_id: "4676609091914915".into(),
                ..Default::default()
            },
            Subscription {
                plan: "Tarkov".into(),
                status: "Expired".into(),
                default_file_id: "5118237405522314".into(),
                ..Default::default()
            },
        ],
    }
}

fn frame(ctx: &egui::Context, app: &mut LoaderApp, now: Instant) {
    let _ = ctx.run(egui::RawInput::default(), |ctx| app.render(ctx, now));
}

#[test]
fn login_to_launch() {
    let ctx = egui::Context::default();
    let mut app = LoaderApp::new(config());
    let t0 = Instant::now();
    frame(&ctx, &mut app, t0);
    assert_eq!(app.state().view(), View::Login);

    app.login.username = "alice".into();
    app.login.password = "secret".into();
    app.submit_login();
    assert_eq!(
        app.take_events(),
        vec![HostEvent::Login {
            username: "alice".into(),
            password: "secret".into()
        }]
    );

    app.apply(HostToUi::SetAuthenticated {
        authenticated: true,
        profile: Some(profile()),
    });
    assert_eq!(app.state().view(), View::Main);
    assert!(app.login.password.is_empty());

    app.select(0);
    app.request_load(t0);
    let mut last = 0.0;
    for step in 0..=10 {
        let now = t0 + Duration::from_millis(step * 25);
        frame(&ctx, &mut app, now);
        let progress = app.load_progress(now);
        assert!((0.0..=1.0).contains(&progress));
        assert!(progress >= last);
        last = progress;
    }
    assert!(app.timer().popup_pending());
    assert_eq!(app.state().status_message(), "Rust is ready");

    let dismissed = t0 + Duration::from_millis(300);
    app.dismiss_popup(dismissed);
    let mut launches = Vec::new();
    for step in 0..10 {
        frame(&ctx, &mut app, dismissed + Duration::from_millis(step * 50));
        launches.extend(app.take_events());
    }
    assert_eq!(
        launches,
        vec![HostEvent::Launch {
            file_id: "4676609091914915".into()
        }]
    );
    assert!(app.timer().is_idle());
}

#[test]
fn expired_plan_is_not_loaded() {
    let mut app = LoaderApp::new(config());
    app.set_authenticated(true, Some(profile()));
    app.select(1);
    app.request_load(Instant::now());
    assert_eq!(app.state().error_message(), "Tarkov is not active");
    assert!(app.timer().is_idle());
}

#[test]
fn logout_mid_load_cancels_launch() {
    let mut app = LoaderApp::new(config());
    let t0 = Instant::now();
    app.set_authenticated(true, Some(profile()));
    app.select(0);
    app.request_load(t0);
    app.apply(HostToUi::SetAuthenticated {
        authenticated: false,
        profile: None,
    });
    app.tick(t0 + Duration::from_secs(5));
    assert!(app.take_events().is_empty());
    assert!(app.user().subscriptions.is_empty());
    assert_eq!(app.state().view(), View::Login);
}

#[test]
fn license_only_flow_uses_local_account() {
    let mut app = LoaderApp::new(LoaderConfig {
        license_only_mode: true,
        ..config()
    });
    assert_eq!(app.state().view(), View::Main);

    app.apply(HostToUi::SetLocalAccount("kiosk".into()));
    app.redeem_license = "KEY-42".into();
    app.submit_redeem();
    assert_eq!(
        app.take_events(),
        vec![HostEvent::RedeemLicense {
            username: "kiosk".into(),
            license: "KEY-42".into()
        }]
    );

    app.set_authenticated(false, None);
    assert_eq!(app.state().view(), View::Main);
    assert_eq!(app.user().username, "kiosk");
}

#[test]
fn host_messages_leave_one_line() {
    let mut app = LoaderApp::new(config());
    app.apply(HostToUi::SetStatusMessage("Connecting".into()));
    app.apply(HostToUi::SetErrorMessage("Invalid credentials".into()));
    assert_eq!(app.state().status_message(), "");
    assert_eq!(app.state().error_message(), "Invalid credentials");
    app.apply(HostToUi::SetStatusMessage("Retrying".into()));
    assert_eq!(app.state().error_message(), "");
    assert_eq!(app.state().status_message(), "Retrying");
}
