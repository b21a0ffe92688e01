#![allow(non_snake_case)]

mod countdown;
mod feed;
mod gemini;
mod log;
mod model;

use std::time::Duration;

use chrono::{Datelike, Local};
use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;

use countdown::Countdown;
use feed::{FeedConfig, GeminiSource};
use log::{DiagEntry, Level, app_log, app_logs_snapshot};
use model::{AppMode, GLITCH_DWELL, LogBuffer, UserIdentity};

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Artificial pause before the identity fetch so the dashboard gets its
/// "booting" moment.
const BOOT_DELAY: Duration = Duration::from_secs(2);

// ============================================================================
// Entry & root component
// ============================================================================

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info,midnight_protocol=debug"))
        .try_init();
    dioxus::launch(Root);
}

/// Remounts the whole app when the session counter bumps. This is the only
/// way back out of the celebration screen; every timer and in-flight fetch
/// dies with the old subtree.
#[component]
fn Root() -> Element {
    let mut session = use_signal(|| 0u32);

    rsx! {
        document::Stylesheet { href: asset!("/assets/styles.css") }
        App {
            key: "{session}",
            on_reset: move |_| {
                app_log(Level::Info, "Session reset requested");
                session += 1;
            },
        }
    }
}

#[component]
fn App(on_reset: EventHandler<()>) -> Element {
    let mut mode = use_signal(|| AppMode::Retro);

    // Midnight signal path, shared by the countdown and the manual override.
    // The glitch dwell timer is only armed when the edge actually fires.
    let advance = move |_: ()| {
        let next = mode().on_midnight_signal();
        if next == mode() {
            return;
        }
        mode.set(next);
        app_log(Level::Info, "Midnight signal: entering glitch interlude");
        spawn(async move {
            tokio::time::sleep(GLITCH_DWELL).await;
            mode.set(mode().after_glitch_dwell());
            app_log(Level::Info, "Glitch dwell elapsed: celebration online");
        });
    };

    rsx! {
        div { class: "app-shell",
            {match mode() {
                AppMode::Retro => rsx! {
                    RetroTerminal { on_midnight: advance }
                },
                AppMode::Glitch => rsx! {
                    GlitchOverlay {}
                },
                AppMode::Modern => rsx! {
                    ModernDashboard { on_reset }
                },
            }}
        }
    }
}

// ============================================================================
// Retro terminal (countdown + log feed)
// ============================================================================

#[component]
fn RetroTerminal(on_midnight: EventHandler<()>) -> Element {
    let mut logs = use_signal(LogBuffer::new);
    let mut time_display = use_signal(|| "00:00:00".to_string());
    let mut current_date = use_signal(|| "LOADING...".to_string());
    let mut diag_open = use_signal(|| false);
    let mut diag_snapshot = use_signal(|| Vec::<DiagEntry>::new());

    // Countdown tick loop. Signals midnight exactly once, then stops.
    // Unmounting cancels it at the sleep point.
    use_effect(move || {
        spawn(async move {
            let engine = Countdown::until_next_midnight(Local::now().naive_local());
            loop {
                let tick = engine.tick(Local::now().naive_local());
                current_date.set(tick.date);
                time_display.set(tick.display);
                if tick.reached {
                    on_midnight.call(());
                    break;
                }
                tokio::time::sleep(COUNTDOWN_TICK).await;
            }
        });
    });

    // Serial log feed: one in-flight fetch, then a fixed pause.
    use_effect(move || {
        spawn(async move {
            feed::run_feed(GeminiSource, FeedConfig::default(), move |entry| {
                app_log(Level::Info, format!("feed: {}", entry.message));
                logs.write().push(entry);
                true
            })
            .await;
        });
    });

    rsx! {
        div { class: "retro-screen",
            div { class: "scanline" }
            div { class: "crt-flicker" }
            div { class: "retro-date", "SYSTEM_DATE: {current_date}" }

            div { class: "countdown-block",
                h1 { class: "countdown-display", "{time_display}" }
                p { class: "countdown-caption", "Awaiting Midnight Protocol" }
            }

            div { class: "terminal-panel",
                div { class: "terminal-panel-header",
                    span { "SYSTEM_MONITOR.EXE" }
                    div { class: "terminal-lights",
                        span { class: "light" }
                        span { class: "light" }
                        span { class: "light light-active" }
                    }
                }
                div { class: "terminal-log-scroll",
                    for entry in logs.read().iter() {
                        div { key: "{entry.id}", class: "terminal-log-line",
                            span { class: "terminal-log-time", "[{entry.timestamp}]" }
                            span { class: "terminal-log-message", "{entry.message}" }
                        }
                    }
                    div { class: "terminal-cursor", "_" }
                }
            }

            {if *diag_open.read() {
                rsx! {
                    div { class: "diag-panel",
                        {if diag_snapshot.read().is_empty() {
                            rsx! { p { class: "diag-empty", "NO DIAGNOSTICS RECORDED" } }
                        } else {
                            rsx! {
                                for entry in diag_snapshot.read().iter() {
                                    div { class: "diag-line",
                                        span { class: "diag-time", "{entry.time}" }
                                        span {
                                            class: if entry.level == Level::Error { "diag-level diag-error" } else { "diag-level" },
                                            "{entry.level.as_str()}"
                                        }
                                        span { class: "diag-message", "{entry.message}" }
                                    }
                                }
                            }
                        }}
                    }
                }
            } else {
                rsx! {}
            }}

            div { class: "retro-controls",
                button {
                    class: "retro-button",
                    onclick: move |_| {
                        let open = !diag_open();
                        if open {
                            diag_snapshot.set(app_logs_snapshot());
                        }
                        diag_open.set(open);
                    },
                    "[ SYS_DIAG ]"
                }
                button {
                    class: "retro-button",
                    onclick: move |_| on_midnight.call(()),
                    "[ DEV_OVERRIDE ]"
                }
            }
        }
    }
}

// ============================================================================
// Glitch interlude
// ============================================================================

#[component]
fn GlitchOverlay() -> Element {
    rsx! {
        div { class: "glitch-screen",
            div { class: "glitch-layer glitch-layer-a" }
            div { class: "glitch-layer glitch-layer-b" }
            span { class: "glitch-text glitch-text-main", "CRITICAL_ERROR" }
            span { class: "glitch-text glitch-text-hex", "0xFF12039A" }
            span { class: "glitch-text glitch-text-reboot", "SYSTEM_REBOOT" }
        }
    }
}

// ============================================================================
// Celebration dashboard
// ============================================================================

#[component]
fn ModernDashboard(on_reset: EventHandler<()>) -> Element {
    let mut identity = use_signal(|| None::<UserIdentity>);
    let year = Local::now().year();

    use_effect(move || {
        spawn(async move {
            tokio::time::sleep(BOOT_DELAY).await;
            let assigned = gemini::generate_identity().await;
            app_log(Level::Info, format!("Identity assigned: {}", assigned.title));
            identity.set(Some(assigned));
        });
    });

    rsx! {
        div { class: "dashboard-screen",
            {match identity.read().as_ref() {
                None => rsx! {
                    div { class: "dashboard-booting",
                        div { class: "dashboard-spinner" }
                        h2 { class: "dashboard-booting-caption", "INITIALIZING {year} OS..." }
                    }
                },
                Some(assigned) => rsx! {
                    div { class: "dashboard-card-stack",
                        div { class: "dashboard-headline",
                            h2 { class: "dashboard-greeting", "HAPPY NEW YEAR" }
                            p { class: "dashboard-subtitle", "System Successfully Updated" }
                            h1 { class: "dashboard-year", "{year}" }
                        }
                        div { class: "identity-card",
                            p { class: "identity-caption", "User Identity Assigned" }
                            h2 { class: "identity-title", "{assigned.title}" }
                            div { class: "identity-divider" }
                            p { class: "identity-mission", "\"{assigned.mission}\"" }
                            div { class: "identity-badges",
                                span { class: "identity-badge", "STATUS: ONLINE" }
                                {assigned.element.as_ref().map(|element| rsx! {
                                    span { class: "identity-badge identity-badge-element", "{element}" }
                                })}
                            }
                        }
                        button {
                            class: "dashboard-reset",
                            onclick: move |_| on_reset.call(()),
                            "RESET SIMULATION"
                        }
                    }
                },
            }}
        }
    }
}
