use dioxus::prelude::*;

use groupdrop_common::currency::format_amount;
use groupdrop_common::drop::Drop;

use super::app::Route;
use super::countdown::use_countdown;
use super::shared_state::use_shared_state;
use super::store_api::{use_store_action, StoreAction};

#[component]
pub fn HomeView() -> Element {
    let shared_state = use_shared_state();
    let store = use_store_action();

    // Ask the store for fresh rows on mount (a no-op in demo mode).
    use_hook(move || store.send(StoreAction::FetchDrops));

    let drops: Vec<Drop> = shared_state
        .read()
        .drop_entries()
        .into_iter()
        .cloned()
        .collect();

    rsx! {
        div { class: "home-view",
            section { class: "hero",
                h2 { "Premium group buys, without the chaos." }
                p { "Join curated drops. Watch the total climb. When we hit the target, everyone gets the deal." }
            }

            if cfg!(feature = "use-store") {
                {
                    let shared = shared_state.read();
                    if shared.connected {
                        rsx! { p { class: "connection-status connected", "Connected to drop store" } }
                    } else if let Some(err) = &shared.last_error {
                        rsx! { p { class: "connection-status error", "Error: {err}" } }
                    } else {
                        rsx! { p { class: "connection-status connecting", "Connecting..." } }
                    }
                }
            }

            section { class: "drop-list",
                if drops.is_empty() {
                    p { class: "empty-state", "No drops live right now." }
                } else {
                    {drops.into_iter().map(|row| {
                        let slug = row.slug.clone();
                        rsx! { DropCard { key: "{slug}", row } }
                    })}
                }
            }
        }
    }
}

/// One drop card: badge, progress, countdown, and a link into the drop page.
#[component]
fn DropCard(row: Drop) -> Element {
    let nav = use_navigator();
    let countdown = use_countdown(row.closes_at);

    let percent = row.percent();
    let target = format_amount(row.target, &row.currency);
    let raised = format_amount(row.raised, &row.currency);
    let remaining = format_amount(row.remaining(), &row.currency);
    let badge = badge_for(&row.slug);
    let cta = if row.is_funded() {
        "View this drop"
    } else {
        "Join this drop"
    };
    let slug = row.slug.clone();

    rsx! {
        div { class: "drop-card",
            div { class: "badge", "{badge}" }
            h3 { "{row.title}" }
            div { class: "drop-meta",
                span { "Target: " strong { "{target}" } }
                span { "Time left: " strong { "{countdown.time_left}" } }
            }
            p { class: "join-by", "Join by " strong { "{countdown.join_by}" } }
            div { class: "progress-track",
                div { class: "progress-fill", style: "width: {percent}%" }
            }
            div { class: "drop-meta",
                span { "Raised: " strong { "{raised}" } }
                span { "{percent}% • " strong { "{remaining}" } " to go" }
            }
            button {
                onclick: move |_| {
                    nav.push(Route::DropDetail { slug: slug.clone() });
                },
                "{cta}"
            }
        }
    }
}

/// Card badge copy for the launch drops.
fn badge_for(slug: &str) -> &'static str {
    match slug {
        "aesop" => "ACTIVE DROP",
        "lelabo" => "UP NEXT",
        _ => "DROP",
    }
}
