use dioxus::prelude::*;

use groupdrop_common::cart::Cart;
use groupdrop_common::currency::format_amount;
use groupdrop_common::drop::percent;

use super::app::Route;
use super::countdown::use_countdown;
use super::local_store;
use super::shared_state::use_shared_state;
use super::store_api::{use_store_action, StoreAction};

/// The parameterized drop page: SKU steppers, cart summary, join button.
/// One component serves every drop; the slug picks the row and catalog.
#[component]
pub fn DropView(slug: String) -> Element {
    let mut shared_state = use_shared_state();
    let store = use_store_action();
    let mut cart = use_signal(Cart::new);
    let mut status_msg = use_signal(String::new);
    let nav = use_navigator();

    // Fetch the authoritative row and catalog on mount (no-op in demo mode).
    {
        let slug = slug.clone();
        use_hook(move || {
            store.send(StoreAction::FetchDrop { slug: slug.clone() });
            store.send(StoreAction::FetchCatalog { slug });
        });
    }

    let state = shared_state.read();
    let row = state.drop_for(&slug).cloned();
    let catalog = state.catalogs.get(&slug).cloned().unwrap_or_default();
    let joining = state.joining.contains(&slug);
    let error = state.last_error.clone();
    let last_accepted = state.last_joined.get(&slug).copied();
    drop(state);

    let countdown = use_countdown(row.as_ref().and_then(|r| r.closes_at));

    let Some(row) = row else {
        return rsx! {
            div { class: "drop-view",
                h2 { "Loading..." }
                if let Some(err) = error {
                    p { class: "error-banner", "{err}" }
                }
            }
        };
    };

    let currency = row.currency;
    let cart_snapshot = cart.read().clone();
    let cart_total = cart_snapshot.total(&catalog);
    let percent_now = row.percent();
    let raised = format_amount(row.raised, &currency);
    let remaining = format_amount(row.remaining(), &currency);

    // Preview: what the bar becomes if this cart joins now.
    let preview_raised = row.raised.saturating_add(cart_total).min(row.target);
    let preview_percent = percent(preview_raised, row.target);

    let can_join = !joining && cart_total > 0 && !row.is_funded();
    let join_label = if row.is_funded() {
        "Target reached".to_string()
    } else if cart_total == 0 {
        "Add items to join".to_string()
    } else if joining {
        "Joining...".to_string()
    } else {
        format!(
            "Join this drop (authorize {})",
            format_amount(cart_total, &currency)
        )
    };

    // Confirmation for a committed remote join, from the receipt.
    let joined_banner = last_accepted.map(|accepted| {
        if row.is_funded() {
            format!(
                "Joined. {} added. Target reached.",
                format_amount(accepted, &currency)
            )
        } else {
            format!(
                "Joined. {} added to the drop total.",
                format_amount(accepted, &currency)
            )
        }
    });

    let line_items: Vec<(String, u32, String)> = cart_snapshot
        .line_items(&catalog)
        .into_iter()
        .map(|line| {
            (
                line.sku.name.clone(),
                line.quantity,
                format_amount(line.line_total, &currency),
            )
        })
        .collect();

    let on_join = {
        let slug = slug.clone();
        let catalog = catalog.clone();
        move |_| {
            let amount = cart.read().total(&catalog);
            if amount == 0 {
                status_msg.set("Add items to your cart to join.".into());
                return;
            }
            let funded = shared_state
                .read()
                .drops
                .get(&slug)
                .is_none_or(|r| r.is_funded());
            if funded {
                return;
            }

            if cfg!(feature = "use-store") {
                status_msg.set(String::new());
                store.send(StoreAction::Join {
                    slug: slug.clone(),
                    amount,
                });
            } else {
                // Demo flow: the same increment-with-clamp, committed locally
                // and broadcast to other tabs through localStorage.
                let mut state = shared_state.write();
                if let Some(row) = state.drops.get_mut(&slug) {
                    let outcome = row.apply_join(amount);
                    let raised = row.raised;
                    let currency = row.currency;
                    drop(state);
                    local_store::save_raised(&slug, raised);
                    status_msg.set(if outcome.funded {
                        format!(
                            "Joined. {} added. Target reached.",
                            format_amount(outcome.accepted, &currency)
                        )
                    } else {
                        format!(
                            "Joined. {} added to the drop total.",
                            format_amount(outcome.accepted, &currency)
                        )
                    });
                }
            }
            cart.write().clear();
        }
    };

    let on_reset = {
        let slug = slug.clone();
        move |_| {
            let Some(seeded) = groupdrop_common::seed::seed_drops()
                .into_iter()
                .find(|d| d.slug == slug)
            else {
                return;
            };
            let mut state = shared_state.write();
            if let Some(row) = state.drops.get_mut(&slug) {
                row.raised = seeded.raised;
            }
            drop(state);
            local_store::save_raised(&slug, seeded.raised);
            cart.write().clear();
            status_msg.set("Demo reset to the starting amount.".into());
        }
    };

    rsx! {
        div { class: "drop-view",
            button {
                class: "back-link",
                onclick: move |_| { nav.push(Route::Home {}); },
                "Back to drops"
            }

            div { class: "drop-heading",
                div { class: "badge", "ACTIVE DROP" }
                h2 { "{row.title}" }
            }

            if let Some(err) = error {
                p { class: "error-banner", "{err}" }
            }

            div { class: "drop-columns",
                section { class: "sku-list",
                    div { class: "sku-list-heading",
                        h3 { "Choose items" }
                        span { class: "hint", "Add to cart" }
                    }
                    {catalog.skus.iter().map(|sku| {
                        let inc_id = sku.id.clone();
                        let dec_id = sku.id.clone();
                        let qty = cart_snapshot.quantity(&sku.id);
                        let price = format_amount(sku.price, &sku.currency);
                        rsx! {
                            div { class: "sku-row", key: "{sku.id.0}",
                                div { class: "sku-info",
                                    div { class: "sku-name",
                                        "{sku.name}"
                                        if let Some(tag) = &sku.tag {
                                            span { class: "sku-tag", " {tag}" }
                                        }
                                    }
                                    div { class: "sku-subtitle", "{sku.subtitle}" }
                                    div { class: "sku-price", "{price}" }
                                }
                                div { class: "sku-stepper",
                                    button {
                                        onclick: move |_| cart.write().decrement(&dec_id),
                                        "−"
                                    }
                                    span { class: "sku-qty", "{qty}" }
                                    button {
                                        onclick: move |_| cart.write().increment(&inc_id),
                                        "+"
                                    }
                                }
                            }
                        }
                    })}
                }

                aside { class: "drop-summary",
                    h3 { "Drop status" }
                    div { class: "drop-meta",
                        span { "Time left: " strong { "{countdown.time_left}" } }
                        span { "Join by " strong { "{countdown.join_by}" } }
                    }
                    div { class: "progress-track",
                        div { class: "progress-fill", style: "width: {percent_now}%" }
                    }
                    div { class: "drop-meta",
                        span { "Raised: " strong { "{raised}" } }
                        span { "{percent_now}% • " strong { "{remaining}" } " to go" }
                    }

                    div { class: "cart-summary",
                        h4 { "Cart" }
                        if line_items.is_empty() {
                            p { class: "empty-state", "No items yet." }
                        } else {
                            {line_items.iter().map(|(name, qty, total)| {
                                rsx! {
                                    div { class: "cart-line", key: "{name}",
                                        span { "{name} × {qty}" }
                                        span { "{total}" }
                                    }
                                }
                            })}
                        }
                        div { class: "cart-total",
                            span { "Cart total" }
                            strong { {format_amount(cart_total, &currency)} }
                        }
                        if cart_total > 0 && !row.is_funded() {
                            p { class: "preview-hint",
                                "Joining takes this drop to {preview_percent}%."
                            }
                        }
                        p { class: "fine-print",
                            "This amount will be added to the drop total when you join."
                        }
                    }

                    button {
                        class: "join-button",
                        disabled: !can_join,
                        onclick: on_join,
                        "{join_label}"
                    }

                    if let Some(msg) = joined_banner {
                        p { class: "status-banner", "{msg}" }
                    } else if !status_msg.read().is_empty() {
                        p { class: "status-banner", "{status_msg}" }
                    }

                    if cfg!(all(feature = "demo-data", not(feature = "use-store"))) {
                        button {
                            class: "reset-demo",
                            onclick: on_reset,
                            "Reset demo"
                        }
                    }
                }
            }
        }
    }
}
