//! Demo-flow persistence: per-drop raised counters in browser localStorage,
//! kept in sync across open tabs via the storage event.
//!
//! This is a display convenience only. When `use-store` is enabled the store
//! service is authoritative and these cells are just a read-through cache
//! for the first paint.

use dioxus::prelude::*;

#[cfg(target_family = "wasm")]
use groupdrop_common::seed::{raised_storage_key, slug_for_storage_key};

use super::shared_state::use_shared_state;

/// Read a drop's persisted counter. Malformed values are discarded silently
/// in favour of the compiled-in default.
pub fn load_raised(slug: &str) -> Option<u64> {
    #[cfg(target_family = "wasm")]
    {
        let storage = web_sys::window()?.local_storage().ok()??;
        let raw = storage.get_item(&raised_storage_key(slug)).ok()??;
        raw.parse::<u64>().ok()
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = slug;
        None
    }
}

pub fn save_raised(slug: &str, raised: u64) {
    #[cfg(target_family = "wasm")]
    {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(&raised_storage_key(slug), &raised.to_string());
        }
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = (slug, raised);
    }
}

/// Mirror storage writes from other tabs into the shared state, so every
/// open instance of the page shows the same totals without a round trip.
pub fn use_storage_sync() {
    let shared = use_shared_state();
    use_hook(move || {
        #[cfg(target_family = "wasm")]
        {
            use wasm_bindgen::closure::Closure;
            use wasm_bindgen::JsCast;

            let mut shared = shared;
            let on_storage = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(
                move |event: web_sys::StorageEvent| {
                    let (Some(key), Some(value)) = (event.key(), event.new_value()) else {
                        return;
                    };
                    let Some(slug) = slug_for_storage_key(&key) else {
                        return;
                    };
                    let Ok(raised) = value.parse::<u64>() else {
                        return;
                    };
                    let mut state = shared.write();
                    if let Some(row) = state.drops.get_mut(slug) {
                        row.raised = raised;
                    }
                },
            );
            if let Some(window) = web_sys::window() {
                let _ = window.add_event_listener_with_callback(
                    "storage",
                    on_storage.as_ref().unchecked_ref(),
                );
            }
            // The listener lives for the whole page; leak the closure once.
            on_storage.forget();
        }
        #[cfg(not(target_family = "wasm"))]
        {
            let _ = shared;
        }
    });
}
