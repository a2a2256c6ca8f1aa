use dioxus::prelude::*;

use super::drop_view::DropView;
use super::home_view::HomeView;
use super::local_store::use_storage_sync;
use super::shared_state::SharedState;
use super::store_api::use_store_coroutine;

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
    #[route("/drops/:slug")]
    DropDetail { slug: String },
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| Signal::new(initial_shared_state()));
    use_store_coroutine();
    use_storage_sync();

    rsx! { Router::<Route> {} }
}

/// Initial shared state: empty when the store will be fetched; pre-populated
/// with the seed drops (and any persisted demo counters) in demo mode.
fn initial_shared_state() -> SharedState {
    let mut state = SharedState::new();
    if cfg!(feature = "demo-data") {
        for mut row in groupdrop_common::seed::seed_drops() {
            if let Some(saved) = super::local_store::load_raised(&row.slug) {
                row.raised = saved;
            }
            state.drops.insert(row.slug.clone(), row);
        }
        for catalog in groupdrop_common::seed::seed_catalogs() {
            state.catalogs.insert(catalog.drop_slug.clone(), catalog);
        }
    }
    state
}

#[component]
fn AppLayout() -> Element {
    let nav = use_navigator();

    rsx! {
        div { class: "groupdrop-app",
            header { class: "app-header",
                div { class: "header-top",
                    h1 { "groupdrop" }
                    span { class: "beta-tag", "(beta)" }
                }
                nav {
                    button {
                        onclick: move |_| { nav.push(Route::Home {}); },
                        "Drops"
                    }
                }
            }
            main {
                Outlet::<Route> {}
            }
            footer { class: "app-footer", "© groupdrop" }
        }
    }
}

/// Route component: renders the drop catalog.
#[component]
fn Home() -> Element {
    rsx! { HomeView {} }
}

/// Route component: renders one drop's page by slug from the URL.
#[component]
fn DropDetail(slug: String) -> Element {
    rsx! { DropView { slug } }
}
