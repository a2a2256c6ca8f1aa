use dioxus::prelude::*;

/// Actions the UI can send to the drop store via the coroutine.
#[derive(Debug, Clone)]
pub enum StoreAction {
    /// Fetch every drop row (the catalog view).
    FetchDrops,
    /// Fetch one drop row by slug.
    FetchDrop { slug: String },
    /// Fetch the SKU list for a drop.
    FetchCatalog { slug: String },
    /// Commit a join: the server adds the cart total to the drop's raised
    /// total atomically, under a fresh idempotency ticket.
    Join { slug: String, amount: u64 },
}

/// Get a handle to send actions to the store communication coroutine.
pub fn use_store_action() -> Coroutine<StoreAction> {
    use_coroutine_handle::<StoreAction>()
}

/// Start the store communication coroutine.
///
/// When `use-store` is enabled, requests go over HTTP to a groupdrop-server
/// instance. Otherwise the coroutine is a logging sink and the storefront
/// runs entirely on the local demo flow.
pub fn use_store_coroutine() {
    #[cfg(not(feature = "use-store"))]
    {
        use_coroutine(|mut rx: UnboundedReceiver<StoreAction>| async move {
            use futures::StreamExt;
            while let Some(action) = rx.next().await {
                tracing::debug!("Store action (demo mode): {:?}", action);
            }
        });
    }

    #[cfg(feature = "use-store")]
    {
        use_coroutine(|rx: UnboundedReceiver<StoreAction>| store_comms(rx));
    }
}

// ─── WASM + use-store implementation ────────────────────────────────────────

#[cfg(all(target_family = "wasm", feature = "use-store"))]
mod wasm_impl {
    use dioxus::prelude::*;
    use futures::future::{select, Either};
    use futures::StreamExt;
    use gloo_timers::future::TimeoutFuture;
    use serde::de::DeserializeOwned;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    use groupdrop_common::api::{ErrorBody, JoinReceipt, JoinRequest, JoinTicket, StoreError};
    use groupdrop_common::catalog::Catalog;
    use groupdrop_common::drop::Drop;

    use super::StoreAction;
    use crate::components::local_store;
    use crate::components::shared_state::{use_shared_state, SharedState};

    /// Default drop store endpoint; overridable at compile time via the
    /// GROUPDROP_STORE_URL env var, or at runtime via a `?store=<port>`
    /// query parameter (e.g. `?store=3090`).
    const DEFAULT_STORE_URL: &str = "http://localhost:3080";

    /// Reads are retried this many times before the error is surfaced.
    const READ_ATTEMPTS: u32 = 3;
    const RETRY_DELAY_MS: u32 = 500;

    /// Every store round trip is abandoned after this long.
    const REQUEST_TIMEOUT_MS: u32 = 10_000;

    fn resolve_store_url() -> String {
        let compile_time_url = option_env!("GROUPDROP_STORE_URL").unwrap_or(DEFAULT_STORE_URL);
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|qs| {
                web_sys::UrlSearchParams::new_with_str(&qs)
                    .ok()?
                    .get("store")
            })
            .map(|port| format!("http://localhost:{port}"))
            .unwrap_or_else(|| compile_time_url.to_string())
    }

    /// A fresh idempotency ticket for one join attempt. Retries of the same
    /// attempt reuse the ticket; a new click mints a new one.
    fn make_ticket(slug: &str) -> JoinTicket {
        let entropy = (js_sys::Math::random() * 1e9) as u64;
        JoinTicket(format!("{slug}-{}-{entropy}", js_sys::Date::now() as u64))
    }

    /// Main store communication loop.
    pub async fn store_comms(mut rx: UnboundedReceiver<StoreAction>) {
        let mut shared = use_shared_state();
        let base = resolve_store_url();
        tracing::info!("drop store endpoint: {base}");

        while let Some(action) = rx.next().await {
            match action {
                StoreAction::FetchDrops => {
                    match get_with_retry::<Vec<Drop>>(&format!("{base}/drops")).await {
                        Ok(rows) => {
                            let mut state = shared.write();
                            state.connected = true;
                            state.last_error = None;
                            for row in rows {
                                local_store::save_raised(&row.slug, row.raised);
                                state.drops.insert(row.slug.clone(), row);
                            }
                        }
                        Err(e) => fail(&mut shared, e),
                    }
                }
                StoreAction::FetchDrop { slug } => {
                    match get_with_retry::<Drop>(&format!("{base}/drops/{slug}")).await {
                        Ok(row) => {
                            let mut state = shared.write();
                            state.connected = true;
                            state.last_error = None;
                            local_store::save_raised(&row.slug, row.raised);
                            state.drops.insert(row.slug.clone(), row);
                        }
                        Err(e) => fail(&mut shared, e),
                    }
                }
                StoreAction::FetchCatalog { slug } => {
                    match get_with_retry::<Catalog>(&format!("{base}/drops/{slug}/catalog")).await
                    {
                        Ok(catalog) => {
                            let mut state = shared.write();
                            state.connected = true;
                            state.catalogs.insert(slug, catalog);
                        }
                        Err(e) => fail(&mut shared, e),
                    }
                }
                StoreAction::Join { slug, amount } => {
                    handle_join(&mut shared, &base, slug, amount).await;
                }
            }
        }
    }

    async fn handle_join(
        shared: &mut Signal<SharedState>,
        base: &str,
        slug: String,
        amount: u64,
    ) {
        // Ignore re-entry while a join for this drop is in flight.
        {
            let mut state = shared.write();
            if state.joining.contains(&slug) {
                tracing::debug!("join for '{slug}' already in flight, ignoring");
                return;
            }
            state.joining.insert(slug.clone());
            state.last_error = None;
            state.last_joined.remove(&slug);
        }

        let drop_id = shared.read().drops.get(&slug).map(|d| d.id.clone());
        let result = match drop_id {
            Some(id) => {
                let request = JoinRequest {
                    ticket: make_ticket(&slug),
                    amount,
                };
                post_join(base, &id.0, &request).await
            }
            None => Err(StoreError::Write("drop not loaded yet".into())),
        };

        match result {
            Ok(receipt) => {
                let mut state = shared.write();
                state.connected = true;
                state.last_joined.insert(slug.clone(), receipt.accepted);
                local_store::save_raised(&slug, receipt.drop.raised);
                state.drops.insert(slug.clone(), receipt.drop);
            }
            Err(e) => fail(shared, e),
        }
        shared.write().joining.remove(&slug);

        // Re-read so the page reflects the committed value even when another
        // client's join landed in between.
        if let Ok(row) = get_with_retry::<Drop>(&format!("{base}/drops/{slug}")).await {
            local_store::save_raised(&row.slug, row.raised);
            shared.write().drops.insert(slug, row);
        }
    }

    fn fail(shared: &mut Signal<SharedState>, err: StoreError) {
        let mut state = shared.write();
        state.connected = false;
        state.last_error = Some(err.to_string());
    }

    async fn get_with_retry<T: DeserializeOwned>(url: &str) -> Result<T, StoreError> {
        let mut last = String::new();
        for attempt in 1..=READ_ATTEMPTS {
            match http_call(url, None).await {
                Ok(text) => {
                    return serde_json::from_str(&text)
                        .map_err(|e| StoreError::Read(format!("malformed response: {e}")));
                }
                Err(e) => {
                    tracing::warn!("read attempt {attempt}/{READ_ATTEMPTS} failed: {e}");
                    last = e;
                    if attempt < READ_ATTEMPTS {
                        TimeoutFuture::new(RETRY_DELAY_MS * attempt).await;
                    }
                }
            }
        }
        Err(StoreError::Read(last))
    }

    async fn post_join(
        base: &str,
        id: &str,
        request: &JoinRequest,
    ) -> Result<JoinReceipt, StoreError> {
        let body = serde_json::to_string(request).map_err(|e| StoreError::Write(e.to_string()))?;
        let text = http_call(&format!("{base}/join/{id}"), Some(body))
            .await
            .map_err(StoreError::Write)?;
        serde_json::from_str(&text)
            .map_err(|e| StoreError::Write(format!("malformed receipt: {e}")))
    }

    /// One fetch round trip with a timeout. GET when `body` is None, JSON
    /// POST otherwise. Non-2xx responses yield the server's error message.
    async fn http_call(url: &str, body: Option<String>) -> Result<String, String> {
        let opts = RequestInit::new();
        if let Some(body) = &body {
            opts.set_method("POST");
            let headers = Headers::new().map_err(|e| format!("{e:?}"))?;
            headers
                .set("content-type", "application/json")
                .map_err(|e| format!("{e:?}"))?;
            opts.set_headers(&headers);
            opts.set_body(&JsValue::from_str(body));
        } else {
            opts.set_method("GET");
        }
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{e:?}"))?;
        let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

        let fetched = Box::pin(JsFuture::from(window.fetch_with_request(&request)));
        let timeout = Box::pin(TimeoutFuture::new(REQUEST_TIMEOUT_MS));
        let response = match select(fetched, timeout).await {
            Either::Left((result, _)) => result.map_err(|e| format!("{e:?}"))?,
            Either::Right(_) => return Err("store request timed out".into()),
        };
        let response: Response = response
            .dyn_into()
            .map_err(|_| "unexpected fetch result".to_string())?;

        let text_promise = response.text().map_err(|e| format!("{e:?}"))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| format!("{e:?}"))?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("store returned HTTP {}", response.status()));
            return Err(message);
        }
        Ok(text)
    }
}

#[cfg(all(target_family = "wasm", feature = "use-store"))]
async fn store_comms(rx: UnboundedReceiver<StoreAction>) {
    wasm_impl::store_comms(rx).await;
}

// Non-WASM stub for the `use-store` feature (e.g. native cargo check).
#[cfg(all(not(target_family = "wasm"), feature = "use-store"))]
async fn store_comms(mut rx: UnboundedReceiver<StoreAction>) {
    use futures::StreamExt;
    tracing::warn!("use-store enabled but not running in WASM; store_comms is a no-op");
    while let Some(action) = rx.next().await {
        tracing::debug!("Store action (native stub): {:?}", action);
    }
}
