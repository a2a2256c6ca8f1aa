use chrono::{DateTime, Local, Utc};
use dioxus::prelude::*;

use groupdrop_common::deadline::{format_join_by, format_time_left, next_drop_close};

/// Countdown labels for a drop's close.
#[derive(Clone, Debug, PartialEq)]
pub struct Countdown {
    pub time_left: String,
    pub join_by: String,
}

/// Derive countdown labels, refreshed once per minute. Uses the drop's own
/// close when the store provides one, otherwise the sitewide weekly close
/// (next Friday 5 PM local).
pub fn use_countdown(closes_at: Option<DateTime<Utc>>) -> Countdown {
    let mut now = use_signal(Local::now);

    use_effect(move || {
        spawn(async move {
            loop {
                // Tick once per minute; sub-minute precision is not worth the churn.
                #[cfg(target_family = "wasm")]
                gloo_timers::future::TimeoutFuture::new(60_000).await;
                #[cfg(not(target_family = "wasm"))]
                std::future::pending::<()>().await; // never ticks on native
                now.set(Local::now());
            }
        });
    });

    let deadline: DateTime<Local> = match closes_at {
        Some(close) => close.with_timezone(&Local),
        None => next_drop_close(now()),
    };
    Countdown {
        time_left: format_time_left(deadline - now()),
        join_by: format_join_by(&deadline),
    }
}
