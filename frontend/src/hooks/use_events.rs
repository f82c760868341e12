use chrono::Local;
use events_shared::{EventFeed, EventsState};
use yew::prelude::*;

use crate::services::use_services;

/// Load the events list once on mount.
///
/// Images for the loaded events are preloaded afterwards in a detached task;
/// their failures are only logged.
#[hook]
pub fn use_events() -> EventsState {
    let services = use_services();
    let state = use_state(EventsState::default);

    {
        let state = state.clone();

        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                let today = Local::now().date_naive();
                let load = EventFeed::new(&services.store, &services.cache)
                    .load(today)
                    .await;
                tracing::debug!("Events loaded from {:?}", load.source);

                state.set(load.state);

                if !load.preload.is_empty() {
                    let urls = load.preload;
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = services.images.preload_images(&urls).await {
                            tracing::error!("Failed to preload event images: {}", e);
                        }
                    });
                }
            });
            || ()
        });
    }

    (*state).clone()
}
