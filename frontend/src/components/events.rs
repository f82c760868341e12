use events_shared::{Event, EventDraft};
use uuid::Uuid;
use yew::prelude::*;

use crate::components::event_card::EventCard;
use crate::components::event_modal::EventModal;
use crate::components::toast::{use_toast, Toaster};
use crate::hooks::use_events;
use crate::services::js_error_message;
use crate::services::session::use_session;

/// Placeholder cards shown while the list loads.
const SKELETON_CARDS: usize = 2;

#[function_component(Events)]
pub fn events() -> Html {
    let state = use_events();
    let session = use_session();
    let toast = use_toast();
    let is_admin = session.as_ref().is_some_and(|user| user.is_admin());

    let show_modal = use_state(|| false);
    let selected_event = use_state(|| None::<Event>);

    if state.loading {
        return html! {
            <section class="events-section">
                <div class="container">
                    <div class="events-header">
                        <h2>{"Recent Events"}</h2>
                    </div>
                    <div class="events-grid">
                        { for (0..SKELETON_CARDS).map(|i| html! {
                            <div key={i} class="event-card event-card-skeleton">
                                <div class="event-card-placeholder pulse" />
                                <div class="event-card-body">
                                    <div class="skeleton-line skeleton-title pulse" />
                                    <div class="skeleton-line skeleton-meta pulse" />
                                    <div class="skeleton-block pulse" />
                                </div>
                            </div>
                        })}
                    </div>
                </div>
            </section>
        };
    }

    let open_create = {
        let show_modal = show_modal.clone();
        let selected_event = selected_event.clone();
        Callback::from(move |_: MouseEvent| {
            selected_event.set(None);
            show_modal.set(true);
        })
    };

    let close_modal = {
        let show_modal = show_modal.clone();
        let selected_event = selected_event.clone();
        Callback::from(move |_: ()| {
            show_modal.set(false);
            selected_event.set(None);
        })
    };

    let on_save = {
        let selected_event = selected_event.clone();
        Callback::from(move |draft: EventDraft| {
            save_event(&toast, (*selected_event).as_ref(), draft);
        })
    };

    html! {
        <section class="events-section">
            <div class="container">
                <div class="events-header">
                    <h2>{"Recent Events"}</h2>
                    if is_admin {
                        <button class="btn btn-primary" onclick={open_create}>
                            {"+ Add Event"}
                        </button>
                    }
                </div>

                <div class="events-grid">
                    { for state.events.iter().map(|event| {
                        let on_edit = {
                            let show_modal = show_modal.clone();
                            let selected_event = selected_event.clone();
                            let event = event.clone();
                            Callback::from(move |_: ()| {
                                selected_event.set(Some(event.clone()));
                                show_modal.set(true);
                            })
                        };

                        html! {
                            <EventCard
                                key={event.id.clone()}
                                event={event.clone()}
                                is_admin={is_admin}
                                on_edit={Some(on_edit)}
                            />
                        }
                    })}
                </div>

                if *show_modal {
                    <EventModal
                        event={(*selected_event).clone()}
                        on_close={close_modal}
                        on_save={on_save}
                        is_editing={selected_event.is_some()}
                    />
                }
            </div>
        </section>
    }
}

/// Acknowledge a save from the modal and reload to pick up changes.
///
/// Nothing is written to the database here; the record is only prepared
/// and logged.
fn save_event(toast: &Toaster, editing: Option<&Event>, draft: EventDraft) {
    let key = editing
        .map(|event| event.template_key().to_string())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
    let record = draft.into_record();
    tracing::info!("Saving event {} ({})", key, record.title);

    toast.success("Event saved successfully!");

    if let Err(e) = reload_page() {
        tracing::error!("Error saving event: {}", e);
        toast.error("Failed to save event");
    }
}

fn reload_page() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window available".to_string())?;
    window
        .location()
        .reload()
        .map_err(|e| js_error_message(&e))
}
