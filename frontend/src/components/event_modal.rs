use events_shared::{DayOfWeek, EventDraft, EventType};
use validator::{Validate, ValidationErrors};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EventModalProps {
    #[prop_or_default]
    pub event: Option<events_shared::Event>,
    pub on_close: Callback<()>,
    pub on_save: Callback<EventDraft>,
    #[prop_or_default]
    pub is_editing: bool,
}

#[function_component(EventModal)]
pub fn event_modal(props: &EventModalProps) -> Html {
    let draft = {
        let event = props.event.clone();
        use_state(move || event.as_ref().map(EventDraft::from_event).unwrap_or_default())
    };
    let errors = use_state(Vec::<String>::new);

    let on_title = text_input(&draft, |d, value| d.title = value);
    let on_time = text_input(&draft, |d, value| d.time = value);
    let on_date = text_input(&draft, |d, value| d.date = non_empty(value));
    let on_image = text_input(&draft, |d, value| d.image_url = non_empty(value));

    let on_description = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.description = input.value();
            draft.set(next);
        })
    };

    let on_type = select_change(&draft, |d, value| {
        d.event_type = if value == EventType::Regular.as_str() {
            EventType::Regular
        } else {
            EventType::Special
        };
    });

    let on_day = select_change(&draft, |d, value| {
        if let Ok(day) = value.parse::<DayOfWeek>() {
            d.weekly_day = Some(day);
        }
    });

    let on_weekly = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.weekly_day = input.checked().then_some(DayOfWeek::ALL[0]);
            draft.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let current = (*draft).clone();
            match current.validate() {
                Ok(()) => {
                    errors.set(Vec::new());
                    on_save.emit(current);
                }
                Err(validation) => errors.set(describe_errors(&validation)),
            }
        })
    };

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let heading = if props.is_editing { "Edit Event" } else { "Add Event" };

    html! {
        <div class="modal-overlay" onclick={close.clone()}>
            <div class="modal-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="modal-header">
                    <h3>{ heading }</h3>
                    <button class="modal-close" onclick={close.clone()}>{"x"}</button>
                </div>
                <form class="modal-body event-form" onsubmit={on_submit}>
                    if !errors.is_empty() {
                        <ul class="form-errors">
                            { for errors.iter().map(|message| html! { <li>{ message }</li> }) }
                        </ul>
                    }
                    <label>
                        {"Title"}
                        <input type="text" value={draft.title.clone()} oninput={on_title} />
                    </label>
                    <label>
                        {"Time"}
                        <input type="text" placeholder="7:00 PM" value={draft.time.clone()} oninput={on_time} />
                    </label>
                    <label>
                        <input type="checkbox" checked={draft.weekly_day.is_some()} onchange={on_weekly} />
                        {"Repeats weekly"}
                    </label>
                    if let Some(day) = draft.weekly_day {
                        <label>
                            {"Day of week"}
                            <select onchange={on_day}>
                                { for DayOfWeek::ALL.iter().map(|option| html! {
                                    <option value={option.name()} selected={*option == day}>{ option.name() }</option>
                                })}
                            </select>
                        </label>
                    } else {
                        <label>
                            {"Date"}
                            <input type="date" value={draft.date.clone().unwrap_or_default()} oninput={on_date} />
                        </label>
                        <label>
                            {"Type"}
                            <select onchange={on_type}>
                                { for [EventType::Special, EventType::Regular].iter().map(|option| html! {
                                    <option value={option.as_str()} selected={*option == draft.event_type}>
                                        { option.as_str() }
                                    </option>
                                })}
                            </select>
                        </label>
                    }
                    <label>
                        {"Description"}
                        <textarea value={draft.description.clone()} oninput={on_description} />
                    </label>
                    <label>
                        {"Image URL"}
                        <input type="url" value={draft.image_url.clone().unwrap_or_default()} oninput={on_image} />
                    </label>
                    <div class="modal-footer">
                        <button type="button" class="btn" onclick={close}>{"Cancel"}</button>
                        <button type="submit" class="btn btn-primary">
                            { if props.is_editing { "Save Changes" } else { "Create Event" } }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

fn text_input(
    draft: &UseStateHandle<EventDraft>,
    apply: impl Fn(&mut EventDraft, String) + 'static,
) -> Callback<InputEvent> {
    let draft = draft.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let mut next = (*draft).clone();
        apply(&mut next, input.value());
        draft.set(next);
    })
}

fn select_change(
    draft: &UseStateHandle<EventDraft>,
    apply: impl Fn(&mut EventDraft, String) + 'static,
) -> Callback<Event> {
    let draft = draft.clone();
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let mut next = (*draft).clone();
        apply(&mut next, select.value());
        draft.set(next);
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// One readable line per invalid field, in a stable order.
fn describe_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| match *field {
            "title" => "Title is required (up to 200 characters)".to_string(),
            "time" => "Time is required (up to 50 characters)".to_string(),
            "date" => "Date must look like 2026-12-31".to_string(),
            "description" => "Description is too long".to_string(),
            "image_url" => "Image URL must be a valid URL".to_string(),
            other => format!("{} is invalid", other),
        })
        .collect();
    messages.sort();
    messages
}
