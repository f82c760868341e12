use events_shared::{Event, ImageCache, ImageLoader};
use yew::prelude::*;

use crate::components::toast::use_toast;
use crate::hooks::{use_in_view, InViewOptions};
use crate::services::use_services;

#[derive(Properties, PartialEq)]
pub struct EventCardProps {
    pub event: Event,
    #[prop_or_default]
    pub on_edit: Option<Callback<()>>,
    #[prop_or_default]
    pub is_admin: bool,
}

#[function_component(EventCard)]
pub fn event_card(props: &EventCardProps) -> Html {
    let services = use_services();
    let toast = use_toast();
    let node = use_node_ref();
    let in_view = use_in_view(node.clone(), InViewOptions::default());
    let image_loaded = use_state_eq(|| false);

    // Resolve the image the first time the card scrolls into view
    {
        let image_loaded = image_loaded.clone();
        let url = props.event.image().map(str::to_string);

        use_effect_with((in_view, url), move |(in_view, url)| {
            match image_step(&services.images, *in_view, url.as_deref()) {
                ImageStep::Show => image_loaded.set(true),
                ImageStep::Preload(url) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        match services.images.preload_image(&url).await {
                            Ok(()) => image_loaded.set(true),
                            Err(e) => tracing::error!("Failed to load event image: {}", e),
                        }
                    });
                }
                ImageStep::Wait => {}
            }
            || ()
        });
    }

    let add_to_calendar = Callback::from(move |_: MouseEvent| {
        toast.success("Event added to calendar!");
    });

    let event = &props.event;

    html! {
        <div ref={node} class={card_class(in_view)}>
            <div class="event-card-media">
                if *image_loaded {
                    <img
                        src={event.image().unwrap_or_default().to_string()}
                        alt={event.title.clone()}
                        class="event-card-image"
                    />
                } else {
                    <div class="event-card-placeholder pulse" />
                }
                if props.is_admin {
                    if let Some(on_edit) = props.on_edit.clone() {
                        <button
                            class="event-card-edit"
                            title="Edit event"
                            onclick={Callback::from(move |_: MouseEvent| on_edit.emit(()))}
                        >
                            {"Edit"}
                        </button>
                    }
                }
            </div>
            <div class="event-card-body">
                <h3 class="event-card-title">{ &event.title }</h3>
                <div class="event-card-when">
                    <span class="event-card-time">{ &event.time }</span>
                    if let Some(date) = &event.date {
                        <span class="event-card-date">{ format!("| {}", date) }</span>
                    }
                </div>
                <p class="event-card-description">{ &event.description }</p>
                <button class="btn btn-primary event-card-calendar" onclick={add_to_calendar}>
                    {"Add to Calendar"}
                </button>
            </div>
        </div>
    }
}

#[derive(Debug, PartialEq)]
enum ImageStep {
    /// Already fetched, render it now.
    Show,
    Preload(String),
    /// Off screen or no image.
    Wait,
}

fn image_step<L: ImageLoader>(
    images: &ImageCache<L>,
    in_view: bool,
    url: Option<&str>,
) -> ImageStep {
    match url {
        Some(url) if in_view => {
            if images.has_image(url) {
                ImageStep::Show
            } else {
                ImageStep::Preload(url.to_string())
            }
        }
        _ => ImageStep::Wait,
    }
}

/// Entrance transition: cards slide up and fade in once seen.
fn card_class(in_view: bool) -> &'static str {
    if in_view {
        "event-card event-card-visible"
    } else {
        "event-card event-card-hidden"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use events_shared::ImageError;

    #[derive(Default)]
    struct CountingLoader {
        loads: Cell<usize>,
    }

    impl ImageLoader for CountingLoader {
        async fn load(&self, _url: &str) -> Result<(), ImageError> {
            self.loads.set(self.loads.get() + 1);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cached_image_shows_without_new_request() {
        let images = ImageCache::new(CountingLoader::default());
        images
            .preload_image("https://cdn.example.com/mic.jpg")
            .await
            .unwrap();
        assert_eq!(images.loader().loads.get(), 1);

        assert_eq!(
            image_step(&images, true, Some("https://cdn.example.com/mic.jpg")),
            ImageStep::Show
        );
        assert_eq!(images.loader().loads.get(), 1);
    }

    #[test]
    fn test_unknown_image_is_preloaded_once_in_view() {
        let images = ImageCache::new(CountingLoader::default());

        assert_eq!(
            image_step(&images, true, Some("https://cdn.example.com/new.jpg")),
            ImageStep::Preload("https://cdn.example.com/new.jpg".to_string())
        );
        assert_eq!(
            image_step(&images, false, Some("https://cdn.example.com/new.jpg")),
            ImageStep::Wait
        );
        assert_eq!(image_step(&images, true, None), ImageStep::Wait);
        assert_eq!(images.loader().loads.get(), 0);
    }

    #[test]
    fn test_card_class_follows_visibility() {
        assert_eq!(card_class(false), "event-card event-card-hidden");
        assert_eq!(card_class(true), "event-card event-card-visible");
    }
}
