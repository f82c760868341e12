use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use crate::services::js_error_message;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InViewOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Stop observing after the first time the element is seen.
    pub trigger_once: bool,
}

impl Default for InViewOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            trigger_once: true,
        }
    }
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Whether `node` is (or, with `trigger_once`, has been) in the viewport.
#[hook]
pub fn use_in_view(node: NodeRef, options: InViewOptions) -> bool {
    let in_view = use_state_eq(|| false);

    {
        let setter = in_view.setter();

        use_effect_with((node, options), move |(node, options)| {
            let observer = node
                .cast::<Element>()
                .and_then(|element| observe(&element, *options, setter));

            move || {
                if let Some((observer, _callback)) = observer {
                    observer.disconnect();
                }
            }
        });
    }

    *in_view
}

/// An entry only counts once the visible fraction reaches the threshold;
/// the first callback reports any overlap as intersecting.
fn meets_threshold(is_intersecting: bool, ratio: f64, threshold: f64) -> bool {
    is_intersecting && ratio >= threshold
}

fn observe(
    element: &Element,
    options: InViewOptions,
    setter: UseStateSetter<bool>,
) -> Option<(IntersectionObserver, ObserverCallback)> {
    let callback = ObserverCallback::new(move |entries: Array, observer: IntersectionObserver| {
        let visible = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .any(|entry| {
                meets_threshold(
                    entry.is_intersecting(),
                    entry.intersection_ratio(),
                    options.threshold,
                )
            });

        if visible {
            setter.set(true);
            if options.trigger_once {
                observer.disconnect();
            }
        } else if !options.trigger_once {
            setter.set(false);
        }
    });

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            observer.observe(element);
            Some((observer, callback))
        }
        Err(e) => {
            tracing::error!("Failed to create IntersectionObserver: {}", js_error_message(&e));
            None
        }
    }
}
