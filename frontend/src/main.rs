mod components;
mod config;
mod hooks;
mod services;

use std::rc::Rc;

use yew::prelude::*;

use crate::components::events::Events;
use crate::components::toast::ToastProvider;
use crate::config::FrontendConfig;
use crate::services::session::{load_session, CurrentUser};
use crate::services::{AppServices, Services};

#[function_component(App)]
fn app() -> Html {
    let services = use_memo((), |_| {
        let config = FrontendConfig::from_build_env();
        tracing::info!("Using events database at {}", config.database_url);
        Services::new(&config)
    });
    let session = use_memo((), |_| load_session());

    html! {
        <ContextProvider<AppServices> context={AppServices(Rc::clone(&services))}>
            <ContextProvider<Option<CurrentUser>> context={(*session).clone()}>
                <ToastProvider>
                    <div id="app">
                        <Events />
                    </div>
                </ToastProvider>
            </ContextProvider<Option<CurrentUser>>>
        </ContextProvider<AppServices>>
    }
}

fn main() {
    // Initialize tracing
    tracing_wasm::set_as_global_default();

    yew::Renderer::<App>::new().render();
}
