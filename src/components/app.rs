use std::rc::Rc;

use super::{builder_view::BuilderView, temple_preview::TemplePreview};
use crate::config::AppConfig;
use crate::persist::SharedStorage;
use crate::state::{SessionAction, TempleSession};
use yew::prelude::*;

#[derive(PartialEq, Clone)]
enum View {
    Builder,
    Preview,
}

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
    pub storage: SharedStorage,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let view = use_state(|| View::Builder);
    let session = {
        let storage = props.storage.0.clone();
        let config = props.config.clone();
        use_reducer(move || TempleSession::new(storage, &config))
    };

    // Load persisted temple
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            session.dispatch(SessionAction::Restore);
            || ()
        });
    }

    if !session.loaded {
        return html! {
            <div style="display:flex; align-items:center; justify-content:center; width:100vw; height:100vh; font-size:18px; opacity:0.8;">
                {"🪔 Loading temple…"}
            </div>
        };
    }

    let to_builder = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Builder))
    };
    let to_preview = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Preview))
    };

    match *view {
        View::Builder => html! { <BuilderView session={session.clone()} {to_preview} /> },
        View::Preview => html! { <TemplePreview
            session={session.clone()}
            config={props.config.clone()}
            {to_builder}
        /> },
    }
}
