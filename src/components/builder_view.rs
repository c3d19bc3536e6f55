use yew::prelude::*;

use crate::catalog::{self, DEITIES, GRADIENTS, TEMPLE_STYLES};
use crate::state::{SessionAction, TempleSession};

#[derive(Properties, PartialEq, Clone)]
pub struct BuilderViewProps {
    pub session: UseReducerHandle<TempleSession>,
    pub to_preview: Callback<()>,
}

#[function_component(BuilderView)]
pub fn builder_view(props: &BuilderViewProps) -> Html {
    let session = &props.session;
    let selection = session.selection();

    let deity_buttons = DEITIES.iter().map(|d| {
        let onclick = {
            let session = session.clone();
            let key = d.key.to_string();
            Callback::from(move |_| session.dispatch(SessionAction::ToggleDeity(key.clone())))
        };
        let (border, badge) = match selection.index_of(d.key) {
            Some(i) => ("#d4af37", html! { <span style="font-size:11px; opacity:0.8;">{ format!("#{}", i + 1) }</span> }),
            None => ("#30363d", html! {}),
        };
        html! {
            <button {onclick} style={format!("display:flex; flex-direction:column; align-items:center; gap:4px; padding:10px; min-width:84px; border:2px solid {}; border-radius:10px;", border)}>
                <span style="font-size:28px;">{ d.emoji }</span>
                <span>{ d.name }</span>
                { badge }
            </button>
        }
    });

    let style_buttons = TEMPLE_STYLES.iter().map(|s| {
        let onclick = {
            let session = session.clone();
            let key = s.key.to_string();
            Callback::from(move |_| session.dispatch(SessionAction::SetStyle(key.clone())))
        };
        let active = session.temple.selected_style == s.key;
        html! {
            <button {onclick} style={format!("padding:6px 12px; {}", if active { "background:#d4af37; color:#161b22;" } else { "" })}>{ s.name }</button>
        }
    });

    let gradient_buttons = GRADIENTS.iter().map(|(name, stops)| {
        let stops: Vec<String> = stops.iter().map(|c| c.to_string()).collect();
        let active = session.temple.bg_gradient == stops;
        let swatch = catalog::gradient_css(&stops);
        let onclick = {
            let session = session.clone();
            Callback::from(move |_| session.dispatch(SessionAction::SetGradient(stops.clone())))
        };
        html! {
            <button {onclick} title={*name} style={format!("width:44px; height:44px; border-radius:50%; background:{}; border:3px solid {};", swatch, if active { "#d4af37" } else { "#30363d" })}></button>
        }
    });

    let preview_cb = {
        let cb = props.to_preview.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div style="padding:16px; display:flex; flex-direction:column; gap:18px; max-width:720px; margin:0 auto;">
            <h2 style="margin:0; color:#d4af37;">{"Build Your Temple"}</h2>
            <section>
                <h3 style="margin:0 0 8px 0; font-size:16px;">{"Deities"}</h3>
                <div style="display:flex; flex-wrap:wrap; gap:8px;">{ for deity_buttons }</div>
            </section>
            <section>
                <h3 style="margin:0 0 8px 0; font-size:16px;">{"Temple Style"}</h3>
                <div style="display:flex; gap:8px;">{ for style_buttons }</div>
            </section>
            <section>
                <h3 style="margin:0 0 8px 0; font-size:16px;">{"Background"}</h3>
                <div style="display:flex; gap:10px;">{ for gradient_buttons }</div>
            </section>
            <button onclick={preview_cb} disabled={selection.is_empty()} style="padding:10px; font-size:16px;">
                { format!("View Temple ({} deities)", selection.len()) }
            </button>
        </div>
    }
}
