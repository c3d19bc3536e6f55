use std::rc::Rc;

use tracing::debug;
use yew::prelude::*;

use super::deity_overlay::{DeityOverlay, LongPressRequest};
use super::scale_menu::ScaleMenu;
use crate::catalog;
use crate::config::AppConfig;
use crate::model::DeityVisual;
use crate::state::{SessionAction, TempleSession};

const UNKNOWN_DEITY: DeityVisual = DeityVisual {
    key: "unknown",
    name: "Deity",
    emoji: "🕉️",
};

#[derive(Properties, PartialEq, Clone)]
pub struct TemplePreviewProps {
    pub session: UseReducerHandle<TempleSession>,
    pub config: Rc<AppConfig>,
    pub to_builder: Callback<()>,
}

#[function_component(TemplePreview)]
pub fn temple_preview(props: &TemplePreviewProps) -> Html {
    // Deity whose scale menu is open
    let menu_key = use_state(|| None::<String>);
    let session = &props.session;

    let on_commit = {
        let session = session.clone();
        Callback::from(move |p| session.dispatch(SessionAction::Commit(p)))
    };
    let on_long_press = {
        let menu_key = menu_key.clone();
        Callback::from(move |req: LongPressRequest| {
            debug!("scale menu for {} at {}", req.key, req.scale);
            menu_key.set(Some(req.key));
        })
    };
    let reset_layout = {
        let session = session.clone();
        Callback::from(move |_| session.dispatch(SessionAction::ResetLayout))
    };
    let back = {
        let cb = props.to_builder.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let overlays = session.placements.map().iter().map(|placement| {
        let visual = catalog::deity(&placement.key).unwrap_or(&UNKNOWN_DEITY);
        html! {
            <DeityOverlay
                key={placement.key.clone()}
                placement={placement.clone()}
                {visual}
                gesture={props.config.gesture.clone()}
                bounds={props.config.placement.clone()}
                on_commit={on_commit.clone()}
                on_long_press={on_long_press.clone()}
            />
        }
    });

    // The menu closes itself if its deity was removed meanwhile.
    let menu = (*menu_key)
        .as_ref()
        .and_then(|key| session.placements.get(key))
        .map(|placement| {
            let key = placement.key.clone();
            let name = catalog::deity(&key).map_or(UNKNOWN_DEITY.name, |d| d.name);
            let on_set_scale = {
                let session = session.clone();
                Callback::from(move |scale: f64| {
                    session.dispatch(SessionAction::SetScale {
                        key: key.clone(),
                        scale,
                    })
                })
            };
            let on_close = {
                let menu_key = menu_key.clone();
                Callback::from(move |_| menu_key.set(None))
            };
            html! {
                <ScaleMenu
                    deity_name={name}
                    scale={placement.scale}
                    bounds={props.config.placement.clone()}
                    {on_set_scale}
                    {on_close}
                />
            }
        });

    let style = catalog::style(&session.temple.selected_style);
    let background = catalog::gradient_css(&session.temple.bg_gradient);
    let hold_secs = props.config.gesture.long_press_ms / 1000.0;

    html! {
        <div style={format!("position:relative; width:100vw; height:100vh; overflow:hidden; background:{};", background)}>
            <img src={style.image} alt={style.name}
                style="position:absolute; left:50%; bottom:0; transform:translateX(-50%); max-height:80vh; pointer-events:none; user-select:none;" />
            <div style="position:absolute; left:50%; top:55%; width:0; height:0;">
                { for overlays }
            </div>
            <div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:8px;">
                <button onclick={reset_layout}>{"Reset Layout"}</button>
                <button onclick={back}>{"Back to Builder"}</button>
            </div>
            <div style="position:absolute; left:12px; bottom:12px; font-size:12px; opacity:0.75; background:rgba(22,27,34,0.8); padding:6px 10px; border-radius:6px;">
                { format!("Drag to move · pinch to resize · hold {:.0}s for the size menu", hold_secs) }
            </div>
            { for menu }
        </div>
    }
}
