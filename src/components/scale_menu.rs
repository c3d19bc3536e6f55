use yew::prelude::*;

use crate::config::PlacementDefaults;
use crate::model::ScaleStep;
use crate::util::format_scale;

#[derive(Properties, PartialEq, Clone)]
pub struct ScaleMenuProps {
    pub deity_name: AttrValue,
    /// Scale currently committed for the deity.
    pub scale: f64,
    pub bounds: PlacementDefaults,
    pub on_set_scale: Callback<f64>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn ScaleMenu(props: &ScaleMenuProps) -> Html {
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let reset_cb = {
        let cb = props.on_set_scale.clone();
        let scale = props.bounds.scale;
        Callback::from(move |_| cb.emit(scale))
    };
    let steps = ScaleStep::ALL.iter().map(|&step| {
        let next = step.apply(props.scale, &props.bounds);
        let cb = props.on_set_scale.clone();
        let onclick = Callback::from(move |_| cb.emit(next));
        let disabled = next == props.scale;
        html! { <button {onclick} {disabled} style="flex:1; padding:8px 0;">{ step.label() }</button> }
    });

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:300px; max-width:420px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{ format!("Resize {}", props.deity_name) }</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="font-size:28px; font-weight:600; text-align:center; font-variant-numeric:tabular-nums;">{ format_scale(props.scale) }</div>
            <div style="display:flex; gap:8px;">{ for steps }</div>
            <div style="display:flex; gap:8px; flex-wrap:wrap;">
                <button onclick={reset_cb} style="flex:1;">{ format!("Reset to {}", format_scale(props.bounds.scale)) }</button>
                <button onclick={close_cb} style="flex:0 0 auto;">{"Done"}</button>
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{ format!("Size stays between {} and {}.", format_scale(props.bounds.min_scale), format_scale(props.bounds.max_scale)) }</div>
        </div>
    </div>}
}
