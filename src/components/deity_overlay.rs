use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{MouseEvent, TouchEvent};
use yew::prelude::*;

use crate::config::{GestureConfig, PlacementDefaults};
use crate::model::{DeityPlacement, DeityVisual};
use crate::state::{GestureInput, GestureInterpreter, GestureOutput, MouseDrag, Pointer, Transform};
use crate::util::{now_ms, overlay_transform};

/// Raised when an overlay has been held past the long-press threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct LongPressRequest {
    pub key: String,
    /// Committed scale at the moment the press fired.
    pub scale: f64,
}

#[derive(Properties, PartialEq, Clone)]
pub struct DeityOverlayProps {
    pub placement: DeityPlacement,
    pub visual: &'static DeityVisual,
    pub gesture: GestureConfig,
    pub bounds: PlacementDefaults,
    pub on_commit: Callback<DeityPlacement>,
    pub on_long_press: Callback<LongPressRequest>,
}

fn touch_pointers(e: &TouchEvent) -> Vec<Pointer> {
    let list = e.target_touches();
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| Pointer::new(t.identifier(), t.client_x() as f64, t.client_y() as f64))
        .collect()
}

#[function_component(DeityOverlay)]
pub fn deity_overlay(props: &DeityOverlayProps) -> Html {
    let interpreter = {
        let placement = props.placement.clone();
        let gesture = props.gesture.clone();
        let bounds = props.bounds.clone();
        use_mut_ref(move || GestureInterpreter::new(&placement, gesture, bounds))
    };
    let live = use_state(|| None::<Transform>);
    let mouse = use_mut_ref(MouseDrag::default);
    let run_ref = use_mut_ref(|| None::<Rc<dyn Fn(GestureInput)>>);

    let run: Rc<dyn Fn(GestureInput)> = {
        let interpreter = interpreter.clone();
        let live = live.clone();
        let on_commit = props.on_commit.clone();
        let on_long_press = props.on_long_press.clone();
        Rc::new(move |input: GestureInput| {
            let outputs = interpreter.borrow_mut().handle(input);
            for out in outputs {
                match out {
                    GestureOutput::Live(t) => live.set(Some(t)),
                    GestureOutput::Commit(p) => on_commit.emit(p),
                    GestureOutput::LongPress { key, scale } => {
                        on_long_press.emit(LongPressRequest { key, scale })
                    }
                }
            }
        })
    };
    *run_ref.borrow_mut() = Some(run.clone());

    // Effect: follow the store's committed placement
    {
        let interpreter = interpreter.clone();
        let live = live.clone();
        use_effect_with(props.placement.clone(), move |placement| {
            let mut g = interpreter.borrow_mut();
            g.sync_committed(placement);
            if !g.is_panning() && !g.is_pinching() {
                live.set(None);
            }
            || ()
        });
    }
    // Effect: long-press timer
    {
        let run_ref = run_ref.clone();
        let tick_ms = props.gesture.tick_ms;
        use_effect_with((), move |_| {
            let tick = Closure::wrap(Box::new(move || {
                let f = run_ref.borrow().clone();
                if let Some(f) = f {
                    f(GestureInput::Tick { at_ms: now_ms() });
                }
            }) as Box<dyn FnMut()>);
            let handle = web_sys::window().and_then(|win| {
                win.set_interval_with_callback_and_timeout_and_arguments_0(
                    tick.as_ref().unchecked_ref(),
                    tick_ms,
                )
                .ok()
                .map(|id| (win, id))
            });
            move || {
                if let Some((win, id)) = handle {
                    win.clear_interval_with_handle(id);
                }
                drop(tick);
            }
        });
    }

    // Effect: mouse move/up on window so a fast drag survives leaving the overlay
    {
        let run_ref = run_ref.clone();
        let mouse = mouse.clone();
        use_effect_with((), move |_| {
            let mousemove_cb = {
                let run_ref = run_ref.clone();
                let mouse = mouse.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let input = mouse
                        .borrow()
                        .moved(now_ms(), e.client_x() as f64, e.client_y() as f64);
                    let f = run_ref.borrow().clone();
                    if let (Some(input), Some(f)) = (input, f) {
                        f(input);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let mouseup_cb = Closure::wrap(Box::new(move |_e: MouseEvent| {
                let input = mouse.borrow_mut().release(now_ms());
                let f = run_ref.borrow().clone();
                if let (Some(input), Some(f)) = (input, f) {
                    f(input);
                }
            }) as Box<dyn FnMut(_)>);
            let window = web_sys::window();
            if let Some(win) = &window {
                let _ = win.add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = win
                    .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref());
            }
            move || {
                if let Some(win) = window {
                    let _ = win.remove_event_listener_with_callback(
                        "mousemove",
                        mousemove_cb.as_ref().unchecked_ref(),
                    );
                    let _ = win.remove_event_listener_with_callback(
                        "mouseup",
                        mouseup_cb.as_ref().unchecked_ref(),
                    );
                }
                drop(mousemove_cb);
                drop(mouseup_cb);
            }
        });
    }

    let ontouchstart = {
        let run = run.clone();
        Callback::from(move |e: TouchEvent| {
            e.prevent_default();
            run(GestureInput::Touches {
                at_ms: now_ms(),
                pointers: touch_pointers(&e),
            });
        })
    };
    // start, move and end all report the remaining contacts
    let ontouchmove = ontouchstart.clone();
    let ontouchend = ontouchstart.clone();
    let ontouchcancel = {
        let run = run.clone();
        Callback::from(move |_e: TouchEvent| run(GestureInput::Cancel))
    };
    let onmousedown = {
        let run = run.clone();
        let mouse = mouse.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let input = mouse
                .borrow_mut()
                .press(now_ms(), e.client_x() as f64, e.client_y() as f64);
            run(input);
        })
    };

    let t = (*live).unwrap_or_else(|| Transform::from(&props.placement));
    let style = format!(
        "position:absolute; left:50%; top:50%; font-size:24px; line-height:1; touch-action:none; user-select:none; cursor:grab; {}",
        overlay_transform(t.x, t.y, t.scale)
    );
    html! {
        <div class="deity-overlay" title={props.visual.name} {style}
            {ontouchstart} {ontouchmove} {ontouchend} {ontouchcancel}
            {onmousedown}>
            { props.visual.emoji }
        </div>
    }
}
