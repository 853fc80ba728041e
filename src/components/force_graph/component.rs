//! Leptos component wrapping the family graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel
//! event handlers for node dragging, panning, zooming, hover tooltips, and
//! click-through navigation to a relative's detail page. An animation loop
//! runs via `requestAnimationFrame`, advancing the simulation and renderer
//! each frame until the component unmounts.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::family::FamilyGraph;

use super::render;
use super::scale::ScaleConfig;
use super::state::GraphState;
use super::theme::Theme;

/// Pointer travel (screen px) below which a press-release counts as a click.
const CLICK_DRAG_TOLERANCE: f64 = 4.0;

const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;

/// Hover tooltip payload, positioned in screen pixels over the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipInfo {
	pub x: f64,
	pub y: f64,
	pub name: String,
	pub lifespan: String,
	pub bio: Option<String>,
}

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: GraphState,
	scale: ScaleConfig,
	theme: Theme,
}

/// Renders an interactive family graph on a canvas element.
///
/// Pass the built graph via the `data` signal; the component reads it once
/// on mount, so recreate the component to show a different person. It sizes
/// itself to its parent container by default; set `fullscreen = true` to
/// fill the viewport and resize automatically with the window. Explicit
/// `width`/`height` override automatic sizing.
///
/// Clicking a node navigates to that person's detail page. Dragging pins a
/// node while held and releases it back to the simulation afterwards.
#[component]
pub fn FamilyGraphCanvas(
	#[prop(into)] data: Signal<FamilyGraph>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (tooltip, set_tooltip) = signal(None::<TooltipInfo>);
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Cleared on unmount so the next animation frame stops the loop instead
	// of ticking a dead component. Atomic because `on_cleanup` requires a
	// `Send + Sync` closure, which rules out capturing an `Rc` there.
	let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
	let (context_init, animate_init, resize_cb_init, running_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		running.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (mut w, mut h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(FALLBACK_WIDTH)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(FALLBACK_HEIGHT)
				}),
			)
		};
		// A hidden or not-yet-laid-out container reports zero; a degenerate
		// viewport would put every node on one point.
		if w <= 0.0 {
			warn!("graph surface has no width; using {FALLBACK_WIDTH}px");
			w = FALLBACK_WIDTH;
		}
		if h <= 0.0 {
			warn!("graph surface has no height; using {FALLBACK_HEIGHT}px");
			h = FALLBACK_HEIGHT;
		}
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let theme = Theme::default();
		*context_init.borrow_mut() = Some(GraphContext {
			state: GraphState::new(&data.get_untracked(), w, h, &theme),
			scale: ScaleConfig::default(),
			theme,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, resize_anim, running_anim) = (
			context_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			running_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !running_anim.load(Ordering::Relaxed) {
				// Unmounted: detach the resize hook here, where the closure
				// handle is still reachable, and let the loop end.
				if let (Some(window), Some(cb)) = (web_sys::window(), resize_anim.borrow().as_ref()) {
					let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Listener removal happens on the next animation frame; only the flag
	// flip lives here so the closure stays `Send + Sync`.
	let running_cleanup = running.clone();
	on_cleanup(move || {
		running_cleanup.store(false, Ordering::Relaxed);
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				c.state.begin_drag(idx, x, y);
			} else {
				c.state.begin_pan(x, y);
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active {
				c.state.drag_to(x, y);
				set_tooltip.set(None);
			} else if c.state.pan.active {
				c.state.pan_to(x, y);
				set_tooltip.set(None);
			} else {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				c.state.set_hover(hovered);
				match hovered.and_then(|idx| c.state.node_visual(idx)) {
					Some(visual) => set_tooltip.set(Some(TooltipInfo {
						x: x + 14.0,
						y: y + 12.0,
						name: visual.name,
						lifespan: visual.lifespan,
						bio: visual.bio,
					})),
					None => set_tooltip.set(None),
				}
			}
		}
	};

	let context_mu = context.clone();
	let navigate = use_navigate();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		// Resolve the click target inside the borrow, navigate after
		// releasing it: navigation unmounts this component.
		let mut clicked = None;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active {
				if let Some(idx) = c.state.drag.node_idx {
					let travel = ((x - c.state.drag.start_x).powi(2) + (y - c.state.drag.start_y).powi(2)).sqrt();
					c.state.release(idx);
					if travel < CLICK_DRAG_TOLERANCE {
						clicked = c.state.node_visual(idx).map(|visual| visual.id);
					}
				}
			}
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
		}
		if let Some(id) = clicked {
			navigate(&format!("/details/{id}"), NavigateOptions::default());
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let Some(idx) = c.state.drag.node_idx {
				c.state.release(idx);
			}
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
			c.state.set_hover(None);
		}
		set_tooltip.set(None);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<div class="graph-wrap" class:fullscreen=fullscreen>
			<canvas
				node_ref=canvas_ref
				class="family-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-hint">
				"Drag nodes to rearrange. Scroll to zoom, drag the background to pan. Click a person to open their page."
			</div>
			{move || {
				tooltip.get().map(|tip| {
					view! {
						<div
							class="graph-tooltip"
							style=format!("left: {}px; top: {}px;", tip.x, tip.y)
						>
							<div class="tooltip-name">{tip.name}</div>
							<div class="tooltip-years">{tip.lifespan}</div>
							{tip.bio.map(|bio| view! { <div class="tooltip-bio">{bio}</div> })}
						</div>
					}
				})
			}}
		</div>
	}
}
