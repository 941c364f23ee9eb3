use hashbrown::HashMap;
use js_sys::{Function, Reflect};
use log::debug;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use rangeline_core::{
    HandleHint, IdAllocator, InstanceId, KeyDirection, LabelSlot, Measure, PartialConfig,
    PointerCapture, PointerOrigin, Slider, SliderBuilder, SliderError, SliderEventKind, TickToken,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn slider_err(e: SliderError) -> JsError {
    JsError::new(&format!("{} error: {e}", e.category()))
}

fn lookup_fn(obj: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

fn parse_config(config: JsValue) -> Result<PartialConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(PartialConfig::default());
    }
    swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))
}

/// Measurements answered by a JS object:
/// `{ track_width(), handle_width(), label_width?(slot, text) }`.
struct JsMeasure {
    scope: JsValue,
    track: Function,
    handle: Function,
    label: Option<Function>,
}

impl JsMeasure {
    fn from_js(obj: JsValue) -> Result<Self, SliderError> {
        let required = |name: &str| {
            lookup_fn(&obj, name).ok_or_else(|| SliderError::MissingRenderTarget {
                name: name.to_string(),
            })
        };
        let track = required("track_width")?;
        let handle = required("handle_width")?;
        let label = lookup_fn(&obj, "label_width");
        Ok(Self {
            scope: obj,
            track,
            handle,
            label,
        })
    }

    fn number(result: Result<JsValue, JsValue>) -> f64 {
        result
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }
}

impl Measure for JsMeasure {
    fn track_width(&self) -> f64 {
        Self::number(self.track.call0(&self.scope))
    }

    fn handle_width(&self) -> f64 {
        Self::number(self.handle.call0(&self.scope))
    }

    fn label_width(&self, slot: LabelSlot, text: &str) -> f64 {
        let Some(f) = &self.label else {
            return 0.0;
        };
        let slot = swb::to_value(&slot).unwrap_or(JsValue::UNDEFINED);
        Self::number(f.call2(&self.scope, &slot, &JsValue::from_str(text)))
    }
}

const CALLBACKS: [(&str, SliderEventKind); 4] = [
    ("on_start", SliderEventKind::Start),
    ("on_change", SliderEventKind::Change),
    ("on_finish", SliderEventKind::Finish),
    ("on_update", SliderEventKind::Update),
];

/// Attach `on_*` callbacks and `prettify` from a JS object. Callbacks run with
/// that object as `this`.
fn with_callbacks(mut builder: SliderBuilder, callbacks: &JsValue) -> SliderBuilder {
    if jsvalue_is_undefined_or_null(callbacks) {
        return builder;
    }
    for (name, kind) in CALLBACKS {
        if let Some(f) = lookup_fn(callbacks, name) {
            let scope = callbacks.clone();
            builder = builder.on(kind, move |event| {
                let payload = match swb::to_value(event) {
                    Ok(v) => v,
                    Err(e) => {
                        debug!("dropping {:?} event: {e}", event.kind);
                        return;
                    }
                };
                if let Err(err) = f.call1(&scope, &payload) {
                    debug!("{:?} callback threw: {:?}", event.kind, err);
                }
            });
        }
    }
    if let Some(f) = lookup_fn(callbacks, "prettify") {
        let scope = callbacks.clone();
        builder = builder.prettify(move |n| {
            f.call1(&scope, &JsValue::from_f64(n))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| n.to_string())
        });
    }
    builder
}

/// Every slider on a page behind one handle, with pointer capture so
/// document-level move/up events reach the instance that started the drag.
#[wasm_bindgen]
pub struct SliderHost {
    ids: IdAllocator,
    sliders: HashMap<u32, Slider<JsMeasure>>,
    capture: PointerCapture,
}

impl Default for SliderHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SliderHost {
    fn slider(&mut self, id: u32) -> Result<&mut Slider<JsMeasure>, JsError> {
        self.sliders
            .get_mut(&id)
            .ok_or_else(|| JsError::new(&format!("unknown slider {id}")))
    }

    fn captured(&mut self) -> Option<&mut Slider<JsMeasure>> {
        let owner = self.capture.owner()?;
        self.sliders.get_mut(&owner.0)
    }
}

#[wasm_bindgen]
impl SliderHost {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SliderHost {
        console_error_panic_hook::set_once();
        SliderHost {
            ids: IdAllocator::new(),
            sliders: HashMap::new(),
            capture: PointerCapture::new(),
        }
    }

    /// Create a slider. `measure` must provide `track_width()` and
    /// `handle_width()`; `callbacks` may carry `on_start`, `on_change`,
    /// `on_finish`, `on_update` and `prettify`. Returns the instance id.
    #[wasm_bindgen]
    pub fn create(
        &mut self,
        config: JsValue,
        measure: JsValue,
        callbacks: JsValue,
    ) -> Result<u32, JsError> {
        let partial = parse_config(config)?;
        let measure = JsMeasure::from_js(measure).map_err(slider_err)?;
        let builder = with_callbacks(SliderBuilder::new(partial), &callbacks);
        let id = self.ids.alloc();
        let slider = builder.build(id, measure).map_err(slider_err)?;
        self.sliders.insert(id.0, slider);
        Ok(id.0)
    }

    #[wasm_bindgen]
    pub fn update(&mut self, id: u32, config: JsValue) -> Result<(), JsError> {
        let partial = parse_config(config)?;
        self.slider(id)?.update(&partial).map_err(slider_err)
    }

    #[wasm_bindgen]
    pub fn reset(&mut self, id: u32) -> Result<(), JsError> {
        self.slider(id)?.reset().map_err(slider_err)
    }

    /// Destroy and forget the instance. Unknown ids are ignored.
    #[wasm_bindgen]
    pub fn destroy(&mut self, id: u32) {
        if let Some(mut slider) = self.sliders.remove(&id) {
            slider.destroy();
        }
        self.capture.forget(InstanceId(id));
    }

    /// `hint` is `"single"`, `"from"`, `"to"`, `"both"` or null for a press on
    /// the bare track.
    #[wasm_bindgen(js_name = pointer_down)]
    pub fn pointer_down(&mut self, id: u32, hint: JsValue, x: f64) -> Result<(), JsError> {
        let hint: Option<HandleHint> = if jsvalue_is_undefined_or_null(&hint) {
            None
        } else {
            Some(swb::from_value(hint).map_err(|e| JsError::new(&format!("hint error: {e}")))?)
        };
        self.slider(id)?.on_pointer_down(hint, x).map_err(slider_err)?;
        self.capture.claim(InstanceId(id));
        Ok(())
    }

    /// Document-level move; routed to the captured instance.
    #[wasm_bindgen(js_name = pointer_move)]
    pub fn pointer_move(&mut self, x: f64) -> Result<(), JsError> {
        match self.captured() {
            Some(slider) => slider.on_pointer_move(x).map_err(slider_err),
            None => Ok(()),
        }
    }

    /// Document-level release. `inside` tells whether the pointer was over
    /// the slider when it came up.
    #[wasm_bindgen(js_name = pointer_up)]
    pub fn pointer_up(&mut self, inside: bool) -> Result<(), JsError> {
        let Some(owner) = self.capture.release() else {
            return Ok(());
        };
        let origin = if inside {
            PointerOrigin::Inside
        } else {
            PointerOrigin::Outside
        };
        match self.sliders.get_mut(&owner.0) {
            Some(slider) => slider.on_pointer_up(origin).map_err(slider_err),
            None => Ok(()),
        }
    }

    #[wasm_bindgen(js_name = track_click)]
    pub fn track_click(&mut self, id: u32, x: f64) -> Result<(), JsError> {
        self.slider(id)?.on_track_click(x).map_err(slider_err)
    }

    #[wasm_bindgen(js_name = bar_click)]
    pub fn bar_click(&mut self, id: u32, x: f64) -> Result<(), JsError> {
        self.slider(id)?.on_bar_click(x).map_err(slider_err)
    }

    /// Keyboard event by `KeyboardEvent.key`. `modified` is set when Alt,
    /// Ctrl, Shift or Meta was held; such keys are left to the page. Returns
    /// whether the slider consumed the key.
    #[wasm_bindgen]
    pub fn key(&mut self, id: u32, key: String, modified: bool) -> Result<bool, JsError> {
        if modified {
            return Ok(false);
        }
        let Some(dir) = KeyDirection::from_key(&key) else {
            return Ok(false);
        };
        self.slider(id)?.on_key_step(dir).map_err(slider_err)
    }

    #[wasm_bindgen]
    pub fn focus(&mut self, id: u32) -> Result<(), JsError> {
        self.slider(id)?.on_focus_without_target().map_err(slider_err)
    }

    /// Deliver a token from `scheduled()`. Stale tokens return false.
    #[wasm_bindgen]
    pub fn tick(&mut self, id: u32, token: JsValue) -> Result<bool, JsError> {
        let token: TickToken =
            swb::from_value(token).map_err(|e| JsError::new(&format!("token error: {e}")))?;
        self.slider(id)?.tick(token).map_err(slider_err)
    }

    /// `{ token, kind }` for the next callback the instance wants, or null.
    #[wasm_bindgen]
    pub fn scheduled(&mut self, id: u32) -> Result<JsValue, JsError> {
        match self.slider(id)?.scheduled() {
            Some(req) => {
                swb::to_value(&req).map_err(|e| JsError::new(&format!("schedule error: {e}")))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Latest render snapshot, or null before the track is laid out.
    #[wasm_bindgen]
    pub fn snapshot(&mut self, id: u32) -> Result<JsValue, JsError> {
        match self.slider(id)?.render_snapshot() {
            Some(s) => swb::to_value(s).map_err(|e| JsError::new(&format!("snapshot error: {e}"))),
            None => Ok(JsValue::NULL),
        }
    }

    /// Current result payload (the same shape callbacks receive as `data`).
    #[wasm_bindgen]
    pub fn result(&mut self, id: u32) -> Result<JsValue, JsError> {
        let data = self.slider(id)?.data();
        swb::to_value(data).map_err(|e| JsError::new(&format!("result error: {e}")))
    }

    /// Decorated text for a domain value. With a value list, `value` is an
    /// index and out-of-range indices are an error.
    #[wasm_bindgen(js_name = formatted_value)]
    pub fn formatted_value(&mut self, id: u32, value: f64) -> Result<String, JsError> {
        self.slider(id)?.formatted_value(value).map_err(slider_err)
    }

    #[wasm_bindgen(js_name = instance_count)]
    pub fn instance_count(&self) -> usize {
        self.sliders.len()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
