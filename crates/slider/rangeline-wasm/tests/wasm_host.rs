#![cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Reflect, JSON};
use rangeline_wasm::{abi_version, SliderHost};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn object(src: &str) -> JsValue {
    Function::new_no_args(&format!("return {src};"))
        .call0(&JsValue::NULL)
        .unwrap()
}

fn config(json: &str) -> JsValue {
    JSON::parse(json).unwrap()
}

fn metrics(track: f64) -> JsValue {
    object(&format!(
        "{{ track_width() {{ return {track}; }}, handle_width() {{ return 0; }} }}"
    ))
}

fn recorder() -> JsValue {
    object(
        "{ log: [], \
           on_start(e) { this.log.push('start:' + e.data.from); }, \
           on_change(e) { this.log.push('change:' + e.data.from); }, \
           on_finish(e) { this.log.push('finish:' + e.data.from); }, \
           on_update(e) { this.log.push('update:' + e.data.from); } }",
    )
}

fn log_of(callbacks: &JsValue) -> Vec<String> {
    let log: Array = Reflect::get(callbacks, &"log".into()).unwrap().into();
    log.iter().filter_map(|v| v.as_string()).collect()
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &key.into()).unwrap()
}

fn frame(host: &mut SliderHost, id: u32) {
    let req = host.scheduled(id).unwrap();
    assert!(host.tick(id, get(&req, "token")).unwrap());
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn create_requires_measurements() {
    let mut host = SliderHost::new();
    let missing = object("{ track_width() { return 100; } }");
    assert!(host
        .create(JsValue::UNDEFINED, missing, JsValue::UNDEFINED)
        .is_err());
    assert_eq!(host.instance_count(), 0);
}

#[wasm_bindgen_test]
fn callbacks_run_with_their_scope() {
    let mut host = SliderHost::new();
    let callbacks = recorder();
    let id = host
        .create(
            config(r#"{"min":0,"max":100,"from":40}"#),
            metrics(1000.0),
            callbacks.clone(),
        )
        .unwrap();
    assert!(host.key(id, "ArrowRight".into(), false).unwrap());
    assert!(!host.key(id, "Enter".into(), false).unwrap());
    assert!(!host.key(id, "ArrowRight".into(), true).unwrap());
    assert_eq!(
        log_of(&callbacks),
        vec!["start:40", "change:41", "finish:41"]
    );
}

#[wasm_bindgen_test]
fn pointer_events_follow_capture() {
    let mut host = SliderHost::new();
    let a = host
        .create(
            config(r#"{"min":0,"max":100,"from":10}"#),
            metrics(1000.0),
            JsValue::UNDEFINED,
        )
        .unwrap();
    let callbacks = recorder();
    let b = host
        .create(
            config(r#"{"min":0,"max":100,"from":10}"#),
            metrics(1000.0),
            callbacks.clone(),
        )
        .unwrap();
    assert_ne!(a, b);

    host.pointer_down(b, "single".into(), 100.0).unwrap();
    host.pointer_move(300.0).unwrap();
    frame(&mut host, b);
    host.pointer_up(true).unwrap();
    // A second release has no owner and is ignored.
    host.pointer_up(true).unwrap();

    assert_eq!(get(&host.result(a).unwrap(), "from").as_f64(), Some(10.0));
    assert_eq!(get(&host.result(b).unwrap(), "from").as_f64(), Some(30.0));
    assert_eq!(
        log_of(&callbacks),
        vec!["start:10", "change:30", "finish:30"]
    );
}

#[wasm_bindgen_test]
fn snapshot_waits_for_layout() {
    let mut host = SliderHost::new();
    let id = host
        .create(JsValue::NULL, metrics(0.0), JsValue::UNDEFINED)
        .unwrap();
    assert!(host.snapshot(id).unwrap().is_null());
    let req = host.scheduled(id).unwrap();
    let kind = get(&req, "kind");
    assert_eq!(get(&kind, "kind").as_string().as_deref(), Some("timer"));
    assert_eq!(get(&kind, "delay_ms").as_f64(), Some(300.0));
}

#[wasm_bindgen_test]
fn update_and_destroy() {
    let mut host = SliderHost::new();
    let callbacks = recorder();
    let id = host
        .create(
            config(r#"{"type":"double","min":0,"max":100,"from":20,"to":60,"prefix":"$"}"#),
            metrics(1000.0),
            callbacks.clone(),
        )
        .unwrap();
    host.update(id, config(r#"{"from":35}"#)).unwrap();
    assert_eq!(get(&host.result(id).unwrap(), "from").as_f64(), Some(35.0));
    assert_eq!(host.formatted_value(id, 50.0).unwrap(), "$50");
    assert_eq!(log_of(&callbacks), vec!["start:20", "update:35"]);

    host.destroy(id);
    assert_eq!(host.instance_count(), 0);
    assert!(host.update(id, JsValue::NULL).is_err());
    host.destroy(id);
}

#[wasm_bindgen_test]
fn formatted_value_reports_bad_value_index() {
    let mut host = SliderHost::new();
    let id = host
        .create(
            config(r#"{"values":["S","M","L"]}"#),
            metrics(300.0),
            JsValue::UNDEFINED,
        )
        .unwrap();
    assert_eq!(host.formatted_value(id, 2.0).unwrap(), "L");
    assert!(host.formatted_value(id, 5.0).is_err());
}
