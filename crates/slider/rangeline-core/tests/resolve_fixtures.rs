use rangeline_core::{resolve, Config, Converter, PartialConfig, SliderType};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Expect {
    min: f64,
    max: f64,
    from: f64,
    to: f64,
    step: f64,
}

fn resolve_json(json: &str) -> Config {
    let partial = PartialConfig::from_json(json).expect("fixture config should parse");
    resolve(&Config::unresolved(), &partial, None).expect("fixture config should resolve")
}

#[test]
fn fixtures_resolve_to_expected_values() {
    let keys = rangeline_test_fixtures::resolved::keys();
    assert!(!keys.is_empty());
    for key in keys {
        let json = rangeline_test_fixtures::resolved::config_json(&key).unwrap();
        let expect: Expect = rangeline_test_fixtures::resolved::expect(&key).unwrap();
        let cfg = resolve_json(&json);
        assert_eq!(
            (cfg.min, cfg.max, cfg.from, cfg.to, cfg.step),
            (expect.min, expect.max, expect.from, expect.to, expect.step),
            "fixture {key}"
        );
    }
}

#[test]
fn every_fixture_satisfies_ordering() {
    for key in rangeline_test_fixtures::configs::keys() {
        let json = rangeline_test_fixtures::configs::json(&key).unwrap();
        let cfg = resolve_json(&json);
        assert!(cfg.min <= cfg.from && cfg.from <= cfg.max, "{key}");
        if cfg.slider_type == SliderType::Double {
            assert!(cfg.from <= cfg.to && cfg.to <= cfg.max, "{key}");
        }
    }
}

#[test]
fn ordering_holds_across_arbitrary_inputs() {
    let bounds = [(-100.0, -50.0), (0.0, 10.0), (10.0, 100.0), (5.0, 5.0), (50.0, 0.0)];
    let picks = [-1000.0, -75.0, 0.0, 3.0, 7.5, 60.0, 1000.0];
    for (min, max) in bounds {
        for from in picks {
            for to in picks {
                for interval in [-5.0, 0.0, 4.0, 500.0] {
                    let partial = PartialConfig {
                        slider_type: Some(SliderType::Double),
                        min: Some(min.into()),
                        max: Some(max.into()),
                        from: Some(from.into()),
                        to: Some(to.into()),
                        min_interval: Some(interval.into()),
                        max_interval: Some(interval.into()),
                        ..PartialConfig::default()
                    };
                    let cfg = resolve(&Config::unresolved(), &partial, None).unwrap();
                    let ctx = format!("min={min} max={max} from={from} to={to}");
                    assert!(cfg.min <= cfg.max, "{ctx}");
                    assert!(cfg.min <= cfg.from, "{ctx}");
                    assert!(cfg.from <= cfg.to, "{ctx}");
                    assert!(cfg.to <= cfg.max, "{ctx}");
                    assert!(cfg.min_interval <= cfg.max - cfg.min, "{ctx}");
                    assert!(cfg.max_interval <= cfg.max - cfg.min, "{ctx}");
                }
            }
        }
    }
}

#[test]
fn single_default_scenario() {
    let cfg = resolve_json(&rangeline_test_fixtures::configs::json("single-default").unwrap());
    let conv = Converter::new(&cfg);
    assert_eq!(cfg.from, 10.0);
    assert_eq!(conv.to_value(conv.to_percent(10.0, false).unwrap()), 10.0);
    assert_eq!(conv.to_value(100.0), 100.0);
    assert_eq!(conv.to_value(0.0), 10.0);
}

#[test]
fn decimal_grid_round_trips() {
    let cfg = resolve_json(&rangeline_test_fixtures::configs::json("decimal-steps").unwrap());
    let conv = Converter::new(&cfg);
    for k in 0..=20 {
        let v = rangeline_core::to_fixed(-1.0 + k as f64 * 0.1, 1);
        let p = conv.to_percent(v, false).unwrap();
        assert_eq!(conv.to_value(p), v, "k={k}");
    }
}
