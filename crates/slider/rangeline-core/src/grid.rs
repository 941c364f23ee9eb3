//! Grid ticks and labels under the track.

use crate::config::Config;
use crate::convert::{to_fixed, Converter, DEFAULT_PRECISION};
use crate::error::Result;
use crate::format::Formatter;
use crate::measure::{LabelSlot, Measure};
use crate::snapshot::{GridLabel, GridView};

/// Upper bound on major ticks.
pub const MAX_BIG_TICKS: f64 = 50.0;

/// Small ticks drawn inside each major cell, thinning out as cells shrink.
fn small_ticks_per_cell(big_num: f64) -> u32 {
    if big_num > 28.0 {
        0
    } else if big_num > 14.0 {
        1
    } else if big_num > 7.0 {
        2
    } else if big_num > 4.0 {
        3
    } else {
        4
    }
}

/// Hide the label after every `stride`-th one when it would overlap. The
/// last label (the max value) is never a candidate.
fn hide_collisions(stride: usize, start: &[f64], finish: &[f64], labels: &mut [GridLabel]) {
    let half = stride / 2;
    let last = labels.len().saturating_sub(1);
    let mut i = 0;
    while i < last {
        let next = i + half;
        if next >= last {
            break;
        }
        labels[next].visible = finish[i] <= start[next];
        i += stride;
    }
}

pub fn build(
    cfg: &Config,
    fmt: &Formatter,
    measure: &dyn Measure,
    track_width: f64,
    handle_percent: f64,
) -> Result<GridView> {
    let conv = Converter::new(cfg);
    let total = cfg.max - cfg.min;

    let mut big_num = if cfg.grid_snap {
        total / cfg.step
    } else {
        cfg.grid_num
    };
    if big_num > MAX_BIG_TICKS {
        big_num = MAX_BIG_TICKS;
    }
    if big_num.is_nan() || big_num <= 0.0 {
        big_num = 1.0;
    }
    let big_p = to_fixed(100.0 / big_num, DEFAULT_PRECISION);
    let small_max = small_ticks_per_cell(big_num);
    let count = (big_num + 1.0).ceil() as usize;

    let (left, width, grid_gap) = if cfg.grid_margin {
        let gap = to_fixed(handle_percent / 2.0 - 0.1, DEFAULT_PRECISION);
        (gap, to_fixed(100.0 - handle_percent, DEFAULT_PRECISION), gap)
    } else {
        (0.0, 100.0, 0.0)
    };

    let mut view = GridView {
        left,
        width,
        ..GridView::default()
    };
    let mut start = Vec::with_capacity(count);
    let mut finish = Vec::with_capacity(count);
    let mut label_w = Vec::with_capacity(count);

    for i in 0..count {
        let big_w = to_fixed(big_p * i as f64, 13).min(100.0);
        if big_w > 0.0 {
            let small_w = (big_w - big_p * (i as f64 - 1.0)) / (small_max as f64 + 1.0);
            for z in 1..=small_max {
                view.small_ticks.push(to_fixed(big_w - small_w * z as f64, 5));
            }
        }
        view.ticks.push(big_w);

        let value = conv.to_value(big_w);
        let text = if cfg.has_values() {
            cfg.pretty_value(value)?.to_string()
        } else {
            fmt.prettify(cfg, value)
        };

        let p = if track_width > 0.0 {
            to_fixed(
                measure.label_width(LabelSlot::Grid(i), &text) / track_width * 100.0,
                DEFAULT_PRECISION,
            )
        } else {
            0.0
        };
        let half = to_fixed(p / 2.0, DEFAULT_PRECISION);
        let s = to_fixed(big_w - half, DEFAULT_PRECISION);
        start.push(s);
        finish.push(to_fixed(s + p, DEFAULT_PRECISION));
        label_w.push(p);

        view.labels.push(GridLabel {
            text,
            left: big_w,
            offset: -half,
            visible: true,
        });
    }

    if cfg.force_edges && count > 0 {
        if start[0] < -grid_gap {
            start[0] = -grid_gap;
            finish[0] = to_fixed(start[0] + label_w[0], DEFAULT_PRECISION);
            view.labels[0].offset = -grid_gap;
        }
        let last = count - 1;
        if finish[last] > 100.0 + grid_gap {
            finish[last] = 100.0 + grid_gap;
            start[last] = to_fixed(finish[last] - label_w[last], DEFAULT_PRECISION);
            view.labels[last].offset = -to_fixed(label_w[last] - grid_gap, DEFAULT_PRECISION);
        }
    }

    hide_collisions(2, &start, &finish, &mut view.labels);
    hide_collisions(4, &start, &finish, &mut view.labels);

    Ok(view)
}
