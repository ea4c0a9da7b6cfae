//! Property tests for the transform and view-manipulation invariants.
//!
//! 1. data -> pixel -> data round trips inside and outside the bounds
//! 2. vectorized mapping matches the scalar mapping
//! 3. pan shift is linear in the pointer delta, and panning back undoes it
//! 4. autoscaled limits only grow and always cover the plotted data

use canvasplot::{Figure, MouseButton, Point, Range, ScreenRect, Transform, Viewport};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn range_strategy() -> impl Strategy<Value = Range> {
    (-1.0e3..1.0e3_f64, 1.0e-3..1.0e4_f64).prop_map(|(min, span)| Range::new(min, min + span))
}

fn rect_strategy() -> impl Strategy<Value = ScreenRect> {
    (0.0..500.0_f64, 0.0..500.0_f64, 1.0..2000.0_f64, 1.0..2000.0_f64)
        .prop_map(|(x, y, width, height)| ScreenRect::from_origin_size(x, y, width, height))
}

fn close(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()) + scale)
}

fn pan_shift(dx: f64, dy: f64) -> (f64, f64) {
    let mut figure = Figure::builder().auto_draw(false).build();
    let area = figure.add_subplot(1, 1, 1).unwrap();
    figure.set_xlim(area, Some(-3.0), Some(11.0)).unwrap();
    figure.set_ylim(area, Some(2.0), Some(9.0)).unwrap();
    figure.activate_pan();
    figure.press_now(430.0, 280.0, MouseButton::Left);
    figure.motion(430.0 + dx, 280.0 + dy);
    let (x_min, _) = figure.get_xlim(area).unwrap();
    let (y_min, _) = figure.get_ylim(area).unwrap();
    (x_min + 3.0, y_min - 2.0)
}

fn pan_gesture(figure: &mut Figure, from: (f64, f64), to: (f64, f64)) {
    figure.press_now(from.0, from.1, MouseButton::Left);
    figure.motion(to.0, to.1);
    figure.release(to.0, to.1, MouseButton::Left);
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Transform
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn round_trip_recovers_data(
        x in range_strategy(),
        y in range_strategy(),
        rect in rect_strategy(),
        fx in -2.0..3.0_f64,
        fy in -2.0..3.0_f64,
    ) {
        let transform = Transform::new(Viewport::new(x, y), rect).unwrap();
        let point = Point::new(x.min + fx * x.span(), y.min + fy * y.span());
        let back = transform.to_data(transform.to_pixel(point));
        prop_assert!(close(back.x, point.x, x.span()), "{point:?} -> {back:?}");
        prop_assert!(close(back.y, point.y, y.span()), "{point:?} -> {back:?}");
    }

    #[test]
    fn vectorized_mapping_matches_scalar(
        x in range_strategy(),
        y in range_strategy(),
        rect in rect_strategy(),
        xs in prop::collection::vec(-1.0e4..1.0e4_f64, 0..32),
    ) {
        let transform = Transform::new(Viewport::new(x, y), rect).unwrap();
        let ys: Vec<f64> = xs.iter().map(|value| value * 0.5).collect();
        let batch = transform.to_pixels_xy(&xs, &ys).unwrap();
        prop_assert_eq!(batch.len(), xs.len());
        for ((x, y), pixel) in xs.iter().zip(&ys).zip(&batch) {
            prop_assert_eq!(*pixel, transform.to_pixel(Point::new(*x, *y)));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Pan linearity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pan_shift_is_linear(
        dx in -150.0..150.0_f64,
        dy in -100.0..100.0_f64,
    ) {
        let single = pan_shift(dx, dy);
        let double = pan_shift(2.0 * dx, 2.0 * dy);
        prop_assert!(close(double.0, 2.0 * single.0, 14.0), "{single:?} vs {double:?}");
        prop_assert!(close(double.1, 2.0 * single.1, 7.0), "{single:?} vs {double:?}");
        // 700 px wide, 14 units: dragging right by dx shows data dx/50 units left.
        prop_assert!(close(single.0, -dx / 50.0, 14.0));
        // 520 px tall, 7 units: dragging down shows data higher up.
        prop_assert!(close(single.1, dy * 7.0 / 520.0, 7.0));
    }

    #[test]
    fn pan_back_restores_limits(
        x in range_strategy(),
        y in range_strategy(),
        dx in -150.0..150.0_f64,
        dy in -100.0..100.0_f64,
    ) {
        let mut figure = Figure::builder().auto_draw(false).build();
        let area = figure.add_subplot(1, 1, 1).unwrap();
        figure.set_xlim(area, Some(x.min), Some(x.max)).unwrap();
        figure.set_ylim(area, Some(y.min), Some(y.max)).unwrap();
        let xlim = figure.get_xlim(area).unwrap();
        let ylim = figure.get_ylim(area).unwrap();
        figure.activate_pan();

        let start = (430.0, 280.0);
        let end = (430.0 + dx, 280.0 + dy);
        pan_gesture(&mut figure, start, end);
        pan_gesture(&mut figure, end, start);

        let (x_min, x_max) = figure.get_xlim(area).unwrap();
        let (y_min, y_max) = figure.get_ylim(area).unwrap();
        prop_assert!(close(x_min, xlim.0, x.span()) && close(x_max, xlim.1, x.span()));
        prop_assert!(close(y_min, ylim.0, y.span()) && close(y_max, ylim.1, y.span()));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Autoscale
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn autoscale_only_grows(
        batches in prop::collection::vec(
            prop::collection::vec((-1.0e3..1.0e3_f64, -1.0e3..1.0e3_f64), 2..16),
            1..6,
        ),
    ) {
        let mut figure = Figure::builder().auto_draw(false).build();
        let area = figure.add_subplot(1, 1, 1).unwrap();
        let mut previous: Option<((f64, f64), (f64, f64))> = None;
        for batch in &batches {
            let xs: Vec<f64> = batch.iter().map(|(x, _)| *x).collect();
            let ys: Vec<f64> = batch.iter().map(|(_, y)| *y).collect();
            figure.plot(area, &xs, &ys).unwrap();
            let xlim = figure.get_xlim(area).unwrap();
            let ylim = figure.get_ylim(area).unwrap();
            prop_assert!(xlim.0 < xlim.1 && ylim.0 < ylim.1);
            for (x, y) in batch {
                prop_assert!(xlim.0 <= *x && *x <= xlim.1);
                prop_assert!(ylim.0 <= *y && *y <= ylim.1);
            }
            if let Some((prev_x, prev_y)) = previous {
                prop_assert!(xlim.0 <= prev_x.0 && xlim.1 >= prev_x.1);
                prop_assert!(ylim.0 <= prev_y.0 && ylim.1 >= prev_y.1);
            }
            previous = Some((xlim, ylim));
        }
    }
}
