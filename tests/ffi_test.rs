//! C ABI behaviour as seen by a foreign caller.

use std::ffi::CString;
use std::thread;

use swipe_predictor::ffi::*;

fn predict(ctx: u64, h: u64) -> (i32, [f64; 3]) {
    let mut out = [f64::NAN; 3];
    let [x, y, c] = &mut out;
    let code = unsafe { swipe_predictor_get_prediction(ctx, h, x, y, c) };
    (code, out)
}

#[test]
fn flick_through_the_c_abi() {
    let ctx = swipe_predictor_context_create(1500.0, 50.0, 30.0, 0.3);
    assert_ne!(ctx, 0);
    let h = swipe_predictor_create(ctx);
    assert_ne!(h, 0);

    assert_eq!(swipe_predictor_add_point(ctx, h, 0.0, 0.0, 0.0), SWIPE_PREDICTOR_OK);
    assert_eq!(swipe_predictor_add_point(ctx, h, 10.0, 0.0, 16.0), SWIPE_PREDICTOR_OK);
    assert_eq!(swipe_predictor_add_point(ctx, h, 20.0, 0.0, 32.0), SWIPE_PREDICTOR_OK);

    let (code, [x, y, confidence]) = predict(ctx, h);
    assert_eq!(code, SWIPE_PREDICTOR_OK);
    assert!((x - 150.208).abs() < 0.01);
    assert!(y.abs() < 1e-9);
    assert!(confidence > 0.0);

    assert_eq!(swipe_predictor_context_destroy(ctx), SWIPE_PREDICTOR_OK);
}

#[test]
fn no_prediction_leaves_outputs_untouched() {
    let ctx = swipe_predictor_context_create_default();
    let h = swipe_predictor_create(ctx);
    swipe_predictor_add_point(ctx, h, 5.0, 5.0, 0.0);

    let (code, out) = predict(ctx, h);
    assert_eq!(code, SWIPE_PREDICTOR_NONE);
    assert!(out.iter().all(|v| v.is_nan()));

    swipe_predictor_context_destroy(ctx);
}

#[test]
fn destroyed_predictor_is_rejected_everywhere() {
    let ctx = swipe_predictor_context_create_default();
    let h = swipe_predictor_create(ctx);
    assert_eq!(swipe_predictor_destroy(ctx, h), SWIPE_PREDICTOR_OK);

    assert!(swipe_predictor_destroy(ctx, h) < 0);
    assert!(swipe_predictor_add_point(ctx, h, 0.0, 0.0, 0.0) < 0);
    assert!(predict(ctx, h).0 < 0);
    assert!(swipe_predictor_reset(ctx, h) < 0);
    assert!(swipe_predictor_detect_cancellation(ctx, h) < 0);

    // Unknown and zero handles behave the same way
    assert!(swipe_predictor_add_point(ctx, 0, 0.0, 0.0, 0.0) < 0);
    assert!(swipe_predictor_reset(ctx, u64::MAX) < 0);

    swipe_predictor_context_destroy(ctx);
}

#[test]
fn destroyed_context_is_rejected_everywhere() {
    let ctx = swipe_predictor_context_create_default();
    let h = swipe_predictor_create(ctx);
    assert_eq!(swipe_predictor_context_destroy(ctx), SWIPE_PREDICTOR_OK);

    assert_eq!(swipe_predictor_create(ctx), 0);
    assert!(swipe_predictor_destroy(ctx, h) < 0);
    assert!(swipe_predictor_add_point(ctx, h, 0.0, 0.0, 0.0) < 0);
    assert!(predict(ctx, h).0 < 0);
    assert!(swipe_predictor_reset(ctx, h) < 0);
    assert!(swipe_predictor_detect_cancellation(ctx, h) < 0);
    assert!(swipe_predictor_context_destroy(ctx) < 0);
}

#[test]
fn contexts_are_isolated() {
    let a = swipe_predictor_context_create_default();
    let b = swipe_predictor_context_create_default();
    let h = swipe_predictor_create(a);

    // A handle from one context is meaningless in another
    assert!(swipe_predictor_add_point(b, h, 0.0, 0.0, 0.0) < 0);
    assert_eq!(swipe_predictor_add_point(a, h, 0.0, 0.0, 0.0), SWIPE_PREDICTOR_OK);

    swipe_predictor_context_destroy(a);
    swipe_predictor_context_destroy(b);
}

#[test]
fn json_context_creation() {
    let json = CString::new(r#"{"deceleration_rate": 750.0, "velocity_window": 3}"#).unwrap();
    let ctx = unsafe { swipe_predictor_context_create_json(json.as_ptr()) };
    assert_ne!(ctx, 0);

    let h = swipe_predictor_create(ctx);
    for i in 0..3 {
        let t = i as f64 * 16.0;
        swipe_predictor_add_point(ctx, h, t * 0.625, 0.0, t);
    }
    // Half the deceleration doubles the travel of the 625 px/s flick
    let (code, [x, _, _]) = predict(ctx, h);
    assert_eq!(code, SWIPE_PREDICTOR_OK);
    assert!((x - (20.0 + 260.417)).abs() < 0.01);
    swipe_predictor_context_destroy(ctx);

    let invalid = CString::new(r#"{"velocity_smoothing_factor": -1}"#).unwrap();
    assert_eq!(unsafe { swipe_predictor_context_create_json(invalid.as_ptr()) }, 0);
}

#[test]
fn cancellation_flag() {
    let ctx = swipe_predictor_context_create_default();
    let h = swipe_predictor_create(ctx);
    for &(x, t) in &[(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)] {
        swipe_predictor_add_point(ctx, h, x, 0.0, t);
    }
    assert_eq!(swipe_predictor_detect_cancellation(ctx, h), 0);

    swipe_predictor_add_point(ctx, h, 15.0, 0.0, 30.0);
    assert_eq!(swipe_predictor_detect_cancellation(ctx, h), 1);

    swipe_predictor_context_destroy(ctx);
}

#[test]
fn calls_from_many_threads() {
    let ctx = swipe_predictor_context_create_default();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(move || {
                for _ in 0..25 {
                    let h = swipe_predictor_create(ctx);
                    assert_ne!(h, 0);
                    for i in 0..4 {
                        let t = i as f64 * 16.0;
                        assert_eq!(swipe_predictor_add_point(ctx, h, t, t, t), 1);
                    }
                    assert_eq!(predict(ctx, h).0, SWIPE_PREDICTOR_OK);
                    assert_eq!(swipe_predictor_destroy(ctx, h), 1);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(swipe_predictor_context_destroy(ctx), SWIPE_PREDICTOR_OK);
}

#[test]
fn init_is_repeatable() {
    assert_eq!(swipe_predictor_init(), SWIPE_PREDICTOR_OK);
    assert_eq!(swipe_predictor_init(), SWIPE_PREDICTOR_OK);
}
