use approx::{assert_abs_diff_eq, assert_relative_eq};
use ild_core::calculations::influence::{response, InfluenceQuantity};
use ild_core::calculations::{
    compute_envelope, compute_reactions, compute_section_forces, EnvelopeOptions, LoadSweep,
    MovingLoadInput, SectionLocation,
};
use ild_core::CalcError;

fn crane() -> MovingLoadInput {
    MovingLoadInput::new("G-1", 10.0, 40.0, 60.0, 2.0)
}

fn lead_positions(span_m: f64, steps: usize) -> impl Iterator<Item = f64> {
    (0..=steps).map(move |i| span_m * i as f64 / steps as f64)
}

#[test]
fn reactions_balance_the_loads_on_the_span() {
    let cases = [
        crane(),
        MovingLoadInput::new("Light", 7.5, 5.0, 12.0, 7.5),
        MovingLoadInput::new("Tandem", 20.0, 80.0, 80.0, 1.2),
    ];
    for input in &cases {
        for a in lead_positions(input.span_m, 57) {
            let r = compute_reactions(input, a).unwrap();
            assert_abs_diff_eq!(r.total_kn(), input.on_span_load_kn(a), epsilon = 1e-9);
            assert!(r.left_kn >= -1e-9, "RA < 0 at a = {}", a);
            assert!(r.right_kn >= -1e-9, "RB < 0 at a = {}", a);
        }
    }
}

#[test]
fn support_moments_vanish_for_every_position() {
    let input = crane();
    for a in lead_positions(input.span_m, 100) {
        assert_eq!(compute_section_forces(&input, a, 0.0).unwrap().moment_knm, 0.0);
        assert_eq!(compute_section_forces(&input, a, 10.0).unwrap().moment_knm, 0.0);
    }
}

#[test]
fn coincident_equal_loads_reduce_to_a_single_load() {
    // BM_max = 2W * (L/2) * (L/2) / L = W L / 2
    let w = 35.0;
    let span = 9.0;
    let input = MovingLoadInput::new("Pair", span, w, w, 0.0);
    let envelope = compute_envelope(&input, &EnvelopeOptions::default()).unwrap();
    assert_relative_eq!(envelope.max_moment.value, w * span / 2.0, max_relative = 1e-12);
    assert_relative_eq!(envelope.max_moment.lead_position_m, span / 2.0, max_relative = 1e-12);
    assert_relative_eq!(envelope.max_moment.section_m, span / 2.0, max_relative = 1e-12);
}

#[test]
fn single_load_transfers_monotonically_from_a_to_b() {
    // Trailing load weightless: only W1 acts
    let input = MovingLoadInput::new("Single", 10.0, 50.0, 0.0, 3.0);
    let mut previous = compute_reactions(&input, 0.0).unwrap();
    assert_relative_eq!(previous.left_kn, 50.0);
    assert_abs_diff_eq!(previous.right_kn, 0.0);

    for a in lead_positions(10.0, 200).skip(1) {
        let current = compute_reactions(&input, a).unwrap();
        assert!(current.left_kn < previous.left_kn);
        assert!(current.right_kn > previous.right_kn);
        previous = current;
    }
    assert_abs_diff_eq!(previous.left_kn, 0.0, epsilon = 1e-12);
    assert_relative_eq!(previous.right_kn, 50.0);
}

#[test]
fn shear_jumps_by_the_load_magnitude() {
    let input = crane();
    let a = 7.25;
    for (position, magnitude) in [(a, 40.0), (a - 2.0, 60.0)] {
        let left = compute_section_forces(&input, a, position - 1e-7).unwrap();
        let right = compute_section_forces(&input, a, position).unwrap();
        assert_relative_eq!(left.shear_kn - right.shear_kn, magnitude, max_relative = 1e-9);
        // Moment is continuous across the load
        assert_abs_diff_eq!(left.moment_knm, right.moment_knm, epsilon = 1e-4);
    }
}

#[test]
fn worked_example_matches_hand_calculation() {
    let input = crane();
    let r = compute_reactions(&input, 4.0).unwrap();
    assert_relative_eq!(r.left_kn, 72.0, max_relative = 1e-12);
    assert_relative_eq!(r.right_kn, 28.0, max_relative = 1e-12);

    let f = compute_section_forces(&input, 4.0, 4.0).unwrap();
    assert_relative_eq!(f.moment_knm, 168.0, max_relative = 1e-12);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let input = MovingLoadInput::new("Odd", 13.37, 21.1, 47.9, 3.14);
    let first = compute_section_forces(&input, 8.8, 5.55).unwrap();
    let second = compute_section_forces(&input, 8.8, 5.55).unwrap();
    assert_eq!(first.shear_kn.to_bits(), second.shear_kn.to_bits());
    assert_eq!(first.moment_knm.to_bits(), second.moment_knm.to_bits());

    let options = EnvelopeOptions::default();
    let e1 = compute_envelope(&input, &options).unwrap();
    let e2 = compute_envelope(&input, &options).unwrap();
    assert_eq!(e1.max_moment.value.to_bits(), e2.max_moment.value.to_bits());
    assert_eq!(e1.max_shear.value.to_bits(), e2.max_shear.value.to_bits());
}

#[test]
fn load_on_a_support_goes_fully_into_that_support() {
    let input = MovingLoadInput::new("Ends", 10.0, 40.0, 60.0, 10.0);

    // a = 0: W1 on A, W2 off the span
    let r = compute_reactions(&input, 0.0).unwrap();
    assert_relative_eq!(r.left_kn, 40.0);
    assert_abs_diff_eq!(r.right_kn, 0.0, epsilon = 1e-12);

    // a = L with x = L: W1 on B, W2 on A
    let r = compute_reactions(&input, 10.0).unwrap();
    assert_relative_eq!(r.left_kn, 60.0);
    assert_relative_eq!(r.right_kn, 40.0);
    let f = compute_section_forces(&input, 10.0, 5.0).unwrap();
    assert_abs_diff_eq!(f.moment_knm, 0.0, epsilon = 1e-12);
}

#[test]
fn envelope_moment_is_not_exceeded_by_any_frame() {
    let input = crane();
    let envelope = compute_envelope(&input, &EnvelopeOptions::default()).unwrap();
    for frame in LoadSweep::new(&input, 120, 400).unwrap() {
        let (_, peak) = frame.peak_moment();
        assert!(peak <= envelope.max_moment.value + 1e-9);
        for &(_, v) in &frame.shear_diagram {
            assert!(v.abs() <= envelope.max_shear.value.abs() + 1e-6);
        }
    }
}

#[test]
fn observation_sections_agree_with_influence_lines() {
    let input = crane();
    let options = EnvelopeOptions {
        observation_sections: vec![
            SectionLocation::Midspan,
            SectionLocation::At { position_m: 3.0 },
            SectionLocation::SupportB,
        ],
        ..EnvelopeOptions::default()
    };
    let envelope = compute_envelope(&input, &options).unwrap();
    assert_eq!(envelope.sections.len(), 3);

    let at_three = envelope
        .section(SectionLocation::At { position_m: 3.0 })
        .unwrap();
    let quantity = InfluenceQuantity::Moment { section_m: 3.0 };
    let recomputed = response(&input, quantity, at_three.max_moment.lead_position_m).unwrap();
    assert_relative_eq!(recomputed, at_three.max_moment.value, max_relative = 1e-12);

    let support_b = envelope.section(SectionLocation::SupportB).unwrap();
    assert_eq!(support_b.max_moment.value, 0.0);
    // Shear at B is -RB; its peak magnitude is the largest RB
    assert_relative_eq!(
        -support_b.min_shear.value,
        envelope.max_reaction_right.value_kn,
        max_relative = 1e-12
    );
}

#[test]
fn invalid_inputs_are_reported_not_computed() {
    let bad_span = MovingLoadInput::new("Bad", -1.0, 10.0, 10.0, 0.0);
    assert!(matches!(
        compute_envelope(&bad_span, &EnvelopeOptions::default()),
        Err(CalcError::InvalidGeometry { .. })
    ));

    let bad_spacing = MovingLoadInput::new("Bad", 5.0, 10.0, 10.0, 6.0);
    assert!(matches!(
        compute_reactions(&bad_spacing, 1.0),
        Err(CalcError::InvalidSpacing { .. })
    ));

    assert!(matches!(
        compute_section_forces(&crane(), 10.5, 1.0),
        Err(CalcError::OutOfRangeLoadPosition { .. })
    ));
}

#[test]
fn envelope_locations_reproduce_their_values() {
    let input = MovingLoadInput::new("Odd", 13.37, 21.1, 47.9, 3.14);
    let envelope = compute_envelope(&input, &EnvelopeOptions::default()).unwrap();

    let shear = envelope.max_shear;
    let at_shear = compute_section_forces(&input, shear.lead_position_m, shear.section_m).unwrap();
    assert_eq!(at_shear.shear_kn, shear.value);

    let moment = envelope.max_moment;
    let at_moment =
        compute_section_forces(&input, moment.lead_position_m, moment.section_m).unwrap();
    assert_eq!(at_moment.moment_knm, moment.value);

    let left = envelope.max_reaction_left;
    let reactions = compute_reactions(&input, left.lead_position_m).unwrap();
    assert_eq!(reactions.left_kn, left.value_kn);
}
