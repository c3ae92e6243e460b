//! Text rendering of analysis results for the terminal.

use std::fmt::Write;

use ild_core::calculations::envelope::EnvelopeResult;
use ild_core::calculations::{DiagramFrame, MovingLoadInput};

const RULE: &str = "═══════════════════════════════════════";

/// Render the results panel for one load case.
pub fn render_summary(input: &MovingLoadInput, result: &EnvelopeResult) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  MOVING LOAD ANALYSIS - {}", input.label);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);
    let _ = writeln!(out, "Input:");
    let _ = writeln!(out, "  Span:     {:.2} m", input.span_m);
    let _ = writeln!(out, "  W1 (lead):  {:.2} kN", input.lead_load_kn);
    let _ = writeln!(out, "  W2 (trail): {:.2} kN, {:.2} m behind W1", input.trail_load_kn, input.spacing_m);
    let _ = writeln!(out);

    let _ = writeln!(out, "Both loads on (W2 at A, W1 at {:.2} m):", input.spacing_m);
    let _ = writeln!(out, "  Reaction at A: {:.2} kN", result.arrival_reactions.left_kn);
    let _ = writeln!(out, "  Reaction at B: {:.2} kN", result.arrival_reactions.right_kn);
    let _ = writeln!(out);

    let _ = writeln!(out, "Maximum reactions:");
    let _ = writeln!(
        out,
        "  RA_max = {:.2} kN (W1 at {:.2} m)",
        result.max_reaction_left.value_kn, result.max_reaction_left.lead_position_m
    );
    let _ = writeln!(
        out,
        "  RB_max = {:.2} kN (W1 at {:.2} m)",
        result.max_reaction_right.value_kn, result.max_reaction_right.lead_position_m
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Observation sections:");
    for section in &result.sections {
        let _ = writeln!(out, "  {} ({:.2} m):", section.location.label(), section.section_m);
        let _ = writeln!(out, "    SF with both loads on: {:.2} kN", section.shear_at_arrival_kn);
        let _ = writeln!(
            out,
            "    SF range: {:.2} .. {:.2} kN",
            section.min_shear.value, section.max_shear.value
        );
        let _ = writeln!(
            out,
            "    BM_max: {:.2} kN·m (W1 at {:.2} m)",
            section.max_moment.value, section.max_moment.lead_position_m
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Envelope ({} positions, step L/{}):", result.positions_scanned, result.resolution);
    let _ = writeln!(
        out,
        "  SF_max = {:.2} kN at {:.2} m (W1 at {:.2} m)",
        result.max_shear.value, result.max_shear.section_m, result.max_shear.lead_position_m
    );
    let _ = writeln!(
        out,
        "  BM_max = {:.2} kN·m at {:.2} m (W1 at {:.2} m)",
        result.max_moment.value, result.max_moment.section_m, result.max_moment.lead_position_m
    );
    let _ = writeln!(out, "{}", RULE);

    out
}

/// One line per animation frame
pub fn render_frame(index: usize, total: usize, frame: &DiagramFrame) -> String {
    let (x, m) = frame.peak_moment();
    format!(
        "[{:>3}/{}] {}  RA = {:7.2} kN  RB = {:7.2} kN  BM_peak = {:8.2} kN·m @ {:.2} m",
        index + 1,
        total,
        frame.caption(),
        frame.reactions.left_kn,
        frame.reactions.right_kn,
        m,
        x
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ild_core::calculations::{compute_envelope, sample_frame, EnvelopeOptions};

    #[test]
    fn test_summary_mentions_key_results() {
        let input = MovingLoadInput::new("G-1", 10.0, 40.0, 60.0, 2.0);
        let result = compute_envelope(&input, &EnvelopeOptions::default()).unwrap();
        let report = render_summary(&input, &result);
        assert!(report.contains("MOVING LOAD ANALYSIS - G-1"));
        assert!(report.contains("RA_max = 92.00 kN"));
        assert!(report.contains("BM_max = 211.60 kN·m"));
        assert!(report.contains("midspan (5.00 m)"));
    }

    #[test]
    fn test_summary_panel_with_both_loads_on() {
        let input = MovingLoadInput::new("Panel", 10.0, 30.0, 20.0, 4.0);
        let result = compute_envelope(&input, &EnvelopeOptions::default()).unwrap();
        let report = render_summary(&input, &result);
        assert!(report.contains("Both loads on (W2 at A, W1 at 4.00 m):"));
        assert!(report.contains("Reaction at A: 38.00 kN"));
        assert!(report.contains("Reaction at B: 12.00 kN"));
        assert!(report.contains("SF with both loads on: -12.00 kN"));
    }

    #[test]
    fn test_frame_line() {
        let input = MovingLoadInput::new("G-1", 10.0, 40.0, 60.0, 2.0);
        let frame = sample_frame(&input, 4.0, 101).unwrap();
        let line = render_frame(0, 100, &frame);
        assert!(line.starts_with("[  1/100] p1 = 4.00 m, p2 = 2.00 m"));
        assert!(line.contains("168.00"));
    }
}
