/// Completion color scale
///
/// Maps a completion percentage (0-100) onto a three-stop gradient:
/// red at 0%, yellow at 50%, green at 100%. The two halves are blended
/// independently so the yellow midpoint is always hit exactly.

/// Gradient stop at 0% completion
const RED: [f32; 3] = [239.0, 68.0, 68.0];
/// Gradient stop at 50% completion
const YELLOW: [f32; 3] = [234.0, 179.0, 8.0];
/// Gradient stop at 100% completion
const GREEN: [f32; 3] = [34.0, 197.0, 94.0];

/// Compute the RGB color for a completion percentage.
///
/// The input is clamped to 0-100. Each channel is interpolated linearly
/// within its half-range and rounded to the nearest integer (half away
/// from zero, matching the service's web client).
pub fn progress_color(percentage: f32) -> [u8; 3] {
    let p = percentage.clamp(0.0, 100.0);

    let (from, to, ratio) = if p < 50.0 {
        (RED, YELLOW, p / 50.0)
    } else {
        (YELLOW, GREEN, (p - 50.0) / 50.0)
    };

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = (from[i] + (to[i] - from[i]) * ratio).round() as u8;
    }
    rgb
}

/// Same scale as an iced color, for canvas strokes and borders.
pub fn progress_iced_color(percentage: f32) -> iced::Color {
    let [r, g, b] = progress_color(percentage);
    iced::Color::from_rgb8(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_stops() {
        assert_eq!(progress_color(0.0), [239, 68, 68]);
        assert_eq!(progress_color(50.0), [234, 179, 8]);
        assert_eq!(progress_color(100.0), [34, 197, 94]);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(progress_color(-20.0), progress_color(0.0));
        assert_eq!(progress_color(250.0), progress_color(100.0));
    }

    #[test]
    fn test_quarter_point_rounds_half_away_from_zero() {
        // Halfway through the red-yellow blend: 236.5, 123.5, 38.0
        assert_eq!(progress_color(25.0), [237, 124, 38]);
    }

    #[test]
    fn test_channels_are_monotonic_per_half() {
        // Red to yellow: r and b fall, g rises
        let mut prev = progress_color(0.0);
        for p in 1..=50 {
            let next = progress_color(p as f32);
            assert!(next[0] <= prev[0]);
            assert!(next[1] >= prev[1]);
            assert!(next[2] <= prev[2]);
            prev = next;
        }

        // Yellow to green: r falls, g and b rise
        let mut prev = progress_color(50.0);
        for p in 51..=100 {
            let next = progress_color(p as f32);
            assert!(next[0] <= prev[0]);
            assert!(next[1] >= prev[1]);
            assert!(next[2] >= prev[2]);
            prev = next;
        }
    }
}
