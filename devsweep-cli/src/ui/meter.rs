/// Eighth-block glyphs, index = filled eighths of one cell
const EIGHTHS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// `part / whole` in `[0, 1]`; 0 when there is nothing to divide
pub fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).min(1.0)
    }
}

/// A bar `width` cells wide filled to `fraction`, at eighth-cell resolution
pub fn meter(fraction: f64, width: usize) -> String {
    let eighths = (fraction.clamp(0.0, 1.0) * (width * 8) as f64).round() as usize;
    let (full, rest) = (eighths / 8, eighths % 8);

    let mut bar: String = std::iter::repeat_n(EIGHTHS[8], full).collect();
    if rest > 0 {
        bar.push(EIGHTHS[rest]);
    }
    let used = full + usize::from(rest > 0);
    bar.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share() {
        assert_eq!(share(0, 0), 0.0);
        assert_eq!(share(25, 100), 0.25);
        assert_eq!(share(300, 100), 1.0);
    }

    #[test]
    fn test_meter_keeps_width() {
        for fraction in [0.0, 0.13, 0.5, 0.99, 1.0, 7.0, -1.0] {
            assert_eq!(meter(fraction, 12).chars().count(), 12, "fraction {fraction}");
        }
        assert_eq!(meter(0.5, 0), "");
    }

    #[test]
    fn test_meter_eighths() {
        assert_eq!(meter(0.0, 4), "    ");
        assert_eq!(meter(1.0, 4), "████");
        // 1/4 of 2 cells = 4 eighths = half a cell
        assert_eq!(meter(0.25, 2), "▌ ");
        assert_eq!(meter(0.5, 2), "█ ");
    }
}
