//! Font shrinking for fixed-width text slots

use serde::{Deserialize, Serialize};

/// Per-character reduction used by [`dynamic_size`]
pub const DEFAULT_SHRINK_STEP: f64 = 0.1;

/// Shrink `base` for text longer than `shrink_threshold` characters
///
/// Each character past the threshold removes 0.1 from the size; the result
/// never drops below `min`.
///
/// ```
/// use colloq_core::dynamic_size;
///
/// assert_eq!(dynamic_size("Dr. Jane Doe", 1.5, 0.8, 12), 1.5);
/// assert_eq!(dynamic_size("Dr. Jonathan Alexander", 1.5, 0.8, 12), 0.8);
/// ```
pub fn dynamic_size(text: &str, base: f64, min: f64, shrink_threshold: usize) -> f64 {
    ShrinkRule {
        base,
        min,
        threshold: shrink_threshold,
        step: DEFAULT_SHRINK_STEP,
    }
    .size_for(text)
}

/// Tunable constants for the shrink heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkRule {
    /// Size (em) for text at or under the threshold
    pub base: f64,
    /// Lower bound (em)
    pub min: f64,
    /// Character count before shrinking starts
    pub threshold: usize,
    /// Reduction per extra character (em)
    pub step: f64,
}

impl Default for ShrinkRule {
    fn default() -> Self {
        Self {
            base: 1.5,
            min: 0.8,
            threshold: 12,
            step: DEFAULT_SHRINK_STEP,
        }
    }
}

impl ShrinkRule {
    /// Display size for `text`
    pub fn size_for(&self, text: &str) -> f64 {
        let len = text.chars().count();
        if len <= self.threshold {
            return self.base;
        }
        let overflow = (len - self.threshold) as f64;
        (self.base - overflow * self.step).max(self.min)
    }
}

/// Format an em size for CSS without float noise (`1.2000000000000002` -> `1.2`)
pub fn format_em(value: f64) -> String {
    let rounded = format!("{:.3}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_threshold_keeps_base() {
        assert_eq!(dynamic_size("Dr. Jane Doe", 1.5, 0.8, 12), 1.5);
        assert_eq!(dynamic_size("", 1.5, 0.8, 12), 1.5);
    }

    #[test]
    fn test_long_name_clamped_to_min() {
        assert_eq!(dynamic_size("Dr. Jonathan Alexander", 1.5, 0.8, 12), 0.8);
    }

    #[test]
    fn test_partial_shrink() {
        // 15 chars, 3 over the threshold
        let size = dynamic_size("Dr. Ada Lovelac", 1.5, 0.8, 12);
        assert!((size - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 12 chars, 24+ bytes
        assert_eq!(dynamic_size("酒井崇匡教授酒井崇匡教授", 1.5, 0.8, 12), 1.5);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let mut previous = f64::MAX;
        for n in 0..60 {
            let text = "x".repeat(n);
            let size = dynamic_size(&text, 1.5, 0.8, 12);
            assert!(size <= previous, "size grew at length {n}");
            assert!(size >= 0.8, "size below min at length {n}");
            previous = size;
        }
    }

    #[test]
    fn test_custom_rule() {
        let rule = ShrinkRule {
            base: 2.0,
            min: 1.0,
            threshold: 4,
            step: 0.25,
        };
        assert_eq!(rule.size_for("abcd"), 2.0);
        assert_eq!(rule.size_for("abcdef"), 1.5);
        assert_eq!(rule.size_for("abcdefghijkl"), 1.0);
    }

    #[test]
    fn test_format_em() {
        assert_eq!(format_em(1.5), "1.5");
        assert_eq!(format_em(1.2000000000000002), "1.2");
        assert_eq!(format_em(2.0), "2");
        assert_eq!(format_em(0.65), "0.65");
        assert_eq!(format_em(0.0), "0");
    }
}
