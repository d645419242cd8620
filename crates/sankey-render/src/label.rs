//! Label text: what each label says, and fitting it into its box.

use std::borrow::Cow;

use sankey_layout::LabelPlacement;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Decides the text lines of a label.
///
/// Hosts that localize numbers or show entity names plug in their own
/// implementation; the layout does not depend on it.
pub trait LabelFormatter {
    fn lines(&self, label: &LabelPlacement, unit: &str) -> Vec<String>;
}

/// `"{value} {unit}"` with the value rounded to one decimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundedLabel;

impl LabelFormatter for RoundedLabel {
    fn lines(&self, label: &LabelPlacement, unit: &str) -> Vec<String> {
        vec![format!("{} {unit}", round_one_decimal(label.rate))]
    }
}

/// Route name (when known) above the rounded value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedLabel;

impl LabelFormatter for NamedLabel {
    fn lines(&self, label: &LabelPlacement, unit: &str) -> Vec<String> {
        let value = format!("{}\u{a0}{unit}", round_one_decimal(label.rate));
        match label.text.as_deref() {
            Some(name) if !name.is_empty() => vec![name.to_string(), value],
            _ => vec![value],
        }
    }
}

impl<F> LabelFormatter for F
where
    F: Fn(&LabelPlacement, &str) -> Vec<String>,
{
    fn lines(&self, label: &LabelPlacement, unit: &str) -> Vec<String> {
        self(label, unit)
    }
}

/// Round to one decimal; whole numbers print without a fraction.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid printing "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Shorten `s` to at most `max_width` columns, ending in `…` when cut.
pub fn ellipsize(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    match max_width {
        0 => return Cow::Borrowed(""),
        1 => return Cow::Borrowed("…"),
        _ => {}
    }

    let target = max_width - 1;
    let mut out = String::new();
    let mut used = 0usize;
    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > target {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('…');
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sankey_core::geometry::{Point, Rect};
    use sankey_layout::LabelKind;

    fn label(rate: f64, text: Option<&str>) -> LabelPlacement {
        LabelPlacement {
            kind: LabelKind::Consumer,
            route_id: Some("sensor.tv".into()),
            text: text.map(str::to_string),
            icon: None,
            rate,
            anchor: Point::new(0.0, 0.0),
            bounds: Rect::new(0.0, 0.0, 180.0, 40.0),
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_one_decimal(5.0).to_string(), "5");
        assert_eq!(round_one_decimal(5.25).to_string(), "5.3");
        assert_eq!(round_one_decimal(1234.5678).to_string(), "1234.6");
        assert_eq!(round_one_decimal(-0.01).to_string(), "0");
    }

    #[test]
    fn rounded_label() {
        assert_eq!(RoundedLabel.lines(&label(2.04, None), "kWh"), ["2 kWh"]);
    }

    #[test]
    fn named_label() {
        assert_eq!(
            NamedLabel.lines(&label(2.26, Some("TV")), "W"),
            ["TV", "2.3\u{a0}W"]
        );
        assert_eq!(NamedLabel.lines(&label(1.0, Some("")), "W"), ["1\u{a0}W"]);
    }

    #[test]
    fn closure_formatter() {
        let ids = |l: &LabelPlacement, _unit: &str| vec![l.route_id.clone().unwrap_or_default()];
        assert_eq!(ids.lines(&label(1.0, None), "W"), ["sensor.tv"]);
    }

    #[test]
    fn ellipsize_short_is_borrowed() {
        assert!(matches!(ellipsize("Fridge", 10), Cow::Borrowed("Fridge")));
        assert!(matches!(ellipsize("Fridge", 6), Cow::Borrowed("Fridge")));
    }

    #[test]
    fn ellipsize_truncates() {
        assert_eq!(ellipsize("Dishwasher", 5), "Dish…");
        assert_eq!(ellipsize("Dishwasher", 1), "…");
        assert_eq!(ellipsize("Dishwasher", 0), "");
    }

    #[test]
    fn ellipsize_counts_wide_characters() {
        // Each CJK character is two columns wide.
        assert_eq!(ellipsize("洗濯機乾燥", 5), "洗濯…");
    }
}
