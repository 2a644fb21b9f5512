//! Display helpers for meters and result summaries
//!
//! Turns raw month totals into bar fills and the short captions shown beside
//! the filtered timeline.

use crate::core::calendar::format_duration;

const FULL_BLOCK: char = '█';
const EMPTY_BLOCK: char = '░';

/// Bar fill for `months` against the sibling maximum (0.0 to 1.0)
pub fn meter_fill(months: u32, max_months: u32) -> f32 {
    if max_months == 0 {
        return 0.0;
    }
    (months as f32 / max_months as f32).clamp(0.0, 1.0)
}

/// Fill as a whole percentage, 0 to 100
pub fn meter_percent(months: u32, max_months: u32) -> u16 {
    (meter_fill(months, max_months) * 100.0).round() as u16
}

/// A display-ready meter for a text surface
#[derive(Debug, Clone, PartialEq)]
pub struct MeterLabel {
    pub label: String,
    pub duration: String,
    /// Bar fill for visual rendering (0.0 to 1.0)
    pub bar_fill: f32,
}

impl MeterLabel {
    /// Create a new meter label, clamping bar_fill to valid range
    pub fn new(label: impl Into<String>, months: u32, bar_fill: f32) -> Self {
        Self {
            label: label.into(),
            duration: format_duration(months),
            bar_fill: bar_fill.clamp(0.0, 1.0),
        }
    }

    /// Render as block characters, `width` cells wide
    pub fn bar(&self, width: usize) -> String {
        render_bar(self.bar_fill, width)
    }
}

/// Block-character bar; any non-zero fill shows at least one cell
pub fn render_bar(fill: f32, width: usize) -> String {
    let fill = fill.clamp(0.0, 1.0);
    let mut filled = (fill * width as f32).round() as usize;
    if fill > 0.0 && filled == 0 && width > 0 {
        filled = 1;
    }
    let filled = filled.min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat(FULL_BLOCK).take(filled));
    bar.extend(std::iter::repeat(EMPTY_BLOCK).take(width - filled));
    bar
}

/// "3 experiences match this skill" or "1 experience using Figma"
pub fn result_summary(count: usize, tool: Option<&str>) -> String {
    let noun = if count == 1 { "experience" } else { "experiences" };
    match tool {
        Some(tool) => format!("{count} {noun} using {tool}"),
        None => format!("{count} {noun} match this skill"),
    }
}

/// "Filtered by: Growth → Paid Growth → Paid Social + Meta Ads"
pub fn filter_chip_line(path: &[&str], tool: Option<&str>) -> String {
    let mut line = format!("Filtered by: {}", path.join(" → "));
    if let Some(tool) = tool {
        line.push_str(" + ");
        line.push_str(tool);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_fill_clamped() {
        assert_eq!(meter_fill(0, 0), 0.0);
        assert_eq!(meter_fill(12, 24), 0.5);
        assert_eq!(meter_fill(48, 24), 1.0);
        assert_eq!(meter_percent(1, 3), 33);
        assert_eq!(meter_percent(30, 24), 100);
    }

    #[test]
    fn test_render_bar_widths() {
        assert_eq!(render_bar(0.5, 4), "██░░");
        assert_eq!(render_bar(0.0, 3), "░░░");
        assert_eq!(render_bar(0.01, 5), "█░░░░");
        assert_eq!(render_bar(2.0, 2), "██");
        assert_eq!(render_bar(1.0, 0), "");
    }

    #[test]
    fn test_meter_label_formats_duration() {
        let label = MeterLabel::new("Paid Social", 27, 1.5);
        assert_eq!(label.duration, "2y 3m");
        assert_eq!(label.bar_fill, 1.0);
        assert_eq!(label.bar(3), "███");
    }

    #[test]
    fn test_result_summary_pluralizes() {
        assert_eq!(result_summary(1, None), "1 experience match this skill");
        assert_eq!(result_summary(3, None), "3 experiences match this skill");
        assert_eq!(result_summary(2, Some("Figma")), "2 experiences using Figma");
    }

    #[test]
    fn test_filter_chip_line() {
        assert_eq!(
            filter_chip_line(&["Growth", "Paid Growth", "Paid Social"], Some("Meta Ads")),
            "Filtered by: Growth → Paid Growth → Paid Social + Meta Ads"
        );
        assert_eq!(filter_chip_line(&["Ops & Strategy"], None), "Filtered by: Ops & Strategy");
    }
}
