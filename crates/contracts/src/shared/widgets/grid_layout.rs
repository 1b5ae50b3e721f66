//! Placement of widgets on the dashboard grid

use serde::{Deserialize, Serialize};

use super::config::WidgetType;

/// Number of columns of the dashboard grid
pub const GRID_COLUMNS: i32 = 12;

/// Last row a widget may start on
pub const MAX_ROW: i32 = 10_000;

/// Tallest widget in rows
pub const MAX_HEIGHT: i32 = 50;

/// Widget position and size in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayout {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Default for WidgetLayout {
    fn default() -> Self {
        Self { x: 0, y: 0, w: 4, h: 3 }
    }
}

impl WidgetLayout {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }.clamped()
    }

    pub fn overlaps(&self, other: &WidgetLayout) -> bool {
        self.x < other.x.saturating_add(other.w)
            && other.x < self.x.saturating_add(self.w)
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Keep the widget inside the grid: 1..=12 columns wide, 1..=MAX_HEIGHT rows high,
    /// starting no lower than MAX_ROW
    pub fn clamped(self) -> Self {
        let w = self.w.clamp(1, GRID_COLUMNS);
        let h = self.h.clamp(1, MAX_HEIGHT);
        let x = self.x.clamp(0, GRID_COLUMNS - w);
        let y = self.y.clamp(0, MAX_ROW);
        Self { x, y, w, h }
    }

    pub fn moved_by(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
        .clamped()
    }

    pub fn resized_by(self, dw: i32, dh: i32) -> Self {
        Self {
            w: self.w.saturating_add(dw),
            h: self.h.saturating_add(dh),
            ..self
        }
        .clamped()
    }

    /// First row below this widget
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }
}

/// Initial size for a new widget of the given type
pub fn default_size(widget_type: WidgetType) -> (i32, i32) {
    match widget_type {
        WidgetType::Kpi | WidgetType::Gauge => (3, 2),
        WidgetType::BarChart | WidgetType::LineChart => (6, 4),
        WidgetType::DonutChart => (4, 4),
        WidgetType::DataTable => (12, 5),
    }
}

/// Find the first free slot (top-to-bottom, left-to-right) for a `w`×`h` widget
pub fn place_new(existing: &[WidgetLayout], w: i32, h: i32) -> WidgetLayout {
    let size = WidgetLayout { x: 0, y: 0, w, h }.clamped();
    let max_y = existing
        .iter()
        .map(|l| l.clamped().bottom())
        .max()
        .unwrap_or(0)
        .min(MAX_ROW);

    for y in 0..=max_y {
        for x in 0..=(GRID_COLUMNS - size.w) {
            let candidate = WidgetLayout { x, y, ..size };
            if !existing.iter().any(|l| l.overlaps(&candidate)) {
                return candidate;
            }
        }
    }

    WidgetLayout { x: 0, y: max_y, ..size }
}

/// CSS grid placement (`grid-column` / `grid-row`) for a layout
pub fn css_grid_area(layout: &WidgetLayout) -> String {
    format!(
        "grid-column: {} / span {}; grid-row: {} / span {};",
        layout.x + 1,
        layout.w,
        layout.y + 1,
        layout.h
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_grid() {
        let l = WidgetLayout::new(10, -3, 6, 0);
        assert_eq!(l, WidgetLayout { x: 6, y: 0, w: 6, h: 1 });

        let too_wide = WidgetLayout::new(0, 0, 20, 2);
        assert_eq!(too_wide.w, GRID_COLUMNS);
    }

    #[test]
    fn overlap_detection() {
        let a = WidgetLayout::new(0, 0, 4, 2);
        assert!(a.overlaps(&WidgetLayout::new(3, 1, 2, 2)));
        assert!(!a.overlaps(&WidgetLayout::new(4, 0, 2, 2)));
        assert!(!a.overlaps(&WidgetLayout::new(0, 2, 4, 2)));
    }

    #[test]
    fn places_first_widget_at_origin() {
        assert_eq!(place_new(&[], 4, 3), WidgetLayout { x: 0, y: 0, w: 4, h: 3 });
    }

    #[test]
    fn places_next_to_existing_widgets() {
        let existing = [WidgetLayout::new(0, 0, 6, 4)];
        assert_eq!(place_new(&existing, 6, 4), WidgetLayout { x: 6, y: 0, w: 6, h: 4 });

        let full_row = [WidgetLayout::new(0, 0, 6, 4), WidgetLayout::new(6, 0, 6, 4)];
        assert_eq!(place_new(&full_row, 3, 2), WidgetLayout { x: 0, y: 4, w: 3, h: 2 });
    }

    #[test]
    fn fills_gaps_before_appending() {
        let existing = [WidgetLayout::new(0, 0, 3, 2), WidgetLayout::new(6, 0, 6, 6)];
        assert_eq!(place_new(&existing, 3, 2), WidgetLayout { x: 3, y: 0, w: 3, h: 2 });
    }

    #[test]
    fn move_and_resize_stay_inside() {
        let l = WidgetLayout::new(0, 0, 4, 3);
        assert_eq!(l.moved_by(-1, -1), l);
        assert_eq!(l.moved_by(20, 1), WidgetLayout { x: 8, y: 1, w: 4, h: 3 });
        assert_eq!(l.resized_by(-10, -10), WidgetLayout { x: 0, y: 0, w: 1, h: 1 });
    }

    #[test]
    fn huge_coordinates_are_bounded() {
        let far = WidgetLayout { x: 0, y: i32::MAX, w: 12, h: i32::MAX }.clamped();
        assert_eq!(far, WidgetLayout { x: 0, y: MAX_ROW, w: 12, h: MAX_HEIGHT });
        assert_eq!(far.moved_by(0, i32::MAX).y, MAX_ROW);
        assert_eq!(far.resized_by(0, i32::MAX).h, MAX_HEIGHT);

        let raw = WidgetLayout { x: 0, y: i32::MAX - 1, w: 12, h: 5 };
        assert_eq!(raw.bottom(), i32::MAX);
        assert!(!raw.overlaps(&WidgetLayout::new(0, 0, 4, 3)));
    }

    #[test]
    fn placement_after_far_away_widget_is_bounded() {
        let existing = [
            WidgetLayout::new(0, 0, 12, 2),
            WidgetLayout { x: 0, y: i32::MAX, w: 12, h: 5 },
        ];
        let placed = place_new(&existing, 3, 2);
        assert_eq!(placed, WidgetLayout { x: 0, y: 2, w: 3, h: 2 });
        assert!(placed.bottom() <= MAX_ROW + MAX_HEIGHT);
    }

    #[test]
    fn css_area_is_one_based() {
        let css = css_grid_area(&WidgetLayout::new(2, 1, 4, 3));
        assert_eq!(css, "grid-column: 3 / span 4; grid-row: 2 / span 3;");
    }
}
