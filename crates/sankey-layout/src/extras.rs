//! Per-consumer decorations inserted between a band and its arrow head.
//!
//! The layout asks a [`ConsumerExtras`] strategy for each consumer. The
//! strategy returns plain data; the layout shifts the arrow and label right by
//! the returned length and records an [`ExtraPlacement`] for the renderer.

use sankey_core::geometry::{Point, Rect};

use crate::constants::RULE_ICON_SIZE;
use crate::route::Route;

/// State of an automation rule switch drawn on a consumer band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleState {
    pub closed: bool,
}

/// Decoration requested for one consumer band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumerExtra {
    /// Horizontal room the decoration takes before the arrow head.
    pub length: f64,
    /// Rule switch to overlay, if any.
    pub rule: Option<RuleState>,
}

/// Strategy deciding which consumers get a decoration.
pub trait ConsumerExtras {
    fn extras_for(&self, route: &Route) -> Option<ConsumerExtra>;
}

/// No decorations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtras;

impl ConsumerExtras for NoExtras {
    fn extras_for(&self, _route: &Route) -> Option<ConsumerExtra> {
        None
    }
}

/// Rule switch on every consumer band.
#[derive(Debug, Clone, Copy)]
pub struct RuleOverlay {
    pub closed: bool,
}

impl Default for RuleOverlay {
    fn default() -> Self {
        Self { closed: true }
    }
}

impl ConsumerExtras for RuleOverlay {
    fn extras_for(&self, _route: &Route) -> Option<ConsumerExtra> {
        Some(ConsumerExtra {
            length: RULE_ICON_SIZE * 2.0,
            rule: Some(RuleState {
                closed: self.closed,
            }),
        })
    }
}

impl<F> ConsumerExtras for F
where
    F: Fn(&Route) -> Option<ConsumerExtra>,
{
    fn extras_for(&self, route: &Route) -> Option<ConsumerExtra> {
        self(route)
    }
}

/// Where a consumer decoration landed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraPlacement {
    pub route_id: Option<String>,
    /// Band extension filled with the consumer color.
    pub rect: Rect,
    pub rule: Option<RuleState>,
    /// Centre of the rule icon, when `rule` is set.
    pub icon_center: Option<Point>,
}

impl ExtraPlacement {
    pub(crate) fn new(route: &Route, extra: ConsumerExtra, top_left: Point, width: f64, pad: f64) -> Self {
        let rect = Rect::new(top_left.x, top_left.y, extra.length + pad, width);
        let icon_center = extra
            .rule
            .map(|_| Point::new(top_left.x + extra.length / 2.0, top_left.y + width / 2.0));
        Self {
            route_id: route.id.clone(),
            rect,
            rule: extra.rule,
            icon_center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_extras_is_empty() {
        assert_eq!(NoExtras.extras_for(&Route::new("tv", 1.0)), None);
    }

    #[test]
    fn rule_overlay_reserves_two_icons() {
        let extra = RuleOverlay::default()
            .extras_for(&Route::new("tv", 1.0))
            .unwrap();
        assert_eq!(extra.length, 60.0);
        assert_eq!(extra.rule, Some(RuleState { closed: true }));
    }

    #[test]
    fn closures_are_strategies() {
        let only_tv = |route: &Route| {
            (route.id() == Some("tv")).then_some(ConsumerExtra {
                length: 12.0,
                rule: None,
            })
        };
        assert!(only_tv.extras_for(&Route::new("tv", 1.0)).is_some());
        assert!(only_tv.extras_for(&Route::new("oven", 1.0)).is_none());
    }

    #[test]
    fn placement_centres_icon() {
        let extra = RuleOverlay::default()
            .extras_for(&Route::new("tv", 1.0))
            .unwrap();
        let placed = ExtraPlacement::new(
            &Route::new("tv", 1.0),
            extra,
            Point::new(100.0, 20.0),
            10.0,
            0.5,
        );
        assert_eq!(placed.rect, Rect::new(100.0, 20.0, 60.5, 10.0));
        assert_eq!(placed.icon_center, Some(Point::new(130.0, 25.0)));
        assert_eq!(placed.route_id.as_deref(), Some("tv"));
    }
}
