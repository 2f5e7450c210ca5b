//! Badge and modal presentation state
//!
//! Pure view state: the host layer renders whatever this says. Badge and
//! modal are singletons, lazily created on first use and hidden rather
//! than destroyed between interactions. The modal only ever appears as a
//! result of a blocked submission, never proactively.

pub mod geometry;

use serde::Serialize;
use snip_core::{Summary, Verdict};

use geometry::{Point, Rect, Size, Viewport, anchor_near};

#[derive(Debug, Clone, Serialize)]
pub struct Badge {
    pub visible: bool,
    pub summary: Option<Summary>,
    pub position: Point,
}

impl Badge {
    fn hidden() -> Self {
        Self {
            visible: false,
            summary: None,
            position: Point { x: 0.0, y: 0.0 },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Modal {
    pub visible: bool,
    pub verdict: Option<Verdict>,
}

impl Modal {
    fn hidden() -> Self {
        Self {
            visible: false,
            verdict: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Presenter {
    badge: Option<Badge>,
    modal: Option<Modal>,
    badge_size: Size,
}

const DEFAULT_BADGE_SIZE: Size = Size {
    width: 120.0,
    height: 28.0,
};

impl Presenter {
    pub fn new() -> Self {
        Self {
            badge: None,
            modal: None,
            badge_size: DEFAULT_BADGE_SIZE,
        }
    }

    /// Refresh the badge against the latest summary and target geometry.
    /// Visible only when there is removable content and the target is
    /// inside the viewport; recompute on every scroll/resize/edit.
    pub fn update_badge(
        &mut self,
        summary: Option<&Summary>,
        target_rect: Option<Rect>,
        viewport: Viewport,
    ) {
        let badge = self.badge.get_or_insert_with(Badge::hidden);

        let (Some(summary), Some(rect)) = (summary, target_rect) else {
            badge.visible = false;
            return;
        };
        if summary.is_empty() || !rect.intersects(viewport.bounds()) {
            badge.visible = false;
            return;
        }

        badge.visible = true;
        badge.summary = Some(summary.clone());
        badge.position = anchor_near(rect, self.badge_size, viewport);
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    /// Show the modal for a blocked submission.
    pub fn show_modal(&mut self, verdict: &Verdict) {
        let modal = self.modal.get_or_insert_with(Modal::hidden);
        modal.visible = true;
        modal.verdict = Some(verdict.clone());
    }

    pub fn hide_modal(&mut self) {
        if let Some(modal) = self.modal.as_mut() {
            modal.visible = false;
        }
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_core::SummaryHit;

    fn summary(removed: usize) -> Summary {
        Summary {
            removed_chars: removed,
            saved_tokens: removed / 4,
            hits: if removed > 0 {
                vec![SummaryHit {
                    id: "politeness".to_string(),
                    explain: "x".to_string(),
                    count: 1,
                }]
            } else {
                Vec::new()
            },
        }
    }

    fn viewport() -> Viewport {
        Viewport {
            width: 800.0,
            height: 600.0,
        }
    }

    fn rect(x: f64, y: f64) -> Rect {
        Rect {
            x,
            y,
            width: 300.0,
            height: 40.0,
        }
    }

    #[test]
    fn test_badge_visible_with_removable_content() {
        let mut presenter = Presenter::new();
        presenter.update_badge(Some(&summary(12)), Some(rect(100.0, 100.0)), viewport());

        let badge = presenter.badge().unwrap();
        assert!(badge.visible);
        assert!(badge.summary.is_some());
    }

    #[test]
    fn test_badge_hidden_when_nothing_to_remove() {
        let mut presenter = Presenter::new();
        presenter.update_badge(Some(&summary(0)), Some(rect(100.0, 100.0)), viewport());
        assert!(!presenter.badge().unwrap().visible);
    }

    #[test]
    fn test_badge_hidden_when_target_off_screen() {
        let mut presenter = Presenter::new();
        presenter.update_badge(Some(&summary(12)), Some(rect(100.0, 2000.0)), viewport());
        assert!(!presenter.badge().unwrap().visible);
    }

    #[test]
    fn test_badge_position_clamped_to_viewport() {
        let mut presenter = Presenter::new();
        // Target hugging the right edge; the badge must stay inside.
        presenter.update_badge(Some(&summary(12)), Some(rect(780.0, 100.0)), viewport());

        let badge = presenter.badge().unwrap();
        assert!(badge.visible);
        assert!(badge.position.x + DEFAULT_BADGE_SIZE.width <= 800.0);
        assert!(badge.position.x >= 0.0);
    }

    #[test]
    fn test_badge_is_singleton_hidden_not_destroyed() {
        let mut presenter = Presenter::new();
        presenter.update_badge(Some(&summary(12)), Some(rect(100.0, 100.0)), viewport());
        presenter.update_badge(None, None, viewport());

        // Instance survives, merely hidden.
        let badge = presenter.badge().unwrap();
        assert!(!badge.visible);
        assert!(badge.summary.is_some());
    }

    #[test]
    fn test_modal_lifecycle() {
        let mut presenter = Presenter::new();
        assert!(presenter.modal().is_none());

        let verdict = Verdict {
            should_block: true,
            cleaned: Some("x".to_string()),
            summary: None,
        };
        presenter.show_modal(&verdict);
        assert!(presenter.modal().unwrap().visible);

        presenter.hide_modal();
        let modal = presenter.modal().unwrap();
        assert!(!modal.visible);
        assert!(modal.verdict.is_some());
    }
}
