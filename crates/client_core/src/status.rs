//! Status presenter: region and container handles shared between the page and
//! the controllers, plus the pure rendering of prediction results.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use shared::{
    domain::{RiskTier, StatusKind},
    protocol::PredictionResult,
};

const RESULT_SUFFIX: &str = "of Cardiovascular Disease";

/// What a region currently displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RegionView {
    #[default]
    Idle,
    Status {
        message: String,
        kind: StatusKind,
    },
    Risk(RiskTier),
}

impl RegionView {
    pub fn text(&self) -> String {
        match self {
            RegionView::Idle => String::new(),
            RegionView::Status { message, .. } => message.clone(),
            RegionView::Risk(tier) => format!("{} {RESULT_SUFFIX}", tier.label()),
        }
    }

    pub fn class(&self) -> String {
        match self {
            RegionView::Idle => "status-message".to_string(),
            RegionView::Status { kind, .. } => format!("status-message status-{}", kind.as_str()),
            RegionView::Risk(_) => "status-message status-success".to_string(),
        }
    }

    /// Markup for the region body. Risk results carry the tier's color token.
    pub fn markup(&self) -> String {
        match self {
            RegionView::Risk(tier) => format!(
                "<strong style=\"color: {};\">{}</strong> {RESULT_SUFFIX}",
                tier.color_token(),
                tier.label()
            ),
            other => other.text(),
        }
    }

    pub fn kind(&self) -> Option<StatusKind> {
        match self {
            RegionView::Status { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Handle to a status/result element. Clones address the same region.
#[derive(Debug, Clone, Default)]
pub struct StatusRegion {
    view: Arc<Mutex<RegionView>>,
}

impl StatusRegion {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegionView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, view: RegionView) {
        *self.lock() = view;
    }

    pub fn view(&self) -> RegionView {
        self.lock().clone()
    }

    pub fn text(&self) -> String {
        self.lock().text()
    }

    pub fn class(&self) -> String {
        self.lock().class()
    }
}

/// Handle to a section that stays hidden until first revealed.
#[derive(Debug, Clone, Default)]
pub struct Container {
    visible: Arc<AtomicBool>,
}

impl Container {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn reveal(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

pub fn show(
    region: &StatusRegion,
    message: impl Into<String>,
    kind: StatusKind,
    reveal: Option<&Container>,
) {
    region.set(RegionView::Status {
        message: message.into(),
        kind,
    });
    if let Some(container) = reveal {
        container.reveal();
    }
}

pub fn render_prediction(result: &PredictionResult) -> RegionView {
    RegionView::Risk(result.tier())
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
