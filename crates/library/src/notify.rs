//! Structured events handed to whoever wants to hear about library changes.
//!
//! The library only emits [`Event`]s; delivery (chat webhooks, media-server
//! rescans) lives behind the [`Notifier`] trait.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ManualReason {
    /// Both releases scored the same.
    #[display("tied score of {_0}")]
    Tie(i32),
    /// More than one library folder matched the series name.
    #[display("ambiguous folder match")]
    AmbiguousMatch,
    /// A single release would replace a multi-volume release that holds more.
    #[display("partial overlap with a multi-volume release")]
    PartialOverlap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A release with no counterpart was moved into its series folder.
    NewRelease { series: String, name: String, location: PathBuf },
    /// A download replaced an existing release.
    Upgrade {
        series: String,
        before: Vec<String>,
        after: String,
        existing_score: i32,
        downloaded_score: i32,
        location: PathBuf,
    },
    /// A release was deleted because another copy was kept.
    DuplicateDeleted { name: String, kept: PathBuf },
    /// Nothing was changed; someone has to decide by hand.
    ManualDecision {
        name: String,
        candidates: Vec<PathBuf>,
        reason: ManualReason,
    },
    /// No library folder matched the release.
    Unmatched { name: String, series: String },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, event: &Event);
}

/// Emits every event as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &Event) {
        match event {
            Event::NewRelease { series, name, location } => {
                tracing::info!(%series, %name, location = %location.display(), "New release added");
            },
            Event::Upgrade {
                series,
                before,
                after,
                existing_score,
                downloaded_score,
                location,
            } => tracing::info!(
                %series,
                before = ?before,
                %after,
                existing_score,
                downloaded_score,
                location = %location.display(),
                "Upgrade performed"
            ),
            Event::DuplicateDeleted { name, kept } => {
                tracing::info!(%name, kept = %kept.display(), "Duplicate deleted");
            },
            Event::ManualDecision { name, candidates, reason } => {
                tracing::warn!(%name, candidates = ?candidates, %reason, "Manual decision required");
            },
            Event::Unmatched { name, series } => tracing::info!(%name, %series, "No matching series folder"),
        }
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, event: &Event) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_order() {
        let recorder = Recorder::default();
        let unmatched = Event::Unmatched {
            name: "Beta c005.cbz".to_string(),
            series: "Beta".to_string(),
        };
        let deleted = Event::DuplicateDeleted {
            name: "Alpha v01.cbz".to_string(),
            kept: PathBuf::from("/library/Alpha/Alpha v01.cbz"),
        };
        recorder.notify(&unmatched);
        recorder.notify(&deleted);
        assert_eq!(recorder.events(), vec![unmatched, deleted]);
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(ManualReason::Tie(3).to_string(), "tied score of 3");
    }
}
