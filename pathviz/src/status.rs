//! Status line, toasts and search statistics.

use std::fmt;
use std::time::Duration;

use pathviz_solver::Heuristic;

/// The status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready,
    Finding,
    PathFound,
    NoPath,
    Error,
    AnimationComplete,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Finding => "Finding path...",
            Self::PathFound => "Path found!",
            Self::NoPath => "No path found",
            Self::Error => "Error occurred",
            Self::AnimationComplete => "Animation complete",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a toast, mapped to display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Identifies a toast so that only its own expiry timer dismisses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub text: String,
    pub severity: Severity,
}

/// Holds at most one toast; a newer one replaces the older.
#[derive(Debug)]
pub struct Toasts {
    current: Option<Toast>,
    next_id: u64,
    ttl: Duration,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            next_id: 0,
            ttl,
        }
    }

    /// How long a toast stays up.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show `text`, returning the id to expire later.
    pub fn show(&mut self, text: impl Into<String>, severity: Severity) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        let text = text.into();
        log::debug!("toast {severity:?}: {text}");
        self.current = Some(Toast { id, text, severity });
        id
    }

    /// Dismiss the toast `id` if it is still the one shown.
    pub fn expire(&mut self, id: ToastId) -> bool {
        if self.current.as_ref().is_some_and(|t| t.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }
}

/// Numbers from the last search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub path_length: f64,
    pub nodes_explored: usize,
}

impl Stats {
    /// Algorithm label, e.g. `A* (Manhattan)`.
    pub fn algorithm(heuristic: Heuristic) -> String {
        format!("A* ({})", heuristic.label())
    }

    /// Panel lines; `-` stands in for numbers before the first search.
    pub fn lines(stats: Option<&Stats>, heuristic: Heuristic) -> [String; 3] {
        let (length, explored) = match stats {
            Some(s) => (s.path_length.to_string(), s.nodes_explored.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        [
            format!("Path length: {length}"),
            format!("Explored:    {explored}"),
            format!("Algorithm:   {}", Self::algorithm(heuristic)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings() {
        assert_eq!(Status::default().to_string(), "Ready");
        assert_eq!(Status::Finding.as_str(), "Finding path...");
        assert_eq!(Status::PathFound.as_str(), "Path found!");
        assert_eq!(Status::NoPath.as_str(), "No path found");
        assert_eq!(Status::Error.as_str(), "Error occurred");
        assert_eq!(Status::AnimationComplete.as_str(), "Animation complete");
    }

    #[test]
    fn newer_toast_wins() {
        let mut toasts = Toasts::new(Duration::from_millis(3000));
        let first = toasts.show("one", Severity::Info);
        let second = toasts.show("two", Severity::Error);
        // the first toast's timer must not dismiss the second
        assert!(!toasts.expire(first));
        assert_eq!(toasts.current().map(|t| t.text.as_str()), Some("two"));
        assert!(toasts.expire(second));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn stats_lines() {
        let stats = Stats {
            path_length: 54.0,
            nodes_explored: 312,
        };
        let lines = Stats::lines(Some(&stats), Heuristic::Euclidean);
        assert_eq!(lines[0], "Path length: 54");
        assert_eq!(lines[1], "Explored:    312");
        assert_eq!(lines[2], "Algorithm:   A* (Euclidean)");
        let blank = Stats::lines(None, Heuristic::Manhattan);
        assert_eq!(blank[0], "Path length: -");
    }
}
