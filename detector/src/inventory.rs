//! Per-class piece counts of a detection set

use crate::types::DetectionSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Count of one color class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub color: String,
    pub count: usize,
}

/// Piece counts per class, in the order classes first appear in the set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: Vec<ClassCount>,
}

impl Inventory {
    pub fn from_detections(detections: &DetectionSet) -> Self {
        let mut counts: Vec<ClassCount> = Vec::new();
        for det in detections {
            match counts.iter_mut().find(|c| c.color == det.color_class) {
                Some(entry) => entry.count += 1,
                None => counts.push(ClassCount {
                    color: det.color_class.clone(),
                    count: 1,
                }),
            }
        }
        Self { counts }
    }

    /// Pieces of one class; zero for classes never seen
    pub fn count_of(&self, color: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.color == color)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Total number of pieces
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[ClassCount] {
        &self.counts
    }

    /// Comma separated list such as `"2 red, 1 blue"`; empty when nothing was found
    pub fn to_pieces_list(&self) -> String {
        self.counts
            .iter()
            .map(|c| format!("{} {}", c.count, c.color))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "no pieces")
        } else {
            write!(f, "{}", self.to_pieces_list())
        }
    }
}

impl DetectionSet {
    /// Summarize this set as per-class counts
    pub fn inventory(&self) -> Inventory {
        Inventory::from_detections(self)
    }
}
