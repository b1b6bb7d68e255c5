//! Pointer-driven drag engine for reordering and cross-column transfer.
//!
//! The session is pure geometry: it takes rectangles and pointer positions
//! and computes a [`DragDecision`]. Rendering side effects (the floating
//! card, the preview gap, column highlights) live in the view layer, which
//! queries the session each frame. The backing store is touched exactly
//! once per completed gesture, via the decision, and never during it.

use eframe::egui::{Pos2, Rect};

use crate::utils::geometry::point_in_rect;

/// The single mutation a completed gesture is allowed to commit.
#[derive(Debug, Clone, PartialEq)]
pub enum DragDecision {
    /// Move the task from `from` to `to` within the source board.
    Reorder { from: usize, to: usize },
    /// Append the task to another board.
    Transfer { board_id: String },
    /// Pure visual reset, nothing to commit.
    None,
}

/// A column's hit rectangle, captured once at gesture start.
#[derive(Debug, Clone)]
pub struct ColumnTarget {
    pub board_id: String,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
struct SiblingSlot {
    /// Index in the source board's visible sequence.
    index: usize,
    /// On-screen rect at gesture start.
    rect: Rect,
    /// Whether the slot is currently displaced to keep the gap open.
    shifted: bool,
}

/// Ephemeral state of one pointer gesture, from press to release. Holds a
/// geometry snapshot taken at gesture start; column rects are not
/// re-measured while the drag is in flight.
pub struct DragSession {
    source_board_id: String,
    source_index: usize,
    destination_index: Option<usize>,
    target_board_id: Option<String>,
    origin: Pos2,
    pointer: Pos2,
    item_rect: Rect,
    shift_distance: f32,
    siblings: Vec<SiblingSlot>,
    source_column_rect: Rect,
    columns: Vec<ColumnTarget>,
}

impl DragSession {
    /// Starts a session over the row at `source_index`. `row_rects` are
    /// the source column's visible rows in sequence order. Siblings below
    /// the grabbed row start shifted: the gap they leave at the original
    /// slot is the default destination. Returns `None` when the index does
    /// not name a row.
    pub fn begin(
        source_board_id: impl Into<String>,
        source_index: usize,
        pointer: Pos2,
        row_rects: &[Rect],
        source_column_rect: Rect,
        columns: Vec<ColumnTarget>,
    ) -> Option<Self> {
        let item_rect = *row_rects.get(source_index)?;

        // Inter-item margin, measured from the gap between the first two
        // rows; zero when the column holds fewer than two.
        let margin = if row_rects.len() >= 2 {
            (row_rects[1].top() - row_rects[0].bottom()).max(0.0)
        } else {
            0.0
        };

        let siblings = row_rects
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != source_index)
            .map(|(index, rect)| SiblingSlot {
                index,
                rect: *rect,
                shifted: index > source_index,
            })
            .collect();

        Some(Self {
            source_board_id: source_board_id.into(),
            source_index,
            destination_index: None,
            target_board_id: None,
            origin: pointer,
            pointer,
            item_rect,
            shift_distance: item_rect.height() + margin,
            siblings,
            source_column_rect,
            columns,
        })
    }

    /// One pointer-move tick. Over the source column, toggles sibling
    /// shifts on midpoint crossings and tracks the tentative destination;
    /// anywhere else, tracks at most one pending transfer target. The two
    /// are mutually exclusive per tick: the source column always clears
    /// the target, and a foreign column never alters the destination.
    pub fn update(&mut self, pointer: Pos2) {
        self.pointer = pointer;

        if point_in_rect(self.source_column_rect, pointer.x, pointer.y) {
            self.target_board_id = None;
            self.update_destination();
        } else {
            self.target_board_id = self
                .columns
                .iter()
                .find(|c| point_in_rect(c.rect, pointer.x, pointer.y))
                .map(|c| c.board_id.clone());
        }
    }

    fn update_destination(&mut self) {
        let floating = self.floating_rect();
        let mut destination = self.destination_index;

        for sibling in &mut self.siblings {
            let started_shifted = sibling.index > self.source_index;
            let offset = match (started_shifted, sibling.shifted) {
                (true, false) => -self.shift_distance,
                (false, true) => self.shift_distance,
                _ => 0.0,
            };
            let mid = sibling.rect.center().y + offset;

            if mid >= floating.top() && mid <= floating.bottom() {
                // Toggling moves the sibling a full slot away, so its
                // midpoint leaves the floating span and the crossing fires
                // exactly once per pass.
                let current = destination.unwrap_or(self.source_index);
                if sibling.shifted {
                    sibling.shifted = false;
                    destination = Some(current + 1);
                } else {
                    sibling.shifted = true;
                    destination = Some(current.saturating_sub(1));
                }
            }
        }

        self.destination_index = destination;
    }

    /// Ends the gesture and yields the one mutation to commit, if any.
    /// A recorded destination index takes priority over a recorded
    /// transfer target.
    pub fn finish(self) -> DragDecision {
        if let Some(to) = self.destination_index {
            DragDecision::Reorder {
                from: self.source_index,
                to,
            }
        } else if let Some(board_id) = self.target_board_id {
            DragDecision::Transfer { board_id }
        } else {
            DragDecision::None
        }
    }

    /// Gesture end without a release event (pointer cancel or loss).
    /// Identical to releasing with nothing recorded.
    pub fn cancel(self) -> DragDecision {
        DragDecision::None
    }

    pub fn source_board_id(&self) -> &str {
        &self.source_board_id
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn destination_index(&self) -> Option<usize> {
        self.destination_index
    }

    pub fn target_board_id(&self) -> Option<&str> {
        self.target_board_id.as_deref()
    }

    /// The dragged row's rect translated by the cumulative pointer delta.
    pub fn floating_rect(&self) -> Rect {
        self.item_rect.translate(self.pointer - self.origin)
    }

    /// Distance displaced siblings move: dragged height plus margin.
    pub fn shift_distance(&self) -> f32 {
        self.shift_distance
    }

    /// Display slot the open gap currently occupies within the source
    /// column's sequence with the dragged row removed.
    pub fn gap_slot(&self) -> usize {
        self.destination_index.unwrap_or(self.source_index)
    }

    pub fn is_shifted(&self, sibling_index: usize) -> bool {
        self.siblings
            .iter()
            .find(|s| s.index == sibling_index)
            .map(|s| s.shifted)
            .unwrap_or(false)
    }
}
