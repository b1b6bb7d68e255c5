use std::collections::HashMap;

use eframe::egui::{
    self, Align2, Color32, CursorIcon, PointerButton, Rect, Rounding, ScrollArea, Sense, Stroke,
    Ui, Vec2,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Board, Task};
use crate::drag::{ColumnTarget, DragDecision, DragSession};
use crate::store::{TaskPatch, TaskStore};

const COLUMN_WIDTH: f32 = 300.0;
const COLUMN_SPACING: f32 = 12.0;
const ROW_HEIGHT: f32 = 44.0;
const ROW_SPACING: f32 = 8.0;

const COLUMN_COLORS: [Color32; 5] = [
    Color32::from_rgb(255, 157, 157),
    Color32::from_rgb(255, 231, 157),
    Color32::from_rgb(200, 255, 157),
    Color32::from_rgb(157, 255, 211),
    Color32::from_rgb(157, 190, 255),
];

/// Renders every board side by side and drives the drag controller.
/// Mutations go through the store exactly once per completed gesture;
/// everything drawn during a drag is preview-only.
pub struct BoardView {
    drag: Option<DragSession>,
    quick_add_drafts: HashMap<String, String>,
    edit_state: Option<EditState>,
    column_layouts: Vec<ColumnLayout>,
}

struct EditState {
    task_id: Uuid,
    board_id: String,
    text: String,
}

/// Geometry of one rendered column, refreshed each frame. A drag that
/// starts on the next frame snapshots from here.
#[derive(Clone)]
struct ColumnLayout {
    board_id: String,
    rect: Rect,
    row_rects: Vec<Rect>,
}

enum RowAction {
    Add {
        board_id: String,
        title: String,
    },
    Rename {
        task_id: Uuid,
        board_id: String,
        title: String,
    },
    Delete {
        task_id: Uuid,
        board_id: String,
    },
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView {
    pub fn new() -> Self {
        Self {
            drag: None,
            quick_add_drafts: HashMap::new(),
            edit_state: None,
            column_layouts: Vec::new(),
        }
    }

    pub fn show(&mut self, ui: &mut Ui, store: &mut TaskStore) {
        let prev_layouts = std::mem::take(&mut self.column_layouts);
        let mut actions: Vec<RowAction> = Vec::new();

        // Clone for iteration so row handlers can queue store actions
        // without fighting the borrow of the sequences being rendered.
        let boards: Vec<Board> = store.boards().to_vec();

        ScrollArea::horizontal()
            .id_source("board_horizontal_scroll")
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    for (board_idx, board) in boards.iter().enumerate() {
                        let column_rect = Rect::from_min_size(
                            ui.cursor().min,
                            Vec2::new(COLUMN_WIDTH, ui.available_height().max(400.0)),
                        );

                        let mut layout = ColumnLayout {
                            board_id: board.id.clone(),
                            rect: column_rect,
                            row_rects: Vec::new(),
                        };

                        ui.allocate_ui_at_rect(column_rect, |ui| {
                            self.render_column(
                                ui,
                                board,
                                board_idx,
                                column_rect,
                                &prev_layouts,
                                &mut layout,
                                &mut actions,
                            );
                        });

                        self.column_layouts.push(layout);
                        ui.add_space(COLUMN_SPACING);
                    }
                });
            });

        self.handle_drag(ui, store);
        self.apply_actions(actions, store);
    }

    #[allow(clippy::too_many_arguments)]
    fn render_column(
        &mut self,
        ui: &mut Ui,
        board: &Board,
        board_idx: usize,
        column_rect: Rect,
        prev_layouts: &[ColumnLayout],
        layout: &mut ColumnLayout,
        actions: &mut Vec<RowAction>,
    ) {
        let visible: Vec<&Task> = board.visible_tasks().collect();

        // Pending transfer target gets an outline.
        let is_target = self
            .drag
            .as_ref()
            .and_then(|s| s.target_board_id())
            .map_or(false, |id| id == board.id);
        if is_target {
            ui.painter().rect_stroke(
                column_rect,
                Rounding::same(6.0),
                Stroke::new(2.0, Color32::from_rgb(100, 150, 255)),
            );
        }

        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                let color = COLUMN_COLORS[board_idx % COLUMN_COLORS.len()];
                ui.colored_label(color, &board.name);
                ui.label(format!("({})", visible.len()));
            });
            ui.separator();

            // (source index, gap slot, gap height) when this column hosts
            // the active drag.
            let drag_preview = self
                .drag
                .as_ref()
                .filter(|s| s.source_board_id() == board.id)
                .map(|s| (s.source_index(), s.gap_slot(), s.shift_distance()));

            if visible.is_empty() {
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    ui.label("No tasks");
                });
            } else {
                let mut display_slot = 0;
                for (row_index, task) in visible.iter().enumerate() {
                    if let Some((source_index, gap_slot, gap)) = drag_preview {
                        if row_index == source_index {
                            // The grabbed row floats; its slot is previewed
                            // by the gap.
                            continue;
                        }
                        if display_slot == gap_slot {
                            ui.add_space(gap);
                        }
                    }

                    let rect =
                        self.render_task_row(ui, task, row_index, &board.id, prev_layouts, actions);
                    layout.row_rects.push(rect);
                    display_slot += 1;
                }

                if let Some((_, gap_slot, gap)) = drag_preview {
                    if gap_slot >= display_slot {
                        ui.add_space(gap);
                    }
                }
            }

            ui.add_space(ROW_SPACING);
            self.render_quick_add(ui, &board.id, actions);
        });
    }

    fn render_quick_add(&mut self, ui: &mut Ui, board_id: &str, actions: &mut Vec<RowAction>) {
        let draft = self.quick_add_drafts.entry(board_id.to_string()).or_default();

        let response = ui.add(
            egui::TextEdit::singleline(draft)
                .hint_text("Add a task...")
                .desired_width(COLUMN_WIDTH - 24.0),
        );

        if response.lost_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter))
            && !draft.trim().is_empty()
        {
            actions.push(RowAction::Add {
                board_id: board_id.to_string(),
                title: draft.trim().to_string(),
            });
            draft.clear();
        }
    }

    fn render_task_row(
        &mut self,
        ui: &mut Ui,
        task: &Task,
        row_index: usize,
        board_id: &str,
        prev_layouts: &[ColumnLayout],
        actions: &mut Vec<RowAction>,
    ) -> Rect {
        let editing = self
            .edit_state
            .as_ref()
            .map_or(false, |e| e.task_id == task.id);

        let size = Vec2::new(COLUMN_WIDTH - 16.0, ROW_HEIGHT);
        // Edit mode swallows pointer-down so typing can't start a drag.
        let sense = if editing {
            Sense::hover()
        } else {
            Sense::click_and_drag()
        };
        let response = ui.allocate_response(size, sense);

        if editing {
            self.render_row_editor(ui, response.rect, actions);
        } else {
            if self.drag.is_none() && response.drag_started_by(PointerButton::Primary) {
                self.begin_drag(&response, board_id, row_index, prev_layouts);
            }

            ui.painter().rect(
                response.rect,
                Rounding::same(4.0),
                Color32::from_rgb(250, 250, 250),
                Stroke::new(1.0, Color32::GRAY),
            );

            let mut start_edit = false;
            ui.allocate_ui_at_rect(response.rect.shrink(6.0), |ui| {
                ui.horizontal(|ui| {
                    ui.label(&task.title);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").clicked() {
                            actions.push(RowAction::Delete {
                                task_id: task.id,
                                board_id: board_id.to_string(),
                            });
                        }
                        if ui.small_button("✏").clicked() {
                            start_edit = true;
                        }
                    });
                });
            });

            if start_edit {
                self.edit_state = Some(EditState {
                    task_id: task.id,
                    board_id: board_id.to_string(),
                    text: task.title.clone(),
                });
            }
        }

        ui.add_space(ROW_SPACING);
        response.rect
    }

    fn render_row_editor(&mut self, ui: &mut Ui, rect: Rect, actions: &mut Vec<RowAction>) {
        ui.painter().rect(
            rect,
            Rounding::same(4.0),
            Color32::from_rgb(240, 245, 255),
            Stroke::new(1.0, Color32::GRAY),
        );

        let mut save = false;
        let mut cancel = false;

        ui.allocate_ui_at_rect(rect.shrink(6.0), |ui| {
            ui.horizontal(|ui| {
                if let Some(edit) = self.edit_state.as_mut() {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut edit.text).desired_width(size_for_editor()),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        save = true;
                    }
                }
                if ui.small_button("✓").clicked() {
                    save = true;
                }
                if ui.small_button("✗").clicked() {
                    cancel = true;
                }
            });
        });

        if save {
            if let Some(edit) = self.edit_state.take() {
                if !edit.text.trim().is_empty() {
                    actions.push(RowAction::Rename {
                        task_id: edit.task_id,
                        board_id: edit.board_id,
                        title: edit.text.trim().to_string(),
                    });
                }
            }
        } else if cancel {
            self.edit_state = None;
        }
    }

    fn begin_drag(
        &mut self,
        response: &egui::Response,
        board_id: &str,
        row_index: usize,
        prev_layouts: &[ColumnLayout],
    ) {
        let Some(layout) = prev_layouts.iter().find(|l| l.board_id == board_id) else {
            return;
        };

        let pointer = response
            .interact_pointer_pos()
            .unwrap_or_else(|| response.rect.center());
        let columns = prev_layouts
            .iter()
            .map(|l| ColumnTarget {
                board_id: l.board_id.clone(),
                rect: l.rect,
            })
            .collect();

        self.drag = DragSession::begin(
            board_id,
            row_index,
            pointer,
            &layout.row_rects,
            layout.rect,
            columns,
        );

        if self.drag.is_some() {
            debug!(board_id, row_index, "drag started");
        }
    }

    fn handle_drag(&mut self, ui: &mut Ui, store: &mut TaskStore) {
        if self.drag.is_none() {
            return;
        }

        if let Some(pos) = ui.ctx().pointer_interact_pos() {
            if let Some(session) = self.drag.as_mut() {
                session.update(pos);
            }
        }

        if let Some(session) = self.drag.as_ref() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            self.paint_floating_card(ui, session, store);
        }

        let released = ui.input(|i| i.pointer.primary_released());
        let any_down = ui.input(|i| i.pointer.any_down());

        if released {
            if let Some(session) = self.drag.take() {
                self.commit_decision(session, store);
            }
        } else if !any_down {
            // Pointer vanished without a release event (window lost the
            // pointer, gesture was cancelled); reset visuals, commit nothing.
            if let Some(session) = self.drag.take() {
                let _ = session.cancel();
                debug!("drag cancelled without release");
            }
        }
    }

    fn paint_floating_card(&self, ui: &Ui, session: &DragSession, store: &TaskStore) {
        let title = store
            .board(session.source_board_id())
            .and_then(|b| b.visible_tasks().nth(session.source_index()))
            .map(|t| t.title.clone())
            .unwrap_or_default();

        let rect = session.floating_rect();
        let painter = ui.ctx().layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drag_overlay"),
        ));

        painter.rect(
            rect,
            Rounding::same(4.0),
            Color32::from_rgba_unmultiplied(255, 255, 255, 235),
            Stroke::new(1.0, Color32::GRAY),
        );
        painter.text(
            rect.left_center() + Vec2::new(10.0, 0.0),
            Align2::LEFT_CENTER,
            title,
            egui::FontId::default(),
            Color32::BLACK,
        );
    }

    fn commit_decision(&mut self, session: DragSession, store: &mut TaskStore) {
        let source_board = session.source_board_id().to_string();
        let source_index = session.source_index();

        match session.finish() {
            DragDecision::Reorder { from, to } => {
                match store.reorder_tasks(from, to, &source_board) {
                    Ok(()) => debug!(from, to, board_id = %source_board, "drag committed reorder"),
                    Err(e) => warn!(error = %e, "reorder skipped"),
                }
            }
            DragDecision::Transfer { board_id } => {
                let task_id = store
                    .board(&source_board)
                    .and_then(|b| b.visible_tasks().nth(source_index))
                    .map(|t| t.id);

                match task_id {
                    Some(task_id) => {
                        match store.transfer_task(task_id, &source_board, &board_id, None) {
                            Ok(()) => debug!(
                                %task_id,
                                from = %source_board,
                                to = %board_id,
                                "drag committed transfer"
                            ),
                            Err(e) => warn!(error = %e, "transfer skipped"),
                        }
                    }
                    None => warn!(
                        board_id = %source_board,
                        source_index,
                        "dragged task vanished before commit"
                    ),
                }
            }
            DragDecision::None => debug!("drag ended without mutation"),
        }
    }

    fn apply_actions(&mut self, actions: Vec<RowAction>, store: &mut TaskStore) {
        for action in actions {
            let result = match action {
                RowAction::Add { board_id, title } => {
                    store.add_task(&title, &board_id).map(|_| ())
                }
                RowAction::Rename {
                    task_id,
                    board_id,
                    title,
                } => store.update_task(
                    task_id,
                    &board_id,
                    TaskPatch {
                        title: Some(title),
                        status: None,
                    },
                ),
                RowAction::Delete { task_id, board_id } => store.delete_task(task_id, &board_id),
            };

            if let Err(e) = result {
                debug!(error = %e, "store action skipped");
            }
        }
    }
}

fn size_for_editor() -> f32 {
    COLUMN_WIDTH - 90.0
}
