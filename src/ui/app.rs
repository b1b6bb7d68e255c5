use eframe::egui::{self, Context};
use tracing::trace;

use crate::store::TaskStore;
use crate::ui::views::BoardView;

pub struct BoardApp {
    store: TaskStore,
    board_view: BoardView,
    logged_revision: u64,
}

impl BoardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut store = TaskStore::new();
        // Seed one card so a fresh board isn't empty.
        let _ = store.add_task("Hello world", "backlog");

        Self {
            logged_revision: store.revision(),
            store,
            board_view: BoardView::new(),
        }
    }

    fn show_top_panel(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Task board");
            });
        });
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.show_top_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.board_view.show(ui, &mut self.store);
        });

        if self.store.revision() != self.logged_revision {
            self.logged_revision = self.store.revision();
            if let Ok(snapshot) = self.store.snapshot_json() {
                trace!(revision = self.logged_revision, %snapshot, "board state changed");
            }
        }
    }
}
