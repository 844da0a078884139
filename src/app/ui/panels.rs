use eframe::egui::{self, Align, Context, Layout, Vec2};
use tracing::debug;

use jaring::interaction::InteractionController;
use jaring::selection::{SelectionState, edge_hints, filter, node_hints};
use jaring::{Canvas, LayoutEngine};

use super::super::{LaunchOptions, LoadedGraph, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        loaded: LoadedGraph,
        canvas: Canvas,
        previous: Option<SelectionState>,
    ) -> Self {
        let mut selection = previous.unwrap_or_default();
        let dropped = selection.retain_known(&loaded.graph);
        if dropped > 0 {
            debug!(dropped, "cleared stale selection after reload");
        }

        let mut model = Self {
            graph: loaded.graph,
            diagnostics: loaded.diagnostics,
            selection,
            visible: Default::default(),
            edge_hints: Vec::new(),
            node_hints: Vec::new(),
            engine: LayoutEngine::new(canvas, loaded.params),
            interaction: InteractionController::default(),
            params: loaded.params,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
        };
        model.refresh_view();
        model
    }

    /// Recomputes the visible subgraph and render hints, and hands the result to
    /// the layout engine, which restarts only if the layout identity changed.
    pub(in crate::app) fn refresh_view(&mut self) {
        self.visible = filter(&self.graph, &self.selection);
        self.edge_hints = edge_hints(&self.graph, &self.visible);
        self.node_hints = node_hints(&self.graph, &self.visible, &self.selection);

        if self
            .engine
            .load(&self.graph, &self.visible, self.selection.mode())
        {
            self.interaction.reset();
        }
    }

    pub(in crate::app) fn set_selection(&mut self, next: SelectionState) {
        if self.selection == next {
            return;
        }

        self.selection = next;
        self.refresh_view();
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        options: &LaunchOptions,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("jaring");
                    ui.separator();
                    ui.label(format!("payload: {}", options.payload.display()));
                    ui.label(format!("entities: {}", self.graph.node_count()));
                    ui.label(format!("transactions: {}", self.graph.edge_count()));
                    ui.label(format!("clusters: {}", self.graph.cluster_labels().len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload payload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let report = self.engine.last_report();
                        ui.label(format!(
                            "visible: {} nodes / {} edges  |  alpha {:.3}{}",
                            self.visible.nodes.len(),
                            self.visible.edges.len(),
                            report.alpha,
                            if report.running { "" } else { " (settled)" }
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading transaction graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
