use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context, Vec2};
use tracing::{info, warn};

use jaring::graph::{Graph, TransformDiagnostics};
use jaring::interaction::InteractionController;
use jaring::selection::{EdgeHint, NodeHint, SelectionState, VisibleGraph};
use jaring::{Canvas, LayoutEngine, LayoutParams, load_payload};

mod graph;
mod render_utils;
mod ui;

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub payload: PathBuf,
    pub params: Option<PathBuf>,
    pub canvas: Canvas,
}

pub struct JaringApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadedGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct LoadedGraph {
    graph: Graph,
    diagnostics: TransformDiagnostics,
    params: LayoutParams,
}

struct ViewModel {
    graph: Graph,
    diagnostics: TransformDiagnostics,
    selection: SelectionState,
    visible: VisibleGraph,
    edge_hints: Vec<EdgeHint>,
    node_hints: Vec<NodeHint>,
    engine: LayoutEngine,
    interaction: InteractionController,
    params: LayoutParams,
    search: String,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
}

fn load_graph(options: &LaunchOptions) -> Result<LoadedGraph> {
    let payload = load_payload(&options.payload)?;
    let transformed = payload.transform();

    let params = match &options.params {
        Some(path) => LayoutParams::load(path).unwrap_or_else(|error| {
            warn!(error = %format!("{error:#}"), "falling back to default layout params");
            LayoutParams::default()
        }),
        None => LayoutParams::default(),
    };

    let diagnostics = transformed.diagnostics;
    if !diagnostics.is_clean() {
        warn!(
            duplicate_entities = diagnostics.duplicate_entities,
            dangling_transactions = diagnostics.dangling_transactions,
            "payload contained records that were dropped"
        );
    }
    info!(
        nodes = transformed.graph.node_count(),
        edges = transformed.graph.edge_count(),
        "graph loaded"
    );

    Ok(LoadedGraph {
        graph: transformed.graph,
        diagnostics,
        params,
    })
}

impl JaringApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(options.clone());
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(options: LaunchOptions) -> Receiver<Result<LoadedGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph(&options).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(options: LaunchOptions) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(options),
        }
    }

    fn ready(canvas: Canvas, loaded: LoadedGraph, previous: Option<SelectionState>) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(loaded, canvas, previous)))
    }
}

impl eframe::App for JaringApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(loaded)) => {
                        transition = Some(Self::ready(self.options.canvas, loaded, None));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading transaction graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load transaction graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    transition = Some(Self::start_load(self.options.clone()));
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.options, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.options.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(loaded)) => {
                            let previous = Some(model.selection.clone());
                            transition = Some(Self::ready(self.options.canvas, loaded, previous));
                        }
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
