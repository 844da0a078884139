mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph payload exported by the analysis backend.
    #[arg(long)]
    payload: PathBuf,

    /// Optional JSON file overriding layout tunables.
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "jaring",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::JaringApp::new(
                cc,
                app::LaunchOptions {
                    payload: args.payload.clone(),
                    params: args.params.clone(),
                    canvas: jaring::Canvas::new(args.width, args.height),
                },
            )))
        }),
    )
}
