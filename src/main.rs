mod app;
mod net;
mod util;

use clap::Parser;

use crate::net::SnapshotPaths;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Network snapshot JSON (nodes, links, sensors).
    #[arg(long)]
    network: String,

    /// Leak prediction snapshot JSON.
    #[arg(long)]
    predictions: Option<String>,

    /// Ground-truth leak snapshot JSON.
    #[arg(long)]
    ground_truth: Option<String>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let paths = SnapshotPaths {
        network: args.network,
        predictions: args.predictions,
        ground_truth: args.ground_truth,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "leakview",
        options,
        Box::new(move |cc| Ok(Box::new(app::LeakviewApp::new(cc, paths.clone())))),
    )
}
