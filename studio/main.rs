/// ferrite-digits Studio
///
/// Serves a trained network over HTTP so digits can be classified from an
/// uploaded image. Synchronous tiny_http server, one thread per request.
///
/// Run with:
///   cargo run --bin studio --release -- --weights WeightsBiasesJSON.txt
/// Then open http://127.0.0.1:7878
///
/// Routes:
///   GET  /         upload form
///   POST /predict  multipart image upload, JSON prediction
///   GET  /model    the loaded parameters as JSON

mod handlers;
mod routes;
mod state;
mod util;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ferrite_digits::logging::init_logging;
use ferrite_digits::ParameterExport;
use tiny_http::Server;
use tracing::info;

use state::StudioState;

#[derive(Parser)]
#[command(name = "studio", version)]
struct Args {
    /// JSON parameters written by `ferrite-digits train`
    #[arg(long, value_name = "PATH", default_value = "WeightsBiasesJSON.txt")]
    weights: PathBuf,
    #[arg(long, value_name = "HOST:PORT", default_value = "127.0.0.1:7878")]
    addr: String,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let export = ParameterExport::load_json(&args.weights)?;
    let shared_state = Arc::new(StudioState::new(export)?);
    let server = Server::http(&args.addr)
        .map_err(|e| format!("could not bind {}: {}", args.addr, e))?;

    info!(
        addr = %args.addr,
        shape = %shared_state.network.shape(),
        weights = %args.weights.display(),
        "studio listening"
    );

    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}
