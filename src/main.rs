mod catalog;
mod gateway;
mod present;
mod workflow;

use anyhow::{bail, Context, Result};
use catalog::Catalog;
use clap::Parser;
use gateway::{BackendGateway, HttpGateway};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use present::{DirectorySink, PreviewBackground, ResultSink};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use workflow::{InputImage, Orchestrator, SelectionSet, Session};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image file
    image: Option<PathBuf>,

    /// Models to run, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "rembg")]
    models: Vec<String>,

    /// Run every model the backend advertises
    #[arg(long)]
    all_models: bool,

    /// Directory for result images
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Backend base URL (falls back to BGRM_BACKEND_URL, then http://localhost:8000)
    #[arg(long)]
    backend_url: Option<String>,

    /// Also write each result composited over a backdrop as preview-<model>.png
    #[arg(long, value_enum)]
    preview_bg: Option<PreviewBackground>,

    /// List the models the backend supports and exit
    #[arg(long)]
    list_models: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let base_url = HttpGateway::resolve_base_url(args.backend_url.as_deref());
    tracing::info!("bgrm starting");
    tracing::info!("Backend: {}", base_url);

    let gateway = gateway::create_default_gateway(&base_url);

    // One catalog fetch per run; failure silently falls back
    let catalog = Catalog::load(gateway.as_ref()).await;
    if catalog.is_fallback() {
        tracing::info!("Backend catalog unavailable, using built-in model list");
    }

    if args.list_models {
        for model in catalog.models() {
            println!("{}", model);
        }
        return Ok(());
    }

    let image_path = args
        .image
        .clone()
        .context("An input image is required (see --help)")?;

    // Build the selection from the catalog plus the command line
    let mut selection = SelectionSet::new(catalog.models());
    if args.all_models {
        selection.select_all();
    } else {
        for model in &args.models {
            if !selection.toggle(model, true) {
                bail!(
                    "Unknown model '{}' (available: {})",
                    model,
                    catalog.models().join(", ")
                );
            }
        }
    }

    let input = InputImage::from_path(&image_path)
        .with_context(|| format!("Failed to load {}", image_path.display()))?;
    tracing::info!(
        "Input: {} ({}x{}, aspect {:.2})",
        input.file_name,
        input.width,
        input.height,
        input.aspect_ratio()
    );

    let mut session = Session::new();
    session.set_image(input);

    if !session.can_submit(&selection) {
        tracing::info!("Nothing to do: no models selected");
        return Ok(());
    }
    tracing::info!("Models: {}", selection.models().join(", "));

    let mut sink = DirectorySink::new(&args.out_dir, args.preview_bg)
        .context("Failed to prepare output directory")?;

    run_submission(&mut session, &selection, gateway, &mut sink).await
}

/// Drive one submission to completion: fan out, then drain outcomes as they
/// settle, writing each completed output immediately.
async fn run_submission<S>(
    session: &mut Session,
    selection: &SelectionSet,
    gateway: Arc<dyn BackendGateway>,
    sink: &mut S,
) -> Result<()>
where
    S: ResultSink,
{
    let image = session.image().context("No input image present")?;
    let generation = session.begin_submission();

    let orchestrator = Orchestrator::new(gateway);
    let mut outcomes = orchestrator.submit(generation, image, selection);

    // One spinner per model, finished as its request settles
    let progress = MultiProgress::new();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .context("Invalid progress template")?;
    let mut spinners: HashMap<String, ProgressBar> = HashMap::new();
    for model in selection.models() {
        let pb = progress.add(ProgressBar::new_spinner());
        pb.set_style(style.clone());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("{}: processing...", model));
        spinners.insert(model, pb);
    }

    let mut failures = Vec::new();
    while let Some(outcome) = outcomes.recv().await {
        let spinner = spinners.get(&outcome.model);
        match outcome.result {
            Ok(bytes) => {
                if !session.record_output(outcome.generation, &outcome.model, bytes) {
                    continue;
                }
                let bytes = session
                    .output(&outcome.model)
                    .context("Recorded output missing")?;
                let path = sink.write_output(&outcome.model, bytes)?;
                if let Some(pb) = spinner {
                    pb.finish_with_message(format!(
                        "{}: done -> {}",
                        outcome.model,
                        path.display()
                    ));
                }
                tracing::info!("{} finished, wrote {}", outcome.model, path.display());
            }
            Err(e) => {
                if let Some(pb) = spinner {
                    pb.finish_with_message(format!("{}: failed", outcome.model));
                }
                let message = e.to_string();
                tracing::error!("{}", message);
                failures.push(message);
            }
        }
    }

    tracing::info!(
        "{} of {} models produced an output",
        session.output_count(),
        selection.len()
    );

    // Completed outputs stay on disk even when some models failed
    if !failures.is_empty() {
        bail!("{}", failures.join("; "));
    }
    Ok(())
}
