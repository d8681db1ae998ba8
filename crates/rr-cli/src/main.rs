//! `rr-router` — compute a route over prepared graph files and write the
//! requested output formats.
//!
//! Exit code 0 means every waypoint pair was routed; any gap (or any error)
//! exits non-zero so scripts can detect partial routes.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rr_core::{GeoPoint, Transport};
use rr_output::{
    OutputContext, annotate_route, write_gpx_route, write_gpx_track, write_html, write_text,
    write_text_all,
};
use rr_profile::Profile;
use rr_router::{RouterOptions, route};

#[derive(Parser)]
#[command(
    name = "rr-router",
    version,
    about = "Compute shortest or quickest road routes over prepared graph files"
)]
struct Args {
    /// Directory containing the graph files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Filename prefix of the graph files.
    #[arg(long, default_value = "rr")]
    prefix: String,

    /// Optimise for distance instead of duration.
    #[arg(long, conflicts_with = "quickest")]
    shortest: bool,

    /// Optimise for duration (the default).
    #[arg(long)]
    quickest: bool,

    /// Transport to route for.
    #[arg(long, default_value = "motorcar")]
    transport: String,

    /// JSON file with a full profile, overriding the built-in defaults.
    #[arg(long, value_name = "FILE")]
    profile_json: Option<PathBuf>,

    /// Maximum distance a waypoint may be from the network, metres.
    #[arg(long, default_value_t = 1_000.0)]
    snap_distance: f32,

    // ── Output selection (all formats when none is given) ─────────────────
    #[arg(long)]
    output_html: bool,
    #[arg(long)]
    output_gpx_track: bool,
    #[arg(long)]
    output_gpx_route: bool,
    #[arg(long)]
    output_text: bool,
    #[arg(long)]
    output_text_all: bool,

    /// Waypoints to visit in order, each as `lat,lon` in degrees.
    #[arg(required = true, num_args = 2.., value_name = "LAT,LON")]
    waypoints: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            warn!("one or more waypoint pairs could not be routed");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("rr-router: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<bool> {
    let graph = rr_graph::file::load(&args.dir, &args.prefix)
        .with_context(|| format!("loading graph '{}' from {}", args.prefix, args.dir.display()))?;

    let profile = load_profile(&args)?;
    let waypoints = parse_waypoints(&args.waypoints)?;

    let mut options =
        if args.quickest { RouterOptions::quickest() } else { RouterOptions::shortest() };
    options.snap_distance_m = args.snap_distance;

    let set = route(&graph, &profile, &options, &waypoints)?;
    let points = annotate_route(&graph, &set.fakes, &set.legs, &profile);
    let ctx = OutputContext::new(options.optimise);

    write_outputs(&args, &points, &ctx)?;
    Ok(set.is_complete())
}

fn load_profile(args: &Args) -> anyhow::Result<Profile> {
    if let Some(path) = &args.profile_json {
        let file = File::open(path)
            .with_context(|| format!("opening profile {}", path.display()))?;
        let profile: Profile = serde_json::from_reader(file)
            .with_context(|| format!("parsing profile {}", path.display()))?;
        return Ok(profile);
    }

    let transport = Transport::from_name(&args.transport)
        .with_context(|| format!("unknown transport {:?}", args.transport))?;
    Ok(Profile::builtin(transport))
}

fn parse_waypoints(raw: &[String]) -> anyhow::Result<Vec<GeoPoint>> {
    raw.iter()
        .map(|s| {
            let Some((lat, lon)) = s.split_once(',') else {
                bail!("waypoint {s:?} is not lat,lon");
            };
            let lat: f32 = lat.trim().parse().with_context(|| format!("latitude in {s:?}"))?;
            let lon: f32 = lon.trim().parse().with_context(|| format!("longitude in {s:?}"))?;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                bail!("waypoint {s:?} is out of range");
            }
            Ok(GeoPoint::new(lat, lon))
        })
        .collect()
}

fn write_outputs(
    args: &Args,
    points: &[rr_output::RoutePoint],
    ctx: &OutputContext,
) -> anyhow::Result<()> {
    let none_selected = !(args.output_html
        || args.output_gpx_track
        || args.output_gpx_route
        || args.output_text
        || args.output_text_all);

    let base = if args.quickest { "quickest" } else { "shortest" };
    let sink = |name: String| -> anyhow::Result<BufWriter<File>> {
        let file =
            File::create(&name).with_context(|| format!("cannot open {name} for writing"))?;
        Ok(BufWriter::new(file))
    };

    if args.output_html || none_selected {
        write_html(sink(format!("{base}.html"))?, points, ctx)?;
    }
    if args.output_gpx_track || none_selected {
        write_gpx_track(sink(format!("{base}-track.gpx"))?, points, ctx)?;
    }
    if args.output_gpx_route || none_selected {
        write_gpx_route(sink(format!("{base}-route.gpx"))?, points, ctx)?;
    }
    if args.output_text || none_selected {
        write_text(sink(format!("{base}.txt"))?, points, ctx)?;
    }
    if args.output_text_all || none_selected {
        write_text_all(sink(format!("{base}-all.txt"))?, points, ctx)?;
    }

    Ok(())
}
