//! Render the dashboard views to SVG without a browser.
//!
//! Examples:
//!   gradviz-snapshot
//!   gradviz-snapshot --data data --out out --year 2020 --model linear
//!   gradviz-snapshot --outcome risk --state CA --sector Public --select 110635
//!
//! Each filter flag maps to the dashboard action the matching control would
//! dispatch, so the files written here are what the browser would paint.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;

use gradviz::model::{Sector, SizeCategory};
use gradviz::whatif::Slider;
use gradviz::{Action, Dashboard, DashboardConfig, Dataset, ModelName, OutcomeKind, RecordKey};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_WIDTH: f64 = 1200.0;

#[derive(Debug, Default)]
struct Args {
    data: Option<PathBuf>,
    out: PathBuf,
    config: Option<PathBuf>,
    year: Option<i32>,
    model: Option<ModelName>,
    outcome: Option<OutcomeKind>,
    state: Option<String>,
    sectors: Vec<Sector>,
    sizes: Vec<SizeCategory>,
    select: Option<u32>,
    width: Option<f64>,
}

fn usage() -> ! {
    eprintln!("gradviz-snapshot: write dashboard views as SVG\n");
    eprintln!("Usage: gradviz-snapshot [options]\n");
    eprintln!("Options:");
    eprintln!("  --data <dir>         Directory with institutions.json and feature_importance.json");
    eprintln!("  --out <dir>          Output directory (default: out)");
    eprintln!("  --config <file>      Dashboard config JSON");
    eprintln!("  --year <yyyy>        Year filter (default: latest year in the data)");
    eprintln!("  --model <name>       linear | RandomForest | GradientBoosting");
    eprintln!("  --outcome <kind>     grad_rate | risk");
    eprintln!("  --state <xx>         Restrict to one state");
    eprintln!("  --sector <label>     Repeatable; only these sectors");
    eprintln!("  --size <label>       Repeatable; only these size categories");
    eprintln!("  --select <unitid>    Render the profile views for this institution");
    eprintln!("  --width <px>         Parent container width (default: 1200)");
    process::exit(1);
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

fn parse_args() -> Args {
    let mut args = Args {
        out: PathBuf::from("out"),
        ..Args::default()
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        if flag == "-h" || flag == "--help" {
            usage();
        }
        let Some(value) = it.next() else {
            usage();
        };
        match flag.as_str() {
            "--data" => args.data = Some(PathBuf::from(value)),
            "--out" => args.out = PathBuf::from(value),
            "--config" => args.config = Some(PathBuf::from(value)),
            "--year" => {
                args.year = Some(value.parse().unwrap_or_else(|_| fail("year must be a number")))
            }
            "--model" => {
                args.model = Some(ModelName::parse(&value).unwrap_or_else(|| {
                    fail("model must be linear | RandomForest | GradientBoosting")
                }))
            }
            "--outcome" => {
                args.outcome = Some(
                    OutcomeKind::parse(&value)
                        .unwrap_or_else(|| fail("outcome must be grad_rate | risk")),
                )
            }
            "--state" => args.state = Some(value),
            "--sector" => args.sectors.push(
                Sector::parse(&value)
                    .unwrap_or_else(|| fail("sector must be Public | Private nonprofit | For-profit")),
            ),
            "--size" => args.sizes.push(
                SizeCategory::parse(&value)
                    .unwrap_or_else(|| fail("size must be Small | Medium | Large")),
            ),
            "--select" => {
                args.select = Some(value.parse().unwrap_or_else(|_| fail("select takes a unitid")))
            }
            "--width" => {
                args.width = Some(
                    value
                        .parse::<f64>()
                        .ok()
                        .filter(|w| w.is_finite() && *w > 0.0)
                        .unwrap_or_else(|| fail("width must be a positive number")),
                )
            }
            _ => usage(),
        }
    }
    args
}

fn write_svg(dir: &Path, name: &str, svg: &str) -> Result<(), String> {
    let path = dir.join(name);
    std::fs::write(&path, svg).map_err(|e| format!("write {}: {e}", path.display()))?;
    info!(path = %path.display(), "wrote view");
    Ok(())
}

fn run(args: Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => DashboardConfig::load(path).map_err(|e| e.to_string())?,
        None => DashboardConfig::default(),
    };
    let data_dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data_dir));
    let dataset = Dataset::load_dir(&data_dir, &config.institutions_file, &config.importance_file)
        .map_err(|e| e.to_string())?;

    let mut dash = Dashboard::new(dataset, config);
    if let Some(year) = args.year {
        if !dash.dataset().years().contains(&year) {
            warn!(year, "year not present in the data; views will be empty");
        }
        dash.dispatch(Action::SelectYear(year));
    }
    if let Some(model) = args.model {
        dash.dispatch(Action::SelectModel(model));
    }
    if let Some(outcome) = args.outcome {
        dash.dispatch(Action::SelectOutcome(outcome));
    }
    if args.state.is_some() {
        dash.dispatch(Action::SelectState(args.state.clone()));
    }
    if !args.sectors.is_empty() {
        dash.dispatch(Action::SetSectors(args.sectors.iter().copied().collect::<BTreeSet<_>>()));
    }
    if !args.sizes.is_empty() {
        dash.dispatch(Action::SetSizes(args.sizes.iter().copied().collect::<BTreeSet<_>>()));
    }

    let width = args.width.unwrap_or(DEFAULT_WIDTH);
    std::fs::create_dir_all(&args.out)
        .map_err(|e| format!("create {}: {e}", args.out.display()))?;

    let map = dash.map_scene(width);
    info!(
        dots = map.scene.circle_count(),
        filtered = dash.state().filtered_indices().len(),
        "map rendered"
    );
    write_svg(&args.out, "map.svg", &map.scene.to_svg())?;
    write_svg(&args.out, "importance.svg", &dash.importance_scene(width).to_svg())?;

    let Some(unitid) = args.select else {
        return Ok(());
    };
    let key = RecordKey {
        unitid,
        year: dash.state().filters().year,
    };
    if dash.dispatch(Action::SelectInstitution(key)).is_empty() {
        return Err(format!("no record for {key}"));
    }

    if let Some(card) = dash.profile_card() {
        println!("{}", card.name);
        for (label, value) in card.rows() {
            println!("  {label}: {value}");
        }
    }
    if let Some(panel) = dash.whatif() {
        for &slider in Slider::all() {
            println!("  {}: {}", slider.label(), panel.label(slider));
        }
    }
    if let Some(scene) = dash.comparison_scene(width) {
        write_svg(&args.out, "comparison.svg", &scene.to_svg())?;
    }
    if let Some(trend) = dash.trend_scene(width) {
        write_svg(&args.out, "trend.svg", &trend.scene.to_svg())?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(parse_args()) {
        error!("{e}");
        process::exit(1);
    }
}
