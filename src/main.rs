use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use std::path::PathBuf;
use tracing::{error, info, warn};

use sum_parameters::error::SettingsError;
use sum_parameters::export::{export_csv, export_json, SummaryReport};
use sum_parameters::headless::{build_selection, render_table};
use sum_parameters::logging;
use sum_parameters::model::{IfcProject, Selection};
use sum_parameters::parser::parse_ifc_file;
use sum_parameters::settings::{self, Settings, SettingsStore, DEFAULT_FILE_NAME};
use sum_parameters::sum::SumSession;
use sum_parameters::ui::App;

#[derive(Parser, Debug)]
#[command(name = "sum-parameters")]
#[command(about = "Sum Parameters - add up numeric parameters shared by IFC elements")]
#[command(version)]
struct Args {
    /// Path to IFC file
    #[arg(required = true)]
    file: PathBuf,

    /// Element ids to pick (STEP instance numbers, without '#')
    #[arg(long = "select", value_name = "ID", num_args = 1.., value_delimiter = ',')]
    select: Vec<u64>,

    /// Pick every element of an entity type, e.g. IFCWALL
    #[arg(long = "entity", value_name = "TYPE")]
    entity: Vec<String>,

    /// Ratio applied to the sums (0.0001, 0.001, ... 10000)
    #[arg(long)]
    ratio: Option<f64>,

    /// Digits after the decimal point
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=10))]
    rounding: Option<i32>,

    /// Export the summary table to CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export the summary table to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Print the summary table and exit
    #[arg(long)]
    print: bool,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

impl Args {
    fn is_headless(&self) -> bool {
        self.print || self.csv.is_some() || self.json.is_some()
    }

    fn settings_store(&self) -> Result<SettingsStore, SettingsError> {
        match &self.settings {
            Some(path) => Ok(SettingsStore::new(path)),
            None => SettingsStore::in_config_dir(DEFAULT_FILE_NAME),
        }
    }

    fn apply_overrides(&self, session: &mut SumSession) -> Result<()> {
        if let Some(ratio) = self.ratio {
            if !session.set_ratio(ratio) {
                bail!("unsupported ratio {ratio}; use a power of ten from 0.0001 to 10000");
            }
        }
        if let Some(rounding) = self.rounding {
            session.set_rounding(rounding);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if args.is_headless() {
        logging::init_stderr()?;
    } else {
        let log_dir = settings::app_dir().unwrap_or_else(|_| std::env::temp_dir());
        logging::init_file(&log_dir.join(logging::LOG_FILE_NAME))?;
    }

    let project = parse_ifc_file(&args.file)
        .wrap_err_with(|| format!("could not read {}", args.file.display()))?;
    info!(
        file = %args.file.display(),
        elements = project.total_elements(),
        "model loaded"
    );

    let (loaded, store) = match args.settings_store() {
        Ok(store) => (store.load(), Some(store)),
        Err(e) => (Err(e), None),
    };

    if args.is_headless() {
        run_headless(&args, &project, loaded)
    } else {
        run_tui(&args, project, loaded, store.as_ref())
    }
}

fn run_headless(
    args: &Args,
    project: &IfcProject,
    loaded: Result<Option<Settings>, SettingsError>,
) -> Result<()> {
    let settings = loaded
        .unwrap_or_else(|e| {
            warn!(error = %e, "using default settings");
            eprintln!("Warning: {e}; using default settings");
            None
        })
        .unwrap_or_default();

    let mut session = SumSession::new(settings);
    args.apply_overrides(&mut session)?;

    let selection = build_selection(project, &args.select, &args.entity);
    session.refresh_from(&selection.view(project));

    if args.print {
        print!("{}", render_table(&session));
    }

    if let Some(csv_path) = &args.csv {
        export_csv(&session, csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    if let Some(json_path) = &args.json {
        let report = SummaryReport::new(&project.file_path, selection.ids(), &session);
        export_json(&report, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
    }

    Ok(())
}

fn run_tui(
    args: &Args,
    project: IfcProject,
    loaded: Result<Option<Settings>, SettingsError>,
    store: Option<&SettingsStore>,
) -> Result<()> {
    let preselect = !args.select.is_empty() || !args.entity.is_empty();
    let selection = if preselect {
        build_selection(&project, &args.select, &args.entity)
    } else {
        Selection::new()
    };

    let mut app = App::new(project, loaded);
    args.apply_overrides(&mut app.session)?;
    app = app.with_selection(selection);

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();

    if let Some(store) = store {
        if let Err(e) = app.save_settings(store) {
            error!(error = %e, "could not save settings");
            eprintln!("Warning: settings were not saved: {e}");
        }
    }

    result
}
