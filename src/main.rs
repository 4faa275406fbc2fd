use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use stormflow_design::{
    DesignError, FlowPath, IdfCurve, RainfallSummary, ScsCurve, ScsCurveNumber, TcSummary,
    check_capacity, horton_excess, manning_full_pipe, manual_hyetograph, min_diameter,
    mononobe_intensity, rainfall_summary, rational_discharge, runoff_volume_m3, scs_distribution,
};
use stormflow_freq::{FrequencyDistribution, STANDARD_RETURN_PERIODS};
use stormflow_hydro::{
    LevelPoolRouter, Nakayasu, RatingTable, SantaBarbara, ScsTriangular, TimeSeries,
    UnitHydrographMethod, convolve,
};
use stormflow_io::{
    AnnualMaximaReader, HydrographSummary, InflowReader, ProjectDescriptor, RainfallReader,
    RatingTableReader, ResultWriter, RoutingSummary, RunName,
};

#[derive(Parser)]
#[command(name = "stormflow")]
#[command(about = "Stormwater hydrology: unit hydrographs, pond routing, and design storms")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Rainfall input: a CSV file or an inline comma-separated list of depths.
#[derive(Args, Debug, Clone)]
struct RainfallArgs {
    /// Rainfall CSV (`time_min,rainfall_mm`, or one depth column with --step-min)
    #[arg(long, conflicts_with = "depths")]
    rainfall: Option<PathBuf>,

    /// Inline depths in mm per step, e.g. `5,10,20,15,5`
    #[arg(long, value_delimiter = ',')]
    depths: Vec<f64>,

    /// Step in minutes for inline depths or single-column files
    #[arg(long, default_value_t = 10.0)]
    step_min: f64,
}

/// Where and under which name artifacts are written.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Run name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long, default_value = "stormflow")]
    run_name: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

/// Pond rating tables; the reference pond is used when omitted.
#[derive(Args, Debug, Clone)]
struct PondArgs {
    /// Stage-storage CSV (`stage_m,storage_m3`)
    #[arg(long, requires = "stage_discharge")]
    stage_storage: Option<PathBuf>,

    /// Stage-discharge CSV (`stage_m,discharge_cms`)
    #[arg(long, requires = "stage_storage")]
    stage_discharge: Option<PathBuf>,

    /// Initial water level in m (defaults to the lowest tabulated stage)
    #[arg(long)]
    initial_stage: Option<f64>,
}

/// Unit hydrograph method and catchment description.
#[derive(Args, Debug, Clone)]
struct CatchmentArgs {
    /// Hydrograph method: "scs", "nakayasu", or "sbuh" (Santa Barbara, hydrograph command only)
    #[arg(long, default_value = "scs")]
    method: String,

    /// Catchment area in hectares
    #[arg(long)]
    area_ha: f64,

    /// Time of concentration in minutes (SCS)
    #[arg(long)]
    tc_min: Option<f64>,

    /// Main reach length in km (Nakayasu)
    #[arg(long)]
    reach_km: Option<f64>,

    /// Nakayasu recession coefficient, 1.5 to 3.0
    #[arg(long, default_value_t = 2.0)]
    alpha: f64,

    /// Override the Nakayasu lag time in hours
    #[arg(long)]
    lag_time_hr: Option<f64>,

    /// Override the Nakayasu rain duration in hours
    #[arg(long)]
    rain_duration_hr: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply SCS curve-number (and optional Horton) losses to a storm
    Runoff {
        #[command(flatten)]
        rain: RainfallArgs,

        /// SCS curve number (30 to 98)
        #[arg(long)]
        cn: f64,

        /// Initial-abstraction ratio
        #[arg(long, default_value_t = 0.2)]
        ia_ratio: f64,

        /// Catchment area in hectares, for the runoff volume
        #[arg(long)]
        area_ha: f64,

        /// Horton parameters `f0,fc,k` (mm/hr, mm/hr, 1/hr)
        #[arg(long, value_delimiter = ',')]
        horton: Option<Vec<f64>>,
    },

    /// Convolve a storm with a synthetic unit hydrograph
    Hydrograph {
        #[command(flatten)]
        rain: RainfallArgs,

        #[command(flatten)]
        catchment: CatchmentArgs,

        /// Apply SCS-CN losses first; otherwise the rainfall is taken as effective
        #[arg(long)]
        cn: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Route an inflow hydrograph through a detention pond (Modified Puls)
    Route {
        /// Inflow CSV (`time_min,inflow_cms`); the reference inflow is used when omitted
        #[arg(long)]
        inflow: Option<PathBuf>,

        #[command(flatten)]
        pond: PondArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Fit a frequency distribution to annual maxima and tabulate design rainfall
    Frequency {
        /// Annual-maximum CSV (last column is used)
        #[arg(long)]
        data: PathBuf,

        /// Distribution: "lp3" or "gumbel"
        #[arg(long, default_value = "lp3")]
        distribution: String,

        /// Return periods in years
        #[arg(long, value_delimiter = ',')]
        periods: Vec<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Design storms for several return periods, routed through the pond in parallel
    Scenarios {
        /// Annual-maximum CSV (last column is used)
        #[arg(long)]
        data: PathBuf,

        /// Distribution: "lp3" or "gumbel"
        #[arg(long, default_value = "lp3")]
        distribution: String,

        /// Return periods in years
        #[arg(long, value_delimiter = ',')]
        periods: Vec<f64>,

        /// Design storm duration in hours
        #[arg(long, default_value_t = 6.0)]
        duration_hr: f64,

        /// SCS storm distribution: "type-ii" or "type-iii"
        #[arg(long, default_value = "type-ii")]
        curve: String,

        /// SCS curve number (30 to 98)
        #[arg(long)]
        cn: f64,

        #[command(flatten)]
        catchment: CatchmentArgs,

        #[command(flatten)]
        pond: PondArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Time of concentration by Kirpich, FAA, and (with roughness) Kerby and TR-55
    Tc {
        /// Flow path length in m
        #[arg(long)]
        length_m: f64,

        /// Slope in m/m
        #[arg(long)]
        slope: f64,

        /// Overland roughness (Kerby / TR-55 sheet flow)
        #[arg(long)]
        roughness: Option<f64>,

        /// TR-55 channel reach length in m
        #[arg(long, requires = "channel_velocity")]
        channel_length_m: Option<f64>,

        /// TR-55 channel velocity in m/s
        #[arg(long, requires = "channel_length_m")]
        channel_velocity: Option<f64>,
    },

    /// Size a storm sewer with the Rational method and Manning full-pipe flow
    Sewer {
        /// Runoff coefficient C in (0, 1]
        #[arg(long)]
        c: f64,

        /// Drainage area in hectares
        #[arg(long)]
        area_ha: f64,

        /// Design intensity in mm/hr
        #[arg(long, conflicts_with_all = ["r24_mm", "idf"])]
        intensity: Option<f64>,

        /// 24-hour rainfall for the Mononobe intensity (needs --tc-min)
        #[arg(long, requires = "tc_min", conflicts_with = "idf")]
        r24_mm: Option<f64>,

        /// General IDF coefficients `A,B,C` (needs --tc-min)
        #[arg(long, value_delimiter = ',', requires = "tc_min")]
        idf: Option<Vec<f64>>,

        /// Storm duration, minutes
        #[arg(long)]
        tc_min: Option<f64>,

        /// Pipe slope in m/m
        #[arg(long)]
        slope: f64,

        /// Manning roughness
        #[arg(long, default_value_t = 0.013)]
        manning_n: f64,

        /// Check this existing diameter (m) instead of only sizing
        #[arg(long)]
        diameter_m: Option<f64>,
    },

    /// Save or inspect a project descriptor
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Write a project descriptor
    Save {
        /// Descriptor path
        #[arg(long, default_value = "project.json")]
        path: PathBuf,

        /// Free-form status string
        #[arg(long, default_value = "draft")]
        status: String,

        /// Metadata entries `key=value` (repeatable)
        #[arg(long = "meta")]
        metadata: Vec<String>,
    },

    /// Print a saved project descriptor
    Show {
        /// Descriptor path
        #[arg(long, default_value = "project.json")]
        path: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct RunoffOutput {
    rainfall: RainfallSummary,
    curve_number: f64,
    retention_mm: f64,
    initial_abstraction_mm: f64,
    runoff_mm: f64,
    runoff_volume_m3: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    horton_excess_mm: Option<f64>,
}

#[derive(Serialize)]
struct HydrographOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_hydrograph_peak_cms_per_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_hydrograph_volume_m3_per_mm: Option<f64>,
    effective_rainfall_mm: f64,
    #[serde(flatten)]
    hydrograph: HydrographSummary,
}

#[derive(Serialize)]
struct FrequencyOutput {
    run: String,
    distribution: &'static str,
    sample_size: usize,
    design_rainfall: Vec<(f64, f64)>,
}

#[derive(Serialize)]
struct ScenarioOutput {
    return_period: f64,
    design_depth_mm: f64,
    runoff_mm: f64,
    #[serde(flatten)]
    routing: RoutingSummary,
}

#[derive(Serialize)]
struct SewerOutput {
    design_intensity_mm_hr: f64,
    design_flow_cms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_pipe: Option<stormflow_design::PipeFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    capacity_check: Option<stormflow_design::CapacityCheck>,
}

/// Inflow and pond used when `route` is called without files.
const REFERENCE_INFLOW: [f64; 6] = [0.0, 5.0, 15.0, 10.0, 4.0, 0.0];
const REFERENCE_STEP_MIN: f64 = 10.0;
const REFERENCE_STAGE_STORAGE: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 500.0), (2.0, 1500.0), (3.0, 3000.0)];
const REFERENCE_STAGE_DISCHARGE: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 10.0)];

fn load_rainfall(args: &RainfallArgs) -> Result<TimeSeries> {
    match &args.rainfall {
        Some(path) => RainfallReader::new(path)
            .with_step(args.step_min)
            .read()
            .context("failed to read rainfall CSV"),
        None if !args.depths.is_empty() => {
            manual_hyetograph(args.depths.clone(), args.step_min).context("invalid rainfall depths")
        }
        None => anyhow::bail!("provide rainfall with --rainfall <csv> or --depths <list>"),
    }
}

fn build_router(args: &PondArgs) -> Result<LevelPoolRouter> {
    let (storage, discharge) = match (&args.stage_storage, &args.stage_discharge) {
        (Some(s), Some(d)) => (
            RatingTableReader::new(s, "stage-storage").read().context("failed to read stage-storage CSV")?,
            RatingTableReader::new(d, "stage-discharge").read().context("failed to read stage-discharge CSV")?,
        ),
        _ => {
            info!("using reference pond tables");
            (
                RatingTable::from_pairs("stage-storage", &REFERENCE_STAGE_STORAGE)?,
                RatingTable::from_pairs("stage-discharge", &REFERENCE_STAGE_DISCHARGE)?,
            )
        }
    };
    let router = LevelPoolRouter::new(storage, discharge).context("invalid pond rating tables")?;
    Ok(match args.initial_stage {
        Some(stage) => router.with_initial_stage(stage),
        None => router,
    })
}

fn build_method(args: &CatchmentArgs) -> Result<UnitHydrographMethod> {
    match args.method.as_str() {
        "scs" => {
            let Some(tc_min) = args.tc_min else {
                anyhow::bail!("the scs method needs --tc-min");
            };
            Ok(ScsTriangular::new(tc_min, args.area_ha)?.into())
        }
        "nakayasu" => {
            let Some(reach_km) = args.reach_km else {
                anyhow::bail!("the nakayasu method needs --reach-km");
            };
            let mut generator = Nakayasu::new(args.area_ha, reach_km)?
                .with_alpha(args.alpha)
                .with_strict_alpha(true);
            if let Some(hours) = args.lag_time_hr {
                generator = generator.with_lag_time(hours);
            }
            if let Some(hours) = args.rain_duration_hr {
                generator = generator.with_rain_duration(hours);
            }
            generator.shape()?;
            Ok(generator.into())
        }
        other => anyhow::bail!("unknown unit hydrograph method: {other} (expected scs or nakayasu)"),
    }
}

fn parse_distribution(s: &str) -> Result<FrequencyDistribution> {
    match s {
        "lp3" => Ok(FrequencyDistribution::LogPearson3),
        "gumbel" => Ok(FrequencyDistribution::Gumbel),
        other => anyhow::bail!("unknown distribution: {other} (expected lp3 or gumbel)"),
    }
}

fn parse_curve(s: &str) -> Result<ScsCurve> {
    match s {
        "type-ii" => Ok(ScsCurve::TypeII),
        "type-iii" => Ok(ScsCurve::TypeIII),
        other => anyhow::bail!("unknown SCS curve: {other} (expected type-ii or type-iii)"),
    }
}

fn return_periods(periods: &[f64]) -> Vec<f64> {
    if periods.is_empty() {
        STANDARD_RETURN_PERIODS.to_vec()
    } else {
        periods.to_vec()
    }
}

fn result_writer(output: &OutputArgs) -> Result<ResultWriter> {
    let run = RunName::new(output.run_name.clone())?;
    Ok(ResultWriter::new(&output.output_dir, run)?)
}

/// Run name for one scenario, e.g. `design_T2` or `design_T2p5`.
fn scenario_run_name(base: &str, period: f64) -> Result<RunName> {
    let suffix = period.to_string().replace('.', "p");
    Ok(RunName::new(format!("{base}_T{suffix}"))?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Runoff {
            rain,
            cn,
            ia_ratio,
            area_ha,
            horton,
        } => {
            let rainfall = load_rainfall(&rain)?;
            let losses = ScsCurveNumber::new(cn)?.with_ia_ratio(ia_ratio)?;
            let runoff_mm = losses.runoff_depth(rainfall.total());

            let horton_excess_mm = match horton.as_deref() {
                Some(&[f0, fc, k]) => Some(
                    horton_excess(&rainfall, f0, fc, k)
                        .context("horton infiltration failed")?
                        .total(),
                ),
                Some(_) => anyhow::bail!("--horton takes exactly three values: f0,fc,k"),
                None => None,
            };

            print_json(&RunoffOutput {
                rainfall: rainfall_summary(&rainfall, rain.step_min)?,
                curve_number: cn,
                retention_mm: losses.retention(),
                initial_abstraction_mm: losses.initial_abstraction(),
                runoff_mm,
                runoff_volume_m3: runoff_volume_m3(runoff_mm, area_ha),
                horton_excess_mm,
            })?;
        }

        Command::Hydrograph {
            rain,
            catchment,
            cn,
            output,
        } => {
            let rainfall = load_rainfall(&rain)?;
            let effective = match cn {
                Some(cn) => ScsCurveNumber::new(cn)?.effective_rainfall(&rainfall)?,
                None => rainfall,
            };
            let writer = result_writer(&output)?;

            if catchment.method == "sbuh" {
                let Some(tc_min) = catchment.tc_min else {
                    anyhow::bail!("the sbuh method needs --tc-min");
                };
                let hydrograph = SantaBarbara::new(tc_min, catchment.area_ha)?
                    .hydrograph(&effective)
                    .context("santa barbara routing failed")?;
                let summary = writer.write_hydrograph("sbuh", &hydrograph)?;
                print_json(&HydrographOutput {
                    unit_hydrograph_peak_cms_per_mm: None,
                    unit_hydrograph_volume_m3_per_mm: None,
                    effective_rainfall_mm: effective.total(),
                    hydrograph: summary,
                })?;
                return Ok(());
            }

            let step_min = effective.uniform_step().unwrap_or(rain.step_min);
            let method = build_method(&catchment)?;
            let uh = method
                .generate(step_min)
                .with_context(|| format!("{} unit hydrograph failed", method.name()))?;
            let hydrograph = convolve(&effective, &uh).context("convolution failed")?;
            let summary = writer.write_hydrograph(method.name(), &hydrograph)?;

            print_json(&HydrographOutput {
                unit_hydrograph_peak_cms_per_mm: Some(uh.peak().1),
                unit_hydrograph_volume_m3_per_mm: Some(uh.volume_m3_per_mm()),
                effective_rainfall_mm: effective.total(),
                hydrograph: summary,
            })?;
        }

        Command::Route {
            inflow,
            pond,
            output,
        } => {
            let inflow = match inflow {
                Some(path) => InflowReader::new(&path).read().context("failed to read inflow CSV")?,
                None => TimeSeries::uniform(REFERENCE_STEP_MIN, REFERENCE_INFLOW.to_vec())?,
            };
            let router = build_router(&pond)?;
            let result = router.route(&inflow).context("routing failed")?;

            let writer = result_writer(&output)?;
            let summary = writer.write_routing(&result)?;
            print_json(&summary)?;
        }

        Command::Frequency {
            data,
            distribution,
            periods,
            output,
        } => {
            let distribution = parse_distribution(&distribution)?;
            let sample = AnnualMaximaReader::new(&data)
                .read()
                .context("failed to read annual maxima CSV")?;
            let table = distribution
                .fit(&sample)
                .context("distribution fit failed")?
                .design_rainfall(&return_periods(&periods))?;

            let writer = result_writer(&output)?;
            writer.write_frequency(sample.len(), &table)?;

            print_json(&FrequencyOutput {
                run: output.run_name,
                distribution: table.distribution,
                sample_size: sample.len(),
                design_rainfall: table.rows.iter().map(|r| (r.return_period, r.depth_mm)).collect(),
            })?;
        }

        Command::Scenarios {
            data,
            distribution,
            periods,
            duration_hr,
            curve,
            cn,
            catchment,
            pond,
            output,
        } => {
            let distribution = parse_distribution(&distribution)?;
            let curve = parse_curve(&curve)?;
            let losses = ScsCurveNumber::new(cn)?;
            let method = build_method(&catchment)?;
            let router = build_router(&pond)?;

            let sample = AnnualMaximaReader::new(&data)
                .read()
                .context("failed to read annual maxima CSV")?;
            let table = distribution
                .fit(&sample)
                .context("distribution fit failed")?
                .design_rainfall(&return_periods(&periods))?;

            // 1. Design storm -> effective rainfall -> runoff hydrograph, per return period
            let mut inflows = Vec::with_capacity(table.rows.len());
            let mut runoff_depths = Vec::with_capacity(table.rows.len());
            for row in &table.rows {
                let storm = scs_distribution(row.depth_mm, duration_hr, curve)?;
                let effective = losses.effective_rainfall(&storm)?;
                let step_min = storm.uniform_step()?;
                let uh = method
                    .generate(step_min)
                    .with_context(|| format!("unit hydrograph at {step_min:.2} min failed"))?;
                runoff_depths.push(effective.total());
                inflows.push(convolve(&effective, &uh)?);
            }
            info!(n_scenarios = inflows.len(), "routing scenarios");

            // 2. Route every scenario in one parallel batch
            let results = router.route_batch(&inflows);

            // 3. Write artifacts in return-period order
            let mut outputs = Vec::with_capacity(results.len());
            for ((row, runoff_mm), result) in table.rows.iter().zip(runoff_depths).zip(results) {
                let result = result.with_context(|| format!("routing T={} failed", row.return_period))?;
                let run = scenario_run_name(&output.run_name, row.return_period)?;
                let writer = ResultWriter::new(&output.output_dir, run)?;
                let routing = writer.write_routing(&result)?;
                outputs.push(ScenarioOutput {
                    return_period: row.return_period,
                    design_depth_mm: row.depth_mm,
                    runoff_mm,
                    routing,
                });
            }
            result_writer(&output)?.write_frequency(sample.len(), &table)?;
            print_json(&outputs)?;
        }

        Command::Tc {
            length_m,
            slope,
            roughness,
            channel_length_m,
            channel_velocity,
        } => {
            let path = FlowPath {
                length_m,
                slope,
                roughness,
                channel: channel_length_m.zip(channel_velocity),
            };
            let summary: TcSummary = path.summary().context("time of concentration failed")?;
            print_json(&summary)?;
        }

        Command::Sewer {
            c,
            area_ha,
            intensity,
            r24_mm,
            idf,
            tc_min,
            slope,
            manning_n,
            diameter_m,
        } => {
            let design_intensity = match (intensity, r24_mm, idf.as_deref(), tc_min) {
                (Some(i), ..) => i,
                (None, Some(r24), None, Some(tc)) => mononobe_intensity(r24, tc / 60.0)?,
                (None, None, Some(&[a, b, k]), Some(tc)) => IdfCurve::new(a, b, k)?.intensity(tc)?,
                _ => anyhow::bail!("give --intensity, or --tc-min with --r24-mm or --idf A,B,C"),
            };
            let design_flow = rational_discharge(c, design_intensity, area_ha)?;

            let minimum_pipe = match min_diameter(design_flow, slope, manning_n) {
                Ok(pipe) => Some(pipe),
                Err(DesignError::NoAdequateDiameter { .. }) if diameter_m.is_some() => {
                    warn!(design_flow, "no standard diameter carries the design flow");
                    None
                }
                Err(e) => return Err(e).context("pipe sizing failed"),
            };
            let capacity_check = diameter_m
                .map(|d| manning_full_pipe(d, slope, manning_n))
                .transpose()?
                .map(|pipe| check_capacity(design_flow, pipe.discharge));

            print_json(&SewerOutput {
                design_intensity_mm_hr: design_intensity,
                design_flow_cms: design_flow,
                minimum_pipe,
                capacity_check,
            })?;
        }

        Command::Project { action } => match action {
            ProjectAction::Save {
                path,
                status,
                metadata,
            } => {
                let mut project = ProjectDescriptor::new(status);
                for entry in &metadata {
                    let Some((key, value)) = entry.split_once('=') else {
                        anyhow::bail!("metadata must be key=value, got {entry}");
                    };
                    project = project.with_metadata(key.trim(), value.trim());
                }
                project.save(&path)?;
                print_json(&project)?;
            }
            ProjectAction::Show { path } => {
                let project = ProjectDescriptor::load(&path)
                    .context("failed to load project descriptor")?;
                print_json(&project)?;
            }
        },
    }

    Ok(())
}
