//! # ILD Beam CLI
//!
//! Terminal front end for the moving-load analysis in `ild_core`.
//!
//! ```text
//! ild                     prompt for span, loads and spacing
//! ild job.ild             analyze every case stored in a project file
//! ild --animate           also play the load sweep frame by frame
//! ild --save job.ild      store the prompted case as a new project
//! ild --json              print results as JSON only
//! ```
//!
//! `ILD_RESOLUTION` and `ILD_FRAMES` override the scan resolution and the
//! number of animation frames. Logging follows `RUST_LOG`.

mod report;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use ild_core::calculations::envelope::EnvelopeResult;
use ild_core::calculations::MovingLoadInput;
use ild_core::{
    load_project, save_project, AnalysisSettings, CalcError, CalcResult, FileLock, Project,
};

/// Delay between animation frames
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct Options {
    project: Option<PathBuf>,
    save_to: Option<PathBuf>,
    animate: bool,
    json_only: bool,
}

/// Machine-readable output for one analyzed case
#[derive(Debug, Serialize)]
struct CaseOutput<'a> {
    input: &'a MovingLoadInput,
    envelope: &'a EnvelopeResult,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--animate" | "-a" => options.animate = true,
            "--json" => options.json_only = true,
            "--save" => {
                let path = args.next().ok_or("--save needs a file path")?;
                options.save_to = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option {}", flag)),
            path => {
                if options.project.is_some() {
                    return Err("only one project file may be given".to_string());
                }
                options.project = Some(PathBuf::from(path));
            }
        }
    }
    Ok(options)
}

/// Ask for a number until one parses. An empty line takes the default.
///
/// Prompts go to `prompt_out` (stderr in the binary) so stdout stays clean for
/// `--json`.
fn prompt_f64(
    prompt: &str,
    default: f64,
    input: &mut impl BufRead,
    prompt_out: &mut impl Write,
) -> CalcResult<f64> {
    let mut line = String::new();
    loop {
        let _ = write!(prompt_out, "{}", prompt);
        let _ = prompt_out.flush();

        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| CalcError::invalid_input(prompt.trim(), "", e.to_string()))?;
        if read == 0 {
            return Err(CalcError::invalid_input(prompt.trim(), "", "Input ended before a value was given"));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(default);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => return Ok(value),
            _ => {
                warn!(input = trimmed, "rejected non-numeric input");
                let _ = writeln!(prompt_out, "Error: '{}' is not a number, please re-enter", trimmed);
            }
        }
    }
}

fn prompt_case(input: &mut impl BufRead, prompt_out: &mut impl Write) -> CalcResult<MovingLoadInput> {
    let defaults = MovingLoadInput::default();
    let mut ask = |label: &str, default: f64| {
        prompt_f64(&format!("{} [{}]: ", label, default), default, &mut *input, &mut *prompt_out)
    };
    let span_m = ask("Beam length L (m)", defaults.span_m)?;
    let lead = ask("Lead load W1 (kN)", defaults.lead_load_kn)?;
    let trail = ask("Trail load W2 (kN)", defaults.trail_load_kn)?;
    let spacing = ask("Load spacing x (m)", defaults.spacing_m)?;
    Ok(MovingLoadInput::new("CLI", span_m, lead, trail, spacing))
}

/// Settings for this run: the stored ones with `ILD_RESOLUTION` /
/// `ILD_FRAMES` applied. The stored settings are left untouched.
fn run_settings(stored: &AnalysisSettings, var: impl Fn(&str) -> Option<String>) -> AnalysisSettings {
    let mut settings = stored.clone();
    if let Some(resolution) = env_usize("ILD_RESOLUTION", &var) {
        settings.envelope.resolution = resolution;
    }
    if let Some(frames) = env_usize("ILD_FRAMES", &var) {
        settings.animation_frames = frames;
    }
    settings
}

fn env_usize(name: &str, var: &impl Fn(&str) -> Option<String>) -> Option<usize> {
    let raw = var(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring non-integer override");
            None
        }
    }
}

fn animate(case: &MovingLoadInput, settings: &AnalysisSettings) -> CalcResult<()> {
    let sweep = settings.sweep(case)?;
    let total = sweep.frame_count();
    info!(frames = total, "playing load sweep");
    for (index, frame) in sweep.enumerate() {
        println!("{}", report::render_frame(index, total, &frame));
        thread::sleep(FRAME_INTERVAL);
    }
    Ok(())
}

fn run_case(case: &MovingLoadInput, settings: &AnalysisSettings, options: &Options) -> CalcResult<()> {
    let envelope = ild_core::calculations::compute_envelope(case, &settings.envelope)?;
    debug!(label = %case.label, m_max = envelope.max_moment.value, "case analyzed");

    if options.json_only {
        let output = CaseOutput { input: case, envelope: &envelope };
        let json = serde_json::to_string_pretty(&output).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        println!("{}", json);
        return Ok(());
    }

    print!("{}", report::render_summary(case, &envelope));
    if options.animate {
        println!();
        animate(case, settings)?;
    }
    Ok(())
}

fn run(options: &Options) -> CalcResult<()> {
    let mut project = match &options.project {
        Some(path) => {
            let project = load_project(path)?;
            info!(path = %path.display(), cases = project.case_count(), "project loaded");
            project
        }
        None => {
            let mut project = Project::new("", "");
            let stdin = io::stdin();
            project.add_case(prompt_case(&mut stdin.lock(), &mut io::stderr())?);
            eprintln!();
            project
        }
    };
    let settings = run_settings(&project.settings, |name| std::env::var(name).ok());

    if project.case_count() == 0 {
        warn!("project has no load cases");
    }

    for (_, case) in project.cases_by_label() {
        run_case(case, &settings, options)?;
    }

    if let Some(path) = &options.save_to {
        let user = std::env::var("USER").unwrap_or_else(|_| "ild".to_string());
        let _lock = FileLock::acquire(path, user)?;
        project.touch();
        save_project(&project, path)?;
        info!(path = %path.display(), "project saved");
    }
    Ok(())
}

fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ild_cli=info,ild_core=info")),
        )
        .with_writer(io::stderr)
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("usage: ild [PROJECT.ild] [--animate] [--json] [--save PATH]");
            return ExitCode::from(2);
        }
    };

    if !options.json_only {
        println!("ILD Beam - Moving Load Analysis");
        println!("===============================");
        println!();
    }

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
