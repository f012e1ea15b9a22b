//! Facility occupancy predictor CLI
//!
//! Turns an opening-hours schedule and a time range into per-timestamp
//! occupancy estimates using a pretrained ONNX model, written as
//! `timestamp,value` CSV lines.

mod config;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use occupancy_lib::pipeline::{
    SequencePipeline, TabularPipeline, DEFAULT_SEQUENCE_STEP_MINUTES,
    DEFAULT_TABULAR_STEP_MINUTES, DEFAULT_WINDOW_LENGTH,
};
use occupancy_lib::predictor::{
    write_csv, OnnxSequenceModel, OnnxTabularModel, OutputScale,
};
use occupancy_lib::schedule::{parse_schedule_json, ScheduleClock, TermCalendar};
use occupancy_lib::window::TailPolicy;

/// Facility occupancy predictor
#[derive(Parser)]
#[command(name = "ocp")]
#[command(author, version, about = "Occupancy prediction from opening-hours schedules", long_about = None)]
struct Cli {
    /// Path to the ONNX model artifact (default: model.onnx, or OCP_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Path to write the prediction CSV to (default: output.csv, or OCP_OUTPUT_PATH)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict occupancy over a datetime range with a tabular model
    Range {
        /// Range start, "YYYY-MM-DD" or "YYYY-MM-DD HH:MM"
        from: String,

        /// Range end, same format, inclusive
        to: String,

        /// Schedule JSON document (flat or week-keyed shape)
        schedule: String,

        /// Minutes between predictions
        #[arg(long, default_value_t = DEFAULT_TABULAR_STEP_MINUTES)]
        interval: u32,

        /// Scale predictions to [0, 100] instead of [0, 1]
        #[arg(long)]
        percent: bool,

        /// Path to a term-dates JSON table (defaults to the built-in
        /// 2024-25 academic year)
        #[arg(long)]
        term_dates: Option<PathBuf>,

        /// Omit the term-time column, for models trained without it
        #[arg(long)]
        no_term_feature: bool,
    },

    /// Predict occupancy across one day's open window with a sequence model
    Day {
        /// Day to predict, "YYYY-MM-DD"
        date: String,

        /// Opening time, HHMM (630 = 06:30)
        opening: u16,

        /// Closing time, HHMM (2230 = 22:30)
        closing: u16,

        /// Minutes between timesteps
        #[arg(long, default_value_t = DEFAULT_SEQUENCE_STEP_MINUTES)]
        interval: u32,

        /// Timesteps per model input window
        #[arg(long, default_value_t = DEFAULT_WINDOW_LENGTH)]
        window_length: usize,

        /// End-of-series policy: pad repeats the final window so every
        /// timestep gets a prediction, drop discards the tail
        #[arg(long, value_enum, default_value = "pad")]
        tail_policy: TailArg,

        /// Scale predictions to [0, 100] instead of [0, 1]
        #[arg(long)]
        percent: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TailArg {
    Pad,
    Drop,
}

impl From<TailArg> for TailPolicy {
    fn from(arg: TailArg) -> Self {
        match arg {
            TailArg::Pad => TailPolicy::TailPad,
            TailArg::Drop => TailPolicy::StrictDrop,
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    // Usage errors exit 1 per the output contract; --help and --version
    // keep clap's zero exit.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let is_usage_error = err.use_stderr();
            let _ = err.print();
            std::process::exit(if is_usage_error { 1 } else { 0 });
        }
    };

    if let Err(err) = run(cli) {
        output::print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = config::CliConfig::load()?;
    let model_path = cli.model.unwrap_or(settings.model_path);
    let output_path = cli.output.unwrap_or(settings.output_path);

    match cli.command {
        Commands::Range {
            from,
            to,
            schedule,
            interval,
            percent,
            term_dates,
            no_term_feature,
        } => {
            let from = parse_stamp(&from).context("invalid FROM timestamp")?;
            let to = parse_stamp(&to).context("invalid TO timestamp")?;
            let clock = ScheduleClock::from_config(parse_schedule_json(&schedule)?);

            let mut pipeline = TabularPipeline::new(clock)
                .with_step_minutes(interval)
                .with_scale(scale_for(percent));
            if !no_term_feature {
                pipeline = pipeline.with_calendar(load_calendar(term_dates.as_deref())?);
            }

            info!(%from, %to, interval, "running tabular prediction");
            let model = OnnxTabularModel::load(&model_path, pipeline.feature_width())
                .with_context(|| format!("loading model {}", model_path.display()))?;
            let points = pipeline.run(from, to, &model)?;
            write_csv(&output_path, &points)?;
            report(points.len(), &output_path);
        }
        Commands::Day {
            date,
            opening,
            closing,
            interval,
            window_length,
            tail_policy,
            percent,
        } => {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").context("invalid DATE")?;

            let pipeline = SequencePipeline::new()
                .with_step_minutes(interval)
                .with_window_length(window_length)
                .with_tail_policy(tail_policy.into())
                .with_scale(scale_for(percent));

            info!(%date, opening, closing, window_length, "running sequence prediction");
            let model = OnnxSequenceModel::load(&model_path, window_length, 2)
                .with_context(|| format!("loading model {}", model_path.display()))?;
            let points = pipeline.run(date, opening, closing, &model)?;
            write_csv(&output_path, &points)?;
            report(points.len(), &output_path);
        }
    }
    Ok(())
}

fn scale_for(percent: bool) -> OutputScale {
    if percent {
        OutputScale::Percent
    } else {
        OutputScale::Unit
    }
}

fn load_calendar(path: Option<&std::path::Path>) -> Result<TermCalendar> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading term dates {}", path.display()))?;
            Ok(TermCalendar::from_json(&raw)?)
        }
        None => Ok(TermCalendar::academic_year_2024_25()),
    }
}

fn report(count: usize, path: &std::path::Path) {
    if count == 0 {
        output::print_warning(&format!(
            "no predictions produced; wrote empty file {}",
            path.display()
        ));
    } else {
        output::print_success(&format!("wrote {} predictions to {}", count, path.display()));
    }
}

/// Parse "YYYY-MM-DD HH:MM" or bare "YYYY-MM-DD" (midnight).
fn parse_stamp(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Ok(stamp);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("{raw:?} is not YYYY-MM-DD or YYYY-MM-DD HH:MM"))?;
    Ok(date.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stamp_formats() {
        assert_eq!(
            parse_stamp("2024-01-01 14:15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(14, 15, 0)
                .unwrap()
        );
        assert_eq!(
            parse_stamp("2024-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert!(parse_stamp("01/01/2024").is_err());
    }

    #[test]
    fn test_tail_arg_mapping() {
        assert_eq!(TailPolicy::from(TailArg::Pad), TailPolicy::TailPad);
        assert_eq!(TailPolicy::from(TailArg::Drop), TailPolicy::StrictDrop);
    }
}
