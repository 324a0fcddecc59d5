#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Headless harness for the vital-map binding core.
//!
//! Loads a CSV dataset, drives the application model through the same
//! events a browser view would (period change, category change, region
//! click), and prints the resulting instructions as JSON. Useful for
//! inspecting what a renderer would be told to draw without standing up
//! a rendering surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use vital_map_binding::model::ApplicationModel;
use vital_map_binding_models::{HighlightInstruction, InfoPanelInstruction, RenderInstruction};
use vital_map_metric_models::MetricField;
use vital_map_scale::ColorRamp;

/// Inspect render instructions for a vital statistics dataset.
#[derive(Parser)]
#[command(name = "vital_map_cli")]
#[command(about = "Inspect render instructions for a vital statistics dataset")]
struct Cli {
    /// Path to the CSV dataset.
    #[arg(long)]
    data: PathBuf,

    /// Metric field to paint.
    #[arg(long, value_enum, default_value = "value")]
    field: FieldArg,

    /// Color ramp to paint with.
    #[arg(long, value_enum, default_value = "reds")]
    ramp: RampArg,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Emit the render instruction for a filter state, optionally with
    /// a region selected.
    Render {
        /// Year to filter to (defaults to the latest in the dataset).
        #[arg(long)]
        period: Option<i32>,

        /// Category to filter to (defaults to the all-cause rollup or
        /// the first category).
        #[arg(long)]
        category: Option<String>,

        /// Region to click after filtering.
        #[arg(long)]
        select: Option<String>,

        /// Write JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the dataset's known regions, periods, and categories.
    List,
}

/// Metric field choice.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FieldArg {
    /// Raw counts.
    Value,
    /// Normalized rates.
    Rate,
}

impl From<FieldArg> for MetricField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Value => Self::Value,
            FieldArg::Rate => Self::Rate,
        }
    }
}

/// Color ramp choice.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RampArg {
    /// Sequential light-to-dark reds.
    Reds,
    /// White to red.
    WhiteRed,
    /// Diverging blue-white-red.
    Diverging,
}

impl From<RampArg> for ColorRamp {
    fn from(arg: RampArg) -> Self {
        match arg {
            RampArg::Reds => Self::sequential_reds(),
            RampArg::WhiteRed => Self::white_red(),
            RampArg::Diverging => Self::diverging(),
        }
    }
}

/// Everything one `render` invocation tells a renderer.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderOutput {
    render: RenderInstruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlight: Option<HighlightInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_panel: Option<InfoPanelInstruction>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let dataset = vital_map_dataset::loader::load_csv(&cli.data)?;
    let mut model = ApplicationModel::new(cli.field.into(), cli.ramp.into());
    model.attach(dataset)?;

    match cli.command {
        Commands::Render {
            period,
            category,
            select,
            output,
        } => {
            if let Some(category) = &category {
                model.category_changed(category)?;
            }
            if let Some(period) = period {
                model.period_changed(period)?;
            }

            let (highlight, info_panel) = match &select {
                Some(region) => {
                    let (highlight, panel) = model.region_clicked(region)?;
                    (Some(highlight), panel)
                }
                None => (None, None),
            };

            let out = RenderOutput {
                render: model.render()?,
                highlight,
                info_panel,
            };
            let json = serde_json::to_string_pretty(&out)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &json)?;
                    log::info!("wrote instructions to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::List => {
            let dataset = model.dataset()?;
            println!("regions ({}):", dataset.regions().len());
            for region in dataset.regions() {
                println!("  {region}");
            }
            println!("periods ({}):", dataset.periods().len());
            for period in dataset.periods() {
                println!("  {period}");
            }
            println!("categories ({}):", dataset.categories().len());
            for category in dataset.categories() {
                println!("  {category}");
            }
        }
    }

    Ok(())
}
