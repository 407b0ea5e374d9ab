use clap::{ArgAction, CommandFactory, Parser, error::ErrorKind};
use gpx_redact_lib::{Circle, RedactConfig, Rectangle, RegionSet};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Remove GPX track points in specified regions (rectangles and/or circles), splitting
/// tracks where points were removed. Short stray segments left near a region are
/// reported and can optionally be removed too.
pub struct Settings {
    /// Input GPX file
    #[clap(value_name = "INFILE")]
    pub infile: Option<PathBuf>,

    /// Output GPX file
    #[clap(value_name = "OUTFILE")]
    pub outfile: Option<PathBuf>,

    /// Input GPX file (alternative to the positional argument)
    #[clap(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output GPX file (alternative to the positional argument)
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Rectangle removal region given by two diagonal corners. May be repeated.
    #[clap(
        short,
        long = "rect",
        num_args = 4,
        value_names = ["LAT1", "LON1", "LAT2", "LON2"],
        action = ArgAction::Append,
        allow_negative_numbers = true
    )]
    pub rect: Vec<f64>,

    /// Circle removal region given by its center and radius in meters. May be repeated.
    #[clap(
        short,
        long = "circle",
        num_args = 3,
        value_names = ["LAT", "LON", "RADIUS"],
        action = ArgAction::Append,
        allow_negative_numbers = true
    )]
    pub circle: Vec<f64>,

    /// Remove stray segments (length <= --max-stray-length, near a removal region)
    #[clap(short = 's', long)]
    pub remove_stray_segments: bool,

    /// Maximum length in meters for a segment to be considered stray
    #[clap(long, default_value = "10.0")]
    pub max_stray_length: f64,

    /// Vicinity in meters for stray detection, used for all shapes when set.
    /// Defaults to the radius for circles and half the smallest side for rectangles.
    #[clap(long)]
    pub max_stray_vicinity: Option<f64>,

    /// Write the removal statistics as JSON to this file
    #[clap(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Process and report without writing the output file
    #[clap(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[clap(short, long)]
    pub debug: bool,
}

impl Settings {
    /// Parse from the process arguments, exiting with a usage message on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(settings) => settings,
            Err(e) => e.exit(),
        }
    }

    /// Input path, positional argument first
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.infile.as_ref().or(self.input.as_ref())
    }

    /// Output path, positional argument first
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.outfile.as_ref().or(self.output.as_ref())
    }

    /// Check the path requirements clap cannot express on its own
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.input_path().is_none() || (self.output_path().is_none() && !self.dry_run) {
            return Err(Settings::command().error(
                ErrorKind::MissingRequiredArgument,
                "Input and output GPX files must be specified either as positional arguments or via --input/--output.",
            ));
        }
        Ok(())
    }

    /// Build the removal regions, in command line order per kind
    pub fn regions(&self) -> gpx_redact_lib::Result<RegionSet> {
        let mut regions = RegionSet::new();
        for corners in self.rect.chunks_exact(4) {
            regions.push(Rectangle::new(corners[0], corners[1], corners[2], corners[3])?);
        }
        for circle in self.circle.chunks_exact(3) {
            regions.push(Circle::new(circle[0], circle[1], circle[2])?);
        }
        Ok(regions)
    }

    pub fn redact_config(&self) -> RedactConfig {
        RedactConfig {
            max_stray_length: self.max_stray_length,
            max_stray_vicinity: self.max_stray_vicinity,
            remove_stray: self.remove_stray_segments,
        }
    }

    /// Default log filter for the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
