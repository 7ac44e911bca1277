// File: crates/flightviz-cli/src/main.rs
// Summary: `flightviz` binary. Parses arguments, pairs per-track hints with the
// `-i` they precede, runs the core pipeline and writes the KMZ.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, ValueHint};
use flightviz_core::kmz::DEFAULT_OUTPUT;
use flightviz_core::{run, Hints, RunConfig, TrackRequest};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Per-track options (-c, -g, -p) apply to the next -i that follows them.
#[derive(Parser, Debug)]
#[command(name = "flightviz", version, about = "Render flight tracks into a color-coded KMZ")]
struct Cli {
    /// Output KMZ path
    #[arg(short, long, default_value = DEFAULT_OUTPUT, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Timezone offset from UTC in hours, used for time labels
    #[arg(short = 'z', long, allow_negative_numbers = true)]
    timezone_offset: Option<i32>,

    /// TOML run configuration
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Track color for the next track (#rrggbb)
    #[arg(short, long, action = ArgAction::Append)]
    color: Vec<String>,

    /// Glider type for the next track
    #[arg(short, long, action = ArgAction::Append)]
    glider: Vec<String>,

    /// Pilot name for the next track
    #[arg(short, long, action = ArgAction::Append)]
    pilot: Vec<String>,

    /// Track file (.igc or .csv)
    #[arg(short, long, required = true, action = ArgAction::Append, value_hint = ValueHint::FilePath)]
    input: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();

    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path).with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(hours) = cli.timezone_offset {
        config.timezone_offset = hours;
    }

    let requests = requests_from(&matches)?;
    info!(tracks = requests.len(), output = %cli.output.display(), "starting run");

    let package = run(requests, config).context("failed to build visualization")?;
    package
        .write(&cli.output)
        .with_context(|| format!("failed to write '{}'", cli.output.display()))?;
    info!(path = %cli.output.display(), "done");
    Ok(())
}

/// Occurrences of one option with their positions on the command line.
fn occurrences<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Vec<(usize, T)> {
    match (matches.indices_of(id), matches.get_many::<T>(id)) {
        (Some(indices), Some(values)) => indices.zip(values.cloned()).collect(),
        _ => Vec::new(),
    }
}

/// Pair every `-i` with the hints given since the previous `-i`. A repeated
/// hint keeps the last value; hints after the final `-i` are rejected.
fn requests_from(matches: &ArgMatches) -> Result<Vec<TrackRequest>> {
    let inputs = occurrences::<PathBuf>(matches, "input");
    let mut hints: Vec<(usize, char, String)> = Vec::new();
    for (id, flag) in [("color", 'c'), ("glider", 'g'), ("pilot", 'p')] {
        hints.extend(occurrences::<String>(matches, id).into_iter().map(|(i, v)| (i, flag, v)));
    }
    hints.sort_by_key(|(i, _, _)| *i);

    let mut pending = hints.into_iter().peekable();
    let mut requests = Vec::with_capacity(inputs.len());
    for (at, path) in inputs {
        let (mut color, mut glider, mut pilot) = (None, None, None);
        while let Some((_, flag, value)) = pending.next_if(|(i, _, _)| *i < at) {
            match flag {
                'c' => color = Some(value),
                'g' => glider = Some(value),
                _ => pilot = Some(value),
            }
        }
        let hints = Hints::from_options(color.as_deref(), glider.as_deref(), pilot.as_deref())
            .with_context(|| format!("invalid options for '{}'", path.display()))?;
        debug!(track = %path.display(), ?hints, "track request");
        requests.push(TrackRequest::new(path, hints));
    }
    if let Some((_, flag, value)) = pending.next() {
        bail!("-{flag} {value} follows the last -i and applies to no track");
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightviz_core::Rgba;

    fn parse(args: &[&str]) -> Result<Vec<TrackRequest>> {
        let matches = Cli::command().try_get_matches_from(std::iter::once("flightviz").chain(args.iter().copied()))?;
        requests_from(&matches)
    }

    #[test]
    fn hints_apply_to_the_following_track() {
        let reqs = parse(&["-p", "Ana", "-c", "#00ff00", "-i", "a.igc", "-i", "b.igc", "-g", "Zeno", "-i", "c.csv"]).unwrap();
        assert_eq!(reqs.len(), 3);
        assert_eq!(reqs[0].path, PathBuf::from("a.igc"));
        assert_eq!(reqs[0].hints.pilot_name.as_deref(), Some("Ana"));
        assert_eq!(reqs[0].hints.color, Some(Rgba::rgb(0, 255, 0)));
        assert!(reqs[1].hints.is_empty());
        assert_eq!(reqs[2].hints.glider_type.as_deref(), Some("Zeno"));
        assert!(reqs[2].hints.pilot_name.is_none());
    }

    #[test]
    fn repeated_hint_keeps_last_value() {
        let reqs = parse(&["-p", "first", "-p", "second", "-i", "a.igc"]).unwrap();
        assert_eq!(reqs[0].hints.pilot_name.as_deref(), Some("second"));
    }

    #[test]
    fn trailing_hint_is_rejected() {
        let err = parse(&["-i", "a.igc", "-p", "late"]).unwrap_err();
        assert!(err.to_string().contains("-p late"), "{err}");
    }

    #[test]
    fn bad_color_names_the_track() {
        let err = parse(&["-c", "nope", "-i", "a.igc"]).unwrap_err();
        assert!(format!("{err:#}").contains("a.igc"), "{err:#}");
    }

    #[test]
    fn at_least_one_track_is_required() {
        assert!(parse(&["-o", "x.kmz"]).is_err());
    }

    #[test]
    fn negative_timezone_parses() {
        let cli = Cli::try_parse_from(["flightviz", "-z", "-5", "-i", "a.igc"]).unwrap();
        assert_eq!(cli.timezone_offset, Some(-5));
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
    }
}
