use clap::Parser;
use cqt_check::{read_wav, run_cqt, run_normalized, write_csv};
use kcqt::config::{
    DEFAULT_BINS_PER_OCTAVE, DEFAULT_FILTER_SCALE, DEFAULT_HOP, DEFAULT_MIN_FREQUENCY,
    DEFAULT_NOTES,
};
use kcqt::CqtConfig;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Run the Constant-Q Transform over a WAV file and dump the frames as CSV.
#[derive(Parser)]
struct Args {
    /// Path to input WAV file
    input: PathBuf,

    /// Channel to analyse (0 = left, 1 = right)
    #[arg(long, default_value_t = 0)]
    channel: u16,

    /// Samples between frame centers
    #[arg(long, default_value_t = DEFAULT_HOP)]
    hop: usize,

    /// Frames per second; overrides --hop when given
    #[arg(long)]
    frame_rate: Option<f32>,

    /// Center frequency of the lowest note in Hz
    #[arg(long, default_value_t = DEFAULT_MIN_FREQUENCY)]
    fmin: f32,

    /// Number of notes
    #[arg(long, default_value_t = DEFAULT_NOTES)]
    notes: usize,

    /// Notes per octave
    #[arg(long, default_value_t = DEFAULT_BINS_PER_OCTAVE)]
    bins_per_octave: usize,

    /// Quality factor multiplier
    #[arg(long, default_value_t = DEFAULT_FILTER_SCALE)]
    filter_scale: f32,

    /// Feed the engine in chunks of this many samples
    #[arg(long)]
    chunk: Option<usize>,

    /// Output deviation-normalized power instead of scaled energy.
    /// Always analyses the whole signal in one sequential pass.
    #[arg(long, conflicts_with = "chunk")]
    normalized: bool,

    /// CSV output path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let (samples, sample_rate, channels) = read_wav(&args.input, args.channel)?;
    if channels > 1 {
        log::info!("{} channels in input, analysing channel {}", channels, args.channel);
    }

    let mut config = CqtConfig::default()
        .with_sample_rate(sample_rate)
        .with_hop(args.hop)
        .with_min_frequency(args.fmin)
        .with_notes(args.notes)
        .with_bins_per_octave(args.bins_per_octave)
        .with_filter_scale(args.filter_scale);
    if let Some(fps) = args.frame_rate {
        config = config.with_frame_rate(fps);
    }

    let analysis = if args.normalized {
        run_normalized(&samples, config)?
    } else {
        run_cqt(&samples, config, args.chunk)?
    };
    log::info!(
        "{} samples at {} Hz -> {} frames x {} notes",
        samples.len(),
        sample_rate,
        analysis.frames.len(),
        config.notes
    );

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_csv(out, &analysis, sample_rate)?;
    Ok(())
}
