use hound::{SampleFormat, WavReader};
use kcqt::{Cqt, CqtConfig, CqtError};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

/// Read one channel of a WAV file as `f32` samples in `[-1, 1]`.
///
/// Returns the samples, the sample rate and the channel count of the file.
pub fn read_wav(path: &Path, channel: u16) -> Result<(Vec<f32>, u32, u16), Box<dyn Error>> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if channel >= spec.channels {
        return Err(format!(
            "channel {} requested but the file has {}",
            channel, spec.channels
        )
        .into());
    }
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };
    let samples = interleaved
        .into_iter()
        .skip(channel as usize)
        .step_by(spec.channels as usize)
        .collect();
    Ok((samples, spec.sample_rate, spec.channels))
}

/// Frames of one run together with where they sit in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Note center frequencies in Hz, one per column.
    pub frequencies: Vec<f32>,
    /// Sample offset of every frame center from the start of the input.
    pub centers: Vec<usize>,
    pub frames: Vec<Vec<f32>>,
}

/// Run the engine over `samples`, optionally in chunks of `chunk` samples.
///
/// Chunked runs frame every chunk independently, exactly as a host feeding
/// the engine piece by piece would see, so frame centers restart at
/// `hop / 2` inside each chunk. `centers` records where each frame really
/// sits in `samples`.
pub fn run_cqt(
    samples: &[f32],
    config: CqtConfig,
    chunk: Option<usize>,
) -> Result<Analysis, CqtError> {
    let mut cqt = Cqt::new(config)?;
    let size = match chunk {
        Some(size) if size > 0 => size,
        _ => samples.len().max(1),
    };
    let mut centers = Vec::new();
    for (i, piece) in samples.chunks(size).enumerate() {
        let start = i * size;
        let n = transform(&mut cqt, piece);
        centers.extend((0..n).map(|f| start + cqt.frame_center(f)));
        log::debug!("chunk at {} of {} samples -> {} frames", start, piece.len(), n);
    }
    Ok(Analysis {
        frequencies: cqt.frequencies(),
        centers,
        frames: cqt.history().to_vec(),
    })
}

#[cfg(feature = "parallel")]
fn transform(cqt: &mut Cqt, samples: &[f32]) -> usize {
    cqt.transform_parallel(samples).len()
}

#[cfg(not(feature = "parallel"))]
fn transform(cqt: &mut Cqt, samples: &[f32]) -> usize {
    cqt.transform(samples).len()
}

/// Deviation-normalized power frames of the whole signal in a single pass.
pub fn run_normalized(samples: &[f32], config: CqtConfig) -> Result<Analysis, CqtError> {
    let cqt = Cqt::new(config)?;
    let flat = cqt.analyze_normalized(samples);
    let frames: Vec<Vec<f32>> = flat.chunks_exact(cqt.notes()).map(<[f32]>::to_vec).collect();
    Ok(Analysis {
        frequencies: cqt.frequencies(),
        centers: (0..frames.len()).map(|i| cqt.frame_center(i)).collect(),
        frames,
    })
}

/// Write frames as CSV: a header of note frequencies, then one row per frame
/// prefixed with the frame's center time in seconds.
pub fn write_csv<W: Write>(mut out: W, analysis: &Analysis, sample_rate: u32) -> io::Result<()> {
    write!(out, "time")?;
    for f in &analysis.frequencies {
        write!(out, ",{f:.2}")?;
    }
    writeln!(out)?;
    for (center, frame) in analysis.centers.iter().zip(&analysis.frames) {
        write!(out, "{:.4}", *center as f64 / sample_rate as f64)?;
        for e in frame {
            write!(out, ",{e:.6}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunked_history_has_per_chunk_frames() {
        let cfg = CqtConfig::default().with_notes(12);
        let samples = vec![0.0f32; 4410 * 3];
        let whole = run_cqt(&samples, cfg, None).unwrap();
        let chunked = run_cqt(&samples, cfg, Some(4410)).unwrap();
        assert_eq!(whole.frames.len(), 6);
        assert_eq!(chunked.frames.len(), 6);
        let odd = run_cqt(&samples, cfg, Some(3000)).unwrap();
        // four 3000-sample chunks and a 1230-sample tail, one frame each
        let cqt = Cqt::new(cfg).unwrap();
        let expected: usize = samples.chunks(3000).map(|c| cqt.frame_count(c.len())).sum();
        assert_eq!(odd.frames.len(), expected);
        assert_eq!(odd.centers.len(), expected);
    }

    #[test]
    fn chunked_centers_are_absolute() {
        let cfg = CqtConfig::default()
            .with_sample_rate(8000)
            .with_hop(400)
            .with_min_frequency(110.0)
            .with_notes(12);
        let run = run_cqt(&vec![0.0f32; 3000], cfg, Some(1000)).unwrap();
        assert_eq!(run.centers, vec![200, 600, 1200, 1600, 2200, 2600]);
        let whole = run_cqt(&vec![0.0f32; 3000], cfg, None).unwrap();
        assert_eq!(
            whole.centers,
            vec![200, 600, 1000, 1400, 1800, 2200, 2600]
        );
    }

    #[test]
    fn zero_chunk_means_single_pass() {
        let cfg = CqtConfig::default().with_notes(12);
        let samples = vec![0.1f32; 5000];
        assert_eq!(
            run_cqt(&samples, cfg, Some(0)).unwrap(),
            run_cqt(&samples, cfg, None).unwrap()
        );
    }

    #[test]
    fn empty_input_has_no_frames() {
        let run = run_cqt(&[], CqtConfig::default().with_notes(12), None).unwrap();
        assert!(run.frames.is_empty());
        assert!(run.centers.is_empty());
        assert_eq!(run.frequencies.len(), 12);
    }

    #[test]
    fn invalid_config_surfaces_error() {
        let cfg = CqtConfig::default().with_hop(0);
        assert_eq!(
            run_cqt(&[0.0; 10], cfg, None).unwrap_err(),
            CqtError::InvalidHopSize
        );
    }

    #[test]
    fn csv_layout() {
        let mut out = Vec::new();
        let analysis = Analysis {
            frequencies: vec![100.0, 200.0],
            centers: vec![200, 1200],
            frames: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        };
        write_csv(&mut out, &analysis, 8000).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,100.00,200.00");
        assert_eq!(lines[1], "0.0250,1.000000,2.000000");
        assert_eq!(lines[2], "0.1500,3.000000,4.000000");
    }

    #[test]
    fn normalized_rows_match_notes() {
        let cfg = CqtConfig::default().with_notes(12);
        let run = run_normalized(&vec![0.2f32; 8820], cfg).unwrap();
        assert_eq!(run.frames.len(), 4);
        assert!(run.frames.iter().all(|r| r.len() == 12));
        assert_eq!(run.centers, vec![1102, 3307, 5512, 7717]);
    }
}
