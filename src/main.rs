//! Swing position analysis of posetrack files from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};
use swing_position_detection::{
    angles::compute_profile,
    candidates::{build_template, rank_arm_heights, summarize},
    config::Config,
    detection::{analyze_frames, Algorithm, DetectionResult, Position},
    evaluation::evaluate_with_tolerance,
    export::export_csv,
    posetrack::{load_annotations, PoseTrack},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect positions and optionally score them against annotations
    Analyze {
        /// Input posetrack JSON file
        posetrack: PathBuf,

        /// Detection algorithm (threshold, peak); overrides the config file
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Ground truth annotations JSON
        #[arg(long)]
        annotations: Option<PathBuf>,

        /// Export per-frame results to a CSV file
        #[arg(long)]
        export_csv: Option<PathBuf>,
    },

    /// Run both algorithms and compare their label counts
    Compare {
        /// Input posetrack JSON file
        posetrack: PathBuf,
    },

    /// List the frames with the highest arms
    FindTops {
        /// Input posetrack JSON file
        posetrack: PathBuf,

        /// Number of frames to list
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print the frame count and duration of a posetrack
    Info {
        /// Input posetrack JSON file
        posetrack: PathBuf,
    },

    /// Print angles and keypoints of one frame
    Frame {
        /// Input posetrack JSON file
        posetrack: PathBuf,

        /// Position of the frame in the posetrack, starting at 0
        index: usize,
    },

    /// Write an annotation template with top and bottom candidates
    Candidates {
        /// Input posetrack JSON file
        posetrack: PathBuf,

        /// Output path, defaults to <posetrack>.annotations.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = load_config(args.config.as_deref());

    match args.command {
        Command::Analyze {
            posetrack,
            algorithm,
            annotations,
            export_csv: csv_path,
        } => {
            let algorithm = match algorithm {
                Some(name) => name.parse()?,
                None => config.algorithm()?,
            };
            analyze(&config, &posetrack, algorithm, annotations.as_deref(), csv_path.as_deref())
        }
        Command::Compare { posetrack } => compare(&config, &posetrack),
        Command::FindTops { posetrack, limit } => find_tops(&config, &posetrack, limit),
        Command::Info { posetrack } => show_info(&config, &posetrack),
        Command::Frame { posetrack, index } => show_frame(&config, &posetrack, index),
        Command::Candidates { posetrack, output } => candidates(&config, &posetrack, output),
    }
}

fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };

    info!("Loading configuration from: {}", path.display());
    match Config::from_file(path).and_then(|cfg| cfg.validate().map(|()| cfg)) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Failed to load config file: {e}. Using defaults.");
            Config::default()
        }
    }
}

fn load_track(config: &Config, path: &Path) -> Result<PoseTrack> {
    let track = PoseTrack::from_file(path, config.input.default_fps)
        .with_context(|| format!("Failed to load posetrack {}", path.display()))?;
    println!(
        "{}: {} frames, {} fps",
        path.display(),
        track.frames.len(),
        track.fps(config.input.default_fps)
    );
    Ok(track)
}

fn analyze(
    config: &Config,
    path: &Path,
    algorithm: Algorithm,
    annotations: Option<&Path>,
    csv_path: Option<&Path>,
) -> Result<()> {
    let track = load_track(config, path)?;

    info!("Running {algorithm} detection");
    let results = analyze_frames(&track.frames, algorithm, &config.detector.params);
    let summary = summarize(&results);

    println!("\nPosition counts:");
    for (position, count) in &summary.position_counts {
        println!("  {position}: {count}");
    }
    if summary.unlabelled > 0 {
        println!("  unknown: {}", summary.unlabelled);
    }

    print_tops(&results);

    if let Some(annotations) = annotations {
        let ground_truth = load_annotations(annotations)
            .with_context(|| format!("Failed to load annotations {}", annotations.display()))?;
        println!("\n{} annotations", ground_truth.len());

        for position in [Position::Top, Position::Bottom] {
            if !ground_truth.iter().any(|gt| gt.position == position) {
                continue;
            }

            let metrics = evaluate_with_tolerance(&results, &ground_truth, position, config.evaluation.tolerance_frames);
            println!("\n{} detection metrics:", position.as_str().to_uppercase());
            println!("  Precision: {:.2}%", metrics.precision() * 100.0);
            println!("  Recall: {:.2}%", metrics.recall() * 100.0);
            println!("  F1 Score: {:.2}%", metrics.f1() * 100.0);

            if !metrics.position_errors.is_empty() {
                println!("  Errors ({}):", metrics.position_errors.len());
                for error in metrics.position_errors.iter().take(5) {
                    println!("    {} at frame {}", error.kind, error.frame);
                }
            }
        }
    }

    if let Some(csv_path) = csv_path {
        export_csv(csv_path, &results).with_context(|| format!("Failed to write {}", csv_path.display()))?;
        println!("\nExported {} rows to {}", results.len(), csv_path.display());
    }

    Ok(())
}

fn print_tops(results: &[DetectionResult]) {
    let tops: Vec<&DetectionResult> = results
        .iter()
        .filter(|r| r.detected_position == Some(Position::Top))
        .collect();
    if tops.is_empty() {
        return;
    }

    println!("\nDetected Top positions ({}):", tops.len());
    for top in tops.iter().take(10) {
        println!(
            "  Frame {} ({:.2}s) - arm_height={:.1}, spine={:.1}",
            top.frame_index,
            top.video_time,
            top.angles.arm_height(),
            top.angles.spine
        );
    }
}

fn compare(config: &Config, path: &Path) -> Result<()> {
    let track = load_track(config, path)?;

    for algorithm in [Algorithm::Threshold, Algorithm::Peak] {
        let summary = summarize(&analyze_frames(&track.frames, algorithm, &config.detector.params));

        println!("\n{} algorithm:", algorithm.as_str().to_uppercase());
        println!("  Top detections: {}", summary.count(Position::Top));
        println!("  Bottom detections: {}", summary.count(Position::Bottom));
        if algorithm == Algorithm::Peak {
            println!("  Arm peaks: {}", summary.arm_peaks);
            println!("  Spine peaks: {}", summary.spine_peaks);
        }
    }

    Ok(())
}

fn find_tops(config: &Config, path: &Path, limit: usize) -> Result<()> {
    let track = load_track(config, path)?;
    let ranked = rank_arm_heights(&track.frames);

    println!("\nTop {limit} frames by arm height:");
    println!("{:>6} {:>8} {:>10} {:>10} {:>8}", "Frame", "Time", "ArmHeight", "ArmToVert", "Spine");
    println!("{}", "-".repeat(50));
    for sample in ranked.iter().take(limit) {
        println!(
            "{:>6} {:>7.2}s {:>10.1} {:>10.1} {:>8.1}",
            sample.frame_index, sample.video_time, sample.arm_height, sample.arm_to_vertical, sample.spine
        );
    }

    Ok(())
}

fn show_info(config: &Config, path: &Path) -> Result<()> {
    let track = PoseTrack::from_file(path, config.input.default_fps)
        .with_context(|| format!("Failed to load posetrack {}", path.display()))?;

    println!("Posetrack file: {}", path.display());
    println!("  Frames: {}", track.frames.len());
    match track.metadata.source_video_duration {
        Some(duration) => println!("  Duration: {duration}s"),
        None => println!("  Duration: unknown"),
    }

    Ok(())
}

fn show_frame(config: &Config, path: &Path, index: usize) -> Result<()> {
    let track = PoseTrack::from_file(path, config.input.default_fps)
        .with_context(|| format!("Failed to load posetrack {}", path.display()))?;
    let frame = track.frame_at(index)?;
    let profile = compute_profile(&frame.keypoints);

    println!("\nFrame {index} (t={:.3}s)", frame.video_time);
    println!("{}", "-".repeat(40));

    println!("\nAngles:");
    for (name, value) in profile.named_values() {
        println!("  {name}: {value:.1}");
    }

    println!("\nKeypoints:");
    for keypoint in &frame.keypoints {
        println!(
            "  {}: ({:.1}, {:.1}) score={:.2}",
            keypoint.name.as_deref().unwrap_or("?"),
            keypoint.x,
            keypoint.y,
            keypoint.score.unwrap_or(0.0)
        );
    }

    Ok(())
}

fn candidates(config: &Config, path: &Path, output: Option<PathBuf>) -> Result<()> {
    let track = load_track(config, path)?;
    let template = build_template(&track, &config.candidates, config.input.default_fps);

    let output = output.unwrap_or_else(|| path.with_extension("annotations.json"));
    let json = serde_json::to_string_pretty(&template)?;
    std::fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Generated annotation template: {}", output.display());
    println!("\nCandidates found:");
    for (label, list) in [("Top", &template.candidates.top), ("Bottom", &template.candidates.bottom)] {
        println!("  {label} positions: {}", list.len());
        for candidate in list {
            println!(
                "    Frame {} ({:.3}s) - {}",
                candidate.frame_index, candidate.video_time, candidate.reason
            );
        }
    }
    println!("\nReview candidates and move confirmed ones to the 'annotations' array.");

    Ok(())
}
