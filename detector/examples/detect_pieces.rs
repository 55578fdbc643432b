/// Example: detect colored pieces in a single photo
///
/// Prints the detections as JSON followed by the pieces list.
///
/// Usage:
///   cargo run --release --example detect_pieces <image_path> [config.json]
use piece_detector::{PieceDetector, PipelineConfig};
use std::env;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let image_path = if args.len() > 1 {
        args[1].clone()
    } else {
        "test_data/bricks.jpg".to_string()
    };

    let config = match args.get(2) {
        Some(path) => {
            println!("⚙️  Loading config: {}", path);
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    println!("🧱 Color Piece Detector v{}", piece_detector::version());
    println!("═══════════════════════════════════════════\n");

    let detector = PieceDetector::new(config)?;

    println!("📷 Detecting pieces in: {}", image_path);
    let start = Instant::now();
    let detections = detector.detect_file(&image_path)?;
    println!(
        "✓ Detection complete ({:.1}ms)\n",
        start.elapsed().as_secs_f32() * 1000.0
    );

    if detections.is_empty() {
        println!("ℹ️  No pieces detected");
    } else {
        println!("🎯 Detected {} piece(s):\n", detections.count());
        for (i, det) in detections.iter().enumerate() {
            println!("  {}. {}", i + 1, det);
        }
        println!();
    }

    println!("{}", detections.to_json_pretty()?);
    println!("\nPieces: {}", detections.inventory());

    Ok(())
}
