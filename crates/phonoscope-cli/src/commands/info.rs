//! Display audio file metadata.

use clap::Args;
use phonoscope_io::audio_info;

/// Display audio file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the audio file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = audio_info(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Codec:       {}", info.codec);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    match (info.duration_secs, info.num_frames) {
        (Some(secs), Some(frames)) => println!("Duration:    {secs:.3}s ({frames} frames)"),
        (Some(secs), None) => println!("Duration:    {secs:.3}s"),
        _ => println!("Duration:    unknown"),
    }

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
