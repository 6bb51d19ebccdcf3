//! Analysis demo: the full pipeline on a synthetic vowel-like glide.
//!
//! Run with: cargo run -p phonoscope-analysis --example analysis_demo

use phonoscope_analysis::{AnalysisParams, NoopObserver, PitchRange, SampleBuffer, analyze};
use std::f32::consts::PI;

fn main() {
    let sample_rate = 16000;
    let secs = 1.5;
    let n = (secs * sample_rate as f32) as usize;

    // --- A 150 → 250 Hz glide with three harmonics, silent for the last 0.5 s ---
    let mut phase = 0.0f32;
    let samples: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            if t > 1.0 {
                return 0.0;
            }
            let f0 = 150.0 + 100.0 * t;
            phase += 2.0 * PI * f0 / sample_rate as f32;
            0.5 * phase.sin() + 0.25 * (2.0 * phase).sin() + 0.125 * (3.0 * phase).sin()
        })
        .collect();
    let buffer = SampleBuffer::new(samples, sample_rate).expect("valid buffer");

    let params = AnalysisParams {
        pitch_range: PitchRange::new(80.0, 600.0),
        ..AnalysisParams::default()
    };
    let report =
        analyze(&buffer, &params, &params.tracker(), &NoopObserver).expect("valid parameters");

    println!("=== Spectrograms ===\n");
    for (name, spec) in [("wideband", &report.wideband), ("narrowband", &report.narrowband)] {
        println!(
            "{name:>10}: {} frames x {} bins, {:.1} Hz/bin",
            spec.num_frames,
            spec.num_bins,
            spec.bin_to_freq(1)
        );
    }

    println!("\n=== Pitch / intensity / ZCR every 10 frames ===\n");
    println!("{:>8} {:>10} {:>10} {:>8}", "Time", "F0 (Hz)", "RMS (dB)", "ZCR");
    println!("{:->8} {:->10} {:->10} {:->8}", "", "", "", "");
    let times = report.pitch.times();
    for i in (0..report.pitch.len()).step_by(10) {
        let f0 = report.pitch.frequency[i].map_or_else(|| "-".to_string(), |hz| format!("{hz:.1}"));
        let zcr = report
            .zcr
            .grid
            .frame_at(times[i])
            .min(report.zcr.len().saturating_sub(1));
        println!(
            "{:>8.3} {:>10} {:>10.1} {:>8.3}",
            times[i], f0, report.energy.db[i], report.zcr.rate[zcr]
        );
    }

    println!(
        "\nVoiced: {:.0}% of frames, median F0 {:.1} Hz",
        report.pitch.voiced_ratio() * 100.0,
        report.pitch.median_frequency().unwrap_or(0.0)
    );
}
