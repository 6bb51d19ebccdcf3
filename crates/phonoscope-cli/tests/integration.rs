//! Integration tests for phonoscope-cli.
//!
//! Tests invoke the built binary on WAV files written to temporary
//! directories and check its outputs and exit status.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::process::Command;

use phonoscope_io::{WavSpec, write_wav};
use tempfile::TempDir;

/// Helper to get the path to the `phonoscope` binary built by cargo.
fn phonoscope_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_phonoscope"));
    // keep user settings out of the tests
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd.env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

/// Write a 16-bit mono sine to `dir/name`.
fn write_tone(dir: &Path, name: &str, freq: f32, secs: f32, sample_rate: u32) -> PathBuf {
    let n = (secs * sample_rate as f32) as usize;
    let samples: Vec<f32> = (0..n)
        .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect();
    let path = dir.join(name);
    write_wav(
        &path,
        &samples,
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
        },
    )
    .unwrap();
    path
}

// ---------------------------------------------------------------------------
// phonoscope report
// ---------------------------------------------------------------------------

#[test]
fn cli_report_writes_named_pdf() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 220.0, 1.0, 16000);
    let out = dir.path().join("out");

    let output = phonoscope_bin()
        .arg("report")
        .arg(&input)
        .args(["--patient-id", "p042", "--date", "20250102", "--output-dir"])
        .arg(&out)
        .output()
        .expect("failed to run phonoscope report");

    assert!(
        output.status.success(),
        "report failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loaded: 1.00s / 16000Hz"), "stderr: {stderr}");

    let pdf = std::fs::read(out.join("p042_20250102.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.4"));
}

#[test]
fn cli_report_default_name() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 180.0, 0.5, 8000);

    let output = phonoscope_bin()
        .arg("report")
        .arg(&input)
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(dir.path().join("test_patient_20251231.pdf").is_file());
}

#[test]
fn cli_report_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 300.0, 0.5, 16000);

    let output = phonoscope_bin()
        .arg("report")
        .arg(&input)
        .arg("--stdout")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.starts_with(b"%PDF-1.4"));
    assert!(output.stdout.ends_with(b"%%EOF\n"));
    // nothing written next to the input
    assert!(!dir.path().join("test_patient_20251231.pdf").exists());
}

#[test]
fn cli_report_rejects_inverted_pitch_range() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 220.0, 0.5, 16000);

    let output = phonoscope_bin()
        .arg("report")
        .arg(&input)
        .args(["--fmin", "C5", "--fmax", "C3", "--output-dir"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fmin"), "stderr: {stderr}");
    assert!(!dir.path().join("test_patient_20251231.pdf").exists());
}

#[test]
fn cli_report_rejects_threshold_out_of_range() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 220.0, 0.5, 16000);

    let output = phonoscope_bin()
        .arg("report")
        .arg(&input)
        .args(["--threshold", "0.9"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--threshold"));
}

#[test]
fn cli_report_rejects_unknown_note() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 220.0, 0.5, 16000);

    let output = phonoscope_bin()
        .arg("report")
        .arg(&input)
        .args(["--fmin", "H9"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn cli_report_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = phonoscope_bin()
        .arg("report")
        .arg(dir.path().join("absent.wav"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.wav"));
}

#[test]
fn cli_report_reads_settings_file() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 220.0, 0.5, 16000);
    let config = dir.path().join("settings.toml");
    let out = dir.path().join("from-config");
    std::fs::write(
        &config,
        format!(
            "[report]\npatient_id = \"cfg\"\ndate = \"20240601\"\noutput_dir = {:?}\n",
            out.display().to_string()
        ),
    )
    .unwrap();

    let output = phonoscope_bin()
        .arg("report")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(out.join("cfg_20240601.pdf").is_file());
}

// ---------------------------------------------------------------------------
// phonoscope analyze / info
// ---------------------------------------------------------------------------

#[test]
fn cli_analyze_prints_summary_and_json() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 220.0, 1.0, 16000);
    let json_path = dir.path().join("tracks.json");

    let output = phonoscope_bin()
        .arg("analyze")
        .arg(&input)
        .args(["--fmin", "80", "--fmax", "1000", "--json"])
        .arg(&json_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wideband:"));
    assert!(stdout.contains("Voiced:"));
    assert!(stdout.contains("Zero crossing rate"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["sample_rate"], 16000);
    let frames = json["pitch"]["times"].as_array().unwrap().len();
    assert_eq!(json["energy"]["rms_db"].as_array().unwrap().len(), frames);
    assert_eq!(json["wideband"]["n_fft"], 512);
    assert_eq!(json["narrowband"]["hop_length"], 1024);

    // dominant narrowband frequency sits on the 220 Hz tone mid-recording
    let peaks = json["narrowband"]["peak_hz"].as_array().unwrap();
    assert_eq!(peaks.len(), json["narrowband"]["num_frames"]);
    let mid = peaks[peaks.len() / 2].as_f64().unwrap();
    assert!((mid - 220.0).abs() <= 8.0, "{mid}");
}

#[test]
fn cli_info_shows_metadata() {
    let dir = TempDir::new().unwrap();
    let input = write_tone(dir.path(), "voice.wav", 220.0, 0.5, 22050);

    let output = phonoscope_bin().arg("info").arg(&input).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("22050 Hz"));
    assert!(stdout.contains("Channels:    1"));
    assert!(stdout.contains("pcm_s16le"));
}
