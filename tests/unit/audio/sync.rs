use super::*;

fn constant(sample_rate: u32, secs: f64, value: f32) -> AudioTrack {
    let frames = (secs * f64::from(sample_rate)).round() as usize;
    AudioTrack::new(sample_rate, 2, vec![value; frames * 2]).unwrap()
}

#[test]
fn track_validation() {
    assert!(AudioTrack::new(0, 2, vec![]).is_err());
    assert!(AudioTrack::new(48_000, 0, vec![]).is_err());
    assert!(AudioTrack::new(48_000, 2, vec![0.0; 3]).is_err());
    let t = AudioTrack::new(4, 2, vec![0.0; 8]).unwrap();
    assert_eq!(t.frames(), 4);
    assert_eq!(t.duration_secs(), 1.0);
}

#[test]
fn long_track_is_trimmed_to_exact_target() {
    let track = constant(1000, 20.0, 0.5);
    let synced = synchronize(&track, 15.0, 2.0, ShortAudioPolicy::Silence).unwrap();
    assert_eq!(synced.frames(), 15_000);
    assert_eq!(synced.duration_secs(), 15.0);
    // Source is untouched.
    assert_eq!(track.frames(), 20_000);
}

#[test]
fn fades_shape_head_and_tail() {
    let track = constant(100, 10.0, 1.0);
    let synced = synchronize(&track, 10.0, 2.0, ShortAudioPolicy::Silence).unwrap();
    let s = synced.samples();
    assert_eq!(s[0], 0.0);
    // 1 s into a 2 s fade-in.
    assert!((s[100 * 2] - 0.5).abs() < 1e-6);
    // Middle is untouched.
    assert_eq!(s[500 * 2], 1.0);
    // 1 s before the end.
    assert!((s[900 * 2] - 0.5).abs() < 1e-6);
    assert!(s[s.len() - 1] < 0.01);
}

#[test]
fn short_track_is_padded_with_silence_by_default() {
    let track = constant(100, 3.0, 1.0);
    let synced = synchronize(&track, 5.0, 0.0, ShortAudioPolicy::default()).unwrap();
    assert_eq!(synced.frames(), 500);
    let s = synced.samples();
    assert_eq!(s[299 * 2], 1.0);
    assert!(s[300 * 2..].iter().all(|&v| v == 0.0));
}

#[test]
fn short_track_fade_out_lands_on_audible_end() {
    let track = constant(100, 3.0, 1.0);
    let synced = synchronize(&track, 5.0, 1.0, ShortAudioPolicy::Silence).unwrap();
    let s = synced.samples();
    // Half a second before the audio runs out.
    assert!((s[250 * 2] - 0.5).abs() < 1e-6);
}

#[test]
fn loop_policy_repeats_content() {
    let samples: Vec<f32> = (0..4).flat_map(|i| [i as f32 / 10.0; 2]).collect();
    let track = AudioTrack::new(4, 2, samples).unwrap();
    let synced = synchronize(&track, 2.5, 0.0, ShortAudioPolicy::Loop).unwrap();
    assert_eq!(synced.frames(), 10);
    let left: Vec<f32> = synced.samples().iter().step_by(2).copied().collect();
    assert_eq!(
        left,
        vec![0.0, 0.1, 0.2, 0.3, 0.0, 0.1, 0.2, 0.3, 0.0, 0.1]
    );
}

#[test]
fn reject_policy_fails_short_tracks_only() {
    let short = constant(100, 1.0, 1.0);
    assert!(matches!(
        synchronize(&short, 2.0, 0.0, ShortAudioPolicy::Reject),
        Err(StillreelError::InvalidJob(_))
    ));
    let long = constant(100, 3.0, 1.0);
    assert!(synchronize(&long, 2.0, 0.0, ShortAudioPolicy::Reject).is_ok());
}

#[test]
fn invalid_targets_are_rejected() {
    let track = constant(100, 1.0, 1.0);
    assert!(synchronize(&track, 0.0, 0.0, ShortAudioPolicy::Silence).is_err());
    assert!(synchronize(&track, 1.0, -1.0, ShortAudioPolicy::Silence).is_err());
}

#[test]
fn f32le_file_round_trips_byte_layout() {
    let track = AudioTrack::new(4, 1, vec![0.25, -2.0]).unwrap();
    let path = std::path::PathBuf::from("target")
        .join("unit_audio_sync")
        .join("out.f32le");
    write_f32le_file(&track, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes(bytes[0..4].try_into().unwrap()), 0.25);
    // Out-of-range samples are clamped for the encoder.
    assert_eq!(f32::from_le_bytes(bytes[4..8].try_into().unwrap()), -1.0);
}
