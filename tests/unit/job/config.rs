use super::*;

#[test]
fn defaults_match_reference_program() {
    let cfg = JobConfig::new(vec![PathBuf::from("a.jpg")]);
    assert_eq!(cfg.per_image_secs, 5.0);
    assert_eq!(cfg.fade_secs, 1.0);
    assert_eq!(cfg.audio_fade_secs, 2.0);
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
    assert_eq!(cfg.mode, VideoMode::Regular);
    assert_eq!(cfg.short_audio, ShortAudioPolicy::Silence);
    cfg.validate().unwrap();
}

#[test]
fn json_fills_defaults() {
    let cfg: JobConfig =
        serde_json::from_str(r#"{ "images": ["x/a.jpg", "x/b.png"], "mode": "shorts" }"#)
            .unwrap();
    assert_eq!(cfg.images.len(), 2);
    assert_eq!(cfg.mode, VideoMode::Shorts);
    assert_eq!(cfg.per_image_secs, 5.0);
    assert_eq!(cfg.canvas().height, 1920);
}

#[test]
fn json_rejects_unknown_fields() {
    let res: Result<JobConfig, _> =
        serde_json::from_str(r#"{ "images": ["a.jpg"], "seconds": 3 }"#);
    assert!(res.is_err());
}

#[test]
fn validation_failures_are_invalid_job() {
    let base = JobConfig::new(vec![PathBuf::from("a.jpg")]);

    let mut cfg = base.clone();
    cfg.images.clear();
    assert!(matches!(cfg.validate(), Err(StillreelError::InvalidJob(_))));

    let mut cfg = base.clone();
    cfg.per_image_secs = 0.0;
    assert!(matches!(cfg.validate(), Err(StillreelError::InvalidJob(_))));

    let mut cfg = base.clone();
    cfg.fade_secs = -1.0;
    assert!(matches!(cfg.validate(), Err(StillreelError::InvalidJob(_))));

    let mut cfg = base.clone();
    cfg.fps = Fps { num: 0, den: 1 };
    assert!(matches!(cfg.validate(), Err(StillreelError::InvalidJob(_))));

    let mut cfg = base;
    cfg.threads = Some(0);
    assert!(matches!(cfg.validate(), Err(StillreelError::InvalidJob(_))));
}

#[test]
fn fade_longer_than_clip_is_allowed_and_clamped_later() {
    let mut cfg = JobConfig::new(vec![PathBuf::from("a.jpg")]);
    cfg.per_image_secs = 1.0;
    cfg.fade_secs = 3.0;
    cfg.validate().unwrap();
}

#[test]
fn output_defaults_next_to_first_image() {
    let cfg = JobConfig::new(vec![PathBuf::from("shots/a.jpg"), PathBuf::from("b.jpg")]);
    assert_eq!(cfg.output_path(), PathBuf::from("shots").join(DEFAULT_OUTPUT_NAME));

    let mut cfg = cfg;
    cfg.output = Some(PathBuf::from("out/final.mp4"));
    assert_eq!(cfg.output_path(), PathBuf::from("out/final.mp4"));
}

#[test]
fn missing_job_file_is_reported() {
    assert!(JobConfig::from_json_file(Path::new("target/no/such/job.json")).is_err());
}

#[test]
fn per_image_duration_must_cover_one_frame() {
    let mut cfg = JobConfig::new(vec![PathBuf::from("a.jpg")]);
    cfg.per_image_secs = 0.01;
    let err = cfg.validate().unwrap_err();
    assert!(matches!(&err, StillreelError::InvalidJob(msg) if msg.contains("one frame")));

    cfg.per_image_secs = Fps::default().frame_duration_secs();
    cfg.validate().unwrap();

    cfg.fps = Fps::new(100, 1).unwrap();
    cfg.per_image_secs = 0.01;
    cfg.validate().unwrap();
}
