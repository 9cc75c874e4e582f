use quiz_core::{QuizConfig, QuizEngine};

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz_config.json");

    let config = QuizConfig {
        seed: Some(1234),
        a4_frequency: 442.0,
        ..QuizConfig::default()
    };
    config.save(&path).unwrap();

    assert_eq!(QuizConfig::load(&path).unwrap(), config);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz_config.json");
    std::fs::write(&path, r#"{ "seed": 9, "volume": 0.5 }"#).unwrap();

    let config = QuizConfig::load(&path).unwrap();
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.volume, 0.5);
    assert_eq!(config.a4_frequency, 440.0);
    assert_eq!(config.partials, QuizConfig::default().partials);
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does_not_exist.json");

    assert!(QuizConfig::load(&path).is_err());
    assert_eq!(QuizConfig::load_or_default(&path), QuizConfig::default());
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz_config.json");

    std::fs::write(&path, r#"{ "volume": 3.0 }"#).unwrap();
    assert!(QuizConfig::load(&path).is_err());
    assert_eq!(QuizConfig::load_or_default(&path), QuizConfig::default());

    std::fs::write(&path, "not json").unwrap();
    assert!(QuizConfig::load(&path).is_err());
}

#[test]
fn test_config_seed_drives_question_order() {
    let config = QuizConfig {
        seed: Some(55),
        ..QuizConfig::default()
    };

    let mut a = QuizEngine::from_config(&config);
    let mut b = QuizEngine::from_config(&config);
    a.start();
    b.start();
    for _ in 0..10 {
        assert_eq!(a.next_question(), b.next_question());
        a.record_result(true).unwrap();
        b.record_result(true).unwrap();
    }
}
