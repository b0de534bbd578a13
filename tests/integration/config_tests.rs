use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use hashdupe::config::Config;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();

    assert!(config.exclusions.is_empty());
    assert_eq!(config.io_threads, 4);
    assert!(!config.prune_excluded);
    assert!(config.progress);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
exclusions = ["\\.git", "node_modules"]
io_threads = 8
prune_excluded = true
"#,
    )
    .unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(config.exclusions, vec![r"\.git", "node_modules"]);
    assert_eq!(config.io_threads, 8);
    assert!(config.prune_excluded);
    assert!(config.progress, "unset keys keep their defaults");
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 8\nprogress = true\n").unwrap();

    figment::Jail::expect_with(|jail| {
        jail.set_env("HASHDUPE_IO_THREADS", "2");
        jail.set_env("HASHDUPE_PROGRESS", "false");

        let config = Config::load_from_path(&config_path)?;
        assert_eq!(config.io_threads, 2);
        assert!(!config.progress);
        Ok(())
    });
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();

    figment::Jail::expect_with(|_| {
        let config = Config::load_from_path(temp_dir.path().join("absent.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    });
}

#[test]
fn test_config_invalid_toml_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = [not toml").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();
    assert!(result.is_err());
}

#[test]
fn test_config_wrong_type_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = \"many\"\n").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();
    assert!(result.is_err());
}

#[test]
fn test_config_toml_round_trip() {
    let config = Config {
        exclusions: vec!["tmp".to_string()],
        io_threads: 3,
        prune_excluded: true,
        progress: false,
    };
    let content = config.to_toml().unwrap();
    assert!(content.contains("io_threads = 3"));

    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, content).unwrap();

    let loaded: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .extract()
        .unwrap();
    assert_eq!(loaded, config);
}
