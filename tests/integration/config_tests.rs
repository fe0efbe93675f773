use dupescan::config::{Config, ConfigError, ScanRoot, LOOKUP_FOLDER_ENV};
use figment::Jail;
use std::path::{Path, PathBuf};

#[test]
fn test_env_provides_lookup_folder() {
    Jail::expect_with(|jail| {
        jail.create_dir("music")?;
        let music = jail.directory().join("music");
        jail.set_env(LOOKUP_FOLDER_ENV, music.display());

        let config: Config = Config::figment(Some(Path::new("absent.toml"))).extract()?;
        let root = config.scan_root().expect("env folder resolves");
        assert_eq!(root.path(), music.canonicalize().unwrap());
        Ok(())
    });
}

#[test]
fn test_cli_path_beats_env_and_file() {
    Jail::expect_with(|jail| {
        jail.create_dir("from_file")?;
        jail.create_dir("from_env")?;
        jail.create_dir("from_cli")?;
        jail.create_file("dupescan.toml", r#"lookup_folder = "from_file""#)?;
        jail.set_env(LOOKUP_FOLDER_ENV, "from_env");

        let config = Config::load(Some(Path::new("dupescan.toml")))
            .expect("config loads")
            .with_cli_path(Some(PathBuf::from("from_cli")));
        assert_eq!(config.lookup_folder, Some(PathBuf::from("from_cli")));

        let root = config.scan_root().expect("cli folder resolves");
        assert!(root.path().ends_with("from_cli"));
        Ok(())
    });
}

#[test]
fn test_file_used_when_env_unset() {
    Jail::expect_with(|jail| {
        jail.create_dir("from_file")?;
        jail.create_file("dupescan.toml", r#"lookup_folder = "from_file""#)?;

        let config = Config::load(Some(Path::new("dupescan.toml"))).expect("config loads");
        assert_eq!(config.lookup_folder, Some(PathBuf::from("from_file")));
        Ok(())
    });
}

#[test]
fn test_env_points_at_missing_folder() {
    Jail::expect_with(|jail| {
        jail.set_env(LOOKUP_FOLDER_ENV, "does/not/exist");

        let config: Config = Config::figment(Some(Path::new("absent.toml"))).extract()?;
        let err = config.scan_root().unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        Ok(())
    });
}

#[test]
fn test_invalid_config_file_is_config_error() {
    Jail::expect_with(|jail| {
        jail.create_file("dupescan.toml", "lookup_folder = 42")?;

        let err = Config::load(Some(Path::new("dupescan.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        Ok(())
    });
}

#[test]
fn test_scan_root_is_absolute() {
    let dir = tempfile::tempdir().unwrap();
    let root = ScanRoot::new(dir.path()).unwrap();
    assert!(root.path().is_absolute());
}
