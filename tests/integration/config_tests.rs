use clap::Parser;
use figment::providers::Serialized;
use std::fs;
use tempfile::tempdir;
use twintrim::cli::Cli;
use twintrim::config::Config;
use twintrim::options::ConfigurationError;
use twintrim::scanner::HashAlgorithm;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.hash_function, HashAlgorithm::Md5);
}

#[test]
fn test_config_load_from_env() {
    // A private prefix keeps Config::load in parallel tests unaffected
    std::env::set_var("TWINTRIM_ENVTEST_HASH_FUNCTION", "SHA-1");
    std::env::set_var("TWINTRIM_ENVTEST_KEY_GROUPS", "[1, 3]");

    use figment::{providers::Env, Figment};
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("TWINTRIM_ENVTEST_").split("__"));

    let config: Config = figment.extract().unwrap();
    assert_eq!(config.hash_function, HashAlgorithm::Sha1);
    assert_eq!(config.key_groups, Some(vec![1, 3]));

    std::env::remove_var("TWINTRIM_ENVTEST_HASH_FUNCTION");
    std::env::remove_var("TWINTRIM_ENVTEST_KEY_GROUPS");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let toml_content = r#"
hash_function = "blake3"
recursive = true
no_action = true
remove_links = true
pattern = '(.+?)(?:__\d)*\..*'
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.hash_function, HashAlgorithm::Blake3);
    assert!(config.recursive);
    assert!(config.no_action);
    assert!(config.remove_links);
    assert!(!config.make_links);
    assert_eq!(config.pattern.as_deref(), Some(r"(.+?)(?:__\d)*\..*"));

    let options = config.into_options().unwrap();
    assert!(options.dry_run);
    assert_eq!(options.pattern(), r"(.+?)(?:__\d)*\..*");
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "recursive = = true").unwrap();

    let result = Config::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigurationError::Load(_))));
}

#[test]
fn test_config_wrong_type() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "recursive = \"sometimes\"").unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_cli_flags_layer_over_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "hash_function = \"sha256\"\nkeep_oldest = true\n").unwrap();

    let cli = Cli::try_parse_from([
        "twintrim",
        "/path",
        "--config",
        config_path.to_str().unwrap(),
        "--make-links",
    ])
    .unwrap();
    let mut config = Config::load(cli.config.as_deref()).unwrap();
    config.merge_cli(&cli);
    let options = config.into_options().unwrap();

    assert_eq!(options.hash_algorithm, HashAlgorithm::Sha256);
    assert!(options.keep_oldest);
    assert!(options.make_links);
}
