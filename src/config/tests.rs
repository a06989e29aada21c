use super::yaml::{apply_overrides, validate};
use super::*;
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = load_config_from(&temp.path().join("absent.yaml")).unwrap();
    assert_eq!(config.quota.limit, DEFAULT_MEME_LIMIT);
    assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
}

#[test]
fn test_partial_yaml_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    std::fs::write(
        &path,
        "api:\n  base_url: \"https://memes.example.com/\"\nuser_id: dana\n",
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    // 环境变量可能覆盖地址，这里只校验非覆盖字段
    assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.quota, QuotaConfig::default());
    assert!(!config.api.base_url.ends_with('/'));
}

#[test]
fn test_save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.yaml");
    let mut config = Config::default();
    config.quota.limit = 9;
    config.user_id = "omer".to_string();
    save_config_to(&config, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let loaded: Config = serde_yaml::from_str(&content).unwrap();
    assert_eq!(loaded.quota.limit, 9);
    assert_eq!(loaded.user_id, "omer");
}

#[test]
fn test_env_overrides() {
    let config = apply_overrides(Config::default(), |key| match key {
        ENV_BASE_URL => Some("http://10.0.0.5:5000".to_string()),
        ENV_USER_ID => Some("trip-admin".to_string()),
        _ => None,
    });
    assert_eq!(config.api.base_url, "http://10.0.0.5:5000");
    assert_eq!(config.user_id, "trip-admin");

    let untouched = apply_overrides(Config::default(), |_| Some("  ".to_string()));
    assert_eq!(untouched.api.base_url, DEFAULT_BASE_URL);
}

#[test]
fn test_validate_rejects_bad_urls() {
    let mut config = Config::default();
    config.api.base_url = "not a url".to_string();
    assert!(matches!(
        validate(config),
        Err(ConfigError::InvalidBaseUrl { .. })
    ));

    let mut config = Config::default();
    config.api.base_url = "ftp://example.com".to_string();
    assert!(matches!(
        validate(config),
        Err(ConfigError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn test_validate_rejects_empty_user() {
    let mut config = Config::default();
    config.user_id = "   ".to_string();
    assert!(matches!(validate(config), Err(ConfigError::EmptyUserId)));
}

#[test]
fn test_zero_timeout_disables_it() {
    let api = ApiConfig {
        timeout_secs: 0,
        ..ApiConfig::default()
    };
    assert!(api.timeout().is_none());
    assert_eq!(
        ApiConfig::default().timeout(),
        Some(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    );
}

#[test]
fn test_tilde_expansion() {
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_tilde("~/x/y.json"), home.join("x/y.json"));
        assert_eq!(collapse_tilde(&home.join("x")), "~/x");
    }
    assert_eq!(expand_tilde("/abs/path"), std::path::PathBuf::from("/abs/path"));
}
