use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tortoise_gen_config::{CONFIG_FILE_NAME, GeneratorConfig};

/// Load tortoise-gen.json from the current directory.
pub fn load_config() -> Result<GeneratorConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if !path.exists() {
        anyhow::bail!("{} not found. Run 'tortoise-gen init' first.", CONFIG_FILE_NAME);
    }
    load_config_from_path(path)
}

/// Load config from a specific path.
pub fn load_config_from_path(path: PathBuf) -> Result<GeneratorConfig> {
    if !path.exists() {
        anyhow::bail!("{} not found at: {}", CONFIG_FILE_NAME, path.display());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("read {}", path.display()))?;
    let config: GeneratorConfig = serde_json::from_str(&content)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

/// Load config from project root, with fallback to defaults.
pub fn load_config_or_default(project_root: Option<PathBuf>) -> Result<GeneratorConfig> {
    let config_path = match project_root {
        Some(root) => root.join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };

    if config_path.exists() {
        load_config_from_path(config_path)
    } else {
        Ok(GeneratorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    struct CwdGuard {
        original: PathBuf,
    }

    impl CwdGuard {
        fn new(dir: &std::path::Path) -> Self {
            let original = std::env::current_dir().unwrap();
            std::env::set_current_dir(dir).unwrap();
            Self { original }
        }
    }

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.original);
        }
    }

    #[test]
    #[serial]
    fn load_config_requires_file_in_current_dir() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        let err = load_config().unwrap_err();
        assert!(err.to_string().contains("Run 'tortoise-gen init' first"));

        fs::write(CONFIG_FILE_NAME, r#"{"appName": "shop"}"#).unwrap();
        let config = load_config().unwrap();
        assert_eq!(config.app_name, "shop");
        assert_eq!(config.models_file, "models.py");
    }

    #[test]
    fn load_config_from_path_reports_parse_errors() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from_path(path.clone()).unwrap_err();
        assert!(err.to_string().starts_with("parse "));

        let missing = tmp.path().join("missing.json");
        assert!(load_config_from_path(missing).is_err());
    }

    #[test]
    fn load_config_or_default_falls_back() {
        let tmp = tempdir().unwrap();
        let config = load_config_or_default(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config, GeneratorConfig::default());

        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"{"classNamePascalCase": false}"#,
        )
        .unwrap();
        let config = load_config_or_default(Some(tmp.path().to_path_buf())).unwrap();
        assert!(!config.class_name_pascal_case);
    }
}
