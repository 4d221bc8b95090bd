use std::fs;

use anyhow::{Context, Result};
use tortoise_gen_config::GeneratorConfig;
use tortoise_gen_core::ExtensionModule;
use tortoise_gen_parser::scan_outline;
use tracing::debug;

/// Read the configured hand-written module and outline its classes.
/// Returns `None` when no extension is configured.
pub fn load_extension(config: &GeneratorConfig) -> Result<Option<ExtensionModule>> {
    let Some(extension) = config.extension() else {
        return Ok(None);
    };

    let source = fs::read_to_string(&extension.path)
        .with_context(|| format!("read extension module: {}", extension.path.display()))?;
    let classes = scan_outline(&source);
    debug!(
        module = %extension.module,
        classes = classes.len(),
        "extension module scanned"
    );
    Ok(Some(ExtensionModule::new(&extension.module, classes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tortoise_gen_config::ExtensionConfig;

    #[test]
    fn no_extension_configured() {
        assert_eq!(load_extension(&GeneratorConfig::default()).unwrap(), None);
    }

    #[test]
    fn extension_outline_is_loaded() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("base.py");
        fs::write(
            &path,
            "class User:\n    class Meta:\n        ordering = ['-id']\n\n\nclass Group:\n    def ping(self) -> str:\n        return 'pong'\n",
        )
        .unwrap();

        let config = GeneratorConfig {
            extension: Some(ExtensionConfig {
                path,
                module: "prisma.base".into(),
            }),
            ..Default::default()
        };
        let module = load_extension(&config).unwrap().unwrap();
        assert_eq!(module.module, "prisma.base");
        assert!(module.class("User").unwrap().block("Meta").unwrap().defines("ordering"));
        assert!(module.class("Group").unwrap().declares("ping"));
    }

    #[test]
    fn missing_extension_file_is_an_error() {
        let config = GeneratorConfig {
            extension: Some(ExtensionConfig {
                path: "does/not/exist.py".into(),
                module: "x".into(),
            }),
            ..Default::default()
        };
        let err = load_extension(&config).unwrap_err();
        assert!(err.to_string().contains("read extension module"));
    }
}
