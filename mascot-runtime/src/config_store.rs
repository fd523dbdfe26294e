use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use mascot_core::config::AppConfig;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<AppConfig> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("read config: {}", self.path.display()))?;
        let cfg: AppConfig = serde_json::from_slice(&bytes).context("decode config JSON")?;
        Ok(cfg)
    }

    /// First run has no settings file yet; fall back to defaults in that case only.
    pub fn load_or_default(&self) -> anyhow::Result<AppConfig> {
        if !self.path.exists() {
            info!("no settings at {}; using defaults", self.path.display());
            return Ok(AppConfig::default());
        }
        self.load()
    }

    pub fn save(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(cfg).context("encode config JSON")?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config directory: {}", parent.display()))?;
        }

        // Atomic-ish write: write temp then replace.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write temp: {}", tmp.display()))?;
        replace_file(&tmp, &self.path)
            .with_context(|| format!("replace file: {}", self.path.display()))?;
        Ok(())
    }
}

fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let backup = dst.with_extension("bak");

    if dst.exists() {
        let _ = fs::remove_file(&backup);
        fs::rename(dst, &backup)
            .with_context(|| format!("failed rename {} -> {}", dst.display(), backup.display()))?;
    }

    if let Err(e) = fs::rename(tmp, dst) {
        // Try to restore previous file if we had one.
        if backup.exists() {
            let _ = fs::rename(&backup, dst);
        }
        let _ = fs::remove_file(tmp);
        return Err(anyhow::Error::new(e).context(format!(
            "failed rename {} -> {}",
            tmp.display(),
            dst.display()
        )));
    }

    let _ = fs::remove_file(&backup);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mascot_core::config::MascotPosition;
    use mascot_core::types::ConversationMode;

    #[test]
    fn round_trips_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("nested").join("config.json"));

        let cfg = AppConfig {
            mascot_size: 1.5,
            mascot_position: MascotPosition { x: 320, y: 480 },
            always_on_top: false,
            llm_model: "gpt-4o".into(),
            conversation_mode: ConversationMode::Freeform,
            ..AppConfig::default()
        };

        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap(), cfg);

        // Overwrite replaces the file and leaves no temp/backup behind.
        let cfg2 = AppConfig {
            always_on_top: true,
            ..cfg
        };
        store.save(&cfg2).unwrap();
        assert_eq!(store.load().unwrap(), cfg2);
        assert!(!store.path().with_extension("bak").exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_loads_defaults_but_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("config.json"));

        assert!(store.load().is_err());
        assert_eq!(store.load_or_default().unwrap(), AppConfig::default());

        fs::write(store.path(), b"{not json").unwrap();
        assert!(store.load_or_default().is_err());
    }
}
