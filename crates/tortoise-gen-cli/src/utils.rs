use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tortoise_gen_exporter::{OutputFile, WritePolicy};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Left alone because it already existed.
    Kept,
}

struct Staged {
    temp: PathBuf,
    target: PathBuf,
}

fn temp_path(target: &Path) -> Result<PathBuf> {
    let name = target
        .file_name()
        .ok_or_else(|| anyhow!("output path has no file name: {}", target.display()))?;
    Ok(target.with_file_name(format!(".{}.tmp", name.to_string_lossy())))
}

fn stage(file: &OutputFile) -> Result<Staged> {
    if let Some(parent) = file.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    let temp = temp_path(&file.path)?;
    fs::write(&temp, &file.contents).with_context(|| format!("write {}", temp.display()))?;
    Ok(Staged {
        temp,
        target: file.path.clone(),
    })
}

fn discard(staged: &[Staged]) {
    for s in staged {
        let _ = fs::remove_file(&s.temp);
    }
}

/// Write every file or none of them: contents go to sibling temporary files
/// first and are renamed into place only once all were written.
pub fn write_files(files: &[OutputFile]) -> Result<Vec<(PathBuf, WriteOutcome)>> {
    let mut staged = Vec::new();
    let mut outcomes = Vec::new();

    for file in files {
        if file.policy == WritePolicy::CreateIfAbsent && file.path.exists() {
            debug!(path = %file.path.display(), "exists; kept");
            outcomes.push((file.path.clone(), WriteOutcome::Kept));
            continue;
        }
        match stage(file) {
            Ok(s) => staged.push(s),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }

    for (i, s) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(&s.temp, &s.target) {
            discard(&staged[i..]);
            let replaced: Vec<String> = staged[..i]
                .iter()
                .map(|done| done.target.display().to_string())
                .collect();
            let context = if replaced.is_empty() {
                format!("replace {}", s.target.display())
            } else {
                format!(
                    "replace {} (already replaced: {})",
                    s.target.display(),
                    replaced.join(", ")
                )
            };
            return Err(err).context(context);
        }
        outcomes.push((s.target.clone(), WriteOutcome::Written));
    }

    Ok(outcomes)
}
