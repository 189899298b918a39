//! Serializes playbooks to YAML and writes them out.
//!
//! Writes are scoped per node: a failure writing one node's file aborts the run but
//! leaves files already written for earlier nodes on disk. Partial output on error is
//! accepted, documented behavior; there is no rollback.

use crate::core::playbook::Playbook;
use anyhow::Context;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Renders playbooks as one YAML sequence document.
pub fn render(playbooks: &[Playbook]) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(playbooks)
}

/// Renders the provenance comment block that prefixes every generated file.
///
/// `invocation` is the argument list the program was started with; recording it makes
/// a generated file reproducible and reviewable on its own.
pub fn provenance(invocation: &str) -> String {
    format!("# autogenerated by:\n# usergen {invocation}\n---\n")
}

/// Writes `playbooks` to `<dir>/<node>.yaml`, prefixed with the provenance block.
///
/// Returns the path written. Create, write, and close failures are all fatal; the
/// caller is expected to abort the run.
pub fn write_node(
    dir: &Path,
    node: &str,
    playbooks: &[Playbook],
    invocation: &str,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("{node}.yaml"));

    let mut file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;

    file.write_all(provenance(invocation).as_bytes())
        .with_context(|| format!("write failed to {}", path.display()))?;

    let body = render(playbooks).context("marshal")?;
    file.write_all(body.as_bytes())
        .with_context(|| format!("write failed to {}", path.display()))?;

    // File::drop swallows close errors; sync instead so they fail the run.
    file.sync_all()
        .with_context(|| format!("close {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_playbook, Defaults};
    use crate::core::fixtures::inventories;

    fn playbooks() -> Vec<Playbook> {
        let (users, groups, node) = inventories();
        let defaults = Defaults {
            login_group: "cafe".to_owned(),
            shell: "fish".to_owned(),
            start_uid: 2001,
            key_server: "https://github.com".to_owned(),
        };
        vec![build_playbook(&users, &groups, &node, &defaults)]
    }

    #[test]
    fn written_file_starts_with_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_node(dir.path(), "db1", &playbooks(), "--usermap users.yaml").unwrap();

        assert_eq!(dir.path().join("db1.yaml"), path);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with(
            "# autogenerated by:\n# usergen --usermap users.yaml\n---\n"
        ));
    }

    #[test]
    fn written_file_parses_back_to_the_same_playbooks() {
        let dir = tempfile::tempdir().unwrap();
        let playbooks = playbooks();
        let path = write_node(dir.path(), "db1", &playbooks, "").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Playbook> = serde_yaml::from_str(&contents).unwrap();
        assert_eq!(playbooks, parsed);
    }

    #[test]
    fn write_fails_if_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let error = write_node(&missing, "db1", &playbooks(), "").unwrap_err();
        assert!(error.to_string().contains("failed to create"));
    }
}
