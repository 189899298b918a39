//! Types for representing a generated playbook.

use crate::core::task::Task;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A host-scoped, ordered sequence of [Task]s plus global execution settings.
///
/// One playbook is generated per node. Task order is significant and fixed: groups,
/// then user accounts, then key authorization.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Playbook {
    /// Informational name, `<node> (<os>/<distro>)`.
    pub name: String,

    /// The node this playbook targets.
    pub hosts: String,

    /// Privilege elevation. Always `"yes"`: every task here manages system accounts.
    pub r#become: String,

    /// Environment overrides for task execution. Carries a PATH extension so shells
    /// installed from ports or package collections resolve on every supported
    /// platform.
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub environment: IndexMap<String, String>,

    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::{Group, Module, State};

    fn playbook() -> Playbook {
        Playbook {
            name: "db1 (Linux/debian)".into(),
            hosts: "db1".into(),
            r#become: "yes".into(),
            environment: IndexMap::from([(
                "PATH".to_owned(),
                "{{ ansible_env.PATH }}:/usr/local/bin".to_owned(),
            )]),
            tasks: vec![Task {
                name: "group ops on db1".into(),
                module: Module::Group(Group {
                    name: "ops".into(),
                    gid: 500,
                    state: State::Present,
                    system: false,
                }),
            }],
        }
    }

    #[test]
    fn round_trips() {
        let playbook = playbook();
        let yaml = serde_yaml::to_string(&playbook).unwrap();
        assert_eq!(playbook, serde_yaml::from_str(&yaml).unwrap());
    }

    #[test]
    fn serializes_become_without_raw_prefix() {
        let yaml = serde_yaml::to_string(&playbook()).unwrap();
        assert!(yaml.contains("\nbecome:"));
        assert!(!yaml.contains("r#"));
    }

    #[test]
    fn empty_environment_is_omitted() {
        let mut playbook = playbook();
        playbook.environment.clear();
        let yaml = serde_yaml::to_string(&playbook).unwrap();
        assert!(!yaml.contains("environment"));
    }
}
