//! Provides types that represent the inventories and the generated documents.

pub mod inventory;
pub mod playbook;
pub mod task;

#[doc(inline)]
pub use inventory::{GroupInventory, NodeRecord, UserInventory, UserRecord};

#[doc(inline)]
pub use playbook::Playbook;

#[doc(inline)]
pub use task::{Module, State, Task};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use indexmap::IndexMap;

    /// Returns a [UserInventory] with two users, a [GroupInventory] with two groups,
    /// and a [NodeRecord], matching the smallest fleet worth generating for.
    pub fn inventories() -> (UserInventory, GroupInventory, NodeRecord) {
        let users = UserInventory {
            users: vec![
                UserRecord {
                    name: "al".into(),
                    github: "aluser".into(),
                    login_group: String::new(),
                    groups: vec![],
                    shell: String::new(),
                    exclude: vec![],
                },
                UserRecord {
                    name: "bo".into(),
                    github: "bouser".into(),
                    login_group: "wheel".into(),
                    groups: vec!["ops".into()],
                    shell: "zsh".into(),
                    exclude: vec![],
                },
            ],
        };

        let groups = GroupInventory {
            groups: IndexMap::from([("ops".to_owned(), 500), ("admins".to_owned(), 600)]),
        };

        let node = NodeRecord {
            name: "db1".into(),
            arch: "x86_64".into(),
            os: "Linux".into(),
            distro: "debian".into(),
            exclude_users: vec![],
        };

        (users, groups, node)
    }
}
