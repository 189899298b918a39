//! Types for representing generated tasks.

use serde::{Deserialize, Serialize};

/// Ansible resource state. Generation only ever emits [State::Present]; `absent` exists
/// so parsed documents round-trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Present,
    Absent,
}

/// One generated task: a human-readable name plus exactly one module payload.
///
/// The payload enum is flattened so the serialized form carries the Ansible module key
/// directly, e.g.:
///
/// ```yaml
/// name: group ops on db1
/// ansible.builtin.group:
///   name: ops
///   gid: 500
///   state: present
///   system: false
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Task {
    /// Used for informational, logging, and review purposes; Ansible prints it as the
    /// task runs.
    pub name: String,

    #[serde(flatten)]
    pub module: Module,
}

/// The module payloads a generated [Task] can carry.
///
/// Within a playbook, tasks appear grouped by variant in declaration order: groups
/// first, then users, then key authorization, since account creation may reference a
/// group that must already exist.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum Module {
    #[serde(rename = "ansible.builtin.group")]
    Group(Group),

    #[serde(rename = "ansible.builtin.user")]
    User(User),

    #[serde(rename = "ansible.posix.authorized_key")]
    AuthorizedKey(AuthorizedKey),
}

/// Payload of `ansible.builtin.group`: declares an OS group present.
///
/// Generated groups are never system groups; the reserved low-numbered range belongs
/// to the distribution.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Group {
    pub name: String,
    pub gid: i64,
    pub state: State,
    pub system: bool,
}

/// Payload of `ansible.builtin.user`: declares an OS account present.
///
/// Every generated account is password-locked, hidden from login-screen account
/// pickers, created with a home directory, and provisioned with a generated SSH
/// keypair, so the matching [AuthorizedKey] task only has to add a public key.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub name: String,

    /// GECOS field: `<name> (<github>)`.
    pub comment: String,

    pub uid: u32,

    /// Primary group.
    pub group: String,

    /// Supplementary groups.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub groups: Vec<String>,

    /// Absolute path to the login shell binary.
    pub shell: String,

    pub home: String,
    pub create_home: bool,

    /// Placeholder password hash; `*` on POSIX, a fixed string on macOS.
    pub password: String,
    pub password_lock: bool,

    /// Keep the account off graphical login pickers (macOS).
    pub hidden: bool,

    pub generate_ssh_key: bool,
    pub state: State,
}

/// Payload of `ansible.posix.authorized_key`: authorizes a public key fetched by
/// reference from the key server.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AuthorizedKey {
    /// Account to authorize the key for.
    pub user: String,

    /// Key source URL, `<key-server>/<github>.keys`.
    pub key: String,

    pub state: State,

    /// Never exclusive: keys already authorized for the account are left in place.
    pub exclusive: bool,

    /// Create `~/.ssh` with correct ownership and permissions if missing.
    pub manage_dir: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_task_serializes_with_module_key() {
        let task = Task {
            name: "group ops on db1".into(),
            module: Module::Group(Group {
                name: "ops".into(),
                gid: 500,
                state: State::Present,
                system: false,
            }),
        };

        let expected = "\
name: group ops on db1
ansible.builtin.group:
  name: ops
  gid: 500
  state: present
  system: false
";
        assert_eq!(expected, serde_yaml::to_string(&task).unwrap());
    }

    #[test]
    fn authorized_key_round_trips() {
        let task = Task {
            name: "ssh key for al on db1".into(),
            module: Module::AuthorizedKey(AuthorizedKey {
                user: "al".into(),
                key: "https://github.com/aluser.keys".into(),
                state: State::Present,
                exclusive: false,
                manage_dir: true,
            }),
        };

        let yaml = serde_yaml::to_string(&task).unwrap();
        assert_eq!(task, serde_yaml::from_str(&yaml).unwrap());
    }

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!("present\n", serde_yaml::to_string(&State::Present).unwrap());
        assert_eq!("absent\n", serde_yaml::to_string(&State::Absent).unwrap());
    }

    #[test]
    fn empty_supplementary_groups_are_omitted() {
        let user = User {
            name: "al".into(),
            comment: "al (aluser)".into(),
            uid: 2001,
            group: "cafe".into(),
            groups: vec![],
            shell: "/usr/bin/fish".into(),
            home: "/u/al".into(),
            create_home: true,
            password: "*".into(),
            password_lock: true,
            hidden: true,
            generate_ssh_key: true,
            state: State::Present,
        };

        let yaml = serde_yaml::to_string(&user).unwrap();
        assert!(!yaml.contains("groups:"));
        assert_eq!(user, serde_yaml::from_str(&yaml).unwrap());
    }
}
