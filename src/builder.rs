//! Pure construction of a [Playbook] from the inventories.
//!
//! Nothing in this module can fail on well-formed inventories, and nothing here
//! validates them: a user record with an empty name flows through as a task with an
//! empty name. Validation, if it ever exists, belongs upstream of this module.

use crate::core::inventory::{GroupInventory, NodeRecord, UserInventory, UserRecord};
use crate::core::playbook::Playbook;
use crate::core::task::{AuthorizedKey, Group, Module, State, Task, User};
use indexmap::IndexMap;

/// Generation settings threaded explicitly into [build_playbook].
///
/// These were process-wide flags in an earlier incarnation of this tool; they are an
/// argument now so the builder stays a pure function.
#[derive(Clone, Debug)]
pub struct Defaults {
    /// Primary group for users that don't set one.
    pub login_group: String,

    /// Shell name for users that don't set one.
    pub shell: String,

    /// First uid to assign. A user's uid is this plus the user's 0-based position in
    /// the user inventory, counting excluded users, so excluding a user on one node
    /// never shifts another user's uid. Reordering the inventory does.
    pub start_uid: u32,

    /// Base URL that serves public keys at `<base>/<github>.keys`.
    pub key_server: String,
}

/// Root of the home directory tree for generated accounts.
///
/// On macOS this requires a volume to be defined in /etc/synthetic.conf.
const HOME_ROOT: &str = "/u";

/// The account layout for a target platform.
///
/// Platforms differ only in where shell binaries live, in the password placeholder,
/// and in whether accounts need a platform-specific supplementary group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// The generic layout; also the fallback for unrecognized OS names.
    Posix,
    Darwin,
    FreeBsd,
    Illumos,
}

impl Platform {
    /// Maps a node's OS family to its layout. Unrecognized names get [Platform::Posix].
    pub fn from_os(os: &str) -> Self {
        match os {
            "Darwin" => Platform::Darwin,
            "FreeBSD" => Platform::FreeBsd,
            "Illumos" => Platform::Illumos,
            _ => Platform::Posix,
        }
    }

    /// Directory that holds shell binaries on this platform.
    fn shell_dir(&self) -> &'static str {
        match self {
            Platform::Posix => "/usr/bin",
            Platform::Darwin => "/opt/homebrew/bin",
            Platform::FreeBsd => "/usr/local/bin",
            Platform::Illumos => "/opt/local/bin",
        }
    }

    /// Placeholder password hash. The accounts are password-locked either way; macOS
    /// rejects `*` as a hash, so it gets a longer placeholder.
    fn password(&self) -> &'static str {
        match self {
            Platform::Darwin => "*************",
            _ => "*",
        }
    }
}

/// Builds the playbook for one node.
///
/// Task order is fixed: groups, then user accounts, then key authorization, since
/// account creation may reference a group that must already exist.
pub fn build_playbook(
    users: &UserInventory,
    groups: &GroupInventory,
    node: &NodeRecord,
    defaults: &Defaults,
) -> Playbook {
    let mut tasks = group_tasks(groups, node);
    tasks.extend(user_tasks(users, node, defaults));
    tasks.extend(ssh_tasks(users, node, defaults));

    Playbook {
        name: format!("{} ({}/{})", node.name, node.os, node.distro),
        hosts: node.name.clone(),
        r#become: "yes".to_owned(),
        environment: IndexMap::from([(
            "PATH".to_owned(),
            "{{ ansible_env.PATH }}:/opt/local/bin:/usr/pkg/bin:/usr/local/bin".to_owned(),
        )]),
        tasks,
    }
}

/// True if `user` should be skipped on `node`, from either side's exclusion list.
fn excluded(user: &UserRecord, node: &NodeRecord) -> bool {
    node.exclude_users.iter().any(|name| *name == user.name)
        || user.exclude.iter().any(|name| *name == node.name)
}

fn group_tasks(groups: &GroupInventory, node: &NodeRecord) -> Vec<Task> {
    groups
        .groups
        .iter()
        .map(|(name, gid)| Task {
            name: format!("group {} on {}", name, node.name),
            module: Module::Group(Group {
                name: name.clone(),
                gid: *gid,
                state: State::Present,
                system: false,
            }),
        })
        .collect()
}

fn user_tasks(users: &UserInventory, node: &NodeRecord, defaults: &Defaults) -> Vec<Task> {
    let platform = Platform::from_os(&node.os);

    let mut tasks = Vec::new();
    for (position, user) in users.users.iter().enumerate() {
        if excluded(user, node) {
            continue;
        }

        let shell = match user.shell.is_empty() {
            true => &defaults.shell,
            false => &user.shell,
        };
        let login_group = match user.login_group.is_empty() {
            true => &defaults.login_group,
            false => &user.login_group,
        };

        let mut groups = user.groups.clone();
        if platform == Platform::Darwin {
            // "staff" is used for local users on macOS *shrug*
            groups.push("staff".to_owned());
        }

        tasks.push(Task {
            name: format!("{} on {}", user.name, node.name),
            module: Module::User(User {
                name: user.name.clone(),
                comment: format!("{} ({})", user.name, user.github),
                uid: defaults.start_uid + position as u32,
                group: login_group.clone(),
                groups,
                shell: format!("{}/{}", platform.shell_dir(), shell),
                home: format!("{}/{}", HOME_ROOT, user.name),
                create_home: true,
                password: platform.password().to_owned(),
                password_lock: true,
                hidden: true,
                generate_ssh_key: true,
                state: State::Present,
            }),
        });
    }
    tasks
}

fn ssh_tasks(users: &UserInventory, node: &NodeRecord, defaults: &Defaults) -> Vec<Task> {
    let base = defaults.key_server.trim_end_matches('/');

    users
        .users
        .iter()
        .filter(|user| !excluded(user, node))
        .map(|user| Task {
            name: format!("ssh key for {} on {}", user.name, node.name),
            module: Module::AuthorizedKey(AuthorizedKey {
                user: user.name.clone(),
                key: format!("{}/{}.keys", base, user.github),
                state: State::Present,
                exclusive: false,
                manage_dir: true,
            }),
        })
        .collect()
}
