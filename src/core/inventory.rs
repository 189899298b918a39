//! Types and loaders for the three inventory files.
//!
//! Each loader follows the same pattern: read the whole stream, parse it as YAML, and
//! reject an empty result. An inventory that parses cleanly but contains zero records
//! almost always means a wrong path or a schema mismatch rather than an intentionally
//! empty fleet, so emptiness is its own fatal error, distinct from a parse failure.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;
use tracing::{debug, info};

/// Why an inventory could not be loaded.
///
/// All three variants are fatal to the run; there is no partial-inventory mode. They
/// share an exit code and differ only in message.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("read: {0}")]
    Io(#[from] std::io::Error),

    #[error("unmarshal: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed but held zero records.
    #[error("no {0} found after parsing")]
    Empty(&'static str),
}

/// One user in the user map.
///
/// Read once from the inventory and immutable thereafter. Empty [Self::login_group]
/// and [Self::shell] fall back to the configured defaults at build time.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserRecord {
    /// Account name; the unique key of this record.
    pub name: String,

    /// GitHub handle whose published keys the account is authorized with.
    pub github: String,

    /// Primary group. Empty means "use the configured default group".
    #[serde(skip_serializing_if = "str::is_empty", default)]
    pub login_group: String,

    /// Supplementary groups, in inventory order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub groups: Vec<String>,

    /// Login shell by bare name, e.g. `zsh`. Empty means "use the configured default
    /// shell". The platform-specific binary directory is prepended at build time.
    #[serde(skip_serializing_if = "str::is_empty", default)]
    pub shell: String,

    /// Names of nodes this user must not be provisioned on.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exclude: Vec<String>,
}

/// The user map: every account to provision, in document order.
///
/// Document order matters: uid assignment is a function of a user's position here.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserInventory {
    pub users: Vec<UserRecord>,
}

/// The group map: group name to numeric gid.
///
/// Entry order follows the document. Gid uniqueness is not enforced.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GroupInventory {
    pub groups: IndexMap<String, i64>,
}

/// One deployment target in the node map.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NodeRecord {
    /// Host name; the unique key of this record and the playbook's `hosts` value.
    pub name: String,

    #[serde(skip_serializing_if = "str::is_empty", default)]
    pub arch: String,

    /// OS family, e.g. `Linux`, `Darwin`, `FreeBSD`, `Illumos`. Drives the
    /// per-platform account layout; unrecognized values get the generic layout.
    #[serde(skip_serializing_if = "str::is_empty", default)]
    pub os: String,

    #[serde(skip_serializing_if = "str::is_empty", default)]
    pub distro: String,

    /// Users to skip on this node.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exclude_users: Vec<String>,
}

/// The node map: every deployment target.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NodeInventory {
    pub nodes: Vec<NodeRecord>,
}

impl NodeInventory {
    /// Returns the nodes whose names appear in the comma-separated allow-list, or all
    /// nodes if the list is empty.
    ///
    /// Allow-list entries that match no node are ignored: asking for a node that does
    /// not exist is log-worthy, not fatal.
    pub fn select(&self, allow: &str) -> Vec<&NodeRecord> {
        let allowed: Vec<&str> = allow.split(',').filter(|n| !n.is_empty()).collect();
        if allowed.is_empty() {
            return self.nodes.iter().collect();
        }

        let mut selected = Vec::new();
        for node in &self.nodes {
            if allowed.iter().any(|a| *a == node.name) {
                selected.push(node);
            } else {
                debug!("skipping {} - not in {:?}", node.name, allowed);
            }
        }
        selected
    }
}

/// Loads the user map from a YAML stream.
pub fn load_users<R: Read>(mut source: R) -> Result<UserInventory, InventoryError> {
    let mut raw = String::new();
    source.read_to_string(&mut raw)?;
    info!("{} bytes read from user map", raw.len());

    let inventory: UserInventory = serde_yaml::from_str(&raw)?;
    if inventory.users.is_empty() {
        return Err(InventoryError::Empty("users"));
    }
    debug!("loaded: {inventory:?}");
    Ok(inventory)
}

/// Loads the group map from a YAML stream.
pub fn load_groups<R: Read>(mut source: R) -> Result<GroupInventory, InventoryError> {
    let mut raw = String::new();
    source.read_to_string(&mut raw)?;
    info!("{} bytes read from group map", raw.len());

    let inventory: GroupInventory = serde_yaml::from_str(&raw)?;
    if inventory.groups.is_empty() {
        return Err(InventoryError::Empty("groups"));
    }
    debug!("loaded: {inventory:?}");
    Ok(inventory)
}

/// Loads the node map from a YAML stream.
pub fn load_nodes<R: Read>(mut source: R) -> Result<NodeInventory, InventoryError> {
    let mut raw = String::new();
    source.read_to_string(&mut raw)?;
    info!("{} bytes read from node map", raw.len());

    let inventory: NodeInventory = serde_yaml::from_str(&raw)?;
    if inventory.nodes.is_empty() {
        return Err(InventoryError::Empty("nodes"));
    }
    debug!("loaded: {inventory:?}");
    Ok(inventory)
}
