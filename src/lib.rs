//! Deterministic generation of Ansible playbooks for fleet account management.
//!
//! # YAML file types
//!
//! Three inventory files: a user map, a group map, and a node map. Given those,
//! `usergen` renders one playbook per node that creates the groups, creates the user
//! accounts, and authorizes each user's published SSH keys.
//!
//! # Program flow
//!
//! 1. Load all three inventories ([core::inventory]). Every inventory must parse and
//!    must be non-empty; anything else aborts the run.
//!
//! 2. Select the nodes to generate for: all of them, or the subset named by a
//!    comma-separated allow-list ([NodeInventory::select]).
//!
//! 3. For each selected node, build a [Playbook] ([builder::build_playbook]). This
//!    step is a pure function of the inventories, the node, and the
//!    [builder::Defaults] threaded in from the command line.
//!
//! 4. Serialize each playbook to YAML and write it to `<out>/<node>.yaml`, prefixed
//!    with a comment recording the invocation that produced it ([emitter]).
//!
//! The whole program is one synchronous batch pass: no state survives between runs,
//! and nothing here ever executes the automation it emits.
//!
//! [NodeInventory::select]: core::inventory::NodeInventory::select
//! [Playbook]: core::Playbook

pub mod builder;
pub mod core;
pub mod emitter;

#[doc(inline)]
pub use builder::build_playbook;
