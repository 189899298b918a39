//! Command-line front end: load the inventories, pick the nodes, build one playbook
//! per node, and write the results.

use anyhow::Context;
use clap::Parser;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use usergen::builder::{build_playbook, Defaults};
use usergen::core::inventory::{self, NodeInventory, NodeRecord};
use usergen::core::Playbook;
use usergen::emitter;

#[derive(Parser)]
#[command(name = "usergen")]
#[command(about = "Generates Ansible playbooks that manage fleet users, groups, and SSH keys")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the user map YAML
    #[arg(long)]
    usermap: PathBuf,

    /// Path to the group map YAML
    #[arg(long)]
    groupmap: PathBuf,

    /// Path to the node map YAML (omit to generate for the built-in platform pair)
    #[arg(long)]
    nodemap: Option<PathBuf>,

    /// Comma-delimited list of nodes to generate for (default: all)
    #[arg(long, default_value = "")]
    nodes: String,

    /// Output directory, or `-` to stream one combined document to stdout
    #[arg(long, default_value = "./out")]
    out: PathBuf,

    /// Default group to add users to
    #[arg(long, default_value = "cafe")]
    default_group: String,

    /// Default shell
    #[arg(long, default_value = "fish")]
    default_shell: String,

    /// UID to start users at
    #[arg(long, default_value_t = 2001)]
    uid: u32,

    /// Base URL that serves public keys at <base>/<github>.keys
    #[arg(long, default_value = "https://github.com")]
    key_server: String,

    /// GitHub token secret file (reserved for authenticated key fetching; not
    /// consulted during generation)
    #[arg(long)]
    github_token_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Node records synthesized when no node map is given: one per platform tag, so the
/// output still flows through the one per-node code path.
fn platform_pair() -> NodeInventory {
    let tag = |name: &str| NodeRecord {
        name: name.to_owned(),
        arch: String::new(),
        os: name.to_owned(),
        distro: String::new(),
        exclude_users: vec![],
    };
    NodeInventory {
        nodes: vec![tag("Darwin"), tag("Linux")],
    }
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("open {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Some(ref token_file) = cli.github_token_file {
        debug!(
            "token file {} accepted; key fetching stays unauthenticated",
            token_file.display()
        );
    }

    let users = inventory::load_users(open(&cli.usermap)?)
        .with_context(|| format!("load from {}", cli.usermap.display()))?;
    let groups = inventory::load_groups(open(&cli.groupmap)?)
        .with_context(|| format!("load from {}", cli.groupmap.display()))?;
    let node_inventory = match cli.nodemap {
        Some(ref path) => inventory::load_nodes(open(path)?)
            .with_context(|| format!("load from {}", path.display()))?,
        None => platform_pair(),
    };

    let defaults = Defaults {
        login_group: cli.default_group.clone(),
        shell: cli.default_shell.clone(),
        start_uid: cli.uid,
        key_server: cli.key_server.clone(),
    };

    let selected = node_inventory.select(&cli.nodes);
    let to_stdout = cli.nodemap.is_none() || cli.out == Path::new("-");

    if to_stdout {
        let playbooks: Vec<Playbook> = selected
            .iter()
            .map(|node| build_playbook(&users, &groups, node, &defaults))
            .collect();
        let document = emitter::render(&playbooks).context("marshal")?;
        print!("---\n{document}");
        return Ok(());
    }

    fs::create_dir_all(&cli.out)
        .with_context(|| format!("create output directory {}", cli.out.display()))?;

    let invocation: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    for node in selected {
        let playbook = build_playbook(&users, &groups, node, &defaults);
        let path = emitter::write_node(&cli.out, &node.name, &[playbook], &invocation)?;
        info!("node {} -> {}", node.name, path.display());
    }

    Ok(())
}
