//! ftree - manage a tree of folders from the command line.
//!
//! Usage:
//!   ftree                     List the current folder
//!   ftree mkdir NAME          Create a folder here
//!   ftree cd TARGET           Go to a folder (name, id prefix, `..` or `/`)
//!   ftree path                Show the breadcrumb
//!   ftree tree                Show the folder tree
//!   ftree rm TARGET --yes     Delete a folder and everything below it
//!   ftree --help              Show help

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use foldertree_core::{ColorTag, Folder, FolderId, FolderTree, SortOrder, SortScope};
use foldertree_ops::{Intent, IntentOutcome, Session};
use foldertree_store::{FolderStore, JsonFileStore, Snapshot, StoreConfig, default_store_path};

#[derive(Parser)]
#[command(
    name = "ftree",
    version,
    about = "A folder tree manager",
    long_about = "ftree keeps a tree of folders in a local JSON store.\n\n\
                  Create folders, move around with `cd`, tag them with colors \
                  and delete whole subtrees. Every change is saved immediately."
)]
struct Cli {
    /// Store file (defaults to the platform data directory)
    #[arg(long, env = "FTREE_STORE", global = true)]
    store: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the folders in the current folder
    Ls,

    /// Show the folder tree
    Tree {
        /// Start from the root instead of the current folder
        #[arg(short, long)]
        all: bool,

        /// Maximum depth to display
        #[arg(short, long, default_value = "3")]
        depth: usize,
    },

    /// Show the breadcrumb from the root to the current folder
    Path,

    /// Create a folder
    Mkdir {
        /// Folder name
        name: String,

        /// Parent folder (defaults to the current folder)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Change the current folder
    Cd {
        /// Child name, id prefix, `..`, `/`, or `#N` for the Nth breadcrumb entry
        target: String,
    },

    /// Delete a folder and all of its subfolders
    Rm {
        /// Folder to delete
        target: String,

        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Move a folder under another folder
    Mv {
        /// Folder to move
        target: String,

        /// New parent folder
        parent: String,
    },

    /// Rename a folder
    Rename {
        /// Folder to rename
        target: String,

        /// New name
        name: String,
    },

    /// Sort folders alphabetically
    Sort {
        /// Sort every folder below the current one, not just its children
        #[arg(short, long)]
        recursive: bool,

        /// Sort the whole tree
        #[arg(short, long, conflicts_with = "recursive")]
        all: bool,

        /// Z-A instead of A-Z
        #[arg(short, long)]
        desc: bool,
    },

    /// Set a folder's color tag
    Tag {
        /// Folder to tag
        target: String,

        /// none, red, orange, yellow, green, blue, purple or gray
        color: String,
    },

    /// Export the snapshot as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = StoreConfig::builder()
        .path(cli.store.unwrap_or_else(default_store_path))
        .build()
        .context("Invalid store configuration")?;
    let store = FolderStore::from_config(&config);
    let mut session = Session::open(store)
        .with_context(|| format!("Failed to load {}", config.path.display()))?
        .with_autosave(config.autosave);
    tracing::debug!(
        path = %config.path.display(),
        folders = session.tree().len(),
        "opened folder store"
    );

    match cli.command.unwrap_or(Command::Ls) {
        Command::Ls => print_listing(&session),
        Command::Tree { all, depth } => {
            let tree = session.tree();
            let start = if all { tree.root() } else { tree.current() };
            write_tree(&mut io::stdout().lock(), tree, start, depth)
                .context("Failed to write tree")?;
        }
        Command::Path => print_breadcrumb(session.tree()),
        Command::Mkdir { name, parent } => {
            let parent = match parent {
                Some(target) => resolve(session.tree(), &target)?,
                None => session.tree().current(),
            };
            if let IntentOutcome::Created(id) =
                session.dispatch(Intent::CreateIn { parent, name })?
            {
                println!("Created {}", describe(session.tree(), id));
            }
        }
        Command::Cd { target } => {
            let intent = match target.strip_prefix('#') {
                Some(index) => Intent::SelectBreadcrumb {
                    index: index.parse().context("Breadcrumb index must be a number")?,
                },
                None if target == ".." => Intent::NavigateUp,
                None => Intent::Navigate {
                    id: resolve(session.tree(), &target)?,
                },
            };
            session.dispatch(intent)?;
            print_breadcrumb(session.tree());
        }
        Command::Rm { target, yes } => run_delete(&mut session, &target, yes)?,
        Command::Mv { target, parent } => {
            let id = resolve(session.tree(), &target)?;
            let parent = resolve(session.tree(), &parent)?;
            session.dispatch(Intent::Move { id, parent })?;
            println!("Moved {}", describe(session.tree(), id));
        }
        Command::Rename { target, name } => {
            let id = resolve(session.tree(), &target)?;
            session.dispatch(Intent::Rename { id, name })?;
            println!("Renamed to {}", describe(session.tree(), id));
        }
        Command::Sort {
            recursive,
            all,
            desc,
        } => {
            let current = session.tree().current();
            let scope = if all {
                SortScope::All
            } else if recursive {
                SortScope::Subtree(current)
            } else {
                SortScope::Folder(current)
            };
            let order = if desc {
                SortOrder::NameDescending
            } else {
                SortOrder::NameAscending
            };
            session.dispatch(Intent::Sort { scope, order })?;
            print_listing(&session);
        }
        Command::Tag { target, color } => {
            let id = resolve(session.tree(), &target)?;
            session.dispatch(Intent::OpenTagMenu { id })?;
            session.dispatch(Intent::tag(id, color))?;
            println!("Tagged {}", describe(session.tree(), id));
        }
        Command::Export { output } => {
            let json = Snapshot::capture(session.tree()).to_json(true)?;
            match output {
                Some(output_path) => {
                    std::fs::write(&output_path, json)
                        .with_context(|| format!("Failed to write {}", output_path.display()))?;
                    eprintln!("Exported to {}", output_path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Delete behind a confirmation gate: without `--yes` only report what
/// would go.
fn run_delete(session: &mut Session<JsonFileStore>, target: &str, yes: bool) -> Result<()> {
    let id = resolve(session.tree(), target)?;
    let label = describe(session.tree(), id);

    let IntentOutcome::AwaitingConfirmation { affected, .. } =
        session.dispatch(Intent::RequestDelete { id })?
    else {
        bail!("Deletion was not staged");
    };

    if !yes {
        session.dispatch(Intent::CancelDelete)?;
        println!(
            "{} would delete {} folder(s). Re-run with --yes to confirm.",
            label, affected
        );
        return Ok(());
    }

    if let IntentOutcome::Deleted(outcome) = session.dispatch(Intent::ConfirmDelete)? {
        println!("Deleted {} ({} folders)", label, outcome.count());
        if outcome.redirected {
            print_breadcrumb(session.tree());
        }
    }
    Ok(())
}

/// Turn a user-supplied folder reference into an id.
///
/// Accepts `.`, `/`, `..`, the exact name of a child of the current folder,
/// a full id, or a unique id prefix.
fn resolve(tree: &FolderTree, target: &str) -> Result<FolderId> {
    let target = target.trim();
    match target {
        "." => return Ok(tree.current()),
        "/" => return Ok(tree.root()),
        ".." => match tree.current_folder().parent() {
            Some(parent) => return Ok(parent),
            None => bail!("Already at the root folder"),
        },
        _ => {}
    }

    let named: Vec<&Folder> = tree
        .children(tree.current())
        .into_iter()
        .filter(|f| f.name() == target)
        .collect();
    match named.as_slice() {
        [only] => return Ok(only.id()),
        [] => {}
        _ => bail!("'{}' matches several folders here; use an id", target),
    }

    if let Ok(id) = target.parse::<FolderId>() {
        return Ok(id);
    }

    let prefix = target.replace('-', "").to_lowercase();
    if prefix.is_empty() {
        bail!("Empty folder reference");
    }
    let matches: Vec<FolderId> = tree
        .ids()
        .filter(|id| id.as_uuid().simple().to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No folder matches '{}'", target),
        _ => bail!("'{}' is ambiguous ({} folders match)", target, matches.len()),
    }
}

/// Print the folders in the current folder.
fn print_listing(session: &Session<JsonFileStore>) {
    let view = session.view();
    print_breadcrumb(session.tree());
    println!("{}", "─".repeat(60));

    if view.children.is_empty() {
        println!(" (empty)");
        return;
    }
    for folder in &view.children {
        println!(
            " {:<40} {:>4} {}",
            truncate(folder.name(), 40),
            folder.child_count(),
            format_tag(folder.color_tag()),
        );
        println!("   {}", folder.id().short());
    }
}

/// Print the root-to-current path.
fn print_breadcrumb(tree: &FolderTree) {
    let names: Vec<&str> = tree.breadcrumb().iter().map(|f| f.name()).collect();
    println!("{}", names.join(" / "));
}

/// Write a folder and its descendants, one line per folder, in pre-order.
fn write_tree<W: Write>(
    out: &mut W,
    tree: &FolderTree,
    start: FolderId,
    max_depth: usize,
) -> io::Result<()> {
    let mut stack = vec![(start, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(folder) = tree.get(id) else {
            continue;
        };
        let indent = depth * 2;
        let marker = if id == tree.current() { "▶ " } else { "  " };
        writeln!(
            out,
            "{:indent$}{}{} [{}] {}",
            "",
            marker,
            folder.name(),
            folder.id().short(),
            format_tag(folder.color_tag()),
        )?;

        if depth < max_depth {
            stack.extend(folder.children().iter().rev().map(|child| (*child, depth + 1)));
        } else if folder.child_count() > 0 {
            writeln!(
                out,
                "{:indent$}    ... and {} more",
                "",
                folder.child_count()
            )?;
        }
    }
    Ok(())
}

/// Name plus short id.
fn describe(tree: &FolderTree, id: FolderId) -> String {
    match tree.get(id) {
        Some(folder) => format!("'{}' [{}]", folder.name(), id.short()),
        None => format!("[{}]", id.short()),
    }
}

fn format_tag(tag: ColorTag) -> String {
    if tag.is_set() {
        format!("●{}", tag)
    } else {
        String::new()
    }
}

/// Truncate a string to max characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_special_targets() {
        let mut tree = FolderTree::new();
        let a = tree.create(tree.root(), "docs").unwrap();
        tree.navigate(a).unwrap();

        assert_eq!(resolve(&tree, ".").unwrap(), a);
        assert_eq!(resolve(&tree, "/").unwrap(), tree.root());
        assert_eq!(resolve(&tree, "..").unwrap(), tree.root());
    }

    #[test]
    fn test_resolve_by_name_and_prefix() {
        let mut tree = FolderTree::new();
        let a = tree.create(tree.root(), "docs").unwrap();

        assert_eq!(resolve(&tree, "docs").unwrap(), a);
        assert_eq!(resolve(&tree, &a.to_string()).unwrap(), a);
        assert_eq!(resolve(&tree, &a.short()).unwrap(), a);
        assert!(resolve(&tree, "missing-folder").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let mut tree = FolderTree::new();
        tree.create(tree.root(), "dup").unwrap();
        tree.create(tree.root(), "dup").unwrap();
        assert!(resolve(&tree, "dup").is_err());
    }

    fn render(tree: &FolderTree, start: FolderId, max_depth: usize) -> String {
        let mut out = Vec::new();
        write_tree(&mut out, tree, start, max_depth).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_tree_preorder_and_depth_limit() {
        let mut tree = FolderTree::new();
        let root = tree.root();
        let a = tree.create(root, "a").unwrap();
        tree.create(a, "a1").unwrap();
        tree.create(root, "b").unwrap();

        let names: Vec<String> = render(&tree, root, 3)
            .lines()
            .map(|line| {
                let line = line.trim_start_matches([' ', '▶']);
                line.split(' ').next().unwrap().to_string()
            })
            .collect();
        assert_eq!(names, vec!["root", "a", "a1", "b"]);

        let shallow = render(&tree, root, 0);
        assert_eq!(shallow.lines().count(), 2);
        assert!(shallow.contains("... and 2 more"));
    }

    #[test]
    fn test_write_tree_deep_chain() {
        let mut tree = FolderTree::new();
        let mut parent = tree.root();
        for depth in 0..10_000 {
            parent = tree.create(parent, &format!("level-{depth}")).unwrap();
        }

        write_tree(&mut io::sink(), &tree, tree.root(), usize::MAX).unwrap();

        let mut out = Vec::new();
        write_tree(&mut out, &tree, tree.root(), 100).unwrap();
        // 101 folders plus the "more" line at the cutoff.
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 102);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
