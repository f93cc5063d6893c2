//! Reading and writing TOML tree files.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeArena, NodeId, TreeDocument, TreeLayout};

/// Tree file I/O failure, naming the file in the error context.
fn io_failed<'a>(
    action: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> ApplicationError + 'a {
    move |e| ApplicationError::OperationFailed {
        context: format!("{}: {}", action, path.display()),
        source: Box::new(e),
    }
}

/// Parse a tree file without building it.
#[instrument(level = "debug")]
pub fn read_document(path: &Path) -> ApplicationResult<TreeDocument> {
    let content = fs::read_to_string(path).map_err(io_failed("read tree file", path))?;
    toml::from_str(&content).map_err(|e| ApplicationError::TreeFormat {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Build the tree stored in `path` into `arena`.
///
/// Returns `None` for a file without a `[root]` table.
#[instrument(level = "debug", skip(arena))]
pub fn load_tree(
    path: &Path,
    arena: &mut NodeArena<String>,
) -> ApplicationResult<Option<NodeId>> {
    let document = read_document(path)?;
    let root = document
        .root
        .as_ref()
        .map(|layout| layout.build_into(arena))
        .transpose()?;
    debug!(nodes = arena.size(root), "loaded tree");
    Ok(root)
}

/// Serialize the subtree at `root` as a tree file document.
pub fn to_toml(arena: &NodeArena<String>, root: Option<NodeId>) -> ApplicationResult<String> {
    let document = TreeDocument {
        root: TreeLayout::from_subtree(arena, root),
    };
    toml::to_string_pretty(&document).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize tree".to_string(),
        source: Box::new(e),
    })
}

#[instrument(level = "debug", skip(arena))]
pub fn write_tree(
    path: &Path,
    arena: &NodeArena<String>,
    root: Option<NodeId>,
) -> ApplicationResult<()> {
    let content = to_toml(arena, root)?;
    fs::write(path, content).map_err(io_failed("write tree file", path))
}
