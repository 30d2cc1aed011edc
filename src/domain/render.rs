//! Box-drawing renderer for labeled trees.
//!
//! Output format, one physical line per label line:
//!
//! ```text
//! Pantera
//! ├── Far Beyond Driven
//! │   └── 5 minutes Alone
//! └── Power Metal
//! ```

use itertools::structs::WithPosition;
use itertools::{Itertools, Position};
use std::slice;
use tracing::{instrument, trace};

pub const NEW_LINE: &str = "\n";
pub const EMPTY_SPACE: &str = "    ";
pub const MIDDLE_ITEM: &str = "├── ";
pub const CONTINUE_ITEM: &str = "│   ";
pub const LAST_ITEM: &str = "└── ";

/// Anything the renderer can draw: a label plus ordered children.
pub trait TreeItem: Sized {
    fn label(&self) -> &str;
    fn children(&self) -> &[Self];
}

/// Renders `root` and all of its descendants.
///
/// The root label is written verbatim, every descendant gets a branch glyph
/// and the connectors of its ancestors. Multi-line labels continue under
/// the branch glyph's column.
///
/// Traversal keeps its own stack, so the call depth does not grow with the
/// tree.
///
/// ```
/// use boxtree::Tree;
///
/// let mut root = Tree::new("root");
/// root.add_child("a").add_child("b");
/// root.add_child("c");
/// assert_eq!(boxtree::render(&root), "root\n├── a\n│   └── b\n└── c\n");
/// ```
#[instrument(level = "debug", skip_all)]
pub fn render<T: TreeItem>(root: &T) -> String {
    let mut out = String::new();
    out.push_str(root.label());
    out.push_str(NEW_LINE);

    // One entry per open sibling list; `levels` holds the is-last flag of
    // the node owning each list except the root's.
    let mut stack: Vec<WithPosition<slice::Iter<'_, T>>> =
        vec![root.children().iter().with_position()];
    let mut levels: Vec<bool> = Vec::new();
    let mut prefix = String::new();

    while let Some(siblings) = stack.last_mut() {
        let Some((position, item)) = siblings.next() else {
            stack.pop();
            if let Some(last) = levels.pop() {
                prefix.truncate(prefix.len() - connector(last).len());
            }
            continue;
        };

        let last = matches!(position, Position::Last | Position::Only);
        push_item(&mut out, &prefix, item.label(), last);

        if !item.children().is_empty() {
            prefix.push_str(connector(last));
            levels.push(last);
            stack.push(item.children().iter().with_position());
        }
    }

    trace!(bytes = out.len(), "rendered tree");
    out
}

/// Connector drawn below a node for its descendants' lines.
fn connector(last: bool) -> &'static str {
    if last {
        EMPTY_SPACE
    } else {
        CONTINUE_ITEM
    }
}

fn push_item(out: &mut String, prefix: &str, label: &str, last: bool) {
    let branch = if last { LAST_ITEM } else { MIDDLE_ITEM };
    for (i, line) in label.split('\n').enumerate() {
        out.push_str(prefix);
        out.push_str(if i == 0 { branch } else { connector(last) });
        out.push_str(line);
        out.push_str(NEW_LINE);
    }
}
