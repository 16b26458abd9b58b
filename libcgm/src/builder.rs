//! Tree builder.
//!
//! Turns the flat sequence of body lines into a [`Document`]. Open indentation
//! levels are kept on a stack whose measures strictly increase from the root
//! (indent 0) to the deepest open level:
//!
//! - same indent as the top: sibling of the previous line
//! - deeper than the top: child of the previous line (one push, however deep)
//! - shallower than the top: pop until the top matches exactly, else fail

use log::trace;

use crate::error::{ErrorKind, Result};
use crate::scanner::{consume_newline, scan_indent, scan_text, Indent, ParserContext};
use crate::tree::{Document, NodeId};

/// An open indentation level and the node its lines attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub indent: usize,
    pub node: NodeId,
}

/// The currently open levels, bottom first. Never empty.
#[derive(Debug)]
pub struct LevelStack {
    levels: Vec<Level>,
}

impl LevelStack {
    pub fn new(root: NodeId) -> Self {
        Self {
            levels: vec![Level {
                indent: 0,
                node: root,
            }],
        }
    }

    pub fn top(&self) -> Level {
        self.levels[self.levels.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Adjust the stack for a line indented by `indent` and return the node the
    /// line belongs under. `last` is the node of the previous content line.
    ///
    /// Returns `None` when a dedent does not land on an open level.
    pub fn align(&mut self, indent: usize, last: NodeId) -> Option<NodeId> {
        let top = self.top();
        if indent > top.indent {
            self.levels.push(Level { indent, node: last });
        } else if indent < top.indent {
            // The bottom level has indent 0, so this never empties the stack.
            while self.top().indent > indent {
                self.levels.pop();
            }
            if self.top().indent != indent {
                return None;
            }
        }
        Some(self.top().node)
    }
}

/// Read body lines from `ctx` until the input is exhausted, appending one node
/// per non-blank line to `doc`.
pub fn build(ctx: &mut ParserContext<'_>, doc: &mut Document) -> Result<()> {
    let mut stack = LevelStack::new(doc.root());
    let mut last = doc.root();

    while !ctx.at_end() {
        let indent = match scan_indent(ctx)? {
            Indent::Blank => continue,
            Indent::Measure(indent) => indent,
        };

        let before = stack.depth();
        let parent = stack
            .align(indent, last)
            .ok_or_else(|| ctx.error(ErrorKind::BadIndentation))?;
        if stack.depth() != before {
            trace!(
                "line {}: indent {} moves to level {}",
                ctx.line(),
                indent,
                stack.depth()
            );
        }

        let text = scan_text(ctx)?;
        last = doc.append(parent, text, ctx.line());
        consume_newline(ctx)?;
    }

    Ok(())
}
