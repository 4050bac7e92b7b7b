use crate::model::{Post, Side};

/// A post positioned in a flattened thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadNode<'a> {
    pub post: &'a Post,
    /// Nesting depth (0 = question, 1 = direct reply, etc.).
    pub depth: usize,
}

impl ThreadNode<'_> {
    pub fn is_question(&self) -> bool {
        self.depth == 0
    }

    pub fn side(&self) -> Side {
        self.post.side
    }
}

/// Direction of the arrow drawn between the two halves of a paired row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Left,
    Right,
}

impl Arrow {
    /// Points from the parent's column toward the other column.
    pub fn from_parent_side(side: Side) -> Self {
        match side {
            Side::Left => Arrow::Right,
            Side::Right => Arrow::Left,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Arrow::Left => "←",
            Arrow::Right => "→",
        }
    }
}

/// One unit of two-column output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    /// A parent and one of its replies, side by side with an arrow.
    Paired {
        parent: ThreadNode<'a>,
        child: ThreadNode<'a>,
    },
    /// A post alone in its column.
    Single { node: ThreadNode<'a> },
}

/// The two grid cells of a row. A `None` cell renders blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCells<'a> {
    pub left: Option<ThreadNode<'a>>,
    pub right: Option<ThreadNode<'a>>,
}

impl<'a> Row<'a> {
    pub fn is_paired(&self) -> bool {
        matches!(self, Row::Paired { .. })
    }

    pub fn arrow(&self) -> Option<Arrow> {
        match self {
            Row::Paired { parent, .. } => Some(Arrow::from_parent_side(parent.side())),
            Row::Single { .. } => None,
        }
    }

    /// Places each half in the column named by its own side.
    ///
    /// When both halves claim the same column the parent keeps it and the
    /// other cell stays blank.
    pub fn cells(&self) -> RowCells<'a> {
        match *self {
            Row::Paired { parent, child } => {
                let pick = |side: Side| {
                    if parent.side() == side {
                        Some(parent)
                    } else if child.side() == side {
                        Some(child)
                    } else {
                        None
                    }
                };
                RowCells {
                    left: pick(Side::Left),
                    right: pick(Side::Right),
                }
            }
            Row::Single { node } => match node.side() {
                Side::Left => RowCells {
                    left: Some(node),
                    right: None,
                },
                Side::Right => RowCells {
                    left: None,
                    right: Some(node),
                },
            },
        }
    }

    /// Rendering key, unique within one layout.
    ///
    /// The same post can appear in several rows, so the row index is part of
    /// the key.
    pub fn key(&self, index: usize) -> String {
        match self {
            Row::Paired { parent, child } => {
                format!("row-{}-{}-{index}", parent.post.id, child.post.id)
            }
            Row::Single { node } => format!("row-{}-{index}", node.post.id),
        }
    }
}
