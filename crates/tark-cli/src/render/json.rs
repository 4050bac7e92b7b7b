//! Machine-readable export of laid-out threads.

use serde::Serialize;
use tark_core::layout::{Arrow, Row, ThreadLayout, ThreadNode};
use tark_core::model::{EvidenceUrl, PostId, Side, Votes};

#[derive(Debug, Serialize)]
pub struct ThreadExport<'a> {
    pub question: NodeExport<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rows: Vec<RowExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NodeExport<'a> {
    pub id: &'a PostId,
    pub side: Side,
    pub depth: usize,
    pub author: &'a str,
    pub timestamp: &'a str,
    pub text: &'a str,
    pub votes: Votes,
    pub replies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub evidence: &'a [EvidenceUrl],
}

impl<'a> From<ThreadNode<'a>> for NodeExport<'a> {
    fn from(node: ThreadNode<'a>) -> Self {
        let post = node.post;
        Self {
            id: &post.id,
            side: post.side,
            depth: node.depth,
            author: &post.author,
            timestamp: &post.timestamp,
            text: &post.text,
            votes: post.votes,
            replies: post.reply_count(),
            tag: post.tag.as_deref(),
            evidence: &post.evidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RowExport<'a> {
    #[serde(flatten)]
    pub body: RowBody<'a>,
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RowBody<'a> {
    Paired {
        parent: NodeExport<'a>,
        child: NodeExport<'a>,
        arrow: ArrowExport,
    },
    Single {
        node: NodeExport<'a>,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowExport {
    Left,
    Right,
}

impl From<Arrow> for ArrowExport {
    fn from(arrow: Arrow) -> Self {
        match arrow {
            Arrow::Left => ArrowExport::Left,
            Arrow::Right => ArrowExport::Right,
        }
    }
}

fn export_row<'a>(row: &Row<'a>, index: usize) -> RowExport<'a> {
    let body = match *row {
        Row::Paired { parent, child } => RowBody::Paired {
            parent: parent.into(),
            child: child.into(),
            arrow: Arrow::from_parent_side(parent.side()).into(),
        },
        Row::Single { node } => RowBody::Single { node: node.into() },
    };
    RowExport {
        body,
        key: row.key(index),
    }
}

/// Exports visible and failed threads; hidden threads are omitted.
pub fn export_threads<'a>(layouts: &[ThreadLayout<'a>]) -> Vec<ThreadExport<'a>> {
    layouts
        .iter()
        .filter_map(|layout| {
            let question = NodeExport::from(ThreadNode {
                post: layout.question(),
                depth: 0,
            });
            match layout {
                ThreadLayout::Hidden { .. } => None,
                ThreadLayout::Visible { rows, .. } => Some(ThreadExport {
                    question,
                    error: None,
                    rows: rows
                        .iter()
                        .enumerate()
                        .map(|(i, row)| export_row(row, i))
                        .collect(),
                }),
                ThreadLayout::Failed { error, .. } => Some(ThreadExport {
                    question,
                    error: Some(error.to_string()),
                    rows: Vec::new(),
                }),
            }
        })
        .collect()
}
