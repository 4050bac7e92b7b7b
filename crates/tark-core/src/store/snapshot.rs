//! On-disk shape of a board.
//!
//! Posts are listed in pre-order and each reply names its parent by position
//! in that list, so the JSON nesting stays the same however deep a thread
//! goes.

use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};

use crate::layout::MAX_THREAD_DEPTH;
use crate::model::{Board, EvidenceUrl, Post, PostId, Side, Votes};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct BoardSnapshot {
    pub topic: String,
    #[serde(default = "default_left_label")]
    pub left_label: String,
    #[serde(default = "default_right_label")]
    pub right_label: String,
    #[serde(default)]
    pub posts: Vec<PostRecord>,
}

fn default_left_label() -> String {
    Board::DEFAULT_LEFT_LABEL.to_string()
}

fn default_right_label() -> String {
    Board::DEFAULT_RIGHT_LABEL.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PostRecord {
    pub id: PostId,
    /// Position of the parent in `posts`; absent for questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    pub text: String,
    pub side: Side,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub votes: Votes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<EvidenceUrl>,
}

impl PostRecord {
    fn from_post(post: &Post, parent: Option<usize>) -> Self {
        Self {
            id: post.id.clone(),
            parent,
            text: post.text.clone(),
            side: post.side,
            author: post.author.clone(),
            timestamp: post.timestamp.clone(),
            votes: post.votes,
            tag: post.tag.clone(),
            evidence: post.evidence.clone(),
        }
    }

    fn into_post(self, replies: Vec<Post>) -> Post {
        Post {
            id: self.id,
            text: self.text,
            side: self.side,
            author: self.author,
            timestamp: self.timestamp,
            votes: self.votes,
            replies,
            tag: self.tag,
            evidence: self.evidence,
        }
    }
}

/// A stored post list that cannot be rebuilt into a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// A reply names a parent that does not come before it.
    ParentNotBefore { index: usize, parent: usize },
    /// A reply sits deeper than [`MAX_THREAD_DEPTH`].
    TooDeep { index: usize },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::ParentNotBefore { index, parent } => {
                write!(f, "post #{index} names parent #{parent}, which does not precede it")
            }
            SnapshotError::TooDeep { index } => {
                write!(f, "post #{index} nests deeper than {MAX_THREAD_DEPTH} replies")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        let mut posts = Vec::with_capacity(board.post_count());
        for question in &board.questions {
            let mut stack: Vec<(&Post, Option<usize>)> = vec![(question, None)];
            while let Some((post, parent)) = stack.pop() {
                let index = posts.len();
                posts.push(PostRecord::from_post(post, parent));
                stack.extend(post.replies.iter().rev().map(|reply| (reply, Some(index))));
            }
        }
        Self {
            topic: board.topic.clone(),
            left_label: board.left_label.clone(),
            right_label: board.right_label.clone(),
            posts,
        }
    }

    pub fn into_board(self) -> Result<Board, SnapshotError> {
        let mut depths: Vec<usize> = Vec::with_capacity(self.posts.len());
        for (index, record) in self.posts.iter().enumerate() {
            let depth = match record.parent {
                None => 0,
                Some(parent) if parent < index => depths[parent] + 1,
                Some(parent) => return Err(SnapshotError::ParentNotBefore { index, parent }),
            };
            if depth > MAX_THREAD_DEPTH {
                return Err(SnapshotError::TooDeep { index });
            }
            depths.push(depth);
        }

        // Children always follow their parent, so a reverse sweep finishes
        // every subtree before its root is built.
        let mut pending: Vec<Vec<Post>> = vec![Vec::new(); self.posts.len()];
        let mut questions = Vec::new();
        for (index, record) in self.posts.into_iter().enumerate().rev() {
            let parent = record.parent;
            let mut replies = mem::take(&mut pending[index]);
            replies.reverse();
            let post = record.into_post(replies);
            match parent {
                Some(parent) => pending[parent].push(post),
                None => questions.push(post),
            }
        }
        questions.reverse();

        Ok(Board {
            topic: self.topic,
            left_label: self.left_label,
            right_label: self.right_label,
            questions,
        })
    }
}

/// Just the topic of a stored board; other fields are ignored.
#[derive(Debug, Deserialize)]
pub(super) struct TopicOnly {
    pub topic: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, side: Side, replies: Vec<Post>) -> Post {
        Post {
            id: PostId::new(id),
            text: id.to_string(),
            side,
            author: String::new(),
            timestamp: String::new(),
            votes: Votes::default(),
            replies,
            tag: None,
            evidence: Vec::new(),
        }
    }

    #[test]
    fn test_posts_are_stored_in_preorder() {
        let mut board = Board::new("t");
        board.questions = vec![
            post(
                "Q1",
                Side::Left,
                vec![
                    post("A", Side::Right, vec![post("A1", Side::Left, vec![])]),
                    post("B", Side::Right, vec![]),
                ],
            ),
            post("Q2", Side::Right, vec![]),
        ];

        let snapshot = BoardSnapshot::from_board(&board);
        let order: Vec<(&str, Option<usize>)> = snapshot
            .posts
            .iter()
            .map(|p| (p.id.as_str(), p.parent))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Q1", None),
                ("A", Some(0)),
                ("A1", Some(1)),
                ("B", Some(0)),
                ("Q2", None),
            ]
        );
        assert_eq!(snapshot.into_board().unwrap(), board);
    }

    #[test]
    fn test_duplicate_ids_survive_a_round_trip() {
        let mut board = Board::new("t");
        board.questions = vec![post("Q", Side::Left, vec![post("Q", Side::Right, vec![])])];
        let back = BoardSnapshot::from_board(&board).into_board().unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_parent_must_precede_child() {
        let snapshot: BoardSnapshot = serde_json::from_str(
            r#"{"topic":"t","posts":[
                {"id":"r-1","text":"early","side":"right","parent":1},
                {"id":"q-1","text":"Q","side":"left"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.into_board().unwrap_err(),
            SnapshotError::ParentNotBefore {
                index: 0,
                parent: 1
            }
        );

        let self_parent: BoardSnapshot = serde_json::from_str(
            r#"{"topic":"t","posts":[{"id":"q-1","text":"Q","side":"left","parent":0}]}"#,
        )
        .unwrap();
        assert!(self_parent.into_board().is_err());
    }

    #[test]
    fn test_depth_beyond_limit_is_rejected() {
        let mut posts = vec![PostRecord::from_post(&post("q", Side::Left, vec![]), None)];
        for i in 0..=MAX_THREAD_DEPTH {
            posts.push(PostRecord::from_post(
                &post(&format!("r{i}"), Side::Right, vec![]),
                Some(i),
            ));
        }
        let snapshot = BoardSnapshot {
            topic: "t".to_string(),
            left_label: default_left_label(),
            right_label: default_right_label(),
            posts,
        };
        assert_eq!(
            snapshot.into_board().unwrap_err(),
            SnapshotError::TooDeep {
                index: MAX_THREAD_DEPTH + 1
            }
        );
    }

    #[test]
    fn test_missing_labels_take_defaults() {
        let snapshot: BoardSnapshot = serde_json::from_str(r#"{"topic":"t"}"#).unwrap();
        let board = snapshot.into_board().unwrap();
        assert_eq!(board.left_label, "For");
        assert_eq!(board.right_label, "Against");
        assert!(board.questions.is_empty());
    }
}
