//! Append-only board operations: ask, reply, vote, and validation.

use std::collections::HashSet;
use std::fmt;

use crate::layout::{self, LayoutError, MAX_THREAD_DEPTH};
use crate::model::{Board, EvidenceUrl, Post, PostId, Side, VoteKind, Votes};

/// Input for a new question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub side: Side,
    pub author: String,
    pub tag: Option<String>,
    pub evidence: Vec<EvidenceUrl>,
}

/// Input for a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    pub text: String,
    pub author: String,
    pub evidence: Vec<EvidenceUrl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    UnknownPost(PostId),
    EmptyText,
    /// Replying to `parent` would nest deeper than [`MAX_THREAD_DEPTH`].
    TooDeep { parent: PostId },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::UnknownPost(id) => write!(f, "no post with id '{id}'"),
            BoardError::EmptyText => write!(f, "post text must not be empty"),
            BoardError::TooDeep { parent } => write!(
                f,
                "cannot reply to '{parent}': threads nest at most {MAX_THREAD_DEPTH} replies deep"
            ),
        }
    }
}

impl std::error::Error for BoardError {}

/// A consistency problem found by [`Board::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIssue {
    /// The thread cannot be laid out at all.
    Malformed {
        question: PostId,
        error: LayoutError,
    },
    /// A reply sits on the same column as its parent.
    SideMismatch { post: PostId, parent: PostId },
    /// Two questions share an id, or a reply reuses an id from another thread.
    SharedId(PostId),
}

impl BoardIssue {
    /// Malformed threads are skipped entirely; other issues still render.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BoardIssue::Malformed { .. })
    }
}

impl fmt::Display for BoardIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardIssue::Malformed { question, error } => {
                write!(f, "question {question}: {error}")
            }
            BoardIssue::SideMismatch { post, parent } => {
                write!(f, "reply {post} is on the same side as its parent {parent}")
            }
            BoardIssue::SharedId(id) => write!(f, "id {id} is used in more than one thread"),
        }
    }
}

fn clean_text(text: &str) -> Result<String, BoardError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Trims links and titles; drops links with a blank URL and blank titles.
fn clean_evidence(evidence: Vec<EvidenceUrl>) -> Vec<EvidenceUrl> {
    evidence
        .into_iter()
        .filter_map(|link| {
            let url = link.url.trim();
            if url.is_empty() {
                return None;
            }
            Some(EvidenceUrl {
                url: url.to_string(),
                title: link
                    .title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
            })
        })
        .collect()
}

impl Board {
    /// Appends a new question and returns its id.
    ///
    /// # Errors
    /// Returns [`BoardError::EmptyText`] for blank text.
    pub fn ask(&mut self, question: NewQuestion) -> Result<PostId, BoardError> {
        let text = clean_text(&question.text)?;
        let mut post = Post::question(text, question.side, question.author.trim());
        post.tag = question
            .tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        post.evidence = clean_evidence(question.evidence);
        let id = post.id.clone();
        tracing::info!(topic = %self.topic, %id, side = %post.side, "question added");
        self.questions.push(post);
        Ok(id)
    }

    /// Appends a reply under `parent_id`, on the column opposite its parent.
    ///
    /// # Errors
    /// Returns [`BoardError::UnknownPost`] if no post has `parent_id`,
    /// [`BoardError::EmptyText`] for blank text, or [`BoardError::TooDeep`]
    /// when the reply would sit deeper than [`MAX_THREAD_DEPTH`].
    pub fn reply(&mut self, parent_id: &PostId, reply: NewReply) -> Result<PostId, BoardError> {
        let text = clean_text(&reply.text)?;
        let parent_depth = self
            .questions
            .iter()
            .find_map(|q| q.find_with_depth(parent_id))
            .map(|(_, depth)| depth)
            .ok_or_else(|| BoardError::UnknownPost(parent_id.clone()))?;
        if parent_depth >= MAX_THREAD_DEPTH {
            return Err(BoardError::TooDeep {
                parent: parent_id.clone(),
            });
        }
        let parent = self
            .find_mut(parent_id)
            .ok_or_else(|| BoardError::UnknownPost(parent_id.clone()))?;
        let mut post = Post::reply_to(parent, text, reply.author.trim());
        post.evidence = clean_evidence(reply.evidence);
        let id = post.id.clone();
        tracing::info!(parent = %parent_id, %id, side = %post.side, "reply added");
        parent.replies.push(post);
        Ok(id)
    }

    /// Records one vote and returns the updated tally.
    ///
    /// # Errors
    /// Returns [`BoardError::UnknownPost`] if no post has `id`.
    pub fn vote(&mut self, id: &PostId, kind: VoteKind) -> Result<Votes, BoardError> {
        let post = self
            .find_mut(id)
            .ok_or_else(|| BoardError::UnknownPost(id.clone()))?;
        match kind {
            VoteKind::Up => post.votes.up = post.votes.up.saturating_add(1),
            VoteKind::Down => post.votes.down = post.votes.down.saturating_add(1),
        }
        Ok(post.votes)
    }

    pub fn find(&self, id: &PostId) -> Option<&Post> {
        self.questions.iter().find_map(|q| q.find(id))
    }

    pub fn find_mut(&mut self, id: &PostId) -> Option<&mut Post> {
        self.questions.iter_mut().find_map(|q| q.find_mut(id))
    }

    /// Returns the question whose thread contains `id`.
    pub fn find_question_of(&self, id: &PostId) -> Option<&Post> {
        self.questions.iter().find(|q| q.find(id).is_some())
    }

    /// Checks every thread and returns the problems found, in board order.
    pub fn validate(&self) -> Vec<BoardIssue> {
        let mut issues = Vec::new();
        let mut seen: HashSet<&PostId> = HashSet::new();

        for question in &self.questions {
            if let Err(error) = layout::layout_thread(question, None) {
                issues.push(BoardIssue::Malformed {
                    question: question.id.clone(),
                    error,
                });
                continue;
            }

            let mut stack = vec![question];
            while let Some(post) = stack.pop() {
                if !seen.insert(&post.id) {
                    issues.push(BoardIssue::SharedId(post.id.clone()));
                }
                for reply in post.replies.iter().rev() {
                    if reply.side != post.side.flip() {
                        issues.push(BoardIssue::SideMismatch {
                            post: reply.id.clone(),
                            parent: post.id.clone(),
                        });
                    }
                    stack.push(reply);
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MalformedReason;

    fn ask(board: &mut Board, text: &str, side: Side) -> PostId {
        board
            .ask(NewQuestion {
                text: text.to_string(),
                side,
                author: "ana".to_string(),
                tag: Some(" food ".to_string()),
                evidence: Vec::new(),
            })
            .unwrap()
    }

    fn reply(board: &mut Board, parent: &PostId, text: &str) -> PostId {
        board
            .reply(
                parent,
                NewReply {
                    text: text.to_string(),
                    author: "ben".to_string(),
                    evidence: Vec::new(),
                },
            )
            .unwrap()
    }

    #[test]
    fn test_ask_trims_and_tags() {
        let mut board = Board::new("breakfast");
        let id = ask(&mut board, "  Eggs or cereal?  ", Side::Right);
        let q = board.find(&id).unwrap();
        assert_eq!(q.text, "Eggs or cereal?");
        assert_eq!(q.tag.as_deref(), Some("food"));
        assert_eq!(q.side, Side::Right);
    }

    #[test]
    fn test_ask_rejects_blank_text() {
        let mut board = Board::new("breakfast");
        let err = board
            .ask(NewQuestion {
                text: "   ".to_string(),
                side: Side::Left,
                author: String::new(),
                tag: None,
                evidence: Vec::new(),
            })
            .unwrap_err();
        assert_eq!(err, BoardError::EmptyText);
        assert!(board.questions.is_empty());
    }

    #[test]
    fn test_replies_alternate_sides() {
        let mut board = Board::new("breakfast");
        let q = ask(&mut board, "Eggs?", Side::Left);
        let r1 = reply(&mut board, &q, "Yes");
        let r11 = reply(&mut board, &r1, "Why?");

        assert_eq!(board.find(&r1).unwrap().side, Side::Right);
        assert_eq!(board.find(&r11).unwrap().side, Side::Left);
        assert_eq!(board.find_question_of(&r11).unwrap().id, q);
        assert!(board.validate().is_empty());
    }

    #[test]
    fn test_replies_keep_insertion_order() {
        let mut board = Board::new("breakfast");
        let q = ask(&mut board, "Eggs?", Side::Left);
        let a = reply(&mut board, &q, "first");
        let b = reply(&mut board, &q, "second");
        let ids: Vec<&PostId> = board.questions[0].replies.iter().map(|r| &r.id).collect();
        assert_eq!(ids, vec![&a, &b]);
    }

    #[test]
    fn test_reply_to_unknown_parent() {
        let mut board = Board::new("breakfast");
        let missing = PostId::new("q-missing");
        let err = board
            .reply(
                &missing,
                NewReply {
                    text: "hi".to_string(),
                    author: String::new(),
                    evidence: Vec::new(),
                },
            )
            .unwrap_err();
        assert_eq!(err, BoardError::UnknownPost(missing));
        assert_eq!(err.to_string(), "no post with id 'q-missing'");
    }

    #[test]
    fn test_vote_counts() {
        let mut board = Board::new("breakfast");
        let q = ask(&mut board, "Eggs?", Side::Left);
        let r = reply(&mut board, &q, "Yes");
        board.vote(&r, VoteKind::Up).unwrap();
        board.vote(&r, VoteKind::Up).unwrap();
        let votes = board.vote(&r, VoteKind::Down).unwrap();
        assert_eq!(votes, Votes { up: 2, down: 1 });
        assert_eq!(board.find(&q).unwrap().votes, Votes::default());
    }

    #[test]
    fn test_validate_reports_side_mismatch() {
        let mut board = Board::new("breakfast");
        let q = ask(&mut board, "Eggs?", Side::Left);
        let r = reply(&mut board, &q, "Yes");
        board.find_mut(&r).unwrap().side = Side::Left;

        let issues = board.validate();
        assert_eq!(
            issues,
            vec![BoardIssue::SideMismatch {
                post: r,
                parent: q
            }]
        );
        assert!(!issues[0].is_fatal());
    }

    #[test]
    fn test_validate_reports_malformed_thread() {
        let mut board = Board::new("breakfast");
        let q = ask(&mut board, "Eggs?", Side::Left);
        let r = reply(&mut board, &q, "Yes");
        board.find_mut(&r).unwrap().id = q.clone();

        let issues = board.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_fatal());
        assert!(matches!(
            &issues[0],
            BoardIssue::Malformed {
                error: LayoutError::Malformed {
                    reason: MalformedReason::Cycle,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn test_validate_reports_ids_shared_across_threads() {
        let mut board = Board::new("breakfast");
        ask(&mut board, "Eggs?", Side::Left);
        ask(&mut board, "Toast?", Side::Left);
        board.questions[1].id = board.questions[0].id.clone();

        let issues = board.validate();
        assert_eq!(issues, vec![BoardIssue::SharedId(board.questions[0].id.clone())]);
    }

    #[test]
    fn test_evidence_is_cleaned_and_ordered() {
        let mut board = Board::new("breakfast");
        let q = board
            .ask(NewQuestion {
                text: "Eggs?".to_string(),
                side: Side::Left,
                author: "ana".to_string(),
                tag: None,
                evidence: vec![
                    EvidenceUrl::new(" https://a.example ").with_title("  "),
                    EvidenceUrl::new("   "),
                    EvidenceUrl::new("https://b.example").with_title(" Study "),
                ],
            })
            .unwrap();
        let r = board
            .reply(
                &q,
                NewReply {
                    text: "Source?".to_string(),
                    author: "ben".to_string(),
                    evidence: vec![EvidenceUrl::new("https://c.example")],
                },
            )
            .unwrap();

        assert_eq!(
            board.find(&q).unwrap().evidence,
            vec![
                EvidenceUrl::new("https://a.example"),
                EvidenceUrl::new("https://b.example").with_title("Study"),
            ]
        );
        assert_eq!(
            board.find(&r).unwrap().evidence,
            vec![EvidenceUrl::new("https://c.example")]
        );
    }

    #[test]
    fn test_reply_depth_is_bounded() {
        let mut board = Board::new("deep");
        let mut parent = ask(&mut board, "Root", Side::Left);
        for i in 0..MAX_THREAD_DEPTH {
            parent = reply(&mut board, &parent, &format!("level {}", i + 1));
        }
        assert!(layout::layout_thread(&board.questions[0], None).is_ok());

        let err = board
            .reply(
                &parent,
                NewReply {
                    text: "one too many".to_string(),
                    author: String::new(),
                    evidence: Vec::new(),
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::TooDeep {
                parent: parent.clone()
            }
        );
        assert!(err.to_string().contains("at most 256 replies deep"));
        assert!(board.find(&parent).unwrap().replies.is_empty());
    }
}
