//! Append-only text entries: lead remarks, inventory notes and task comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use super::{new_id, now, User};

/// A timestamped remark or note. Entries are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

impl TimelineEntry {
    pub fn new(text: &str, author: &User) -> Self {
        Self {
            id: new_id(),
            text: text.trim().to_string(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            created_at: now(),
        }
    }
}

/// Body of "add remark" and "add note" requests
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddEntry {
    pub text: String,
}

/// A task comment. Replies name the comment they answer in `parent_id`;
/// storage is flat and threads are rebuilt on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Comment {
    pub fn new(text: &str, author: &User, parent_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            text: text.trim().to_string(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            created_at: now(),
            parent_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<CommentThread>,
}

/// Rebuild reply trees from a flat comment list.
///
/// Roots and every reply list are ordered oldest first. A reply whose
/// parent is missing (or would close a cycle) is promoted to a root.
pub fn build_threads(comments: &[Comment]) -> Vec<CommentThread> {
    let ids: HashMap<&str, &Comment> = comments.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut children: HashMap<&str, Vec<&Comment>> = HashMap::new();
    let mut roots: Vec<&Comment> = Vec::new();

    for comment in comments {
        match comment.parent_id.as_deref() {
            Some(parent) if ids.contains_key(parent) && !leads_to_cycle(comment, &ids) => {
                children.entry(parent).or_default().push(comment);
            }
            _ => roots.push(comment),
        }
    }

    roots.sort_by_key(|c| c.created_at);
    roots
        .into_iter()
        .map(|root| assemble(root, &children))
        .collect()
}

fn assemble(comment: &Comment, children: &HashMap<&str, Vec<&Comment>>) -> CommentThread {
    let mut replies: Vec<&Comment> = children
        .get(comment.id.as_str())
        .cloned()
        .unwrap_or_default();
    replies.sort_by_key(|c| c.created_at);

    CommentThread {
        comment: comment.clone(),
        replies: replies
            .into_iter()
            .map(|reply| assemble(reply, children))
            .collect(),
    }
}

fn leads_to_cycle(start: &Comment, ids: &HashMap<&str, &Comment>) -> bool {
    let mut current = start.parent_id.as_deref();
    let mut steps = 0;
    while let Some(id) = current {
        if id == start.id || steps > ids.len() {
            return true;
        }
        steps += 1;
        current = ids.get(id).and_then(|c| c.parent_id.as_deref());
    }
    false
}
