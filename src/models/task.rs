use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Comment, CommentThread};
use crate::store::Record;

string_enum! {
    pub enum TaskStatus {
        Pending => "pending",
        InProgress => "inProgress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    pub fn is_open(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Human facing sequence number, unique within the store
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_by: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Task {
    const COLLECTION: &'static str = "tasks";
    const KIND: &'static str = "Task";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Task with its comments arranged as reply threads
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub threads: Vec<CommentThread>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: Option<String>,
    pub project_id: Option<String>,
    pub lead_id: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Partial update; empty strings clear optional links
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub project_id: Option<String>,
    pub lead_id: Option<String>,
    pub status: Option<TaskStatus>,
    /// `null` clears the date
    #[serde(default, deserialize_with = "super::nullable")]
    #[ts(optional)]
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SetTaskStatus {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddComment {
    pub text: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Text over title and description, or an exact task number
    pub q: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
    pub project_id: Option<String>,
    pub lead_id: Option<String>,
}
