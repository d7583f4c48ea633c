//! Tasks with numbered ids, threaded comments and assignment notifications

use std::collections::BTreeSet;

use super::access::Scope;
use super::{validate, Notifier};
use crate::error::{AppError, AppResult};
use crate::format::matches_text;
use crate::models::task::{AddComment, CreateTask, TaskDetail, TaskFilter, UpdateTask};
use crate::models::timeline::build_threads;
use crate::models::{
    clean, new_id, now, Comment, CommentThread, Notification, NotificationKind, Task, TaskStatus,
    User,
};
use crate::store::Store;

fn can_see(scope: &Scope, task: &Task) -> bool {
    scope.covers_project(task.project_id.as_deref())
        || scope.is_self(task.assigned_to.as_deref())
        || scope.is_self(Some(&task.created_by))
}

/// Next task number: one past the highest number in use
pub fn next_number(tasks: &[Task]) -> u32 {
    tasks.iter().map(|t| t.number).max().unwrap_or(0) + 1
}

pub fn task_matches(task: &Task, filter: &TaskFilter) -> bool {
    if let Some(q) = clean(filter.q.clone()) {
        let by_number = q
            .trim_start_matches('#')
            .parse::<u32>()
            .is_ok_and(|n| n == task.number);
        if !by_number && !matches_text(&q, &[Some(&task.title), Some(&task.description)]) {
            return false;
        }
    }
    if filter.status.is_some_and(|s| s != task.status) {
        return false;
    }
    let links = [
        (&filter.assigned_to, &task.assigned_to),
        (&filter.project_id, &task.project_id),
        (&filter.lead_id, &task.lead_id),
    ];
    for (wanted, actual) in links {
        if let Some(wanted) = clean(wanted.clone()) {
            if actual.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }
    }
    true
}

async fn load_visible(store: &Store, actor: &User, id: &str) -> AppResult<Task> {
    let scope = Scope::load(store, actor).await?;
    let task = store.tasks.require(id).await?;
    if !can_see(&scope, &task) {
        return Err(AppError::forbidden("Task is outside your assigned projects"));
    }
    Ok(task)
}

async fn notify_assigned(notifier: &Notifier, store: &Store, actor: &User, task: &Task) {
    if let Some(assignee) = task.assigned_to.as_deref() {
        if assignee != actor.id {
            let message = format!("{} assigned you task #{}: {}", actor.name, task.number, task.title);
            notifier
                .notify(
                    store,
                    Notification::new(assignee, NotificationKind::TaskAssigned, message).for_task(&task.id),
                )
                .await;
        }
    }
}

pub async fn create_task(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    req: CreateTask,
) -> AppResult<Task> {
    let scope = Scope::load(store, actor).await?;
    let title = validate::required("Title", &req.title)?;
    let project_id = validate::project_ref(store, req.project_id).await?;
    scope.check_project(project_id.as_deref())?;
    let lead_id = validate::lead_ref(store, req.lead_id).await?;
    let assigned_to = validate::user_ref(store, req.assigned_to).await?;

    let task = store
        .tasks
        .insert_with(|tasks| {
            let at = now();
            Ok(Task {
                id: new_id(),
                number: next_number(tasks),
                title,
                description: req.description.trim().to_string(),
                assigned_to,
                project_id,
                lead_id,
                status: TaskStatus::Pending,
                due_date: req.due_date,
                created_by: actor.id.clone(),
                comments: Vec::new(),
                created_at: at,
                updated_at: at,
            })
        })
        .await?;

    tracing::info!(task = %task.id, number = task.number, "Task created");
    notify_assigned(notifier, store, actor, &task).await;
    Ok(task)
}

/// Visible tasks matching `filter`, highest number first
pub async fn list_tasks(store: &Store, actor: &User, filter: &TaskFilter) -> AppResult<Vec<Task>> {
    let scope = Scope::load(store, actor).await?;
    let mut tasks: Vec<Task> = store
        .tasks
        .list()
        .await?
        .into_iter()
        .filter(|t| can_see(&scope, t) && task_matches(t, filter))
        .collect();
    tasks.sort_by(|a, b| b.number.cmp(&a.number));
    Ok(tasks)
}

pub async fn get_task(store: &Store, actor: &User, id: &str) -> AppResult<TaskDetail> {
    let task = load_visible(store, actor, id).await?;
    let threads = build_threads(&task.comments);
    Ok(TaskDetail { task, threads })
}

pub async fn comment_threads(store: &Store, actor: &User, id: &str) -> AppResult<Vec<CommentThread>> {
    let task = load_visible(store, actor, id).await?;
    Ok(build_threads(&task.comments))
}

pub async fn update_task(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    id: &str,
    req: UpdateTask,
) -> AppResult<Task> {
    let before = load_visible(store, actor, id).await?;
    let scope = Scope::load(store, actor).await?;

    let title = req.title.as_deref().map(|t| validate::required("Title", t)).transpose()?;
    let project_id = match req.project_id {
        Some(raw) => {
            let project_id = validate::project_ref(store, Some(raw)).await?;
            scope.check_project(project_id.as_deref())?;
            Some(project_id)
        }
        None => None,
    };
    let lead_id = match req.lead_id {
        Some(raw) => Some(validate::lead_ref(store, Some(raw)).await?),
        None => None,
    };
    let assigned_to = match req.assigned_to {
        Some(raw) => Some(validate::user_ref(store, Some(raw)).await?),
        None => None,
    };

    let task = store
        .tasks
        .update(id, |task, _| {
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = req.description {
                task.description = description.trim().to_string();
            }
            if let Some(project_id) = project_id {
                task.project_id = project_id;
            }
            if let Some(lead_id) = lead_id {
                task.lead_id = lead_id;
            }
            if let Some(assigned_to) = assigned_to {
                task.assigned_to = assigned_to;
            }
            if let Some(status) = req.status {
                task.status = status;
            }
            if let Some(due_date) = req.due_date {
                task.due_date = due_date;
            }
            task.updated_at = now();
            Ok(())
        })
        .await?;

    notify_changes(notifier, store, actor, &before, &task).await;
    Ok(task)
}

pub async fn update_status(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    id: &str,
    status: TaskStatus,
) -> AppResult<Task> {
    let before = load_visible(store, actor, id).await?;
    let task = store
        .tasks
        .update(id, |task, _| {
            task.status = status;
            task.updated_at = now();
            Ok(())
        })
        .await?;
    notify_changes(notifier, store, actor, &before, &task).await;
    Ok(task)
}

async fn notify_changes(notifier: &Notifier, store: &Store, actor: &User, before: &Task, after: &Task) {
    if before.assigned_to != after.assigned_to {
        notify_assigned(notifier, store, actor, after).await;
    }
    if before.status != after.status && after.created_by != actor.id {
        let message = format!(
            "{} moved task #{} to {}",
            actor.name, after.number, after.status
        );
        notifier
            .notify(
                store,
                Notification::new(&after.created_by, NotificationKind::TaskStatus, message)
                    .for_task(&after.id),
            )
            .await;
    }
}

/// Add a comment, or a reply when `parent_id` names an existing comment
pub async fn add_comment(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    id: &str,
    req: AddComment,
) -> AppResult<TaskDetail> {
    let text = validate::required("Comment", &req.text)?;
    let parent_id = clean(req.parent_id);
    load_visible(store, actor, id).await?;

    let task = store
        .tasks
        .update(id, |task, _| {
            if let Some(parent) = parent_id.as_deref() {
                if !task.comments.iter().any(|c| c.id == parent) {
                    return Err(AppError::invalid_params("Reply target not found on this task")
                        .with_details(parent.to_string()));
                }
            }
            task.comments.push(Comment::new(&text, actor, parent_id.clone()));
            task.updated_at = now();
            Ok(())
        })
        .await?;

    // Assignee and creator hear about it, but never the author
    let recipients: BTreeSet<&str> = [task.assigned_to.as_deref(), Some(task.created_by.as_str())]
        .into_iter()
        .flatten()
        .filter(|user| *user != actor.id)
        .collect();
    for user in recipients {
        let message = format!("{} commented on task #{}", actor.name, task.number);
        notifier
            .notify(
                store,
                Notification::new(user, NotificationKind::TaskComment, message).for_task(&task.id),
            )
            .await;
    }

    let threads = build_threads(&task.comments);
    Ok(TaskDetail { task, threads })
}

/// Admins or the task's creator may delete it
pub async fn delete_task(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    store
        .tasks
        .remove_if(id, |task, _| {
            if actor.is_admin() || task.created_by == actor.id {
                Ok(())
            } else {
                Err(AppError::forbidden("Only admins or the task creator can delete a task"))
            }
        })
        .await?;
    tracing::info!(task = %id, "Task deleted");
    Ok(())
}
