use super::access::{require_admin, Scope};
use super::validate;
use crate::error::{AppError, AppResult};
use crate::models::project::{CreateProject, UpdateProject};
use crate::models::{new_id, now, Project, User};
use crate::store::Store;

fn name_taken(projects: &[Project], name: &str, except: Option<&str>) -> bool {
    projects
        .iter()
        .any(|p| Some(p.id.as_str()) != except && p.name.eq_ignore_ascii_case(name))
}

pub async fn create_project(store: &Store, actor: &User, req: CreateProject) -> AppResult<Project> {
    require_admin(actor)?;
    let name = validate::required("Project name", &req.name)?;
    let manager_id = validate::user_ref(store, req.manager_id).await?;

    let project = store
        .projects
        .insert_with(|projects| {
            if name_taken(projects, &name, None) {
                return Err(AppError::conflict("Project name already exists").with_details(name.clone()));
            }
            let at = now();
            Ok(Project {
                id: new_id(),
                name,
                location: req.location.trim().to_string(),
                description: req.description.trim().to_string(),
                manager_id,
                created_at: at,
                updated_at: at,
            })
        })
        .await?;

    tracing::info!(project = %project.id, "Project created");
    Ok(project)
}

/// Projects visible to `actor`, sorted by name
pub async fn list_projects(store: &Store, actor: &User) -> AppResult<Vec<Project>> {
    let projects = store.projects.list().await?;
    let scope = Scope::resolve(actor, &projects);
    let mut visible: Vec<Project> = projects
        .into_iter()
        .filter(|p| scope.covers_project(Some(&p.id)))
        .collect();
    visible.sort_by_key(|p| p.name.to_lowercase());
    Ok(visible)
}

pub async fn get_project(store: &Store, actor: &User, id: &str) -> AppResult<Project> {
    let scope = Scope::load(store, actor).await?;
    if !scope.covers_project(Some(id)) {
        return Err(AppError::forbidden("Project is outside your assigned projects"));
    }
    store.projects.require(id).await
}

/// Admins may change everything; a project's manager may edit its details
/// but not reassign it
pub async fn update_project(
    store: &Store,
    actor: &User,
    id: &str,
    req: UpdateProject,
) -> AppResult<Project> {
    let name = req.name.as_deref().map(|n| validate::required("Project name", n)).transpose()?;
    let manager_change = match req.manager_id {
        Some(raw) => {
            require_admin(actor)?;
            Some(validate::user_ref(store, Some(raw)).await?)
        }
        None => None,
    };

    store
        .projects
        .update(id, |project, projects| {
            let is_manager = project.manager_id.as_deref() == Some(actor.id.as_str());
            if !actor.is_admin() && !is_manager {
                return Err(AppError::forbidden("Only admins or the project manager can edit a project"));
            }
            if let Some(name) = name {
                if name_taken(projects, &name, Some(&project.id)) {
                    return Err(AppError::conflict("Project name already exists"));
                }
                project.name = name;
            }
            if let Some(location) = req.location {
                project.location = location.trim().to_string();
            }
            if let Some(description) = req.description {
                project.description = description.trim().to_string();
            }
            if let Some(manager_id) = manager_change {
                project.manager_id = manager_id;
            }
            project.updated_at = now();
            Ok(())
        })
        .await
}

/// Delete a project and drop it from every user's assignments
pub async fn delete_project(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    require_admin(actor)?;
    store.projects.remove(id).await?;
    let detached = store
        .users
        .update_all(|user| {
            let before = user.project_ids.len();
            user.project_ids.retain(|p| p != id);
            user.project_ids.len() != before
        })
        .await?;
    tracing::info!(project = %id, detached_users = detached, "Project deleted");
    Ok(())
}
