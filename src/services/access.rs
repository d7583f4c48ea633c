//! Role gating
//!
//! Admins see every record. Managers see records that belong to a project
//! in their scope: projects listed in their `projectIds` plus projects they
//! manage. Individual services widen this with "assigned to me" rules.

use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::models::{Project, User};
use crate::store::Store;

pub fn require_admin(actor: &User) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Admin role required"))
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub user_id: String,
    admin: bool,
    project_ids: HashSet<String>,
}

impl Scope {
    /// Build the scope of `actor` from its own assignments and the
    /// projects it manages
    pub fn resolve(actor: &User, projects: &[Project]) -> Self {
        let mut project_ids: HashSet<String> = actor.project_ids.iter().cloned().collect();
        project_ids.extend(
            projects
                .iter()
                .filter(|p| p.manager_id.as_deref() == Some(actor.id.as_str()))
                .map(|p| p.id.clone()),
        );
        Self {
            user_id: actor.id.clone(),
            admin: actor.is_admin(),
            project_ids,
        }
    }

    pub async fn load(store: &Store, actor: &User) -> AppResult<Self> {
        if actor.is_admin() {
            return Ok(Self::resolve(actor, &[]));
        }
        let projects = store.projects.list().await?;
        Ok(Self::resolve(actor, &projects))
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn covers_project(&self, project_id: Option<&str>) -> bool {
        self.admin || project_id.is_some_and(|id| self.project_ids.contains(id))
    }

    pub fn is_self(&self, user_id: Option<&str>) -> bool {
        user_id == Some(self.user_id.as_str())
    }

    /// Error unless a new record may be linked to `project_id`
    pub fn check_project(&self, project_id: Option<&str>) -> AppResult<()> {
        match project_id {
            Some(id) if !self.covers_project(Some(id)) => Err(AppError::forbidden(
                "Project is outside your assigned projects",
            )
            .with_details(id.to_string())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn user(id: &str, role: Role, projects: &[&str]) -> User {
        User {
            id: id.into(),
            name: id.into(),
            email: format!("{}@example.com", id),
            password_hash: String::new(),
            role,
            project_ids: projects.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn project(id: &str, manager: Option<&str>) -> Project {
        Project {
            id: id.into(),
            name: id.into(),
            location: String::new(),
            description: String::new(),
            manager_id: manager.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_manager_scope_includes_managed_projects() {
        let manager = user("m1", Role::Manager, &["p1"]);
        let projects = vec![project("p1", None), project("p2", Some("m1")), project("p3", None)];
        let scope = Scope::resolve(&manager, &projects);

        assert!(scope.covers_project(Some("p1")));
        assert!(scope.covers_project(Some("p2")));
        assert!(!scope.covers_project(Some("p3")));
        assert!(!scope.covers_project(None));
        assert!(scope.check_project(Some("p3")).is_err());
        assert!(scope.check_project(None).is_ok());
    }

    #[test]
    fn test_admin_covers_everything() {
        let admin = user("a1", Role::Admin, &[]);
        let scope = Scope::resolve(&admin, &[]);
        assert!(scope.covers_project(None));
        assert!(scope.covers_project(Some("anything")));
        assert!(require_admin(&admin).is_ok());
        assert!(require_admin(&user("m", Role::Manager, &[])).is_err());
    }
}
