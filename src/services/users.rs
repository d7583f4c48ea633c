//! User accounts and password handling
//!
//! Passwords are stored as Argon2 PHC strings. Emails are stored lowercased
//! and are unique.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::collections::HashSet;

use super::access::require_admin;
use super::validate;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::user::{AssignProjects, CreateUser, UpdateUser};
use crate::models::{new_id, now, Role, User, UserProfile};
use crate::store::Store;

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::unknown(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Invalid stored password hash: {}", e);
            false
        }
    }
}

fn admin_count(users: &[User]) -> usize {
    users.iter().filter(|u| u.is_admin()).count()
}

pub async fn create_user(store: &Store, actor: &User, req: CreateUser) -> AppResult<UserProfile> {
    require_admin(actor)?;

    let name = validate::required("Name", &req.name)?;
    let email = validate::email(&req.email)?;
    validate::password(&req.password)?;
    let project_ids = existing_projects(store, &req.project_ids).await?;
    let password_hash = hash_password(&req.password)?;

    let user = store
        .users
        .insert_with(|users| {
            if users.iter().any(|u| u.email == email) {
                return Err(AppError::conflict("Email already registered").with_details(email.clone()));
            }
            let created = now();
            Ok(User {
                id: new_id(),
                name,
                email: email.clone(),
                password_hash,
                role: req.role,
                project_ids,
                created_at: created,
                updated_at: created,
            })
        })
        .await?;

    tracing::info!(user = %user.id, role = %user.role, "User created");
    Ok(UserProfile::from(&user))
}

/// Admins see everyone; managers only themselves
pub async fn list_users(store: &Store, actor: &User) -> AppResult<Vec<UserProfile>> {
    let mut users: Vec<UserProfile> = store
        .users
        .list()
        .await?
        .iter()
        .filter(|u| actor.is_admin() || u.id == actor.id)
        .map(UserProfile::from)
        .collect();
    users.sort_by_key(|u| u.name.to_lowercase());
    Ok(users)
}

pub async fn get_user(store: &Store, actor: &User, id: &str) -> AppResult<UserProfile> {
    if !actor.is_admin() && actor.id != id {
        return Err(AppError::forbidden("Cannot view other users"));
    }
    let user = store.users.require(id).await?;
    Ok(UserProfile::from(&user))
}

/// Admins may change anything; a manager may only change its own name and
/// password
pub async fn update_user(
    store: &Store,
    actor: &User,
    id: &str,
    req: UpdateUser,
) -> AppResult<UserProfile> {
    let is_self = actor.id == id;
    if !actor.is_admin() {
        if !is_self {
            return Err(AppError::forbidden("Cannot modify other users"));
        }
        if req.email.is_some() || req.role.is_some() {
            return Err(AppError::forbidden("Only admins can change email or role"));
        }
    }

    let name = req.name.as_deref().map(|n| validate::required("Name", n)).transpose()?;
    let email = req.email.as_deref().map(validate::email).transpose()?;
    let password_hash = match req.password.as_deref() {
        Some(password) => {
            validate::password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = store
        .users
        .update(id, |user, users| {
            if let Some(email) = &email {
                if users.iter().any(|u| u.id != user.id && &u.email == email) {
                    return Err(AppError::conflict("Email already registered"));
                }
                user.email = email.clone();
            }
            if let Some(role) = req.role {
                if user.role == Role::Admin && role != Role::Admin && admin_count(users) <= 1 {
                    return Err(AppError::conflict("Cannot demote the last admin"));
                }
                user.role = role;
            }
            if let Some(name) = name {
                user.name = name;
            }
            if let Some(hash) = password_hash {
                user.password_hash = hash;
            }
            user.updated_at = now();
            Ok(())
        })
        .await?;

    Ok(UserProfile::from(&user))
}

pub async fn delete_user(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    require_admin(actor)?;
    if actor.id == id {
        return Err(AppError::conflict("Cannot delete your own account"));
    }
    store
        .users
        .remove_if(id, |user, users| {
            if user.is_admin() && admin_count(users) <= 1 {
                return Err(AppError::conflict("Cannot delete the last admin"));
            }
            Ok(())
        })
        .await?;
    let dropped = store.notifications.remove_where(|n| n.user_id == id).await?;
    tracing::info!(user = %id, notifications = dropped, "User deleted");
    Ok(())
}

pub async fn assign_projects(
    store: &Store,
    actor: &User,
    id: &str,
    req: AssignProjects,
) -> AppResult<UserProfile> {
    require_admin(actor)?;
    let project_ids = existing_projects(store, &req.project_ids).await?;
    let user = store
        .users
        .update(id, |user, _| {
            user.project_ids = project_ids;
            user.updated_at = now();
            Ok(())
        })
        .await?;
    Ok(UserProfile::from(&user))
}

/// Dedupe (keeping order) and reject unknown project ids
async fn existing_projects(store: &Store, ids: &[String]) -> AppResult<Vec<String>> {
    let known: HashSet<String> = store.projects.list().await?.into_iter().map(|p| p.id).collect();
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for id in ids {
        if !known.contains(id) {
            return Err(AppError::invalid_params("Unknown project").with_details(id.clone()));
        }
        if seen.insert(id.clone()) {
            result.push(id.clone());
        }
    }
    Ok(result)
}

/// Check credentials. Unknown emails and wrong passwords get the same error.
pub async fn authenticate(store: &Store, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim().to_lowercase();
    let user = store
        .users
        .list()
        .await?
        .into_iter()
        .find(|u| u.email == email);

    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(AppError::unauthorized("Invalid email or password")),
    }
}

/// Create the configured admin when no users exist yet.
/// Returns whether an account was created.
pub async fn bootstrap_admin(store: &Store, admin: &BootstrapAdmin) -> AppResult<bool> {
    let email = validate::email(&admin.email)?;
    let result = store
        .users
        .insert_with(|users| {
            if !users.is_empty() {
                return Err(AppError::conflict("Users already exist"));
            }
            let at = now();
            Ok(User {
                id: new_id(),
                name: admin.name.trim().to_string(),
                email,
                password_hash: admin.password_hash.clone(),
                role: Role::Admin,
                project_ids: Vec::new(),
                created_at: at,
                updated_at: at,
            })
        })
        .await;

    match result {
        Ok(user) => {
            tracing::info!(email = %user.email, "Bootstrap admin created");
            Ok(true)
        }
        Err(e) if e.code == ErrorCode::Conflict => Ok(false),
        Err(e) => Err(e),
    }
}
