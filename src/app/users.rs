//! In-memory user directory and the user pages.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::app::AppError;
use crate::http::server::AppState;
use crate::inertia::{ApiError, FieldErrors, Page, Props, RequestIntent, Validate};

const FIRST_NAMES: [&str; 10] = [
    "Alice", "Bob", "Carol", "David", "Eve", "Frank", "Grace", "Heidi", "Ivan", "Judy",
];
const LAST_NAMES: [&str; 5] = ["Smith", "Jones", "Brown", "Taylor", "Wilson"];

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Role::Admin),
            "editor" => Some(Role::Editor),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Validated listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    pub q: Option<String>,
    /// `None` means all roles.
    pub role: Option<Role>,
    pub page: usize,
    pub limit: usize,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            q: None,
            role: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub last_page: usize,
    pub limit: usize,
}

/// Filters echoed back to the listing page.
#[derive(Debug, Clone, Serialize)]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    pub role: String,
}

/// Read-only user store.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Deterministic directory of `count` users.
    pub fn seeded(count: usize) -> Self {
        let roles = [Role::User, Role::User, Role::Editor, Role::User, Role::Admin];
        let users = (0..count)
            .map(|i| {
                let first = FIRST_NAMES[i % FIRST_NAMES.len()];
                let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
                User {
                    id: i as u32 + 1,
                    name: format!("{first} {last}"),
                    email: format!(
                        "{}.{}{}@example.com",
                        first.to_lowercase(),
                        last.to_lowercase(),
                        i + 1
                    ),
                    role: roles[i % roles.len()],
                }
            })
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn matching<'a>(&'a self, filter: &'a UserFilter) -> impl Iterator<Item = &'a User> + 'a {
        let needle = filter.q.as_deref().map(str::to_lowercase);
        self.users.iter().filter(move |user| {
            let role_ok = filter.role.map_or(true, |role| user.role == role);
            let text_ok = needle.as_deref().map_or(true, |needle| {
                user.name.to_lowercase().contains(needle) || user.email.to_lowercase().contains(needle)
            });
            role_ok && text_ok
        })
    }

    /// Users on the requested page.
    pub fn search(&self, filter: &UserFilter) -> Vec<User> {
        let offset = filter.page.saturating_sub(1).saturating_mul(filter.limit);
        self.matching(filter)
            .skip(offset)
            .take(filter.limit)
            .cloned()
            .collect()
    }

    /// Pagination metadata for `filter`.
    pub fn meta(&self, filter: &UserFilter) -> PageMeta {
        let total = self.matching(filter).count();
        PageMeta {
            total,
            page: filter.page,
            last_page: total.div_ceil(filter.limit).max(1),
            limit: filter.limit,
        }
    }
}

/// Raw listing query; every field is optional so bad input becomes field errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl UserQuery {
    /// Validate into a filter, or the field errors.
    pub fn parse(&self) -> Result<UserFilter, FieldErrors> {
        self.validate()?;

        Ok(UserFilter {
            q: self
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from),
            role: self.role.as_deref().and_then(Role::parse),
            page: positive(self.page.as_deref()).ok().flatten().unwrap_or(DEFAULT_PAGE),
            limit: positive(self.limit.as_deref()).ok().flatten().unwrap_or(DEFAULT_LIMIT),
        })
    }

    fn filters(&self) -> Filters {
        Filters {
            q: self.q.clone(),
            role: self.role.clone().unwrap_or_else(|| "all".to_string()),
        }
    }
}

impl Validate for UserQuery {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(role) = self.role.as_deref() {
            if role != "all" && Role::parse(role).is_none() {
                errors.add("role", "Role must be one of all, admin, editor, user");
            }
        }
        if positive(self.page.as_deref()).is_err() {
            errors.add("page", "Page must be a positive integer");
        }
        if positive(self.limit.as_deref()).is_err() {
            errors.add("limit", "Limit must be a positive integer");
        }

        errors.into_result()
    }
}

/// `Ok(None)` when absent or blank, `Err` when present but not a positive integer.
fn positive(raw: Option<&str>) -> Result<Option<usize>, ()> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(()),
        },
    }
}

/// `GET /users`
pub async fn index(
    State(state): State<AppState>,
    intent: RequestIntent,
    Query(query): Query<UserQuery>,
) -> Result<Response, AppError> {
    let filters = serde_json::to_value(query.filters())?;

    let filter = match query.parse() {
        Ok(filter) => filter,
        Err(errors) => {
            tracing::debug!(url = %intent.url, errors = errors.len(), "Rejected user query");
            let page = Page::new("Users")
                .props(Props::new().with("users", Vec::<serde_json::Value>::new()))
                .prop("filters", filters)
                .with_errors(&errors);
            return Ok(state.inertia.render(&intent, page).await?);
        }
    };

    let listing = state.users.clone();
    let counting = state.users.clone();
    let meta_filter = filter.clone();
    let props = Props::new()
        .with("filters", filters)
        .lazy("users", move || Ok(listing.search(&filter)))
        .lazy("meta", move || Ok(counting.meta(&meta_filter)));

    Ok(state
        .inertia
        .render(&intent, Page::new("Users").props(props))
        .await?)
}

/// `GET /users/{id}`
pub async fn show(
    State(state): State<AppState>,
    intent: RequestIntent,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = match positive(Some(&raw_id)) {
        Ok(Some(id)) => u32::try_from(id).map_err(|_| invalid_id())?,
        _ => return Err(invalid_id()),
    };

    let user = state.users.find(id).cloned().ok_or(AppError::NotFound("User not found"))?;
    let props = Props::new().try_with("user", &user)?;

    Ok(state
        .inertia
        .render(&intent, Page::new("UserDetail").props(props))
        .await?)
}

fn invalid_id() -> AppError {
    let mut fields = FieldErrors::new();
    fields.add("id", "Expected a positive integer");
    AppError::Api(ApiError::invalid(fields))
}

/// Payload for `POST /api/users/validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().chars().count() < 2 {
            errors.add("name", "Name must be at least 2 characters");
        }
        if !crate::app::contact::is_email(&self.email) {
            errors.add("email", "Invalid email");
        }
        if Role::parse(&self.role).is_none() {
            errors.add("role", "Role must be one of admin, editor, user");
        }
        errors.into_result()
    }
}

/// `POST /api/users/validate`, a plain JSON endpoint outside the page protocol.
pub async fn validate_new_user(Json(user): Json<NewUser>) -> Response {
    match user.validate() {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"valid": true}))).into_response(),
        Err(fields) => ApiError::invalid(fields).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> UserQuery {
        let mut q = UserQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "q" => q.q = v,
                "role" => q.role = v,
                "page" => q.page = v,
                "limit" => q.limit = v,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn test_seeded_directory() {
        let dir = UserDirectory::seeded(50);
        assert_eq!(dir.len(), 50);
        assert_eq!(dir.find(1).unwrap().name, "Alice Smith");
        assert_eq!(dir.find(11).unwrap().name, "Alice Jones");
        assert_eq!(dir.find(5).unwrap().role, Role::Admin);
        assert!(dir.find(51).is_none());
    }

    #[test]
    fn test_query_defaults() {
        let filter = query(&[]).parse().unwrap();
        assert_eq!(filter, UserFilter::default());

        let filter = query(&[("role", "all"), ("q", "  "), ("page", "")]).parse().unwrap();
        assert_eq!(filter, UserFilter::default());
    }

    #[test]
    fn test_query_errors() {
        let errors = query(&[("role", "root"), ("page", "0"), ("limit", "ten")])
            .parse()
            .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.get("role").is_some());
        assert_eq!(errors.get("page"), Some("Page must be a positive integer"));
    }

    #[test]
    fn test_search_and_paginate() {
        let dir = UserDirectory::seeded(50);

        let admins = UserFilter {
            role: Some(Role::Admin),
            limit: 4,
            ..Default::default()
        };
        let meta = dir.meta(&admins);
        assert_eq!(meta.total, 10);
        assert_eq!(meta.last_page, 3);
        assert!(dir.search(&admins).iter().all(|u| u.role == Role::Admin));

        let last = UserFilter { page: 3, ..admins };
        assert_eq!(dir.search(&last).len(), 2);

        let alice = UserFilter {
            q: Some("ALICE".into()),
            ..Default::default()
        };
        assert_eq!(dir.meta(&alice).total, 5);

        let nobody = UserFilter {
            q: Some("zed".into()),
            ..Default::default()
        };
        assert_eq!(
            dir.meta(&nobody),
            PageMeta {
                total: 0,
                page: 1,
                last_page: 1,
                limit: 10
            }
        );
        assert!(dir.search(&nobody).is_empty());
    }

    #[test]
    fn test_page_far_past_the_end() {
        let dir = UserDirectory::seeded(5);
        let filter = UserFilter {
            page: usize::MAX,
            limit: 10,
            ..Default::default()
        };
        assert!(dir.search(&filter).is_empty());
        assert_eq!(dir.meta(&filter).page, usize::MAX);
        assert_eq!(dir.meta(&filter).last_page, 1);

        let max = usize::MAX.to_string();
        let filter = query(&[("page", &max), ("limit", &max)]).parse().unwrap();
        assert!(dir.search(&filter).is_empty());
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = UserDirectory::seeded(3).meta(&UserFilter::default());
        assert_eq!(
            serde_json::to_value(meta).unwrap(),
            serde_json::json!({"total": 3, "page": 1, "lastPage": 1, "limit": 10})
        );
    }

    #[test]
    fn test_new_user_validation() {
        let user = NewUser {
            name: "A".into(),
            email: "nope".into(),
            role: "root".into(),
        };
        assert_eq!(user.validate().unwrap_err().len(), 3);

        let user = NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: "admin".into(),
        };
        assert!(user.validate().is_ok());
    }
}
