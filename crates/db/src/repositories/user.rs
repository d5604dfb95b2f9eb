//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, Unchanged,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, Func},
};
use serde::Serialize;
use tracing::debug;
use userlog_core::{NewUser, UserChanges, UserDraft, normalize_email, present_name};

use super::log::LogRecord;
use crate::entities::{logs, users};
use crate::error::DataResult;

/// A user as read back from storage, with the name in presentation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Surrogate key.
    pub id: i32,
    /// Upper-cased name.
    pub name: String,
    /// Surname.
    pub surname: Option<String>,
    /// Lower-cased email.
    pub email: Option<String>,
    /// Insert time.
    pub created_at: DateTimeWithTimeZone,
    /// Last update time.
    pub updated_at: DateTimeWithTimeZone,
}

impl From<users::Model> for UserRecord {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: present_name(&model.name),
            surname: model.surname,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Equality filter over user attributes; unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Match by ID.
    pub id: Option<i32>,
    /// Match by name, ignoring case.
    pub name: Option<String>,
    /// Match by surname.
    pub surname: Option<String>,
    /// Match by email, after normalization.
    pub email: Option<String>,
}

impl UserFilter {
    /// Filter on name only.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Filter on email only.
    #[must_use]
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(id) = self.id {
            condition = condition.add(users::Column::Id.eq(id));
        }
        if let Some(name) = &self.name {
            // Stored names keep their original case.
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col((users::Entity, users::Column::Name))))
                    .is_in(name_keys(name)),
            );
        }
        if let Some(surname) = &self.surname {
            condition = condition.add(users::Column::Surname.eq(surname.as_str()));
        }
        if let Some(email) = &self.email {
            condition = condition.add(users::Column::Email.eq(normalize_email(email)));
        }

        condition
    }
}

/// Forms `LOWER(name)` may take for a stored name equal to `name` up to case.
///
/// `SQLite` folds ASCII only, so a stored `ÉLODIE` lowers to `Élodie`; the
/// second key covers names written in a single case.
fn name_keys(name: &str) -> Vec<String> {
    let folded = name.to_lowercase();
    let ascii_folded = name.to_uppercase().to_ascii_lowercase();

    if ascii_folded == folded {
        vec![folded]
    } else {
        vec![folded, ascii_folded]
    }
}

/// User repository for CRUD operations.
///
/// Borrows any connection, so the same calls run on the pool or inside a
/// transactional unit.
#[derive(Debug, Clone, Copy)]
pub struct UserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Builds an in-memory user without validating or storing it.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn build(&self, input: NewUser) -> UserDraft {
        UserDraft::new(input)
    }

    /// Validates and stores a draft: insert when new, update otherwise.
    ///
    /// On insert the generated ID is written back into the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any field rule fails (nothing is written)
    /// - The email is already taken
    /// - The row to update no longer exists
    pub async fn save(&self, draft: &mut UserDraft) -> DataResult<UserRecord> {
        draft.validate()?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = match draft.id() {
            None => {
                let model = users::ActiveModel {
                    name: Set(draft.name().to_string()),
                    surname: Set(draft.surname().map(String::from)),
                    email: Set(draft.email().map(String::from)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.conn)
                .await?;

                draft.mark_stored(model.id);
                debug!(user_id = model.id, "User created");
                model
            }
            Some(id) => {
                let model = users::ActiveModel {
                    id: Unchanged(id),
                    name: Set(draft.name().to_string()),
                    surname: Set(draft.surname().map(String::from)),
                    email: Set(draft.email().map(String::from)),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(self.conn)
                .await?;

                debug!(user_id = id, "User updated");
                model
            }
        };

        Ok(model.into())
    }

    /// Builds and stores a user in one call.
    ///
    /// # Errors
    ///
    /// Same as [`Self::save`].
    pub async fn create(&self, input: NewUser) -> DataResult<UserRecord> {
        let mut draft = self.build(input);
        self.save(&mut draft).await
    }

    /// Assigns `changes` to the draft and stores it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::save`].
    pub async fn update(
        &self,
        draft: &mut UserDraft,
        changes: UserChanges,
    ) -> DataResult<UserRecord> {
        draft.apply(changes);
        self.save(draft).await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> DataResult<Option<UserRecord>> {
        let user = users::Entity::find_by_id(id).one(self.conn).await?;
        Ok(user.map(UserRecord::from))
    }

    /// Loads a stored user as an editable draft, name in stored form.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load(&self, id: i32) -> DataResult<Option<UserDraft>> {
        let user = users::Entity::find_by_id(id).one(self.conn).await?;
        Ok(user.map(|u| UserDraft::existing(u.id, u.name, u.surname, u.email)))
    }

    /// Lists users matching the filter, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(&self, filter: &UserFilter) -> DataResult<Vec<UserRecord>> {
        let users = users::Entity::find()
            .filter(filter.condition())
            .order_by_asc(users::Column::Id)
            .all(self.conn)
            .await?;

        Ok(users.into_iter().map(UserRecord::from).collect())
    }

    /// Returns the first user matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_one(&self, filter: &UserFilter) -> DataResult<Option<UserRecord>> {
        let user = users::Entity::find()
            .filter(filter.condition())
            .order_by_asc(users::Column::Id)
            .one(self.conn)
            .await?;

        Ok(user.map(UserRecord::from))
    }

    /// Lists users matching the filter together with all of their logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_with_logs(
        &self,
        filter: &UserFilter,
    ) -> DataResult<Vec<(UserRecord, Vec<LogRecord>)>> {
        let rows = users::Entity::find()
            .filter(filter.condition())
            .find_with_related(logs::Entity)
            .order_by_asc(users::Column::Id)
            .order_by_asc(logs::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user, logs)| {
                (
                    UserRecord::from(user),
                    logs.into_iter().map(LogRecord::from).collect(),
                )
            })
            .collect())
    }
}
