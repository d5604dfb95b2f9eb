//! Log repository, including eager loading of the owning user.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, Unchanged, prelude::DateTimeWithTimeZone,
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::debug;
use userlog_core::{LogDraft, NewLog};

use super::user::UserRecord;
use crate::entities::{logs, users};
use crate::error::DataResult;

/// A log row as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Surrogate key.
    pub id: i32,
    /// Log text.
    pub log: Option<String>,
    /// Owning user.
    pub user_id: Option<i32>,
    /// Insert time.
    pub created_at: DateTimeWithTimeZone,
    /// Last update time.
    pub updated_at: DateTimeWithTimeZone,
}

impl From<logs::Model> for LogRecord {
    fn from(model: logs::Model) -> Self {
        Self {
            id: model.id,
            log: model.log,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Equality filter over log attributes; unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Match by ID.
    pub id: Option<i32>,
    /// Match by text.
    pub log: Option<String>,
    /// Match by owning user.
    pub user_id: Option<i32>,
}

impl LogFilter {
    /// Filter on ID only.
    #[must_use]
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Filter on owning user only.
    #[must_use]
    pub fn by_user(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(id) = self.id {
            condition = condition.add(logs::Column::Id.eq(id));
        }
        if let Some(log) = &self.log {
            condition = condition.add(logs::Column::Log.eq(log.as_str()));
        }
        if let Some(user_id) = self.user_id {
            condition = condition.add(logs::Column::UserId.eq(user_id));
        }

        condition
    }
}

/// User attributes that can be projected when eager loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAttribute {
    /// `id`
    Id,
    /// `name`
    Name,
    /// `surname`
    Surname,
    /// `email`
    Email,
    /// `createdAt`
    CreatedAt,
    /// `updatedAt`
    UpdatedAt,
}

impl UserAttribute {
    /// Every attribute, in column order.
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Name,
        Self::Surname,
        Self::Email,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Key used in serialized output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Email => "email",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

/// Join specification for eager loading a log's user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserInclude {
    attributes: Option<Vec<UserAttribute>>,
}

impl UserInclude {
    /// Include the user with every attribute.
    #[must_use]
    pub const fn all() -> Self {
        Self { attributes: None }
    }

    /// Include the user projected onto `attributes`.
    #[must_use]
    pub fn only(attributes: impl IntoIterator<Item = UserAttribute>) -> Self {
        Self {
            attributes: Some(attributes.into_iter().collect()),
        }
    }

    /// Returns `true` if `attribute` is part of the projection.
    #[must_use]
    pub fn includes(&self, attribute: UserAttribute) -> bool {
        self.attributes
            .as_ref()
            .is_none_or(|attrs| attrs.contains(&attribute))
    }

    fn project(&self, user: UserRecord) -> ProjectedUser {
        ProjectedUser {
            attributes: UserAttribute::ALL
                .into_iter()
                .filter(|a| self.includes(*a))
                .collect(),
            record: user,
        }
    }
}

/// A user reduced to the attributes requested by a [`UserInclude`].
///
/// Accessors return `None` for attributes outside the projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedUser {
    record: UserRecord,
    attributes: Vec<UserAttribute>,
}

impl ProjectedUser {
    /// Projected attributes, in column order.
    #[must_use]
    pub fn attributes(&self) -> &[UserAttribute] {
        &self.attributes
    }

    fn has(&self, attribute: UserAttribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// Surrogate key.
    #[must_use]
    pub fn id(&self) -> Option<i32> {
        self.has(UserAttribute::Id).then_some(self.record.id)
    }

    /// Upper-cased name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.has(UserAttribute::Name)
            .then_some(self.record.name.as_str())
    }

    /// Surname.
    #[must_use]
    pub fn surname(&self) -> Option<&str> {
        if self.has(UserAttribute::Surname) {
            self.record.surname.as_deref()
        } else {
            None
        }
    }

    /// Email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        if self.has(UserAttribute::Email) {
            self.record.email.as_deref()
        } else {
            None
        }
    }
}

impl Serialize for ProjectedUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for attribute in &self.attributes {
            let key = attribute.key();
            match attribute {
                UserAttribute::Id => map.serialize_entry(key, &self.record.id)?,
                UserAttribute::Name => map.serialize_entry(key, &self.record.name)?,
                UserAttribute::Surname => map.serialize_entry(key, &self.record.surname)?,
                UserAttribute::Email => map.serialize_entry(key, &self.record.email)?,
                UserAttribute::CreatedAt => map.serialize_entry(key, &self.record.created_at)?,
                UserAttribute::UpdatedAt => map.serialize_entry(key, &self.record.updated_at)?,
            }
        }
        map.end()
    }
}

/// A log row joined with its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogWithUser {
    /// The log row.
    #[serde(flatten)]
    pub log: LogRecord,
    /// The owning user, `None` when the row is not linked.
    pub user: Option<ProjectedUser>,
}

/// Log repository for CRUD operations and eager-loaded reads.
#[derive(Debug, Clone, Copy)]
pub struct LogRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> LogRepository<'a, C> {
    /// Creates a new log repository.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Builds an in-memory log row without validating or storing it.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn build(&self, input: NewLog) -> LogDraft {
        LogDraft::new(input)
    }

    /// Validates and stores a draft: insert when new, update otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a field rule fails, the referenced user does not
    /// exist, or the row to update no longer exists.
    pub async fn save(&self, draft: &mut LogDraft) -> DataResult<LogRecord> {
        draft.validate()?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = match draft.id() {
            None => {
                let model = logs::ActiveModel {
                    log: Set(draft.log().map(String::from)),
                    user_id: Set(draft.user_id()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.conn)
                .await?;

                draft.mark_stored(model.id);
                debug!(log_id = model.id, user_id = ?model.user_id, "Log created");
                model
            }
            Some(id) => {
                let model = logs::ActiveModel {
                    id: Unchanged(id),
                    log: Set(draft.log().map(String::from)),
                    user_id: Set(draft.user_id()),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(self.conn)
                .await?;

                debug!(log_id = id, "Log updated");
                model
            }
        };

        Ok(model.into())
    }

    /// Builds and stores a log row in one call.
    ///
    /// # Errors
    ///
    /// Same as [`Self::save`].
    pub async fn create(&self, input: NewLog) -> DataResult<LogRecord> {
        let mut draft = self.build(input);
        self.save(&mut draft).await
    }

    /// Finds a log row by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> DataResult<Option<LogRecord>> {
        let log = logs::Entity::find_by_id(id).one(self.conn).await?;
        Ok(log.map(LogRecord::from))
    }

    /// Lists log rows matching the filter, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(&self, filter: &LogFilter) -> DataResult<Vec<LogRecord>> {
        let logs = logs::Entity::find()
            .filter(filter.condition())
            .order_by_asc(logs::Column::Id)
            .all(self.conn)
            .await?;

        Ok(logs.into_iter().map(LogRecord::from).collect())
    }

    /// Returns the first log row matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_one(&self, filter: &LogFilter) -> DataResult<Option<LogRecord>> {
        let log = logs::Entity::find()
            .filter(filter.condition())
            .order_by_asc(logs::Column::Id)
            .one(self.conn)
            .await?;

        Ok(log.map(LogRecord::from))
    }

    /// Lists log rows with their user, loaded in the same query.
    ///
    /// Each row appears once, paired with at most one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all_with_user(
        &self,
        filter: &LogFilter,
        include: &UserInclude,
    ) -> DataResult<Vec<LogWithUser>> {
        let rows = logs::Entity::find()
            .filter(filter.condition())
            .find_also_related(users::Entity)
            .order_by_asc(logs::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(log, user)| joined(log, user, include))
            .collect())
    }

    /// Returns the first log row matching the filter, with its user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_one_with_user(
        &self,
        filter: &LogFilter,
        include: &UserInclude,
    ) -> DataResult<Option<LogWithUser>> {
        let row = logs::Entity::find()
            .filter(filter.condition())
            .find_also_related(users::Entity)
            .order_by_asc(logs::Column::Id)
            .one(self.conn)
            .await?;

        Ok(row.map(|(log, user)| joined(log, user, include)))
    }
}

fn joined(log: logs::Model, user: Option<users::Model>, include: &UserInclude) -> LogWithUser {
    LogWithUser {
        log: log.into(),
        user: user.map(|u| include.project(u.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        UserRecord {
            id: 3,
            name: "ANA".to_string(),
            surname: Some("Castillo".to_string()),
            email: Some("ana@gmail.com".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_include_all_keeps_every_attribute() {
        let projected = UserInclude::all().project(record());

        assert_eq!(projected.attributes(), &UserAttribute::ALL);
        assert_eq!(projected.id(), Some(3));
        assert_eq!(projected.name(), Some("ANA"));
        assert_eq!(projected.surname(), Some("Castillo"));
    }

    #[test]
    fn test_projection_hides_other_attributes() {
        let projected = UserInclude::only([UserAttribute::Email]).project(record());

        assert_eq!(projected.email(), Some("ana@gmail.com"));
        assert_eq!(projected.id(), None);
        assert_eq!(projected.name(), None);
        assert_eq!(projected.surname(), None);
    }

    #[test]
    fn test_projection_keeps_column_order() {
        let projected =
            UserInclude::only([UserAttribute::Email, UserAttribute::Id]).project(record());
        assert_eq!(
            projected.attributes(),
            &[UserAttribute::Id, UserAttribute::Email]
        );
    }
}
