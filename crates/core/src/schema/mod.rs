//! Static entity declarations.
//!
//! The registry is the single place that states which fields each entity has,
//! how long text columns may be, and how entities reference each other. The
//! validation rules and the DDL both read their limits from here.

use thiserror::Error;

/// Maximum length of `users.name`.
pub const USER_NAME_MAX_LEN: usize = 50;
/// Minimum length of `users.name`.
pub const USER_NAME_MIN_LEN: usize = 3;
/// Maximum length of `users.surname`.
pub const USER_SURNAME_MAX_LEN: usize = 50;
/// Maximum length of `users.email`.
pub const USER_EMAIL_MAX_LEN: usize = 100;
/// Maximum length of `logs.log`.
pub const LOG_TEXT_MAX_LEN: usize = 100;

/// Storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer column.
    Integer,
    /// Bounded text column.
    Text {
        /// Maximum number of characters.
        max_len: usize,
    },
    /// Timestamp with time zone.
    Timestamp,
}

/// Declaration of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name.
    pub name: &'static str,
    /// Storage type.
    pub kind: FieldKind,
    /// Whether `NULL` is allowed.
    pub nullable: bool,
    /// Whether the storage layer enforces uniqueness.
    pub unique: bool,
    /// Whether this is the surrogate key.
    pub primary_key: bool,
}

impl FieldSpec {
    const fn key(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            nullable: false,
            unique: true,
            primary_key: true,
        }
    }

    const fn text(name: &'static str, max_len: usize, nullable: bool, unique: bool) -> Self {
        Self {
            name,
            kind: FieldKind::Text { max_len },
            nullable,
            unique,
            primary_key: false,
        }
    }

    const fn reference(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            nullable: true,
            unique: false,
            primary_key: false,
        }
    }

    const fn timestamp(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Timestamp,
            nullable: false,
            unique: false,
            primary_key: false,
        }
    }

    /// Maximum length for text fields.
    #[must_use]
    pub const fn max_len(&self) -> Option<usize> {
        match self.kind {
            FieldKind::Text { max_len } => Some(max_len),
            FieldKind::Integer | FieldKind::Timestamp => None,
        }
    }
}

/// Many-to-one link from a child entity to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BelongsTo {
    /// Foreign-key field on the child.
    pub field: &'static str,
    /// Parent entity name.
    pub parent: &'static str,
    /// Referenced field on the parent.
    pub parent_field: &'static str,
}

/// Declaration of one entity and its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Entity name.
    pub entity: &'static str,
    /// Table name.
    pub table: &'static str,
    /// Fields in column order.
    pub fields: &'static [FieldSpec],
    /// Parents this entity belongs to.
    pub belongs_to: &'static [BelongsTo],
}

impl EntitySchema {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the primary key fields.
    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.primary_key)
    }
}

/// The `User` entity.
pub static USER: EntitySchema = EntitySchema {
    entity: "User",
    table: "users",
    fields: &[
        FieldSpec::key("id"),
        FieldSpec::text("name", USER_NAME_MAX_LEN, false, false),
        FieldSpec::text("surname", USER_SURNAME_MAX_LEN, true, false),
        FieldSpec::text("email", USER_EMAIL_MAX_LEN, true, true),
        FieldSpec::timestamp("created_at"),
        FieldSpec::timestamp("updated_at"),
    ],
    belongs_to: &[],
};

/// The `Log` entity.
pub static LOG: EntitySchema = EntitySchema {
    entity: "Log",
    table: "logs",
    fields: &[
        FieldSpec::key("id"),
        FieldSpec::text("log", LOG_TEXT_MAX_LEN, true, false),
        FieldSpec::reference("user_id"),
        FieldSpec::timestamp("created_at"),
        FieldSpec::timestamp("updated_at"),
    ],
    belongs_to: &[BelongsTo {
        field: "user_id",
        parent: "User",
        parent_field: "id",
    }],
};

/// Configuration errors in entity declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The same entity was registered twice.
    #[error("Entity '{0}' is registered more than once")]
    DuplicateEntity(&'static str),

    /// An entity has no primary key or more than one.
    #[error("Entity '{0}' must declare exactly one primary key")]
    PrimaryKey(&'static str),

    /// A belongs-to link names an entity that is not registered.
    #[error("Entity '{entity}' belongs to unregistered entity '{parent}'")]
    UnknownParent {
        /// Child entity.
        entity: &'static str,
        /// Missing parent.
        parent: &'static str,
    },

    /// A belongs-to link names a field that does not exist.
    #[error("Entity '{entity}' has no field '{field}'")]
    UnknownField {
        /// Entity that should declare the field.
        entity: &'static str,
        /// Missing field.
        field: &'static str,
    },
}

/// Set of entity declarations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: Vec<&'static EntitySchema>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// Registry with `User` and `Log`.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(&USER).register(&LOG);
        registry
    }

    /// Adds an entity declaration.
    pub fn register(&mut self, schema: &'static EntitySchema) -> &mut Self {
        self.entities.push(schema);
        self
    }

    /// Looks up an entity by name.
    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&'static EntitySchema> {
        self.entities.iter().copied().find(|e| e.entity == entity)
    }

    /// Registered entities in registration order.
    #[must_use]
    pub fn entities(&self) -> &[&'static EntitySchema] {
        &self.entities
    }

    /// Checks the declarations for consistency.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn check(&self) -> Result<(), SchemaError> {
        for (idx, schema) in self.entities.iter().enumerate() {
            if self.entities[..idx]
                .iter()
                .any(|other| other.entity == schema.entity)
            {
                return Err(SchemaError::DuplicateEntity(schema.entity));
            }

            if schema.primary_keys().count() != 1 {
                return Err(SchemaError::PrimaryKey(schema.entity));
            }

            for link in schema.belongs_to {
                if schema.field(link.field).is_none() {
                    return Err(SchemaError::UnknownField {
                        entity: schema.entity,
                        field: link.field,
                    });
                }

                let parent = self.get(link.parent).ok_or(SchemaError::UnknownParent {
                    entity: schema.entity,
                    parent: link.parent,
                })?;

                if parent.field(link.parent_field).is_none() {
                    return Err(SchemaError::UnknownField {
                        entity: parent.entity,
                        field: link.parent_field,
                    });
                }
            }
        }

        Ok(())
    }
}
