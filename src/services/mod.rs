// Domain services - business rules between the HTTP surface and the database

pub mod posts;
pub mod users;

pub use posts::PostService;
pub use users::UserService;

/// Store-level uniqueness breach (composite like key, user primary key).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
