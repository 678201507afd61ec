//! Collection index management.

use bson::doc;
use mongodb::IndexModel;
use mongodb::options::IndexOptions;
use tracing::info;

use scribe_core::error::{AppError, ErrorKind};
use scribe_core::result::AppResult;

/// Create every index the application relies on.
///
/// Unique indexes back the service-level uniqueness pre-checks against
/// races. This function is idempotent and safe to call on every startup.
pub async fn ensure_indexes(database: &mongodb::Database) -> AppResult<()> {
    let unique = || IndexOptions::builder().unique(true).build();

    create(
        database,
        "users",
        vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "phoneNumber": 1 })
                .options(unique())
                .build(),
            IndexModel::builder().keys(doc! { "deleted": 1 }).build(),
        ],
    )
    .await?;

    create(
        database,
        "posts",
        vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "author": 1, "deleted": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1, "publishedAt": -1 })
                .build(),
            IndexModel::builder().keys(doc! { "tags": 1 }).build(),
        ],
    )
    .await?;

    create(
        database,
        "comments",
        vec![
            IndexModel::builder()
                .keys(doc! { "post": 1, "deleted": 1, "createdAt": -1 })
                .build(),
            IndexModel::builder().keys(doc! { "author": 1 }).build(),
            IndexModel::builder().keys(doc! { "parent": 1 }).build(),
        ],
    )
    .await?;

    create(
        database,
        "likes",
        vec![
            IndexModel::builder()
                .keys(doc! { "uniqueKey": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "targetId": 1, "likeType": 1 })
                .build(),
        ],
    )
    .await?;

    create(
        database,
        "sessions",
        vec![
            IndexModel::builder()
                .keys(doc! { "refreshToken": 1 })
                .options(unique())
                .build(),
            IndexModel::builder().keys(doc! { "userId": 1 }).build(),
            IndexModel::builder().keys(doc! { "expiresAt": 1 }).build(),
        ],
    )
    .await?;

    info!("Database indexes ensured");
    Ok(())
}

async fn create(
    database: &mongodb::Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> AppResult<()> {
    database
        .collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to create indexes on {collection}: {e}"),
                e,
            )
        })?;
    Ok(())
}
