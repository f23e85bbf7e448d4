use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{forum_topic, test_case};

/// Create supplemental indexes that schema sync does not derive from the
/// entities. Failures are logged and tolerated so a restricted database role
/// does not block startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for topic listings:
    // SELECT * FROM forum_topics WHERE forum_id = ? ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_forum_topics_forum_created")
        .table(forum_topic::Entity)
        .col(forum_topic::Column::ForumId)
        .col(forum_topic::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_forum_topics_forum_created exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_forum_topics_forum_created: {}", e);
        }
    }

    // Composite index for ordered test-case reads:
    // SELECT * FROM problem_test_cases WHERE problem_id = ? ORDER BY order_index
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_problem_test_cases_problem_order")
        .table(test_case::Entity)
        .col(test_case::Column::ProblemId)
        .col(test_case::Column::OrderIndex)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_problem_test_cases_problem_order exists");
        }
        Err(e) => {
            tracing::warn!(
                "Failed to create index idx_problem_test_cases_problem_order: {}",
                e
            );
        }
    }

    Ok(())
}
