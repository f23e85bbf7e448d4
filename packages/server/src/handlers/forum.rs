use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{forum, forum_member, forum_topic};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::forum::*;
use crate::models::shared::{Pagination, escape_like};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Forums",
    operation_id = "createForum",
    summary = "Create a new forum",
    description = "Creates a forum and joins the creator as its first member.",
    request_body = CreateForumRequest,
    responses(
        (status = 201, description = "Forum created", body = ForumResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Forum name already taken", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name, user_id = auth_user.user_id))]
pub async fn create_forum(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateForumRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_forum(&payload)?;

    let txn = state.db.begin().await?;
    let now = chrono::Utc::now();

    let new_forum = forum::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        members_count: Set(1),
        topics_count: Set(0),
        created_by: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = match new_forum.insert(&txn).await {
        Ok(m) => m,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict("Forum name already taken".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let creator = forum_member::ActiveModel {
        forum_id: Set(model.id),
        user_id: Set(auth_user.user_id),
        username: Set(auth_user.username.clone()),
        joined_at: Set(now),
    };
    creator.insert(&txn).await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(ForumResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Forums",
    operation_id = "listForums",
    summary = "List forums with pagination and search",
    description = "Returns a paginated list of forums with optional case-insensitive name search. Supports sorting by `created_at` (default, desc), `name`, or `members_count`.",
    params(ForumListQuery),
    responses(
        (status = 200, description = "List of forums", body = ForumListResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_forums(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ForumListQuery>,
) -> Result<Json<ForumListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = forum::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(forum::Column::Name)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let sort_by = query.sort_by.as_deref().unwrap_or("created_at");
    let sort_order = if query.sort_order.as_deref() == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    };
    let sort_column = match sort_by {
        "created_at" => forum::Column::CreatedAt,
        "name" => forum::Column::Name,
        "members_count" => forum::Column::MembersCount,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, name, members_count".into(),
            ));
        }
    };

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by(sort_column, sort_order)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(ForumResponse::from)
        .collect();

    Ok(Json(ForumListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Forums",
    operation_id = "getForum",
    summary = "Get a forum by ID",
    params(("id" = i32, Path, description = "Forum ID")),
    responses(
        (status = 200, description = "Forum details", body = ForumResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Forum not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_forum(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ForumResponse>, AppError> {
    let model = find_forum(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/join",
    tag = "Forums",
    operation_id = "joinForum",
    summary = "Join a forum",
    description = "Adds the authenticated caller as a forum member. The member counter moves atomically with the membership row.",
    params(("id" = i32, Path, description = "Forum ID")),
    responses(
        (status = 201, description = "Joined forum"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Forum not found", body = ErrorBody),
        (status = 409, description = "Already a member", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(forum_id, user_id = auth_user.user_id))]
pub async fn join_forum(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(forum_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    find_forum_for_update(&txn, forum_id).await?;

    let new_member = forum_member::ActiveModel {
        forum_id: Set(forum_id),
        user_id: Set(auth_user.user_id),
        username: Set(auth_user.username.clone()),
        joined_at: Set(chrono::Utc::now()),
    };

    match new_member.insert(&txn).await {
        Ok(_) => {
            adjust_members_count(&txn, forum_id, 1).await?;
            txn.commit().await?;
            Ok(StatusCode::CREATED)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::Conflict("Already a member of this forum".into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/{id}/join",
    tag = "Forums",
    operation_id = "leaveForum",
    summary = "Leave a forum",
    params(("id" = i32, Path, description = "Forum ID")),
    responses(
        (status = 204, description = "Left forum"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Not a member or forum not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(forum_id, user_id = auth_user.user_id))]
pub async fn leave_forum(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(forum_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    find_forum_for_update(&txn, forum_id).await?;

    let member = forum_member::Entity::find_by_id((forum_id, auth_user.user_id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Not a member of this forum".into()))?;

    let active: forum_member::ActiveModel = member.into();
    active.delete(&txn).await?;
    adjust_members_count(&txn, forum_id, -1).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/members",
    tag = "Forums",
    operation_id = "listForumMembers",
    summary = "List members of a forum",
    description = "Returns all members of the forum, ordered by join time.",
    params(("id" = i32, Path, description = "Forum ID")),
    responses(
        (status = 200, description = "List of members", body = Vec<ForumMemberResponse>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Forum not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(forum_id))]
pub async fn list_members(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(forum_id): Path<i32>,
) -> Result<Json<Vec<ForumMemberResponse>>, AppError> {
    find_forum(&state.db, forum_id).await?;

    let rows = forum_member::Entity::find()
        .filter(forum_member::Column::ForumId.eq(forum_id))
        .order_by_asc(forum_member::Column::JoinedAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}/topics",
    tag = "Topics",
    operation_id = "listForumTopics",
    summary = "List topics in a forum",
    description = "Returns a paginated list of the forum's topics, newest first.",
    params(("id" = i32, Path, description = "Forum ID"), TopicListQuery),
    responses(
        (status = 200, description = "List of topics", body = TopicListResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Forum not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query), fields(forum_id))]
pub async fn list_topics(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(forum_id): Path<i32>,
    Query(query): Query<TopicListQuery>,
) -> Result<Json<TopicListResponse>, AppError> {
    find_forum(&state.db, forum_id).await?;

    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let select = forum_topic::Entity::find().filter(forum_topic::Column::ForumId.eq(forum_id));

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(forum_topic::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(TopicResponse::from)
        .collect();

    Ok(Json(TopicListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/{id}/topics",
    tag = "Topics",
    operation_id = "createForumTopic",
    summary = "Create a topic in a forum",
    description = "Creates a topic. The caller must be a member of the forum. The topic counter moves atomically with the topic row.",
    params(("id" = i32, Path, description = "Forum ID")),
    request_body = CreateTopicRequest,
    responses(
        (status = 201, description = "Topic created", body = TopicResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller is not a member", body = ErrorBody),
        (status = 404, description = "Forum not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(forum_id, user_id = auth_user.user_id))]
pub async fn create_topic(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(forum_id): Path<i32>,
    AppJson(payload): AppJson<CreateTopicRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_topic(&payload)?;

    let txn = state.db.begin().await?;
    find_forum_for_update(&txn, forum_id).await?;

    forum_member::Entity::find_by_id((forum_id, auth_user.user_id))
        .one(&txn)
        .await?
        .ok_or(AppError::PermissionDenied)?;

    let new_topic = forum_topic::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        author_id: Set(auth_user.user_id),
        author_name: Set(auth_user.username.clone()),
        forum_id: Set(forum_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_topic.insert(&txn).await?;
    adjust_topics_count(&txn, forum_id, 1).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TopicResponse::from(model))))
}

async fn find_forum<C: ConnectionTrait>(db: &C, id: i32) -> Result<forum::Model, AppError> {
    forum::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Forum not found".into()))
}

async fn find_forum_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<forum::Model, AppError> {
    use sea_orm::sea_query::LockType;
    forum::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Forum not found".into()))
}

/// Atomic in-database counter update; never read-modify-write from the client.
async fn adjust_members_count(
    txn: &DatabaseTransaction,
    forum_id: i32,
    delta: i32,
) -> Result<(), AppError> {
    forum::Entity::update_many()
        .col_expr(
            forum::Column::MembersCount,
            Expr::col(forum::Column::MembersCount).add(delta),
        )
        .filter(forum::Column::Id.eq(forum_id))
        .exec(txn)
        .await?;
    Ok(())
}

async fn adjust_topics_count(
    txn: &DatabaseTransaction,
    forum_id: i32,
    delta: i32,
) -> Result<(), AppError> {
    forum::Entity::update_many()
        .col_expr(
            forum::Column::TopicsCount,
            Expr::col(forum::Column::TopicsCount).add(delta),
        )
        .filter(forum::Column::Id.eq(forum_id))
        .exec(txn)
        .await?;
    Ok(())
}
