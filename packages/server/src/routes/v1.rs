use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/forums", forum_routes())
        .nest("/problems", problem_routes())
}

fn forum_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::forum::list_forums,
            handlers::forum::create_forum
        ))
        .routes(routes!(handlers::forum::get_forum))
        .routes(routes!(
            handlers::forum::join_forum,
            handlers::forum::leave_forum
        ))
        .routes(routes!(handlers::forum::list_members))
        .routes(routes!(
            handlers::forum::list_topics,
            handlers::forum::create_topic
        ))
}

fn problem_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::problem::list_problems))
        .routes(routes!(handlers::problem::get_problem))
        .routes(routes!(handlers::import::import_problems))
}
