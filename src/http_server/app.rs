use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::Database;
use crate::http_server::{
    routes::{edit, view},
    state::AppState,
};

pub fn router(app_state: Arc<AppState>) -> Router {
    #[cfg(debug_assertions)]
    let cors_layer = CorsLayer::permissive();

    #[cfg(not(debug_assertions))]
    let cors_layer = CorsLayer::new();

    Router::new()
        .route("/view/", get(view::general))
        .route("/view/{production_id}/cast", get(view::cast))
        .route("/view/{production_id}/team", get(view::team))
        .route("/view/{production_id}/songs", get(view::songs))
        .route("/view/{production_id}/thanks", get(view::thanks))
        .route(
            "/edit/productions",
            get(edit::list_productions).post(edit::create_production),
        )
        .route("/edit/active", post(edit::set_active_production))
        .route("/edit/{production_id}/general", post(edit::update_production))
        .route("/edit/{production_id}/delete", post(edit::delete_production))
        .route("/edit/{production_id}/thanks", post(edit::update_thanks))
        .route("/edit/{production_id}/roles", post(edit::create_role))
        .route("/edit/roles/{role_id}/rename", post(edit::rename_role))
        .route("/edit/roles/{role_id}/members", post(edit::set_role_members))
        .route("/edit/roles/{role_id}/delete", post(edit::delete_role))
        .route("/edit/crew", post(edit::set_crew_membership))
        .route("/edit/{production_id}/adults", post(edit::create_adult))
        .route(
            "/edit/{production_id}/creative-roles",
            post(edit::create_creative_role),
        )
        .route(
            "/edit/creative-roles/{role_id}/rename",
            post(edit::rename_creative_role),
        )
        .route(
            "/edit/creative-roles/{role_id}/members",
            post(edit::set_creative_role_members),
        )
        .route(
            "/edit/creative-roles/{role_id}/delete",
            post(edit::delete_creative_role),
        )
        .route("/edit/{production_id}/songs", post(edit::create_song))
        .route("/edit/songs/{song_id}", post(edit::update_song))
        .route("/edit/songs/{song_id}/delete", post(edit::delete_song))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(app_state)
}

pub async fn start(port: u16, database: Database) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(database),
    });

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;

    log::info!("HTTP server listening on port {port}");
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
