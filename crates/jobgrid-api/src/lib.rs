//! Axum REST layer over the JobGrid collections.

use axum::routing::{get, post};
use axum::Router;
use jobgrid_storage::MongoStore;
use tokio::net::TcpListener;

pub mod error;
pub mod routes;

pub use error::ApiError;

pub const CRATE_NAME: &str = "jobgrid-api";

#[derive(Clone)]
pub struct AppState {
    pub store: MongoStore,
}

impl AppState {
    pub fn new(store: MongoStore) -> Self {
        Self { store }
    }
}

pub fn app(state: AppState) -> Router {
    use routes::{interactions, job_matches, jobs, saved_searches, user_stats, users};

    Router::new()
        .route("/users", post(users::create).get(users::list))
        .route(
            "/users/{id}",
            get(users::get_one)
                .put(users::update)
                .patch(users::update)
                .delete(users::delete),
        )
        .route(
            "/users/{id}/stats",
            get(user_stats::get_stats).patch(user_stats::update_stats),
        )
        .route("/jobs", post(jobs::create).get(jobs::list))
        .route(
            "/jobs/{id}",
            get(jobs::get_one)
                .put(jobs::update)
                .patch(jobs::update)
                .delete(jobs::delete),
        )
        .route("/saved-searches", post(saved_searches::create))
        .route(
            "/saved-searches/user/{user_id}",
            get(saved_searches::list_for_user),
        )
        .route(
            "/saved-searches/{id}",
            get(saved_searches::get_one)
                .patch(saved_searches::update)
                .delete(saved_searches::delete),
        )
        .route("/job-matches", post(job_matches::create))
        .route("/job-matches/user/{user_id}", get(job_matches::list_for_user))
        .route(
            "/job-matches/{id}",
            axum::routing::patch(job_matches::update).delete(job_matches::delete),
        )
        .route("/interactions", post(interactions::create))
        .route("/interactions/user/{user_id}", get(interactions::list_for_user))
        .route("/interactions/job/{job_id}", get(interactions::list_for_job))
        .route(
            "/interactions/{id}",
            axum::routing::patch(interactions::update).delete(interactions::delete),
        )
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, listen: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen).await?;
    tracing::info!(listen, "serving REST API");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    // A lazy store never touches the network until a query runs, so
    // every pre-database rejection path is testable offline.
    async fn test_app() -> Router {
        let store = MongoStore::lazy("mongodb://localhost:27017", "jobgrid_test")
            .await
            .expect("lazy store");
        app(AppState::new(store))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn invalid_object_ids_return_400_before_any_store_access() {
        for uri in [
            "/users/not-an-id",
            "/jobs/not-an-id",
            "/users/not-an-id/stats",
            "/saved-searches/not-an-id",
            "/job-matches/user/not-an-id",
            "/interactions/user/not-an-id",
        ] {
            let resp = test_app()
                .await
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn error_body_is_a_structured_json_envelope() {
        let resp = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/users/not-an-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Invalid user ID");
    }

    #[tokio::test]
    async fn inverted_salary_range_is_rejected_with_422() {
        let payload = r#"{
            "external_id": "Adzuna_1",
            "title": "Engineer",
            "company": "Acme",
            "description": "Build.",
            "location": "Remote",
            "salary_range": {"min": 150000, "max": 90000, "currency": "USD"}
        }"#;
        let resp = test_app()
            .await
            .oneshot(json_request("POST", "/jobs", payload))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn out_of_range_relevancy_score_is_rejected_with_422() {
        let payload = r#"{
            "user_id": "507f1f77bcf86cd799439011",
            "job_id": "507f1f77bcf86cd799439012",
            "relevancy_score": 1.5,
            "match_details": {
                "skills_matched": [],
                "skills_missing": [],
                "overall_compatibility": 0.5
            }
        }"#;
        let resp = test_app()
            .await
            .oneshot(json_request("POST", "/job-matches", payload))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn invalid_foreign_keys_on_create_return_400() {
        let payload = r#"{
            "user_id": "nope",
            "job_id": "507f1f77bcf86cd799439012",
            "interaction_type": "viewed"
        }"#;
        let resp = test_app()
            .await
            .oneshot(json_request("POST", "/interactions", payload))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_user_preference_bounds_are_rejected_with_422() {
        let payload = r#"{
            "name": "Jess",
            "email": "jess@example.com",
            "preferences": {"salary_min": 200000, "salary_max": 100000}
        }"#;
        let resp = test_app()
            .await
            .oneshot(json_request("POST", "/users", payload))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_routes_are_404() {
        let resp = test_app()
            .await
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
