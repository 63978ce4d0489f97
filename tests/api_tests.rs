//! Catalog endpoints: movies, actors, genres and reviews.

mod common;

use axum::http::StatusCode;
use common::{Auth, TestApp, spawn_app};
use serde_json::{Value, json};

async fn create(app: &TestApp, admin: &str, uri: &str, body: Value) -> i64 {
    let response = app.send("POST", uri, Auth::Cookie(admin), Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["data"]
        .as_object()
        .and_then(|data| data.values().find_map(Value::as_i64))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let response = app.send("GET", "/health", Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true, "data": "ok" }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = spawn_app().await;

    let response = app.send("GET", "/nope", Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], json!(false));
}

#[tokio::test]
async fn test_movie_crud() {
    let app = spawn_app().await;
    let admin = app.admin("admin").await;

    let response = app.send("GET", "/movies", Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "No movies found");

    let response = app
        .send(
            "POST",
            "/movies",
            Auth::Cookie(&admin),
            Some(json!({ "release_year": 1995 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Missing required fields: title");

    let movie_id = create(
        &app,
        &admin,
        "/movies",
        json!({ "title": "Heat", "release_year": 1995 }),
    )
    .await;

    let response = app.send("GET", "/movies", Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["title"], json!("Heat"));

    let response = app
        .send(
            "PUT",
            &format!("/movies/{movie_id}"),
            Auth::Cookie(&admin),
            Some(json!({ "title": "" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Title is required");

    let response = app
        .send(
            "PUT",
            &format!("/movies/{movie_id}"),
            Auth::Cookie(&admin),
            Some(json!({ "title": "Heat (1995)", "release_year": 1995 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Movie updated successfully");

    let response = app
        .send(
            "PUT",
            "/movies/9999",
            Auth::Cookie(&admin),
            Some(json!({ "title": "Ghost" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .send("GET", &format!("/movies/{movie_id}"), Auth::Anonymous, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], json!("Heat (1995)"));
    assert_eq!(response.body["data"]["reviews"], json!([]));

    let response = app
        .send(
            "DELETE",
            &format!("/movies/{movie_id}"),
            Auth::Cookie(&admin),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Movie deleted successfully");

    let response = app
        .send("GET", &format!("/movies/{movie_id}"), Auth::Anonymous, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Movie not found");
}

#[tokio::test]
async fn test_actor_links() {
    let app = spawn_app().await;
    let admin = app.admin("admin").await;

    let movie_id = create(&app, &admin, "/movies", json!({ "title": "Heat" })).await;

    let response = app
        .send(
            "POST",
            "/actors",
            Auth::Cookie(&admin),
            Some(json!({ "first_name": "Al" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "First name and last name are required"
    );

    let actor_id = create(
        &app,
        &admin,
        "/actors",
        json!({ "first_name": "Al", "last_name": "Pacino" }),
    )
    .await;

    let response = app
        .send(
            "GET",
            &format!("/movies/{movie_id}/actors"),
            Auth::Anonymous,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "No actors found for this movie");

    let attach = json!({ "actor_id": actor_id });
    let uri = format!("/movies/{movie_id}/actors");

    let response = app
        .send("POST", &uri, Auth::Cookie(&admin), Some(attach.clone()))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.message(), "Actor added to the movie successfully");

    let response = app
        .send("POST", &uri, Auth::Cookie(&admin), Some(attach))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Actor already associated with this movie");

    let response = app
        .send(
            "POST",
            &uri,
            Auth::Cookie(&admin),
            Some(json!({ "actor_id": 9999 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Actor not found");

    let response = app.send("GET", &uri, Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["last_name"], json!("Pacino"));

    let response = app
        .send("GET", &format!("/actors/{actor_id}"), Auth::Anonymous, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["movies"][0]["title"], json!("Heat"));

    let response = app
        .send(
            "PUT",
            &format!("/actors/{actor_id}"),
            Auth::Cookie(&admin),
            Some(json!({ "first_name": "Alfredo", "last_name": "Pacino" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(
            "DELETE",
            &format!("/actors/{actor_id}"),
            Auth::Cookie(&admin),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.send("GET", &uri, Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_genres() {
    let app = spawn_app().await;
    let admin = app.admin("admin").await;
    let movie_id = create(&app, &admin, "/movies", json!({ "title": "Heat" })).await;

    let response = app
        .send("POST", "/genres", Auth::Cookie(&admin), Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Genre type is required");

    create(&app, &admin, "/genres", json!({ "name": "Crime" })).await;

    let response = app
        .send(
            "POST",
            "/genres",
            Auth::Cookie(&admin),
            Some(json!({ "movie_genres_type": "Crime" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Genre already exists");

    let uri = format!("/movies/{movie_id}/genres");
    let response = app
        .send(
            "POST",
            &uri,
            Auth::Cookie(&admin),
            Some(json!({ "name": "Crime" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send(
            "POST",
            &uri,
            Auth::Cookie(&admin),
            Some(json!({ "name": "Crime" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Genre already associated with this movie");

    let response = app
        .send(
            "POST",
            &uri,
            Auth::Cookie(&admin),
            Some(json!({ "name": "Western" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Genre not found");

    let response = app.send("GET", &uri, Auth::Anonymous, None).await;
    assert_eq!(response.body["data"], json!(["Crime"]));

    let response = app.send("GET", "/genres/Crime", Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["movies"][0]["title"], json!("Heat"));

    let response = app
        .send("DELETE", "/genres/Crime", Auth::Cookie(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.send("GET", "/genres", Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], json!([]));

    let response = app.send("GET", &uri, Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_flow() {
    let app = spawn_app().await;
    let admin = app.admin("admin").await;
    let alice = app.reviewer("alice").await;
    let bob = app.reviewer("bob").await;
    let movie_id = create(&app, &admin, "/movies", json!({ "title": "Heat" })).await;
    let reviews_uri = format!("/movies/{movie_id}/reviews");

    let response = app.send("GET", &reviews_uri, Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "No reviews found for this movie");

    let response = app
        .send(
            "POST",
            &reviews_uri,
            Auth::Cookie(&alice),
            Some(json!({ "star_rating": 8.5 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Missing required fields: 'star_rating' and 'review_text'"
    );

    let response = app
        .send(
            "POST",
            &reviews_uri,
            Auth::Cookie(&alice),
            Some(json!({ "star_rating": 11, "review_text": "Too good" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Invalid 'star_rating'. It must be between 0.0 and 10.0"
    );

    let response = app
        .send(
            "POST",
            "/movies/9999/reviews",
            Auth::Cookie(&alice),
            Some(json!({ "star_rating": 5, "review_text": "Who?" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Movie with ID 9999 not found");

    let review_id = create(
        &app,
        &alice,
        &reviews_uri,
        json!({ "star_rating": 8.5, "review_text": "Great heist" }),
    )
    .await;

    let response = app.send("GET", &reviews_uri, Auth::Anonymous, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Reviews retrieved successfully");

    let response = app
        .send("GET", "/profile/reviews", Auth::Cookie(&alice), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["movie_title"], json!("Heat"));

    let response = app
        .send("GET", "/profile/reviews", Auth::Cookie(&bob), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "No reviews found for this user");

    let own_uri = format!("/profile/reviews/{review_id}");
    let update = json!({ "star_rating": 9.0, "review_text": "Even better" });

    let response = app
        .send("PUT", &own_uri, Auth::Cookie(&bob), Some(update.clone()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.message(), "You can only update your own reviews");

    let response = app
        .send("PUT", &own_uri, Auth::Cookie(&alice), Some(update))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Review updated successfully");

    let response = app.send("GET", "/reviews", Auth::Cookie(&alice), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send(
            "GET",
            &format!("/reviews/{review_id}"),
            Auth::Cookie(&admin),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], json!("alice"));
    assert_eq!(response.body["data"]["review_text"], json!("Even better"));

    let response = app
        .send("DELETE", &own_uri, Auth::Cookie(&bob), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.message(), "You can only delete your own reviews");

    let response = app
        .send("DELETE", &own_uri, Auth::Cookie(&alice), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.send("GET", "/reviews", Auth::Cookie(&admin), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "No reviews found");
}

#[tokio::test]
async fn test_deleting_movie_removes_its_reviews() {
    let app = spawn_app().await;
    let admin = app.admin("admin").await;
    let alice = app.reviewer("alice").await;
    let movie_id = create(&app, &admin, "/movies", json!({ "title": "Heat" })).await;

    let review_id = create(
        &app,
        &alice,
        &format!("/movies/{movie_id}/reviews"),
        json!({ "star_rating": 7, "review_text": "Solid" }),
    )
    .await;

    let response = app
        .send(
            "DELETE",
            &format!("/movies/{movie_id}"),
            Auth::Cookie(&admin),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(
            "DELETE",
            &format!("/reviews/{review_id}"),
            Auth::Cookie(&admin),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Review not found");
}

#[tokio::test]
async fn test_non_numeric_ids_are_json_bad_requests() {
    let app = spawn_app().await;
    let admin = app.admin("admin").await;

    for (method, uri) in [
        ("GET", "/movies/abc"),
        ("GET", "/actors/abc"),
        ("GET", "/movies/abc/reviews"),
        ("DELETE", "/movies/abc"),
        ("DELETE", "/reviews/abc"),
    ] {
        let response = app.send(method, uri, Auth::Cookie(&admin), None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(response.body["success"], json!(false), "{method} {uri}");
        assert!(!response.message().is_empty(), "{method} {uri}");
    }
}
