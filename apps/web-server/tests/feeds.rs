#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{TestEnv, get, json, texts};

#[actix_web::test]
async fn test_fifteen_posts_paginate_ten_then_five() {
    let env = TestEnv::new();
    let (neo, _) = env.user("neo").await;
    for i in 1..=15 {
        env.post(&neo, &format!("Post number {i}"), None).await;
    }
    let app = init_app!(env);

    let first = json(test::call_service(&app, get("/", None).to_request()).await).await;
    let page = &first["page"];
    assert_eq!(texts(page).len(), 10);
    assert_eq!(texts(page)[0], "Post number 15");
    assert_eq!(page["number"], 1);
    assert_eq!(page["num_pages"], 2);
    assert_eq!(page["count"], 15);
    assert_eq!(page["has_next"], true);
    assert_eq!(page["next_page_number"], 2);

    let second = json(test::call_service(&app, get("/?page=2", None).to_request()).await).await;
    assert_eq!(
        texts(&second["page"]),
        (1..=5)
            .rev()
            .map(|i| format!("Post number {i}"))
            .collect::<Vec<_>>()
    );
    assert_eq!(second["page"]["has_previous"], true);
}

#[actix_web::test]
async fn test_out_of_range_and_malformed_pages() {
    let env = TestEnv::new();
    let (neo, _) = env.user("neo").await;
    for i in 1..=12 {
        env.post(&neo, &format!("Post {i}"), None).await;
    }
    let app = init_app!(env);

    let last = json(test::call_service(&app, get("/profile/neo/?page=99", None).to_request()).await).await;
    assert_eq!(last["page"]["number"], 2);

    let first = json(test::call_service(&app, get("/profile/neo/?page=abc", None).to_request()).await).await;
    assert_eq!(first["page"]["number"], 1);
}

#[actix_web::test]
async fn test_empty_listing_has_one_page() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let body = json(test::call_service(&app, get("/", None).to_request()).await).await;
    assert_eq!(body["page"]["num_pages"], 1);
    assert_eq!(body["page"]["count"], 0);
    assert!(texts(&body["page"]).is_empty());
}

#[actix_web::test]
async fn test_ungrouped_post_is_not_in_group_feed() {
    let env = TestEnv::new();
    env.group("Matrix", "Matrix").await;
    let (neo, _) = env.user("Neo").await;
    env.post(&neo, "There is no spoon", None).await;
    let app = init_app!(env);

    let group = json(test::call_service(&app, get("/group/Matrix/", None).to_request()).await).await;
    assert_eq!(group["group"]["title"], "Matrix");
    assert!(texts(&group["page"]).is_empty());

    let index = json(test::call_service(&app, get("/", None).to_request()).await).await;
    assert_eq!(texts(&index["page"]), vec!["There is no spoon"]);
}

#[actix_web::test]
async fn test_group_feed_lists_group_posts() {
    let env = TestEnv::new();
    let matrix = env.group("Matrix", "matrix").await;
    let (neo, _) = env.user("neo").await;
    env.post(&neo, "Inside the Matrix", Some(&matrix)).await;
    env.post(&neo, "Outside", None).await;
    let app = init_app!(env);

    let group = json(test::call_service(&app, get("/group/matrix/", None).to_request()).await).await;
    assert_eq!(texts(&group["page"]), vec!["Inside the Matrix"]);
    assert_eq!(group["page"]["items"][0]["group"]["slug"], "matrix");
}

#[actix_web::test]
async fn test_missing_group_user_and_post_are_404() {
    let env = TestEnv::new();
    let app = init_app!(env);

    for uri in ["/group/nowhere/", "/profile/nobody/", "/posts/404/", "/posts/abc/"] {
        let res = test::call_service(&app, get(uri, None).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let res = test::call_service(&app, get("/no/such/page/", None).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = json(res).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_profile_shows_count_and_follow_state() {
    let env = TestEnv::new();
    let (neo, _) = env.user("neo").await;
    let (_morpheus, morpheus_token) = env.user("morpheus").await;
    env.post(&neo, "One", None).await;
    env.post(&neo, "Two", None).await;
    let app = init_app!(env);

    let anonymous = json(test::call_service(&app, get("/profile/neo/", None).to_request()).await).await;
    assert_eq!(anonymous["author"]["username"], "neo");
    assert_eq!(anonymous["post_count"], 2);
    assert_eq!(anonymous["following"], false);

    let res = test::call_service(
        &app,
        get("/profile/neo/follow/", Some(&morpheus_token)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let follower = json(
        test::call_service(&app, get("/profile/neo/", Some(&morpheus_token)).to_request()).await,
    )
    .await;
    assert_eq!(follower["following"], true);
}

#[actix_web::test]
async fn test_post_detail_context() {
    let env = TestEnv::new();
    let (neo, _) = env.user("neo").await;
    env.post(&neo, "Another post by neo", None).await;
    let post = env
        .post(&neo, "Free your mind, and the rest will follow.", None)
        .await;
    let app = init_app!(env);

    let uri = format!("/posts/{}/", post.id);
    let body = json(test::call_service(&app, get(&uri, None).to_request()).await).await;

    assert_eq!(body["title"], "Free your mind, and the rest w");
    assert_eq!(body["post"]["short_text"], "Free your mind,");
    assert_eq!(body["author_post_count"], 2);
    assert_eq!(body["comments"].as_array().unwrap().len(), 0);
    assert_eq!(body["form"]["text"], "");
}

#[actix_web::test]
async fn test_health() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let res = test::call_service(&app, get("/health", None).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(json(res).await["status"], "ok");
}
