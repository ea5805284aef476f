#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{TestEnv, get, json, location, texts};

#[actix_web::test]
async fn test_follower_sees_author_posts() {
    let env = TestEnv::new();
    let (morpheus, _) = env.user("Morpheus").await;
    let (_, neo_token) = env.user("Neo").await;
    let (_, trinity_token) = env.user("Trinity").await;
    env.post(&morpheus, "Welcome to the real world", None).await;
    let app = init_app!(env);

    let res = test::call_service(
        &app,
        get("/profile/Morpheus/follow/", Some(&neo_token)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/Morpheus/");

    let neo_feed = json(test::call_service(&app, get("/follow/", Some(&neo_token)).to_request()).await).await;
    assert_eq!(texts(&neo_feed["page"]), vec!["Welcome to the real world"]);

    let trinity_feed =
        json(test::call_service(&app, get("/follow/", Some(&trinity_token)).to_request()).await).await;
    assert!(texts(&trinity_feed["page"]).is_empty());
}

#[actix_web::test]
async fn test_new_posts_reach_existing_followers() {
    let env = TestEnv::new();
    let (morpheus, _) = env.user("Morpheus").await;
    let (_, neo_token) = env.user("Neo").await;
    let app = init_app!(env);

    test::call_service(&app, get("/profile/Morpheus/follow/", Some(&neo_token)).to_request()).await;
    env.post(&morpheus, "First", None).await;
    env.post(&morpheus, "Second", None).await;

    let feed = json(test::call_service(&app, get("/follow/", Some(&neo_token)).to_request()).await).await;
    assert_eq!(texts(&feed["page"]), vec!["Second", "First"]);
}

#[actix_web::test]
async fn test_follow_twice_keeps_one_edge() {
    let env = TestEnv::new();
    let (morpheus, _) = env.user("Morpheus").await;
    let (neo, neo_token) = env.user("Neo").await;
    let app = init_app!(env);

    for _ in 0..2 {
        let res = test::call_service(
            &app,
            get("/profile/Morpheus/follow/", Some(&neo_token)).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
    }
    assert!(env.state.follows.is_following(Some(neo.id), morpheus.id).await.unwrap());

    let res = test::call_service(
        &app,
        get("/profile/Morpheus/unfollow/", Some(&neo_token)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(!env.state.follows.is_following(Some(neo.id), morpheus.id).await.unwrap());

    // A second unfollow finds nothing to remove.
    let res = test::call_service(
        &app,
        get("/profile/Morpheus/unfollow/", Some(&neo_token)).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_self_follow_is_ignored() {
    let env = TestEnv::new();
    let (neo, neo_token) = env.user("Neo").await;
    env.post(&neo, "Talking to myself", None).await;
    let app = init_app!(env);

    let res = test::call_service(&app, get("/profile/Neo/follow/", Some(&neo_token)).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/Neo/");
    assert!(!env.state.follows.is_following(Some(neo.id), neo.id).await.unwrap());

    let res = test::call_service(&app, get("/profile/Neo/unfollow/", Some(&neo_token)).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let feed = json(test::call_service(&app, get("/follow/", Some(&neo_token)).to_request()).await).await;
    assert!(texts(&feed["page"]).is_empty());
}

#[actix_web::test]
async fn test_follow_unknown_author_is_404() {
    let env = TestEnv::new();
    let (_, token) = env.user("Neo").await;
    let app = init_app!(env);

    let res = test::call_service(&app, get("/profile/Nobody/follow/", Some(&token)).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_anonymous_follow_redirects_to_login() {
    let env = TestEnv::new();
    env.user("Morpheus").await;
    let app = init_app!(env);

    for uri in ["/profile/Morpheus/follow/", "/profile/Morpheus/unfollow/", "/follow/"] {
        let res = test::call_service(&app, get(uri, None).to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&res), format!("/auth/login/?next={uri}"));
    }
}

#[actix_web::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let res = test::call_service(&app, get("/follow/", Some("not-a-jwt")).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/follow/");
}
