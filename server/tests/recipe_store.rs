//! End-to-end checks against a real Postgres. Set `TEST_DATABASE_URL` to run
//! them; without it every test returns early.

use std::sync::{Arc, OnceLock};
use std::thread;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use diesel::prelude::*;
use http_body_util::BodyExt;
use platter_core::TermKind;
use platter_server::api::paths::{self, with_id};
use platter_server::auth::{hash_password, TokenType};
use platter_server::config::Config;
use platter_server::db::{create_pool, DbPool};
use platter_server::mail::{Mailer, RecordingMailer};
use platter_server::models::{NewUser, User};
use platter_server::recipes::{social, terms};
use platter_server::schema::{categories, users};
use platter_server::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "store-test-secret";
const PASSWORD: &str = "saffron-rice-42";

fn pool() -> Option<DbPool> {
    static POOL: OnceLock<Option<DbPool>> = OnceLock::new();
    POOL.get_or_init(|| {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        Some(create_pool(&url).expect("test database should be reachable"))
    })
    .clone()
}

macro_rules! require_db {
    () => {
        match pool() {
            Some(pool) => pool,
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

/// Short unique suffix so tests sharing a database never collide.
fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

struct Harness {
    state: AppState,
    mailer: Arc<RecordingMailer>,
}

impl Harness {
    fn new(pool: DbPool) -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(
            pool,
            Config::for_tests(SECRET),
            mailer.clone() as Arc<dyn Mailer>,
        );
        Self { state, mailer }
    }

    fn app(&self) -> Router {
        app(self.state.clone())
    }

    fn user(&self, name: &str) -> User {
        let mut conn = self.state.pool.get().unwrap();
        let hash = hash_password(PASSWORD).unwrap();
        let username = format!("{name}{}", tag());
        diesel::insert_into(users::table)
            .values(&NewUser {
                email: &format!("{username}@example.com"),
                username: &username,
                password_hash: &hash,
            })
            .returning(User::as_returning())
            .get_result(&mut conn)
            .unwrap()
    }

    fn token(&self, user: &User) -> String {
        self.state
            .tokens
            .issue(user, TokenType::Access, Utc::now())
            .unwrap()
            .token
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(self.app(), method, uri, token, body).await
    }

    /// Sign in over HTTP and return `(access, refresh)`.
    async fn sign_in(&self, email: &str, password: &str) -> (String, String) {
        let (status, tokens) = self
            .call(
                "POST",
                paths::SIGNIN,
                None,
                Some(json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{tokens}");
        (
            tokens["access"].as_str().unwrap().to_string(),
            tokens["refresh"].as_str().unwrap().to_string(),
        )
    }

    /// Request a reset link for `email` and return the confirm payload for it.
    async fn reset_confirmation(&self, email: &str, new_password: &str) -> Value {
        let (status, _) = self
            .call("POST", paths::PASSWORD_RESET, None, Some(json!({"email": email})))
            .await;
        assert_eq!(status, StatusCode::OK);

        let mail = self.mailer.sent().pop().expect("reset mail sent");
        let link = mail
            .body
            .split_whitespace()
            .find(|word| word.contains("uidb64="))
            .unwrap()
            .to_string();
        let query = link.split_once('?').unwrap().1;
        let (uid_part, token_part) = query.split_once('&').unwrap();
        json!({
            "uidb64": uid_part.trim_start_matches("uidb64="),
            "token": token_part.trim_start_matches("token="),
            "new_password": new_password,
        })
    }

    async fn create(&self, token: &str, draft: Value) -> Uuid {
        let (status, body) = self.call("POST", "/api/create", Some(token), Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn draft(title: &str) -> Value {
    json!({
        "title": title,
        "description": "A weeknight staple",
        "ingredients": [
            {"ingredient": "Rice", "quantity": "1 cup"},
            {"ingredient": "Chickpeas", "quantity": "1 can"}
        ],
        "steps": [
            {"instruction": "Rinse the rice"},
            {"instruction": "Simmer", "timer": "20m"}
        ],
        "is_published": true
    })
}

#[test]
fn test_concurrent_term_resolution_creates_one_row() {
    let pool = require_db!();
    let name = format!("Brunch{}", tag());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            let name = name.clone();
            thread::spawn(move || {
                let mut conn = pool.get().unwrap();
                terms::resolve(&mut conn, TermKind::Category, &name).unwrap()
            })
        })
        .collect();
    let ids: Vec<Uuid> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    let mut conn = pool.get().unwrap();
    let rows: i64 = categories::table
        .filter(categories::name.eq(&name))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_update_replaces_only_present_fields() {
    let h = Harness::new(require_db!());
    let cook = h.user("cook");
    let token = h.token(&cook);
    let lunch = format!("Lunch{}", tag());

    let mut body = draft("Chana pulao");
    body["session"] = json!([lunch]);
    let id = h.create(&token, body).await;

    let (status, detail) = h
        .call(
            "PATCH",
            &with_id(paths::UPDATE, id),
            Some(&token),
            Some(json!({"ingredients": [{"ingredient": "Basmati", "quantity": "2 cups"}]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{detail}");
    assert_eq!(
        detail["ingredients"],
        json!([{"ingredient": "Basmati", "quantity": "2 cups"}])
    );
    assert_eq!(detail["session"], json!([lunch]));
    assert_eq!(detail["steps"].as_array().unwrap().len(), 2);

    let (status, detail) = h
        .call(
            "PATCH",
            &with_id(paths::UPDATE, id),
            Some(&token),
            Some(json!({"session": []})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["session"], json!([]));
    assert_eq!(detail["ingredients"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_the_author_may_edit() {
    let h = Harness::new(require_db!());
    let author = h.user("author");
    let other = h.user("other");
    let id = h.create(&h.token(&author), draft("Dal")).await;

    let other_token = h.token(&other);
    let (status, _) = h
        .call(
            "PATCH",
            &with_id(paths::UPDATE, id),
            Some(&other_token),
            Some(json!({"title": "Mine now"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = h
        .call("DELETE", &with_id(paths::DELETE, id), Some(&other_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = h
        .call(
            "DELETE",
            &with_id(paths::DELETE, Uuid::new_v4()),
            Some(&other_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_twice_restores_state() {
    let h = Harness::new(require_db!());
    let author = h.user("author");
    let fan = h.user("fan");
    let id = h.create(&h.token(&author), draft("Rasam")).await;
    let fan_token = h.token(&fan);

    let (status, first) = h
        .call("POST", &with_id(paths::RECIPE_LIKE, id), Some(&fan_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, json!({"active": true, "count": 1}));

    let (_, second) = h
        .call("POST", &with_id(paths::RECIPE_LIKE, id), Some(&fan_token), None)
        .await;
    assert_eq!(second, json!({"active": false, "count": 0}));
}

#[tokio::test]
async fn test_concurrent_toggles_cancel_out() {
    let h = Harness::new(require_db!());
    let author = h.user("author");
    let fan = h.user("fan");
    let id = h.create(&h.token(&author), draft("Idli")).await;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let pool = h.state.pool.clone();
            let fan_id = fan.id;
            thread::spawn(move || {
                let mut conn = pool.get().unwrap();
                social::toggle(&mut conn, social::SocialSet::Saves, id, fan_id).unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let (_, detail) = h.call("GET", &with_id(paths::RECIPE, id), None, None).await;
    assert_eq!(detail["saves"], 0);
}

#[tokio::test]
async fn test_concurrent_views_are_all_counted() {
    let h = Harness::new(require_db!());
    let author = h.user("author");
    let id = h.create(&h.token(&author), draft("Upma")).await;

    const VIEWS: usize = 16;
    let handles: Vec<_> = (0..VIEWS)
        .map(|_| {
            let pool = h.state.pool.clone();
            thread::spawn(move || {
                let mut conn = pool.get().unwrap();
                social::record_view(&mut conn, id).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_some());
    }

    // The GET itself counts one more
    let (_, detail) = h.call("GET", &with_id(paths::RECIPE, id), None, None).await;
    assert_eq!(detail["view_count"], VIEWS as i64 + 1);
}

#[tokio::test]
async fn test_list_filters_and_across_sessions() {
    let h = Harness::new(require_db!());
    let cook = h.user("cook");
    let token = h.token(&cook);
    let t = tag();
    let (indian, lunch, dinner) = (format!("Indian{t}"), format!("Lunch{t}"), format!("Dinner{t}"));

    let mut both = draft("Biryani");
    both["region"] = json!(indian);
    both["session"] = json!([lunch, dinner]);
    let both_id = h.create(&token, both).await;

    let mut lunch_only = draft("Thali");
    lunch_only["region"] = json!(indian);
    lunch_only["session"] = json!([lunch]);
    h.create(&token, lunch_only).await;

    let mut elsewhere = draft("Paella");
    elsewhere["region"] = json!(format!("Spanish{t}"));
    elsewhere["session"] = json!([lunch, dinner]);
    h.create(&token, elsewhere).await;

    let (status, list) = h
        .call(
            "GET",
            &format!("/api/list?region={indian}&session={lunch}&session={dinner}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["pagination"]["total"], 1);
    assert_eq!(list["recipes"][0]["id"], both_id.to_string());

    let (_, list) = h
        .call("GET", &format!("/api/list?region={indian}"), None, None)
        .await;
    assert_eq!(list["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_unpublished_recipes_stay_private() {
    let h = Harness::new(require_db!());
    let author = h.user("author");
    let token = h.token(&author);
    let mut body = draft("Secret sauce");
    body["is_published"] = json!(false);
    let id = h.create(&token, body).await;

    let (status, _) = h.call("GET", &with_id(paths::RECIPE, id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, mine) = h.call("GET", "/api/my-recipes", Some(&token), None).await;
    assert!(mine["recipes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"] == id.to_string()));
}

#[tokio::test]
async fn test_reset_token_is_single_use() {
    let h = Harness::new(require_db!());
    let user = h.user("forgetful");
    let (_, refresh) = h.sign_in(&user.email, PASSWORD).await;

    let confirm = h.reset_confirmation(&user.email, "tamarind-stew-77").await;
    let (status, body) = h
        .call("POST", paths::PASSWORD_RESET_CONFIRM, None, Some(confirm.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = h
        .call("POST", paths::PASSWORD_RESET_CONFIRM, None, Some(confirm))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Refresh tokens issued before the reset are revoked
    let (status, _) = h
        .call("POST", paths::TOKEN_REFRESH, None, Some(json!({"refresh": refresh})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    h.sign_in(&user.email, "tamarind-stew-77").await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_confirms_spend_token_once() {
    let h = Harness::new(require_db!());
    let user = h.user("racer");
    let confirm = h.reset_confirmation(&user.email, "tamarind-stew-77").await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let app = h.app();
            let confirm = confirm.clone();
            tokio::spawn(async move {
                send(app, "POST", paths::PASSWORD_RESET_CONFIRM, None, Some(confirm))
                    .await
                    .0
            })
        })
        .collect();

    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::OK => accepted += 1,
            other => assert_eq!(other, StatusCode::UNAUTHORIZED),
        }
    }
    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn test_refresh_issues_access_until_password_changes() {
    let h = Harness::new(require_db!());
    let user = h.user("steady");
    let (access, refresh) = h.sign_in(&user.email, PASSWORD).await;

    let (status, body) = h
        .call("POST", paths::TOKEN_REFRESH, None, Some(json!({"refresh": &refresh})))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let fresh = body["access"].as_str().unwrap();

    let (status, profile) = h.call("GET", paths::PROFILE, Some(fresh), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], user.username.as_str());

    // An access token is not a refresh token
    let (status, _) = h
        .call("POST", paths::TOKEN_REFRESH, None, Some(json!({"refresh": &access})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = h
        .call(
            "POST",
            paths::CHANGE_PASSWORD,
            Some(&access),
            Some(json!({"old_password": PASSWORD, "new_password": "tamarind-stew-77"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = h
        .call("POST", paths::TOKEN_REFRESH, None, Some(json!({"refresh": &refresh})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_account_cannot_sign_in() {
    let h = Harness::new(require_db!());
    let user = h.user("sleepy");
    let credentials = json!({"email": &user.email, "password": PASSWORD});

    let (status, _) = h
        .call("POST", "/api/user/reactivate", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = h
        .call("POST", "/api/user/deactivate", Some(&h.token(&user)), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = h
        .call("POST", "/api/user/signin", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = h
        .call("POST", "/api/user/reactivate", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, tokens) = h
        .call("POST", "/api/user/signin", None, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(tokens["access"].is_string());
}

#[tokio::test]
async fn test_detail_returns_terms_and_steps_in_order() {
    let h = Harness::new(require_db!());
    let cook = h.user("cook");
    let t = tag();
    let (indian, lunch, dinner) = (format!("Indian{t}"), format!("Lunch{t}"), format!("Dinner{t}"));

    let mut body = draft("Chana masala");
    body["region"] = json!(indian);
    body["session"] = json!([lunch, dinner]);
    body["steps"] = json!([
        {"step_no": 3, "instruction": "Serve"},
        {"step_no": 1, "instruction": "Soak"},
        {"step_no": 2, "instruction": "Simmer"},
    ]);
    let id = h.create(&h.token(&cook), body).await;

    let (status, detail) = h.call("GET", &with_id(paths::RECIPE, id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["region"], indian.as_str());
    assert_eq!(detail["session"], json!([dinner, lunch]));
    let steps: Vec<(i64, &str)> = detail["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s["step_no"].as_i64().unwrap(), s["instruction"].as_str().unwrap()))
        .collect();
    assert_eq!(steps, vec![(1, "Soak"), (2, "Simmer"), (3, "Serve")]);
}

#[tokio::test]
async fn test_account_deletion_removes_recipes() {
    let h = Harness::new(require_db!());
    let cook = h.user("leaving");
    let token = h.token(&cook);
    let id = h.create(&token, draft("Farewell kheer")).await;

    let (status, _) = h.call("DELETE", paths::DELETE_ACCOUNT, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = h.call("GET", &with_id(paths::RECIPE, id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_on_drafts_visible_to_author_only() {
    let h = Harness::new(require_db!());
    let author = h.user("author");
    let stranger = h.user("stranger");
    let token = h.token(&author);
    let mut body = draft("Work in progress");
    body["is_published"] = json!(false);
    let id = h.create(&token, body).await;

    let (status, comment) = h
        .call(
            "POST",
            &with_id(paths::RECIPE_COMMENTS, id),
            Some(&token),
            Some(json!({"body": "Needs more salt"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{comment}");
    let comment_id = comment["id"].as_str().unwrap();

    let (status, list) = h
        .call("GET", &with_id(paths::RECIPE_COMMENTS, id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (status, _) = h
        .call("GET", &with_id(paths::COMMENT, comment_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let stranger_token = h.token(&stranger);
    for viewer in [None, Some(stranger_token.as_str())] {
        let (status, _) = h
            .call("GET", &with_id(paths::RECIPE_COMMENTS, id), viewer, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = h
            .call("GET", &with_id(paths::COMMENT, comment_id), viewer, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
