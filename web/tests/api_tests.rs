//! End-to-end tests of the HTTP surface against the in-memory store.
//!
//! Each test builds the full router (session and header middleware included)
//! around a [`MockBlogStore`] and drives it with `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use axum::{
    Router,
    body::Body,
    http::{
        HeaderMap, HeaderValue, Request,
        header::{
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, COOKIE,
            SET_COOKIE, X_CONTENT_TYPE_OPTIONS,
        },
    },
};
use blog_core::User;
use blog_testing::MockBlogStore;
use blog_web::{AppState, HttpOptions, SESSION_COOKIE, SessionStore, SessionToken, build_router};
use cookie::Cookie;
use serde_json::{Value, json};
use tower::ServiceExt;

const ORIGIN: &str = "https://www.redhand.vip";

struct Harness {
    app: Router,
    store: MockBlogStore,
    sessions: SessionStore,
}

struct Reply {
    headers: HeaderMap,
    raw: String,
    body: Value,
}

impl Reply {
    fn err(&self) -> &str {
        self.body["err"].as_str().expect("err should be a string")
    }

    fn data(&self) -> Value {
        assert!(self.body["err"].is_null(), "unexpected error: {}", self.body["err"]);
        self.body["data"].clone()
    }

    fn issued_token(&self) -> Option<SessionToken> {
        let value = self.headers.get(SET_COOKIE)?.to_str().unwrap();
        let cookie = Cookie::parse(value).unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        SessionToken::parse(cookie.value())
    }
}

impl Harness {
    fn new() -> Self {
        let store = MockBlogStore::new();
        let sessions = SessionStore::new();
        let options = HttpOptions {
            allowed_origin: HeaderValue::from_static(ORIGIN),
            secure_cookie: false,
        };
        let app = build_router(
            AppState::with_sessions(store.clone(), sessions.clone()),
            options,
        );
        Self {
            app,
            store,
            sessions,
        }
    }

    /// Bind a fresh token to `user` without going through `/user`.
    fn session_for(&self, uid: i32, privilege: i32) -> SessionToken {
        let token = SessionToken::generate();
        self.sessions.put(
            token,
            User {
                uid,
                user_name: format!("user{uid}"),
                privilege,
            },
        );
        token
    }

    async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200, "every outcome is HTTP 200");
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        let body: Value = serde_json::from_str(&raw).unwrap();
        assert_envelope(&body);
        Reply { headers, raw, body }
    }

    async fn get(&self, uri: &str, token: Option<SessionToken>) -> Reply {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, token: Option<SessionToken>, body: Value) -> Reply {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn login(&self, token: Option<SessionToken>, user_name: &str, password: &str) -> Reply {
        self.post(
            "/user",
            token,
            json!({"action": "login", "userName": user_name, "passWord": password}),
        )
        .await
    }
}

/// Both keys present, exactly one of them non-null.
fn assert_envelope(body: &Value) {
    let object = body.as_object().expect("envelope should be an object");
    assert_eq!(object.len(), 2, "unexpected keys in {body}");
    assert!(object.contains_key("err") && object.contains_key("data"));
    assert!(
        body["err"].is_null() != body["data"].is_null(),
        "exactly one side populated: {body}"
    );
}

fn insert_post_body() -> Value {
    json!({"action": "insert", "title": "t", "content": "c", "tags": ["x"]})
}

#[tokio::test]
async fn test_first_request_gets_cookie_and_anonymous_identity() {
    let harness = Harness::new();

    let reply = harness.get("/ping", None).await;

    assert!(reply.issued_token().is_some());
    assert_eq!(reply.data(), "pong");
    assert!(harness.sessions.is_empty());
}

#[tokio::test]
async fn test_known_cookie_is_not_reissued() {
    let harness = Harness::new();
    let token = harness.session_for(4, 1);

    let reply = harness.get("/ping", Some(token)).await;

    assert!(reply.headers.get(SET_COOKIE).is_none());
    assert_eq!(reply.data(), "pong, user4");
}

#[tokio::test]
async fn test_login_binds_session() {
    let harness = Harness::new();
    harness.store.with_user("a", "pw", 0);

    let reply = harness.login(None, "a", "pw").await;
    assert_eq!(
        reply.raw,
        r#"{"err":null,"data":{"uid":1,"userName":"a","privilege":0}}"#
    );
    let token = reply.issued_token().expect("first request should issue a token");

    let reply = harness.get("/ping", Some(token)).await;
    assert_eq!(reply.data(), "pong, a");
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let harness = Harness::new();
    harness.store.with_user("a", "pw", 0);

    let reply = harness.login(None, "a", "nope").await;

    assert_eq!(reply.err(), "login user: user not found");
    assert!(harness.sessions.is_empty());
}

#[tokio::test]
async fn test_session_keeps_identity_from_login() {
    let harness = Harness::new();
    let uid = harness.store.with_user("a", "pw", 0);
    let token = harness.login(None, "a", "pw").await.issued_token().unwrap();

    // Demoted after login: the session still carries the admin snapshot.
    harness.store.set_privilege(uid, 1);

    let reply = harness.post("/post", Some(token), insert_post_body()).await;
    assert_eq!(reply.data(), 1);
    assert_eq!(harness.store.post(1).unwrap().tags, vec!["x".to_string()]);
}

#[tokio::test]
async fn test_repeated_login_replaces_binding() {
    let harness = Harness::new();
    harness.store.with_user("a", "pw", 0);
    harness.store.with_user("b", "pw2", 1);
    let token = harness.login(None, "a", "pw").await.issued_token().unwrap();

    let reply = harness.login(Some(token), "a", "pw").await;
    assert!(reply.headers.get(SET_COOKIE).is_none());
    assert_eq!(harness.sessions.len(), 1);

    harness.login(Some(token), "b", "pw2").await;
    assert_eq!(harness.sessions.len(), 1);
    assert_eq!(harness.sessions.get(&token).unwrap().user_name, "b");
    assert_eq!(harness.get("/ping", Some(token)).await.data(), "pong, b");
}

#[tokio::test]
async fn test_mutations_require_admin_before_storage() {
    let harness = Harness::new();
    let ordinary = harness.session_for(2, 1);

    let reply = harness.post("/post", None, insert_post_body()).await;
    assert_eq!(reply.err(), "user is not logged in");

    let reply = harness.post("/post", Some(ordinary), insert_post_body()).await;
    assert_eq!(reply.err(), "not enough privilege");

    let reply = harness
        .post(
            "/comment",
            None,
            json!({"action": "insert", "pid": 1, "content": "hi", "email": "a@b.c"}),
        )
        .await;
    assert_eq!(reply.err(), "user is not logged in");

    let reply = harness
        .post(
            "/comment",
            Some(ordinary),
            json!({"action": "delete", "commentID": 1}),
        )
        .await;
    assert_eq!(reply.err(), "not enough privilege");

    assert_eq!(harness.store.call_count(), 0);
}

#[tokio::test]
async fn test_privilege_checked_before_body() {
    let harness = Harness::new();

    let request = Request::builder()
        .method("POST")
        .uri("/post")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let reply = harness.send(request).await;

    assert_eq!(reply.err(), "user is not logged in");
}

#[tokio::test]
async fn test_post_lifecycle_as_admin() {
    let harness = Harness::new();
    let admin = harness.session_for(1, 0);

    let pid = harness.post("/post", Some(admin), insert_post_body()).await;
    assert_eq!(pid.data(), 1);

    let reply = harness
        .post(
            "/post",
            Some(admin),
            json!({"action": "update", "pid": 1, "newTitle": "t2", "newContent": "c2", "newTags": []}),
        )
        .await;
    assert_eq!(reply.data(), 1);

    let reply = harness.get("/post?id=1", None).await;
    assert_eq!(reply.data()["title"], "t2");
    assert_eq!(reply.data()["tags"], json!([]));
    assert!(reply.data()["mDate"].is_string());

    let reply = harness
        .post("/post", Some(admin), json!({"action": "delete", "pid": 1}))
        .await;
    assert_eq!(reply.data(), 1);

    let reply = harness
        .post("/post", Some(admin), json!({"action": "delete", "pid": 1}))
        .await;
    assert_eq!(reply.err(), "no matched post found");

    let reply = harness.get("/post?id=1", None).await;
    assert_eq!(reply.err(), "get post by id: post not found");
}

#[tokio::test]
async fn test_view_post_validates_id() {
    let harness = Harness::new();

    let reply = harness.get("/post?id=-1", None).await;
    assert_eq!(reply.err(), "id value cannot be less than 0");

    let reply = harness.get("/post", None).await;
    assert_eq!(reply.err(), "convert id to int: missing value");

    let reply = harness.get("/post?id=abc", None).await;
    assert!(reply.err().starts_with("convert id to int: "));

    assert_eq!(harness.store.call_count(), 0);
}

#[tokio::test]
async fn test_empty_listing_skips_list_query() {
    let harness = Harness::new();

    let reply = harness.get("/posts?page=1&pageSize=10", None).await;

    assert_eq!(reply.data(), json!({"posts": [], "maxPage": 0}));
    assert_eq!(harness.store.calls(), vec!["get_posts_count"]);
}

#[tokio::test]
async fn test_listing_pages() {
    let harness = Harness::new();
    for n in 1..=25 {
        harness.store.with_post(&format!("post {n}"), "body", &[]);
    }

    let reply = harness.get("/posts?page=3&pageSize=10", None).await;
    assert_eq!(reply.data()["maxPage"], 3);
    let data = reply.data();
    let posts = data["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 5);
    // Newest first
    assert_eq!(posts[0]["pid"], 5);

    let reply = harness.get("/posts?page=4&pageSize=10", None).await;
    assert_eq!(reply.err(), "page number 4 is bigger than max page 3");
    assert_eq!(
        harness.store.calls(),
        vec!["get_posts_count", "get_posts", "get_posts_count"]
    );
}

#[tokio::test]
async fn test_listing_validates_pagination() {
    let harness = Harness::new();

    let reply = harness.get("/posts?page=0&pageSize=10", None).await;
    assert_eq!(reply.err(), "page value cannot be less than 1");

    let reply = harness.get("/posts?page=1", None).await;
    assert_eq!(reply.err(), "convert pageSize to int: missing value");

    assert_eq!(harness.store.call_count(), 0);
}

#[tokio::test]
async fn test_keyword_uses_full_text_search() {
    let harness = Harness::new();
    harness.store.with_post("Rust tips", "ownership", &["rust"]);
    harness.store.with_post("Go tips", "goroutines", &["go"]);

    let reply = harness.get("/posts?page=1&pageSize=10&keyword=rust", None).await;
    assert_eq!(reply.data()["maxPage"], 1);
    assert_eq!(reply.data()["posts"][0]["title"], "Rust tips");
    assert_eq!(reply.data()["posts"].as_array().unwrap().len(), 1);
    assert_eq!(
        harness.store.calls(),
        vec!["get_posts_count_by_fts", "get_posts_by_fts"]
    );

    let reply = harness.get("/posts?page=1&pageSize=10&keyword=", None).await;
    assert_eq!(reply.data()["posts"].as_array().unwrap().len(), 2);
    assert_eq!(harness.store.calls()[2], "get_posts_count");
}

#[tokio::test]
async fn test_comment_listing() {
    let harness = Harness::new();
    let pid = harness.store.with_post("t", "c", &[]);
    for n in 1..=3 {
        harness
            .store
            .with_comment(pid, &format!("comment {n}"), "a@b.c");
    }

    let reply = harness.get("/comments?pid=1&page=2&pageSize=2", None).await;
    assert_eq!(reply.data()["maxPage"], 2);
    assert_eq!(reply.data()["comments"][0]["content"], "comment 3");

    let reply = harness.get("/comments?pid=0&page=1&pageSize=2", None).await;
    assert_eq!(reply.err(), "pid cannot be less than 1");

    let reply = harness.get("/comments?pid=9&page=1&pageSize=2", None).await;
    assert_eq!(reply.data(), json!({"comments": [], "maxPage": 0}));
}

#[tokio::test]
async fn test_comment_mutations() {
    let harness = Harness::new();
    let admin = harness.session_for(1, 0);
    harness.store.with_post("t", "c", &[]);

    let reply = harness
        .post(
            "/comment",
            Some(admin),
            json!({"action": "insert", "pid": 1, "content": "hi", "email": "a@b.c"}),
        )
        .await;
    assert_eq!(reply.data(), 1);

    let reply = harness
        .post(
            "/comment",
            Some(admin),
            json!({"action": "update", "commentID": 1, "newContent": "bye", "newEmail": "d@e.f"}),
        )
        .await;
    assert_eq!(reply.data(), 1);
    assert_eq!(harness.store.comment(1).unwrap().content, "bye");

    let reply = harness
        .post(
            "/comment",
            Some(admin),
            json!({"action": "update", "commentID": 7, "newContent": "x", "newEmail": "y"}),
        )
        .await;
    assert_eq!(reply.err(), "no matched comment found");

    let reply = harness
        .post(
            "/comment",
            Some(admin),
            json!({"action": "insert", "pid": 42, "content": "hi", "email": "a@b.c"}),
        )
        .await;
    assert_eq!(reply.err(), "insert comment: post not found");
}

#[tokio::test]
async fn test_register_and_change_password() {
    let harness = Harness::new();
    let register = json!({"action": "register", "userName": "c", "passWord": "old"});

    let reply = harness.post("/user", None, register.clone()).await;
    assert_eq!(reply.data(), 1);

    let reply = harness.post("/user", None, register).await;
    assert_eq!(reply.err(), "register user: user name already exists");

    let update = json!({"action": "update", "uid": 1, "newPassWord": "new"});
    let reply = harness.post("/user", None, update.clone()).await;
    assert_eq!(reply.err(), "user is not logged in");

    let stranger = harness.session_for(2, 1);
    let reply = harness.post("/user", Some(stranger), update.clone()).await;
    assert_eq!(reply.err(), "not enough privilege");

    let token = harness.login(None, "c", "old").await.issued_token().unwrap();
    let reply = harness.post("/user", Some(token), update).await;
    assert_eq!(reply.data(), 1);

    assert!(harness.login(None, "c", "old").await.body["data"].is_null());
    assert_eq!(harness.login(None, "c", "new").await.data()["uid"], 1);
}

#[tokio::test]
async fn test_admin_may_change_any_password() {
    let harness = Harness::new();
    harness.store.with_user("c", "old", 1);
    let admin = harness.session_for(9, 0);

    let reply = harness
        .post(
            "/user",
            Some(admin),
            json!({"action": "update", "uid": 1, "newPassWord": "new"}),
        )
        .await;
    assert_eq!(reply.data(), 1);

    let reply = harness
        .post(
            "/user",
            Some(admin),
            json!({"action": "update", "uid": 5, "newPassWord": "new"}),
        )
        .await;
    assert_eq!(reply.err(), "no matched user found");
}

#[tokio::test]
async fn test_bad_bodies() {
    let harness = Harness::new();

    let request = Request::builder()
        .method("POST")
        .uri("/user")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"action":"login"}"#))
        .unwrap();
    assert_eq!(
        harness.send(request).await.err(),
        "request body is not application/json"
    );

    let request = Request::builder()
        .method("POST")
        .uri("/user")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    assert!(
        harness
            .send(request)
            .await
            .err()
            .starts_with("parse request body as json")
    );

    let reply = harness.post("/user", None, json!({"userName": "a"})).await;
    assert_eq!(reply.err(), "missing action field in json");

    let reply = harness.post("/user", None, json!({"action": "logout"})).await;
    assert_eq!(
        reply.err(),
        "cannot perform action logout on user: unknown action"
    );

    let reply = harness
        .post("/user", None, json!({"action": "login", "userName": "a"}))
        .await;
    assert!(reply.err().starts_with("parse login request: "), "{}", reply.err());

    assert_eq!(harness.store.call_count(), 0);
}

#[tokio::test]
async fn test_wrong_method_and_unknown_route() {
    let harness = Harness::new();

    let request = Request::builder()
        .method("DELETE")
        .uri("/post?id=1")
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        harness.send(request).await.err(),
        "request method DELETE is not supported"
    );

    let reply = harness
        .post("/posts", None, json!({"action": "insert"}))
        .await;
    assert_eq!(reply.err(), "request method POST is not supported");

    let reply = harness.get("/nowhere", None).await;
    assert_eq!(reply.err(), "no resource at /nowhere");
    assert!(reply.issued_token().is_some());

    assert_eq!(harness.store.call_count(), 0);
}

#[tokio::test]
async fn test_storage_failure_is_enveloped() {
    let harness = Harness::new();
    harness.store.fail_with("connection reset");

    let reply = harness.get("/post?id=1", None).await;
    assert_eq!(reply.err(), "get post by id: storage failure");
    assert!(!reply.raw.contains("connection reset"));

    let reply = harness.get("/posts?page=1&pageSize=5", None).await;
    assert_eq!(reply.err(), "get count of posts: storage failure");
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let harness = Harness::new();

    for reply in [
        harness.get("/ping", None).await,
        harness.get("/post?id=x", None).await,
        harness.get("/missing", None).await,
    ] {
        let headers = &reply.headers;
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[CACHE_CONTROL], "no-cache, no-store, must-revalidate");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
        assert_eq!(headers[CONNECTION], "close");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }
}
