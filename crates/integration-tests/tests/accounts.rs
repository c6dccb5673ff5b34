//! Sign-up, login, logout and the pages that depend on them.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use glownest_integration_tests::{TestContext, location, new_client};
use reqwest::StatusCode;

#[tokio::test]
async fn test_register_logs_in_and_greets() {
    let ctx = TestContext::new().await;

    let resp = ctx.register("Ada Lovelace", "ada@example.com", "engine42").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let cookie = resp.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("glownest_session="));
    assert!(cookie.contains("HttpOnly"));

    let body = ctx.page("/").await;
    assert!(body.contains("Account created successfully!"));
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains(r#"action="/auth/logout""#));

    // Toasts show once
    let body = ctx.page("/").await;
    assert!(!body.contains("Account created successfully!"));
}

#[tokio::test]
async fn test_register_validation_keeps_entered_values() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post_form(
            "/auth/register",
            &[
                ("name", "Ada"),
                ("email", "ada@example"),
                ("password", "abc"),
                ("confirm_password", "abd"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Email is invalid"));
    assert!(body.contains("Password must be at least 6 characters"));
    assert!(body.contains("Passwords do not match"));
    assert!(body.contains(r#"value="Ada""#));
    assert!(body.contains(r#"value="ada@example""#));
    assert!(!body.contains(r#"value="abc""#));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.register("Ada", "ada@example.com", "engine42").await;
    ctx.post_form("/auth/logout", &[]).await;

    let resp = ctx.register("Ada Again", "ada@example.com", "engine43").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Email already registered. Please login instead."));
}

#[tokio::test]
async fn test_login_failures() {
    let ctx = TestContext::new().await;
    ctx.register("Grace", "grace@example.com", "cobol59").await;
    ctx.post_form("/auth/logout", &[]).await;

    let resp = ctx.login("nobody@example.com", "cobol59").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("User not found. Please check your email."));

    let resp = ctx.login("grace@example.com", "fortran").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Incorrect password. Please try again."));

    // Email matching is case-sensitive
    let resp = ctx.login("Grace@example.com", "cobol59").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_logout_then_login() {
    let ctx = TestContext::new().await;
    ctx.register("Grace", "grace@example.com", "cobol59").await;

    let resp = ctx.post_form("/auth/logout", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/register");

    let resp = ctx.get("/profile").await;
    assert_eq!(location(&resp), "/register");

    let resp = ctx.login("grace@example.com", "cobol59").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(ctx.page("/").await.contains("Login successful!"));
}

#[tokio::test]
async fn test_accounts_are_per_client() {
    let ctx = TestContext::new().await;
    ctx.register("Grace", "grace@example.com", "cobol59").await;

    // A second browser has its own store, so the account does not exist there
    let resp = new_client()
        .post(ctx.url("/auth/login"))
        .form(&[("email", "grace@example.com"), ("password", "cobol59")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_page_modes() {
    let ctx = TestContext::new().await;

    let body = ctx.page("/register").await;
    assert!(body.contains("Welcome Back"));
    assert!(body.contains("Sign in to continue shopping"));
    assert!(!body.contains("Confirm Password"));

    let body = ctx.page("/register?mode=signup").await;
    assert!(body.contains("Create Account"));
    assert!(body.contains("Confirm Password"));

    ctx.register("Grace", "grace@example.com", "cobol59").await;
    let body = ctx.page("/register").await;
    assert!(body.contains("Already Logged In"));
    assert!(body.contains("Go to Profile"));
}

#[tokio::test]
async fn test_profile_and_about_after_login() {
    let ctx = TestContext::new().await;
    ctx.register("Grace Hopper", "grace@example.com", "cobol59").await;

    let resp = ctx.get("/profile").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Grace Hopper"));
    assert!(body.contains("grace@example.com"));
    assert!(body.contains("Member since"));
    assert!(body.contains("Total Orders"));

    let resp = ctx.get("/about").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("About GlowNest"));
}

#[tokio::test]
async fn test_auth_posts_are_rate_limited() {
    let ctx = TestContext::behind_proxy().await;

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let resp = ctx
            .client
            .post(ctx.url("/auth/login"))
            .header("x-forwarded-for", "203.0.113.7")
            .form(&[("email", "x@example.com"), ("password", "secret1")])
            .send()
            .await
            .unwrap();
        statuses.push(resp.status());
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);

    // Another client address has its own budget
    let resp = ctx
        .client
        .post(ctx.url("/auth/login"))
        .header("x-forwarded-for", "203.0.113.8")
        .form(&[("email", "x@example.com"), ("password", "secret1")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_rotating_forwarded_for_does_not_bypass_rate_limit() {
    let ctx = TestContext::new().await;

    let mut statuses = Vec::new();
    for i in 0..10 {
        let resp = ctx
            .client
            .post(ctx.url("/auth/login"))
            .header("x-forwarded-for", format!("203.0.113.{i}"))
            .header("x-real-ip", format!("198.51.100.{i}"))
            .form(&[("email", "x@example.com"), ("password", "secret1")])
            .send()
            .await
            .unwrap();
        statuses.push(resp.status());
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNPROCESSABLE_ENTITY));
    assert!(statuses[5..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
}
