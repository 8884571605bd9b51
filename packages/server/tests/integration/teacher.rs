use serde_json::json;

use crate::common::{TestApp, routes};

mod register {
    use super::*;

    #[tokio::test]
    async fn returns_created() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::TEACHER,
                &json!({ "name": "Grace Hopper", "email": "Grace@Example.com" }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"].as_str().unwrap(), "Grace Hopper");
        assert_eq!(res.body["email"].as_str().unwrap(), "grace@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let app = TestApp::spawn().await;
        app.register_teacher("Grace", "grace@example.com").await;

        let res = app
            .post(
                routes::TEACHER,
                &json!({ "name": "Another Grace", "email": "grace@example.com" }),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.error_code(), "CONFLICT");
    }

    #[tokio::test]
    async fn blank_name_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::TEACHER,
                &json!({ "name": "", "email": "grace@example.com" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn merges_only_supplied_fields() {
        let app = TestApp::spawn().await;
        let id = app
            .register_teacher("Grace", "grace@example.com")
            .await
            .id();

        let res = app
            .patch(&routes::teacher(&id), &json!({ "name": "Grace Hopper" }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"].as_str().unwrap(), "Grace Hopper");
        // Email untouched.
        assert_eq!(res.body["email"].as_str().unwrap(), "grace@example.com");
    }

    #[tokio::test]
    async fn empty_patch_returns_current_state() {
        let app = TestApp::spawn().await;
        let id = app
            .register_teacher("Grace", "grace@example.com")
            .await
            .id();

        let res = app.patch(&routes::teacher(&id), &json!({})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"].as_str().unwrap(), "Grace");
    }

    #[tokio::test]
    async fn email_taken_by_other_teacher_conflicts() {
        let app = TestApp::spawn().await;
        app.register_teacher("Grace", "grace@example.com").await;
        let id = app
            .register_teacher("Barbara", "barbara@example.com")
            .await
            .id();

        let res = app
            .patch(
                &routes::teacher(&id),
                &json!({ "email": "grace@example.com" }),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.error_code(), "CONFLICT");
    }

    #[tokio::test]
    async fn reasserting_own_email_is_fine() {
        let app = TestApp::spawn().await;
        let id = app
            .register_teacher("Grace", "grace@example.com")
            .await
            .id();

        let res = app
            .patch(
                &routes::teacher(&id),
                &json!({ "email": "grace@example.com" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn unknown_id_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(
                &routes::teacher("00000000-0000-4000-8000-000000000000"),
                &json!({ "name": "Nobody" }),
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod lookup_and_delete {
    use super::*;

    #[tokio::test]
    async fn lists_registered_teachers() {
        let app = TestApp::spawn().await;
        app.register_teacher("Grace", "grace@example.com").await;
        app.register_teacher("Barbara", "barbara@example.com").await;

        let res = app.get(routes::TEACHER).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fetches_by_id() {
        let app = TestApp::spawn().await;
        let id = app
            .register_teacher("Grace", "grace@example.com")
            .await
            .id();

        let res = app.get(&routes::teacher(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"].as_str().unwrap(), "Grace");
    }

    #[tokio::test]
    async fn delete_then_fetch_is_404() {
        let app = TestApp::spawn().await;
        let id = app
            .register_teacher("Grace", "grace@example.com")
            .await
            .id();

        let res = app.delete(&routes::teacher(&id)).await;
        assert_eq!(res.status, 204);

        let res = app.get(&routes::teacher(&id)).await;
        assert_eq!(res.status, 404);
    }
}
