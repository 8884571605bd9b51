use serde_json::json;

use crate::common::{TestApp, routes};

mod submit {
    use super::*;

    #[tokio::test]
    async fn full_scenario_register_submit_list() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;

        let res = app
            .submit_assignment(
                "Ada",
                "Math",
                Some("Week 3 problem set"),
                "hw.pdf",
                b"%PDF-1.4 homework".to_vec(),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["student_name"].as_str().unwrap(), "Ada");
        assert_eq!(res.body["subject"].as_str().unwrap(), "Math");
        let filename = res.body["filename"].as_str().unwrap();
        assert!(filename.ends_with(".pdf"));
        assert_ne!(filename, "hw.pdf");
        let id = res.id();

        // getById reproduces the view.
        let fetched = app.get(&routes::assignment(&id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, res.body);

        // Exactly one entry for Ada.
        let listed = app.get(&routes::assignments_by_student("Ada")).await;
        assert_eq!(listed.status, 200);
        let entries = listed.body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"].as_str().unwrap(), id);
    }

    #[tokio::test]
    async fn stored_filename_never_echoes_client_name() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;

        let res = app
            .submit_assignment(
                "Ada",
                "Math",
                None,
                "my secret draft (final)!.pdf",
                b"data".to_vec(),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let filename = res.body["filename"].as_str().unwrap();
        assert!(filename.starts_with("Ada-"));
        assert!(filename.ends_with(".pdf"));
        assert!(!filename.contains("secret"));
        assert!(!filename.contains(' '));
    }

    #[tokio::test]
    async fn unknown_student_is_404_and_writes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .submit_assignment("Nobody", "Math", None, "hw.pdf", b"data".to_vec())
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
        assert!(res.text.contains("Student 'Nobody' not found"));
        assert_eq!(app.content_file_count(), 0);
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;

        let res = app.submit_assignment_without_file("Ada", "Math").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
        assert!(res.text.contains("File is required"));
    }

    #[tokio::test]
    async fn unknown_student_outranks_missing_file() {
        let app = TestApp::spawn().await;

        let res = app.submit_assignment_without_file("Nobody", "Math").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;

        let res = app
            .submit_assignment("Ada", "Math", None, "hw.pdf", Vec::new())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
        assert_eq!(app.content_file_count(), 0);
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;

        for file_name in ["malware.exe", "script.sh", "noextension"] {
            let res = app
                .submit_assignment("Ada", "Math", None, file_name, b"data".to_vec())
                .await;
            assert_eq!(res.status, 400, "expected 400 for {file_name:?}");
            assert_eq!(res.error_code(), "UNSUPPORTED_FILE_TYPE");
            assert!(res.text.contains("pdf"), "allowed set should be listed");
        }
        assert_eq!(app.content_file_count(), 0);
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_without_ledger_write() {
        let app = TestApp::spawn_with_max_file_size(1024).await;
        app.register_student("Ada", "ada@x.com").await;

        let res = app
            .submit_assignment("Ada", "Math", None, "hw.pdf", vec![0u8; 2048])
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.error_code(), "FILE_TOO_LARGE");

        let listed = app.get(routes::ASSIGNMENT).await;
        assert_eq!(listed.body.as_array().unwrap().len(), 0);
        assert_eq!(app.content_file_count(), 0);
    }

    #[tokio::test]
    async fn blank_subject_is_rejected() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;

        let res = app
            .submit_assignment("Ada", "   ", None, "hw.pdf", b"data".to_vec())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_all_with_student_names() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;
        app.register_student("Grace", "grace@x.com").await;
        app.submit_assignment("Ada", "Math", None, "a.pdf", b"a".to_vec())
            .await;
        app.submit_assignment("Grace", "Physics", None, "b.txt", b"b".to_vec())
            .await;

        let res = app.get(routes::ASSIGNMENT).await;

        assert_eq!(res.status, 200);
        let entries = res.body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        let names: Vec<&str> = entries
            .iter()
            .map(|e| e["student_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[tokio::test]
    async fn zero_submissions_is_an_empty_list_not_404() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;

        let res = app.get(&routes::assignments_by_student("Ada")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_student_listing_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::assignments_by_student("Nobody")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }
}

mod comment {
    use super::*;

    #[tokio::test]
    async fn comment_is_trimmed_and_persisted() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;
        let id = app
            .submit_assignment("Ada", "Math", None, "hw.pdf", b"data".to_vec())
            .await
            .id();

        let res = app
            .patch(
                &routes::assignment_comment(&id),
                &json!({ "comment": "  good work  " }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["comment"].as_str().unwrap(), "good work");
        assert_eq!(res.body["student_name"].as_str().unwrap(), "Ada");

        let fetched = app.get(&routes::assignment(&id)).await;
        assert_eq!(fetched.body["comment"].as_str().unwrap(), "good work");
    }

    #[tokio::test]
    async fn whitespace_only_comment_is_rejected() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;
        let id = app
            .submit_assignment("Ada", "Math", None, "hw.pdf", b"data".to_vec())
            .await
            .id();

        let res = app
            .patch(&routes::assignment_comment(&id), &json!({ "comment": " \t " }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_assignment_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(
                &routes::assignment_comment("00000000-0000-4000-8000-000000000000"),
                &json!({ "comment": "good work" }),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn second_comment_replaces_the_first() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;
        let id = app
            .submit_assignment("Ada", "Math", None, "hw.pdf", b"data".to_vec())
            .await
            .id();

        app.patch(&routes::assignment_comment(&id), &json!({ "comment": "first" }))
            .await;
        let res = app
            .patch(&routes::assignment_comment(&id), &json!({ "comment": "second" }))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["comment"].as_str().unwrap(), "second");
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn streams_stored_bytes_with_headers() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;
        let submitted = app
            .submit_assignment("Ada", "Math", None, "hw.pdf", b"%PDF-1.4 content".to_vec())
            .await;
        let id = submitted.id();
        let stored_filename = submitted.body["filename"].as_str().unwrap().to_string();

        let (status, bytes, headers) = app.get_raw(&routes::assignment_file(&id)).await;

        assert_eq!(status, 200);
        assert_eq!(bytes, b"%PDF-1.4 content");
        assert_eq!(
            headers["content-type"].to_str().unwrap(),
            "application/pdf"
        );
        let disposition = headers["content-disposition"].to_str().unwrap();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains(&stored_filename));
    }

    #[tokio::test]
    async fn unknown_assignment_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::assignment_file(
                "00000000-0000-4000-8000-000000000000",
            ))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn record_without_blob_is_404() {
        let app = TestApp::spawn().await;
        app.register_student("Ada", "ada@x.com").await;
        let submitted = app
            .submit_assignment("Ada", "Math", None, "hw.pdf", b"data".to_vec())
            .await;
        let id = submitted.id();
        let stored_filename = submitted.body["filename"].as_str().unwrap();

        // Blob vanishes out from under the record.
        std::fs::remove_file(app.content_dir.join(stored_filename)).unwrap();

        let res = app.get(&routes::assignment_file(&id)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
        assert!(res.text.contains("missing from storage"));

        // The record itself is still reachable.
        let fetched = app.get(&routes::assignment(&id)).await;
        assert_eq!(fetched.status, 200);
    }
}
