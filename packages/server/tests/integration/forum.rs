use serde_json::json;

use crate::common::{TestApp, routes};

mod forum_creation {
    use super::*;

    #[tokio::test]
    async fn creator_becomes_the_first_member() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");

        let res = app
            .post_with_token(
                routes::FORUMS,
                &json!({"name": "Dynamic Programming", "description": "DP talk"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert_eq!(res.body["name"], "Dynamic Programming");
        assert_eq!(res.body["members_count"], 1);
        assert_eq!(res.body["topics_count"], 0);
        assert_eq!(res.body["created_by"], 1);

        let members = app
            .get_with_token(&routes::forum_members(res.id()), &token)
            .await;
        assert_eq!(members.status, 200);
        assert_eq!(members.body.as_array().unwrap().len(), 1);
        assert_eq!(members.body[0]["username"], "alice");
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        app.create_forum(&token, "Graphs").await;

        let res = app
            .post_with_token(routes::FORUMS, &json!({"name": "Graphs"}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["error"], "Forum name already taken");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");

        let res = app
            .post_with_token(routes::FORUMS, &json!({"name": "   "}), &token)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn authentication_is_required() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::FORUMS, &json!({"name": "Anonymous"}))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["error"], "Missing authorization header");

        let res = app.get_without_token(routes::FORUMS).await;
        assert_eq!(res.status, 401);
    }
}

mod forum_listing {
    use super::*;

    #[tokio::test]
    async fn listing_paginates_and_searches() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        app.create_forum(&token, "Binary Search").await;
        app.create_forum(&token, "Graph Theory").await;
        app.create_forum(&token, "Searching 101").await;

        let res = app
            .get_with_token(&format!("{}?search=search", routes::FORUMS), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 2);

        let res = app
            .get_with_token(
                &format!("{}?per_page=2&sort_by=name&sort_order=asc", routes::FORUMS),
                &token,
            )
            .await;
        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "Binary Search");
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn unknown_sort_column_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");

        let res = app
            .get_with_token(&format!("{}?sort_by=sneaky", routes::FORUMS), &token)
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn get_forum_returns_404_for_unknown_id() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");

        let res = app.get_with_token(&routes::forum(999), &token).await;
        assert_eq!(res.status, 404);
    }
}

mod membership {
    use super::*;

    #[tokio::test]
    async fn joining_moves_the_counter_with_the_row() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let forum_id = app.create_forum(&alice, "Greedy").await;

        let res = app
            .post_with_token(&routes::forum_join(forum_id), &json!({}), &bob)
            .await;
        assert_eq!(res.status, 201, "join failed: {}", res.text);

        let forum = app.get_with_token(&routes::forum(forum_id), &alice).await;
        assert_eq!(forum.body["members_count"], 2);
    }

    #[tokio::test]
    async fn joining_twice_conflicts_and_leaves_the_counter_alone() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let forum_id = app.create_forum(&alice, "Two Pointers").await;

        app.post_with_token(&routes::forum_join(forum_id), &json!({}), &bob)
            .await;
        let res = app
            .post_with_token(&routes::forum_join(forum_id), &json!({}), &bob)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["error"], "Already a member of this forum");

        let forum = app.get_with_token(&routes::forum(forum_id), &alice).await;
        assert_eq!(forum.body["members_count"], 2);
    }

    #[tokio::test]
    async fn leaving_decrements_the_counter() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let forum_id = app.create_forum(&alice, "Sorting").await;

        app.post_with_token(&routes::forum_join(forum_id), &json!({}), &bob)
            .await;
        let res = app
            .delete_with_token(&routes::forum_join(forum_id), &bob)
            .await;
        assert_eq!(res.status, 204);

        let forum = app.get_with_token(&routes::forum(forum_id), &alice).await;
        assert_eq!(forum.body["members_count"], 1);
    }

    #[tokio::test]
    async fn leaving_without_membership_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let forum_id = app.create_forum(&alice, "Bitmasks").await;

        let res = app
            .delete_with_token(&routes::forum_join(forum_id), &bob)
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn members_are_listed_in_join_order() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let carol = app.token_for(3, "carol");
        let forum_id = app.create_forum(&alice, "Number Theory").await;

        app.post_with_token(&routes::forum_join(forum_id), &json!({}), &bob)
            .await;
        app.post_with_token(&routes::forum_join(forum_id), &json!({}), &carol)
            .await;

        let res = app
            .get_with_token(&routes::forum_members(forum_id), &alice)
            .await;
        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }
}

mod topics {
    use super::*;

    #[tokio::test]
    async fn member_can_post_a_topic() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let forum_id = app.create_forum(&alice, "Strings").await;

        let res = app
            .post_with_token(
                &routes::forum_topics(forum_id),
                &json!({
                    "title": "KMP vs Z-function",
                    "content": "Which do you reach for first?",
                }),
                &alice,
            )
            .await;

        assert_eq!(res.status, 201, "create topic failed: {}", res.text);
        assert_eq!(res.body["title"], "KMP vs Z-function");
        assert_eq!(res.body["author_name"], "alice");

        let forum = app.get_with_token(&routes::forum(forum_id), &alice).await;
        assert_eq!(forum.body["topics_count"], 1);
    }

    #[tokio::test]
    async fn non_member_cannot_post() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let mallory = app.token_for(2, "mallory");
        let forum_id = app.create_forum(&alice, "Geometry").await;

        let res = app
            .post_with_token(
                &routes::forum_topics(forum_id),
                &json!({"title": "Drive-by post", "content": "hi"}),
                &mallory,
            )
            .await;

        assert_eq!(res.status, 403);

        let forum = app.get_with_token(&routes::forum(forum_id), &alice).await;
        assert_eq!(forum.body["topics_count"], 0);
    }

    #[tokio::test]
    async fn topics_are_listed_newest_first() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let forum_id = app.create_forum(&alice, "Trees").await;

        for title in ["first", "second", "third"] {
            let res = app
                .post_with_token(
                    &routes::forum_topics(forum_id),
                    &json!({"title": title, "content": "body"}),
                    &alice,
                )
                .await;
            assert_eq!(res.status, 201);
        }

        let res = app
            .get_with_token(&routes::forum_topics(forum_id), &alice)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 3);
        let titles: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let forum_id = app.create_forum(&alice, "Heaps").await;

        let res = app
            .post_with_token(
                &routes::forum_topics(forum_id),
                &json!({"title": "Empty", "content": "   "}),
                &alice,
            )
            .await;
        assert_eq!(res.status, 400);
    }
}
