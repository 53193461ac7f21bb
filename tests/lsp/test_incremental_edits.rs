//! Tests for incremental document synchronization.

use super::helpers::*;

#[tokio::test]
async fn test_incremental_edit_simple() {
    let server = TestLspServer::new();

    server
        .open_document(
            "file:///site/index.html",
            "<main>\n<img src=\"old.png\">\n</main>",
            "html",
        )
        .await;

    // Replace "old" with "new"
    server
        .edit_document(
            "file:///site/index.html",
            vec![incremental_change(1, 10, 1, 13, "new")],
        )
        .await;

    let content = server.get_document_content("file:///site/index.html").await;
    assert_eq!(
        content,
        Some("<main>\n<img src=\"new.png\">\n</main>".to_string())
    );
}

#[tokio::test]
async fn test_incremental_edit_multiline() {
    let server = TestLspServer::new();

    server
        .open_document(
            "file:///site/index.html",
            "<p>1</p>\n<p>2</p>\n<p>3</p>\n<p>4</p>",
            "html",
        )
        .await;

    // Delete lines 2-3
    server
        .edit_document(
            "file:///site/index.html",
            vec![incremental_change(1, 0, 3, 0, "")],
        )
        .await;

    let content = server.get_document_content("file:///site/index.html").await;
    assert_eq!(content, Some("<p>1</p>\n<p>4</p>".to_string()));
}

#[tokio::test]
async fn test_edit_changes_offered_actions() {
    let server = TestLspServer::new();
    let uri = "file:///site/index.html";

    server
        .open_document(uri, "<img src=\"/img/logo.png\" alt=\"\">\n", "html")
        .await;
    let actions = server.get_code_actions(uri, 0, 0).await.unwrap();
    assert_eq!(action_titles(&actions)[0], "Add alt text \"Logo\"");

    // Type an alt text into the empty attribute
    server
        .edit_document(uri, vec![incremental_change(0, 30, 0, 30, "Acme logo")])
        .await;
    assert_eq!(
        server.get_document_content(uri).await.unwrap(),
        "<img src=\"/img/logo.png\" alt=\"Acme logo\">\n"
    );
    let actions = server.get_code_actions(uri, 0, 0).await.unwrap();
    assert!(actions.is_empty());
}

#[tokio::test]
async fn test_multiple_documents() {
    let server = TestLspServer::new();

    server
        .open_document("file:///a/index.html", "<p>a</p>", "html")
        .await;
    server
        .open_document("file:///a/App.svelte", "<p>b</p>", "svelte")
        .await;

    server
        .edit_document(
            "file:///a/index.html",
            vec![full_document_change("<p>changed a</p>")],
        )
        .await;

    assert_eq!(
        server.get_document_content("file:///a/index.html").await,
        Some("<p>changed a</p>".to_string())
    );
    assert_eq!(
        server.get_document_content("file:///a/App.svelte").await,
        Some("<p>b</p>".to_string())
    );
}
