//! End-to-end page rendering over a real listener.

use satto::VersionToken;

mod common;

use common::Project;

#[tokio::test]
async fn test_render_with_fetched_data() {
    let backend = common::start_programmable_backend(|path| async move {
        if path == "/users/42" {
            (
                200,
                r#"{"name":"Ada <Lovelace>","admin":true,"url":"/u/42","posts":[{"title":"One"},{"title":"Two"}]}"#
                    .to_string(),
            )
        } else {
            (404, "{}".to_string())
        }
    })
    .await;

    let markup = format!(
        concat!(
            "<h1>Profile</h1>\n",
            "<ssr url=\"http://{}/users/{{{{ params.id }}}}\" response=\"user\">",
            "<p>{{{{ user.name }}}}</p>",
            "<ul><for condition=\"let post in user.posts\"><li>{{{{ post.title }}}}</li></for></ul>",
            "<if condition=\"user.admin\"><b>admin</b></if>",
            "<if condition=\"!user.admin\"><i>guest</i></if>",
            "<a [href]=\"user.url\">{{{{ user.posts.length }}}} posts</a>",
            "</ssr>",
        ),
        backend
    );

    let project = Project::new();
    project
        .page_file("user", "html", &markup)
        .page_file("user", "css", "p { color: red }");

    let (addr, shutdown) = common::start_server(
        project.config(&[("/users/:id", "user")]),
        VersionToken::from_millis(1700000000000),
    )
    .await;

    let res = reqwest::get(format!("http://{addr}/users/42")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert!(res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html")));

    let body = res.text().await.unwrap();
    assert!(body.contains("<h1>Profile</h1>\n<p>Ada &lt;Lovelace&gt;</p>"));
    assert!(body.contains("<ul><li>One</li><li>Two</li></ul>"));
    assert!(body.contains("<b>admin</b>"));
    assert!(!body.contains("guest"));
    assert!(body.contains("<a href=\"/u/42\">2 posts</a>"));
    assert!(body.contains("href=\"/styles.css?v=1700000000000\""));
    assert!(body.contains("<link rel=\"stylesheet\" href=\"./user.css?v=1700000000000\">\n</head>"));
    assert!(!body.contains("<script"));
    assert!(!body.contains("<ssr"));
    assert!(!body.contains("<routes>"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_static_page_is_byte_for_byte() {
    let markup = "<p>{{ left alone }}</p>\n<for condition=\"let x in y\">{{x}}</for>";
    let project = Project::new();
    project
        .page_file("home", "html", markup)
        .page_file("home", "js", "console.log('hi')");

    let (addr, shutdown) =
        common::start_server(project.config(&[("/", "home")]), VersionToken::from_millis(5)).await;

    let body = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let expected_fragment = format!("{markup}\n<script src=\"./home.js?v=5\"></script>");
    assert!(body.contains(&expected_fragment));
    assert!(!body.contains("home.css"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_version_token_stable_across_requests() {
    let project = Project::new();
    project
        .page_file("home", "html", "<p>home</p>")
        .page_file("home", "css", "p {}")
        .page_file("about", "html", "<p>about</p>")
        .page_file("about", "js", "1");

    let (addr, shutdown) = common::start_server(
        project.config(&[("/", "home"), ("/about", "about")]),
        VersionToken::capture(),
    )
    .await;

    let client = reqwest::Client::new();
    let mut tokens = Vec::new();
    for path in ["/", "/about", "/", "/about"] {
        let body = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        let start = body.find("?v=").unwrap() + 3;
        let end = start + body[start..].find('"').unwrap();
        tokens.push(body[start..end].to_string());
    }

    assert!(tokens.iter().all(|t| t == &tokens[0]));
    assert!(tokens[0].parse::<u128>().is_ok());

    shutdown.trigger();
}

#[tokio::test]
async fn test_assets_served_from_project() {
    let project = Project::new();
    project
        .page_file("home", "html", "<p>home</p>")
        .page_file("home", "css", "p { margin: 0 }")
        .static_file("styles.css", "body { margin: 0 }");

    let (addr, shutdown) =
        common::start_server(project.config(&[("/", "home")]), VersionToken::from_millis(9)).await;

    let client = reqwest::Client::new();

    let page_css = client
        .get(format!("http://{addr}/home.css?v=9"))
        .send()
        .await
        .unwrap();
    assert_eq!(page_css.status(), 200);
    assert_eq!(page_css.text().await.unwrap(), "p { margin: 0 }");

    let base_css = client
        .get(format!("http://{addr}/styles.css?v=9"))
        .send()
        .await
        .unwrap();
    assert_eq!(base_css.status(), 200);
    assert_eq!(base_css.text().await.unwrap(), "body { margin: 0 }");

    let missing = client
        .get(format!("http://{addr}/missing.png"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let project = Project::new();
    project.page_file("home", "html", "<p>home</p>");

    let (addr, shutdown) =
        common::start_server(project.config(&[("/", "home")]), VersionToken::from_millis(1)).await;

    let res = reqwest::Client::new()
        .get(format!("http://{addr}/"))
        .header("x-request-id", "test-123")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("test-123")
    );

    shutdown.trigger();
}
