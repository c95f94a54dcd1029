//! Failure injection: every pipeline failure yields a bare status code and
//! leaves the server able to serve the next request.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use satto::VersionToken;

mod common;

use common::Project;

#[tokio::test]
async fn test_missing_page_then_recovery() {
    let project = Project::new();
    project.page_file("home", "html", "<p>home</p>");

    let (addr, shutdown) = common::start_server(
        project.config(&[("/", "home"), ("/ghost", "ghost")]),
        VersionToken::from_millis(1),
    )
    .await;
    let client = reqwest::Client::new();

    let res = client.get(format!("http://{addr}/ghost")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert!(res.text().await.unwrap().is_empty());

    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_backend_failure_is_500_then_recovers() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let backend = common::start_programmable_backend(move |_path| {
        let cc = cc.clone();
        async move {
            if cc.fetch_add(1, Ordering::SeqCst) == 0 {
                (503, "Service Unavailable".into())
            } else {
                (200, r#"{"msg":"ok"}"#.into())
            }
        }
    })
    .await;

    let project = Project::new();
    project.page_file(
        "home",
        "html",
        &format!("<ssr url=\"http://{backend}/data\" response=\"d\">{{{{ d.msg }}}}</ssr>"),
    );

    let (addr, shutdown) =
        common::start_server(project.config(&[("/", "home")]), VersionToken::from_millis(1)).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert!(res.text().await.unwrap().is_empty());

    // No retry: the failed request hit the backend exactly once.
    assert_eq!(call_count.load(Ordering::SeqCst), 1);

    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("<body>\nok\n</body>"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_backend_is_500() {
    let backend = common::start_programmable_backend(|_path| async move {
        (200, "<html>not json</html>".to_string())
    })
    .await;

    let project = Project::new();
    project.page_file(
        "home",
        "html",
        &format!("<ssr url=\"http://{backend}/\" response=\"d\">{{{{ d }}}}</ssr>"),
    );

    let (addr, shutdown) =
        common::start_server(project.config(&[("/", "home")]), VersionToken::from_millis(1)).await;

    let res = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(res.status(), 500);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_backend_is_500() {
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let project = Project::new();
    project.page_file(
        "home",
        "html",
        &format!("<ssr url=\"http://{dead_addr}/\" response=\"d\">{{{{ d }}}}</ssr>"),
    );

    let (addr, shutdown) =
        common::start_server(project.config(&[("/", "home")]), VersionToken::from_millis(1)).await;

    let res = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(res.status(), 500);
    assert!(res.text().await.unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_render_and_parse_errors_are_500() {
    let project = Project::new();
    project
        .page_file("undefined", "html", "<ssr url=\"\" response=\"d\">{{ nope }}</ssr>")
        .page_file("nullaccess", "html", "<ssr url=\"\" response=\"d\">{{ d.a.b }}</ssr>")
        .page_file(
            "unclosed",
            "html",
            "<ssr url=\"\" response=\"d\"><if condition=\"true\">x</ssr>",
        )
        .page_file("ok", "html", "<ssr url=\"\" response=\"d\">fine</ssr>");

    let (addr, shutdown) = common::start_server(
        project.config(&[
            ("/undefined", "undefined"),
            ("/nullaccess", "nullaccess"),
            ("/unclosed", "unclosed"),
            ("/ok", "ok"),
        ]),
        VersionToken::from_millis(1),
    )
    .await;
    let client = reqwest::Client::new();

    for path in ["/undefined", "/nullaccess", "/unclosed"] {
        let res = client.get(format!("http://{addr}{path}")).send().await.unwrap();
        assert_eq!(res.status(), 500, "{path}");
        assert!(res.text().await.unwrap().is_empty());
    }

    let res = client.get(format!("http://{addr}/ok")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}
