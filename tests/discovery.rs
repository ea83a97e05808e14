mod common;

use common::html_page;
use github_star_lists::discovery::{
    clean_list_name, extract_list_links, extract_repo_full_names, find_next_page_url,
    is_sign_in_page, normalize_list_url, slugify, stars_page_url,
};
use github_star_lists::html::parse_anchors;
use url::Url;

fn base() -> Url {
    Url::parse("https://github.com/alice?tab=stars").unwrap()
}

#[test]
fn test_parse_anchors_collapses_text_and_keeps_attrs() {
    let html = r#"<div><a href="/next" rel="next" class="btn">
        Next
        <span>page</span></a><a>no href</a><a href="">empty</a></div>"#;

    let anchors = parse_anchors(html);

    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].href, "/next");
    assert_eq!(anchors[0].text, "Next page");
    assert_eq!(anchors[0].attr("rel"), Some("next"));
    assert_eq!(anchors[0].attr("class"), Some("btn"));
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Cool Stuff"), "cool-stuff");
    assert_eq!(slugify("  Rust & WebAssembly!! "), "rust-webassembly");
    assert_eq!(slugify("already--dashed"), "already-dashed");
    assert_eq!(slugify("!!!"), "");
}

#[test]
fn test_clean_list_name() {
    assert_eq!(clean_list_name("Cool Stuff  12 repositories", "cool stuff"), "Cool Stuff");
    assert_eq!(clean_list_name("Tools 1 repository", "tools"), "Tools");
    assert_eq!(clean_list_name("Databases (7)", "databases"), "Databases");
    assert_eq!(clean_list_name("", "my-list"), "my list");
    assert_eq!(clean_list_name("42", "fallback-name"), "fallback name");
}

#[test]
fn test_normalize_query_style_list_url() {
    let (url, token) = normalize_list_url("alice", "/alice?tab=stars&list=cool-stuff", &base())
        .expect("query-style list link");

    assert_eq!(url, "https://github.com/alice?tab=stars&list=cool-stuff");
    assert_eq!(token, "cool-stuff");
}

#[test]
fn test_normalize_path_style_list_url() {
    let (url, token) = normalize_list_url("alice", "/stars/alice/lists/cool-stuff/", &base())
        .expect("path-style list link");

    assert_eq!(url, "https://github.com/stars/alice/lists/cool-stuff");
    assert_eq!(token, "cool-stuff");
}

#[test]
fn test_normalize_rejects_other_links() {
    let base = base();
    assert!(normalize_list_url("alice", "/alice?tab=repositories", &base).is_none());
    assert!(normalize_list_url("alice", "/alice?tab=stars", &base).is_none());
    assert!(normalize_list_url("alice", "/bob?tab=stars&list=x", &base).is_none());
    assert!(normalize_list_url("alice", "/stars/bob/lists/x", &base).is_none());
    assert!(normalize_list_url("alice", "https://example.com/stars/alice/lists/x", &base).is_none());
}

#[test]
fn test_extract_list_links_dedupes_and_sorts() {
    let html = html_page(&[
        ("/stars/alice/lists/zeta", "Zeta 3 repositories"),
        ("/alice?tab=stars&list=cool-stuff", "Cool Stuff  12 repositories"),
        ("/stars/alice/lists/zeta", "Zeta 3 repositories"),
        ("/stars/alice/lists/alpha_tools", ""),
        ("/octocat/Hello-World", "Hello-World"),
    ]);
    let anchors = parse_anchors(&html);

    let links = extract_list_links("alice", &base(), &anchors);

    let names: Vec<&str> = links.iter().map(|link| link.name.as_str()).collect();
    assert_eq!(names, vec!["alpha tools", "Cool Stuff", "Zeta"]);

    let slugs: Vec<&str> = links.iter().map(|link| link.slug.as_str()).collect();
    assert_eq!(slugs, vec!["alpha-tools", "cool-stuff", "zeta"]);
    assert_eq!(links[1].url, "https://github.com/alice?tab=stars&list=cool-stuff");
}

#[test]
fn test_both_url_shapes_yield_same_slug() {
    let html = html_page(&[
        ("/alice?tab=stars&list=cool-stuff", "Cool Stuff"),
        ("/stars/alice/lists/cool-stuff", "Cool Stuff"),
    ]);

    let links = extract_list_links("alice", &base(), &parse_anchors(&html));

    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|link| link.slug == "cool-stuff"));
}

#[test]
fn test_extract_repo_full_names() {
    let html = html_page(&[
        ("/octocat/Hello-World", "Hello-World"),
        ("/settings/profile", "Settings"),
        ("/octocat/Hello-World?tab=readme", "readme"),
        ("/octocat/Spoon-Knife#readme", "fragment"),
        ("/rust-lang/rust/issues", "issues"),
        ("https://gitlab.com/foo/bar", "elsewhere"),
        ("https://github.com/tokio-rs/tokio", "tokio"),
        ("/Marketplace/thing", "market"),
    ]);
    let list_url = Url::parse("https://github.com/stars/alice/lists/cool-stuff").unwrap();

    let repos = extract_repo_full_names(&parse_anchors(&html), &list_url);

    assert_eq!(repos.len(), 2);
    assert!(repos.contains("octocat/Hello-World"));
    assert!(repos.contains("tokio-rs/tokio"));
}

#[test]
fn test_find_next_page_by_rel_or_text() {
    let current = Url::parse("https://github.com/stars/alice/lists/cool-stuff").unwrap();

    let by_rel = parse_anchors(
        r#"<a href="/octocat/Hello-World">repo</a><a rel="nofollow next" href="?page=2#top">→</a>"#,
    );
    let next = find_next_page_url(&by_rel, &current).expect("next link");
    assert_eq!(next.as_str(), "https://github.com/stars/alice/lists/cool-stuff?page=2");

    let by_text = parse_anchors(r#"<a href="/stars/alice/lists/cool-stuff?page=3"> Next </a>"#);
    let next = find_next_page_url(&by_text, &current).expect("next link");
    assert_eq!(next.as_str(), "https://github.com/stars/alice/lists/cool-stuff?page=3");

    let none = parse_anchors(r#"<a href="?page=0">Previous</a><a href="https://example.com/?page=2" rel="next">Next</a>"#);
    assert!(find_next_page_url(&none, &current).is_none());
}

#[test]
fn test_is_sign_in_page() {
    assert!(is_sign_in_page(
        r#"<title>Sign in to GitHub · GitHub</title><form action="/login">"#
    ));
    assert!(!is_sign_in_page("<title>alice's stars</title>"));
    assert!(!is_sign_in_page(r#"<a href="/login">Sign in</a>"#));
}

#[test]
fn test_stars_page_url() {
    let url = stars_page_url("alice").unwrap();
    assert_eq!(url.as_str(), "https://github.com/alice?tab=stars");
}
