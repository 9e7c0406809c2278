use super::{PatternRouter, Router};
use http::Method;

#[test]
fn test_root_path() {
    let (re, params) = PatternRouter::path_to_regex("/").unwrap();
    assert!(re.is_match("/"));
    assert!(params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let (re, params) = PatternRouter::path_to_regex("/items/{id}").unwrap();
    assert!(re.is_match("/items/123"));
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].as_ref(), "id");
}

#[test]
fn test_colon_parameter() {
    let (re, params) = PatternRouter::path_to_regex("/a/:b/c").unwrap();
    assert!(re.is_match("/a/1/c"));
    assert!(!re.is_match("/a/1/d"));
    assert_eq!(params[0].as_ref(), "b");
}

#[test]
fn test_literal_segments_are_escaped() {
    let (re, _) = PatternRouter::path_to_regex("/feed.xml").unwrap();
    assert!(re.is_match("/feed.xml"));
    assert!(!re.is_match("/feedXxml"));
}

#[test]
fn test_first_registered_route_wins() {
    let mut router = PatternRouter::new();
    router.add(Method::GET, "/rabbits/new", "rabbits#create_form").unwrap();
    router.add(Method::GET, "/rabbits/:id", "rabbits#show").unwrap();

    let m = router.match_route(&Method::GET, "/rabbits/new").unwrap();
    assert_eq!(m.route_pointer.as_ref(), "rabbits#create_form");
    let m = router.match_route(&Method::GET, "/rabbits/7").unwrap();
    assert_eq!(m.route_pointer.as_ref(), "rabbits#show");
    assert_eq!(m.get_param("id"), Some("7"));
}

#[test]
fn test_method_must_match() {
    let router = PatternRouter::from_table([(Method::GET, "/rabbits", "rabbits#items")]).unwrap();
    let err = router.match_route(&Method::POST, "/rabbits").unwrap_err();
    assert_eq!(err.method, Method::POST);
    assert_eq!(err.to_string(), "No route found for POST /rabbits");
}

#[test]
fn test_duplicate_names_last_wins() {
    let router =
        PatternRouter::from_table([(Method::GET, "/org/:id/user/:id", "users#show")]).unwrap();
    let m = router.match_route(&Method::GET, "/org/1/user/2").unwrap();
    assert_eq!(m.params.len(), 2);
    assert_eq!(m.get_param("id"), Some("2"));
}
