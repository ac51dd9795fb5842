use percent_encoding::percent_decode_str;

use skill_utils::url::builder::{
    self, encode, NewProject, NewTodo, ParamValue, ProjectUpdate, TodoUpdate, UrlCommand, UrlRequest,
};
use skill_utils::url::SystemDispatcher;

mod test_utils;
use test_utils::strings;

/// Splits a generated URL back into its verb and decoded parameters.
fn decode(url: &str) -> (String, Vec<(String, String)>) {
    let rest = url.strip_prefix("things:///").expect("things scheme");
    let (verb, query) = rest.split_once('?').unwrap_or((rest, ""));
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').expect("key=value");
            (key.to_string(), percent_decode_str(value).decode_utf8().unwrap().into_owned())
        })
        .collect();
    (verb.to_string(), params)
}

fn keys(params: &[(String, String)]) -> Vec<&str> {
    params.iter().map(|(k, _)| k.as_str()).collect()
}

#[test]
fn test_add_todo_minimal() {
    let url = builder::add_todo(NewTodo {
        title: "Buy milk".to_string(),
        when: Some("today".to_string()),
        ..NewTodo::default()
    })
    .to_url();

    assert_eq!(url, "things:///add?title=Buy%20milk&when=today");
}

#[test]
fn test_add_todo_parameter_order_and_values() {
    let url = builder::add_todo(NewTodo {
        title: "Plan trip".to_string(),
        notes: Some("Book & pack".to_string()),
        when: Some("2024-07-01".to_string()),
        deadline: Some("2024-07-10".to_string()),
        tags: strings(&["travel", "family"]),
        checklist_items: strings(&["Flights", "Hotel"]),
        list_id: Some("P-1".to_string()),
        list_title: Some("Holidays".to_string()),
        heading: Some("Before".to_string()),
        heading_id: Some("H-1".to_string()),
    })
    .to_url();

    let (verb, params) = decode(&url);
    assert_eq!(verb, "add");
    assert_eq!(
        keys(&params),
        vec!["title", "notes", "when", "deadline", "checklist-items", "list-id", "list", "heading", "heading-id", "tags"]
    );
    assert_eq!(params[1].1, "Book & pack");
    assert_eq!(params[4].1, "Flights\nHotel");
    assert_eq!(params[9].1, "travel,family");
    assert!(url.contains("checklist-items=Flights%0AHotel"));
    assert!(url.contains("notes=Book%20%26%20pack"));
}

#[test]
fn test_empty_values_are_dropped() {
    let url = builder::add_todo(NewTodo {
        title: "Call mom".to_string(),
        notes: Some(String::new()),
        tags: Vec::new(),
        ..NewTodo::default()
    })
    .to_url();

    assert_eq!(url, "things:///add?title=Call%20mom");
}

#[test]
fn test_add_project() {
    let url = builder::add_project(NewProject {
        title: "Garden".to_string(),
        area_title: Some("Home".to_string()),
        todos: strings(&["Buy seeds", "Dig beds"]),
        tags: strings(&["outdoor"]),
        ..NewProject::default()
    })
    .to_url();

    let (verb, params) = decode(&url);
    assert_eq!(verb, "add-project");
    assert_eq!(keys(&params), vec!["title", "area", "to-dos", "tags"]);
    assert_eq!(params[2].1, "Buy seeds\nDig beds");
}

#[test]
fn test_update_todo_flags_and_token() {
    let request = builder::update_todo(TodoUpdate {
        id: "TD-1".to_string(),
        title: Some("Renamed".to_string()),
        completed: Some(true),
        list_id: Some("P-9".to_string()),
        ..TodoUpdate::default()
    })
    .with_auth_token(Some("tok".to_string()));

    assert_eq!(request.command(), UrlCommand::Update);
    assert_eq!(
        request.to_url(),
        "things:///update?id=TD-1&title=Renamed&completed=true&list-id=P-9&auth-token=tok"
    );
}

#[test]
fn test_update_project_without_token() {
    let url = builder::update_project(ProjectUpdate {
        id: "P-1".to_string(),
        canceled: Some(true),
        tags: strings(&["a", "b"]),
        ..ProjectUpdate::default()
    })
    .with_auth_token(None)
    .to_url();

    assert_eq!(url, "things:///update-project?id=P-1&tags=a%2Cb&canceled=true");
}

#[test]
fn test_auth_token_only_on_update_commands() {
    let token = || Some("tok".to_string());

    let add = builder::add_todo(NewTodo {
        title: "x".to_string(),
        ..NewTodo::default()
    })
    .with_auth_token(token());
    assert!(!add.to_url().contains("auth-token"));

    let show = builder::show("today", None, Vec::new()).with_auth_token(token());
    assert_eq!(show.to_url(), "things:///show?id=today");

    assert!(UrlCommand::Update.requires_auth());
    assert!(UrlCommand::UpdateProject.requires_auth());
    assert!(!UrlCommand::Search.requires_auth());
}

#[test]
fn test_show_and_search() {
    assert_eq!(
        builder::show("P-1", Some("milk".to_string()), strings(&["errand", "urgent"])).to_url(),
        "things:///show?id=P-1&query=milk&filter=errand%2Curgent"
    );
    assert_eq!(builder::search("weekly review").to_url(), "things:///search?query=weekly%20review");
}

#[test]
fn test_request_without_params() {
    assert_eq!(UrlRequest::new(UrlCommand::Search).to_url(), "things:///search");
}

#[test]
fn test_param_serialization() {
    assert_eq!(ParamValue::Flag(false).serialize(), "false");
    assert_eq!(ParamValue::List(strings(&["a", "b"]), ",").serialize(), "a,b");
    assert_eq!(ParamValue::Text("t".to_string()).serialize(), "t");
}

#[test]
fn test_encode_keeps_unreserved() {
    assert_eq!(encode("a-b_c.d~e/f"), "a-b_c.d~e/f");
    assert_eq!(encode("100% done?"), "100%25%20done%3F");
    assert_eq!(encode("café"), "caf%C3%A9");
}

#[test]
fn test_applescript_escapes_quotes() {
    let dispatcher = SystemDispatcher::new("Things3");
    assert_eq!(
        dispatcher.applescript("things:///add?title=a\"b"),
        "tell application \"Things3\" to open location \"things:///add?title=a\\\"b\""
    );
}
