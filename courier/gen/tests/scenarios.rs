//! Integration tests: scan a source tree, generate adapters and inspect the
//! written files.

use std::fs;
use std::path::Path;

use courier_gen::Generator;
use courier_gen::diagnostics::Severity;
use tempfile::TempDir;

const USERS: &str = r#"
use courier_macros::http_client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct NewUser {
    pub name: String,
}

#[http_client(name = "user-service")]
pub trait UserClient {
    #[get("users/{id}")]
    fn get_user(&self, #[path] id: u64) -> Result<User, reqwest::Error>;

    #[get("users")]
    fn search(&self, #[query] name: Option<String>, #[query] page: u32) -> Result<Vec<User>, reqwest::Error>;

    #[post("users")]
    fn create(&self, #[body] user: NewUser) -> Result<User, reqwest::Error>;
}
"#;

const EVENTS: &str = r#"
use chrono::NaiveDate;
use courier_macros::http_client;

#[http_client(name = "https://events.example.com", date_pattern = "yyyy-MM-dd")]
pub trait EventClient {
    #[get("events")]
    fn since(&self, #[query] from: NaiveDate) -> Result<String, reqwest::Error>;
}
"#;

const ORDERS: &str = r#"
use courier_macros::http_client;

#[http_client("orders")]
pub trait OrderClient {
    #[post("orders")]
    fn place(&self, #[body] a: Order, #[body] b: Order) -> Result<(), reqwest::Error>;
}
"#;

const SCHEDULE: &str = r#"
use chrono::{NaiveDate, NaiveDateTime};
use courier_macros::http_client;

#[http_client(name = "schedule", date_pattern = "yyyy-MM-dd HH:mm:ss")]
pub trait ScheduleClient {
    #[get("slots")]
    fn slots(&self, #[query] day: NaiveDate, #[query] after: NaiveDateTime) -> Result<String, reqwest::Error>;

    #[get("slots/{id}", verbose = "yes")]
    fn slot(&self, #[path] id: u64) -> Result<String, reqwest::Error>;
}
"#;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (path, content) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, content).expect("write source");
    }
    dir
}

fn generator(root: &Path) -> Generator {
    Generator::new()
        .scan_path(root.join("src"))
        .output_dir(root.join("src/generated"))
}

#[test]
fn user_client_adapter_is_written() {
    let dir = project(&[("src/lib.rs", "pub mod users;"), ("src/users/mod.rs", USERS)]);
    let report = generator(dir.path()).run().expect("run");

    assert!(!report.has_errors(), "{}", report.diagnostics.render_colored());
    assert_eq!((report.contracts, report.adapters, report.methods), (1, 1, 3));

    let code = fs::read_to_string(dir.path().join("src/generated/users_user_client_impl.rs")).expect("adapter file");
    assert!(code.starts_with("// This code was automatically generated by courier-gen."));
    assert!(code.contains("use crate::users::*;"));
    assert!(code.contains("impl crate::users::UserClient for UserClientImpl {"));
    assert!(code.contains("pub const DEFAULT_BASE_URL: &str = \"http://user-service\";"));

    let get_user = code.find("fn get_user(").expect("get_user");
    let search = code.find("fn search(").expect("search");
    let create = code.find("fn create(").expect("create");
    assert!(get_user < search && search < create);

    assert!(code.contains("if let Some(value) = &name {"));
    assert!(code.contains("request = request.json(&user);"));

    let index = fs::read_to_string(dir.path().join("src/generated/mod.rs")).expect("index");
    assert!(index.contains("pub mod users_user_client_impl;"));
}

#[test]
fn contract_date_pattern_formats_query_values() {
    let dir = project(&[("src/events.rs", EVENTS)]);
    let report = generator(dir.path()).run().expect("run");
    assert!(!report.has_errors());

    let code = fs::read_to_string(dir.path().join("src/generated/events_event_client_impl.rs")).expect("adapter file");
    assert!(code.contains("from.format(\"%Y-%m-%d\").to_string()"));
    assert!(code.contains("\"https://events.example.com\""));
}

#[test]
fn contract_date_pattern_only_applies_where_it_fits() {
    let dir = project(&[("src/schedule.rs", SCHEDULE)]);
    let report = generator(dir.path()).run().expect("run");

    let code = fs::read_to_string(dir.path().join("src/generated/schedule_schedule_client_impl.rs")).expect("adapter file");
    assert!(code.contains("day.format(\"%Y-%m-%d\").to_string()"));
    assert!(code.contains("after.format(\"%Y-%m-%d %H:%M:%S\").to_string()"));

    let warning = report
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Warning)
        .expect("warning diagnostic");
    assert_eq!(warning.context.method.as_deref(), Some("slots"));
    assert!(warning.message.contains("`day`"));
}

#[test]
fn malformed_method_keeps_its_siblings() {
    let dir = project(&[("src/schedule.rs", SCHEDULE)]);
    let report = generator(dir.path()).run().expect("run");

    assert_eq!((report.contracts, report.adapters, report.methods), (1, 1, 1));
    assert_eq!(report.diagnostics.count(Severity::Error), 1);
    let error = report
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
        .expect("error diagnostic");
    assert_eq!(error.context.method.as_deref(), Some("slot"));
    assert!(error.message.contains("verbose"));
}

#[test]
fn double_body_yields_no_methods_and_one_error() {
    let dir = project(&[("src/orders.rs", ORDERS)]);
    let report = generator(dir.path()).run().expect("run");

    assert_eq!(report.methods, 0);
    assert_eq!(report.diagnostics.count(Severity::Error), 1);
    let diagnostic = report
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
        .expect("error diagnostic");
    assert_eq!(diagnostic.context.method.as_deref(), Some("place"));
    assert!(diagnostic.message.contains("place"));
    assert!(report.has_errors());
}

#[test]
fn one_bad_contract_does_not_stop_the_others() {
    let dir = project(&[
        ("src/users.rs", USERS),
        ("src/orders.rs", ORDERS),
        ("src/broken.rs", "pub trait {"),
    ]);
    let report = generator(dir.path()).run().expect("run");

    assert_eq!(report.contracts, 2);
    assert_eq!(report.diagnostics.count(Severity::Error), 2);
    assert!(dir.path().join("src/generated/users_user_client_impl.rs").exists());
}

#[test]
fn async_backend_and_custom_suffix() {
    let dir = project(&[(
        "src/lib.rs",
        r#"
        #[courier_macros::http_client("status")]
        pub trait Status {
            #[get("health")]
            async fn health(&self) -> Result<String, reqwest::Error>;
        }
        "#,
    )]);
    let report = generator(dir.path())
        .backend("reqwest-async")
        .adapter_suffix("Http")
        .run()
        .expect("run");
    assert!(!report.has_errors());

    let code = fs::read_to_string(dir.path().join("src/generated/status_http.rs")).expect("adapter file");
    assert!(code.contains("async fn health(&self) -> Result<String, reqwest::Error>"));
    assert!(code.contains("request.send().await?"));
}

#[test]
fn dry_run_leaves_the_tree_untouched() {
    let dir = project(&[("src/users.rs", USERS)]);
    let report = generator(dir.path()).dry_run(true).run().expect("run");
    assert_eq!(report.written.len(), 2);
    assert!(!dir.path().join("src/generated").exists());
}

#[test]
fn generated_files_are_not_rescanned() {
    let dir = project(&[("src/users.rs", USERS)]);
    generator(dir.path()).run().expect("first run");
    let report = generator(dir.path()).run().expect("second run");
    assert_eq!(report.contracts, 1);
    assert!(!report.has_errors());
}
