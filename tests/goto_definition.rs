//! End-to-end tests for the definition index.
//!
//! These drive the public API the way a host editor would: queries through
//! the navigator, save notifications for incremental updates, and a stub
//! host standing in for the editor's UI and scheduler.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use defindex::{
    DisplayRow, EditorHost, IndexRegistry, IndexState, Job, Navigator, RuleConfig, RuleSet,
};

/// Stub editor: runs background and primary jobs inline and records every
/// navigation and prompt.
struct EditorStub {
    roots: Vec<PathBuf>,
    selection: Mutex<Option<usize>>,
    navigations: Mutex<Vec<(PathBuf, usize)>>,
    prompts: Mutex<Vec<Vec<DisplayRow>>>,
    builds: AtomicUsize,
    statuses: Mutex<Vec<String>>,
}

impl EditorStub {
    fn new(roots: Vec<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            roots,
            selection: Mutex::new(None),
            navigations: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            builds: AtomicUsize::new(0),
            statuses: Mutex::new(Vec::new()),
        })
    }

    fn select(&self, index: Option<usize>) {
        *self.selection.lock().unwrap() = index;
    }

    fn navigations(&self) -> Vec<(PathBuf, usize)> {
        self.navigations.lock().unwrap().clone()
    }

    fn prompts(&self) -> Vec<Vec<DisplayRow>> {
        self.prompts.lock().unwrap().clone()
    }
}

impl EditorHost for EditorStub {
    fn project_roots(&self) -> Vec<PathBuf> {
        self.roots.clone()
    }

    fn navigate_to(&self, path: &Path, byte_offset: usize) {
        self.navigations
            .lock()
            .unwrap()
            .push((path.to_path_buf(), byte_offset));
    }

    fn present_choice_list(&self, rows: Vec<DisplayRow>) -> Option<usize> {
        self.prompts.lock().unwrap().push(rows);
        *self.selection.lock().unwrap()
    }

    fn run_in_background(&self, job: Job) {
        self.builds.fetch_add(1, Ordering::SeqCst);
        job();
    }

    fn defer_to_primary_thread(&self, job: Job) {
        job();
    }

    fn show_transient_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }
}

/// A small polyglot project.
fn create_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("app/models")).unwrap();
    fs::write(
        root.join("app/models/user.rb"),
        "module Billing\nclass User\n  def self.create\n  end\n  def destroy\n  end\nend\nend\n",
    )
    .unwrap();
    fs::write(root.join("tasks.py"), "def create(name):\n    pass\n").unwrap();
    fs::write(
        root.join("Shapes.scala"),
        "trait Shape {\n  def area: Double\n}\n",
    )
    .unwrap();
    fs::write(
        root.join("widget.js"),
        "function render() {}\nvar handlers = {\n  refresh: function() {}\n};\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# not indexed\n").unwrap();

    dir
}

fn setup(dir: &TempDir) -> (Arc<EditorStub>, Navigator, IndexRegistry) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let host = EditorStub::new(vec![dir.path().to_path_buf()]);
    let registry = IndexRegistry::default();
    let navigator = Navigator::new(registry.clone(), host.clone() as Arc<dyn EditorHost>);
    (host, navigator, registry)
}

#[test]
fn first_query_builds_index_once() {
    let dir = create_project();
    let (host, navigator, registry) = setup(&dir);

    navigator.request_lookup("window-1", "destroy");
    navigator.request_lookup("window-1", "destroy");
    navigator.request_browse("window-1");

    assert_eq!(host.builds.load(Ordering::SeqCst), 1);
    assert_eq!(
        registry.get_or_create("window-1").state(),
        IndexState::Initialized
    );
    assert!(!host.statuses.lock().unwrap().is_empty());
}

#[test]
fn lookup_navigates_to_defining_line_offset() {
    let dir = create_project();
    let (host, navigator, _) = setup(&dir);

    navigator.request_lookup("window-1", "destroy");

    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    let (path, offset) = &navigations[0];
    assert!(path.ends_with("app/models/user.rb"));
    // Byte offset of the line containing "def destroy".
    let expected = "module Billing\nclass User\n  def self.create\n  end\n".len();
    assert_eq!(*offset, expected);
    assert!(host.prompts().is_empty());
}

#[test]
fn self_qualified_and_plain_names_share_a_lookup_name() {
    let dir = create_project();
    let (host, navigator, _) = setup(&dir);

    // "create" is defined as `def self.create` in Ruby and `def create`
    // in Python; both surface under the stripped name.
    host.select(Some(0));
    navigator.request_lookup("window-1", "create");

    let prompts = host.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].len(), 2);
    assert!(prompts[0].iter().all(|row| row.label == "create"));
    assert_eq!(host.navigations().len(), 1);
}

#[test]
fn browse_lists_every_definition_and_skips_unsupported_files() {
    let dir = create_project();
    let (host, navigator, _) = setup(&dir);

    host.select(None);
    navigator.request_browse("window-1");

    let prompts = host.prompts();
    assert_eq!(prompts.len(), 1);
    let labels: Vec<&str> = prompts[0].iter().map(|row| row.label.as_str()).collect();

    // user.rb: Billing, User, create, destroy; tasks.py: create;
    // Shapes.scala: Shape, area; widget.js: render, refresh.
    assert_eq!(labels.len(), 9);
    for name in ["Billing", "User", "create", "destroy", "Shape", "area", "render", "refresh"] {
        assert!(labels.contains(&name), "missing {name}");
    }
    assert!(!prompts[0].iter().any(|row| row.sublabel.ends_with("README.md")));

    // Cancelled prompt navigates nowhere.
    assert!(host.navigations().is_empty());
}

#[test]
fn unknown_word_is_silent() {
    let dir = create_project();
    let (host, navigator, _) = setup(&dir);

    navigator.request_lookup("window-1", "does_not_exist");

    assert!(host.prompts().is_empty());
    assert!(host.navigations().is_empty());
}

#[test]
fn save_notification_refreshes_one_file() {
    let dir = create_project();
    let (host, navigator, _) = setup(&dir);

    navigator.request_lookup("window-1", "destroy");
    assert_eq!(host.navigations().len(), 1);

    let target = dir.path().join("app/models/user.rb");
    fs::write(&target, "class User\n  def archive\n  end\nend\n").unwrap();
    navigator.notify_file_saved("window-1", &target);

    // Old symbol is gone, new one resolves, other files are untouched.
    navigator.request_lookup("window-1", "destroy");
    assert_eq!(host.navigations().len(), 1);

    navigator.request_lookup("window-1", "archive");
    assert_eq!(host.navigations().len(), 2);
    assert_eq!(host.navigations()[1].1, "class User\n".len());

    navigator.request_lookup("window-1", "area");
    assert_eq!(host.navigations().len(), 3);
}

#[test]
fn save_before_first_query_is_ignored() {
    let dir = create_project();
    let (host, navigator, registry) = setup(&dir);

    let target = dir.path().join("tasks.py");
    navigator.notify_file_saved("window-1", &target);

    assert_eq!(
        registry.get_or_create("window-1").state(),
        IndexState::Uninitialized
    );

    // The eventual build still picks the file up.
    navigator.request_lookup("window-1", "create");
    assert_eq!(host.prompts().len(), 1);
}

#[test]
fn each_session_gets_its_own_index() {
    let dir_a = TempDir::new().unwrap();
    fs::write(dir_a.path().join("a.rb"), "def shared\n").unwrap();

    let (host, navigator, registry) = setup(&dir_a);

    navigator.request_lookup("alpha", "shared");
    navigator.request_lookup("beta", "shared");

    assert_eq!(registry.session_count(), 2);
    assert_eq!(host.builds.load(Ordering::SeqCst), 2);
    assert_eq!(host.navigations().len(), 2);
}

#[test]
fn ruby_module_can_be_disabled_via_rule_config() {
    let dir = create_project();
    let host = EditorStub::new(vec![dir.path().to_path_buf()]);
    let rules = Arc::new(RuleSet::with_config(RuleConfig { ruby_module: false }));
    let navigator = Navigator::new(
        IndexRegistry::new(rules),
        host.clone() as Arc<dyn EditorHost>,
    );

    navigator.request_lookup("window-1", "Billing");

    assert!(host.navigations().is_empty());
    assert!(host.prompts().is_empty());
}
