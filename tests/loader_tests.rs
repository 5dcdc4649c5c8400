//! Integration tests for loading application configs.
//!
//! Each test builds a small repository layout in a temp directory: include
//! files under `includes/` and app configs under their own directories.

use monobuild::codec;
use monobuild::include_store::IncludeStore;
use monobuild::loader::AppLoader;
use monobuild::model::{App, IncludeFile, TaskMode, example_app, example_include};
use monobuild::{Error, Namespace};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        fs::create_dir_all(root.join("includes")).unwrap();
        Self { _temp: temp, root }
    }

    fn include(&self, name: &str, content: &str) {
        fs::write(self.root.join("includes").join(name), content).unwrap();
    }

    fn app(&self, dir: &str, file: &str, content: &str) -> PathBuf {
        let dir = self.root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        fs::write(&path, content).unwrap();
        path
    }

    fn loader(&self, mode: TaskMode) -> AppLoader {
        let store = IncludeStore::load(&[self.root.join("includes")]).unwrap();
        AppLoader::new(Arc::new(store), mode)
    }
}

#[test]
fn test_go_sources_include_is_appended() {
    let fx = Fixture::new();
    fx.include(
        "go.toml",
        "[[Input]]\nid = \"go-sources\"\n\n[Input.Files]\npaths = [\"**/*.go\"]\n",
    );
    let path = fx.app(
        "shop",
        ".app.toml",
        r#"
name = "shop"

[[Task]]
name = "build"
command = "go build"
includes = ["go-sources"]

[Task.Input.Files]
paths = ["Makefile"]
"#,
    );

    let app = fx.loader(TaskMode::Single).load(&path).unwrap();

    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.tasks[0].input.files.paths, vec!["Makefile", "**/*.go"]);
    assert!(app.tasks[0].includes.is_empty());
}

#[test]
fn test_task_group_is_appended_after_own_tasks() {
    let fx = Fixture::new();
    fx.include(
        "ci.yaml",
        r#"
TaskGroup:
  - id: ci
    Task:
      - name: lint
        command: make lint
      - name: test
        command: make test
"#,
    );
    let path = fx.app(
        "shop",
        ".app.yaml",
        r#"
name: shop
includes: [ci]
Task:
  - name: build
    command: make
"#,
    );

    let app = fx.loader(TaskMode::Multiple).load(&path).unwrap();

    let names: Vec<_> = app.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["build", "lint", "test"]);
}

#[test]
fn test_task_group_duplicating_task_name_fails() {
    let fx = Fixture::new();
    fx.include(
        "ci.toml",
        "[[TaskGroup]]\nid = \"ci\"\n\n[[TaskGroup.Task]]\nname = \"build\"\ncommand = \"make ci\"\n",
    );
    let path = fx.app(
        "shop",
        ".app.toml",
        "name = \"shop\"\nincludes = [\"ci\"]\n\n[[Task]]\nname = \"build\"\ncommand = \"make\"\n",
    );

    let err = fx.loader(TaskMode::Multiple).load(&path).unwrap_err();

    let validation = err.as_validation().unwrap();
    assert_eq!(validation.element_path, vec!["Task(name: build)"]);
    assert!(validation.message.contains("multiple tasks with the name 'build'"));
    assert!(err.to_string().contains(".app.toml"));
}

#[test]
fn test_missing_include_names_id_and_task() {
    let fx = Fixture::new();
    let path = fx.app(
        "shop",
        ".app.toml",
        "name = \"shop\"\n\n[[Task]]\nname = \"build\"\ncommand = \"make\"\nincludes = [\"nope\"]\n",
    );

    let err = fx.loader(TaskMode::Multiple).load(&path).unwrap_err();

    match err.root() {
        Error::Reference {
            id,
            namespace,
            referrer,
        } => {
            assert_eq!(id, "nope");
            assert_eq!(*namespace, Namespace::InputOutput);
            assert!(referrer.contains("build"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_task_group() {
    let fx = Fixture::new();
    let path = fx.app(
        "shop",
        ".app.toml",
        "name = \"shop\"\nincludes = [\"ci\"]\n\n[[Task]]\nname = \"build\"\ncommand = \"make\"\n",
    );

    let err = fx.loader(TaskMode::Multiple).load(&path).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::Reference { namespace: Namespace::TaskGroup, id, .. } if id == "ci"
    ));
}

#[test]
fn test_single_mode_rejects_other_task_name() {
    let fx = Fixture::new();
    let path = fx.app(
        "shop",
        ".app.toml",
        "name = \"shop\"\n\n[[Task]]\nname = \"check\"\ncommand = \"make check\"\n",
    );

    assert!(fx.loader(TaskMode::Multiple).load(&path).is_ok());

    let err = fx.loader(TaskMode::Single).load(&path).unwrap_err();
    assert_eq!(err.as_validation().unwrap().element_path, vec!["Task"]);
}

#[test]
fn test_nested_validation_error_path() {
    let fx = Fixture::new();
    let path = fx.app(
        "shop",
        ".app.toml",
        r#"
name = "shop"

[[Task]]
name = "build"
command = "make"

[[Task.Output.File]]
path = "dist/shop.tar"

[Task.Output.File.S3Upload]
bucket = "artifacts"
"#,
    );

    let err = fx.loader(TaskMode::Multiple).load(&path).unwrap_err();

    assert_eq!(
        err.as_validation().unwrap().element_path,
        vec!["Task(name: build)", "Output", "File", "S3Upload", "dest_file"]
    );
}

fn round_trip<T>(value: &T, path: &Path) -> T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    codec::to_file(value, path, false).unwrap();
    codec::from_file(path).unwrap()
}

#[test]
fn test_example_templates_survive_toml_and_yaml() {
    let temp = TempDir::new().unwrap();

    for ext in ["toml", "yaml"] {
        let app: App = round_trip(&example_app("shop"), &temp.path().join(format!("app.{ext}")));
        assert_eq!(app, example_app("shop"));
        assert!(app.validate(TaskMode::Single).is_ok());

        let include: IncludeFile =
            round_trip(&example_include(), &temp.path().join(format!("include.{ext}")));
        assert_eq!(include, example_include());
        assert!(include.validate().is_ok());
    }
}

#[test]
fn test_written_example_include_loads() {
    let fx = Fixture::new();
    codec::to_file(&example_include(), &fx.root.join("includes").join("example.yaml"), false)
        .unwrap();

    let mut app = example_app("shop");
    app.includes = vec!["c_tasks".to_string()];
    let path = fx.root.join("shop").join(".app.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    codec::to_file(&app, &path, false).unwrap();

    let loaded = fx.loader(TaskMode::Multiple).load(&path).unwrap();

    assert_eq!(loaded.tasks.len(), 2);
    let cbuild = &loaded.tasks[1];
    assert_eq!(cbuild.name, "cbuild");
    assert_eq!(cbuild.input.files.paths, vec!["dbmigrations/*.sql"]);
}

#[tokio::test]
async fn test_load_all_reports_every_failure() {
    let fx = Fixture::new();
    let good = fx.app(
        "good",
        ".app.toml",
        "name = \"good\"\n\n[[Task]]\nname = \"build\"\ncommand = \"make\"\n",
    );
    let unnamed = fx.app(
        "unnamed",
        ".app.toml",
        "[[Task]]\nname = \"build\"\ncommand = \"make\"\n",
    );
    let broken = fx.app("broken", ".app.yaml", "name: [");

    let results = fx
        .loader(TaskMode::Multiple)
        .load_all(vec![good.clone(), unnamed.clone(), broken.clone()], 1)
        .await;

    let paths: Vec<_> = results.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(paths, vec![good, unnamed, broken]);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(ref e) if e.as_validation().is_some()));
    assert!(matches!(results[2].1, Err(Error::Parse { .. })));
}
