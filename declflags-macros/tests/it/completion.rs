use std::{fs, path::PathBuf};

use declflags::{Args, CommandLine, Group, Value};
use expect_test::expect;

#[derive(Debug, Default, Value)]
pub enum Cutlery {
    #[default]
    Fork,
    Knife,
    Spoon,
}

#[derive(Debug, Default, Group)]
pub struct Setting {
    name: String,
    kind: Cutlery,
    other: String,
}

#[derive(Debug, Default, Args)]
pub struct Tool {
    #[switch("/FIRST")]
    first: bool,
    #[argument("/SECOND")]
    second: Option<String>,
    #[switch("/THIRD")]
    third: u32,
    #[argument("/FOURTH")]
    fourth: Vec<String>,
    #[argument("/FIFTH")]
    fifth: Option<String>,
    #[argument("/CUTLERY")]
    cutlery: Cutlery,
    #[argument("/STRUCT", properties("name", "kind", "other"))]
    setting: Option<Setting>,
    #[argument("/FILE", complete_files)]
    file: Option<PathBuf>,
    #[argument("/DIR", complete_directories)]
    dir: Option<PathBuf>,
    #[completer("/complete")]
    complete: Option<String>,
    #[register_completer("/register", command_name = "tool", complete_with("bash", "pwsh"))]
    register: Option<String>,
}

const NONE: [&str; 0] = [];

#[test]
fn switch_names() {
    let schema = Tool::schema().unwrap();
    assert_eq!(schema.complete("/F", &NONE), ["/FIRST", "/FOURTH", "/FIFTH", "/FILE"]);
    assert_eq!(schema.complete("/f", &["/FIFTH", "x"]), ["/FIRST", "/FOURTH", "/FILE"]);
    assert_eq!(schema.complete("/c", &NONE), ["/CUTLERY", "/complete"]);
    assert_eq!(schema.complete("/T", &["/THIRD", "/third"]), ["/THIRD"]);
    assert_eq!(schema.complete("/F", &["/FOURTH", "a"]), ["/FIRST", "/FOURTH", "/FIFTH", "/FILE"]);
}

#[test]
fn values() {
    let schema = Tool::schema().unwrap();
    assert_eq!(schema.complete("K", &["/CUTLERY"]), ["Knife"]);
    assert_eq!(schema.complete("", &["/FIRST", "/CUTLERY"]), ["Fork", "Knife", "Spoon"]);
    assert_eq!(schema.complete("", &["/register"]), ["bash", "pwsh"]);
    assert!(schema.complete("", &["/SECOND"]).is_empty());
}

#[test]
fn properties() {
    let schema = Tool::schema().unwrap();
    assert!(schema.complete("", &["/STRUCT"]).is_empty());
    assert_eq!(schema.complete("s", &["/STRUCT", "n"]), ["Spoon"]);
    assert!(schema.complete("", &["/STRUCT", "n", "spoon"]).is_empty());
    assert_eq!(schema.complete("/S", &["/STRUCT", "n", "spoon", "o"]), ["/SECOND"]);
}

#[test]
fn filesystem() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.md"), "").unwrap();
    fs::write(dir.path().join("main.rs"), "").unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src").join("lib.rs"), "").unwrap();
    let schema = Tool::schema().unwrap();

    let complete = |prefix: &str, preceding: &[&str]| -> String {
        schema
            .complete_in(dir.path(), prefix, preceding)
            .into_iter()
            .map(|it| it + "\n")
            .collect()
    };

    expect![[r#"
        main.rs
        notes.md
    "#]]
    .assert_eq(&complete("", &["/FILE"]));
    expect![[r#"
        src/lib.rs
    "#]]
    .assert_eq(&complete("src/", &["/FILE"]));
    expect![[r#"
        .
        ..
        src
    "#]]
    .assert_eq(&complete("", &["/DIR"]));
    expect![[""]].assert_eq(&complete("nowhere/", &["/DIR"]));
}

#[test]
fn shell_hooks() {
    let schema = Tool::schema().unwrap();
    let completer = schema.completer().unwrap();
    assert_eq!(completer.switch(), Some("/complete"));
    let register = schema.register_completer().unwrap();
    assert_eq!(register.switch(), Some("/register"));
    assert_eq!(register.command_name(), Some("tool"));

    let tool = Tool::from_vec(["tool", "/complete", "/F"].map(String::from).to_vec()).unwrap();
    assert_eq!(tool.complete.as_deref(), Some("/F"));

    let candidates = CommandLine::with_args(["tool"]).complete::<Tool, _>("/S", &["/SECOND", "x"]);
    assert_eq!(candidates.unwrap(), ["/STRUCT"]);
}
