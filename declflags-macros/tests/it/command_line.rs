use std::{cell::RefCell, rc::Rc};

use declflags::{Args, CommandLine, Error};
use expect_test::expect;

#[derive(Debug, Default, Args)]
pub struct Build {
    #[binary_path]
    binary: Option<String>,
    #[switch("/release")]
    release: bool,
    #[argument("/target")]
    target: Option<String>,
}

#[test]
fn unrecognized_tokens_go_to_the_callback() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut cmd = CommandLine::with_args(["cargo", "--frozen", "/release", "-j", "/target", "x86"]);
    cmd.on_unrecognized({
        let seen = Rc::clone(&seen);
        move |arg| seen.borrow_mut().push(arg.to_string())
    });

    let build = cmd.parse::<Build>().unwrap();
    expect![[r#"
        Build {
            binary: Some(
                "cargo",
            ),
            release: true,
            target: Some(
                "x86",
            ),
        }
    "#]]
    .assert_debug_eq(&build);
    assert_eq!(*seen.borrow(), ["--frozen", "-j"]);
}

#[test]
fn unrecognized_tokens_fail_without_a_callback() {
    let mut cmd = CommandLine::with_args(["cargo", "/release", "--frozen"]);
    let err = cmd.parse::<Build>().unwrap_err();
    assert!(matches!(&err, Error::UnrecognizedToken(token) if token == "--frozen"));
}

#[test]
fn replacing_the_arguments() {
    let mut cmd = CommandLine::with_args(["cargo", "/release"]);
    assert!(cmd.parse::<Build>().unwrap().release);

    cmd.set_args(["cargo", "/target", "wasm32"]);
    assert_eq!(cmd.args(), ["cargo", "/target", "wasm32"]);
    let build = cmd.parse::<Build>().unwrap();
    assert!(!build.release);
    assert_eq!(build.target.as_deref(), Some("wasm32"));

    cmd.clear_args();
    let build = cmd.parse::<Build>().unwrap();
    expect![[r#"
        Build {
            binary: None,
            release: false,
            target: None,
        }
    "#]]
    .assert_debug_eq(&build);
}

#[test]
fn process_arguments_by_default() {
    let cmd = CommandLine::new();
    assert_eq!(cmd.args().len(), std::env::args_os().count());
}
