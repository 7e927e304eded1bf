use std::path::PathBuf;

use declflags::{Args, Error, SchemaError};
use expect_test::expect;

use crate::check;

#[derive(Debug, Default, Args)]
pub struct CopyFiles {
    #[argument(floating, required)]
    source: PathBuf,
    #[argument(floating, short_name = "DEST")]
    destination: Option<PathBuf>,
    #[argument(floating, delimiters = ",")]
    extra: Vec<String>,
    #[switch("/y")]
    yes: bool,
}

#[test]
fn floating_in_declaration_order() {
    check::<CopyFiles>(
        "a.txt /y b.txt c,d e",
        expect![[r#"
            CopyFiles {
                source: "a.txt",
                destination: Some(
                    "b.txt",
                ),
                extra: [
                    "c",
                    "d",
                    "e",
                ],
                yes: true,
            }
        "#]],
    );
    check::<CopyFiles>(
        "/Y a.txt",
        expect![[r#"
            CopyFiles {
                source: "a.txt",
                destination: None,
                extra: [],
                yes: true,
            }
        "#]],
    );
    check::<CopyFiles>("", expect![[r#"Missing value for required command-line switch source."#]]);
    check::<CopyFiles>("/y", expect![[r#"Missing value for required command-line switch source."#]]);
}

#[test]
fn floating_names() {
    let schema = CopyFiles::schema().unwrap();
    let names = schema
        .floating_arguments()
        .map(|it| format!("{} {:?} {:?}\n", it.field(), it.short_name(), it.switch()))
        .collect::<String>();
    expect![[r#"
        source Some("source") None
        destination Some("DEST") None
        extra Some("extra") None
    "#]]
    .assert_eq(&names);
}

#[derive(Debug, Default, Args)]
pub struct Exec {
    #[argument("/program", required)]
    program: String,
    #[argument("/args", remainder)]
    args: String,
}

#[test]
fn remainder_swallows_the_line() {
    let exec = Exec::from_vec(
        ["exec", "/program", "cmd", "/args", "one", "/program", "two words", "say \"hi\""]
            .map(String::from)
            .to_vec(),
    )
    .unwrap();
    expect![[r#"
        Exec {
            program: "cmd",
            args: "one /program \"two words\" \"say \"\"hi\"\"\"",
        }
    "#]]
    .assert_debug_eq(&exec);
}

#[derive(Debug, Default, Args)]
pub struct BadSwitch {
    #[switch]
    name: String,
}

#[derive(Debug, Default, Args)]
pub struct BadFloatingList {
    #[argument(floating)]
    items: Vec<String>,
}

#[derive(Debug, Default, Args)]
pub struct BadOrder {
    #[argument(floating)]
    first: Option<String>,
    #[argument(floating, required)]
    second: String,
}

#[derive(Debug, Default, Args)]
pub struct BadRemainder {
    #[argument(remainder)]
    rest: Vec<String>,
}

#[test]
fn invalid_declarations() {
    check::<BadSwitch>(
        "",
        expect![[r#"switch `/name` may only be applied to boolean or integer fields"#]],
    );
    check::<BadFloatingList>(
        "",
        expect![[r#"floating argument `items` of list type must specify delimiter characters"#]],
    );
    check::<BadOrder>(
        "",
        expect![[r#"optional floating argument `first` may not precede required floating argument `second`"#]],
    );
    check::<BadRemainder>(
        "",
        expect![[r#"remainder argument `/rest` may only be applied to string fields"#]],
    );

    let err = BadSwitch::from_vec(Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::SwitchType(_))));
}
