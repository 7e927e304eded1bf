use std::thread;

use declflags::{Args, Value};
use expect_test::expect;

use crate::check;

#[derive(Debug, Default, Clone, Copy, PartialEq, Value)]
pub enum Cutlery {
    #[default]
    Fork,
    Knife,
    Spoon,
}

#[derive(Debug, Default, Args)]
pub struct Sample {
    #[binary_path]
    binary: String,
    /// Run quietly.
    #[switch("/q")]
    quiet: bool,
    #[switch("/v")]
    verbose: u32,
    #[argument("/n", required)]
    number: i32,
    #[argument("/ratio")]
    ratio: Option<f64>,
    #[argument("/Kind", case_sensitive)]
    kind: Cutlery,
    #[argument("/tag")]
    tags: Vec<String>,
    #[argument("/ids", delimiters = ",")]
    ids: Option<Vec<u32>>,
    not_a_parameter: Option<String>,
}

#[test]
fn smoke() {
    check::<Sample>(
        "/n 92",
        expect![[r#"
            Sample {
                binary: "prog",
                quiet: false,
                verbose: 0,
                number: 92,
                ratio: None,
                kind: Fork,
                tags: [],
                ids: None,
                not_a_parameter: None,
            }
        "#]],
    );
    check::<Sample>(
        "/q /v /V /n 1 /ratio 0.5 /Kind Spoon /tag a /TAG b /ids 1,2,,3",
        expect![[r#"
            Sample {
                binary: "prog",
                quiet: true,
                verbose: 2,
                number: 1,
                ratio: Some(
                    0.5,
                ),
                kind: Spoon,
                tags: [
                    "a",
                    "b",
                ],
                ids: Some(
                    [
                        1,
                        2,
                        3,
                    ],
                ),
                not_a_parameter: None,
            }
        "#]],
    );
}

#[test]
fn last_occurrence_wins() {
    check::<Sample>(
        "/n 1 /N 2 /Kind knife /Kind FORK",
        expect![[r#"
            Sample {
                binary: "prog",
                quiet: false,
                verbose: 0,
                number: 2,
                ratio: None,
                kind: Fork,
                tags: [],
                ids: None,
                not_a_parameter: None,
            }
        "#]],
    );
}

#[test]
fn errors() {
    check::<Sample>("", expect![[r#"Missing value for required command-line switch /n."#]]);
    check::<Sample>("/n", expect![[r#"expected a value for `/n`"#]]);
    check::<Sample>(
        "/n lol",
        expect![[r#"can't parse `/n`, invalid i32 `lol`: invalid digit found in string"#]],
    );
    check::<Sample>("/n 1 /kind Spoon", expect![[r#"Unrecognized argument: /kind"#]]);
    check::<Sample>(
        "/n 1 /Kind spork",
        expect![[r#"can't parse `/Kind`, `spork` is not a valid Cutlery"#]],
    );
    check::<Sample>(
        "/n 1 /ids 1,x",
        expect![[r#"can't parse `/ids`, invalid u32 `x`: invalid digit found in string"#]],
    );
    check::<Sample>("/n 1 extra", expect![[r#"Unrecognized argument: extra"#]]);
}

#[test]
fn schema_describes_the_fields() {
    let schema = Sample::schema().unwrap();
    assert!(schema.has_binary_path());
    let names = schema
        .all_parameters()
        .map(|it| format!("{} {:?} {:?}\n", it.field(), it.switch(), it.description()))
        .collect::<String>();
    expect![[r#"
        quiet Some("/q") Some("Run quietly.")
        verbose Some("/v") None
        number Some("/n") None
        ratio Some("/ratio") None
        kind Some("/Kind") None
        tags Some("/tag") None
        ids Some("/ids") None
    "#]]
    .assert_eq(&names);
    assert_eq!(Cutlery::variants(), ["Fork", "Knife", "Spoon"]);
}

#[test]
fn one_schema_many_threads() {
    let schema = Sample::schema().unwrap();
    thread::scope(|scope| {
        for n in 0..8 {
            let schema = &schema;
            scope.spawn(move || {
                let number = n.to_string();
                let parsed = schema.parse(["prog", "/n", number.as_str(), "/tag", "t"]).unwrap();
                assert_eq!(parsed.number, n);
                assert_eq!(parsed.tags, ["t"]);
                assert!(!parsed.quiet);
            });
        }
    });
}

#[derive(Debug, Default, Args)]
pub struct Aliases {
    #[switch("/v")]
    #[switch("--verbose")]
    verbose: bool,
    #[argument("/o")]
    #[argument("--output")]
    output: Option<String>,
}

#[test]
fn every_alias_sets_the_field() {
    let parsed = Aliases::from_vec(["prog", "--VERBOSE", "/o", "a.txt"].map(String::from).to_vec()).unwrap();
    assert!(parsed.verbose);
    assert_eq!(parsed.output.as_deref(), Some("a.txt"));

    check::<Aliases>(
        "/v --output b.txt /O c.txt",
        expect![[r#"
            Aliases {
                verbose: true,
                output: Some(
                    "c.txt",
                ),
            }
        "#]],
    );
    check::<Aliases>("/verbose", expect![[r#"Unrecognized argument: /verbose"#]]);
}
