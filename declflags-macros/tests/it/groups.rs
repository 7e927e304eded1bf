use declflags::{Args, Group, Value};
use expect_test::expect;

use crate::check;

#[derive(Debug, Default, Value)]
pub enum Shape {
    #[default]
    Dot,
    Circle,
    Square,
}

#[derive(Debug, Default, Group)]
pub struct Point {
    x: i32,
    y: i32,
    shape: Shape,
}

#[derive(Debug, Default, Args)]
pub struct Drawing {
    #[argument("/origin", properties("x", "y"))]
    origin: Option<Point>,
    #[argument("/pt", properties("x", "y"))]
    points: Vec<Point>,
    #[argument("/shape", properties("shape"))]
    shape: Option<Point>,
    #[argument(floating, properties("x", "y", "shape"))]
    anchor: Point,
}

#[test]
fn properties_fill_in_order() {
    check::<Drawing>(
        "/origin 1 2 /pt 3 4 /PT 5 6 7 8 circle",
        expect![[r#"
            Drawing {
                origin: Some(
                    Point {
                        x: 1,
                        y: 2,
                        shape: Dot,
                    },
                ),
                points: [
                    Point {
                        x: 3,
                        y: 4,
                        shape: Dot,
                    },
                    Point {
                        x: 5,
                        y: 6,
                        shape: Dot,
                    },
                ],
                shape: None,
                anchor: Point {
                    x: 7,
                    y: 8,
                    shape: Circle,
                },
            }
        "#]],
    );
    check::<Drawing>(
        "/shape square",
        expect![[r#"
            Drawing {
                origin: None,
                points: [],
                shape: Some(
                    Point {
                        x: 0,
                        y: 0,
                        shape: Square,
                    },
                ),
                anchor: Point {
                    x: 0,
                    y: 0,
                    shape: Dot,
                },
            }
        "#]],
    );
}

#[test]
fn property_errors() {
    check::<Drawing>("/origin 1", expect![[r#"expected a value for `/origin`"#]]);
    check::<Drawing>("7 8", expect![[r#"expected a value for `anchor`"#]]);
    check::<Drawing>(
        "/origin 1 x",
        expect![[r#"can't parse `/origin`, invalid i32 `x`: invalid digit found in string"#]],
    );
    check::<Drawing>(
        "/shape hexagon",
        expect![[r#"can't parse `/shape`, `hexagon` is not a valid Shape"#]],
    );
}

#[test]
fn group_capability() {
    assert!(Point::has_property("shape"));
    assert!(!Point::has_property("z"));
    assert_eq!(<Point as Group>::variants("shape"), ["Dot", "Circle", "Square"]);
    assert!(<Point as Group>::variants("x").is_empty());

    let mut point = Point::default();
    point.assign("y", "-3").unwrap();
    assert_eq!(point.y, -3);
    let err = point.assign("z", "1").unwrap_err();
    assert_eq!(err.to_string(), "Point has no property `z`");
}

#[derive(Debug, Default, Args)]
pub struct UnknownProperty {
    #[argument("/p", properties("x", "z"))]
    point: Option<Point>,
}

#[test]
fn unknown_property() {
    check::<UnknownProperty>("", expect![[r#"argument `/p` names unknown property `z`"#]]);
}
