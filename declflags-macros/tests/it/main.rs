mod command_line;
mod completion;
mod floating;
mod groups;
mod smoke;

use std::fmt;

use declflags::Args;
use expect_test::Expect;

/// Parses `args` (program path excluded) into `A`, comparing the value or the error.
fn check<A: Args + fmt::Debug>(args: &str, expect: Expect) {
    let args = std::iter::once("prog")
        .chain(args.split_ascii_whitespace())
        .map(String::from)
        .collect::<Vec<_>>();
    match A::from_vec(args) {
        Ok(args) => {
            expect.assert_debug_eq(&args);
        }
        Err(err) => {
            expect.assert_eq(&err.to_string());
        }
    }
}
