use std::{
    thread,
    time::{Duration, Instant},
};

use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update --component rustfmt").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    {
        let _s = section("FORMAT");
        cmd!(sh, "cargo fmt --all -- --check").run()?;
    }

    {
        let _s = section("BUILD");
        cmd!(sh, "cargo test --workspace --no-run").run()?;
    }

    {
        let _s = section("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
    }

    {
        let _s = section("PUBLISH");

        let version = package_version(&sh, "declflags")?;
        let tag = format!("v{version}");

        let current_branch = cmd!(sh, "git branch --show-current").read()?;
        let tag_exists =
            cmd!(sh, "git tag --list").read()?.split_ascii_whitespace().any(|it| it == tag);

        if current_branch == "master" && !tag_exists {
            cmd!(sh, "git tag {tag}").run()?;
            // The runtime pins the exact macros version, which must be indexed first.
            cmd!(sh, "cargo publish -p declflags-macros").run()?;
            wait_until_indexed(&sh, "declflags-macros", &version)?;
            cmd!(sh, "cargo publish -p declflags").run()?;
            cmd!(sh, "git push --tags").run()?;
        }
    }

    Ok(())
}

/// Reads the version from `cargo pkgid`, which ends in `#0.1.0` or `#name@0.1.0`.
fn package_version(sh: &Shell, package: &str) -> xshell::Result<String> {
    let pkgid = cmd!(sh, "cargo pkgid -p {package}").read()?;
    let version = pkgid.rsplit(|c: char| c == '#' || c == '@').next().unwrap_or(&pkgid);
    Ok(version.trim().to_string())
}

fn wait_until_indexed(sh: &Shell, package: &str, version: &str) -> xshell::Result<()> {
    let needle = format!("{package} = \"{version}\"");
    for _ in 0..100 {
        let found = cmd!(sh, "cargo search {package} --limit 1").read()?;
        if found.contains(&needle) {
            return Ok(());
        }
        thread::sleep(Duration::from_secs(3));
    }
    eprintln!("{package} {version} is still not on the index, publishing anyway");
    Ok(())
}

fn section(name: &'static str) -> impl Drop {
    println!("::group::{name}");
    let start = Instant::now();
    defer(move || {
        let elapsed = start.elapsed();
        eprintln!("{name}: {elapsed:.2?}");
        println!("::endgroup::");
    })
}

fn defer<F: FnOnce()>(f: F) -> impl Drop {
    struct D<F: FnOnce()>(Option<F>);
    impl<F: FnOnce()> Drop for D<F> {
        fn drop(&mut self) {
            if let Some(f) = self.0.take() {
                f()
            }
        }
    }
    D(Some(f))
}
