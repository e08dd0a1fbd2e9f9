use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::process::Command;
use toml_edit::{DocumentMut, Item};

type Result<T> = std::result::Result<T, Box<dyn Error>>;

const MANIFEST: &str = "Cargo.toml";

/// Runs `program args..` and returns its trimmed stdout, or `None` when it
/// exits unsuccessfully.
fn capture(program: &str, args: &[&str]) -> Result<Option<String>> {
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8(output.stdout)?.trim().to_string()))
}

/// Runs `program args..` with inherited stdio, failing with `context` if it
/// exits unsuccessfully.
fn run(program: &str, args: &[&str], context: &str) -> Result<()> {
    println!("> {} {}", program, args.join(" "));
    if Command::new(program).args(args).status()?.success() {
        Ok(())
    } else {
        Err(context.into())
    }
}

fn ask(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    Ok(ask(&format!("{prompt} (y/n): "))?.eq_ignore_ascii_case("y"))
}

/// The most recent tag, falling back to the root commit for untagged repos.
fn previous_release() -> Result<Option<String>> {
    if let Some(tag) = capture("git", &["describe", "--tags", "--abbrev=0"])? {
        return Ok(Some(tag));
    }
    capture("git", &["rev-list", "--max-parents=0", "HEAD"])
}

fn release_notes(since: Option<&str>) -> Result<String> {
    let range = since.map(|since| format!("{since}..HEAD"));
    let mut args = vec!["log", "--pretty=format:- %s"];
    if let Some(range) = range.as_deref() {
        args.push(range);
    }
    Ok(capture("git", &args)?.unwrap_or_default())
}

fn bump_manifest(version: &str) -> Result<String> {
    let mut manifest = fs::read_to_string(MANIFEST)?.parse::<DocumentMut>()?;
    let current = manifest["package"]["version"]
        .as_str()
        .ok_or("Cargo.toml has no package version")?
        .to_string();
    manifest["package"]["version"] = Item::from(version);
    fs::write(MANIFEST, manifest.to_string())?;
    Ok(current)
}

fn main() -> Result<()> {
    // Rendering output is asserted verbatim throughout the suite; never tag
    // a build whose tests fail.
    run("cargo", &["test", "--all-targets"], "Tests failed")?;

    let version = ask("New version: ")?;
    if version.is_empty() {
        return Err("Version cannot be empty".into());
    }
    if !confirm(&format!("Release sovran-render {version}?"))? {
        println!("Release aborted.");
        return Ok(());
    }

    let previous = bump_manifest(&version)?;
    println!("Cargo.toml: {previous} -> {version}");
    run("cargo", &["check"], "Failed to refresh Cargo.lock")?;

    let since = previous_release()?;
    let notes = release_notes(since.as_deref())?;
    println!("Changes since {}:", since.as_deref().unwrap_or("the beginning"));
    if notes.is_empty() {
        if !confirm("No commits found. Continue with empty release notes?")? {
            println!("Release aborted.");
            return Ok(());
        }
    } else {
        println!("{notes}");
    }

    let tag = format!("v{version}");
    let message = format!("Bump version to {version}");
    run("git", &["add", MANIFEST, "Cargo.lock"], "Failed to stage manifest")?;
    run("git", &["commit", "-m", &message], "Failed to commit version bump")?;
    run("git", &["tag", "-a", &tag, "-m", &tag], "Failed to create tag")?;
    run("git", &["push"], "Failed to push commits")?;
    run("git", &["push", "--tags"], "Failed to push tags")?;

    if confirm("Publish to crates.io?")? {
        run("cargo", &["publish"], "Failed to publish to crates.io")?;
    }
    if confirm("Create GitHub release?")? {
        run(
            "gh",
            &["release", "create", &tag, "--title", &tag, "--notes", &notes],
            "Failed to create GitHub release",
        )?;
    }

    println!("Released {tag}");
    Ok(())
}
