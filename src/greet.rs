//! Small greeting demo: says hello, or lists the entries of a directory.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use clap::Parser;

pub const DEFAULT_NAME: &str = "Valentine";

/// Greet a user or list the current directory.
#[derive(Parser, Debug)]
#[command(name = "greet")]
pub struct GreetArgs {
    /// The name of the passed in user
    #[arg(long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// `list` to print the entries of the current directory
    pub command: Option<String>,
}

/// Runs the demo against `dir`, writing everything to `out`.
pub fn run(args: &GreetArgs, dir: &Path, out: &mut impl Write) -> Result<()> {
    match args.command.as_deref() {
        None => writeln!(out, "Hello, {}!", args.name)?,
        Some("list") => list_directory(dir, out)?,
        Some(_) => writeln!(out, "Check documentation")?,
    }
    Ok(())
}

/// Writes the name of every entry of `dir`, one per line, sorted.
pub fn list_directory(dir: &Path, out: &mut impl Write) -> Result<()> {
    let mut names = fs::read_dir(dir)
        .with_context(|| format!("unable to read directory {}", dir.display()))?
        .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("unable to list directory {}", dir.display()))?;
    names.sort();

    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use clap::Parser;

    use super::{GreetArgs, run};

    fn output(args: &[&str], dir: &Path) -> String {
        let args = GreetArgs::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(&args, dir, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn greets_default_and_named_users() {
        let dir = Path::new(".");

        assert_eq!(output(&["greet"], dir), "Hello, Valentine!\n");
        assert_eq!(output(&["greet", "--name", "Ada"], dir), "Hello, Ada!\n");
    }

    #[test]
    fn lists_directory_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();

        assert_eq!(output(&["greet", "list"], dir.path()), "a.csv\nb.txt\n");
    }

    #[test]
    fn unknown_command_points_to_documentation() {
        assert_eq!(
            output(&["greet", "dance"], Path::new(".")),
            "Check documentation\n"
        );
    }
}
