use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for afterglow")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Launch the desktop app
    Run {
        /// Build in release mode
        #[arg(long)]
        release: bool,
        /// Extra arguments passed to afterglow-desktop
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Run a headless simulation through afterglow-cli
    Simulate {
        #[arg(short, long, default_value = "600")]
        frames: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [fmt_args(), clippy_args(), test_args(), doc_args()] {
                cargo(&step)?;
            }
        }
        Commands::Fmt => cargo(&fmt_args())?,
        Commands::Clippy => cargo(&clippy_args())?,
        Commands::Test => cargo(&test_args())?,
        Commands::Doc => cargo(&doc_args())?,
        Commands::Run { release, args } => cargo(&run_args("afterglow-desktop", release, &args))?,
        Commands::Simulate { frames } => {
            let extra = vec!["simulate".to_string(), format!("--frames={frames}")];
            cargo(&run_args("afterglow-cli", false, &extra))?
        }
    }

    Ok(())
}

fn fmt_args() -> Vec<String> {
    to_args(&["fmt", "--all", "--", "--check"])
}

fn clippy_args() -> Vec<String> {
    to_args(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
}

fn test_args() -> Vec<String> {
    to_args(&["test", "--workspace"])
}

fn doc_args() -> Vec<String> {
    to_args(&["doc", "--workspace", "--no-deps"])
}

fn run_args(package: &str, release: bool, extra: &[String]) -> Vec<String> {
    let mut args = to_args(&["run", "-p", package]);
    if release {
        args.push("--release".into());
    }
    if !extra.is_empty() {
        args.push("--".into());
        args.extend(extra.iter().cloned());
    }
    args
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn cargo(args: &[String]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args.first().map_or("", String::as_str));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_args_pass_through() {
        let args = run_args("afterglow-desktop", true, &["--seed".into(), "7".into()]);
        assert_eq!(
            args,
            ["run", "-p", "afterglow-desktop", "--release", "--", "--seed", "7"]
        );
    }

    #[test]
    fn run_args_without_extra() {
        assert_eq!(run_args("afterglow-cli", false, &[]), ["run", "-p", "afterglow-cli"]);
    }

    #[test]
    fn clippy_denies_warnings() {
        assert!(clippy_args().ends_with(&["-D".to_string(), "warnings".to_string()]));
    }
}
