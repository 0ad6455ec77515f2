use std::path::Path;
use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "prjrename";

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install prjrename binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run prjrename with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to prjrename")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for prjrename-core"))
                .subcommand(Command::new("bin").about("Run tests for prjrename-bin"))
                .subcommand(Command::new("integration").about("Run the binary against a scratch project"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", args)) => handle_install_command(args),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{failure}");
    }
    Ok(())
}

fn handle_install_command(_args: &ArgMatches) -> Result<()> {
    println!("Installing {BIN_NAME}...");
    cargo(&["install", "--path", "crates/prjrename-bin"], "Failed to install prjrename")?;
    println!("✓ {BIN_NAME} installed successfully");
    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    println!("Building and running {BIN_NAME}...");

    let run_args: Vec<String> = args.get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let mut command = process::Command::new("cargo");
    command.args(["run", "--bin", BIN_NAME, "--"]);
    command.args(&run_args);

    if !command.status()?.success() {
        anyhow::bail!("Failed to run {BIN_NAME}");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => cargo(&["test", "--package", "prjrename-core"], "Core tests failed"),
        Some(("bin", _args)) => cargo(&["test", "--package", "prjrename-bin"], "Binary tests failed"),
        Some(("integration", _args)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for prjrename-core");
            println!("  bin          - Run tests for prjrename-bin");
            println!("  integration  - Run the binary against a scratch project");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    println!("🧪 Running all tests for the prjrename project...\n");

    let suites: [(&str, fn() -> Result<()>); 3] = [
        ("workspace", || cargo(&["test", "--workspace"], "Workspace tests failed")),
        ("documentation", || cargo(&["test", "--doc", "--package", "prjrename-core"], "Documentation tests failed")),
        ("integration", test_integration),
    ];

    let mut all_passed = true;
    for (name, suite) in suites {
        println!("Running {name} tests...");
        match suite() {
            Ok(()) => println!("✅ {name} tests passed\n"),
            Err(e) => {
                all_passed = false;
                println!("❌ {name} tests failed: {e:?}\n");
            }
        }
    }

    if !all_passed {
        anyhow::bail!("Test suite failed");
    }
    println!("🎉 All tests passed successfully!");
    Ok(())
}

/// Builds a throwaway project under `target/`, runs the binary on it twice
/// and checks the placeholder file was renamed.
fn test_integration() -> Result<()> {
    cargo(&["build", "--bin", BIN_NAME], "Failed to build prjrename binary")?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--version"], "CLI version command failed")?;

    let scratch = Path::new("target").join("xtask-integration");
    if scratch.exists() {
        std::fs::remove_dir_all(&scratch)?;
    }
    std::fs::create_dir_all(&scratch)?;
    std::fs::write(
        scratch.join("[Abbreviation].PrjPcb"),
        "[Document1]\r\nDocumentPath=[Abbreviation].PcbDoc\r\n[Parameter1]\r\nName=Abbreviation\r\nValue=LPIO\r\n",
    )?;
    std::fs::write(scratch.join("[Abbreviation].PcbDoc"), "")?;

    let scratch_arg = scratch.to_string_lossy().into_owned();
    for _ in 0..2 {
        cargo(&["run", "--bin", BIN_NAME, "--", &scratch_arg], "Rename run failed")?;
    }

    let project = std::fs::read_to_string(scratch.join("LPIO.PrjPcb"))?;
    if !scratch.join("LPIO.PcbDoc").is_file() || !project.contains("DocumentPath=LPIO.PcbDoc") {
        anyhow::bail!("Scratch project was not renamed as expected");
    }

    Ok(())
}
