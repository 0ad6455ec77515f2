use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prjrename")]
#[command(version)]
#[command(about = "Resolve [Parameter] placeholders in Altium project file names")]
#[command(long_about = "Renames files in an Altium project directory by substituting bracketed placeholders \
with the parameter values declared in the project file, then updates the project's DocumentPath \
references to point at the renamed files.")]
pub struct Cli {
    #[arg(help = "Project directory containing exactly one .PrjPcb, .PrjHar or .PrjMbd file")]
    pub target: Option<PathBuf>,

    #[arg(long, help = "Perform a dry run without making changes")]
    pub dry_run: bool,

    #[arg(short, long, help = "Interactive mode - prompt for each change")]
    pub interactive: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_target_directory() {
        let cli = Cli::try_parse_from(["prjrename", "/projects/board", "--dry-run"]).unwrap();

        assert_eq!(cli.target, Some(PathBuf::from("/projects/board")));
        assert!(cli.dry_run);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_no_arguments_is_accepted() {
        let cli = Cli::try_parse_from(["prjrename"]).unwrap();

        assert!(cli.target.is_none());
    }

    #[test]
    fn test_interactive_flag() {
        let cli = Cli::try_parse_from(["prjrename", "-i", "board"]).unwrap();

        assert!(cli.interactive);
        assert_eq!(cli.target, Some(PathBuf::from("board")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["prjrename", "-v", "-q", "board"]).is_err());
    }
}
