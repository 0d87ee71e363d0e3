//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use harvester_core::ClassLevel;
use harvester_core::catalog::DEFAULT_ENTRY_URL;

/// Crawl a class/subject/title book catalog and archive every published book.
///
/// Harvester walks the catalog's dependent selection interface for one
/// class, downloads each book's packaged archive, extracts its primary
/// content file, and records a manifest plus a content hash index.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Class to crawl (1-12)
    #[arg(long = "class", value_parser = ClassLevel::parse_cli)]
    pub class: ClassLevel,

    /// Directory extracted book content is stored under
    #[arg(short = 'o', long, default_value = "downloads")]
    pub output_dir: PathBuf,

    /// Catalog entry page URL
    #[arg(long, default_value = DEFAULT_ENTRY_URL)]
    pub entry_url: String,

    /// Directory the manifest records are written to
    #[arg(long, default_value = ".")]
    pub manifest_dir: PathBuf,

    /// Upper bound in seconds for each dependent-option wait (1-120)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=120))]
    pub poll_timeout_secs: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_class() {
        let result = Args::try_parse_from(["harvester"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_parses_class_number() {
        let args = Args::try_parse_from(["harvester", "--class", "7"]).unwrap();
        assert_eq!(args.class, ClassLevel::Seven);
    }

    #[test]
    fn test_cli_rejects_class_out_of_range() {
        for bad in ["0", "13", "VII", ""] {
            let result = Args::try_parse_from(["harvester", "--class", bad]);
            assert!(result.is_err(), "class '{bad}' must be rejected");
        }
    }

    #[test]
    fn test_cli_default_paths_and_entry_url() {
        let args = Args::try_parse_from(["harvester", "--class", "1"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("downloads"));
        assert_eq!(args.manifest_dir, PathBuf::from("."));
        assert_eq!(args.entry_url, DEFAULT_ENTRY_URL);
        assert_eq!(args.poll_timeout_secs, 10);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_output_dir_flags() {
        let args =
            Args::try_parse_from(["harvester", "--class", "7", "-o", "/tmp/books"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("/tmp/books"));

        let args =
            Args::try_parse_from(["harvester", "--class", "7", "--output-dir", "out"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_cli_entry_url_override() {
        let args = Args::try_parse_from([
            "harvester",
            "--class",
            "7",
            "--entry-url",
            "http://localhost:8080/catalog",
        ])
        .unwrap();
        assert_eq!(args.entry_url, "http://localhost:8080/catalog");
    }

    #[test]
    fn test_cli_poll_timeout_bounds() {
        let args =
            Args::try_parse_from(["harvester", "--class", "7", "--poll-timeout-secs", "120"])
                .unwrap();
        assert_eq!(args.poll_timeout_secs, 120);

        let result =
            Args::try_parse_from(["harvester", "--class", "7", "--poll-timeout-secs", "0"]);
        assert!(result.is_err());
        let result =
            Args::try_parse_from(["harvester", "--class", "7", "--poll-timeout-secs", "121"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["harvester", "--class", "7", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["harvester", "--class", "7", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["harvester", "--class", "7", "-q"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["harvester", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["harvester", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["harvester", "--class", "7", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
