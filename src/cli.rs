//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use filesearch_core::search::BING_ENDPOINT;
use filesearch_core::download::MIN_CONCURRENCY;
use filesearch_core::{
    ConcurrencyLimit, DEFAULT_OUTPUT_DIR, MAX_CONCURRENCY, MAX_TIMEOUT_SECS, RunConfig,
    SearchProvider, SearchQuery, TimeoutPolicy,
};

/// Search a site for files of one type and download them.
///
/// Queries the search engine for `site:<SITE> && filetype:<TYPE>`, then
/// downloads every result link concurrently into the output folder.
#[derive(Parser, Debug)]
#[command(name = "filesearch")]
#[command(author, version, about)]
pub struct Args {
    /// Site to search for
    #[arg(short = 's', long, default_value = "")]
    pub site: String,

    /// Filetype to search for. Example: xlsx, docx
    #[arg(short = 'f', long = "filetype", default_value = "")]
    pub file_type: String,

    /// Folder to save the files into (created if missing)
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Maximum concurrent downloads (1-100); unlimited when omitted
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(MIN_CONCURRENCY as i64..=MAX_CONCURRENCY as i64))]
    pub concurrency: Option<u8>,

    /// Per-request timeout in seconds (1-3600); requests may block forever when omitted
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    pub timeout: Option<u64>,

    /// Search results endpoint
    #[arg(long, default_value = BING_ENDPOINT)]
    pub endpoint: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the library run configuration from the parsed flags.
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            query: SearchQuery::new(self.site.clone(), self.file_type.clone()),
            provider: SearchProvider::new(self.endpoint.clone()),
            output_dir: self.output_dir.clone(),
            concurrency: ConcurrencyLimit::from_option(self.concurrency.map(usize::from)),
            timeout: TimeoutPolicy::from_secs(self.timeout),
        }
    }
}
