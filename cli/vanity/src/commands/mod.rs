use anyhow::Result;
use bpaf::Bpaf;

use crate::config::Config;

mod search;

const VANITY_DESCRIPTION: &str = "Search and filter a remote makeup product catalog";

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(VANITY_DESCRIPTION))]
pub struct VanityCli(#[bpaf(external(vanity_args))] pub VanityArgs);

/// Main vanity args parser
///
/// This struct is used to parse the command line arguments
/// and allows to be composed with other parsers.
///
/// To parse the vanity CLI, use [`VanityCli`] via [`vanity_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct VanityArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    #[bpaf(external(commands))]
    command: Commands,
}

impl VanityArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        match self.command {
            Commands::Search(args) => args.handle(config).await,
        }
    }
}

#[derive(Debug, Bpaf, Clone)]
enum Commands {
    /// Search the product catalog
    #[bpaf(command)]
    Search(#[bpaf(external(search::search))] search::Search),
}
