use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "vacancy-finder", about = "Search hh.ru vacancies and keep the best ones")]
pub struct Config {
    /// Path of the JSON file vacancies are stored in
    #[arg(long, env = "VACANCY_STORE_PATH", default_value = "data/vacancies.json")]
    pub store_path: PathBuf,

    /// Vacancy search endpoint
    #[arg(long, env = "HH_API_URL", default_value = "https://api.hh.ru/vacancies")]
    pub api_url: String,

    /// User-Agent sent with every API request
    #[arg(long, env = "HH_USER_AGENT", default_value = "job-garden/1.0")]
    pub user_agent: String,

    /// Items requested per page (clamped to 1..=100)
    #[arg(long, env = "HH_PER_PAGE", default_value = "50")]
    pub per_page: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = "HH_TIMEOUT_SECS", default_value = "20")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Prompt for search parameters on stdin (default when no subcommand given)
    Interactive,
    /// Search the API, filter, rank and store the top vacancies
    Search(SearchArgs),
    /// Show stored vacancies matching all given criteria
    Query {
        /// Substring of name, requirement or responsibility
        #[arg(long)]
        keyword: Option<String>,

        /// Substring of the city
        #[arg(long)]
        city: Option<String>,

        /// Exact currency code, e.g. RUR
        #[arg(long)]
        currency: Option<String>,

        /// Minimum lower salary bound
        #[arg(long)]
        min_salary: Option<u64>,
    },
    /// Delete stored vacancies by id or url
    Delete {
        #[arg(long)]
        id: Option<String>,

        /// Matches either url or alternate_url
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search phrase
    pub keyword: String,

    /// How many top vacancies to show
    #[arg(long, default_value = "10")]
    pub top: i64,

    /// Keep only vacancies mentioning any of these words
    #[arg(long, num_args = 1..)]
    pub words: Vec<String>,

    /// Salary range, e.g. "100000-200000", "150000" or " - 200000"
    #[arg(long, default_value = "")]
    pub salary: String,

    /// Upper bound on collected vacancies
    #[arg(long, default_value = "500")]
    pub max_items: usize,

    /// Print results without writing them to the store
    #[arg(long)]
    pub no_save: bool,
}

impl Config {
    /// Resolve the command, defaulting to Interactive if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Interactive)
    }
}
