use std::path::PathBuf;

use crate::cli::{output, views, CliError};
use crate::config::{Config, ConfigManager};
use crate::core::tracker::ExpenseTracker;
use crate::currency::CurrencyCode;
use crate::domain::{
    category::Category,
    filter::{CategoryFilter, FilterSpec, TimeWindow},
};
use crate::utils::build_info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Name, usage and summary for every shell command.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("add", "add <YYYY-MM-DD> <amount> <category>", "Record an expense"),
    ("list", "list", "Show all expenses, oldest first"),
    (
        "dashboard",
        "dashboard [30d|3m|6m|1y|all] [category|All]",
        "Summarize spending for a window and category",
    ),
    ("categories", "categories", "List the standard categories"),
    ("version", "version", "Show build information"),
    ("help", "help", "Show this help"),
    ("exit", "exit", "Leave the shell"),
];

pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    tracker: ExpenseTracker,
    currency: CurrencyCode,
    default_window: TimeWindow,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = manager.load();
        let tracker = ExpenseTracker::from_config(&config, manager.base_dir());
        Ok(Self::with_tracker(mode, tracker, &config))
    }

    pub fn with_tracker(mode: CliMode, tracker: ExpenseTracker, config: &Config) -> Self {
        Self {
            mode,
            running: true,
            tracker,
            currency: CurrencyCode::new(config.currency.clone()),
            default_window: config.default_window,
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.tracker.store().path().to_path_buf()
    }

    /// Surfaces anything the startup load had to recover from.
    pub fn report_load(&self) {
        let metadata = self.tracker.load_metadata();
        if let Some((first, rest)) = metadata.warnings.split_first() {
            output::warning(first);
            for notice in rest {
                output::info(notice);
            }
        }
        if self.mode == CliMode::Interactive {
            output::info(format!(
                "Ledger {} ({} records). Type `help` for commands.",
                metadata.path.display(),
                metadata.records
            ));
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = COMMANDS.iter().map(|(name, _, _)| *name).collect();
        names.push("quit");
        names
    }

    pub fn prompt(&self) -> String {
        format!("expenses ({})> ", self.tracker.store().len())
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
        match command {
            "add" => self.cmd_add(args)?,
            "list" => self.cmd_list(),
            "dashboard" => self.cmd_dashboard(args)?,
            "categories" => self.cmd_categories(),
            "version" => output::info(build_info::current().summary()),
            "help" => self.cmd_help(),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            other => return Err(CliError::Input(unknown_command_message(other))),
        }
        Ok(LoopControl::Continue)
    }

    pub fn report_error(&self, err: CliError) {
        output::error(err);
    }

    fn cmd_add(&mut self, args: &[&str]) -> Result<(), CliError> {
        if args.len() < 3 {
            return Err(CliError::Input(format!("usage: {}", COMMANDS[0].1)));
        }
        let category = args[2..].join(" ");
        let record = self.tracker.submit_expense(args[0], args[1], &category)?;
        output::success(format!(
            "Expense recorded: {}",
            views::record_line(&record, &self.currency)
        ));
        if !record.category().is_standard() {
            output::info(format!("`{}` is not one of the standard categories.", record.category()));
        }
        output::info(format!("{} expenses on file.", self.tracker.store().len()));
        Ok(())
    }

    fn cmd_list(&self) {
        let records = self.tracker.list_records();
        output::section("Expenses");
        println!("{}", views::records_table(&records, &self.currency));
    }

    fn cmd_dashboard(&self, args: &[&str]) -> Result<(), CliError> {
        let spec = self.parse_filter(args)?;
        let view = self.tracker.dashboard_data(&spec);
        output::section("Dashboard");
        println!("{}", views::dashboard(&view, &spec, &self.currency));
        Ok(())
    }

    fn parse_filter(&self, args: &[&str]) -> Result<FilterSpec, CliError> {
        let window = match args.first() {
            Some(raw) => raw
                .parse::<TimeWindow>()
                .map_err(|err| CliError::Input(err.to_string()))?,
            None => self.default_window,
        };
        let category = if args.len() > 1 {
            CategoryFilter::from(args[1..].join(" ").as_str())
        } else {
            CategoryFilter::All
        };
        Ok(FilterSpec::new(window, category))
    }

    fn cmd_categories(&self) {
        output::section("Categories");
        for category in Category::STANDARD {
            println!("  {category}");
        }
    }

    fn cmd_help(&self) {
        output::section("Commands");
        let width = COMMANDS
            .iter()
            .map(|(_, usage, _)| usage.len())
            .max()
            .unwrap_or(0);
        for (_, usage, summary) in COMMANDS {
            println!("  {usage:<width$}  {summary}");
        }
    }
}

fn unknown_command_message(command: &str) -> String {
    let suggestion = COMMANDS
        .iter()
        .map(|(name, _, _)| (*name, strsim::levenshtein(command, name)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance);
    match suggestion {
        Some((name, _)) => format!("unknown command `{command}`. Did you mean `{name}`?"),
        None => format!("unknown command `{command}`. Type `help` for a list."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{clock::FixedClock, ledger_store::LedgerStore};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn context() -> ShellContext {
        let store = LedgerStore::open(Box::new(MemoryStorage::new()));
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let tracker = ExpenseTracker::new(store, Box::new(clock));
        ShellContext::with_tracker(CliMode::Script, tracker, &Config::default())
    }

    #[test]
    fn add_accepts_multi_word_categories() {
        let mut ctx = context();
        ctx.dispatch("add", &["2024-01-05", "12", "Gym", "membership"])
            .unwrap();
        let records = ctx.tracker.list_records();
        assert_eq!(records[0].category().as_str(), "Gym membership");
    }

    #[test]
    fn add_reports_validation_errors() {
        let mut ctx = context();
        let err = ctx
            .dispatch("add", &["invalid_date", "not_a_number", "Food"])
            .unwrap_err();
        assert!(matches!(err, CliError::Core(ref inner) if inner.is_validation()));
        assert!(ctx.tracker.store().is_empty());
    }

    #[test]
    fn filter_defaults_to_configured_window() {
        let ctx = context();
        let spec = ctx.parse_filter(&[]).unwrap();
        assert_eq!(spec, FilterSpec::default());
        let spec = ctx.parse_filter(&["3m", "Food"]).unwrap();
        assert_eq!(spec.window, TimeWindow::Last3Months);
        assert_eq!(spec.category, CategoryFilter::Only(Category::Food));
        assert!(ctx.parse_filter(&["forever"]).is_err());
    }

    #[test]
    fn unknown_commands_suggest_nearest() {
        let mut ctx = context();
        let err = ctx.dispatch("lsit", &[]).unwrap_err();
        assert!(err.to_string().contains("Did you mean `list`?"), "{err}");
        assert_eq!(ctx.dispatch("quit", &[]).unwrap(), LoopControl::Exit);
    }
}
