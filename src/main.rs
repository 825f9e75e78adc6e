use anyhow::{anyhow, bail, Result};
use crossterm::style::Stylize;
use std::sync::Arc;

use fingrid::api_client::ApiClient;
use fingrid::config::Config;
use fingrid::data::filter::FilterInput;
use fingrid::data::record::load_records;
use fingrid::data::view::StatementView;

mod table_display;

fn print_help() {
    println!("{}", "fingrid - income statement grid".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  fingrid [OPTIONS] [TICKER]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {}     - Print the table to stdout instead of the TUI",
        "--classic".green()
    );
    println!(
        "  {} - Filter in classic mode, repeatable (e.g. revenue-min=0)",
        "--filter k=v".green()
    );
    println!(
        "  {} - Write a commented default config file",
        "--generate-config".green()
    );
    println!("  {}        - Show this help", "--help".green());
    println!();
    println!("{}", "Filter fields:".yellow());
    println!("  {}", FilterInput::FIELD_KEYS.join(", "));
    println!();
    println!("{}", "Environment:".yellow());
    println!("  FMP_API_KEY - API key (overrides the config file)");
    println!();
    println!("{}", "TUI keys:".yellow());
    println!("  {}  - Edit filters, Enter applies them", "f".green());
    println!("  {}  - Export visible rows to CSV", "e".green());
    println!("  {}  - Help overlay", "?".green());
    println!("  {}  - Quit", "q".green());
    println!();
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--generate-config") {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Configuration file created at: {:?}", path);
        println!("Edit this file to customize fingrid.");
        return Ok(());
    }

    let mut use_classic = false;
    let mut filter_input = FilterInput::default();
    let mut has_filters = false;
    let mut ticker_arg: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--classic" => use_classic = true,
            "--filter" => {
                i += 1;
                let pair = args
                    .get(i)
                    .ok_or_else(|| anyhow!("--filter requires a key=value argument"))?;
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--filter expects key=value, got '{}'", pair))?;
                filter_input.set(key, value)?;
                has_filters = true;
            }
            arg if arg.starts_with("--") => bail!("unknown option '{}' (see --help)", arg),
            arg => {
                if ticker_arg.is_none() {
                    ticker_arg = Some(arg.to_uppercase());
                }
            }
        }
        i += 1;
    }

    if has_filters && !use_classic {
        bail!("--filter only applies to --classic mode; the TUI has its own filter form");
    }

    let log_path = fingrid::utils::logging::init_tracing()?;

    let config = Config::load()?;
    let ticker = ticker_arg.unwrap_or_else(|| config.api.ticker.clone());
    let api_key = config.resolve_api_key()?;
    let client = ApiClient::new(&config.api.base_url, &api_key);

    if use_classic {
        let raw = client.income_statements(&ticker, &config.api.period)?;
        let view = StatementView::new(Arc::new(load_records(raw)), config.display.page_size);
        let view = view.apply_filters(&filter_input.parse()?);
        table_display::display_statements(&ticker, &view);
        return Ok(());
    }

    eprintln!("Debug logs: {}", log_path.display());

    // A fetch failure still opens the grid; the status line carries the error.
    let (records, fetch_error) = match client.income_statements(&ticker, &config.api.period) {
        Ok(raw) => (load_records(raw), None),
        Err(err) => {
            tracing::error!(target: "api", "fetch failed: {:#}", err);
            (Vec::new(), Some(format!("{:#}", err)))
        }
    };

    fingrid::ui::tui_app::run_tui(config, ticker, records, fetch_error)
}
