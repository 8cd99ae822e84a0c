use chrono::Datelike;
use clap::Parser;
use mnu_backend::config::AppConfig;
use mnu_backend::domain::{format_amount, CalendarService, DenominationService, RowDisplay};
use mnu_backend::error::user_message;
use mnu_backend::logging::init_tracing;
use mnu_backend::state::{CalendarCell, CalendarState};
use mnu_shared::YearMonth;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Render a month grid and a wallet breakdown in the terminal
#[derive(Debug, Parser)]
#[command(name = "mnu-preview")]
#[command(about = "Preview the MoneyNotUse calendar and wallet")]
struct PreviewArgs {
    /// Month to show as YYYY-MM, defaults to the current month
    #[arg(long)]
    month: Option<YearMonth>,

    /// Balance to break into bills and coins
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<i64>,

    #[arg(long, default_value = "mnu.yaml")]
    config: PathBuf,

    #[arg(long, help = "Enable debug logging")]
    verbose: bool,
}

fn main() {
    let args = PreviewArgs::parse();
    init_tracing(if args.verbose { "debug" } else { "info" });
    debug!("Preview args: {:?}", args);

    if let Err(e) = run(&args) {
        error!("❌ Preview failed: {:#}", e);
        eprintln!("❌ {}", user_message(&e));
        std::process::exit(1);
    }
}

fn run(args: &PreviewArgs) -> anyhow::Result<()> {
    let config = AppConfig::load(&args.config)?;

    let mut calendar = CalendarState::for_local_today(CalendarService::new(&config.calendar))?;
    if let Some(month) = args.month {
        // Walk to the requested month so "today" keeps its highlight rules
        while calendar.displayed() < month && calendar.next_month() {}
        while calendar.displayed() > month && calendar.previous_month() {}
    }
    info!("📅 Rendering {}", calendar.displayed());
    print_calendar(&calendar);

    if let Some(amount) = args.amount {
        println!();
        print_wallet(&DenominationService::new(&config.wallet), amount, &config.currency_symbol);
    }
    Ok(())
}

fn print_calendar(calendar: &CalendarState) {
    println!("{:^35}", calendar.title());
    let header: Vec<String> = calendar
        .weekday_labels()
        .iter()
        .map(|label| format!("{:>5}", label))
        .collect();
    println!("{}", header.concat());

    for week in calendar.cells().chunks(7) {
        let row: Vec<String> = week.iter().map(render_cell).collect();
        println!("{}", row.concat());
    }
}

fn render_cell(cell: &CalendarCell) -> String {
    let day = cell.day.date.day();
    let text = if !cell.day.in_target_month {
        format!("({})", day)
    } else if cell.is_selected {
        format!("[{}]", day)
    } else if cell.is_today {
        format!("*{}", day)
    } else {
        day.to_string()
    };
    format!("{:>5}", text)
}

fn print_wallet(service: &DenominationService, balance: i64, currency_symbol: &str) {
    let wallet = service.wallet_for_balance(balance);
    let note = if wallet.is_negative { " (negative)" } else { "" };
    println!("Wallet for {}{}", format_amount(balance, currency_symbol), note);

    if wallet.is_empty() {
        println!("  (empty)");
        return;
    }
    for row in &wallet.rows {
        let shown = match &row.display {
            RowDisplay::Individual { icons } => "■ ".repeat(*icons as usize).trim_end().to_string(),
            RowDisplay::Collapsed { multiplier_label } => format!("■ {}", multiplier_label),
        };
        println!("  {:<18} {}", row.label, shown);
    }
    debug!("Rendered {} wallet rows", wallet.rows.len());
}
