//! Stock report terminal front-end
//!
//! Collects up to three tickers, fetches recent daily bars from Polygon and
//! optionally asks a running `report-server` to write the report.
//!
//! # Usage
//!
//! ```bash
//! export POLYGON_API_KEY="..."
//!
//! cargo run --bin stock-report -p stock-report -- --server http://127.0.0.1:3000
//! ```

use clap::Parser;
use report_utils::init_tracing_with;
use std::io::{self, BufRead, Write};
use stock_report::page::{MAX_TICKERS, Phase};
use stock_report::{DateRange, PolygonClient, ReportClient, ReportConfig, ReportPage};

#[derive(Parser, Debug)]
#[command(name = "stock-report")]
#[command(about = "Collect tickers, fetch market data and generate a stock report", long_about = None)]
struct Args {
    /// Base URL of a running report-server
    #[arg(short, long, env = "REPORT_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Days of daily bars to fetch, ending yesterday
    #[arg(short, long)]
    lookback_days: Option<u32>,
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                      Stock Report                            ║
║                                                              ║
║  Commands:                                                   ║
║    add <TICKER>  - Add a ticker (up to 3)                    ║
║    generate      - Fetch market data for the tickers         ║
║    narrate       - Turn the fetched data into a report       ║
║    show          - Show the current page                     ║
║    reset         - Start over                                ║
║    help          - Show this help                            ║
║    exit          - Quit                                      ║
║                                                              ║
║  Always correct 15% of the time!                             ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

fn render(page: &ReportPage) {
    match page.phase() {
        Phase::Input => {
            let label = format!(
                "Add up to {MAX_TICKERS} stock tickers below to get a super accurate stock predictions report"
            );
            if page.label_error() {
                println!("! {label}");
            } else {
                println!("{label}");
            }
            if page.tickers().is_empty() {
                println!("  (no tickers yet)");
            } else {
                println!("  Tickers: {}", page.tickers().join(" "));
            }
        }
        Phase::Loading => println!("Querying Stocks API..."),
        Phase::Result => {
            println!("Your Report");
            println!("{}", page.report().unwrap_or_default());
        }
    }
    println!("This is not real financial advice!");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing_with("warn", report_utils::LogFormat::Pretty);

    let args = Args::parse();

    let mut builder = ReportConfig::builder();
    if let Some(days) = args.lookback_days {
        builder = builder.lookback_days(days);
    }
    let config = builder.with_env().build()?;

    let source = PolygonClient::new(
        config.polygon_api_base.clone(),
        config.require_polygon_key()?,
        config.request_timeout,
    )?;
    let reporter = ReportClient::new(&args.server, config.completion_timeout)?;

    print_banner();
    println!("Report server: {}\n", reporter.endpoint());

    let mut page = ReportPage::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            "add" => {
                page.set_input(rest);
                page.add_ticker();
                render(&page);
            }
            "generate" => {
                if !page.can_generate() {
                    println!("Add at least one ticker first.");
                    continue;
                }
                let range = DateRange::recent(config.lookback_days);
                println!("Querying Stocks API for {range}...");
                page.generate(&source, &range).await;
                render(&page);
            }
            "narrate" => {
                println!("Writing report...");
                page.narrate(&reporter).await;
                render(&page);
            }
            "show" => render(&page),
            "reset" => {
                page.reset();
                render(&page);
            }
            "help" => print_banner(),
            "exit" | "quit" => {
                println!("Goodbye!");
                break;
            }
            other => println!("Unknown command: {other} (try 'help')"),
        }
    }

    Ok(())
}
