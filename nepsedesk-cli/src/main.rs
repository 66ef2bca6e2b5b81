//! NepseDesk CLI — trading-discipline dashboard for the NEPSE desk.
//!
//! Commands:
//! - `status` — risk gate, allocation, and performance summary
//! - `size` — position-sizing calculator, optionally committing a trade
//! - `add` / `close` / `delete` — trade journal
//! - `equity` — set account equity
//! - `check` — morning checklist
//! - `bias` — daily bias audit
//! - `review` — weekly metrics and recommendations
//! - `export` / `import` — full state document exchange
//! - `clock` — NST time and market status

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use nepsedesk_core::allocation::{rebalancing_warnings, CategoryAllocation, TARGET_ALLOCATION};
use nepsedesk_core::domain::{BiasAnswer, StrategyCategory, Trade, TradeStatus};
use nepsedesk_core::metrics::{
    avg_holding_days, avg_win_loss, max_drawdown, net_pnl_per_trade, playbook_performance,
    win_rate,
};
use nepsedesk_core::nst;
use nepsedesk_core::review::{generate_recommendations, WeeklyMetrics};
use nepsedesk_core::sizing::{calculate_position_sizing, SizingInput};
use nepsedesk_store::{
    import_json, parse_npr, write_export, ChecklistItem, RefreshTask, TradingStore,
};

#[derive(Parser)]
#[command(
    name = "nepsedesk",
    about = "NepseDesk CLI — NEPSE trading-discipline dashboard"
)]
struct Cli {
    /// State document path.
    #[arg(long, global = true, default_value = "nepsedesk.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the risk gate, allocation, and performance summary.
    Status,
    /// Size a position from equity, risk fraction, and stop distance.
    Size {
        /// Entry price (NPR).
        entry: f64,
        /// Stop-loss price (NPR).
        stop: f64,

        /// Risk fraction per trade (e.g. 0.01 for 1%).
        #[arg(long, default_value_t = 0.01)]
        risk: f64,

        /// 20-session average daily turnover in NPR (omit if unknown).
        #[arg(long)]
        turnover: Option<f64>,

        /// Commit the sized trade to the journal under this ticker.
        #[arg(long)]
        commit: Option<String>,

        /// Playbook label (required with --commit).
        #[arg(long)]
        playbook: Option<String>,

        /// Playbook category: event, momentum, intraday.
        #[arg(long, default_value = "momentum")]
        category: String,
    },
    /// Add a trade to the open book.
    Add {
        /// Trade id (unique across open and closed books).
        id: String,
        ticker: String,
        entry: f64,
        stop: f64,
        size: u32,

        #[arg(long, default_value = "")]
        playbook: String,

        /// Playbook category: event, momentum, intraday.
        #[arg(long, default_value = "momentum")]
        category: String,
    },
    /// Close an open trade at an exit price.
    Close { id: String, exit: f64 },
    /// Delete an open trade (closed trades are history).
    Delete { id: String },
    /// Set account equity. Accepts comma separators, e.g. 5,00,000.
    Equity { amount: String },
    /// Show or set morning-checklist items.
    Check {
        /// Item: edis, delivery, margin, maxloss, caps, plan, bias.
        item: Option<String>,

        /// on or off.
        value: Option<String>,
    },
    /// Record a bias-audit answer or plan-adherence score for today.
    Bias {
        #[command(subcommand)]
        action: BiasAction,
    },
    /// Weekly metrics and rule-based recommendations.
    Review,
    /// Export the state document as nepse-dashboard-<date>.json.
    Export {
        /// Output directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Import a previously exported document, replacing current state.
    Import { file: PathBuf },
    /// NST clock and market status.
    Clock {
        /// Keep printing once per second.
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
}

#[derive(Subcommand)]
enum BiasAction {
    /// Show today's record.
    Show,
    /// Answer a question 1-5: yes, no, unsure, or clear.
    Answer { question: u8, answer: String },
    /// Set the 0-5 plan-adherence self-score.
    Score { score: u8 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut store = TradingStore::open(&cli.state);

    match cli.command {
        Commands::Status => run_status(&store),
        Commands::Size {
            entry,
            stop,
            risk,
            turnover,
            commit,
            playbook,
            category,
        } => run_size(&mut store, entry, stop, risk, turnover, commit, playbook, &category),
        Commands::Add {
            id,
            ticker,
            entry,
            stop,
            size,
            playbook,
            category,
        } => run_add(&mut store, id, ticker, entry, stop, size, playbook, &category),
        Commands::Close { id, exit } => run_close(&mut store, &id, exit),
        Commands::Delete { id } => run_delete(&mut store, &id),
        Commands::Equity { amount } => run_equity(&mut store, &amount),
        Commands::Check { item, value } => run_check(&mut store, item.as_deref(), value.as_deref()),
        Commands::Bias { action } => run_bias(&mut store, action),
        Commands::Review => run_review(&store),
        Commands::Export { dir } => run_export(&store, &dir),
        Commands::Import { file } => run_import(&mut store, &file),
        Commands::Clock { watch } => run_clock(watch),
    }
}

fn parse_category(raw: &str) -> Result<StrategyCategory> {
    match raw {
        "event" => Ok(StrategyCategory::Event),
        "momentum" => Ok(StrategyCategory::Momentum),
        "intraday" => Ok(StrategyCategory::Intraday),
        _ => bail!("unknown category '{raw}'. Valid: event, momentum, intraday"),
    }
}

fn run_status(store: &TradingStore) -> Result<()> {
    let now = Utc::now();
    let state = store.state();
    let gate = store.risk_gate(now);

    println!("=== NepseDesk Status ===");
    println!("NST time:        {}", nst::nst_time_string(now));
    println!(
        "Market:          {}",
        if nst::is_market_open(now) { "OPEN" } else { "CLOSED" }
    );
    println!("Account equity:  {:.2} NPR", state.account_equity);
    println!();
    println!("--- Risk Gate ---");
    println!(
        "Checklist:       {}/7{}",
        store.checklist_completion(),
        if gate.checklist_complete { "" } else { " (incomplete)" }
    );
    println!("Daily P&L:       {:.2} NPR", gate.daily_pnl);
    println!("Remaining R:     {:.2}", gate.remaining_r);
    println!(
        "Trade ideas:     {}",
        if gate.locked { "LOCKED" } else { "unlocked" }
    );

    let alloc = CategoryAllocation::from_open_trades(&state.open_trades);
    println!();
    println!("--- Allocation (target {}/{}/{}) ---",
        TARGET_ALLOCATION.event, TARGET_ALLOCATION.momentum, TARGET_ALLOCATION.intraday);
    println!("Event/Swing:     {}%", alloc.event);
    println!("Momentum:        {}%", alloc.momentum);
    println!("Intraday:        {}%", alloc.intraday);
    for warning in rebalancing_warnings(alloc) {
        println!("WARNING: {warning}");
    }

    let fee = state.settings.fee_percent;
    println!();
    println!("--- Performance (all closed trades) ---");
    println!("Open trades:     {}", state.open_trades.len());
    println!("Closed trades:   {}", state.closed_trades.len());
    println!("Win rate:        {:.1}%", win_rate(&state.closed_trades));
    println!("Avg win/loss:    {:.2}", avg_win_loss(&state.closed_trades));
    println!("Net P&L/trade:   {:.2} NPR", net_pnl_per_trade(&state.closed_trades, fee));
    println!("Avg holding:     {:.1} days", avg_holding_days(&state.closed_trades));
    println!("Max drawdown:    {:.2} NPR", max_drawdown(&state.closed_trades));

    let playbooks = playbook_performance(&state.closed_trades, fee);
    if !playbooks.is_empty() {
        println!();
        println!("{:<28} {:>6} {:>8} {:>8}", "Playbook", "Trades", "Win%", "AvgR");
        println!("{}", "-".repeat(54));
        for p in &playbooks {
            println!("{:<28} {:>6} {:>7.1}% {:>8.2}", p.name, p.trades, p.win_rate, p.avg_r);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_size(
    store: &mut TradingStore,
    entry: f64,
    stop: f64,
    risk: f64,
    turnover: Option<f64>,
    commit: Option<String>,
    playbook: Option<String>,
    category: &str,
) -> Result<()> {
    let state = store.state();
    let out = calculate_position_sizing(SizingInput {
        account_equity: state.account_equity,
        risk_percent: risk,
        entry_price: entry,
        stop_price: stop,
        avg_daily_turnover_20d: turnover.unwrap_or(0.0),
        fee_percent: Some(state.settings.fee_percent),
    });

    println!("=== Position Sizing ===");
    println!("R value:         {:.2} NPR", out.r_value);
    println!("Risk shares:     {}", out.position_shares);
    if turnover.is_some() {
        println!("Liquidity cap:   {:.2} NPR ({} shares)", out.liquidity_cap_npr, out.liquidity_cap_shares);
        println!("Days to exit:    {:.2}", out.days_to_exit);
    }
    println!("Effective:       {} shares ({:.2} NPR)", out.effective_shares, out.effective_value);
    println!("Breakeven move:  {:.2}%", out.breakeven_pct);
    if out.liquidity_warning {
        println!("WARNING: position would take more than 3 sessions to exit");
    }
    if out.zero_shares_error {
        println!("ERROR: inputs size to zero shares");
    }

    if let Some(ticker) = commit {
        if out.zero_shares_error {
            bail!("refusing to commit a zero-share trade");
        }
        let gate = store.risk_gate(Utc::now());
        if gate.locked {
            bail!("trade ideas are locked (checklist incomplete or daily loss hit)");
        }
        let id = format!("t_{}", Utc::now().format("%Y%m%d%H%M%S"));
        let trade = Trade {
            id: id.clone(),
            ticker,
            playbook: playbook.unwrap_or_default(),
            playbook_category: parse_category(category)?,
            entry_price: entry,
            stop_price: stop,
            size: out.effective_shares.min(u32::MAX as u64) as u32,
            entry_date: Utc::now(),
            current_price: None,
            exit_price: None,
            exit_date: None,
            status: TradeStatus::Open,
            edis_flag: false,
            notes: None,
            r_value: out.r_value,
        };
        if !store.add_trade(trade) {
            bail!("trade id collision; retry");
        }
        println!();
        println!("Committed trade {id}: {} shares", out.effective_shares);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_add(
    store: &mut TradingStore,
    id: String,
    ticker: String,
    entry: f64,
    stop: f64,
    size: u32,
    playbook: String,
    category: &str,
) -> Result<()> {
    let r_value = store.state().account_equity * 0.01;
    let trade = Trade {
        id: id.clone(),
        ticker,
        playbook,
        playbook_category: parse_category(category)?,
        entry_price: entry,
        stop_price: stop,
        size,
        entry_date: Utc::now(),
        current_price: None,
        exit_price: None,
        exit_date: None,
        status: TradeStatus::Open,
        edis_flag: false,
        notes: None,
        r_value,
    };
    if !store.add_trade(trade) {
        bail!("trade id '{id}' already exists");
    }
    println!("Added trade {id}");
    Ok(())
}

fn run_close(store: &mut TradingStore, id: &str, exit: f64) -> Result<()> {
    if !store.close_trade(id, exit, Utc::now()) {
        bail!("no open trade with id '{id}'");
    }
    let closed = store
        .state()
        .closed_trades
        .iter()
        .find(|t| t.id == id)
        .cloned();
    if let Some(t) = closed {
        let fee = store.state().settings.fee_percent;
        if let Some(pnl) = t.net_pnl(fee) {
            println!("Closed {id} at {exit}: net {pnl:.2} NPR");
        }
    }
    let gate = store.risk_gate(Utc::now());
    if gate.daily_loss_hit {
        println!("WARNING: daily loss limit hit. Trade ideas are now locked.");
    }
    Ok(())
}

fn run_delete(store: &mut TradingStore, id: &str) -> Result<()> {
    if !store.delete_trade(id) {
        bail!("no open trade with id '{id}'");
    }
    println!("Deleted trade {id}");
    Ok(())
}

fn run_equity(store: &mut TradingStore, amount: &str) -> Result<()> {
    let Some(value) = parse_npr(amount) else {
        bail!("'{amount}' is not a valid NPR amount");
    };
    store.set_account_equity(value);
    println!("Account equity: {:.2} NPR", store.state().account_equity);
    Ok(())
}

const CHECK_ITEMS: [(&str, ChecklistItem, &str); 7] = [
    ("edis", ChecklistItem::EdisCompleted, "EDIS completed for pending settlements"),
    ("delivery", ChecklistItem::NoDeliveryCheck, "No pending delivery obligations"),
    ("margin", ChecklistItem::MarginBuffer, "Margin buffer maintained"),
    ("maxloss", ChecklistItem::MaxLossConfirmed, "Max daily loss confirmed"),
    ("caps", ChecklistItem::PositionCapsReviewed, "Position caps reviewed"),
    ("plan", ChecklistItem::PreDefinedPlan, "Pre-defined plan for every order"),
    ("bias", ChecklistItem::BiasCheckCompleted, "Bias check completed"),
];

fn run_check(store: &mut TradingStore, item: Option<&str>, value: Option<&str>) -> Result<()> {
    if let Some(name) = item {
        let Some((_, item, _)) = CHECK_ITEMS.iter().find(|(key, _, _)| *key == name) else {
            bail!("unknown item '{name}'. Valid: edis, delivery, margin, maxloss, caps, plan, bias");
        };
        let on = match value {
            Some("on") => true,
            Some("off") => false,
            _ => bail!("expected 'on' or 'off'"),
        };
        store.set_checklist_item(*item, on);
    }

    let state = store.state();
    let c = &state.checklist;
    let flags = [
        c.edis_completed,
        c.no_delivery_check,
        c.margin_buffer,
        c.max_loss_confirmed,
        c.position_caps_reviewed,
        c.pre_defined_plan,
        c.bias_check_completed,
    ];
    println!("Checklist: {}/7", c.completed_count());
    for ((key, _, label), done) in CHECK_ITEMS.iter().zip(flags) {
        println!("  [{}] {:<9} {}", if done { "x" } else { " " }, key, label);
    }
    if !c.is_complete() {
        println!("Trade ideas stay locked until all seven items are checked.");
    }
    Ok(())
}

const BIAS_QUESTIONS: [&str; 5] = [
    "Did I chase a stock that was already up 3+ days?",
    "Did I size any position above plan?",
    "Did I move a stop further from entry?",
    "Did I enter without a written plan?",
    "Did I average down a loser?",
];

fn run_bias(store: &mut TradingStore, action: BiasAction) -> Result<()> {
    let now = Utc::now();
    let today = nst::today_nst(now);

    match action {
        BiasAction::Show => {}
        BiasAction::Answer { question, answer } => {
            if !(1..=5).contains(&question) {
                bail!("question must be 1-5");
            }
            let parsed = match answer.as_str() {
                "yes" => Some(BiasAnswer::Yes),
                "no" => Some(BiasAnswer::No),
                "unsure" => Some(BiasAnswer::Unsure),
                "clear" => None,
                _ => bail!("expected yes, no, unsure, or clear"),
            };
            store.set_bias_answer(today, question, parsed);
        }
        BiasAction::Score { score } => {
            store.set_plan_adherence(today, score);
        }
    }

    println!("Bias audit for {today}");
    match store.today_bias_audit(now) {
        Some(record) => {
            for (i, (q, a)) in BIAS_QUESTIONS.iter().zip(record.answers()).enumerate() {
                let shown = match a {
                    Some(BiasAnswer::Yes) => "YES",
                    Some(BiasAnswer::No) => "NO",
                    Some(BiasAnswer::Unsure) => "UNSURE",
                    None => "-",
                };
                println!("  {}. {:<50} {}", i + 1, q, shown);
            }
            println!("Plan adherence:  {}/5", record.plan_adherence_score);
            println!(
                "Status:          {}",
                if record.completed { "complete" } else { "incomplete" }
            );
        }
        None => println!("  (not started)"),
    }
    Ok(())
}

fn run_review(store: &TradingStore) -> Result<()> {
    let metrics = WeeklyMetrics::from_snapshot(store.state(), Utc::now());

    println!("=== Weekly Review ===");
    println!("Hit rate:        {:.1}%", metrics.hit_rate);
    println!("Avg win/loss:    {:.2}", metrics.avg_win_loss);
    println!(
        "Max drawdown:    {:.2} NPR ({:.2}R)",
        metrics.max_drawdown, metrics.max_drawdown_r
    );
    println!("Rule adherence:  {:.0}%", metrics.rule_adherence_pct);
    println!("EDIS errors:     {}", metrics.edis_errors);
    println!("Plan adherence:  {:.1}/5", metrics.plan_adherence_avg);
    println!(
        "Best playbook:   {} ({:+.2}R)",
        metrics.best_playbook, metrics.best_playbook_r
    );
    println!(
        "Worst playbook:  {} ({:+.2}R)",
        metrics.worst_playbook, metrics.worst_playbook_r
    );
    println!();
    println!("--- Recommendations ---");
    for (i, rec) in generate_recommendations(&metrics).iter().enumerate() {
        println!("{}. {rec}", i + 1);
    }
    Ok(())
}

fn run_export(store: &TradingStore, dir: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = write_export(dir, store.state())?;
    println!("Exported to {}", path.display());
    Ok(())
}

fn run_import(store: &mut TradingStore, file: &PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let Some(snapshot) = import_json(&content) else {
        bail!("'{}' is not a valid state document; current state unchanged", file.display());
    };
    store.replace(snapshot);
    println!(
        "Imported {} ({} open, {} closed trades)",
        file.display(),
        store.state().open_trades.len(),
        store.state().closed_trades.len()
    );
    Ok(())
}

fn run_clock(watch: bool) -> Result<()> {
    let print_reading = |time: &str, open: bool| {
        println!("NST {time}  market {}", if open { "OPEN" } else { "CLOSED" });
    };

    if !watch {
        let now = Utc::now();
        print_reading(&nst::nst_time_string(now), nst::is_market_open(now));
        return Ok(());
    }

    let task = RefreshTask::spawn(Duration::from_secs(1));
    loop {
        let reading = task.reading();
        print_reading(&reading.nst_time, reading.market_open);
        std::thread::sleep(Duration::from_secs(1));
    }
}
