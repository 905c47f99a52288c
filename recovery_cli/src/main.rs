use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use recovery_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reclaim")]
#[command(about = "Substance recovery progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start (or restart) a quit protocol for a substance
    Quit {
        /// Substance (cigarettes, vape, cannabis, alcohol)
        substance: String,

        /// Quit moment as RFC3339; defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Record a relapse
    Relapse {
        substance: String,

        /// Amount used (light, moderate, heavy)
        #[arg(long)]
        amount: Option<String>,

        /// Relapse moment as RFC3339; defaults to now
        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Record a mood/craving check-in
    Log {
        substance: String,

        /// Mood score 0-100
        #[arg(long)]
        feeling: Option<u8>,

        /// Craving intensity 0-100
        #[arg(long)]
        craving: Option<u8>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show recovery progress (one substance, or all active)
    Status {
        substance: Option<String>,
    },

    /// Combined milestone timeline across substances
    Timeline {
        /// Maximum entries to show
        #[arg(long, default_value_t = 8)]
        count: usize,
    },

    /// Money saved, life regained, heartbeats saved
    Analytics,

    /// Mood, neurotransmitter and body-system recovery for a substance
    Body {
        substance: String,
    },

    /// Delete an event by id
    Delete {
        id: String,
    },

    /// Export the event log to CSV
    Export {
        /// Output path; defaults to events.csv in the data directory
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Periodically recompute and print a fresh snapshot
    Watch {
        /// Seconds between recomputes
        #[arg(long, default_value_t = 60)]
        interval: u64,

        /// Stop after N recomputes (runs forever when omitted)
        #[arg(long)]
        iterations: Option<u64>,
    },
}

fn main() -> Result<()> {
    recovery_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let log_path = data_dir.join("events.jsonl");

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Commands::Quit { substance, at } => cmd_quit(&log_path, &substance, at),
        Commands::Relapse {
            substance,
            amount,
            at,
            notes,
        } => cmd_relapse(&log_path, &substance, amount, at, notes),
        Commands::Log {
            substance,
            feeling,
            craving,
            notes,
        } => cmd_log(&log_path, &substance, feeling, craving, notes),
        Commands::Status { substance } => cmd_status(&log_path, substance, catalog),
        Commands::Timeline { count } => cmd_timeline(&log_path, count, catalog),
        Commands::Analytics => cmd_analytics(&log_path, &config, catalog),
        Commands::Body { substance } => cmd_body(&log_path, &substance, catalog),
        Commands::Delete { id } => cmd_delete(&log_path, &id),
        Commands::Export { output } => cmd_export(&log_path, &data_dir, output),
        Commands::Watch {
            interval,
            iterations,
        } => cmd_watch(&log_path, &config, catalog, interval, iterations),
    }
}

fn parse_substance(s: &str) -> Result<Substance> {
    match s.to_lowercase().as_str() {
        "cigarettes" | "cigarette" | "smoking" => Ok(Substance::Cigarettes),
        "vape" | "vaping" => Ok(Substance::Vape),
        "cannabis" | "weed" => Ok(Substance::Cannabis),
        "alcohol" | "drinking" => Ok(Substance::Alcohol),
        other => Err(Error::Other(format!(
            "Unknown substance '{}'. Expected one of: cigarettes, vape, cannabis, alcohol",
            other
        ))),
    }
}

fn parse_amount(s: &str) -> Result<RelapseAmount> {
    match s.to_lowercase().as_str() {
        "light" => Ok(RelapseAmount::Light),
        "moderate" => Ok(RelapseAmount::Moderate),
        "heavy" => Ok(RelapseAmount::Heavy),
        other => Err(Error::Other(format!(
            "Unknown amount '{}'. Expected one of: light, moderate, heavy",
            other
        ))),
    }
}

fn parse_moment(at: Option<String>) -> Result<DateTime<Utc>> {
    match at {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::Other(format!("Invalid timestamp '{}': {}", s, e))),
    }
}

fn cmd_quit(log_path: &std::path::Path, substance: &str, at: Option<String>) -> Result<()> {
    let substance = parse_substance(substance)?;
    let occurred_at = parse_moment(at)?;

    let events = read_events(log_path)?;
    let had_prior = quit_dates(&events).contains_key(&substance);

    let event = Event::new(substance, EventKind::Quit, occurred_at);
    JsonlSink::new(log_path).append(&event)?;

    if had_prior {
        println!(
            "✓ Fresh start for {}: previous quit date replaced",
            substance.name()
        );
    } else {
        println!("✓ Quit protocol started for {}", substance.name());
    }
    println!("  Quit date: {}", occurred_at.to_rfc3339());
    println!("  Event id:  {}", event.id);
    Ok(())
}

fn cmd_relapse(
    log_path: &std::path::Path,
    substance: &str,
    amount: Option<String>,
    at: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let substance = parse_substance(substance)?;
    let occurred_at = parse_moment(at)?;
    let amount = amount.as_deref().map(parse_amount).transpose()?;

    let mut event = Event::new(substance, EventKind::Relapse, occurred_at);
    event.amount = amount;
    event.notes = notes;
    JsonlSink::new(log_path).append(&event)?;

    let setback_days = recovery_core::relapse::impact_factor(amount) * 3.0;
    println!("Relapse recorded for {}.", substance.name());
    println!(
        "  Setback: {:.1} days from the relapse moment. Progress continues from there.",
        setback_days
    );
    println!("  Event id: {}", event.id);
    Ok(())
}

fn cmd_log(
    log_path: &std::path::Path,
    substance: &str,
    feeling: Option<u8>,
    craving: Option<u8>,
    notes: Option<String>,
) -> Result<()> {
    let substance = parse_substance(substance)?;

    let mut event = Event::new(substance, EventKind::Log, Utc::now());
    event.feeling = feeling.map(|v| v.min(100));
    event.craving = craving.map(|v| v.min(100));
    event.notes = notes;
    JsonlSink::new(log_path).append(&event)?;

    println!("✓ Check-in logged for {}", substance.name());
    println!("  Event id: {}", event.id);
    Ok(())
}

fn cmd_status(
    log_path: &std::path::Path,
    substance: Option<String>,
    catalog: &Catalog,
) -> Result<()> {
    let events = read_events(log_path)?;
    let quits = quit_dates(&events);
    let now = Utc::now();

    let targets: Vec<Substance> = match substance {
        Some(s) => vec![parse_substance(&s)?],
        None => Substance::ALL
            .into_iter()
            .filter(|s| quits.contains_key(s))
            .collect(),
    };

    if targets.is_empty() {
        println!("No active quit protocols. Start one with `reclaim quit <substance>`.");
        return Ok(());
    }

    for substance in &targets {
        let quit = quits.get(substance).copied();
        let progress = compute_progress(now, quit, *substance, &events, catalog);
        let streak = compute_streak(now, quit, &events, *substance);
        display_status(*substance, &progress, &streak);
    }

    if targets.len() > 1 {
        let health = overall_health(now, &quits, &events, catalog);
        println!("Overall health: {:.1}%", health);
    }

    Ok(())
}

fn display_status(substance: Substance, progress: &ProgressRecord, streak: &StreakRecord) {
    println!("── {} ──", substance.name());

    if progress.effective_quit_date.is_none() {
        println!("  Not started.");
        println!();
        return;
    }

    println!("  Recovery: {:.1}%", progress.progress);
    println!(
        "  Streak:   {} day{}{}",
        streak.days,
        if streak.days == 1 { "" } else { "s" },
        if streak.is_active { "" } else { " (quit date is in the future)" }
    );

    if let Some(ref m) = progress.current_milestone {
        println!("  Latest:   {}", m.label);
    }
    if let Some(ref m) = progress.next_milestone {
        let eta = progress
            .time_to_next_ms
            .map(fmt_duration_ms)
            .unwrap_or_default();
        println!("  Next:     {} (in {})", m.label, eta);
    } else {
        println!("  Next:     all milestones complete");
    }

    if !progress.upcoming.is_empty() {
        println!("  Ahead:");
        for m in &progress.upcoming {
            println!("    · {} ({:.0}%)", m.label, m.progress);
        }
    }
    println!();
}

fn cmd_timeline(log_path: &std::path::Path, count: usize, catalog: &Catalog) -> Result<()> {
    let events = read_events(log_path)?;
    let quits = quit_dates(&events);
    let now = Utc::now();

    let timeline = combined_timeline(now, &quits, &events, catalog, count);
    if timeline.is_empty() {
        println!("Nothing on the timeline yet.");
        return Ok(());
    }

    for entry in &timeline {
        if entry.is_completed {
            println!(
                "  ✓ [{}] {} ({} ago)",
                entry.substance.name(),
                entry.label,
                fmt_duration_ms(-entry.time_to_event_ms)
            );
        } else {
            println!(
                "  ○ [{}] {} (in {})",
                entry.substance.name(),
                entry.label,
                fmt_duration_ms(entry.time_to_event_ms)
            );
        }
    }
    Ok(())
}

fn cmd_analytics(log_path: &std::path::Path, config: &Config, catalog: &Catalog) -> Result<()> {
    let events = read_events(log_path)?;
    let quits = quit_dates(&events);
    let costs = config.cost_config();
    let now = Utc::now();

    let analytics = advanced_analytics(now, &quits, &events, &costs, catalog);
    let currency = &config.display.currency;

    println!("Money saved:      {}{:.2}", currency, analytics.money_saved);
    println!(
        "Life regained:    {}",
        fmt_duration_ms((analytics.life_minutes_regained * 60_000.0) as i64)
    );
    println!("Heartbeats saved: {:.0}", analytics.heartbeats_saved);

    for item in &analytics.breakdown {
        println!(
            "  {}: {:.1} days clean, {}{:.2} saved",
            item.substance.name(),
            item.days_clean,
            currency,
            item.money_saved
        );
    }
    Ok(())
}

fn cmd_body(log_path: &std::path::Path, substance: &str, catalog: &Catalog) -> Result<()> {
    let substance = parse_substance(substance)?;
    let events = read_events(log_path)?;
    let quits = quit_dates(&events);
    let quit = quits.get(&substance).copied();
    let now = Utc::now();

    println!("── {} ──", substance.name());

    println!("Withdrawal symptoms:");
    for record in mood_profile(now, quit, &events, substance) {
        match record.phase {
            MoodPhase::NotAffected => {
                println!("  {:<16} not affected", record.indicator.name())
            }
            phase => println!(
                "  {:<16} severity {:>5.1}  ({:?})",
                record.indicator.name(),
                record.severity,
                phase
            ),
        }
    }

    println!("Neurotransmitters:");
    for record in neuro_profile(now, quit, &events, substance) {
        match record.phase {
            NeuroPhase::NotAffected => {
                println!("  {:<16} not affected", record.transmitter.name())
            }
            phase => println!(
                "  {:<16} {:>5.1}%  ({:?})",
                record.transmitter.name(),
                record.progress,
                phase
            ),
        }
    }

    println!("Body systems:");
    for record in system_health_profile(now, &quits, &events, catalog) {
        if record.contributing > 0 {
            println!("  {:<16} {:>5.1}%", record.system.name(), record.percent);
        }
    }
    Ok(())
}

fn cmd_delete(log_path: &std::path::Path, id: &str) -> Result<()> {
    let id = uuid::Uuid::parse_str(id)
        .map_err(|e| Error::Other(format!("Invalid event id '{}': {}", id, e)))?;

    delete_event(log_path, id)?;
    println!("✓ Event {} deleted", id);
    Ok(())
}

fn cmd_export(
    log_path: &std::path::Path,
    data_dir: &std::path::Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let events = read_events(log_path)?;
    let csv_path = output.unwrap_or_else(|| data_dir.join("events.csv"));

    let count = export_events(&events, &csv_path)?;
    println!("✓ Exported {} events to {}", count, csv_path.display());
    Ok(())
}

fn cmd_watch(
    log_path: &std::path::Path,
    config: &Config,
    catalog: &Catalog,
    interval: u64,
    iterations: Option<u64>,
) -> Result<()> {
    let costs = config.cost_config();
    let mut tick = 0u64;

    loop {
        // Pull a fresh input snapshot every tick; the previous derived
        // snapshot is simply replaced.
        let events = read_events(log_path)?;
        let quits = quit_dates(&events);
        let snapshot = compute_snapshot(Utc::now(), &quits, &events, &costs, catalog);

        println!("[{}] overall health {:.1}%", snapshot.generated_at.to_rfc3339(), snapshot.overall_health);
        for s in &snapshot.substances {
            println!(
                "  {}: {:.1}% recovered, {} day streak",
                s.substance.name(),
                s.progress.progress,
                s.streak.days
            );
        }

        tick += 1;
        if let Some(limit) = iterations {
            if tick >= limit {
                break;
            }
        }
        std::thread::sleep(std::time::Duration::from_secs(interval));
    }
    Ok(())
}

/// Compact humanized duration: days, then hours, then minutes
fn fmt_duration_ms(ms: i64) -> String {
    let ms = ms.max(0);
    let days = ms / MS_PER_DAY;
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
