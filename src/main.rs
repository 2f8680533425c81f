use chrono::NaiveDate;
use clap::Parser;
use rostering::catalog::Scenario;
use rostering::config::SchedulerConfig;
use rostering::flight::{FlightLeg, LegId, LegStatus};
use rostering::resource::ResourceKey;
use rostering::schedule::{Ledger, Scheduler};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::Tabled;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Path to a JSON scheduler configuration, defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// First day of the planning horizon
    #[arg(long, default_value = "2020-07-01")]
    start: NaiveDate,

    /// Last day of the planning horizon (inclusive)
    #[arg(long, default_value = "2020-07-31")]
    end: NaiveDate,

    /// Fly return legs with the outbound crew
    #[arg(long)]
    pairing: bool,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

#[derive(Tabled)]
struct LegRow {
    #[tabled(rename = "Leg")]
    id: LegId,
    #[tabled(rename = "Flight")]
    flight_number: u32,
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Departs")]
    departs: String,
    #[tabled(rename = "Arrives")]
    arrives: String,
    #[tabled(rename = "Aircraft")]
    aircraft: String,
    #[tabled(rename = "Captain")]
    captain: String,
    #[tabled(rename = "First Officer")]
    first_officer: String,
    #[tabled(rename = "Cabin")]
    cabin: String,
    #[tabled(rename = "Status")]
    status: LegStatus,
}

impl LegRow {
    fn new(ledger: &Ledger, leg: &FlightLeg) -> LegRow {
        let required = ledger.aircraft_for(leg.id).map_or(0, |a| a.cabin_crew_required);
        LegRow {
            id: leg.id,
            flight_number: leg.flight_number(),
            date: leg.date,
            route: format!("{}-{}", leg.departure_airport(), leg.arrival_airport()),
            departs: leg.departure.format("%H:%M").to_string(),
            arrives: leg.arrival.format("%d %H:%M").to_string(),
            aircraft: or_dash(ledger.aircraft_for(leg.id).map(|a| a.tail_code.clone())),
            captain: or_dash(ledger.captain_of(leg.id).map(|p| p.name.clone())),
            first_officer: or_dash(ledger.first_officer_of(leg.id).map(|p| p.name.clone())),
            cabin: format!("{}/{}", ledger.cabin_crew_of(leg.id).len(), required),
            status: leg.status,
        }
    }
}

fn or_dash(value: Option<Arc<str>>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn paginate(content: &str) -> std::io::Result<()> {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())?;

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // quitting the pager early closes the pipe
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }

    pager.wait()?;
    Ok(())
}

fn print_legs(ledger: &Ledger, legs: &[&FlightLeg]) {
    if legs.is_empty() {
        println!("No matching legs found.");
        return;
    }

    let rows = legs.iter().map(|l| LegRow::new(ledger, l)).collect::<Vec<_>>();
    let mut table = tabled::Table::new(&rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    let rendered = table.to_string();

    if rows.len() > 20 {
        if let Err(e) = paginate(&rendered) {
            eprintln!("Pager unavailable ({}), printing instead", e);
            println!("{}", rendered);
        }
    } else {
        println!("{}", rendered);
    }
}

fn print_leg(ledger: &Ledger, arg: &str) {
    let leg = arg
        .trim_start_matches('#')
        .parse::<usize>()
        .ok()
        .filter(|i| *i < ledger.legs().len())
        .map(LegId);
    let Some(leg) = leg else {
        println!("No such leg: {}", arg);
        return;
    };

    let flight = ledger.leg(leg);
    println!("\n{}  [{}]", flight, flight.status);
    match ledger.aircraft_for(leg) {
        Some(aircraft) => println!("  Aircraft:      {}", aircraft),
        None => println!("  Aircraft:      -"),
    }
    match ledger.captain_of(leg) {
        Some(captain) => println!("  Captain:       {}", captain),
        None => println!("  Captain:       -"),
    }
    match ledger.first_officer_of(leg) {
        Some(first_officer) => println!("  First Officer: {}", first_officer),
        None => println!("  First Officer: -"),
    }
    for member in ledger.cabin_crew_of(leg) {
        println!("  Cabin Crew:    {}", member);
    }
    let missing = ledger.missing_roles(leg);
    if !missing.is_empty() {
        let missing = missing
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  Missing:       {}", missing);
    }
    println!();
}

fn print_duty(ledger: &Ledger, scenario: &Scenario, name: &str) {
    let key = if scenario.aircraft.iter().any(|a| &*a.tail_code == name) {
        ResourceKey::Aircraft(Arc::from(name))
    } else if scenario.pilots.iter().any(|p| &*p.name == name) {
        ResourceKey::Pilot(Arc::from(name))
    } else if scenario.cabin_crew.iter().any(|c| &*c.name == name) {
        ResourceKey::CabinCrew(Arc::from(name))
    } else {
        println!("No aircraft or crew member named {}", name);
        return;
    };

    let legs = ledger
        .duty_history(&key)
        .iter()
        .map(|id| ledger.leg(*id))
        .collect::<Vec<_>>();
    let minutes = legs.iter().map(|l| l.duration_minutes()).sum::<i64>();
    println!(
        "{}: {} completed legs, {}h{:02}m airborne",
        key,
        legs.len(),
        minutes / 60,
        minutes % 60
    );
    print_legs(ledger, &legs);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.end < args.start {
        return Err(format!("horizon ends ({}) before it starts ({})", args.end, args.start).into());
    }

    let scenario = Scenario::load_from_file(&args.scenario)?;
    let mut config = match &args.config {
        Some(path) => SchedulerConfig::load_from_file(path)?,
        None => SchedulerConfig::default(),
    };
    if args.pairing {
        config.pairing.enabled = true;
        config.validate()?;
    }
    println!(
        "Rostering online. Loaded {} aircraft, {} pilots, {} cabin crew and {} routes from {}",
        scenario.aircraft.len(),
        scenario.pilots.len(),
        scenario.cabin_crew.len(),
        scenario.routes.len(),
        args.scenario.display()
    );

    let scheduler = Scheduler::new(config);
    let ledger = scheduler.generate_schedule(
        &scenario, &scenario, &scenario, &scenario, args.start, args.end,
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "leg".to_string(),
            "duty".to_string(),
            "stats".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let (command, rest) = trimmed
                    .split_once(char::is_whitespace)
                    .map_or((trimmed, ""), |(c, r)| (c, r.trim()));
                match command {
                    "ls" => {
                        let legs = ledger
                            .legs()
                            .iter()
                            .filter(|l| match rest {
                                "c" | "completed" => l.status == LegStatus::Completed,
                                "f" | "failed" => l.status == LegStatus::Failed,
                                "p" | "pending" => !l.status.is_closed(),
                                _ => true,
                            })
                            .collect::<Vec<_>>();
                        print_legs(&ledger, &legs);
                    }
                    "leg" => {
                        if rest.is_empty() {
                            println!("Usage: leg <id>");
                        } else {
                            print_leg(&ledger, rest);
                        }
                    }
                    "duty" => {
                        if rest.is_empty() {
                            println!("Usage: duty <tail code | crew name>");
                        } else {
                            print_duty(&ledger, &scenario, rest);
                        }
                    }
                    "stats" => {
                        let summary = ledger.summary();
                        println!(
                            "{} to {}: {} legs, {} completed, {} failed, {} pending, {} partial",
                            ledger.start(),
                            ledger.end(),
                            summary.legs,
                            summary.completed,
                            summary.failed,
                            summary.pending,
                            summary.partial
                        );
                    }
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [status]        - List legs in a table or filter by status: c - completed, f - failed, p - pending");
                        println!("  leg <id>           - Show the aircraft and crew bound to leg <id>");
                        println!("  duty <tail|name>   - List completed legs of an aircraft or crew member");
                        println!("  stats              - Show the schedule summary");
                        println!("  help / ?           - Show this help menu");
                        println!("  exit / quit        - Exit the roster viewer\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", command),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
