//! REPL – the interactive navigation shell.
//!
//! Supported slash-commands:
//!   /route <from> <to>  – plan a route and start navigating
//!   /zone <from> <to>   – directions on the configured grid floor
//!   /next               – jump to the next segment
//!   /step [n]           – credit `n` detected steps (default 1)
//!   /heading <deg>      – check a compass heading against the route
//!   /scan <code>        – relocalize at a scanned position code
//!   /where              – current instruction, progress and position
//!   /voice              – toggle speech
//!   /lang <tag>         – switch language (en-US, te-IN, hi-IN)
//!   /export             – print the active route as JSON
//!   /help               – show this list
//!   /quit | /exit       – leave the shell

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Runtime;
use wayfinder_guidance::Language;
use wayfinder_map::ZoneLayout;
use wayfinder_runtime::{ScanCoordinator, SessionHandle, SimScanner};
use wayfinder_tracking::Advance;
use wayfinder_types::Route;

/// Everything the shell drives.
pub struct Shell {
    pub runtime: Runtime,
    pub session: SessionHandle,
    pub scanner: Arc<SimScanner>,
    pub coordinator: ScanCoordinator,
    pub zones: Option<ZoneLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Route { from: String, to: String },
    Zone { from: String, to: String },
    Next,
    Step(usize),
    Heading(f32),
    Scan(String),
    Where,
    Voice,
    Lang(Language),
    Export,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        let cmd = match (name, args.as_slice()) {
            ("/route", [from, to]) => Command::Route {
                from: from.to_string(),
                to: to.to_string(),
            },
            ("/route", _) => return Err("usage: /route <from> <to>".to_string()),
            ("/zone", [from, to]) => Command::Zone {
                from: from.to_string(),
                to: to.to_string(),
            },
            ("/zone", _) => return Err("usage: /zone <from> <to>".to_string()),
            ("/next", []) => Command::Next,
            ("/step", []) => Command::Step(1),
            ("/step", [n]) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Step(n),
                _ => return Err(format!("'{n}' is not a positive step count")),
            },
            ("/heading", [deg]) => match deg.parse::<f32>() {
                Ok(d) if d.is_finite() => Command::Heading(d),
                _ => return Err(format!("'{deg}' is not a heading in degrees")),
            },
            ("/heading", _) => return Err("usage: /heading <degrees>".to_string()),
            ("/scan", [code]) => Command::Scan(code.to_string()),
            ("/scan", _) => return Err("usage: /scan <code>".to_string()),
            ("/where", []) => Command::Where,
            ("/voice", []) => Command::Voice,
            ("/lang", [tag]) => Command::Lang(Language::from_tag(tag)),
            ("/lang", _) => return Err("usage: /lang <en-US|te-IN|hi-IN>".to_string()),
            ("/export", []) => Command::Export,
            ("/help", _) => Command::Help,
            ("/quit" | "/exit", _) => Command::Quit,
            (other, _) => return Err(format!("Unknown command: '{other}'")),
        };
        Ok(cmd)
    }
}

/// Entry point for the interactive REPL.  Returns on `/quit` or EOF.
pub fn run(mut shell: Shell) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", "wayfinder>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Command::parse(line) {
            Ok(Command::Quit) => {
                println!("{}", "Goodbye.".green());
                break;
            }
            Ok(cmd) => shell.execute(cmd),
            Err(msg) => println!(
                "{} Type {} for available commands.",
                msg.red(),
                "/help".bold()
            ),
        }
    }
}

impl Shell {
    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::Route { from, to } => self.cmd_route(&from, &to),
            Command::Zone { from, to } => self.cmd_zone(&from, &to),
            Command::Next => {
                let advance = self.block_on_session(|s| s.skip());
                report_advance(advance);
            }
            Command::Step(n) => {
                let advance = self.block_on_session(|s| {
                    let mut last = Advance::Ignored;
                    for _ in 0..n {
                        last = s.step();
                        if matches!(last, Advance::Arrived | Advance::Ignored) {
                            break;
                        }
                    }
                    last
                });
                report_advance(advance);
            }
            Command::Heading(deg) => {
                match self.block_on_session(|s| s.check_heading(deg, Instant::now())) {
                    Some(dev) => println!(
                        "  {} off by {:.0}°, turn around",
                        "Wrong direction:".yellow().bold(),
                        dev
                    ),
                    None => println!("  {}", "On course.".green()),
                }
            }
            Command::Scan(code) => self.cmd_scan(code),
            Command::Where => self.cmd_where(),
            Command::Voice => {
                let on = self.block_on_session(|s| s.toggle_voice());
                println!("  Voice {}", if on { "on".green() } else { "off".yellow() });
            }
            Command::Lang(language) => {
                self.block_on_session(|s| s.set_language(language));
                println!("  Language set to {}", language.to_string().bold());
            }
            Command::Export => match self.block_on_session(|s| s.export()) {
                Some(exchange) => match serde_json::to_string_pretty(&exchange) {
                    Ok(json) => println!("{json}"),
                    Err(e) => println!("{}: {}", "Export failed".red(), e),
                },
                None => println!("  {}", "No active route.".yellow()),
            },
            Command::Help => cmd_help(),
            Command::Quit => {}
        }
    }

    fn block_on_session<R>(
        &self,
        f: impl FnOnce(&mut wayfinder_runtime::NavigationSession) -> R,
    ) -> R {
        self.runtime.block_on(self.session.with(f))
    }

    fn cmd_route(&self, from: &str, to: &str) {
        let planned = self.block_on_session(|s| s.navigate(from, to).map(Route::clone));
        match planned {
            Ok(route) => print_route(&route),
            Err(e) => println!("  {}: {}", "Cannot route".red(), e),
        }
    }

    fn cmd_zone(&self, from: &str, to: &str) {
        let Some(layout) = &self.zones else {
            println!("  {}", "No zone map configured (zone_map in config.toml).".yellow());
            return;
        };
        match wayfinder_guidance::navigate_text(layout, from, to) {
            Ok(steps) => {
                for (i, text) in steps.iter().enumerate() {
                    println!("    {}. {}", i + 1, text);
                }
            }
            Err(e) => println!("  {}: {}", "Cannot route".red(), e),
        }
    }

    fn cmd_scan(&mut self, code: String) {
        self.scanner.push(code);
        let result = self
            .runtime
            .block_on(self.coordinator.scan_and_relocalize(&self.session));
        match result {
            Ok(Some(route)) => {
                println!("  {}", "Relocalized.".green().bold());
                print_route(&route);
            }
            Ok(None) => println!("  {}", "No code decoded.".yellow()),
            Err(e) => println!("  {}: {}", "Relocalization failed".red(), e),
        }
    }

    fn cmd_where(&self) {
        let snapshot = self.block_on_session(|s| {
            (
                s.current_text(),
                s.progress_label(),
                s.position(),
                s.destination().cloned(),
            )
        });
        match snapshot {
            (Some(text), Some(label), position, destination) => {
                println!("  {}", text.bold());
                println!("  {}", label.dimmed());
                if let Some(p) = position {
                    println!("  Position: ({:.1}, {:.1})", p.x, p.z);
                }
                if let Some(d) = destination {
                    println!("  Destination: {}", d.as_str().to_uppercase().bold());
                }
            }
            _ => println!("  {}", "No active route. Try /route c201 c214".yellow()),
        }
    }
}

fn print_route(route: &Route) {
    let path: Vec<String> = route.path.iter().map(|n| n.as_str().to_uppercase()).collect();
    println!("  {} {}", "Route:".bold(), path.join(" → "));
    println!("  {} {}m", "Distance:".bold(), route.distance);
    for (i, text) in route.instructions.iter().enumerate() {
        println!("    {}. {}", i + 1, text);
    }
}

fn report_advance(advance: Advance) {
    match advance {
        Advance::Moved => {}
        Advance::SegmentChanged(i) => println!("  {} {}", "Segment".cyan(), i + 1),
        Advance::Arrived => println!("  {}", "Arrived.".green().bold()),
        Advance::Ignored => println!("  {}", "Nothing to advance.".yellow()),
    }
}

fn cmd_help() {
    println!();
    println!("{}", "Wayfinder Commands".bold().underline());
    println!("  {}  – plan a route and start", "/route <from> <to>".bold().cyan());
    println!("  {}   – grid-floor directions", "/zone <from> <to>".bold().cyan());
    println!("  {}               – jump to the next segment", "/next".bold().cyan());
    println!("  {}           – credit detected steps", "/step [n]".bold().cyan());
    println!("  {}      – check a compass heading", "/heading <deg>".bold().cyan());
    println!("  {}        – relocalize at a scanned code", "/scan <code>".bold().cyan());
    println!("  {}              – where am I?", "/where".bold().cyan());
    println!("  {}              – toggle speech", "/voice".bold().cyan());
    println!("  {}         – en-US, te-IN or hi-IN", "/lang <tag>".bold().cyan());
    println!("  {}             – print the route as JSON", "/export".bold().cyan());
    println!("  {}       – exit", "/quit  /exit".bold().cyan());
    println!();
}
