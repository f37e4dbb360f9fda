// SPDX-License-Identifier: MIT
//
// acejump — jump to visible text by typing a label.
//
// This binary drives acejump-core over files loaded into a MemoryHost, one
// view per file, and talks to the user through plain lines:
//
//   files → MemoryHost views → AceJump::start → labeled windows on stdout
//   stdin line → Input event → AceJump::on_event → next batch or jump
//
// Input lines:
//
//   ""        return: drop the labels and show the next batch
//   "<label>" jump to the labeled target
//   EOF       cancel
//
// On a jump the final cursor is printed as `path:line:col` (1-indexed) and
// the process exits 0. A cancel or an unknown label exits 1.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use acejump_core::config::{Config, parse_set_arg};
use acejump_core::host::{Host, Input, ViewId};
use acejump_core::matcher::PatternKind;
use acejump_core::memory::MemoryHost;
use acejump_core::position::Selection;
use acejump_core::session::{AceJump, Jump, Status};
use acejump_core::word::line_end;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ACEJUMP_LOG";

// ─── Arguments ──────────────────────────────────────────────────────────────

/// What to jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Word starts.
    Word,
    /// Letters with two characters after them.
    Char,
    /// Non-blank line starts.
    Line,
    /// Word edges on the cursor's line.
    WithinLine,
}

impl From<Kind> for PatternKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Word => Self::WordStart,
            Kind::Char => Self::CharStart,
            Kind::Line => Self::LineStart,
            Kind::WithinLine => Self::WithinLine,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "acejump")]
#[command(about = "Jump to visible text by typing a label")]
#[command(version)]
struct Args {
    /// Files to open, one view each
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,

    /// What to jump to
    #[arg(long, short, value_enum, default_value_t = Kind::Word)]
    kind: Kind,

    /// Jump to matches of a regular expression instead
    #[arg(long, value_name = "PATTERN", conflicts_with = "kind")]
    regex: Option<String>,

    /// Label only the first file
    #[arg(long)]
    current_only: bool,

    /// Land behind the target (word end, line end, next char)
    #[arg(long)]
    after: bool,

    /// Extend the selection to the target (needs `selection_modes`)
    #[arg(long, conflicts_with_all = ["after", "add_cursor"])]
    select: bool,

    /// Add a cursor at the target (needs `selection_modes`)
    #[arg(long, conflicts_with = "after")]
    add_cursor: bool,

    /// Cursor position to start from, as `line:col` (1-indexed)
    #[arg(long, value_name = "LINE:COL")]
    cursor: Option<String>,

    /// First visible line (0-indexed)
    #[arg(long, default_value_t = 0)]
    top: usize,

    /// Number of visible lines
    #[arg(long)]
    height: Option<usize>,

    /// Settings file (TOML)
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override a setting: `key`, `nokey`, `key!`, or `key=value`
    #[arg(long = "set", value_name = "KEY[=VALUE]")]
    overrides: Vec<String>,
}

// ─── Setup ──────────────────────────────────────────────────────────────────

fn setup_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    for raw in &args.overrides {
        config
            .apply(&parse_set_arg(raw))
            .with_context(|| format!("bad --set {raw}"))?;
    }
    Ok(config)
}

/// Parse a 1-indexed `line:col` into a char offset of `view`.
fn parse_cursor(host: &MemoryHost, view: ViewId, spec: &str) -> Result<usize> {
    let Some((line, col)) = spec.split_once(':') else {
        bail!("cursor must look like LINE:COL, got {spec:?}");
    };
    let line: usize = line.trim().parse().context("bad cursor line")?;
    let col: usize = col.trim().parse().context("bad cursor column")?;
    if line == 0 || col == 0 {
        bail!("cursor line and column start at 1");
    }
    let buffer = host.buffer(view).context("no view to place the cursor in")?;
    let line_start = buffer.lines_span(line - 1, 1).begin;
    Ok((line_start + col - 1).min(line_end(buffer, line_start)))
}

// ─── Output ─────────────────────────────────────────────────────────────────

/// Display name of a view: its path, or `#n` for a scratch buffer.
fn view_name(host: &MemoryHost, view: ViewId) -> String {
    host.buffer(view)
        .and_then(|b| b.path())
        .map_or_else(|| view.to_string(), |p| p.display().to_string())
}

/// Print every view's visible window, labels included.
fn print_views<W: Write>(host: &MemoryHost, out: &mut W) -> io::Result<()> {
    for view in host.views_in_groups() {
        let window = host.visible_region(view);
        let text = host
            .buffer(view)
            .and_then(|b| b.slice(window))
            .unwrap_or_default();
        writeln!(out, "── {} ──", view_name(host, view))?;
        write!(out, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
    }
    out.flush()
}

/// `path:line:col` of a finished jump.
fn describe_jump(host: &MemoryHost, jump: Jump) -> String {
    let pos = host
        .buffer(jump.view)
        .map_or_else(|| jump.offset.to_string(), |b| b.offset_to_pos(jump.offset).to_string());
    format!("{}:{pos}", view_name(host, jump.view))
}

// ─── Driving ────────────────────────────────────────────────────────────────

/// Feed `input` lines to a started session until it ends.
fn drive<R: BufRead, W: Write>(
    ace: &mut AceJump,
    host: &mut MemoryHost,
    input: R,
    out: &mut W,
) -> Result<Option<Jump>> {
    print_views(host, out)?;
    let mut lines = input.lines();

    loop {
        let status = match lines.next() {
            None => ace.on_event(host, Input::Closed),
            Some(line) => {
                let line = line.context("failed to read input")?;
                let line = line.trim_end_matches('\r');
                if line.is_empty() {
                    ace.on_event(host, Input::Commit(String::new()))
                } else {
                    match ace.on_event(host, Input::Changed(line.to_string())) {
                        Status::Waiting => ace.on_event(host, Input::Commit(line.to_string())),
                        status => status,
                    }
                }
            }
        };
        debug!(?status, "input handled");

        match status {
            Status::Labeled(count) => {
                if count == 0 {
                    writeln!(out, "(no targets)")?;
                }
                print_views(host, out)?;
            }
            Status::Waiting => {}
            Status::Jumped(jump) => return Ok(Some(jump)),
            Status::Cancelled | Status::Idle => return Ok(None),
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = load_config(args)?;
    let mut ace = AceJump::new(config).context("invalid settings")?;

    let mut host = MemoryHost::new();
    for path in &args.files {
        let view = host
            .open_file(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        host.set_visible_lines(view, args.top, args.height.unwrap_or(usize::MAX));
    }
    let first = ViewId(0);
    if let Some(spec) = &args.cursor {
        let offset = parse_cursor(&host, first, spec)?;
        host.set_selections(first, &[Selection::cursor(offset)])?;
    }

    if args.after {
        ace.toggle_jump_after();
    }
    if args.select && !ace.toggle_select() {
        bail!("--select needs the selection_modes setting");
    }
    if args.add_cursor && !ace.toggle_add_cursor() {
        bail!("--add-cursor needs the selection_modes setting");
    }

    let kind = args
        .regex
        .clone()
        .map_or_else(|| args.kind.into(), PatternKind::Regex);
    if !ace.start(&mut host, kind, args.current_only)? {
        bail!("nothing to label");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match drive(&mut ace, &mut host, io::stdin().lock(), &mut out)? {
        Some(jump) => {
            info!(view = %jump.view, offset = jump.offset, "jump applied");
            writeln!(out, "{}", describe_jump(&host, jump))?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("acejump: no jump");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    setup_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("acejump: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
