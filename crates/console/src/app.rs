use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chat_reveal::{ChatSession, SubmitOutcome};
use time::OffsetDateTime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::commands::{parse_slash_command, SlashCommand, HELP_LINES};
use crate::header::{render_header, SystemLoad};
use crate::panels::render_status_panels;
use crate::render::TranscriptPrinter;
use crate::style::{dim, red, yellow};

pub const PROMPT: &str = "transmit › ";
const LOAD_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-mode console over one chat session.
pub struct Console<W: Write> {
    session: ChatSession,
    printer: TranscriptPrinter,
    load: SystemLoad,
    out: W,
    prompt_shown: bool,
}

impl<W: Write> Console<W> {
    pub fn new(session: ChatSession, load: SystemLoad, out: W) -> Self {
        Self {
            session,
            printer: TranscriptPrinter::new(),
            load,
            out,
            prompt_shown: false,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Prints the header and whatever the log already holds.
    pub fn start(&mut self) -> Result<()> {
        let header = render_header(&self.load, OffsetDateTime::now_utc());
        writeln!(self.out, "{header}")?;
        writeln!(self.out, "{}", dim("Type /help for console commands."))?;
        self.refresh()
    }

    /// Brings the transcript up to date and re-prompts once input is open again.
    pub fn refresh(&mut self) -> Result<()> {
        let snapshot = self.session.snapshot();
        let delta = self.printer.render(&snapshot);
        if !delta.is_empty() {
            self.prompt_shown = false;
            self.out.write_all(delta.as_bytes())?;
        }

        if !self.prompt_shown && !self.session.input_disabled() && !self.printer.line_open() {
            write!(self.out, "{}", dim(PROMPT))?;
            self.prompt_shown = true;
        }

        self.out.flush()?;
        Ok(())
    }

    pub fn tick(&mut self) {
        self.load.tick();
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        self.prompt_shown = false;

        if let Some(command) = parse_slash_command(line) {
            let flow = self.run_command(command)?;
            if flow == Flow::Continue {
                self.refresh()?;
            }
            return Ok(flow);
        }

        match self.session.submit(line)? {
            SubmitOutcome::Accepted(id) => debug!(%id, "transmission accepted"),
            SubmitOutcome::RejectedBlank => {}
            SubmitOutcome::RejectedBusy => {
                debug!("transmission dropped while a reply is in progress");
            }
        }

        self.refresh()?;
        Ok(Flow::Continue)
    }

    fn run_command(&mut self, command: SlashCommand) -> Result<Flow> {
        if command != SlashCommand::Quit {
            let pending = self.printer.break_line();
            self.out.write_all(pending.as_bytes())?;
        }

        match command {
            SlashCommand::Help => {
                for (name, summary) in HELP_LINES {
                    writeln!(self.out, "  {name:<10}{}", dim(summary))?;
                }
            }
            SlashCommand::Status => {
                let header = render_header(&self.load, OffsetDateTime::now_utc());
                writeln!(self.out, "{header}")?;
                let snapshot = self.session.snapshot();
                let lines = render_status_panels(
                    &snapshot,
                    self.session.turn_state(),
                    &self.session.source_profile(),
                );
                for line in lines {
                    writeln!(self.out, "{line}")?;
                }
                if let Some(fault) = self.session.last_fault() {
                    writeln!(self.out, "{}", red(&format!("last fault: {fault}")))?;
                }
            }
            SlashCommand::Dump => {
                let json = serde_json::to_string_pretty(&self.session.snapshot())
                    .context("failed to serialize conversation log")?;
                writeln!(self.out, "{json}")?;
            }
            SlashCommand::Quit => {
                self.shutdown()?;
                return Ok(Flow::Quit);
            }
            SlashCommand::Unknown(name) => {
                writeln!(self.out, "{}", yellow(&format!("unknown command {name}; try /help")))?;
            }
        }

        Ok(Flow::Continue)
    }

    /// Tears the session down and closes any half-printed line.
    pub fn shutdown(&mut self) -> Result<()> {
        self.session.teardown();
        let delta = self.printer.render(&self.session.snapshot());
        self.out.write_all(delta.as_bytes())?;
        if self.printer.line_open() {
            // The reply is frozen; drop its cursor instead of redrawing it.
            let closing = self.printer.break_line();
            self.out.write_all(closing.as_bytes())?;
        } else {
            writeln!(self.out)?;
        }
        writeln!(self.out, "{}", dim("Channel closed."))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Drives the console until `/quit`, end of input or Ctrl-C.
pub async fn run<W: Write>(mut console: Console<W>) -> Result<()> {
    let mut changes = console.session().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut load_ticks = tokio::time::interval(LOAD_TICK);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    console.start()?;

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                if let Err(error) = signal {
                    warn!(%error, "ctrl-c listener failed");
                }
                info!("interrupted");
                console.shutdown()?;
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    info!("end of input");
                    console.shutdown()?;
                    return Ok(());
                };
                if console.handle_line(&line)? == Flow::Quit {
                    return Ok(());
                }
            }
            changed = changes.changed() => {
                changed.context("conversation closed")?;
                console.refresh()?;
            }
            _ = load_ticks.tick() => console.tick(),
        }
    }
}
