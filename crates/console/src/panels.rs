//! Static system panels shown by `/status`.

use chat_reveal::{speaker_counts, Message, SourceProfile, TurnState};
use unicode_width::UnicodeWidthStr;

use crate::style::{bold, cyan, dim, green, meter};

const SYSTEM_STATUS: [(&str, &str); 4] = [
    ("Core Temp", "2.7K"),
    ("Power", "OPTIMAL"),
    ("Network", "GALACTIC"),
    ("Shields", "ACTIVE"),
];

struct AiModule {
    name: &'static str,
    load: usize,
}

const AI_MODULES: [AiModule; 4] = [
    AiModule {
        name: "Quantum Analytics",
        load: 45,
    },
    AiModule {
        name: "Deep Learning Core",
        load: 72,
    },
    AiModule {
        name: "Predictive Engine",
        load: 23,
    },
    AiModule {
        name: "Language Processor",
        load: 89,
    },
];

fn section(title: &str) -> String {
    bold(&cyan(title))
}

const LABEL_COLUMNS: usize = 20;

fn row(label: &str, value: &str) -> String {
    let label = format!("{label}:");
    let padding = LABEL_COLUMNS.saturating_sub(label.width());
    format!("  {}{}{value}", dim(&label), " ".repeat(padding))
}

pub fn render_status_panels(
    snapshot: &[Message],
    turn: TurnState,
    source: &SourceProfile,
) -> Vec<String> {
    let (user, agent) = speaker_counts(snapshot);
    let mut lines = vec![section("System Status")];
    lines.extend(SYSTEM_STATUS.iter().map(|(label, value)| row(label, &green(value))));

    lines.push(section("Memory Core"));
    lines.push(row("Capacity", "1.8 PB / 2.4 PB"));
    lines.push(row("Efficiency", &format!("87% {}", meter(87, 100, 10))));
    lines.push(row("Active Threads", "15,847"));

    lines.push(section("Mission Logs"));
    lines.push(row("Active", "3"));
    lines.push(row("Completed", "1,247"));
    lines.push(row("Last Mission", "Deep Space Reconnaissance"));
    lines.push(row("Success Rate", "98.7%"));

    lines.push(section("AI Modules"));
    lines.push(row("Installed", "12 (8 active)"));
    lines.extend(AI_MODULES.iter().map(|module| {
        row(
            module.name,
            &format!("{} {:>3}% ACTIVE", meter(module.load, 100, 10), module.load),
        )
    }));

    lines.push(section("Channel"));
    lines.push(row("Turn", &turn.to_string()));
    lines.push(row("Transmissions", &format!("{user} sent, {agent} received")));
    lines.push(row(
        "Response Source",
        &format!("{} ({} replies)", source.source_id, source.pool_size),
    ));

    lines
}
