use std::io::{self, Write};
use std::time::Duration;

use crate::header::{PRODUCT_NAME, PRODUCT_VERSION};
use crate::style::{bold, cyan, dim, green, meter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootStep {
    pub text: &'static str,
    pub delay_ms: u64,
}

pub const BOOT_STEPS: [BootStep; 5] = [
    BootStep {
        text: "Initializing quantum neural matrix...",
        delay_ms: 800,
    },
    BootStep {
        text: "Loading cosmic consciousness protocols...",
        delay_ms: 1000,
    },
    BootStep {
        text: "Establishing deep space communications...",
        delay_ms: 900,
    },
    BootStep {
        text: "Activating galactic defense systems...",
        delay_ms: 700,
    },
    BootStep {
        text: "Galxium AI core online. Welcome, Commander.",
        delay_ms: 1200,
    },
];

pub const BOOT_COMPLETE_PAUSE_MS: u64 = 1500;
const PROGRESS_WIDTH: usize = 20;

pub fn progress_line(completed: usize) -> String {
    let total = BOOT_STEPS.len();
    format!(
        "{} {:>3}%",
        cyan(&meter(completed, total, PROGRESS_WIDTH)),
        completed * 100 / total
    )
}

/// Plays the boot sequence: each step is shown, held for its delay, then
/// checked off.
pub async fn run_boot<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", bold(&cyan(PRODUCT_NAME)))?;
    writeln!(out, "{}", dim(&format!("Cosmic Intelligence System v{PRODUCT_VERSION}")))?;

    for (index, step) in BOOT_STEPS.iter().enumerate() {
        write!(out, "{}  {}", progress_line(index), step.text)?;
        out.flush()?;
        tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
        writeln!(out, " {}", green("✓"))?;
    }

    writeln!(out, "{}", progress_line(BOOT_STEPS.len()))?;
    out.flush()?;
    tokio::time::sleep(Duration::from_millis(BOOT_COMPLETE_PAUSE_MS)).await;
    Ok(())
}
