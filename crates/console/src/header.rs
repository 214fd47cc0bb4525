use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::style::{bold, cyan, dim, green, magenta, meter};

pub const PRODUCT_NAME: &str = "GALXIUM";
pub const PRODUCT_VERSION: &str = "2.7.3";

pub const LOAD_MIN: f64 = 60.0;
pub const LOAD_MAX: f64 = 100.0;
const LOAD_START: f64 = 85.0;
const LOAD_STEP: f64 = 5.0;

pub const CLOCK_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");

/// Simulated system load, a bounded random walk advanced once per second.
#[derive(Debug)]
pub struct SystemLoad {
    value: f64,
    rng: StdRng,
}

impl SystemLoad {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            value: LOAD_START,
            rng,
        }
    }

    pub fn tick(&mut self) {
        let step = self.rng.gen_range(-LOAD_STEP..=LOAD_STEP);
        self.value = (self.value + step).clamp(LOAD_MIN, LOAD_MAX);
    }

    pub fn percent(&self) -> u8 {
        // Clamped to [60, 100], so the cast cannot truncate.
        self.value.round() as u8
    }
}

impl Default for SystemLoad {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_clock(at: OffsetDateTime) -> String {
    at.format(CLOCK_FORMAT)
        .unwrap_or_else(|_| "--:--:--".to_string())
}

pub fn render_header(load: &SystemLoad, now: OffsetDateTime) -> String {
    let percent = load.percent();
    let date = now
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| "----".to_string());

    format!(
        "{} {}  {}  SYS: {percent}% {}  {} {}",
        bold(&cyan(PRODUCT_NAME)),
        dim(&format!("Cosmic AI v{PRODUCT_VERSION}")),
        green("● ONLINE"),
        magenta(&meter(usize::from(percent), 100, 10)),
        bold(&format_clock(now)),
        dim(&format!("{date} - GALACTIC STANDARD")),
    )
}
