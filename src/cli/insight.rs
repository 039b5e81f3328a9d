//! CLI commands for tips and the motivational message

use chrono::NaiveDate;

use crate::services::insights::{motivational_message_for, pick_tip};
use crate::services::{EntropyTipSource, SeededTipSource};

/// Pick a tip, deterministically when a seed is given
pub fn tip_for_seed(seed: Option<u64>) -> &'static str {
    match seed {
        Some(seed) => pick_tip(&mut SeededTipSource::new(seed)),
        None => pick_tip(&mut EntropyTipSource),
    }
}

pub fn handle_tip_command(seed: Option<u64>) {
    println!("{}", tip_for_seed(seed));
}

pub fn handle_message_command(date: Option<NaiveDate>, today: NaiveDate) {
    println!("{}", motivational_message_for(date.unwrap_or(today)));
}
