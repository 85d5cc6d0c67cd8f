//! Prompt-driven prediction session
//!
//! Reads match states line by line and prints a range or an error for each.
//! Bad input, a missing model and prediction failures are reported and the
//! session continues. It ends on an empty line, `quit`, end of input, or an
//! I/O error on the input or output.

use std::io::{BufRead, Lines, Write};

use super::inference::{format_estimate, ScorePredictor};
use crate::features::MatchState;
use crate::model::ScoreModel;
use crate::{Result, ScoreError, Team, ValidationPolicy};

/// Outcome counts for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub predictions: usize,
    pub errors: usize,
}

/// Run a session until the user quits.
///
/// `load` is called lazily before the first prediction and again after each
/// failed load, so a model that becomes available mid-session is picked up.
pub fn run_session<R, W, M, L>(
    input: R,
    out: &mut W,
    policy: ValidationPolicy,
    mut load: L,
) -> Result<SessionSummary>
where
    R: BufRead,
    W: Write,
    M: ScoreModel,
    L: FnMut() -> Result<M>,
{
    let mut lines = input.lines();
    let mut predictor: Option<ScorePredictor<M>> = None;
    let mut summary = SessionSummary::default();

    loop {
        let state = match read_state(&mut lines, out) {
            Ok(Some(state)) => state,
            Ok(None) => break,
            Err(e @ ScoreError::Io(_)) => return Err(e),
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                summary.errors += 1;
                continue;
            }
        };

        if predictor.is_none() {
            match load() {
                Ok(model) => predictor = Some(ScorePredictor::with_policy(model, policy)),
                Err(e) => {
                    log::warn!("Model load failed: {}", e);
                    writeln!(out, "Error: {}", e)?;
                    summary.errors += 1;
                    continue;
                }
            }
        }
        let Some(p) = predictor.as_ref() else {
            continue;
        };

        match p.compute_range(&state) {
            Ok(estimate) => {
                write!(out, "{}", format_estimate(&state, &estimate))?;
                summary.predictions += 1;
            }
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                summary.errors += 1;
            }
        }
    }

    Ok(summary)
}

fn prompt<B: BufRead, W: Write>(
    lines: &mut Lines<B>,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(out, "{}: ", label)?;
    out.flush()?;
    match lines.next() {
        Some(line) => {
            let line = line?.trim().to_string();
            if line.is_empty() || line.eq_ignore_ascii_case("quit") {
                Ok(None)
            } else {
                Ok(Some(line))
            }
        }
        None => Ok(None),
    }
}

fn prompt_parsed<B: BufRead, W: Write, T: std::str::FromStr>(
    lines: &mut Lines<B>,
    out: &mut W,
    label: &str,
) -> Result<Option<T>> {
    match prompt(lines, out, label)? {
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|_| ScoreError::Parse(format!("invalid value for {}: '{}'", label, s))),
        None => Ok(None),
    }
}

fn read_state<B: BufRead, W: Write>(
    lines: &mut Lines<B>,
    out: &mut W,
) -> Result<Option<MatchState>> {
    let Some(batting) = prompt(lines, out, "\nBatting team")? else {
        return Ok(None);
    };
    let batting: Team = batting.parse()?;
    let Some(bowling) = prompt(lines, out, "Bowling team")? else {
        return Ok(None);
    };
    let bowling: Team = bowling.parse()?;

    let Some(overs) = prompt_parsed::<_, _, f64>(lines, out, "Current over")? else {
        return Ok(None);
    };
    let Some(runs) = prompt_parsed::<_, _, u32>(lines, out, "Current runs")? else {
        return Ok(None);
    };
    let Some(wickets) = prompt_parsed::<_, _, u32>(lines, out, "Wickets fallen")? else {
        return Ok(None);
    };
    let Some(runs_last_5) = prompt_parsed::<_, _, u32>(lines, out, "Runs in last 5 overs")? else {
        return Ok(None);
    };
    let Some(wickets_last_5) = prompt_parsed::<_, _, u32>(lines, out, "Wickets in last 5 overs")?
    else {
        return Ok(None);
    };

    Ok(Some(MatchState::new(
        batting,
        bowling,
        overs,
        runs,
        wickets,
        runs_last_5,
        wickets_last_5,
    )))
}
