//! Handicap stroke allocation.
//!
//! A handicap `h` gives `h / 18` strokes on every hole plus one extra stroke
//! on the `h % 18` hardest holes (lowest stroke index first).

use crate::config::course::Course;
use crate::config::game_rules::COURSE_HOLES;
use crate::errors::domain::{GameError, ValidationKind};

pub const MAX_HANDICAP: u8 = 54;

pub fn validate_handicap(handicap: u8) -> Result<(), GameError> {
    if handicap > MAX_HANDICAP {
        return Err(GameError::validation(
            ValidationKind::Handicap,
            format!("handicap {handicap} outside 0..={MAX_HANDICAP}"),
        ));
    }
    Ok(())
}

pub fn validate_stroke_index(stroke_index: u8) -> Result<(), GameError> {
    if stroke_index == 0 || stroke_index > COURSE_HOLES {
        return Err(GameError::validation(
            ValidationKind::StrokeIndex,
            format!("stroke index {stroke_index} outside 1..={COURSE_HOLES}"),
        ));
    }
    Ok(())
}

/// Check that a card's stroke indexes are exactly a permutation of 1..=18.
pub fn validate_stroke_indexes(indexes: &[u8]) -> Result<(), GameError> {
    if indexes.len() != COURSE_HOLES as usize {
        return Err(GameError::validation(
            ValidationKind::StrokeIndex,
            format!("expected {COURSE_HOLES} stroke indexes, got {}", indexes.len()),
        ));
    }
    let mut seen = [false; COURSE_HOLES as usize];
    for &idx in indexes {
        validate_stroke_index(idx)?;
        let slot = &mut seen[idx as usize - 1];
        if *slot {
            return Err(GameError::validation(
                ValidationKind::StrokeIndex,
                format!("stroke index {idx} appears more than once"),
            ));
        }
        *slot = true;
    }
    Ok(())
}

/// Strokes a player with `handicap` receives on a hole of `stroke_index`.
pub fn strokes_received(handicap: u8, stroke_index: u8) -> Result<u8, GameError> {
    validate_handicap(handicap)?;
    validate_stroke_index(stroke_index)?;
    let base = handicap / COURSE_HOLES;
    let extra = handicap % COURSE_HOLES;
    Ok(base + u8::from(stroke_index <= extra))
}

pub fn net_score(gross: u8, handicap: u8, stroke_index: u8) -> Result<i16, GameError> {
    let strokes = strokes_received(handicap, stroke_index)?;
    Ok(i16::from(gross) - i16::from(strokes))
}

/// Strokes received on every hole of the course, in course order.
pub fn stroke_card(handicap: u8, course: &Course) -> Result<Vec<u8>, GameError> {
    course
        .holes
        .iter()
        .map(|h| strokes_received(handicap, h.stroke_index))
        .collect()
}
