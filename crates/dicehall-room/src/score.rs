//! Category scoring.
//!
//! Pure functions over a [`Dice`] array. Dice that have not been rolled
//! (value 0) count toward nothing.

use dicehall_protocol::{Dice, ScoreCategory};

pub const FULL_HOUSE_SCORE: u32 = 25;
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
pub const YAHTZEE_SCORE: u32 = 50;

/// Occurrences of each face, indexed by face value. Index 0 is unused.
type FaceCounts = [u8; 7];

/// Scores `dice` in `category`.
pub fn score(dice: &Dice, category: ScoreCategory) -> u32 {
    let counts = face_counts(dice);

    if let Some(face) = category.face() {
        return u32::from(counts[usize::from(face)]) * u32::from(face);
    }

    match category {
        ScoreCategory::ThreeOfAKind => of_a_kind(&counts, 3),
        ScoreCategory::FourOfAKind => of_a_kind(&counts, 4),
        ScoreCategory::FullHouse if is_full_house(&counts) => FULL_HOUSE_SCORE,
        ScoreCategory::SmallStraight if is_small_straight(&counts) => {
            SMALL_STRAIGHT_SCORE
        }
        ScoreCategory::LargeStraight if is_large_straight(&counts) => {
            LARGE_STRAIGHT_SCORE
        }
        ScoreCategory::Yahtzee if counts.contains(&5) => YAHTZEE_SCORE,
        ScoreCategory::Chance => (1..=6u8)
            .map(|face| u32::from(counts[usize::from(face)]) * u32::from(face))
            .sum(),
        _ => 0,
    }
}

fn face_counts(dice: &Dice) -> FaceCounts {
    let mut counts = [0u8; 7];
    for die in dice.iter().filter(|d| d.is_rolled()) {
        counts[usize::from(die.value)] += 1;
    }
    counts
}

/// `face * n` for the lowest face showing at least `n` times.
fn of_a_kind(counts: &FaceCounts, n: u8) -> u32 {
    (1..=6u8)
        .find(|&face| counts[usize::from(face)] >= n)
        .map_or(0, |face| u32::from(face) * u32::from(n))
}

fn is_full_house(counts: &FaceCounts) -> bool {
    counts[1..].contains(&2) && counts[1..].contains(&3)
}

fn is_small_straight(counts: &FaceCounts) -> bool {
    [1usize, 2, 3]
        .iter()
        .any(|&start| counts[start..start + 4].iter().all(|&c| c > 0))
}

fn is_large_straight(counts: &FaceCounts) -> bool {
    [1usize, 2]
        .iter()
        .any(|&start| counts[start..start + 5].iter().all(|&c| c == 1))
}
