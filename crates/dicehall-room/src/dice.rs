//! Dice randomness.
//!
//! Rooms never touch a random number generator directly. They draw from
//! a [`DiceSource`], so tests can script every roll.

use std::sync::Arc;

use dicehall_protocol::Dice;
use rand::Rng;

/// A source of die faces and player picks.
pub trait DiceSource: Send + 'static {
    /// Returns a face value in `1..=6`.
    fn roll_face(&mut self) -> u8;

    /// Returns an index in `0..upper`. `upper` is never zero.
    fn pick_index(&mut self, upper: usize) -> usize;
}

/// Builds one [`DiceSource`] per room.
pub type DiceFactory = Arc<dyn Fn() -> Box<dyn DiceSource> + Send + Sync>;

/// Uniform randomness from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDice;

impl DiceSource for RandomDice {
    fn roll_face(&mut self) -> u8 {
        rand::rng().random_range(1..=6)
    }

    fn pick_index(&mut self, upper: usize) -> usize {
        rand::rng().random_range(0..upper)
    }
}

/// A factory handing every room its own [`RandomDice`].
pub fn random_dice() -> DiceFactory {
    Arc::new(|| -> Box<dyn DiceSource> { Box::new(RandomDice) })
}

/// Rolls every die that isn't held.
pub(crate) fn roll_unheld(dice: &mut Dice, source: &mut dyn DiceSource) {
    for die in dice.iter_mut().filter(|d| !d.held) {
        die.value = source.roll_face();
    }
}

/// Copies the held flags from a client's hint. Face values in the hint
/// are ignored.
pub(crate) fn apply_holds(dice: &mut Dice, hint: &Dice) {
    for (die, wanted) in dice.iter_mut().zip(hint) {
        die.held = wanted.held;
    }
}

/// Clears every held flag, keeping the faces.
pub(crate) fn release_all(dice: &mut Dice) {
    for die in dice.iter_mut() {
        die.held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDice;
    use dicehall_protocol::Die;

    #[test]
    fn test_random_dice_stays_in_range() {
        let mut source = RandomDice;
        for _ in 0..500 {
            let face = source.roll_face();
            assert!((1..=6).contains(&face));
            assert!(source.pick_index(4) < 4);
        }
    }

    #[test]
    fn test_roll_unheld_keeps_held_faces() {
        let mut dice = [Die::new(2); 5];
        dice[1].held = true;
        dice[4].held = true;
        let mut source = ScriptedDice::new([6]);

        roll_unheld(&mut dice, &mut source);

        let faces: Vec<u8> = dice.iter().map(|d| d.value).collect();
        assert_eq!(faces, vec![6, 2, 6, 6, 2]);
    }

    #[test]
    fn test_apply_holds_ignores_hint_faces() {
        let mut dice = [Die::new(3); 5];
        let mut hint = [Die::new(1); 5];
        hint[0].held = true;

        apply_holds(&mut dice, &hint);

        assert!(dice[0].held);
        assert!(!dice[1].held);
        assert!(dice.iter().all(|d| d.value == 3));
    }

    #[test]
    fn test_release_all() {
        let mut dice = [Die { value: 4, held: true }; 5];
        release_all(&mut dice);
        assert!(dice.iter().all(|d| !d.held && d.value == 4));
    }
}
