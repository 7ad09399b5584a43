//! Option shuffling, round sampling and percentage helpers.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Question, QuestionError, Specimen};

/// Prompt shown for every Nature Lab round.
pub const NATURE_PROMPT: &str = "What animal is this?";

/// Rounded percentage (`round(score / total * 100)`), 0 when `total` is 0.
#[must_use]
pub fn percent(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (u64::from(score) * 200 + u64::from(total)) / (u64::from(total) * 2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Fisher–Yates shuffle into a new vector.
#[must_use]
pub fn shuffled<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items
}

/// Up to `n` distinct elements in random order.
#[must_use]
pub fn sample_distinct<T: Clone, R: Rng + ?Sized>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut picked = shuffled(items.to_vec(), rng);
    picked.truncate(n);
    picked
}

/// Build a trivia question: the correct answer plus distractors, shuffled.
///
/// # Errors
///
/// Returns `QuestionError` if the combined options do not form a valid question.
pub fn build_question<R: Rng + ?Sized>(
    prompt: String,
    correct: String,
    incorrect: Vec<String>,
    rng: &mut R,
) -> Result<Question, QuestionError> {
    let mut options = Vec::with_capacity(incorrect.len() + 1);
    options.push(correct.clone());
    options.extend(incorrect);
    Question::new(prompt, correct, shuffled(options, rng))
}

/// Pick a target specimen and one distractor with a different title.
///
/// Returns `None` when the pool has fewer than two distinct titles.
#[must_use]
pub fn nature_round<R: Rng + ?Sized>(pool: &[Specimen], rng: &mut R) -> Option<Question> {
    let order = shuffled((0..pool.len()).collect::<Vec<_>>(), rng);
    let (&target_idx, rest) = order.split_first()?;
    let target = &pool[target_idx];
    let distractor = rest
        .iter()
        .map(|&idx| &pool[idx])
        .find(|candidate| candidate.title != target.title)?;

    let options = shuffled(vec![target.title.clone(), distractor.title.clone()], rng);
    Question::new(NATURE_PROMPT, target.title.clone(), options)
        .ok()
        .map(|question| question.with_specimen(target.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn specimen(title: &str) -> Specimen {
        Specimen::new(title, None, format!("/img/{title}.jpg"))
    }

    #[test]
    fn percent_matches_half_up_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(10, 10), 100);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(0, 5), 0);
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut out = shuffled((0..20).collect::<Vec<_>>(), &mut rng);
        out.sort_unstable();
        assert_eq!(out, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn sample_distinct_caps_at_len() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_distinct(&[1, 2, 3], 2, &mut rng).len(), 2);
        assert_eq!(sample_distinct(&[1, 2, 3], 10, &mut rng).len(), 3);
        assert!(sample_distinct::<u8, _>(&[], 2, &mut rng).is_empty());
    }

    #[test]
    fn build_question_contains_all_answers() {
        let mut rng = StdRng::seed_from_u64(42);
        let q = build_question(
            "Largest planet?".into(),
            "Jupiter".into(),
            vec!["Mars".into(), "Venus".into(), "Earth".into()],
            &mut rng,
        )
        .unwrap();
        let mut options = q.options().to_vec();
        options.sort();
        assert_eq!(options, ["Earth", "Jupiter", "Mars", "Venus"]);
        assert_eq!(q.correct_answer(), "Jupiter");
    }

    #[test]
    fn nature_round_uses_two_distinct_titles() {
        let pool = vec![specimen("Fox"), specimen("Owl"), specimen("Fox")];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let q = nature_round(&pool, &mut rng).unwrap();
            assert_eq!(q.options().len(), 2);
            assert_ne!(q.options()[0], q.options()[1]);
            let specimen = q.specimen().unwrap();
            assert_eq!(specimen.title, q.correct_answer());
            assert_eq!(q.prompt(), NATURE_PROMPT);
        }
    }

    #[test]
    fn nature_round_needs_two_titles() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(nature_round(&[specimen("Fox")], &mut rng).is_none());
        assert!(nature_round(&[specimen("Fox"), specimen("Fox")], &mut rng).is_none());
        assert!(nature_round(&[], &mut rng).is_none());
    }
}
