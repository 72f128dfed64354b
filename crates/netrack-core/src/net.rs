//! Net score arithmetic.

/// Number of wrong answers that cancel one correct answer.
pub const WRONG_ANSWERS_PER_PENALTY: f64 = 4.0;

/// Net score for one subject: `max(0, correct - wrong / 4)`.
///
/// Counts are not checked against the subject's question count here.
pub fn calculate_net(correct: u32, wrong: u32) -> f64 {
    (f64::from(correct) - f64::from(wrong) / WRONG_ANSWERS_PER_PENALTY).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wrong_answers_keeps_correct() {
        for c in [0, 1, 17, 40, 120] {
            assert_eq!(calculate_net(c, 0), f64::from(c));
        }
    }

    #[test]
    fn four_wrong_cancel_one_correct() {
        assert!((calculate_net(30, 8) - 28.0).abs() < f64::EPSILON);
        assert!((calculate_net(10, 3) - 9.25).abs() < f64::EPSILON);
    }

    #[test]
    fn never_negative() {
        assert_eq!(calculate_net(0, 40), 0.0);
        assert_eq!(calculate_net(1, 400), 0.0);
        assert_eq!(calculate_net(0, u32::MAX), 0.0);
        for c in 0..20 {
            for w in 0..100 {
                assert!(calculate_net(c, w) >= 0.0);
            }
        }
    }
}
