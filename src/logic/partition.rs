//! Candidate partitions: one trial's proposed yellow/blue split, plus the
//! measurements and score used to rank it.

use crate::models::{CandidatePlayer, PositionCategory};

/// A proposed split, as index sets over the engine's input slice.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Partition {
    pub yellow: Vec<usize>,
    pub blue: Vec<usize>,
}

impl Partition {
    pub fn size_gap(&self) -> usize {
        self.yellow.len().abs_diff(self.blue.len())
    }
}

/// Per-category player counts for one side of a partition.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CategoryCounts([usize; PositionCategory::ALL.len()]);

impl CategoryCounts {
    /// Count the given player indices by their category.
    pub fn tally(indices: &[usize], categories: &[PositionCategory]) -> Self {
        let mut counts = Self::default();
        for &i in indices {
            counts.add(categories[i]);
        }
        counts
    }

    pub fn get(&self, category: PositionCategory) -> usize {
        self.0[category as usize]
    }

    pub fn add(&mut self, category: PositionCategory) {
        self.0[category as usize] += 1;
    }

    pub fn remove(&mut self, category: PositionCategory) {
        self.0[category as usize] = self.0[category as usize].saturating_sub(1);
    }
}

/// Everything a partition is judged by: sizes, per-category counts, averages.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionMetrics {
    pub yellow_size: usize,
    pub blue_size: usize,
    pub yellow_counts: CategoryCounts,
    pub blue_counts: CategoryCounts,
    pub yellow_average: f64,
    pub blue_average: f64,
}

impl PartitionMetrics {
    pub fn measure(
        partition: &Partition,
        players: &[CandidatePlayer],
        categories: &[PositionCategory],
    ) -> Self {
        let average = |side: &[usize]| {
            if side.is_empty() {
                0.0
            } else {
                side.iter().map(|&i| players[i].skill_score()).sum::<f64>() / side.len() as f64
            }
        };
        Self {
            yellow_size: partition.yellow.len(),
            blue_size: partition.blue.len(),
            yellow_counts: CategoryCounts::tally(&partition.yellow, categories),
            blue_counts: CategoryCounts::tally(&partition.blue, categories),
            yellow_average: average(&partition.yellow),
            blue_average: average(&partition.blue),
        }
    }

    pub fn size_gap(&self) -> usize {
        self.yellow_size.abs_diff(self.blue_size)
    }

    fn category_diff(&self, category: PositionCategory) -> usize {
        self.yellow_counts
            .get(category)
            .abs_diff(self.blue_counts.get(category))
    }

    /// Largest per-category count difference across all categories.
    pub fn max_category_diff(&self) -> usize {
        PositionCategory::ALL
            .iter()
            .map(|&c| self.category_diff(c))
            .max()
            .unwrap_or(0)
    }

    /// Sum of per-category count differences.
    pub fn total_category_diff(&self) -> usize {
        PositionCategory::ALL
            .iter()
            .map(|&c| self.category_diff(c))
            .sum()
    }

    pub fn skill_diff(&self) -> f64 {
        (self.yellow_average - self.blue_average).abs()
    }

    /// Rank score, higher is better.
    ///
    /// 1. Squad-size parity dominates: equal +10000, off-by-one +5000, larger
    ///    gaps score 0 (and are filtered before scores are ever compared).
    /// 2. Per category present in either team, a bonus by count difference:
    ///    0 -> +1000, 1 -> +500, 2 -> +100, >=3 -> +0. A max difference >= 2
    ///    anywhere costs a flat -10000: one badly unbalanced position
    ///    category outweighs everything else.
    /// 3. Skill parity is the finest tiebreak: +max(0, 100 - 10 * avg diff).
    pub fn score(&self) -> f64 {
        let mut score = match self.size_gap() {
            0 => 10_000.0,
            1 => 5_000.0,
            _ => return 0.0,
        };
        let mut max_diff = 0;
        for category in PositionCategory::ALL {
            let yellow = self.yellow_counts.get(category);
            let blue = self.blue_counts.get(category);
            if yellow == 0 && blue == 0 {
                continue;
            }
            let diff = yellow.abs_diff(blue);
            max_diff = max_diff.max(diff);
            score += match diff {
                0 => 1_000.0,
                1 => 500.0,
                2 => 100.0,
                _ => 0.0,
            };
        }
        if max_diff >= 2 {
            score -= 10_000.0;
        }
        score + (100.0 - 10.0 * self.skill_diff()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidatePlayer;

    fn players_with_skills(skills: &[u8]) -> Vec<CandidatePlayer> {
        skills
            .iter()
            .enumerate()
            .map(|(i, &s)| CandidatePlayer::member(format!("P{i}"), s))
            .collect()
    }

    fn metrics(
        yellow: Vec<usize>,
        blue: Vec<usize>,
        skills: &[u8],
        categories: &[PositionCategory],
    ) -> PartitionMetrics {
        let players = players_with_skills(skills);
        PartitionMetrics::measure(&Partition { yellow, blue }, &players, categories)
    }

    #[test]
    fn equal_sizes_and_balanced_category_score_high() {
        use PositionCategory::Midfielder as MF;
        let m = metrics(vec![0, 1], vec![2, 3], &[5, 5, 5, 5], &[MF, MF, MF, MF]);
        // 10000 size + 1000 category + 100 skill
        assert_eq!(m.score(), 11_100.0);
    }

    #[test]
    fn off_by_one_size_scores_5000_base() {
        use PositionCategory::Midfielder as MF;
        let m = metrics(vec![0, 1], vec![2], &[5, 5, 5], &[MF, MF, MF]);
        // 5000 size + 500 category (diff 1) + 100 skill
        assert_eq!(m.score(), 5_600.0);
    }

    #[test]
    fn size_gap_beyond_one_scores_zero() {
        use PositionCategory::Midfielder as MF;
        let m = metrics(vec![0, 1, 2], vec![], &[5, 5, 5], &[MF, MF, MF]);
        assert_eq!(m.score(), 0.0);
    }

    #[test]
    fn category_diff_of_two_takes_flat_penalty() {
        use PositionCategory::{Forward as FW, Midfielder as MF};
        // yellow: 2 MF, blue: 2 FW -> both categories at diff 2
        let m = metrics(vec![0, 1], vec![2, 3], &[5, 5, 5, 5], &[MF, MF, FW, FW]);
        // 10000 size + 100 + 100 category - 10000 penalty + 100 skill
        assert_eq!(m.score(), 300.0);
    }

    #[test]
    fn skill_parity_is_a_bounded_tiebreak() {
        use PositionCategory::Midfielder as MF;
        let even = metrics(vec![0, 1], vec![2, 3], &[5, 5, 5, 5], &[MF, MF, MF, MF]);
        let skewed = metrics(vec![0, 1], vec![2, 3], &[10, 10, 1, 1], &[MF, MF, MF, MF]);
        let diff = even.score() - skewed.score();
        assert!(diff > 0.0 && diff <= 100.0);
    }

    #[test]
    fn absent_categories_contribute_nothing() {
        use PositionCategory::Midfielder as MF;
        let m = metrics(vec![0], vec![1], &[5, 5], &[MF, MF]);
        // 10000 size + 1000 MF + 100 skill, nothing for the other four categories
        assert_eq!(m.score(), 11_100.0);
    }

    #[test]
    fn measure_reports_sizes_counts_and_averages() {
        use PositionCategory::{Defender as DF, Goalkeeper as GK};
        let m = metrics(vec![0, 1], vec![2], &[2, 4, 9], &[GK, DF, DF]);
        assert_eq!(m.yellow_size, 2);
        assert_eq!(m.blue_size, 1);
        assert_eq!(m.yellow_counts.get(GK), 1);
        assert_eq!(m.yellow_counts.get(DF), 1);
        assert_eq!(m.blue_counts.get(DF), 1);
        assert_eq!(m.yellow_average, 3.0);
        assert_eq!(m.blue_average, 9.0);
        assert_eq!(m.max_category_diff(), 1);
        assert_eq!(m.total_category_diff(), 1);
    }
}
