//! Post-selection repair passes: deterministic transforms that fix residual
//! size and category imbalance, and backfill a displayed goalkeeper.

use crate::logic::partition::{CategoryCounts, Partition};
use crate::models::{PositionCategory, PositionTable, TeamPlayer};

/// Move the last player of `category` from `from` to `to`, keeping the counts current.
/// Falls back to the last player outright when the side has none of that category.
fn move_last_of_category(
    from: &mut Vec<usize>,
    to: &mut Vec<usize>,
    from_counts: &mut CategoryCounts,
    to_counts: &mut CategoryCounts,
    categories: &[PositionCategory],
    category: Option<PositionCategory>,
) {
    if from.is_empty() {
        return;
    }
    let idx = category
        .and_then(|c| from.iter().rposition(|&i| categories[i] == c))
        .unwrap_or(from.len() - 1);
    let moved = from.remove(idx);
    from_counts.remove(categories[moved]);
    to_counts.add(categories[moved]);
    to.push(moved);
}

/// Size repair: if the size gap exceeds 1, move `gap / 2` players from the
/// larger team, each time preferring the category with the largest count
/// surplus on that team.
pub fn repair_size(partition: Partition, categories: &[PositionCategory]) -> Partition {
    let gap = partition.size_gap();
    if gap <= 1 {
        return partition;
    }

    let yellow_larger = partition.yellow.len() > partition.blue.len();
    let (mut from, mut to) = if yellow_larger {
        (partition.yellow, partition.blue)
    } else {
        (partition.blue, partition.yellow)
    };
    let mut from_counts = CategoryCounts::tally(&from, categories);
    let mut to_counts = CategoryCounts::tally(&to, categories);

    for _ in 0..gap / 2 {
        let surplus = PositionCategory::ALL
            .iter()
            .copied()
            .filter(|&c| from_counts.get(c) > to_counts.get(c))
            .max_by_key(|&c| from_counts.get(c) - to_counts.get(c));
        move_last_of_category(
            &mut from,
            &mut to,
            &mut from_counts,
            &mut to_counts,
            categories,
            surplus,
        );
    }

    if yellow_larger {
        Partition { yellow: from, blue: to }
    } else {
        Partition { yellow: to, blue: from }
    }
}

/// Category repair: up to `max_rounds` times, move one player of the most
/// unbalanced category from the larger-count side to the other; stop once
/// every category difference is at most 1.
///
/// Deliberate heuristic limit: under adversarial rosters (say, one category
/// dominating both teams) the round cap can leave a difference above 1.
pub fn repair_category_balance(
    mut partition: Partition,
    categories: &[PositionCategory],
    max_rounds: usize,
) -> Partition {
    for _ in 0..max_rounds {
        let mut yellow_counts = CategoryCounts::tally(&partition.yellow, categories);
        let mut blue_counts = CategoryCounts::tally(&partition.blue, categories);
        let worst = PositionCategory::ALL
            .iter()
            .copied()
            .max_by_key(|&c| yellow_counts.get(c).abs_diff(blue_counts.get(c)));
        let Some(category) = worst else { break };
        if yellow_counts.get(category).abs_diff(blue_counts.get(category)) <= 1 {
            break;
        }
        if yellow_counts.get(category) > blue_counts.get(category) {
            move_last_of_category(
                &mut partition.yellow,
                &mut partition.blue,
                &mut yellow_counts,
                &mut blue_counts,
                categories,
                Some(category),
            );
        } else {
            move_last_of_category(
                &mut partition.blue,
                &mut partition.yellow,
                &mut blue_counts,
                &mut yellow_counts,
                categories,
                Some(category),
            );
        }
    }
    partition
}

/// True when the roster already displays a goalkeeper.
fn has_displayed_goalkeeper(roster: &[TeamPlayer], table: &PositionTable) -> bool {
    roster.iter().any(|t| {
        t.effective_position
            .as_deref()
            .is_some_and(|code| table.category(code).is_goalkeeper())
    })
}

/// Promote the first player who can cover goal: primary position is not
/// goalkeeper, but the secondary positions carry a goalkeeper code. Only the
/// display fields change; the wrapped player is untouched.
fn promote_cover_goalkeeper(roster: &mut [TeamPlayer], table: &PositionTable) {
    for team_player in roster.iter_mut() {
        let primary_is_goalkeeper = team_player
            .player
            .position
            .as_deref()
            .is_some_and(|code| table.category(code).is_goalkeeper());
        if primary_is_goalkeeper {
            continue;
        }
        let Some(idx) = team_player
            .effective_sub_positions
            .iter()
            .position(|code| table.category(code).is_goalkeeper())
        else {
            continue;
        };
        let goalkeeper_code = team_player.effective_sub_positions[idx].clone();
        match team_player.player.position.clone() {
            // The original primary takes the promoted code's slot.
            Some(primary) => team_player.effective_sub_positions[idx] = primary,
            None => {
                team_player.effective_sub_positions.remove(idx);
            }
        }
        team_player.effective_position = Some(goalkeeper_code);
        return;
    }
}

/// Goalkeeper backfill: when primary goalkeepers cannot cover both teams
/// (their total is odd or at most 1), each team without a displayed
/// goalkeeper gets at most one secondary-goalkeeper promoted for display.
/// Idempotent: a team already displaying a goalkeeper is left alone.
pub fn backfill_goalkeepers(
    yellow: &mut [TeamPlayer],
    blue: &mut [TeamPlayer],
    table: &PositionTable,
) {
    let primary_goalkeepers = yellow
        .iter()
        .chain(blue.iter())
        .filter(|t| {
            t.player
                .position
                .as_deref()
                .is_some_and(|code| table.category(code).is_goalkeeper())
        })
        .count();
    if primary_goalkeepers > 1 && primary_goalkeepers % 2 == 0 {
        return;
    }
    for roster in [&mut *yellow, &mut *blue] {
        if !has_displayed_goalkeeper(roster, table) {
            promote_cover_goalkeeper(roster, table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidatePlayer, TeamPlayer};
    use PositionCategory::{Defender as DF, Forward as FW, Goalkeeper as GK, Midfielder as MF};

    fn counts(side: &[usize], categories: &[PositionCategory]) -> CategoryCounts {
        CategoryCounts::tally(side, categories)
    }

    #[test]
    fn repair_size_moves_half_the_gap_from_surplus_categories() {
        // yellow has 6, blue has 2; yellow's surplus is all midfielders
        let categories = [MF, MF, MF, MF, FW, DF, FW, DF];
        let partition = Partition {
            yellow: vec![0, 1, 2, 3, 4, 5],
            blue: vec![6, 7],
        };
        let repaired = repair_size(partition, &categories);
        assert_eq!(repaired.yellow.len(), 4);
        assert_eq!(repaired.blue.len(), 4);
        // moved players should come from the midfielder surplus
        assert_eq!(counts(&repaired.blue, &categories).get(MF), 2);
    }

    #[test]
    fn repair_size_leaves_gap_of_one_alone() {
        let categories = [MF, MF, MF];
        let partition = Partition {
            yellow: vec![0, 1],
            blue: vec![2],
        };
        let repaired = repair_size(partition.clone(), &categories);
        assert_eq!(repaired, partition);
    }

    #[test]
    fn repair_category_balance_evens_out_a_lopsided_category() {
        // 4 defenders on yellow, 0 on blue; sizes stay equal
        let categories = [DF, DF, DF, DF, FW, FW, FW, FW];
        let partition = Partition {
            yellow: vec![0, 1, 2, 3],
            blue: vec![4, 5, 6, 7],
        };
        let repaired = repair_category_balance(partition, &categories, 10);
        let yellow = counts(&repaired.yellow, &categories);
        let blue = counts(&repaired.blue, &categories);
        assert!(yellow.get(DF).abs_diff(blue.get(DF)) <= 1);
        assert!(yellow.get(FW).abs_diff(blue.get(FW)) <= 1);
    }

    #[test]
    fn repair_category_balance_stops_at_the_round_cap() {
        // 30 goalkeepers vs 2: each round moves one, so 10 rounds close the
        // difference from 28 to 8. Improved, not perfected.
        let categories = vec![GK; 32];
        let partition = Partition {
            yellow: (0..30).collect(),
            blue: vec![30, 31],
        };
        let repaired = repair_category_balance(partition, &categories, 10);
        assert_eq!(repaired.yellow.len(), 20);
        assert_eq!(repaired.blue.len(), 12);
    }

    fn roster(players: Vec<CandidatePlayer>) -> Vec<TeamPlayer> {
        players.into_iter().map(TeamPlayer::new).collect()
    }

    #[test]
    fn backfill_promotes_a_secondary_goalkeeper() {
        let table = PositionTable::standard();
        let mut yellow = roster(vec![
            CandidatePlayer::member("Keeper", 5).with_position("GK"),
            CandidatePlayer::member("Anna", 5).with_position("CM"),
        ]);
        let mut blue = roster(vec![
            CandidatePlayer::member("Bea", 5)
                .with_position("CB")
                .with_sub_positions(["GK", "CM"]),
            CandidatePlayer::member("Cleo", 5).with_position("ST"),
        ]);
        backfill_goalkeepers(&mut yellow, &mut blue, &table);

        // yellow already has a keeper, untouched
        assert!(yellow.iter().all(|t| !t.is_backfilled()));
        let bea = &blue[0];
        assert_eq!(bea.effective_position.as_deref(), Some("GK"));
        assert_eq!(bea.effective_sub_positions, vec!["CB", "CM"]);
        assert_eq!(bea.player.position.as_deref(), Some("CB"));
        assert_eq!(bea.player.sub_positions, vec!["GK", "CM"]);
    }

    #[test]
    fn backfill_is_idempotent() {
        let table = PositionTable::standard();
        let mut yellow = roster(vec![
            CandidatePlayer::member("Ada", 5)
                .with_position("CB")
                .with_sub_positions(["GK"]),
            CandidatePlayer::member("Eli", 5)
                .with_position("CM")
                .with_sub_positions(["GK"]),
        ]);
        let mut blue = roster(vec![CandidatePlayer::member("Fay", 5).with_position("GK")]);
        backfill_goalkeepers(&mut yellow, &mut blue, &table);
        backfill_goalkeepers(&mut yellow, &mut blue, &table);

        let displayed: Vec<_> = yellow.iter().filter(|t| t.is_backfilled()).collect();
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].player.display_name, "Ada");
    }

    #[test]
    fn backfill_skips_when_goalkeepers_cover_both_teams() {
        let table = PositionTable::standard();
        let mut yellow = roster(vec![CandidatePlayer::member("Gus", 5).with_position("GK")]);
        let mut blue = roster(vec![
            CandidatePlayer::member("Hal", 5).with_position("GK"),
            CandidatePlayer::member("Ivy", 5)
                .with_position("CB")
                .with_sub_positions(["GK"]),
        ]);
        backfill_goalkeepers(&mut yellow, &mut blue, &table);
        assert!(blue.iter().all(|t| !t.is_backfilled()));
    }
}
