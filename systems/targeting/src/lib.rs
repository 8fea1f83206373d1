#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure range queries over snapshots of live combat agents.
//!
//! Every query is a linear scan over the provided candidates. Candidates that
//! are no longer targetable (dead monsters, benched or fallen heroes) are
//! skipped, so callers may pass snapshots that went stale mid-tick.

use ember_keepers_core::{HeroSnapshot, MonsterSnapshot, Position};

/// Agent that range queries can select.
pub trait Targetable {
    /// Current location.
    fn position(&self) -> Position;

    /// Whether the agent may be selected at all.
    fn is_targetable(&self) -> bool;
}

impl Targetable for MonsterSnapshot {
    fn position(&self) -> Position {
        self.position
    }

    fn is_targetable(&self) -> bool {
        self.is_alive()
    }
}

impl Targetable for HeroSnapshot {
    fn position(&self) -> Position {
        self.position
    }

    fn is_targetable(&self) -> bool {
        self.is_fighting()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    index: usize,
}

impl BestCandidate {
    /// Closer wins; equal distances go to the candidate seen first.
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.index < other.index
    }
}

/// Closest targetable candidate within `max_range` of `origin`.
#[must_use]
pub fn nearest<'a, T, I>(origin: Position, max_range: f32, candidates: I) -> Option<&'a T>
where
    T: Targetable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let max_distance_sq = max_range * max_range;
    let mut best: Option<(BestCandidate, &'a T)> = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        if !candidate.is_targetable() {
            continue;
        }
        let distance_sq = origin.distance_squared(candidate.position());
        if distance_sq > max_distance_sq {
            continue;
        }

        let current = BestCandidate { distance_sq, index };
        match &mut best {
            Some((existing, agent)) => {
                if current.precedes(existing) {
                    *existing = current;
                    *agent = candidate;
                }
            }
            None => best = Some((current, candidate)),
        }
    }

    best.map(|(_, agent)| agent)
}

/// Every targetable candidate within `radius` of `origin`, in iteration order.
#[must_use]
pub fn in_range<'a, T, I>(origin: Position, radius: f32, candidates: I) -> Vec<&'a T>
where
    T: Targetable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let radius_sq = radius * radius;
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate.is_targetable() && origin.distance_squared(candidate.position()) <= radius_sq
        })
        .collect()
}

/// Number of targetable candidates within `radius` of `origin`.
#[must_use]
pub fn count_in_range<'a, T, I>(origin: Position, radius: f32, candidates: I) -> usize
where
    T: Targetable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let radius_sq = radius * radius;
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate.is_targetable() && origin.distance_squared(candidate.position()) <= radius_sq
        })
        .count()
}

/// First targetable candidate whose distance lies strictly between `min` and `max`.
#[must_use]
pub fn first_in_band<'a, T, I>(origin: Position, min: f32, max: f32, candidates: I) -> Option<&'a T>
where
    T: Targetable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidates.into_iter().find(|candidate| {
        if !candidate.is_targetable() {
            return false;
        }
        let distance = origin.distance(candidate.position());
        distance > min && distance < max
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_keepers_core::{Element, MonsterId, MonsterRank, MonsterView, Resistances, TemplateId};

    fn monster(id: u32, x: f32, z: f32, health: f32) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(id),
            template: TemplateId::new("whisper"),
            rank: MonsterRank::Normal,
            level: 1,
            position: Position::new(x, z),
            health,
            max_health: 50.0,
            affinity: Element::None,
            resistances: Resistances::NONE,
            attack_damage: 5.0,
            attack_ready: true,
            move_speed: 3.0,
            taunted_by: None,
            statuses: Vec::new(),
        }
    }

    fn ids(found: &[&MonsterSnapshot]) -> Vec<u32> {
        found.iter().map(|snapshot| snapshot.id.get()).collect()
    }

    #[test]
    fn nearest_picks_closest_within_range() {
        let view = MonsterView::from_snapshots(vec![
            monster(1, 6.0, 0.0, 50.0),
            monster(2, 3.0, 0.0, 50.0),
            monster(3, 0.0, 12.0, 50.0),
        ]);
        let found = nearest(Position::ORIGIN, 10.0, view.iter()).expect("target");
        assert_eq!(found.id, MonsterId::new(2));
    }

    #[test]
    fn nothing_in_range_yields_none() {
        let view = MonsterView::from_snapshots(vec![monster(1, 20.0, 20.0, 50.0)]);
        assert!(nearest(Position::ORIGIN, 10.0, view.iter()).is_none());
    }

    #[test]
    fn ties_keep_the_first_candidate_found() {
        let view = MonsterView::from_snapshots(vec![
            monster(4, 0.0, 5.0, 50.0),
            monster(9, 5.0, 0.0, 50.0),
            monster(7, -5.0, 0.0, 50.0),
        ]);
        let found = nearest(Position::ORIGIN, 5.0, view.iter()).expect("target");
        assert_eq!(found.id, MonsterId::new(4));
    }

    #[test]
    fn ties_follow_iteration_order_not_ids() {
        let candidates = [
            monster(6, 8.0, 0.0, 50.0),
            monster(9, 0.0, -5.0, 50.0),
            monster(4, 5.0, 0.0, 50.0),
        ];
        let found = nearest(Position::ORIGIN, 10.0, candidates.iter()).expect("target");
        assert_eq!(found.id, MonsterId::new(9));

        let later = BestCandidate {
            distance_sq: 25.0,
            index: 2,
        };
        let earlier = BestCandidate {
            distance_sq: 25.0,
            index: 1,
        };
        assert!(earlier.precedes(&later));
        assert!(!later.precedes(&earlier));
        assert!(!earlier.precedes(&earlier));
    }

    #[test]
    fn dead_candidates_are_skipped() {
        let view = MonsterView::from_snapshots(vec![
            monster(1, 1.0, 0.0, 0.0),
            monster(2, 4.0, 0.0, 10.0),
        ]);
        let found = nearest(Position::ORIGIN, 10.0, view.iter()).expect("target");
        assert_eq!(found.id, MonsterId::new(2));
        assert_eq!(ids(&in_range(Position::ORIGIN, 10.0, view.iter())), vec![2]);
        assert_eq!(count_in_range(Position::ORIGIN, 10.0, view.iter()), 1);
    }

    #[test]
    fn in_range_includes_the_boundary() {
        let view = MonsterView::from_snapshots(vec![
            monster(1, 3.0, 4.0, 50.0),
            monster(2, 3.0, 4.1, 50.0),
        ]);
        assert_eq!(ids(&in_range(Position::ORIGIN, 5.0, view.iter())), vec![1]);
    }

    #[test]
    fn band_excludes_both_edges() {
        let view = MonsterView::from_snapshots(vec![
            monster(1, 3.0, 0.0, 50.0),
            monster(2, 9.0, 0.0, 50.0),
            monster(3, 5.0, 0.0, 50.0),
        ]);
        let found = first_in_band(Position::ORIGIN, 3.0, 8.4, view.iter()).expect("target");
        assert_eq!(found.id, MonsterId::new(3));
    }
}
