use serde::{Deserialize, Serialize};
use std::fmt;

/// One-time milestone flags raised over the course of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Achievement {
    #[serde(rename = "Patient Zero")]
    PatientZero = 0,
    #[serde(rename = "Rapid Spread")]
    RapidSpread = 1,
    #[serde(rename = "Pandemic")]
    Pandemic = 2,
    #[serde(rename = "Extinction Event")]
    ExtinctionEvent = 3,
    #[serde(rename = "Survivor")]
    Survivor = 4,
    #[serde(rename = "Herd Immunity")]
    HerdImmunity = 5,
    #[serde(rename = "Containment Master")]
    ContainmentMaster = 6,
    #[serde(rename = "Endemic State")]
    EndemicState = 7,
    #[serde(rename = "Ghost Town")]
    GhostTown = 8,
}

impl Achievement {
    pub const ALL: [Achievement; 9] = [
        Achievement::PatientZero,
        Achievement::RapidSpread,
        Achievement::Pandemic,
        Achievement::ExtinctionEvent,
        Achievement::Survivor,
        Achievement::HerdImmunity,
        Achievement::ContainmentMaster,
        Achievement::EndemicState,
        Achievement::GhostTown,
    ];

    /// Human readable name, as shown to players.
    pub fn name(self) -> &'static str {
        match self {
            Achievement::PatientZero => "Patient Zero",
            Achievement::RapidSpread => "Rapid Spread",
            Achievement::Pandemic => "Pandemic",
            Achievement::ExtinctionEvent => "Extinction Event",
            Achievement::Survivor => "Survivor",
            Achievement::HerdImmunity => "Herd Immunity",
            Achievement::ContainmentMaster => "Containment Master",
            Achievement::EndemicState => "Endemic State",
            Achievement::GhostTown => "Ghost Town",
        }
    }

    #[inline(always)]
    fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Membership table for [`Achievement`], one bit per variant.
///
/// Serialized as a list of achievement names so that it reads naturally in
/// JSON output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Achievement>", into = "Vec<Achievement>")]
pub struct AchievementSet {
    bits: u16,
}

impl AchievementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `achievement`, returning `true` if it was not already present.
    pub fn insert(&mut self, achievement: Achievement) -> bool {
        let newly_added = !self.contains(achievement);
        self.bits |= achievement.bit();
        newly_added
    }

    pub fn contains(&self, achievement: Achievement) -> bool {
        self.bits & achievement.bit() != 0
    }

    /// Achievements in `self` that are not in `other`.
    pub fn difference(&self, other: &AchievementSet) -> AchievementSet {
        AchievementSet {
            bits: self.bits & !other.bits,
        }
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Achievement> + '_ {
        Achievement::ALL
            .into_iter()
            .filter(move |achievement| self.contains(*achievement))
    }
}

impl FromIterator<Achievement> for AchievementSet {
    fn from_iter<I: IntoIterator<Item = Achievement>>(iter: I) -> Self {
        let mut set = AchievementSet::new();
        for achievement in iter {
            set.insert(achievement);
        }
        set
    }
}

impl From<Vec<Achievement>> for AchievementSet {
    fn from(achievements: Vec<Achievement>) -> Self {
        achievements.into_iter().collect()
    }
}

impl From<AchievementSet> for Vec<Achievement> {
    fn from(set: AchievementSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut set = AchievementSet::new();
        assert!(set.insert(Achievement::Pandemic));
        assert!(!set.insert(Achievement::Pandemic));
        assert_eq!(set.len(), 1);
        assert!(set.contains(Achievement::Pandemic));
        assert!(!set.contains(Achievement::GhostTown));
    }

    #[test]
    fn difference_leaves_operands_untouched() {
        let current: AchievementSet = [Achievement::PatientZero, Achievement::RapidSpread, Achievement::GhostTown]
            .into_iter()
            .collect();
        let previous: AchievementSet = [Achievement::PatientZero].into_iter().collect();

        let fresh = current.difference(&previous);
        assert_eq!(
            fresh.iter().collect::<Vec<_>>(),
            vec![Achievement::RapidSpread, Achievement::GhostTown]
        );
        assert_eq!(current.len(), 3);
        assert_eq!(previous.len(), 1);
        assert!(previous.difference(&current).is_empty());
    }

    #[test]
    fn names_match_vocabulary() {
        let names: Vec<&str> = Achievement::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "Patient Zero",
                "Rapid Spread",
                "Pandemic",
                "Extinction Event",
                "Survivor",
                "Herd Immunity",
                "Containment Master",
                "Endemic State",
                "Ghost Town",
            ]
        );
    }
}
