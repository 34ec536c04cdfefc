//! Joins raw achievements with their DLC requirement records.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use super::{EnrichedAchievement, RawAchievement, RequirementRecord};

/// Indexes requirement records by achievement name.
///
/// At most one record is kept per name; later duplicates are ignored.
#[must_use]
pub fn index_requirements(
    records: Vec<RequirementRecord>,
) -> HashMap<String, RequirementRecord> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        if index.contains_key(&record.achievement_name) {
            warn!(
                achievement = %record.achievement_name,
                "Duplicate requirement record ignored"
            );
            continue;
        }
        index.insert(record.achievement_name.clone(), record);
    }
    index
}

/// Builds enriched achievements in input order.
///
/// Achievements without a matching record are kept with no DLC requirement.
#[must_use]
pub fn enrich<S>(
    achievements: &[RawAchievement],
    requirements: &HashMap<String, RequirementRecord, S>,
) -> Vec<EnrichedAchievement>
where
    S: std::hash::BuildHasher,
{
    let enriched: Vec<EnrichedAchievement> = achievements
        .iter()
        .map(|achievement| enrich_one(achievement, requirements.get(&achievement.name)))
        .collect();

    debug!(
        total = enriched.len(),
        dlc_gated = enriched.iter().filter(|a| a.is_required_dlc).count(),
        "Enriched achievements with DLC requirements"
    );
    enriched
}

fn enrich_one(
    achievement: &RawAchievement,
    record: Option<&RequirementRecord>,
) -> EnrichedAchievement {
    let (all_required, one_of) = record.map_or_else(Default::default, |record| {
        (
            record.requires_all_dlc.iter().cloned().collect::<Vec<_>>(),
            record.one_of_dlc_names(),
        )
    });
    let has_dlc_group =
        record.is_some_and(|record| record.requires_one_of.iter().any(|g| g.marker.is_dlc()));

    EnrichedAchievement {
        achieved: achievement.unlock.is_unlocked(),
        name: achievement.name.clone(),
        description: achievement.description.clone(),
        countries: BTreeSet::new(),
        is_required_dlc: !all_required.is_empty() || has_dlc_group,
        all_required_dlc_names: all_required,
        one_required_of_dlc_names: one_of,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::achievement::{DlcGroup, RequirementToken, UnlockState};

    fn raw(name: &str, unlock: UnlockState) -> RawAchievement {
        RawAchievement::new("Europa Universalis IV", name, format!("{name} desc"), unlock)
    }

    #[test]
    fn test_enrich_without_record_has_no_dlc_requirement() {
        let enriched = enrich(&[raw("A1", UnlockState::Locked)], &HashMap::new());
        assert_eq!(enriched.len(), 1);
        assert!(!enriched[0].is_required_dlc);
        assert!(enriched[0].all_required_dlc_names.is_empty());
        assert!(enriched[0].one_required_of_dlc_names.is_empty());
        assert!(!enriched[0].achieved);
    }

    #[test]
    fn test_enrich_requires_all_dlc_marks_required() {
        let mut record = RequirementRecord::new("A1");
        record.requires_all_dlc.insert("DLC1".to_string());
        let index = index_requirements(vec![record]);

        let enriched = enrich(&[raw("A1", UnlockState::Unlocked)], &index);
        assert!(enriched[0].achieved);
        assert!(enriched[0].is_required_dlc);
        assert_eq!(enriched[0].all_required_dlc_names, vec!["DLC1"]);
        assert!(enriched[0].one_required_of_dlc_names.is_empty());
    }

    #[test]
    fn test_enrich_one_of_only_counts_dlc_marker() {
        let mut gated = RequirementRecord::new("Gated");
        gated.requires_one_of = vec![DlcGroup::new(
            RequirementToken::HasDlc,
            vec!["Art of War".into(), "Cossacks".into()],
        )];
        let mut tagged = RequirementRecord::new("Tagged");
        tagged.requires_one_of = vec![DlcGroup::new(
            RequirementToken::from("tag"),
            vec!["VEN".into()],
        )];
        let index = index_requirements(vec![gated, tagged]);

        let enriched = enrich(
            &[raw("Gated", UnlockState::Unknown), raw("Tagged", UnlockState::Unknown)],
            &index,
        );
        assert!(enriched[0].is_required_dlc);
        assert_eq!(
            enriched[0].one_required_of_dlc_names,
            vec!["Art of War", "Cossacks"]
        );
        assert!(!enriched[1].is_required_dlc);
        assert!(enriched[1].one_required_of_dlc_names.is_empty());
    }

    #[test]
    fn test_enrich_preserves_order_and_drops_nothing() {
        let input = vec![
            raw("C", UnlockState::Locked),
            raw("A", UnlockState::Unlocked),
            raw("B", UnlockState::Unknown),
        ];
        let enriched = enrich(&input, &HashMap::new());
        let names: Vec<_> = enriched.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_index_requirements_keeps_first_duplicate() {
        let mut first = RequirementRecord::new("A1");
        first.requires_all_dlc.insert("First".to_string());
        let mut second = RequirementRecord::new("A1");
        second.requires_all_dlc.insert("Second".to_string());

        let index = index_requirements(vec![first, second]);
        assert_eq!(index.len(), 1);
        assert!(index.get("A1").unwrap().requires_all_dlc.contains("First"));
    }
}
