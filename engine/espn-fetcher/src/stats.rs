//! ESPN stat id → stat name mapping.
//!
//! Team season totals arrive as `valuesByStat` keyed by numeric stat id.
//! Only the ids the league history reports on are mapped; unknown ids are
//! dropped.

pub const STAT_NAMES: &[(u32, &str)] = &[
    (3, "passingYards"),
    (4, "passingTouchdowns"),
    (19, "passing2PtConversions"),
    (20, "passingInterceptions"),
    (24, "rushingYards"),
    (25, "rushingTouchdowns"),
    (26, "rushing2PtConversions"),
    (42, "receivingYards"),
    (43, "receivingTouchdowns"),
    (44, "receiving2PtConversions"),
    (53, "receivingReceptions"),
    (72, "lostFumbles"),
    (74, "madeFieldGoalsFrom50Plus"),
    (77, "madeFieldGoalsFrom40To49"),
    (80, "madeFieldGoalsFromUnder40"),
    (85, "missedFieldGoals"),
    (86, "madeExtraPoints"),
    (88, "missedExtraPoints"),
    (95, "defensiveInterceptions"),
    (96, "defensiveFumbles"),
    (97, "defensiveBlockedKicks"),
    (98, "defensiveSafeties"),
    (99, "defensiveSacks"),
    (101, "kickoffReturnTouchdowns"),
    (102, "puntReturnTouchdowns"),
    (103, "interceptionReturnTouchdowns"),
    (104, "fumbleReturnTouchdowns"),
];

pub fn stat_name(id: u32) -> Option<&'static str> {
    STAT_NAMES.iter().find(|(stat_id, _)| *stat_id == id).map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids() {
        assert_eq!(stat_name(4), Some("passingTouchdowns"));
        assert_eq!(stat_name(85), Some("missedFieldGoals"));
        assert_eq!(stat_name(104), Some("fumbleReturnTouchdowns"));
    }

    #[test]
    fn test_unknown_id() {
        assert_eq!(stat_name(9999), None);
    }
}
