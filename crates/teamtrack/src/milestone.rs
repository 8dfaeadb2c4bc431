//! Milestones and per-milestone progress records.
//!
//! Every team and every member reports free-text progress against the same
//! five checkpoints. The set is closed, so progress is a fixed-shape record
//! rather than an open string-keyed map.

use serde::{Deserialize, Serialize};

/// One of the five fixed checkpoints, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Milestone {
    /// Phase 0: ideation and mission statement.
    Ideation,
    /// Week 1: first working build.
    MvpBuild,
    /// Week 2: testing and iteration.
    Testing,
    /// Weeks 3-4: getting users.
    UserAcquisition,
    /// Plans after the internship ends.
    Vision,
}

impl Milestone {
    /// All milestones in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Ideation,
        Self::MvpBuild,
        Self::Testing,
        Self::UserAcquisition,
        Self::Vision,
    ];

    /// The label used as the document key and export header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ideation => "Phase 0: Ideation & Mission",
            Self::MvpBuild => "Week 1: MVP Build",
            Self::Testing => "Week 2: Testing & Iteration",
            Self::UserAcquisition => "Weeks 3-4: User Acquisition",
            Self::Vision => "Post-Internship Vision",
        }
    }

    /// Look up a milestone by its label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-text progress against each milestone.
///
/// Serialized as a JSON object keyed by [`Milestone::label`]. Missing keys
/// read back as empty strings and unknown keys are dropped, so a
/// deserialized record always carries exactly the five milestones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneProgress {
    /// Phase 0: Ideation & Mission.
    #[serde(rename = "Phase 0: Ideation & Mission")]
    pub ideation: String,
    /// Week 1: MVP Build.
    #[serde(rename = "Week 1: MVP Build")]
    pub mvp_build: String,
    /// Week 2: Testing & Iteration.
    #[serde(rename = "Week 2: Testing & Iteration")]
    pub testing: String,
    /// Weeks 3-4: User Acquisition.
    #[serde(rename = "Weeks 3-4: User Acquisition")]
    pub user_acquisition: String,
    /// Post-Internship Vision.
    #[serde(rename = "Post-Internship Vision")]
    pub vision: String,
}

impl MilestoneProgress {
    /// Build a record from five values given in [`Milestone::ALL`] order.
    #[must_use]
    pub fn from_values(values: [String; 5]) -> Self {
        let [ideation, mvp_build, testing, user_acquisition, vision] = values;
        Self {
            ideation,
            mvp_build,
            testing,
            user_acquisition,
            vision,
        }
    }

    /// Progress text for one milestone.
    #[must_use]
    pub fn get(&self, milestone: Milestone) -> &str {
        match milestone {
            Milestone::Ideation => &self.ideation,
            Milestone::MvpBuild => &self.mvp_build,
            Milestone::Testing => &self.testing,
            Milestone::UserAcquisition => &self.user_acquisition,
            Milestone::Vision => &self.vision,
        }
    }

    /// Replace the progress text for one milestone.
    pub fn set(&mut self, milestone: Milestone, value: impl Into<String>) {
        let slot = match milestone {
            Milestone::Ideation => &mut self.ideation,
            Milestone::MvpBuild => &mut self.mvp_build,
            Milestone::Testing => &mut self.testing,
            Milestone::UserAcquisition => &mut self.user_acquisition,
            Milestone::Vision => &mut self.vision,
        };
        *slot = value.into();
    }

    /// Iterate `(milestone, text)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Milestone, &str)> + '_ {
        Milestone::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// True when no milestone has any text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.iter().all(|(_, text)| text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_in_order() {
        let labels: Vec<&str> = Milestone::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Phase 0: Ideation & Mission",
                "Week 1: MVP Build",
                "Week 2: Testing & Iteration",
                "Weeks 3-4: User Acquisition",
                "Post-Internship Vision",
            ]
        );
    }

    #[test]
    fn test_from_label() {
        assert_eq!(
            Milestone::from_label("Week 1: MVP Build"),
            Some(Milestone::MvpBuild)
        );
        assert_eq!(Milestone::from_label("Week 5"), None);
    }

    #[test]
    fn test_serialize_writes_all_labels() {
        let progress = MilestoneProgress::default();
        let value = serde_json::to_value(&progress).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        for milestone in Milestone::ALL {
            assert_eq!(object[milestone.label()], "");
        }
    }

    #[test]
    fn test_deserialize_fills_missing_keys() {
        let json = r#"{"Week 1: MVP Build": "deployed"}"#;
        let progress: MilestoneProgress = serde_json::from_str(json).unwrap();

        assert_eq!(progress.mvp_build, "deployed");
        assert_eq!(progress.ideation, "");
        assert_eq!(progress.vision, "");
    }

    #[test]
    fn test_deserialize_ignores_unknown_keys() {
        let json = r#"{"Week 9: Party": "cake", "Post-Internship Vision": "ship it"}"#;
        let progress: MilestoneProgress = serde_json::from_str(json).unwrap();

        assert_eq!(progress.vision, "ship it");
        let round = serde_json::to_value(&progress).unwrap();
        assert!(round.get("Week 9: Party").is_none());
    }

    #[test]
    fn test_get_and_set() {
        let mut progress = MilestoneProgress::default();
        progress.set(Milestone::Testing, "beta with 10 users");

        assert_eq!(progress.get(Milestone::Testing), "beta with 10 users");
        assert_eq!(progress.testing, "beta with 10 users");
        assert!(!progress.is_blank());
    }

    #[test]
    fn test_from_values_order() {
        let progress = MilestoneProgress::from_values([
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
            "e".to_string(),
        ]);
        let values: Vec<&str> = progress.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_default_is_blank() {
        assert!(MilestoneProgress::default().is_blank());
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Milestone::Vision.to_string(), "Post-Internship Vision");
    }
}
