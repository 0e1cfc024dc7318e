// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission templates and per-player mission/objective progress.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    #[derive(Default)]
    pub struct MissionId;
}

crate::define_id! {
    #[derive(Default)]
    pub struct ObjectiveId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub objective_id: String,
    pub description: String,
    pub required_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionTemplate {
    pub mission_id: String,
    pub category: String,
    pub difficulty: u32,
    pub reward_money_minor: i64,
    pub reward_experience: u64,
    pub objectives: Vec<Objective>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Active,
    Completed,
    Failed,
    Abandoned,
}

impl MissionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MissionStatus::Active)
    }
}

/// A player's in-progress or finished instance of a mission template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMission {
    pub user_mission_id: String,
    pub player_id: String,
    pub mission_id: String,
    pub status: MissionStatus,
    #[serde(default)]
    pub objective_progress: HashMap<String, u32>,
}

impl UserMission {
    pub fn new(user_mission_id: impl Into<String>, player_id: impl Into<String>, mission_id: impl Into<String>) -> Self {
        Self {
            user_mission_id: user_mission_id.into(),
            player_id: player_id.into(),
            mission_id: mission_id.into(),
            status: MissionStatus::Active,
            objective_progress: HashMap::new(),
        }
    }

    /// Advance an objective counter by one, clamped to `required_count`.
    pub fn advance_objective(&mut self, objective: &Objective) {
        let count = self
            .objective_progress
            .entry(objective.objective_id.clone())
            .or_insert(0);
        if *count < objective.required_count {
            *count += 1;
        }
    }

    /// True if every objective in `template` has met its required count.
    pub fn all_objectives_complete(&self, template: &MissionTemplate) -> bool {
        template.objectives.iter().all(|objective| {
            self.objective_progress
                .get(&objective.objective_id)
                .copied()
                .unwrap_or(0)
                >= objective.required_count
        })
    }

    /// Recompute `status` from progress; transitions to `Completed` exactly
    /// when every required objective has been met.
    pub fn refresh_status(&mut self, template: &MissionTemplate) {
        if self.status == MissionStatus::Active && self.all_objectives_complete(template) {
            self.status = MissionStatus::Completed;
        }
    }
}

#[cfg(test)]
#[path = "mission_tests.rs"]
mod tests;
