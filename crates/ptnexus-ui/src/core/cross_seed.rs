//! Cross-seed workflow state machine.
//!
//! # Design
//! - One workflow is in flight at a time; `reset` clears it before the next one starts.
//! - Stage is orthogonal to the data fields: moving between edit and preview never
//!   touches source info, parameters, or the task id.
//! - Parameter completeness is validated by the views, not here.

use crate::core::error::{StoreError, StoreResult};
use crate::core::params::WorkingParams;
use ptnexus_api_models::SourceInfo;
use serde_json::Value;

/// Step of the cross-seed workflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorkflowStage {
    /// Editing parameters.
    #[default]
    Edit,
    /// Reviewing the rendered upload.
    Preview,
    /// Submitted to the backend.
    Publish,
}

impl WorkflowStage {
    /// Stages in display order for the stepper.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Edit, Self::Preview, Self::Publish]
    }

    /// Stable key used for labels and CSS hooks.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Preview => "preview",
            Self::Publish => "publish",
        }
    }

    /// Zero-based position in the stepper.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Edit => 0,
            Self::Preview => 1,
            Self::Publish => 2,
        }
    }
}

/// In-progress cross-seed request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrossSeedState {
    /// Origin torrent/site pair.
    pub source_info: Option<SourceInfo>,
    /// Parameters shared between the edit and preview steps.
    pub working_params: Option<WorkingParams>,
    /// Active stage.
    pub stage: WorkflowStage,
    /// Backend job id, present once published.
    pub task_id: Option<String>,
}

impl CrossSeedState {
    /// Replace the source info wholesale.
    pub fn set_source_info(&mut self, info: SourceInfo) {
        self.source_info = Some(info);
    }

    /// Shallow-merge `partial` into the working parameters.
    pub fn set_params(&mut self, partial: WorkingParams) {
        match self.working_params.as_mut() {
            Some(params) => params.merge(partial),
            None => self.working_params = Some(partial),
        }
    }

    /// Set a single parameter.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidState`] when no parameters have been set yet;
    /// the store is left unchanged.
    pub fn update_param(&mut self, key: impl Into<String>, value: Value) -> StoreResult<()> {
        let params = self
            .working_params
            .as_mut()
            .ok_or(StoreError::InvalidState {
                action: "update_param",
                missing: "working_params",
            })?;
        params.set(key, value);
        Ok(())
    }

    /// Move to the preview step; only acts from Edit.
    pub const fn go_to_preview(&mut self) {
        if matches!(self.stage, WorkflowStage::Edit) {
            self.stage = WorkflowStage::Preview;
        }
    }

    /// Return to the edit step; only acts from Preview.
    pub const fn back_to_edit(&mut self) {
        if matches!(self.stage, WorkflowStage::Preview) {
            self.stage = WorkflowStage::Edit;
        }
    }

    /// Record the prepared task id sent with the publish request.
    ///
    /// This is the id issued when the source torrent was fetched, not anything
    /// returned by publish. The stage advances to Publish only from Preview;
    /// from any other stage the id is recorded and the stage is left alone.
    pub fn set_task_id(&mut self, task_id: impl Into<String>) {
        self.task_id = Some(task_id.into());
        if matches!(self.stage, WorkflowStage::Preview) {
            self.stage = WorkflowStage::Publish;
        }
    }

    /// Clear every field back to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a workflow has any state worth keeping.
    #[must_use]
    pub const fn is_pristine(&self) -> bool {
        self.source_info.is_none()
            && self.working_params.is_none()
            && self.task_id.is_none()
            && matches!(self.stage, WorkflowStage::Edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> WorkingParams {
        WorkingParams::from_value(value).unwrap()
    }

    fn source() -> SourceInfo {
        SourceInfo {
            display_name: "MTeam".into(),
            site_identifier: "mteam".into(),
            source_torrent_id: "1001".into(),
        }
    }

    #[test]
    fn set_params_on_empty_store_takes_partial() {
        let mut state = CrossSeedState::default();
        state.set_params(params(json!({"title": "a"})));
        assert_eq!(state.working_params, Some(params(json!({"title": "a"}))));
    }

    #[test]
    fn set_params_folds_with_latest_key_winning() {
        let updates = [
            json!({"title": "a", "subtitle": "s"}),
            json!({"title": "b", "type": "movie"}),
            json!({"subtitle": "t"}),
        ];
        let mut state = CrossSeedState::default();
        let mut expected = WorkingParams::new();
        for update in updates {
            state.set_params(params(update.clone()));
            expected.merge(params(update));
        }
        assert_eq!(state.working_params, Some(expected));
        let merged = state.working_params.unwrap();
        assert_eq!(merged.get_str("title"), Some("b"));
        assert_eq!(merged.get_str("subtitle"), Some("t"));
        assert_eq!(merged.get_str("type"), Some("movie"));
    }

    #[test]
    fn update_param_requires_existing_params() {
        let mut state = CrossSeedState::default();
        let err = state.update_param("title", json!("x")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidState { .. }));
        assert!(state.working_params.is_none());

        state.set_params(WorkingParams::new());
        state.update_param("title", json!("x")).unwrap();
        assert_eq!(
            state.working_params.as_ref().and_then(|p| p.get_str("title")),
            Some("x")
        );
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut state = CrossSeedState::default();
        state.set_source_info(source());
        state.set_params(params(json!({"title": "a"})));
        state.go_to_preview();
        state.set_task_id("task-1");
        state.reset();
        assert_eq!(state, CrossSeedState::default());
        assert!(state.is_pristine());

        state.reset();
        assert!(state.is_pristine());
    }

    #[test]
    fn preview_round_trip_leaves_data_untouched() {
        let mut state = CrossSeedState::default();
        state.set_source_info(source());
        state.set_params(params(json!({"title": "a"})));
        let before = state.clone();

        state.go_to_preview();
        assert_eq!(state.stage, WorkflowStage::Preview);
        state.back_to_edit();

        assert_eq!(state, before);
        assert_eq!(state.stage, WorkflowStage::Edit);
    }

    #[test]
    fn task_id_marks_publish() {
        let mut state = CrossSeedState::default();
        state.go_to_preview();
        state.set_task_id("task-9");
        assert_eq!(state.stage, WorkflowStage::Publish);
        assert_eq!(state.task_id.as_deref(), Some("task-9"));
    }

    #[test]
    fn task_id_outside_preview_keeps_stage() {
        let mut state = CrossSeedState::default();
        state.set_task_id("t");
        assert_eq!(state.stage, WorkflowStage::Edit);
        assert_eq!(state.task_id.as_deref(), Some("t"));
    }

    #[test]
    fn publish_is_only_left_through_reset() {
        let mut state = CrossSeedState::default();
        state.go_to_preview();
        state.set_task_id("t");
        assert_eq!(state.stage, WorkflowStage::Publish);

        state.back_to_edit();
        assert_eq!(state.stage, WorkflowStage::Publish);
        state.go_to_preview();
        assert_eq!(state.stage, WorkflowStage::Publish);

        state.reset();
        assert_eq!(state.stage, WorkflowStage::Edit);
    }

    #[test]
    fn back_to_edit_from_edit_is_a_no_op() {
        let mut state = CrossSeedState::default();
        state.back_to_edit();
        assert_eq!(state.stage, WorkflowStage::Edit);
        state.go_to_preview();
        state.go_to_preview();
        assert_eq!(state.stage, WorkflowStage::Preview);
    }

    #[test]
    fn source_info_is_replaced_wholesale() {
        let mut state = CrossSeedState::default();
        state.set_source_info(source());
        let next = SourceInfo {
            display_name: "HDSky".into(),
            site_identifier: "hdsky".into(),
            source_torrent_id: "7".into(),
        };
        state.set_source_info(next.clone());
        assert_eq!(state.source_info, Some(next));
    }
}
