//! Step navigation state machine.
//!
//! The current step only moves forward past validation: `next_step`
//! gates on the current step's visible fields, and a forward
//! `go_to_step` re-validates every intermediate step, stopping at the
//! first one that fails. Backward movement is always free and never
//! validates.

use intake_schema::FormSchema;

use crate::config::EngineConfig;
use crate::state::FormState;
use crate::validate;

/// Advance one step if the current step validates. Returns `true` on
/// success; on failure the step is unchanged and the error map holds
/// the failing fields.
pub fn next_step(schema: &FormSchema, config: &EngineConfig, state: &mut FormState) -> bool {
    let total = schema.total_steps();
    if !validate::validate_step(schema, config, state, state.current_step) {
        return false;
    }
    state.current_step = (state.current_step + 1).min(total);
    true
}

/// Step back one step. Always allowed, never validates.
pub fn prev_step(state: &mut FormState) {
    state.current_step = state.current_step.saturating_sub(1).max(1);
}

/// Jump to a target step (1-based, clamped). Backward jumps are
/// unconditional. Forward jumps validate each step from the current one
/// up to (but not including) the target; the walk stops on the first
/// invalid step and the current index lands there. Returns the
/// resulting step index.
pub fn go_to_step(
    schema: &FormSchema,
    config: &EngineConfig,
    state: &mut FormState,
    target: usize,
) -> usize {
    let total = schema.total_steps();
    let target = target.clamp(1, total);

    if target <= state.current_step {
        state.current_step = target;
        return target;
    }

    for position in state.current_step..target {
        if !validate::validate_step(schema, config, state, position) {
            state.current_step = position;
            return position;
        }
    }
    state.current_step = target;
    target
}

/// Completion percentage derived from the step position.
pub fn progress_percent(schema: &FormSchema, state: &FormState) -> u8 {
    let total = schema.total_steps();
    ((state.current_step as f64 / total as f64) * 100.0).round() as u8
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
