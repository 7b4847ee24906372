//! Override engine — force every lit, powered fixture to the alarm color and
//! restore the saved originals afterwards.

use crate::context::MapContext;

use super::color::{ALARM_COLOR, is_alarm_colored};

/// Result of an [`apply_alarm`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Fixtures recolored by this pass.
    pub recolored: usize,
    /// Originals newly saved to the registry.
    pub saved: usize,
}

/// Result of a [`revert_alarm`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevertReport {
    /// Fixtures whose saved color was written back.
    pub restored: usize,
    /// Fixture ids whose saved entry could not be decoded.
    pub failed: Vec<String>,
    /// Glower cells marked dirty during the sweep.
    pub marked_dirty: usize,
}

/// Recolor every lit, powered fixture to the alarm color and play the alarm.
///
/// Fixtures already showing the alarm color are left alone, and an original
/// already in the registry is never overwritten, so repeated passes (or a
/// second switch) change nothing.
pub fn apply_alarm(ctx: &mut MapContext<'_>) -> ApplyReport {
    let mut report = ApplyReport::default();

    for fixture in ctx.map.all_fixtures() {
        if !fixture.is_alarm_candidate() || is_alarm_colored(&fixture.color) {
            continue;
        }
        if ctx.registry.save_if_absent(&fixture.id, &fixture.color) {
            report.saved += 1;
        }
        ctx.map.set_glow_color(&fixture.id, ALARM_COLOR);
        ctx.map.mark_glow_grid_dirty(fixture.position);
        report.recolored += 1;
    }

    ctx.sound.play_one_shot();
    log::debug!(
        "alarm applied: {} recolored, {} saved, {} overridden total",
        report.recolored,
        report.saved,
        ctx.registry.len()
    );
    report
}

/// Restore saved colors and resynchronize the glow grid.
///
/// Sweeps every cell; each glower on the map gets its cell marked dirty,
/// whether or not it had a saved color. A malformed saved entry skips that one
/// fixture and the sweep carries on. With `clear_after`, the registry is
/// emptied at the end; otherwise entries stay for a later pass.
pub fn revert_alarm(ctx: &mut MapContext<'_>, clear_after: bool) -> RevertReport {
    let mut report = RevertReport::default();
    if !ctx.alarm_active() {
        return report;
    }

    for cell in ctx.map.all_cells() {
        for fixture in ctx.map.fixtures_at(cell) {
            if !fixture.is_glower() {
                continue;
            }
            if ctx.registry.contains(&fixture.id) {
                let saved = if clear_after {
                    ctx.registry.take(&fixture.id)
                } else {
                    ctx.registry.get(&fixture.id)
                };
                match saved {
                    Ok(Some(color)) => {
                        ctx.map.set_glow_color(&fixture.id, color);
                        report.restored += 1;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::warn!("cannot restore glow color of {}: {e}", fixture.id);
                        report.failed.push(fixture.id.clone());
                    }
                }
            }
            ctx.map.mark_glow_grid_dirty(fixture.position);
            report.marked_dirty += 1;
        }
    }

    if clear_after {
        ctx.registry.clear();
    }
    log::debug!(
        "alarm reverted: {} restored, {} failed, {} cells marked",
        report.restored,
        report.failed.len(),
        report.marked_dirty
    );
    report
}
