//! Task color resolution.
//!
//! A task's final color comes from, in order:
//! 1. `palette[color_index]` when the index is in range
//! 2. the color declared in the input
//! 3. the fallback strategy chosen for the input format
//!
//! Two fallback strategies exist: [`PaletteCycle`] for tabular input and
//! [`AdjacencySafeRandom`] for declarative input.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::palette::{default_palette, ResolvedPalette};
use crate::{Color, Project};

// ============================================================================
// Strategies
// ============================================================================

/// Supplies a color for tasks that carry neither a usable index nor a color
pub trait ColorResolutionStrategy {
    /// Pick the color for the task at `index`.
    ///
    /// `previous` is the resolved color of the task immediately before it.
    /// Returns `None` only for an empty palette.
    fn fallback_color(
        &mut self,
        index: usize,
        previous: Option<&str>,
        palette: &[Color],
    ) -> Option<Color>;
}

/// `palette[index % len]`
#[derive(Clone, Copy, Debug, Default)]
pub struct PaletteCycle;

impl ColorResolutionStrategy for PaletteCycle {
    fn fallback_color(
        &mut self,
        index: usize,
        _previous: Option<&str>,
        palette: &[Color],
    ) -> Option<Color> {
        if palette.is_empty() {
            return None;
        }
        Some(palette[index % palette.len()].clone())
    }
}

/// Uniform random choice that never repeats the previous task's color
#[derive(Debug)]
pub struct AdjacencySafeRandom<R> {
    rng: R,
}

impl<R: Rng> AdjacencySafeRandom<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Give back the random source
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> ColorResolutionStrategy for AdjacencySafeRandom<R> {
    fn fallback_color(
        &mut self,
        _index: usize,
        previous: Option<&str>,
        palette: &[Color],
    ) -> Option<Color> {
        pick_excluding(&mut self.rng, previous, palette)
    }
}

/// Choose uniformly from `palette` minus `previous`.
///
/// When excluding `previous` would leave nothing to choose from, the whole
/// palette is used instead.
fn pick_excluding<R: Rng + ?Sized>(
    rng: &mut R,
    previous: Option<&str>,
    palette: &[Color],
) -> Option<Color> {
    let candidates: Vec<&Color> = palette
        .iter()
        .filter(|c| previous != Some(c.as_str()))
        .collect();
    let pool: Vec<&Color> = if candidates.is_empty() {
        palette.iter().collect()
    } else {
        candidates
    };
    pool.choose(rng).map(|c| (*c).clone())
}

// ============================================================================
// Operations
// ============================================================================

/// Assign `n` colors so that no two consecutive entries are equal.
///
/// The guarantee holds whenever the palette has at least two distinct
/// colors. A single-color palette repeats that color; an empty palette
/// yields an empty result.
pub fn assign_colors<R: Rng + ?Sized>(n: usize, palette: &[Color], rng: &mut R) -> Vec<Color> {
    let mut colors: Vec<Color> = Vec::with_capacity(n);
    for _ in 0..n {
        let previous = colors.last().map(String::as_str);
        match pick_excluding(rng, previous, palette) {
            Some(color) => colors.push(color),
            None => return Vec::new(),
        }
    }
    colors
}

/// Resolve every task's `color` against the project palette.
///
/// An empty palette is first replaced by the default palette.
pub fn resolve_task_colors<S>(project: &mut Project, strategy: &mut S)
where
    S: ColorResolutionStrategy + ?Sized,
{
    if project.palette.is_empty() {
        debug!("Empty palette, using default");
        project.palette = default_palette();
    }

    let Project { palette, tasks, .. } = project;
    let Some(tasks) = tasks.as_mut() else {
        return;
    };

    let mut previous: Option<Color> = None;
    for (i, task) in tasks.iter_mut().enumerate() {
        let resolved = task
            .color_index
            .and_then(|idx| palette.get(idx).cloned())
            .or_else(|| task.declared_color.clone())
            .or_else(|| strategy.fallback_color(i, previous.as_deref(), palette));
        task.color.clone_from(&resolved);
        previous = resolved;
    }
}

/// Replace the project palette and accents with a preset, then re-resolve
/// every task against the new palette.
pub fn apply_preset<S>(project: &mut Project, preset: &ResolvedPalette, strategy: &mut S)
where
    S: ColorResolutionStrategy + ?Sized,
{
    project.palette.clone_from(&preset.colors);
    project.palette_preset = Some(preset.id.to_string());
    project.accent_border.clone_from(&preset.accent_border);
    project.accent_color.clone_from(&preset.accent_color);
    resolve_task_colors(project, strategy);
}
