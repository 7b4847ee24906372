//! Map services — fixtures, cells and the glow grid.
//!
//! The engine only talks to the map through [`GlowMap`]. [`GridMap`] is the
//! in-memory rectangular implementation used by the CLI host and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::error::{RedAlertError, Result};
use crate::glow::Color32;

/// A grid coordinate on the map floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Capability flags a thing on the map carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    /// Emits light with a mutable color.
    pub const GLOWER: Capabilities = Capabilities(1);
    /// Draws power from the network.
    pub const POWER_TRADER: Capabilities = Capabilities(1 << 1);

    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

/// Snapshot of a thing on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    pub position: Cell,
    pub capabilities: Capabilities,
    /// Glow color; meaningful only for glowers.
    pub color: Color32,
}

impl Fixture {
    pub fn is_glower(&self) -> bool {
        self.capabilities.contains(Capabilities::GLOWER)
    }

    /// Lit and powered — the fixtures the alarm recolors.
    pub fn is_alarm_candidate(&self) -> bool {
        self.capabilities
            .contains(Capabilities::GLOWER | Capabilities::POWER_TRADER)
    }
}

// ── Trait ──

/// Map-side services the override engine needs.
pub trait GlowMap {
    /// Every thing on the map, in a stable order.
    fn all_fixtures(&self) -> Vec<Fixture>;
    /// Every cell of the map, row by row. The iterator does not borrow the map.
    fn all_cells(&self) -> Box<dyn Iterator<Item = Cell>>;
    /// Things standing on `cell`.
    fn fixtures_at(&self, cell: Cell) -> Vec<Fixture>;
    /// Change a glower's color. Returns `false` if `id` is unknown.
    fn set_glow_color(&mut self, id: &str, color: Color32) -> bool;
    /// Ask the lighting subsystem to recompute `cell` on its next pass.
    fn mark_glow_grid_dirty(&mut self, cell: Cell);
}

// ── In-memory grid ──

/// Largest accepted map side, in cells.
pub const MAX_MAP_SIDE: i32 = 1024;

/// On-disk shape of a [`GridMap`].
#[derive(Deserialize)]
struct GridMapData {
    width: i32,
    height: i32,
    #[serde(default)]
    fixtures: Vec<Fixture>,
}

impl From<GridMapData> for GridMap {
    fn from(data: GridMapData) -> Self {
        let mut map = GridMap::new(data.width, data.height);
        map.fixtures = data.fixtures;
        map.rebuild_index();
        map
    }
}

/// Rectangular map of `width × height` cells holding fixtures.
///
/// Fixtures are indexed by cell, so a per-cell lookup costs only the
/// fixtures standing there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GridMapData")]
pub struct GridMap {
    width: i32,
    height: i32,
    fixtures: Vec<Fixture>,
    /// Cell → positions in `fixtures`.
    #[serde(skip)]
    by_cell: BTreeMap<Cell, Vec<usize>>,
    /// Cells awaiting a glow recompute. Not persisted.
    #[serde(skip)]
    dirty: BTreeSet<Cell>,
}

impl GridMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            fixtures: Vec::new(),
            by_cell: BTreeMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.z)
    }

    /// Place a fixture. Rejects duplicate ids and out-of-bounds cells.
    pub fn place(&mut self, fixture: Fixture) -> Result<()> {
        if self.fixture(&fixture.id).is_some() {
            return Err(RedAlertError::Duplicate(fixture.id));
        }
        if !self.in_bounds(fixture.position) {
            return Err(self.out_of_bounds(&fixture));
        }
        self.dirty.insert(fixture.position);
        self.by_cell
            .entry(fixture.position)
            .or_default()
            .push(self.fixtures.len());
        self.fixtures.push(fixture);
        Ok(())
    }

    /// Remove a fixture by id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<Fixture> {
        let idx = self.fixtures.iter().position(|f| f.id == id)?;
        let fixture = self.fixtures.remove(idx);
        self.rebuild_index();
        self.dirty.insert(fixture.position);
        Some(fixture)
    }

    /// Run the checks [`place`](Self::place) applies to every fixture already
    /// on the map, plus the size limit. Used on freshly loaded maps.
    pub fn check(&self) -> Result<()> {
        if self.width > MAX_MAP_SIDE || self.height > MAX_MAP_SIDE {
            return Err(RedAlertError::Config(format!(
                "map is {}x{}, the largest supported side is {MAX_MAP_SIDE}",
                self.width, self.height
            )));
        }
        let mut seen = BTreeSet::new();
        for fixture in &self.fixtures {
            if !seen.insert(fixture.id.as_str()) {
                return Err(RedAlertError::Duplicate(fixture.id.clone()));
            }
            if !self.in_bounds(fixture.position) {
                return Err(self.out_of_bounds(fixture));
            }
        }
        Ok(())
    }

    pub fn fixture(&self, id: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Cells marked dirty since the last [`take_dirty`](Self::take_dirty).
    pub fn dirty_cells(&self) -> &BTreeSet<Cell> {
        &self.dirty
    }

    /// Drain the dirty set, as the lighting pass would.
    pub fn take_dirty(&mut self) -> BTreeSet<Cell> {
        std::mem::take(&mut self.dirty)
    }

    fn rebuild_index(&mut self) {
        self.by_cell.clear();
        for (idx, fixture) in self.fixtures.iter().enumerate() {
            self.by_cell.entry(fixture.position).or_default().push(idx);
        }
    }

    fn out_of_bounds(&self, fixture: &Fixture) -> RedAlertError {
        RedAlertError::Config(format!(
            "{} at cell {} is outside the {}x{} map",
            fixture.id, fixture.position, self.width, self.height
        ))
    }
}

impl GlowMap for GridMap {
    fn all_fixtures(&self) -> Vec<Fixture> {
        self.fixtures.clone()
    }

    fn all_cells(&self) -> Box<dyn Iterator<Item = Cell>> {
        let (width, height) = (self.width, self.height);
        Box::new((0..height).flat_map(move |z| (0..width).map(move |x| Cell::new(x, z))))
    }

    fn fixtures_at(&self, cell: Cell) -> Vec<Fixture> {
        match self.by_cell.get(&cell) {
            Some(indices) => indices
                .iter()
                .filter_map(|&i| self.fixtures.get(i))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    fn set_glow_color(&mut self, id: &str, color: Color32) -> bool {
        match self.fixtures.iter_mut().find(|f| f.id == id) {
            Some(f) => {
                f.color = color;
                true
            }
            None => false,
        }
    }

    fn mark_glow_grid_dirty(&mut self, cell: Cell) {
        self.dirty.insert(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(id: &str, x: i32, z: i32) -> Fixture {
        Fixture {
            id: id.into(),
            position: Cell::new(x, z),
            capabilities: Capabilities::GLOWER | Capabilities::POWER_TRADER,
            color: Color32::rgb(255, 255, 255),
        }
    }

    // ── Capabilities ──

    #[test]
    fn capabilities_contains() {
        let both = Capabilities::GLOWER | Capabilities::POWER_TRADER;
        assert!(both.contains(Capabilities::GLOWER));
        assert!(both.contains(Capabilities::POWER_TRADER));
        assert!(!Capabilities::GLOWER.contains(both));
        assert!(Capabilities::NONE.contains(Capabilities::NONE));
    }

    #[test]
    fn alarm_candidate_needs_both_capabilities() {
        let mut f = lamp("a", 0, 0);
        assert!(f.is_alarm_candidate());
        f.capabilities = Capabilities::GLOWER;
        assert!(!f.is_alarm_candidate());
        assert!(f.is_glower());
        f.capabilities = Capabilities::POWER_TRADER;
        assert!(!f.is_alarm_candidate());
        assert!(!f.is_glower());
    }

    // ── GridMap ──

    #[test]
    fn all_cells_covers_grid() {
        let map = GridMap::new(3, 2);
        let cells: Vec<Cell> = map.all_cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[5], Cell::new(2, 1));
    }

    #[test]
    fn negative_dimensions_clamp_to_empty() {
        let map = GridMap::new(-4, 3);
        assert_eq!(map.all_cells().count(), 0);
    }

    #[test]
    fn place_rejects_duplicate_id() {
        let mut map = GridMap::new(4, 4);
        map.place(lamp("a", 0, 0)).unwrap();
        let err = map.place(lamp("a", 1, 1)).unwrap_err();
        assert!(matches!(err, RedAlertError::Duplicate(_)));
    }

    #[test]
    fn place_rejects_out_of_bounds() {
        let mut map = GridMap::new(2, 2);
        assert!(map.place(lamp("a", 2, 0)).is_err());
        assert!(map.place(lamp("b", 0, -1)).is_err());
    }

    #[test]
    fn fixtures_at_filters_by_cell() {
        let mut map = GridMap::new(4, 4);
        map.place(lamp("a", 1, 1)).unwrap();
        map.place(lamp("b", 1, 1)).unwrap();
        map.place(lamp("c", 2, 1)).unwrap();
        let ids: Vec<_> = map
            .fixtures_at(Cell::new(1, 1))
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn fixtures_at_follows_removal() {
        let mut map = GridMap::new(4, 4);
        map.place(lamp("a", 1, 1)).unwrap();
        map.place(lamp("b", 2, 2)).unwrap();
        map.place(lamp("c", 2, 2)).unwrap();
        map.remove("a");
        assert!(map.fixtures_at(Cell::new(1, 1)).is_empty());
        let ids: Vec<_> = map
            .fixtures_at(Cell::new(2, 2))
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn fixtures_at_works_after_reload() {
        let mut map = GridMap::new(3, 3);
        map.place(lamp("a", 0, 2)).unwrap();
        map.place(lamp("b", 2, 0)).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        let back: GridMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fixtures_at(Cell::new(0, 2))[0].id, "a");
        assert_eq!(back.fixtures_at(Cell::new(2, 0))[0].id, "b");
        assert!(back.fixtures_at(Cell::new(1, 1)).is_empty());
    }

    #[test]
    fn check_accepts_placed_fixtures() {
        let mut map = GridMap::new(2, 2);
        map.place(lamp("a", 0, 0)).unwrap();
        map.place(lamp("b", 1, 1)).unwrap();
        assert!(map.check().is_ok());
    }

    #[test]
    fn check_rejects_loaded_out_of_bounds_fixture() {
        let json = r#"{"width":1,"height":1,"fixtures":[
            {"id":"lamp","position":{"x":5,"z":0},"capabilities":3,
             "color":{"r":0,"g":0,"b":255,"a":255}}]}"#;
        let map: GridMap = serde_json::from_str(json).unwrap();
        let err = map.check().unwrap_err();
        assert!(matches!(err, RedAlertError::Config(_)));
        assert!(err.to_string().contains("lamp"));
    }

    #[test]
    fn check_rejects_oversized_map() {
        let map = GridMap::new(MAX_MAP_SIDE + 1, 1);
        assert!(matches!(map.check(), Err(RedAlertError::Config(_))));
        assert!(GridMap::new(MAX_MAP_SIDE, MAX_MAP_SIDE).check().is_ok());
    }

    #[test]
    fn loading_clamps_negative_dimensions() {
        let map: GridMap = serde_json::from_str(r#"{"width":-3,"height":2}"#).unwrap();
        assert_eq!(map.width(), 0);
        assert_eq!(map.all_cells().count(), 0);
    }

    #[test]
    fn set_glow_color_unknown_id() {
        let mut map = GridMap::new(1, 1);
        assert!(!map.set_glow_color("ghost", Color32::rgb(1, 2, 3)));
    }

    #[test]
    fn take_dirty_drains() {
        let mut map = GridMap::new(2, 2);
        map.mark_glow_grid_dirty(Cell::new(1, 1));
        assert!(map.dirty_cells().contains(&Cell::new(1, 1)));
        let drained = map.take_dirty();
        assert_eq!(drained.len(), 1);
        assert!(map.dirty_cells().is_empty());
    }

    #[test]
    fn remove_returns_fixture() {
        let mut map = GridMap::new(2, 2);
        map.place(lamp("a", 0, 1)).unwrap();
        let removed = map.remove("a").unwrap();
        assert_eq!(removed.position, Cell::new(0, 1));
        assert!(map.fixture("a").is_none());
        assert!(map.remove("a").is_none());
    }

    #[test]
    fn serialization_skips_dirty_cells() {
        let mut map = GridMap::new(2, 2);
        map.place(lamp("a", 0, 0)).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        let back: GridMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fixtures().len(), 1);
        assert!(back.dirty_cells().is_empty());
    }
}
