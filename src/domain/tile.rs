/// Tile kinds and the per-round tile assignment.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileKind {
    #[default]
    Blank,
    Treasure,
    ExtraLife,
    ExtraScore,
}

impl TileKind {
    /// Does selecting this tile count as finding something for the
    /// end-of-round check? Extra score does not.
    pub fn counts_as_find(self) -> bool {
        matches!(self, TileKind::Treasure | TileKind::ExtraLife)
    }

    /// Digit used in the debug grid dump.
    pub fn code(self) -> u8 {
        match self {
            TileKind::Blank => 0,
            TileKind::Treasure => 1,
            TileKind::ExtraLife => 2,
            TileKind::ExtraScore => 3,
        }
    }
}

/// Mapping tile index → kind for one grid.
///
/// Stored as a dense vector so the three item index sets are disjoint
/// by construction: one index holds exactly one kind.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TileAssignment {
    kinds: Vec<TileKind>,
}

impl TileAssignment {
    /// All-blank grid of `size` tiles.
    pub fn blank(size: usize) -> Self {
        TileAssignment { kinds: vec![TileKind::Blank; size] }
    }

    /// Build from explicit kinds (row-major).
    #[cfg(test)]
    pub fn from_kinds(kinds: Vec<TileKind>) -> Self {
        TileAssignment { kinds }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Kind at `index`. Out of range reads as Blank.
    #[inline]
    pub fn kind_at(&self, index: usize) -> TileKind {
        self.kinds.get(index).copied().unwrap_or_default()
    }

    /// Place `kind` at `index` (ignored when out of range).
    #[inline]
    pub fn set(&mut self, index: usize, kind: TileKind) {
        if let Some(slot) = self.kinds.get_mut(index) {
            *slot = kind;
        }
    }

    /// Indices holding `kind`, ascending.
    pub fn positions_of(&self, kind: TileKind) -> Vec<usize> {
        self.kinds.iter()
            .enumerate()
            .filter(|(_, k)| **k == kind)
            .map(|(i, _)| i)
            .collect()
    }

    #[cfg(test)]
    pub fn count_of(&self, kind: TileKind) -> usize {
        self.kinds.iter().filter(|k| **k == kind).count()
    }

    /// Replace every treasure with blank, leaving the other kinds alone.
    pub fn clear_treasures(&mut self) {
        for k in &mut self.kinds {
            if *k == TileKind::Treasure {
                *k = TileKind::Blank;
            }
        }
    }

    /// Side length of the square grid (3, 4, 5 ...).
    pub fn side(&self) -> usize {
        side_of(self.kinds.len())
    }

    /// Row dump: one line per row of kind codes, e.g. `Row 1: [0, 1, 0]`.
    pub fn dump_rows(&self) -> Vec<String> {
        let side = self.side().max(1);
        self.kinds.chunks(side)
            .enumerate()
            .map(|(r, row)| {
                let codes: Vec<String> = row.iter().map(|k| k.code().to_string()).collect();
                format!("Row {}: [{}]", r + 1, codes.join(", "))
            })
            .collect()
    }
}

/// Integer square root of a grid size (rounded down).
pub fn side_of(grid_size: usize) -> usize {
    let mut s = 0usize;
    while (s + 1) * (s + 1) <= grid_size {
        s += 1;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_rules() {
        assert!(TileKind::Treasure.counts_as_find());
        assert!(TileKind::ExtraLife.counts_as_find());
        assert!(!TileKind::ExtraScore.counts_as_find());
        assert!(!TileKind::Blank.counts_as_find());
    }

    #[test]
    fn out_of_range_is_blank() {
        let t = TileAssignment::blank(9);
        assert_eq!(t.kind_at(42), TileKind::Blank);
    }

    #[test]
    fn side_of_perfect_squares() {
        assert_eq!(side_of(9), 3);
        assert_eq!(side_of(16), 4);
        assert_eq!(side_of(25), 5);
        assert_eq!(side_of(0), 0);
    }

    #[test]
    fn dump_rows_layout() {
        let mut t = TileAssignment::blank(9);
        t.set(1, TileKind::Treasure);
        t.set(5, TileKind::ExtraLife);
        t.set(6, TileKind::ExtraScore);
        assert_eq!(t.dump_rows(), vec![
            "Row 1: [0, 1, 0]".to_string(),
            "Row 2: [0, 0, 2]".to_string(),
            "Row 3: [3, 0, 0]".to_string(),
        ]);
    }

    #[test]
    fn clear_treasures_keeps_items() {
        let mut t = TileAssignment::blank(4);
        t.set(0, TileKind::Treasure);
        t.set(1, TileKind::ExtraScore);
        t.clear_treasures();
        assert_eq!(t.count_of(TileKind::Treasure), 0);
        assert_eq!(t.kind_at(1), TileKind::ExtraScore);
    }
}
