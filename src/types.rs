use crate::error::{Result, ZstatesError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a variant within a locus
pub type Item = usize;

/// A canonical set of causal items, stored strictly increasing
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct ZState {
    items: Vec<Item>,
}

impl ZState {
    /// The state with no causal items (norm 0)
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn singleton(item: Item) -> Self {
        Self { items: vec![item] }
    }

    /// Every item of a universe of size `n_items` at once
    pub fn all(n_items: usize) -> Self {
        Self {
            items: (0..n_items).collect(),
        }
    }

    /// Build a state from items in any order. Repeated items are rejected.
    pub fn from_items(mut items: Vec<Item>) -> Result<Self> {
        items.sort_unstable();
        if let Some(pair) = items.windows(2).find(|w| w[0] == w[1]) {
            return Err(ZstatesError::InvalidState(format!(
                "item {} appears more than once",
                pair[0]
            )));
        }
        Ok(Self { items })
    }

    /// Like `from_items`, also rejecting items outside `[0, n_items)`
    pub fn from_items_in(items: Vec<Item>, n_items: usize) -> Result<Self> {
        let state = Self::from_items(items)?;
        if !state.fits_universe(n_items) {
            return Err(ZstatesError::InvalidState(format!(
                "{} has items outside a universe of {}",
                state, n_items
            )));
        }
        Ok(state)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Cardinality of the state
    pub fn norm(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    pub fn max_item(&self) -> Option<Item> {
        self.items.last().copied()
    }

    /// This state plus `item`, or `None` when `item` is already a member
    pub fn with_item(&self, item: Item) -> Option<ZState> {
        match self.items.binary_search(&item) {
            Ok(_) => None,
            Err(pos) => {
                let mut items = Vec::with_capacity(self.items.len() + 1);
                items.extend_from_slice(&self.items[..pos]);
                items.push(item);
                items.extend_from_slice(&self.items[pos..]);
                Some(Self { items })
            }
        }
    }

    /// All states of norm + 1 obtained by adding one item of `[0, n_items)`.
    /// Results come out in increasing order of the added item.
    pub fn extensions(&self, n_items: usize) -> Vec<ZState> {
        let mut out = Vec::with_capacity(n_items.saturating_sub(self.items.len()));
        let mut members = self.items.iter().peekable();
        for item in 0..n_items {
            if members.peek() == Some(&&item) {
                members.next();
                continue;
            }
            if let Some(state) = self.with_item(item) {
                out.push(state);
            }
        }
        out
    }

    pub fn is_superset_of(&self, other: &ZState) -> bool {
        other.items.iter().all(|item| self.contains(*item))
    }

    /// True when every item lies in `[0, n_items)`
    pub fn fits_universe(&self, n_items: usize) -> bool {
        self.max_item().map_or(true, |max| max < n_items)
    }
}

impl TryFrom<Vec<Item>> for ZState {
    type Error = ZstatesError;

    fn try_from(items: Vec<Item>) -> Result<Self> {
        Self::from_items(items)
    }
}

impl From<ZState> for Vec<Item> {
    fn from(state: ZState) -> Self {
        state.items
    }
}

impl fmt::Display for ZState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.items)
    }
}

/// Per-locus input of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locus {
    pub n_items: usize,
    pub is_covariate: bool,
}

impl Locus {
    pub fn snps(n_items: usize) -> Self {
        Self {
            n_items,
            is_covariate: false,
        }
    }

    pub fn covariate(n_items: usize) -> Self {
        Self {
            n_items,
            is_covariate: true,
        }
    }
}

/// Append-only sequence of states, grouped into levels in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CollectionParts")]
pub struct Collection {
    states: Vec<ZState>,
    level_starts: Vec<usize>, // Offset of the first state of every level
}

/// Unchecked serialized form of a `Collection`
#[derive(Deserialize)]
struct CollectionParts {
    states: Vec<ZState>,
    level_starts: Vec<usize>,
}

impl TryFrom<CollectionParts> for Collection {
    type Error = ZstatesError;

    fn try_from(parts: CollectionParts) -> Result<Self> {
        let CollectionParts {
            states,
            level_starts,
        } = parts;

        if level_starts.first().map_or(!states.is_empty(), |&first| first != 0) {
            return Err(ZstatesError::InvalidState(
                "first level must start at offset 0".to_string(),
            ));
        }
        if level_starts.windows(2).any(|w| w[0] > w[1]) {
            return Err(ZstatesError::InvalidState(
                "level offsets must not decrease".to_string(),
            ));
        }
        if let Some(&last) = level_starts.last() {
            if last > states.len() {
                return Err(ZstatesError::InvalidState(format!(
                    "level offset {} past {} states",
                    last,
                    states.len()
                )));
            }
        }
        Ok(Self {
            states,
            level_starts,
        })
    }
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a whole level and return its index
    pub fn push_level(&mut self, level: Vec<ZState>) -> usize {
        self.level_starts.push(self.states.len());
        self.states.extend(level);
        self.level_starts.len() - 1
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn num_levels(&self) -> usize {
        self.level_starts.len()
    }

    pub fn states(&self) -> &[ZState] {
        &self.states
    }

    pub fn level(&self, index: usize) -> Option<&[ZState]> {
        let start = *self.level_starts.get(index)?;
        let end = self
            .level_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.states.len());
        Some(&self.states[start..end])
    }

    /// The most recently appended level (empty slice if there is none)
    pub fn last_level(&self) -> &[ZState] {
        match self.level_starts.last() {
            Some(&start) => &self.states[start..],
            None => &[],
        }
    }

    pub fn level_sizes(&self) -> Vec<usize> {
        (0..self.num_levels())
            .map(|k| self.level(k).map_or(0, <[ZState]>::len))
            .collect()
    }

    pub fn levels(&self) -> impl Iterator<Item = &[ZState]> + '_ {
        (0..self.num_levels()).filter_map(move |k| self.level(k))
    }

    pub fn into_states(self) -> Vec<ZState> {
        self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_canonicalizes() {
        let state = ZState::from_items(vec![5, 1, 3]).unwrap();
        assert_eq!(state.items(), &[1, 3, 5]);
        assert_eq!(state.norm(), 3);
    }

    #[test]
    fn test_from_items_rejects_repeats() {
        assert!(matches!(
            ZState::from_items(vec![2, 4, 2]),
            Err(ZstatesError::InvalidState(_))
        ));
    }

    #[test]
    fn test_with_item_keeps_order() {
        let state = ZState::from_items(vec![1, 4]).unwrap();
        assert_eq!(state.with_item(2).unwrap().items(), &[1, 2, 4]);
        assert_eq!(state.with_item(7).unwrap().items(), &[1, 4, 7]);
        assert_eq!(state.with_item(0).unwrap().items(), &[0, 1, 4]);
        assert!(state.with_item(4).is_none());
    }

    #[test]
    fn test_extensions_skip_members() {
        let state = ZState::from_items(vec![0, 2]).unwrap();
        let ext: Vec<Vec<Item>> = state
            .extensions(4)
            .into_iter()
            .map(Vec::from)
            .collect();
        assert_eq!(ext, vec![vec![0, 1, 2], vec![0, 2, 3]]);

        // Full universe has nothing left to add
        assert!(ZState::all(3).extensions(3).is_empty());
    }

    #[test]
    fn test_superset_and_universe() {
        let big = ZState::from_items(vec![1, 2, 5]).unwrap();
        let small = ZState::from_items(vec![2, 5]).unwrap();
        assert!(big.is_superset_of(&small));
        assert!(!small.is_superset_of(&big));
        assert!(big.is_superset_of(&ZState::empty()));
        assert!(big.fits_universe(6));
        assert!(!big.fits_universe(5));
    }

    #[test]
    fn test_serde_rejects_non_canonical() {
        let ok: ZState = serde_json::from_str("[3, 1]").unwrap();
        assert_eq!(ok.items(), &[1, 3]);
        assert!(serde_json::from_str::<ZState>("[1, 1]").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "[1,3]");
    }

    #[test]
    fn test_from_items_in_checks_universe() {
        assert_eq!(ZState::from_items_in(vec![3, 0], 4).unwrap().items(), &[0, 3]);
        assert!(matches!(
            ZState::from_items_in(vec![1, 4], 4),
            Err(ZstatesError::InvalidState(_))
        ));
        assert!(ZState::from_items_in(vec![2, 2], 4).is_err());
        assert!(ZState::from_items_in(Vec::new(), 0).is_ok());
    }

    #[test]
    fn test_serde_rejects_bad_level_offsets() {
        let bad = [
            r#"{"states":[[],[0]],"level_starts":[0,5]}"#,
            r#"{"states":[[],[0],[1]],"level_starts":[0,2,1]}"#,
            r#"{"states":[[],[0]],"level_starts":[1]}"#,
            r#"{"states":[[],[0]],"level_starts":[]}"#,
        ];
        for json in bad {
            assert!(serde_json::from_str::<Collection>(json).is_err(), "{} accepted", json);
        }

        let mut collection = Collection::new();
        collection.push_level(vec![ZState::empty()]);
        collection.push_level(vec![ZState::singleton(0), ZState::singleton(1)]);
        collection.push_level(Vec::new());
        let json = serde_json::to_string(&collection).unwrap();
        let restored: Collection = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, collection);
        assert_eq!(restored.level_sizes(), vec![1, 2, 0]);

        let empty: Collection = serde_json::from_str(r#"{"states":[],"level_starts":[]}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_collection_levels() {
        let mut collection = Collection::new();
        assert_eq!(collection.push_level(vec![ZState::empty()]), 0);
        assert_eq!(
            collection.push_level((0..3).map(ZState::singleton).collect()),
            1
        );
        assert_eq!(collection.push_level(Vec::new()), 2);

        assert_eq!(collection.len(), 4);
        assert_eq!(collection.num_levels(), 3);
        assert_eq!(collection.level_sizes(), vec![1, 3, 0]);
        assert_eq!(collection.level(1).unwrap()[2], ZState::singleton(2));
        assert!(collection.last_level().is_empty());
        assert!(collection.level(3).is_none());
        assert_eq!(collection.levels().count(), 3);
    }
}
