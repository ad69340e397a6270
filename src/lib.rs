// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! castles: an exhaustive enumerator of stacked-block castles.
//!
//! A castle is built on a grid `w` columns wide and `h` rows tall out of blocks one row high and of
//! any integral width. The bottom row is a single block spanning the whole grid; every other block
//! must sit entirely on top of a block in the row below, two blocks on the same row must leave at
//! least one empty column between them, and the castle must reach the top row. This library counts
//! every such castle and splits the count by whether it uses an even or an odd number of blocks.
//!
//! The search is a depth-first walk over a single [`Castle`] which is mutated in place: every
//! [`Castle::place`] is paired with a [`Castle::remove`] that restores the exact prior state, so no
//! state is ever copied while searching. [`Enumerator`] drives that walk; [`count`] wraps the whole
//! query for one pair of dimensions.

#![no_std]

use alloc::vec;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt::{Debug, Display, Formatter};
use core::marker::PhantomData;
use core::num::IntErrorKind;
use core::ops::{Add, AddAssign, DerefMut, Range, Sub};
use log::debug;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, One, Unsigned, Zero};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

extern crate alloc;

/// Marker trait: specifies that a value may be used for grid coordinates and widths.
pub trait GridValue:
    One
    + Ord
    + Add<Output = Self>
    + CheckedAdd
    + Sub<Output = Self>
    + CheckedSub
    + CheckedMul
    + AddAssign
    + Copy
    + Into<usize>
    + Zero
    + Debug
    + Display
    + Unsigned
    + DeserializeOwned
    + Serialize
    + 'static
{
}

impl<V> GridValue for V where
    V: One
        + Ord
        + Add<Output = Self>
        + CheckedAdd
        + Sub<Output = Self>
        + CheckedSub
        + CheckedMul
        + AddAssign
        + Copy
        + Into<usize>
        + Zero
        + Debug
        + Display
        + Unsigned
        + DeserializeOwned
        + Serialize
        + 'static
{
}

/// A horizontal run of columns within one row, generic over the numeric type which backs it.
///
/// The same shape describes both a placed block and an open space in which blocks may be placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Block<V> {
    start: V,
    width: V,
}

impl<V> Block<V> {
    /// The leftmost column of the block.
    pub fn start(&self) -> &V {
        &self.start
    }

    /// The number of columns covered by the block.
    pub fn width(&self) -> &V {
        &self.width
    }
}

impl<V> Block<V>
where
    V: GridValue,
{
    /// Create a new block starting at the provided column, or `None` if the width is zero.
    pub fn new(start: V, width: V) -> Option<Self> {
        if width < V::one() {
            None
        } else {
            Some(Self { start, width })
        }
    }

    /// The column one past the rightmost column of the block.
    pub fn end(&self) -> V {
        self.start + self.width
    }

    fn spanning(start: V, end: V) -> Self {
        debug_assert!(start < end, "empty span {start}..{end}");
        Self {
            start,
            width: end - start,
        }
    }

    fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    fn columns(&self) -> Range<usize> {
        self.start.into()..self.end().into()
    }
}

/// The dimensions of a castle grid in terms of columns and rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Dimensions<V> {
    width: V,
    height: V,
}

impl<V> Dimensions<V> {
    /// The number of columns.
    pub fn width(&self) -> &V {
        &self.width
    }

    /// The number of rows.
    pub fn height(&self) -> &V {
        &self.height
    }
}

/// An error associated with the creation of the dimensions.
#[derive(Debug)]
pub struct InvalidDimensions(IntErrorKind);

impl InvalidDimensions {
    /// Why the dimensions were rejected: [`IntErrorKind::Zero`] or [`IntErrorKind::PosOverflow`].
    pub fn kind(&self) -> &IntErrorKind {
        &self.0
    }
}

impl Display for InvalidDimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let reason = match self.0 {
            IntErrorKind::PosOverflow => "the grid is too large for the grid value type",
            IntErrorKind::Zero => "the grid has no columns or no rows",
            _ => unreachable!(),
        };
        f.write_fmt(format_args!("castle dimensions could not be used: {reason}"))
    }
}

impl Error for InvalidDimensions {}

impl<V> TryFrom<(V, V)> for Dimensions<V>
where
    V: GridValue,
{
    type Error = InvalidDimensions;

    /// Takes `(width, height)`.
    fn try_from((width, height): (V, V)) -> Result<Self, Self::Error> {
        if width.is_zero() || height.is_zero() {
            Err(InvalidDimensions(IntErrorKind::Zero))
        } else if width.checked_mul(&height).is_none() || width.checked_add(&V::one()).is_none()
        {
            Err(InvalidDimensions(IntErrorKind::PosOverflow))
        } else {
            Ok(Self { width, height })
        }
    }
}

/// Numbers of complete castles, split by the parity of the number of blocks they use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Tally {
    even: u64,
    odd: u64,
}

impl Tally {
    /// Castles made of an even number of blocks.
    pub fn even(&self) -> u64 {
        self.even
    }

    /// Castles made of an odd number of blocks.
    pub fn odd(&self) -> u64 {
        self.odd
    }

    /// All castles.
    pub fn total(&self) -> u64 {
        self.even + self.odd
    }

    fn record(&mut self, even: bool) {
        if even {
            self.even += 1;
        } else {
            self.odd += 1;
        }
    }
}

impl Add for Tally {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            even: self.even + rhs.even,
            odd: self.odd + rhs.odd,
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.even += rhs.even;
        self.odd += rhs.odd;
    }
}

impl From<Tally> for (u64, u64) {
    fn from(tally: Tally) -> Self {
        (tally.even, tally.odd)
    }
}

/// How a freed block's surroundings bound the space that replaces it, on one side.
#[derive(Copy, Clone, Debug)]
enum Edge<V> {
    /// The space stops at the block itself: the grid edge, an overhang, or a block one column away.
    Closed(V),
    /// The reserved gap column rejoins the space, with no residual space beyond it.
    Gap(V),
    /// The space continues through the gap into the residual left behind when the block was placed.
    Merge(V),
}

impl<V> Edge<V>
where
    V: Copy,
{
    fn bound(self) -> V {
        match self {
            Edge::Closed(bound) | Edge::Gap(bound) | Edge::Merge(bound) => bound,
        }
    }
}

/// A castle under construction.
///
/// Row `0` is the top of the grid and the last row is the base, which is filled with a single block
/// on construction. Blocks are only ever laid in the current row, which starts directly above the
/// base and moves up with [`Castle::advance_row`]. Every row keeps a left-to-right list of the open
/// spaces in which a new block could legally lie: a space sits on top of a single block of the row
/// below and never touches a block of its own row.
///
/// The castle is only guaranteed to be valid as long as it is manipulated in last-in-first-out
/// order, i.e. each [`Castle::remove`] undoes the most recent [`Castle::place`] still in effect and
/// each [`Castle::retreat_row`] undoes the most recent [`Castle::advance_row`]. [`Enumerator`]
/// maintains this discipline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Castle<V> {
    dim: Dimensions<V>,
    occupied: Vec<bool>,
    unavailable: Vec<bool>,
    placed: Vec<usize>,
    spaces: Vec<Vec<Block<V>>>,
    row: usize,
    last_id: u64,
    skip_space: bool,
}

impl<V> Castle<V> {
    /// The dimensions of this castle.
    pub fn dimensions(&self) -> &Dimensions<V> {
        &self.dim
    }

    /// The open spaces of the current row, left to right.
    pub fn spaces(&self) -> &[Block<V>] {
        &self.spaces[self.row]
    }

    /// The number of blocks currently placed, the base included.
    pub fn block_count(&self) -> u64 {
        self.last_id
    }

    /// Whether the current row is the base row.
    pub fn is_base_row(&self) -> bool {
        self.row + 1 == self.placed.len()
    }

    /// Whether the current row is the top row of the grid.
    pub fn in_top_row(&self) -> bool {
        self.row == 0
    }

    /// Whether another block fits somewhere in the current row.
    pub fn has_open_space(&self) -> bool {
        !self.spaces[self.row].is_empty()
    }

    /// Whether the top row holds a block, i.e. whether the castle is complete.
    pub fn top_row_has_blocks(&self) -> bool {
        self.placed[0] > 0
    }

    /// Whether the castle currently uses an even number of blocks.
    pub fn last_id_is_even(&self) -> bool {
        self.last_id % 2 == 0
    }

    /// Whether building may continue in the row above, which needs a block to stand on.
    pub fn can_advance(&self) -> bool {
        !self.in_top_row() && self.placed[self.row] > 0
    }

    /// Start building in the row above.
    pub fn advance_row(&mut self) {
        debug_assert!(self.can_advance(), "nothing to build on in row {}", self.row);
        self.row -= 1;
    }

    /// Undo an [`Castle::advance_row`].
    pub fn retreat_row(&mut self) {
        debug_assert!(self.row + 2 < self.placed.len(), "cannot retreat into the base row");
        self.row += 1;
    }

    /// Reads and clears the flag set by a [`Castle::place`] which left a residual space to the left
    /// of the block. The search must then resume one space further right than the returned index.
    pub fn take_skip(&mut self) -> bool {
        core::mem::take(&mut self.skip_space)
    }
}

impl<V> Castle<V>
where
    V: GridValue,
{
    /// Produce a castle of the provided dimensions holding only its base block.
    pub fn new<D: TryInto<Dimensions<V>>>(dim: D) -> Result<Self, D::Error> {
        let dim = dim.try_into()?;
        let (width, height): (usize, usize) = (dim.width.into(), dim.height.into());
        let mut castle = Self {
            dim,
            occupied: vec![false; width * height],
            unavailable: vec![false; width * height],
            placed: vec![0; height],
            spaces: vec![Vec::new(); height],
            row: height - 1,
            last_id: 0,
            skip_space: false,
        };

        let base = Block {
            start: V::zero(),
            width: dim.width,
        };
        castle.spaces[castle.row].push(base);
        castle.place(base, 0);
        if castle.can_advance() {
            castle.advance_row();
        }
        debug!("laid the base of a {}x{} castle", dim.width, dim.height);
        Ok(castle)
    }

    /// An enumerator searching every castle reachable from this one.
    pub fn enumerator(&mut self) -> Enumerator<&mut Self, V> {
        Enumerator {
            castle: self,
            phantom: PhantomData,
        }
    }

    fn width(&self) -> usize {
        self.dim.width.into()
    }

    fn height(&self) -> usize {
        self.dim.height.into()
    }

    fn cell(&self, row: usize, column: usize) -> usize {
        row * self.width() + column
    }

    fn is_occupied(&self, row: usize, column: usize) -> bool {
        self.occupied[self.cell(row, column)]
    }

    fn is_supported(&self, column: usize) -> bool {
        self.row + 1 < self.height() && self.is_occupied(self.row + 1, column)
    }

    /// Lay `block` in the current row, inside the open space at index `space`.
    ///
    /// The space is replaced by whatever remains of it on either side of the block once the gap
    /// columns around the block are reserved, and a space matching the block is opened in the row
    /// above. Returns the index of the space the block was taken from, which is the index to hand
    /// back to [`Castle::remove`]; see also [`Castle::take_skip`].
    pub fn place(&mut self, block: Block<V>, space: usize) -> usize {
        let row = self.row;
        let taken = self.spaces[row].remove(space);
        debug_assert!(taken.contains(&block), "{block:?} does not fit in {taken:?}");
        debug_assert!(
            block
                .columns()
                .all(|column| !self.unavailable[self.cell(row, column)]),
            "{block:?} touches a block in row {row}"
        );

        self.last_id += 1;
        let offset = self.cell(row, 0);
        self.occupied[offset..][block.columns()].fill(true);
        self.placed[row] += 1;

        let left = block.start.checked_sub(&V::one());
        let right = block.end();
        if let Some(left) = left {
            let cell = self.cell(row, left.into());
            self.unavailable[cell] = true;
        }
        if right < self.dim.width {
            let cell = self.cell(row, right.into());
            self.unavailable[cell] = true;
        }

        if let Some(above) = row.checked_sub(1) {
            self.spaces[above].push(block);
        }

        let mut at = space;
        if let Some(left) = left
            && left > taken.start
        {
            self.spaces[row].insert(at, Block::spanning(taken.start, left));
            at += 1;
            self.skip_space = true;
        }
        let rest = right + V::one();
        if rest < taken.end() {
            self.spaces[row].insert(at, Block::spanning(rest, taken.end()));
        }
        space
    }

    /// Undo the most recent [`Castle::place`] of `block`, which returned `space`.
    pub fn remove(&mut self, block: Block<V>, space: usize) {
        let row = self.row;
        debug_assert!(!self.is_base_row(), "the base block is never removed");

        self.last_id -= 1;
        let offset = self.cell(row, 0);
        self.occupied[offset..][block.columns()].fill(false);
        self.placed[row] -= 1;

        if let Some(above) = row.checked_sub(1) {
            let opened = self.spaces[above].pop();
            debug_assert_eq!(opened, Some(block), "row {above} gained spaces since {block:?}");
        }

        let left = self.left_edge(&block, space);
        let beyond = space + usize::from(matches!(left, Edge::Merge(_)));
        let right = self.right_edge(&block, beyond);

        let spaces = &mut self.spaces[row];
        match (left, right) {
            (Edge::Merge(start), Edge::Merge(end)) => {
                spaces[space] = Block::spanning(start, end);
                spaces.remove(space + 1);
            }
            (Edge::Merge(start), right) => spaces[space] = Block::spanning(start, right.bound()),
            (left, Edge::Merge(end)) => spaces[space] = Block::spanning(left.bound(), end),
            (left, right) => spaces.insert(space, Block::spanning(left.bound(), right.bound())),
        }
    }

    /// Frees the gap column left of a removed block and classifies the left end of its space. The
    /// residual left of the block, if any, sits at index `space`.
    fn left_edge(&mut self, block: &Block<V>, space: usize) -> Edge<V> {
        let Some(gap) = block.start.checked_sub(&V::one()) else {
            return Edge::Closed(block.start);
        };
        let row = self.row;
        let blocked = gap
            .checked_sub(&V::one())
            .is_some_and(|far| self.is_occupied(row, far.into()));
        let cell = self.cell(row, gap.into());
        self.unavailable[cell] = blocked;

        if blocked || !self.is_supported(gap.into()) {
            return Edge::Closed(block.start);
        }
        match self.spaces[row].get(space) {
            Some(residual) if residual.end() == gap => Edge::Merge(residual.start),
            _ => Edge::Gap(gap),
        }
    }

    /// Frees the gap column right of a removed block and classifies the right end of its space.
    /// The residual right of the block, if any, sits at index `space`.
    fn right_edge(&mut self, block: &Block<V>, space: usize) -> Edge<V> {
        let gap = block.end();
        if gap >= self.dim.width {
            return Edge::Closed(gap);
        }
        let row = self.row;
        let far = gap + V::one();
        let blocked = far < self.dim.width && self.is_occupied(row, far.into());
        let cell = self.cell(row, gap.into());
        self.unavailable[cell] = blocked;

        if blocked || !self.is_supported(gap.into()) {
            return Edge::Closed(gap);
        }
        match self.spaces[row].get(space) {
            Some(residual) if residual.start == far => Edge::Merge(residual.end()),
            _ => Edge::Gap(far),
        }
    }
}

impl<V> Display for Castle<V>
where
    V: GridValue,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for row in 0..self.height() {
            for column in 0..self.width() {
                f.write_str(if self.is_occupied(row, column) { "#" } else { "." })?;
            }
            if row == self.row {
                f.write_str(" <")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A depth-first search over every castle that can be built on top of a [`Castle`].
///
/// The enumerator only touches the castle through its placement API and leaves it exactly as it
/// found it once a search returns.
#[derive(Debug)]
pub struct Enumerator<R, V> {
    castle: R,
    phantom: PhantomData<V>,
}

impl<R, V> Enumerator<R, V>
where
    R: DerefMut<Target = Castle<V>>,
{
    /// Gets the castle being searched.
    pub fn castle(&self) -> &Castle<V> {
        &self.castle
    }
}

impl<R, V> Enumerator<R, V>
where
    R: DerefMut<Target = Castle<V>>,
    V: GridValue,
{
    /// Count every complete castle reachable by adding blocks to the current row, from the open
    /// space at index `from` rightwards, and to the rows above it.
    ///
    /// Spaces are visited left to right; within a space, block widths ascend and, within a width,
    /// start columns ascend.
    pub fn enumerate(&mut self, from: usize) -> Tally {
        let mut tally = Tally::default();
        if self.castle.top_row_has_blocks() {
            tally.record(self.castle.last_id_is_even());
        }

        let mut index = from;
        while index < self.castle.spaces().len() {
            let space = self.castle.spaces()[index];
            let mut width = V::one();
            while width <= space.width {
                let mut start = space.start;
                while start + width <= space.end() {
                    let block = Block { start, width };
                    let resume = self.castle.place(block, index);
                    let next = if self.castle.take_skip() {
                        resume + 1
                    } else {
                        resume
                    };
                    tally += self.enumerate(next);
                    self.castle.remove(block, resume);
                    start += V::one();
                }
                width += V::one();
            }
            index += 1;
        }

        if self.castle.can_advance() {
            self.castle.advance_row();
            tally += self.enumerate(0);
            self.castle.retreat_row();
        }
        tally
    }
}

/// Count every castle of the provided dimensions.
pub fn count<V, D>(dim: D) -> Result<Tally, D::Error>
where
    V: GridValue,
    D: TryInto<Dimensions<V>>,
{
    let mut castle = Castle::new(dim)?;
    let tally = castle.enumerator().enumerate(0);
    debug!(
        "{}x{} grid: {} even and {} odd castles",
        castle.dim.width, castle.dim.height, tally.even, tally.odd
    );
    Ok(tally)
}
