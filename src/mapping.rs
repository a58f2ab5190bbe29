//! Coordinate mapping between the logical chain surface and the physical
//! modules.
//!
//! Implementors of a chain layout have to answer one question for every
//! global pixel: which module owns it, and at which *rotated* local
//! coordinate. [`Layout::locate`] does the tile arithmetic and
//! [`Rotation::transform`] applies the module's mounting orientation on
//! top. Both are pure functions and are exercised by every global draw
//! call, so they are tested against hand-computed tables.

use crate::MODULE_SIZE;

/// Mounting rotation of one module, as seen from the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Connector in the reference position.
    #[default]
    Deg0,
    /// Rotated 90° clockwise.
    Deg90,
    /// Rotated 180°.
    Deg180,
    /// Rotated 270° clockwise.
    Deg270,
}

impl Rotation {
    /// Map an unrotated local pixel to the rotated module coordinate.
    ///
    /// `x` and `y` must be in `0..8`. The 180° case is derived by applying
    /// the 90° transform twice so all four cases share one primitive.
    #[must_use]
    pub const fn transform(self, x: u8, y: u8) -> (u8, u8) {
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (y, 7 - x),
            Rotation::Deg180 => {
                let (x, y) = Rotation::Deg90.transform(x, y);
                Rotation::Deg90.transform(x, y)
            }
            Rotation::Deg270 => (7 - y, x),
        }
    }

    /// Rotate a full 8x8 bitmap (one byte per row, bit = column) as a block.
    ///
    /// This is the bulk counterpart of [`transform`](Rotation::transform)
    /// used when flattening the extended frame into module shadow RAM: whole
    /// rows move at once instead of per-pixel lookups. Only the two 90°
    /// transposes exist as primitives; 180° is two clockwise turns.
    #[must_use]
    pub fn rotate_rows(self, rows: &[u8; MODULE_SIZE]) -> [u8; MODULE_SIZE] {
        match self {
            Rotation::Deg0 => *rows,
            Rotation::Deg90 => rotate_cw(rows),
            Rotation::Deg180 => rotate_cw(&rotate_cw(rows)),
            Rotation::Deg270 => rotate_ccw(rows),
        }
    }
}

// Source bit (x, y) lands at row 7-x, column y.
fn rotate_cw(src: &[u8; MODULE_SIZE]) -> [u8; MODULE_SIZE] {
    let mut dst = [0u8; MODULE_SIZE];
    for (y, &row) in src.iter().enumerate() {
        for x in 0..MODULE_SIZE {
            if row & (1 << x) != 0 {
                dst[7 - x] |= 1 << y;
            }
        }
    }
    dst
}

// Source bit (x, y) lands at row x, column 7-y.
fn rotate_ccw(src: &[u8; MODULE_SIZE]) -> [u8; MODULE_SIZE] {
    let mut dst = [0u8; MODULE_SIZE];
    for (y, &row) in src.iter().enumerate() {
        for x in 0..MODULE_SIZE {
            if row & (1 << x) != 0 {
                dst[x] |= 1 << (7 - y);
            }
        }
    }
    dst
}

/// Tiling orientation of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Modules tile left to right, wrapping to the next row after
    /// `layout_cols` modules.
    #[default]
    Horizontal,
    /// Modules tile top to bottom in a single column.
    Vertical,
}

/// Where a global pixel lives: module index plus the *unrotated* local
/// coordinate within that module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleLocation {
    /// Index of the owning module in the chain (`0..module_count`).
    pub index: usize,
    /// Local column before rotation, `0..8`.
    pub x: u8,
    /// Local row before rotation, `0..8`.
    pub y: u8,
}

/// Physical arrangement of a module chain.
///
/// The layout is fixed at chain construction. Total pixel area is always
/// `module_count * 64`; every in-bounds global pixel maps to exactly one
/// module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    orientation: Orientation,
    layout_cols: usize,
    module_count: usize,
}

impl Layout {
    /// Create a layout description.
    ///
    /// Returns `None` when `layout_cols` or `module_count` is zero, or when
    /// a horizontal layout names more columns than there are modules.
    #[must_use]
    pub const fn new(
        orientation: Orientation,
        layout_cols: usize,
        module_count: usize,
    ) -> Option<Self> {
        if layout_cols == 0 || module_count == 0 {
            return None;
        }
        if matches!(orientation, Orientation::Horizontal) && layout_cols > module_count {
            return None;
        }
        Some(Self {
            orientation,
            layout_cols,
            module_count,
        })
    }

    /// Chain tiling orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of modules in the chain.
    #[must_use]
    pub const fn module_count(&self) -> usize {
        self.module_count
    }

    /// Number of module columns in the tiling grid.
    #[must_use]
    pub const fn grid_cols(&self) -> usize {
        crate::compute_grid_cols(self.orientation, self.layout_cols)
    }

    /// Number of module rows in the tiling grid.
    #[must_use]
    pub const fn grid_rows(&self) -> usize {
        crate::compute_grid_rows(self.module_count, self.grid_cols())
    }

    /// Visible surface width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.grid_cols() * MODULE_SIZE
    }

    /// Visible surface height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.grid_rows() * MODULE_SIZE
    }

    /// Map a global pixel to its owning module and unrotated local
    /// coordinate.
    ///
    /// Returns `None` for coordinates outside the surface, including pixels
    /// that fall in the unpopulated remainder of a final partial grid row.
    #[must_use]
    pub fn locate(&self, gx: i32, gy: i32) -> Option<ModuleLocation> {
        if gx < 0 || gy < 0 {
            return None;
        }
        let (gx, gy) = (gx as usize, gy as usize);
        if gx >= self.width() || gy >= self.height() {
            return None;
        }
        let col = gx / MODULE_SIZE;
        let row = gy / MODULE_SIZE;
        let index = row * self.grid_cols() + col;
        if index >= self.module_count {
            return None;
        }
        Some(ModuleLocation {
            index,
            x: (gx % MODULE_SIZE) as u8,
            y: (gy % MODULE_SIZE) as u8,
        })
    }

    /// Map a global pixel all the way to a rotated module-local coordinate,
    /// using the owning module's rotation from `rotations`.
    #[must_use]
    pub fn map(&self, rotations: &[Rotation], gx: i32, gy: i32) -> Option<(usize, u8, u8)> {
        let location = self.locate(gx, gy)?;
        let rotation = *rotations.get(location.index)?;
        let (x, y) = rotation.transform(location.x, location.y);
        Some((location.index, x, y))
    }
}
