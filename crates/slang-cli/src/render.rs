//! The render-flag stub (spec.md section 6's `--grid-*`/`--ppu`/`--zoom`
//! flags, section 9's "CLI graphical flags... have no effect on the
//! runtime core"). `RenderOptions` is parsed and validated by `main.rs`
//! but never consulted by `slang`; this module exists only to document the
//! seam where a rendering collaborator would take over.

use slang::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPosition {
    Top,
    Bottom,
    None,
}

impl GridPosition {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl Default for GridPosition {
    fn default() -> Self {
        Self::Top
    }
}

/// The `--grid-*`/`--ppu`/`--zoom` flag group, defaults per section 6.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub grid_size: u32,
    pub grid_fine: u32,
    pub grid_position: GridPosition,
    pub ppu: u32,
    pub zoom: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { grid_size: 4, grid_fine: 1, grid_position: GridPosition::default(), ppu: 8, zoom: 1 }
    }
}

/// The seam a rendering collaborator would hang off of: given the
/// evaluated result and the render flags, produce pixels somewhere (a
/// file, a window). Out of scope for this repository (section 1's
/// Non-goals treat grid/ppu/zoom rendering as an external collaborator),
/// so this always reports that no renderer is wired up rather than
/// attempting one.
pub fn render(options: &RenderOptions, _value: &Expr) -> Result<(), String> {
    Err(format!(
        "no rendering collaborator is available in this build (grid_size={}, grid_fine={}, grid_position={:?}, ppu={}, zoom={}); pass -p to print the JSON result, or an out_path to write it to a file",
        options.grid_size, options.grid_fine, options.grid_position, options.ppu, options.zoom
    ))
}
