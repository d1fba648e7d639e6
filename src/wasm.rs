//! WebAssembly bindings for Lattice Viz.
//!
//! Provides a thin wrapper around `Visualizer` for browser environments. Every
//! mutating call returns the changed cells so the page repaints only those.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    compute::{CellDelta, Visualizer},
    schema::{Algorithm, CellState, DrawMode, LatticeConfig},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn deltas(delta: &[CellDelta]) -> Result<JsValue, JsValue> {
    to_js(&delta)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WebAssembly wrapper for the lattice visualizer.
#[wasm_bindgen]
pub struct WasmVisualizer {
    inner: Visualizer,
}

#[wasm_bindgen]
impl WasmVisualizer {
    /// Create a visualizer from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing LatticeConfig
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmVisualizer, JsValue> {
        let config: LatticeConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;

        let inner = Visualizer::new(config).map_err(js_error)?;
        Ok(WasmVisualizer { inner })
    }

    /// Apply the current draw mode at a cell.
    #[wasm_bindgen]
    pub fn paint(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        let delta = self.inner.paint(row, col).map_err(js_error)?;
        deltas(&delta)
    }

    /// Select the draw mode by name ("wall", "vacant", "origin", "goal").
    #[wasm_bindgen(js_name = setDrawMode)]
    pub fn set_draw_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: DrawMode = mode
            .parse()
            .map_err(|_| JsValue::from_str(&format!("Unknown draw mode: {mode}")))?;
        self.inner.set_draw_mode(mode);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) -> Result<JsValue, JsValue> {
        deltas(&self.inner.clear())
    }

    #[wasm_bindgen]
    pub fn fill(&mut self) -> Result<JsValue, JsValue> {
        deltas(&self.inner.fill())
    }

    /// Random walls; uses the configured density when `density` is omitted.
    #[wasm_bindgen]
    pub fn randomize(&mut self, density: Option<f64>) -> Result<JsValue, JsValue> {
        let delta = self.inner.randomize(density).map_err(js_error)?;
        deltas(&delta)
    }

    /// Start a search by algorithm name ("dfs", "bfs", "dijkstra", "astar").
    #[wasm_bindgen(js_name = startSearch)]
    pub fn start_search(&mut self, algorithm: &str) -> Result<JsValue, JsValue> {
        let algorithm: Algorithm = algorithm
            .parse()
            .map_err(|_| JsValue::from_str(&format!("Unknown algorithm: {algorithm}")))?;
        let delta = self.inner.start_search(algorithm).map_err(js_error)?;
        deltas(&delta)
    }

    #[wasm_bindgen(js_name = startMaze)]
    pub fn start_maze(&mut self) -> Result<JsValue, JsValue> {
        deltas(&self.inner.start_maze())
    }

    #[wasm_bindgen(js_name = startLife)]
    pub fn start_life(&mut self) -> Result<JsValue, JsValue> {
        deltas(&self.inner.start_life())
    }

    /// Advance the active operation. Returns the tick, or `null` when idle.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.step() {
            Some(tick) => to_js(&tick),
            None => Ok(JsValue::NULL),
        }
    }

    /// Stop the active operation. Returns whether one was running.
    #[wasm_bindgen]
    pub fn cancel(&mut self) -> bool {
        self.inner.cancel()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Get every cell state in row-major order.
    #[wasm_bindgen(js_name = getCells)]
    pub fn get_cells(&self) -> Result<JsValue, JsValue> {
        let lattice = self.inner.lattice();
        let snapshot = LatticeSnapshot {
            rows: lattice.rows(),
            cols: lattice.cols(),
            cells: lattice.snapshot(),
        };
        to_js(&snapshot)
    }

    #[wasm_bindgen(js_name = getRows)]
    pub fn get_rows(&self) -> usize {
        self.inner.lattice().rows()
    }

    #[wasm_bindgen(js_name = getCols)]
    pub fn get_cols(&self) -> usize {
        self.inner.lattice().cols()
    }
}

/// Serializable snapshot of the lattice.
#[derive(Serialize)]
struct LatticeSnapshot {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}
