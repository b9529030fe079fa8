#![cfg(target_arch = "wasm32")]

use crate::engine::{scenario_by_id, scenario_catalog, Engine, ScenarioInfo, SCENARIO_FIGURE_EIGHT};
use crate::models::scenarios::configs_from_states;
use crate::sim::{ScenarioConfig, Thresholds};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn available_scenarios() -> js_sys::Array {
    let out = js_sys::Array::new();
    for info in scenario_catalog() {
        out.push(&scenario_info_to_js(info));
    }
    out
}

/// Full configuration object of a preset, for pre-filling input fields.
#[wasm_bindgen]
pub fn scenario_defaults(scenario_id: &str) -> Result<JsValue, JsValue> {
    let config = scenario_by_id(scenario_id).map_err(to_js)?;
    serde_wasm_bindgen::to_value(&config).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn scenario_info_to_js(info: &ScenarioInfo) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(info.id));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(info.name));
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("description"),
        &JsValue::from_str(info.description),
    );
    JsValue::from(obj)
}

fn to_js(err: crate::SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(config: JsValue) -> Result<ScenarioConfig, JsValue> {
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))
}

#[wasm_bindgen]
pub struct WasmSim {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmSim {
    /// Idle simulation seeded from a preset; `reset` returns to it.
    #[wasm_bindgen(constructor)]
    pub fn new(scenario_id: Option<String>) -> Result<WasmSim, JsValue> {
        let id = scenario_id.as_deref().unwrap_or(SCENARIO_FIGURE_EIGHT);
        let engine = Engine::from_scenario(id).map_err(to_js)?;
        Ok(WasmSim { engine })
    }

    /// Build from a config object:
    /// {
    ///   bodies: [{ name?, position: [x,y], velocity: [vx,vy], mass,
    ///              charge?, radius?, color?, isReferenceBody? }],
    ///   collisionDistance, ejectionDistance,
    ///   timeStep?, trailCapacity?, constants?: { g, ke }
    /// }
    #[wasm_bindgen(js_name = "newFromConfig")]
    pub fn new_from_config(config: JsValue) -> Result<WasmSim, JsValue> {
        let cfg = parse_config(config)?;
        let engine = Engine::new(cfg).map_err(to_js)?;
        Ok(WasmSim { engine })
    }

    /// Packed [x, y, vx, vy]* states with one shared mass. The first body is the reference.
    #[wasm_bindgen(js_name = "fromStates")]
    pub fn from_states(
        states: Vec<f64>,
        mass: f64,
        time_step: f64,
        collision_distance: f64,
        ejection_distance: f64,
    ) -> Result<WasmSim, JsValue> {
        let bodies = configs_from_states(&states, mass).map_err(to_js)?;
        let thresholds = Thresholds::new(collision_distance, ejection_distance);
        let cfg = ScenarioConfig::new(bodies, thresholds).with_time_step(time_step);
        let engine = Engine::new(cfg).map_err(to_js)?;
        Ok(WasmSim { engine })
    }

    /// Start a run. Pass `undefined` to restart the canonical scenario.
    pub fn start(&mut self, config: JsValue) -> Result<(), JsValue> {
        if config.is_undefined() || config.is_null() {
            return self.engine.start(None).map_err(to_js);
        }
        let cfg = parse_config(config)?;
        self.engine.start(Some(&cfg)).map_err(to_js)
    }

    pub fn reset(&mut self) { self.engine.reset(); }

    /// Returns true while the run continues.
    pub fn step(&mut self) -> bool {
        self.engine.step();
        self.engine.is_running()
    }

    pub fn len(&self) -> usize { self.engine.len() }

    pub fn running(&self) -> bool { self.engine.is_running() }

    #[wasm_bindgen(js_name = "elapsedSeconds")]
    pub fn elapsed_seconds(&self) -> f64 { self.engine.elapsed_simulated_time() }

    #[wasm_bindgen(js_name = "elapsedDays")]
    pub fn elapsed_days(&self) -> f64 { self.engine.elapsed_simulated_days() }

    /// Flat [x, y]* of the current positions.
    pub fn positions(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.engine.len() * 2);
        for body in self.engine.bodies() {
            let p = body.position();
            out.push(p.x);
            out.push(p.y);
        }
        out
    }

    /// Flat [x, y]* of one body's trail, oldest first.
    pub fn trail(&self, index: usize) -> Vec<f64> {
        match self.engine.body(index) {
            Some(body) => body.trail().iter().flat_map(|p| [p.x, p.y]).collect(),
            None => Vec::new(),
        }
    }

    /// Snapshots of every body: position, radius, color, trail and so on.
    pub fn bodies(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.engine.body_snapshots()).unwrap_or(JsValue::NULL)
    }

    /// { running, termination, message, stepCount, elapsedSeconds, elapsedDays }
    pub fn status(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.engine.status()).unwrap_or(JsValue::NULL)
    }
}
