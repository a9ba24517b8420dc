// WASM bindings for the Enigma rotor machine simulator.
//
// Provides a `WasmEnigma` class exported via wasm-bindgen that wraps a
// `Machine` from enigma-machine. The machine state snapshot is serialized
// to a JavaScript object using serde-wasm-bindgen.
//
// Usage from JavaScript:
//
//   const enigma = new WasmEnigma(configText);
//   enigma.setup("* B Beta I II III AAAA");
//   enigma.convert("HELLO WORLD");   // => "ILBDAAMTAZ"
//   enigma.settings();               // => "AAAK"
//   enigma.state();                  // => { rotors: [...], settings: "AAAK", plugboard: "" }

use serde::Serialize;
use wasm_bindgen::prelude::*;

use enigma_machine::{EnigmaError, Machine, MachineConfig};

/// Serializable snapshot of the machine's current setup.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsMachineState {
    rotors: Vec<String>,
    settings: String,
    plugboard: String,
    num_rotors: usize,
    num_pawls: usize,
}

fn enigma_error_to_js(e: EnigmaError) -> JsError {
    JsError::new(&e.to_string())
}

/// Rotor cipher machine for WebAssembly.
#[wasm_bindgen]
pub struct WasmEnigma {
    machine: Machine,
}

#[wasm_bindgen]
impl WasmEnigma {
    /// Build a machine from the text of a configuration file.
    #[wasm_bindgen(constructor)]
    pub fn new(config: &str) -> Result<WasmEnigma, JsError> {
        let machine = MachineConfig::parse(config)
            .and_then(MachineConfig::build)
            .map_err(enigma_error_to_js)?;
        Ok(WasmEnigma { machine })
    }

    /// Apply a setup line such as `* B Beta I II III AAAA (AB)`.
    ///
    /// On error the previous setup is left untouched.
    pub fn setup(&mut self, line: &str) -> Result<(), JsError> {
        self.machine.setup(line).map_err(enigma_error_to_js)
    }

    /// Convert a message, ignoring whitespace. Advances the rotors.
    pub fn convert(&mut self, message: &str) -> Result<String, JsError> {
        self.machine
            .convert_message(message)
            .map_err(enigma_error_to_js)
    }

    /// Current rotor positions, one symbol per slot.
    pub fn settings(&self) -> Result<String, JsError> {
        self.machine.settings().map_err(enigma_error_to_js)
    }

    /// Whether a setup line has been applied.
    #[wasm_bindgen(js_name = "isConfigured")]
    pub fn is_configured(&self) -> bool {
        self.machine.is_configured()
    }

    /// Snapshot of the current setup.
    ///
    /// Returns an object with fields `rotors`, `settings`, `plugboard`,
    /// `numRotors` and `numPawls`.
    pub fn state(&self) -> Result<JsValue, JsError> {
        let state = JsMachineState {
            rotors: self
                .machine
                .rotor_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            settings: self.machine.settings().map_err(enigma_error_to_js)?,
            plugboard: self.machine.plugboard().to_string(),
            num_rotors: self.machine.num_rotors(),
            num_pawls: self.machine.num_pawls(),
        };
        serde_wasm_bindgen::to_value(&state).map_err(|e| JsError::new(&e.to_string()))
    }
}
