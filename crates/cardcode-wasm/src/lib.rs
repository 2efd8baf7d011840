//! CardCode engines as a WASM module for the browser UI.
//!
//! Every call takes and returns JSON strings. Failures come back as
//! `{"success": false, "error": ..., "code": ...}` instead of throwing; the
//! only throwing call is the `Game` constructor, on a bad configuration.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { Game, parse } from 'cardcode-wasm';
//!
//! await init();
//!
//! const game = new Game('{"level": 2, "wheel": {"mode": "strategic"}}');
//! const spin = JSON.parse(game.spin());
//! // { category: "green", reason: "weighted", round: 1, ... }
//!
//! const cards = [{ id: "a1", type: "assign", value: "x =", color: "red" },
//!                { id: "n5", type: "number", value: "5", color: "green" }];
//! JSON.parse(game.submit(JSON.stringify(cards), "group-1"));
//! // { valid: true, command: "x = 5", tree: {...}, execution: { success: true, ... } }
//! ```

use cardcode_eval::Variables;
use cardcode_game::{ExportBundle, GameSession};
use cardcode_parser::{ParseReport, Parser};
use cardcode_types::Card;
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn error_json(message: &str, code: &str) -> String {
    serde_json::json!({ "success": false, "error": message, "code": code }).to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| error_json(&format!("serialization error: {e}"), "serialization"))
}

fn ok_json() -> String {
    serde_json::json!({ "success": true }).to_string()
}

fn read_cards(cards_json: &str) -> Result<Vec<Card>, String> {
    serde_json::from_str(cards_json)
        .map_err(|e| error_json(&format!("invalid cards: {e}"), "invalid_json"))
}

/// Parse a card sequence at `level` without executing it.
///
/// Returns `{valid: true, command, tree}` or `{valid: false, error, code}`.
#[wasm_bindgen]
pub fn parse(cards_json: &str, level: u8) -> String {
    match read_cards(cards_json) {
        Ok(cards) => to_json(&ParseReport::from(Parser::new(level).parse(&cards))),
        Err(e) => e,
    }
}

/// Return the engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// One game session.
#[wasm_bindgen]
pub struct Game {
    session: GameSession,
}

#[wasm_bindgen]
impl Game {
    /// Start a session from a `GameConfig` JSON object (`"{}"` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Game, JsError> {
        let session =
            GameSession::from_json(config_json).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Game { session })
    }

    /// Parse and execute cards for `actor`. Returns a `CommandReport`.
    pub fn submit(&mut self, cards_json: &str, actor: &str) -> String {
        match read_cards(cards_json) {
            Ok(cards) => to_json(&self.session.submit(&cards, actor)),
            Err(e) => e,
        }
    }

    /// Parse at the session level without executing.
    pub fn check(&self, cards_json: &str) -> String {
        match read_cards(cards_json) {
            Ok(cards) => to_json(&self.session.check(&cards)),
            Err(e) => e,
        }
    }

    pub fn spin(&mut self) -> String {
        match self.session.spin() {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_json(&e.to_string(), e.code()),
        }
    }

    #[wasm_bindgen(js_name = forceColor)]
    pub fn force_color(&mut self, name: &str) -> String {
        match self.session.force_color(name) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_json(&e.to_string(), e.code()),
        }
    }

    #[wasm_bindgen(js_name = wheelStats)]
    pub fn wheel_stats(&self) -> String {
        to_json(&self.session.wheel_stats())
    }

    #[wasm_bindgen(js_name = setLevel)]
    pub fn set_level(&mut self, level: u8) -> String {
        match self.session.set_level(level) {
            Ok(()) => ok_json(),
            Err(e) => error_json(&e.to_string(), e.code()),
        }
    }

    /// Merge `{name: value | null}` into the store.
    #[wasm_bindgen(js_name = setVariables)]
    pub fn set_variables(&mut self, variables_json: &str) -> String {
        match serde_json::from_str::<Variables>(variables_json) {
            Ok(variables) => {
                self.session.set_variables(variables);
                ok_json()
            }
            Err(e) => error_json(&format!("invalid variables: {e}"), "invalid_json"),
        }
    }

    /// Facilitator draw for `global_1`. Returns `{success: true, value}`.
    #[wasm_bindgen(js_name = randomizeGlobal)]
    pub fn randomize_global(&mut self) -> String {
        let value = self.session.randomize_global();
        serde_json::json!({ "success": true, "value": value }).to_string()
    }

    pub fn variables(&self) -> String {
        to_json(&self.session.variables())
    }

    pub fn log(&self) -> String {
        to_json(&self.session.log())
    }

    pub fn reset(&mut self) -> String {
        self.session.reset();
        ok_json()
    }

    #[wasm_bindgen(js_name = exportState)]
    pub fn export_state(&self) -> String {
        to_json(&self.session.export_state())
    }

    #[wasm_bindgen(js_name = importState)]
    pub fn import_state(&mut self, bundle_json: &str) -> String {
        match ExportBundle::from_json(bundle_json) {
            Ok(bundle) => {
                self.session.import_state(bundle);
                ok_json()
            }
            Err(e) => error_json(&e.to_string(), e.code()),
        }
    }
}
