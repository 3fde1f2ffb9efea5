//! Build script for tickwork-firmware
//!
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` with the board as Rust constants

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tickwork_core::config::{BoardConfig, PinConfig};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let board = load_board();
    generate_constants(&board);
}

/// Read, parse and validate board.toml
fn load_board() -> BoardConfig {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        fail(
            "board.toml not found!",
            "The firmware requires a board.toml description file.\n\
             Please create one in the tickwork-firmware directory.",
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &e.to_string()),
    };

    let board: BoardConfig = match toml::from_str(&config_content) {
        Ok(board) => board,
        Err(e) => fail("Invalid board.toml", &e.to_string()),
    };

    if let Err(e) = board.validate() {
        fail("board.toml failed validation", &e.to_string());
    }

    println!("cargo:warning=board.toml validated successfully");
    board
}

/// Abort the build with `title` and `detail` framed in a box
fn fail(title: &str, detail: &str) -> ! {
    const RULE: &str = "══════════════════════════════════════════════════════════════════";

    let mut out = String::from("\n");
    writeln!(out, "╔{}╗", RULE).unwrap();
    writeln!(out, "{}", frame_line(&format!("ERROR: {}", title))).unwrap();
    writeln!(out, "╠{}╣", RULE).unwrap();
    for line in detail.lines() {
        writeln!(out, "{}", frame_line(line)).unwrap();
    }
    writeln!(out, "╚{}╝", RULE).unwrap();

    panic!("{}", out);
}

/// One line of the box, truncated to fit
fn frame_line(line: &str) -> String {
    let truncated = if line.chars().count() > 64 {
        format!("{}...", line.chars().take(61).collect::<String>())
    } else {
        line.to_string()
    };
    format!("║  {:<64}║", truncated)
}

/// Write the board out as constants for `src/board.rs`
fn generate_constants(board: &BoardConfig) {
    let mut out = String::new();

    writeln!(out, "// Generated from board.toml by build.rs").unwrap();
    writeln!(
        out,
        "pub const CPU_FREQUENCY_HZ: u32 = {};",
        board.clock.cpu_frequency_hz
    )
    .unwrap();
    writeln!(
        out,
        "pub const PRESCALER: PrescalerMode = PrescalerMode::{:?};",
        board.timer.prescaler
    )
    .unwrap();
    writeln!(
        out,
        "pub const LEDS: [PinConfig; {}] = [{}];",
        board.leds.len(),
        board
            .leds
            .iter()
            .map(pin_expr)
            .collect::<Vec<_>>()
            .join(", ")
    )
    .unwrap();
    writeln!(
        out,
        "pub const BUTTON: ButtonConfig = ButtonConfig {{ pin: {}, debounce_ms: {} }};",
        pin_expr(&board.button.pin),
        board.button.debounce_ms
    )
    .unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board_config.rs"), out).unwrap();
}

fn pin_expr(config: &PinConfig) -> String {
    format!(
        "pin(PortId::{:?}, {}, {})",
        config.pin.port(),
        config.pin.index(),
        config.active_low
    )
}
