use std::path::PathBuf;

fn main() {
    let mut target_board: Option<String> = None;

    for (name, _) in std::env::vars() {
        let prefix = "CARGO_FEATURE_TARGET_BOARD_";
        if name.starts_with(prefix) {
            let suffix = name[prefix.len()..].to_string();
            if let Some(previous) = &target_board {
                panic!(
                    "multiple target board features defined (at least {} and {})",
                    show_feature(previous),
                    show_feature(&suffix)
                );
            }

            target_board = Some(suffix);
        }
    }

    let Some(target_board) = target_board else {
        panic!("missing target-board-* feature");
    };

    // Host builds (unit tests) don't link against a memory map.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    let memory = match target_board.as_str() {
        // STM32F427: 2 MiB flash, SRAM1-3 contiguous at 0x2000_0000.
        "TREZOR_T" => "MEMORY
{
    FLASH : ORIGIN = 0x08000000, LENGTH = 2048K
    RAM   : ORIGIN = 0x20000000, LENGTH = 192K
}
",
        // LPC55S69, linked at the secure aliases (bit 28 set).
        "LPC55XPRESSO" => "MEMORY
{
    FLASH : ORIGIN = 0x10000000, LENGTH = 608K
    RAM   : ORIGIN = 0x30000000, LENGTH = 256K
}
",
        other => panic!("no memory map for {}", show_feature(other)),
    };

    let out = PathBuf::from(std::env::var_os("OUT_DIR").expect("OUT_DIR unset"));
    std::fs::write(out.join("memory.x"), memory).expect("writing memory.x");
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn show_feature(envvar: &str) -> String {
    let mut name = "target-board-".to_string();
    name.push_str(&envvar.to_ascii_lowercase().replace('_', "-"));
    name
}
