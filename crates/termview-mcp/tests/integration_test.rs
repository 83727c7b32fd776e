//! Integration tests for the termview system.

#![cfg(unix)]

use std::sync::Arc;

use termview_core::{Dimensions, Rgb, SpawnSpec};
use termview_emulator::NativePtyBackend;
use termview_mcp::input::unescape;
use termview_render::RenderConfig;
use termview_session::{RegistryConfig, SessionRegistry};

fn registry() -> SessionRegistry {
    let backend = Arc::new(NativePtyBackend::probe().expect("PTY backend unavailable"));
    SessionRegistry::with_config(
        backend,
        RegistryConfig {
            max_sessions: 8,
            default_rows: 24,
            default_cols: 80,
        },
    )
}

fn sh(script: &str) -> SpawnSpec {
    SpawnSpec::command("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[tokio::test]
async fn test_spawn_to_text_snapshot() {
    let reg = registry();
    let session = reg.create_spawned(&sh("echo integration"), None).unwrap();

    session.wait_for_exit().await.unwrap();
    session.flush().await.unwrap();

    let text = session.text();
    assert!(text.contains("integration"), "screen was: {text:?}");

    // Exactly one line per row of the snapshot window.
    assert_eq!(text.split('\n').count(), 24);
}

#[tokio::test]
async fn test_unescaped_input_drives_shell() {
    let reg = registry();
    let session = reg.create_spawned(&sh("read x; echo reply:$x"), None).unwrap();

    // The write tool translates "\r" before handing bytes to the PTY.
    session.write(&unescape("hello-world\\r")).unwrap();

    session.wait_for_exit().await.unwrap();
    session.flush().await.unwrap();
    assert!(session.text().contains("reply:hello-world"));
}

#[tokio::test]
async fn test_colored_output_reaches_snapshot() {
    let reg = registry();
    let session = reg
        .create_spawned(&sh("printf '\\033[31mRED\\033[0m'"), None)
        .unwrap();

    session.wait_for_exit().await.unwrap();
    session.flush().await.unwrap();

    let records = session.cell_grid();
    assert_eq!(records[0][0].ch, 'R');
    // ANSI red from the xterm palette.
    assert_eq!(records[0][0].fg, Rgb::new(205, 0, 0));
}

#[tokio::test]
async fn test_screenshot_of_live_session() {
    let reg = registry();
    let session = reg
        .create_spawned(&sh("echo shot"), Some(Dimensions::new(10, 40)))
        .unwrap();

    session.wait_for_exit().await.unwrap();
    session.flush().await.unwrap();

    let config = RenderConfig::default();
    let png = termview_render::render(&session.cell_grid(), session.dimensions(), &config).unwrap();
    assert_eq!(&png[..4], &[0x89, 0x50, 0x4E, 0x47]);

    // A blank grid of the same shape renders differently.
    let blank = reg.create(Some(Dimensions::new(10, 40))).unwrap();
    let blank_png =
        termview_render::render(&blank.cell_grid(), blank.dimensions(), &config).unwrap();
    assert_ne!(png, blank_png);
}

#[tokio::test]
async fn test_kill_removes_session() {
    let reg = registry();
    let session = reg.create_spawned(&sh("sleep 60"), None).unwrap();
    let id = session.id().clone();

    reg.destroy(&id).unwrap();
    assert!(reg.get(&id).is_err());
    assert!(session.is_destroyed());
}
